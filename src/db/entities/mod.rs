pub mod activity_log;
pub mod migration_job;
pub mod movie;
pub mod site;
pub mod tv_episode;
pub mod tv_show;

pub use activity_log::Entity as ActivityLog;
pub use migration_job::Entity as MigrationJob;
pub use movie::Entity as Movie;
pub use site::Entity as Site;
pub use tv_episode::Entity as TvEpisode;
pub use tv_show::Entity as TvShow;
