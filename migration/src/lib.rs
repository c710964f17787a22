pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_sites_table;
mod m20250301_000002_create_migration_jobs_table;
mod m20250301_000003_create_movies_table;
mod m20250301_000004_create_tv_shows_table;
mod m20250301_000005_create_tv_episodes_table;
mod m20250301_000006_create_activity_logs_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_sites_table::Migration),
            Box::new(m20250301_000002_create_migration_jobs_table::Migration),
            Box::new(m20250301_000003_create_movies_table::Migration),
            Box::new(m20250301_000004_create_tv_shows_table::Migration),
            Box::new(m20250301_000005_create_tv_episodes_table::Migration),
            Box::new(m20250301_000006_create_activity_logs_table::Migration),
        ]
    }
}
