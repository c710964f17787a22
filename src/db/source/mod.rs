//! Read-only entities for the legacy catalog the migration pulls from.
//!
//! These tables live in a separate database reached through
//! `SOURCE_DATABASE_URL`. Nothing in this crate writes to them.

pub mod episode;
pub mod movie;
pub mod tv_show;

pub use episode::Entity as SourceEpisode;
pub use movie::Entity as SourceMovie;
pub use tv_show::Entity as SourceTvShow;

use crate::db::enums::ContentKind;

/// One row pulled from the source catalog, tagged by content kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRow {
    Movie(movie::Model),
    TvShow(tv_show::Model),
    Episode(episode::Model),
}

impl SourceRow {
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Movie(_) => ContentKind::Movies,
            Self::TvShow(_) => ContentKind::TvShows,
            Self::Episode(_) => ContentKind::Episodes,
        }
    }

    /// Primary key of the row in the source table.
    pub fn source_id(&self) -> i32 {
        match self {
            Self::Movie(m) => m.id,
            Self::TvShow(s) => s.id,
            Self::Episode(e) => e.id,
        }
    }

    pub fn tmdb_id(&self) -> Option<i64> {
        match self {
            Self::Movie(m) => m.tmdb_id,
            Self::TvShow(s) => s.tmdb_id,
            Self::Episode(e) => e.tmdb_id,
        }
    }
}
