//! Per-kind dedup and merge of source rows into a tenant's catalog.
//!
//! Movies and shows are matched on `(site_id, tmdb_id)`, episodes on
//! `(site_id, tmdb_id, season_number, episode_number)`. A match is
//! overwritten wholesale with the projected source fields, so the last
//! write for a key always wins. Episodes are never created here: without a
//! resolvable parent show they are skipped.

use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    entity::prelude::DateTimeWithTimeZone, ActiveModelTrait, ColumnTrait, ConnectionTrait,
    EntityTrait, QueryFilter, Set,
};
use serde::Serialize;

use crate::{
    db::{
        entities::{movie, tv_episode, tv_show, Movie, TvEpisode, TvShow},
        source::{self, SourceRow},
    },
    error::{AppError, Result},
};

/// Source tag written when the source row carries none.
pub const MIGRATION_SOURCE_TAG: &str = "migration";

/// Shows in the legacy catalog carry no language, they are all English.
pub const DEFAULT_SHOW_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Imported,
    Updated,
    Skipped,
}

/// Apply one source row to the tenant `site_id`.
pub async fn upsert_row<C: ConnectionTrait>(
    conn: &C,
    row: &SourceRow,
    site_id: i32,
) -> Result<UpsertOutcome> {
    match row {
        SourceRow::Movie(m) => upsert_movie(conn, MovieFields::try_from(m)?, site_id).await,
        SourceRow::TvShow(s) => upsert_tv_show(conn, ShowFields::try_from(s)?, site_id).await,
        SourceRow::Episode(e) => {
            upsert_episode(conn, EpisodeFields::try_from(e)?, site_id).await
        }
    }
}

async fn upsert_movie<C: ConnectionTrait>(
    conn: &C,
    fields: MovieFields,
    site_id: i32,
) -> Result<UpsertOutcome> {
    let existing = Movie::find()
        .filter(movie::Column::SiteId.eq(site_id))
        .filter(movie::Column::TmdbId.eq(fields.tmdb_id))
        .one(conn)
        .await?;

    let now: DateTimeWithTimeZone = Utc::now().into();

    match existing {
        Some(model) => {
            let mut active: movie::ActiveModel = model.into();
            fields.apply(&mut active);
            active.updated_at = Set(now);
            active.update(conn).await?;
            Ok(UpsertOutcome::Updated)
        }
        None => {
            let mut active = movie::ActiveModel {
                site_id: Set(site_id),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            fields.apply(&mut active);
            active.insert(conn).await?;
            Ok(UpsertOutcome::Imported)
        }
    }
}

async fn upsert_tv_show<C: ConnectionTrait>(
    conn: &C,
    fields: ShowFields,
    site_id: i32,
) -> Result<UpsertOutcome> {
    let existing = TvShow::find()
        .filter(tv_show::Column::SiteId.eq(site_id))
        .filter(tv_show::Column::TmdbId.eq(fields.tmdb_id))
        .one(conn)
        .await?;

    let now: DateTimeWithTimeZone = Utc::now().into();

    match existing {
        Some(model) => {
            let mut active: tv_show::ActiveModel = model.into();
            fields.apply(&mut active);
            active.updated_at = Set(now);
            active.update(conn).await?;
            Ok(UpsertOutcome::Updated)
        }
        None => {
            let mut active = tv_show::ActiveModel {
                site_id: Set(site_id),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            fields.apply(&mut active);
            active.insert(conn).await?;
            Ok(UpsertOutcome::Imported)
        }
    }
}

async fn upsert_episode<C: ConnectionTrait>(
    conn: &C,
    fields: EpisodeFields,
    site_id: i32,
) -> Result<UpsertOutcome> {
    let existing = TvEpisode::find()
        .filter(tv_episode::Column::SiteId.eq(site_id))
        .filter(tv_episode::Column::TmdbId.eq(fields.tmdb_id))
        .filter(tv_episode::Column::SeasonNumber.eq(fields.season_number))
        .filter(tv_episode::Column::EpisodeNumber.eq(fields.episode_number))
        .one(conn)
        .await?;

    let Some(model) = existing else {
        tracing::debug!(
            site_id,
            tmdb_id = fields.tmdb_id,
            season = fields.season_number,
            episode = fields.episode_number,
            "Episode has no counterpart in destination, skipping"
        );
        return Ok(UpsertOutcome::Skipped);
    };

    let mut active: tv_episode::ActiveModel = model.into();
    fields.apply(&mut active);
    active.updated_at = Set(Utc::now().into());
    active.update(conn).await?;
    Ok(UpsertOutcome::Updated)
}

// ============================================================================
// Field projections
// ============================================================================

/// Mapped movie columns, validated from a source row.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieFields {
    pub tmdb_id: i64,
    pub title: String,
    pub plot: Option<String>,
    pub year: Option<i32>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub actors: Option<String>,
    pub country: Option<String>,
    pub duration: Option<i32>,
    pub genre: Option<String>,
    pub meta_title: Option<String>,
    pub ai_summary: Option<String>,
    pub ai_src_hash: Option<String>,
    pub ai_updated_at: Option<DateTimeWithTimeZone>,
    pub plot_rewritten: bool,
    pub rewritten_at: Option<DateTimeWithTimeZone>,
    pub source: String,
}

impl TryFrom<&source::movie::Model> for MovieFields {
    type Error = AppError;

    fn try_from(row: &source::movie::Model) -> Result<Self> {
        let tmdb_id = row
            .tmdb_id
            .ok_or_else(|| AppError::MalformedRow(format!("movie #{} has no tmdb_id", row.id)))?;

        Ok(Self {
            tmdb_id,
            title: required_title(&row.title, "movie", row.id)?,
            plot: row.plot.clone(),
            year: row.year,
            poster_url: row.poster_url.clone(),
            backdrop_url: row.backdrop_url.clone(),
            actors: row.actors.clone(),
            country: row.country.clone(),
            duration: row.duration,
            genre: row.genre.clone(),
            meta_title: row.meta_title.clone(),
            ai_summary: row.ai_summary.clone(),
            ai_src_hash: row.ai_src_hash.clone(),
            ai_updated_at: as_utc(row.ai_updated_at),
            plot_rewritten: row.plot_rewritten,
            rewritten_at: as_utc(row.rewritten_at),
            source: source_tag(row.source.as_deref()),
        })
    }
}

impl MovieFields {
    fn apply(self, active: &mut movie::ActiveModel) {
        active.tmdb_id = Set(self.tmdb_id);
        active.title = Set(self.title);
        active.plot = Set(self.plot);
        active.year = Set(self.year);
        active.poster_url = Set(self.poster_url);
        active.backdrop_url = Set(self.backdrop_url);
        active.actors = Set(self.actors);
        active.country = Set(self.country);
        active.duration = Set(self.duration);
        active.genre = Set(self.genre);
        active.meta_title = Set(self.meta_title);
        active.ai_summary = Set(self.ai_summary);
        active.ai_src_hash = Set(self.ai_src_hash);
        active.ai_updated_at = Set(self.ai_updated_at);
        active.plot_rewritten = Set(self.plot_rewritten);
        active.rewritten_at = Set(self.rewritten_at);
        active.source = Set(self.source);
    }
}

/// Mapped show columns. The legacy `title`/`plot`/`year` land in
/// `name`/`overview`/`first_air_date`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowFields {
    pub tmdb_id: i64,
    pub name: String,
    pub overview: Option<String>,
    pub first_air_date: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub original_language: String,
    pub ai_summary: Option<String>,
    pub ai_src_hash: Option<String>,
    pub ai_updated_at: Option<DateTimeWithTimeZone>,
    pub plot_rewritten: bool,
    pub rewritten_at: Option<DateTimeWithTimeZone>,
    pub source: String,
}

impl TryFrom<&source::tv_show::Model> for ShowFields {
    type Error = AppError;

    fn try_from(row: &source::tv_show::Model) -> Result<Self> {
        let tmdb_id = row
            .tmdb_id
            .ok_or_else(|| AppError::MalformedRow(format!("tv show #{} has no tmdb_id", row.id)))?;

        Ok(Self {
            tmdb_id,
            name: required_title(&row.title, "tv show", row.id)?,
            overview: row.plot.clone(),
            first_air_date: row.year.map(|y| y.to_string()),
            poster_url: row.poster_url.clone(),
            backdrop_url: row.backdrop_url.clone(),
            genre: row.genre.clone(),
            country: row.country.clone(),
            original_language: DEFAULT_SHOW_LANGUAGE.to_string(),
            ai_summary: row.ai_summary.clone(),
            ai_src_hash: row.ai_src_hash.clone(),
            ai_updated_at: as_utc(row.ai_updated_at),
            plot_rewritten: row.plot_rewritten,
            rewritten_at: as_utc(row.rewritten_at),
            source: source_tag(row.source.as_deref()),
        })
    }
}

impl ShowFields {
    fn apply(self, active: &mut tv_show::ActiveModel) {
        active.tmdb_id = Set(self.tmdb_id);
        active.name = Set(self.name);
        active.overview = Set(self.overview);
        active.first_air_date = Set(self.first_air_date);
        active.poster_url = Set(self.poster_url);
        active.backdrop_url = Set(self.backdrop_url);
        active.genre = Set(self.genre);
        active.country = Set(self.country);
        active.original_language = Set(Some(self.original_language));
        active.ai_summary = Set(self.ai_summary);
        active.ai_src_hash = Set(self.ai_src_hash);
        active.ai_updated_at = Set(self.ai_updated_at);
        active.plot_rewritten = Set(self.plot_rewritten);
        active.rewritten_at = Set(self.rewritten_at);
        active.source = Set(self.source);
    }
}

/// Mapped episode columns. The natural key is only used for lookup and is
/// never rewritten on the destination row.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeFields {
    pub tmdb_id: i64,
    pub season_number: i32,
    pub episode_number: i32,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub still_url: Option<String>,
    pub ai_summary: Option<String>,
    pub ai_src_hash: Option<String>,
    pub ai_updated_at: Option<DateTimeWithTimeZone>,
    pub plot_rewritten: bool,
    pub rewritten_at: Option<DateTimeWithTimeZone>,
}

impl TryFrom<&source::episode::Model> for EpisodeFields {
    type Error = AppError;

    fn try_from(row: &source::episode::Model) -> Result<Self> {
        let (Some(tmdb_id), Some(season_number), Some(episode_number)) =
            (row.tmdb_id, row.season_number, row.episode_number)
        else {
            return Err(AppError::MalformedRow(format!(
                "episode #{} has an incomplete natural key",
                row.id
            )));
        };

        Ok(Self {
            tmdb_id,
            season_number,
            episode_number,
            name: row.title.clone(),
            overview: row.plot.clone(),
            air_date: row.air_date.clone(),
            still_url: row.still_url.clone(),
            ai_summary: row.ai_summary.clone(),
            ai_src_hash: row.ai_src_hash.clone(),
            ai_updated_at: as_utc(row.ai_updated_at),
            plot_rewritten: row.plot_rewritten,
            rewritten_at: as_utc(row.rewritten_at),
        })
    }
}

impl EpisodeFields {
    fn apply(self, active: &mut tv_episode::ActiveModel) {
        active.name = Set(self.name);
        active.overview = Set(self.overview);
        active.air_date = Set(self.air_date);
        active.still_url = Set(self.still_url);
        active.ai_summary = Set(self.ai_summary);
        active.ai_src_hash = Set(self.ai_src_hash);
        active.ai_updated_at = Set(self.ai_updated_at);
        active.plot_rewritten = Set(self.plot_rewritten);
        active.rewritten_at = Set(self.rewritten_at);
    }
}

fn required_title(title: &Option<String>, kind: &str, id: i32) -> Result<String> {
    match title.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t.to_string()),
        _ => Err(AppError::MalformedRow(format!("{} #{} has no title", kind, id))),
    }
}

fn source_tag(source: Option<&str>) -> String {
    match source.map(str::trim) {
        Some(tag) if !tag.is_empty() => tag.to_string(),
        _ => MIGRATION_SOURCE_TAG.to_string(),
    }
}

/// Legacy timestamps are naive and stored in UTC.
fn as_utc(value: Option<NaiveDateTime>) -> Option<DateTimeWithTimeZone> {
    value.map(|dt| dt.and_utc().fixed_offset())
}
