use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tv_shows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub site_id: i32,
    pub tmdb_id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub overview: Option<String>,
    pub first_air_date: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub poster_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub backdrop_url: Option<String>,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub original_language: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub ai_summary: Option<String>,
    pub ai_src_hash: Option<String>,
    pub ai_updated_at: Option<DateTimeWithTimeZone>,
    pub plot_rewritten: bool,
    pub rewritten_at: Option<DateTimeWithTimeZone>,
    pub source: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::site::Entity",
        from = "Column::SiteId",
        to = "super::site::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Site,
    #[sea_orm(has_many = "super::tv_episode::Entity")]
    Episodes,
}

impl Related<super::site::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Site.def()
    }
}

impl Related<super::tv_episode::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Episodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
