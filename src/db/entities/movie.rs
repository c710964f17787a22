use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub site_id: i32,
    pub tmdb_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub plot: Option<String>,
    pub year: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub poster_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub backdrop_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub actors: Option<String>,
    pub country: Option<String>,
    pub duration: Option<i32>,
    pub genre: Option<String>,
    pub meta_title: Option<String>,
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
}

impl Related<super::site::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Site.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
