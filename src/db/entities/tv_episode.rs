use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tv_episodes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub site_id: i32,
    pub tv_show_id: Option<i32>,
    pub tmdb_id: i64,
    pub season_number: i32,
    pub episode_number: i32,
    pub name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub overview: Option<String>,
    pub air_date: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub still_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub ai_summary: Option<String>,
    pub ai_src_hash: Option<String>,
    pub ai_updated_at: Option<DateTimeWithTimeZone>,
    pub plot_rewritten: bool,
    pub rewritten_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tv_show::Entity",
        from = "Column::TvShowId",
        to = "super::tv_show::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    TvShow,
}

impl Related<super::tv_show::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TvShow.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
