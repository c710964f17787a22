use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::db::entities::{activity_log, migration_job, site};
use crate::error::Result;

pub struct SiteRepository {
    db: DatabaseConnection,
}

impl SiteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<site::Model>> {
        Ok(site::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn find_active_by_id(&self, id: i32) -> Result<Option<site::Model>> {
        Ok(site::Entity::find_by_id(id)
            .filter(site::Column::Status.eq(site::SiteStatus::Active))
            .one(&self.db)
            .await?)
    }

    /// Active tenants, alphabetically by display name.
    pub async fn list_active(&self) -> Result<Vec<site::Model>> {
        Ok(site::Entity::find()
            .filter(site::Column::Status.eq(site::SiteStatus::Active))
            .order_by_asc(site::Column::Name)
            .all(&self.db)
            .await?)
    }
}

pub struct MigrationJobRepository {
    db: DatabaseConnection,
}

impl MigrationJobRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, job: migration_job::ActiveModel) -> Result<migration_job::Model> {
        Ok(job.insert(&self.db).await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<migration_job::Model>> {
        Ok(migration_job::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Newest jobs first, each paired with its tenant when it still exists.
    pub async fn find_recent_with_site(
        &self,
        limit: u64,
    ) -> Result<Vec<(migration_job::Model, Option<site::Model>)>> {
        Ok(migration_job::Entity::find()
            .find_also_related(site::Entity)
            .order_by_desc(migration_job::Column::CreatedAt)
            .order_by_desc(migration_job::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?)
    }
}

pub struct ActivityLogRepository {
    db: DatabaseConnection,
}

impl ActivityLogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn record(&self, action: &str, details: &str) -> Result<activity_log::Model> {
        let entry = activity_log::ActiveModel {
            action: Set(action.to_string()),
            details: Set(Some(details.to_string())),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        Ok(entry.insert(&self.db).await?)
    }

    /// Audit writes never fail the surrounding request.
    pub async fn record_best_effort(&self, action: &str, details: &str) {
        if let Err(e) = self.record(action, details).await {
            tracing::warn!(action, "Failed to log activity: {}", e);
        }
    }

    pub async fn find_by_action(&self, action: &str) -> Result<Vec<activity_log::Model>> {
        Ok(activity_log::Entity::find()
            .filter(activity_log::Column::Action.eq(action))
            .order_by_asc(activity_log::Column::Id)
            .all(&self.db)
            .await?)
    }
}
