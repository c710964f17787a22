use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Database connection failed: {0}")]
    SourceUnavailable(sea_orm::DbErr),

    #[error("Please select a site")]
    NoSiteSelected,

    #[error("Please select at least one content type")]
    NoContentSelected,

    #[error("No content found matching the selected criteria")]
    NothingToMigrate,

    #[error("Selected site does not exist")]
    SiteNotFound(i32),

    #[error("Migration job not found")]
    JobNotFound(i32),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Malformed source row: {0}")]
    MalformedRow(String),

}

impl AppError {
    /// Errors caused by the request itself rather than by the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NoSiteSelected
                | Self::NoContentSelected
                | Self::NothingToMigrate
                | Self::SiteNotFound(_)
                | Self::JobNotFound(_)
                | Self::InvalidRequest(_)
        )
    }

    /// Message shown to the admin UI. Infrastructure failures only expose
    /// their underlying cause when `debug` is set.
    pub fn user_message(&self, debug: bool) -> String {
        if self.is_client_error() || debug {
            return self.to_string();
        }

        match self {
            Self::SourceUnavailable(_) => {
                "Database connection failed. Please try again later.".to_string()
            }
            Self::Database(_) => "Database error occurred".to_string(),
            Self::MalformedRow(_) => "Source data could not be processed".to_string(),
            _ => self.to_string(),
        }
    }

    /// Emit the log line this error deserves. Input errors are not system
    /// faults and stay at debug level.
    pub fn log(&self) {
        if self.is_client_error() {
            tracing::debug!("Rejected request: {}", self);
        } else {
            tracing::error!("{}", self);
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let status = match self {
            Self::NoSiteSelected
            | Self::NoContentSelected
            | Self::NothingToMigrate
            | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::SiteNotFound(_) | Self::JobNotFound(_) => StatusCode::NOT_FOUND,
            Self::SourceUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::MalformedRow(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.user_message(false),
            "details": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_keep_their_message() {
        assert_eq!(
            AppError::NoSiteSelected.user_message(false),
            "Please select a site"
        );
        assert_eq!(
            AppError::JobNotFound(9).user_message(false),
            "Migration job not found"
        );
    }

    #[test]
    fn test_connectivity_detail_only_in_debug() {
        let err = AppError::SourceUnavailable(sea_orm::DbErr::Custom("refused".into()));

        assert_eq!(
            err.user_message(false),
            "Database connection failed. Please try again later."
        );
        assert!(err.user_message(true).contains("refused"));
    }

    #[test]
    fn test_every_variant_maps_to_a_status() {
        let cases = [
            (AppError::NoSiteSelected, StatusCode::BAD_REQUEST),
            (AppError::InvalidRequest("Invalid offset".into()), StatusCode::BAD_REQUEST),
            (AppError::SiteNotFound(3), StatusCode::NOT_FOUND),
            (AppError::JobNotFound(3), StatusCode::NOT_FOUND),
            (
                AppError::SourceUnavailable(sea_orm::DbErr::Custom("down".into())),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::MalformedRow("movie #1".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Database(sea_orm::DbErr::Custom("locked".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
