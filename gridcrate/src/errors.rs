//! # Error Handling
//!
//! Translation itself never fails: bad filters, sorts and page numbers are dropped or
//! clamped. The only errors come from running the translated query against a
//! database, and they are wrapped in [`GridError`].
//!
//! `GridError` implements axum's `IntoResponse`, so a grid handler can return it
//! directly. Internal details are logged through `tracing` and never sent to the
//! client:
//!
//! ```rust,ignore
//! use gridcrate::{GridError, GridPage, GridParams, QueryTranslator};
//!
//! async fn list_tickets(
//!     State(db): State<DatabaseConnection>,
//!     Query(params): Query<GridParams>,
//! ) -> Result<Json<GridPage<ticket::Model>>, GridError> {
//!     let state = params.to_state();
//!     let page = QueryTranslator::default()
//!         .load_page(ticket::Entity::find(), Some(&state), &db)
//!         .await?;
//!     Ok(Json(page))
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

/// Failure while executing a grid query.
#[derive(Debug)]
pub enum GridError {
    /// 500 Internal Server Error - database error (details logged, not exposed)
    Database {
        /// User-facing generic message
        message: String,
        /// Internal error (logged, not sent to user)
        internal: DbErr,
    },
}

impl GridError {
    /// Wrap a database error. The details are logged but not sent to the user.
    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Sanitized message safe to show to a client.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database { message, .. } => message.clone(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(
                    error = ?internal,
                    status = %self.status_code(),
                    "Database error while running grid query"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for GridError {
    fn into_response(self) -> Response {
        self.log_internal();
        let body = ErrorResponse {
            error: self.user_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database { internal, .. } => Some(internal),
        }
    }
}

/// Grid queries only list and count, so every `DbErr` is a sanitized 500.
impl From<DbErr> for GridError {
    fn from(err: DbErr) -> Self {
        Self::database(err)
    }
}
