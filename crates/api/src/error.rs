//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. Route handlers return `Result<T, AppError>`,
//! or `Result<T, ErrorKeyed>` where the client expects the error text under
//! `error` instead of `message`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;
use crate::services::catalog::CatalogError;
use crate::services::orders::OrderError;

/// Message shown to clients for any server-side failure.
const SERVER_ERROR: &str = "Server error";

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Catalog query failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Order recording failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is a server-side failure.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Internal(_)
                | Self::Cart(CartError::Repository(_))
                | Self::Catalog(CatalogError::Repository(_))
                | Self::Order(OrderError::Repository(_))
                | Self::Auth(AuthError::Repository(_))
        )
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        if self.is_server_error() {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }

        match self {
            Self::Cart(CartError::CartNotFound | CartError::ItemNotInCart(_)) => {
                StatusCode::NOT_FOUND
            }
            Self::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            Self::Auth(AuthError::UserAlreadyExists) => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Never includes server-side error details.
    #[must_use]
    pub fn client_message(&self) -> String {
        if self.is_server_error() {
            return SERVER_ERROR.to_string();
        }

        match self {
            Self::Cart(err) => match err {
                CartError::InvalidUserId(_) => "Invalid userId".to_string(),
                CartError::InvalidItemId(_) => "Invalid itemId".to_string(),
                CartError::CartNotFound => "Cart not found".to_string(),
                CartError::ItemNotInCart(name) => format!("Item \"{name}\" not found in cart"),
                CartError::Repository(_) => SERVER_ERROR.to_string(),
            },
            Self::Order(_) => "Invalid userId".to_string(),
            Self::Catalog(_) => "Invalid category".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists".to_string()
                }
                AuthError::MissingField(field) => format!("Missing required field: {field}"),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::Repository(_) => SERVER_ERROR.to_string(),
            },
            Self::BadRequest(msg) => msg.clone(),
            Self::Database(_) | Self::Internal(_) => SERVER_ERROR.to_string(),
        }
    }

    fn into_keyed_response(self, key: &str) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (self.status(), Json(json!({ key: self.client_message() }))).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_keyed_response("message")
    }
}

/// An [`AppError`] rendered as `{"error": ...}`.
#[derive(Debug)]
pub struct ErrorKeyed(pub AppError);

impl<E> From<E> for ErrorKeyed
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ErrorKeyed {
    fn into_response(self) -> Response {
        self.0.into_keyed_response("error")
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item to cart", Some(&[("item_id", "65a1f0c2e4b0a1b2c3d4e5f6")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
