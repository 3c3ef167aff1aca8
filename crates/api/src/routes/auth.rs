//! Account route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{Result, set_sentry_user};
use crate::models::User;
use crate::services::auth::SignupForm;
use crate::state::AppState;

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user: User,
}

/// Login with email and password.
///
/// POST /login
///
/// # Errors
///
/// Returns 401 for an unknown email or wrong password.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user = state
        .auth_service()
        .login(&request.email, &request.password)
        .await?;

    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok(Json(LoginResponse {
        message: "Login successful",
        user,
    }))
}

/// Create an account.
///
/// POST /signup
///
/// # Errors
///
/// Returns 400 for missing fields or a malformed email, 409 if the email is
/// already registered.
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    Json(form): Json<SignupForm>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state.auth_service().signup(form).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
