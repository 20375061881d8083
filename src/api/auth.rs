//! Login, logout and current-administrator endpoints

use axum::{extract::State, Json};
use axum_extra::extract::{SignedCookieJar, WithRejection};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Admin, FieldErrors},
    AppState,
};

use super::{expired_session_cookie, session_cookie, session_id, AuthenticatedAdmin, JsonBody, SuccessResponse};

/// Login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Badge number
    pub matricula: Option<String>,
    pub senha: Option<String>,
}

/// Login response
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub admin: Admin,
}

/// Authenticate an administrator and open a session
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = LoginResponse),
        (status = 400, description = "Missing badge number or password", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    WithRejection(Json(request), _): JsonBody<LoginRequest>,
) -> AppResult<(SignedCookieJar, Json<LoginResponse>)> {
    // The badge number is matched exactly as typed
    let matricula = request.matricula.as_deref().unwrap_or_default();
    let senha = request.senha.as_deref().unwrap_or_default();

    let mut errors = FieldErrors::default();
    if matricula.trim().is_empty() {
        errors.missing("matricula");
    }
    if senha.trim().is_empty() {
        errors.missing("senha");
    }
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let admin = state
        .services
        .auth
        .verify_admin(matricula, senha)
        .await
        .ok_or_else(|| AppError::Authentication("Invalid badge number or password".to_string()))?;

    let session = state.services.sessions.start(&admin.matricula).await?;
    tracing::info!(matricula = %admin.matricula, "Administrator logged in");

    let jar = jar.add(session_cookie(&state, session.id));
    Ok((jar, Json(LoginResponse { success: true, admin })))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session ended, cookie cleared", body = SuccessResponse)
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> (SignedCookieJar, Json<SuccessResponse>) {
    if let Some(id) = session_id(&state, &jar) {
        // The cookie is cleared regardless; an orphaned record expires on its own
        if let Err(e) = state.services.sessions.end(id).await {
            tracing::error!(session_id = %id, "Failed to remove session on logout: {}", e);
        }
    }
    let jar = jar.remove(expired_session_cookie(&state));
    (jar, Json(SuccessResponse::ok()))
}

/// Get the logged-in administrator
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Current administrator", body = Admin),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(AuthenticatedAdmin(admin): AuthenticatedAdmin) -> Json<Admin> {
    Json(admin)
}
