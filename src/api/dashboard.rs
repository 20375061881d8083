//! Dashboard summary endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::Admin, services::dashboard::DashboardSummary, AppState};

use super::AuthenticatedAdmin;

/// Dashboard payload: the logged-in administrator plus counters
#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    pub admin: Admin,
    #[serde(flatten)]
    pub summary: DashboardSummary,
}

/// Counters and recent appointments for the dashboard
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthenticatedAdmin(admin): AuthenticatedAdmin,
) -> AppResult<Json<DashboardResponse>> {
    let summary = state.services.dashboard.summary().await?;
    Ok(Json(DashboardResponse { admin, summary }))
}
