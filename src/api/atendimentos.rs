//! Appointment endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Atendimento, AtendimentoComCliente, AtendimentoInput},
    AppState,
};

use super::{AuthenticatedAdmin, IdPath, JsonBody, SuccessResponse};

/// List appointments with their client, latest schedule first
#[utoipa::path(
    get,
    path = "/atendimentos",
    tag = "atendimentos",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "List of appointments", body = Vec<AtendimentoComCliente>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_atendimentos(
    State(state): State<AppState>,
    _admin: AuthenticatedAdmin,
) -> AppResult<Json<Vec<AtendimentoComCliente>>> {
    Ok(Json(state.services.atendimentos.list_with_client_names().await?))
}

/// Get an appointment by ID
#[utoipa::path(
    get,
    path = "/atendimentos/{id}",
    tag = "atendimentos",
    security(("session_cookie" = [])),
    params(
        ("id" = Uuid, Path, description = "Appointment ID")
    ),
    responses(
        (status = 200, description = "Appointment details", body = AtendimentoComCliente),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn get_atendimento(
    State(state): State<AppState>,
    _admin: AuthenticatedAdmin,
    WithRejection(Path(id), _): IdPath,
) -> AppResult<Json<AtendimentoComCliente>> {
    Ok(Json(state.services.atendimentos.get(id).await?))
}

/// Create an appointment
#[utoipa::path(
    post,
    path = "/atendimentos",
    tag = "atendimentos",
    security(("session_cookie" = [])),
    request_body = AtendimentoInput,
    responses(
        (status = 200, description = "Appointment created", body = Atendimento),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Referenced client does not exist")
    )
)]
pub async fn create_atendimento(
    State(state): State<AppState>,
    _admin: AuthenticatedAdmin,
    WithRejection(Json(input), _): JsonBody<AtendimentoInput>,
) -> AppResult<Json<Atendimento>> {
    Ok(Json(state.services.atendimentos.create(input).await?))
}

/// Replace the editable fields of an appointment
#[utoipa::path(
    put,
    path = "/atendimentos/{id}",
    tag = "atendimentos",
    security(("session_cookie" = [])),
    params(
        ("id" = Uuid, Path, description = "Appointment ID")
    ),
    request_body = AtendimentoInput,
    responses(
        (status = 200, description = "Appointment updated", body = Atendimento),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Referenced client does not exist")
    )
)]
pub async fn update_atendimento(
    State(state): State<AppState>,
    _admin: AuthenticatedAdmin,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Json(input), _): JsonBody<AtendimentoInput>,
) -> AppResult<Json<Atendimento>> {
    Ok(Json(state.services.atendimentos.update(id, input).await?))
}

/// Delete an appointment
#[utoipa::path(
    delete,
    path = "/atendimentos/{id}",
    tag = "atendimentos",
    security(("session_cookie" = [])),
    params(
        ("id" = Uuid, Path, description = "Appointment ID")
    ),
    responses(
        (status = 200, description = "Appointment deleted (or already absent)", body = SuccessResponse)
    )
)]
pub async fn delete_atendimento(
    State(state): State<AppState>,
    _admin: AuthenticatedAdmin,
    WithRejection(Path(id), _): IdPath,
) -> AppResult<Json<SuccessResponse>> {
    state.services.atendimentos.delete(id).await?;
    Ok(Json(SuccessResponse::ok()))
}
