//! Client endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Cliente, ClienteInput, ClienteOption},
    AppState,
};

use super::{AuthenticatedAdmin, IdPath, JsonBody, SuccessResponse};

/// List all clients, newest first
#[utoipa::path(
    get,
    path = "/clientes",
    tag = "clientes",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "List of clients", body = Vec<Cliente>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_clientes(
    State(state): State<AppState>,
    _admin: AuthenticatedAdmin,
) -> AppResult<Json<Vec<Cliente>>> {
    Ok(Json(state.services.clientes.list().await?))
}

/// Client id/name pairs for selection lists, ordered by name
#[utoipa::path(
    get,
    path = "/clientes/options",
    tag = "clientes",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Client options", body = Vec<ClienteOption>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_cliente_options(
    State(state): State<AppState>,
    _admin: AuthenticatedAdmin,
) -> AppResult<Json<Vec<ClienteOption>>> {
    Ok(Json(state.services.clientes.options().await?))
}

/// Get a client by ID
#[utoipa::path(
    get,
    path = "/clientes/{id}",
    tag = "clientes",
    security(("session_cookie" = [])),
    params(
        ("id" = Uuid, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Client details", body = Cliente),
        (status = 404, description = "Client not found")
    )
)]
pub async fn get_cliente(
    State(state): State<AppState>,
    _admin: AuthenticatedAdmin,
    WithRejection(Path(id), _): IdPath,
) -> AppResult<Json<Cliente>> {
    Ok(Json(state.services.clientes.get(id).await?))
}

/// Create a client
#[utoipa::path(
    post,
    path = "/clientes",
    tag = "clientes",
    security(("session_cookie" = [])),
    request_body = ClienteInput,
    responses(
        (status = 200, description = "Client created", body = Cliente),
        (status = 400, description = "Missing or invalid fields")
    )
)]
pub async fn create_cliente(
    State(state): State<AppState>,
    _admin: AuthenticatedAdmin,
    WithRejection(Json(input), _): JsonBody<ClienteInput>,
) -> AppResult<Json<Cliente>> {
    Ok(Json(state.services.clientes.create(input).await?))
}

/// Replace the editable fields of a client
#[utoipa::path(
    put,
    path = "/clientes/{id}",
    tag = "clientes",
    security(("session_cookie" = [])),
    params(
        ("id" = Uuid, Path, description = "Client ID")
    ),
    request_body = ClienteInput,
    responses(
        (status = 200, description = "Client updated", body = Cliente),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn update_cliente(
    State(state): State<AppState>,
    _admin: AuthenticatedAdmin,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Json(input), _): JsonBody<ClienteInput>,
) -> AppResult<Json<Cliente>> {
    Ok(Json(state.services.clientes.update(id, input).await?))
}

/// Delete a client, applying the configured policy to its appointments
#[utoipa::path(
    delete,
    path = "/clientes/{id}",
    tag = "clientes",
    security(("session_cookie" = [])),
    params(
        ("id" = Uuid, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Client deleted (or already absent)", body = SuccessResponse),
        (status = 409, description = "Client still has appointments")
    )
)]
pub async fn delete_cliente(
    State(state): State<AppState>,
    _admin: AuthenticatedAdmin,
    WithRejection(Path(id), _): IdPath,
) -> AppResult<Json<SuccessResponse>> {
    state.services.clientes.delete(id).await?;
    Ok(Json(SuccessResponse::ok()))
}
