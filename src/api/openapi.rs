//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{atendimentos, auth, clientes, dashboard, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "KALM API",
        version = "1.0.0",
        description = "Client and appointment administration REST API"
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::logout,
        auth::me,
        // Clients
        clientes::list_clientes,
        clientes::list_cliente_options,
        clientes::get_cliente,
        clientes::create_cliente,
        clientes::update_cliente,
        clientes::delete_cliente,
        // Appointments
        atendimentos::list_atendimentos,
        atendimentos::get_atendimento,
        atendimentos::create_atendimento,
        atendimentos::update_atendimento,
        atendimentos::delete_atendimento,
        // Dashboard
        dashboard::get_dashboard,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            crate::models::Admin,
            // Clients
            crate::models::Cliente,
            crate::models::ClienteOption,
            crate::models::ClienteInput,
            // Appointments
            crate::models::Atendimento,
            crate::models::AtendimentoComCliente,
            crate::models::AtendimentoInput,
            crate::models::AtendimentoStatus,
            // Dashboard
            dashboard::DashboardResponse,
            crate::services::dashboard::DashboardSummary,
            // Health
            health::HealthResponse,
            // Common
            crate::api::SuccessResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SessionCookieAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Session login and logout"),
        (name = "clientes", description = "Client records"),
        (name = "atendimentos", description = "Appointment records"),
        (name = "dashboard", description = "Dashboard summary")
    )
)]
pub struct ApiDoc;

/// Declares the signed session cookie as the security scheme
struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("kalm_session"))),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
