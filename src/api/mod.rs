//! HTTP handlers for the KALM API and dashboard pages

pub mod atendimentos;
pub mod auth;
pub mod clientes;
pub mod dashboard;
pub mod health;
pub mod openapi;
pub mod pages;

use axum::{
    async_trait,
    extract::{FromRequestParts, OriginalUri, Path},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use axum_extra::extract::{
    cookie::{Cookie, Key, SameSite},
    SignedCookieJar, WithRejection,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Admin,
    AppState,
};

/// Generic acknowledgement body
#[derive(Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// JSON request body; malformed bodies are reported as an [`AppError`]
pub type JsonBody<T> = WithRejection<Json<T>, AppError>;

/// `:id` path segment; a non-UUID id is reported as an [`AppError`]
pub type IdPath = WithRejection<Path<Uuid>, AppError>;

/// Extractor for the administrator behind the session cookie
pub struct AuthenticatedAdmin(pub Admin);

/// Rejection when no live session is attached to the request
pub enum AuthRejection {
    /// Page requests go back to the login form
    RedirectToLogin,
    /// API requests get a 401 body
    Unauthorized,
    /// The session store could not be consulted
    Error(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => AppError::Authentication("Not authenticated".to_string()).into_response(),
            Self::Error(e) => e.into_response(),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Nested routers see a stripped path, the original one tells pages from API calls
        let is_api = parts
            .extensions
            .get::<OriginalUri>()
            .map(|uri| uri.0.path().starts_with("/api/"))
            .unwrap_or_else(|| parts.uri.path().starts_with("/api/"));

        let jar = SignedCookieJar::<Key>::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});

        match resolve_admin(state, &jar).await {
            Ok(Some(admin)) => Ok(Self(admin)),
            Ok(None) if is_api => Err(AuthRejection::Unauthorized),
            Ok(None) => Err(AuthRejection::RedirectToLogin),
            Err(e) => Err(AuthRejection::Error(e)),
        }
    }
}

/// Session id carried by the signed cookie, if present and well-formed
pub(crate) fn session_id(state: &AppState, jar: &SignedCookieJar) -> Option<Uuid> {
    let cookie = jar.get(&state.config.session.cookie_name)?;
    Uuid::parse_str(cookie.value()).ok()
}

/// Load the administrator of a live session
pub(crate) async fn resolve_admin(state: &AppState, jar: &SignedCookieJar) -> AppResult<Option<Admin>> {
    let Some(id) = session_id(state, jar) else {
        return Ok(None);
    };
    let Some(session) = state.services.sessions.resolve(id).await? else {
        return Ok(None);
    };
    Ok(state.services.auth.get_logged_admin(&session.matricula).await)
}

/// Session cookie holding `session_id`
pub(crate) fn session_cookie(state: &AppState, session_id: Uuid) -> Cookie<'static> {
    let config = &state.config.session;
    Cookie::build((config.cookie_name.clone(), session_id.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(config.secure_cookie)
        .max_age(time::Duration::days(config.max_age_days))
        .build()
}

/// Cookie matching the session cookie's name and path, for removal
pub(crate) fn expired_session_cookie(state: &AppState) -> Cookie<'static> {
    Cookie::build(state.config.session.cookie_name.clone())
        .path("/")
        .build()
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Clients
        .route("/clientes", get(clientes::list_clientes))
        .route("/clientes", post(clientes::create_cliente))
        .route("/clientes/options", get(clientes::list_cliente_options))
        .route("/clientes/:id", get(clientes::get_cliente))
        .route("/clientes/:id", put(clientes::update_cliente))
        .route("/clientes/:id", delete(clientes::delete_cliente))
        // Appointments
        .route("/atendimentos", get(atendimentos::list_atendimentos))
        .route("/atendimentos", post(atendimentos::create_atendimento))
        .route("/atendimentos/:id", get(atendimentos::get_atendimento))
        .route("/atendimentos/:id", put(atendimentos::update_atendimento))
        .route("/atendimentos/:id", delete(atendimentos::delete_atendimento))
        // Dashboard
        .route("/dashboard", get(dashboard::get_dashboard));

    let pages = Router::new()
        .route("/", get(pages::root))
        .route("/login", get(pages::login_page))
        .route("/dashboard", get(pages::dashboard_page))
        .route("/dashboard/clientes", get(pages::clientes_page))
        .route("/dashboard/atendimentos", get(pages::atendimentos_page))
        .route("/dashboard/atendimentos/relatorio.pdf", get(pages::relatorio_pdf));

    Router::new()
        .nest("/api", api)
        .merge(pages)
        .with_state(state)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
