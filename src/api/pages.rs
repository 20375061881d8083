//! Dashboard page endpoints
//!
//! Page routes share the session guard with the API but redirect to the
//! login form instead of answering 401. Their payloads are the data each
//! dashboard screen renders.

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::SignedCookieJar;
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::{AtendimentoComCliente, Cliente, ClienteOption},
    services::report,
    AppState,
};

use super::{dashboard::DashboardResponse, resolve_admin, AuthenticatedAdmin};

const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="utf-8">
  <title>KALM - Login</title>
</head>
<body>
  <form id="login">
    <h1>KALM</h1>
    <label>Matrícula <input name="matricula" required autocomplete="username"></label>
    <label>Senha <input name="senha" type="password" required autocomplete="current-password"></label>
    <button type="submit">Entrar</button>
    <p id="error" role="alert"></p>
  </form>
  <script>
    document.getElementById("login").addEventListener("submit", async (event) => {
      event.preventDefault();
      const form = new FormData(event.target);
      const response = await fetch("/api/auth/login", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({ matricula: form.get("matricula"), senha: form.get("senha") }),
      });
      if (response.ok) {
        window.location.href = "/dashboard";
      } else {
        const body = await response.json().catch(() => ({}));
        document.getElementById("error").textContent = body.message || "Erro ao fazer login";
      }
    });
  </script>
</body>
</html>
"#;

pub async fn root() -> Redirect {
    Redirect::to("/dashboard")
}

/// Login form, or straight to the dashboard for a live session
pub async fn login_page(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    match resolve_admin(&state, &jar).await {
        Ok(Some(_)) => Redirect::to("/dashboard").into_response(),
        Ok(None) => Html(LOGIN_PAGE).into_response(),
        Err(e) => {
            tracing::warn!("Session lookup failed on login page: {}", e);
            Html(LOGIN_PAGE).into_response()
        }
    }
}

pub async fn dashboard_page(
    State(state): State<AppState>,
    AuthenticatedAdmin(admin): AuthenticatedAdmin,
) -> AppResult<Json<DashboardResponse>> {
    let summary = state.services.dashboard.summary().await?;
    Ok(Json(DashboardResponse { admin, summary }))
}

pub async fn clientes_page(
    State(state): State<AppState>,
    _admin: AuthenticatedAdmin,
) -> AppResult<Json<Vec<Cliente>>> {
    Ok(Json(state.services.clientes.list().await?))
}

/// Appointment screen data: the listing plus the client picker
#[derive(Serialize)]
pub struct AtendimentosPage {
    pub atendimentos: Vec<AtendimentoComCliente>,
    pub clientes: Vec<ClienteOption>,
}

pub async fn atendimentos_page(
    State(state): State<AppState>,
    _admin: AuthenticatedAdmin,
) -> AppResult<Json<AtendimentosPage>> {
    let (atendimentos, clientes) = tokio::try_join!(
        state.services.atendimentos.list_with_client_names(),
        state.services.clientes.options(),
    )?;
    Ok(Json(AtendimentosPage { atendimentos, clientes }))
}

/// Download the appointment report as PDF
pub async fn relatorio_pdf(
    State(state): State<AppState>,
    AuthenticatedAdmin(admin): AuthenticatedAdmin,
) -> AppResult<Response> {
    let atendimentos = state.services.atendimentos.list_with_client_names().await?;
    let now = chrono::Local::now();
    let content = report::build_report(&atendimentos, now.naive_local());

    let bytes = tokio::task::spawn_blocking(move || report::render_pdf(&content))
        .await
        .map_err(|e| AppError::Internal(format!("Report task failed: {}", e)))??;

    tracing::info!(matricula = %admin.matricula, rows = atendimentos.len(), "Report generated");

    let disposition = format!("attachment; filename=\"{}\"", report::file_name(now.date_naive()));
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
