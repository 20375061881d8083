//! Router tests over an in-memory store
//!
//! Run with: cargo test --test router_tests

mod common;

use axum::http::{header, Method, StatusCode};
use serde_json::{json, Value};

use std::sync::Arc;

use common::{spawn_app, spawn_app_with_sessions, StuckSessionStore, TestApp, MATRICULA};
use kalm_server::models::DeletePolicy;

async fn create_cliente(app: &TestApp, cookie: &str, nome: &str) -> String {
    let response = app.post("/api/clientes", cookie, json!({ "nome": nome })).await;
    assert_eq!(response.status, StatusCode::OK);
    response.json()["id"].as_str().unwrap().to_string()
}

async fn create_atendimento(app: &TestApp, cookie: &str, cliente_id: &str, when: &str, status: &str) -> Value {
    let response = app
        .post(
            "/api/atendimentos",
            cookie,
            json!({
                "cliente_id": cliente_id,
                "data_atendimento": when,
                "tipo": "Consulta",
                "status": status,
                "valor": null
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", String::from_utf8_lossy(&response.body));
    response.json()
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let app = spawn_app(DeletePolicy::Detach).await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "matricula": "0001", "senha": "segredo" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let set_cookie = response.headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.starts_with("kalm_session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=604800"));

    let body = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["admin"]["matricula"], "0001");
    assert!(body["admin"].get("senha_hash").is_none());

    let cookie = response.session_cookie().unwrap();
    let page = app.get("/dashboard", &cookie).await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.json()["admin"]["nome"], "Administrador");
}

#[tokio::test]
async fn test_wrong_password_is_rejected_without_cookie() {
    let app = spawn_app(DeletePolicy::Detach).await;

    for body in [
        json!({ "matricula": "0001", "senha": "SEGREDO" }),
        json!({ "matricula": "9999", "senha": "segredo" }),
    ] {
        let response = app.request(Method::POST, "/api/auth/login", None, Some(body)).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert!(response.headers.get(header::SET_COOKIE).is_none());
        assert_eq!(response.json()["message"], "Invalid badge number or password");
    }

    let response = app
        .request(Method::POST, "/api/auth/login", None, Some(json!({ "matricula": "0001" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["message"], "Missing required fields: senha");
    assert!(response.headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_unauthenticated_requests() {
    let app = spawn_app(DeletePolicy::Detach).await;

    let page = app.request(Method::GET, "/dashboard", None, None).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/login"));

    let api = app.request(Method::GET, "/api/clientes", None, None).await;
    assert_eq!(api.status, StatusCode::UNAUTHORIZED);

    // Tampered cookies do not verify
    let forged = app.get("/api/dashboard", "kalm_session=00000000-0000-0000-0000-000000000000").await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);

    let root = app.request(Method::GET, "/", None, None).await;
    assert_eq!(root.location(), Some("/dashboard"));
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = spawn_app(DeletePolicy::Detach).await;
    let cookie = app.login().await;

    let response = app.request(Method::POST, "/api/auth/logout", Some(cookie.as_str()), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["success"], true);
    assert_cookie_cleared(&response);

    // Even a client that keeps the old cookie is logged out
    let page = app.get("/dashboard/clientes", &cookie).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/login"));
}

fn assert_cookie_cleared(response: &common::TestResponse) {
    let set_cookie = response.set_cookie().unwrap();
    assert!(set_cookie.starts_with("kalm_session=;"), "{}", set_cookie);
    assert!(set_cookie.contains("Max-Age=0"), "{}", set_cookie);
}

#[tokio::test]
async fn test_logout_clears_cookie_when_session_store_fails() {
    let app = spawn_app_with_sessions(DeletePolicy::Detach, Arc::new(StuckSessionStore::default())).await;
    let cookie = app.login().await;

    let response = app.request(Method::POST, "/api/auth/logout", Some(cookie.as_str()), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["success"], true);
    assert_cookie_cleared(&response);
}

#[tokio::test]
async fn test_session_without_admin_is_not_logged_in() {
    let app = spawn_app(DeletePolicy::Detach).await;
    let cookie = app.login().await;
    app.store.remove_admin(MATRICULA);

    let page = app.get("/dashboard", &cookie).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/login"));

    let api = app.get("/api/dashboard", &cookie).await;
    assert_eq!(api.status, StatusCode::UNAUTHORIZED);

    // A stale cookie gets the form, not a redirect loop
    let login = app.get("/login", &cookie).await;
    assert_eq!(login.status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&login.body).contains("/api/auth/login"));
}

#[tokio::test]
async fn test_badge_number_must_match_exactly() {
    let app = spawn_app(DeletePolicy::Detach).await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "matricula": " 0001 ", "senha": "segredo" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.set_cookie().is_none());
}

#[tokio::test]
async fn test_malformed_requests_use_error_body() {
    let app = spawn_app(DeletePolicy::Detach).await;
    let cookie = app.login().await;

    let cases = [
        app.send_raw(Method::POST, "/api/clientes", &cookie, Some("application/json"), "{\"nome\": ").await,
        app.send_raw(Method::POST, "/api/clientes", &cookie, None, "{\"nome\": \"Ana\"}").await,
        app.send_raw(Method::PUT, "/api/atendimentos/not-an-id", &cookie, Some("application/json"), "{}").await,
        app.get("/api/clientes/not-an-id", &cookie).await,
    ];
    for response in cases {
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        let body = response.json();
        assert_eq!(body["code"], 5);
        assert_eq!(body["error"], "BadValue");
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_login_page_redirects_live_session() {
    let app = spawn_app(DeletePolicy::Detach).await;

    let anonymous = app.request(Method::GET, "/login", None, None).await;
    assert_eq!(anonymous.status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&anonymous.body).contains("/api/auth/login"));

    let cookie = app.login().await;
    let logged_in = app.get("/login", &cookie).await;
    assert_eq!(logged_in.status, StatusCode::SEE_OTHER);
    assert_eq!(logged_in.location(), Some("/dashboard"));
}

#[tokio::test]
async fn test_cliente_crud() {
    let app = spawn_app(DeletePolicy::Detach).await;
    let cookie = app.login().await;

    let blank = app.post("/api/clientes", &cookie, json!({ "nome": "   " })).await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
    assert!(blank.json()["message"].as_str().unwrap().contains("nome"));

    let created = app
        .post(
            "/api/clientes",
            &cookie,
            json!({ "nome": "Ana Silva", "telefone": "11 99999-0000", "email": "" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    let created = created.json();
    let id = created["id"].as_str().unwrap();
    assert_eq!(created["email"], Value::Null);

    let other = create_cliente(&app, &cookie, "Bruno").await;
    assert_ne!(other, id);

    let fetched = app.get(&format!("/api/clientes/{}", id), &cookie).await.json();
    assert_eq!(fetched["nome"], "Ana Silva");
    assert_eq!(fetched["telefone"], "11 99999-0000");
    assert_eq!(fetched["endereco"], Value::Null);

    let updated = app
        .put(&format!("/api/clientes/{}", id), &cookie, json!({ "nome": "Ana Souza" }))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.json()["telefone"], Value::Null);

    let options = app.get("/api/clientes/options", &cookie).await.json();
    assert_eq!(options[0]["nome"], "Ana Souza");
    assert_eq!(options[1]["nome"], "Bruno");

    let missing = uuid::Uuid::new_v4();
    let response = app
        .put(&format!("/api/clientes/{}", missing), &cookie, json!({ "nome": "X" }))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let response = app.get(&format!("/api/clientes/{}", missing), &cookie).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    // Deleting twice succeeds both times
    for _ in 0..2 {
        let response = app.delete(&format!("/api/clientes/{}", id), &cookie).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json()["success"], true);
    }
    let list = app.get("/dashboard/clientes", &cookie).await.json();
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_appointment_survives_client_deletion() {
    let app = spawn_app(DeletePolicy::Detach).await;
    let cookie = app.login().await;

    let cliente_id = create_cliente(&app, &cookie, "Ana Silva").await;
    let created = create_atendimento(&app, &cookie, &cliente_id, "2025-01-10T14:00", "pendente").await;
    assert_eq!(created["valor"], Value::Null);
    assert_eq!(created["data_atendimento"], "2025-01-10T14:00:00");

    let listed = app.get("/api/atendimentos", &cookie).await.json();
    assert_eq!(listed[0]["tipo"], "Consulta");
    assert_eq!(listed[0]["status"], "pendente");
    assert_eq!(listed[0]["clientes"]["nome"], "Ana Silva");

    let response = app.delete(&format!("/api/clientes/{}", cliente_id), &cookie).await;
    assert_eq!(response.status, StatusCode::OK);

    let page = app.get("/dashboard/atendimentos", &cookie).await.json();
    let atendimentos = page["atendimentos"].as_array().unwrap();
    assert_eq!(atendimentos.len(), 1);
    assert_eq!(atendimentos[0]["id"], created["id"]);
    assert_eq!(atendimentos[0]["clientes"], Value::Null);
    assert_eq!(atendimentos[0]["cliente_id"], Value::Null);
    assert!(page["clientes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_block_policy_refuses_delete() {
    let app = spawn_app(DeletePolicy::Block).await;
    let cookie = app.login().await;

    let cliente_id = create_cliente(&app, &cookie, "Ana").await;
    create_atendimento(&app, &cookie, &cliente_id, "2025-01-10T14:00", "pendente").await;

    let response = app.delete(&format!("/api/clientes/{}", cliente_id), &cookie).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    let response = app.get(&format!("/api/clientes/{}", cliente_id), &cookie).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_cascade_policy_removes_appointments() {
    let app = spawn_app(DeletePolicy::Cascade).await;
    let cookie = app.login().await;

    let ana = create_cliente(&app, &cookie, "Ana").await;
    let bia = create_cliente(&app, &cookie, "Bia").await;
    create_atendimento(&app, &cookie, &ana, "2025-01-10T14:00", "pendente").await;
    create_atendimento(&app, &cookie, &bia, "2025-01-11T14:00", "pendente").await;

    app.delete(&format!("/api/clientes/{}", ana), &cookie).await;
    assert_eq!(app.store.atendimento_count(), 1);
}

#[tokio::test]
async fn test_atendimento_validation_and_updates() {
    let app = spawn_app(DeletePolicy::Detach).await;
    let cookie = app.login().await;
    let cliente_id = create_cliente(&app, &cookie, "Ana").await;

    let response = app
        .post("/api/atendimentos", &cookie, json!({ "tipo": "Consulta" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let message = response.json()["message"].as_str().unwrap().to_string();
    assert!(message.contains("cliente_id"));
    assert!(message.contains("data_atendimento"));
    assert!(message.contains("status"));

    let bad_status = json!({
        "cliente_id": cliente_id,
        "data_atendimento": "2025-01-10T14:00",
        "tipo": "Consulta",
        "status": "agendado"
    });
    let response = app.post("/api/atendimentos", &cookie, bad_status).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let negative = json!({
        "cliente_id": cliente_id,
        "data_atendimento": "2025-01-10T14:00",
        "tipo": "Consulta",
        "status": "pendente",
        "valor": -5
    });
    let response = app.post("/api/atendimentos", &cookie, negative).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let unknown_client = json!({
        "cliente_id": uuid::Uuid::new_v4(),
        "data_atendimento": "2025-01-10T14:00",
        "tipo": "Consulta",
        "status": "pendente"
    });
    let response = app.post("/api/atendimentos", &cookie, unknown_client).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let created = create_atendimento(&app, &cookie, &cliente_id, "2025-01-10T14:00", "pendente").await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .put(
            &format!("/api/atendimentos/{}", id),
            &cookie,
            json!({
                "cliente_id": cliente_id,
                "data_atendimento": "2025-01-10T15:30",
                "tipo": "Retorno",
                "status": "concluido",
                "valor": "150,5"
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let updated = response.json();
    assert_eq!(updated["status"], "concluido");
    assert_eq!(updated["valor"], 150.5);

    let fetched = app.get(&format!("/api/atendimentos/{}", id), &cookie).await.json();
    assert_eq!(fetched["tipo"], "Retorno");
    assert_eq!(fetched["clientes"]["nome"], "Ana");

    let missing = uuid::Uuid::new_v4();
    let response = app.get(&format!("/api/atendimentos/{}", missing), &cookie).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    for _ in 0..2 {
        let response = app.delete(&format!("/api/atendimentos/{}", id), &cookie).await;
        assert_eq!(response.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_dashboard_counts_and_recent_feed() {
    let app = spawn_app(DeletePolicy::Detach).await;
    let cookie = app.login().await;

    let ana = create_cliente(&app, &cookie, "Ana").await;
    create_cliente(&app, &cookie, "Bia").await;
    create_cliente(&app, &cookie, "Caio").await;

    let schedule = [
        ("2025-01-01T09:00", "pendente"),
        ("2025-01-05T09:00", "concluido"),
        ("2025-01-03T09:00", "pendente"),
        ("2025-01-02T09:00", "cancelado"),
        ("2025-01-04T09:00", "em_andamento"),
    ];
    for (when, status) in schedule {
        create_atendimento(&app, &cookie, &ana, when, status).await;
    }
    create_atendimento(&app, &cookie, &ana, "2024-12-31T09:00", "concluido").await;

    let body = app.get("/api/dashboard", &cookie).await.json();
    assert_eq!(body["totalClientes"], 3);
    assert_eq!(body["totalAtendimentos"], 6);
    assert_eq!(body["atendimentosPendentes"], 2);
    assert_eq!(body["admin"]["matricula"], "0001");

    let recent = body["atendimentosRecentes"].as_array().unwrap();
    assert_eq!(recent.len(), 5);
    let dates: Vec<&str> = recent
        .iter()
        .map(|a| a["data_atendimento"].as_str().unwrap())
        .collect();
    assert_eq!(
        dates,
        vec![
            "2025-01-05T09:00:00",
            "2025-01-04T09:00:00",
            "2025-01-03T09:00:00",
            "2025-01-02T09:00:00",
            "2025-01-01T09:00:00",
        ]
    );

    let page = app.get("/dashboard", &cookie).await.json();
    assert_eq!(page["totalAtendimentos"], 6);
}

#[tokio::test]
async fn test_report_download() {
    let app = spawn_app(DeletePolicy::Detach).await;
    let cookie = app.login().await;

    let ana = create_cliente(&app, &cookie, "Ana Silva").await;
    create_atendimento(&app, &cookie, &ana, "2025-01-10T14:00", "pendente").await;

    let response = app.get("/dashboard/atendimentos/relatorio.pdf", &cookie).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers.get(header::CONTENT_TYPE).unwrap(), "application/pdf");

    let disposition = response
        .headers
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment; filename=\"relatorio-atendimentos-"));
    assert!(disposition.ends_with(".pdf\""));
    assert!(response.body.starts_with(b"%PDF-"));

    let anonymous = app
        .request(Method::GET, "/dashboard/atendimentos/relatorio.pdf", None, None)
        .await;
    assert_eq!(anonymous.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = spawn_app(DeletePolicy::Detach).await;

    let health = app.request(Method::GET, "/api/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.json()["status"], "healthy");

    let ready = app.request(Method::GET, "/api/ready", None, None).await;
    assert_eq!(ready.status, StatusCode::OK);
    assert_eq!(ready.json()["status"], "ready");
}

#[tokio::test]
async fn test_cliente_optional_fields_round_trip() {
    let app = spawn_app(DeletePolicy::Detach).await;
    let cookie = app.login().await;

    let created = app
        .post(
            "/api/clientes",
            &cookie,
            json!({ "nome": "Ana", "email": "ana(at)mail", "observacoes": "ligar depois das 18h" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    let id = created.json()["id"].as_str().unwrap().to_string();

    let fetched = app.get(&format!("/api/clientes/{}", id), &cookie).await.json();
    assert_eq!(fetched["email"], "ana(at)mail");
    assert_eq!(fetched["observacoes"], "ligar depois das 18h");
}

#[tokio::test]
async fn test_oversized_valor_is_a_validation_error() {
    let app = spawn_app(DeletePolicy::Detach).await;
    let cookie = app.login().await;
    let cliente_id = create_cliente(&app, &cookie, "Ana").await;

    let response = app
        .post(
            "/api/atendimentos",
            &cookie,
            json!({
                "cliente_id": cliente_id,
                "data_atendimento": "2025-01-10T14:00",
                "tipo": "Consulta",
                "status": "pendente",
                "valor": 10000000000u64
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["message"].as_str().unwrap().contains("valor (too large)"));
    assert_eq!(app.store.atendimento_count(), 0);
}
