//! Integration tests for the synchronous integration runner.

use anyhow::Result;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use fiscal_sync::models::{integration_log, tenant_integration};
use fiscal_sync::secrets::StaticSecretStore;
use fiscal_sync::server::create_app;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[path = "test_utils/mod.rs"]
mod test_utils;

async fn run(
    app: &Router,
    tenant_id: Uuid,
    provider_slug: &str,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/integrations/run")
        .header("Authorization", format!("Bearer {}", test_utils::TEST_TOKEN))
        .header("Content-Type", "application/json")
        .body(Body::from(
            json!({ "tenant_id": tenant_id, "provider_slug": provider_slug }).to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

fn runner_app(db: DatabaseConnection, base_url: &str, secrets: StaticSecretStore) -> Router {
    let config = test_utils::test_config(Uuid::new_v4(), base_url);
    create_app(test_utils::build_state(db, config, secrets))
}

#[tokio::test]
async fn unconfigured_integration_returns_404() -> Result<()> {
    let db = test_utils::setup_test_db().await?;
    let tenant_id = test_utils::insert_tenant(&db, "acme").await?;
    let app = runner_app(db.clone(), "http://localhost", StaticSecretStore::new());

    let (status, body) = run(&app, tenant_id, "acessorias").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(integration_log::Entity::find().count(&db).await?, 0);

    Ok(())
}

#[tokio::test]
async fn disabled_integration_returns_400() -> Result<()> {
    let db = test_utils::setup_test_db().await?;
    let tenant_id = test_utils::insert_tenant(&db, "acme").await?;
    test_utils::insert_integration(&db, tenant_id, "acessorias", None, false).await?;
    let app = runner_app(db.clone(), "http://localhost", StaticSecretStore::new());

    let (status, body) = run(&app, tenant_id, "acessorias").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INTEGRATION_DISABLED");

    Ok(())
}

#[tokio::test]
async fn unmapped_slug_is_a_configuration_error_with_audit_row() -> Result<()> {
    let db = test_utils::setup_test_db().await?;
    let tenant_id = test_utils::insert_tenant(&db, "acme").await?;
    test_utils::insert_integration(&db, tenant_id, "unmapped", None, true).await?;
    let app = runner_app(db.clone(), "http://localhost", StaticSecretStore::new());

    let (status, body) = run(&app, tenant_id, "unmapped").await;

    // A slug with no registered implementation is a deployment problem,
    // not a caller mistake.
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "CONFIGURATION_ERROR");

    let logs = integration_log::Entity::find().all(&db).await?;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, "error");
    assert_eq!(logs[0].provider_slug, "unmapped");
    assert!(
        logs[0]
            .error_message
            .as_deref()
            .unwrap_or("")
            .contains("unmapped")
    );

    let integration = tenant_integration::Entity::find()
        .one(&db)
        .await?
        .expect("integration row present");
    assert_eq!(integration.last_status.as_deref(), Some("error"));
    assert!(integration.last_run.is_some());

    Ok(())
}

#[tokio::test]
async fn missing_provider_token_fails_and_is_audited() -> Result<()> {
    let db = test_utils::setup_test_db().await?;
    let tenant_id = test_utils::insert_tenant(&db, "acme").await?;
    test_utils::insert_integration(&db, tenant_id, "acessorias", None, true).await?;
    let app = runner_app(db.clone(), "http://localhost", StaticSecretStore::new());

    let (status, body) = run(&app, tenant_id, "acessorias").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "CONFIGURATION_ERROR");

    let logs = integration_log::Entity::find().all(&db).await?;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, "failed");

    Ok(())
}

#[tokio::test]
async fn successful_dispatch_maps_counters_into_audit_row() -> Result<()> {
    let db = test_utils::setup_test_db().await?;
    let tenant_id = test_utils::insert_tenant(&db, "acme").await?;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/companies/ListAll"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "cnpj": "12345678000195", "razaoSocial": "Empresa Um" },
                { "razaoSocial": "Sem Documento" },
            ],
            "totalPages": 1,
        })))
        .mount(&server)
        .await;

    // The integration row's base URL overrides the configured default.
    test_utils::insert_integration(&db, tenant_id, "acessorias", Some(&server.uri()), true)
        .await?;
    let secrets = StaticSecretStore::new().with("ACESSORIAS_TOKEN_ACME", "provider-token");
    let app = runner_app(db.clone(), "http://unused.invalid", secrets);

    let (status, body) = run(&app, tenant_id, "acessorias").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert!(body["execution_id"].is_string());
    assert!(body["execution_time_ms"].is_number());

    let logs = integration_log::Entity::find().all(&db).await?;
    assert_eq!(logs.len(), 1);
    let log = &logs[0];
    assert_eq!(log.status, "success");
    assert_eq!(log.tenant_id, tenant_id);
    assert_eq!(log.total_processed, 2);
    assert_eq!(log.total_matched, 0);
    // The record without a tax identifier is ignored, not failed.
    assert_eq!(log.total_ignored, 1);
    assert_eq!(log.total_review, 0);
    let response = log.response.as_ref().expect("response payload recorded");
    assert_eq!(response["total_created"], 1);

    let integration = tenant_integration::Entity::find()
        .one(&db)
        .await?
        .expect("integration row present");
    assert_eq!(integration.last_status.as_deref(), Some("success"));
    assert!(integration.last_run.is_some());
    assert!(integration.last_error.is_none());

    Ok(())
}

#[tokio::test]
async fn repeated_dispatch_records_one_audit_row_each() -> Result<()> {
    let db = test_utils::setup_test_db().await?;
    let tenant_id = test_utils::insert_tenant(&db, "acme").await?;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/companies/ListAll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "cnpj": "12345678000195", "razaoSocial": "Empresa Um" }],
            "totalPages": 1,
        })))
        .mount(&server)
        .await;

    test_utils::insert_integration(&db, tenant_id, "acessorias", Some(&server.uri()), true)
        .await?;
    let secrets = StaticSecretStore::new().with("ACESSORIAS_TOKEN_ACME", "provider-token");
    let app = runner_app(db.clone(), "http://unused.invalid", secrets);

    let (status, first) = run(&app, tenant_id, "acessorias").await;
    assert_eq!(status, StatusCode::OK);
    let (status, second) = run(&app, tenant_id, "acessorias").await;
    assert_eq!(status, StatusCode::OK);

    assert_ne!(first["execution_id"], second["execution_id"]);
    assert_eq!(integration_log::Entity::find().count(&db).await?, 2);

    Ok(())
}
