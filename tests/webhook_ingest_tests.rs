//! Integration tests for webhook ingestion and message processing.

use anyhow::Result;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use fiscal_sync::models::{message, webhook_event};
use fiscal_sync::secrets::StaticSecretStore;
use fiscal_sync::server::create_app;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::{Value, json};
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

#[path = "test_utils/mod.rs"]
mod test_utils;

const HOOK_SECRET: &str = "hook-secret-1";

async fn deliver(
    app: &Router,
    source: Option<&str>,
    secret: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhooks/onecode")
        .header("Content-Type", "application/json");
    if let Some(source) = source {
        builder = builder.header("x-onecode-source", source);
    }
    if let Some(secret) = secret {
        builder = builder.header("x-onecode-hook-secret", secret);
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

async fn wait_for_outcome(db: &DatabaseConnection, event_id: Uuid) -> webhook_event::Model {
    for _ in 0..200 {
        let row = webhook_event::Entity::find_by_id(event_id)
            .one(db)
            .await
            .unwrap()
            .expect("event row present");
        if row.processed || row.error_message.is_some() {
            return row;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("webhook event {} was never processed", event_id);
}

fn webhook_app(db: DatabaseConnection) -> Router {
    let config = test_utils::test_config(Uuid::new_v4(), "http://localhost");
    let secrets = StaticSecretStore::new()
        .with("ONECODE_WEBHOOK_SECRET", HOOK_SECRET)
        .with("ONECODE_WEBHOOK_SECRET_PG", "pg-secret");
    create_app(test_utils::build_state(db, config, secrets))
}

fn message_payload(message_id: &str, ticket_id: u64, body: &str) -> Value {
    json!({
        "event": "messages.create",
        "data": {
            "id": message_id,
            "ticketId": ticket_id,
            "fromMe": false,
            "body": body,
            "createdAt": "2026-02-01T10:00:00Z",
            "ticket": { "userId": 7, "user": { "name": "Agente" } }
        }
    })
}

#[tokio::test]
async fn unknown_source_is_rejected_before_persistence() -> Result<()> {
    let db = test_utils::setup_test_db().await?;
    let app = webhook_app(db.clone());

    let (status, body) = deliver(&app, Some("mystery"), Some(HOOK_SECRET), "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(webhook_event::Entity::find().count(&db).await?, 0);

    Ok(())
}

#[tokio::test]
async fn wrong_secret_is_rejected_before_persistence() -> Result<()> {
    let db = test_utils::setup_test_db().await?;
    let app = webhook_app(db.clone());

    let (status, body) = deliver(&app, None, Some("wrong"), "{}").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = deliver(&app, None, None, "{}").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(webhook_event::Entity::find().count(&db).await?, 0);

    Ok(())
}

#[tokio::test]
async fn message_create_event_is_persisted_and_processed() -> Result<()> {
    let db = test_utils::setup_test_db().await?;
    let tenant_id = test_utils::insert_tenant(&db, "contmax").await?;
    let app = webhook_app(db.clone());

    let payload = message_payload("msg-1", 42, "ola");
    let (status, body) = deliver(&app, None, Some(HOOK_SECRET), &payload.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], true);
    let event_id = Uuid::parse_str(body["event_id"].as_str().unwrap())?;

    let event = wait_for_outcome(&db, event_id).await;
    assert!(event.processed);
    assert_eq!(event.source, "contmax");
    assert_eq!(event.event_object.as_deref(), Some("messages"));
    assert_eq!(event.event_action.as_deref(), Some("create"));
    assert_eq!(event.message_id.as_deref(), Some("msg-1"));
    assert_eq!(event.ticket_id, Some(42));

    let stored = message::Entity::find().all(&db).await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].tenant_id, tenant_id);
    assert_eq!(stored[0].provider_message_id, "msg-1");
    assert_eq!(stored[0].ticket_id, "42");
    assert_eq!(stored[0].body.as_deref(), Some("ola"));
    assert_eq!(stored[0].agent_name.as_deref(), Some("Agente"));

    Ok(())
}

#[tokio::test]
async fn duplicate_delivery_stores_a_single_message() -> Result<()> {
    let db = test_utils::setup_test_db().await?;
    test_utils::insert_tenant(&db, "contmax").await?;
    let app = webhook_app(db.clone());

    let payload = message_payload("msg-dup", 9, "primeira").to_string();
    for _ in 0..2 {
        let (status, body) = deliver(&app, None, Some(HOOK_SECRET), &payload).await;
        assert_eq!(status, StatusCode::OK);
        let event_id = Uuid::parse_str(body["event_id"].as_str().unwrap())?;
        let event = wait_for_outcome(&db, event_id).await;
        assert!(event.processed);
    }

    assert_eq!(webhook_event::Entity::find().count(&db).await?, 2);
    assert_eq!(message::Entity::find().count(&db).await?, 1);

    Ok(())
}

#[tokio::test]
async fn non_message_event_is_acknowledged_without_processing() -> Result<()> {
    let db = test_utils::setup_test_db().await?;
    test_utils::insert_tenant(&db, "contmax").await?;
    let app = webhook_app(db.clone());

    let payload = json!({ "event": "ticket.update", "data": { "id": 5 } });
    let (status, body) = deliver(&app, None, Some(HOOK_SECRET), &payload.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let event_id = Uuid::parse_str(body["event_id"].as_str().unwrap())?;
    let event = wait_for_outcome(&db, event_id).await;

    assert!(event.processed);
    assert_eq!(event.event_object.as_deref(), Some("ticket"));
    assert_eq!(message::Entity::find().count(&db).await?, 0);

    Ok(())
}

#[tokio::test]
async fn malformed_body_is_persisted_with_error_note() -> Result<()> {
    let db = test_utils::setup_test_db().await?;
    let app = webhook_app(db.clone());

    let (status, body) = deliver(&app, None, Some(HOOK_SECRET), "not-json{{").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], true);
    assert_eq!(body["warning"], "Invalid JSON payload");

    let event_id = Uuid::parse_str(body["event_id"].as_str().unwrap())?;
    let event = webhook_event::Entity::find_by_id(event_id)
        .one(&db)
        .await?
        .expect("event row present");
    assert!(!event.processed);
    assert!(
        event
            .error_message
            .as_deref()
            .unwrap_or("")
            .contains("Invalid JSON")
    );

    Ok(())
}

#[tokio::test]
async fn pg_source_uses_its_own_secret() -> Result<()> {
    let db = test_utils::setup_test_db().await?;
    let app = webhook_app(db.clone());

    // The contmax secret is not valid for the pg source.
    let (status, _) = deliver(&app, Some("pg"), Some(HOOK_SECRET), "{}").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = deliver(&app, Some("pg"), Some("pg-secret"), "{}").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], true);

    Ok(())
}

#[tokio::test]
async fn credential_fields_are_redacted_in_stored_payload() -> Result<()> {
    let db = test_utils::setup_test_db().await?;
    let app = webhook_app(db.clone());

    let payload = json!({ "event": "ticket.update", "token": "super-secret", "data": { "id": 1 } });
    let (status, body) = deliver(&app, None, Some(HOOK_SECRET), &payload.to_string()).await;
    assert_eq!(status, StatusCode::OK);

    let event_id = Uuid::parse_str(body["event_id"].as_str().unwrap())?;
    let event = wait_for_outcome(&db, event_id).await;
    assert_eq!(event.payload["token"], "[REDACTED]");

    Ok(())
}

#[tokio::test]
async fn message_event_without_matching_tenant_is_marked_failed() -> Result<()> {
    let db = test_utils::setup_test_db().await?;
    let app = webhook_app(db.clone());

    let payload = message_payload("msg-orphan", 1, "oi");
    let (status, body) = deliver(&app, None, Some(HOOK_SECRET), &payload.to_string()).await;
    assert_eq!(status, StatusCode::OK);

    let event_id = Uuid::parse_str(body["event_id"].as_str().unwrap())?;
    let event = wait_for_outcome(&db, event_id).await;

    assert!(!event.processed);
    assert!(
        event
            .error_message
            .as_deref()
            .unwrap_or("")
            .contains("No tenant matches")
    );
    assert_eq!(message::Entity::find().count(&db).await?, 0);

    Ok(())
}
