//! Inbound webhook ingestion.
//!
//! Deliveries are authenticated by a shared per-source secret, persisted
//! before any parsing of their business content, then processed off the
//! request path.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use serde_json::{Value as JsonValue, json};
use subtle::ConstantTimeEq;

use crate::error::{ApiError, configuration_error, unauthorized, validation_error};
use crate::repositories::{TenantRepository, WebhookEventRepository};
use crate::secrets::webhook_secret_name;
use crate::server::AppState;
use crate::webhooks::{self, DEFAULT_SOURCE, EventKind};

/// Receive a OneCode webhook delivery.
///
/// The raw payload is persisted first; malformed JSON is stored with an
/// error note and still acknowledged so the provider does not retry
/// forever. Message-create events are processed on a detached task.
#[utoipa::path(
    post,
    path = "/webhooks/onecode",
    responses(
        (status = 200, description = "Delivery persisted"),
        (status = 400, description = "Unknown webhook source"),
        (status = 401, description = "Invalid webhook secret"),
        (status = 500, description = "Webhook secret not configured")
    ),
    tag = "webhooks"
)]
pub async fn receive_onecode_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<JsonValue>, ApiError> {
    let source = headers
        .get("x-onecode-source")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SOURCE)
        .to_string();

    let secret_name = webhook_secret_name(&source).ok_or_else(|| {
        validation_error(
            &format!("Unknown webhook source '{}'", source),
            json!({ "x-onecode-source": "unknown" }),
        )
    })?;
    let expected = state.secrets.get(secret_name).ok_or_else(|| {
        configuration_error(&format!("Webhook secret {} is not configured", secret_name))
    })?;

    // Authentication happens before anything touches the database.
    let provided = headers
        .get("x-onecode-hook-secret")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    if provided.as_bytes().ct_eq(expected.as_bytes()).unwrap_u8() != 1 {
        return Err(unauthorized(Some("Invalid webhook secret")));
    }

    metrics::counter!("webhook_deliveries_received_total").increment(1);
    let events = WebhookEventRepository::new(state.db.clone());

    let payload: JsonValue = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            let raw = String::from_utf8_lossy(&body).to_string();
            let inserted = events
                .insert(
                    &source,
                    json!({ "raw": raw }),
                    None,
                    None,
                    None,
                    None,
                    Some(format!("Invalid JSON payload: {}", err)),
                )
                .await;
            return Ok(Json(match inserted {
                Ok(event) => {
                    tracing::warn!(event_id = %event.id, source = %source, "Webhook payload was not valid JSON");
                    json!({
                        "received": true,
                        "event_id": event.id,
                        "warning": "Invalid JSON payload",
                    })
                }
                Err(err) => {
                    tracing::error!(source = %source, "Failed to persist webhook event: {}", err.message);
                    json!({ "received": true, "warning": "Event persistence failed" })
                }
            }));
        }
    };

    let parsed = webhooks::parse_event(&payload);
    let kind = parsed
        .as_ref()
        .map(|(object, action)| webhooks::event_kind(object, action));
    let (object, action) = match &parsed {
        Some((object, action)) => (Some(object.clone()), Some(action.clone())),
        None => (None, None),
    };

    let (message_id, ticket_id) = match kind {
        Some(EventKind::MessageCreate) => match webhooks::extract_message(&payload) {
            Ok(extracted) => (
                Some(extracted.provider_message_id.clone()),
                webhooks::numeric_ticket_id(&extracted.ticket_id),
            ),
            Err(_) => (None, None),
        },
        _ => (None, None),
    };

    // Audit persistence is best-effort toward the provider: a failed
    // insert is still acknowledged so deliveries are not retry-stormed.
    let event = match events
        .insert(&source, payload, object, action, message_id, ticket_id, None)
        .await
    {
        Ok(event) => event,
        Err(err) => {
            tracing::error!(source = %source, "Failed to persist webhook event: {}", err.message);
            return Ok(Json(
                json!({ "received": true, "warning": "Event persistence failed" }),
            ));
        }
    };

    if matches!(kind, Some(EventKind::MessageCreate)) {
        let db = state.db.clone();
        let event_row = event.clone();
        let event_source = source.clone();
        tokio::spawn(async move {
            let tenants = TenantRepository::new(db.clone());
            match tenants.find_by_slug(&event_source).await {
                Ok(Some(tenant)) => {
                    webhooks::process_message_event(&db, tenant.id, &event_row).await;
                }
                Ok(None) => {
                    let message = format!("No tenant matches webhook source '{}'", event_source);
                    tracing::warn!(event_id = %event_row.id, "{}", message);
                    let events = WebhookEventRepository::new(db);
                    if let Err(e) = events.mark_failed(event_row.id, &message).await {
                        tracing::error!(event_id = %event_row.id, "Failed to record webhook outcome: {}", e.message);
                    }
                }
                Err(err) => {
                    tracing::error!(event_id = %event_row.id, "Tenant lookup for webhook failed: {}", err.message);
                    let events = WebhookEventRepository::new(db);
                    if let Err(e) = events.mark_failed(event_row.id, &err.message).await {
                        tracing::error!(event_id = %event_row.id, "Failed to record webhook outcome: {}", e.message);
                    }
                }
            }
        });
    } else {
        // Events we do not act on are acknowledged as processed.
        if let Err(err) = events.mark_processed(event.id).await {
            tracing::error!(event_id = %event.id, "Failed to record webhook outcome: {}", err.message);
        }
    }

    Ok(Json(json!({ "received": true, "event_id": event.id })))
}
