//! Webhook event classification and message extraction.
//!
//! Inbound deliveries carry a dotted event string (`messages.create`)
//! and a loosely shaped payload. Classification splits the event into
//! object/action; extraction tries each known field spelling in
//! priority order, the same way the sync pipeline reads provider pages.

use sea_orm::DatabaseConnection;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::models::webhook_event;
use crate::repositories::{MessageRepository, NewMessage, WebhookEventRepository};

/// Default source attributed to deliveries without an explicit header.
pub const DEFAULT_SOURCE: &str = "contmax";

/// Classified webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A new provider message was created
    MessageCreate,
    /// Any other object/action pair; persisted but not processed
    Other { object: String, action: String },
}

/// Splits the dotted event string of a payload into object and action.
///
/// Reads `event` first, then `type`. Returns `None` when neither field
/// holds a dotted string.
pub fn parse_event(payload: &JsonValue) -> Option<(String, String)> {
    let event = payload
        .get("event")
        .or_else(|| payload.get("type"))
        .and_then(JsonValue::as_str)?;
    let (object, action) = event.split_once('.')?;
    if object.is_empty() || action.is_empty() {
        return None;
    }
    Some((object.to_string(), action.to_string()))
}

/// Classifies an object/action pair.
pub fn event_kind(object: &str, action: &str) -> EventKind {
    if matches!(object, "message" | "messages") && action == "create" {
        EventKind::MessageCreate
    } else {
        EventKind::Other {
            object: object.to_string(),
            action: action.to_string(),
        }
    }
}

/// Message fields extracted from a delivery payload.
#[derive(Debug, Clone)]
pub struct ExtractedMessage {
    pub provider_message_id: String,
    pub ticket_id: String,
    pub contact_id: Option<String>,
    pub from_me: bool,
    pub body: Option<String>,
    pub provider_created_at: Option<String>,
    pub whatsapp_id: Option<String>,
    pub agent_id: Option<String>,
    pub agent_name: Option<String>,
    pub node: JsonValue,
}

/// Extracts the message fields of a `messages.create` delivery.
///
/// The message node is `data`, `message` or the payload root; the
/// message and ticket identifiers each have several known spellings.
pub fn extract_message(payload: &JsonValue) -> Result<ExtractedMessage, String> {
    let node = payload
        .get("data")
        .or_else(|| payload.get("message"))
        .unwrap_or(payload);

    let provider_message_id = ["id", "messageId", "_id"]
        .iter()
        .find_map(|key| scalar_string(node.get(*key)))
        .ok_or_else(|| "Delivery carries no message identifier".to_string())?;

    let ticket_id = scalar_string(node.get("ticketId"))
        .or_else(|| scalar_string(node.get("ticket").and_then(|t| t.get("id"))))
        .or_else(|| scalar_string(payload.get("ticketId")))
        .ok_or_else(|| "Delivery carries no ticket identifier".to_string())?;

    let from_me = node
        .get("fromMe")
        .or_else(|| node.get("from_me"))
        .and_then(JsonValue::as_bool)
        .unwrap_or(false);

    let body = node
        .get("body")
        .or_else(|| node.get("text"))
        .and_then(JsonValue::as_str)
        .map(str::to_string);

    let provider_created_at = node
        .get("createdAt")
        .or_else(|| node.get("created_at"))
        .and_then(JsonValue::as_str)
        .map(str::to_string);

    let whatsapp_id = node
        .get("whatsappId")
        .or_else(|| node.get("wid"))
        .and_then(JsonValue::as_str)
        .map(str::to_string);

    let contact_id = scalar_string(node.get("contactId"))
        .or_else(|| scalar_string(node.get("contact").and_then(|c| c.get("id"))));

    let ticket = node.get("ticket");
    let agent_id = ticket.and_then(|t| scalar_string(t.get("userId")));
    let agent_name = ticket
        .and_then(|t| t.get("user").and_then(|u| u.get("name")).and_then(JsonValue::as_str))
        .or_else(|| {
            ticket
                .and_then(|t| t.get("userName"))
                .and_then(JsonValue::as_str)
        })
        .map(str::to_string);

    Ok(ExtractedMessage {
        provider_message_id,
        ticket_id,
        contact_id,
        from_me,
        body,
        provider_created_at,
        whatsapp_id,
        agent_id,
        agent_name,
        node: node.clone(),
    })
}

/// Numeric ticket identifier for the event audit row, when it parses.
pub fn numeric_ticket_id(ticket_id: &str) -> Option<i64> {
    ticket_id.parse().ok()
}

fn scalar_string(value: Option<&JsonValue>) -> Option<String> {
    match value? {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Processes a persisted `messages.create` event, flipping its processed
/// flag on success and recording the failure reason otherwise.
pub async fn process_message_event(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    event: &webhook_event::Model,
) {
    let events = WebhookEventRepository::new(db.clone());
    let messages = MessageRepository::new(db.clone());

    let extracted = match extract_message(&event.payload) {
        Ok(extracted) => extracted,
        Err(message) => {
            tracing::warn!(event_id = %event.id, "Webhook processing failed: {}", message);
            if let Err(e) = events.mark_failed(event.id, &message).await {
                tracing::error!(event_id = %event.id, "Failed to record webhook outcome: {}", e.message);
            }
            return;
        }
    };

    let result = messages
        .upsert(NewMessage {
            tenant_id,
            provider_message_id: extracted.provider_message_id,
            ticket_id: extracted.ticket_id,
            contact_id: extracted.contact_id,
            from_me: extracted.from_me,
            body: extracted.body,
            provider_created_at: extracted.provider_created_at,
            whatsapp_id: extracted.whatsapp_id,
            agent_id: extracted.agent_id,
            agent_name: extracted.agent_name,
            payload: extracted.node,
        })
        .await;

    match result {
        Ok(inserted) => {
            if inserted {
                metrics::counter!("webhook_messages_ingested_total").increment(1);
            } else {
                tracing::debug!(event_id = %event.id, "Duplicate message delivery ignored");
            }
            if let Err(e) = events.mark_processed(event.id).await {
                tracing::error!(event_id = %event.id, "Failed to record webhook outcome: {}", e.message);
            }
        }
        Err(err) => {
            tracing::error!(event_id = %event.id, "Webhook processing failed: {}", err.message);
            if let Err(e) = events.mark_failed(event.id, &err.message).await {
                tracing::error!(event_id = %event.id, "Failed to record webhook outcome: {}", e.message);
            }
        }
    }
}
