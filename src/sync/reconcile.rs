//! Fingerprint-based reconciliation of provider records against companies.
//!
//! Matching is by formatted tax identifier within the tenant. Unchanged
//! payloads (same fingerprint) are skipped; changed payloads update only
//! the name and provenance fields, never locally-managed data.

use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::ApiError;
use crate::repositories::{CompanyRepository, NewCompany};
use crate::sync::extract::{record_identifier, record_name, record_tax_regime};
use crate::sync::fingerprint::fingerprint;
use crate::sync::identifier::{external_key, format_tax_id};

/// Outcome of reconciling one provider record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A new company row was created
    Created,
    /// An existing company's name and provenance were refreshed
    Updated,
    /// The record fingerprint matched the stored one
    Skipped,
    /// The record carried no usable tax identifier
    MissingIdentifier,
}

/// Reconciles one provider record into the tenant's companies.
///
/// Database failures (including uniqueness conflicts from concurrent
/// runs) surface as `Err`; the caller counts them as per-record errors
/// and continues with the next record.
pub async fn reconcile_company(
    companies: &CompanyRepository,
    tenant_id: Uuid,
    source: &str,
    record: &JsonValue,
) -> Result<Action, ApiError> {
    let Some(raw_identifier) = record_identifier(record) else {
        return Ok(Action::MissingIdentifier);
    };

    let tax_id = format_tax_id(raw_identifier);
    let key = external_key(raw_identifier);
    let name = record_name(record);
    let hash = fingerprint(record);

    match companies.find_by_tax_id(tenant_id, &tax_id).await? {
        None => {
            companies
                .create(NewCompany {
                    tenant_id,
                    tax_id,
                    name,
                    tax_regime: record_tax_regime(record),
                    external_source: source.to_string(),
                    external_key: key,
                    raw_payload: record.clone(),
                    hash_payload: hash,
                })
                .await
                .map_err(ApiError::from)?;
            Ok(Action::Created)
        }
        Some(existing) => {
            if existing.hash_payload.as_deref() == Some(hash.as_str()) {
                return Ok(Action::Skipped);
            }

            companies
                .update_provenance(
                    existing,
                    name,
                    source.to_string(),
                    key,
                    record.clone(),
                    hash,
                )
                .await?;
            Ok(Action::Updated)
        }
    }
}
