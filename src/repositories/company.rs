//! # Company Repository
//!
//! This module provides repository operations for the companies table.
//! Creation relies on the (tenant_id, tax_id) uniqueness index: a
//! concurrent duplicate insert surfaces as a database error the caller
//! counts as a per-record failure.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use serde_json::{Value as JsonValue, json};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::company::{ActiveModel, Column, Entity, Model};

/// Default tax regime for companies imported from the provider.
pub const DEFAULT_TAX_REGIME: &str = "simples_nacional";

/// Fields required to create a company from a provider record.
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub tenant_id: Uuid,
    pub tax_id: String,
    pub name: String,
    pub tax_regime: Option<String>,
    pub external_source: String,
    pub external_key: String,
    pub raw_payload: JsonValue,
    pub hash_payload: String,
}

/// Repository for company database operations
pub struct CompanyRepository {
    db: DatabaseConnection,
}

impl CompanyRepository {
    /// Create a new CompanyRepository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Find a company by tenant and formatted tax identifier
    pub async fn find_by_tax_id(
        &self,
        tenant_id: Uuid,
        tax_id: &str,
    ) -> Result<Option<Model>, ApiError> {
        let company = Entity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::TaxId.eq(tax_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find company: {}", e);
                ApiError::new(
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Failed to find company",
                )
            })?;

        Ok(company)
    }

    /// Create a company from a provider record with import defaults.
    ///
    /// Returns the raw [`DbErr`] so callers can distinguish uniqueness
    /// conflicts from other failures.
    pub async fn create(&self, new: NewCompany) -> Result<Model, DbErr> {
        let now = Utc::now().fixed_offset();

        let company = ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(new.tenant_id),
            tax_id: Set(new.tax_id),
            name: Set(new.name),
            tax_regime: Set(new
                .tax_regime
                .unwrap_or_else(|| DEFAULT_TAX_REGIME.to_string())),
            issues_invoices: Set(true),
            monthly_revenue: Set(json!([])),
            obligations: Set(json!([])),
            partners: Set(json!([])),
            external_source: Set(Some(new.external_source)),
            external_key: Set(Some(new.external_key)),
            raw_payload: Set(Some(new.raw_payload)),
            hash_payload: Set(Some(new.hash_payload)),
            synced_at: Set(Some(now)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        company.insert(&self.db).await
    }

    /// Update the name and provenance fields of an existing company.
    ///
    /// Locally-managed fields (tax regime, revenue, obligations, partners)
    /// are never touched by the sync pipeline.
    pub async fn update_provenance(
        &self,
        company: Model,
        name: String,
        external_source: String,
        external_key: String,
        raw_payload: JsonValue,
        hash_payload: String,
    ) -> Result<Model, ApiError> {
        let now = Utc::now().fixed_offset();

        let mut active: ActiveModel = company.into();
        active.name = Set(name);
        active.external_source = Set(Some(external_source));
        active.external_key = Set(Some(external_key));
        active.raw_payload = Set(Some(raw_payload));
        active.hash_payload = Set(Some(hash_payload));
        active.synced_at = Set(Some(now));
        active.updated_at = Set(now);

        let updated = active.update(&self.db).await.map_err(|e| {
            tracing::error!("Failed to update company: {}", e);
            ApiError::new(
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "Failed to update company",
            )
        })?;

        Ok(updated)
    }

    /// Count companies belonging to a tenant
    pub async fn count_by_tenant(&self, tenant_id: Uuid) -> Result<u64, ApiError> {
        use sea_orm::PaginatorTrait;

        let count = Entity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .count(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count companies: {}", e);
                ApiError::new(
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Failed to count companies",
                )
            })?;

        Ok(count)
    }
}
