//! # Tenant Repository
//!
//! Lookup operations for tenants and tenant administrator membership.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::tenant::{Column, Entity, Model};
use crate::models::tenant_admin;

/// Repository for tenant database operations
pub struct TenantRepository {
    db: DatabaseConnection,
}

impl TenantRepository {
    /// Create a new TenantRepository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Find a tenant by its URL-safe slug
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Model>, ApiError> {
        let tenant = Entity::find()
            .filter(Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find tenant by slug: {}", e);
                ApiError::new(
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Failed to find tenant",
                )
            })?;

        Ok(tenant)
    }

    /// Find a tenant by its identifier
    pub async fn find_by_id(&self, tenant_id: Uuid) -> Result<Option<Model>, ApiError> {
        let tenant = Entity::find_by_id(tenant_id).one(&self.db).await.map_err(|e| {
            tracing::error!("Failed to find tenant: {}", e);
            ApiError::new(
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "Failed to find tenant",
            )
        })?;

        Ok(tenant)
    }

    /// Returns true when the principal administers the tenant
    pub async fn is_admin(&self, tenant_id: Uuid, principal_id: Uuid) -> Result<bool, ApiError> {
        let membership = tenant_admin::Entity::find()
            .filter(tenant_admin::Column::TenantId.eq(tenant_id))
            .filter(tenant_admin::Column::PrincipalId.eq(principal_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check tenant admin membership: {}", e);
                ApiError::new(
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Failed to check tenant membership",
                )
            })?;

        Ok(membership.is_some())
    }
}
