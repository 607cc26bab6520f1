//! # Server Configuration
//!
//! Router assembly and startup for the fiscal-sync API.

use std::sync::Arc;

use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::auth::auth_middleware;
use crate::config::AppConfig;
use crate::handlers;
use crate::secrets::SecretStore;
use crate::sync::runner::Registry;
use crate::telemetry::{self, TraceContext};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub http: reqwest::Client,
    pub secrets: Arc<dyn SecretStore>,
    pub registry: Arc<Registry>,
}

/// Assigns every request a trace context so logs and error responses
/// share one correlation id.
async fn trace_context_middleware(mut request: Request, next: Next) -> Response {
    let trace_id = format!("req-{}", &Uuid::new_v4().simple().to_string()[..8]);
    let context = TraceContext {
        trace_id: trace_id.clone(),
    };
    request.extensions_mut().insert(context.clone());

    telemetry::with_trace_context(context, next.run(request)).await
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/sync/acessorias", post(handlers::sync::trigger_acessorias_sync))
        .route("/sync/jobs", get(handlers::sync::list_jobs))
        .route("/sync/jobs/{id}", get(handlers::sync::get_job))
        .route("/integrations/run", post(handlers::integrations::run_integration))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.config),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/sync/acessorias/ping", get(handlers::sync::ping))
        .route("/webhooks/onecode", post(handlers::webhooks::receive_onecode_webhook))
        .merge(protected)
        .layer(middleware::from_fn(trace_context_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Starts the server with the given configuration
pub async fn run_server(
    config: AppConfig,
    db: DatabaseConnection,
    secrets: Arc<dyn SecretStore>,
) -> Result<(), Box<dyn std::error::Error>> {
    let profile = config.profile.clone();
    let state = AppState {
        config: Arc::new(config),
        db,
        http: reqwest::Client::new(),
        secrets,
        registry: Arc::new(Registry::with_defaults()),
    };

    // Resolve the configured bind address
    let addr = state
        .config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;

    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on: {}", addr);
    tracing::info!("Running in profile: {}", profile);

    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::health,
        crate::handlers::sync::trigger_acessorias_sync,
        crate::handlers::sync::ping,
        crate::handlers::sync::list_jobs,
        crate::handlers::sync::get_job,
        crate::handlers::integrations::run_integration,
        crate::handlers::webhooks::receive_onecode_webhook,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::handlers::sync::TriggerSyncRequest,
            crate::handlers::sync::TriggerSyncResponse,
            crate::handlers::sync::PingResponse,
            crate::handlers::sync::SyncJobResponse,
            crate::handlers::integrations::RunIntegrationRequest,
            crate::handlers::integrations::RunIntegrationResponse,
        )
    ),
    info(
        title = "Fiscal Sync API",
        description = "Multi-tenant synchronization of fiscal company records",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
