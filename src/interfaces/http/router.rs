//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::BillingEngine;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::modules::billing::{self, BillingAppState};
use crate::interfaces::http::modules::health::{self, HealthState};
use crate::interfaces::http::modules::metrics::{
    http_metrics_middleware, prometheus_metrics, MetricsState,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        billing::calculate_consumption,
        billing::calculate_from_register,
        billing::estimate_consumption,
        billing::average_consumption,
        billing::get_meter_tariff,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            billing::CalculateConsumptionRequest,
            billing::RegisterReadingRequest,
            billing::EstimateConsumptionRequest,
            billing::ConsumptionResultResponse,
            billing::BreakdownLineResponse,
            billing::WarningResponse,
            billing::AverageConsumptionResponse,
            billing::TariffSelectionResponse,
            billing::TariffTierResponse,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Billing", description = "Tiered consumption billing, estimates and tariff previews"),
    ),
    info(
        title = "Utility Billing API",
        version = "1.0.0",
        description = "Tiered and cumulative consumption billing for utility meters"
    )
)]
pub struct ApiDoc;

/// Everything the router needs from the running service
pub struct RouterDeps {
    pub engine: Arc<BillingEngine>,
    /// Pinged by `/health`; `None` on the in-memory store
    pub db: Option<DatabaseConnection>,
    /// `/metrics` is only mounted when a recorder is installed
    pub prometheus: Option<PrometheusHandle>,
}

/// Create the API router with all routes
pub fn create_api_router(deps: RouterDeps) -> Router {
    let billing_state = BillingAppState {
        engine: deps.engine,
    };

    let health_state = HealthState {
        db: deps.db,
        started_at: Arc::new(Instant::now()),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let meter_routes = Router::new()
        .route(
            "/{meter_id}/consumption",
            post(billing::calculate_consumption),
        )
        .route(
            "/{meter_id}/consumption/register",
            post(billing::calculate_from_register),
        )
        .route(
            "/{meter_id}/consumption/estimate",
            post(billing::estimate_consumption),
        )
        .route(
            "/{meter_id}/consumption/average",
            get(billing::average_consumption),
        )
        .route("/{meter_id}/tariff", get(billing::get_meter_tariff))
        .with_state(billing_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .nest("/api/v1/meters", meter_routes);

    if let Some(handle) = deps.prometheus {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .route_layer(middleware::from_fn(http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
