//! Billing REST API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{
    AverageConsumptionResponse, AverageQuery, CalculateConsumptionRequest,
    ConsumptionResultResponse, EstimateConsumptionRequest, RegisterReadingRequest,
    TariffSelectionResponse,
};
use crate::application::BillingEngine;
use crate::interfaces::http::common::{domain_error_response, ApiError, ApiResponse, ValidatedJson};

/// State for billing routes
#[derive(Clone)]
pub struct BillingAppState {
    pub engine: Arc<BillingEngine>,
}

impl BillingAppState {
    fn currency(&self) -> &str {
        &self.engine.config().default_currency
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/meters/{meter_id}/consumption",
    tag = "Billing",
    params(("meter_id" = i32, Path, description = "Meter ID")),
    request_body = CalculateConsumptionRequest,
    responses(
        (status = 200, description = "Charges calculated", body = ApiResponse<ConsumptionResultResponse>),
        (status = 404, description = "Meter not found"),
        (status = 422, description = "Invalid consumption")
    )
)]
pub async fn calculate_consumption(
    State(state): State<BillingAppState>,
    Path(meter_id): Path<i32>,
    ValidatedJson(req): ValidatedJson<CalculateConsumptionRequest>,
) -> Result<Json<ApiResponse<ConsumptionResultResponse>>, ApiError> {
    let result = state
        .engine
        .calculate_consumption(meter_id, req.consumption, req.options())
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(ConsumptionResultResponse::new(
        &result,
        state.currency(),
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/meters/{meter_id}/consumption/register",
    tag = "Billing",
    params(("meter_id" = i32, Path, description = "Meter ID")),
    request_body = RegisterReadingRequest,
    responses(
        (status = 200, description = "Charges calculated from the register delta", body = ApiResponse<ConsumptionResultResponse>),
        (status = 404, description = "Meter not found"),
        (status = 422, description = "Register went backwards")
    )
)]
pub async fn calculate_from_register(
    State(state): State<BillingAppState>,
    Path(meter_id): Path<i32>,
    ValidatedJson(req): ValidatedJson<RegisterReadingRequest>,
) -> Result<Json<ApiResponse<ConsumptionResultResponse>>, ApiError> {
    let result = state
        .engine
        .calculate_from_register(meter_id, req.previous_value, req.current_value, req.options())
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(ConsumptionResultResponse::new(
        &result,
        state.currency(),
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/meters/{meter_id}/consumption/estimate",
    tag = "Billing",
    params(("meter_id" = i32, Path, description = "Meter ID")),
    request_body = EstimateConsumptionRequest,
    responses(
        (status = 200, description = "Estimated charges", body = ApiResponse<ConsumptionResultResponse>),
        (status = 404, description = "Meter not found")
    )
)]
pub async fn estimate_consumption(
    State(state): State<BillingAppState>,
    Path(meter_id): Path<i32>,
    ValidatedJson(req): ValidatedJson<EstimateConsumptionRequest>,
) -> Result<Json<ApiResponse<ConsumptionResultResponse>>, ApiError> {
    let result = state
        .engine
        .estimate_consumption(meter_id, req.last_n, req.options())
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(ConsumptionResultResponse::new(
        &result,
        state.currency(),
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/meters/{meter_id}/consumption/average",
    tag = "Billing",
    params(("meter_id" = i32, Path, description = "Meter ID"), AverageQuery),
    responses(
        (status = 200, description = "Rolling average of approved readings", body = ApiResponse<AverageConsumptionResponse>)
    )
)]
pub async fn average_consumption(
    State(state): State<BillingAppState>,
    Path(meter_id): Path<i32>,
    Query(query): Query<AverageQuery>,
) -> Result<Json<ApiResponse<AverageConsumptionResponse>>, ApiError> {
    let window = query
        .last_n
        .unwrap_or(state.engine.config().default_average_window);
    let average = state
        .engine
        .average_consumption(meter_id, Some(window))
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(AverageConsumptionResponse::new(
        meter_id, window, average,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/meters/{meter_id}/tariff",
    tag = "Billing",
    params(("meter_id" = i32, Path, description = "Meter ID")),
    responses(
        (status = 200, description = "Tariff tiers that apply to the meter", body = ApiResponse<TariffSelectionResponse>),
        (status = 404, description = "Meter not found")
    )
)]
pub async fn get_meter_tariff(
    State(state): State<BillingAppState>,
    Path(meter_id): Path<i32>,
) -> Result<Json<ApiResponse<TariffSelectionResponse>>, ApiError> {
    let selection = state
        .engine
        .resolve_tariff(meter_id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(TariffSelectionResponse::new(
        meter_id, &selection,
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BillingConfig;
    use crate::domain::{CustomerCategory, MeterProfile, ServiceType, TariffKind, TariffRecord};
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use crate::interfaces::http::router::{create_api_router, RouterDeps};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};

    fn bracket(id: i32, from: Decimal, to: Option<Decimal>, price: Decimal) -> TariffRecord {
        TariffRecord {
            id,
            code: format!("RES-{}", id),
            name: format!("Residential {}", id),
            kind: TariffKind::Standard,
            service_type: ServiceType::Electricity,
            customer_category: CustomerCategory::Residential,
            from_unit: from,
            to_unit: to,
            price_per_unit: price,
            fixed_charge: if id == 1 { Some(dec!(5)) } else { None },
            is_active: true,
            effective_from: None,
            effective_to: None,
        }
    }

    fn app() -> Router {
        let store = InMemoryRepositoryProvider::new();
        store.insert_tariff(bracket(1, dec!(0), Some(dec!(100)), dec!(0.10)));
        store.insert_tariff(bracket(2, dec!(101), Some(dec!(300)), dec!(0.15)));
        store.insert_tariff(bracket(3, dec!(301), None, dec!(0.20)));
        store.insert_meter(MeterProfile::new(
            1,
            10,
            CustomerCategory::Residential,
            ServiceType::Electricity,
        ));
        for (period, qty) in [(1, dec!(80)), (2, dec!(100)), (3, dec!(120))] {
            let date = NaiveDate::from_ymd_opt(2026, period as u32, 28).unwrap();
            store.record_reading(1, period, qty, date, true);
        }

        let engine = BillingEngine::new(Arc::new(store), BillingConfig::default());
        create_api_router(RouterDeps {
            engine: Arc::new(engine),
            db: None,
            prometheus: None,
        })
    }

    async fn send(req: Request<Body>) -> (StatusCode, Value) {
        use tower::Service;
        let mut svc = app().into_service();
        let resp = svc.call(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn calculate_returns_breakdown_as_strings() {
        let (status, body) = send(post(
            "/api/v1/meters/1/consumption",
            json!({"consumption": "250"}),
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["consumption_amount"], "32.50");
        assert_eq!(data["base_charge"], "5.00");
        assert_eq!(data["total_before_fees"], "37.50");
        assert_eq!(data["tariff_source"], "schedule");
        assert_eq!(data["breakdown"][1]["units_in_tier"], "150");
        assert_eq!(data["breakdown"][1]["amount"], "22.50");
        assert_eq!(data["warnings"], json!([]));
    }

    #[tokio::test]
    async fn unknown_meter_is_404() {
        let (status, body) = send(post(
            "/api/v1/meters/99/consumption",
            json!({"consumption": "10"}),
        ))
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn negative_consumption_is_422() {
        let (status, _) = send(post(
            "/api/v1/meters/1/consumption",
            json!({"consumption": "-3"}),
        ))
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn register_rollback_is_422() {
        let (status, body) = send(post(
            "/api/v1/meters/1/consumption/register",
            json!({"previous_value": "500", "current_value": "450"}),
        ))
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("below previous value"));
    }

    #[tokio::test]
    async fn zero_consumption_reports_warning() {
        let (status, body) = send(post(
            "/api/v1/meters/1/consumption/register",
            json!({"previous_value": "500", "current_value": "500"}),
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["warnings"][0]["kind"], "zero_consumption");
        assert_eq!(body["data"]["breakdown"], json!([]));
    }

    #[tokio::test]
    async fn estimate_uses_default_window() {
        let (status, body) = send(post(
            "/api/v1/meters/1/consumption/estimate",
            json!({}),
        ))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["consumption"], "100");
        assert_eq!(body["data"]["warnings"][0]["kind"], "estimated");
    }

    #[tokio::test]
    async fn average_honours_last_n() {
        let (status, body) = send(get("/api/v1/meters/1/consumption/average?last_n=2")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["average"], "110.00");
        assert_eq!(body["data"]["readings_used"], 2);
    }

    #[tokio::test]
    async fn tariff_preview_lists_tiers() {
        let (status, body) = send(get("/api/v1/meters/1/tariff")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["source"], "schedule");
        assert_eq!(body["data"]["base_tariff_id"], 1);
        assert_eq!(body["data"]["tiers"][2]["to_unit"], Value::Null);
    }
}
