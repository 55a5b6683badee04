use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use regex::Regex;
use serde::Deserialize;
use serde_json::json;

use crate::services::{alerts_service, prices_service, swap_service};
use crate::AppState;

fn is_valid_email(email: &str) -> bool {
    let re = Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_{|}~-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)+$")
        .unwrap();
    re.is_match(email.trim())
}

#[derive(Deserialize)]
pub struct HourlyQuery {
    pub hours: Option<i64>,
    pub asset: Option<String>,
}

pub async fn get_hourly(
    State(state): State<AppState>,
    Query(query): Query<HourlyQuery>,
) -> Response {
    let hours = query.hours.unwrap_or(24);
    if hours <= 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "hours must be a positive number" })),
        )
            .into_response();
    }

    let asset = query
        .asset
        .as_deref()
        .map(|a| a.trim().to_lowercase())
        .filter(|a| !a.is_empty());

    match prices_service::recent_prices(&state, asset.as_deref(), hours).await {
        Ok(points) => (StatusCode::OK, Json(points)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
pub struct CreateAlertRequest {
    pub asset: String,
    pub target_price: f64,
    pub email: String,
}

pub async fn post_create_alert(
    State(state): State<AppState>,
    Json(req): Json<CreateAlertRequest>,
) -> Response {
    let asset = req.asset.trim().to_string();
    let email = req.email.trim().to_string();

    let mut errors = serde_json::Map::new();

    if asset.is_empty() {
        errors.insert("asset".into(), json!("Asset is required."));
    }

    if !req.target_price.is_finite() || req.target_price <= 0.0 {
        errors.insert(
            "target_price".into(),
            json!("Target price must be a positive number."),
        );
    }

    if email.is_empty() {
        errors.insert("email".into(), json!("Email is required."));
    } else if !is_valid_email(&email) {
        errors.insert("email".into(), json!("Invalid email."));
    }

    if !errors.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response();
    }

    match alerts_service::create_alert(&state, &asset, req.target_price, &email).await {
        Ok(alert) => (StatusCode::CREATED, Json(alert)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
pub struct SwapQuery {
    pub eth_amount: Option<f64>,
}

pub async fn get_swap_rate(
    State(state): State<AppState>,
    Query(query): Query<SwapQuery>,
) -> Response {
    let Some(eth_amount) = query.eth_amount else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "eth_amount is required" })),
        )
            .into_response();
    };

    if !eth_amount.is_finite() || eth_amount < 0.0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "eth_amount must be a non-negative number" })),
        )
            .into_response();
    }

    match swap_service::eth_to_btc(&state, eth_amount).await {
        Ok(quote) => (
            StatusCode::OK,
            Json(json!({
                "btc_amount": quote.btc_amount,
                "fees": { "eth": quote.fee_eth, "usd": quote.fee_usd }
            })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}
