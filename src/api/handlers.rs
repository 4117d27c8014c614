//! API request handlers
//!
//! Every handler answers with an [`ApiResponse`] envelope. Engine failures
//! are reported as `success: false` with the error message; the HTTP status
//! stays 200 so clients only have one shape to decode.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculator::{parse_keys, BasicCalculator, ScientificCalculator, ScientificKey};
use crate::convert::{
    category_of, conversion_info, convert_currency, convert_temperature, convert_unit, Category,
    RateTable, TemperatureUnit,
};
use crate::error::{CalcError, CalcResult};
use crate::expr::StandardEvaluator;
use crate::format::format_number;
use crate::graph::{self, PlotSample, DEFAULT_POINTS, DEFAULT_TICKS, NO_VALID_POINTS};
use crate::loan::{calculate_loan, LoanRequest, LoanResult};
use crate::rates::{FrankfurterClient, RateSource};

use super::server::AppState;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }

    fn from_result(result: CalcResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.message()),
        }
    }
}

/// Root endpoint response
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

fn endpoint(method: &str, path: &str, description: &str) -> EndpointInfo {
    EndpointInfo {
        path: path.to_string(),
        method: method.to_string(),
        description: description.to_string(),
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> Json<ApiResponse<RootResponse>> {
    Json(ApiResponse::ok(RootResponse {
        name: "Calcdeck API Server".to_string(),
        version: state.version.clone(),
        description: "Calculator, conversion, loan and graphing engines over HTTP".to_string(),
        endpoints: vec![
            endpoint("GET", "/health", "Health check endpoint"),
            endpoint("GET", "/version", "Get server version"),
            endpoint("POST", "/api/v1/basic", "Run keystrokes through the basic calculator"),
            endpoint("POST", "/api/v1/scientific", "Run keys through the scientific calculator"),
            endpoint("POST", "/api/v1/convert/unit", "Convert between units of one category"),
            endpoint("POST", "/api/v1/convert/temperature", "Convert a temperature"),
            endpoint("POST", "/api/v1/convert/currency", "Convert an amount between currencies"),
            endpoint("POST", "/api/v1/loan", "Compute loan repayments"),
            endpoint("POST", "/api/v1/graph", "Sample a function of x for plotting"),
        ],
    }))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> Json<ApiResponse<VersionResponse>> {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: ["basic", "scientific", "convert", "currency", "loan", "graph"]
            .iter()
            .map(|f| f.to_string())
            .collect(),
    }))
}

/// Basic calculator request: keystrokes applied to an optional prior state
#[derive(Debug, Deserialize)]
pub struct BasicRequest {
    pub keys: String,
    #[serde(default)]
    pub state: Option<BasicCalculator>,
}

/// POST /api/v1/basic
pub async fn basic(Json(req): Json<BasicRequest>) -> Json<ApiResponse<BasicCalculator>> {
    let result = parse_keys(&req.keys).map(|keys| req.state.unwrap_or_default().press_all(keys));
    Json(ApiResponse::from_result(result))
}

/// Scientific calculator request
#[derive(Debug, Deserialize)]
pub struct ScientificRequest {
    pub keys: Vec<String>,
    #[serde(default)]
    pub state: Option<ScientificCalculator>,
}

/// POST /api/v1/scientific
pub async fn scientific(
    Json(req): Json<ScientificRequest>,
) -> Json<ApiResponse<ScientificCalculator>> {
    let result = req
        .keys
        .iter()
        .map(|k| k.parse::<ScientificKey>())
        .collect::<CalcResult<Vec<_>>>()
        .map(|keys| {
            keys.into_iter()
                .fold(req.state.unwrap_or_default(), |calc, key| {
                    calc.press(key, &StandardEvaluator)
                })
        });
    Json(ApiResponse::from_result(result))
}

/// Result of any unit, temperature or currency conversion
#[derive(Debug, Serialize)]
pub struct ConversionResponse {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub result: f64,
    pub display: String,
    pub info: String,
}

/// Unit conversion request; the category is inferred from `from` when omitted
#[derive(Debug, Deserialize)]
pub struct UnitConversionRequest {
    #[serde(default)]
    pub category: Option<Category>,
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// POST /api/v1/convert/unit
pub async fn convert_unit_handler(
    Json(req): Json<UnitConversionRequest>,
) -> Json<ApiResponse<ConversionResponse>> {
    let result = req
        .category
        .or_else(|| category_of(&req.from))
        .ok_or_else(|| CalcError::parse(format!("Unknown unit: '{}'", req.from)))
        .and_then(|category| convert_unit(category, &req.from, &req.to, req.amount))
        .map(|value| ConversionResponse {
            info: conversion_info(req.amount, &req.from, &req.to),
            from: req.from.clone(),
            to: req.to.clone(),
            amount: req.amount,
            result: value,
            display: format_number(value),
        });
    Json(ApiResponse::from_result(result))
}

#[derive(Debug, Deserialize)]
pub struct TemperatureRequest {
    pub from: TemperatureUnit,
    pub to: TemperatureUnit,
    pub amount: f64,
}

/// POST /api/v1/convert/temperature
pub async fn convert_temperature_handler(
    Json(req): Json<TemperatureRequest>,
) -> Json<ApiResponse<ConversionResponse>> {
    let result = convert_temperature(req.from, req.to, req.amount).map(|value| ConversionResponse {
        from: req.from.to_string(),
        to: req.to.to_string(),
        amount: req.amount,
        result: value,
        display: format_number(value),
        info: conversion_info(req.amount, req.from.id(), req.to.id()),
    });
    Json(ApiResponse::from_result(result))
}

/// Currency conversion request.
///
/// `rates` (relative to `from`) can be supplied inline; otherwise they are
/// fetched from the configured rate service.
#[derive(Debug, Deserialize)]
pub struct CurrencyRequest {
    pub from: String,
    pub to: String,
    pub amount: f64,
    #[serde(default)]
    pub rates: Option<BTreeMap<String, f64>>,
}

/// POST /api/v1/convert/currency
pub async fn convert_currency_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CurrencyRequest>,
) -> Json<ApiResponse<ConversionResponse>> {
    let from = req.from.to_uppercase();
    let to = req.to.to_uppercase();

    let table = match req.rates {
        Some(rates) => Ok(RateTable::new(from.clone(), rates)),
        None => fetch_rates(&state.rates_url, &from).await,
    };

    let result = table
        .and_then(|table| convert_currency(&table.rates, &from, &to, req.amount))
        .map(|value| ConversionResponse {
            info: format!("{} {} to {}", format_number(req.amount), from, to),
            from: from.clone(),
            to: to.clone(),
            amount: req.amount,
            result: value,
            display: format!("{:.2}", value),
        });
    Json(ApiResponse::from_result(result))
}

/// curl blocks, so the fetch runs on the blocking pool
async fn fetch_rates(base_url: &str, base: &str) -> CalcResult<RateTable> {
    let client = FrankfurterClient::new(base_url);
    let base = base.to_string();
    tokio::task::spawn_blocking(move || client.latest(&base))
        .await
        .map_err(|e| CalcError::network(format!("Rate fetch task failed: {}", e)))?
}

/// Loan response: the raw figures plus the formatted lines
#[derive(Debug, Serialize)]
pub struct LoanResponse {
    #[serde(flatten)]
    pub result: LoanResult,
    pub monthly_display: String,
    pub summary: String,
}

/// POST /api/v1/loan
pub async fn loan(Json(req): Json<LoanRequest>) -> Json<ApiResponse<LoanResponse>> {
    let result = calculate_loan(&req).map(|result| LoanResponse {
        monthly_display: result.monthly_display(),
        summary: result.summary(req.interest_type),
        result,
    });
    Json(ApiResponse::from_result(result))
}

fn default_x_min() -> f64 {
    -10.0
}

fn default_x_max() -> f64 {
    10.0
}

fn default_points() -> usize {
    DEFAULT_POINTS
}

fn default_ticks() -> usize {
    DEFAULT_TICKS
}

#[derive(Debug, Deserialize)]
pub struct GraphRequest {
    pub expression: String,
    #[serde(default = "default_x_min")]
    pub x_min: f64,
    #[serde(default = "default_x_max")]
    pub x_max: f64,
    #[serde(default = "default_points")]
    pub points: usize,
    #[serde(default = "default_ticks")]
    pub ticks: usize,
}

#[derive(Debug, Serialize)]
pub struct GraphResponse {
    pub sample: PlotSample,
    pub y_ticks: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// POST /api/v1/graph
pub async fn graph(Json(req): Json<GraphRequest>) -> Json<ApiResponse<GraphResponse>> {
    let result = graph::sample(
        &StandardEvaluator,
        &req.expression,
        req.x_min,
        req.x_max,
        req.points,
    )
    .and_then(|sample| {
        if sample.no_valid_points() {
            Ok(GraphResponse {
                sample,
                y_ticks: Vec::new(),
                message: Some(NO_VALID_POINTS.to_string()),
            })
        } else {
            Ok(GraphResponse {
                y_ticks: sample.y_ticks(req.ticks)?,
                sample,
                message: None,
            })
        }
    });
    Json(ApiResponse::from_result(result))
}
