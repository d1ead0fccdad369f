use axum::{
    extract::{Path, RawQuery, State},
    http::Uri,
    response::{IntoResponse, Response},
    Json,
};
use models::{FleetModel, PayloadFleetInputs, SavingsResults, SingleClassInputs};
use param_sync::{hydrate, target_query, QueryParams};
use savings_engine::{format_currency, SavingsModel};
use serde::Serialize;

use crate::{error::ApiError, state::SharedState, Result};

/// Response of the calculate endpoint
#[derive(Debug, Serialize)]
pub struct CalculationResponse<F> {
    pub model: FleetModel,
    pub inputs: F,
    pub results: SavingsResults,
    /// Query string the page address bar should carry for these inputs.
    pub query: String,
    /// Typical-scenario savings formatted with the configured locale.
    pub typical_savings: Option<String>,
}

/// GET /api/calculate/:model
/// Seeds the form from the request query like a page load, then runs the engine
pub async fn calculate(
    State(state): State<SharedState>,
    Path(model): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response> {
    let model: FleetModel = model
        .parse()
        .map_err(|_| ApiError::UnknownModel(model.clone()))?;
    let query = QueryParams::parse(query.as_deref().unwrap_or(""));

    let response = match model {
        FleetModel::PayloadFleet => {
            respond::<PayloadFleetInputs>(&state, &query).into_response()
        }
        FleetModel::SingleClass => respond::<SingleClassInputs>(&state, &query).into_response(),
    };
    Ok(response)
}

fn respond<F: SavingsModel + Serialize>(
    state: &SharedState,
    query: &QueryParams,
) -> Json<CalculationResponse<F>> {
    let mut inputs: F = state.defaults(F::MODEL);
    hydrate(&mut inputs, query);

    let results = inputs.calculate();
    let typical_savings = results.assumed_scenario().map(|s| {
        format_currency(
            s.lifetime_savings.unwrap_or(s.annual_savings),
            &state.settings.format,
        )
    });
    let query = target_query(&inputs, query).to_string();

    Json(CalculationResponse {
        model: F::MODEL,
        inputs,
        results,
        query,
        typical_savings,
    })
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "savings-api"
    }))
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}
