use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{MARKET_DEFAULT_LIMIT, TRENDING_DEFAULT_LIMIT},
    error::Result,
    models::{CropPriceView, MarketSnapshot},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct MarketPricesQuery {
    pub state: Option<String>,
    pub commodity: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub state: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct MarketPricesResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub count: usize,
    pub crops: Vec<CropPriceView>,
}

/// GET /api/market-prices
pub async fn get_market_prices(
    State(state): State<AppState>,
    Query(query): Query<MarketPricesQuery>,
) -> Result<Json<MarketPricesResponse>> {
    let limit = query.limit.unwrap_or(MARKET_DEFAULT_LIMIT);
    let snapshot = state
        .market
        .list_prices(query.state.as_deref(), query.commodity.as_deref(), limit)
        .await?;
    Ok(Json(respond(snapshot)))
}

/// GET /api/market-prices/trending
pub async fn get_trending_crops(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<MarketPricesResponse>> {
    let limit = query.limit.unwrap_or(TRENDING_DEFAULT_LIMIT);
    let snapshot = state
        .market
        .trending_prices(query.state.as_deref(), limit)
        .await?;
    Ok(Json(respond(snapshot)))
}

fn respond(snapshot: MarketSnapshot) -> MarketPricesResponse {
    if snapshot.no_data {
        return MarketPricesResponse {
            success: false,
            message: Some("No data available".to_string()),
            count: 0,
            crops: Vec::new(),
        };
    }

    MarketPricesResponse {
        success: true,
        message: None,
        count: snapshot.crops.len(),
        crops: snapshot.crops,
    }
}
