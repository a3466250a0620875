// src/api/mod.rs

pub mod chat;
pub mod health;
pub mod market;
pub mod predict;

use std::sync::Arc;

use crate::config::Config;
use crate::services::{advisory::AdvisoryService, classifier::ImageScorer, market::MarketService};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub scorer: Arc<dyn ImageScorer>,
    pub advisor: Arc<AdvisoryService>,
    pub market: Arc<MarketService>,
}
