use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One raw record from the upstream commodity feed. Every field is untrusted:
/// possibly absent, and the price fields possibly non-numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCommodityRecord {
    pub commodity: Option<String>,
    pub modal_price: Option<Value>,
    pub min_price: Option<Value>,
    pub max_price: Option<Value>,
    pub market: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub arrival_date: Option<String>,
}

/// Successful feed response envelope. A missing `records` field is the
/// upstream's way of signalling "no data", not an error.
#[derive(Debug, Default, Deserialize)]
pub struct FeedPage {
    pub records: Option<Vec<RawCommodityRecord>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Normalized, deduplicated price listing entry. `change` is the absolute
/// spread variance percentage that drove the trend classification.
#[derive(Debug, Clone, Serialize)]
pub struct CropPriceView {
    pub name: String,
    pub price: f64,
    pub unit: &'static str,
    pub trend: Trend,
    #[serde(rename = "change")]
    pub change_percent: f64,
    pub market: String,
    pub state: String,
    pub district: String,
    pub date: String,
}

/// Outcome of one listing call: either a normalized listing or the
/// upstream's explicit no-data condition.
#[derive(Debug)]
pub struct MarketSnapshot {
    pub crops: Vec<CropPriceView>,
    pub no_data: bool,
}
