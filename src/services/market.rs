use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    constants::{PRICE_UNIT, TRENDING_SAMPLE_FLOOR, TREND_VARIANCE_THRESHOLD},
    error::Result,
    models::{CropPriceView, FeedPage, MarketSnapshot, RawCommodityRecord, Trend},
};

/// Capability seam for the upstream commodity price feed.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn fetch(
        &self,
        state: Option<&str>,
        commodity: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<FeedPage>;
}

/// Market price normalization engine.
///
/// Turns one raw feed page into a deduplicated, priced, trend-annotated
/// listing. The feed is a single noisy snapshot; there is no historical
/// store behind any of this.
pub struct MarketService {
    feed: Arc<dyn PriceFeed>,
}

impl MarketService {
    pub fn new(feed: Arc<dyn PriceFeed>) -> Self {
        Self { feed }
    }

    /// Fetch and normalize a price listing. Filters are passed through to
    /// the upstream verbatim when present.
    pub async fn list_prices(
        &self,
        state: Option<&str>,
        commodity: Option<&str>,
        limit: u32,
    ) -> Result<MarketSnapshot> {
        let page = self.feed.fetch(state, commodity, limit, 0).await?;

        let Some(records) = page.records else {
            tracing::warn!("Price feed response carried no records field");
            return Ok(MarketSnapshot {
                crops: Vec::new(),
                no_data: true,
            });
        };

        Ok(MarketSnapshot {
            crops: normalize_records(records),
            no_data: false,
        })
    }

    /// Top movers: fetch a larger sample, rank by absolute change, keep
    /// `limit` entries.
    pub async fn trending_prices(&self, state: Option<&str>, limit: usize) -> Result<MarketSnapshot> {
        let sample = TRENDING_SAMPLE_FLOOR.max(limit as u32);
        let mut snapshot = self.list_prices(state, None, sample).await?;
        rank_by_change(&mut snapshot.crops, limit);
        Ok(snapshot)
    }
}

/// Sort by absolute change descending and truncate. `sort_by` is stable, so
/// entries with equal change keep their feed order.
fn rank_by_change(crops: &mut Vec<CropPriceView>, limit: usize) {
    crops.sort_by(|a, b| {
        b.change_percent
            .abs()
            .partial_cmp(&a.change_percent.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    crops.truncate(limit);
}

fn normalize_records(records: Vec<RawCommodityRecord>) -> Vec<CropPriceView> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut crops = Vec::new();

    for record in records {
        let name = record
            .commodity
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());

        // First retained occurrence wins. The feed is assumed newest-first,
        // so "first" approximates "latest" (a documented heuristic of the
        // source, not a guarantee).
        if seen.contains(&name) {
            continue;
        }

        let Some(view) = normalize_record(name.clone(), &record) else {
            continue;
        };

        seen.insert(name);
        crops.push(view);
    }

    crops
}

/// Price and trend for one raw record; `None` when the record carries no
/// usable quote. Discarded records do not count toward dedup, so a later
/// record with the same name can still be retained.
fn normalize_record(name: String, record: &RawCommodityRecord) -> Option<CropPriceView> {
    let modal = parse_price(record.modal_price.as_ref());
    let price = modal
        .or_else(|| parse_price(record.max_price.as_ref()))
        .unwrap_or(0.0);

    if price <= 0.0 {
        return None;
    }

    let (trend, change) = classify_trend(
        modal,
        parse_price(record.min_price.as_ref()),
        parse_price(record.max_price.as_ref()),
    );

    Some(CropPriceView {
        name,
        price: round2(price),
        unit: PRICE_UNIT,
        trend,
        change_percent: round1(change),
        market: record.market.clone().unwrap_or_default(),
        state: record.state.clone().unwrap_or_default(),
        district: record.district.clone().unwrap_or_default(),
        date: record.arrival_date.clone().unwrap_or_default(),
    })
}

/// Coerce an untrusted feed value to a number. The upstream serves prices as
/// strings more often than not.
fn parse_price(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Spread-based trend heuristic: variance = (max - min) / modal * 100.
/// Anything that cannot be computed counts as zero variance, and the
/// threshold is exclusive on both sides.
fn classify_trend(modal: Option<f64>, min: Option<f64>, max: Option<f64>) -> (Trend, f64) {
    let variance = match (modal, min, max) {
        (Some(modal), Some(min), Some(max)) if modal != 0.0 => {
            let variance = (max - min) / modal * 100.0;
            if variance.is_finite() {
                variance
            } else {
                0.0
            }
        }
        _ => 0.0,
    };

    if variance > TREND_VARIANCE_THRESHOLD {
        (Trend::Up, variance.abs())
    } else if variance < -TREND_VARIANCE_THRESHOLD {
        (Trend::Down, variance.abs())
    } else {
        (Trend::Stable, 0.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use serde_json::json;

    fn record(name: &str, modal: Option<Value>, min: Option<Value>, max: Option<Value>) -> RawCommodityRecord {
        RawCommodityRecord {
            commodity: Some(name.to_string()),
            modal_price: modal,
            min_price: min,
            max_price: max,
            market: Some("Azadpur".to_string()),
            state: Some("Delhi".to_string()),
            district: Some("Delhi".to_string()),
            arrival_date: Some("01/08/2026".to_string()),
        }
    }

    struct StubFeed(Vec<RawCommodityRecord>);

    #[async_trait]
    impl PriceFeed for StubFeed {
        async fn fetch(
            &self,
            _state: Option<&str>,
            _commodity: Option<&str>,
            _limit: u32,
            _offset: u32,
        ) -> Result<FeedPage> {
            Ok(FeedPage {
                records: Some(self.0.clone()),
            })
        }
    }

    struct EmptyFeed;

    #[async_trait]
    impl PriceFeed for EmptyFeed {
        async fn fetch(
            &self,
            _state: Option<&str>,
            _commodity: Option<&str>,
            _limit: u32,
            _offset: u32,
        ) -> Result<FeedPage> {
            Ok(FeedPage { records: None })
        }
    }

    struct DownFeed;

    #[async_trait]
    impl PriceFeed for DownFeed {
        async fn fetch(
            &self,
            _state: Option<&str>,
            _commodity: Option<&str>,
            _limit: u32,
            _offset: u32,
        ) -> Result<FeedPage> {
            Err(AppError::UpstreamUnavailable("connect timeout".to_string()))
        }
    }

    #[test]
    fn duplicate_names_keep_only_the_first_record() {
        let crops = normalize_records(vec![
            record("Onion", Some(json!("1200")), Some(json!("1100")), Some(json!("1300"))),
            record("Onion", Some(json!("900")), Some(json!("800")), Some(json!("1000"))),
        ]);
        assert_eq!(crops.len(), 1);
        assert_eq!(crops[0].price, 1200.0);
    }

    #[test]
    fn zero_priced_record_is_discarded_and_does_not_block_dedup() {
        // The worthless record must not claim the name for the whole fetch
        let crops = normalize_records(vec![
            record("Potato", None, None, Some(json!("0"))),
            record("Potato", Some(json!("850")), Some(json!("800")), Some(json!("900"))),
        ]);
        assert_eq!(crops.len(), 1);
        assert_eq!(crops[0].price, 850.0);
    }

    #[test]
    fn missing_modal_with_zero_max_is_excluded() {
        let crops = normalize_records(vec![record("Wheat", None, None, Some(json!("0")))]);
        assert!(crops.is_empty());
    }

    #[test]
    fn price_falls_back_from_modal_to_max() {
        let crops = normalize_records(vec![record(
            "Maize",
            Some(json!("not-a-number")),
            None,
            Some(json!("2100.456")),
        )]);
        assert_eq!(crops.len(), 1);
        assert_eq!(crops[0].price, 2100.46);
    }

    #[test]
    fn missing_commodity_name_defaults_to_unknown() {
        let mut raw = record("x", Some(json!("500")), None, None);
        raw.commodity = None;
        let crops = normalize_records(vec![raw]);
        assert_eq!(crops[0].name, "Unknown");
    }

    #[test]
    fn variance_of_exactly_five_is_stable() {
        // The threshold is exclusive on both sides
        let (trend, change) = classify_trend(Some(1000.0), Some(950.0), Some(1000.0));
        assert_eq!(trend, Trend::Stable);
        assert_eq!(change, 0.0);
    }

    #[test]
    fn wide_spread_classifies_as_up_with_change() {
        // (1300 - 1100) / 1200 * 100 = 16.67
        let (trend, change) = classify_trend(Some(1200.0), Some(1100.0), Some(1300.0));
        assert_eq!(trend, Trend::Up);
        assert!((change - 16.666_666).abs() < 1e-3);
    }

    #[test]
    fn inverted_spread_classifies_as_down() {
        let (trend, change) = classify_trend(Some(1000.0), Some(1200.0), Some(1100.0));
        assert_eq!(trend, Trend::Down);
        assert!((change - 10.0).abs() < 1e-9);
    }

    #[test]
    fn unparsable_inputs_count_as_zero_variance() {
        let (trend, change) = classify_trend(None, Some(1.0), Some(2.0));
        assert_eq!(trend, Trend::Stable);
        assert_eq!(change, 0.0);

        let (trend, _) = classify_trend(Some(0.0), Some(1.0), Some(2.0));
        assert_eq!(trend, Trend::Stable);
    }

    #[test]
    fn ranking_sorts_by_absolute_change_and_truncates() {
        // Changes [1, 9, 3, 7, 2] with limit 3 yield [9, 7, 3] in that order
        let mut crops: Vec<CropPriceView> = [1.0, 9.0, 3.0, 7.0, 2.0]
            .iter()
            .enumerate()
            .map(|(idx, change)| CropPriceView {
                name: format!("crop-{idx}"),
                price: 100.0,
                unit: PRICE_UNIT,
                trend: Trend::Up,
                change_percent: *change,
                market: String::new(),
                state: String::new(),
                district: String::new(),
                date: String::new(),
            })
            .collect();
        rank_by_change(&mut crops, 3);
        let changes: Vec<f64> = crops.iter().map(|c| c.change_percent).collect();
        assert_eq!(changes, vec![9.0, 7.0, 3.0]);
    }

    #[tokio::test]
    async fn missing_records_field_yields_flagged_no_data() {
        let service = MarketService::new(Arc::new(EmptyFeed));
        let snapshot = service.list_prices(None, None, 100).await.unwrap();
        assert!(snapshot.no_data);
        assert!(snapshot.crops.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_propagates_as_unavailable() {
        let service = MarketService::new(Arc::new(DownFeed));
        let result = service.list_prices(None, None, 100).await;
        assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn trending_limits_the_ranked_listing() {
        let records = vec![
            record("Onion", Some(json!("1000")), Some(json!("950")), Some(json!("1200"))),
            record("Potato", Some(json!("1000")), Some(json!("990")), Some(json!("1010"))),
            record("Tomato", Some(json!("1000")), Some(json!("900")), Some(json!("1400"))),
        ];
        let service = MarketService::new(Arc::new(StubFeed(records)));
        let snapshot = service.trending_prices(None, 2).await.unwrap();
        assert_eq!(snapshot.crops.len(), 2);
        // Tomato's 50% spread outranks Onion's 25%
        assert_eq!(snapshot.crops[0].name, "Tomato");
        assert_eq!(snapshot.crops[1].name, "Onion");
    }
}
