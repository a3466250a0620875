// src/models/mod.rs
pub mod advisory;
pub mod market;

// Re-export commonly used types so other modules can use `crate::models::X`
pub use advisory::{Advice, ChatReply, ClassificationResult, Provenance};
pub use market::{CropPriceView, FeedPage, MarketSnapshot, RawCommodityRecord, Trend};
