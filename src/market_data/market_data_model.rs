use serde::{Deserialize, Serialize};

/// A live quote snapshot as returned by the quote provider.
///
/// Fields are optional because providers routinely omit them for thinly
/// traded or delisted instruments; consumers must fall back to their last
/// known values for any field that comes back absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveQuote {
    pub symbol: String,
    pub price: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
}
