use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One order parsed out of a saved order-list page.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_number: String,
    pub status: String,
    pub delivery_info: String,
    /// `YYYY-MM-DD`, or empty when the delivery text carries no date.
    pub delivery_date: String,
    pub description: String,
    pub is_delayed: bool,
    pub price: f64,
    pub local_image: String,
    pub is_archived: bool,
    /// Price is in the base currency and still needs converting.
    pub is_foreign: bool,
}

/// Exchange rates remembered between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateCache {
    #[serde(default)]
    pub current: Option<f64>,
    #[serde(default)]
    pub historical: BTreeMap<String, f64>,
}
