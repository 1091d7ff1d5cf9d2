use std::collections::{BTreeMap, BTreeSet};

use crate::models::Order;
use crate::rates::rate_for;

/// Round to cents, halves away from zero.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Delivery dates of foreign-currency orders, the days historical rates are needed for.
pub fn foreign_dates(orders: &[Order]) -> BTreeSet<String> {
    orders
        .iter()
        .filter(|o| o.is_foreign && !o.delivery_date.is_empty())
        .map(|o| o.delivery_date.clone())
        .collect()
}

/// Convert every foreign-currency price in place using the rate for its
/// delivery date. Returns how many orders were converted.
pub fn normalize(
    orders: &mut [Order],
    current_rate: f64,
    historical: &BTreeMap<String, f64>,
) -> usize {
    let mut converted = 0usize;
    for order in orders.iter_mut().filter(|o| o.is_foreign) {
        let rate = rate_for(&order.delivery_date, historical, current_rate);
        order.price = round_cents(order.price * rate);
        converted += 1;
    }
    converted
}
