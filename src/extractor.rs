use std::collections::HashSet;

use regex::Regex;

use crate::error::Result;
use crate::models::Order;

// ---------------------------------------------------------------------------
// Markup markers
// ---------------------------------------------------------------------------

const ITEM_DELIMITER: &str = "RedOrderList_OrderList__item__a2315";
const DELAYED_MARKER: &str = "descriptionDangerous";
const EXCLUDED_MARKERS: &[&str] = &["CANCELLED", "CANCELED", "TIME FOR PAYMENT"];

const UNKNOWN_STATUS: &str = "Unknown";
const NO_DELIVERY_INFO: &str = "N/A";

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a price label into `(amount, is_foreign)`. A `$` marks a base-currency amount.
pub fn parse_price(raw: &str) -> (f64, bool) {
    let is_foreign = raw.contains('$');
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | '€') && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    match cleaned.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => (amount, is_foreign),
        _ => (0.0, false),
    }
}

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == lower)
        .map(|i| i as u32 + 1)
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn is_excluded(status: &str, delivery_info: &str, description: &str) -> bool {
    let combined = format!("{status} {delivery_info} {description}").to_uppercase();
    EXCLUDED_MARKERS.iter().any(|m| combined.contains(m))
}

// ---------------------------------------------------------------------------
// OrderExtractor
// ---------------------------------------------------------------------------

/// Pulls orders out of a saved order-list page by searching fixed patterns
/// inside each list item. Only the order number is mandatory.
pub struct OrderExtractor {
    number: Regex,
    status: Regex,
    delivery: Regex,
    description: Regex,
    price: Regex,
    image: Regex,
    date: Regex,
    reference_year: i32,
}

impl OrderExtractor {
    /// `reference_year` is used for delivery dates that omit the year.
    pub fn new(reference_year: i32) -> Result<Self> {
        Ok(Self {
            number: Regex::new(
                r#"RedOrderList_OrderItem__number__1tjf5">(\d{2,4}\s\d{4}\s\d{4}\s\d{4})</div>"#,
            )?,
            status: Regex::new(r#"RedOrderList_OrderItem__tag__1tjf5[^"]*">([^<]+)</div>"#)?,
            delivery: Regex::new(r#"RedOrderList_OrderItem__title__1tjf5">([^<]+)</h4>"#)?,
            description: Regex::new(
                r#"RedOrderList_OrderItem__description__1tjf5[^"]*">([^<]+)</div>"#,
            )?,
            price: Regex::new(r#"totalPrice__1tjf5">([^<]+)</div>"#)?,
            image: Regex::new(r#"src="[^"]*_files/([^"]+\.jpg)""#)?,
            date: Regex::new(&format!(
                r"(?i)([0-9]{{1,2}})\s+({})(?:\s+([0-9]{{4}}))?",
                MONTHS.join("|")
            ))?,
            reference_year,
        })
    }

    /// Find the first `<day> <Month> [<year>]` in a delivery label and return it as ISO.
    /// Anything that is not a real calendar date yields an empty string.
    pub fn parse_delivery_date(&self, delivery_info: &str) -> String {
        let Some(caps) = self.date.captures(delivery_info) else {
            return String::new();
        };
        let Ok(day) = caps[1].parse::<u32>() else {
            return String::new();
        };
        let Some(month) = month_number(&caps[2]) else {
            return String::new();
        };
        let year = match caps.get(3) {
            Some(y) => match y.as_str().parse::<i32>() {
                Ok(year) => year,
                Err(_) => return String::new(),
            },
            None => self.reference_year,
        };
        chrono::NaiveDate::from_ymd_opt(year, month, day)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    /// Parse one list item. `None` when it has no order number or is cancelled / unpaid.
    pub fn parse_segment(&self, segment: &str, is_archived: bool) -> Option<Order> {
        let order_number = first_capture(&self.number, segment)?;

        let status =
            first_capture(&self.status, segment).unwrap_or_else(|| UNKNOWN_STATUS.to_string());
        let delivery_info =
            first_capture(&self.delivery, segment).unwrap_or_else(|| NO_DELIVERY_INFO.to_string());
        let description = first_capture(&self.description, segment).unwrap_or_default();

        if is_excluded(&status, &delivery_info, &description) {
            return None;
        }

        let is_delayed = segment.contains(DELAYED_MARKER) && !description.is_empty();
        let (price, is_foreign) = first_capture(&self.price, segment)
            .map(|p| parse_price(&p))
            .unwrap_or((0.0, false));
        let local_image = first_capture(&self.image, segment).unwrap_or_default();
        let delivery_date = self.parse_delivery_date(&delivery_info);

        Some(Order {
            order_number,
            status,
            delivery_info,
            delivery_date,
            description,
            is_delayed,
            price,
            local_image,
            is_archived,
            is_foreign,
        })
    }

    /// Split a page into list items and parse each one. Later repeats of an
    /// order number already seen on the page are dropped.
    pub fn extract(&self, raw: &str, is_archived: bool) -> Vec<Order> {
        let mut seen = HashSet::new();
        raw.split(ITEM_DELIMITER)
            .skip(1)
            .filter_map(|segment| self.parse_segment(segment, is_archived))
            .filter(|order| seen.insert(order.order_number.clone()))
            .collect()
    }
}
