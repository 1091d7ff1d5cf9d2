use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::error::Result;
use crate::models::RateCache;

pub const CACHE_FILENAME: &str = "exchange_rate_cache.json";

/// Decode a cache document. Older files stored a single `{"rate": X}`; those
/// become `{"current": X, "historical": {}}`. Entries that are not numbers are
/// dropped one by one; only a document that is not an object is an empty cache.
pub fn parse_rate_cache(content: &str) -> RateCache {
    let Ok(raw) = serde_json::from_str::<Value>(content) else {
        return RateCache::default();
    };
    let Some(obj) = raw.as_object() else {
        return RateCache::default();
    };
    if obj.contains_key("rate") && !obj.contains_key("current") {
        return RateCache {
            current: obj.get("rate").and_then(Value::as_f64),
            historical: BTreeMap::new(),
        };
    }
    let historical = obj
        .get("historical")
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|(date, rate)| rate.as_f64().map(|r| (date.clone(), r)))
                .collect()
        })
        .unwrap_or_default();
    RateCache {
        current: obj.get("current").and_then(Value::as_f64),
        historical,
    }
}

pub fn load_rate_cache(path: &Path) -> RateCache {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_rate_cache(&content),
        Err(_) => RateCache::default(),
    }
}

pub fn save_rate_cache(path: &Path, cache: &RateCache) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(cache)?;
    std::fs::write(path, json)?;
    Ok(())
}
