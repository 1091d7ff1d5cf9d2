use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::extractor::OrderExtractor;
use crate::models::Order;
use crate::normalizer::{foreign_dates, normalize};
use crate::rate_store::{load_rate_cache, save_rate_cache, CACHE_FILENAME};
use crate::rates::{current_rate, historical_rates, HistoricalOutcome, RateQuote, RateSource};
use crate::report::OrderGroup;
use crate::settings::Settings;
use crate::sources::{find_source_files, SourceFiles};

pub const ACTIVE_DIR: &str = "active";
pub const ARCHIVE_DIR: &str = "archive";
pub const TEMPLATES_DIR: &str = "templates";

/// Orders read from one collection folder (`active/` or `archive/`).
pub struct Collection {
    pub label: &'static str,
    pub source: Option<SourceFiles>,
    pub orders: Vec<Order>,
}

impl Collection {
    pub fn group(&self) -> OrderGroup<'_> {
        OrderGroup {
            orders: &self.orders,
            assets: self.source.as_ref().and_then(|s| s.assets.as_deref()),
        }
    }
}

pub fn load_collection(
    extractor: &OrderExtractor,
    dir: &Path,
    label: &'static str,
    is_archived: bool,
) -> Result<Collection> {
    let Some(source) = find_source_files(dir) else {
        log::info!("No HTML file found in {label}/, skipping");
        return Ok(Collection {
            label,
            source: None,
            orders: Vec::new(),
        });
    };
    let content = std::fs::read_to_string(&source.html)?;
    let orders = extractor.extract(&content, is_archived);
    Ok(Collection {
        label,
        source: Some(source),
        orders,
    })
}

/// Everything a run produced before rendering.
pub struct Prepared {
    pub active: Collection,
    pub archive: Collection,
    pub quote: RateQuote,
    pub historical: HistoricalOutcome,
    pub converted: usize,
    /// Archived orders dropped because the active page lists them too.
    pub duplicates: usize,
    pub cache_path: PathBuf,
}

impl Prepared {
    pub fn total_orders(&self) -> usize {
        self.active.orders.len() + self.archive.orders.len()
    }

    pub fn total_price(&self) -> f64 {
        self.orders().map(|o| o.price).sum()
    }

    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.active.orders.iter().chain(self.archive.orders.iter())
    }
}

/// Read both collections, resolve rates, convert foreign prices and persist
/// the rate cache.
pub fn prepare(base_dir: &Path, settings: &Settings, source: &dyn RateSource) -> Result<Prepared> {
    let cache_path = base_dir.join(CACHE_FILENAME);
    let mut cache = load_rate_cache(&cache_path);
    let quote = current_rate(source, &mut cache, settings.default_rate);

    let extractor = OrderExtractor::new(settings.reference_year())?;
    let mut active = load_collection(&extractor, &base_dir.join(ACTIVE_DIR), ACTIVE_DIR, false)?;
    let mut archive = load_collection(&extractor, &base_dir.join(ARCHIVE_DIR), ARCHIVE_DIR, true)?;

    let active_numbers: HashSet<&str> = active
        .orders
        .iter()
        .map(|o| o.order_number.as_str())
        .collect();
    let before = archive.orders.len();
    archive
        .orders
        .retain(|o| !active_numbers.contains(o.order_number.as_str()));
    let duplicates = before - archive.orders.len();

    let mut dates = foreign_dates(&active.orders);
    dates.extend(foreign_dates(&archive.orders));
    let historical = historical_rates(source, &mut cache, &dates);

    let mut converted = normalize(&mut active.orders, quote.rate, &cache.historical);
    converted += normalize(&mut archive.orders, quote.rate, &cache.historical);

    save_rate_cache(&cache_path, &cache)?;

    Ok(Prepared {
        active,
        archive,
        quote,
        historical,
        converted,
        duplicates,
        cache_path,
    })
}
