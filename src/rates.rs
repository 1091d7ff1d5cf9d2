use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::ops::Bound;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::{Result, TrackerError};
use crate::models::RateCache;

const LIVE_TIMEOUT: Duration = Duration::from_secs(5);
const HISTORICAL_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = "Mozilla/5.0";

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Where exchange rates come from. The currency pair is fixed per source.
pub trait RateSource {
    /// Latest spot rate.
    fn latest(&self) -> Result<f64>;
    /// Daily rates for every trading day in `from..=to` (ISO dates).
    fn range(&self, from: &str, to: &str) -> Result<BTreeMap<String, f64>>;
}

/// Source used with `--offline`: every request fails, so cached data is used.
pub struct OfflineSource;

impl RateSource for OfflineSource {
    fn latest(&self) -> Result<f64> {
        Err(TrackerError::Other("offline mode".to_string()))
    }

    fn range(&self, _from: &str, _to: &str) -> Result<BTreeMap<String, f64>> {
        Err(TrackerError::Other("offline mode".to_string()))
    }
}

pub struct HttpRateSource {
    client: Client,
    base: String,
    quote: String,
    live_url: String,
    historical_url: String,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    rates: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct RangeResponse {
    #[serde(default)]
    rates: BTreeMap<String, HashMap<String, f64>>,
}

/// Decode a live-quote body like `{"rates": {"EUR": 0.92, ...}}`.
pub fn parse_latest_body(body: &str, quote: &str) -> Result<f64> {
    let data: LatestResponse = serde_json::from_str(body)?;
    data.rates
        .get(quote)
        .copied()
        .ok_or_else(|| TrackerError::Other(format!("no {quote} rate in response")))
}

/// Decode a range body like `{"rates": {"2026-01-02": {"EUR": 0.91}, ...}}`.
/// Days without a quote for `quote` are left out.
pub fn parse_range_body(body: &str, quote: &str) -> Result<BTreeMap<String, f64>> {
    let data: RangeResponse = serde_json::from_str(body)?;
    Ok(data
        .rates
        .into_iter()
        .filter_map(|(date, rates)| rates.get(quote).map(|r| (date, *r)))
        .collect())
}

fn fill_url(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |url, (key, value)| {
        url.replace(&format!("{{{key}}}"), value)
    })
}

impl HttpRateSource {
    pub fn new(base: &str, quote: &str, live_url: &str, historical_url: &str) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base: base.to_string(),
            quote: quote.to_string(),
            live_url: live_url.to_string(),
            historical_url: historical_url.to_string(),
        })
    }

    fn get(&self, url: &str, timeout: Duration) -> Result<String> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()?
            .error_for_status()?;
        Ok(response.text()?)
    }
}

impl RateSource for HttpRateSource {
    fn latest(&self) -> Result<f64> {
        let url = fill_url(&self.live_url, &[("base", &self.base), ("quote", &self.quote)]);
        let body = self.get(&url, LIVE_TIMEOUT)?;
        parse_latest_body(&body, &self.quote)
    }

    fn range(&self, from: &str, to: &str) -> Result<BTreeMap<String, f64>> {
        let url = fill_url(
            &self.historical_url,
            &[
                ("from", from),
                ("to", to),
                ("base", &self.base),
                ("quote", &self.quote),
            ],
        );
        let body = self.get(&url, HISTORICAL_TIMEOUT)?;
        parse_range_body(&body, &self.quote)
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateTier {
    Live,
    Cached,
    Default,
}

impl fmt::Display for RateTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Live => "live",
            Self::Cached => "cached",
            Self::Default => "default",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateQuote {
    pub rate: f64,
    pub tier: RateTier,
}

/// Live rate if the source answers with a positive number, else the cached
/// one, else `default_rate`. Only a usable live answer replaces `cache.current`.
pub fn current_rate(
    source: &dyn RateSource,
    cache: &mut RateCache,
    default_rate: f64,
) -> RateQuote {
    let live = source.latest().and_then(|rate| {
        if rate.is_finite() && rate > 0.0 {
            Ok(rate)
        } else {
            Err(TrackerError::Other(format!("unusable rate {rate}")))
        }
    });
    match live {
        Ok(rate) => {
            cache.current = Some(rate);
            RateQuote {
                rate,
                tier: RateTier::Live,
            }
        }
        Err(e) => {
            log::warn!("Could not fetch current rate: {e}");
            match cache.current {
                Some(rate) => RateQuote {
                    rate,
                    tier: RateTier::Cached,
                },
                None => RateQuote {
                    rate: default_rate,
                    tier: RateTier::Default,
                },
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoricalOutcome {
    /// Every requested date was already cached.
    UpToDate,
    Fetched {
        from: String,
        to: String,
        missing: usize,
    },
    Failed {
        from: String,
        to: String,
    },
}

/// Make sure `cache.historical` covers `dates`, with a single range request
/// spanning the earliest to the latest missing date. Everything returned is
/// kept, in or out of the missing set. A failed request leaves the cache as is.
pub fn historical_rates(
    source: &dyn RateSource,
    cache: &mut RateCache,
    dates: &BTreeSet<String>,
) -> HistoricalOutcome {
    let missing: Vec<&String> = dates
        .iter()
        .filter(|d| !d.is_empty() && !cache.historical.contains_key(*d))
        .collect();
    let (Some(first), Some(last)) = (missing.first(), missing.last()) else {
        return HistoricalOutcome::UpToDate;
    };
    let (from, to) = (first.to_string(), last.to_string());

    match source.range(&from, &to) {
        Ok(rates) => {
            cache.historical.extend(rates);
            HistoricalOutcome::Fetched {
                from,
                to,
                missing: missing.len(),
            }
        }
        Err(e) => {
            log::warn!("Could not fetch historical rates: {e}");
            HistoricalOutcome::Failed { from, to }
        }
    }
}

/// Rate to apply on `date`. Without a date, or without any history, the
/// current rate. Otherwise the exact day, or the closest known day before it;
/// dates before all history use the earliest known day.
pub fn rate_for(date: &str, historical: &BTreeMap<String, f64>, current: f64) -> f64 {
    if date.is_empty() {
        return current;
    }
    if let Some((_, rate)) = historical
        .range::<str, _>((Bound::Unbounded, Bound::Included(date)))
        .next_back()
    {
        return *rate;
    }
    historical
        .first_key_value()
        .map(|(_, rate)| *rate)
        .unwrap_or(current)
}
