use crate::cli::{rate_source, resolve_base_dir};
use crate::error::Result;
use crate::rate_store::{load_rate_cache, save_rate_cache, CACHE_FILENAME};
use crate::rates::current_rate;
use crate::settings::load_settings;

pub fn run(base_dir: Option<&str>, offline: bool, refresh: bool) -> Result<()> {
    let settings = load_settings();
    settings.validate()?;
    let base_dir = resolve_base_dir(base_dir, &settings);
    let cache_path = base_dir.join(CACHE_FILENAME);
    let mut cache = load_rate_cache(&cache_path);
    let pair = format!("{}/{}", settings.base_currency, settings.quote_currency);

    if refresh {
        let source = rate_source(&settings, offline)?;
        let quote = current_rate(source.as_ref(), &mut cache, settings.default_rate);
        println!("Current {pair} rate: {} ({})", quote.rate, quote.tier);
        save_rate_cache(&cache_path, &cache)?;
    }

    println!("Cache:       {}", cache_path.display());
    match cache.current {
        Some(rate) => println!("Current:     {rate}"),
        None => println!("Current:     (not cached, default {})", settings.default_rate),
    }
    match (cache.historical.first_key_value(), cache.historical.last_key_value()) {
        (Some((first, _)), Some((last, _))) => println!(
            "Historical:  {} days, {first} to {last}",
            cache.historical.len()
        ),
        _ => println!("Historical:  (none)"),
    }
    Ok(())
}
