use colored::Colorize;

use crate::cli::{rate_source, resolve_base_dir};
use crate::error::Result;
use crate::fmt::euros;
use crate::rates::HistoricalOutcome;
use crate::report::{generate_html, Templates};
use crate::settings::{load_settings, shellexpand_path};
use crate::tracker::{prepare, Prepared, TEMPLATES_DIR};

pub(crate) fn print_rate_summary(prepared: &Prepared, base: &str, quote: &str) {
    println!(
        "Current {base}/{quote} rate: {} ({})",
        prepared.quote.rate, prepared.quote.tier
    );
    match &prepared.historical {
        HistoricalOutcome::UpToDate => {}
        HistoricalOutcome::Fetched { from, to, missing } => {
            println!("Fetched historical rates: {from} to {to} ({missing} dates)");
        }
        HistoricalOutcome::Failed { from, to } => {
            let msg = format!(
                "Historical rates for {from} to {to} unavailable, using nearest known rates"
            );
            println!("{}", msg.yellow());
        }
    }
    for collection in [&prepared.active, &prepared.archive] {
        match &collection.source {
            Some(source) => println!(
                "Found {} orders in {}/ ({})",
                collection.orders.len(),
                collection.label,
                source
                    .html
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default()
            ),
            None => println!("No HTML file found in {}/ folder, skipping.", collection.label),
        }
    }
    if prepared.duplicates > 0 {
        println!(
            "{} archived orders also listed in active/, kept the active copy",
            prepared.duplicates
        );
    }
}

pub fn run(base_dir: Option<&str>, offline: bool, output: Option<&str>) -> Result<()> {
    let settings = load_settings();
    settings.validate()?;
    let base_dir = resolve_base_dir(base_dir, &settings);
    let source = rate_source(&settings, offline)?;

    let prepared = prepare(&base_dir, &settings, source.as_ref())?;
    log::debug!("Rate cache written to {}", prepared.cache_path.display());
    print_rate_summary(&prepared, &settings.base_currency, &settings.quote_currency);

    if prepared.total_orders() == 0 {
        println!("No orders found in active/ or archive/ folders.");
        return Ok(());
    }

    let templates = Templates::load(&base_dir.join(TEMPLATES_DIR))?;
    let html = generate_html(&templates, &[prepared.active.group(), prepared.archive.group()]);

    let output_path = match output {
        Some(p) => shellexpand_path(p),
        None => base_dir.join(&settings.output_filename),
    };
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output_path, html)?;

    println!();
    println!("HTML file saved to: {}", output_path.display().to_string().bold());
    println!(
        "{} orders total ({} active, {} archived), total: {}",
        prepared.total_orders(),
        prepared.active.orders.len(),
        prepared.archive.orders.len(),
        euros(prepared.total_price()).green().bold()
    );
    Ok(())
}
