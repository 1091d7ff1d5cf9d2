pub mod generate;
pub mod list;
pub mod rates;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::rates::{HttpRateSource, OfflineSource, RateSource};
use crate::settings::{shellexpand_path, Settings};

#[derive(Parser)]
#[command(
    name = "ordertrack",
    about = "Turn a saved AliExpress order list into a standalone HTML tracker."
)]
pub struct Cli {
    /// Folder holding active/, archive/ and the rate cache (default from settings)
    #[arg(long = "base-dir", global = true)]
    pub base_dir: Option<String>,
    /// Skip all network requests and use cached or default rates
    #[arg(long, global = true)]
    pub offline: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the HTML report (the default when no command is given).
    Generate {
        /// Output file (default: <base-dir>/<output_filename>)
        #[arg(long)]
        output: Option<String>,
    },
    /// Print the extracted orders as a table.
    List {
        /// Show only orders from archive/
        #[arg(long, conflicts_with = "active")]
        archived: bool,
        /// Show only orders from active/
        #[arg(long)]
        active: bool,
    },
    /// Show the cached exchange rates.
    Rates {
        /// Fetch the current rate before showing the cache
        #[arg(long)]
        refresh: bool,
    },
    /// Show settings and which source pages were found.
    Status,
}

pub(crate) fn resolve_base_dir(flag: Option<&str>, settings: &Settings) -> PathBuf {
    shellexpand_path(flag.unwrap_or(&settings.base_dir))
}

pub(crate) fn rate_source(settings: &Settings, offline: bool) -> Result<Box<dyn RateSource>> {
    if offline {
        return Ok(Box::new(OfflineSource));
    }
    Ok(Box::new(HttpRateSource::new(
        &settings.base_currency,
        &settings.quote_currency,
        &settings.live_rate_url,
        &settings.historical_rate_url,
    )?))
}
