use std::path::Path;

use crate::cli::resolve_base_dir;
use crate::error::Result;
use crate::settings::{load_settings, settings_path};
use crate::sources::find_source_files;
use crate::tracker::{ACTIVE_DIR, ARCHIVE_DIR};

fn describe(dir: &Path) -> String {
    match find_source_files(dir) {
        Some(found) => {
            let assets = found
                .assets
                .as_ref()
                .map(|a| a.display().to_string())
                .unwrap_or_else(|| "(no images folder)".to_string());
            format!("{} + {}", found.html.display(), assets)
        }
        None => "(no HTML file)".to_string(),
    }
}

pub fn run(base_dir: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let base_dir = resolve_base_dir(base_dir, &settings);
    let settings_file = settings_path();

    println!(
        "Settings:    {}{}",
        settings_file.display(),
        if settings_file.exists() { "" } else { " (not found, using defaults)" }
    );
    println!("Base dir:    {}", base_dir.display());
    println!("Output:      {}", base_dir.join(&settings.output_filename).display());
    println!("Currency:    {} -> {}", settings.base_currency, settings.quote_currency);
    println!("Ref. year:   {}", settings.reference_year());
    println!();
    println!("Active:      {}", describe(&base_dir.join(ACTIVE_DIR)));
    println!("Archive:     {}", describe(&base_dir.join(ARCHIVE_DIR)));
    Ok(())
}
