use std::path::{Path, PathBuf};

/// A saved order page and the asset folder the browser wrote next to it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFiles {
    pub html: PathBuf,
    pub assets: Option<PathBuf>,
}

fn sorted_entries(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    paths.sort();
    paths
}

/// Find the first `*.html` file in `dir` and its `<stem>_files` folder. When
/// the folder was renamed, any `*_files` directory is used instead.
pub fn find_source_files(dir: &Path) -> Option<SourceFiles> {
    if !dir.is_dir() {
        return None;
    }
    let entries = sorted_entries(dir);
    let html = entries
        .iter()
        .find(|p| {
            p.is_file()
                && p.extension()
                    .is_some_and(|e| e.eq_ignore_ascii_case("html"))
        })?
        .clone();

    let stem = html.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    let companion = dir.join(format!("{stem}_files"));
    let assets = if companion.is_dir() {
        Some(companion)
    } else {
        entries
            .into_iter()
            .find(|p| {
                p.is_dir()
                    && p.file_name()
                        .is_some_and(|n| n.to_string_lossy().ends_with("_files"))
            })
    };

    Some(SourceFiles { html, assets })
}
