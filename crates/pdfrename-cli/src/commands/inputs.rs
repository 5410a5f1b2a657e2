//! Expansion of command line inputs into PDF paths.

use std::path::{Path, PathBuf};

use glob::glob;
use tracing::warn;

/// Turn each input into paths: existing files are taken as-is, anything else
/// is treated as a glob pattern. Patterns only pick up `.pdf` files.
pub fn expand(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let path = Path::new(input);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }

        let matched: Vec<PathBuf> = glob(input)?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file() && is_pdf(p))
            .collect();

        if matched.is_empty() {
            warn!("No matching files found for {}", input);
        }
        files.extend(matched);
    }

    Ok(files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}
