//! The rename command: name each file, then print or perform the rename.

use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use tracing::{debug, error, info, warn};

use pdfrename_core::{builtin_registry, find_filename_with, RenameConfig, RenameError};

/// Options for the rename command.
pub struct RenameArgs {
    /// Move the files rather than print `ren` commands.
    pub rename: bool,
    /// Print a marker for files left alone.
    pub list_all: bool,
}

pub fn run(files: &[PathBuf], args: &RenameArgs, config: &RenameConfig) -> anyhow::Result<()> {
    let registry = builtin_registry();
    debug!("{} extractors registered", registry.len());

    for path in files {
        debug!("Analysing {}", path.display());

        let new_basename = match find_filename_with(path, &registry, config) {
            Ok(Some(name)) => name,
            Ok(None) => {
                debug!("No match for {}", path.display());
                list_unrenamed(args, path);
                continue;
            }
            Err(RenameError::Document(e)) => {
                warn!("Skipping {}: {}", path.display(), e);
                list_unrenamed(args, path);
                continue;
            }
            Err(RenameError::Dispatch(e)) => {
                error!("{}", e);
                list_unrenamed(args, path);
                continue;
            }
            Err(RenameError::Render(e)) => {
                error!("Unable to rename {}: {}", path.display(), e);
                list_unrenamed(args, path);
                continue;
            }
            Err(e) => {
                error!("Failed to process {}: {}", path.display(), e);
                continue;
            }
        };

        let new_path = path.with_file_name(&new_basename);
        if new_path == *path {
            if args.list_all {
                println!("# {} {}", style("✓").green(), path.display());
            }
            continue;
        }

        if args.rename {
            if new_path.exists() {
                warn!("File {} already exists, not overwriting.", new_path.display());
                continue;
            }
            info!("Renaming {} to {}", path.display(), new_path.display());
            if args.list_all {
                println!("# {:?} → {:?}", path, new_path);
            }
            if let Err(e) = fs::rename(path, &new_path) {
                error!("Failed to rename {}: {}", path.display(), e);
            }
        } else {
            println!("ren \"{}\" \"{}\"", path.display(), new_path.display());
        }
    }

    Ok(())
}

fn list_unrenamed(args: &RenameArgs, path: &Path) {
    if args.list_all {
        println!("# {} {}", style("?").yellow(), path.display());
    }
}
