//! Dump text boxes, for writing new extractors.

use std::path::PathBuf;

use console::style;
use tracing::warn;

use pdfrename_core::pdf::decode_text_string;
use pdfrename_core::{Document, RenameConfig};

pub fn run(files: &[PathBuf], config: &RenameConfig) -> anyhow::Result<()> {
    for path in files {
        let document = match Document::open_with(path, &config.pdf) {
            Ok(document) => document,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };

        println!("{} {}", style("==").bold(), path.display());
        for (key, value) in [
            ("Producer", document.producer()),
            ("Creator", document.creator()),
            ("Subject", document.subject()),
        ] {
            if let Some(value) = value {
                println!("# {}: {:?}", key, decode_text_string(value));
            }
        }
        if let Some(date) = document.creation_date() {
            println!("# CreationDate: {}", date.to_rfc3339());
        }

        match document.page(1) {
            Ok(page) => {
                for (index, text_box) in page.iter().enumerate() {
                    println!("{index}: {text_box:?}");
                }
            }
            Err(e) => warn!("{}", e),
        }
    }

    Ok(())
}
