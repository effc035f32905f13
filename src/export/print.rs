/// Print fallback that writes a self-printing HTML document

use std::path::{Path, PathBuf};

use log::info;

use super::Printer;
use crate::card::RenderedCard;
use crate::{Error, Result};

/// Writes `birthday-card-<ms>-print.html`, which opens the print dialog as
/// soon as it is loaded in a browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlPrinter;

impl HtmlPrinter {
    pub fn new() -> Self {
        HtmlPrinter
    }
}

impl Printer for HtmlPrinter {
    fn print(&self, card: &RenderedCard, dir: &Path, timestamp_ms: u128) -> Result<PathBuf> {
        let html = card.to_print_html()?;
        std::fs::create_dir_all(dir)
            .map_err(|e| Error::PrintError(format!("{}: {}", dir.display(), e)))?;
        let path = dir.join(format!("birthday-card-{}-print.html", timestamp_ms));
        std::fs::write(&path, html).map_err(|e| Error::PrintError(format!("{}: {}", path.display(), e)))?;
        info!("Printable card written to {}", path.display());
        Ok(path)
    }
}
