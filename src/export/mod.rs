//! Card export
//!
//! Exporting first asks a [`Rasterizer`] for a PNG snapshot of the card and
//! saves it as `birthday-card-<unix-ms>.png`. When no rasterizer is available,
//! or it fails, or the PNG cannot be written, the [`Printer`] fallback runs
//! instead. There is no retry.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::card::RenderedCard;
use crate::{Error, Result};

#[cfg(feature = "cdp")]
pub mod cdp;
pub mod print;

pub use print::HtmlPrinter;

/// Options passed to the rasterizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterOptions {
    /// Device pixel ratio of the snapshot
    pub scale: f64,
    /// Whether images from other origins may be loaded
    pub allow_cross_origin: bool,
    /// CSS background color behind the card
    pub background: String,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            allow_cross_origin: true,
            background: "#ffffff".to_string(),
        }
    }
}

/// Turns a rendered card document into PNG bytes.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, html: &str, options: &RasterOptions) -> Result<Vec<u8>>;
}

/// Last-resort export path.
pub trait Printer: Send + Sync {
    /// Hand the card to the print path. Returns where the printable artifact
    /// was placed.
    fn print(&self, card: &RenderedCard, dir: &Path, timestamp_ms: u128) -> Result<PathBuf>;
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum ExportOutcome {
    /// A PNG was written
    Downloaded(PathBuf),
    /// The print fallback ran
    Printed(PathBuf),
}

impl ExportOutcome {
    pub fn path(&self) -> &Path {
        match self {
            ExportOutcome::Downloaded(p) | ExportOutcome::Printed(p) => p,
        }
    }
}

/// File name of a PNG export.
pub fn artifact_name(timestamp_ms: u128) -> String {
    format!("birthday-card-{}.png", timestamp_ms)
}

/// Milliseconds since the Unix epoch.
pub fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Export `card` into `dir`.
pub async fn export_card(
    card: &RenderedCard,
    rasterizer: Option<&dyn Rasterizer>,
    printer: &dyn Printer,
    dir: &Path,
    options: &RasterOptions,
    timestamp_ms: u128,
) -> Result<ExportOutcome> {
    let Some(rasterizer) = rasterizer else {
        info!("No rasterizer available, printing instead");
        return printer.print(card, dir, timestamp_ms).map(ExportOutcome::Printed);
    };

    match rasterize_to_file(card, rasterizer, dir, options, timestamp_ms).await {
        Ok(path) => {
            info!("Exported card to {}", path.display());
            Ok(ExportOutcome::Downloaded(path))
        }
        Err(e) => {
            warn!("Image export failed ({}), printing instead", e);
            printer.print(card, dir, timestamp_ms).map(ExportOutcome::Printed)
        }
    }
}

async fn rasterize_to_file(
    card: &RenderedCard,
    rasterizer: &dyn Rasterizer,
    dir: &Path,
    options: &RasterOptions,
    timestamp_ms: u128,
) -> Result<PathBuf> {
    let html = card.to_html()?;
    let png = rasterizer.rasterize(&html, options).await?;
    if png.is_empty() {
        return Err(Error::RasterError("rasterizer returned no data".into()));
    }

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(artifact_name(timestamp_ms));
    tokio::fs::write(&path, &png).await?;
    Ok(path)
}
