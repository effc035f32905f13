//! Birthday Card
//!
//! Builds a personalized birthday card from a name, an age, optional traits,
//! an optional personal message and an optional photo, renders it as an HTML
//! document and exports it as a PNG image (or a printable page when no
//! rasterizer is available).
//!
//! # Features
//!
//! - **Composer**: turns free-text traits into varied sentences from a
//!   shuffled template pool, with injectable randomness
//! - **Controller**: Hidden/Visible card state driven by submit, reset,
//!   photo selection and export actions
//! - **CDP export** (`cdp` feature): rasterizes cards through headless Chrome
//!
//! # Example
//!
//! ```no_run
//! use birthday_card::{CardConfig, CardController, CardRequest, NoopView};
//!
//! # async fn run() -> birthday_card::Result<()> {
//! let config = CardConfig {
//!     seed: Some(7),
//!     ..Default::default()
//! };
//! let mut controller = CardController::new(config, NoopView::new())?;
//! controller
//!     .submit(CardRequest::new("Sam", "30").with_traits("kind, funny"))
//!     .await;
//! println!("{}", controller.card().map(|c| c.to_text()).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

pub mod error;
pub use error::{Error, Result};

pub mod card;
pub mod characteristics;
pub mod composer;
pub mod controller;
pub mod export;
pub mod photo;
pub mod stock;
pub mod view;

pub use card::{CardForm, CardImage, CardRequest, RenderedCard};
pub use controller::{CardController, CardViewState};
pub use export::{ExportOutcome, Printer, RasterOptions, Rasterizer};
pub use photo::PhotoFile;
pub use view::{CardView, HtmlFileView, NoopView, RecordingView};

/// Configuration for card generation
///
/// Defaults are usable as-is: output goes to the current directory, every
/// random choice uses OS entropy and the built-in stock images are used.
///
/// # Examples
///
/// ```
/// let cfg = birthday_card::CardConfig::default();
/// assert_eq!(cfg.stock_images.len(), 5);
/// assert_eq!(cfg.raster.scale, 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Directory receiving the card document and exports
    pub output_dir: PathBuf,
    /// Seed for template shuffling and image picks (`None` => OS entropy)
    pub seed: Option<u64>,
    /// Images used when no photo is supplied
    pub stock_images: Vec<Url>,
    /// Rasterization options for image export
    pub raster: RasterOptions,
    /// Whether the CLI writes the card document to `output_dir`
    pub write_card_html: bool,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            seed: None,
            stock_images: stock::default_stock_images(),
            raster: RasterOptions::default(),
            write_card_html: true,
        }
    }
}

impl CardConfig {
    /// Load a JSON config file. Missing keys take their default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::ConfigError(e.to_string()))
    }
}
