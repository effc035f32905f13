//! View surface driven by the card controller
//!
//! The controller never touches a concrete UI. It calls into a [`CardView`],
//! which a frontend implements. `NoopView` ignores everything, `RecordingView`
//! keeps an event log for tests and `HtmlFileView` writes the rendered card to
//! disk.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::card::RenderedCard;

/// UI operations the controller needs.
pub trait CardView: Send {
    /// Fill the card elements and make the card section visible.
    fn show_card(&mut self, card: &RenderedCard);
    /// Hide the card section.
    fn hide_card(&mut self);
    fn scroll_card_into_view(&mut self);
    fn scroll_to_top(&mut self);
    /// Raise the inline photo-type error.
    fn show_photo_error(&mut self, message: &str);
    fn clear_photo_error(&mut self);
    /// Disable (`true`) or re-enable (`false`) the export control.
    fn set_export_busy(&mut self, busy: bool);
}

/// View that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopView;

impl NoopView {
    pub fn new() -> Self {
        NoopView
    }
}

impl CardView for NoopView {
    fn show_card(&mut self, _card: &RenderedCard) {}
    fn hide_card(&mut self) {}
    fn scroll_card_into_view(&mut self) {}
    fn scroll_to_top(&mut self) {}
    fn show_photo_error(&mut self, _message: &str) {}
    fn clear_photo_error(&mut self) {}
    fn set_export_busy(&mut self, _busy: bool) {}
}

/// A single call recorded by [`RecordingView`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    ShowCard(Box<RenderedCard>),
    HideCard,
    ScrollCardIntoView,
    ScrollToTop,
    PhotoError(String),
    ClearPhotoError,
    ExportBusy(bool),
}

/// View that records every call, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingView {
    events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    /// Whether the photo error indicator is currently raised.
    pub fn photo_error_visible(&self) -> bool {
        self.events
            .iter()
            .rev()
            .find_map(|e| match e {
                ViewEvent::PhotoError(_) => Some(true),
                ViewEvent::ClearPhotoError => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// The most recently shown card, if it is still visible.
    pub fn visible_card(&self) -> Option<&RenderedCard> {
        self.events.iter().rev().find_map(|e| match e {
            ViewEvent::ShowCard(card) => Some(Some(card.as_ref())),
            ViewEvent::HideCard => Some(None),
            _ => None,
        })?
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl CardView for RecordingView {
    fn show_card(&mut self, card: &RenderedCard) {
        self.events.push(ViewEvent::ShowCard(Box::new(card.clone())));
    }

    fn hide_card(&mut self) {
        self.events.push(ViewEvent::HideCard);
    }

    fn scroll_card_into_view(&mut self) {
        self.events.push(ViewEvent::ScrollCardIntoView);
    }

    fn scroll_to_top(&mut self) {
        self.events.push(ViewEvent::ScrollToTop);
    }

    fn show_photo_error(&mut self, message: &str) {
        self.events.push(ViewEvent::PhotoError(message.to_string()));
    }

    fn clear_photo_error(&mut self) {
        self.events.push(ViewEvent::ClearPhotoError);
    }

    fn set_export_busy(&mut self, busy: bool) {
        self.events.push(ViewEvent::ExportBusy(busy));
    }
}

/// View that writes the card document to a file whenever it is shown.
///
/// Hiding the card removes the file. Photo errors are logged and kept until
/// cleared.
///
/// [`CardView`] is synchronous, so the write and remove use blocking
/// `std::fs` calls. The document is a few kilobytes plus an embedded photo.
#[derive(Debug, Clone)]
pub struct HtmlFileView {
    path: PathBuf,
    written: bool,
    photo_error: Option<String>,
}

impl HtmlFileView {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            written: false,
            photo_error: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file currently holds a shown card.
    pub fn is_written(&self) -> bool {
        self.written
    }

    /// The photo error currently raised, if any.
    pub fn photo_error(&self) -> Option<&str> {
        self.photo_error.as_deref()
    }
}

impl CardView for HtmlFileView {
    fn show_card(&mut self, card: &RenderedCard) {
        let html = match card.to_html() {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to render card document: {}", e);
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("Failed to create {}: {}", parent.display(), e);
                return;
            }
        }
        match std::fs::write(&self.path, html) {
            Ok(()) => {
                self.written = true;
                info!("Card written to {}", self.path.display());
            }
            Err(e) => warn!("Failed to write {}: {}", self.path.display(), e),
        }
    }

    fn hide_card(&mut self) {
        if self.written {
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!("Failed to remove {}: {}", self.path.display(), e);
            }
            self.written = false;
        }
    }

    fn scroll_card_into_view(&mut self) {}

    fn scroll_to_top(&mut self) {}

    fn show_photo_error(&mut self, message: &str) {
        warn!("{}", message);
        self.photo_error = Some(message.to_string());
    }

    fn clear_photo_error(&mut self) {
        self.photo_error = None;
    }

    fn set_export_busy(&mut self, _busy: bool) {}
}
