//! Card view-state controller
//!
//! The controller sits between the form and the rendered card and owns the
//! Hidden/Visible state:
//!
//! ```text
//! Hidden --submit(valid)--> Visible
//! Visible --reset--------> Hidden
//! ```
//!
//! An incomplete submission (blank name or age) changes nothing. Submitting
//! again while visible re-renders the card in place.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::card::{CardForm, CardImage, CardRequest, RenderedCard};
use crate::composer::resolve_message;
use crate::export::{export_card, unix_millis, ExportOutcome, HtmlPrinter, Printer, Rasterizer};
use crate::photo::{to_data_url, PhotoFile, PhotoSelection};
use crate::stock::pick_stock_image;
use crate::view::{CardView, NoopView};
use crate::{CardConfig, Error, Result};

/// Whether the card section is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardViewState {
    #[default]
    Hidden,
    Visible,
}

/// Drives the card view from user actions.
pub struct CardController<V: CardView = NoopView> {
    config: CardConfig,
    state: CardViewState,
    form: CardForm,
    photo: PhotoSelection,
    card: Option<RenderedCard>,
    rng: StdRng,
    view: V,
    rasterizer: Option<Box<dyn Rasterizer>>,
    printer: Box<dyn Printer>,
}

impl<V: CardView> CardController<V> {
    /// Create a controller in the Hidden state.
    ///
    /// A configured seed makes every random choice reproducible; without one
    /// the generator is seeded from the OS.
    pub fn new(config: CardConfig, view: V) -> Result<Self> {
        if config.stock_images.is_empty() {
            return Err(Error::ConfigError("stock image pool is empty".into()));
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            config,
            state: CardViewState::Hidden,
            form: CardForm::default(),
            photo: PhotoSelection::new(),
            card: None,
            rng,
            view,
            rasterizer: None,
            printer: Box::new(HtmlPrinter::new()),
        })
    }

    /// Use `rasterizer` for image export.
    pub fn with_rasterizer(mut self, rasterizer: Box<dyn Rasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    /// Replace the print fallback.
    pub fn with_printer(mut self, printer: Box<dyn Printer>) -> Self {
        self.printer = printer;
        self
    }

    pub fn state(&self) -> CardViewState {
        self.state
    }

    /// The card currently shown, if any.
    pub fn card(&self) -> Option<&RenderedCard> {
        self.card.as_ref()
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn form(&self) -> &CardForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CardForm {
        &mut self.form
    }

    pub fn photo_selection(&self) -> &PhotoSelection {
        &self.photo
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn has_rasterizer(&self) -> bool {
        self.rasterizer.is_some()
    }

    /// Stage a photo from the file picker, or clear the selection with `None`.
    ///
    /// A rejected file clears the selection, raises the inline error and
    /// returns [`Error::InvalidPhoto`]. The rest of the form is unaffected.
    pub fn select_photo(&mut self, file: Option<PhotoFile>) -> Result<()> {
        match self.photo.select(file) {
            Ok(()) => {
                self.view.clear_photo_error();
                Ok(())
            }
            Err(e) => {
                self.view.show_photo_error(&e.to_string());
                Err(e)
            }
        }
    }

    /// Submit the current form fields together with the staged photo.
    pub async fn submit_form(&mut self) -> bool {
        let request = self.form.to_request(self.photo.staged().cloned());
        self.submit(request).await
    }

    /// Render a card from `request`.
    ///
    /// Returns `false` without any effect when name or age is blank. The photo,
    /// if any, is read before the card is shown; an unreadable or invalid photo
    /// is replaced by a stock image.
    pub async fn submit(&mut self, request: CardRequest) -> bool {
        if !request.is_complete() {
            debug!("ignoring submission without name or age");
            return false;
        }

        let name = request.name.trim();
        let age = request.age.trim();
        let message = resolve_message(
            name,
            age,
            &request.traits,
            request.personal_message.as_deref(),
            &mut self.rng,
        );

        let image = match self.photo_image(request.photo.as_ref()).await {
            Some(image) => image,
            None => match pick_stock_image(&self.config.stock_images, &mut self.rng) {
                Some(url) => CardImage::Stock { url: url.clone() },
                None => {
                    warn!("no stock image available, card not rendered");
                    return false;
                }
            },
        };

        let card = RenderedCard::new(name, image, message);
        self.view.show_card(&card);
        self.view.scroll_card_into_view();
        self.card = Some(card);
        if self.state != CardViewState::Visible {
            info!("card shown for {}", name);
        }
        self.state = CardViewState::Visible;
        true
    }

    async fn photo_image(&self, photo: Option<&PhotoFile>) -> Option<CardImage> {
        let photo = photo?;
        if !photo.is_accepted() {
            warn!("ignoring unsupported photo {}", photo.file_name);
            return None;
        }
        match photo.read().await {
            Ok(bytes) => {
                let media_type = photo.embed_media_type(&bytes);
                Some(CardImage::Photo {
                    media_type: media_type.to_string(),
                    data_url: to_data_url(media_type, &bytes),
                })
            }
            Err(e) => {
                warn!("{}; using a stock image", e);
                None
            }
        }
    }

    /// Hide the card and clear the form, photo selection and error indicator.
    pub fn reset(&mut self) {
        self.view.hide_card();
        self.form.reset();
        self.photo.clear();
        self.view.clear_photo_error();
        self.card = None;
        if self.state != CardViewState::Hidden {
            info!("card hidden");
        }
        self.state = CardViewState::Hidden;
        self.view.scroll_to_top();
    }

    /// Export the visible card as a PNG, falling back to print.
    ///
    /// The export control is disabled for the duration and re-enabled
    /// afterwards whatever the outcome.
    pub async fn export_image(&mut self) -> Result<ExportOutcome> {
        let card = match (&self.card, self.state) {
            (Some(card), CardViewState::Visible) => card,
            _ => return Err(Error::NoCardRendered),
        };

        self.view.set_export_busy(true);
        let outcome = export_card(
            card,
            self.rasterizer.as_deref(),
            self.printer.as_ref(),
            &self.config.output_dir,
            &self.config.raster,
            unix_millis(),
        )
        .await;
        self.view.set_export_busy(false);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::RecordingView;

    fn controller() -> CardController<RecordingView> {
        let config = CardConfig {
            seed: Some(11),
            ..Default::default()
        };
        CardController::new(config, RecordingView::new()).expect("controller")
    }

    #[tokio::test]
    async fn starts_hidden() {
        let c = controller();
        assert_eq!(c.state(), CardViewState::Hidden);
        assert!(c.card().is_none());
    }

    #[tokio::test]
    async fn blank_name_is_ignored() {
        let mut c = controller();
        assert!(!c.submit(CardRequest::new("", "30")).await);
        assert_eq!(c.state(), CardViewState::Hidden);
        assert!(c.view().events().is_empty());
    }

    #[tokio::test]
    async fn blank_age_is_ignored_while_visible() {
        let mut c = controller();
        assert!(c.submit(CardRequest::new("Sam", "30")).await);
        let before = c.card().cloned();

        assert!(!c.submit(CardRequest::new("Alex", " ")).await);
        assert_eq!(c.state(), CardViewState::Visible);
        assert_eq!(c.card().cloned(), before);
    }

    #[tokio::test]
    async fn resubmit_while_visible_rerenders() {
        let mut c = controller();
        c.submit(CardRequest::new("Sam", "30")).await;
        c.submit(CardRequest::new("Alex", "40")).await;
        assert_eq!(c.state(), CardViewState::Visible);
        assert_eq!(c.card().map(|card| card.recipient.as_str()), Some("Dear Alex,"));
    }

    #[tokio::test]
    async fn same_seed_same_card() {
        let req = CardRequest::new("Sam", "30").with_traits("kind, funny, brave");
        let mut a = controller();
        let mut b = controller();
        a.submit(req.clone()).await;
        b.submit(req).await;
        assert_eq!(a.card(), b.card());
    }

    #[test]
    fn empty_stock_pool_is_rejected() {
        let config = CardConfig {
            stock_images: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(
            CardController::new(config, NoopView::new()),
            Err(Error::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn export_without_card_fails() {
        let mut c = controller();
        assert!(matches!(c.export_image().await, Err(Error::NoCardRendered)));
        assert!(c.view().events().is_empty());
    }
}
