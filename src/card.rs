//! Card data model and rendering
//!
//! `CardForm` holds the raw form fields, `CardRequest` is the validated-ish
//! input to a submission, and `RenderedCard` is what ends up on screen. The
//! HTML document is produced by the `templates/card.html` askama template,
//! which escapes every user-provided string.

use askama::Template;
use serde::Serialize;
use url::Url;

use crate::characteristics::parse_characteristics;
use crate::photo::PhotoFile;
use crate::Result;

/// Signature line printed under every card.
pub const SIGNATURE: &str = "Have an amazing day!";

/// Raw form fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardForm {
    pub name: String,
    pub age: String,
    /// Free text, traits separated by `,` or `;`
    pub characteristics: String,
    pub personal_message: String,
}

impl CardForm {
    /// Build a request from the current field values and staged photo.
    pub fn to_request(&self, photo: Option<PhotoFile>) -> CardRequest {
        let personal = self.personal_message.trim();
        CardRequest {
            name: self.name.trim().to_string(),
            age: self.age.trim().to_string(),
            traits: parse_characteristics(&self.characteristics),
            personal_message: (!personal.is_empty()).then(|| personal.to_string()),
            photo,
        }
    }

    /// Clear every field.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Everything needed to render one card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardRequest {
    pub name: String,
    /// Not validated as numeric
    pub age: String,
    /// Lowercased, trimmed, non-empty, in input order
    pub traits: Vec<String>,
    pub personal_message: Option<String>,
    pub photo: Option<PhotoFile>,
}

impl CardRequest {
    pub fn new(name: impl Into<String>, age: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: age.into(),
            ..Default::default()
        }
    }

    pub fn with_traits(mut self, raw: &str) -> Self {
        self.traits = parse_characteristics(raw);
        self
    }

    pub fn with_personal_message(mut self, message: impl Into<String>) -> Self {
        self.personal_message = Some(message.into());
        self
    }

    pub fn with_photo(mut self, photo: PhotoFile) -> Self {
        self.photo = Some(photo);
        self
    }

    /// Name and age are both required.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.age.trim().is_empty()
    }
}

/// Image shown at the top of the card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardImage {
    /// One of the stock pictures
    Stock { url: Url },
    /// The recipient's own photo, embedded
    Photo { media_type: String, data_url: String },
}

impl CardImage {
    /// Value for the `src` attribute.
    pub fn src(&self) -> &str {
        match self {
            CardImage::Stock { url } => url.as_str(),
            CardImage::Photo { data_url, .. } => data_url,
        }
    }

    pub fn is_stock(&self) -> bool {
        matches!(self, CardImage::Stock { .. })
    }
}

/// A card as displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedCard {
    pub image: CardImage,
    pub image_alt: String,
    /// `Dear {name},`
    pub recipient: String,
    /// Body text; may contain newlines
    pub message: String,
    pub signature: String,
}

impl RenderedCard {
    pub fn new(name: &str, image: CardImage, message: String) -> Self {
        Self {
            image,
            image_alt: format!("Birthday celebration for {}", name),
            recipient: format!("Dear {},", name),
            message,
            signature: SIGNATURE.to_string(),
        }
    }

    /// Standalone HTML document for display or rasterization.
    pub fn to_html(&self) -> Result<String> {
        Ok(CardTemplate { card: self, print: false }.render()?)
    }

    /// HTML document that opens the print dialog when loaded.
    pub fn to_print_html(&self) -> Result<String> {
        Ok(CardTemplate { card: self, print: true }.render()?)
    }

    /// Plain-text snapshot of the card.
    pub fn to_text(&self) -> String {
        format!("{}\n\n{}\n\n{}", self.recipient, self.message, self.signature)
    }
}

#[derive(Template)]
#[template(path = "card.html")]
struct CardTemplate<'a> {
    card: &'a RenderedCard,
    print: bool,
}
