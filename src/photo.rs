//! Photo selection, validation and loading
//!
//! A photo is accepted when its declared media type is JPEG/PNG *or* its file
//! name carries a `.jpg`, `.jpeg` or `.png` extension. Either check alone is
//! enough, so a mislabeled file with the right name passes, as does a
//! correctly typed file with an odd name.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use log::debug;

use crate::{Error, Result};

/// Message surfaced when a selected file is rejected.
pub const PHOTO_ERROR_MESSAGE: &str = "Please choose a JPG or PNG image.";

/// Media types accepted by [`is_accepted_photo`].
pub const ACCEPTED_MEDIA_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// File extensions accepted by [`is_accepted_photo`], without the dot.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Where the photo's bytes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum PhotoData {
    /// Read lazily from disk when the card is submitted
    File(PathBuf),
    /// Already in memory
    Bytes(Vec<u8>),
}

/// A file picked by the user, as the file picker reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoFile {
    /// Name of the file, including extension
    pub file_name: String,
    /// Media type declared for the file, if any
    pub media_type: Option<String>,
    /// Contents
    pub data: PhotoData,
}

impl PhotoFile {
    /// Describe an on-disk file. The file name is taken from the last path
    /// component.
    pub fn from_path(path: impl Into<PathBuf>, media_type: Option<String>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            file_name,
            media_type,
            data: PhotoData::File(path),
        }
    }

    /// Describe an in-memory file.
    pub fn from_bytes(file_name: impl Into<String>, media_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type,
            data: PhotoData::Bytes(bytes),
        }
    }

    /// Whether this file passes the type-or-extension check.
    pub fn is_accepted(&self) -> bool {
        is_accepted_photo(&self.file_name, self.media_type.as_deref())
    }

    /// Load the photo into memory.
    pub async fn read(&self) -> Result<Vec<u8>> {
        match &self.data {
            PhotoData::Bytes(bytes) => Ok(bytes.clone()),
            PhotoData::File(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|e| Error::PhotoRead(format!("{}: {}", path.display(), e)))?;
                debug!("read {} bytes from {}", bytes.len(), path.display());
                Ok(bytes)
            }
        }
    }

    /// Media type to embed in a data URL for these bytes.
    ///
    /// Preference order: an accepted declared type, the type implied by the
    /// extension, the sniffed type, then PNG.
    pub fn embed_media_type(&self, bytes: &[u8]) -> &'static str {
        if let Some(declared) = self.media_type.as_deref() {
            if let Some(t) = ACCEPTED_MEDIA_TYPES
                .iter()
                .copied()
                .find(|t| t.eq_ignore_ascii_case(declared.trim()))
            {
                return t;
            }
        }
        match extension_of(&self.file_name).as_deref() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            _ => sniff_media_type(bytes).unwrap_or("image/png"),
        }
    }
}

/// Check a file against the accepted media types and extensions.
///
/// Matching is case-insensitive and either criterion suffices.
pub fn is_accepted_photo(file_name: &str, media_type: Option<&str>) -> bool {
    let type_ok = media_type
        .map(|m| ACCEPTED_MEDIA_TYPES.iter().any(|t| t.eq_ignore_ascii_case(m.trim())))
        .unwrap_or(false);
    let ext_ok = extension_of(file_name)
        .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false);
    type_ok || ext_ok
}

fn extension_of(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Detect PNG or JPEG content from magic bytes.
pub fn sniff_media_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(PNG_MAGIC) {
        Some("image/png")
    } else if bytes.starts_with(JPEG_MAGIC) {
        Some("image/jpeg")
    } else {
        None
    }
}

/// Sniff the media type of a file on disk.
pub async fn sniff_file(path: &Path) -> Result<Option<&'static str>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::PhotoRead(format!("{}: {}", path.display(), e)))?;
    Ok(sniff_media_type(&bytes))
}

/// Encode bytes as a `data:` URL.
pub fn to_data_url(media_type: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", media_type, encoded)
}

/// Photo-picker state: the staged file and the inline error indicator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoSelection {
    staged: Option<PhotoFile>,
    error: Option<String>,
}

impl PhotoSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `file`, or clear the selection.
    ///
    /// Absence of a file is always valid. A rejected file clears the staged
    /// photo and raises the error indicator.
    pub fn select(&mut self, file: Option<PhotoFile>) -> Result<()> {
        match file {
            None => {
                self.clear();
                Ok(())
            }
            Some(f) if f.is_accepted() => {
                debug!("staged photo {}", f.file_name);
                self.staged = Some(f);
                self.error = None;
                Ok(())
            }
            Some(f) => {
                debug!("rejected photo {} ({:?})", f.file_name, f.media_type);
                self.staged = None;
                self.error = Some(PHOTO_ERROR_MESSAGE.to_string());
                Err(Error::InvalidPhoto {
                    message: PHOTO_ERROR_MESSAGE.to_string(),
                })
            }
        }
    }

    /// Drop the staged file and the error indicator.
    pub fn clear(&mut self) {
        self.staged = None;
        self.error = None;
    }

    pub fn staged(&self) -> Option<&PhotoFile> {
        self.staged.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
