//! Inline image content.
//!
//! A [`Payload`] is persisted as a base64 `data:` URL, the same form a browser
//! file reader produces, so the stored value describes its own media type.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum PayloadError {
        #[error("Payload is empty")]
        Empty,

        #[error("Not a data URL")]
        NotDataUrl,

        #[error("Data URL is not base64 encoded")]
        NotBase64,

        #[error("Invalid base64: {0}")]
        InvalidBase64(#[from] base64::DecodeError),

        #[error("Unsupported media type: {0}")]
        UnsupportedMediaType(String),

        #[error("Unrecognized image format")]
        UnrecognizedFormat,
    }
}

use error::PayloadError;

const DATA_URL_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Formats accepted from raw content. Matches the decoders enabled for the
/// `image` crate.
const SUPPORTED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

#[derive(Clone, PartialEq, Eq)]
pub struct Payload {
    media_type: String,
    bytes: Vec<u8>,
}

impl Payload {
    /// Builds a payload from raw file content, sniffing the media type from
    /// the leading magic bytes.
    ///
    /// Only PNG, JPEG, GIF and WebP are accepted, so every payload built here
    /// also parses back through [`Payload::from_data_url`].
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, PayloadError> {
        if bytes.is_empty() {
            return Err(PayloadError::Empty);
        }

        let format = image::guess_format(&bytes).map_err(|_| PayloadError::UnrecognizedFormat)?;
        let media_type = format.to_mime_type();

        if !SUPPORTED_FORMATS.contains(&format) || !is_image_media_type(media_type) {
            return Err(PayloadError::UnsupportedMediaType(media_type.to_string()));
        }

        Ok(Self {
            media_type: media_type.to_string(),
            bytes,
        })
    }

    /// Parses `data:image/<subtype>;base64,<content>`.
    pub fn from_data_url(url: &str) -> Result<Self, PayloadError> {
        let rest = url
            .strip_prefix(DATA_URL_SCHEME)
            .ok_or(PayloadError::NotDataUrl)?;
        let (header, content) = rest.split_once(',').ok_or(PayloadError::NotDataUrl)?;

        let media_type = header
            .strip_suffix(BASE64_MARKER)
            .ok_or(PayloadError::NotBase64)?
            .trim()
            .to_ascii_lowercase();

        if !is_image_media_type(&media_type) {
            return Err(PayloadError::UnsupportedMediaType(media_type));
        }

        let bytes = STANDARD.decode(content.trim())?;
        if bytes.is_empty() {
            return Err(PayloadError::Empty);
        }

        Ok(Self { media_type, bytes })
    }

    pub fn to_data_url(&self) -> String {
        format!(
            "{DATA_URL_SCHEME}{}{BASE64_MARKER},{}",
            self.media_type,
            STANDARD.encode(&self.bytes)
        )
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the decoded content in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn is_image_media_type(media_type: &str) -> bool {
    media_type
        .strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty())
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_url())
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let url = String::deserialize(deserializer)?;
        Payload::from_data_url(&url).map_err(serde::de::Error::custom)
    }
}
