//! Captured image payloads

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use once_cell::sync::Lazy;
use regex::Regex;

static DATA_URL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:image/\w+;base64,").expect("valid data URL regex"));

/// Image formats recognised from magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

impl ImageFormat {
    /// Sniff the format from the first bytes of an encoded image
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(&[0x89, 0x50, 0x4e, 0x47]) {
            Some(ImageFormat::Png)
        } else if bytes.len() >= 12
            && bytes.starts_with(&[0x52, 0x49, 0x46, 0x46])
            && bytes[8..12] == [0x57, 0x45, 0x42, 0x50]
        {
            Some(ImageFormat::Webp)
        } else {
            None
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Webp => "image/webp",
        }
    }
}

/// One encoded camera frame
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    format: Option<ImageFormat>,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("bytes", &self.data.len())
            .field("mime_type", &self.mime_type())
            .finish()
    }
}

impl Frame {
    pub fn new(data: Vec<u8>) -> Self {
        let format = ImageFormat::sniff(&data);
        Self { data, format }
    }

    /// Decode a base64 payload, with or without a `data:image/...;base64,` prefix
    pub fn from_data_url(encoded: &str) -> Result<Self, base64::DecodeError> {
        let stripped = DATA_URL_PREFIX.replace(encoded.trim(), "");
        let data = BASE64.decode(stripped.as_bytes())?;
        Ok(Self::new(data))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// MIME type sent with the payload. Unknown formats are sent as JPEG.
    pub fn mime_type(&self) -> &'static str {
        self.format.unwrap_or(ImageFormat::Jpeg).mime_type()
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.data)
    }
}
