//! Cover image source handling for the editor and reader.
//!
//! A story's `image` field holds whatever the author gave us: a web URL, an
//! already-embedded `data:` URI, or a local file path that gets read and
//! embedded at publish time. Classification is deliberately permissive:
//! anything unrecognized is stored as-is, the way the platform always has.
//! The reader's open-in-browser action only ever hands http(s) URLs to
//! the system.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum CoverUrlError {
    #[error("Invalid URL: {0}")]
    Invalid(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https can be opened)")]
    UnsupportedScheme(String),
}

/// Where a cover image value came from, decided by shape alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverSource {
    /// An http(s) URL. Openable in the system browser.
    Web(Url),
    /// An embedded `data:` URI, typically produced by a local upload.
    DataUri,
    /// An existing local file, to be read and embedded as a data URI.
    LocalFile(PathBuf),
    /// Anything else. Stored verbatim; never opened.
    Opaque,
}

/// Classify a raw cover image value from the editor's image field.
pub fn classify_cover_source(raw: &str) -> CoverSource {
    let trimmed = raw.trim();
    if trimmed.starts_with("data:") {
        return CoverSource::DataUri;
    }
    if let Ok(url) = Url::parse(trimmed) {
        if matches!(url.scheme(), "http" | "https") {
            return CoverSource::Web(url);
        }
    }
    let path = Path::new(trimmed);
    if path.is_file() {
        return CoverSource::LocalFile(path.to_path_buf());
    }
    CoverSource::Opaque
}

/// Stock cover URL for stories published without one, seeded by the publish
/// timestamp so every story gets a distinct picture.
pub fn placeholder_image_url(seed: i64) -> String {
    format!("https://picsum.photos/seed/{}/900/700", seed)
}

/// Validate a cover value for the reader's open-in-browser action.
///
/// Only http(s) survives; `file:` and friends from an imported snapshot must
/// never reach the OS opener.
pub fn openable_cover_url(raw: &str) -> Result<Url, CoverUrlError> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(CoverUrlError::UnsupportedScheme(scheme.to_owned())),
    }
}

/// Build a `data:` URI embedding the given file contents, mirroring what the
/// platform's upload flow produces.
pub fn data_uri_for(path: &Path, bytes: &[u8]) -> String {
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    };
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}
