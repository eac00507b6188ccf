//! Utility functions for common operations.
//!
//! - **Text processing**: Unicode-aware width calculation and truncation,
//!   control-character stripping for user-authored text, and the derived
//!   story fields (excerpt, read-time, display dates).
//! - **Cover sources**: classification of cover image values (URL, data URI,
//!   local file) and validation for the open-in-browser action.

mod cover;
mod text;

pub use cover::{
    classify_cover_source, data_uri_for, openable_cover_url, placeholder_image_url, CoverSource,
    CoverUrlError,
};
pub use text::{
    display_width, excerpt_of, publish_date_label, read_time_label, relative_time_label,
    strip_control_chars, truncate_to_width, EXCERPT_CHARS,
};

/// Maximum accepted search query length, enforced at the input layer.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
