//! # Utility module
//!
//! Helpers shared by the asset and link localizers:
//!
//! - URL classification and percent-encoding
//! - POSIX-style path joining and normalization
//!
//! # Module layout
//!
//! - `url` - URL splitting, encoding and path normalization

pub mod url;

// Re-export commonly used items for convenience
pub use url::{
    encode_uri, has_url_scheme, is_url_and_has_protocol, resolve_relative_path, split_fragment, split_query,
    strip_html_extension, Url,
};
