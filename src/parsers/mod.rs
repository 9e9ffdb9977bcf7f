//! # Parsers and rewriters
//!
//! Everything that reads or rewrites legacy page content:
//!
//! - `html` - DOM parsing, serialization and the body rewrite passes
//! - `assets` - asset URL localization against the mirrors
//! - `css` - inline style and stylesheet rewriting
//! - `link_rewriter` - anchor and form target localization

pub mod assets;
pub mod css;
pub mod html;
pub mod link_rewriter;

// Re-export commonly used items for convenience
pub use assets::{AssetLocalizer, AssetResolution};
pub use css::rewrite_style;
pub use html::{html_to_dom, serialize_children, walk, RewriteContext};
pub use link_rewriter::{rewrite_links_in_dom, LinkLocalizer};
