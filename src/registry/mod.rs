//! # Rewrite rule registries
//!
//! Data-driven tables consulted by the localizers and the transform pipeline. Each table is
//! an ordered constant list plus a few pure lookup functions, built once from
//! [`SiteConfig`](crate::config::SiteConfig) where it depends on configuration.
//!
//! - `hosts` - legacy host aliases and host classification
//! - `brand` - brand-name variants, legacy domain strings and social profile remaps
//! - `colors` - legacy palette and background surface token
//! - `logo` - logo detection heuristics

pub mod brand;
pub mod colors;
pub mod hosts;
pub mod logo;

pub use brand::BrandRules;
pub use colors::{apply_background_tokens, apply_theme_colors, COLOR_ATTRIBUTES, SURFACE_TOKEN};
pub use hosts::{DomainRegistry, HostClass};
pub use logo::{is_logo_asset, is_logo_url, looks_like_logo_text};
