//! # Rehost
//!
//! Serves an archived website under a new brand. Incoming routes are resolved against the
//! on-disk archive and every page is rewritten before it is served: links become local
//! routes, assets point at the local or remote mirrors, and brand names, legacy domains and
//! theme colors are replaced.
//!
//! ## Modules
//!
//! - `core` - the [`Rehoster`] engine and the transform pipeline
//! - `archive` - route resolution against the archive trees
//! - `cache` - the process-wide page cache
//! - `parsers` - HTML, CSS, asset and link rewriting
//! - `registry` - host, brand, color and logo rule tables
//! - `config` / `env` - site configuration and environment overrides
//! - `utils` - URL and path helpers
//!
//! ```no_run
//! use rehost::{Rehoster, SiteConfig};
//!
//! let rehoster = Rehoster::new(SiteConfig::load(None)?);
//! let page = rehoster.get_page(&["blog".to_string(), "post".to_string()])?;
//! println!("{}", page.html);
//! # Ok::<(), rehost::RehostError>(())
//! ```

pub mod archive;
pub mod cache;
pub mod config;
pub mod core;
pub mod env;
pub mod error;
pub mod parsers;
pub mod registry;
pub mod utils;

// Re-export commonly used items for convenience
pub use archive::{ArchiveReference, RouteResolver, SiteKey};
pub use cache::PageCache;
pub use config::{Domains, SiteConfig};
pub use crate::core::{PageDescriptor, Rehoster, TransformedPage, NOT_FOUND_ROUTE_KEY};
pub use error::{RehostError, RehostResult};
pub use parsers::{AssetLocalizer, AssetResolution, LinkLocalizer};
pub use registry::{BrandRules, DomainRegistry, HostClass};
