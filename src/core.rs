use std::fs;
use std::sync::Arc;

use encoding_rs::UTF_8;
use serde::Serialize;

use crate::archive::{ArchiveReference, RouteResolver, SiteKey};
use crate::cache::PageCache;
use crate::config::SiteConfig;
use crate::error::{RehostError, RehostResult};
use crate::parsers::html::{
    find_elements, get_child_node_by_name, get_description, get_node_name, get_title,
    html_to_dom, serialize_children, serialize_node, walk, walker::rewrite_color_attributes,
    RewriteContext,
};
use crate::parsers::{AssetLocalizer, LinkLocalizer};
use crate::registry::{BrandRules, DomainRegistry};

/// Route key of the page served when nothing in the archive matches
pub const NOT_FOUND_ROUTE_KEY: &str = "not-found";

const NOT_FOUND_HTML: &str = "<div>We could not find the page you requested.</div>";

/// A rehosted page, ready to be embedded by the request shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    pub html: String,
    pub title: String,
    pub description: String,
    pub route_key: String,
}

impl PageDescriptor {
    /// The descriptor served for unknown routes
    pub fn not_found(site_name: &str) -> Self {
        Self {
            html: NOT_FOUND_HTML.to_string(),
            title: site_name.to_string(),
            description: String::new(),
            route_key: NOT_FOUND_ROUTE_KEY.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.route_key == NOT_FOUND_ROUTE_KEY
    }
}

/// Output of [`Rehoster::transform_legacy_html`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedPage {
    pub html: String,
    pub title: String,
    pub description: String,
}

/// The rehosting engine: route resolution, the rewrite pipeline and the page cache.
///
/// Built once from a [`SiteConfig`]; all state is read-only apart from the cache, so one
/// instance can be shared between threads behind an `Arc`.
#[derive(Debug)]
pub struct Rehoster {
    config: SiteConfig,
    resolver: RouteResolver,
    assets: AssetLocalizer,
    links: LinkLocalizer,
    brand: BrandRules,
    cache: PageCache,
}

impl Rehoster {
    pub fn new(config: SiteConfig) -> Self {
        let registry = Arc::new(DomainRegistry::new(&config));

        Self {
            resolver: RouteResolver::new(&config),
            assets: AssetLocalizer::new(&config, Arc::clone(&registry)),
            links: LinkLocalizer::new(registry),
            brand: BrandRules::new(&config),
            cache: PageCache::new(),
            config,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// Cached page for `segments`; the first request for a route runs the pipeline.
    ///
    /// Unknown routes yield the not-found descriptor. Only archive read failures are errors,
    /// and those are not cached.
    pub fn get_page(&self, segments: &[String]) -> RehostResult<Arc<PageDescriptor>> {
        self.cache
            .get_or_try_insert_with(segments, || self.load_page(segments))
    }

    /// Resolves and transforms a page without consulting the cache
    pub fn load_page(&self, segments: &[String]) -> RehostResult<PageDescriptor> {
        let Some(reference) = self.resolver.resolve(segments) else {
            tracing::debug!("no archive file for {:?}", segments);
            return Ok(PageDescriptor::not_found(&self.config.site_name));
        };

        let raw_html = read_archive_file(&reference)?;
        let page = self.transform_legacy_html(&raw_html, &reference.page_dir, reference.site_key);
        tracing::info!(
            "transformed {} ({}, {} -> {} bytes)",
            reference.route_key,
            reference.site_key.as_str(),
            raw_html.len(),
            page.html.len()
        );

        Ok(PageDescriptor {
            html: page.html,
            title: page.title,
            description: page.description,
            route_key: reference.route_key,
        })
    }

    /// Rewrites one legacy document for the page directory and archive it came from
    pub fn transform_legacy_html(
        &self,
        html: &str,
        page_dir: &str,
        site_key: SiteKey,
    ) -> TransformedPage {
        let dom = html_to_dom(html);

        let title = get_title(&dom.document)
            .map(|title| self.brand.replace_site_name(&title))
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| self.config.site_name.clone());
        let description = get_description(&dom.document)
            .map(|description| self.brand.replace_site_name(&description))
            .unwrap_or_default();

        let html_element = get_child_node_by_name(&dom.document, "html");

        // Top-level SVG sprites (symbol definitions) are kept ahead of the body
        let svg_defs: String = html_element
            .iter()
            .flat_map(|html_element| {
                html_element
                    .children
                    .borrow()
                    .iter()
                    .filter(|child| get_node_name(child) == Some("svg"))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .map(|svg| {
                rewrite_color_attributes(&svg);
                serialize_node(&svg)
            })
            .collect();

        let body = html_element
            .as_ref()
            .and_then(|html_element| get_child_node_by_name(html_element, "body"))
            .or_else(|| find_elements(&dom.document, "body", false).into_iter().next());
        let Some(body) = body else {
            tracing::debug!("document has no <body>, keeping it unchanged");
            return TransformedPage {
                html: html.to_string(),
                title,
                description,
            };
        };

        let ctx = RewriteContext {
            assets: &self.assets,
            links: &self.links,
            brand: &self.brand,
            site_name: &self.config.site_name,
            page_dir,
            site_key,
        };
        walk(&dom, &body, &ctx);

        TransformedPage {
            html: format!("{}{}", svg_defs, serialize_children(&body)),
            title,
            description,
        }
    }
}

/// Reads an archive file as UTF-8; invalid sequences are replaced, not rejected
fn read_archive_file(reference: &ArchiveReference) -> RehostResult<String> {
    let bytes =
        fs::read(&reference.file_path).map_err(|e| RehostError::io(&reference.file_path, e))?;
    let (text, _, had_errors) = UTF_8.decode(&bytes);
    if had_errors {
        tracing::warn!(
            "{} is not valid UTF-8, invalid sequences were replaced",
            reference.file_path.display()
        );
    }
    Ok(text.into_owned())
}
