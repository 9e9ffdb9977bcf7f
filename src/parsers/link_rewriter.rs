//! Link localizer
//!
//! Rewrites anchor and form targets that point at the legacy site into local routes, so the
//! rehosted pages link to each other instead of back to the old domains.

use std::sync::Arc;

use markup5ever_rcdom::Handle;

use crate::parsers::html::{get_node_attr, get_node_name, set_node_attr, walk_elements};
use crate::registry::{BrandRules, DomainRegistry};
use crate::utils::{
    has_url_scheme, is_url_and_has_protocol, resolve_relative_path, split_fragment,
    split_query, strip_html_extension, Url,
};

/// Link prefixes that are never rewritten
const PASSTHROUGH_PREFIXES: &[&str] = &["#", "mailto:", "tel:", "javascript:"];

/// Maps legacy links to site-relative routes
#[derive(Debug, Clone)]
pub struct LinkLocalizer {
    registry: Arc<DomainRegistry>,
}

impl LinkLocalizer {
    pub fn new(registry: Arc<DomainRegistry>) -> Self {
        Self { registry }
    }

    /// Rewrites one `href`/`action` value found on a page living in `page_dir`
    pub fn localize_link(&self, raw_url: &str, page_dir: &str) -> String {
        if raw_url.is_empty() {
            return String::new();
        }
        let trimmed = raw_url.trim();
        if PASSTHROUGH_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
            return trimmed.to_string();
        }

        if is_url_and_has_protocol(trimmed) {
            return self.localize_absolute(trimmed);
        }
        // tg:, whatsapp:, sms: and other non-web schemes
        if has_url_scheme(trimmed) {
            return trimmed.to_string();
        }

        let (without_fragment, fragment) = split_fragment(trimmed);
        let (path, query) = split_query(without_fragment);
        // `/x.html` is joined onto `page_dir` too; the slash only survives at the site root
        let mut normalized = resolve_relative_path(page_dir, path);
        if page_dir.is_empty() && path.starts_with('/') {
            normalized.insert(0, '/');
        }

        format!("{}{}{}", to_route(&normalized), query, fragment)
    }

    fn localize_absolute(&self, absolute: &str) -> String {
        let url = match Url::parse(absolute) {
            Ok(url) => url,
            Err(_) => return absolute.to_string(),
        };
        let same_site = url
            .host_str()
            .is_some_and(|host| self.registry.is_same_site(host));
        if !same_site {
            return absolute.to_string();
        }

        let query = url
            .query()
            .filter(|q| !q.is_empty())
            .map(|q| format!("?{}", q))
            .unwrap_or_default();
        let fragment = url
            .fragment()
            .filter(|f| !f.is_empty())
            .map(|f| format!("#{}", f))
            .unwrap_or_default();

        format!("{}{}{}", to_route(url.path()), query, fragment)
    }
}

/// `/`-rooted route for a normalized path, without `.html`, `/index.html` or trailing slash
fn to_route(path: &str) -> String {
    let clean = strip_html_extension(path);
    let clean = clean.trim_start_matches('/').trim_end_matches('/');
    if clean.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", clean)
    }
}

/// Rewrites every `a[href]` (after the social-profile remap) and `form[action]` below `root`
pub fn rewrite_links_in_dom(
    root: &Handle,
    links: &LinkLocalizer,
    brand: &BrandRules,
    page_dir: &str,
) {
    walk_elements(root, &mut |node| match get_node_name(node) {
        Some("a") => {
            if let Some(href) = get_node_attr(node, "href").filter(|href| !href.is_empty()) {
                let remapped = brand.rewrite_external_brand_url(&href);
                set_node_attr(node, "href", Some(links.localize_link(&remapped, page_dir)));
            }
        }
        Some("form") => {
            if let Some(action) = get_node_attr(node, "action").filter(|a| !a.is_empty()) {
                set_node_attr(node, "action", Some(links.localize_link(&action, page_dir)));
            }
        }
        _ => {}
    });
}
