//! Inline style and `<style>` block rewriting
//!
//! Styles go through three passes in order: the legacy palette remap, the white background
//! to surface token rewrite, and asset localization of every `url(...)` reference.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::archive::SiteKey;
use crate::parsers::assets::AssetLocalizer;
use crate::registry::{apply_background_tokens, apply_theme_colors};

fn css_url_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"url\(([^)]+)\)").expect("static pattern"))
}

/// Applies every style pass to a `style` attribute value or stylesheet text
pub fn rewrite_style(
    value: &str,
    page_dir: &str,
    site_key: SiteKey,
    assets: &AssetLocalizer,
) -> String {
    let recolored = apply_background_tokens(&apply_theme_colors(value));
    if recolored.contains("url(") {
        fix_style_urls(&recolored, page_dir, site_key, assets)
    } else {
        recolored
    }
}

/// Localizes every `url(...)` in `value`; quotes around the URL are dropped
pub fn fix_style_urls(
    value: &str,
    page_dir: &str,
    site_key: SiteKey,
    assets: &AssetLocalizer,
) -> String {
    css_url_regex()
        .replace_all(value, |caps: &Captures| {
            let cleaned: String = caps[1].chars().filter(|c| *c != '"' && *c != '\'').collect();
            let resolved = assets.resolve_style_url(cleaned.trim(), page_dir, site_key);
            format!("url({})", resolved.as_url())
        })
        .into_owned()
}
