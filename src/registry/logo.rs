//! Logo detection heuristics
//!
//! Legacy logos are replaced wholesale by the canonical logo, so detection only needs to
//! be good enough to catch the archive's header, footer and favicon images.

/// Keywords that mark a class, id, label or URL as logo-related
pub const LOGO_KEYWORDS: &[&str] = &[
    "logo",
    "brand",
    "favicon",
    "site-icon",
    "site_logo",
    // "logo" in Persian
    "\u{0644}\u{0648}\u{06af}\u{0648}",
];

/// Filename prefixes of brand-named SVG files
pub const BRAND_SVG_PREFIXES: &[&str] = &["mihanshop-", "websithebama-", "websitebama-"];

/// Class names the legacy theme used for logo containers
pub const LOGO_CLASSES: &[&str] = &["header_top-logo"];

/// Checks free text (class, id, alt, title, aria-label) against [`LOGO_KEYWORDS`]
pub fn looks_like_logo_text(value: Option<&str>) -> bool {
    let text = value.unwrap_or_default().to_lowercase();
    if text.is_empty() {
        return false;
    }
    LOGO_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}

/// Checks an asset URL: logo keywords anywhere, or a brand-prefixed `.svg` file
pub fn is_logo_url(value: Option<&str>) -> bool {
    let text = value.unwrap_or_default().to_lowercase();
    if text.is_empty() {
        return false;
    }
    looks_like_logo_text(Some(&text))
        || (text.ends_with(".svg") && BRAND_SVG_PREFIXES.iter().any(|p| text.contains(p)))
}

/// Combined check for an `<img>`: its URL, its class list, its alt and title
pub fn is_logo_asset(
    src: Option<&str>,
    alt: Option<&str>,
    title: Option<&str>,
    class_name: Option<&str>,
) -> bool {
    let class_text = class_name.unwrap_or_default().to_lowercase();
    let class_looks_like_logo = looks_like_logo_text(Some(&class_text))
        || LOGO_CLASSES.iter().any(|class| class_text.contains(class))
        || (class_text.contains("footer") && class_text.contains("logo"));

    is_logo_url(src)
        || class_looks_like_logo
        || looks_like_logo_text(alt)
        || looks_like_logo_text(title)
}
