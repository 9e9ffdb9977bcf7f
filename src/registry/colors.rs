//! Theme color remapping
//!
//! Legacy hex literals are swapped for the new palette, and white backgrounds become the
//! `var(--surface)` token so the page follows the active theme.

use std::sync::OnceLock;

use regex::{Captures, Regex, RegexBuilder};

/// Legacy palette -> new palette
pub const THEME_COLORS: &[(&str, &str)] = &[
    ("#ffbf40", "#2d6fda"),
    ("#fbbf24", "#2d6fda"),
    ("#f59e0b", "#1d56b8"),
    ("#fde68a", "#9fc6ff"),
    ("#3daa89", "#2d6fda"),
    ("#2e866b", "#1d56b8"),
    ("#2a8066", "#1d56b8"),
    ("#359374", "#2d6fda"),
    ("#31b88a", "#2d6fda"),
    ("#48c39d", "#2d6fda"),
    ("#17a77d", "#2d6fda"),
    ("#0e8f6b", "#1d56b8"),
    ("#1dc37f", "#2d6fda"),
    ("#22c55e", "#2d6fda"),
    ("#10b981", "#2d6fda"),
    ("#059669", "#1d56b8"),
    ("#16a34a", "#1d56b8"),
    ("#34d399", "#9fc6ff"),
    ("#5bd5a9", "#9fc6ff"),
    ("#65d6ad", "#9fc6ff"),
    ("#d39a35", "#1d56b8"),
];

/// Symbolic surface color used instead of literal white backgrounds
pub const SURFACE_TOKEN: &str = "var(--surface)";

/// SVG presentation attributes that carry colors
pub const COLOR_ATTRIBUTES: &[&str] = &["fill", "stroke", "stop-color"];

fn theme_color_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        let alternation = THEME_COLORS
            .iter()
            .map(|(legacy, _)| regex::escape(legacy))
            .collect::<Vec<_>>()
            .join("|");
        RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .build()
            .expect("theme color table must compile")
    })
}

fn background_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        RegexBuilder::new(r"(background(?:-color)?\s*:\s*)([^;{}]*?)(#ffffff|#fff|white)\b([^;{}]*);?")
            .case_insensitive(true)
            .build()
            .expect("background pattern must compile")
    })
}

/// Looks up the new color for a legacy hex literal (any letter case)
pub fn remap_color(legacy: &str) -> Option<&'static str> {
    THEME_COLORS
        .iter()
        .find(|(from, _)| from.eq_ignore_ascii_case(legacy))
        .map(|(_, to)| *to)
}

/// Replaces every legacy hex literal in `value`
pub fn apply_theme_colors(value: &str) -> String {
    if !value.contains('#') {
        return value.to_string();
    }
    theme_color_regex()
        .replace_all(value, |caps: &Captures| {
            remap_color(&caps[0]).unwrap_or(&caps[0]).to_string()
        })
        .into_owned()
}

/// Rewrites white `background`/`background-color` values to [`SURFACE_TOKEN`].
///
/// The rest of the declaration is kept; a `white` that sits inside an unclosed `url(`
/// belongs to a file name and is left alone.
pub fn apply_background_tokens(value: &str) -> String {
    background_regex()
        .replace_all(value, |caps: &Captures| {
            let before = &caps[2];
            if inside_url(before) {
                return caps[0].to_string();
            }
            format!("{}{}{}{};", &caps[1], before, SURFACE_TOKEN, &caps[4])
        })
        .into_owned()
}

fn inside_url(prefix: &str) -> bool {
    let lower = prefix.to_ascii_lowercase();
    match lower.rfind("url(") {
        Some(start) => !lower[start..].contains(')'),
        None => false,
    }
}
