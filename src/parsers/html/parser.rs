//! `srcset` parsing
//!
//! Candidates are `URL [descriptor]` pairs separated by commas. The URL itself runs up to
//! the next whitespace, so commas inside it (data URLs, query strings) are preserved.

use super::utils::WHITESPACES;

/// One image candidate of a `srcset` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrcSetItem<'a> {
    /// Image URL
    pub path: &'a str,
    /// Width (`480w`) or density (`2x`) descriptor, empty when absent
    pub descriptor: &'a str,
}

/// Splits a `srcset` value into its candidates
pub fn parse_srcset(srcset: &str) -> Vec<SrcSetItem<'_>> {
    let mut items = Vec::new();
    let mut rest = srcset;

    loop {
        rest = rest.trim_start_matches(|c: char| WHITESPACES.contains(&c) || c == ',');
        if rest.is_empty() {
            break;
        }

        let url_end = rest.find(WHITESPACES).unwrap_or(rest.len());
        let path = &rest[..url_end];
        rest = &rest[url_end..];

        // "a.png,b.png 2x": a trailing comma closes a candidate without descriptor
        if path.ends_with(',') {
            items.push(SrcSetItem {
                path: path.trim_end_matches(','),
                descriptor: "",
            });
            continue;
        }

        let descriptor_end = rest.find(',').unwrap_or(rest.len());
        let descriptor = rest[..descriptor_end].trim_matches(WHITESPACES);
        rest = &rest[descriptor_end..];

        items.push(SrcSetItem { path, descriptor });
    }

    items
}

/// Rebuilds a `srcset` value after rewriting every candidate URL with `rewrite`
pub fn rewrite_srcset(srcset: &str, rewrite: &mut dyn FnMut(&str) -> String) -> String {
    parse_srcset(srcset)
        .iter()
        .map(|item| {
            let path = rewrite(item.path);
            if item.descriptor.is_empty() {
                path
            } else {
                format!("{} {}", path, item.descriptor)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
