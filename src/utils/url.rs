use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

pub use url::Url;

/// Characters escaped when an original URL is passed through untouched.
///
/// Mirrors what browsers leave alone in a full URI: reserved delimiters, unreserved
/// characters and `%` (so already-encoded input is not encoded twice). Everything else,
/// including all non-ASCII bytes, is percent-encoded.
const URI_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'[')
    .add(b']');

/// Percent-encodes unsafe characters of a whole URL, keeping its structure intact
pub fn encode_uri(value: &str) -> String {
    utf8_percent_encode(value, URI_ENCODE_SET).to_string()
}

/// Checks whether the value starts with `http://` or `https://` (any letter case)
pub fn is_url_and_has_protocol(value: &str) -> bool {
    let lower = value.get(..8).unwrap_or(value).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Checks whether the value starts with a URI scheme (`tg:`, `sms:`, `ftp:` ...), which makes
/// it absolute whatever the scheme
pub fn has_url_scheme(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Splits `path#fragment` into `("path", "#fragment")`; the second part is empty when
/// there is no fragment or the fragment itself is empty.
pub fn split_fragment(value: &str) -> (&str, &str) {
    match value.find('#') {
        Some(i) if i + 1 < value.len() => (&value[..i], &value[i..]),
        Some(i) => (&value[..i], ""),
        None => (value, ""),
    }
}

/// Splits `path?query` into `("path", "?query")`, same conventions as [`split_fragment`]
pub fn split_query(value: &str) -> (&str, &str) {
    match value.find('?') {
        Some(i) if i + 1 < value.len() => (&value[..i], &value[i..]),
        Some(i) => (&value[..i], ""),
        None => (value, ""),
    }
}

/// Removes a trailing `/index.html` (keeping the slash) or `.html`, case-insensitively
pub fn strip_html_extension(path: &str) -> String {
    if let Some(stem) = strip_suffix_ignore_case(path, "/index.html") {
        return format!("{}/", stem);
    }
    if let Some(stem) = strip_suffix_ignore_case(path, ".html") {
        return stem.to_string();
    }
    path.to_string()
}

fn strip_suffix_ignore_case<'a>(value: &'a str, suffix: &str) -> Option<&'a str> {
    let start = value.len().checked_sub(suffix.len())?;
    let tail = value.get(start..)?;
    if tail.eq_ignore_ascii_case(suffix) {
        Some(&value[..start])
    } else {
        None
    }
}

/// Joins `relative` onto `base` the POSIX way and normalizes the result.
///
/// `.` segments and empty segments collapse, `..` removes the previous segment and is
/// dropped when it would climb above the root. The result never starts with `/`; a
/// trailing slash on a non-empty result is preserved.
pub fn resolve_relative_path(base: &str, relative: &str) -> String {
    let joined = if base.is_empty() {
        relative.to_string()
    } else {
        format!("{}/{}", base, relative)
    };

    let mut stack: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }

    let mut normalized = stack.join("/");
    let trailing = joined.ends_with('/') || joined.ends_with("/.") || joined.ends_with("/..");
    if trailing && !normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}
