//! Route resolution against the on-disk archive
//!
//! Route segments are matched against the main or panel archive tree using a fixed
//! fallback chain; the first existing regular file wins.

use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::config::SiteConfig;

const INDEX_FILE: &str = "index.html";

/// Which archive tree a page came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteKey {
    Main,
    Panel,
}

impl SiteKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteKey::Main => "main",
            SiteKey::Panel => "panel",
        }
    }
}

/// A resolved archive file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReference {
    pub file_path: PathBuf,
    pub site_key: SiteKey,
    /// Directory of `file_path` relative to its site root, `/`-separated
    pub page_dir: String,
    pub route_key: String,
}

/// Maps route segments to archive files
#[derive(Debug, Clone)]
pub struct RouteResolver {
    main_root: PathBuf,
    panel_root: PathBuf,
    panel_prefix: String,
}

impl RouteResolver {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            main_root: config.main_root(),
            panel_root: config.panel_root(),
            panel_prefix: config.panel_prefix.clone(),
        }
    }

    /// Resolves `segments` to an existing archive file, `None` when nothing matches
    pub fn resolve(&self, segments: &[String]) -> Option<ArchiveReference> {
        if segments.is_empty() {
            let index_path = self.main_root.join(INDEX_FILE);
            if !index_path.is_file() {
                return None;
            }
            return Some(ArchiveReference {
                file_path: index_path,
                site_key: SiteKey::Main,
                page_dir: String::new(),
                route_key: "home".to_string(),
            });
        }

        let (site_root, site_key, relative) = if segments[0] == self.panel_prefix {
            (&self.panel_root, SiteKey::Panel, &segments[1..])
        } else {
            (&self.main_root, SiteKey::Main, segments)
        };

        if relative.is_empty() {
            let index_path = site_root.join(INDEX_FILE);
            if index_path.is_file() {
                return Some(ArchiveReference {
                    file_path: index_path,
                    site_key,
                    page_dir: String::new(),
                    route_key: "panel".to_string(),
                });
            }
        }

        if relative.iter().any(|segment| !is_safe_segment(segment)) {
            tracing::debug!("rejecting unsafe route segments {:?}", segments);
            return None;
        }
        if relative.is_empty() {
            return None;
        }

        let route_key = sanitize_route_key(&relative.join("/"));
        let candidate: PathBuf = relative.iter().fold(site_root.clone(), |path, s| path.join(s));

        let mut candidates = vec![
            candidate.clone(),
            with_suffix(&candidate, ".html"),
            candidate.join(INDEX_FILE),
        ];
        if relative.len() == 1 {
            candidates.push(site_root.join(format!("{}.html", relative[0])));
        }

        let file_path = candidates.into_iter().find(|path| path.is_file())?;
        let page_dir = page_dir_of(site_root, &file_path);
        tracing::debug!(
            "resolved {:?} to {} ({}, page dir '{}')",
            segments,
            file_path.display(),
            site_key.as_str(),
            page_dir
        );

        Some(ArchiveReference {
            file_path,
            site_key,
            page_dir,
            route_key,
        })
    }
}

/// Strips one leading and one trailing slash and turns whitespace runs into `-`
pub fn sanitize_route_key(value: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("static pattern"));

    let trimmed = value.strip_prefix('/').unwrap_or(value);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    whitespace.replace_all(trimmed, "-").into_owned()
}

/// A segment must name a single entry inside the site root
fn is_safe_segment(segment: &str) -> bool {
    if segment.is_empty() || segment.contains('/') || segment.contains('\\') {
        return false;
    }
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}

fn page_dir_of(site_root: &Path, file_path: &Path) -> String {
    file_path
        .parent()
        .and_then(|dir| dir.strip_prefix(site_root).ok())
        .map(|relative| {
            relative
                .components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn segments(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn fixture() -> (tempfile::TempDir, RouteResolver) {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig {
            archive_root: dir.path().to_path_buf(),
            ..SiteConfig::default()
        };
        let main = config.main_root();
        fs::create_dir_all(main.join("blog/post")).unwrap();
        fs::create_dir_all(main.join("docs")).unwrap();
        fs::write(main.join("index.html"), "home").unwrap();
        fs::write(main.join("about.html"), "about").unwrap();
        fs::write(main.join("blog/post/index.html"), "post").unwrap();
        fs::write(main.join("blog/news.html"), "news").unwrap();
        fs::write(main.join("docs/manual.pdf"), "pdf").unwrap();
        (dir, RouteResolver::new(&config))
    }

    #[test]
    fn test_root_resolves_to_home() {
        let (dir, resolver) = fixture();
        let reference = resolver.resolve(&[]).unwrap();
        assert_eq!(reference.route_key, "home");
        assert_eq!(reference.site_key, SiteKey::Main);
        assert_eq!(reference.page_dir, "");
        assert!(reference.file_path.starts_with(dir.path()));
    }

    #[test]
    fn test_fallback_chain() {
        let (_dir, resolver) = fixture();

        let verbatim = resolver.resolve(&segments(&["docs", "manual.pdf"])).unwrap();
        assert_eq!(verbatim.page_dir, "docs");
        assert_eq!(verbatim.route_key, "docs/manual.pdf");

        let html = resolver.resolve(&segments(&["blog", "news"])).unwrap();
        assert!(html.file_path.ends_with("blog/news.html"));
        assert_eq!(html.page_dir, "blog");

        let index = resolver.resolve(&segments(&["blog", "post"])).unwrap();
        assert!(index.file_path.ends_with("blog/post/index.html"));
        assert_eq!(index.page_dir, "blog/post");
        assert_eq!(index.route_key, "blog/post");

        let single = resolver.resolve(&segments(&["about"])).unwrap();
        assert!(single.file_path.ends_with("about.html"));
        assert_eq!(single.page_dir, "");
    }

    #[test]
    fn test_directories_are_not_pages() {
        let (_dir, resolver) = fixture();
        assert!(resolver.resolve(&segments(&["docs"])).is_none());
    }

    #[test]
    fn test_missing_routes() {
        let (_dir, resolver) = fixture();
        assert!(resolver.resolve(&segments(&["does", "not", "exist"])).is_none());
        // panel archive is a separate namespace
        assert!(resolver.resolve(&segments(&["panel", "about"])).is_none());
        assert!(resolver.resolve(&segments(&["panel"])).is_none());
    }

    #[test]
    fn test_traversal_is_rejected() {
        let (_dir, resolver) = fixture();
        assert!(resolver.resolve(&segments(&["..", "index"])).is_none());
        assert!(resolver.resolve(&segments(&["blog", "..", "about"])).is_none());
        assert!(resolver.resolve(&segments(&["blog/news"])).is_none());
        assert!(resolver.resolve(&segments(&[""])).is_none());
    }

    #[test]
    fn test_sanitize_route_key() {
        assert_eq!(sanitize_route_key("/blog/my post/"), "blog/my-post");
        assert_eq!(sanitize_route_key("a \t b"), "a-b");
        assert_eq!(sanitize_route_key("a?b"), "a?b");
    }
}
