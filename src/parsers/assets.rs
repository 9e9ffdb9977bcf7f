//! Asset localizer
//!
//! Decides, for every asset reference found in a legacy page, whether it points at the local
//! mirror (`/legacy/<host>/...`), the remote mirror (`/remote/<host>/...`) or stays an
//! encoded external URL. Mirror hits are checked against the files under the public root;
//! nothing is ever fetched.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use percent_encoding::percent_decode_str;

use crate::archive::SiteKey;
use crate::config::SiteConfig;
use crate::registry::{is_logo_url, DomainRegistry, HostClass};
use crate::utils::{
    encode_uri, has_url_scheme, is_url_and_has_protocol, resolve_relative_path, split_fragment,
    split_query, Url,
};

/// Schemes and prefixes that are never rewritten
const PASSTHROUGH_PREFIXES: &[&str] = &["data:", "blob:", "#", "mailto:", "tel:"];

/// Where an asset reference ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetResolution {
    /// Found in the local mirror, `/legacy/<host>/<path>`
    LocalMirror(String),
    /// Found in the remote mirror, `/remote/<host>/<path>`
    RemoteMirror(String),
    /// Not mirrored; the original URL, percent-encoded
    PassthroughEncoded(String),
    /// Replaced by the canonical logo
    ForcedLogo(String),
    /// Inline data, fragments and non-http schemes
    Unchanged(String),
    /// Relative reference without a mirrored file; the canonical logo stands in
    Placeholder(String),
}

impl AssetResolution {
    pub fn as_url(&self) -> &str {
        match self {
            AssetResolution::LocalMirror(url)
            | AssetResolution::RemoteMirror(url)
            | AssetResolution::PassthroughEncoded(url)
            | AssetResolution::ForcedLogo(url)
            | AssetResolution::Unchanged(url)
            | AssetResolution::Placeholder(url) => url,
        }
    }

    pub fn into_url(self) -> String {
        match self {
            AssetResolution::LocalMirror(url)
            | AssetResolution::RemoteMirror(url)
            | AssetResolution::PassthroughEncoded(url)
            | AssetResolution::ForcedLogo(url)
            | AssetResolution::Unchanged(url)
            | AssetResolution::Placeholder(url) => url,
        }
    }

    /// Whether the reference now points inside the site's own asset mirrors
    pub fn is_mirrored(&self) -> bool {
        matches!(
            self,
            AssetResolution::LocalMirror(_) | AssetResolution::RemoteMirror(_)
        )
    }
}

/// Rewrites asset URLs to mirrored paths
#[derive(Debug, Clone)]
pub struct AssetLocalizer {
    registry: Arc<DomainRegistry>,
    public_root: PathBuf,
    logo_path: String,
}

impl AssetLocalizer {
    pub fn new(config: &SiteConfig, registry: Arc<DomainRegistry>) -> Self {
        Self {
            registry,
            public_root: config.public_root.clone(),
            logo_path: config.logo_path.clone(),
        }
    }

    pub fn logo_path(&self) -> &str {
        &self.logo_path
    }

    /// Shorthand for `resolve(..).into_url()`
    pub fn localize(&self, raw_url: &str, page_dir: &str, site_key: SiteKey) -> String {
        self.resolve(raw_url, page_dir, site_key).into_url()
    }

    pub fn forced_logo(&self) -> AssetResolution {
        AssetResolution::ForcedLogo(self.logo_path.clone())
    }

    /// Resolves a `url(...)` value found in CSS; logo-looking URLs become the canonical logo
    pub fn resolve_style_url(
        &self,
        raw_url: &str,
        page_dir: &str,
        site_key: SiteKey,
    ) -> AssetResolution {
        if is_logo_url(Some(raw_url)) {
            return self.forced_logo();
        }
        self.resolve(raw_url, page_dir, site_key)
    }

    pub fn resolve(&self, raw_url: &str, page_dir: &str, site_key: SiteKey) -> AssetResolution {
        let trimmed = raw_url.trim();
        if trimmed.is_empty() || PASSTHROUGH_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
            return AssetResolution::Unchanged(trimmed.to_string());
        }

        let absolute = if trimmed.starts_with("//") {
            format!("https:{}", trimmed)
        } else {
            trimmed.to_string()
        };

        if is_url_and_has_protocol(&absolute) {
            return self.resolve_absolute(&absolute);
        }
        if has_url_scheme(&absolute) {
            return AssetResolution::PassthroughEncoded(encode_uri(&absolute));
        }

        let site_host = self.site_host(site_key);

        if absolute.starts_with('/') {
            let candidate = format!("/legacy/{}{}", site_host, absolute);
            return self.local_or_placeholder(candidate);
        }

        let (without_fragment, fragment) = split_fragment(&absolute);
        let (path, query) = split_query(without_fragment);
        let normalized = resolve_relative_path(page_dir, path);

        let under_known_host = self
            .registry
            .mirror_prefixes()
            .iter()
            .any(|prefix| normalized.starts_with(&format!("{}/", prefix)));
        let candidate = if under_known_host {
            format!("/legacy/{}{}{}", normalized, query, fragment)
        } else {
            format!("/legacy/{}/{}{}{}", site_host, normalized, query, fragment)
        };
        self.local_or_placeholder(candidate)
    }

    fn resolve_absolute(&self, absolute: &str) -> AssetResolution {
        let encoded = || AssetResolution::PassthroughEncoded(encode_uri(absolute));

        let url = match Url::parse(absolute) {
            Ok(url) => url,
            Err(err) => {
                tracing::debug!("keeping malformed asset URL {}: {}", absolute, err);
                return encoded();
            }
        };
        let Some(host) = url.host_str() else {
            return encoded();
        };
        let canonical = self.registry.canonicalize(host);
        let path = url.path();

        match self.registry.classify(host) {
            HostClass::Api | HostClass::Panel => self
                .ensure_local_asset(&format!("/legacy/{}{}", canonical, path))
                .map(AssetResolution::LocalMirror)
                .unwrap_or_else(encoded),
            HostClass::Primary => self
                .ensure_local_asset(&format!("/legacy/{}{}", canonical, path))
                .map(AssetResolution::LocalMirror)
                .or_else(|| {
                    self.ensure_remote_asset(canonical, path)
                        .map(AssetResolution::RemoteMirror)
                })
                .unwrap_or_else(encoded),
            HostClass::Cdn => self
                .ensure_remote_asset(canonical, path)
                .map(AssetResolution::RemoteMirror)
                .unwrap_or_else(encoded),
            HostClass::External if self.registry.is_same_site(host) => self
                .ensure_remote_asset(canonical, path)
                .map(AssetResolution::RemoteMirror)
                .unwrap_or_else(encoded),
            HostClass::External => encoded(),
        }
    }

    fn local_or_placeholder(&self, candidate: String) -> AssetResolution {
        match self.ensure_local_asset(&candidate) {
            Some(url) => AssetResolution::LocalMirror(url),
            None => {
                tracing::debug!("no mirrored file for {}, using placeholder", candidate);
                AssetResolution::Placeholder(self.logo_path.clone())
            }
        }
    }

    /// Returns `url` when the local mirror holds the file it addresses.
    ///
    /// Query and fragment are ignored for the lookup.
    pub fn ensure_local_asset(&self, url: &str) -> Option<String> {
        let (without_fragment, _) = split_fragment(url);
        let (path, _) = split_query(without_fragment);
        if !path.starts_with("/legacy/") {
            return None;
        }
        is_mirrored_file(&self.public_root, path).then(|| url.to_string())
    }

    /// Returns `/remote/<host><path>` when the remote mirror holds the file
    pub fn ensure_remote_asset(&self, host: &str, path: &str) -> Option<String> {
        let mirror_path = format!("/remote/{}/{}", host, path.trim_start_matches('/'));
        is_mirrored_file(&self.public_root, &mirror_path)
            .then(|| format!("/remote/{}{}", host, path))
    }

    fn site_host(&self, site_key: SiteKey) -> &str {
        let class = match site_key {
            SiteKey::Main => HostClass::Primary,
            SiteKey::Panel => HostClass::Panel,
        };
        self.registry.host_for(class).unwrap_or_default()
    }
}

/// Maps a site-absolute URL path onto the public root and checks for a regular file
fn is_mirrored_file(public_root: &Path, url_path: &str) -> bool {
    let decoded = percent_decode_str(url_path).decode_utf8_lossy();
    let mut file_path = public_root.to_path_buf();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return false,
            other => file_path.push(other),
        }
    }
    file_path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture(files: &[&str]) -> (tempfile::TempDir, AssetLocalizer) {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig {
            public_root: dir.path().to_path_buf(),
            ..SiteConfig::default()
        };
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, b"x").unwrap();
        }
        let registry = Arc::new(DomainRegistry::new(&config));
        (dir, AssetLocalizer::new(&config, registry))
    }

    #[test]
    fn test_passthrough_schemes() {
        let (_dir, assets) = fixture(&[]);
        for raw in ["", "data:image/png;base64,AAAA", "blob:abc", "#icon", "mailto:a@b.c", "tel:123"] {
            assert_eq!(
                assets.resolve(raw, "", SiteKey::Main),
                AssetResolution::Unchanged(raw.to_string())
            );
        }
        assert_eq!(assets.localize("  data:x  ", "", SiteKey::Main), "data:x");
    }

    #[test]
    fn test_relative_asset_in_page_dir() {
        let (_dir, assets) = fixture(&["legacy/websithebama.com/blog/img/a.png"]);
        assert_eq!(
            assets.resolve("../img/a.png", "blog/post", SiteKey::Main),
            AssetResolution::LocalMirror("/legacy/websithebama.com/blog/img/a.png".to_string())
        );
        assert_eq!(
            assets.resolve("./img/a.png?v=3#x", "blog", SiteKey::Main),
            AssetResolution::LocalMirror(
                "/legacy/websithebama.com/blog/img/a.png?v=3#x".to_string()
            )
        );
    }

    #[test]
    fn test_relative_asset_with_host_prefix() {
        let (_dir, assets) = fixture(&["legacy/api.websithebama.com/media/p.jpg"]);
        assert_eq!(
            assets.localize("../../api.websithebama.com/media/p.jpg", "a/b", SiteKey::Panel),
            "/legacy/api.websithebama.com/media/p.jpg"
        );
    }

    #[test]
    fn test_missing_relative_asset_uses_placeholder() {
        let (_dir, assets) = fixture(&[]);
        assert_eq!(
            assets.resolve("img/missing.png", "", SiteKey::Main),
            AssetResolution::Placeholder("/Logo.png".to_string())
        );
        assert_eq!(
            assets.resolve("/static/missing.css", "", SiteKey::Panel),
            AssetResolution::Placeholder("/Logo.png".to_string())
        );
    }

    #[test]
    fn test_root_relative_uses_site_namespace() {
        let (_dir, assets) = fixture(&[
            "legacy/websithebama.com/static/a.css",
            "legacy/panel.websithebama.com/static/a.css",
        ]);
        assert_eq!(
            assets.localize("/static/a.css", "deep/dir", SiteKey::Main),
            "/legacy/websithebama.com/static/a.css"
        );
        assert_eq!(
            assets.localize("/static/a.css", "", SiteKey::Panel),
            "/legacy/panel.websithebama.com/static/a.css"
        );
    }

    #[test]
    fn test_primary_host_prefers_local_then_remote() {
        let (_dir, assets) = fixture(&[
            "legacy/websithebama.com/img/local.png",
            "remote/websithebama.com/img/remote.png",
        ]);
        assert_eq!(
            assets.resolve("https://mihanshop.com/img/local.png", "", SiteKey::Main),
            AssetResolution::LocalMirror("/legacy/websithebama.com/img/local.png".to_string())
        );
        assert_eq!(
            assets.resolve("//www.mihanshop.com/img/remote.png", "", SiteKey::Main),
            AssetResolution::RemoteMirror("/remote/websithebama.com/img/remote.png".to_string())
        );
        assert_eq!(
            assets.resolve("https://mihanshop.com/img/none png.png", "", SiteKey::Main),
            AssetResolution::PassthroughEncoded(
                "https://mihanshop.com/img/none%20png.png".to_string()
            )
        );
    }

    #[test]
    fn test_api_host_skips_remote_mirror() {
        let (_dir, assets) = fixture(&["remote/api.websithebama.com/x.png"]);
        assert_eq!(
            assets.resolve("https://api.mihanshop.com/x.png", "", SiteKey::Main),
            AssetResolution::PassthroughEncoded("https://api.mihanshop.com/x.png".to_string())
        );

        let (_dir, assets) = fixture(&["legacy/api.websithebama.com/x.png"]);
        assert_eq!(
            assets.localize("https://api.mihanshop.com/x.png", "", SiteKey::Main),
            "/legacy/api.websithebama.com/x.png"
        );
    }

    #[test]
    fn test_cdn_and_subdomains_use_remote_mirror() {
        let (_dir, assets) = fixture(&[
            "remote/cdn.websithebama.com/f.woff2",
            "remote/img.websithebama.com/p.png",
        ]);
        assert!(assets
            .resolve("https://cdn.mihanshop.com/f.woff2", "", SiteKey::Main)
            .is_mirrored());
        assert_eq!(
            assets.localize("https://img.websithebama.com/p.png", "", SiteKey::Main),
            "/remote/img.websithebama.com/p.png"
        );
    }

    #[test]
    fn test_external_urls_are_encoded() {
        let (_dir, assets) = fixture(&[]);
        assert_eq!(
            assets.localize("https://fonts.example.org/a b.css", "", SiteKey::Main),
            "https://fonts.example.org/a%20b.css"
        );
        assert_eq!(
            assets.localize("http://[broken/x.png", "", SiteKey::Main),
            "http://%5Bbroken/x.png"
        );
    }

    #[test]
    fn test_non_web_schemes_are_encoded_not_joined() {
        let (_dir, assets) = fixture(&[]);
        assert_eq!(
            assets.resolve("ftp://files.example.org/a b.png", "blog", SiteKey::Main),
            AssetResolution::PassthroughEncoded("ftp://files.example.org/a%20b.png".to_string())
        );
        assert_eq!(
            assets.localize("tg://resolve?domain=x", "blog", SiteKey::Main),
            "tg://resolve?domain=x"
        );
        assert_eq!(assets.localize("sms:+9821", "", SiteKey::Main), "sms:+9821");
    }

    #[test]
    fn test_style_url_logo_override() {
        let (_dir, assets) = fixture(&[]);
        assert_eq!(
            assets.resolve_style_url("/img/site-logo.png", "", SiteKey::Main),
            AssetResolution::ForcedLogo("/Logo.png".to_string())
        );
    }

    #[test]
    fn test_mirror_lookup_rejects_traversal() {
        let (dir, assets) = fixture(&[]);
        fs::write(dir.path().join("secret.txt"), b"x").unwrap();
        assert_eq!(assets.ensure_local_asset("/legacy/../secret.txt"), None);
    }
}
