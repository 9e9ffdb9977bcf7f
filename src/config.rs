//! Site configuration
//!
//! Brand names, canonical domains, legacy host aliases and the filesystem roots the engine
//! reads from. Loaded once at startup (file, then environment overrides) and shared
//! read-only by every component.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RehostError, RehostResult};

/// Files probed, in order, when no explicit configuration path is given
pub const CONFIG_PATHS: &[&str] = &["rehost.toml", "rehost.json", "~/.config/rehost/rehost.toml"];

/// `.env` files probed, in order; the first one found is loaded
const ENV_FILES: &[&str] = &[".env.local", ".env"];

/// The four canonical hosts of the new brand
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Domains {
    pub primary: String,
    pub panel: String,
    pub api: String,
    pub cdn: String,
}

impl Default for Domains {
    fn default() -> Self {
        Self {
            primary: "websithebama.com".to_string(),
            panel: "panel.websithebama.com".to_string(),
            api: "api.websithebama.com".to_string(),
            cdn: "cdn.websithebama.com".to_string(),
        }
    }
}

/// Full engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// New brand name, Latin script
    pub site_name: String,
    /// New brand name, Persian script
    pub site_name_fa: String,
    pub domains: Domains,
    /// Legacy host -> canonical host, or one of the roles `primary`, `panel`, `api`, `cdn`
    /// (resolved against `domains`, so overriding a domain moves its aliases with it)
    pub legacy_aliases: BTreeMap<String, String>,
    /// Holds `<primary>/` and `<panel>/` archive trees
    pub archive_root: PathBuf,
    /// Holds the `legacy/` and `remote/` asset mirrors
    pub public_root: PathBuf,
    /// Site-relative URL of the canonical logo
    pub logo_path: String,
    /// First route segment that switches to the panel archive
    pub panel_prefix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let legacy_aliases = [
            ("mihanshop.com", "primary"),
            ("www.mihanshop.com", "primary"),
            ("panel.mihanshop.com", "panel"),
            ("api.mihanshop.com", "api"),
            ("cdn.mihanshop.com", "cdn"),
        ]
        .into_iter()
        .map(|(legacy, role)| (legacy.to_string(), role.to_string()))
        .collect();

        Self {
            site_name: "Website Bama".to_string(),
            site_name_fa: "\u{0648}\u{0628}\u{0633}\u{0627}\u{06cc}\u{062a}\u{0647} \u{0628}\u{0627} \u{0645}\u{0627}"
                .to_string(),
            domains: Domains::default(),
            legacy_aliases,
            archive_root: PathBuf::from("legacy"),
            public_root: PathBuf::from("public"),
            logo_path: "/Logo.png".to_string(),
            panel_prefix: "panel".to_string(),
        }
    }
}

impl SiteConfig {
    /// Loads `.env`, then the first configuration file found, then environment overrides
    pub fn load(explicit_path: Option<&Path>) -> RehostResult<Self> {
        use crate::env::{paths, EnvVar};

        Self::load_dotenv();

        let from_env = paths::ConfigFile::lookup()?;
        let path = explicit_path.map(Path::to_path_buf).or(from_env);

        let mut config = match path {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::probe_default_paths()?,
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn probe_default_paths() -> RehostResult<Self> {
        for path in CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            let candidate = Path::new(expanded.as_ref());
            if candidate.exists() {
                tracing::info!("loading configuration from {}", candidate.display());
                return Self::load_from_file(candidate);
            }
        }

        tracing::info!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Parses a TOML file (by `.toml` extension) or JSON file
    pub fn load_from_file(path: &Path) -> RehostResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RehostError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content).map_err(|e| {
                RehostError::Config(format!("failed to parse TOML {}: {}", path.display(), e))
            })
        } else {
            serde_json::from_str(&content).map_err(|e| {
                RehostError::Config(format!("failed to parse JSON {}: {}", path.display(), e))
            })
        }
    }

    fn load_dotenv() {
        for env_file in ENV_FILES {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("loaded environment file {}", env_file);
                break;
            }
        }
    }

    /// Applies `REHOST_*` overrides; unset variables leave the value alone
    pub fn apply_env_overrides(&mut self) -> RehostResult<()> {
        use crate::env::{brand, paths, EnvVar};

        if let Some(archive_root) = paths::ArchiveRoot::lookup()? {
            self.archive_root = archive_root;
        }
        if let Some(public_root) = paths::PublicRoot::lookup()? {
            self.public_root = public_root;
        }
        if let Some(site_name) = brand::SiteName::lookup()? {
            self.site_name = site_name;
        }
        if let Some(logo_path) = brand::LogoPath::lookup()? {
            self.logo_path = logo_path;
        }
        Ok(())
    }

    pub fn validate(&self) -> RehostResult<()> {
        if self.site_name.trim().is_empty() {
            return Err(RehostError::Config("site_name cannot be empty".to_string()));
        }

        let domains = [
            &self.domains.primary,
            &self.domains.panel,
            &self.domains.api,
            &self.domains.cdn,
        ];
        for domain in domains {
            if domain.is_empty() || domain.contains('/') || domain.to_lowercase() != *domain {
                return Err(RehostError::Config(format!(
                    "invalid canonical domain '{}': expected a lowercase host name",
                    domain
                )));
            }
        }

        for (legacy, canonical) in &self.legacy_aliases {
            if self.canonical_host(canonical).is_none() {
                return Err(RehostError::Config(format!(
                    "legacy host '{}' maps to '{}', which is not a canonical domain",
                    legacy, canonical
                )));
            }
        }

        if !self.logo_path.starts_with('/') {
            return Err(RehostError::Config(format!(
                "logo_path '{}' must start with '/'",
                self.logo_path
            )));
        }

        if self.panel_prefix.is_empty() || self.panel_prefix.contains('/') {
            return Err(RehostError::Config(format!(
                "panel_prefix '{}' must be a single route segment",
                self.panel_prefix
            )));
        }

        Ok(())
    }

    /// Canonical host named by an alias target: a role name or one of the canonical hosts
    pub fn canonical_host<'a>(&'a self, target: &'a str) -> Option<&'a str> {
        let domains = &self.domains;
        match target {
            "primary" => Some(domains.primary.as_str()),
            "panel" => Some(domains.panel.as_str()),
            "api" => Some(domains.api.as_str()),
            "cdn" => Some(domains.cdn.as_str()),
            host if [&domains.primary, &domains.panel, &domains.api, &domains.cdn]
                .iter()
                .any(|domain| domain.as_str() == host) =>
            {
                Some(host)
            }
            _ => None,
        }
    }

    /// Legacy host -> canonical host pairs; aliases with an unknown target are skipped
    pub fn resolved_aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.legacy_aliases.iter().filter_map(|(legacy, target)| {
            self.canonical_host(target)
                .map(|canonical| (legacy.as_str(), canonical))
        })
    }

    /// Archive tree of the main site
    pub fn main_root(&self) -> PathBuf {
        self.archive_root.join(&self.domains.primary)
    }

    /// Archive tree of the panel site
    pub fn panel_root(&self) -> PathBuf {
        self.archive_root.join(&self.domains.panel)
    }

    /// Writes the default configuration as TOML
    pub fn generate_example_config(path: &Path) -> RehostResult<()> {
        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| RehostError::Config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            RehostError::Config(format!("failed to write {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SiteConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.main_root(), PathBuf::from("legacy/websithebama.com"));
        assert_eq!(config.panel_root(), PathBuf::from("legacy/panel.websithebama.com"));
        assert!(config
            .resolved_aliases()
            .any(|alias| alias == ("panel.mihanshop.com", "panel.websithebama.com")));
    }

    #[test]
    fn test_aliases_follow_overridden_domains() {
        let config: SiteConfig = toml::from_str(
            r#"
            [domains]
            primary = "acme.test"
            "#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        let aliases: BTreeMap<&str, &str> = config.resolved_aliases().collect();
        assert_eq!(aliases["mihanshop.com"], "acme.test");
        assert_eq!(aliases["www.mihanshop.com"], "acme.test");
        assert_eq!(aliases["cdn.mihanshop.com"], "cdn.websithebama.com");
    }

    #[test]
    fn test_alias_targets_may_be_hosts_or_roles() {
        let mut config = SiteConfig::default();
        config
            .legacy_aliases
            .insert("old.example".to_string(), "api.websithebama.com".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(config.canonical_host("cdn"), Some("cdn.websithebama.com"));
        assert_eq!(config.canonical_host("old.example"), None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SiteConfig = toml::from_str(
            r#"
            site_name = "Acme"
            archive_root = "/srv/archive"

            [domains]
            primary = "acme.test"
            "#,
        )
        .unwrap();

        assert_eq!(config.site_name, "Acme");
        assert_eq!(config.archive_root, PathBuf::from("/srv/archive"));
        assert_eq!(config.domains.primary, "acme.test");
        assert_eq!(config.domains.panel, "panel.websithebama.com");
        assert_eq!(config.logo_path, "/Logo.png");
    }

    #[test]
    fn test_validate_rejects_unknown_alias_target() {
        let mut config = SiteConfig::default();
        config
            .legacy_aliases
            .insert("old.example".to_string(), "elsewhere.example".to_string());
        assert!(matches!(config.validate(), Err(RehostError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_uppercase_domain() {
        let mut config = SiteConfig::default();
        config.domains.cdn = "CDN.websithebama.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_example_config_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rehost.toml");
        SiteConfig::generate_example_config(&path).unwrap();

        let loaded = SiteConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, SiteConfig::default());
    }

    #[test]
    fn test_json_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.json");
        std::fs::write(&path, r#"{"site_name": "Acme", "logo_path": "/acme.svg"}"#).unwrap();

        let loaded = SiteConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.site_name, "Acme");
        assert_eq!(loaded.logo_path, "/acme.svg");
    }
}
