//! Host classifier
//!
//! Maps every known legacy/current host name to one of the four canonical hosts.

use std::collections::HashMap;

use crate::config::SiteConfig;

/// Role of a host after canonicalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostClass {
    Primary,
    Panel,
    Api,
    Cdn,
    External,
}

/// Read-only alias table built once from the site configuration
#[derive(Debug, Clone)]
pub struct DomainRegistry {
    primary: String,
    panel: String,
    api: String,
    cdn: String,
    aliases: HashMap<String, String>,
}

impl DomainRegistry {
    pub fn new(config: &SiteConfig) -> Self {
        let domains = &config.domains;
        let mut aliases: HashMap<String, String> = config
            .resolved_aliases()
            .map(|(legacy, canonical)| (legacy.to_string(), canonical.to_string()))
            .collect();
        for canonical in [&domains.primary, &domains.panel, &domains.api, &domains.cdn] {
            aliases.insert(canonical.clone(), canonical.clone());
        }

        Self {
            primary: domains.primary.clone(),
            panel: domains.panel.clone(),
            api: domains.api.clone(),
            cdn: domains.cdn.clone(),
            aliases,
        }
    }

    /// Canonical host for `host`; unknown hosts map to themselves. Case-sensitive.
    pub fn canonicalize<'a>(&'a self, host: &'a str) -> &'a str {
        self.aliases.get(host).map(String::as_str).unwrap_or(host)
    }

    pub fn classify(&self, host: &str) -> HostClass {
        let canonical = self.canonicalize(host);
        if canonical == self.primary {
            HostClass::Primary
        } else if canonical == self.panel {
            HostClass::Panel
        } else if canonical == self.api {
            HostClass::Api
        } else if canonical == self.cdn {
            HostClass::Cdn
        } else {
            HostClass::External
        }
    }

    /// Primary host or any subdomain of it, after canonicalization
    pub fn is_same_site(&self, host: &str) -> bool {
        let canonical = self.canonicalize(host);
        canonical == self.primary
            || canonical
                .strip_suffix(self.primary.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    }

    /// Canonical host name for a classified role
    pub fn host_for(&self, class: HostClass) -> Option<&str> {
        match class {
            HostClass::Primary => Some(&self.primary),
            HostClass::Panel => Some(&self.panel),
            HostClass::Api => Some(&self.api),
            HostClass::Cdn => Some(&self.cdn),
            HostClass::External => None,
        }
    }

    /// Canonical hosts that may prefix a normalized relative asset path, in lookup order
    pub fn mirror_prefixes(&self) -> [&str; 3] {
        [&self.api, &self.panel, &self.primary]
    }
}
