//! Brand text substitution
//!
//! The legacy brand appears in Persian and Latin script, with and without spaces,
//! hyphens and zero-width non-joiners, inside domain names and inside social handles.
//! Rules run in table order; longer and script-specific spellings come first so a
//! shorter pattern never eats part of a longer one.

use regex::{NoExpand, Regex, RegexBuilder};
use url::Url;

use crate::config::SiteConfig;

/// What a matched variant is replaced with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Replacement {
    SiteName,
    SiteNameFa,
    /// Social handle: first label of the primary domain
    Handle,
    /// Site name without whitespace, prefixed with "The"
    TheCompactName,
}

/// How a variant is matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Matcher {
    /// Exact substring
    Exact(&'static str),
    /// Case-insensitive regular expression
    Pattern(&'static str),
}

/// Variants that run before legacy domain names
const SCRIPT_VARIANTS: &[(Matcher, Replacement)] = &[
    (Matcher::Exact("\u{0645}\u{06cc}\u{0647}\u{0646} \u{0634}\u{0627}\u{067e}"), Replacement::SiteNameFa),
    (Matcher::Exact("\u{0645}\u{06cc}\u{0647}\u{0646}\u{200c}\u{0634}\u{0627}\u{067e}"), Replacement::SiteNameFa),
    (Matcher::Exact("\u{0645}\u{06cc}\u{0647}\u{0646}\u{0634}\u{0627}\u{067e}"), Replacement::SiteNameFa),
    (Matcher::Pattern("\u{0645}\u{06cc}\u{0647}\u{0646}[\\s\u{200c}]*\u{0634}\u{0627}\u{067e}"), Replacement::SiteNameFa),
];

/// Variants that run after legacy domain names
const LATIN_VARIANTS: &[(Matcher, Replacement)] = &[
    (Matcher::Pattern("mihanshopcom"), Replacement::Handle),
    (Matcher::Pattern("themihanshop"), Replacement::TheCompactName),
    (Matcher::Pattern(r"mihan\s*shop"), Replacement::SiteName),
    (Matcher::Pattern("mihan-shop"), Replacement::SiteName),
];

/// Known social profiles of the legacy brand: (host fragment, path pattern, new path).
///
/// `{handle}` and `{name}` in the new path expand to [`brand_handle`] and [`compact_name`].
pub const SOCIAL_PROFILE_REMAPS: &[(&str, &str, &str)] = &[
    ("instagram.com", r"^/mihanshopcom/?$", "/{handle}"),
    ("youtube.com", r"^/@mihanshop/?$", "/@{name}"),
    ("linkedin.com", r"^/company/mihanshop/?$", "/company/{handle}"),
    ("aparat.com", r"^/mihanshopcom/?$", "/{name}"),
];

#[derive(Debug, Clone)]
enum CompiledMatcher {
    Exact(&'static str),
    Regex(Regex),
}

#[derive(Debug, Clone)]
struct BrandRule {
    matcher: CompiledMatcher,
    replacement: String,
}

impl BrandRule {
    fn apply(&self, value: String) -> String {
        match &self.matcher {
            CompiledMatcher::Exact(needle) => {
                if value.contains(needle) {
                    value.replace(needle, &self.replacement)
                } else {
                    value
                }
            }
            CompiledMatcher::Regex(regex) => {
                if regex.is_match(&value) {
                    regex
                        .replace_all(&value, NoExpand(&self.replacement))
                        .into_owned()
                } else {
                    value
                }
            }
        }
    }
}

/// Ordered, compiled brand substitution rules
#[derive(Debug, Clone)]
pub struct BrandRules {
    rules: Vec<BrandRule>,
    social: Vec<(&'static str, Regex, String)>,
}

impl BrandRules {
    pub fn new(config: &SiteConfig) -> Self {
        let mut rules = Vec::new();

        for (matcher, replacement) in SCRIPT_VARIANTS {
            rules.push(compile(*matcher, *replacement, config));
        }

        // Longest first so "panel.old.com" is handled before "old.com"
        let mut legacy_hosts: Vec<(&str, &str)> = config.resolved_aliases().collect();
        legacy_hosts.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));
        for (legacy, canonical) in legacy_hosts {
            rules.push(BrandRule {
                matcher: CompiledMatcher::Regex(case_insensitive(&regex::escape(legacy))),
                replacement: canonical.to_string(),
            });
        }

        for (matcher, replacement) in LATIN_VARIANTS {
            rules.push(compile(*matcher, *replacement, config));
        }

        let social = SOCIAL_PROFILE_REMAPS
            .iter()
            .map(|(host, path, new_path)| {
                let new_path = new_path
                    .replace("{handle}", &brand_handle(config))
                    .replace("{name}", &compact_name(config));
                (*host, case_insensitive(path), new_path)
            })
            .collect();

        Self { rules, social }
    }

    /// Replaces every legacy brand variant and legacy domain in `value`
    pub fn replace_site_name(&self, value: &str) -> String {
        if value.is_empty() {
            return String::new();
        }
        self.rules
            .iter()
            .fold(value.to_string(), |text, rule| rule.apply(text))
    }

    /// Points known legacy social profiles at the new brand's profiles.
    ///
    /// Any other URL, including unparseable ones, is returned untouched.
    pub fn rewrite_external_brand_url(&self, raw_url: &str) -> String {
        if !crate::utils::is_url_and_has_protocol(raw_url.trim()) {
            return raw_url.to_string();
        }

        let Ok(mut url) = Url::parse(raw_url.trim()) else {
            return raw_url.to_string();
        };
        let host = url.host_str().unwrap_or_default().to_lowercase();

        let remap = self
            .social
            .iter()
            .find(|(platform, path, _)| host.contains(platform) && path.is_match(url.path()));

        match remap {
            Some((_, _, new_path)) => {
                url.set_path(new_path);
                url.to_string()
            }
            None => raw_url.to_string(),
        }
    }
}

fn compile(matcher: Matcher, replacement: Replacement, config: &SiteConfig) -> BrandRule {
    let matcher = match matcher {
        Matcher::Exact(needle) => CompiledMatcher::Exact(needle),
        Matcher::Pattern(pattern) => CompiledMatcher::Regex(case_insensitive(pattern)),
    };
    let replacement = match replacement {
        Replacement::SiteName => config.site_name.clone(),
        Replacement::SiteNameFa => config.site_name_fa.clone(),
        Replacement::Handle => brand_handle(config),
        Replacement::TheCompactName => format!("The{}", compact_name(config)),
    };
    BrandRule {
        matcher,
        replacement,
    }
}

/// Social handle of the new brand, e.g. `websithebama` for `websithebama.com`
pub fn brand_handle(config: &SiteConfig) -> String {
    let primary = &config.domains.primary;
    primary.split('.').next().unwrap_or(primary).to_string()
}

/// Site name with whitespace removed, e.g. `WebsiteBama`
pub fn compact_name(config: &SiteConfig) -> String {
    config.site_name.split_whitespace().collect()
}

fn case_insensitive(pattern: &str) -> Regex {
    // patterns are static table entries or escaped host names
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("brand pattern must compile")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FA_LEGACY_SPACED: &str = "\u{0645}\u{06cc}\u{0647}\u{0646} \u{0634}\u{0627}\u{067e}";
    const FA_LEGACY_ZWNJ: &str = "\u{0645}\u{06cc}\u{0647}\u{0646}\u{200c}\u{0634}\u{0627}\u{067e}";
    const FA_LEGACY_JOINED: &str = "\u{0645}\u{06cc}\u{0647}\u{0646}\u{0634}\u{0627}\u{067e}";
    const FA_LEGACY_ROOT: &str = "\u{0645}\u{06cc}\u{0647}\u{0646}";

    fn rules() -> (BrandRules, SiteConfig) {
        let config = SiteConfig::default();
        (BrandRules::new(&config), config)
    }

    #[test]
    fn test_every_variant_is_replaced() {
        let (rules, config) = rules();
        let input = format!(
            "{} | {} | {} | {}  \u{0634}\u{0627}\u{067e} | MihanShop | mihan-shop | Mihan Shop | MIHANSHOP",
            FA_LEGACY_SPACED, FA_LEGACY_ZWNJ, FA_LEGACY_JOINED, FA_LEGACY_ROOT
        );

        let output = rules.replace_site_name(&input);

        assert!(!output.to_lowercase().contains("mihan"));
        assert!(!output.contains(FA_LEGACY_ROOT));
        assert_eq!(output.matches(config.site_name.as_str()).count(), 4);
        assert_eq!(output.matches(config.site_name_fa.as_str()).count(), 4);
    }

    #[test]
    fn test_domains_are_replaced_before_brand_words() {
        let (rules, _) = rules();
        let output = rules.replace_site_name(
            "Visit mihanshop.com, panel.mihanshop.com or API.MIHANSHOP.COM",
        );
        assert_eq!(
            output,
            "Visit websithebama.com, panel.websithebama.com or api.websithebama.com"
        );
    }

    #[test]
    fn test_handles_are_replaced() {
        let (rules, _) = rules();
        assert_eq!(
            rules.replace_site_name("@mihanshopcom and TheMihanShop"),
            "@websithebama and TheWebsiteBama"
        );
    }

    #[test]
    fn test_unrelated_text_is_untouched() {
        let (rules, _) = rules();
        assert_eq!(rules.replace_site_name("Shop with us"), "Shop with us");
        assert_eq!(rules.replace_site_name(""), "");
    }

    #[test]
    fn test_replacement_is_idempotent() {
        let (rules, _) = rules();
        let once = rules.replace_site_name("MihanShop - mihanshop.com");
        assert_eq!(rules.replace_site_name(&once), once);
    }

    #[test]
    fn test_social_profiles_are_remapped() {
        let (rules, _) = rules();
        assert_eq!(
            rules.rewrite_external_brand_url("https://www.instagram.com/mihanshopcom/"),
            "https://www.instagram.com/websithebama"
        );
        assert_eq!(
            rules.rewrite_external_brand_url("https://youtube.com/@MihanShop"),
            "https://youtube.com/@WebsiteBama"
        );
        assert_eq!(
            rules.rewrite_external_brand_url("https://www.linkedin.com/company/mihanshop"),
            "https://www.linkedin.com/company/websithebama"
        );
        assert_eq!(
            rules.rewrite_external_brand_url("https://www.aparat.com/mihanshopcom"),
            "https://www.aparat.com/WebsiteBama"
        );
    }

    #[test]
    fn test_handles_follow_the_configuration() {
        let mut config = SiteConfig::default();
        config.site_name = "Acme Goods".to_string();
        config.domains.primary = "acmegoods.test".to_string();
        let rules = BrandRules::new(&config);

        assert_eq!(
            rules.replace_site_name("@mihanshopcom, TheMihanShop, mihanshop.com"),
            "@acmegoods, TheAcmeGoods, acmegoods.test"
        );
        assert_eq!(
            rules.rewrite_external_brand_url("https://youtube.com/@mihanshop"),
            "https://youtube.com/@AcmeGoods"
        );
        assert_eq!(
            rules.rewrite_external_brand_url("https://instagram.com/mihanshopcom"),
            "https://instagram.com/acmegoods"
        );
    }

    #[test]
    fn test_other_urls_pass_through_verbatim() {
        let (rules, _) = rules();
        for url in [
            "https://www.instagram.com/someone_else",
            "https://example.com",
            "/about",
            "mailto:info@example.com",
            "https://[broken",
        ] {
            assert_eq!(rules.rewrite_external_brand_url(url), url);
        }
    }
}
