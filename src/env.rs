//! Typed environment variable access
//!
//! Every variable the engine honours is declared once as a unit struct implementing
//! [`EnvVar`], carrying its name, default, description and parser.

use std::env;
use std::fmt;
use std::path::PathBuf;

/// Environment variable parse error
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// Accessor trait for a single environment variable
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    /// `Ok(None)` when unset, so callers can tell "absent" from "invalid"
    fn lookup() -> EnvResult<Option<T>> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value).map(Some),
            Err(_) => Ok(None),
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// Process-level settings
pub mod logging {
    use super::*;

    /// Log level
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "REHOST_LOG_LEVEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("warn".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// Disable colored output
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Disable colored output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            Ok(!value.is_empty())
        }
    }
}

/// Filesystem locations
pub mod paths {
    use super::*;

    /// Explicit configuration file
    pub struct ConfigFile;
    impl EnvVar<PathBuf> for ConfigFile {
        const NAME: &'static str = "REHOST_CONFIG";
        const DEFAULT: Option<PathBuf> = None;
        const DESCRIPTION: &'static str = "Path to a TOML or JSON site configuration file";

        fn parse(value: &str) -> EnvResult<PathBuf> {
            parse_path(value, Self::NAME)
        }
    }

    /// Directory holding one archive tree per canonical host
    pub struct ArchiveRoot;
    impl EnvVar<PathBuf> for ArchiveRoot {
        const NAME: &'static str = "REHOST_ARCHIVE_ROOT";
        const DEFAULT: Option<PathBuf> = None;
        const DESCRIPTION: &'static str = "Directory containing the archived HTML trees";

        fn parse(value: &str) -> EnvResult<PathBuf> {
            parse_path(value, Self::NAME)
        }
    }

    /// Public directory holding `legacy/` and `remote/` asset mirrors
    pub struct PublicRoot;
    impl EnvVar<PathBuf> for PublicRoot {
        const NAME: &'static str = "REHOST_PUBLIC_ROOT";
        const DEFAULT: Option<PathBuf> = None;
        const DESCRIPTION: &'static str = "Directory containing the legacy/ and remote/ asset mirrors";

        fn parse(value: &str) -> EnvResult<PathBuf> {
            parse_path(value, Self::NAME)
        }
    }
}

/// Branding overrides
pub mod brand {
    use super::*;

    /// New brand name (Latin script)
    pub struct SiteName;
    impl EnvVar<String> for SiteName {
        const NAME: &'static str = "REHOST_SITE_NAME";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Brand name substituted for the legacy name";

        fn parse(value: &str) -> EnvResult<String> {
            let name = value.trim();
            if name.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Site name cannot be empty".to_string(),
                });
            }
            Ok(name.to_string())
        }
    }

    /// Public URL of the canonical logo
    pub struct LogoPath;
    impl EnvVar<String> for LogoPath {
        const NAME: &'static str = "REHOST_LOGO_PATH";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Site-relative URL of the canonical logo image";

        fn parse(value: &str) -> EnvResult<String> {
            let path = value.trim();
            if !path.starts_with('/') {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Logo path '{}' must start with '/'", path),
                });
            }
            Ok(path.to_string())
        }
    }
}

fn parse_path(value: &str, var_name: &str) -> EnvResult<PathBuf> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: "Path cannot be empty".to_string(),
        });
    }
    Ok(PathBuf::from(shellexpand::tilde(trimmed).as_ref()))
}

/// Markdown listing of every supported variable
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables\n\n");
    docs.push_str(&format!("- `{}`: {}\n", logging::LogLevel::NAME, logging::LogLevel::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {}\n", logging::NoColor::NAME, logging::NoColor::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {}\n", paths::ConfigFile::NAME, paths::ConfigFile::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {}\n", paths::ArchiveRoot::NAME, paths::ArchiveRoot::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {}\n", paths::PublicRoot::NAME, paths::PublicRoot::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {}\n", brand::SiteName::NAME, brand::SiteName::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {}\n", brand::LogoPath::NAME, brand::LogoPath::DESCRIPTION));
    docs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(logging::LogLevel::parse("DEBUG").unwrap(), "debug");
        assert_eq!(logging::LogLevel::parse("warn").unwrap(), "warn");
        assert!(logging::LogLevel::parse("loud").is_err());
    }

    #[test]
    fn test_path_parsing() {
        assert_eq!(
            paths::ArchiveRoot::parse(" /srv/legacy ").unwrap(),
            PathBuf::from("/srv/legacy")
        );
        assert!(paths::PublicRoot::parse("   ").is_err());
    }

    #[test]
    fn test_brand_parsing() {
        assert_eq!(brand::SiteName::parse(" Website Bama ").unwrap(), "Website Bama");
        assert!(brand::SiteName::parse("").is_err());
        assert_eq!(brand::LogoPath::parse("/Logo.png").unwrap(), "/Logo.png");
        assert!(brand::LogoPath::parse("Logo.png").is_err());
    }

    #[test]
    fn test_lookup_unset_is_none() {
        struct Unset;
        impl EnvVar<String> for Unset {
            const NAME: &'static str = "REHOST_TEST_SURELY_UNSET_VARIABLE";
            const DEFAULT: Option<String> = None;
            const DESCRIPTION: &'static str = "";

            fn parse(value: &str) -> EnvResult<String> {
                Ok(value.to_string())
            }
        }

        assert!(Unset::lookup().unwrap().is_none());
        assert!(Unset::get().is_err());
        assert_eq!(Unset::get_or_default("x".to_string()), "x");
    }

    #[test]
    fn test_env_docs_list_every_variable() {
        let docs = generate_env_docs();
        for name in [
            "REHOST_LOG_LEVEL",
            "REHOST_CONFIG",
            "REHOST_ARCHIVE_ROOT",
            "REHOST_PUBLIC_ROOT",
            "REHOST_SITE_NAME",
            "REHOST_LOGO_PATH",
        ] {
            assert!(docs.contains(name), "missing {}", name);
        }
    }
}
