//! Build environment (development/production).

use std::fmt;
use std::str::FromStr;

/// Environment variables consulted when no `--env` flag is given, in order.
pub const ENV_VARS: [&str; 2] = ["QUIRE_ENV", "NODE_ENV"];

/// Build environment, resolved once per process and passed to every pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BuildEnv {
    /// Inline source maps, no minification.
    Development,
    /// Minified output without source maps.
    #[default]
    Production,
}

impl BuildEnv {
    /// Resolve from an optional override, falling back to the process environment.
    ///
    /// Unknown values are ignored (treated as unset) so a stray `NODE_ENV=test`
    /// does not block a build.
    pub fn resolve(explicit: Option<Self>) -> Self {
        explicit
            .or_else(|| Self::from_vars(|key| std::env::var(key).ok()))
            .unwrap_or_default()
    }

    /// Read the first recognized value from [`ENV_VARS`].
    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        ENV_VARS
            .iter()
            .filter_map(|key| lookup(key))
            .find_map(|value| value.parse().ok())
    }

    #[inline]
    pub const fn is_dev(self) -> bool {
        matches!(self, Self::Development)
    }

    #[inline]
    pub const fn is_prod(self) -> bool {
        matches!(self, Self::Production)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl FromStr for BuildEnv {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown build environment `{other}`")),
        }
    }
}

impl fmt::Display for BuildEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("development".parse(), Ok(BuildEnv::Development));
        assert_eq!("Production".parse(), Ok(BuildEnv::Production));
        assert_eq!(" dev ".parse(), Ok(BuildEnv::Development));
        assert!("staging".parse::<BuildEnv>().is_err());
    }

    #[test]
    fn test_explicit_wins() {
        assert_eq!(
            BuildEnv::resolve(Some(BuildEnv::Development)),
            BuildEnv::Development
        );
    }

    #[test]
    fn test_from_vars_order() {
        let lookup = |key: &str| match key {
            "QUIRE_ENV" => Some("development".to_string()),
            "NODE_ENV" => Some("production".to_string()),
            _ => None,
        };
        assert_eq!(BuildEnv::from_vars(lookup), Some(BuildEnv::Development));
    }

    #[test]
    fn test_from_vars_skips_unknown() {
        let lookup = |key: &str| match key {
            "QUIRE_ENV" => Some("test".to_string()),
            "NODE_ENV" => Some("development".to_string()),
            _ => None,
        };
        assert_eq!(BuildEnv::from_vars(lookup), Some(BuildEnv::Development));
    }

    #[test]
    fn test_default_is_production() {
        assert_eq!(BuildEnv::from_vars(|_| None), None);
        assert_eq!(BuildEnv::default(), BuildEnv::Production);
    }

    #[test]
    fn test_display() {
        assert_eq!(BuildEnv::Development.to_string(), "development");
        assert!(BuildEnv::Production.is_prod());
        assert!(BuildEnv::Development.is_dev());
    }
}
