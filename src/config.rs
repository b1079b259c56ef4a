//! Runtime configuration: defaults, then `FOLIO_*` environment variables,
//! then command line flags (applied in `main`).

use std::path::PathBuf;

use tracing::warn;

use crate::browse::{INITIAL_CUTOFF, PAGE_INCREMENT};
use crate::contact::{EmailJsConfig, DEFAULT_EMAILJS_ENDPOINT};
use crate::locale::Locale;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Content database; `None` selects the XDG default.
    pub db_path: Option<PathBuf>,
    pub locale: Locale,
    pub page_size: usize,
    pub page_increment: usize,
    pub emailjs: EmailJsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            locale: Locale::En,
            page_size: INITIAL_CUTOFF,
            page_increment: PAGE_INCREMENT,
            emailjs: EmailJsConfig {
                endpoint: DEFAULT_EMAILJS_ENDPOINT.to_string(),
                ..Default::default()
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = var("FOLIO_DB") {
            config.db_path = Some(PathBuf::from(path));
        }
        if let Some(locale) = var("FOLIO_LOCALE") {
            match locale.parse() {
                Ok(locale) => config.locale = locale,
                Err(e) => warn!(error = %e, "Ignoring FOLIO_LOCALE"),
            }
        }
        if let Some(n) = var("FOLIO_PAGE_SIZE").and_then(|v| parse_positive(&v)) {
            config.page_size = n;
        }
        if let Some(n) = var("FOLIO_PAGE_INCREMENT").and_then(|v| parse_positive(&v)) {
            config.page_increment = n;
        }
        if let Some(endpoint) = var("FOLIO_EMAILJS_ENDPOINT") {
            config.emailjs.endpoint = endpoint;
        }
        config.emailjs.service_id = var("FOLIO_EMAILJS_SERVICE_ID");
        config.emailjs.template_id = var("FOLIO_EMAILJS_TEMPLATE_ID");
        config.emailjs.public_key = var("FOLIO_EMAILJS_PUBLIC_KEY");

        config
    }
}

fn parse_positive(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok().filter(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.page_size, 8);
        assert_eq!(config.page_increment, 4);
        assert_eq!(config.emailjs.endpoint, DEFAULT_EMAILJS_ENDPOINT);
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("FOLIO_DB", "/tmp/folio.sqlite"),
            ("FOLIO_LOCALE", "ar"),
            ("FOLIO_PAGE_SIZE", "12"),
            ("FOLIO_EMAILJS_SERVICE_ID", "service_1"),
        ]));
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/folio.sqlite")));
        assert_eq!(config.locale, Locale::Ar);
        assert_eq!(config.page_size, 12);
        assert_eq!(config.page_increment, 4);
        assert_eq!(config.emailjs.service_id.as_deref(), Some("service_1"));
        assert!(config.emailjs.public_key.is_none());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("FOLIO_LOCALE", "klingon"),
            ("FOLIO_PAGE_SIZE", "0"),
            ("FOLIO_PAGE_INCREMENT", "many"),
            ("FOLIO_DB", "  "),
        ]));
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.page_size, 8);
        assert_eq!(config.page_increment, 4);
        assert!(config.db_path.is_none());
    }
}
