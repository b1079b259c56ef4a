//! Fluent message bundles for the terminal host, one per supported locale.

use std::collections::HashMap;

use fluent_bundle::{FluentArgs, FluentBundle, FluentResource};
use tracing::warn;
use unic_langid::LanguageIdentifier;

use crate::locale::Locale;

const EN_FTL: &str = include_str!("../assets/i18n/en.ftl");
const AR_FTL: &str = include_str!("../assets/i18n/ar.ftl");

pub struct Messages {
    bundles: HashMap<Locale, FluentBundle<FluentResource>>,
}

impl Default for Messages {
    fn default() -> Self {
        Self::new()
    }
}

impl Messages {
    pub fn new() -> Self {
        let bundles = [(Locale::En, EN_FTL), (Locale::Ar, AR_FTL)]
            .into_iter()
            .map(|(locale, source)| (locale, load_bundle(locale, source)))
            .collect();
        Self { bundles }
    }

    pub fn tr(&self, locale: Locale, key: &str) -> String {
        self.format(locale, key, None)
    }

    pub fn tr_args(&self, locale: Locale, key: &str, args: &FluentArgs) -> String {
        self.format(locale, key, Some(args))
    }

    /// Missing keys come back as the key itself.
    fn format(&self, locale: Locale, key: &str, args: Option<&FluentArgs>) -> String {
        let pattern = self
            .bundles
            .get(&locale)
            .and_then(|bundle| Some((bundle, bundle.get_message(key)?.value()?)));
        let Some((bundle, pattern)) = pattern else {
            warn!(%locale, key, "Missing message");
            return key.to_string();
        };

        let mut errors = Vec::new();
        let value = bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            warn!(%locale, key, ?errors, "Failed to format message");
        }
        value.into_owned()
    }
}

fn load_bundle(locale: Locale, source: &str) -> FluentBundle<FluentResource> {
    let langid: LanguageIdentifier = locale.code().parse().unwrap_or_default();
    let mut bundle = FluentBundle::new(vec![langid]);
    // Terminal output has no use for bidi isolation marks around placeables.
    bundle.set_use_isolating(false);

    let resource = FluentResource::try_new(source.to_string()).unwrap_or_else(|(resource, errors)| {
        warn!(%locale, ?errors, "Message bundle has syntax errors");
        resource
    });
    if let Err(errors) = bundle.add_resource(resource) {
        warn!(%locale, ?errors, "Failed to add message bundle");
    }
    bundle
}
