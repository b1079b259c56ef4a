use serde::{Deserialize, Serialize};

use crate::locale::Locale;

pub type CategoryId = i64;
pub type BrandId = String;

/// A display name carried in every supported locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedName {
    #[serde(rename = "name_en")]
    pub en: String,
    #[serde(rename = "name_ar")]
    pub ar: String,
}

impl LocalizedName {
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
        }
    }

    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Ar => &self.ar,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    #[serde(flatten)]
    pub name: LocalizedName,
    #[serde(default)]
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    #[serde(flatten)]
    pub name: LocalizedName,
    pub category_id: CategoryId,
    #[serde(default)]
    pub created_at: i64,
}

/// Looks up a category display name; unknown ids render as an empty string.
pub fn category_name(categories: &[Category], id: CategoryId, locale: Locale) -> &str {
    categories
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name.get(locale))
        .unwrap_or("")
}

/// Looks up a brand display name; unknown ids render as an empty string.
pub fn brand_name<'a>(brands: &'a [Brand], id: &str, locale: Locale) -> &'a str {
    brands
        .iter()
        .find(|b| b.id == id)
        .map(|b| b.name.get(locale))
        .unwrap_or("")
}
