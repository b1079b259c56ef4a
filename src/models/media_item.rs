use serde::{Deserialize, Serialize};

use super::{BrandId, CategoryId};

pub type MediaId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "image" | "images" => Some(Self::Image),
            "video" | "videos" => Some(Self::Video),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: MediaId,
    pub title: String,
    pub kind: MediaKind,
    /// Locator of the asset, used for both the preview and the full view.
    pub source_url: String,
    pub category_id: CategoryId,
    #[serde(default)]
    pub brand_id: Option<BrandId>,
    pub created_at: i64,
    /// English/Arabic category name joined in by the store, when known.
    #[serde(skip)]
    pub category_name: Option<super::LocalizedName>,
}

impl MediaItem {
    pub fn new(id: MediaId, title: impl Into<String>, kind: MediaKind, category_id: CategoryId) -> Self {
        Self {
            id,
            title: title.into(),
            kind,
            source_url: String::new(),
            category_id,
            brand_id: None,
            created_at: 0,
            category_name: None,
        }
    }

    pub fn with_brand(mut self, brand_id: impl Into<BrandId>) -> Self {
        self.brand_id = Some(brand_id.into());
        self
    }

    pub fn with_source(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }

    /// True when the item is tagged with exactly this brand.
    pub fn has_brand(&self, brand_id: &str) -> bool {
        self.brand_id.as_deref() == Some(brand_id)
    }
}

/// Orders a media feed newest first; equal timestamps fall back to id ascending.
pub fn sort_newest_first(items: &mut [MediaItem]) {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
}
