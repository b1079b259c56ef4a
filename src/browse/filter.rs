//! Filter state and the pure derivations over a media feed.

use crate::models::{BrandId, CategoryId, MediaItem, MediaKind};

/// A filter clause that either matches everything or one specific value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T> Selection<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn as_only(&self) -> Option<&T> {
        match self {
            Self::All => None,
            Self::Only(v) => Some(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub category: Selection<CategoryId>,
    pub brand: Selection<BrandId>,
    pub kind: Selection<MediaKind>,
    pub search: String,
}

impl FilterState {
    /// Evaluates every clause; `All` is itself a clause that always holds.
    pub fn matches(&self, item: &MediaItem) -> bool {
        let search = self.search.to_lowercase();
        self.matches_with_needle(item, &search)
    }

    fn matches_with_needle(&self, item: &MediaItem, needle: &str) -> bool {
        let category = match &self.category {
            Selection::All => true,
            Selection::Only(id) => item.category_id == *id,
        };
        let brand = match &self.brand {
            Selection::All => true,
            Selection::Only(id) => item.has_brand(id),
        };
        let kind = match &self.kind {
            Selection::All => true,
            Selection::Only(kind) => item.kind == *kind,
        };
        let search = item.title.to_lowercase().contains(needle);

        category && brand && kind && search
    }

    fn matching<'a>(&'a self, items: &'a [MediaItem]) -> impl Iterator<Item = &'a MediaItem> + 'a {
        let needle = self.search.to_lowercase();
        items
            .iter()
            .filter(move |item| self.matches_with_needle(item, &needle))
    }
}

/// Items passing the filter, in feed order, truncated to `cutoff`.
pub fn visible_items(items: &[MediaItem], filter: &FilterState, cutoff: usize) -> Vec<MediaItem> {
    filter.matching(items).take(cutoff).cloned().collect()
}

/// Number of items passing the filter, ignoring the cutoff.
pub fn full_match_count(items: &[MediaItem], filter: &FilterState) -> usize {
    filter.matching(items).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed() -> Vec<MediaItem> {
        vec![
            MediaItem::new(1, "Sarah & John's Wedding", MediaKind::Image, 5).with_brand("vows"),
            MediaItem::new(2, "Mountain Landscapes", MediaKind::Image, 3),
            MediaItem::new(3, "Wedding Film", MediaKind::Video, 5).with_brand("vows"),
            MediaItem::new(4, "Sneaker Launch", MediaKind::Video, 7).with_brand("kicks"),
            MediaItem::new(5, "Studio Portrait", MediaKind::Image, 5),
        ]
    }

    fn ids(items: &[MediaItem]) -> Vec<i64> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_default_filter_matches_everything() {
        let items = feed();
        let filter = FilterState::default();
        assert_eq!(full_match_count(&items, &filter), 5);
        assert_eq!(ids(&visible_items(&items, &filter, 100)), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let items = vec![
            MediaItem::new(1, "Sarah & John's Wedding", MediaKind::Image, 1),
            MediaItem::new(2, "Mountain Landscapes", MediaKind::Image, 1),
        ];
        let filter = FilterState {
            search: "wedding".into(),
            ..Default::default()
        };
        assert_eq!(ids(&visible_items(&items, &filter, 8)), vec![1]);

        let filter = FilterState {
            search: "LAND".into(),
            ..Default::default()
        };
        assert_eq!(ids(&visible_items(&items, &filter, 8)), vec![2]);
    }

    #[test]
    fn test_search_is_not_trimmed() {
        let items = feed();
        let filter = FilterState {
            search: " wedding ".into(),
            ..Default::default()
        };
        assert_eq!(full_match_count(&items, &filter), 0);
    }

    #[test]
    fn test_all_clauses_combine() {
        let items = feed();
        let filter = FilterState {
            category: Selection::Only(5),
            brand: Selection::Only("vows".into()),
            kind: Selection::Only(MediaKind::Video),
            search: "film".into(),
        };
        assert_eq!(ids(&visible_items(&items, &filter, 8)), vec![3]);
    }

    #[test]
    fn test_brand_filter_skips_unbranded_items() {
        let items = feed();
        let filter = FilterState {
            category: Selection::Only(5),
            brand: Selection::Only("vows".into()),
            ..Default::default()
        };
        assert_eq!(ids(&visible_items(&items, &filter, 8)), vec![1, 3]);
    }

    #[test]
    fn test_orphaned_category_only_under_all() {
        // Category 3 no longer exists upstream; the item still shows under "all".
        let items = feed();
        let all = FilterState::default();
        assert!(all.matches(&items[1]));

        let other = FilterState {
            category: Selection::Only(5),
            ..Default::default()
        };
        assert!(!other.matches(&items[1]));
    }

    #[test]
    fn test_visible_respects_cutoff_and_predicates() {
        let items = feed();
        let filters = [
            FilterState::default(),
            FilterState {
                kind: Selection::Only(MediaKind::Image),
                ..Default::default()
            },
            FilterState {
                category: Selection::Only(5),
                search: "w".into(),
                ..Default::default()
            },
        ];
        for filter in &filters {
            for cutoff in 0..7 {
                let visible = visible_items(&items, filter, cutoff);
                assert!(visible.len() <= cutoff);
                assert!(visible.iter().all(|item| filter.matches(item)));
            }
        }
    }

    #[test]
    fn test_visible_is_prefix_of_uncut_result() {
        let items = feed();
        let filter = FilterState {
            kind: Selection::Only(MediaKind::Image),
            ..Default::default()
        };
        let full = visible_items(&items, &filter, usize::MAX);
        for cutoff in 0..=full.len() + 2 {
            let visible = visible_items(&items, &filter, cutoff);
            assert_eq!(visible.as_slice(), &full[..visible.len()]);
        }
    }
}
