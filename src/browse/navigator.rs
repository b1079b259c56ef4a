//! Category → brand → media drill-down and the active filter set.
//!
//! `BrowseNavigator` owns the three content slices as loaded so far, the
//! filter state, the view mode and the pagination window. Transitions are
//! plain `&mut self` methods (or `apply` with a `BrowseAction`); the visible
//! subset is always derived through the pure functions in `filter`.

use tracing::{debug, warn};

use super::filter::{full_match_count, visible_items, FilterState, Selection};
use super::pagination::PaginationWindow;
use crate::error::{BrowseError, ContentError};
use crate::loader::LoadRequest;
use crate::locale::Locale;
use crate::models::{
    brand_name, category_name, sort_newest_first, Brand, BrandId, Category, CategoryId, MediaItem,
    MediaKind,
};

/// Which level of the hierarchy is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Categories,
    Brands,
    Media,
}

/// A content slice as seen by the client.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Loadable<T> {
    #[default]
    Loading,
    Ready(T),
    Failed,
}

impl<T> Loadable<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// What the media grid should show.
#[derive(Debug, Clone, PartialEq)]
pub enum Grid {
    /// The media feed has not arrived yet.
    Loading,
    /// The feed failed to load; shown as an empty grid.
    Failed,
    /// Loaded, but nothing matches the filters.
    Empty,
    Items {
        visible: Vec<MediaItem>,
        total: usize,
        can_load_more: bool,
    },
}

/// User navigation, for hosts that prefer dispatching values.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseAction {
    SelectCategory(Selection<CategoryId>),
    SelectBrand(BrandId),
    BackToCategories,
    BackToBrands,
    SetKind(Selection<MediaKind>),
    SetSearch(String),
    LoadMore,
}

#[derive(Debug, Clone, Default)]
pub struct BrowseNavigator {
    categories: Loadable<Vec<Category>>,
    brands: Loadable<Vec<Brand>>,
    media: Loadable<Vec<MediaItem>>,
    filter: FilterState,
    view_mode: ViewMode,
    pagination: PaginationWindow,
}

impl BrowseNavigator {
    pub fn new(pagination: PaginationWindow) -> Self {
        Self {
            brands: Loadable::Ready(Vec::new()),
            pagination,
            ..Default::default()
        }
    }

    /// Loads needed before the first render.
    pub fn initial_requests(&self) -> [LoadRequest; 2] {
        [LoadRequest::Categories, LoadRequest::Media]
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn cutoff(&self) -> usize {
        self.pagination.cutoff()
    }

    pub fn categories(&self) -> &Loadable<Vec<Category>> {
        &self.categories
    }

    pub fn brands(&self) -> &Loadable<Vec<Brand>> {
        &self.brands
    }

    pub fn media(&self) -> &Loadable<Vec<MediaItem>> {
        &self.media
    }

    /// Category whose brands are being shown or filtered, if any.
    pub fn selected_category(&self) -> Option<CategoryId> {
        self.filter.category.as_only().copied()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    pub fn apply(&mut self, action: BrowseAction) -> Result<Option<LoadRequest>, BrowseError> {
        match action {
            BrowseAction::SelectCategory(selection) => Ok(self.select_category(selection)),
            BrowseAction::SelectBrand(brand_id) => self.select_brand(brand_id).map(|_| None),
            BrowseAction::BackToCategories => {
                self.go_back_to_categories();
                Ok(None)
            }
            BrowseAction::BackToBrands => {
                self.go_back_to_brands();
                Ok(None)
            }
            BrowseAction::SetKind(kind) => {
                self.set_kind_filter(kind);
                Ok(None)
            }
            BrowseAction::SetSearch(term) => {
                self.set_search_term(term);
                Ok(None)
            }
            BrowseAction::LoadMore => {
                self.load_more();
                Ok(None)
            }
        }
    }

    /// Picks a category, or `All` to jump straight to the unfiltered media.
    ///
    /// Returns the scoped brand fetch the host must start.
    pub fn select_category(&mut self, selection: Selection<CategoryId>) -> Option<LoadRequest> {
        self.filter.brand = Selection::All;
        self.pagination.reset();

        match selection {
            Selection::All => {
                self.filter.category = Selection::All;
                self.brands = Loadable::Ready(Vec::new());
                self.view_mode = ViewMode::Media;
                debug!("Showing all categories");
                None
            }
            Selection::Only(id) => {
                self.filter.category = Selection::Only(id);
                self.brands = Loadable::Loading;
                self.view_mode = ViewMode::Brands;
                debug!(category_id = id, "Selected category");
                Some(LoadRequest::Brands(id))
            }
        }
    }

    pub fn select_brand(&mut self, brand_id: BrandId) -> Result<(), BrowseError> {
        if self.filter.category.is_all() {
            return Err(BrowseError::NoCategorySelected);
        }
        debug!(%brand_id, "Selected brand");
        self.filter.brand = Selection::Only(brand_id);
        self.view_mode = ViewMode::Media;
        self.pagination.reset();
        Ok(())
    }

    pub fn go_back_to_categories(&mut self) {
        self.filter.category = Selection::All;
        self.filter.brand = Selection::All;
        self.brands = Loadable::Ready(Vec::new());
        self.view_mode = ViewMode::Categories;
        self.pagination.reset();
    }

    /// Returns false when there is no brand level to return to.
    pub fn go_back_to_brands(&mut self) -> bool {
        let has_brands = self.brands.ready().is_some_and(|b| !b.is_empty());
        if self.filter.category.is_all() || !has_brands {
            debug!("No brand level to go back to");
            return false;
        }
        self.filter.brand = Selection::All;
        self.view_mode = ViewMode::Brands;
        self.pagination.reset();
        true
    }

    pub fn set_kind_filter(&mut self, kind: Selection<MediaKind>) {
        self.filter.kind = kind;
        self.pagination.reset();
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filter.search = term.into();
        self.pagination.reset();
    }

    /// Reveals the next page; returns false when everything is already shown.
    pub fn load_more(&mut self) -> bool {
        let total = self.compute_full_match_count();
        self.pagination.load_more(total)
    }

    // =========================================================================
    // Load results
    // =========================================================================

    pub fn set_categories(&mut self, result: Result<Vec<Category>, ContentError>) {
        self.categories = match result {
            Ok(categories) => Loadable::Ready(categories),
            Err(e) => {
                warn!(error = %e, "Failed to load categories");
                Loadable::Failed
            }
        };
    }

    /// Applies a brand listing if it belongs to the currently selected category.
    ///
    /// Returns false for listings of a category the user already left.
    pub fn set_brands(&mut self, category_id: CategoryId, result: Result<Vec<Brand>, ContentError>) -> bool {
        if self.selected_category() != Some(category_id) {
            debug!(category_id, "Ignoring brands for a category no longer selected");
            return false;
        }
        self.brands = match result {
            Ok(brands) => Loadable::Ready(brands),
            Err(e) => {
                warn!(category_id, error = %e, "Failed to load brands");
                Loadable::Failed
            }
        };
        true
    }

    pub fn set_media(&mut self, result: Result<Vec<MediaItem>, ContentError>) {
        self.media = match result {
            Ok(mut items) => {
                sort_newest_first(&mut items);
                Loadable::Ready(items)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load media");
                Loadable::Failed
            }
        };
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    pub fn compute_visible_items(&self) -> Vec<MediaItem> {
        match self.media.ready() {
            Some(items) => visible_items(items, &self.filter, self.pagination.cutoff()),
            None => Vec::new(),
        }
    }

    pub fn compute_full_match_count(&self) -> usize {
        self.media
            .ready()
            .map(|items| full_match_count(items, &self.filter))
            .unwrap_or(0)
    }

    pub fn can_load_more(&self) -> bool {
        self.pagination.can_load_more(self.compute_full_match_count())
    }

    /// Whether the media grid is on screen: always in the media view, and
    /// under the category list while no category is selected.
    pub fn shows_media_grid(&self) -> bool {
        match self.view_mode {
            ViewMode::Media => true,
            ViewMode::Categories => self.filter.category.is_all(),
            ViewMode::Brands => false,
        }
    }

    pub fn grid(&self) -> Grid {
        match &self.media {
            Loadable::Loading => Grid::Loading,
            Loadable::Failed => Grid::Failed,
            Loadable::Ready(items) => {
                let total = full_match_count(items, &self.filter);
                if total == 0 {
                    return Grid::Empty;
                }
                Grid::Items {
                    visible: visible_items(items, &self.filter, self.pagination.cutoff()),
                    total,
                    can_load_more: self.pagination.can_load_more(total),
                }
            }
        }
    }

    pub fn category_name(&self, id: CategoryId, locale: Locale) -> &str {
        self.categories
            .ready()
            .map(|cats| category_name(cats, id, locale))
            .unwrap_or("")
    }

    pub fn brand_name(&self, id: &str, locale: Locale) -> &str {
        self.brands
            .ready()
            .map(|brands| brand_name(brands, id, locale))
            .unwrap_or("")
    }
}
