//! Portfolio browsing: filters, drill-down navigation and pagination.

pub mod filter;
pub mod navigator;
pub mod pagination;

pub use filter::{full_match_count, visible_items, FilterState, Selection};
pub use navigator::{BrowseAction, BrowseNavigator, Grid, Loadable, ViewMode};
pub use pagination::{PaginationWindow, INITIAL_CUTOFF, PAGE_INCREMENT};
