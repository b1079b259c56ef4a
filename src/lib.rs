//! Portfolio browsing engine: category → brand → media drill-down, filtering,
//! paging and a keyboard-driven lightbox over a read-only content store.

pub mod app;
pub mod browse;
pub mod config;
pub mod contact;
pub mod error;
pub mod i18n;
pub mod loader;
pub mod locale;
pub mod models;
pub mod ui;
