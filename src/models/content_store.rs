//! Read-only content store for the portfolio: categories, brands and media.
//!
//! `ContentStore` is the query seam the loader talks to. `SqliteContentStore`
//! is the bundled implementation:
//! - categories and brands ordered by Arabic display name
//! - brands scoped to their owning category (foreign key, cascading)
//! - media ordered newest first, joined with category names
//! - snapshot import in a single transaction with invariant checks

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Transaction};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::ContentError;
use crate::models::{Brand, Category, CategoryId, LocalizedName, MediaItem, MediaKind};

/// Query surface of the external content service.
///
/// All calls are read-only and return ordered collections.
pub trait ContentStore: Send {
    fn list_categories(&self) -> Result<Vec<Category>, ContentError>;
    fn list_brands(&self, category_id: CategoryId) -> Result<Vec<Brand>, ContentError>;
    fn list_media(&self) -> Result<Vec<MediaItem>, ContentError>;
}

/// A full export of the content collections, as accepted by `import_snapshot`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentSnapshot {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub brands: Vec<Brand>,
    #[serde(default)]
    pub media: Vec<MediaItem>,
}

/// Row counts written by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub categories: usize,
    pub brands: usize,
    pub media: usize,
}

/// Database statistics for debugging.
#[derive(Debug, Clone)]
pub struct DbStats {
    pub category_count: i64,
    pub brand_count: i64,
    pub media_count: i64,
    pub db_size_bytes: i64,
}

/// SQLite-backed content store.
///
/// The default database lives at `XDG_CONFIG_HOME/folio/content.sqlite`.
pub struct SqliteContentStore {
    conn: Connection,
}

impl SqliteContentStore {
    /// Returns the default database path based on XDG directories.
    pub fn default_db_path() -> Result<PathBuf, ContentError> {
        let proj_dirs = ProjectDirs::from("", "", "folio").ok_or(ContentError::NoConfigDir)?;

        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir).map_err(|source| ContentError::Io {
            path: config_dir.to_path_buf(),
            source,
        })?;

        Ok(config_dir.join("content.sqlite"))
    }

    /// Opens or creates the database at the specified path.
    pub fn open(path: &Path) -> Result<Self, ContentError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ContentError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        let store = Self::with_connection(conn)?;

        info!("Opened content store at {:?}", path);
        Ok(store)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self, ContentError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, ContentError> {
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            PRAGMA foreign_keys = ON;
            ",
        )?;

        let store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }

    fn create_tables(&self) -> Result<(), ContentError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY NOT NULL,
                name_en TEXT NOT NULL,
                name_ar TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS brands (
                id TEXT PRIMARY KEY NOT NULL,
                name_en TEXT NOT NULL,
                name_ar TEXT NOT NULL,
                category_id INTEGER NOT NULL
                    REFERENCES categories(id) ON DELETE CASCADE,
                created_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_brands_category ON brands(category_id);

            -- category_id carries no foreign key: items outlive their category
            CREATE TABLE IF NOT EXISTS media (
                id INTEGER PRIMARY KEY NOT NULL,
                title TEXT NOT NULL,
                kind INTEGER NOT NULL,
                source_url TEXT NOT NULL,
                category_id INTEGER NOT NULL,
                brand_id TEXT,
                created_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_media_created_at ON media(created_at);
            ",
        )?;
        Ok(())
    }

    // =========================================================================
    // Import
    // =========================================================================

    /// Upserts a whole snapshot in one transaction.
    ///
    /// Brands must reference an existing category and a media item's brand must
    /// belong to the item's category; any violation rolls back the import.
    pub fn import_snapshot(&mut self, snapshot: &ContentSnapshot) -> Result<ImportStats, ContentError> {
        let tx = self.conn.transaction()?;
        let stats = Self::import_in_tx(&tx, snapshot)?;
        tx.commit()?;

        info!(
            categories = stats.categories,
            brands = stats.brands,
            media = stats.media,
            "Imported content snapshot"
        );
        Ok(stats)
    }

    fn import_in_tx(tx: &Transaction, snapshot: &ContentSnapshot) -> Result<ImportStats, ContentError> {
        let mut stats = ImportStats::default();

        {
            let mut stmt = tx.prepare_cached(
                "
                INSERT INTO categories (id, name_en, name_ar, created_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(id) DO UPDATE SET
                    name_en = excluded.name_en,
                    name_ar = excluded.name_ar,
                    created_at = excluded.created_at
                ",
            )?;
            for cat in &snapshot.categories {
                stmt.execute(params![cat.id, cat.name.en, cat.name.ar, cat.created_at])?;
                stats.categories += 1;
            }
        }

        {
            let mut exists = tx.prepare_cached("SELECT 1 FROM categories WHERE id = ?1")?;
            let mut stmt = tx.prepare_cached(
                "
                INSERT INTO brands (id, name_en, name_ar, category_id, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(id) DO UPDATE SET
                    name_en = excluded.name_en,
                    name_ar = excluded.name_ar,
                    category_id = excluded.category_id,
                    created_at = excluded.created_at
                ",
            )?;
            for brand in &snapshot.brands {
                let found: Option<i32> = exists
                    .query_row(params![brand.category_id], |row| row.get(0))
                    .optional()?;
                if found.is_none() {
                    return Err(ContentError::Invariant(format!(
                        "brand {} references missing category {}",
                        brand.id, brand.category_id
                    )));
                }
                stmt.execute(params![
                    brand.id,
                    brand.name.en,
                    brand.name.ar,
                    brand.category_id,
                    brand.created_at,
                ])?;
                stats.brands += 1;
            }
        }

        {
            let mut brand_category =
                tx.prepare_cached("SELECT category_id FROM brands WHERE id = ?1")?;
            let mut stmt = tx.prepare_cached(
                "
                INSERT INTO media (id, title, kind, source_url, category_id, brand_id, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    kind = excluded.kind,
                    source_url = excluded.source_url,
                    category_id = excluded.category_id,
                    brand_id = excluded.brand_id,
                    created_at = excluded.created_at
                ",
            )?;
            for item in &snapshot.media {
                if let Some(brand_id) = &item.brand_id {
                    let owner: Option<CategoryId> = brand_category
                        .query_row(params![brand_id], |row| row.get(0))
                        .optional()?;
                    if owner != Some(item.category_id) {
                        return Err(ContentError::Invariant(format!(
                            "media {} brand {} does not belong to category {}",
                            item.id, brand_id, item.category_id
                        )));
                    }
                }
                stmt.execute(params![
                    item.id,
                    item.title,
                    media_kind_to_int(item.kind),
                    item.source_url,
                    item.category_id,
                    item.brand_id,
                    item.created_at,
                ])?;
                stats.media += 1;
            }
        }

        debug!(?stats, "Snapshot rows written");
        Ok(stats)
    }

    // =========================================================================
    // Utility Methods
    // =========================================================================

    /// Gets database statistics for debugging.
    pub fn get_stats(&self) -> Result<DbStats, ContentError> {
        let category_count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?;
        let brand_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM brands", [], |r| r.get(0))?;
        let media_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM media", [], |r| r.get(0))?;

        let page_count: i64 = self.conn.query_row("PRAGMA page_count", [], |r| r.get(0))?;
        let page_size: i64 = self.conn.query_row("PRAGMA page_size", [], |r| r.get(0))?;

        Ok(DbStats {
            category_count,
            brand_count,
            media_count,
            db_size_bytes: page_count * page_size,
        })
    }

    /// Opens the database, rebuilding it when the file is corrupt.
    pub fn open_or_recover(path: &Path) -> Result<Self, ContentError> {
        match Self::open(path) {
            Err(ContentError::Database(e)) if is_corruption(&e) => {
                warn!(error = %e, "Content database unreadable");
                Self::handle_corruption(path)
            }
            other => other,
        }
    }

    /// Handles database corruption by backing up and rebuilding.
    pub fn handle_corruption(path: &Path) -> Result<Self, ContentError> {
        warn!("Handling potential database corruption at {:?}", path);

        let backup_path = path.with_extension("sqlite.corrupted");
        if path.exists() {
            std::fs::rename(path, &backup_path).map_err(|source| ContentError::Io {
                path: backup_path.clone(),
                source,
            })?;
            warn!("Backed up corrupted database to {:?}", backup_path);
        }

        Self::open(path)
    }
}

impl ContentStore for SqliteContentStore {
    fn list_categories(&self) -> Result<Vec<Category>, ContentError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, name_en, name_ar, created_at FROM categories ORDER BY name_ar, id",
        )?;
        let categories = stmt
            .query_map([], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: LocalizedName::new(row.get::<_, String>(1)?, row.get::<_, String>(2)?),
                    created_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    fn list_brands(&self, category_id: CategoryId) -> Result<Vec<Brand>, ContentError> {
        let mut stmt = self.conn.prepare_cached(
            "
            SELECT id, name_en, name_ar, category_id, created_at
            FROM brands WHERE category_id = ?1
            ORDER BY name_ar, id
            ",
        )?;
        let brands = stmt
            .query_map(params![category_id], |row| {
                Ok(Brand {
                    id: row.get(0)?,
                    name: LocalizedName::new(row.get::<_, String>(1)?, row.get::<_, String>(2)?),
                    category_id: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(brands)
    }

    fn list_media(&self) -> Result<Vec<MediaItem>, ContentError> {
        let mut stmt = self.conn.prepare_cached(
            "
            SELECT m.id, m.title, m.kind, m.source_url, m.category_id, m.brand_id,
                   m.created_at, c.name_en, c.name_ar
            FROM media m
            LEFT JOIN categories c ON c.id = m.category_id
            ORDER BY m.created_at DESC, m.id ASC
            ",
        )?;
        let items = stmt
            .query_map([], |row| {
                let name_en: Option<String> = row.get(7)?;
                let name_ar: Option<String> = row.get(8)?;
                Ok(MediaItem {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    kind: int_to_media_kind(row.get(2)?)?,
                    source_url: row.get(3)?,
                    category_id: row.get(4)?,
                    brand_id: row.get(5)?,
                    created_at: row.get(6)?,
                    category_name: match (name_en, name_ar) {
                        (Some(en), Some(ar)) => Some(LocalizedName::new(en, ar)),
                        _ => None,
                    },
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }
}

// =========================================================================
// Helper Functions
// =========================================================================

fn is_corruption(error: &rusqlite::Error) -> bool {
    matches!(
        error.sqlite_error_code(),
        Some(ErrorCode::DatabaseCorrupt) | Some(ErrorCode::NotADatabase)
    )
}

fn media_kind_to_int(kind: MediaKind) -> i32 {
    match kind {
        MediaKind::Image => 0,
        MediaKind::Video => 1,
    }
}

fn int_to_media_kind(value: i32) -> rusqlite::Result<MediaKind> {
    match value {
        0 => Ok(MediaKind::Image),
        1 => Ok(MediaKind::Video),
        other => Err(rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Integer,
            format!("unknown media kind {other}").into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn category(id: CategoryId, en: &str, ar: &str) -> Category {
        Category {
            id,
            name: LocalizedName::new(en, ar),
            created_at: 0,
        }
    }

    fn brand(id: &str, category_id: CategoryId, ar: &str) -> Brand {
        Brand {
            id: id.to_string(),
            name: LocalizedName::new(id, ar),
            category_id,
            created_at: 0,
        }
    }

    fn sample_snapshot() -> ContentSnapshot {
        ContentSnapshot {
            categories: vec![category(1, "Weddings", "ب"), category(2, "Products", "أ")],
            brands: vec![brand("zeta", 2, "ج"), brand("alpha", 2, "ب"), brand("vows", 1, "أ")],
            media: vec![
                MediaItem::new(1, "Old", MediaKind::Image, 1).with_created_at(100),
                MediaItem::new(2, "New", MediaKind::Video, 2)
                    .with_brand("alpha")
                    .with_created_at(300),
                MediaItem::new(3, "Tie", MediaKind::Image, 2).with_created_at(200),
                MediaItem::new(4, "Tie too", MediaKind::Image, 1).with_created_at(200),
            ],
        }
    }

    #[test]
    fn test_open_and_create() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.sqlite");

        let store = SqliteContentStore::open(&db_path).unwrap();
        assert!(db_path.exists());

        let stats = store.get_stats().unwrap();
        assert_eq!(stats.media_count, 0);
        assert_eq!(stats.category_count, 0);
    }

    #[test]
    fn test_open_or_recover_rebuilds_garbage_file() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("content.sqlite");
        std::fs::write(&db_path, vec![b'x'; 8192]).unwrap();

        let store = SqliteContentStore::open_or_recover(&db_path).unwrap();
        assert_eq!(store.get_stats().unwrap().media_count, 0);
        assert!(db_path.with_extension("sqlite.corrupted").exists());
    }

    #[test]
    fn test_import_and_list_ordering() {
        let mut store = SqliteContentStore::open_in_memory().unwrap();
        let stats = store.import_snapshot(&sample_snapshot()).unwrap();
        assert_eq!(
            stats,
            ImportStats {
                categories: 2,
                brands: 3,
                media: 4
            }
        );

        let cats = store.list_categories().unwrap();
        let ids: Vec<_> = cats.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1]);

        let media = store.list_media().unwrap();
        let ids: Vec<_> = media.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 1]);
        assert_eq!(media[0].kind, MediaKind::Video);
        assert_eq!(media[0].brand_id.as_deref(), Some("alpha"));
        assert_eq!(
            media[0].category_name.as_ref().map(|n| n.en.as_str()),
            Some("Products")
        );
    }

    #[test]
    fn test_list_brands_scoped_to_category() {
        let mut store = SqliteContentStore::open_in_memory().unwrap();
        store.import_snapshot(&sample_snapshot()).unwrap();

        let brands = store.list_brands(2).unwrap();
        let ids: Vec<_> = brands.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);

        assert!(store.list_brands(99).unwrap().is_empty());
    }

    #[test]
    fn test_import_rejects_brand_without_category() {
        let mut store = SqliteContentStore::open_in_memory().unwrap();
        let snapshot = ContentSnapshot {
            brands: vec![brand("orphan", 9, "أ")],
            ..Default::default()
        };
        let err = store.import_snapshot(&snapshot).unwrap_err();
        assert!(matches!(err, ContentError::Invariant(_)));
        assert_eq!(store.get_stats().unwrap().brand_count, 0);
    }

    #[test]
    fn test_import_rejects_cross_category_brand() {
        let mut store = SqliteContentStore::open_in_memory().unwrap();
        let mut snapshot = sample_snapshot();
        snapshot
            .media
            .push(MediaItem::new(9, "Wrong", MediaKind::Image, 1).with_brand("alpha"));

        let err = store.import_snapshot(&snapshot).unwrap_err();
        assert!(matches!(err, ContentError::Invariant(_)));
        // Whole transaction rolled back
        assert_eq!(store.get_stats().unwrap().category_count, 0);
    }

    #[test]
    fn test_media_without_category_has_no_join() {
        let mut store = SqliteContentStore::open_in_memory().unwrap();
        let snapshot = ContentSnapshot {
            media: vec![MediaItem::new(1, "Stray", MediaKind::Image, 42)],
            ..Default::default()
        };
        store.import_snapshot(&snapshot).unwrap();

        let media = store.list_media().unwrap();
        assert_eq!(media.len(), 1);
        assert!(media[0].category_name.is_none());
    }

    #[test]
    fn test_unknown_media_kind_fails_listing() {
        let store = SqliteContentStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO media (id, title, kind, source_url, category_id, brand_id, created_at)
                 VALUES (1, 'Odd', 7, 'https://cdn.example/odd', 5, NULL, 0)",
                [],
            )
            .unwrap();

        let err = store.list_media().unwrap_err();
        assert!(matches!(
            err,
            ContentError::Database(rusqlite::Error::FromSqlConversionFailure(2, Type::Integer, _))
        ));
    }

    #[test]
    fn test_snapshot_from_json() {
        let json = r#"{
            "categories": [{"id": 1, "name_en": "Weddings", "name_ar": "زفاف"}],
            "media": [{"id": 7, "title": "Sarah & John's Wedding", "kind": "video",
                       "source_url": "https://cdn.example/v.mp4", "category_id": 1,
                       "created_at": 5}]
        }"#;
        let snapshot: ContentSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.brands.is_empty());
        assert_eq!(snapshot.media[0].kind, MediaKind::Video);
        assert!(snapshot.media[0].brand_id.is_none());

        let mut store = SqliteContentStore::open_in_memory().unwrap();
        store.import_snapshot(&snapshot).unwrap();
        assert_eq!(store.list_media().unwrap()[0].source_url, "https://cdn.example/v.mp4");
    }

    #[test]
    fn test_reimport_updates_rows() {
        let mut store = SqliteContentStore::open_in_memory().unwrap();
        store.import_snapshot(&sample_snapshot()).unwrap();

        let snapshot = ContentSnapshot {
            categories: vec![category(1, "Ceremonies", "ب")],
            ..Default::default()
        };
        store.import_snapshot(&snapshot).unwrap();

        let cats = store.list_categories().unwrap();
        assert_eq!(cats.len(), 2);
        assert!(cats.iter().any(|c| c.name.en == "Ceremonies"));
    }
}
