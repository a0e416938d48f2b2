//! Storage engine: owns the record store and the photo store.
//!
//! Runs entirely inside the storage worker. Save writes the photo file
//! before the record so a failed file write never leaves a record
//! without its backing file; the reverse failure (record commit failing
//! after the file landed) can orphan a photo file, which is accepted.

use chrono::NaiveDate;
use futures::future;
use sqlx::SqlitePool;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use crate::db::{open_db, MealRepository};
use crate::models::MealEntry;
use crate::photos::{PhotoStore, PhotoStoreError};

/// Errors that can occur during storage engine operations.
#[derive(Debug)]
pub enum EngineError {
    /// Record store failure (connection, transaction, or decode).
    Db(sqlx::Error),
    /// Photo store failure.
    Photos(PhotoStoreError),
    /// I/O error removing database files.
    IoError(PathBuf, io::Error),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Db(e) => write!(f, "Record store error: {}", e),
            EngineError::Photos(e) => write!(f, "Photo store error: {}", e),
            EngineError::IoError(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Db(e) => Some(e),
            EngineError::Photos(e) => Some(e),
            EngineError::IoError(_, e) => Some(e),
        }
    }
}

impl From<sqlx::Error> for EngineError {
    fn from(e: sqlx::Error) -> Self {
        EngineError::Db(e)
    }
}

impl From<PhotoStoreError> for EngineError {
    fn from(e: PhotoStoreError) -> Self {
        EngineError::Photos(e)
    }
}

pub struct StorageEngine {
    db_path: PathBuf,
    photos: PhotoStore,
    /// Memoized record store connection. Lazily opened; concurrent
    /// first operations serialize on the lock and share the one pool.
    pool: Mutex<Option<SqlitePool>>,
}

impl StorageEngine {
    pub fn new(db_path: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            photos: PhotoStore::new(data_dir),
            pool: Mutex::new(None),
        }
    }

    /// Returns the open record store connection, opening it on first
    /// use. Single-flight: callers arriving while an open is in
    /// progress wait for it instead of opening their own.
    async fn db(&self) -> Result<SqlitePool, EngineError> {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref() {
            return Ok(pool.clone());
        }
        let pool = open_db(&self.db_path).await?;
        *guard = Some(pool.clone());
        Ok(pool)
    }

    /// Closes the record store connection and forgets it; the next
    /// operation reopens a fresh one. Called when another execution
    /// context invalidates the store and during delete-all.
    pub async fn invalidate(&self) {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.take() {
            pool.close().await;
        }
    }

    /// Persists a meal entry: photo file first, then the record in one
    /// transaction. A file failure aborts before any metadata exists.
    pub async fn save(&self, entry: &MealEntry) -> Result<(), EngineError> {
        self.photos.write(&entry.meal.photo_id, &entry.photo).await?;

        let pool = self.db().await?;
        MealRepository::new(pool).upsert(&entry.meal).await?;
        Ok(())
    }

    /// Loads every meal entry for a date. An empty record result
    /// returns immediately without touching the photo area; otherwise
    /// all photo files resolve concurrently and any single missing or
    /// unreadable file fails the whole batch.
    pub async fn load_by_date(&self, date: NaiveDate) -> Result<Vec<MealEntry>, EngineError> {
        let pool = self.db().await?;
        let meals = MealRepository::new(pool).list_by_date(date).await?;

        if meals.is_empty() {
            return Ok(Vec::new());
        }

        future::try_join_all(meals.into_iter().map(|meal| async move {
            let photo = self.photos.read(&meal.photo_id).await?;
            Ok::<_, EngineError>(MealEntry { meal, photo })
        }))
        .await
    }

    /// Destroys everything: closes and forgets the connection, removes
    /// the database files, then the photo subtree. A photo-subtree
    /// failure is logged, not escalated.
    pub async fn delete_all(&self) -> Result<(), EngineError> {
        self.invalidate().await;

        remove_if_exists(&self.db_path).await?;
        remove_if_exists(&sidecar(&self.db_path, "-wal")).await?;
        remove_if_exists(&sidecar(&self.db_path, "-shm")).await?;

        if let Err(e) = self.photos.remove_all().await {
            tracing::warn!("Failed to remove photo directory: {}", e);
        }
        Ok(())
    }
}

fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

async fn remove_if_exists(path: &Path) -> Result<(), EngineError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(EngineError::IoError(path.to_path_buf(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AfterMeal, BeforeMeal, Fullness, Meal, MealForm, Mood, Trigger};
    use tempfile::TempDir;

    fn test_engine() -> (StorageEngine, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let engine = StorageEngine::new(temp_dir.path().join("mealbook.db"), temp_dir.path());
        (engine, temp_dir)
    }

    fn sample_entry(date: NaiveDate, order: u32) -> MealEntry {
        let meal = Meal::new(
            MealForm {
                before: BeforeMeal {
                    fullness: Fullness::Peckish,
                    trigger: Trigger::Craving,
                },
                after: Some(AfterMeal {
                    mood: Mood::Satisfied,
                    note: None,
                }),
            },
            date,
            order,
        );
        MealEntry {
            meal,
            photo: vec![0x52, 0x49, 0x46, 0x46, order as u8],
        }
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let (engine, _temp) = test_engine();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let entry = sample_entry(date, 0);

        engine.save(&entry).await.unwrap();

        let loaded = engine.load_by_date(date).await.unwrap();
        assert_eq!(loaded, vec![entry]);
    }

    #[tokio::test]
    async fn test_load_empty_date_skips_photo_area() {
        let (engine, _temp) = test_engine();
        let date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();

        let loaded = engine.load_by_date(date).await.unwrap();

        assert!(loaded.is_empty());
        // The photo subdirectory was never opened or created.
        assert!(!engine.photos.photos_dir().exists());
    }

    #[tokio::test]
    async fn test_missing_photo_fails_whole_batch() {
        let (engine, _temp) = test_engine();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let a = sample_entry(date, 0);
        let b = sample_entry(date, 1);

        engine.save(&a).await.unwrap();
        engine.save(&b).await.unwrap();

        std::fs::remove_file(engine.photos.photo_path(&a.meal.photo_id)).unwrap();

        let result = engine.load_by_date(date).await;
        assert!(matches!(
            result,
            Err(EngineError::Photos(PhotoStoreError::Missing(_)))
        ));
    }

    #[tokio::test]
    async fn test_failed_photo_write_leaves_no_record() {
        let (engine, temp) = test_engine();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        // A regular file where the photo subdirectory should be makes
        // every photo write fail before the record store is touched.
        std::fs::write(temp.path().join("photos"), b"blocker").unwrap();

        let entry = sample_entry(date, 0);
        assert!(engine.save(&entry).await.is_err());

        std::fs::remove_file(temp.path().join("photos")).unwrap();
        let loaded = engine.load_by_date(date).await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_delete_all_wipes_both_stores() {
        let (engine, _temp) = test_engine();
        let mar1 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mar2 = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();

        engine.save(&sample_entry(mar1, 0)).await.unwrap();
        engine.save(&sample_entry(mar2, 0)).await.unwrap();

        engine.delete_all().await.unwrap();

        assert!(!engine.photos.photos_dir().exists());
        assert!(!engine.db_path.exists());

        // The next operation reopens a fresh, empty store.
        assert!(engine.load_by_date(mar1).await.unwrap().is_empty());
        assert!(engine.load_by_date(mar2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_connection() {
        let (engine, _temp) = test_engine();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let (a, b) = tokio::join!(engine.load_by_date(date), engine.load_by_date(date));
        a.unwrap();
        b.unwrap();

        // Both calls went through the same memoized pool.
        assert!(engine.pool.lock().await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_then_operate_reopens() {
        let (engine, _temp) = test_engine();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let entry = sample_entry(date, 0);

        engine.save(&entry).await.unwrap();
        engine.invalidate().await;
        assert!(engine.pool.lock().await.is_none());

        // Data survives the connection teardown.
        let loaded = engine.load_by_date(date).await.unwrap();
        assert_eq!(loaded.len(), 1);
    }
}
