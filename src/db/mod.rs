mod meal_repo;

pub use meal_repo::MealRepository;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Open the record store and bring its schema up to date.
///
/// The database file is created on first open; migrations only add the
/// missing table and index, never touch existing rows.
pub async fn open_db(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(sqlx::Error::Io)?;
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .foreign_keys(true)
        .create_if_missing(true);

    // A single connection keeps record-store operations serialized.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_db_creates_schema() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let pool = open_db(&db_path).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert!(table_names.contains(&"meals"));

        let indexes: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type='index' AND tbl_name='meals'")
                .fetch_all(&pool)
                .await
                .unwrap();
        assert!(indexes.iter().any(|i| i.0 == "idx_meals_date"));
    }

    #[tokio::test]
    async fn test_open_db_creates_parent_dirs() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("data").join("test.db");

        open_db(&db_path).await.unwrap();

        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_reopen_preserves_data() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");

        {
            let pool = open_db(&db_path).await.unwrap();
            sqlx::query(
                "INSERT INTO meals (id, photo_id, timestamp, date, position, fullness, trigger_kind, is_synced) \
                 VALUES ('a', 'a.webp', '2024-03-01T12:00:00.000', '2024-03-01', 0, 2, 'routine', 0)",
            )
            .execute(&pool)
            .await
            .unwrap();
            pool.close().await;
        }

        let pool = open_db(&db_path).await.unwrap();
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM meals")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }
}
