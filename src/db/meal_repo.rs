use chrono::{NaiveDate, NaiveDateTime};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{AfterMeal, BeforeMeal, Fullness, Meal};

/// Storage format for `Meal::timestamp`: local-clock ISO text,
/// millisecond precision.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

pub struct MealRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct MealRow {
    id: String,
    photo_id: String,
    timestamp: String,
    date: String,
    position: i64,
    fullness: i64,
    trigger_kind: String,
    mood: Option<String>,
    note: Option<String>,
    is_synced: bool,
}

fn decode_err<E>(e: E) -> sqlx::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    sqlx::Error::Decode(e.into())
}

impl MealRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Idempotent upsert by meal id, committed as one transaction.
    pub async fn upsert(&self, meal: &Meal) -> Result<(), sqlx::Error> {
        let id = meal.id.to_string();
        let timestamp = meal.timestamp.format(TIMESTAMP_FORMAT).to_string();
        let date = meal.date.to_string();
        let mood = meal.after.as_ref().map(|a| a.mood.to_string());
        let note = meal.after.as_ref().and_then(|a| a.note.clone());

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO meals (id, photo_id, timestamp, date, position, fullness, trigger_kind, mood, note, is_synced)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                photo_id = excluded.photo_id,
                timestamp = excluded.timestamp,
                date = excluded.date,
                position = excluded.position,
                fullness = excluded.fullness,
                trigger_kind = excluded.trigger_kind,
                mood = excluded.mood,
                note = excluded.note,
                is_synced = excluded.is_synced
            "#,
        )
        .bind(&id)
        .bind(&meal.photo_id)
        .bind(&timestamp)
        .bind(&date)
        .bind(meal.order as i64)
        .bind(meal.before.fullness.level() as i64)
        .bind(meal.before.trigger.to_string())
        .bind(&mood)
        .bind(&note)
        .bind(meal.is_synced)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(())
    }

    /// All meals whose calendar date matches, in unspecified order;
    /// sorting by `order` is the caller's job.
    pub async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Meal>, sqlx::Error> {
        let date_str = date.to_string();

        let rows: Vec<MealRow> = sqlx::query_as("SELECT * FROM meals WHERE date = ?")
            .bind(&date_str)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(hydrate_meal).collect()
    }
}

fn hydrate_meal(row: MealRow) -> Result<Meal, sqlx::Error> {
    let id = Uuid::parse_str(&row.id).map_err(decode_err)?;
    let timestamp =
        NaiveDateTime::parse_from_str(&row.timestamp, TIMESTAMP_FORMAT).map_err(decode_err)?;
    let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(decode_err)?;
    let order = u32::try_from(row.position).map_err(decode_err)?;
    let fullness_level = u8::try_from(row.fullness).map_err(decode_err)?;
    let fullness = Fullness::try_from(fullness_level).map_err(decode_err)?;
    let trigger = row.trigger_kind.parse().map_err(decode_err)?;

    let after = match row.mood {
        Some(mood) => Some(AfterMeal {
            mood: mood.parse().map_err(decode_err)?,
            note: row.note,
        }),
        None => None,
    };

    Ok(Meal {
        id,
        photo_id: row.photo_id,
        timestamp,
        date,
        order,
        before: BeforeMeal { fullness, trigger },
        after,
        is_synced: row.is_synced,
    })
}
