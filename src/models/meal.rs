use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{local_now, Fullness, Mood, Trigger};

/// File extension of every stored photo; the editor hands the core a
/// single normalized blob in this format.
pub const PHOTO_EXT: &str = "webp";

/// State recorded before eating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeforeMeal {
    pub fullness: Fullness,
    pub trigger: Trigger,
}

/// Reflection added after eating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AfterMeal {
    pub mood: Mood,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// What the meal editor collects; the service fills in the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealForm {
    pub before: BeforeMeal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<AfterMeal>,
}

/// One logged eating occasion. Metadata only; the photo bytes live in
/// the photo store under `photo_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    pub id: Uuid,
    pub photo_id: String,
    pub timestamp: NaiveDateTime,
    pub date: NaiveDate,
    pub order: u32,
    pub before: BeforeMeal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<AfterMeal>,
    pub is_synced: bool,
}

impl Meal {
    /// Creates a meal for `date` from the editor's form data.
    ///
    /// The id is generated here and the photo id derived from it, so the
    /// caller knows both before the meal is ever persisted. `order` is
    /// the count of meals already loaded for that date.
    pub fn new(form: MealForm, date: NaiveDate, order: u32) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            photo_id: format!("{}.{}", id, PHOTO_EXT),
            timestamp: local_now(),
            date,
            order,
            before: form.before,
            after: form.after,
            is_synced: false,
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  fullness: {}  trigger: {}",
            self.timestamp.format("%H:%M"),
            self.before.fullness,
            self.before.trigger
        )?;
        if let Some(after) = &self.after {
            write!(f, "  mood: {}", after.mood)?;
            if let Some(note) = &after.note {
                write!(f, "  note: {}", note)?;
            }
        }
        Ok(())
    }
}

/// A meal paired with its photo bytes. The unit of save/load at the
/// worker boundary; persistence always splits it across the two stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealEntry {
    pub meal: Meal,
    #[serde(with = "serde_bytes")]
    pub photo: Vec<u8>,
}
