//! Message protocol between the front end and the storage worker.
//!
//! A closed set of tagged requests and responses; the worker answers
//! every request with exactly one success or error message for that
//! operation. No correlation ids: each caller keeps at most one request
//! of a given kind in flight and channel delivery is ordered.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::MealEntry;

/// Requests accepted by the storage worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorageRequest {
    /// Persist one meal entry across both stores.
    SaveMeal { entry: MealEntry },
    /// Fetch every meal entry for a calendar date.
    LoadMeals { date: NaiveDate },
    /// Destroy the record store and the photo subtree.
    DeleteAllData,
}

/// Responses emitted by the storage worker, one per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorageResponse {
    SaveSuccess { entry: MealEntry },
    SaveError { error: String },
    /// Entries for the requested date, in unspecified order.
    LoadSuccess { entries: Vec<MealEntry> },
    LoadError { error: String },
    DeleteAllDataSuccess,
    DeleteAllDataError { error: String },
}
