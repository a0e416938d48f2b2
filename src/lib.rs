//! MealBook Core Library
//!
//! Persistence core for a photo-first meal journal: a storage worker
//! owning a SQLite record store and a photo file store, the message
//! protocol between that worker and the front end, and the reactive
//! day-state/service pair the UI consumes.

pub mod commands;
pub mod config;
pub mod day_store;
pub mod db;
pub mod models;
pub mod photos;
pub mod service;
pub mod storage;

pub use config::{Config, ConfigError};
pub use day_store::{DayEvent, DayStore};
pub use models::{
    AfterMeal, BeforeMeal, Fullness, Meal, MealEntry, MealForm, Mood, Trigger, PHOTO_EXT,
};
pub use photos::{PhotoStore, PhotoStoreError};
pub use service::MealService;
pub use storage::{EngineError, StorageEngine, StorageHandle, StorageRequest, StorageResponse};
