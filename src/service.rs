//! Meal service: the bridge between day state and the storage worker.
//!
//! Translates date changes into load requests and save intents into
//! save requests, then folds worker responses back into the day store,
//! keeping the per-day ordering invariant. Requests are fire-and-forget;
//! effects are observed through the store's change notifications.

use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::day_store::{DayEvent, DayStore};
use crate::models::{Meal, MealEntry, MealForm};
use crate::storage::{StorageHandle, StorageRequest, StorageResponse};

pub struct MealService {
    store: Arc<DayStore>,
    storage: StorageHandle,
    debug_tools: bool,
}

impl MealService {
    /// Wires the service up: date changes re-issue loads, worker
    /// responses flow back into the store, and the current selection is
    /// loaded once immediately.
    pub fn new(
        store: Arc<DayStore>,
        storage: StorageHandle,
        responses: UnboundedReceiver<StorageResponse>,
        debug_tools: bool,
    ) -> Self {
        let service = Self {
            store: store.clone(),
            storage,
            debug_tools,
        };

        let handle = service.storage.clone();
        store.subscribe(DayEvent::DateChanged, move |s| {
            handle.send(StorageRequest::LoadMeals {
                date: s.selected_date(),
            });
        });

        tokio::spawn(Self::pump(store, responses));

        service.load_meals();
        service
    }

    /// Re-issues a load for the currently selected date.
    pub fn load_meals(&self) {
        self.storage.send(StorageRequest::LoadMeals {
            date: self.store.selected_date(),
        });
    }

    /// Builds the meal client-side (id, photo id, timestamp, date,
    /// order) and queues the save. The saved entry appears in the store
    /// via the save response.
    pub fn save_meal(&self, form: MealForm, photo: Vec<u8>) {
        let meal = Meal::new(
            form,
            self.store.selected_date(),
            self.store.meal_count() as u32,
        );
        self.storage
            .send(StorageRequest::SaveMeal {
                entry: MealEntry { meal, photo },
            });
    }

    /// Queues a wipe of both stores. Gated off unless debug tooling is
    /// enabled in the configuration.
    pub fn delete_all_data(&self) {
        if !self.debug_tools {
            tracing::warn!("delete_all_data ignored: debug tools are disabled");
            return;
        }
        self.storage.send(StorageRequest::DeleteAllData);
    }

    /// Folds worker responses into the day store. Error responses are
    /// logged and leave the store at its last known-good state.
    async fn pump(store: Arc<DayStore>, mut responses: UnboundedReceiver<StorageResponse>) {
        while let Some(response) = responses.recv().await {
            match response {
                StorageResponse::LoadSuccess { mut entries } => {
                    entries.sort_by_key(|e| e.meal.order);
                    store.set_meals(entries);
                }
                StorageResponse::SaveSuccess { entry } => {
                    let mut meals = store.meals();
                    meals.push(entry);
                    meals.sort_by_key(|e| e.meal.order);
                    // Full replace keeps the store's contract.
                    store.set_meals(meals);
                }
                StorageResponse::DeleteAllDataSuccess => {
                    store.set_meals(Vec::new());
                }
                StorageResponse::SaveError { error } => {
                    tracing::error!("Meal save failed: {}", error);
                }
                StorageResponse::LoadError { error } => {
                    tracing::error!("Meal load failed: {}", error);
                }
                StorageResponse::DeleteAllDataError { error } => {
                    tracing::error!("Delete all failed: {}", error);
                }
            }
        }
    }
}
