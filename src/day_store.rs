//! Reactive day state.
//!
//! Holds the currently selected date, the date the app started on, and
//! the meal list for the selection. Consumers subscribe to typed change
//! notifications; notifications carry no payload, subscribers re-read
//! current state. The meal list is always replaced wholesale, never
//! patched in place.

use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

use crate::models::{local_today, MealEntry};

/// Change notifications the store emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayEvent {
    DateChanged,
    MealsChanged,
}

type Listener = Arc<dyn Fn(&DayStore) + Send + Sync>;

struct DayState {
    selected_date: NaiveDate,
    todays_date: NaiveDate,
    meals: Vec<MealEntry>,
}

pub struct DayStore {
    state: Mutex<DayState>,
    listeners: Mutex<Vec<(DayEvent, Listener)>>,
}

impl DayStore {
    /// Creates a store selecting today; "today" is captured once here
    /// and never moves afterwards.
    pub fn new() -> Self {
        let today = local_today();
        Self {
            state: Mutex::new(DayState {
                selected_date: today,
                todays_date: today,
                meals: Vec::new(),
            }),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.state.lock().unwrap().selected_date
    }

    pub fn todays_date(&self) -> NaiveDate {
        self.state.lock().unwrap().todays_date
    }

    pub fn meals(&self) -> Vec<MealEntry> {
        self.state.lock().unwrap().meals.clone()
    }

    pub fn meal_count(&self) -> usize {
        self.state.lock().unwrap().meals.len()
    }

    /// Registers a callback for one event kind. Callbacks run
    /// synchronously, in registration order, and may re-read the store.
    pub fn subscribe(&self, event: DayEvent, listener: impl Fn(&DayStore) + Send + Sync + 'static) {
        self.listeners
            .lock()
            .unwrap()
            .push((event, Arc::new(listener)));
    }

    pub fn set_date(&self, date: NaiveDate) {
        self.state.lock().unwrap().selected_date = date;
        self.emit(DayEvent::DateChanged);
    }

    /// Replaces the whole meal list.
    pub fn set_meals(&self, meals: Vec<MealEntry>) {
        self.state.lock().unwrap().meals = meals;
        self.emit(DayEvent::MealsChanged);
    }

    pub fn add_meal(&self, entry: MealEntry) {
        self.state.lock().unwrap().meals.push(entry);
        self.emit(DayEvent::MealsChanged);
    }

    /// The state lock is released before dispatch so listeners can
    /// re-read freely.
    fn emit(&self, event: DayEvent) {
        let matching: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap()
            .iter()
            .filter(|(kind, _)| *kind == event)
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in matching {
            listener(self);
        }
    }
}

impl Default for DayStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BeforeMeal, Fullness, Meal, MealForm, Trigger};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample_entry(date: NaiveDate, order: u32) -> MealEntry {
        let meal = Meal::new(
            MealForm {
                before: BeforeMeal {
                    fullness: Fullness::Content,
                    trigger: Trigger::Routine,
                },
                after: None,
            },
            date,
            order,
        );
        MealEntry {
            meal,
            photo: vec![order as u8],
        }
    }

    #[test]
    fn test_new_selects_today() {
        let store = DayStore::new();
        assert_eq!(store.selected_date(), store.todays_date());
        assert!(store.meals().is_empty());
    }

    #[test]
    fn test_set_date_notifies_and_subscriber_reads_new_value() {
        let store = DayStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen2 = seen.clone();
        store.subscribe(DayEvent::DateChanged, move |s| {
            seen2.lock().unwrap().push(s.selected_date());
        });

        store.set_date(date);

        assert_eq!(*seen.lock().unwrap(), vec![date]);
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let store = DayStore::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order2 = order.clone();
            store.subscribe(DayEvent::MealsChanged, move |_| {
                order2.lock().unwrap().push(tag);
            });
        }

        store.set_meals(Vec::new());

        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_set_meals_replaces_wholesale() {
        let store = DayStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        store.set_meals(vec![sample_entry(date, 0), sample_entry(date, 1)]);
        store.set_meals(vec![sample_entry(date, 0)]);

        assert_eq!(store.meal_count(), 1);
    }

    #[test]
    fn test_add_meal_appends_and_notifies() {
        let store = DayStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let fired = Arc::new(AtomicUsize::new(0));

        let fired2 = fired.clone();
        store.subscribe(DayEvent::MealsChanged, move |_| {
            fired2.fetch_add(1, Ordering::SeqCst);
        });

        store.add_meal(sample_entry(date, 0));
        store.add_meal(sample_entry(date, 1));

        assert_eq!(store.meal_count(), 2);
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_events_do_not_cross_kinds() {
        let store = DayStore::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let fired2 = fired.clone();
        store.subscribe(DayEvent::DateChanged, move |_| {
            fired2.fetch_add(1, Ordering::SeqCst);
        });

        store.set_meals(Vec::new());

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_can_reenter_store() {
        let store = DayStore::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count2 = count.clone();
        store.subscribe(DayEvent::MealsChanged, move |s| {
            // Re-reading state inside a notification must not deadlock.
            count2.store(s.meal_count(), Ordering::SeqCst);
        });

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        store.set_meals(vec![sample_entry(date, 0)]);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
