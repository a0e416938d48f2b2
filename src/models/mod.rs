mod fullness;
mod meal;
mod mood;
mod trigger;

pub use fullness::Fullness;
pub use meal::{AfterMeal, BeforeMeal, Meal, MealEntry, MealForm, PHOTO_EXT};
pub use mood::Mood;
pub use trigger::Trigger;

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

/// Current local-clock date-time, truncated to millisecond precision so
/// the stored text round-trips exactly.
///
/// All timestamp and calendar-date derivation in the crate goes through
/// this pair of functions; nothing else consults the clock.
pub fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(now.nanosecond() / 1_000_000 * 1_000_000)
        .unwrap_or(now)
}

/// Current local-time calendar date.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
