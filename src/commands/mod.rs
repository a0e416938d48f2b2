mod day;
mod log;
mod reset;

pub use day::DayCommand;
pub use log::LogCommand;
pub use reset::ResetCommand;

use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::time::{timeout, Duration};

use crate::day_store::{DayEvent, DayStore};

/// Subscribes to meals-changed notifications, bridged onto a channel so
/// commands can await them.
fn meals_changed_signal(store: &Arc<DayStore>) -> UnboundedReceiver<()> {
    let (tx, rx) = unbounded_channel();
    store.subscribe(DayEvent::MealsChanged, move |_| {
        let _ = tx.send(());
    });
    rx
}

/// Waits until the selected day's list has settled.
///
/// Worker responses are ordered, so after the first change any load
/// still in flight (the service's startup load) lands right behind it;
/// a short drain absorbs it.
async fn wait_for_settled(rx: &mut UnboundedReceiver<()>) -> Result<(), String> {
    timeout(Duration::from_secs(10), rx.recv())
        .await
        .map_err(|_| "Timed out waiting for the meal list to load".to_string())?
        .ok_or_else(|| "Day store notifications stopped".to_string())?;

    while let Ok(Some(())) = timeout(Duration::from_millis(200), rx.recv()).await {}
    Ok(())
}

/// Waits for exactly one further change notification.
async fn wait_for_change(rx: &mut UnboundedReceiver<()>) -> Result<(), String> {
    timeout(Duration::from_secs(10), rx.recv())
        .await
        .map_err(|_| "Timed out waiting for the save to complete".to_string())?
        .ok_or_else(|| "Day store notifications stopped".to_string())?;
    Ok(())
}

/// Prints the selected day's meal list.
fn print_day(store: &DayStore) {
    let date = store.selected_date();
    let meals = store.meals();

    println!("{}", date);
    println!("{}", "-".repeat(10));

    if meals.is_empty() {
        println!("  (no meals logged)");
    } else {
        for entry in &meals {
            println!("  {}. {}", entry.meal.order + 1, entry.meal);
        }
    }

    println!();
    println!("Total: {} meal(s)", meals.len());
}
