use chrono::NaiveDate;
use clap::Args;
use std::sync::Arc;

use super::{meals_changed_signal, print_day, wait_for_settled};
use crate::day_store::DayStore;

#[derive(Args)]
pub struct DayCommand {
    /// Date (YYYY-MM-DD), defaults to today
    #[arg(long, short)]
    date: Option<String>,
}

impl DayCommand {
    pub async fn run(&self, store: &Arc<DayStore>) -> Result<(), Box<dyn std::error::Error>> {
        let date = match &self.date {
            Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|_| format!("Invalid date format '{}'. Use YYYY-MM-DD.", d))?,
            None => store.todays_date(),
        };

        let mut changed = meals_changed_signal(store);
        store.set_date(date);
        wait_for_settled(&mut changed).await?;

        print_day(store);

        Ok(())
    }
}
