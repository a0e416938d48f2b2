use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use super::{meals_changed_signal, print_day, wait_for_change, wait_for_settled};
use crate::day_store::DayStore;
use crate::models::{AfterMeal, BeforeMeal, Fullness, MealForm, Mood, Trigger};
use crate::service::MealService;

#[derive(Args)]
pub struct LogCommand {
    /// Path to the meal photo
    #[arg(long, short)]
    photo: PathBuf,

    /// Fullness before eating (0-3, or starving/peckish/content/full)
    #[arg(long, short)]
    fullness: String,

    /// Why the meal happened (stress, boredom, social, routine, craving)
    #[arg(long, short)]
    trigger: String,

    /// Mood after eating (satisfied, neutral, guilt)
    #[arg(long, short)]
    mood: Option<String>,

    /// Free-text note, recorded with the mood
    #[arg(long, short)]
    note: Option<String>,

    /// Date (YYYY-MM-DD), defaults to today
    #[arg(long, short)]
    date: Option<String>,
}

impl LogCommand {
    pub async fn run(
        &self,
        service: &MealService,
        store: &Arc<DayStore>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let fullness: Fullness = self.fullness.parse().map_err(|e: String| e)?;
        let trigger: Trigger = self.trigger.parse().map_err(|e: String| e)?;

        let after = match &self.mood {
            Some(mood) => {
                let mood: Mood = mood.parse().map_err(|e: String| e)?;
                Some(AfterMeal {
                    mood,
                    note: self.note.clone(),
                })
            }
            None => {
                if self.note.is_some() {
                    return Err("--note requires --mood".into());
                }
                None
            }
        };

        let date = match &self.date {
            Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|_| format!("Invalid date format '{}'. Use YYYY-MM-DD.", d))?,
            None => store.todays_date(),
        };

        let photo = std::fs::read(&self.photo)
            .map_err(|e| format!("Failed to read photo '{}': {}", self.photo.display(), e))?;

        // Select the day and let its list load so the new meal gets the
        // right position in it.
        let mut changed = meals_changed_signal(store);
        store.set_date(date);
        wait_for_settled(&mut changed).await?;

        service.save_meal(
            MealForm {
                before: BeforeMeal { fullness, trigger },
                after,
            },
            photo,
        );
        wait_for_change(&mut changed).await?;

        println!("Logged meal:");
        println!();
        print_day(store);

        Ok(())
    }
}
