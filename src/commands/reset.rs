use clap::Args;
use std::sync::Arc;

use super::{meals_changed_signal, wait_for_settled};
use crate::config::Config;
use crate::day_store::DayStore;
use crate::service::MealService;

#[derive(Args)]
pub struct ResetCommand {
    /// Skip the confirmation prompt
    #[arg(long, short)]
    yes: bool,
}

impl ResetCommand {
    pub async fn run(
        &self,
        service: &MealService,
        store: &Arc<DayStore>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if !config.debug_tools {
            return Err("Reset is disabled. Set debug_tools: true (or MEALBOOK_DEBUG_TOOLS=1) to enable it.".into());
        }

        if !self.yes {
            return Err("Reset deletes every meal and photo. Re-run with --yes to confirm.".into());
        }

        let mut changed = meals_changed_signal(store);
        service.delete_all_data();
        wait_for_settled(&mut changed).await?;

        println!("All meal data deleted.");

        Ok(())
    }
}
