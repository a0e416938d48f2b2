use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mealbook::commands::{DayCommand, LogCommand, ResetCommand};
use mealbook::{storage, Config, DayStore, MealService};

#[derive(Parser)]
#[command(name = "mealbook")]
#[command(version)]
#[command(about = "A photo-first meal journal", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a meal with its photo
    Log(LogCommand),

    /// Show the meals for a day
    Day(DayCommand),

    /// Wipe the local database and photo files
    Reset(ResetCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mealbook=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    let Some(command) = cli.command else {
        println!("Use --help to see available commands");
        return Ok(());
    };

    let store = Arc::new(DayStore::new());
    let (handle, responses) = storage::spawn(config.database_path(), config.data_dir.clone());
    let service = MealService::new(store.clone(), handle, responses, config.debug_tools);

    match command {
        Commands::Log(cmd) => cmd.run(&service, &store).await?,
        Commands::Day(cmd) => cmd.run(&store).await?,
        Commands::Reset(cmd) => cmd.run(&service, &store, &config).await?,
    }

    Ok(())
}
