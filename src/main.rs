#![allow(clippy::result_large_err)]

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use hostel_manager::{
    config::{database, rooms, settings::AppSettings},
    core::{auth, reminders},
    errors::Result,
    web::{self, AppState},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hostel-manager", version, about = "Hostel room, booking and rent management")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Send rent reminders if the date is the 30th
    SendRentReminders {
        /// Date to run for, YYYY-MM-DD (default: today, UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    let cli = Cli::parse();

    // 3. Settings
    let settings = AppSettings::from_env()
        .inspect_err(|e| error!("Critical error loading settings: {}", e))?;

    // 4. Database and schema
    let db = database::create_connection(&settings.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Seed rooms from config.toml
    let room_config = rooms::load_optional_config(&settings.rooms_config_path)?;
    rooms::seed_rooms(&db, &room_config)
        .await
        .inspect(|count| info!("Seeded {} room(s).", count))
        .inspect_err(|e| error!("Failed to seed rooms: {}", e))?;

    // 6. Bootstrap administrator
    if let Some((username, password)) = &settings.bootstrap_admin {
        auth::ensure_admin_account(&db, username, password).await?;
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::SendRentReminders { date } => {
            let today = date.unwrap_or_else(|| Utc::now().date_naive());
            let outcome = reminders::send_rent_reminders(&db, today).await?;
            info!(?outcome, "Reminder run finished");
        }
        Command::Serve => {
            if settings.reminder_scheduler {
                tokio::spawn(reminders::run_daily(db.clone()));
            }
            web::serve(AppState::new(db, settings)).await?;
        }
    }

    Ok(())
}
