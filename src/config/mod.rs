/// Database connection and table creation
pub mod database;

/// Room inventory seeding from config.toml
pub mod rooms;

/// Runtime settings read from environment variables
pub mod settings;
