//! Room inventory configuration loading from config.toml
//!
//! The rooms listed in config.toml seed the inventory on startup. Seeding is
//! keyed on `room_number`, so rooms that already exist are left untouched and
//! their bed counts are never reset.

use crate::{
    core::room::{self, NewRoom},
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Rooms to seed
    #[serde(default)]
    pub rooms: Vec<RoomConfig>,
}

/// Configuration for a single room; validated like the admin creation form.
pub type RoomConfig = NewRoom;

/// Loads room configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads `path` if it exists; a missing file yields an empty configuration.
pub fn load_optional_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    if path.as_ref().exists() {
        load_config(path)
    } else {
        warn!(path = %path.as_ref().display(), "No room configuration found, skipping seeding");
        Ok(Config::default())
    }
}

/// Creates every configured room that is not already in the database.
///
/// Returns the number of rooms created.
pub async fn seed_rooms(db: &DatabaseConnection, config: &Config) -> Result<usize> {
    let mut created = 0;
    for entry in &config.rooms {
        if room::get_room_by_number(db, &entry.room_number).await?.is_some() {
            continue;
        }
        room::create_room(db, entry.clone()).await?;
        created += 1;
    }
    info!(created, "Room seeding complete");
    Ok(created)
}
