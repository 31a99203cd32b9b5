//! Database configuration module for the hostel manager.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL.

use crate::entities::{
    ContactInquiry, Feedback, Message, Room, RoomBooking, Session, Student, User,
};
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema,
};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Default database location when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/hostel.sqlite?mode=rwc";

/// Establishes a connection to the database at `database_url`.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(parent) = sqlite_file_path(database_url).and_then(Path::parent) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    debug!("Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

/// File path of a `sqlite://` URL, `None` for in-memory or other backends.
fn sqlite_file_path(database_url: &str) -> Option<&Path> {
    let rest = database_url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or(rest);
    (!path.is_empty() && path != ":memory:").then(|| Path::new(path))
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates all tables that do not exist yet.
///
/// Parents are created before children so foreign keys resolve on backends
/// that check them at creation time.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, User).await?;
    create_table(db, &schema, Session).await?;
    create_table(db, &schema, Room).await?;
    create_table(db, &schema, Student).await?;
    create_table(db, &schema, RoomBooking).await?;
    create_table(db, &schema, Message).await?;
    create_table(db, &schema, Feedback).await?;
    create_table(db, &schema, ContactInquiry).await?;

    info!("Database tables ensured");
    Ok(())
}
