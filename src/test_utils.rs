//! Shared test utilities for the hostel manager.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        auth::{self, SignupForm},
        booking::{self, BookingRequest},
        room::{self, NewRoom},
        student,
    },
    entities::{self, DurationOfStay, RoomType, UserType},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Password used by every test account.
pub const TEST_PASSWORD: &str = "password123";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a room with every bed free.
pub async fn create_test_room(
    db: &DatabaseConnection,
    room_number: &str,
    room_type: RoomType,
    capacity: i32,
) -> Result<entities::room::Model> {
    room::create_room(db, NewRoom::empty(room_number, room_type, capacity)).await
}

/// Creates a room with no free beds.
pub async fn create_test_full_room(
    db: &DatabaseConnection,
    room_number: &str,
    room_type: RoomType,
    capacity: i32,
) -> Result<entities::room::Model> {
    let form = NewRoom {
        beds_available: Some(0),
        ..NewRoom::empty(room_number, room_type, capacity)
    };
    room::create_room(db, form).await
}

/// Creates an administrator account without a student profile.
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<entities::user::Model> {
    auth::create_admin_account(db, username, TEST_PASSWORD).await
}

/// Creates a student account and profile.
///
/// # Defaults
/// * name: `username`
/// * email: `<username>@example.com`
/// * phone: `0711` followed by `student_id` without its leading `S`
pub async fn create_test_student(
    db: &DatabaseConnection,
    username: &str,
    student_id: &str,
) -> Result<(entities::user::Model, entities::student::Model)> {
    let signup = auth::signup(
        db,
        SignupForm {
            username: username.to_string(),
            password: TEST_PASSWORD.to_string(),
            password_confirmation: TEST_PASSWORD.to_string(),
            user_type: UserType::Student,
            name: Some(username.to_string()),
            email: Some(format!("{username}@example.com")),
            student_id: Some(student_id.to_string()),
            phone: Some(format!("0711{}", student_id.trim_start_matches('S'))),
        },
    )
    .await?;
    let profile = signup.student.ok_or_else(|| Error::StudentNotFound {
        student: student_id.to_string(),
    })?;
    Ok((signup.user, profile))
}

/// Moves a student straight into a room without touching bed counts.
pub async fn assign_student_room(
    db: &DatabaseConnection,
    student_id: i64,
    room_id: i64,
) -> Result<entities::student::Model> {
    let profile = student::get_student_by_id(db, student_id)
        .await?
        .ok_or_else(|| Error::StudentNotFound {
            student: student_id.to_string(),
        })?;
    student::set_student_room(db, profile, room_id).await
}

/// Submits a one-semester booking for `room_type`.
pub async fn create_test_booking(
    db: &DatabaseConnection,
    student_id: i64,
    room_type: RoomType,
) -> Result<entities::room_booking::Model> {
    booking::submit_booking(
        db,
        student_id,
        BookingRequest {
            phone: None,
            room_type,
            check_in_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap_or_default(),
            duration_of_stay: DurationOfStay::OneSemester,
            special_requests: None,
        },
    )
    .await
}
