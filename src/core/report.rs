//! Read-only views assembled from several tables.
//!
//! This module provides the student profile page, the administrator dashboard
//! summary and the rent overview. All functions are framework-agnostic and
//! return structured data that the web layer serialises.

use crate::{
    core::{booking, message, room, student},
    entities::{
        BookingStatus, ContactInquiry, Feedback, Room, RoomBooking, Student, message as message_entity,
        room as room_entity, room_booking, student as student_entity,
    },
    errors::Result,
};
use sea_orm::{DatabaseConnection, PaginatorTrait, QueryFilter, prelude::*};
use serde::Serialize;
use std::collections::HashMap;

/// Everything shown on a student's own profile page.
#[derive(Debug, Clone, Serialize)]
pub struct StudentProfile {
    /// The student's record, `None` when the account has no profile
    pub student: Option<student_entity::Model>,
    /// Room the student lives in
    pub room: Option<room_entity::Model>,
    /// Bookings, newest first
    pub bookings: Vec<room_booking::Model>,
    /// Notifications, newest first
    pub messages: Vec<message_entity::Model>,
}

/// Counts shown on the administrator dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_rooms: u64,
    pub available_rooms: u64,
    pub total_students: u64,
    pub pending_bookings: u64,
    pub assigned_bookings: u64,
    pub feedback_count: u64,
    pub inquiry_count: u64,
}

/// One line of the rent overview.
#[derive(Debug, Clone, Serialize)]
pub struct RentBalance {
    pub student_id: i64,
    pub name: String,
    pub room_number: Option<String>,
    pub rent_price: Option<f64>,
    pub rent_paid: f64,
    /// Outstanding amount; already net of `rent_paid`
    pub rent_due: f64,
}

/// Builds the profile page for the account `user_id`.
///
/// An account without a student profile gets an empty page rather than an error.
pub async fn student_profile(db: &DatabaseConnection, user_id: i64) -> Result<StudentProfile> {
    let Some(student) = student::get_student_for_user(db, user_id).await? else {
        return Ok(StudentProfile {
            student: None,
            room: None,
            bookings: Vec::new(),
            messages: Vec::new(),
        });
    };

    let room = match student.room_id {
        Some(room_id) => room::get_room_by_id(db, room_id).await?,
        None => None,
    };
    let bookings = booking::get_bookings_for_student(db, student.id).await?;
    let messages = message::get_messages_for_student(db, student.id).await?;

    Ok(StudentProfile {
        student: Some(student),
        room,
        bookings,
        messages,
    })
}

/// Counts for the administrator dashboard.
pub async fn dashboard_summary(db: &DatabaseConnection) -> Result<DashboardSummary> {
    Ok(DashboardSummary {
        total_rooms: Room::find().count(db).await?,
        available_rooms: Room::find()
            .filter(room_entity::Column::IsAvailable.eq(true))
            .count(db)
            .await?,
        total_students: Student::find().count(db).await?,
        pending_bookings: RoomBooking::find()
            .filter(room_booking::Column::Status.eq(BookingStatus::Pending))
            .count(db)
            .await?,
        assigned_bookings: RoomBooking::find()
            .filter(room_booking::Column::Status.eq(BookingStatus::Assigned))
            .count(db)
            .await?,
        feedback_count: Feedback::find().count(db).await?,
        inquiry_count: ContactInquiry::find().count(db).await?,
    })
}

/// Rent figures for every student, ordered by name.
pub async fn rent_balances(db: &DatabaseConnection) -> Result<Vec<RentBalance>> {
    let rooms: HashMap<i64, room_entity::Model> = room::list_rooms(db)
        .await?
        .into_iter()
        .map(|r| (r.id, r))
        .collect();

    Ok(student::list_students(db)
        .await?
        .into_iter()
        .map(|s| {
            let room = s.room_id.and_then(|id| rooms.get(&id));
            RentBalance {
                student_id: s.id,
                name: s.name,
                room_number: room.map(|r| r.room_number.clone()),
                rent_price: room.map(room_entity::Model::rent_price),
                rent_paid: s.rent_paid,
                rent_due: s.rent_due,
            }
        })
        .collect())
}
