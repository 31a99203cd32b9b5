//! Administrator routes. Every handler takes an [`AdminUser`], so non-admin
//! callers get 403 before any work is done.

use crate::{
    core::{
        auth::{self, SignupForm},
        booking::{self, AssignmentOutcome},
        feedback, message,
        reminders::{self, ReminderOutcome},
        report::{self, DashboardSummary, RentBalance},
        room::{self, NewRoom, RoomUpdate},
        student::{self, StudentUpdate},
    },
    entities::{
        BookingStatus, UserType, contact_inquiry, feedback as feedback_entity, message as message_entity,
        room as room_entity, room_booking, student as student_entity,
    },
    errors::Result,
    web::{AppState, auth::AdminUser, public::UserView},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

/// `GET /admin/dashboard`: headline counts for the admin home page.
pub async fn dashboard(_admin: AdminUser, State(state): State<AppState>) -> Result<Json<DashboardSummary>> {
    Ok(Json(report::dashboard_summary(&state.db).await?))
}

// Rooms

/// `GET /admin/rooms`: the whole inventory, available rooms first.
pub async fn list_rooms(_admin: AdminUser, State(state): State<AppState>) -> Result<Json<Vec<room_entity::Model>>> {
    Ok(Json(room::list_rooms(&state.db).await?))
}

/// `POST /admin/rooms`: adds a room. Responds 201 with the stored row.
pub async fn create_room(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(form): Json<NewRoom>,
) -> Result<(StatusCode, Json<room_entity::Model>)> {
    let created = room::create_room(&state.db, form).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /admin/rooms/:id`: edits type, capacity or free beds.
pub async fn update_room(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(room_id): Path<i64>,
    Json(update): Json<RoomUpdate>,
) -> Result<Json<room_entity::Model>> {
    let updated = room::update_room(&state.db, room_id, update).await?;
    info!(admin = %admin.username, room = %updated.room_number, "Room edited by administrator");
    Ok(Json(updated))
}

/// `DELETE /admin/rooms/:id`: removes a room, detaching its residents.
pub async fn delete_room(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(room_id): Path<i64>,
) -> Result<StatusCode> {
    room::delete_room(&state.db, room_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Students

/// `GET /admin/students`: every profile ordered by name.
pub async fn list_students(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<student_entity::Model>>> {
    Ok(Json(student::list_students(&state.db).await?))
}

/// Account and profile details for a student registered by staff.
#[derive(Debug, Deserialize)]
pub struct AddStudentForm {
    /// Login name
    pub username: String,
    /// Initial password; staff hand it over out of band
    pub password: String,
    /// Full name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Institutional ID, unique
    pub student_id: String,
    /// Contact phone, unique
    pub phone: String,
}

/// Response to [`add_student`].
#[derive(Debug, Serialize)]
pub struct AddedStudent {
    /// The new account
    pub user: UserView,
    /// The profile created with it
    pub student: Option<student_entity::Model>,
}

/// `POST /admin/students`: registers a student account and profile.
pub async fn add_student(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(form): Json<AddStudentForm>,
) -> Result<(StatusCode, Json<AddedStudent>)> {
    let signup = auth::signup(
        &state.db,
        SignupForm {
            username: form.username,
            password_confirmation: form.password.clone(),
            password: form.password,
            user_type: UserType::Student,
            name: Some(form.name),
            email: Some(form.email),
            student_id: Some(form.student_id),
            phone: Some(form.phone),
        },
    )
    .await?;
    info!(admin = %admin.username, student = %signup.user.username, "Student added by administrator");

    Ok((
        StatusCode::CREATED,
        Json(AddedStudent {
            user: UserView::from(&signup.user),
            student: signup.student,
        }),
    ))
}

/// `PUT /admin/students/:id`: edits a profile. Rent due is recomputed from
/// the (possibly new) room.
pub async fn update_student(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
    Json(update): Json<StudentUpdate>,
) -> Result<Json<student_entity::Model>> {
    let updated = student::update_student(&state.db, student_id, update).await?;
    info!(admin = %admin.username, student = %updated.student_id, "Student edited by administrator");
    Ok(Json(updated))
}

// Rent

/// `GET /admin/rent`: rent paid and due per student.
pub async fn rent_overview(_admin: AdminUser, State(state): State<AppState>) -> Result<Json<Vec<RentBalance>>> {
    Ok(Json(report::rent_balances(&state.db).await?))
}

/// Body of `PUT /admin/rent/:id`.
#[derive(Debug, Deserialize)]
pub struct RentUpdate {
    /// Total paid so far, replacing the stored figure
    pub rent_paid: f64,
}

/// `PUT /admin/rent/:id`: records a payment total.
pub async fn update_rent(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
    Json(update): Json<RentUpdate>,
) -> Result<Json<student_entity::Model>> {
    Ok(Json(student::record_rent_paid(&state.db, student_id, update.rent_paid).await?))
}

// Feedback

/// `GET /admin/feedback`: all feedback, newest first.
pub async fn list_feedback(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<feedback_entity::Model>>> {
    Ok(Json(feedback::list_feedback(&state.db).await?))
}

/// `DELETE /admin/feedback/:id`
pub async fn delete_feedback(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(feedback_id): Path<i64>,
) -> Result<StatusCode> {
    feedback::delete_feedback(&state.db, feedback_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Bookings

/// Query string of `GET /admin/bookings`.
#[derive(Debug, Deserialize)]
pub struct BookingFilter {
    /// Only bookings in this state; all when absent
    pub status: Option<BookingStatus>,
}

/// `GET /admin/bookings`: booking requests, optionally filtered by status.
pub async fn list_bookings(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(filter): Query<BookingFilter>,
) -> Result<Json<Vec<room_booking::Model>>> {
    Ok(Json(booking::list_bookings(&state.db, filter.status).await?))
}

/// Body of `POST /admin/bookings/assign`.
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    /// Bookings to assign, processed in order
    pub booking_ids: Vec<i64>,
}

/// `POST /admin/bookings/assign`: automatic assignment for the selected
/// bookings, one outcome each.
pub async fn assign_bookings(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(request): Json<AssignRequest>,
) -> Result<Json<Vec<AssignmentOutcome>>> {
    Ok(Json(booking::assign_rooms(&state.db, &request.booking_ids).await?))
}

/// Body of `POST /admin/bookings/:id/room`.
#[derive(Debug, Deserialize)]
pub struct ManualAssignment {
    /// Door number of the room to use
    pub room_number: String,
}

/// `POST /admin/bookings/:id/room`: assigns a booking to a chosen room,
/// whatever type it requested.
pub async fn assign_booking_room(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
    Json(request): Json<ManualAssignment>,
) -> Result<Json<AssignmentOutcome>> {
    let outcome = booking::assign_specific_room(&state.db, booking_id, request.room_number.trim()).await?;
    Ok(Json(outcome))
}

// Messages and inquiries

/// `GET /admin/messages`: every message sent to any student.
pub async fn list_messages(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<message_entity::Model>>> {
    Ok(Json(message::list_all_messages(&state.db).await?))
}

/// `GET /admin/inquiries`: contact form submissions.
pub async fn list_inquiries(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<contact_inquiry::Model>>> {
    Ok(Json(feedback::list_inquiries(&state.db).await?))
}

/// `POST /admin/reminders`: runs the rent reminder job for today's date.
pub async fn send_reminders(_admin: AdminUser, State(state): State<AppState>) -> Result<Json<ReminderOutcome>> {
    let today = Utc::now().date_naive();
    Ok(Json(reminders::send_rent_reminders(&state.db, today).await?))
}
