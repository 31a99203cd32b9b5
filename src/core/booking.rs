//! Booking state machine.
//!
//! A booking is created `pending` and moves to `assigned` exactly once, when a
//! bed is taken from a room. Each assignment attempt leaves one message in the
//! student's log: a confirmation naming the room, or an unavailability notice.
//!
//! ```text
//! pending --(bed taken)--> assigned
//!    |
//!    +--(no bed)--> pending  (+ unavailability message)
//! ```

use crate::{
    core::{message, room, student, validation},
    entities::{
        BookingStatus, DurationOfStay, RoomBooking, RoomType, room as room_entity, room_booking,
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

/// Fields of the booking form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookingRequest {
    /// Contact phone
    #[validate(length(max = 15, message = "Phone must be at most 15 characters."))]
    pub phone: Option<String>,
    /// Requested kind of room
    pub room_type: RoomType,
    /// Intended arrival
    pub check_in_date: NaiveDate,
    /// Intended length of stay
    pub duration_of_stay: DurationOfStay,
    /// Free text
    #[validate(length(max = 2000, message = "Special requests must be at most 2000 characters."))]
    pub special_requests: Option<String>,
}

/// What happened to one booking during an assignment run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AssignmentOutcome {
    /// A bed was taken and the booking is now assigned
    Assigned {
        /// Updated booking
        booking: room_booking::Model,
        /// Room after the bed was taken
        room: room_entity::Model,
    },
    /// No room of the requested type had a bed; the student was told
    Unavailable {
        /// Booking, still pending
        booking: room_booking::Model,
    },
    /// The booking was not pending and was left alone
    Skipped {
        /// Booking id
        booking_id: i64,
    },
    /// No booking has this id
    NotFound {
        /// Requested id
        booking_id: i64,
    },
}

/// Records a new pending booking for `student_id`.
pub async fn submit_booking(
    db: &DatabaseConnection,
    student_id: i64,
    request: BookingRequest,
) -> Result<room_booking::Model> {
    let mut request = request;
    validation::trim_optional(&mut request.phone);
    validation::trim_optional(&mut request.special_requests);
    request.validate()?;
    if let Some(phone) = &request.phone {
        validation::phone(phone)?;
    }

    let booking = room_booking::ActiveModel {
        student_id: Set(student_id),
        phone: Set(request.phone),
        room_id: Set(None),
        room_type: Set(request.room_type),
        check_in_date: Set(request.check_in_date),
        duration_of_stay: Set(request.duration_of_stay),
        special_requests: Set(request.special_requests),
        booking_date: Set(Utc::now()),
        status: Set(BookingStatus::Pending),
        ..Default::default()
    };
    let created = booking.insert(db).await?;
    info!(booking_id = created.id, student_id, room_type = ?created.room_type, "Booking submitted");
    Ok(created)
}

/// Looks a booking up by id.
pub async fn get_booking<C>(db: &C, booking_id: i64) -> Result<Option<room_booking::Model>>
where
    C: ConnectionTrait,
{
    RoomBooking::find_by_id(booking_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists bookings, optionally only those with `status`, newest first.
pub async fn list_bookings(
    db: &DatabaseConnection,
    status: Option<BookingStatus>,
) -> Result<Vec<room_booking::Model>> {
    let mut query = RoomBooking::find();
    if let Some(status) = status {
        query = query.filter(room_booking::Column::Status.eq(status));
    }
    query
        .order_by_desc(room_booking::Column::BookingDate)
        .order_by_desc(room_booking::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// A student's bookings, newest first.
pub async fn get_bookings_for_student(
    db: &DatabaseConnection,
    student_id: i64,
) -> Result<Vec<room_booking::Model>> {
    RoomBooking::find()
        .filter(room_booking::Column::StudentId.eq(student_id))
        .order_by_desc(room_booking::Column::BookingDate)
        .order_by_desc(room_booking::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn load_pending<C>(db: &C, booking_id: i64) -> Result<room_booking::Model>
where
    C: ConnectionTrait,
{
    let booking = get_booking(db, booking_id)
        .await?
        .ok_or(Error::BookingNotFound { id: booking_id })?;
    if booking.status != BookingStatus::Pending {
        return Err(Error::BookingAlreadyAssigned { id: booking_id });
    }
    Ok(booking)
}

/// Marks `booking` assigned to `room`, moves the student in and notifies them.
async fn complete_assignment<C>(
    db: &C,
    booking: room_booking::Model,
    room: &room_entity::Model,
) -> Result<room_booking::Model>
where
    C: ConnectionTrait,
{
    let mut active: room_booking::ActiveModel = booking.into();
    active.status = Set(BookingStatus::Assigned);
    active.room_id = Set(Some(room.id));
    let booking = active.update(db).await?;

    let resident = student::get_student_by_id(db, booking.student_id)
        .await?
        .ok_or_else(|| Error::StudentNotFound {
            student: booking.student_id.to_string(),
        })?;
    student::set_student_room(db, resident, room.id).await?;

    message::append_message(
        db,
        booking.student_id,
        message::assignment_message(&room.room_number),
    )
    .await?;
    Ok(booking)
}

/// Tells the student behind `booking` that no room is free.
pub async fn notify_unavailability<C>(db: &C, booking: &room_booking::Model) -> Result<()>
where
    C: ConnectionTrait,
{
    message::append_message(db, booking.student_id, message::UNAVAILABLE_MESSAGE.to_string())
        .await?;
    Ok(())
}

/// Assigns the first available room of the requested type to a pending booking.
///
/// Candidates are tried in id order. If every candidate is full by the time
/// its bed is taken, the booking stays pending and the student receives one
/// unavailability message.
///
/// # Errors
/// [`Error::BookingNotFound`] or [`Error::BookingAlreadyAssigned`] when the
/// booking cannot be assigned at all.
pub async fn assign_room(db: &DatabaseConnection, booking_id: i64) -> Result<AssignmentOutcome> {
    let txn = db.begin().await?;
    let booking = load_pending(&txn, booking_id).await?;

    for candidate in room::find_available_rooms_of_type(&txn, booking.room_type).await? {
        if let Some(room) = room::take_bed(&txn, candidate.id).await? {
            let booking = complete_assignment(&txn, booking, &room).await?;
            txn.commit().await?;
            info!(booking_id, room = %room.room_number, "Room assigned");
            return Ok(AssignmentOutcome::Assigned { booking, room });
        }
    }

    notify_unavailability(&txn, &booking).await?;
    txn.commit().await?;
    warn!(booking_id, room_type = ?booking.room_type, "No room available for booking");
    Ok(AssignmentOutcome::Unavailable { booking })
}

/// Assigns a specific room, chosen by an administrator, to a pending booking.
///
/// The room does not have to match the requested type.
///
/// # Errors
/// [`Error::NoBedsAvailable`] when the room is full; the booking is left
/// pending and no message is sent.
pub async fn assign_specific_room(
    db: &DatabaseConnection,
    booking_id: i64,
    room_number: &str,
) -> Result<AssignmentOutcome> {
    let txn = db.begin().await?;
    let booking = load_pending(&txn, booking_id).await?;

    let target = room::get_room_by_number(&txn, room_number)
        .await?
        .ok_or_else(|| Error::RoomNotFound {
            room: room_number.to_string(),
        })?;
    let Some(room) = room::take_bed(&txn, target.id).await? else {
        return Err(Error::NoBedsAvailable {
            room_number: target.room_number,
        });
    };

    let booking = complete_assignment(&txn, booking, &room).await?;
    txn.commit().await?;
    info!(booking_id, room = %room.room_number, "Room assigned manually");
    Ok(AssignmentOutcome::Assigned { booking, room })
}

/// Runs [`assign_room`] over several bookings, reporting one outcome each.
///
/// Bookings that are no longer pending are skipped and unknown ids are
/// reported as not found; neither stops the run.
pub async fn assign_rooms(
    db: &DatabaseConnection,
    booking_ids: &[i64],
) -> Result<Vec<AssignmentOutcome>> {
    let mut outcomes = Vec::with_capacity(booking_ids.len());
    for &booking_id in booking_ids {
        let outcome = match assign_room(db, booking_id).await {
            Err(Error::BookingAlreadyAssigned { id }) => AssignmentOutcome::Skipped { booking_id: id },
            Err(Error::BookingNotFound { id }) => {
                warn!(booking_id = id, "Unknown booking in assignment run");
                AssignmentOutcome::NotFound { booking_id: id }
            }
            other => other?,
        };
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    #![allow(clippy::panic)]
    use super::*;
    use crate::core::message::get_messages_for_student;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_submit_booking_starts_pending() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, student) = create_test_student(&db, "pat", "S10").await?;

        let booking = create_test_booking(&db, student.id, RoomType::Single).await?;
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.room_id, None);
        assert_eq!(get_bookings_for_student(&db, student.id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_assign_room_takes_exactly_one_bed() -> Result<()> {
        let db = setup_test_db().await?;
        let room = create_test_room(&db, "T-1", RoomType::Twin, 2).await?;
        let (_, student) = create_test_student(&db, "kim", "S11").await?;
        let booking = create_test_booking(&db, student.id, RoomType::Twin).await?;

        let outcome = assign_room(&db, booking.id).await?;
        let AssignmentOutcome::Assigned { booking, room: assigned } = outcome else {
            panic!("expected assignment, got {outcome:?}");
        };

        assert_eq!(booking.status, BookingStatus::Assigned);
        assert_eq!(booking.room_id, Some(room.id));
        assert_eq!(assigned.beds_available, room.beds_available - 1);
        assert!(assigned.is_available);

        let resident = student::get_student_by_id(&db, student.id).await?.unwrap();
        assert_eq!(resident.room_id, Some(room.id));
        assert_eq!(resident.rent_due, 9_500.0);

        let messages = get_messages_for_student(&db, student.id).await?;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, message::assignment_message("T-1"));
        Ok(())
    }

    #[tokio::test]
    async fn test_last_bed_flips_availability() -> Result<()> {
        let db = setup_test_db().await?;
        let room = create_test_room(&db, "S-1", RoomType::Single, 1).await?;
        let (_, student) = create_test_student(&db, "ivy", "S12").await?;
        let booking = create_test_booking(&db, student.id, RoomType::Single).await?;

        assign_room(&db, booking.id).await?;

        let stored = room::get_room_by_id(&db, room.id).await?.unwrap();
        assert_eq!(stored.beds_available, 0);
        assert!(!stored.is_available);
        Ok(())
    }

    #[tokio::test]
    async fn test_no_room_leaves_booking_pending_with_one_message() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_room(&db, "W-1", RoomType::Single, 1).await?;
        let (_, student) = create_test_student(&db, "zoe", "S13").await?;
        let booking = create_test_booking(&db, student.id, RoomType::Studio).await?;

        let outcome = assign_room(&db, booking.id).await?;
        assert!(matches!(outcome, AssignmentOutcome::Unavailable { .. }));

        let stored = get_booking(&db, booking.id).await?.unwrap();
        assert_eq!(stored.status, BookingStatus::Pending);
        assert_eq!(stored.room_id, None);

        let messages = get_messages_for_student(&db, student.id).await?;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, message::UNAVAILABLE_MESSAGE);
        Ok(())
    }

    #[tokio::test]
    async fn test_assigned_booking_cannot_be_reassigned() -> Result<()> {
        let db = setup_test_db().await?;
        let room = create_test_room(&db, "Q-1", RoomType::Twin, 2).await?;
        let (_, student) = create_test_student(&db, "gus", "S14").await?;
        let booking = create_test_booking(&db, student.id, RoomType::Twin).await?;

        assign_room(&db, booking.id).await?;
        let again = assign_room(&db, booking.id).await;
        assert!(matches!(again.unwrap_err(), Error::BookingAlreadyAssigned { .. }));

        let stored = room::get_room_by_id(&db, room.id).await?.unwrap();
        assert_eq!(stored.beds_available, 1);

        let missing = assign_room(&db, 4_242).await;
        assert!(matches!(missing.unwrap_err(), Error::BookingNotFound { id: 4_242 }));
        Ok(())
    }

    #[tokio::test]
    async fn test_batch_assignment_reports_each_booking() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_room(&db, "E-1", RoomType::EightSharing, 1).await?;
        let (_, first) = create_test_student(&db, "ana", "S15").await?;
        let (_, second) = create_test_student(&db, "ben", "S16").await?;
        let b1 = create_test_booking(&db, first.id, RoomType::EightSharing).await?;
        let b2 = create_test_booking(&db, second.id, RoomType::EightSharing).await?;

        let outcomes = assign_rooms(&db, &[b1.id, 9_999, b2.id, b1.id]).await?;
        assert_eq!(outcomes.len(), 4);
        assert!(matches!(outcomes[0], AssignmentOutcome::Assigned { .. }));
        assert_eq!(outcomes[1], AssignmentOutcome::NotFound { booking_id: 9_999 });
        assert!(matches!(outcomes[2], AssignmentOutcome::Unavailable { .. }));
        assert_eq!(outcomes[3], AssignmentOutcome::Skipped { booking_id: b1.id });

        assert_eq!(list_bookings(&db, Some(BookingStatus::Pending)).await?.len(), 1);
        assert_eq!(list_bookings(&db, None).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_booking_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, student) = create_test_student(&db, "val", "S18").await?;
        let request = BookingRequest {
            phone: Some("  ".to_string()),
            room_type: RoomType::Twin,
            check_in_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            duration_of_stay: DurationOfStay::OneYear,
            special_requests: Some(" quiet floor ".to_string()),
        };

        let booking = submit_booking(&db, student.id, request.clone()).await?;
        assert_eq!(booking.phone, None);
        assert_eq!(booking.special_requests.as_deref(), Some("quiet floor"));

        let long_phone = BookingRequest {
            phone: Some("0".repeat(16)),
            ..request.clone()
        };
        let result = submit_booking(&db, student.id, long_phone).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let bad_phone = BookingRequest {
            phone: Some("ring me".to_string()),
            ..request
        };
        let result = submit_booking(&db, student.id, bad_phone).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_assign_specific_room() -> Result<()> {
        let db = setup_test_db().await?;
        let full = create_test_room(&db, "F-1", RoomType::Single, 1).await?;
        room::take_bed(&db, full.id).await?;
        create_test_room(&db, "F-2", RoomType::Studio, 1).await?;
        let (_, student) = create_test_student(&db, "eli", "S17").await?;
        let booking = create_test_booking(&db, student.id, RoomType::Single).await?;

        let refused = assign_specific_room(&db, booking.id, "F-1").await;
        assert!(matches!(refused.unwrap_err(), Error::NoBedsAvailable { .. }));
        assert!(get_messages_for_student(&db, student.id).await?.is_empty());

        let unknown = assign_specific_room(&db, booking.id, "nope").await;
        assert!(matches!(unknown.unwrap_err(), Error::RoomNotFound { .. }));

        let outcome = assign_specific_room(&db, booking.id, "F-2").await?;
        let AssignmentOutcome::Assigned { room, .. } = outcome else {
            panic!("expected assignment");
        };
        assert_eq!(room.room_number, "F-2");
        assert!(!room.is_available);

        let resident = student::get_student_by_id(&db, student.id).await?.unwrap();
        assert_eq!(resident.rent_due, 12_000.0);
        Ok(())
    }
}
