//! Room inventory business logic.
//!
//! Every function that changes `beds_available` also rewrites `is_available`
//! so the stored flag never drifts from `beds_available > 0`.

use crate::{
    core::validation,
    entities::{Room, RoomBooking, RoomType, Student, room, room_booking, student},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

/// Lists every room, available rooms first, then by room number.
pub async fn list_rooms(db: &DatabaseConnection) -> Result<Vec<room::Model>> {
    Room::find()
        .order_by_desc(room::Column::IsAvailable)
        .order_by_asc(room::Column::RoomNumber)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists rooms that still have at least one free bed.
pub async fn list_available_rooms(db: &DatabaseConnection) -> Result<Vec<room::Model>> {
    Room::find()
        .filter(room::Column::IsAvailable.eq(true))
        .order_by_asc(room::Column::RoomNumber)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a room by its door number.
pub async fn get_room_by_number<C>(db: &C, room_number: &str) -> Result<Option<room::Model>>
where
    C: ConnectionTrait,
{
    Room::find()
        .filter(room::Column::RoomNumber.eq(room_number.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a room by primary key.
pub async fn get_room_by_id<C>(db: &C, room_id: i64) -> Result<Option<room::Model>>
where
    C: ConnectionTrait,
{
    Room::find_by_id(room_id).one(db).await.map_err(Into::into)
}

/// Available rooms of `room_type` in allocation order (lowest id first).
pub async fn find_available_rooms_of_type<C>(
    db: &C,
    room_type: RoomType,
) -> Result<Vec<room::Model>>
where
    C: ConnectionTrait,
{
    Room::find()
        .filter(room::Column::RoomType.eq(room_type))
        .filter(room::Column::IsAvailable.eq(true))
        .order_by_asc(room::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Fields of the room creation form and of a `[[rooms]]` seed entry.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewRoom {
    /// Door number
    #[validate(length(min = 1, max = 10, message = "Room number is required (at most 10 characters)."))]
    pub room_number: String,
    /// Kind of room
    pub room_type: RoomType,
    /// Total beds
    #[validate(range(min = 1, message = "Capacity must be at least 1."))]
    pub capacity: i32,
    /// Beds free at creation, defaults to `capacity`
    #[validate(range(min = 0, message = "Beds available cannot be negative."))]
    pub beds_available: Option<i32>,
}

impl NewRoom {
    /// A room of `room_type` with every bed free.
    pub fn empty(room_number: impl Into<String>, room_type: RoomType, capacity: i32) -> Self {
        Self {
            room_number: room_number.into(),
            room_type,
            capacity,
            beds_available: None,
        }
    }
}

/// Changes an administrator may make to an existing room.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RoomUpdate {
    /// New kind of room; residents' rent follows the new price
    pub room_type: Option<RoomType>,
    /// New total beds
    #[validate(range(min = 1, message = "Capacity must be at least 1."))]
    pub capacity: Option<i32>,
    /// New free bed count
    #[validate(range(min = 0, message = "Beds available cannot be negative."))]
    pub beds_available: Option<i32>,
}

fn check_beds(beds_available: i32, capacity: i32) -> Result<()> {
    if beds_available > capacity {
        return Err(Error::validation(format!(
            "Beds available must be between 0 and {capacity}."
        )));
    }
    Ok(())
}

/// Creates a room after validating its number and bed counts.
pub async fn create_room(db: &DatabaseConnection, form: NewRoom) -> Result<room::Model> {
    let mut form = form;
    validation::trim(&mut form.room_number);
    form.validate()?;
    let beds_available = form.beds_available.unwrap_or(form.capacity);
    check_beds(beds_available, form.capacity)?;

    if get_room_by_number(db, &form.room_number).await?.is_some() {
        return Err(Error::Duplicate {
            field: "room number",
            value: form.room_number,
        });
    }

    let room = room::ActiveModel {
        room_number: Set(form.room_number.clone()),
        room_type: Set(form.room_type),
        capacity: Set(form.capacity),
        beds_available: Set(beds_available),
        is_available: Set(beds_available > 0),
        ..Default::default()
    };

    let created = room
        .insert(db)
        .await
        .map_err(|e| Error::on_unique_violation(e, "room number", form.room_number))?;
    info!(room = %created.room_number, beds = created.beds_available, "Room created");
    Ok(created)
}

/// Edits a room's type, capacity or free beds.
///
/// `is_available` is rewritten from the new bed count, and when the type
/// changes every resident is re-saved so their rent follows the new price.
pub async fn update_room(db: &DatabaseConnection, room_id: i64, update: RoomUpdate) -> Result<room::Model> {
    update.validate()?;

    let txn = db.begin().await?;
    let current = get_room_by_id(&txn, room_id)
        .await?
        .ok_or_else(|| Error::RoomNotFound {
            room: room_id.to_string(),
        })?;

    let capacity = update.capacity.unwrap_or(current.capacity);
    let beds_available = update.beds_available.unwrap_or(current.beds_available);
    check_beds(beds_available, capacity)?;
    let type_changed = update.room_type.is_some_and(|t| t != current.room_type);

    let mut active: room::ActiveModel = current.into();
    if let Some(room_type) = update.room_type {
        active.room_type = Set(room_type);
    }
    active.capacity = Set(capacity);
    active.beds_available = Set(beds_available);
    active.is_available = Set(beds_available > 0);
    let updated = active.update(&txn).await?;

    if type_changed {
        let residents = Student::find()
            .filter(student::Column::RoomId.eq(room_id))
            .all(&txn)
            .await?;
        for resident in residents {
            crate::core::student::save_student(&txn, resident).await?;
        }
    }
    txn.commit().await?;

    info!(room = %updated.room_number, beds = updated.beds_available, "Room updated");
    Ok(updated)
}

/// Takes one bed from `room_id` if any is free.
///
/// The decrement is a single conditional `UPDATE ... WHERE beds_available > 0`,
/// so two callers can never both take the last bed. Returns the updated room,
/// or `None` when the room was already full.
pub async fn take_bed<C>(db: &C, room_id: i64) -> Result<Option<room::Model>>
where
    C: ConnectionTrait,
{
    let result = Room::update_many()
        .col_expr(
            room::Column::BedsAvailable,
            Expr::col(room::Column::BedsAvailable).sub(1),
        )
        .filter(room::Column::Id.eq(room_id))
        .filter(room::Column::BedsAvailable.gt(0))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        debug!(room_id, "No bed left to take");
        return Ok(None);
    }

    let room = get_room_by_id(db, room_id)
        .await?
        .ok_or_else(|| Error::RoomNotFound {
            room: room_id.to_string(),
        })?;
    sync_availability(db, room).await.map(Some)
}

/// Rewrites `is_available` from `beds_available` when the two disagree.
pub async fn sync_availability<C>(db: &C, room: room::Model) -> Result<room::Model>
where
    C: ConnectionTrait,
{
    let available = room.beds_available > 0;
    if room.is_available == available {
        return Ok(room);
    }
    let mut active: room::ActiveModel = room.into();
    active.is_available = Set(available);
    active.update(db).await.map_err(Into::into)
}

/// Deletes a room. Students living in it and bookings pointing at it lose
/// their room reference.
pub async fn delete_room(db: &DatabaseConnection, room_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let room = get_room_by_id(&txn, room_id)
        .await?
        .ok_or_else(|| Error::RoomNotFound {
            room: room_id.to_string(),
        })?;

    Student::update_many()
        .col_expr(student::Column::RoomId, Expr::value(Option::<i64>::None))
        .filter(student::Column::RoomId.eq(room_id))
        .exec(&txn)
        .await?;
    RoomBooking::update_many()
        .col_expr(
            room_booking::Column::RoomId,
            Expr::value(Option::<i64>::None),
        )
        .filter(room_booking::Column::RoomId.eq(room_id))
        .exec(&txn)
        .await?;

    let number = room.room_number.clone();
    room.delete(&txn).await?;
    txn.commit().await?;

    info!(room = %number, "Room deleted");
    Ok(())
}
