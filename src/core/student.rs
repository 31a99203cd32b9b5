//! Student profile and billing logic.
//!
//! `rent_due` is never written directly by callers. Every save goes through
//! [`save_student`], which recomputes it from the assigned room's fixed price
//! and `rent_paid`.

use crate::{
    core::{room, validation},
    entities::{Student, room as room_entity, student},
    errors::{Error, Result},
};
use sea_orm::{IntoActiveModel, QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

/// Profile fields collected at signup or by an administrator.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewStudent {
    /// Full name
    #[validate(length(min = 1, max = 100, message = "Full name is required (at most 100 characters)."))]
    pub name: String,
    /// Contact email
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    /// University-issued identifier
    #[validate(length(min = 1, max = 10, message = "Student ID is required (at most 10 characters)."))]
    pub student_id: String,
    /// Phone number
    #[validate(length(max = 15, message = "Phone number must be at most 15 characters."))]
    pub phone: Option<String>,
}

/// Fields an administrator may change on an existing student.
///
/// Absent or blank fields are left unchanged, except `room_number`, where a
/// blank value moves the student out of their room.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct StudentUpdate {
    /// Full name
    #[validate(length(min = 1, max = 100, message = "Full name must be at most 100 characters."))]
    pub name: Option<String>,
    /// Contact email
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    /// Phone number
    #[validate(length(max = 15, message = "Phone number must be at most 15 characters."))]
    pub phone: Option<String>,
    /// Room to live in, by number
    pub room_number: Option<String>,
    /// Total rent paid so far
    pub rent_paid: Option<f64>,
}

/// Rent due for a student paying `rent_paid` towards `room`.
///
/// Without a room the stored `current_due` is kept as is; there is no price
/// to derive a new figure from.
#[must_use]
pub fn calculate_rent_due(current_due: f64, rent_paid: f64, room: Option<&room_entity::Model>) -> f64 {
    room.map_or(current_due, |r| r.rent_price() - rent_paid)
}

/// Validates and inserts a student profile for `user_id`.
pub async fn create_student<C>(db: &C, user_id: i64, profile: NewStudent) -> Result<student::Model>
where
    C: ConnectionTrait,
{
    let mut profile = profile;
    validation::trim(&mut profile.name);
    validation::trim(&mut profile.email);
    validation::trim(&mut profile.student_id);
    validation::trim_optional(&mut profile.phone);
    profile.validate()?;
    if let Some(phone) = &profile.phone {
        validation::phone(phone)?;
    }

    let taken = Student::find()
        .filter(student::Column::StudentId.eq(profile.student_id.as_str()))
        .one(db)
        .await?;
    if taken.is_some() {
        return Err(Error::Duplicate {
            field: "student ID",
            value: profile.student_id,
        });
    }
    if let Some(phone) = &profile.phone {
        ensure_phone_free(db, phone, None).await?;
    }

    let model = student::ActiveModel {
        user_id: Set(user_id),
        name: Set(profile.name),
        email: Set(profile.email),
        student_id: Set(profile.student_id.clone()),
        phone: Set(profile.phone.clone()),
        room_id: Set(None),
        rent_paid: Set(0.0),
        rent_due: Set(0.0),
        ..Default::default()
    };
    let created = model
        .insert(db)
        .await
        .map_err(|e| unique_conflict(e, &profile.student_id, profile.phone.as_deref()))?;
    info!(student = %created.student_id, "Student profile created");
    Ok(created)
}

async fn ensure_phone_free<C>(db: &C, phone: &str, owner: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut query = Student::find().filter(student::Column::Phone.eq(phone));
    if let Some(owner) = owner {
        query = query.filter(student::Column::Id.ne(owner));
    }
    if query.one(db).await?.is_some() {
        return Err(Error::Duplicate {
            field: "phone",
            value: phone.to_string(),
        });
    }
    Ok(())
}

/// Names the unique column a failed student write collided on.
fn unique_conflict(err: DbErr, student_id: &str, phone: Option<&str>) -> Error {
    let text = err.to_string();
    match phone {
        Some(phone) if text.contains("phone") => Error::on_unique_violation(err, "phone", phone),
        _ if text.contains("user_id") => Error::on_unique_violation(err, "account", student_id),
        _ => Error::on_unique_violation(err, "student ID", student_id),
    }
}

/// Persists every field of `student`, recomputing `rent_due` first.
pub async fn save_student<C>(db: &C, student: student::Model) -> Result<student::Model>
where
    C: ConnectionTrait,
{
    let room = match student.room_id {
        Some(room_id) => Some(room::get_room_by_id(db, room_id).await?.ok_or_else(|| {
            Error::RoomNotFound {
                room: room_id.to_string(),
            }
        })?),
        None => None,
    };
    let rent_due = calculate_rent_due(student.rent_due, student.rent_paid, room.as_ref());

    let mut active = student.into_active_model().reset_all();
    active.rent_due = Set(rent_due);
    active.update(db).await.map_err(Into::into)
}

/// Looks a student up by primary key.
pub async fn get_student_by_id<C>(db: &C, id: i64) -> Result<Option<student::Model>>
where
    C: ConnectionTrait,
{
    Student::find_by_id(id).one(db).await.map_err(Into::into)
}

/// The profile attached to an account, if any.
pub async fn get_student_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Option<student::Model>> {
    Student::find()
        .filter(student::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// All students ordered by name.
pub async fn list_students(db: &DatabaseConnection) -> Result<Vec<student::Model>> {
    Student::find()
        .order_by_asc(student::Column::Name)
        .order_by_asc(student::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sets the total rent paid by a student and recomputes what is due.
pub async fn record_rent_paid(
    db: &DatabaseConnection,
    id: i64,
    rent_paid: f64,
) -> Result<student::Model> {
    let rent_paid = validation::amount(rent_paid)?;
    let mut student = get_student_by_id(db, id)
        .await?
        .ok_or_else(|| Error::StudentNotFound {
            student: id.to_string(),
        })?;
    student.rent_paid = rent_paid;
    let saved = save_student(db, student).await?;
    info!(student = %saved.student_id, rent_paid, rent_due = saved.rent_due, "Rent updated");
    Ok(saved)
}

/// Applies an administrator's edit and recomputes rent through [`save_student`].
///
/// Moving a student here does not touch bed counts; beds are only taken by
/// booking assignment.
pub async fn update_student(
    db: &DatabaseConnection,
    id: i64,
    update: StudentUpdate,
) -> Result<student::Model> {
    let mut update = update;
    validation::trim_optional(&mut update.name);
    validation::trim_optional(&mut update.email);
    validation::trim_optional(&mut update.phone);
    update.validate()?;
    if let Some(phone) = &update.phone {
        validation::phone(phone)?;
        ensure_phone_free(db, phone, Some(id)).await?;
    }
    let rent_paid = update.rent_paid.map(validation::amount).transpose()?;

    let mut student = get_student_by_id(db, id)
        .await?
        .ok_or_else(|| Error::StudentNotFound {
            student: id.to_string(),
        })?;

    match update.room_number.as_deref().map(str::trim) {
        None => {}
        Some("") => student.room_id = None,
        Some(number) => {
            let room = room::get_room_by_number(db, number)
                .await?
                .ok_or_else(|| Error::RoomNotFound {
                    room: number.to_string(),
                })?;
            student.room_id = Some(room.id);
        }
    }
    if let Some(name) = update.name {
        student.name = name;
    }
    if let Some(email) = update.email {
        student.email = email;
    }
    if update.phone.is_some() {
        student.phone = update.phone.clone();
    }
    if let Some(rent_paid) = rent_paid {
        student.rent_paid = rent_paid;
    }

    let student_id = student.student_id.clone();
    let saved = save_student(db, student)
        .await
        .map_err(|e| match e {
            Error::Database(err) => unique_conflict(err, &student_id, update.phone.as_deref()),
            other => other,
        })?;
    info!(student = %saved.student_id, rent_due = saved.rent_due, "Student updated");
    Ok(saved)
}

/// Moves a student into `room_id` and recomputes their rent.
pub async fn set_student_room<C>(db: &C, student: student::Model, room_id: i64) -> Result<student::Model>
where
    C: ConnectionTrait,
{
    let mut student = student;
    student.room_id = Some(room_id);
    save_student(db, student).await
}
