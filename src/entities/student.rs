//! Student entity - Resident profile and billing record.
//!
//! Linked 1:1 to a student account. `rent_due` is derived from the assigned
//! room's fixed price and `rent_paid`; it is recomputed by
//! [`crate::core::student::save_student`] on every save.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Student database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning account
    #[sea_orm(unique)]
    pub user_id: i64,
    /// Full name
    pub name: String,
    /// Contact email
    pub email: String,
    /// University-issued identifier
    #[sea_orm(unique)]
    pub student_id: String,
    /// Phone number, unique when present
    #[sea_orm(unique)]
    pub phone: Option<String>,
    /// Room the student lives in, if any
    pub room_id: Option<i64>,
    /// Rent paid so far
    pub rent_paid: f64,
    /// Outstanding rent
    pub rent_due: f64,
}

/// Defines relationships between Student and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each student belongs to one user account
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// A student may live in one room
    #[sea_orm(
        belongs_to = "super::room::Entity",
        from = "Column::RoomId",
        to = "super::room::Column::Id",
        on_delete = "SetNull"
    )]
    Room,
    /// One student has many bookings
    #[sea_orm(has_many = "super::room_booking::Entity")]
    Bookings,
    /// One student has many messages
    #[sea_orm(has_many = "super::message::Entity")]
    Messages,
    /// One student has many feedback entries
    #[sea_orm(has_many = "super::feedback::Entity")]
    Feedback,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl Related<super::room_booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl Related<super::message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl Related<super::feedback::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feedback.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
