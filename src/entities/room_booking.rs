//! Room booking entity - A student's request for a room of a given type.
//!
//! Bookings start `pending` and move to `assigned` once a room with a free bed
//! has been allocated. There is no transition back.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::room::RoomType;

/// Booking lifecycle state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Waiting for an administrator to assign a room
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Room Assignment Complete
    #[sea_orm(string_value = "assigned")]
    Assigned,
}

/// How long the student intends to stay
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum DurationOfStay {
    /// 1 Month
    #[sea_orm(string_value = "one_month")]
    OneMonth,
    /// 1 Semester
    #[sea_orm(string_value = "one_semester")]
    OneSemester,
    /// 1 Year
    #[sea_orm(string_value = "one_year")]
    OneYear,
}

/// Room booking database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "room_bookings")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Requesting student
    pub student_id: i64,
    /// Contact phone given on the booking form
    pub phone: Option<String>,
    /// Room allocated once the booking is assigned
    pub room_id: Option<i64>,
    /// Requested kind of room
    pub room_type: RoomType,
    /// Intended arrival
    pub check_in_date: Date,
    /// Intended length of stay
    pub duration_of_stay: DurationOfStay,
    /// Free text from the student
    pub special_requests: Option<String>,
    /// When the request was submitted
    pub booking_date: DateTimeUtc,
    /// Lifecycle state
    pub status: BookingStatus,
}

/// Defines relationships between `RoomBooking` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each booking belongs to one student
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    /// Assigned room, if any
    #[sea_orm(
        belongs_to = "super::room::Entity",
        from = "Column::RoomId",
        to = "super::room::Column::Id",
        on_delete = "SetNull"
    )]
    Room,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
