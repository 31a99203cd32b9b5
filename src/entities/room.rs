//! Room entity - The bed inventory ledger.
//!
//! Each room has a type with a fixed monthly rent, a total capacity, and the
//! number of beds still free. `is_available` is stored for cheap filtering but
//! must always equal `beds_available > 0`; every write goes through
//! [`crate::core::room`] which keeps the two in sync.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of room. Each kind has a fixed rent price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum RoomType {
    /// Single Room - 10,000
    #[sea_orm(string_value = "single")]
    #[serde(rename = "single")]
    Single,
    /// Studio Room - 12,000
    #[sea_orm(string_value = "studio")]
    #[serde(rename = "studio")]
    Studio,
    /// 4 Sharing - 8,500
    #[sea_orm(string_value = "4_sharing")]
    #[serde(rename = "4_sharing")]
    FourSharing,
    /// Twin Room - 9,500
    #[sea_orm(string_value = "twin")]
    #[serde(rename = "twin")]
    Twin,
    /// 6 Sharing - 7,500
    #[sea_orm(string_value = "6_sharing")]
    #[serde(rename = "6_sharing")]
    SixSharing,
    /// 8 Sharing - 6,500
    #[sea_orm(string_value = "8_sharing")]
    #[serde(rename = "8_sharing")]
    EightSharing,
}

impl RoomType {
    /// Fixed monthly rent for this room type.
    #[must_use]
    pub const fn rent_price(self) -> f64 {
        match self {
            Self::Single => 10_000.0,
            Self::Studio => 12_000.0,
            Self::FourSharing => 8_500.0,
            Self::Twin => 9_500.0,
            Self::SixSharing => 7_500.0,
            Self::EightSharing => 6_500.0,
        }
    }

    /// Human readable label, e.g. `"Twin Room"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "Single Room",
            Self::Studio => "Studio Room",
            Self::FourSharing => "4 Sharing",
            Self::Twin => "Twin Room",
            Self::SixSharing => "6 Sharing",
            Self::EightSharing => "8 Sharing",
        }
    }
}

/// Room database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    /// Unique identifier for the room
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Door number shown to residents (e.g., "A-101")
    #[sea_orm(unique)]
    pub room_number: String,
    /// Kind of room, determines the rent
    pub room_type: RoomType,
    /// Total beds in the room
    pub capacity: i32,
    /// Beds left
    pub beds_available: i32,
    /// Mirrors `beds_available > 0`
    pub is_available: bool,
}

impl Model {
    /// Fixed rent price derived from the room type.
    #[must_use]
    pub const fn rent_price(&self) -> f64 {
        self.room_type.rent_price()
    }
}

/// Defines relationships between Room and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One room houses many students
    #[sea_orm(has_many = "super::student::Entity")]
    Students,
    /// One room can satisfy many bookings
    #[sea_orm(has_many = "super::room_booking::Entity")]
    Bookings,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl Related<super::room_booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
