//! Contact inquiry entity - Messages sent through the public contact form.
//! Flat records with no relationships.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Topic selected on the contact form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum InquiryType {
    /// Room Booking
    #[sea_orm(string_value = "room_booking")]
    RoomBooking,
    /// Rent Payment
    #[sea_orm(string_value = "rent_payment")]
    RentPayment,
    /// Maintenance Request
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
    /// General Inquiry
    #[sea_orm(string_value = "general")]
    General,
}

/// Contact inquiry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contact_inquiries")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Sender's name
    pub name: String,
    /// Address to reply to
    pub email: String,
    /// Optional callback number
    pub phone: Option<String>,
    /// Topic picked on the form
    pub inquiry_type: InquiryType,
    /// Body text
    pub message: String,
    /// When the form was submitted
    pub submitted_at: DateTimeUtc,
}

/// `ContactInquiry` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
