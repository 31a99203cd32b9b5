//! User entity - Login accounts for both administrators and students.
//!
//! Students additionally own exactly one `Student` profile row; administrators
//! have none.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role attached to an account, selected at signup and checked again at login.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// Hostel staff with access to the management screens
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Resident or applicant
    #[sea_orm(string_value = "student")]
    Student,
}

impl UserType {
    /// Parses a role name case-insensitively, ignoring surrounding whitespace.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "student" => Some(Self::Student),
            _ => None,
        }
    }
}

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name
    #[sea_orm(unique)]
    pub username: String,
    /// `salt$hex(sha256(salt || password))`
    pub password_hash: String,
    /// Account role
    pub user_type: UserType,
    /// When the account was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A student account has one student profile
    #[sea_orm(has_one = "super::student::Entity")]
    Student,
    /// One user has many sessions
    #[sea_orm(has_many = "super::session::Entity")]
    Sessions,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
