//! Feedback entity - Free text feedback submitted by a registered student.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Feedback database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "feedback")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Submitting account
    pub user_id: Option<i64>,
    /// Submitting student
    pub student_id: i64,
    /// Name typed on the form
    pub name: Option<String>,
    /// Email typed on the form
    pub email: Option<String>,
    /// Feedback body
    pub message: String,
    /// When it was submitted
    pub timestamp: DateTimeUtc,
}

/// Defines relationships between Feedback and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each feedback entry belongs to one student
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    /// The account that submitted it
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
