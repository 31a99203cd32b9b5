//! Message entity - Notification log addressed to a single student.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Message database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Recipient
    pub student_id: i64,
    /// Free text body
    pub content: String,
    /// When the message was appended
    pub timestamp: DateTimeUtc,
}

/// Defines relationships between Message and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each message belongs to one student
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
