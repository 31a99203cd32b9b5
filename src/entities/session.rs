//! Session entity - Bearer tokens issued at login.
//!
//! Only the SHA-256 digest of a token is stored; the plain token is handed to
//! the client once and never persisted.

use sea_orm::entity::prelude::*;

/// Session database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Hex digest of the bearer token
    #[sea_orm(unique)]
    pub token_hash: String,
    /// Account the session belongs to
    pub user_id: i64,
    /// When the session was opened
    pub created_at: DateTimeUtc,
    /// After this instant the token is rejected
    pub expires_at: DateTimeUtc,
}

/// Defines relationships between Session and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each session belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
