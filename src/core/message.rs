//! Notification log business logic.
//!
//! Messages are append-only; nothing in the application edits or deletes them
//! except the cascade when a student is removed.

use crate::{
    entities::{Message, message},
    errors::Result,
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;

/// Sent when a booking is matched to a room.
#[must_use]
pub fn assignment_message(room_number: &str) -> String {
    format!("Your room assignment is complete! You have been assigned Room {room_number}.")
}

/// Sent when no room of the requested type has a free bed.
pub const UNAVAILABLE_MESSAGE: &str =
    "Unfortunately, the room you requested is unavailable. Please select another room.";

/// Monthly reminder for an outstanding balance.
#[must_use]
pub fn rent_reminder_message(rent_due: f64) -> String {
    format!(
        "Reminder: You have an outstanding rent balance of {rent_due:.2}. Please complete your payment."
    )
}

/// Appends a message to a student's log.
pub async fn append_message<C>(db: &C, student_id: i64, content: String) -> Result<message::Model>
where
    C: ConnectionTrait,
{
    let model = message::ActiveModel {
        student_id: Set(student_id),
        content: Set(content),
        timestamp: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    debug!(student_id, message_id = created.id, "Message appended");
    Ok(created)
}

/// A student's messages, newest first.
pub async fn get_messages_for_student(
    db: &DatabaseConnection,
    student_id: i64,
) -> Result<Vec<message::Model>> {
    Message::find()
        .filter(message::Column::StudentId.eq(student_id))
        .order_by_desc(message::Column::Timestamp)
        .order_by_desc(message::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Every message in the system, newest first.
pub async fn list_all_messages(db: &DatabaseConnection) -> Result<Vec<message::Model>> {
    Message::find()
        .order_by_desc(message::Column::Timestamp)
        .order_by_desc(message::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_message_texts() {
        assert_eq!(
            assignment_message("A-101"),
            "Your room assignment is complete! You have been assigned Room A-101."
        );
        assert_eq!(
            rent_reminder_message(8_500.0),
            "Reminder: You have an outstanding rent balance of 8500.00. Please complete your payment."
        );
    }

    #[tokio::test]
    async fn test_messages_are_listed_newest_first() -> Result<()> {
        let db = setup_test_db().await?;
        let (_, student) = create_test_student(&db, "mia", "S200").await?;
        let (_, other) = create_test_student(&db, "noa", "S201").await?;

        append_message(&db, student.id, "first".to_string()).await?;
        append_message(&db, student.id, "second".to_string()).await?;
        append_message(&db, other.id, "elsewhere".to_string()).await?;

        let messages = get_messages_for_student(&db, student.id).await?;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "second");
        assert_eq!(messages[1].content, "first");

        assert_eq!(list_all_messages(&db).await?.len(), 3);
        Ok(())
    }
}
