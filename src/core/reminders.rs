//! Rent reminder batch job.
//!
//! Runs only on the 30th day of a month. Every student with a positive
//! `rent_due` gets one reminder message per run; running twice on the same
//! day sends twice.

use crate::{
    core::message,
    entities::{Student, student},
    errors::Result,
};
use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{QueryOrder, prelude::*};
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};

/// Day of the month on which reminders go out.
pub const REMINDER_DAY: u32 = 30;

/// Result of one reminder run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReminderOutcome {
    /// `date` is not a reminder day; nothing was sent
    NotReminderDay {
        /// Date the job was asked to run for
        date: NaiveDate,
    },
    /// Reminders were appended
    Sent {
        /// Date the job ran for
        date: NaiveDate,
        /// Number of messages appended
        count: usize,
    },
}

/// Whether reminders go out on `date`.
#[must_use]
pub fn is_reminder_day(date: NaiveDate) -> bool {
    date.day() == REMINDER_DAY
}

/// Students who currently owe rent, by id.
pub async fn students_with_rent_due(db: &DatabaseConnection) -> Result<Vec<student::Model>> {
    Student::find()
        .filter(student::Column::RentDue.gt(0.0))
        .order_by_asc(student::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sends one reminder to every student with rent due, if `today` is the 30th.
pub async fn send_rent_reminders(db: &DatabaseConnection, today: NaiveDate) -> Result<ReminderOutcome> {
    if !is_reminder_day(today) {
        info!(%today, "Today is not the 30th. No reminders sent.");
        return Ok(ReminderOutcome::NotReminderDay { date: today });
    }

    let debtors = students_with_rent_due(db).await?;
    for debtor in &debtors {
        message::append_message(db, debtor.id, message::rent_reminder_message(debtor.rent_due))
            .await?;
    }

    info!(%today, count = debtors.len(), "Rent reminders sent");
    Ok(ReminderOutcome::Sent {
        date: today,
        count: debtors.len(),
    })
}

/// Runs the reminder check once a day, starting immediately, for as long as
/// the task is alive. Failed runs are logged and retried the next day.
pub async fn run_daily(db: DatabaseConnection) {
    let mut ticker = tokio::time::interval(Duration::from_secs(24 * 60 * 60));
    info!("Rent reminder scheduler started");
    loop {
        ticker.tick().await;
        if let Err(e) = send_rent_reminders(&db, Utc::now().date_naive()).await {
            error!("Rent reminder run failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{message::get_messages_for_student, student::record_rent_paid};
    use crate::entities::RoomType;
    use crate::test_utils::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    /// Two students in rooms (one paid up), one without a room.
    async fn seed(db: &DatabaseConnection) -> Result<(i64, i64, i64)> {
        let room = create_test_room(db, "M-1", RoomType::SixSharing, 6).await?;
        let (_, owing) = create_test_student(db, "owes", "S20").await?;
        let (_, paid) = create_test_student(db, "paid", "S21").await?;
        let (_, roomless) = create_test_student(db, "none", "S22").await?;

        assign_student_room(db, owing.id, room.id).await?;
        assign_student_room(db, paid.id, room.id).await?;
        record_rent_paid(db, paid.id, 7_500.0).await?;
        Ok((owing.id, paid.id, roomless.id))
    }

    #[test]
    fn test_is_reminder_day() {
        assert!(is_reminder_day(date(30)));
        assert!(!is_reminder_day(date(29)));
        assert!(!is_reminder_day(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
    }

    #[tokio::test]
    async fn test_reminders_on_the_30th() -> Result<()> {
        let db = setup_test_db().await?;
        let (owing, paid, roomless) = seed(&db).await?;

        let outcome = send_rent_reminders(&db, date(30)).await?;
        assert_eq!(outcome, ReminderOutcome::Sent { date: date(30), count: 1 });

        let messages = get_messages_for_student(&db, owing).await?;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, message::rent_reminder_message(7_500.0));
        assert!(get_messages_for_student(&db, paid).await?.is_empty());
        assert!(get_messages_for_student(&db, roomless).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_no_reminders_on_other_days() -> Result<()> {
        let db = setup_test_db().await?;
        let (owing, _, _) = seed(&db).await?;

        for day in [1, 15, 29] {
            let outcome = send_rent_reminders(&db, date(day)).await?;
            assert_eq!(outcome, ReminderOutcome::NotReminderDay { date: date(day) });
        }
        assert!(get_messages_for_student(&db, owing).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_repeated_run_is_not_deduplicated() -> Result<()> {
        let db = setup_test_db().await?;
        let (owing, _, _) = seed(&db).await?;

        send_rent_reminders(&db, date(30)).await?;
        send_rent_reminders(&db, date(30)).await?;
        assert_eq!(get_messages_for_student(&db, owing).await?.len(), 2);
        Ok(())
    }
}
