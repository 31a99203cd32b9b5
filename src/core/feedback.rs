//! Feedback and contact inquiry business logic.

use crate::{
    core::validation,
    entities::{ContactInquiry, Feedback, InquiryType, contact_inquiry, feedback},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

/// Fields of the feedback form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FeedbackForm {
    /// Your Name
    #[validate(length(min = 1, max = 100, message = "Your Name is required (at most 100 characters)."))]
    pub name: String,
    /// Your Email
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    /// Feedback body
    #[validate(length(min = 1, max = 5000, message = "Message is required (at most 5000 characters)."))]
    pub message: String,
}

/// Fields of the public contact form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InquiryForm {
    /// Full Name
    #[validate(length(min = 1, max = 100, message = "Full Name is required (at most 100 characters)."))]
    pub name: String,
    /// Email Address
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    /// Phone Number, optional
    #[validate(length(max = 15, message = "Phone must be at most 15 characters."))]
    pub phone: Option<String>,
    /// Inquiry Type
    pub inquiry_type: InquiryType,
    /// Message body
    #[validate(length(min = 1, max = 5000, message = "Message is required (at most 5000 characters)."))]
    pub message: String,
}

/// Stores feedback from a registered student.
pub async fn submit_feedback(
    db: &DatabaseConnection,
    user_id: i64,
    student_id: i64,
    form: FeedbackForm,
) -> Result<feedback::Model> {
    let mut form = form;
    validation::trim(&mut form.name);
    validation::trim(&mut form.email);
    validation::trim(&mut form.message);
    form.validate()?;

    let model = feedback::ActiveModel {
        user_id: Set(Some(user_id)),
        student_id: Set(student_id),
        name: Set(Some(form.name)),
        email: Set(Some(form.email)),
        message: Set(form.message),
        timestamp: Set(Utc::now()),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    info!(feedback_id = created.id, student_id, "Feedback submitted");
    Ok(created)
}

/// All feedback, newest first.
pub async fn list_feedback(db: &DatabaseConnection) -> Result<Vec<feedback::Model>> {
    Feedback::find()
        .order_by_desc(feedback::Column::Timestamp)
        .order_by_desc(feedback::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Removes one feedback entry.
pub async fn delete_feedback(db: &DatabaseConnection, feedback_id: i64) -> Result<()> {
    let result = Feedback::delete_by_id(feedback_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::FeedbackNotFound { id: feedback_id });
    }
    info!(feedback_id, "Feedback deleted");
    Ok(())
}

/// Stores an inquiry from the public contact form.
pub async fn submit_inquiry(
    db: &DatabaseConnection,
    form: InquiryForm,
) -> Result<contact_inquiry::Model> {
    let mut form = form;
    validation::trim(&mut form.name);
    validation::trim(&mut form.email);
    validation::trim_optional(&mut form.phone);
    validation::trim(&mut form.message);
    form.validate()?;
    if let Some(phone) = &form.phone {
        validation::phone(phone)?;
    }

    let model = contact_inquiry::ActiveModel {
        name: Set(form.name),
        email: Set(form.email),
        phone: Set(form.phone),
        inquiry_type: Set(form.inquiry_type),
        message: Set(form.message),
        submitted_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    info!(inquiry_id = created.id, inquiry_type = ?created.inquiry_type, "Inquiry submitted");
    Ok(created)
}

/// All inquiries, newest first.
pub async fn list_inquiries(db: &DatabaseConnection) -> Result<Vec<contact_inquiry::Model>> {
    ContactInquiry::find()
        .order_by_desc(contact_inquiry::Column::SubmittedAt)
        .order_by_desc(contact_inquiry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
