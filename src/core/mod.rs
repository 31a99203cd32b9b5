//! Core business logic - framework-agnostic hostel operations.
//!
//! Everything here takes a SeaORM connection and returns [`crate::errors::Result`];
//! nothing depends on the HTTP layer.

/// Accounts, passwords and sessions
pub mod auth;
/// Booking state machine and room assignment
pub mod booking;
/// Feedback and contact inquiries
pub mod feedback;
/// Student notification log
pub mod message;
/// Rent reminder batch job
pub mod reminders;
/// Profile, dashboard and rent views
pub mod report;
/// Room inventory
pub mod room;
/// Student profiles and rent calculation
pub mod student;
/// Form field validation
pub mod validation;
