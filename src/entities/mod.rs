//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod contact_inquiry;
pub mod feedback;
pub mod message;
pub mod room;
pub mod room_booking;
pub mod session;
pub mod student;
pub mod user;

// Re-export specific types to avoid conflicts
pub use contact_inquiry::{
    Column as ContactInquiryColumn, Entity as ContactInquiry, InquiryType,
    Model as ContactInquiryModel,
};
pub use feedback::{Column as FeedbackColumn, Entity as Feedback, Model as FeedbackModel};
pub use message::{Column as MessageColumn, Entity as Message, Model as MessageModel};
pub use room::{Column as RoomColumn, Entity as Room, Model as RoomModel, RoomType};
pub use room_booking::{
    BookingStatus, Column as RoomBookingColumn, DurationOfStay, Entity as RoomBooking,
    Model as RoomBookingModel,
};
pub use session::{Column as SessionColumn, Entity as Session, Model as SessionModel};
pub use student::{Column as StudentColumn, Entity as Student, Model as StudentModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, UserType};
