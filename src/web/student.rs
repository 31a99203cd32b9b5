//! Routes for logged-in users. Feedback and booking need a student profile.

use crate::{
    core::{
        booking::{self, BookingRequest},
        feedback::{self, FeedbackForm},
        report::{self, StudentProfile},
    },
    entities::{feedback as feedback_entity, room_booking},
    errors::Result,
    web::{
        AppState,
        auth::{CurrentStudent, CurrentUser},
        public::{Notice, UserView},
    },
};
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

/// Response to [`index`].
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    /// Name shown in the greeting
    pub username: String,
    /// The signed-in account
    pub user: UserView,
}

/// `GET /index`: the home page for any signed-in account.
pub async fn index(current: CurrentUser) -> Json<IndexResponse> {
    Json(IndexResponse {
        username: current.user.username.clone(),
        user: UserView::from(&current.user),
    })
}

/// Payload of a [`submit_feedback`] response.
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    /// The stored entry
    pub feedback: feedback_entity::Model,
}

/// `POST /feedback`: stores feedback from the caller's profile.
pub async fn submit_feedback(
    current: CurrentStudent,
    State(state): State<AppState>,
    Json(form): Json<FeedbackForm>,
) -> Result<(StatusCode, Json<Notice<FeedbackResponse>>)> {
    let feedback = feedback::submit_feedback(&state.db, current.user.id, current.student.id, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(Notice {
            message: "Feedback submitted successfully!",
            data: FeedbackResponse { feedback },
        }),
    ))
}

/// Payload of a [`book_room`] response.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    /// The new pending booking
    pub booking: room_booking::Model,
}

/// `POST /book`: submits a pending booking for the caller.
pub async fn book_room(
    current: CurrentStudent,
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Notice<BookingResponse>>)> {
    let booking = booking::submit_booking(&state.db, current.student.id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(Notice {
            message: "Your booking request has been submitted!",
            data: BookingResponse { booking },
        }),
    ))
}

/// `GET /profile`: the caller's profile page: record, room, bookings and messages.
pub async fn profile(current: CurrentUser, State(state): State<AppState>) -> Result<Json<StudentProfile>> {
    Ok(Json(report::student_profile(&state.db, current.user.id).await?))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::entities::RoomType;
    use crate::test_utils::*;
    use crate::web::test_support::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    fn booking_form(room_type: &str) -> serde_json::Value {
        json!({
            "phone": "0733000111",
            "room_type": room_type,
            "check_in_date": "2024-09-01",
            "duration_of_stay": "one_semester",
            "special_requests": "Ground floor please",
        })
    }

    #[tokio::test]
    async fn test_student_routes_require_token() {
        let (app, _db) = test_app().await;

        let (status, _) = send(&app, Method::GET, "/profile", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, Method::POST, "/book", Some("bogus"), Some(booking_form("single"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_book_without_profile_redirects_to_signup() {
        let (app, db) = test_app().await;
        create_test_user(&db, "staff").await.unwrap();
        let token = login(&app, "staff", "admin").await;

        let (status, body) = send(&app, Method::POST, "/book", Some(&token), Some(booking_form("single"))).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert!(body["error"].is_string());

        let (status, _) = send(
            &app,
            Method::POST,
            "/feedback",
            Some(&token),
            Some(json!({"name": "Staff", "email": "staff@example.com", "message": "hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        let (status, body) = send(&app, Method::GET, "/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["student"].is_null());
    }

    #[tokio::test]
    async fn test_book_then_profile() {
        let (app, db) = test_app().await;
        create_test_room(&db, "B-1", RoomType::Twin, 2).await.unwrap();
        create_test_student(&db, "bea", "S60").await.unwrap();
        let token = login(&app, "bea", "student").await;

        let (status, body) = send(&app, Method::POST, "/book", Some(&token), Some(booking_form("twin"))).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["message"], "Your booking request has been submitted!");
        assert_eq!(body["booking"]["status"], "pending");
        assert_eq!(body["booking"]["room_type"], "twin");

        let (status, body) = send(&app, Method::GET, "/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["student"]["student_id"], "S60");
        assert_eq!(body["bookings"].as_array().unwrap().len(), 1);
        assert!(body["room"].is_null());
    }

    #[tokio::test]
    async fn test_book_rejects_unknown_room_type() {
        let (app, db) = test_app().await;
        create_test_student(&db, "ian", "S61").await.unwrap();
        let token = login(&app, "ian", "student").await;

        let (status, _) = send(&app, Method::POST, "/book", Some(&token), Some(booking_form("penthouse"))).await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_submit_feedback() {
        let (app, db) = test_app().await;
        create_test_student(&db, "fay", "S62").await.unwrap();
        let token = login(&app, "fay", "student").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/feedback",
            Some(&token),
            Some(json!({"name": "Fay", "email": "fay@example.com", "message": "Great wifi."})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["feedback"]["message"], "Great wifi.");

        let (status, _) = send(
            &app,
            Method::POST,
            "/feedback",
            Some(&token),
            Some(json!({"name": "Fay", "email": "fay@example.com", "message": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
