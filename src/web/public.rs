//! Routes reachable without a student profile: account handling, the room
//! list and the contact form.

use crate::{
    core::{
        auth::{self, SignupForm},
        feedback::{self, InquiryForm},
        room,
    },
    entities::{UserType, contact_inquiry, room as room_entity, student, user},
    errors::{Error, Result},
    web::{AppState, auth::CurrentUser},
};
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Public view of an account; never includes the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    /// Account id
    pub id: i64,
    /// Login name
    pub username: String,
    /// Student or administrator
    pub user_type: UserType,
}

impl From<&user::Model> for UserView {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            user_type: user.user_type,
        }
    }
}

/// Response to a successful signup or login.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Bearer token for later requests
    pub token: String,
    /// The signed-in account
    pub user: UserView,
    /// Profile created at signup; omitted on login
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<student::Model>,
    /// Page the client should show next
    pub redirect: &'static str,
}

const fn landing_page(user_type: UserType) -> &'static str {
    match user_type {
        UserType::Admin => "/admin/dashboard",
        UserType::Student => "/index",
    }
}

/// Body of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Login name
    pub username: String,
    /// Plain-text password
    pub password: String,
    /// Role selected on the login form, matched case-insensitively
    pub user_type: String,
}

/// A flash-style message alongside the response payload.
#[derive(Debug, Serialize)]
pub struct Notice<T> {
    /// Confirmation shown to the user
    pub message: &'static str,
    /// Payload, flattened into the same object
    #[serde(flatten)]
    pub data: T,
}

/// `GET /health`: liveness check.
pub async fn health() -> &'static str {
    "OK"
}

/// `POST /signup`: registers a student account and logs it in.
pub async fn signup(
    State(state): State<AppState>,
    Json(form): Json<SignupForm>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let signup = auth::signup(&state.db, form).await?;
    let token = auth::open_session(&state.db, signup.user.id, state.settings.session_ttl_hours).await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token,
            redirect: landing_page(signup.user.user_type),
            user: UserView::from(&signup.user),
            student: signup.student,
        }),
    ))
}

/// `POST /login`: checks credentials and the selected role, then opens a
/// session.
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<Json<SessionResponse>> {
    let selected = UserType::parse_lenient(&form.user_type)
        .ok_or_else(|| Error::validation("Invalid form submission."))?;
    let (user, token) = auth::login(
        &state.db,
        &form.username,
        &form.password,
        selected,
        state.settings.session_ttl_hours,
    )
    .await?;

    Ok(Json(SessionResponse {
        token,
        redirect: landing_page(user.user_type),
        user: UserView::from(&user),
        student: None,
    }))
}

/// Response to [`logout`].
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    /// Confirmation shown to the user
    pub message: &'static str,
    /// Page the client should show next
    pub redirect: &'static str,
}

/// `POST /logout`: ends the caller's session.
pub async fn logout(current: CurrentUser, State(state): State<AppState>) -> Result<Json<LogoutResponse>> {
    auth::logout(&state.db, &current.token).await?;
    Ok(Json(LogoutResponse {
        message: "You have been logged out.",
        redirect: "/login",
    }))
}

/// `GET /rooms`: rooms that still have at least one free bed.
pub async fn available_rooms(State(state): State<AppState>) -> Result<Json<Vec<room_entity::Model>>> {
    Ok(Json(room::list_available_rooms(&state.db).await?))
}

/// Payload of a [`contact`] response.
#[derive(Debug, Serialize)]
pub struct InquiryResponse {
    /// The stored inquiry
    pub inquiry: contact_inquiry::Model,
}

/// `POST /contact`: stores a contact form inquiry. No account needed.
pub async fn contact(
    State(state): State<AppState>,
    Json(form): Json<InquiryForm>,
) -> Result<(StatusCode, Json<Notice<InquiryResponse>>)> {
    let inquiry = feedback::submit_inquiry(&state.db, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(Notice {
            message: "Your inquiry has been submitted successfully!",
            data: InquiryResponse { inquiry },
        }),
    ))
}
