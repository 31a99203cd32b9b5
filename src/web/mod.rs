//! JSON HTTP interface over [`crate::core`].
//!
//! Handlers are thin: they pick the access level through an extractor from
//! [`auth`], call into `core`, and serialise the result. Errors are turned
//! into responses by the `IntoResponse` impl in [`error`].

pub mod admin;
pub mod auth;
pub mod error;
pub mod public;
pub mod student;

use crate::{config::settings::AppSettings, errors::Result};
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub settings: Arc<AppSettings>,
}

impl AppState {
    #[must_use]
    pub fn new(db: DatabaseConnection, settings: AppSettings) -> Self {
        Self {
            db,
            settings: Arc::new(settings),
        }
    }
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/rooms", get(admin::list_rooms).post(admin::create_room))
        .route("/rooms/:id", put(admin::update_room).delete(admin::delete_room))
        .route("/students", get(admin::list_students).post(admin::add_student))
        .route("/students/:id", put(admin::update_student))
        .route("/rent", get(admin::rent_overview))
        .route("/rent/:id", put(admin::update_rent))
        .route("/feedback", get(admin::list_feedback))
        .route("/feedback/:id", delete(admin::delete_feedback))
        .route("/bookings", get(admin::list_bookings))
        .route("/bookings/assign", post(admin::assign_bookings))
        .route("/bookings/:id/room", post(admin::assign_booking_room))
        .route("/messages", get(admin::list_messages))
        .route("/inquiries", get(admin::list_inquiries))
        .route("/reminders", post(admin::send_reminders))
}

/// Builds the application router.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(public::health))
        .route("/signup", post(public::signup))
        .route("/login", post(public::login))
        .route("/logout", post(public::logout))
        .route("/rooms", get(public::available_rooms))
        .route("/contact", post(public::contact))
        .route("/index", get(student::index))
        .route("/feedback", post(student::submit_feedback))
        .route("/book", post(student::book_room))
        .route("/profile", get(student::profile))
        .nest("/admin", admin_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the API on the configured bind address until Ctrl+C.
pub async fn serve(state: AppState) -> Result<()> {
    let addr = state.settings.bind_address;
    let app = create_app(state);

    info!("Starting hostel API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{TEST_PASSWORD, setup_test_db};
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    pub async fn test_app() -> (Router, DatabaseConnection) {
        let db = setup_test_db().await.unwrap();
        let app = create_app(AppState::new(db.clone(), AppSettings::default()));
        (app, db)
    }

    /// Sends one request and decodes the JSON body (`Null` when empty or not JSON).
    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// Logs `username` in with the test password and returns the token.
    pub async fn login(app: &Router, username: &str, user_type: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/login",
            None,
            Some(json!({
                "username": username,
                "password": TEST_PASSWORD,
                "user_type": user_type,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::test_support::*;
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_health_check() {
        let (app, _db) = test_app().await;
        let (status, _) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (app, _db) = test_app().await;
        let (status, _) = send(&app, Method::GET, "/nowhere", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
