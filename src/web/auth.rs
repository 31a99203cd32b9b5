//! Request extractors for the three access levels.
//!
//! * [`CurrentUser`]: any valid bearer token
//! * [`CurrentStudent`]: a logged-in account with a student profile
//! * [`AdminUser`]: a logged-in administrator

use crate::{
    core::{auth, student},
    entities::{UserType, student as student_entity, user},
    errors::Error,
    web::AppState,
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

/// Extracts the token from an `Authorization: Bearer <token>` header.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// The authenticated account behind a request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Account
    pub user: user::Model,
    /// Token the request was made with
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(Error::Unauthenticated)?;
        let user = auth::authenticate(&state.db, &token).await?;
        Ok(Self { user, token })
    }
}

/// A logged-in account that owns a student profile.
#[derive(Debug, Clone)]
pub struct CurrentStudent {
    /// Account
    pub user: user::Model,
    /// Profile
    pub student: student_entity::Model,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentStudent {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser { user, .. } = CurrentUser::from_request_parts(parts, state).await?;
        let student = student::get_student_for_user(&state.db, user.id)
            .await?
            .ok_or(Error::StudentProfileMissing)?;
        Ok(Self { user, student })
    }
}

/// A logged-in administrator.
#[derive(Debug, Clone)]
pub struct AdminUser(pub user::Model);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser { user, .. } = CurrentUser::from_request_parts(parts, state).await?;
        if user.user_type != UserType::Admin {
            return Err(Error::Forbidden);
        }
        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc123"));
    }
}
