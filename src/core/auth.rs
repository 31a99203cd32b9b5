//! Accounts, passwords and login sessions.
//!
//! Passwords are stored as argon2 PHC strings. Session tokens are random
//! UUIDs handed to the client once; only their SHA-256 digest is kept in the
//! `sessions` table.

use crate::{
    core::{
        student::{self, NewStudent},
        validation,
    },
    entities::{Session, User, UserType, session, student as student_entity, user},
    errors::{Error, Result},
};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use chrono::{Duration, Utc};
use sea_orm::{Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

/// Fields of the signup form.
///
/// Only student accounts can be registered here; administrators are created
/// by [`create_admin_account`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupForm {
    /// Login name
    pub username: String,
    /// Chosen password
    #[validate(must_match(other = "password_confirmation", message = "The two password fields didn't match."))]
    pub password: String,
    /// Repeat of `password`
    pub password_confirmation: String,
    /// Requested account kind
    pub user_type: UserType,
    /// Full name
    pub name: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Institutional ID
    pub student_id: Option<String>,
    /// Contact phone, required for students
    pub phone: Option<String>,
}

/// Result of a successful signup.
#[derive(Debug, Clone)]
pub struct Signup {
    /// The new account
    pub user: user::Model,
    /// Profile created alongside a student account
    pub student: Option<student_entity::Model>,
}

#[derive(Debug, Validate)]
struct Credentials {
    #[validate(length(min = 1, max = 150, message = "Username is required (at most 150 characters)."))]
    username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    password: String,
}

fn sha256_hex(input: &[u8]) -> String {
    format!("{:x}", Sha256::digest(input))
}

/// Hashes `password` into an argon2 PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())?;
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Checks `password` against a value produced by [`hash_password`].
///
/// Unparseable stored hashes never verify.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Finds an account by username.
pub async fn get_user_by_username<C>(db: &C, username: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::Username.eq(username.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn create_user<C>(
    db: &C,
    username: &str,
    password: &str,
    user_type: UserType,
) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    let username = username.trim();
    Credentials {
        username: username.to_string(),
        password: password.to_string(),
    }
    .validate()?;
    if get_user_by_username(db, username).await?.is_some() {
        return Err(Error::Duplicate {
            field: "username",
            value: username.to_string(),
        });
    }

    let model = user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(hash_password(password)?),
        user_type: Set(user_type),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    model
        .insert(db)
        .await
        .map_err(|e| Error::on_unique_violation(e, "username", username))
}

/// Registers a student account and profile.
///
/// Both rows are written in one transaction; a rejected profile leaves no
/// orphan account behind. Requests for any other account kind are refused.
pub async fn signup(db: &DatabaseConnection, form: SignupForm) -> Result<Signup> {
    form.validate()?;
    if form.user_type != UserType::Student {
        warn!(username = %form.username.trim(), "Signup for a non-student account refused");
        return Err(Error::validation("Only student accounts can be registered."));
    }

    let mut phone = form.phone;
    validation::trim_optional(&mut phone);
    if phone.is_none() {
        return Err(Error::validation("Phone number is required."));
    }
    let profile = NewStudent {
        name: form.name.unwrap_or_default(),
        email: form.email.unwrap_or_default(),
        student_id: form.student_id.unwrap_or_default(),
        phone,
    };

    let txn = db.begin().await?;
    let user = create_user(&txn, &form.username, &form.password, UserType::Student).await?;
    let student = student::create_student(&txn, user.id, profile).await?;
    txn.commit().await?;

    info!(username = %user.username, "Student account registered");
    Ok(Signup {
        user,
        student: Some(student),
    })
}

/// Creates an administrator account without a student profile.
pub async fn create_admin_account(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<user::Model> {
    let admin = create_user(db, username, password, UserType::Admin).await?;
    info!(username = %admin.username, "Administrator account created");
    Ok(admin)
}

/// Opens a session for `user_id` and returns the bearer token.
pub async fn open_session<C>(db: &C, user_id: i64, ttl_hours: i64) -> Result<String>
where
    C: ConnectionTrait,
{
    let token = format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    );
    let now = Utc::now();
    let model = session::ActiveModel {
        token_hash: Set(sha256_hex(token.as_bytes())),
        user_id: Set(user_id),
        created_at: Set(now),
        expires_at: Set(now + Duration::hours(ttl_hours)),
        ..Default::default()
    };
    model.insert(db).await?;
    debug!(user_id, "Session opened");
    Ok(token)
}

/// Checks credentials and the selected role, then opens a session.
///
/// The role is compared only once the password has been verified.
pub async fn login(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    selected: UserType,
    ttl_hours: i64,
) -> Result<(user::Model, String)> {
    let Some(user) = get_user_by_username(db, username).await? else {
        warn!(username, "Login for unknown user");
        return Err(Error::InvalidCredentials);
    };
    if !verify_password(password, &user.password_hash) {
        warn!(username, "Login with wrong password");
        return Err(Error::InvalidCredentials);
    }
    if user.user_type != selected {
        return Err(Error::RoleMismatch);
    }

    let token = open_session(db, user.id, ttl_hours).await?;
    info!(username = %user.username, "Logged in");
    Ok((user, token))
}

async fn find_session(db: &DatabaseConnection, token: &str) -> Result<Option<session::Model>> {
    Session::find()
        .filter(session::Column::TokenHash.eq(sha256_hex(token.as_bytes())))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Resolves a bearer token to its account. Expired sessions are removed.
pub async fn authenticate(db: &DatabaseConnection, token: &str) -> Result<user::Model> {
    let session = find_session(db, token)
        .await?
        .ok_or(Error::Unauthenticated)?;

    if session.expires_at <= Utc::now() {
        debug!(user_id = session.user_id, "Session expired");
        session.delete(db).await?;
        return Err(Error::Unauthenticated);
    }

    User::find_by_id(session.user_id)
        .one(db)
        .await?
        .ok_or(Error::Unauthenticated)
}

/// Ends the session identified by `token`. Unknown tokens are ignored.
pub async fn logout(db: &DatabaseConnection, token: &str) -> Result<()> {
    if let Some(session) = find_session(db, token).await? {
        let user_id = session.user_id;
        session.delete(db).await?;
        info!(user_id, "Logged out");
    }
    Ok(())
}

/// Creates the administrator account if no account with that name exists.
///
/// Returns `true` when an account was created.
pub async fn ensure_admin_account(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<bool> {
    if get_user_by_username(db, username).await?.is_some() {
        return Ok(false);
    }
    create_admin_account(db, username, password).await?;
    Ok(true)
}
