use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::Row;
use uuid::Uuid;

use crate::{domain::user::User, error::ApiError, security::password, state::AppState};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/signup", post(signup))
}

#[derive(Deserialize)]
struct LoginPayload {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<Value>, ApiError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required.".into(),
        ));
    }

    let row = sqlx::query(
        "SELECT id, fullname, email, username, password_hash, created_at
         FROM users WHERE username = $1",
    )
    .bind(&payload.username)
    .fetch_optional(&state.db)
    .await
    .map_err(ApiError::internal)?;

    let row = row.ok_or(ApiError::Unauthorized)?;
    let stored_hash: String = row.get("password_hash");
    let valid =
        password::verify_password(&payload.password, &stored_hash).map_err(ApiError::internal)?;
    if !valid {
        return Err(ApiError::Unauthorized);
    }

    let user = User {
        id: row.get("id"),
        fullname: row.get("fullname"),
        email: row.get("email"),
        username: row.get("username"),
        password_hash: stored_hash,
        created_at: row.get("created_at"),
    };

    Ok(Json(json!({ "message": "Login successful!", "user": user })))
}

#[derive(Deserialize)]
struct SignupPayload {
    #[serde(rename = "fullName", default)]
    full_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupPayload>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if payload.full_name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.username.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(ApiError::BadRequest("All fields are required.".into()));
    }

    let hash = password::hash_password(&payload.password).map_err(ApiError::internal)?;

    let res = sqlx::query(
        "INSERT INTO users (id, fullname, email, username, password_hash, created_at)
         VALUES ($1, $2, $3, $4, $5, now())",
    )
    .bind(Uuid::new_v4())
    .bind(payload.full_name.trim())
    .bind(payload.email.trim())
    .bind(payload.username.trim())
    .bind(&hash)
    .execute(&state.db)
    .await;

    if let Err(err) = res {
        return Err(map_db_error(err));
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User successfully created!" })),
    ))
}

fn map_db_error(err: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.constraint().is_some() {
            return ApiError::Conflict("Username or email already exists.".into());
        }
    }
    ApiError::internal(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_constraint_db_errors_become_internal() {
        let err = map_db_error(sqlx::Error::PoolClosed);
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn signup_payload_accepts_the_wire_field_names() {
        let payload: SignupPayload = serde_json::from_str(
            r#"{"fullName":"Ada Lovelace","email":"ada@example.com",
                "username":"ada","password":"pw"}"#,
        )
        .expect("payload should deserialize");
        assert_eq!(payload.full_name, "Ada Lovelace");
        assert_eq!(payload.username, "ada");
    }

    #[test]
    fn missing_signup_fields_default_to_empty() {
        let payload: SignupPayload =
            serde_json::from_str(r#"{"username":"ada"}"#).expect("payload should deserialize");
        assert!(payload.full_name.is_empty());
        assert!(payload.password.is_empty());
    }
}
