//! User management handlers.
//!
//! The referenced role is validated inside the same transaction as the
//! write, for update as well as create. Users whose role has since been
//! deleted keep their dangling `role_id` and list with a null role name.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::api::dto::MessageResponse;
use crate::api::SharedState;
use crate::error::{AppError, Result};
use crate::models::UserWithRole;

/// Create user routes
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", put(update_user).delete(delete_user))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub username: Option<String>,
    pub role_id: Option<i32>,
    pub status: Option<bool>,
}

impl UserPayload {
    /// All three fields are required. `status` is checked for presence, not
    /// truthiness, so an explicit `false` is accepted.
    pub(crate) fn validate(self) -> Result<(String, i32, bool)> {
        match (
            self.username.filter(|s| !s.is_empty()),
            self.role_id,
            self.status,
        ) {
            (Some(username), Some(role_id), Some(status)) => Ok((username, role_id, status)),
            _ => Err(AppError::Validation(
                "Username, roleId, and status are required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub role_id: i32,
    pub status: bool,
}

/// List users with their role names
#[utoipa::path(
    get,
    path = "",
    context_path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "List of users with joined role names", body = [UserWithRole]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_users(State(state): State<SharedState>) -> Result<Json<Vec<UserWithRole>>> {
    let users: Vec<UserWithRole> = sqlx::query_as(
        r#"
        SELECT u.id, u.username, u.status, r.role_name AS role
        FROM users u
        LEFT JOIN roles r ON u.role_id = r.id
        ORDER BY u.id
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(users))
}

/// Create a user
#[utoipa::path(
    post,
    path = "",
    context_path = "/users",
    tag = "users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Missing fields or invalid roleId"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_user(
    State(state): State<SharedState>,
    Json(payload): Json<UserPayload>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let (username, role_id, status) = payload.validate()?;

    let mut tx = state.db.begin().await?;

    ensure_role_exists(&mut tx, role_id).await?;

    let id: i32 = sqlx::query_scalar(
        "INSERT INTO users (username, role_id, status) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&username)
    .bind(role_id)
    .bind(status)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id,
            username,
            role_id,
            status,
        }),
    ))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/{id}",
    context_path = "/users",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 400, description = "Missing fields or invalid roleId"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_user(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<UserResponse>> {
    let (username, role_id, status) = payload.validate()?;

    let mut tx = state.db.begin().await?;

    ensure_role_exists(&mut tx, role_id).await?;

    sqlx::query("UPDATE users SET username = $1, role_id = $2, status = $3 WHERE id = $4")
        .bind(&username)
        .bind(role_id)
        .bind(status)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Json(UserResponse {
        id,
        username,
        role_id,
        status,
    }))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    context_path = "/users",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = MessageResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_user(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>> {
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Reject writes that point at a role id with no backing row.
async fn ensure_role_exists(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    role_id: i32,
) -> Result<()> {
    let exists: Option<i32> = sqlx::query_scalar("SELECT id FROM roles WHERE id = $1")
        .bind(role_id)
        .fetch_optional(&mut **tx)
        .await?;

    if exists.is_none() {
        return Err(AppError::Validation("Invalid roleId".to_string()));
    }

    Ok(())
}

#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, update_user, delete_user),
    components(schemas(UserWithRole, UserPayload, UserResponse, MessageResponse))
)]
pub struct UsersApiDoc;
