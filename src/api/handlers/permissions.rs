//! Permission management handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::api::dto::MessageResponse;
use crate::api::SharedState;
use crate::error::{AppError, Result};
use crate::models::Permission;

/// Create permission routes
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(list_permissions).post(create_permission))
        .route("/:id", get(get_permission).put(update_permission).delete(delete_permission))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionPayload {
    pub permission_name: Option<String>,
    pub description: Option<String>,
}

impl PermissionPayload {
    /// Both fields are required and must be non-empty.
    pub(crate) fn validate(self) -> Result<(String, String)> {
        match (
            self.permission_name.filter(|s| !s.is_empty()),
            self.description.filter(|s| !s.is_empty()),
        ) {
            (Some(name), Some(description)) => Ok((name, description)),
            _ => Err(AppError::Validation(
                "Permission name and description are required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedPermissionResponse {
    pub permission: Permission,
}

/// List all permissions
#[utoipa::path(
    get,
    path = "",
    context_path = "/permissions",
    tag = "permissions",
    responses(
        (status = 200, description = "List of permissions", body = [Permission]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_permissions(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Permission>>> {
    let permissions: Vec<Permission> =
        sqlx::query_as("SELECT id, permission_name, description FROM permissions ORDER BY id")
            .fetch_all(&state.db)
            .await?;

    Ok(Json(permissions))
}

/// Get a permission by ID
#[utoipa::path(
    get,
    path = "/{id}",
    context_path = "/permissions",
    tag = "permissions",
    params(
        ("id" = i32, Path, description = "Permission ID")
    ),
    responses(
        (status = 200, description = "Permission details", body = Permission),
        (status = 404, description = "Permission not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_permission(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> Result<Json<Permission>> {
    let permission: Permission =
        sqlx::query_as("SELECT id, permission_name, description FROM permissions WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Permission not found".to_string()))?;

    Ok(Json(permission))
}

/// Create a permission
#[utoipa::path(
    post,
    path = "",
    context_path = "/permissions",
    tag = "permissions",
    request_body = PermissionPayload,
    responses(
        (status = 201, description = "Permission created successfully", body = CreatedPermissionResponse),
        (status = 400, description = "Missing name or description"),
        (status = 409, description = "Permission name already exists"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_permission(
    State(state): State<SharedState>,
    Json(payload): Json<PermissionPayload>,
) -> Result<(StatusCode, Json<CreatedPermissionResponse>)> {
    let (name, description) = payload.validate()?;

    let permission: Permission = sqlx::query_as(
        r#"
        INSERT INTO permissions (permission_name, description)
        VALUES ($1, $2)
        RETURNING id, permission_name, description
        "#,
    )
    .bind(&name)
    .bind(&description)
    .fetch_one(&state.db)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("Permission already exists".to_string())
        }
        _ => e.into(),
    })?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedPermissionResponse { permission }),
    ))
}

/// Update a permission
#[utoipa::path(
    put,
    path = "/{id}",
    context_path = "/permissions",
    tag = "permissions",
    params(
        ("id" = i32, Path, description = "Permission ID")
    ),
    request_body = PermissionPayload,
    responses(
        (status = 200, description = "Permission updated successfully", body = Permission),
        (status = 400, description = "Missing name or description"),
        (status = 404, description = "Permission not found"),
        (status = 409, description = "Permission name already exists"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_permission(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    Json(payload): Json<PermissionPayload>,
) -> Result<Json<Permission>> {
    let (name, description) = payload.validate()?;

    let permission: Permission = sqlx::query_as(
        r#"
        UPDATE permissions
        SET permission_name = $2, description = $3
        WHERE id = $1
        RETURNING id, permission_name, description
        "#,
    )
    .bind(id)
    .bind(&name)
    .bind(&description)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("Permission already exists".to_string())
        }
        _ => e.into(),
    })?
    .ok_or_else(|| AppError::NotFound("Permission not found".to_string()))?;

    Ok(Json(permission))
}

/// Delete a permission
#[utoipa::path(
    delete,
    path = "/{id}",
    context_path = "/permissions",
    tag = "permissions",
    params(
        ("id" = i32, Path, description = "Permission ID")
    ),
    responses(
        (status = 200, description = "Permission deleted successfully", body = MessageResponse),
        (status = 404, description = "Permission not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_permission(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>> {
    let result = sqlx::query("DELETE FROM permissions WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Permission not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Permission deleted successfully")))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list_permissions,
        get_permission,
        create_permission,
        update_permission,
        delete_permission,
    ),
    components(schemas(Permission, PermissionPayload, CreatedPermissionResponse, MessageResponse))
)]
pub struct PermissionsApiDoc;
