//! Role management handlers.
//!
//! Role writes touch both the `roles` row and its `role_permissions` join
//! rows; every multi-statement operation runs in a single transaction so a
//! failed join insert can never leave an orphaned or half-updated role.

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
use crate::models::RoleWithPermissions;

/// Create role routes
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/:id", put(update_role).delete(delete_role))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RolePayload {
    pub role_name: Option<String>,
    pub permission_ids: Option<Vec<i32>>,
}

impl RolePayload {
    /// A non-empty name and a permission-id array (possibly empty) are required.
    pub(crate) fn validate(self) -> Result<(String, Vec<i32>)> {
        match (
            self.role_name.filter(|s| !s.is_empty()),
            self.permission_ids,
        ) {
            (Some(name), Some(ids)) => Ok((name, ids)),
            _ => Err(AppError::Validation(
                "Role name and permission IDs are required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRoleResponse {
    pub role_id: i32,
    pub role_name: String,
    pub permission_ids: Vec<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedRoleResponse {
    pub id: i32,
    pub role_name: String,
    pub permission_ids: Vec<i32>,
}

/// List roles with their aggregated permission names
#[utoipa::path(
    get,
    path = "",
    context_path = "/roles",
    tag = "roles",
    responses(
        (status = 200, description = "List of roles with comma-joined permission names", body = [RoleWithPermissions]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_roles(
    State(state): State<SharedState>,
) -> Result<Json<Vec<RoleWithPermissions>>> {
    let roles: Vec<RoleWithPermissions> = sqlx::query_as(
        r#"
        SELECT r.id, r.role_name,
               string_agg(p.permission_name, ',' ORDER BY p.id) AS permissions
        FROM roles r
        LEFT JOIN role_permissions rp ON r.id = rp.role_id
        LEFT JOIN permissions p ON rp.permission_id = p.id
        GROUP BY r.id, r.role_name
        ORDER BY r.id
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(roles))
}

/// Create a role and assign its permission set
#[utoipa::path(
    post,
    path = "",
    context_path = "/roles",
    tag = "roles",
    request_body = RolePayload,
    responses(
        (status = 201, description = "Role created successfully", body = CreatedRoleResponse),
        (status = 400, description = "Missing role name or permission IDs"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_role(
    State(state): State<SharedState>,
    Json(payload): Json<RolePayload>,
) -> Result<(StatusCode, Json<CreatedRoleResponse>)> {
    let (role_name, permission_ids) = payload.validate()?;

    let mut tx = state.db.begin().await?;

    let role_id: i32 = sqlx::query_scalar("INSERT INTO roles (role_name) VALUES ($1) RETURNING id")
        .bind(&role_name)
        .fetch_one(&mut *tx)
        .await?;

    insert_role_permissions(&mut tx, role_id, &permission_ids).await?;

    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedRoleResponse {
            role_id,
            role_name,
            permission_ids,
        }),
    ))
}

/// Update a role's name and replace its permission set
#[utoipa::path(
    put,
    path = "/{id}",
    context_path = "/roles",
    tag = "roles",
    params(
        ("id" = i32, Path, description = "Role ID")
    ),
    request_body = RolePayload,
    responses(
        (status = 200, description = "Role updated successfully", body = UpdatedRoleResponse),
        (status = 400, description = "Missing role name or permission IDs"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_role(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    Json(payload): Json<RolePayload>,
) -> Result<Json<UpdatedRoleResponse>> {
    let (role_name, permission_ids) = payload.validate()?;

    let mut tx = state.db.begin().await?;

    sqlx::query("UPDATE roles SET role_name = $1 WHERE id = $2")
        .bind(&role_name)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    insert_role_permissions(&mut tx, id, &permission_ids).await?;

    tx.commit().await?;

    Ok(Json(UpdatedRoleResponse {
        id,
        role_name,
        permission_ids,
    }))
}

/// Delete a role and its permission assignments
#[utoipa::path(
    delete,
    path = "/{id}",
    context_path = "/roles",
    tag = "roles",
    params(
        ("id" = i32, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Role deleted successfully", body = MessageResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_role(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>> {
    let mut tx = state.db.begin().await?;

    sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM roles WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Json(MessageResponse::new("Role deleted successfully")))
}

/// Bulk-insert the join rows for a role's permission set.
async fn insert_role_permissions(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    role_id: i32,
    permission_ids: &[i32],
) -> Result<()> {
    if permission_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO role_permissions (role_id, permission_id)
        SELECT $1::int4, pid FROM UNNEST($2::int4[]) AS pid
        "#,
    )
    .bind(role_id)
    .bind(permission_ids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[derive(OpenApi)]
#[openapi(
    paths(list_roles, create_role, update_role, delete_role),
    components(schemas(RoleWithPermissions, RolePayload, CreatedRoleResponse, UpdatedRoleResponse, MessageResponse))
)]
pub struct RolesApiDoc;
