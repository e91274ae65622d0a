//! User models.

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// User row as returned by the list endpoint. `role` is the role name from a
/// LEFT JOIN and stays null for users whose role_id no longer resolves.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct UserWithRole {
    pub id: i32,
    pub username: String,
    pub status: bool,
    pub role: Option<String>,
}
