//! Role models.

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Role row as returned by the list endpoint: the role's permission names
/// aggregated into one comma-joined string, null when the role has none.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct RoleWithPermissions {
    pub id: i32,
    pub role_name: String,
    pub permissions: Option<String>,
}
