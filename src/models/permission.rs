//! Permission model.

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Permission entity
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct Permission {
    pub id: i32,
    pub permission_name: String,
    pub description: String,
}
