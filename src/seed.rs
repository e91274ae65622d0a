//! Startup reconciliation of the default permission set.

use crate::error::Result;
use sqlx::PgPool;

/// The four permissions every deployment starts with.
pub const DEFAULT_PERMISSIONS: [(&str, &str); 4] = [
    ("Create", "Allows creating new records"),
    ("Read", "Allows reading/viewing records"),
    ("Update", "Allows updating existing records"),
    ("Delete", "Allows deleting records"),
];

/// Insert any missing default permissions, by name, in one transaction.
///
/// Idempotent: `permission_name` carries a UNIQUE constraint, so concurrent
/// startups cannot double-insert.
pub async fn seed_default_permissions(pool: &PgPool) -> Result<()> {
    let mut tx = pool.begin().await?;

    for (name, description) in DEFAULT_PERMISSIONS {
        let result = sqlx::query(
            r#"
            INSERT INTO permissions (permission_name, description)
            VALUES ($1, $2)
            ON CONFLICT (permission_name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(description)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!("Default permission '{}' added", name);
        }
    }

    tx.commit().await?;
    Ok(())
}
