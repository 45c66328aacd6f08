//! Initial DDL for the `customers` table.

use crate::error::AppError;
use crate::store::CUSTOMERS_TABLE;
use sqlx::PgPool;

/// Create the `customers` table if missing. Idempotent; safe to run on every start.
/// `created_at`/`last_updated` default to NOW() on insert; updates set `last_updated` explicitly.
pub async fn ensure_customers_table(pool: &PgPool) -> Result<(), AppError> {
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id SERIAL PRIMARY KEY,
            name VARCHAR(63) NOT NULL,
            address VARCHAR(256) NOT NULL,
            email VARCHAR(63) NOT NULL,
            phone_number VARCHAR(32) NOT NULL,
            member_since DATE NOT NULL DEFAULT CURRENT_DATE,
            status VARCHAR(32),
            created_at TIMESTAMP NOT NULL DEFAULT NOW(),
            last_updated TIMESTAMP NOT NULL DEFAULT NOW()
        )
        "#,
        CUSTOMERS_TABLE
    );
    sqlx::query(&ddl).execute(pool).await?;

    // Tables created before the suspend endpoint existed have no status column.
    let alter_status = format!(
        "ALTER TABLE {} ADD COLUMN IF NOT EXISTS status VARCHAR(32)",
        CUSTOMERS_TABLE
    );
    sqlx::query(&alter_status).execute(pool).await?;
    tracing::info!(table = CUSTOMERS_TABLE, "customers table ready");
    Ok(())
}
