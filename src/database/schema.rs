use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;

const CREATE_SECRETS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS "secrets" (
    "id" UUID PRIMARY KEY,
    "title" TEXT NOT NULL,
    "secret" TEXT NOT NULL,
    "type" TEXT NOT NULL DEFAULT 'normal',
    "favorite" BOOLEAN NOT NULL DEFAULT FALSE,
    "user_id" UUID NOT NULL,
    "created_at" TIMESTAMPTZ NOT NULL DEFAULT now(),
    "updated_at" TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

// Every query is scoped by owner first, so this is the one index that matters.
const CREATE_OWNER_INDEX: &str =
    r#"CREATE INDEX IF NOT EXISTS "secrets_user_id_idx" ON "secrets" ("user_id")"#;

/// Idempotent schema setup, run once at startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query(CREATE_SECRETS_TABLE).execute(pool).await?;
    sqlx::query(CREATE_OWNER_INDEX).execute(pool).await?;
    info!("Database schema ready");
    Ok(())
}
