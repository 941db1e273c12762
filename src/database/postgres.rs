use async_trait::async_trait;
use sqlx::postgres::PgArguments;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewSecret, Secret, SecretPatch};
use crate::database::repository::{SecretPage, SecretRepository};
use crate::query::{ListQuery, QueryParam};

const SECRET_COLUMNS: &str = "\"id\", \"title\", \"secret\", \"type\", \"favorite\", \"user_id\", \"created_at\", \"updated_at\"";

/// Postgres-backed secret storage.
pub struct PgSecretRepository {
    pool: PgPool,
}

impl PgSecretRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SecretRepository for PgSecretRepository {
    async fn list(&self, query: &ListQuery) -> Result<SecretPage, DatabaseError> {
        let (select_sql, select_params) = query.select_sql();
        let (count_sql, count_params) = query.count_sql();

        // Page rows and total count run concurrently on the pool.
        let rows_fut = async {
            let mut q = sqlx::query_as::<_, Secret>(&select_sql);
            for p in select_params.iter() {
                q = bind_param_query_as(q, p);
            }
            q.fetch_all(&self.pool).await
        };
        let count_fut = async {
            let mut q = sqlx::query(&count_sql);
            for p in count_params.iter() {
                q = bind_param_query(q, p);
            }
            let row = q.fetch_one(&self.pool).await?;
            row.try_get::<i64, _>("count")
        };

        let (rows, total) = tokio::try_join!(rows_fut, count_fut)?;
        Ok(SecretPage { rows, total })
    }

    async fn insert(&self, user_id: Uuid, new: NewSecret) -> Result<Secret, DatabaseError> {
        let sql = format!(
            "INSERT INTO \"secrets\" (\"id\", \"title\", \"secret\", \"type\", \"favorite\", \"user_id\") \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {SECRET_COLUMNS}"
        );
        let secret = sqlx::query_as::<_, Secret>(&sql)
            .bind(Uuid::new_v4())
            .bind(new.title)
            .bind(new.secret)
            .bind(new.secret_type.as_str())
            .bind(new.favorite)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(secret)
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: SecretPatch,
    ) -> Result<Secret, DatabaseError> {
        // COALESCE keeps stored values for absent fields; `updated_at` always
        // moves, even for an empty patch.
        let sql = format!(
            "UPDATE \"secrets\" SET \
                 \"title\" = COALESCE($3, \"title\"), \
                 \"secret\" = COALESCE($4, \"secret\"), \
                 \"type\" = COALESCE($5, \"type\"), \
                 \"favorite\" = COALESCE($6, \"favorite\"), \
                 \"updated_at\" = now() \
             WHERE \"id\" = $1 AND \"user_id\" = $2 RETURNING {SECRET_COLUMNS}"
        );
        sqlx::query_as::<_, Secret>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(patch.title)
            .bind(patch.secret)
            .bind(patch.secret_type.map(|t| t.as_str().to_string()))
            .bind(patch.favorite)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatabaseError::NotFound)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM \"secrets\" WHERE \"id\" = $1 AND \"user_id\" = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    p: &QueryParam,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match p {
        QueryParam::Uuid(v) => q.bind(*v),
        QueryParam::Text(v) => q.bind(v.clone()),
        QueryParam::Bool(v) => q.bind(*v),
    }
}

fn bind_param_query_as<'q>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, Secret, PgArguments>,
    p: &QueryParam,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, Secret, PgArguments> {
    match p {
        QueryParam::Uuid(v) => q.bind(*v),
        QueryParam::Text(v) => q.bind(v.clone()),
        QueryParam::Bool(v) => q.bind(*v),
    }
}
