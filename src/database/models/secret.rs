use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::query::types::SecretType;

/// A stored secret. Rows never leave the owning user's scope; the `secret`
/// body is returned verbatim to its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    pub id: Uuid,
    pub title: String,
    pub secret: String,
    #[serde(rename = "type")]
    pub secret_type: SecretType,
    pub favorite: bool,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for inserting a secret.
#[derive(Debug, Clone)]
pub struct NewSecret {
    pub title: String,
    pub secret: String,
    pub secret_type: SecretType,
    pub favorite: bool,
}

/// Validated partial update. Absent fields keep their stored values; an
/// empty patch is legal and only bumps `updated_at`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecretPatch {
    pub title: Option<String>,
    pub secret: Option<String>,
    pub secret_type: Option<SecretType>,
    pub favorite: Option<bool>,
}

impl SecretPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.secret.is_none()
            && self.secret_type.is_none()
            && self.favorite.is_none()
    }
}

// The `type` column is plain lowercase text, so the enum is decoded by hand
// instead of deriving FromRow.
impl<'r> sqlx::FromRow<'r, PgRow> for Secret {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let type_raw: String = row.try_get("type")?;
        let secret_type = type_raw
            .parse::<SecretType>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "type".to_string(),
                source: Box::new(e),
            })?;
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            secret: row.try_get("secret")?,
            secret_type,
            favorite: row.try_get("favorite")?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
