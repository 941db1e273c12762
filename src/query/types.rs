use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default page size for secret listings.
pub const DEFAULT_PER_PAGE: i64 = 6;

/// Difficulty/type tag carried by every secret. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretType {
    Normal,
    Medio,
    Hard,
}

impl SecretType {
    pub const ALL: [SecretType; 3] = [SecretType::Normal, SecretType::Medio, SecretType::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            SecretType::Normal => "normal",
            SecretType::Medio => "medio",
            SecretType::Hard => "hard",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown secret type: {0}")]
pub struct UnknownSecretType(pub String);

impl std::str::FromStr for SecretType {
    type Err = UnknownSecretType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(SecretType::Normal),
            "medio" => Ok(SecretType::Medio),
            "hard" => Ok(SecretType::Hard),
            other => Err(UnknownSecretType(other.to_string())),
        }
    }
}

impl std::fmt::Display for SecretType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type filter selection: everything, or exactly one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(SecretType),
}

impl TypeFilter {
    /// Wire representation, as sent in the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Only(t) => t.as_str(),
        }
    }
}

/// Sort keys accepted by the listing endpoint. Wire names match the JSON
/// field names of the secret itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "updatedAt")]
    UpdatedAt,
    #[serde(rename = "title")]
    Title,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "createdAt" => Some(SortKey::CreatedAt),
            "updatedAt" => Some(SortKey::UpdatedAt),
            "title" => Some(SortKey::Title),
            _ => None,
        }
    }

    /// Wire name of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::CreatedAt => "createdAt",
            SortKey::UpdatedAt => "updatedAt",
            SortKey::Title => "title",
        }
    }

    /// Database column backing the key.
    pub fn column(&self) -> &'static str {
        match self {
            SortKey::CreatedAt => "created_at",
            SortKey::UpdatedAt => "updated_at",
            SortKey::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// The current search/type/favorite/sort selection for a secrets listing.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub search: String,
    pub type_filter: TypeFilter,
    pub favorite: Option<bool>,
    pub order_by: SortKey,
    pub order: SortOrder,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            type_filter: TypeFilter::All,
            favorite: None,
            order_by: SortKey::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

/// Pagination metadata for a filtered result set. `total` counts every row
/// matching the filters, not just the returned page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };
        Self {
            total,
            page,
            per_page,
            total_pages,
        }
    }
}

impl Default for PaginationMeta {
    fn default() -> Self {
        Self {
            total: 0,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            total_pages: 0,
        }
    }
}
