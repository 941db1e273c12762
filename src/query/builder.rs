use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Secret;
use crate::query::error::QueryError;
use crate::query::types::{FilterState, SecretType, SortKey, SortOrder, TypeFilter};

/// Raw, untrusted listing parameters as they arrive in the query string.
/// Everything is optional and stringly typed; `ListQuery::parse` turns this
/// into a validated plan.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub secret_type: Option<String>,
    pub favorite: Option<String>,
    pub order_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// A positional bind parameter for generated SQL, in `$1..$n` order.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    Uuid(Uuid),
    Text(String),
    Bool(bool),
}

/// A validated, ownership-scoped plan for listing one user's secrets.
///
/// The same plan drives both execution paths: `select_sql`/`count_sql`
/// produce parameterized Postgres statements, while `matches`/`compare`
/// evaluate the identical semantics over in-memory rows.
#[derive(Debug, Clone)]
pub struct ListQuery {
    user_id: Uuid,
    filters: FilterState,
    page: i64,
    per_page: i64,
}

impl ListQuery {
    /// Validate raw parameters into a query plan.
    ///
    /// Absent parameters fall back to their defaults (`type=all`, no
    /// favorite filter, `orderBy=createdAt`, `order=desc`, `page=1`).
    /// Unrecognized values are collected into per-field errors rather than
    /// failing on the first one. `perPage` above `max_per_page` is capped,
    /// not rejected.
    pub fn parse(
        user_id: Uuid,
        params: &ListParams,
        default_per_page: i64,
        max_per_page: i64,
    ) -> Result<Self, QueryError> {
        let mut field_errors: HashMap<String, String> = HashMap::new();

        let search = params.search.clone().unwrap_or_default();

        let type_filter = match params.secret_type.as_deref() {
            None | Some("all") => TypeFilter::All,
            Some(raw) => match raw.parse::<SecretType>() {
                Ok(t) => TypeFilter::Only(t),
                Err(_) => {
                    field_errors.insert(
                        "type".to_string(),
                        format!("must be one of: all, normal, medio, hard (got '{raw}')"),
                    );
                    TypeFilter::All
                }
            },
        };

        // Absent or empty favorite means "no filter"; the empty string is how
        // a cleared favorite selection is encoded on the wire.
        let favorite = match params.favorite.as_deref() {
            None | Some("") => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(raw) => {
                field_errors.insert(
                    "favorite".to_string(),
                    format!("must be 'true', 'false' or empty (got '{raw}')"),
                );
                None
            }
        };

        let order_by = match params.order_by.as_deref() {
            None => SortKey::CreatedAt,
            Some(raw) => match SortKey::parse(raw) {
                Some(key) => key,
                None => {
                    field_errors.insert(
                        "orderBy".to_string(),
                        format!("must be one of: createdAt, updatedAt, title (got '{raw}')"),
                    );
                    SortKey::CreatedAt
                }
            },
        };

        let order = match params.order.as_deref() {
            None => SortOrder::Desc,
            Some(raw) => match SortOrder::parse(raw) {
                Some(ord) => ord,
                None => {
                    field_errors.insert(
                        "order".to_string(),
                        format!("must be 'asc' or 'desc' (got '{raw}')"),
                    );
                    SortOrder::Desc
                }
            },
        };

        let page = match params.page.as_deref() {
            None => 1,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    field_errors.insert(
                        "page".to_string(),
                        format!("must be an integer >= 1 (got '{raw}')"),
                    );
                    1
                }
            },
        };

        let per_page = match params.per_page.as_deref() {
            None => default_per_page,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n >= 1 => {
                    if n > max_per_page {
                        tracing::debug!("perPage {} exceeds maximum {}, capping", n, max_per_page);
                        max_per_page
                    } else {
                        n
                    }
                }
                _ => {
                    field_errors.insert(
                        "perPage".to_string(),
                        format!("must be an integer >= 1 (got '{raw}')"),
                    );
                    default_per_page
                }
            },
        };

        if !field_errors.is_empty() {
            return Err(QueryError::InvalidParams { field_errors });
        }

        Ok(Self {
            user_id,
            filters: FilterState {
                search,
                type_filter,
                favorite,
                order_by,
                order,
            },
            page,
            per_page,
        })
    }

    /// Build a plan from already-typed parts. Used by internal callers that
    /// bypass wire parsing.
    pub fn new(user_id: Uuid, filters: FilterState, page: i64, per_page: i64) -> Self {
        Self {
            user_id,
            filters,
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    /// SELECT statement for the current page, with bind parameters in
    /// `$1..$n` order.
    pub fn select_sql(&self) -> (String, Vec<QueryParam>) {
        let (where_sql, params) = self.where_clause();
        let sql = format!(
            "SELECT \"id\", \"title\", \"secret\", \"type\", \"favorite\", \"user_id\", \"created_at\", \"updated_at\" FROM \"secrets\" WHERE {} {} LIMIT {} OFFSET {}",
            where_sql,
            self.order_clause(),
            self.per_page,
            self.offset()
        );
        (sql, params)
    }

    /// COUNT statement over the same WHERE clause as `select_sql`.
    pub fn count_sql(&self) -> (String, Vec<QueryParam>) {
        let (where_sql, params) = self.where_clause();
        let sql = format!("SELECT COUNT(*) as count FROM \"secrets\" WHERE {where_sql}");
        (sql, params)
    }

    fn where_clause(&self) -> (String, Vec<QueryParam>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        // Ownership scope always comes first; every query is fenced to the
        // requesting user before any filter applies.
        params.push(QueryParam::Uuid(self.user_id));
        conditions.push(format!("\"user_id\" = ${}", params.len()));

        if !self.filters.search.is_empty() {
            params.push(QueryParam::Text(like_pattern(&self.filters.search)));
            let n = params.len();
            conditions.push(format!(
                "(\"title\" ILIKE ${n} ESCAPE '\\' OR \"secret\" ILIKE ${n} ESCAPE '\\')"
            ));
        }

        if let TypeFilter::Only(t) = self.filters.type_filter {
            params.push(QueryParam::Text(t.as_str().to_string()));
            conditions.push(format!("\"type\" = ${}", params.len()));
        }

        if let Some(fav) = self.filters.favorite {
            params.push(QueryParam::Bool(fav));
            conditions.push(format!("\"favorite\" = ${}", params.len()));
        }

        (conditions.join(" AND "), params)
    }

    fn order_clause(&self) -> String {
        // Secondary `id` sort keeps page boundaries deterministic when the
        // sort key has duplicate values.
        format!(
            "ORDER BY \"{}\" {}, \"id\" ASC",
            self.filters.order_by.column(),
            self.filters.order.to_sql()
        )
    }

    /// In-memory equivalent of the WHERE clause.
    pub fn matches(&self, secret: &Secret) -> bool {
        if secret.user_id != self.user_id {
            return false;
        }

        if !self.filters.search.is_empty() {
            let needle = self.filters.search.to_lowercase();
            let in_title = secret.title.to_lowercase().contains(&needle);
            let in_body = secret.secret.to_lowercase().contains(&needle);
            if !in_title && !in_body {
                return false;
            }
        }

        if let TypeFilter::Only(t) = self.filters.type_filter {
            if secret.secret_type != t {
                return false;
            }
        }

        if let Some(fav) = self.filters.favorite {
            if secret.favorite != fav {
                return false;
            }
        }

        true
    }

    /// In-memory equivalent of the ORDER BY clause, including the stable
    /// `id` tie-break.
    pub fn compare(&self, a: &Secret, b: &Secret) -> Ordering {
        let ord = match self.filters.order_by {
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortKey::Title => a.title.cmp(&b.title),
        };
        let ord = match self.filters.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        };
        ord.then_with(|| a.id.cmp(&b.id))
    }
}

/// Wrap a search needle in `%...%`, escaping LIKE wildcards so user input
/// matches literally.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn uid() -> Uuid {
        Uuid::new_v4()
    }

    fn parse_ok(user_id: Uuid, params: &ListParams) -> ListQuery {
        ListQuery::parse(user_id, params, 6, 100).unwrap()
    }

    fn sample_secret(user_id: Uuid, title: &str, body: &str) -> Secret {
        let now = Utc::now();
        Secret {
            id: Uuid::new_v4(),
            title: title.to_string(),
            secret: body.to_string(),
            secret_type: SecretType::Normal,
            favorite: false,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn defaults_apply_when_no_params_given() {
        let q = parse_ok(uid(), &ListParams::default());
        assert_eq!(q.filters().search, "");
        assert_eq!(q.filters().type_filter, TypeFilter::All);
        assert_eq!(q.filters().favorite, None);
        assert_eq!(q.filters().order_by, SortKey::CreatedAt);
        assert_eq!(q.filters().order, SortOrder::Desc);
        assert_eq!(q.page(), 1);
        assert_eq!(q.per_page(), 6);
    }

    #[test]
    fn typed_constructor_floors_page_and_per_page() {
        let q = ListQuery::new(uid(), FilterState::default(), 0, -3);
        assert_eq!(q.page(), 1);
        assert_eq!(q.per_page(), 1);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn ownership_scope_is_always_first_condition() {
        let user = uid();
        let q = parse_ok(
            user,
            &ListParams {
                search: Some("alpha".into()),
                secret_type: Some("hard".into()),
                favorite: Some("true".into()),
                ..Default::default()
            },
        );
        let (sql, params) = q.select_sql();
        assert!(sql.contains("WHERE \"user_id\" = $1 AND"));
        assert_eq!(params[0], QueryParam::Uuid(user));
        assert_eq!(params.len(), 4);
        assert_eq!(params[1], QueryParam::Text("%alpha%".into()));
        assert_eq!(params[2], QueryParam::Text("hard".into()));
        assert_eq!(params[3], QueryParam::Bool(true));
    }

    #[test]
    fn search_matches_title_or_body_with_one_bind() {
        let q = parse_ok(
            uid(),
            &ListParams {
                search: Some("key".into()),
                ..Default::default()
            },
        );
        let (sql, params) = q.select_sql();
        assert!(sql.contains("(\"title\" ILIKE $2 ESCAPE '\\' OR \"secret\" ILIKE $2 ESCAPE '\\')"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn like_wildcards_in_search_are_escaped() {
        let q = parse_ok(
            uid(),
            &ListParams {
                search: Some("100%_done".into()),
                ..Default::default()
            },
        );
        let (_, params) = q.select_sql();
        assert_eq!(params[1], QueryParam::Text("%100\\%\\_done%".into()));
    }

    #[test]
    fn type_all_adds_no_condition() {
        let q = parse_ok(
            uid(),
            &ListParams {
                secret_type: Some("all".into()),
                ..Default::default()
            },
        );
        let (sql, params) = q.select_sql();
        assert!(!sql.contains("\"type\""));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn count_sql_shares_the_where_clause() {
        let q = parse_ok(
            uid(),
            &ListParams {
                favorite: Some("false".into()),
                ..Default::default()
            },
        );
        let (select, _) = q.select_sql();
        let (count, params) = q.count_sql();
        assert!(count.starts_with("SELECT COUNT(*) as count FROM \"secrets\" WHERE"));
        assert!(select.contains("\"favorite\" = $2"));
        assert!(count.contains("\"favorite\" = $2"));
        assert_eq!(params.len(), 2);
        // COUNT has no ordering or paging.
        assert!(!count.contains("ORDER BY"));
        assert!(!count.contains("LIMIT"));
    }

    #[test]
    fn order_clause_includes_stable_tie_break() {
        let q = parse_ok(
            uid(),
            &ListParams {
                order_by: Some("title".into()),
                order: Some("asc".into()),
                ..Default::default()
            },
        );
        let (sql, _) = q.select_sql();
        assert!(sql.contains("ORDER BY \"title\" ASC, \"id\" ASC"));
    }

    #[test]
    fn pagination_maps_to_limit_offset() {
        let q = parse_ok(
            uid(),
            &ListParams {
                page: Some("3".into()),
                per_page: Some("10".into()),
                ..Default::default()
            },
        );
        let (sql, _) = q.select_sql();
        assert!(sql.ends_with("LIMIT 10 OFFSET 20"));
    }

    #[test]
    fn per_page_above_max_is_capped_not_rejected() {
        let q = ListQuery::parse(
            uid(),
            &ListParams {
                per_page: Some("5000".into()),
                ..Default::default()
            },
            6,
            100,
        )
        .unwrap();
        assert_eq!(q.per_page(), 100);
    }

    #[test]
    fn invalid_params_collect_field_errors() {
        let err = ListQuery::parse(
            uid(),
            &ListParams {
                secret_type: Some("extreme".into()),
                favorite: Some("yes".into()),
                order_by: Some("color".into()),
                order: Some("sideways".into()),
                page: Some("0".into()),
                per_page: Some("-1".into()),
                ..Default::default()
            },
            6,
            100,
        )
        .unwrap_err();
        let QueryError::InvalidParams { field_errors } = err;
        for field in ["type", "favorite", "orderBy", "order", "page", "perPage"] {
            assert!(field_errors.contains_key(field), "missing error for {field}");
        }
    }

    #[test]
    fn empty_favorite_means_no_filter() {
        let q = parse_ok(
            uid(),
            &ListParams {
                favorite: Some("".into()),
                ..Default::default()
            },
        );
        assert_eq!(q.filters().favorite, None);
        let (sql, _) = q.select_sql();
        assert!(!sql.contains("\"favorite\""));
    }

    #[test]
    fn matches_scopes_to_owner() {
        let owner = uid();
        let q = parse_ok(owner, &ListParams::default());
        let mine = sample_secret(owner, "mine", "body");
        let theirs = sample_secret(uid(), "theirs", "body");
        assert!(q.matches(&mine));
        assert!(!q.matches(&theirs));
    }

    #[test]
    fn matches_search_is_case_insensitive_over_both_fields() {
        let owner = uid();
        let q = parse_ok(
            owner,
            &ListParams {
                search: Some("GITHUB".into()),
                ..Default::default()
            },
        );
        let by_title = sample_secret(owner, "GitHub token", "xxx");
        let by_body = sample_secret(owner, "work", "github pat");
        let neither = sample_secret(owner, "bank", "pin 1234");
        assert!(q.matches(&by_title));
        assert!(q.matches(&by_body));
        assert!(!q.matches(&neither));
    }

    #[test]
    fn compare_orders_desc_by_default_with_id_tie_break() {
        let owner = uid();
        let q = parse_ok(owner, &ListParams::default());
        let older = sample_secret(owner, "a", "x");
        let mut newer = sample_secret(owner, "b", "x");
        newer.created_at = older.created_at + chrono::Duration::seconds(5);
        assert_eq!(q.compare(&newer, &older), Ordering::Less);

        let mut twin = older.clone();
        twin.id = Uuid::new_v4();
        assert_eq!(q.compare(&older, &twin), older.id.cmp(&twin.id));
    }
}
