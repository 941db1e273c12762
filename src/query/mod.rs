//! Ownership-scoped query planning for secret listings.
//!
//! `ListQuery` is the single source of truth for filter semantics: it
//! validates raw wire parameters once, then renders them either as
//! parameterized SQL or as an in-memory predicate and comparator.

pub mod builder;
pub mod error;
pub mod types;

pub use builder::{ListParams, ListQuery, QueryParam};
pub use error::QueryError;
pub use types::{
    FilterState, PaginationMeta, SecretType, SortKey, SortOrder, TypeFilter, DEFAULT_PER_PAGE,
};
