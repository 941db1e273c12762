use std::collections::HashMap;
use thiserror::Error;

/// Errors produced while validating listing parameters. Field errors are
/// collected per offending parameter so the caller sees all of them at once.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid query parameters: {field_errors:?}")]
    InvalidParams { field_errors: HashMap<String, String> },
}
