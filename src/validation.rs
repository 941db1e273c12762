use std::collections::HashMap;

use serde::Deserialize;

use crate::database::models::{NewSecret, SecretPatch};
use crate::error::ApiError;
use crate::query::types::SecretType;

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 100;
pub const SECRET_MIN_CHARS: usize = 1;
pub const SECRET_MAX_CHARS: usize = 1000;

const TYPE_ERROR: &str = "must be one of: normal, medio, hard";

/// Body of `POST /secrets`, before validation. The `type` field stays a raw
/// string here so an unknown value becomes a field error instead of a JSON
/// deserialization failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSecretRequest {
    pub title: String,
    pub secret: String,
    #[serde(rename = "type")]
    pub secret_type: String,
    #[serde(default)]
    pub favorite: Option<bool>,
}

impl CreateSecretRequest {
    /// Check every field and collect all violations before failing.
    pub fn validate(self) -> Result<NewSecret, ApiError> {
        let mut field_errors = HashMap::new();

        check_chars(
            "title",
            &self.title,
            TITLE_MIN_CHARS,
            TITLE_MAX_CHARS,
            &mut field_errors,
        );
        check_chars(
            "secret",
            &self.secret,
            SECRET_MIN_CHARS,
            SECRET_MAX_CHARS,
            &mut field_errors,
        );

        let secret_type = match self.secret_type.parse::<SecretType>() {
            Ok(t) => t,
            Err(_) => {
                field_errors.insert("type".to_string(), TYPE_ERROR.to_string());
                SecretType::Normal
            }
        };

        if !field_errors.is_empty() {
            return Err(ApiError::validation_error("Invalid input", Some(field_errors)));
        }

        Ok(NewSecret {
            title: self.title,
            secret: self.secret,
            secret_type,
            favorite: self.favorite.unwrap_or(false),
        })
    }
}

/// Body of `PATCH /secrets/:id`, before validation. Every field is optional;
/// absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSecretRequest {
    pub title: Option<String>,
    pub secret: Option<String>,
    #[serde(rename = "type")]
    pub secret_type: Option<String>,
    pub favorite: Option<bool>,
}

impl UpdateSecretRequest {
    pub fn validate(self) -> Result<SecretPatch, ApiError> {
        let mut field_errors = HashMap::new();

        if let Some(title) = &self.title {
            check_chars(
                "title",
                title,
                TITLE_MIN_CHARS,
                TITLE_MAX_CHARS,
                &mut field_errors,
            );
        }
        if let Some(secret) = &self.secret {
            check_chars(
                "secret",
                secret,
                SECRET_MIN_CHARS,
                SECRET_MAX_CHARS,
                &mut field_errors,
            );
        }

        let secret_type = match self.secret_type.as_deref() {
            None => None,
            Some(raw) => match raw.parse::<SecretType>() {
                Ok(t) => Some(t),
                Err(_) => {
                    field_errors.insert("type".to_string(), TYPE_ERROR.to_string());
                    None
                }
            },
        };

        if !field_errors.is_empty() {
            return Err(ApiError::validation_error("Invalid input", Some(field_errors)));
        }

        Ok(SecretPatch {
            title: self.title,
            secret: self.secret,
            secret_type,
            favorite: self.favorite,
        })
    }
}

/// Bounds are counted in characters, not bytes, so multibyte input is not
/// penalized.
fn check_chars(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
    errors: &mut HashMap<String, String>,
) {
    let len = value.chars().count();
    if len < min {
        let plural = if min == 1 { "" } else { "s" };
        errors.insert(
            field.to_string(),
            format!("must be at least {min} character{plural}"),
        );
    } else if len > max {
        errors.insert(
            field.to_string(),
            format!("must be at most {max} characters"),
        );
    }
}
