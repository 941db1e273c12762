use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::Secret;
use crate::query::types::{FilterState, PaginationMeta, SecretType};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a `{success: false}` envelope.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Body of `POST /secrets`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSecretBody {
    pub title: String,
    pub secret: String,
    #[serde(rename = "type")]
    pub secret_type: SecretType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
}

/// Body of `PATCH /secrets/{id}`; only present fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSecretBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub secret_type: Option<SecretType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    meta: Option<PaginationMeta>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default, rename = "fieldErrors")]
    field_errors: Option<HashMap<String, String>>,
}

/// Typed client for the secrets API. One instance per session; the bearer
/// token is fixed at construction.
pub struct VaultClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl VaultClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: token.into(),
        }
    }

    /// GET /secrets with the full filter/sort/page parameter set.
    pub async fn list_secrets(
        &self,
        filters: &FilterState,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Secret>, PaginationMeta), ClientError> {
        let mut params: Vec<(&str, String)> = vec![
            ("search", filters.search.clone()),
            ("type", filters.type_filter.as_str().to_string()),
            ("orderBy", filters.order_by.as_str().to_string()),
            ("order", filters.order.as_str().to_string()),
            ("page", page.to_string()),
            ("perPage", per_page.to_string()),
        ];
        if let Some(favorite) = filters.favorite {
            params.push(("favorite", favorite.to_string()));
        }

        let response = self
            .http
            .get(format!("{}/secrets", self.base_url))
            .bearer_auth(&self.token)
            .query(&params)
            .send()
            .await?;

        let envelope = read_envelope(response).await?;
        let meta = envelope
            .meta
            .ok_or_else(|| ClientError::UnexpectedResponse("listing without meta".to_string()))?;
        let secrets: Vec<Secret> = serde_json::from_value(envelope.data)
            .map_err(|e| ClientError::UnexpectedResponse(e.to_string()))?;

        Ok((secrets, meta))
    }

    pub async fn create_secret(&self, body: &CreateSecretBody) -> Result<Secret, ClientError> {
        let response = self
            .http
            .post(format!("{}/secrets", self.base_url))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;

        secret_from(read_envelope(response).await?)
    }

    pub async fn update_secret(
        &self,
        id: Uuid,
        body: &UpdateSecretBody,
    ) -> Result<Secret, ClientError> {
        let response = self
            .http
            .patch(format!("{}/secrets/{}", self.base_url, id))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;

        secret_from(read_envelope(response).await?)
    }

    pub async fn delete_secret(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(format!("{}/secrets/{}", self.base_url, id))
            .bearer_auth(&self.token)
            .send()
            .await?;

        read_envelope(response).await?;
        Ok(())
    }
}

fn secret_from(envelope: Envelope) -> Result<Secret, ClientError> {
    serde_json::from_value(envelope.data).map_err(|e| ClientError::UnexpectedResponse(e.to_string()))
}

async fn read_envelope(response: reqwest::Response) -> Result<Envelope, ClientError> {
    let status = response.status();
    let body = response.text().await?;

    let envelope: Envelope = serde_json::from_str(&body).map_err(|_| {
        ClientError::UnexpectedResponse(format!("status {}: not an API envelope", status))
    })?;

    if !envelope.success {
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: envelope
                .error
                .unwrap_or_else(|| format!("request failed with status {}", status)),
            field_errors: envelope.field_errors,
        });
    }

    Ok(envelope)
}
