//! Client-side session: a filter state store plus the fetch orchestration
//! that keeps it consistent with the server.

pub mod api;
pub mod orchestrator;
pub mod store;

pub use api::{ClientError, CreateSecretBody, UpdateSecretBody, VaultClient};
pub use orchestrator::FetchOrchestrator;
pub use store::{SecretsStore, StoreState};
