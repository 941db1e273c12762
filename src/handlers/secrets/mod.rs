use uuid::Uuid;

use crate::error::ApiError;

mod secret_delete;
mod secret_patch;
mod secrets_get;
mod secrets_post;

pub use secret_delete::secret_delete;
pub use secret_patch::secret_patch;
pub use secrets_get::secrets_get;
pub use secrets_post::secrets_post;

/// Malformed ids are indistinguishable from missing rows, so existence of
/// well-formed ids cannot be probed by shape.
fn parse_secret_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse::<Uuid>().map_err(|_| ApiError::secret_not_found())
}
