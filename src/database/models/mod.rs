pub mod secret;

pub use secret::{NewSecret, Secret, SecretPatch};
