use sbox_vault::prelude::*;
use sbox_vault::transform::{Base64, Encrypted, Json};

pub const VALUE_CONTEXT: &str = "sbox.variable.value";

/// Initializes a Vault instance with a fixed derived key for testing.
/// # Panics
/// * If Vault setup fails, the function will panic.
#[must_use]
pub fn setup_vault() -> Vault {
    Vault::builder()
        .derived_key("master-secret-123", "unique-salt")
        .unwrap()
        .build()
        .expect("Vault setup failed")
}

/// The pipeline variable values go through before they are stored.
#[must_use]
pub fn setup_pipeline() -> Pipeline {
    Pipeline::builder()
        .stage(Json)
        .stage(Encrypted::new(setup_vault(), VALUE_CONTEXT))
        .stage(Base64)
        .build()
}
