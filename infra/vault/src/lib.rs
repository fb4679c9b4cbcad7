//! Authenticated encryption for values at rest.
//!
//! This crate provides a single-key vault for authenticated encryption with associated data
//! (AEAD) and a small pipeline of reversible transforms that turn an application value into
//! the text stored in a record.
//!
//! ## Envelope Format & Versioning
//!
//! Encrypted values are stored as a versioned binary blob with an explicit header:
//!
//! ```text
//! [V(1)][ALG(1)][NONCE(12)][CIPHERTEXT(N)][TAG(16)]
//! ```
//!
//! An envelope carries everything needed to decrypt it except the key. The algorithm byte
//! stops a vault from trying to open an envelope produced by a different cipher.
//!
//! ## Nonce Policy
//!
//! Every encryption draws a **random 96-bit nonce** from the system RNG. This is the standard
//! approach for `AES-GCM` and `ChaCha20Poly1305`, but it is probabilistic; it is sized for
//! secret stores, not for billions of encryptions under one key.
//!
//! ## Examples
//!
//! ```rust
//! use sbox_vault::prelude::*;
//!
//! # fn main() -> Result<(), VaultError> {
//! let vault = Vault::<ChaCha>::builder().key(&[42u8; 32]).build()?;
//!
//! let envelope = vault.encrypt("dürüm 🌯")?;
//! let bytes = envelope.into_bytes();
//!
//! let restored = vault.decrypt(Envelope::parse(bytes)?)?;
//! assert_eq!(restored.as_str(), "dürüm 🌯");
//! # Ok(())
//! # }
//! ```

mod builder;
mod engine;
mod error;
pub mod transform;
mod types;

pub use builder::{KEY_LEN, NoKey, VaultBuilder, WithKey};
pub use engine::Vault;
pub use error::{VaultError, VaultErrorExt};
pub use types::{Algorithm, Envelope, MIN_ENVELOPE_LEN};

pub mod prelude {
    pub use crate::engine::Vault;
    pub use crate::error::{VaultError, VaultErrorExt};
    pub use crate::transform::{Pipeline, Transformer};
    pub use crate::types::{Aes, Algorithm, ChaCha, Envelope};
}

pub mod algorithms {
    pub use crate::types::{Aes, ChaCha, VaultCipher};
}
