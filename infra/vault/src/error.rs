//! # Vault Errors
//!
//! [`VaultError`] covers key setup, sealing and opening of envelopes and the transform
//! pipeline stages.

use std::borrow::Cow;

/// A specialized [`VaultError`] enum for vault-related failures.
#[sbox_derive::sbox_error]
pub enum VaultError {
    /// Failure while sealing a value.
    #[error("Encryption error{}: {message}", format_context(.context))]
    Encryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure while opening a value.
    ///
    /// Covers malformed framing, an unknown version or algorithm, a wrong key or context, and
    /// tampered bytes. The message never contains key material or plaintext.
    #[error("Decryption error{}: {message}", format_context(.context))]
    Decryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A pipeline stage could not encode its input on the way to storage.
    #[error("Encoding error{}: {message}", format_context(.context))]
    Encoding { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure when the vault or builder is incorrectly configured.
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal vault error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl VaultError {
    pub(crate) fn decryption(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Decryption { message: message.into(), context: None }
    }
}
