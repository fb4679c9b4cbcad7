use aead::Nonce;
use aead::inout::InOutBuf;
use getrandom::fill;
use std::fmt;
use std::sync::Arc;
use zeroize::Zeroizing;

use crate::builder::VaultBuilder;
use crate::error::VaultError;
use crate::types::{
    Aes, Algorithm, ENVELOPE_VERSION_V1, Envelope, HEADER_LEN, NONCE_LEN, TAG_LEN, VaultCipher,
};

/// A thread-safe handle to the value-encryption key.
///
/// `Vault` wraps a single AEAD cipher in an [`Arc`], making it cheaply clonable and safe to
/// share across tasks. It is keyed once at startup through [`Vault::builder`]; there is no
/// per-record key and no rotation.
///
/// ### Generic Parameters
/// * `C`: The cipher implementation. Defaults to [`Aes`] (AES-256-GCM).
///
/// ### Example
/// ```rust
/// use sbox_vault::prelude::*;
///
/// # fn main() -> Result<(), VaultError> {
/// let vault = Vault::<Aes>::builder().derived_key("master-secret", "deployment-salt")?.build()?;
///
/// let envelope = vault.encrypt("abc123")?;
/// assert_eq!(vault.decrypt(&envelope)?.as_str(), "abc123");
/// # Ok(())
/// # }
/// ```
pub struct Vault<C = Aes>
where
    C: VaultCipher,
{
    pub(crate) cipher: Arc<C>,
}

impl<C: VaultCipher> Clone for Vault<C> {
    fn clone(&self) -> Self {
        Self { cipher: Arc::clone(&self.cipher) }
    }
}

impl<C: VaultCipher> fmt::Debug for Vault<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vault").field("algorithm", &C::ALGORITHM).finish_non_exhaustive()
    }
}

impl<C> Vault<C>
where
    C: VaultCipher,
{
    /// Returns a new [`VaultBuilder`] to configure the vault.
    #[must_use]
    pub fn builder() -> VaultBuilder<C> {
        VaultBuilder::<C>::new()
    }

    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        C::ALGORITHM
    }

    /// Encrypts a UTF-8 value into an [`Envelope`].
    ///
    /// # Errors
    /// * [`VaultError::Encryption`] If the system RNG or the AEAD fails.
    pub fn encrypt(&self, plaintext: &str) -> Result<Envelope, VaultError> {
        self.seal(plaintext.as_bytes(), &[])
    }

    /// Decrypts an envelope produced by [`Vault::encrypt`].
    ///
    /// # Errors
    /// * [`VaultError::Decryption`] If the envelope is malformed, was produced with another key
    ///   or algorithm, was modified, or does not contain UTF-8.
    pub fn decrypt(&self, envelope: impl AsRef<[u8]>) -> Result<Zeroizing<String>, VaultError> {
        let bytes = self.open(envelope, &[])?;
        String::from_utf8(bytes)
            .map(Zeroizing::new)
            .map_err(|_| VaultError::decryption("Decrypted value is not valid UTF-8"))
    }

    /// Encrypts raw bytes, binding them to `context` as associated data.
    ///
    /// The same `context` must be supplied to [`Vault::open`].
    ///
    /// # Errors
    /// * [`VaultError::Encryption`] If the system RNG or the AEAD fails.
    pub fn seal(&self, data: impl AsRef<[u8]>, context: &[u8]) -> Result<Envelope, VaultError> {
        let data = data.as_ref();
        let nonce = Self::next_nonce()?;

        let mut buf = Vec::with_capacity(HEADER_LEN + NONCE_LEN + data.len() + TAG_LEN);
        buf.push(ENVELOPE_VERSION_V1);
        buf.push(C::ALGORITHM.id());
        buf.extend_from_slice(&nonce);
        buf.extend_from_slice(data);

        let tag = {
            let in_out = InOutBuf::from(&mut buf[HEADER_LEN + NONCE_LEN..]);
            self.cipher.encrypt_inout_detached(&nonce, context, in_out).map_err(|_| {
                VaultError::Encryption {
                    message: "Encryption failed".into(),
                    context: Some("AEAD encryption failed".into()),
                }
            })?
        };

        buf.extend_from_slice(tag.as_slice());
        Ok(Envelope::from_sealed(buf))
    }

    /// Decrypts raw envelope bytes sealed under the same `context`.
    ///
    /// # Errors
    /// * [`VaultError::Decryption`] If the envelope is malformed, the algorithm does not match
    ///   this vault, or authentication fails.
    pub fn open(&self, envelope: impl AsRef<[u8]>, context: &[u8]) -> Result<Vec<u8>, VaultError> {
        let envelope = Envelope::parse(envelope.as_ref())?;

        let algorithm = envelope.algorithm()?;
        if algorithm != C::ALGORITHM {
            return Err(VaultError::Decryption {
                message: "Envelope was sealed with a different algorithm".into(),
                context: Some(algorithm.name().into()),
            });
        }

        let nonce: Nonce<C> = envelope
            .nonce()
            .try_into()
            .map_err(|_| VaultError::decryption("Invalid nonce length"))?;
        let tag = envelope.tag().try_into().map_err(|_| VaultError::decryption("Invalid tag length"))?;

        let mut buf = envelope.ciphertext().to_vec();
        let in_out = InOutBuf::from(&mut buf[..]);

        self.cipher.decrypt_inout_detached(&nonce, context, in_out, &tag).map_err(|_| {
            VaultError::Decryption {
                message: "Decryption failed".into(),
                context: Some("AEAD authentication failed".into()),
            }
        })?;

        Ok(buf)
    }

    fn next_nonce() -> Result<Nonce<C>, VaultError> {
        let mut nonce = Nonce::<C>::default();
        fill(&mut nonce).map_err(|e| VaultError::Encryption {
            message: "System RNG unavailable for nonce generation".into(),
            context: Some(e.to_string().into()),
        })?;
        Ok(nonce)
    }
}
