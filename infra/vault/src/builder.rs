use crate::engine::Vault;
use crate::error::VaultError;
use crate::types::{Aes, VaultCipher};
use aead::Key;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hkdf::Hkdf;
use private::Sealed;
use sha2::Sha256;
use std::marker::PhantomData;
use std::sync::Arc;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// HKDF `info` label for the value-encryption key.
const DERIVATION_INFO: &[u8] = b"sbox.v1.value-key";

pub const KEY_LEN: usize = 32;

#[derive(Debug, Default, ZeroizeOnDrop)]
pub struct NoKey;
#[derive(Debug, Zeroize, ZeroizeOnDrop)]
pub struct WithKey {
    key: [u8; KEY_LEN],
}

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoKey {}
impl Sealed for WithKey {}

/// A builder for secure initialization of the [`Vault`].
///
/// The vault is keyed exactly once. Raw key material held by the builder is wiped when the
/// builder is consumed or dropped.
#[allow(private_bounds)]
#[derive(Debug, Zeroize, ZeroizeOnDrop)]
pub struct VaultBuilder<C: VaultCipher = Aes, K: Sealed + ZeroizeOnDrop = NoKey> {
    #[zeroize(skip)]
    _cipher: PhantomData<C>,
    key: K,
}

impl<C: VaultCipher> Default for VaultBuilder<C> {
    fn default() -> Self {
        Self { _cipher: PhantomData, key: NoKey }
    }
}

impl<C: VaultCipher> VaultBuilder<C> {
    #[must_use = "Builder must be given a key before use"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a raw 256-bit key.
    #[must_use]
    pub fn key(self, key: &[u8; KEY_LEN]) -> VaultBuilder<C, WithKey> {
        VaultBuilder { _cipher: PhantomData, key: WithKey { key: *key } }
    }

    /// Uses a base64-encoded 256-bit key, the form keys take in configuration files and
    /// environment variables.
    ///
    /// # Errors
    /// Returns [`VaultError::InvalidConfiguration`] if the text is not base64 or does not decode
    /// to exactly 32 bytes.
    pub fn key_base64(self, encoded: &str) -> Result<VaultBuilder<C, WithKey>, VaultError> {
        let decoded = Zeroizing::new(STANDARD.decode(encoded.trim()).map_err(|e| {
            VaultError::InvalidConfiguration {
                message: "Encryption key is not valid base64".into(),
                context: Some(e.to_string().into()),
            }
        })?);

        let key: &[u8; KEY_LEN] =
            decoded.as_slice().try_into().map_err(|_| VaultError::InvalidConfiguration {
                message: format!(
                    "Invalid key length {}, must be {KEY_LEN} bytes",
                    decoded.len()
                )
                .into(),
                context: None,
            })?;

        Ok(self.key(key))
    }

    /// Derives the key from a secret using HKDF-SHA256.
    ///
    /// # Arguments
    /// * `secret`: Input keying material (master secret).
    /// * `salt`: Separates keys of different deployments sharing a secret.
    ///
    /// # Errors
    /// Returns [`VaultError::InvalidConfiguration`] if the secret is empty or expansion fails.
    pub fn derived_key(
        self,
        secret: impl AsRef<[u8]>,
        salt: impl AsRef<[u8]>,
    ) -> Result<VaultBuilder<C, WithKey>, VaultError> {
        if secret.as_ref().is_empty() {
            return Err(VaultError::InvalidConfiguration {
                message: "Key derivation secret must not be empty".into(),
                context: None,
            });
        }

        let (_, hk) = Hkdf::<Sha256>::extract(Some(salt.as_ref()), secret.as_ref());
        let mut key = [0u8; KEY_LEN];
        hk.expand(DERIVATION_INFO, &mut key).map_err(|_| VaultError::InvalidConfiguration {
            message: "HKDF expansion failed for value key".into(),
            context: None,
        })?;

        let builder = self.key(&key);
        key.zeroize();
        Ok(builder)
    }
}

impl<C: VaultCipher> VaultBuilder<C, WithKey> {
    /// Finalizes vault construction and wipes the builder.
    ///
    /// # Errors
    /// Returns [`VaultError::InvalidConfiguration`] if the cipher rejects the key.
    pub fn build(mut self) -> Result<Vault<C>, VaultError> {
        let cipher = Key::<C>::try_from(&self.key.key[..])
            .map(|key| C::new(&key))
            .map_err(|_| VaultError::InvalidConfiguration {
                message: format!("Invalid key length, must be {KEY_LEN} bytes").into(),
                context: Some(C::ALGORITHM.name().into()),
            });

        self.zeroize();

        Ok(Vault { cipher: Arc::new(cipher?) })
    }
}
