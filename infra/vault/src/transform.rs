//! Composable value transforms.
//!
//! A [`Pipeline`] is an ordered list of [`Transformer`] stages. Writing runs every stage's
//! `forward` from first to last; reading runs `backward` from last to first. Compression or
//! any other stage can be slotted in without touching the encryption stage.
//!
//! ```rust
//! use sbox_vault::prelude::*;
//! use sbox_vault::transform::{Base64, Encrypted, Json, Pipeline};
//!
//! # fn main() -> Result<(), VaultError> {
//! let vault = Vault::<Aes>::builder().key(&[1u8; 32]).build()?;
//! let pipeline = Pipeline::builder()
//!     .stage(Json)
//!     .stage(Encrypted::new(vault, "sbox.variable.value"))
//!     .stage(Base64)
//!     .build();
//!
//! let stored = pipeline.seal_text("abc123")?;
//! assert_eq!(pipeline.open_text(&stored)?.as_str(), "abc123");
//! # Ok(())
//! # }
//! ```

use crate::engine::Vault;
use crate::error::VaultError;
use crate::types::VaultCipher;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use zeroize::Zeroizing;

/// One reversible step between the application value and its stored form.
///
/// `backward(forward(x)) == x` must hold for every input `forward` accepts. Any failure of
/// `backward` is reported as [`VaultError::Decryption`], since stored data that cannot be
/// reversed is indistinguishable from tampered data.
pub trait Transformer: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Application side to storage side.
    ///
    /// # Errors
    /// Stage specific, usually [`VaultError::Encoding`] or [`VaultError::Encryption`].
    fn forward(&self, data: Vec<u8>) -> Result<Vec<u8>, VaultError>;

    /// Storage side to application side.
    ///
    /// # Errors
    /// [`VaultError::Decryption`] when the input cannot be reversed.
    fn backward(&self, data: Vec<u8>) -> Result<Vec<u8>, VaultError>;
}

/// An ordered, cheaply clonable list of [`Transformer`] stages.
#[derive(Clone)]
pub struct Pipeline {
    stages: Arc<[Box<dyn Transformer>]>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.stage_names()).finish()
    }
}

#[derive(Debug, Default)]
pub struct PipelineBuilder {
    stages: Vec<Box<dyn Transformer>>,
}

impl PipelineBuilder {
    /// Appends a stage. Stages run in insertion order on write.
    #[must_use]
    pub fn stage(mut self, stage: impl Transformer + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline { stages: Arc::from(self.stages) }
    }
}

impl Pipeline {
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Runs every stage toward storage.
    ///
    /// # Errors
    /// The first stage failure.
    pub fn forward(&self, data: Vec<u8>) -> Result<Vec<u8>, VaultError> {
        self.stages.iter().try_fold(data, |acc, stage| stage.forward(acc))
    }

    /// Runs every stage back toward the application, last stage first.
    ///
    /// # Errors
    /// The first stage failure, always a [`VaultError::Decryption`] for built-in stages.
    pub fn backward(&self, data: Vec<u8>) -> Result<Vec<u8>, VaultError> {
        self.stages.iter().rev().try_fold(data, |acc, stage| stage.backward(acc))
    }

    /// Transforms a text value into its stored text form.
    ///
    /// # Errors
    /// Stage failures, or [`VaultError::Encoding`] if the last stage does not emit UTF-8
    /// (end the pipeline with [`Base64`]).
    pub fn seal_text(&self, plaintext: &str) -> Result<String, VaultError> {
        let stored = self.forward(plaintext.as_bytes().to_vec())?;
        String::from_utf8(stored).map_err(|_| VaultError::Encoding {
            message: "Pipeline output is not text".into(),
            context: Some(format!("stages={:?}", self.stage_names()).into()),
        })
    }

    /// Reverses [`Pipeline::seal_text`].
    ///
    /// # Errors
    /// [`VaultError::Decryption`] on any malformed, tampered or foreign input.
    pub fn open_text(&self, stored: &str) -> Result<Zeroizing<String>, VaultError> {
        let plain = self.backward(stored.as_bytes().to_vec())?;
        String::from_utf8(plain)
            .map(Zeroizing::new)
            .map_err(|_| VaultError::decryption("Opened value is not valid UTF-8"))
    }
}

/// Wraps a UTF-8 value as a JSON string literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Transformer for Json {
    fn name(&self) -> &'static str {
        "json"
    }

    fn forward(&self, data: Vec<u8>) -> Result<Vec<u8>, VaultError> {
        let text = String::from_utf8(data).map_err(|_| VaultError::Encoding {
            message: "JSON stage expects UTF-8 input".into(),
            context: None,
        })?;
        serde_json::to_vec(&text).map_err(|e| VaultError::Encoding {
            message: "JSON encoding failed".into(),
            context: Some(e.to_string().into()),
        })
    }

    fn backward(&self, data: Vec<u8>) -> Result<Vec<u8>, VaultError> {
        serde_json::from_slice::<String>(&data)
            .map(String::into_bytes)
            .map_err(|_| VaultError::decryption("Stored value is not a JSON string"))
    }
}

/// LZ4 block compression with a size prefix.
///
/// Applied before [`Encrypted`] it shortens ciphertexts, but it also lets ciphertext length
/// depend on content. Leave it out when an observer controls part of the plaintext.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compression;

impl Transformer for Compression {
    fn name(&self) -> &'static str {
        "lz4"
    }

    fn forward(&self, data: Vec<u8>) -> Result<Vec<u8>, VaultError> {
        Ok(lz4_flex::compress_prepend_size(&data))
    }

    fn backward(&self, data: Vec<u8>) -> Result<Vec<u8>, VaultError> {
        lz4_flex::decompress_size_prepended(&data)
            .map_err(|_| VaultError::decryption("LZ4 stream invalid"))
    }
}

/// Authenticated encryption through a [`Vault`], bound to a fixed context label.
pub struct Encrypted<C: VaultCipher> {
    vault: Vault<C>,
    context: Cow<'static, str>,
}

impl<C: VaultCipher> Encrypted<C> {
    #[must_use]
    pub fn new(vault: Vault<C>, context: impl Into<Cow<'static, str>>) -> Self {
        Self { vault, context: context.into() }
    }
}

impl<C: VaultCipher> fmt::Debug for Encrypted<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encrypted")
            .field("vault", &self.vault)
            .field("context", &self.context)
            .finish()
    }
}

impl<C: VaultCipher> Transformer for Encrypted<C> {
    fn name(&self) -> &'static str {
        "encrypted"
    }

    fn forward(&self, data: Vec<u8>) -> Result<Vec<u8>, VaultError> {
        let data = Zeroizing::new(data);
        self.vault.seal(&*data, self.context.as_bytes()).map(crate::types::Envelope::into_bytes)
    }

    fn backward(&self, data: Vec<u8>) -> Result<Vec<u8>, VaultError> {
        self.vault.open(data, self.context.as_bytes())
    }
}

/// Standard base64 text armor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64;

impl Transformer for Base64 {
    fn name(&self) -> &'static str {
        "base64"
    }

    fn forward(&self, data: Vec<u8>) -> Result<Vec<u8>, VaultError> {
        Ok(STANDARD.encode(data).into_bytes())
    }

    fn backward(&self, data: Vec<u8>) -> Result<Vec<u8>, VaultError> {
        STANDARD.decode(data).map_err(|_| VaultError::decryption("Stored value is not base64"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Aes;

    fn vault() -> Vault<Aes> {
        Vault::builder().key(&[3u8; 32]).build().unwrap()
    }

    fn default_pipeline() -> Pipeline {
        Pipeline::builder()
            .stage(Json)
            .stage(Encrypted::new(vault(), "test.value"))
            .stage(Base64)
            .build()
    }

    #[test]
    fn test_stages_run_in_order() {
        let pipeline = default_pipeline();
        assert_eq!(pipeline.stage_names(), ["json", "encrypted", "base64"]);

        let stored = pipeline.seal_text("abc123").unwrap();
        assert!(!stored.contains("abc123"));
        assert_eq!(pipeline.open_text(&stored).unwrap().as_str(), "abc123");
    }

    #[test]
    fn test_json_stage_wraps_as_string_literal() {
        let wrapped = Json.forward(b"a\"b".to_vec()).unwrap();
        assert_eq!(wrapped, br#""a\"b""#);
        assert_eq!(Json.backward(wrapped).unwrap(), b"a\"b");
    }

    #[test]
    fn test_compression_can_be_inserted() {
        let pipeline = Pipeline::builder()
            .stage(Json)
            .stage(Compression)
            .stage(Encrypted::new(vault(), "test.value"))
            .stage(Base64)
            .build();

        let value = "x".repeat(4096);
        let stored = pipeline.seal_text(&value).unwrap();

        assert!(stored.len() < value.len());
        assert_eq!(pipeline.open_text(&stored).unwrap().as_str(), value);
    }

    #[test]
    fn test_context_label_is_bound() {
        let stored = default_pipeline().seal_text("scoped").unwrap();
        let other = Pipeline::builder()
            .stage(Json)
            .stage(Encrypted::new(vault(), "other.value"))
            .stage(Base64)
            .build();

        assert!(matches!(other.open_text(&stored), Err(VaultError::Decryption { .. })));
    }

    #[test]
    fn test_malformed_stored_text() {
        let pipeline = default_pipeline();
        for bad in ["", "not base64!", "AAAA"] {
            assert!(
                matches!(pipeline.open_text(bad), Err(VaultError::Decryption { .. })),
                "{bad:?} should fail to open"
            );
        }
    }
}
