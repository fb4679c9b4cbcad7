use crate::error::VaultError;
use aead::{AeadInOut, KeyInit};
use aes_gcm::Aes256Gcm;
use chacha20poly1305::ChaCha20Poly1305;
use std::fmt;
use std::ops::Deref;

// --- Aliases ---

pub type Aes = Aes256Gcm;
pub type ChaCha = ChaCha20Poly1305;

/// An AEAD cipher the vault can be keyed with.
///
/// The associated [`Algorithm`] is written into every envelope, so a payload can only be
/// opened by a vault configured with the same cipher.
pub trait VaultCipher: AeadInOut + KeyInit + Send + Sync + 'static {
    const ALGORITHM: Algorithm;
}

impl VaultCipher for Aes {
    const ALGORITHM: Algorithm = Algorithm::Aes256Gcm;
}

impl VaultCipher for ChaCha {
    const ALGORITHM: Algorithm = Algorithm::ChaCha20Poly1305;
}

// --- Envelope format constants ---

/// Envelope format version.
pub(crate) const ENVELOPE_VERSION_V1: u8 = 1;

/// Header layout: `[version: u8][algorithm: u8]`
pub(crate) const HEADER_LEN: usize = 2;

/// AEAD nonce length (96-bit).
pub(crate) const NONCE_LEN: usize = 12;

/// AEAD tag length (128-bit).
pub(crate) const TAG_LEN: usize = 16;

/// Smallest well-formed envelope: header, nonce and tag around an empty ciphertext.
pub const MIN_ENVELOPE_LEN: usize = HEADER_LEN + NONCE_LEN + TAG_LEN;

/// Identifier of the AEAD construction that produced an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Algorithm {
    Aes256Gcm = 1,
    ChaCha20Poly1305 = 2,
}

impl Algorithm {
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aes256Gcm => "AES-256-GCM",
            Self::ChaCha20Poly1305 => "ChaCha20-Poly1305",
        }
    }
}

impl TryFrom<u8> for Algorithm {
    type Error = VaultError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Self::Aes256Gcm),
            2 => Ok(Self::ChaCha20Poly1305),
            other => Err(VaultError::Decryption {
                message: "Unknown envelope algorithm".into(),
                context: Some(format!("algorithm={other}").into()),
            }),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A self-describing encrypted value.
///
/// ```text
/// [V(1)][ALG(1)][NONCE(12)][CIPHERTEXT(N)][TAG(16)]
/// ```
///
/// An `Envelope` is only ever constructed through [`Envelope::parse`] or by the vault itself,
/// so the accessors below never panic.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Envelope {
    data: Vec<u8>,
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("version", &self.version())
            .field("algorithm", &self.data[1])
            .field("len", &self.data.len())
            .finish()
    }
}

impl Envelope {
    pub(crate) const fn from_sealed(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Validates the framing of raw envelope bytes.
    ///
    /// Only the structure is checked here; authenticity is established when the envelope is
    /// opened.
    ///
    /// # Errors
    /// [`VaultError::Decryption`] if the input is too short, names an unsupported version or an
    /// unknown algorithm.
    pub fn parse(bytes: impl Into<Vec<u8>>) -> Result<Self, VaultError> {
        let data = bytes.into();
        if data.len() < MIN_ENVELOPE_LEN {
            return Err(VaultError::Decryption {
                message: format!(
                    "Envelope too short ({} bytes), expected at least {MIN_ENVELOPE_LEN}",
                    data.len()
                )
                .into(),
                context: None,
            });
        }
        if data[0] != ENVELOPE_VERSION_V1 {
            return Err(VaultError::Decryption {
                message: "Unsupported envelope version".into(),
                context: Some(format!("version={}", data[0]).into()),
            });
        }
        Algorithm::try_from(data[1])?;
        Ok(Self { data })
    }

    #[must_use]
    pub fn version(&self) -> u8 {
        self.data[0]
    }

    /// The algorithm recorded in the header.
    ///
    /// # Errors
    /// Unreachable for parsed envelopes; kept fallible to avoid a panic path.
    pub fn algorithm(&self) -> Result<Algorithm, VaultError> {
        Algorithm::try_from(self.data[1])
    }

    #[must_use]
    pub fn nonce(&self) -> &[u8] {
        &self.data[HEADER_LEN..HEADER_LEN + NONCE_LEN]
    }

    #[must_use]
    pub fn ciphertext(&self) -> &[u8] {
        &self.data[HEADER_LEN + NONCE_LEN..self.data.len() - TAG_LEN]
    }

    #[must_use]
    pub fn tag(&self) -> &[u8] {
        &self.data[self.data.len() - TAG_LEN..]
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl AsRef<[u8]> for Envelope {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl Deref for Envelope {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
