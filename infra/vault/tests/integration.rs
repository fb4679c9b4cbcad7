mod fixtures;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use fixtures::{setup_pipeline, setup_vault};
use sbox_vault::prelude::*;
use sbox_vault::{Envelope, MIN_ENVELOPE_LEN};

#[test]
fn test_empty_and_multibyte_values_roundtrip() {
    let vault = setup_vault();

    for value in ["", "abc123", "пароль", "秘密の値", "🔐🗝️", "line\nbreak\t\"quoted\""] {
        let envelope = vault.encrypt(value).unwrap();
        assert_eq!(vault.decrypt(&envelope).unwrap().as_str(), value, "value {value:?}");
    }
}

#[test]
fn test_empty_value_produces_minimal_envelope() {
    let envelope = setup_vault().encrypt("").unwrap();
    assert_eq!(envelope.len(), MIN_ENVELOPE_LEN);
}

#[test]
fn test_tampering_any_section_fails() {
    let vault = setup_vault();
    let envelope = vault.encrypt("abc123").unwrap();

    // header byte, nonce byte, ciphertext byte, tag byte
    for at in [0, 2, MIN_ENVELOPE_LEN - 16, envelope.len() - 1] {
        let mut bytes = envelope.as_bytes().to_vec();
        bytes[at] ^= 0x01;

        let result = vault.decrypt(&bytes);
        assert!(
            matches!(result, Err(VaultError::Decryption { .. })),
            "flipping byte {at} must be detected"
        );
    }
}

#[test]
fn test_truncated_and_extended_envelopes_fail() {
    let vault = setup_vault();
    let bytes = vault.encrypt("abc123").unwrap().into_bytes();

    let truncated = &bytes[..bytes.len() - 1];
    assert!(matches!(vault.decrypt(truncated), Err(VaultError::Decryption { .. })));

    let mut extended = bytes.clone();
    extended.push(0);
    assert!(matches!(vault.decrypt(&extended), Err(VaultError::Decryption { .. })));

    assert!(matches!(vault.decrypt(Vec::<u8>::new()), Err(VaultError::Decryption { .. })));
}

#[test]
fn test_wrong_key_fails() {
    let envelope = setup_vault().encrypt("abc123").unwrap();
    let other = Vault::<Aes>::builder().key(&[0u8; 32]).build().unwrap();

    assert!(matches!(other.decrypt(&envelope), Err(VaultError::Decryption { .. })));
}

#[test]
fn test_stored_text_tamper_fails() {
    let pipeline = setup_pipeline();
    let stored = pipeline.seal_text("abc123").unwrap();

    let mut bytes = STANDARD.decode(&stored).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x80;
    let forged = STANDARD.encode(Envelope::parse(bytes).unwrap().into_bytes());

    assert!(matches!(pipeline.open_text(&forged), Err(VaultError::Decryption { .. })));
}

#[test]
fn test_stored_text_never_contains_plaintext() {
    let pipeline = setup_pipeline();
    let stored = pipeline.seal_text("super-secret-token").unwrap();

    assert!(!stored.contains("super-secret-token"));
    assert!(Envelope::parse(STANDARD.decode(&stored).unwrap()).is_ok());
}
