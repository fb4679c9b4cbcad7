use sbox_kernel::{DEFAULT_ID_LEN, SAFE_ALPHABET, safe_nanoid};

#[test]
fn generates_expected_length_and_charset() {
    let id = safe_nanoid!();
    assert_eq!(id.len(), DEFAULT_ID_LEN);

    for ch in id.chars() {
        assert!(SAFE_ALPHABET.contains(&ch), "unexpected character in nanoid: {ch}");
    }
}

#[test]
fn custom_length() {
    let id = safe_nanoid!(8);
    assert_eq!(id.len(), 8);
}

#[test]
fn ids_do_not_repeat() {
    let ids: std::collections::HashSet<String> = (0..1000).map(|_| safe_nanoid!()).collect();
    assert_eq!(ids.len(), 1000);
}

#[test]
fn length_from_a_constant_expression() {
    let id = safe_nanoid!(DEFAULT_ID_LEN * 2);
    assert_eq!(id.len(), 2 * DEFAULT_ID_LEN);
}
