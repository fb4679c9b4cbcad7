//! Kernel utilities shared across features.
//! Keep this crate lightweight: config loading, the censoring projection, identifier
//! generation and identifier validation.
//!
//! ## ID generation
//! Use `safe_nanoid!` for URL-safe, unambiguous IDs:
//! ```rust
//! # use sbox_kernel::safe_nanoid;
//! let id = safe_nanoid!();
//! assert_eq!(id.len(), 21);
//! ```
//!
//! ## Censoring
//! ```rust
//! # use sbox_kernel::censor::censor;
//! #[derive(serde::Serialize)]
//! struct Secret { name: &'static str, value: &'static str }
//!
//! let view = censor(&Secret { name: "TOKEN", value: "abc123" }, "value").unwrap();
//! assert!(view.contains("name"));
//! assert!(!view.contains("value"));
//! ```
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
pub mod censor;
pub mod security;

// Alphabet excludes visually ambiguous characters (I, O, l, 0, 1).
pub const SAFE_ALPHABET: &[char; 55] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f',
    'g', 'h', 'j', 'k', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Default identifier length. 21 symbols over a 55-letter alphabet is ~121 bits of entropy.
pub const DEFAULT_ID_LEN: usize = 21;

pub use nanoid::nanoid;
pub use sbox_domain as domain;

/// Generates an unambiguous `NanoID` (no visually confusing characters).
#[macro_export]
macro_rules! safe_nanoid {
    () => {
        $crate::nanoid!({ $crate::DEFAULT_ID_LEN }, $crate::SAFE_ALPHABET)
    };
    ($size:expr) => {
        $crate::nanoid!($size, $crate::SAFE_ALPHABET)
    };
}
