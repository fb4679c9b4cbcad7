#![allow(unreachable_pub)]

//! # Strongbox macros
//!
//! Attribute macros used across the workspace. At the moment this is the error enum
//! generator every crate builds its failure type with.

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Turns a plain enum into a workspace error type.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless the enum already derives them.
/// * `<ErrorName>Ext` trait with `.context(...)`, implemented for `Result<T, ErrorName>` and
///   for `Result<T, Source>` of every variant carrying a source.
/// * `From<Source>` for every variant with a `source` field (or a field marked
///   `#[source]`/`#[from]`).
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }` variant
///   exists.
/// * A private `format_context` helper for `#[error(...)]` strings.
///
/// # Requirements
///
/// * Only enums with named-field variants are accepted.
/// * A `context` field must be typed `Option<Cow<'static, str>>`.
/// * Variants with a source must also carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use sbox_derive::sbox_error;
/// use std::borrow::Cow;
///
/// #[sbox_error]
/// pub enum StorageError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &std::path::Path) -> Result<Vec<u8>, StorageError> {
///     std::fs::read(path).context("Reading document")
/// }
/// ```
#[proc_macro_attribute]
pub fn sbox_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}
