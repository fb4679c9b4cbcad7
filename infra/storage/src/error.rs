use std::borrow::Cow;

/// A specialized [`StorageError`] enum of this crate.
#[sbox_derive::sbox_error]
pub enum StorageError {
    #[error("Invalid name{}: {message}", format_context(.context))]
    InvalidName { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Hardware I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Decompression failure{}: {source}", format_context(.context))]
    Decompress { source: lz4_flex::block::DecompressError, context: Option<Cow<'static, str>> },

    #[error("Internal storage error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl StorageError {
    pub(crate) fn invalid_name(name: &str, reason: &'static str) -> Self {
        Self::InvalidName { message: format!("{name:?}").into(), context: Some(reason.into()) }
    }
}
