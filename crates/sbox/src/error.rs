use sbox_storage::StorageError;
use sbox_variables::RepositoryError;
use sbox_vault::VaultError;
use std::borrow::Cow;

/// A specialized [`StrongboxError`] enum for bootstrapping a [`crate::Strongbox`].
#[sbox_derive::sbox_error]
pub enum StrongboxError {
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Vault setup failed{}: {source}", format_context(.context))]
    Vault { source: VaultError, context: Option<Cow<'static, str>> },

    #[error("Storage setup failed{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("Repository setup failed{}: {source}", format_context(.context))]
    Repository { source: RepositoryError, context: Option<Cow<'static, str>> },

    #[error("Internal bootstrap error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
