use crate::repository::RepositoryError;
use sbox_kernel::censor::CensorError;
use sbox_kernel::security::ResourceGuardError;
use sbox_vault::VaultError;
use std::borrow::Cow;

/// A specialized [`VariableError`] enum of the variable store.
#[sbox_derive::sbox_error]
pub enum VariableError {
    /// No live variable with the requested name exists for the owner.
    #[error("Variable not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A stored value failed authentication or could not be decoded.
    #[error("Variable decryption failed{}: {source}", format_context(.context))]
    Decryption { source: VaultError, context: Option<Cow<'static, str>> },

    #[error("Variable encryption failed{}: {source}", format_context(.context))]
    Encryption { source: VaultError, context: Option<Cow<'static, str>> },

    #[error("Variable persistence failed{}: {source}", format_context(.context))]
    Persistence { source: RepositoryError, context: Option<Cow<'static, str>> },

    /// A concurrent writer won the race for the same variable.
    #[error("Variable conflict{}: {message}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid variable request{}: {source}", format_context(.context))]
    Validation { source: ResourceGuardError, context: Option<Cow<'static, str>> },

    #[error("Variable projection failed{}: {source}", format_context(.context))]
    Projection { source: CensorError, context: Option<Cow<'static, str>> },

    #[error("Internal variable error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl VariableError {
    pub(crate) fn not_found(name: &str) -> Self {
        Self::NotFound { message: name.to_owned().into(), context: None }
    }

    /// Converts a repository failure, keeping write conflicts distinguishable.
    pub(crate) fn from_repository(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict { message, context } => Self::Conflict { message, context },
            other => Self::Persistence { source: other, context: None },
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether the failure lies with the service rather than the request.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        !matches!(self, Self::NotFound { .. } | Self::Conflict { .. } | Self::Validation { .. })
    }
}
