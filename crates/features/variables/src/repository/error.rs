use sbox_storage::StorageError;
use std::borrow::Cow;

/// A specialized [`RepositoryError`] enum of the persistence port.
#[sbox_derive::sbox_error]
pub enum RepositoryError {
    /// A save would create a second live record for a name or revive a tombstone.
    #[error("Write conflict{}: {message}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Storage failure{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    /// A stored document could not be decoded.
    #[error("Corrupted document{}: {source}", format_context(.context))]
    Corrupted { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Internal repository error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl RepositoryError {
    pub(crate) fn conflict(message: &'static str, name: &str) -> Self {
        Self::Conflict { message: message.into(), context: Some(format!("variable {name}").into()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_names_the_variable() {
        let err = RepositoryError::conflict("Variable already exists", "TOKEN");
        assert_eq!(err.to_string(), "Write conflict (variable TOKEN): Variable already exists");
    }

    #[test]
    fn test_corrupted_documents_keep_their_cause() {
        let cause = serde_json::from_slice::<serde_json::Value>(b"{").unwrap_err();
        let err = Err::<(), _>(cause).context("owner proj-1").unwrap_err();
        assert!(matches!(err, RepositoryError::Corrupted { .. }));
        assert!(err.to_string().starts_with("Corrupted document (owner proj-1)"));
    }
}
