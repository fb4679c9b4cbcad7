//! Persistence port of the variable store and its two backends.
//!
//! Backends share one set of save rules ([`apply_save`]):
//! * a record is addressed by its full key (`id`, `owner_id`), never by `id` alone;
//! * an owner has at most one live record per name;
//! * a tombstoned record is never written again.

mod error;
mod file;
mod memory;

pub use error::{RepositoryError, RepositoryErrorExt};
pub use file::FileRepository;
pub use memory::MemoryRepository;

use crate::filter::VariableFilter;
use crate::model::VariableRecord;
use std::future::Future;

/// Row-oriented access to variable records.
pub trait VariableRepository: Send + Sync {
    /// The first record matching `filter`, in insertion order.
    fn find_one(
        &self,
        filter: &VariableFilter,
    ) -> impl Future<Output = Result<Option<VariableRecord>, RepositoryError>> + Send;

    /// Every record matching `filter`, in insertion order.
    fn find(
        &self,
        filter: &VariableFilter,
    ) -> impl Future<Output = Result<Vec<VariableRecord>, RepositoryError>> + Send;

    fn count(
        &self,
        filter: &VariableFilter,
    ) -> impl Future<Output = Result<usize, RepositoryError>> + Send;

    /// Inserts or replaces the record stored under `record.key()`.
    ///
    /// # Errors
    /// [`RepositoryError::Conflict`] when the write would leave two live records with the same
    /// name for one owner, or would modify a tombstoned record.
    fn save(&self, record: &VariableRecord)
    -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Applies an upsert to the rows of one or more owners.
pub(crate) fn apply_save(
    rows: &mut Vec<VariableRecord>,
    record: &VariableRecord,
) -> Result<(), RepositoryError> {
    let key = record.key();
    let position = rows.iter().position(|row| row.has_key(&key));

    if let Some(existing) = position.map(|i| &rows[i])
        && existing.deleted
    {
        if existing == record {
            return Ok(());
        }
        return Err(RepositoryError::conflict("Variable was deleted", &record.name));
    }

    if record.is_live()
        && rows.iter().any(|row| {
            row.is_live()
                && row.owner_id == record.owner_id
                && row.name == record.name
                && !row.has_key(&key)
        })
    {
        return Err(RepositoryError::conflict("Variable already exists", &record.name));
    }

    match position {
        Some(i) => rows[i] = record.clone(),
        None => rows.push(record.clone()),
    }
    Ok(())
}
