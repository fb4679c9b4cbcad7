use super::{VariableRepository, apply_save};
use super::error::RepositoryError;
use crate::filter::VariableFilter;
use crate::model::VariableRecord;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Process-local repository. Contents are lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    rows: Arc<RwLock<Vec<VariableRecord>>>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl VariableRepository for MemoryRepository {
    async fn find_one(
        &self,
        filter: &VariableFilter,
    ) -> Result<Option<VariableRecord>, RepositoryError> {
        Ok(self.rows.read().iter().find(|row| filter.matches(row)).cloned())
    }

    async fn find(&self, filter: &VariableFilter) -> Result<Vec<VariableRecord>, RepositoryError> {
        Ok(self.rows.read().iter().filter(|row| filter.matches(row)).cloned().collect())
    }

    async fn count(&self, filter: &VariableFilter) -> Result<usize, RepositoryError> {
        Ok(self.rows.read().iter().filter(|row| filter.matches(row)).count())
    }

    async fn save(&self, record: &VariableRecord) -> Result<(), RepositoryError> {
        apply_save(&mut self.rows.write(), record)?;
        debug!(owner = %record.owner_id, id = %record.id, deleted = record.deleted, "Record saved");
        Ok(())
    }
}
