use super::{VariableRepository, apply_save};
use super::error::{RepositoryError, RepositoryErrorExt};
use crate::filter::VariableFilter;
use crate::model::{OwnerId, VariableRecord};
use sbox_domain::constants::VARIABLES_COLLECTION;
use sbox_storage::{Collection, Storage};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Number of owner lock stripes.
const LOCK_STRIPES: usize = 64;

/// Repository persisting one JSON document per owner in the `variables` collection.
///
/// A save holds the owner's document lock from load to write, so saves through any repository
/// on the same data directory are serialized. Saves within one repository queue on a striped
/// async lock first and do not park worker threads. Documents are replaced atomically, so
/// readers never observe a partial write.
#[derive(Debug, Clone)]
pub struct FileRepository {
    collection: Collection,
    locks: Arc<[Mutex<()>]>,
}

impl FileRepository {
    /// # Errors
    /// Returns [`RepositoryError::Storage`] if the collection cannot be opened.
    pub fn new(storage: &Storage) -> Result<Self, RepositoryError> {
        let collection = storage.collection(VARIABLES_COLLECTION)?;
        let locks = (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect();
        Ok(Self { collection, locks })
    }

    fn lock_for(&self, owner_id: &OwnerId) -> &Mutex<()> {
        &self.locks[fxhash::hash(owner_id.as_str()) % self.locks.len()]
    }

    async fn load(&self, owner_id: &OwnerId) -> Result<Vec<VariableRecord>, RepositoryError> {
        let Some(bytes) = self.collection.read(owner_id.as_str()).await? else {
            return Ok(Vec::new());
        };
        let rows: Vec<VariableRecord> = serde_json::from_slice(&bytes)
            .context(format!("Decoding variables of owner {owner_id}"))?;

        if rows.iter().any(|row| row.owner_id != *owner_id) {
            return Err(RepositoryError::Internal {
                message: "Document contains records of another owner".into(),
                context: Some(format!("owner {owner_id}").into()),
            });
        }
        Ok(rows)
    }
}

impl VariableRepository for FileRepository {
    async fn find_one(
        &self,
        filter: &VariableFilter,
    ) -> Result<Option<VariableRecord>, RepositoryError> {
        let rows = self.load(filter.owner_id()).await?;
        Ok(rows.into_iter().find(|row| filter.matches(row)))
    }

    async fn find(&self, filter: &VariableFilter) -> Result<Vec<VariableRecord>, RepositoryError> {
        let rows = self.load(filter.owner_id()).await?;
        Ok(rows.into_iter().filter(|row| filter.matches(row)).collect())
    }

    async fn count(&self, filter: &VariableFilter) -> Result<usize, RepositoryError> {
        let rows = self.load(filter.owner_id()).await?;
        Ok(rows.iter().filter(|row| filter.matches(row)).count())
    }

    async fn save(&self, record: &VariableRecord) -> Result<(), RepositoryError> {
        let owner_id = &record.owner_id;
        let _guard = self.lock_for(owner_id).lock().await;
        let _document = self.collection.lock(owner_id.as_str()).await?;

        let mut rows = self.load(owner_id).await?;
        apply_save(&mut rows, record)?;

        let bytes = serde_json::to_vec(&rows).map_err(|e| RepositoryError::Internal {
            message: e.to_string().into(),
            context: Some("Encoding variables".into()),
        })?;
        self.collection.write(owner_id.as_str(), &bytes).await?;

        debug!(owner = %owner_id, id = %record.id, rows = rows.len(), "Document saved");
        Ok(())
    }
}
