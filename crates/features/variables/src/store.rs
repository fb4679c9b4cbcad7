use crate::error::VariableError;
use crate::filter::VariableFilter;
use crate::model::{OwnerId, RevealedVariable, VariableRecord};
use crate::repository::{RepositoryError, VariableRepository};
use sbox_domain::constants::{VALUE_CONTEXT, VALUE_FIELD};
use sbox_kernel::censor::{Censored, censor_all};
use sbox_kernel::security::ResourceGuard;
use sbox_vault::Vault;
use sbox_vault::algorithms::VaultCipher;
use sbox_vault::transform::{Base64, Compression, Encrypted, Json, Pipeline};
use tracing::{debug, instrument, warn};
use zeroize::Zeroizing;

/// The transform chain variable values pass through on their way to storage:
/// JSON string, optional LZ4, authenticated encryption, base64.
#[must_use]
pub fn value_pipeline<C: VaultCipher>(vault: Vault<C>, compression: bool) -> Pipeline {
    let mut builder = Pipeline::builder().stage(Json);
    if compression {
        builder = builder.stage(Compression);
    }
    builder.stage(Encrypted::new(vault, VALUE_CONTEXT)).stage(Base64).build()
}

/// Encrypted key/value variables scoped to an owner.
///
/// The store keeps no state of its own: every call reads the repository, applies the change
/// and writes it back with a single keyed save. Callers are expected to have authorized the
/// owner id already.
#[derive(Debug, Clone)]
pub struct VariableStore<R> {
    repository: R,
    pipeline: Pipeline,
}

impl<R: VariableRepository> VariableStore<R> {
    #[must_use]
    pub const fn new(repository: R, pipeline: Pipeline) -> Self {
        Self { repository, pipeline }
    }

    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    /// Creates the variable or replaces the value of the live one.
    ///
    /// An existing variable keeps its id and creation time.
    ///
    /// # Errors
    /// * [`VariableError::Validation`] for a malformed owner id or name.
    /// * [`VariableError::Encryption`] if the value cannot be sealed.
    /// * [`VariableError::Conflict`] if a concurrent call created or deleted the variable first.
    /// * [`VariableError::Persistence`] on repository failures.
    #[instrument(skip(self, plaintext))]
    pub async fn set_variable(
        &self,
        owner_id: &str,
        name: &str,
        plaintext: &str,
    ) -> Result<(), VariableError> {
        let owner_id = OwnerId::try_from(owner_id)?;
        let name = ResourceGuard::variable_name(name)?;

        let sealed = self.pipeline.seal_text(plaintext).map_err(|source| {
            VariableError::Encryption { source, context: Some(format!("variable {name}").into()) }
        })?;

        let filter = VariableFilter::owner(&owner_id).name(name).live();
        let record = match self.repository.find_one(&filter).await.map_err(persistence)? {
            Some(mut existing) => {
                ensure_owner(&existing, &owner_id)?;
                existing.value = sealed;
                existing
            },
            None => VariableRecord::new(owner_id, name, sealed),
        };

        self.repository.save(&record).await.map_err(persistence)?;
        debug!(id = %record.id, "Variable stored");
        Ok(())
    }

    /// Live variables of an owner in insertion order, without their values.
    ///
    /// # Errors
    /// [`VariableError::Validation`] for a malformed owner id, [`VariableError::Persistence`]
    /// on repository failures.
    #[instrument(skip(self))]
    pub async fn list_variables(&self, owner_id: &str) -> Result<Vec<Censored>, VariableError> {
        let owner_id = OwnerId::try_from(owner_id)?;
        let records = self
            .repository
            .find(&VariableFilter::owner(&owner_id).live())
            .await
            .map_err(persistence)?;

        censor_all(&records, VALUE_FIELD).map_err(VariableError::from)
    }

    /// Tombstones the live variable. The record stays in the repository with `deleted` set.
    ///
    /// # Errors
    /// [`VariableError::NotFound`] if there is no live variable with this name, including when
    /// it was already deleted.
    #[instrument(skip(self))]
    pub async fn delete_variable(&self, owner_id: &str, name: &str) -> Result<(), VariableError> {
        let owner_id = OwnerId::try_from(owner_id)?;
        let mut record = self.resolve(&owner_id, name).await?;

        record.deleted = true;
        self.repository.save(&record).await.map_err(persistence)?;
        debug!(id = %record.id, "Variable deleted");
        Ok(())
    }

    /// Decrypts the value of one live variable.
    ///
    /// # Errors
    /// [`VariableError::NotFound`] if absent, [`VariableError::Decryption`] if the stored value
    /// fails verification.
    #[instrument(skip(self))]
    pub async fn reveal(
        &self,
        owner_id: &str,
        name: &str,
    ) -> Result<Zeroizing<String>, VariableError> {
        let owner_id = OwnerId::try_from(owner_id)?;
        let record = self.resolve(&owner_id, name).await?;
        self.open(&record)
    }

    /// Decrypts every live variable of an owner, in insertion order.
    ///
    /// # Errors
    /// Fails as a whole with [`VariableError::Decryption`] if any value fails verification.
    #[instrument(skip(self))]
    pub async fn reveal_all(&self, owner_id: &str) -> Result<Vec<RevealedVariable>, VariableError> {
        let owner_id = OwnerId::try_from(owner_id)?;
        let records = self
            .repository
            .find(&VariableFilter::owner(&owner_id).live())
            .await
            .map_err(persistence)?;

        records
            .into_iter()
            .map(|record| {
                let value = self.open(&record)?;
                Ok::<_, VariableError>(RevealedVariable { name: record.name, value })
            })
            .collect()
    }

    /// Number of live variables of an owner.
    ///
    /// # Errors
    /// [`VariableError::Validation`] for a malformed owner id, [`VariableError::Persistence`]
    /// on repository failures.
    #[instrument(skip(self))]
    pub async fn count_variables(&self, owner_id: &str) -> Result<usize, VariableError> {
        let owner_id = OwnerId::try_from(owner_id)?;
        self.repository.count(&VariableFilter::owner(&owner_id).live()).await.map_err(persistence)
    }

    async fn resolve(
        &self,
        owner_id: &OwnerId,
        name: &str,
    ) -> Result<VariableRecord, VariableError> {
        let name = ResourceGuard::variable_name(name)?;
        let filter = VariableFilter::owner(owner_id).name(name).live();

        let record = self
            .repository
            .find_one(&filter)
            .await
            .map_err(persistence)?
            .ok_or_else(|| VariableError::not_found(name))?;
        ensure_owner(&record, owner_id)?;
        Ok(record)
    }

    fn open(&self, record: &VariableRecord) -> Result<Zeroizing<String>, VariableError> {
        self.pipeline.open_text(&record.value).map_err(|source| {
            warn!(id = %record.id, "Stored value failed verification");
            VariableError::Decryption {
                source,
                context: Some(format!("variable {}", record.name).into()),
            }
        })
    }
}

fn ensure_owner(record: &VariableRecord, owner_id: &OwnerId) -> Result<(), VariableError> {
    if record.owner_id == *owner_id {
        return Ok(());
    }
    Err(VariableError::Internal {
        message: "Repository returned a record of another owner".into(),
        context: Some(format!("id {}", record.id).into()),
    })
}

fn persistence(err: RepositoryError) -> VariableError {
    let err = VariableError::from_repository(err);
    if let VariableError::Conflict { message, .. } = &err {
        warn!(reason = %message, "Write conflict");
    }
    err
}
