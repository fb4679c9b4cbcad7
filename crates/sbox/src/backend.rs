use sbox_variables::{
    FileRepository, MemoryRepository, RepositoryError, VariableFilter, VariableRecord,
    VariableRepository,
};

/// The repository selected by [`sbox_domain::config::StorageBackend`].
#[derive(Debug, Clone)]
pub enum Backend {
    Memory(MemoryRepository),
    File(FileRepository),
}

impl Backend {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::File(_) => "file",
        }
    }
}

impl VariableRepository for Backend {
    async fn find_one(
        &self,
        filter: &VariableFilter,
    ) -> Result<Option<VariableRecord>, RepositoryError> {
        match self {
            Self::Memory(repo) => repo.find_one(filter).await,
            Self::File(repo) => repo.find_one(filter).await,
        }
    }

    async fn find(&self, filter: &VariableFilter) -> Result<Vec<VariableRecord>, RepositoryError> {
        match self {
            Self::Memory(repo) => repo.find(filter).await,
            Self::File(repo) => repo.find(filter).await,
        }
    }

    async fn count(&self, filter: &VariableFilter) -> Result<usize, RepositoryError> {
        match self {
            Self::Memory(repo) => repo.count(filter).await,
            Self::File(repo) => repo.count(filter).await,
        }
    }

    async fn save(&self, record: &VariableRecord) -> Result<(), RepositoryError> {
        match self {
            Self::Memory(repo) => repo.save(record).await,
            Self::File(repo) => repo.save(record).await,
        }
    }
}
