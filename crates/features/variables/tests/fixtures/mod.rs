#![allow(dead_code)]

use sbox_storage::{Compression, Storage};
use sbox_variables::*;
use sbox_vault::prelude::{Aes, Pipeline, Vault};
use std::path::Path;

pub fn pipeline_with_key(key: u8) -> Pipeline {
    let vault = Vault::<Aes>::builder().key(&[key; 32]).build().expect("Vault setup failed");
    value_pipeline(vault, false)
}

pub fn memory_store() -> VariableStore<MemoryRepository> {
    VariableStore::new(MemoryRepository::new(), pipeline_with_key(7))
}

pub async fn file_store(root: &Path, compression: Compression) -> VariableStore<FileRepository> {
    let storage = Storage::builder(root)
        .compression(compression)
        .connect()
        .await
        .expect("Storage setup failed");
    let repository = FileRepository::new(&storage).expect("Repository setup failed");
    VariableStore::new(repository, pipeline_with_key(7))
}

pub fn owner(id: &str) -> OwnerId {
    OwnerId::try_from(id).expect("valid owner id")
}

/// Every record of an owner, tombstones included.
pub async fn all_rows<R: VariableRepository>(repository: &R, owner_id: &str) -> Vec<VariableRecord> {
    repository.find(&VariableFilter::owner(&owner(owner_id))).await.expect("find failed")
}

pub async fn live_row<R: VariableRepository>(
    repository: &R,
    owner_id: &str,
    name: &str,
) -> Option<VariableRecord> {
    let filter = VariableFilter::owner(&owner(owner_id)).name(name).live();
    repository.find_one(&filter).await.expect("find_one failed")
}
