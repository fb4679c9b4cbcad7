//! # Variables
//!
//! Per-owner secret variables (API tokens, database passwords) stored encrypted at rest.
//!
//! * [`VariableStore`] implements the operations: upsert, censored listing, tombstoning
//!   delete and explicit reveal.
//! * [`VariableRepository`] is the persistence port with a memory and a file backend.
//!
//! ```rust
//! use sbox_variables::{MemoryRepository, VariableStore, value_pipeline};
//! use sbox_vault::prelude::{Aes, Vault};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let vault = Vault::<Aes>::builder().key(&[7u8; 32]).build()?;
//! let store = VariableStore::new(MemoryRepository::new(), value_pipeline(vault, false));
//!
//! store.set_variable("proj-1", "TOKEN", "abc123").await?;
//!
//! let listed = store.list_variables("proj-1").await?;
//! assert_eq!(listed[0].get_str("name"), Some("TOKEN"));
//! assert!(!listed[0].contains("value"));
//! assert_eq!(store.reveal("proj-1", "TOKEN").await?.as_str(), "abc123");
//! # Ok(())
//! # }
//! ```

mod error;
mod filter;
mod model;
pub mod repository;
mod store;

pub use crate::error::{VariableError, VariableErrorExt};
pub use crate::filter::VariableFilter;
pub use crate::model::{OwnerId, RevealedVariable, VariableId, VariableKey, VariableRecord};
pub use crate::repository::{
    FileRepository, MemoryRepository, RepositoryError, RepositoryErrorExt, VariableRepository,
};
pub use crate::store::{VariableStore, value_pipeline};
pub use sbox_kernel::censor::Censored;
