//! Sandboxed document storage on the local filesystem.
//!
//! # Core Features
//!
//! - **Collections**: Documents are grouped in named collections and addressed by string keys.
//!   Keys are hex-encoded into file names, so no caller input ever becomes a raw path segment.
//! - **Atomic Writes**: Unique temp write + `fsync` + `rename` + directory sync. A crash leaves
//!   either the previous or the new document, never a torn one.
//! - **Transparent Compression**: Optional LZ4 block compression, invisible to the consumer.
//! - **Self-Healing**: Orphaned temporary files are removed when the storage connects.
//!
//! - **Document Locks**: [`Collection::lock`] takes an OS advisory lock per document, shared by
//!   every handle and process on the same root. Writes themselves do not lock, so a
//!   read-modify-write must run under the document lock.

mod builder;
mod collection;
mod engine;
mod error;
mod maintenance;

pub use builder::StorageBuilder;
pub use collection::{Collection, CollectionName, MAX_KEY_LEN};
pub use engine::{Compression, DocumentLock, Storage};
pub use error::{StorageError, StorageErrorExt};
