//! Storage backends for the shortlink mapping store.
//!
//! [`SqliteMappingStore`] persists records in a local SQLite file and is the
//! backend used in production. [`InMemoryMappingStore`] keeps everything in
//! process memory and exists for tests and embedding.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryMappingStore;
pub use shortlink_core::{
    Alias, MappingStore, ReadStore, Result, StorageError, StoreError, Target, UrlRecord,
};
pub use sqlite::{SqliteMappingStore, SqliteStoreOptions, IN_MEMORY};
