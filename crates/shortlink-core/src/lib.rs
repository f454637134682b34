//! Core types and traits for the shortlink mapping store.
//!
//! This crate provides the validated domain types, the error taxonomy and
//! the store traits shared by every storage backend.

pub mod alias;
pub mod error;
pub mod record;
pub mod store;
pub mod target;

pub use alias::Alias;
pub use error::{Result, StorageError, StoreError};
pub use record::UrlRecord;
pub use store::{MappingStore, ReadStore};
pub use target::Target;
