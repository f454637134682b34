use crate::alias::Alias;
use crate::error::{Result, StoreError};
use crate::record::UrlRecord;
use crate::target::Target;
use async_trait::async_trait;

/// A read-only view of a mapping store.
///
/// Handlers that only resolve aliases should depend on this trait rather
/// than on [`MappingStore`].
#[async_trait]
pub trait ReadStore: Send + Sync + 'static {
    /// Retrieves the record stored under `alias`.
    /// Returns `None` if the alias does not exist.
    async fn get(&self, alias: &Alias) -> Result<Option<UrlRecord>>;

    /// Checks whether `alias` is taken.
    async fn exists(&self, alias: &Alias) -> Result<bool>;

    /// Returns every record, ordered by id.
    async fn list(&self) -> Result<Vec<UrlRecord>>;

    /// Resolves a raw alias to its target.
    ///
    /// Fails with [`StoreError::Validation`] if `alias` is not a valid alias
    /// and with [`StoreError::NotFound`] if nothing is stored under it.
    async fn lookup(&self, alias: &str) -> Result<String> {
        let alias = Alias::new(alias)?;
        self.get(&alias)
            .await?
            .map(|record| record.target)
            .ok_or_else(|| StoreError::NotFound(alias.to_string()))
    }
}

#[async_trait]
pub trait MappingStore: ReadStore {
    /// Ensures the schema exists. Safe to call any number of times, also
    /// concurrently from several handles on the same database.
    async fn initialize(&self) -> Result<()>;

    /// Inserts a new record and returns its id.
    /// Returns `Err(DuplicateAlias)` if the alias already exists.
    async fn insert(&self, alias: &Alias, target: &Target) -> Result<i64>;

    /// Deletes the record stored under `alias`.
    /// Returns `true` if the record existed and was removed.
    async fn delete(&self, alias: &Alias) -> Result<bool>;

    /// Validates raw input and inserts it.
    ///
    /// Fails with [`StoreError::Validation`] if either value is empty or the
    /// alias is malformed, and with [`StoreError::DuplicateAlias`] if the
    /// alias is taken.
    async fn create(&self, alias: &str, target: &str) -> Result<i64> {
        let alias = Alias::new(alias)?;
        let target = Target::new(target)?;
        self.insert(&alias, &target).await
    }
}
