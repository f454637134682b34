use crate::{Result, TestInfraError};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct SqliteFileConfig {
    #[builder(default = "database.db".to_string(), setter(into))]
    file_name: String,
    /// Nested directory (relative to the temp root) the file lives in.
    /// It is not created, so stores get to exercise their own directory
    /// creation.
    #[builder(default, setter(strip_option, into))]
    subdirectory: Option<String>,
}

/// Test fixture for a database file inside a private temporary directory.
///
/// Nothing is created on disk except the directory; the whole tree is
/// removed when the fixture is dropped.
pub struct SqliteFile {
    dir: TempDir,
    path: PathBuf,
}

impl SqliteFile {
    pub fn new(config: SqliteFileConfig) -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("shortlink-").tempdir()?;

        let mut path = dir.path().to_path_buf();
        if let Some(subdirectory) = &config.subdirectory {
            path.push(subdirectory);
        }
        path.push(&config.file_name);

        Ok(Self { dir, path })
    }

    /// Path of the (possibly not yet existing) database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The database path as a string, for store options.
    pub fn database(&self) -> Result<String> {
        self.path
            .to_str()
            .map(str::to_owned)
            .ok_or_else(|| TestInfraError::NonUtf8Path(self.path.display().to_string()))
    }

    /// The temporary root directory.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Overwrites the database file with arbitrary bytes.
    pub fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_is_inside_temp_dir() {
        let file = SqliteFile::new(SqliteFileConfig::builder().build()).unwrap();
        assert!(file.path().starts_with(file.dir()));
        assert!(file.path().ends_with("database.db"));
        assert!(!file.path().exists());
    }

    #[test]
    fn subdirectory_is_not_created() {
        let file = SqliteFile::new(
            SqliteFileConfig::builder()
                .subdirectory("nested/deeper")
                .file_name("links.db")
                .build(),
        )
        .unwrap();

        assert!(file.path().ends_with("nested/deeper/links.db"));
        assert!(!file.dir().join("nested").exists());
    }

    #[test]
    fn directory_is_removed_on_drop() {
        let file = SqliteFile::new(SqliteFileConfig::builder().build()).unwrap();
        let dir = file.dir().to_path_buf();
        drop(file);
        assert!(!dir.exists());
    }
}
