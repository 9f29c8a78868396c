use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use super::CartStore;
use crate::error::StoreError;

/// Keeps each key in its own file under a directory.
///
/// Writes land in a temporary file first and are then renamed over the
/// target, so a reader sees either the old value or the new one.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys such as `@BinaryShoes:cart` are not valid file names everywhere.
    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl CartStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(value.as_bytes())?;
        staged.as_file().sync_all()?;
        staged.persist(&path).map_err(|e| e.error)?;
        debug!(path = %path.display(), "Stored");
        Ok(())
    }
}
