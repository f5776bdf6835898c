use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Key under which the whole session blob is stored.
pub const SESSION_KEY: &str = "rpgGameState";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no data directory available")]
    NoDataDir,
}

/// Minimal key-value storage for serialized session blobs.
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, blob: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key inside a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// `<data_dir>/solo_text_rpg`
    pub fn open_default() -> Result<Self, StoreError> {
        let mut dir = dirs::data_dir().ok_or(StoreError::NoDataDir)?;
        dir.push("solo_text_rpg");
        Self::new(dir)
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        // rename replaces the previous blob in one step
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, blob)?;
        fs::rename(tmp, self.path(key))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
