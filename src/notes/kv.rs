use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::PersistenceResult;

/// A string-keyed store of string values.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> PersistenceResult<()>;
    fn remove(&mut self, key: &str) -> PersistenceResult<()>;
}

/// Keeps values in memory only. Used on the web build and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PersistenceResult<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
        fs::create_dir_all(&self.dir)?;
        // Write then rename, so a crash never leaves a truncated file.
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(tmp, self.path(key))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PersistenceResult<()> {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
