use crate::error::{LostFoundError, Result};
use crate::model::Item;
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Fixed key the item collection is stored under.
pub const STORAGE_KEY: &str = "lostFoundItems";

/// The whole item array as one JSON document, one file per key.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", STORAGE_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Runs `f` while holding an exclusive lock on a sidecar `.lock` file.
    pub fn with_lock<T, F>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        let lock_path = path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        lock_file.lock_exclusive()?;
        let result = f();
        let _ = FileExt::unlock(&lock_file);
        result
    }

    /// Missing or empty file is an empty store; unparsable content is an error.
    fn load_internal(&self) -> Result<Vec<Item>> {
        if !self.path.exists() {
            return Ok(vec![]);
        }
        let json = fs::read_to_string(&self.path)?;
        if json.trim().is_empty() {
            return Ok(vec![]);
        }
        serde_json::from_str(&json).map_err(|e| {
            LostFoundError::Persistence(format!("{} is corrupt: {}", self.path.display(), e))
        })
    }

    fn save_internal(&self, items: &[Item]) -> Result<()> {
        let json = serde_json::to_string_pretty(items)?;
        Self::atomic_write(&self.path, json)
    }

    pub fn load(&self) -> Result<Vec<Item>> {
        Self::with_lock(&self.path, || self.load_internal())
    }

    pub fn save(&self, items: &[Item]) -> Result<()> {
        Self::with_lock(&self.path, || self.save_internal(items))
    }

    /// Transactional modification of the stored array.
    /// Locks -> Loads -> Applies Closure -> Saves (only if the closure succeeded) -> Unlocks.
    pub fn modify<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Item>) -> Result<T>,
    {
        self.modify_if(|items| f(items).map(|out| (out, true)))
    }

    /// Like `modify`, but the closure says whether anything changed; the file is
    /// only rewritten when it did.
    pub fn modify_if<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Item>) -> Result<(T, bool)>,
    {
        Self::with_lock(&self.path, || {
            let mut items = self.load_internal()?;
            let (out, changed) = f(&mut items)?;
            if changed {
                self.save_internal(&items)?;
            }
            Ok(out)
        })
    }
}
