//! Storage backends
//!
//! The comment store talks to a [`Storage`] capability rather than probing its
//! environment. `Storage::Available` wraps any [`KeyValueStore`];
//! `Storage::Unavailable` reads as empty and swallows writes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use super::error::StorageResult;

/// Longest encoded key used verbatim as a file name. Leaves room for the
/// `.json.tmp` suffix under the common 255-byte file name limit.
const MAX_ENCODED_KEY_LEN: usize = 200;

/// Encoded-key prefix kept in front of the hash for over-long keys
const HASHED_KEY_PREFIX_LEN: usize = 120;

/// Minimal string key-value interface, shaped like browser local storage
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the value stored under `key`
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// Injected persistence capability
pub enum Storage {
    /// Reads and writes go to a real store
    Available(Box<dyn KeyValueStore>),
    /// No backend in this context: reads are empty, writes are no-ops
    Unavailable,
}

impl Storage {
    /// Wrap a concrete backend
    pub fn available(store: impl KeyValueStore + 'static) -> Self {
        Storage::Available(Box::new(store))
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Storage::Available(_))
    }

    pub fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        match self {
            Storage::Available(store) => store.get_item(key),
            Storage::Unavailable => Ok(None),
        }
    }

    pub fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        match self {
            Storage::Available(store) => store.set_item(key, value),
            Storage::Unavailable => Ok(()),
        }
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Storage::Available(_) => write!(f, "Storage::Available"),
            Storage::Unavailable => write!(f, "Storage::Unavailable"),
        }
    }
}

/// In-process store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed store: one file per key
///
/// Keys are percent-encoded into file names, so any post identifier maps to a
/// single file inside `data_dir`. Keys whose encoding is too long for a file
/// name become a truncated prefix plus `%%` and the BLAKE3 hash of the full
/// key; percent-encoding never emits `%%`, so the two forms cannot collide.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed
    pub fn open(data_dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File path holding the value for `key`
    pub fn item_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", file_stem(key)))
    }
}

/// File name (without extension) for a storage key
fn file_stem(key: &str) -> String {
    let encoded = urlencoding::encode(key);
    if encoded.len() <= MAX_ENCODED_KEY_LEN {
        return encoded.into_owned();
    }

    // Encoded output is ASCII, so any byte index is a char boundary
    format!(
        "{}%%{}",
        &encoded[..HASHED_KEY_PREFIX_LEN],
        blake3::hash(key.as_bytes()).to_hex()
    )
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        match std::fs::read_to_string(self.item_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.item_path(key);
        let tmp_path = path.with_extension("json.tmp");

        // Readers only ever see the old or the new blob
        std::fs::write(&tmp_path, value)?;
        std::fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}
