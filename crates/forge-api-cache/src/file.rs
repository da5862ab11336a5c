//! File-backed cache store
//!
//! Layout on disk:
//!
//! ```text
//! <dir>/index.json              uri -> { etag, body_file, stored_at }
//! <dir>/bodies/<sha256>.json    one response body per stored entry
//! ```
//!
//! Every store writes its body to a fresh file and only then points the
//! index at it, so an index entry never names a body from another write.
//! The replaced body file is removed afterwards.
//!
//! Bodies live apart from the index, so a body can disappear (cleanup
//! tools, manual deletion) while its validator survives. Such entries are
//! reported as [`CacheLookup::EtagOnly`].

use crate::{CacheEntry, CacheError, CacheLookup, ResourceCacheStore, Result};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

const INDEX_FILE: &str = "index.json";
const BODIES_DIR: &str = "bodies";
const INDEX_VERSION: u32 = 1;
/// Lookups re-read the index this often when a body was replaced under them
const LOOKUP_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    etag: String,
    body_file: String,
    stored_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    version: u32,
    #[serde(default)]
    entries: HashMap<String, IndexEntry>,
}

/// Cache store persisted in a directory
///
/// The index is loaded once on [`FileCacheStore::open`] and rewritten
/// atomically (temp file + rename) on every store. Writers are serialized;
/// readers only take the index read lock. The in-memory index changes only
/// after the new index reached the disk, so a failed store leaves both
/// unchanged.
#[derive(Debug)]
pub struct FileCacheStore {
    dir: PathBuf,
    index: RwLock<HashMap<String, IndexEntry>>,
    write_lock: Mutex<()>,
    sequence: AtomicU64,
}

impl FileCacheStore {
    /// Open (or create) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let bodies = dir.join(BODIES_DIR);
        fs::create_dir_all(&bodies).map_err(|e| CacheError::io(&bodies, e))?;

        let index_path = dir.join(INDEX_FILE);
        let entries = match fs::read_to_string(&index_path) {
            Ok(content) => parse_index(&index_path, &content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(CacheError::io(&index_path, e)),
        };

        info!(
            "Opened file cache at {} ({} entries)",
            dir.display(),
            entries.len()
        );

        Ok(Self {
            dir,
            index: RwLock::new(entries),
            write_lock: Mutex::new(()),
            sequence: AtomicU64::new(0),
        })
    }

    /// Directory this store lives in
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    /// When the entry for `uri` was last written
    pub fn stored_at(&self, uri: &str) -> Option<DateTime<Utc>> {
        self.index.read().get(uri).map(|e| e.stored_at)
    }

    fn body_path(&self, body_file: &str) -> PathBuf {
        self.dir.join(BODIES_DIR).join(body_file)
    }

    fn persist_index(&self, entries: &HashMap<String, IndexEntry>) -> Result<()> {
        let index = IndexFile {
            version: INDEX_VERSION,
            entries: entries.clone(),
        };
        let json = serde_json::to_string_pretty(&index)?;
        write_atomic(&self.dir.join(INDEX_FILE), &json)
    }
}

impl ResourceCacheStore for FileCacheStore {
    fn lookup(&self, uri: &str) -> Result<CacheLookup> {
        for _ in 0..LOOKUP_ATTEMPTS {
            let entry = match self.index.read().get(uri) {
                Some(entry) => entry.clone(),
                None => return Ok(CacheLookup::Miss),
            };

            let path = self.body_path(&entry.body_file);
            match fs::read_to_string(&path) {
                Ok(body) => {
                    return Ok(CacheLookup::Hit(CacheEntry {
                        etag: entry.etag,
                        body,
                    }));
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    let replaced = self
                        .index
                        .read()
                        .get(uri)
                        .is_some_and(|current| current.body_file != entry.body_file);
                    if replaced {
                        debug!("Entry for {} was replaced during lookup, retrying", uri);
                        continue;
                    }
                    debug!("Body file for {} is missing: {}", uri, path.display());
                    return Ok(CacheLookup::EtagOnly { etag: entry.etag });
                }
                Err(e) => return Err(CacheError::io(path, e)),
            }
        }

        // Writers kept replacing the entry; report the validator alone so
        // the caller refetches instead of pairing it with a foreign body
        let etag = self.index.read().get(uri).map(|e| e.etag.clone());
        Ok(etag.map_or(CacheLookup::Miss, |etag| CacheLookup::EtagOnly { etag }))
    }

    fn store(&self, uri: &str, etag: &str, body: &str) -> Result<()> {
        let _guard = self.write_lock.lock();

        let stored_at = Utc::now();
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let body_file = body_file_name(uri, etag, &stored_at, sequence);
        let body_path = self.body_path(&body_file);
        write_atomic(&body_path, body)?;

        let mut snapshot = self.index.read().clone();
        let previous = snapshot.insert(
            uri.to_string(),
            IndexEntry {
                etag: etag.to_string(),
                body_file,
                stored_at,
            },
        );

        if let Err(e) = self.persist_index(&snapshot) {
            let _ = fs::remove_file(&body_path);
            return Err(e);
        }
        *self.index.write() = snapshot;

        if let Some(previous) = previous {
            let old = self.body_path(&previous.body_file);
            if let Err(e) = fs::remove_file(&old) {
                if e.kind() != ErrorKind::NotFound {
                    warn!("Failed to remove replaced body {}: {}", old.display(), e);
                }
            }
        }

        debug!("Cached {} (etag {}) on disk", uri, etag);
        Ok(())
    }
}

fn parse_index(path: &Path, content: &str) -> Result<HashMap<String, IndexEntry>> {
    let index: IndexFile =
        serde_json::from_str(content).map_err(|e| CacheError::CorruptIndex {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if index.version != INDEX_VERSION {
        return Err(CacheError::CorruptIndex {
            path: path.to_path_buf(),
            reason: format!("unsupported index version {}", index.version),
        });
    }

    Ok(index.entries)
}

/// Body file name for one stored entry
///
/// Hex-encoded SHA-256 over the URI, the validator and a per-write nonce, so
/// two writes never share a file.
fn body_file_name(uri: &str, etag: &str, stored_at: &DateTime<Utc>, sequence: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(uri.as_bytes());
    hasher.update([0]);
    hasher.update(etag.as_bytes());
    hasher.update([0]);
    hasher.update(stored_at.to_rfc3339().as_bytes());
    hasher.update(sequence.to_le_bytes());
    format!("{}.json", hex::encode(hasher.finalize()))
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content).map_err(|e| CacheError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| CacheError::io(path, e))
}
