//! Directory-backed key-value store.
//!
//! Each key maps to one `<encoded-key>.json` file. Single writes go through a
//! temp file and `rename`, which is atomic on the platforms we deploy to.
//! Multi-key batches are first persisted to a journal file; the journal is
//! deleted once every operation has landed and replayed by [`FileStore::open`]
//! if a previous process died in between.

use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info, warn};

use super::{Batch, BatchOp, KeyValueStore, StoreError};

const VALUE_EXTENSION: &str = "json";

/// Persistent store rooted at a data directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// File name of the pending-batch journal inside the data directory.
    pub const JOURNAL_FILE: &'static str = "journal.pending";

    /// Open (creating if needed) a store in `dir`, replaying any leftover journal.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created or the
    /// journal cannot be replayed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let store = Self {
            dir,
            write_lock: Mutex::new(()),
        };
        store.recover()?;
        Ok(store)
    }

    /// The directory this store writes to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn journal_path(&self) -> PathBuf {
        self.dir.join(Self::JOURNAL_FILE)
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{VALUE_EXTENSION}", encode_key(key)))
    }

    fn recover(&self) -> Result<(), StoreError> {
        let path = self.journal_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Batch>(&raw) {
            Ok(batch) => {
                info!(ops = batch.len(), dir = %self.dir.display(), "Replaying storage journal");
                self.apply_ops(batch.ops())?;
            }
            Err(e) => {
                // The journal is written via rename, so a torn file means it
                // never became the committed batch.
                warn!(error = %e, "Discarding unreadable storage journal");
            }
        }

        fs::remove_file(&path)?;
        Ok(())
    }

    fn apply_ops(&self, ops: &[BatchOp]) -> Result<(), StoreError> {
        for op in ops {
            match op {
                BatchOp::Set { key, value } => {
                    write_atomic(&self.value_path(key), value.as_bytes())?;
                }
                BatchOp::Remove { key } => match fs::remove_file(self.value_path(key)) {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                },
            }
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.value_path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn apply(&self, batch: Batch) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;

        if batch.len() <= 1 {
            return self.apply_ops(batch.ops());
        }

        let journal = serde_json::to_vec(&batch)?;
        write_atomic(&self.journal_path(), &journal)?;
        debug!(ops = batch.len(), "Journaled storage batch");

        self.apply_ops(batch.ops())?;
        fs::remove_file(self.journal_path())?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(VALUE_EXTENSION) {
                continue;
            }
            if let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(decode_key)
            {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Write `bytes` to a sibling temp file, then rename it over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Percent-encode a key into a portable file stem.
///
/// ASCII alphanumerics, `-` and `_` pass through; every other byte becomes `%XX`.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

fn decode_key(stem: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(stem.len());
    let mut iter = stem.bytes();
    while let Some(byte) = iter.next() {
        if byte == b'%' {
            let hi = char::from(iter.next()?).to_digit(16)?;
            let lo = char::from(iter.next()?).to_digit(16)?;
            bytes.push(u8::try_from(hi * 16 + lo).ok()?);
        } else {
            bytes.push(byte);
        }
    }
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_key_encoding_roundtrip() {
        for key in ["omnicart_orders", "omnicart_cart_user@example.com", "a/b..c", "ü"] {
            let encoded = encode_key(key);
            assert!(!encoded.contains('/'));
            assert!(!encoded.contains('.'));
            assert_eq!(decode_key(&encoded).as_deref(), Some(key));
        }
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store.set("omnicart_ads", "[]".to_string()).unwrap();
        }
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("omnicart_ads").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.keys().unwrap(), vec!["omnicart_ads".to_string()]);
    }

    #[test]
    fn test_batch_leaves_no_journal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store
            .apply(Batch::new().set("a", "1").set("b", "2"))
            .unwrap();

        assert!(!dir.path().join(FileStore::JOURNAL_FILE).exists());
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_open_replays_pending_journal() {
        let dir = tempfile::tempdir().unwrap();
        let batch = Batch::new().set("orders", "[1]").set("shipments", "[1]");
        fs::write(
            dir.path().join(FileStore::JOURNAL_FILE),
            serde_json::to_vec(&batch).unwrap(),
        )
        .unwrap();

        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("orders").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.get("shipments").unwrap().as_deref(), Some("[1]"));
        assert!(!dir.path().join(FileStore::JOURNAL_FILE).exists());
    }

    #[test]
    fn test_open_discards_torn_journal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FileStore::JOURNAL_FILE), "{\"ops\": [").unwrap();

        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.keys().unwrap().is_empty());
        assert!(!dir.path().join(FileStore::JOURNAL_FILE).exists());
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.remove("nope").is_ok());
    }
}
