use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;

use super::{validate_key, KeyValueStorage, StorageError};

const LOCK_FILE: &str = ".lock";
const VALUE_EXTENSION: &str = "dat";
/// Common `NAME_MAX` across Linux, macOS and Windows filesystems.
const MAX_FILE_NAME_LEN: usize = 255;

/// One file per key under a root directory.
///
/// Writes go to a temp file that is renamed over the target while an
/// exclusive lock on `<root>/.lock` is held, so readers only ever see a
/// complete value. All file I/O runs on the blocking pool.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        let file_name = format!("{}.{}", encode_file_name(key), VALUE_EXTENSION);
        if file_name.len() > MAX_FILE_NAME_LEN {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(file_name))
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key)?;
        let key = key.to_string();
        run_blocking(move || match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&key, &path, e)),
        })
        .await
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let root = self.root.clone();
        let key = key.to_string();
        run_blocking(move || {
            fs::create_dir_all(&root).map_err(|e| io_error(&key, &root, e))?;
            let lock = acquire_lock(&root, &key)?;
            let result = write_atomically(&root, &path, &value).map_err(|e| io_error(&key, &path, e));
            let _ = FileExt::unlock(&lock);
            result
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let root = self.root.clone();
        let key = key.to_string();
        run_blocking(move || {
            if !root.exists() {
                return Ok(());
            }
            let lock = acquire_lock(&root, &key)?;
            let result = match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(io_error(&key, &path, e)),
            };
            let _ = FileExt::unlock(&lock);
            result
        })
        .await
    }
}

async fn run_blocking<T, F>(job: F) -> Result<T, StorageError>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
}

fn acquire_lock(root: &Path, key: &str) -> Result<File, StorageError> {
    let lock_path = root.join(LOCK_FILE);
    let lock = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(|e| io_error(key, &lock_path, e))?;
    FileExt::lock_exclusive(&lock).map_err(|e| io_error(key, &lock_path, e))?;
    Ok(lock)
}

fn write_atomically(root: &Path, target: &Path, value: &[u8]) -> io::Result<()> {
    let tmp = root.join(format!(".{}.tmp", uuid::Uuid::new_v4()));
    let written = File::create(&tmp).and_then(|mut file| {
        file.write_all(value)?;
        file.sync_all()
    });
    if let Err(e) = written.and_then(|()| fs::rename(&tmp, target)) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

fn io_error(key: &str, path: &Path, source: io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        path: path.to_path_buf(),
        source,
    }
}

/// Maps a key to a file name. Bytes outside `[A-Za-z0-9_-]` (and `.` in
/// first position) become `%XX`, which keeps the mapping injective.
fn encode_file_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (i, byte) in key.bytes().enumerate() {
        let keep = byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' || (byte == b'.' && i > 0);
        if keep {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}
