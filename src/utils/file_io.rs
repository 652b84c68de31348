use std::fs::create_dir_all;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::error;

use crate::constants::TEMP_FILE_SUFFIX;
use crate::StorageError;

fn path_error(
    path: &Path,
    source: std::io::Error,
) -> StorageError {
    StorageError::PathError {
        path: path.to_path_buf(),
        source,
    }
}

pub fn create_parent_dir_if_not_exist(path: &Path) -> std::result::Result<(), StorageError> {
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            if let Err(e) = create_dir_all(parent_dir) {
                error!("Failed to create directory {:?}: {:?}", parent_dir, e);
                return Err(path_error(parent_dir, e));
            }
            debug!("created directory: {:?}", parent_dir);
        }
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(TEMP_FILE_SUFFIX);
    path.with_file_name(name)
}

/// Replaces the content of `path` so that readers observe either the old or
/// the new bytes, never a partial write.
///
/// The bytes go to a sibling temp file which is fsynced and then renamed
/// over the target.
pub fn write_atomically(
    path: &Path,
    bytes: &[u8],
) -> std::result::Result<(), StorageError> {
    create_parent_dir_if_not_exist(path)?;

    let tmp_path = temp_path_for(path);
    let write_tmp = || -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()
    };
    if let Err(e) = write_tmp() {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(path_error(&tmp_path, e));
    }

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        path_error(path, e)
    })?;

    // Persist the rename itself
    #[cfg(unix)]
    {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }
    }
    Ok(())
}

/// Reads the whole file, `None` when it does not exist
pub fn read_if_exists(path: &Path) -> std::result::Result<Option<Vec<u8>>, StorageError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(path_error(path, e)),
    }
}

/// Removes the file; a missing file counts as success
pub fn remove_if_exists(path: &Path) -> std::result::Result<(), StorageError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(path_error(path, e)),
    }
}
