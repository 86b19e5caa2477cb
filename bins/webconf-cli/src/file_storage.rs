//! File-backed storage image.
//!
//! Emulates an EEPROM: the whole image is read into memory on open, writes go
//! to the in-memory copy and `commit` writes the file back.

use std::path::{Path, PathBuf};
use webconf_core::storage::{check_bounds, ERASED_BYTE};
use webconf_core::{ByteStorage, StorageError};

#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    data: Vec<u8>,
    dirty: bool,
}

impl FileStorage {
    /// Open the image at `path`, sized to `size` bytes.
    ///
    /// A missing file reads as erased storage. A shorter file is padded with
    /// erased bytes, a longer one is cut.
    pub fn open(path: impl AsRef<Path>, size: usize) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let mut data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(StorageError::Read(format!("{}: {}", path.display(), e))),
        };
        data.resize(size, ERASED_BYTE);

        Ok(Self {
            path,
            data,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteStorage for FileStorage {
    fn size(&self) -> usize {
        self.data.len()
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        check_bounds(offset, buf.len(), self.data.len())?;
        buf.copy_from_slice(&self.data[offset..offset + buf.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        check_bounds(offset, data.len(), self.data.len())?;
        self.data[offset..offset + data.len()].copy_from_slice(data);
        self.dirty = true;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        if !self.dirty {
            return Ok(());
        }
        std::fs::write(&self.path, &self.data)
            .map_err(|e| StorageError::Write(format!("{}: {}", self.path.display(), e)))?;
        self.dirty = false;
        tracing::debug!(path = %self.path.display(), bytes = self.data.len(), "Storage image written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("webconf-{}-{}.bin", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_is_erased() {
        let path = temp_path("missing");
        let _ = std::fs::remove_file(&path);

        let storage = FileStorage::open(&path, 8).unwrap();
        let mut buf = [0u8; 8];
        storage.read(0, &mut buf).unwrap();
        assert_eq!(buf, [ERASED_BYTE; 8]);
        assert!(!path.exists());
    }

    #[test]
    fn test_commit_persists_writes() {
        let path = temp_path("commit");
        let _ = std::fs::remove_file(&path);

        let mut storage = FileStorage::open(&path, 6).unwrap();
        storage.write(1, b"abc").unwrap();
        storage.commit().unwrap();

        let reopened = FileStorage::open(&path, 6).unwrap();
        let mut buf = [0u8; 3];
        reopened.read(1, &mut buf).unwrap();
        assert_eq!(&buf, b"abc");

        std::fs::remove_file(&path).unwrap();
    }
}
