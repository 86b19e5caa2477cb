//! Byte storage abstraction.
//!
//! Parameters persist as a flat sequence of fixed-size segments. This module
//! provides the trait a storage backend implements so the persistence logic
//! can be shared between platforms:
//! - Linux: file-backed image (see the CLI)
//! - Embedded: EEPROM/flash emulation or NVS blob
//!
//! All methods are synchronous to support embedded platforms.

use thiserror::Error;

/// Value of an erased flash or EEPROM cell.
pub const ERASED_BYTE: u8 = 0xFF;

/// Errors that can occur while reading or writing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The access does not fit into the storage area.
    #[error("Access of {len} bytes at offset {offset} exceeds storage size {size}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        size: usize,
    },

    /// Failed to read from the backing store.
    #[error("Read error: {0}")]
    Read(String),

    /// Failed to write to the backing store.
    #[error("Write error: {0}")]
    Write(String),

    /// Storage is not available.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Fixed-size, byte-addressable storage area.
pub trait ByteStorage {
    /// Total size in bytes.
    fn size(&self) -> usize;

    /// Fill `buf` with the bytes starting at `offset`.
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Write `data` starting at `offset`.
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError>;

    /// Flush pending writes to the medium.
    fn commit(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Fail unless `len` bytes at `offset` fit into `size`.
pub fn check_bounds(offset: usize, len: usize, size: usize) -> Result<(), StorageError> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(StorageError::OutOfBounds { offset, len, size }),
    }
}

/// In-memory storage image.
///
/// Starts out erased, like a fresh flash page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStorage {
    data: Vec<u8>,
}

impl MemoryStorage {
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![ERASED_BYTE; size],
        }
    }

    /// Wrap an existing image.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl ByteStorage for MemoryStorage {
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
        Ok(())
    }
}
