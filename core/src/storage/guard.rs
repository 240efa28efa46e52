//! Scoped node handles

use super::{NodeHandle, NodeInfo, NodeKind, RawEntry, Storage};
use crate::error::{FmError, Result, StorageError};

/// Byte access to an open file, as handed to launchers and the hex viewer
pub trait FileReader {
    /// File length in bytes
    fn size(&self) -> u64;

    /// Read at `offset`; 0 means end of file
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize>;
}

/// Open node that closes itself when dropped
pub struct OpenNode<'s, S: Storage + ?Sized> {
    storage: &'s mut S,
    handle: NodeHandle,
    info: NodeInfo,
}

impl<'s, S: Storage + ?Sized> OpenNode<'s, S> {
    /// Open `path` on `device`
    pub fn open(
        storage: &'s mut S,
        device: &str,
        path: &str,
    ) -> core::result::Result<Self, StorageError> {
        let (handle, info) = storage.open(device, path)?;
        Ok(Self {
            storage,
            handle,
            info,
        })
    }

    pub fn info(&self) -> NodeInfo {
        self.info
    }

    pub fn is_dir(&self) -> bool {
        self.info.kind == NodeKind::Directory
    }

    /// Directory entry at `index`
    pub fn entry(&mut self, index: usize) -> core::result::Result<Option<RawEntry>, StorageError> {
        self.storage.read_dir(self.handle, index)
    }
}

impl<S: Storage + ?Sized> FileReader for OpenNode<'_, S> {
    fn size(&self) -> u64 {
        self.info.size
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        if self.is_dir() {
            return Err(FmError::IsADirectory);
        }
        self.storage
            .read(self.handle, offset, buf)
            .map_err(FmError::from)
    }
}

impl<S: Storage + ?Sized> Drop for OpenNode<'_, S> {
    fn drop(&mut self) {
        self.storage.close(self.handle);
    }
}
