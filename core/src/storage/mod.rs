//! Storage abstraction
//!
//! The browser never talks to a filesystem driver directly. Everything goes
//! through `Storage`, which a host implements over its own device and
//! filesystem stack. Two providers ship with the crate:
//!
//! - `MemStorage` - in-memory volumes, including the built-in `memdisk`
//! - `BlockStorage` (in `crate::disk`) - raw block devices and their GPT
//!   partitions
//!
//! `Mounts` stitches several providers into one device namespace.
//!
//! Handles returned by `open` must be released with `close`; callers inside
//! the crate always hold them through an `OpenNode` guard.

mod guard;
mod memory;
mod mounts;

pub use guard::{FileReader, OpenNode};
pub use memory::{MemStorage, MemVolume};
pub use mounts::Mounts;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::StorageError;

/// Opaque handle to an open file or directory, scoped to one provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub u32);

/// File or directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

/// Metadata of an open node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeInfo {
    pub kind: NodeKind,
    /// Byte length, 0 for directories
    pub size: u64,
}

/// One directory entry as the provider reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub name: String,
    pub kind: NodeKind,
    pub size: u64,
}

/// Result of probing a device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Human-readable summary ("EFI System, 30 KiB")
    pub description: String,
    /// Filesystem name when one is mounted
    pub filesystem: Option<String>,
}

/// Device and filesystem access offered by the host
pub trait Storage {
    /// Labels of every visible device, in catalog order. Rescans each call.
    fn device_labels(&mut self) -> Vec<String>;

    /// Whether `label` names one of this provider's devices
    fn has_device(&mut self, label: &str) -> bool {
        self.device_labels().iter().any(|l| l == label)
    }

    /// Read device metadata. May fail for unreadable media.
    fn probe(&mut self, label: &str) -> Result<DeviceInfo, StorageError>;

    /// Open `path` on `label`. An empty path opens the raw device.
    fn open(&mut self, label: &str, path: &str) -> Result<(NodeHandle, NodeInfo), StorageError>;

    /// Read bytes at `offset`. Returns 0 at end of file.
    fn read(&mut self, node: NodeHandle, offset: u64, buf: &mut [u8])
        -> Result<usize, StorageError>;

    /// Entry `index` of an open directory, `None` past the last one
    fn read_dir(&mut self, node: NodeHandle, index: usize)
        -> Result<Option<RawEntry>, StorageError>;

    /// Release a handle. Unknown handles are ignored.
    fn close(&mut self, node: NodeHandle);
}

/// Smallest free slot in a handle table
pub(crate) fn alloc_slot<T>(slots: &mut Vec<Option<T>>, value: T) -> NodeHandle {
    match slots.iter().position(Option::is_none) {
        Some(idx) => {
            slots[idx] = Some(value);
            NodeHandle(idx as u32)
        }
        None => {
            slots.push(Some(value));
            NodeHandle((slots.len() - 1) as u32)
        }
    }
}

/// Byte count as "512 B", "1.5 KiB", "64 MiB"
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    // tenths of the current unit
    let mut tenths = (bytes as u128 * 10 / 1024) as u64;
    let mut unit = 0;
    while tenths >= 10 * 1024 && unit < UNITS.len() - 1 {
        tenths /= 1024;
        unit += 1;
    }

    if tenths >= 100 || tenths % 10 == 0 {
        format!("{} {}", tenths / 10, UNITS[unit])
    } else {
        format!("{}.{} {}", tenths / 10, tenths % 10, UNITS[unit])
    }
}
