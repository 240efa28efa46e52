//! Device catalog
//!
//! Enumerates every device the storage layer can see. Probing is per device:
//! one that fails to report geometry or a filesystem is still listed, just
//! without the `READABLE` capability.

use alloc::format;
use alloc::string::String;
use alloc::vec;

use bitflags::bitflags;

use crate::storage::Storage;

bitflags! {
    /// What the browser can do with a device
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DeviceCaps: u8 {
        /// Metadata probe succeeded
        const READABLE = 1 << 0;
        /// A filesystem is mounted and can be listed
        const FILESYSTEM = 1 << 1;
    }
}

/// One enumerable storage unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEntry {
    pub label: String,
    pub description: String,
    pub caps: DeviceCaps,
}

impl DeviceEntry {
    pub fn is_readable(&self) -> bool {
        self.caps.contains(DeviceCaps::READABLE)
    }

    pub fn has_filesystem(&self) -> bool {
        self.caps.contains(DeviceCaps::FILESYSTEM)
    }
}

/// Lazy device scan. Each device is probed when the iterator reaches it.
pub struct DeviceScan<'s, S: Storage + ?Sized> {
    storage: &'s mut S,
    labels: vec::IntoIter<String>,
}

impl<S: Storage + ?Sized> Iterator for DeviceScan<'_, S> {
    type Item = DeviceEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let label = self.labels.next()?;
        let entry = match self.storage.probe(&label) {
            Ok(info) => {
                let mut caps = DeviceCaps::READABLE;
                let description = match &info.filesystem {
                    Some(fs) => {
                        caps |= DeviceCaps::FILESYSTEM;
                        format!("[{}] {}", fs, info.description)
                    }
                    None => info.description,
                };
                DeviceEntry {
                    label,
                    description,
                    caps,
                }
            }
            Err(err) => {
                log::warn!("catalog: {} unreadable: {}", label, err);
                DeviceEntry {
                    label,
                    description: format!("unreadable ({})", err),
                    caps: DeviceCaps::empty(),
                }
            }
        };
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.labels.size_hint()
    }
}

/// Start a fresh scan. Every call re-reads the device list.
pub fn enumerate_devices<S: Storage + ?Sized>(storage: &mut S) -> DeviceScan<'_, S> {
    let labels = storage.device_labels();
    log::debug!("catalog: {} devices", labels.len());
    DeviceScan {
        storage,
        labels: labels.into_iter(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemStorage, MemVolume};
    use alloc::vec::Vec;

    #[test]
    fn test_scan_lists_in_catalog_order() {
        let mut storage = MemStorage::new()
            .with_volume("memdisk", MemVolume::new().file("/a", &[0u8; 2048]))
            .with_volume("cd0", MemVolume::new());

        let devices: Vec<DeviceEntry> = enumerate_devices(&mut storage).collect();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].label, "memdisk");
        assert_eq!(devices[0].description, "[memfs] Memory disk, 2 KiB");
        assert!(devices[0].is_readable());
        assert!(devices[0].has_filesystem());
        assert_eq!(devices[1].label, "cd0");
    }

    #[test]
    fn test_scan_is_restartable() {
        let mut storage = MemStorage::new().with_volume("memdisk", MemVolume::new());
        assert_eq!(enumerate_devices(&mut storage).count(), 1);
        storage.insert("cd0", MemVolume::new());
        assert_eq!(enumerate_devices(&mut storage).count(), 2);
    }
}
