//! Device namespace over several providers

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use super::{alloc_slot, DeviceInfo, NodeHandle, NodeInfo, RawEntry, Storage};
use crate::error::StorageError;

/// Routes each device label to the first provider that owns it
#[derive(Default)]
pub struct Mounts {
    providers: Vec<Box<dyn Storage>>,
    handles: Vec<Option<(usize, NodeHandle)>>,
}

impl Mounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider. Earlier providers win label clashes and list first.
    pub fn mount(mut self, provider: Box<dyn Storage>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    fn route(&mut self, label: &str) -> Result<usize, StorageError> {
        self.providers
            .iter_mut()
            .position(|p| p.has_device(label))
            .ok_or(StorageError::UnknownDevice)
    }

    fn inner(&self, node: NodeHandle) -> Result<(usize, NodeHandle), StorageError> {
        self.handles
            .get(node.0 as usize)
            .copied()
            .flatten()
            .ok_or(StorageError::Io)
    }
}

impl Storage for Mounts {
    fn device_labels(&mut self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for provider in self.providers.iter_mut() {
            for label in provider.device_labels() {
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        labels
    }

    fn probe(&mut self, label: &str) -> Result<DeviceInfo, StorageError> {
        let idx = self.route(label)?;
        self.providers[idx].probe(label)
    }

    fn open(&mut self, label: &str, path: &str) -> Result<(NodeHandle, NodeInfo), StorageError> {
        let idx = self.route(label)?;
        let (inner, info) = self.providers[idx].open(label, path)?;
        Ok((alloc_slot(&mut self.handles, (idx, inner)), info))
    }

    fn read(
        &mut self,
        node: NodeHandle,
        offset: u64,
        buf: &mut [u8],
    ) -> Result<usize, StorageError> {
        let (idx, inner) = self.inner(node)?;
        self.providers[idx].read(inner, offset, buf)
    }

    fn read_dir(
        &mut self,
        node: NodeHandle,
        index: usize,
    ) -> Result<Option<RawEntry>, StorageError> {
        let (idx, inner) = self.inner(node)?;
        self.providers[idx].read_dir(inner, index)
    }

    fn close(&mut self, node: NodeHandle) {
        if let Ok((idx, inner)) = self.inner(node) {
            self.providers[idx].close(inner);
            self.handles[node.0 as usize] = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemStorage, MemVolume, NodeKind};
    use alloc::vec;

    fn mounts() -> Mounts {
        Mounts::new()
            .mount(Box::new(
                MemStorage::new().with_volume("memdisk", MemVolume::new().file("/a", b"1")),
            ))
            .mount(Box::new(
                MemStorage::new()
                    .with_volume("cd0", MemVolume::new().file("/b", b"22"))
                    .with_volume("memdisk", MemVolume::new()),
            ))
    }

    #[test]
    fn test_labels_concatenate_without_duplicates() {
        let mut m = mounts();
        assert_eq!(m.device_labels(), vec!["memdisk", "cd0"]);
    }

    #[test]
    fn test_routes_to_owner() {
        let mut m = mounts();
        let (h, info) = m.open("cd0", "/b").unwrap();
        assert_eq!(info.kind, NodeKind::File);
        let mut buf = [0u8; 4];
        assert_eq!(m.read(h, 0, &mut buf).unwrap(), 2);
        m.close(h);
        assert_eq!(m.read(h, 0, &mut buf), Err(StorageError::Io));
    }

    #[test]
    fn test_first_provider_wins_clash() {
        let mut m = mounts();
        assert!(m.open("memdisk", "/a").is_ok());
        assert_eq!(m.open("hd0", "/"), Err(StorageError::UnknownDevice));
    }
}
