//! In-memory volumes
//!
//! Backs the built-in `memdisk` device and any host-provided RAM disks.
//! Entries are reported in insertion order.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use super::{alloc_slot, human_size, DeviceInfo, NodeHandle, NodeInfo, NodeKind, RawEntry, Storage};
use crate::error::StorageError;
use crate::path::SEPARATOR;

const ROOT: usize = 0;

enum Body {
    Dir(Vec<usize>),
    File(Vec<u8>),
}

struct MemNode {
    name: String,
    body: Body,
}

/// Directory tree held in memory
pub struct MemVolume {
    nodes: Vec<MemNode>,
}

impl Default for MemVolume {
    fn default() -> Self {
        Self::new()
    }
}

impl MemVolume {
    /// Empty volume with only a root directory
    pub fn new() -> Self {
        Self {
            nodes: vec![MemNode {
                name: String::new(),
                body: Body::Dir(Vec::new()),
            }],
        }
    }

    /// Create a directory and any missing parents
    pub fn dir(mut self, path: &str) -> Self {
        let _ = self.make_dirs(path.split(SEPARATOR).filter(|c| !c.is_empty()));
        self
    }

    /// Create or replace a file, creating missing parents
    pub fn file(mut self, path: &str, data: &[u8]) -> Self {
        let mut parts: Vec<&str> = path.split(SEPARATOR).filter(|c| !c.is_empty()).collect();
        let Some(name) = parts.pop() else {
            log::warn!("memdisk: refusing file with empty name at {}", path);
            return self;
        };
        let Some(parent) = self.make_dirs(parts.into_iter()) else {
            log::warn!("memdisk: parent of {} is a file", path);
            return self;
        };

        match self.child(parent, name) {
            Some(idx) => match &mut self.nodes[idx].body {
                Body::File(bytes) => *bytes = data.to_vec(),
                Body::Dir(_) => log::warn!("memdisk: {} is a directory", path),
            },
            None => {
                self.add_child(parent, name, Body::File(data.to_vec()));
            }
        }
        self
    }

    /// Total bytes held in files
    pub fn byte_size(&self) -> u64 {
        self.nodes
            .iter()
            .map(|n| match &n.body {
                Body::File(bytes) => bytes.len() as u64,
                Body::Dir(_) => 0,
            })
            .sum()
    }

    fn make_dirs<'a>(&mut self, parts: impl Iterator<Item = &'a str>) -> Option<usize> {
        let mut current = ROOT;
        for name in parts {
            current = match self.child(current, name) {
                Some(idx) if matches!(self.nodes[idx].body, Body::Dir(_)) => idx,
                Some(_) => return None,
                None => self.add_child(current, name, Body::Dir(Vec::new())),
            };
        }
        Some(current)
    }

    fn add_child(&mut self, parent: usize, name: &str, body: Body) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(MemNode {
            name: name.to_string(),
            body,
        });
        if let Body::Dir(children) = &mut self.nodes[parent].body {
            children.push(idx);
        }
        idx
    }

    fn child(&self, parent: usize, name: &str) -> Option<usize> {
        match &self.nodes[parent].body {
            Body::Dir(children) => children
                .iter()
                .copied()
                .find(|&idx| self.nodes[idx].name == name),
            Body::File(_) => None,
        }
    }

    fn lookup(&self, path: &str) -> Result<usize, StorageError> {
        let mut current = ROOT;
        for name in path.split(SEPARATOR).filter(|c| !c.is_empty()) {
            if matches!(self.nodes[current].body, Body::File(_)) {
                return Err(StorageError::NotADirectory);
            }
            current = self.child(current, name).ok_or(StorageError::NotFound)?;
        }
        Ok(current)
    }

    fn info(&self, idx: usize) -> NodeInfo {
        match &self.nodes[idx].body {
            Body::Dir(_) => NodeInfo {
                kind: NodeKind::Directory,
                size: 0,
            },
            Body::File(bytes) => NodeInfo {
                kind: NodeKind::File,
                size: bytes.len() as u64,
            },
        }
    }
}

/// Set of labelled in-memory volumes
#[derive(Default)]
pub struct MemStorage {
    volumes: Vec<(String, MemVolume)>,
    handles: Vec<Option<(usize, usize)>>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert`
    pub fn with_volume(mut self, label: &str, volume: MemVolume) -> Self {
        self.insert(label, volume);
        self
    }

    /// Add a volume, replacing one with the same label
    pub fn insert(&mut self, label: &str, volume: MemVolume) {
        match self.volumes.iter_mut().find(|(l, _)| l == label) {
            Some(slot) => slot.1 = volume,
            None => self.volumes.push((label.to_string(), volume)),
        }
    }

    /// Handles not yet closed
    pub fn open_handles(&self) -> usize {
        self.handles.iter().filter(|h| h.is_some()).count()
    }

    fn volume(&self, label: &str) -> Result<usize, StorageError> {
        self.volumes
            .iter()
            .position(|(l, _)| l == label)
            .ok_or(StorageError::UnknownDevice)
    }

    fn node(&self, handle: NodeHandle) -> Result<(&MemVolume, usize), StorageError> {
        let (vol, idx) = self
            .handles
            .get(handle.0 as usize)
            .copied()
            .flatten()
            .ok_or(StorageError::Io)?;
        Ok((&self.volumes[vol].1, idx))
    }
}

impl Storage for MemStorage {
    fn device_labels(&mut self) -> Vec<String> {
        self.volumes.iter().map(|(label, _)| label.clone()).collect()
    }

    fn probe(&mut self, label: &str) -> Result<DeviceInfo, StorageError> {
        let vol = &self.volumes[self.volume(label)?].1;
        Ok(DeviceInfo {
            description: format!("Memory disk, {}", human_size(vol.byte_size())),
            filesystem: Some("memfs".to_string()),
        })
    }

    fn open(&mut self, label: &str, path: &str) -> Result<(NodeHandle, NodeInfo), StorageError> {
        let vol = self.volume(label)?;
        let idx = self.volumes[vol].1.lookup(path)?;
        let info = self.volumes[vol].1.info(idx);
        Ok((alloc_slot(&mut self.handles, (vol, idx)), info))
    }

    fn read(
        &mut self,
        node: NodeHandle,
        offset: u64,
        buf: &mut [u8],
    ) -> Result<usize, StorageError> {
        let (vol, idx) = self.node(node)?;
        let Body::File(bytes) = &vol.nodes[idx].body else {
            return Err(StorageError::IsADirectory);
        };
        let Ok(start) = usize::try_from(offset) else {
            return Ok(0);
        };
        if start >= bytes.len() {
            return Ok(0);
        }
        let n = buf.len().min(bytes.len() - start);
        buf[..n].copy_from_slice(&bytes[start..start + n]);
        Ok(n)
    }

    fn read_dir(
        &mut self,
        node: NodeHandle,
        index: usize,
    ) -> Result<Option<RawEntry>, StorageError> {
        let (vol, idx) = self.node(node)?;
        let Body::Dir(children) = &vol.nodes[idx].body else {
            return Err(StorageError::NotADirectory);
        };
        Ok(children.get(index).map(|&child| {
            let info = vol.info(child);
            RawEntry {
                name: vol.nodes[child].name.clone(),
                kind: info.kind,
                size: info.size,
            }
        }))
    }

    fn close(&mut self, node: NodeHandle) {
        if let Some(slot) = self.handles.get_mut(node.0 as usize) {
            *slot = None;
        }
    }
}
