// Raw block devices as browser devices
//
// Disk N is `hdN`; GPT entry M on it is `hdN,gptM`. Nodes are raw byte
// ranges: they can be dumped but carry no filesystem to list.

use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use gpt_disk_io::BlockIo;
use gpt_disk_types::{BlockSize, Lba};

use super::partition::{scan_partitions, PartitionTable};
use crate::error::StorageError;
use crate::storage::{
    alloc_slot, human_size, DeviceInfo, NodeHandle, NodeInfo, NodeKind, RawEntry, Storage,
};

/// Borrowed block device, for `gpt_disk_io` calls that take the device by value
pub struct BlockRef<'a, B: BlockIo> {
    block_io: &'a mut B,
}

impl<'a, B: BlockIo> BlockRef<'a, B> {
    pub fn new(block_io: &'a mut B) -> Self {
        Self { block_io }
    }
}

impl<B: BlockIo> BlockIo for BlockRef<'_, B> {
    type Error = B::Error;

    fn block_size(&self) -> BlockSize {
        self.block_io.block_size()
    }

    fn num_blocks(&mut self) -> Result<u64, Self::Error> {
        self.block_io.num_blocks()
    }

    fn read_blocks(&mut self, start_lba: Lba, dst: &mut [u8]) -> Result<(), Self::Error> {
        self.block_io.read_blocks(start_lba, dst)
    }

    fn write_blocks(&mut self, start_lba: Lba, src: &[u8]) -> Result<(), Self::Error> {
        self.block_io.write_blocks(start_lba, src)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.block_io.flush()
    }
}

#[derive(Clone, Copy, Debug)]
struct RawNode {
    disk: usize,
    start_lba: u64,
    blocks: u64,
}

/// Device address parsed from a label
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockAddr {
    pub disk: usize,
    /// GPT entry number, `None` for the whole disk
    pub partition: Option<u32>,
}

impl BlockAddr {
    /// Parse `hdN` or `hdN,gptM`
    pub fn parse(label: &str) -> Option<Self> {
        let rest = label.strip_prefix("hd")?;
        let (disk, partition) = match rest.split_once(',') {
            Some((disk, part)) => {
                let number: u32 = part.strip_prefix("gpt")?.parse().ok()?;
                if number == 0 {
                    return None;
                }
                (disk, Some(number))
            }
            None => (rest, None),
        };
        Some(Self {
            disk: disk.parse().ok()?,
            partition,
        })
    }

    pub fn label(&self) -> String {
        match self.partition {
            Some(number) => format!("hd{},gpt{}", self.disk, number),
            None => format!("hd{}", self.disk),
        }
    }
}

/// Block devices exposed as `hdN` / `hdN,gptM`
pub struct BlockStorage<B: BlockIo> {
    disks: Vec<B>,
    handles: Vec<Option<RawNode>>,
}

impl<B: BlockIo> BlockStorage<B> {
    pub fn new(disks: Vec<B>) -> Self {
        Self {
            disks,
            handles: Vec::new(),
        }
    }

    pub fn disk_count(&self) -> usize {
        self.disks.len()
    }

    /// Handles not yet closed
    pub fn open_handles(&self) -> usize {
        self.handles.iter().filter(|h| h.is_some()).count()
    }

    /// Current partition table of disk `index`
    pub fn partitions(&mut self, index: usize) -> Result<PartitionTable, StorageError> {
        let disk = self.disks.get_mut(index).ok_or(StorageError::UnknownDevice)?;
        scan_partitions(BlockRef::new(disk)).map_err(|e| {
            log::warn!("hd{}: partition scan failed: {:?}", index, e);
            StorageError::Io
        })
    }

    fn block_size(&self, disk: usize) -> u64 {
        u64::from(self.disks[disk].block_size().to_u32())
    }

    fn resolve(&mut self, label: &str) -> Result<RawNode, StorageError> {
        let addr = BlockAddr::parse(label).ok_or(StorageError::UnknownDevice)?;
        if addr.disk >= self.disks.len() {
            return Err(StorageError::UnknownDevice);
        }

        match addr.partition {
            None => {
                let blocks = self.disks[addr.disk].num_blocks().map_err(|e| {
                    log::warn!("{}: geometry unavailable: {:?}", label, e);
                    StorageError::Io
                })?;
                Ok(RawNode {
                    disk: addr.disk,
                    start_lba: 0,
                    blocks,
                })
            }
            Some(number) => {
                let table = self.partitions(addr.disk)?;
                let part = table.find(number).ok_or(StorageError::UnknownDevice)?;
                Ok(RawNode {
                    disk: addr.disk,
                    start_lba: part.start_lba,
                    blocks: part.blocks(),
                })
            }
        }
    }
}

impl<B: BlockIo> Storage for BlockStorage<B> {
    fn device_labels(&mut self) -> Vec<String> {
        let mut labels = Vec::new();
        for disk in 0..self.disks.len() {
            labels.push(BlockAddr { disk, partition: None }.label());
            // An unscannable disk is still listed on its own
            if let Ok(table) = self.partitions(disk) {
                labels.extend(table.partitions.iter().map(|p| {
                    BlockAddr {
                        disk,
                        partition: Some(p.number),
                    }
                    .label()
                }));
            }
        }
        labels
    }

    fn has_device(&mut self, label: &str) -> bool {
        match BlockAddr::parse(label) {
            Some(addr) if addr.disk < self.disks.len() => match addr.partition {
                None => true,
                Some(number) => self
                    .partitions(addr.disk)
                    .map(|t| t.find(number).is_some())
                    .unwrap_or(false),
            },
            _ => false,
        }
    }

    fn probe(&mut self, label: &str) -> Result<DeviceInfo, StorageError> {
        let node = self.resolve(label)?;
        let bytes = node.blocks * self.block_size(node.disk);

        let description = match BlockAddr::parse(label).and_then(|a| a.partition) {
            Some(number) => {
                let table = self.partitions(node.disk)?;
                let kind = table.find(number).map_or("Unknown", |p| p.type_name());
                format!("{} partition, {}", kind, human_size(bytes))
            }
            None => match self.partitions(node.disk) {
                Ok(table) if table.has_gpt => {
                    format!("Disk, {}, GPT with {} partitions", human_size(bytes), table.count())
                }
                Ok(_) => format!("Disk, {}, no partition table", human_size(bytes)),
                Err(e) => return Err(e),
            },
        };

        Ok(DeviceInfo {
            description,
            filesystem: None,
        })
    }

    fn open(&mut self, label: &str, path: &str) -> Result<(NodeHandle, NodeInfo), StorageError> {
        let node = self.resolve(label)?;
        if !path.is_empty() {
            return Err(StorageError::NoFilesystem);
        }
        let info = NodeInfo {
            kind: NodeKind::File,
            size: node.blocks * self.block_size(node.disk),
        };
        Ok((alloc_slot(&mut self.handles, node), info))
    }

    fn read(
        &mut self,
        node: NodeHandle,
        offset: u64,
        buf: &mut [u8],
    ) -> Result<usize, StorageError> {
        let raw = self
            .handles
            .get(node.0 as usize)
            .copied()
            .flatten()
            .ok_or(StorageError::Io)?;
        let block_size = self.block_size(raw.disk);
        let total = raw.blocks * block_size;
        if offset >= total || buf.is_empty() {
            return Ok(0);
        }

        let len = (buf.len() as u64).min(total - offset);
        let skip = offset % block_size;
        let first = raw.start_lba + offset / block_size;
        let count = (skip + len).div_ceil(block_size);

        let mut scratch = vec![0u8; (count * block_size) as usize];
        self.disks[raw.disk]
            .read_blocks(Lba(first), &mut scratch)
            .map_err(|e| {
                log::warn!("hd{}: read at lba {} failed: {:?}", raw.disk, first, e);
                StorageError::Io
            })?;

        let (skip, len) = (skip as usize, len as usize);
        buf[..len].copy_from_slice(&scratch[skip..skip + len]);
        Ok(len)
    }

    fn read_dir(
        &mut self,
        _node: NodeHandle,
        _index: usize,
    ) -> Result<Option<RawEntry>, StorageError> {
        Err(StorageError::NoFilesystem)
    }

    fn close(&mut self, node: NodeHandle) {
        if let Some(slot) = self.handles.get_mut(node.0 as usize) {
            *slot = None;
        }
    }
}
