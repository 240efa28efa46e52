// Partition discovery on GPT disks

use alloc::vec::Vec;
use gpt_disk_io::{BlockIo, Disk};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GptError {
    /// Disk handle or partition array could not be read
    IoError,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PartitionInfo {
    /// 1-based slot in the partition entry array
    pub number: u32,
    pub partition_type: PartitionType,
    pub start_lba: u64,
    pub end_lba: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PartitionType {
    EfiSystem,
    LinuxFilesystem,
    LinuxSwap,
    BasicData,
    Unknown,
}

impl PartitionInfo {
    pub fn blocks(&self) -> u64 {
        self.end_lba.saturating_sub(self.start_lba) + 1
    }

    pub fn size_bytes(&self, block_size: u64) -> u64 {
        self.blocks() * block_size
    }

    pub fn type_name(&self) -> &'static str {
        match self.partition_type {
            PartitionType::EfiSystem => "EFI System",
            PartitionType::LinuxFilesystem => "Linux FS",
            PartitionType::LinuxSwap => "Linux Swap",
            PartitionType::BasicData => "Basic Data",
            PartitionType::Unknown => "Unknown",
        }
    }
}

impl PartitionType {
    /// Convert from gpt_disk_types GUID to PartitionType
    pub fn from_gpt_guid(guid: &gpt_disk_types::GptPartitionType) -> Self {
        use gpt_disk_types::{guid, GptPartitionType as GptType};

        if guid == &GptType::EFI_SYSTEM {
            PartitionType::EfiSystem
        } else if guid == &GptType::BASIC_DATA {
            PartitionType::BasicData
        } else if guid == &GptType(guid!("0fc63daf-8483-4772-8e79-3d69d8477de4")) {
            PartitionType::LinuxFilesystem
        } else if guid == &GptType(guid!("0657fd6d-a4ab-43c4-84e5-0933c84b4f4f")) {
            PartitionType::LinuxSwap
        } else {
            PartitionType::Unknown
        }
    }
}

/// Partitions found on one disk
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartitionTable {
    pub has_gpt: bool,
    pub partitions: Vec<PartitionInfo>,
}

impl PartitionTable {
    pub fn find(&self, number: u32) -> Option<&PartitionInfo> {
        self.partitions.iter().find(|p| p.number == number)
    }

    pub fn count(&self) -> usize {
        self.partitions.len()
    }
}

/// Read the primary GPT. A disk without a usable header yields an empty
/// table; only I/O failures are errors.
pub fn scan_partitions<B: BlockIo>(block_io: B) -> Result<PartitionTable, GptError> {
    let block_size = block_io
        .block_size()
        .to_usize()
        .ok_or(GptError::IoError)?;

    let mut disk = Disk::new(block_io).map_err(|_| GptError::IoError)?;

    let mut block_buf = alloc::vec![0u8; block_size];
    let header = disk
        .read_primary_gpt_header(&mut block_buf)
        .map_err(|_| GptError::IoError)?;

    // Invalid header - treat as no GPT
    let Ok(layout) = header.get_partition_entry_array_layout() else {
        return Ok(PartitionTable::default());
    };

    let iter = disk
        .gpt_partition_entry_array_iter(layout, &mut block_buf)
        .map_err(|_| GptError::IoError)?;

    let mut table = PartitionTable {
        has_gpt: true,
        partitions: Vec::new(),
    };

    for (index, entry_result) in iter.enumerate() {
        let entry = entry_result.map_err(|_| GptError::IoError)?;

        if !entry.is_used() {
            continue;
        }

        // Copy the guid to avoid unaligned reference
        let guid = entry.partition_type_guid;
        table.partitions.push(PartitionInfo {
            number: index as u32 + 1,
            partition_type: PartitionType::from_gpt_guid(&guid),
            start_lba: entry.starting_lba.to_u64(),
            end_lba: entry.ending_lba.to_u64(),
        });
    }

    Ok(table)
}
