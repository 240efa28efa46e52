use crate::common::MemoryBlockDevice;
use bootfm_core::disk::BlockRef;
use gpt_disk_io::Disk;
use gpt_disk_types::{
    guid, BlockSize, GptHeader, GptPartitionEntryArray, GptPartitionType, LbaLe, U32Le,
};

/// Builds a 512-byte-block disk image with a primary GPT
pub struct GptBuilder {
    blocks: u64,
    partitions: Vec<(GptPartitionType, u64, u64)>,
}

impl GptBuilder {
    pub fn new(blocks: u64) -> Self {
        Self {
            blocks,
            partitions: Vec::new(),
        }
    }

    /// Add a used entry covering `start..=end`
    pub fn partition(mut self, kind: GptPartitionType, start: u64, end: u64) -> Self {
        self.partitions.push((kind, start, end));
        self
    }

    pub fn build(self) -> MemoryBlockDevice {
        let mut device = MemoryBlockDevice::zeroed(self.blocks as usize);
        let mut disk = Disk::new(BlockRef::new(&mut device)).expect("disk");

        let mut header = GptHeader {
            my_lba: LbaLe::from_u64(1),
            alternate_lba: LbaLe::from_u64(self.blocks - 1),
            first_usable_lba: LbaLe::from_u64(34),
            last_usable_lba: LbaLe::from_u64(self.blocks - 34),
            disk_guid: guid!("12345678-1234-1234-1234-123456789012"),
            partition_entry_lba: LbaLe::from_u64(2),
            number_of_partition_entries: U32Le::from_u32(128),
            ..Default::default()
        };

        let layout = header
            .get_partition_entry_array_layout()
            .expect("entry layout");

        let mut entry_buf = [0u8; 16384];
        let mut entry_array = GptPartitionEntryArray::new(layout, BlockSize::BS_512, &mut entry_buf)
            .expect("entry array");

        for (slot, (kind, start, end)) in self.partitions.iter().enumerate() {
            let entry = entry_array
                .get_partition_entry_mut(slot as u32)
                .expect("free slot");
            entry.partition_type_guid = *kind;
            entry.unique_partition_guid = guid!("12345678-1234-5678-1234-567812345678");
            entry.starting_lba = LbaLe::from_u64(*start);
            entry.ending_lba = LbaLe::from_u64(*end);
        }

        header.partition_entry_array_crc32 = entry_array.calculate_crc32();
        header.update_header_crc32();

        let mut buf = [0u8; 512];
        disk.write_protective_mbr(&mut buf).expect("mbr");
        disk.write_primary_gpt_header(&header, &mut buf)
            .expect("header");
        disk.write_gpt_partition_entry_array(&entry_array)
            .expect("entries");
        disk.flush().expect("flush");
        drop(disk);

        device
    }
}
