// Block devices and GPT partition discovery

pub mod block;
pub mod partition;

pub use block::{BlockAddr, BlockRef, BlockStorage};
pub use partition::{scan_partitions, GptError, PartitionInfo, PartitionTable, PartitionType};
