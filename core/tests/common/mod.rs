//! Common test utilities: recording collaborators and mock block devices

#![allow(dead_code)]

pub mod gpt;
pub use gpt::GptBuilder;

use bootfm_core::error::StorageError;
use bootfm_core::storage::{DeviceInfo, MemStorage, NodeHandle, NodeInfo, RawEntry};
use bootfm_core::{FileReader, FmError, Host, LaunchRequest, Launcher, Screen, ScriptHost, Storage};
use gpt_disk_io::BlockIo;
use gpt_disk_types::{BlockSize, Lba};
use std::io;

/// Storage wrapper that counts calls into the provider
pub struct RecordingStorage {
    pub inner: MemStorage,
    pub opens: usize,
    pub reads: usize,
    pub dir_reads: usize,
    /// Fail `read_dir` with `Io` once this many entries were returned
    pub fail_dir_after: Option<usize>,
    /// Pretend files end at this offset, whatever their size says
    pub eof_at: Option<u64>,
}

impl RecordingStorage {
    pub fn new(inner: MemStorage) -> Self {
        Self {
            inner,
            opens: 0,
            reads: 0,
            dir_reads: 0,
            fail_dir_after: None,
            eof_at: None,
        }
    }

    pub fn io_calls(&self) -> usize {
        self.opens + self.reads + self.dir_reads
    }
}

impl Storage for RecordingStorage {
    fn device_labels(&mut self) -> Vec<String> {
        self.inner.device_labels()
    }

    fn probe(&mut self, label: &str) -> Result<DeviceInfo, StorageError> {
        self.inner.probe(label)
    }

    fn open(&mut self, label: &str, path: &str) -> Result<(NodeHandle, NodeInfo), StorageError> {
        self.opens += 1;
        self.inner.open(label, path)
    }

    fn read(
        &mut self,
        node: NodeHandle,
        offset: u64,
        buf: &mut [u8],
    ) -> Result<usize, StorageError> {
        self.reads += 1;
        match self.eof_at {
            Some(end) if offset >= end => Ok(0),
            _ => self.inner.read(node, offset, buf),
        }
    }

    fn read_dir(
        &mut self,
        node: NodeHandle,
        index: usize,
    ) -> Result<Option<RawEntry>, StorageError> {
        self.dir_reads += 1;
        match self.fail_dir_after {
            Some(limit) if index >= limit => Err(StorageError::Io),
            _ => self.inner.read_dir(node, index),
        }
    }

    fn close(&mut self, node: NodeHandle) {
        self.inner.close(node)
    }
}

/// Screen with a configurable resolution that keeps what was drawn
pub struct TestScreen {
    pub width: u32,
    pub height: u32,
    pub lines: Vec<String>,
    pub notices: Vec<String>,
}

impl TestScreen {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            lines: Vec::new(),
            notices: Vec::new(),
        }
    }
}

impl Screen for TestScreen {
    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.lines.clear();
    }

    fn put_line(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

#[derive(Default)]
pub struct RecordingScripts {
    pub sources: Vec<String>,
}

impl ScriptHost for RecordingScripts {
    fn execute(&mut self, source: &str) {
        self.sources.push(source.to_string());
    }
}

#[derive(Default)]
pub struct RecordingLauncher {
    pub launched: Vec<LaunchRequest>,
    /// Bytes read from the head of each launched file
    pub heads: Vec<Vec<u8>>,
    pub fail_with: Option<FmError>,
}

impl Launcher for RecordingLauncher {
    fn launch(
        &mut self,
        request: &LaunchRequest,
        file: &mut dyn FileReader,
    ) -> Result<(), FmError> {
        if let Some(err) = self.fail_with {
            return Err(err);
        }
        let mut head = [0u8; 16];
        let n = file.read_at(0, &mut head)?;
        self.heads.push(head[..n].to_vec());
        self.launched.push(request.clone());
        Ok(())
    }
}

/// All collaborators of one session, owned together
pub struct Rig<S: Storage> {
    pub storage: S,
    pub screen: TestScreen,
    pub scripts: RecordingScripts,
    pub launcher: RecordingLauncher,
}

impl<S: Storage> Rig<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            screen: TestScreen::new(1024, 768),
            scripts: RecordingScripts::default(),
            launcher: RecordingLauncher::default(),
        }
    }

    pub fn host(&mut self) -> Host<'_> {
        Host {
            storage: &mut self.storage,
            screen: &mut self.screen,
            scripts: &mut self.scripts,
            launcher: &mut self.launcher,
        }
    }
}

/// In-memory block device for testing
#[derive(Debug, Clone)]
pub struct MemoryBlockDevice {
    pub data: Vec<u8>,
    pub block_size: usize,
    /// Every read fails with an I/O error
    pub broken: bool,
}

impl MemoryBlockDevice {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            block_size: 512,
            broken: false,
        }
    }

    /// Zeroed disk of `blocks` 512-byte blocks
    pub fn zeroed(blocks: usize) -> Self {
        Self::new(vec![0u8; blocks * 512])
    }

    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }
}

impl BlockIo for MemoryBlockDevice {
    type Error = io::Error;

    fn block_size(&self) -> BlockSize {
        BlockSize::BS_512
    }

    fn num_blocks(&mut self) -> Result<u64, Self::Error> {
        if self.broken {
            return Err(io::Error::new(io::ErrorKind::Other, "device not ready"));
        }
        Ok((self.data.len() / self.block_size) as u64)
    }

    fn read_blocks(&mut self, start_lba: Lba, dst: &mut [u8]) -> Result<(), Self::Error> {
        if self.broken {
            return Err(io::Error::new(io::ErrorKind::Other, "device not ready"));
        }
        let offset = start_lba.0 as usize * self.block_size;
        if offset + dst.len() > self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "read beyond end of device",
            ));
        }
        dst.copy_from_slice(&self.data[offset..offset + dst.len()]);
        Ok(())
    }

    fn write_blocks(&mut self, start_lba: Lba, src: &[u8]) -> Result<(), Self::Error> {
        let offset = start_lba.0 as usize * self.block_size;
        if offset + src.len() > self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "write beyond end of device",
            ));
        }
        self.data[offset..offset + src.len()].copy_from_slice(src);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
