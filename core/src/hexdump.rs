//! Byte viewer
//!
//! Hex + ASCII dump of a file, read through a fixed-size window so files
//! larger than memory can be shown. The display gate is checked before the
//! file is even opened.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use crate::config::BrowserConfig;
use crate::error::{FmError, Result};
use crate::path::PathRef;
use crate::screen::{meets_resolution, Screen};
use crate::storage::{human_size, FileReader, Storage};
use crate::walker::resolve_file;

/// One dump row: offset, `width` hex columns split every 8, then ASCII.
/// A short final row is padded so the ASCII column stays aligned.
pub fn format_row(offset: u64, bytes: &[u8], width: usize) -> String {
    let mut row = String::with_capacity(12 + width * 4);
    let _ = write!(row, "{:08x} ", offset);

    for i in 0..width {
        if i % 8 == 0 {
            row.push(' ');
        }
        match bytes.get(i) {
            Some(b) => {
                let _ = write!(row, "{:02x} ", b);
            }
            None => row.push_str("   "),
        }
    }

    row.push('|');
    row.extend(bytes.iter().map(|&b| {
        if b.is_ascii_graphic() || b == b' ' {
            b as char
        } else {
            '.'
        }
    }));
    row.push('|');
    row
}

/// Windowed hex viewer
#[derive(Debug, Clone, Copy)]
pub struct HexViewer {
    window: usize,
    row_width: usize,
    min_resolution: (u32, u32),
}

impl HexViewer {
    pub fn new(config: &BrowserConfig) -> Self {
        let row_width = config.hex_row_width.max(1);
        Self {
            // whole rows per window keep offsets aligned across reads
            window: config.hex_window.max(row_width) / row_width * row_width,
            row_width,
            min_resolution: config.min_resolution,
        }
    }

    /// Dump all of `target` to `screen`. Returns the number of bytes shown.
    pub fn dump<S: Storage + ?Sized>(
        &self,
        storage: &mut S,
        screen: &mut dyn Screen,
        target: &PathRef,
    ) -> Result<u64> {
        self.dump_range(storage, screen, target, 0, u64::MAX)
    }

    /// Dump at most `len` bytes of `target` from byte `start`. A start past
    /// the end shows only the header.
    pub fn dump_range<S: Storage + ?Sized>(
        &self,
        storage: &mut S,
        screen: &mut dyn Screen,
        target: &PathRef,
        start: u64,
        len: u64,
    ) -> Result<u64> {
        if !meets_resolution(screen, self.min_resolution) {
            let (w, h) = screen.resolution();
            log::warn!("hexdump: display {}x{} too small", w, h);
            return Err(FmError::InsufficientDisplay);
        }

        let mut file = resolve_file(storage, target)?;
        let size = file.size();
        log::info!("hexdump: {} ({} bytes)", target, size);

        let mut buf = Vec::new();
        buf.try_reserve_exact(self.window)
            .map_err(|_| FmError::AllocationFailure)?;
        buf.resize(self.window, 0);

        screen.clear();
        screen.put_line(&format!("{}  {}", target, human_size(size)));

        let end = size.min(start.saturating_add(len));
        let mut offset = start;
        while offset < end {
            let want = (end - offset).min(self.window as u64) as usize;
            let n = file.read_at(offset, &mut buf[..want])?;
            if n == 0 {
                log::warn!("hexdump: {} ended at {} of {}", target, offset, size);
                return Err(FmError::Unreadable);
            }

            for (i, chunk) in buf[..n].chunks(self.row_width).enumerate() {
                let row_offset = offset + (i * self.row_width) as u64;
                screen.put_line(&format_row(row_offset, chunk, self.row_width));
            }
            offset += n as u64;
        }

        Ok(offset.saturating_sub(start))
    }
}
