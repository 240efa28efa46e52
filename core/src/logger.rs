// In-memory boot log for the browser
//
// Pre-OS environments have no console the log facade can assume, so records
// land in a bounded ring that the debug action can put on screen.

use alloc::collections::VecDeque;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

const MAX_LOG_ENTRIES: usize = 64;

static LOGGER: BootLog = BootLog::new(MAX_LOG_ENTRIES);

/// Bounded log sink. Oldest lines are dropped once full.
pub struct BootLog {
    lines: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl BootLog {
    pub const fn new(capacity: usize) -> Self {
        Self {
            lines: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    pub fn push(&self, line: String) {
        if self.capacity == 0 {
            return;
        }
        let mut lines = self.lines.lock();
        while lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.lines.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Log for BootLog {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.push(format!(
            "[{level} {target}] {message}",
            level = record.level(),
            target = record.target(),
            message = record.args(),
        ));
    }

    fn flush(&self) {}
}

/// Install the global boot log. Fails if another logger is already set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

/// Copy of the captured lines, oldest first.
pub fn records() -> Vec<String> {
    LOGGER.snapshot()
}

pub fn log_count() -> usize {
    LOGGER.len()
}
