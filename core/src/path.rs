//! Device-qualified path references
//!
//! A `PathRef` pairs a device label with a normalised absolute path. The
//! textual form is `(device)/dir/file`; `(device)` alone addresses the raw
//! device and a bare `/dir/file` is taken relative to the current root.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::error::{FmError, Result};

/// Path separator inside a device
pub const SEPARATOR: char = '/';

/// (device, path) pair addressing an enumeration or viewer target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRef {
    device: String,
    path: String,
}

impl PathRef {
    /// Build from parts. `path` is normalised; an empty path stays empty
    /// and means the raw device.
    pub fn new(device: &str, path: &str) -> Result<Self> {
        if !is_device_label(device) {
            return Err(FmError::BadArgument);
        }
        let path = if path.is_empty() {
            String::new()
        } else {
            normalize(path)
        };
        Ok(Self {
            device: device.to_string(),
            path,
        })
    }

    /// Root directory of a device
    pub fn device_root(device: &str) -> Result<Self> {
        Self::new(device, "/")
    }

    /// Parse `(device)/path`, or `/path` against `root`.
    pub fn parse(text: &str, root: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FmError::BadArgument);
        }

        match text.strip_prefix('(') {
            Some(rest) => {
                let close = rest.find(')').ok_or(FmError::BadArgument)?;
                let device = &rest[..close];
                Self::new(device, &rest[close + 1..])
            }
            None if text.starts_with(SEPARATOR) => Self::new(root, text),
            None => Err(FmError::BadArgument),
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    /// Normalised path, `""` for the raw device
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_raw_device(&self) -> bool {
        self.path.is_empty()
    }

    /// Path of a direct child entry
    pub fn child(&self, name: &str) -> Self {
        let mut path = String::with_capacity(self.path.len() + name.len() + 1);
        path.push_str(self.path.trim_end_matches(SEPARATOR));
        path.push(SEPARATOR);
        path.push_str(name);
        Self {
            device: self.device.clone(),
            path,
        }
    }

    /// Parent directory; the device root is its own parent
    pub fn parent(&self) -> Self {
        let path = match self.path.rfind(SEPARATOR) {
            Some(0) | None => String::from("/"),
            Some(idx) => self.path[..idx].to_string(),
        };
        Self {
            device: self.device.clone(),
            path,
        }
    }

    /// Last path component, if any
    pub fn file_name(&self) -> Option<&str> {
        self.path
            .rsplit(SEPARATOR)
            .next()
            .filter(|name| !name.is_empty())
    }
}

impl fmt::Display for PathRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}){}", self.device, self.path)
    }
}

/// Whether `label` can name a device inside `( )`
pub fn is_device_label(label: &str) -> bool {
    !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_ascii_graphic() && !matches!(c, '(' | ')' | SEPARATOR))
}

/// Collapse `//`, `.` and `..`. Always returns an absolute path.
pub fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for component in path.split(SEPARATOR) {
        match component {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            name => parts.push(name),
        }
    }

    if parts.is_empty() {
        return String::from("/");
    }

    let mut out = String::with_capacity(path.len());
    for part in parts {
        out.push(SEPARATOR);
        out.push_str(part);
    }
    out
}
