//! Root registry
//!
//! Holds the device label that the post-action boot script is sourced from.
//! Over-length labels are rejected rather than truncated, so a failed
//! `set_root` always leaves the previous value in place.

use alloc::string::{String, ToString};
use core::fmt;

use crate::config::MAX_ROOT_LEN;
use crate::error::{FmError, Result};
use crate::path::is_device_label;

/// Device label of at most `MAX_ROOT_LEN` bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootLabel(String);

impl RootLabel {
    pub fn new(label: &str) -> Result<Self> {
        if label.len() > MAX_ROOT_LEN || !is_device_label(label) {
            return Err(FmError::BadArgument);
        }
        Ok(Self(label.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RootLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session-wide root state
#[derive(Debug, Clone)]
pub struct RootRegistry {
    default: RootLabel,
    current: RootLabel,
    initialized: bool,
}

impl RootRegistry {
    /// Registry that will install `default` on first `init_once`
    pub fn new(default: &str) -> Result<Self> {
        let default = RootLabel::new(default)?;
        Ok(Self {
            current: default.clone(),
            default,
            initialized: false,
        })
    }

    /// Install the default root. Only the first call has an effect.
    /// Returns whether this call did the initialisation.
    pub fn init_once(&mut self) -> bool {
        if self.initialized {
            return false;
        }
        self.current = self.default.clone();
        self.initialized = true;
        log::info!("root: initialised to {}", self.current);
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Replace the root. `None` means no root change was requested and
    /// leaves the current value untouched.
    pub fn set_root(&mut self, label: Option<&str>) -> Result<()> {
        let Some(label) = label else {
            return Ok(());
        };
        let label = RootLabel::new(label).inspect_err(|_| {
            log::warn!("root: rejected label {:?}", label);
        })?;
        log::info!("root: {} -> {}", self.current, label);
        self.current = label;
        Ok(())
    }

    pub fn get_root(&self) -> &str {
        self.current.as_str()
    }
}
