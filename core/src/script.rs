//! Post-action script trigger
//!
//! After browse and open actions the session sources a fixed script from
//! the current root, e.g. `source (hd0)/boot/grub/global.sh`. This step is
//! best effort: if the text cannot be built nothing runs.

use alloc::string::String;
use core::fmt::Write;

use crate::error::{FmError, Result};

/// Script interpreter offered by the host
pub trait ScriptHost {
    fn execute(&mut self, source: &str);
}

/// Build the script text for `root`
pub fn compose(root: &str, script_path: &str) -> Result<String> {
    let mut text = String::new();
    text.try_reserve(root.len() + script_path.len() + "source ()\n".len())
        .map_err(|_| FmError::AllocationFailure)?;
    writeln!(text, "source ({}){}", root, script_path)
        .map_err(|_| FmError::AllocationFailure)?;
    Ok(text)
}

/// Compose and run the script. Returns whether anything was executed.
pub fn fire(host: &mut dyn ScriptHost, root: &str, script_path: &str) -> bool {
    match compose(root, script_path) {
        Ok(text) => {
            log::debug!("script: {}", text.trim_end());
            host.execute(&text);
            true
        }
        Err(err) => {
            log::warn!("script: skipped, {}", err);
            false
        }
    }
}
