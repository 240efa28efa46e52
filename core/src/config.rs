//! Browser configuration.
//!
//! Knobs for the session: default root, the script sourced after each
//! browse action, the hex viewer's display gate and window sizes.

/// Longest root label accepted by `set_root`.
pub const MAX_ROOT_LEN: usize = 19;

/// Label of the built-in in-memory disk.
pub const DEFAULT_ROOT: &str = "memdisk";

/// Script sourced from the current root after browse and open actions.
pub const GLOBAL_SCRIPT_PATH: &str = "/boot/grub/global.sh";

/// Browser session configuration.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Root label installed by the first `init_once`.
    pub default_root: &'static str,
    /// Path of the boot script under the current root.
    pub script_path: &'static str,
    /// Minimum (width, height) the hex viewer requires.
    pub min_resolution: (u32, u32),
    /// Bytes read per hex viewer window.
    pub hex_window: usize,
    /// Bytes rendered per hex row.
    pub hex_row_width: usize,
    /// Menu rows drawn per render.
    pub menu_rows: usize,
    /// Make the device of a launched file the new root.
    pub root_follows_open: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            default_root: DEFAULT_ROOT,
            script_path: GLOBAL_SCRIPT_PATH,
            min_resolution: (1024, 768),
            hex_window: 4096,
            hex_row_width: 16,
            menu_rows: 24,
            root_follows_open: false,
        }
    }
}

impl BrowserConfig {
    /// Set the root label used at session start.
    pub fn default_root(mut self, label: &'static str) -> Self {
        self.default_root = label;
        self
    }

    /// Set the minimum display resolution for the hex viewer.
    pub fn min_resolution(mut self, width: u32, height: u32) -> Self {
        self.min_resolution = (width, height);
        self
    }

    /// Set the hex viewer read window. Rounded up to a whole row.
    pub fn hex_window(mut self, bytes: usize) -> Self {
        let row = self.hex_row_width.max(1);
        self.hex_window = bytes.max(1).div_ceil(row) * row;
        self
    }

    /// Set how many menu rows are drawn.
    pub fn menu_rows(mut self, rows: usize) -> Self {
        self.menu_rows = rows.max(1);
        self
    }

    /// Let a successful file launch move the root to that file's device.
    pub fn follow_open_root(mut self, follow: bool) -> Self {
        self.root_follows_open = follow;
        self
    }
}
