//! Browser session
//!
//! `Session` is the state one boot session keeps between commands: the
//! configuration, the root registry and the menu. The host's collaborators
//! are lent to each call through a `Host`, so nothing here is global.
//!
//! Every browse or open action ends by sourcing the boot script from the
//! current root, whether it succeeded or hit an operator-visible error,
//! including a malformed path. Wrong argument counts are rejected by the
//! command parser before any action runs. Activating an out-of-range or
//! placeholder item does nothing at all; the hex viewer, `set_root` and
//! `debug` never run the script either.

use alloc::format;

use crate::config::BrowserConfig;
use crate::error::{FmError, Result};
use crate::hexdump::HexViewer;
use crate::launch::{launch_file, Launcher};
use crate::logger;
use crate::menu::{Action, Activation, Menu};
use crate::path::PathRef;
use crate::root::RootRegistry;
use crate::screen::Screen;
use crate::script::{self, ScriptHost};
use crate::storage::Storage;
use crate::walker::resolve;

/// Collaborators lent to the session for one call
pub struct Host<'a> {
    pub storage: &'a mut dyn Storage,
    pub screen: &'a mut dyn Screen,
    pub scripts: &'a mut dyn ScriptHost,
    pub launcher: &'a mut dyn Launcher,
}

pub struct Session {
    config: BrowserConfig,
    root: RootRegistry,
    menu: Menu,
}

impl Session {
    pub fn new(config: BrowserConfig) -> Result<Self> {
        let root = RootRegistry::new(config.default_root)?;
        Ok(Self {
            config,
            root,
            menu: Menu::new(),
        })
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Cursor movement and other direct menu access
    pub fn menu_mut(&mut self) -> &mut Menu {
        &mut self.menu
    }

    pub fn get_root(&self) -> &str {
        self.root.get_root()
    }

    pub fn root(&self) -> &RootRegistry {
        &self.root
    }

    pub fn clear_menu(&mut self) {
        self.menu.clear();
    }

    /// Show every device
    pub fn enumerate_devices_for_menu(&mut self, host: &mut Host<'_>) -> Result<usize> {
        self.begin();
        let count = self.menu.show_devices(&mut *host.storage);
        log::info!("session: listed {} devices", count);
        self.finish(host, Ok(count))
    }

    /// Show the directory at `path`
    pub fn enumerate_path_for_menu(&mut self, host: &mut Host<'_>, path: &str) -> Result<usize> {
        self.begin();
        let result = match PathRef::parse(path, self.root.get_root()) {
            Ok(target) => {
                log::info!("session: listing {}", target);
                self.menu
                    .show_path(&mut *host.storage, &target)
                    .map_err(|partial| {
                        if !partial.entries.is_empty() {
                            host.screen.notify(&format!(
                                "partial listing: {} entries read before {}",
                                partial.entries.len(),
                                partial.error
                            ));
                        }
                        partial.error
                    })
            }
            Err(err) => Err(err),
        };
        self.finish(host, result)
    }

    /// Open `path`: directories are listed, files go to the launcher
    pub fn open_path(&mut self, host: &mut Host<'_>, path: &str) -> Result<Activation> {
        self.begin();
        let result = PathRef::parse(path, self.root.get_root()).and_then(|target| {
            log::info!("session: opening {}", target);
            self.open_target(host, &target)
        });
        self.finish(host, result)
    }

    /// Activate menu item `index` as the operator would by selecting it.
    /// An index past the end or a placeholder item leaves everything as is.
    pub fn activate(&mut self, host: &mut Host<'_>, index: usize) -> Result<Activation> {
        self.root.init_once();
        match self.menu.items().get(index).map(|item| &item.action) {
            None => {
                log::warn!("session: no menu item {} of {}", index, self.menu.len());
                return Err(FmError::BadArgument);
            }
            Some(Action::None) => return Ok(Activation::Ignored),
            Some(_) => {}
        }

        let result = self
            .menu
            .activate(index, &mut *host.storage, &mut *host.launcher);
        if let Ok(Activation::Launched(request)) = &result {
            self.follow_launch(request.target.device());
        }
        self.finish(host, result)
    }

    /// Change the root. `None` means no change was asked for.
    pub fn set_root(&mut self, label: Option<&str>) -> Result<()> {
        self.root.init_once();
        self.root.set_root(label)
    }

    /// Dump `path` in hex. Needs the minimum display resolution.
    pub fn hex_dump(&mut self, host: &mut Host<'_>, path: &str) -> Result<u64> {
        self.hex_dump_range(host, path, 0, u64::MAX)
    }

    /// Dump at most `len` bytes of `path` starting at byte `start`
    pub fn hex_dump_range(
        &mut self,
        host: &mut Host<'_>,
        path: &str,
        start: u64,
        len: u64,
    ) -> Result<u64> {
        let target = PathRef::parse(path, self.root.get_root())?;
        let viewer = HexViewer::new(&self.config);
        viewer
            .dump_range(&mut *host.storage, &mut *host.screen, &target, start, len)
            .inspect_err(|err| host.screen.notify(&format!("{}", err)))
    }

    /// Show the captured log records. Returns how many were shown.
    pub fn debug(&mut self, host: &mut Host<'_>) -> usize {
        let records = logger::records();
        host.screen.clear();
        host.screen.put_line(&format!("root: {}", self.root.get_root()));
        for line in &records {
            host.screen.put_line(line);
        }
        records.len()
    }

    fn begin(&mut self) {
        self.root.init_once();
        self.menu.clear();
    }

    fn open_target(&mut self, host: &mut Host<'_>, target: &PathRef) -> Result<Activation> {
        let is_dir = resolve(&mut *host.storage, target)?.is_dir();
        if is_dir {
            let count = self.menu.show_path(&mut *host.storage, target)?;
            return Ok(Activation::Listed(count));
        }

        let request = launch_file(&mut *host.storage, target, &mut *host.launcher)?;
        self.follow_launch(request.target.device());
        Ok(Activation::Launched(request))
    }

    fn follow_launch(&mut self, device: &str) {
        if !self.config.root_follows_open {
            return;
        }
        if let Err(err) = self.root.set_root(Some(device)) {
            log::warn!("session: root stays {}: {}", self.root.get_root(), err);
        }
    }

    /// Render the outcome and fire the boot script
    fn finish<T>(&mut self, host: &mut Host<'_>, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.menu.render(&mut *host.screen, self.config.menu_rows),
            Err(err) => {
                log::warn!("session: {}", err);
                host.screen.notify(&format!("{}", err));
            }
        }
        script::fire(&mut *host.scripts, self.root.get_root(), self.config.script_path);
        result
    }
}
