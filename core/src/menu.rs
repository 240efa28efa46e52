//! Menu model
//!
//! The navigable item set shown by the browser. Every enumeration replaces
//! the whole set; there is no incremental update. Items carry a tagged kind
//! (device, directory, file) and the action taken when they are activated.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::catalog::{enumerate_devices, DeviceEntry};
use crate::error::{FmError, Result};
use crate::launch::{launch_file, LaunchRequest, Launcher};
use crate::path::PathRef;
use crate::screen::Screen;
use crate::storage::{human_size, Storage};
use crate::walker::{read_listing, FsEntry, PartialListing};

/// What activating an item does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// List the root directory of a device
    EnterDevice(String),
    EnterDirectory(PathRef),
    /// Hand the file, or a raw device without a filesystem, to the launcher
    OpenFile(PathRef),
    /// Placeholder, activation does nothing
    None,
}

/// Entry an item wraps
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Device(DeviceEntry),
    Directory(FsEntry),
    File(FsEntry),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub action: Action,
    pub kind: ItemKind,
}

impl MenuItem {
    fn device(entry: DeviceEntry) -> Self {
        let action = if !entry.is_readable() {
            Action::None
        } else if entry.has_filesystem() {
            Action::EnterDevice(entry.label.clone())
        } else {
            // nothing to list: the raw device goes to the launcher
            PathRef::new(&entry.label, "").map_or(Action::None, Action::OpenFile)
        };
        Self {
            label: format!("({}) {}", entry.label, entry.description),
            action,
            kind: ItemKind::Device(entry),
        }
    }

    fn entry(entry: FsEntry) -> Self {
        if entry.is_dir() {
            Self {
                label: format!("{}/", entry.name),
                action: Action::EnterDirectory(entry.path()),
                kind: ItemKind::Directory(entry),
            }
        } else {
            Self {
                label: format!("{}  {}", entry.name, human_size(entry.size.unwrap_or(0))),
                action: Action::OpenFile(entry.path()),
                kind: ItemKind::File(entry),
            }
        }
    }
}

/// Result of activating an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// A new listing with this many items is shown
    Listed(usize),
    /// The launcher accepted the file and returned
    Launched(LaunchRequest),
    /// Placeholder item, nothing happened
    Ignored,
}

/// Current item set and navigation context
#[derive(Debug, Default)]
pub struct Menu {
    items: Vec<MenuItem>,
    context: Option<PathRef>,
    selected: usize,
    scroll: usize,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all items and forget the context
    pub fn clear(&mut self) {
        self.items.clear();
        self.context = None;
        self.selected = 0;
        self.scroll = 0;
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Directory being shown, `None` for the device list
    pub fn context(&self) -> Option<&PathRef> {
        self.context.as_ref()
    }

    /// Replace the items with one per visible device
    pub fn show_devices<S: Storage + ?Sized>(&mut self, storage: &mut S) -> usize {
        self.clear();
        self.items.extend(enumerate_devices(storage).map(MenuItem::device));
        log::debug!("menu: {} devices", self.items.len());
        self.items.len()
    }

    /// Replace the items with the listing of `target`. On failure the menu
    /// is left empty and the gathered entries come back with the error.
    pub fn show_path<S: Storage + ?Sized>(
        &mut self,
        storage: &mut S,
        target: &PathRef,
    ) -> core::result::Result<usize, PartialListing> {
        self.clear();
        let entries = read_listing(storage, target)?;

        // a raw device is listed from its root directory
        let context = if target.is_raw_device() {
            target.child("")
        } else {
            target.clone()
        };
        self.items.extend(entries.into_iter().map(MenuItem::entry));
        self.context = Some(context);
        log::debug!("menu: {} items in {}", self.items.len(), target);
        Ok(self.items.len())
    }

    /// Run the action of item `index`
    pub fn activate<S: Storage + ?Sized>(
        &mut self,
        index: usize,
        storage: &mut S,
        launcher: &mut dyn Launcher,
    ) -> Result<Activation> {
        let action = self
            .items
            .get(index)
            .map(|item| item.action.clone())
            .ok_or(FmError::BadArgument)?;

        match action {
            Action::EnterDevice(label) => {
                let target = PathRef::device_root(&label)?;
                Ok(Activation::Listed(self.show_path(storage, &target)?))
            }
            Action::EnterDirectory(target) => {
                Ok(Activation::Listed(self.show_path(storage, &target)?))
            }
            Action::OpenFile(target) => {
                launch_file(storage, &target, launcher).map(Activation::Launched)
            }
            Action::None => Ok(Activation::Ignored),
        }
    }

    /// Activate the highlighted item
    pub fn activate_selected<S: Storage + ?Sized>(
        &mut self,
        storage: &mut S,
        launcher: &mut dyn Launcher,
    ) -> Result<Activation> {
        self.activate(self.selected, storage, launcher)
    }

    /// Go one level up: parent directory, or the device list from a device root
    pub fn back<S: Storage + ?Sized>(&mut self, storage: &mut S) -> Result<usize> {
        match self.context.take() {
            Some(dir) if dir.path() != "/" => Ok(self.show_path(storage, &dir.parent())?),
            _ => Ok(self.show_devices(storage)),
        }
    }

    pub fn selected(&self) -> Option<&MenuItem> {
        self.items.get(self.selected)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Draw a title row and up to `rows` items, scrolled so the selection
    /// is visible
    pub fn render(&mut self, screen: &mut dyn Screen, rows: usize) {
        let rows = rows.max(1);
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + rows {
            self.scroll = self.selected + 1 - rows;
        }

        screen.clear();
        match &self.context {
            Some(dir) => screen.put_line(&format!("{}", dir)),
            None => screen.put_line("Devices"),
        }

        for (idx, item) in self.items.iter().enumerate().skip(self.scroll).take(rows) {
            let marker = if idx == self.selected { "> " } else { "  " };
            screen.put_line(&format!("{}{}", marker, item.label));
        }
    }
}
