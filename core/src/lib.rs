//! Bootfm Core Library
//!
//! Boot-time file and device browser: device enumeration, directory
//! listing, a navigable menu over both, the session root used to locate the
//! post-action boot script, and a hex viewer.
//! Designed to be no_std compatible.

#![no_std]

extern crate alloc;

pub mod catalog;
pub mod classify;
pub mod command;
pub mod config;
pub mod disk;
pub mod error;
pub mod hexdump;
pub mod launch;
pub mod logger;
pub mod menu;
pub mod path;
pub mod root;
pub mod screen;
pub mod script;
pub mod session;
pub mod storage;
pub mod walker;

pub use catalog::{enumerate_devices, DeviceCaps, DeviceEntry};
pub use command::{Command, Outcome};
pub use config::BrowserConfig;
pub use error::{FmError, Result, StorageError};
pub use launch::{LaunchRequest, Launcher};
pub use menu::{Action, Activation, ItemKind, Menu, MenuItem};
pub use path::PathRef;
pub use root::RootRegistry;
pub use screen::Screen;
pub use script::ScriptHost;
pub use session::{Host, Session};
pub use storage::{FileReader, Storage};
pub use walker::{list_directory, resolve_file, FsEntry};
