//! Command front end
//!
//! Maps the bootloader command set onto `Session` calls:
//!
//! | command                    | action                     |
//! |----------------------------|----------------------------|
//! | `grubfm [PATH]`            | list devices, or `PATH`    |
//! | `grubfm_open PATH`         | open a file or directory   |
//! | `grubfm_set --root DEVICE` | change the root            |
//! | `grubfm_dbg`               | show captured log records  |
//! | `grubfm_hex PATH`          | hex dump                   |

use crate::error::{FmError, Result};
use crate::menu::Activation;
use crate::session::{Host, Session};

/// A parsed command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Browse(Option<&'a str>),
    Open(&'a str),
    /// `None` when no root was asked for; applying it changes nothing
    SetRoot(Option<&'a str>),
    Debug,
    Hex(&'a str),
}

/// What a command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Listed(usize),
    Opened(Activation),
    RootSet,
    Dumped(u64),
    LogShown(usize),
}

impl<'a> Command<'a> {
    /// Parse `name` and its arguments
    pub fn parse(name: &str, args: &[&'a str]) -> Result<Self> {
        match name {
            "grubfm" => match *args {
                [] => Ok(Self::Browse(None)),
                [path] => Ok(Self::Browse(Some(path))),
                _ => Err(FmError::BadArgument),
            },
            "grubfm_open" => match *args {
                [path] => Ok(Self::Open(path)),
                _ => Err(FmError::BadArgument),
            },
            "grubfm_set" => Ok(Self::SetRoot(parse_root_option(args)?)),
            "grubfm_dbg" => Ok(Self::Debug),
            "grubfm_hex" => match *args {
                [path] => Ok(Self::Hex(path)),
                _ => Err(FmError::BadArgument),
            },
            _ => {
                log::warn!("command: unknown {}", name);
                Err(FmError::BadArgument)
            }
        }
    }
}

/// `--root DEVICE`, `-r DEVICE` or `--root=DEVICE`. Anything short of
/// exactly one device with the flag set is treated as no request.
fn parse_root_option<'a>(args: &[&'a str]) -> Result<Option<&'a str>> {
    let mut flag = false;
    let mut device = None;
    let mut positional = 0;

    for &arg in args {
        if arg == "--root" || arg == "-r" {
            flag = true;
        } else if let Some(value) = arg.strip_prefix("--root=") {
            flag = true;
            device = Some(value);
            positional += 1;
        } else if arg.starts_with('-') {
            return Err(FmError::BadArgument);
        } else {
            device = Some(arg);
            positional += 1;
        }
    }

    Ok(if flag && positional == 1 { device } else { None })
}

impl Session {
    /// Execute a parsed command
    pub fn run(&mut self, host: &mut Host<'_>, command: Command<'_>) -> Result<Outcome> {
        match command {
            Command::Browse(None) => self.enumerate_devices_for_menu(host).map(Outcome::Listed),
            Command::Browse(Some(path)) => self
                .enumerate_path_for_menu(host, path)
                .map(Outcome::Listed),
            Command::Open(path) => self.open_path(host, path).map(Outcome::Opened),
            Command::SetRoot(label) => self.set_root(label).map(|()| Outcome::RootSet),
            Command::Debug => Ok(Outcome::LogShown(self.debug(host))),
            Command::Hex(path) => self.hex_dump(host, path).map(Outcome::Dumped),
        }
    }

    /// Parse and execute in one step
    pub fn execute(&mut self, host: &mut Host<'_>, name: &str, args: &[&str]) -> Result<Outcome> {
        let command = Command::parse(name, args)?;
        log::debug!("command: {:?}", command);
        self.run(host, command)
    }
}
