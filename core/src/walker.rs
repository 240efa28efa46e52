//! Directory walker
//!
//! Lists and resolves entries under a device path. Listings are produced
//! entry by entry from the provider's directory cursor; `read_listing`
//! gathers them and applies the browser's ordering:
//!
//! 1. directories before files
//! 2. within each group, ASCII case-insensitive by name
//! 3. ties broken by the raw name
//!
//! A provider that fails part-way does not produce a silently truncated
//! listing: the gathered entries come back next to the error in a
//! `PartialListing`.

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::error::{FmError, Result};
use crate::path::{PathRef, SEPARATOR};
use crate::storage::{NodeKind, OpenNode, RawEntry, Storage};

/// One file or directory under a device path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    pub name: String,
    pub kind: NodeKind,
    /// Byte length, files only
    pub size: Option<u64>,
    pub parent: PathRef,
}

impl FsEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Full reference to this entry
    pub fn path(&self) -> PathRef {
        self.parent.child(&self.name)
    }
}

/// Entries gathered before a listing failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialListing {
    pub entries: Vec<FsEntry>,
    pub error: FmError,
}

impl From<PartialListing> for FmError {
    fn from(partial: PartialListing) -> Self {
        partial.error
    }
}

/// Lazy listing of one directory. The directory handle is released when
/// the iterator is dropped.
pub struct DirEntries<'s, S: Storage + ?Sized> {
    dir: OpenNode<'s, S>,
    parent: PathRef,
    index: usize,
    done: bool,
}

impl<S: Storage + ?Sized> DirEntries<'_, S> {
    fn convert(&self, raw: RawEntry) -> FsEntry {
        let size = match raw.kind {
            NodeKind::File => Some(raw.size),
            NodeKind::Directory => None,
        };
        FsEntry {
            name: raw.name,
            kind: raw.kind,
            size,
            parent: self.parent.clone(),
        }
    }
}

impl<S: Storage + ?Sized> Iterator for DirEntries<'_, S> {
    type Item = Result<FsEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.dir.entry(self.index) {
                Ok(Some(raw)) => {
                    self.index += 1;
                    if raw.name == "." || raw.name == ".." {
                        continue;
                    }
                    if !is_valid_name(&raw.name) {
                        log::warn!(
                            "walker: skipping malformed entry {:?} in {}",
                            raw.name,
                            self.parent
                        );
                        continue;
                    }
                    return Some(Ok(self.convert(raw)));
                }
                Ok(None) => self.done = true,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
            }
        }
        None
    }
}

/// Entry names are non-empty and never contain the separator
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(SEPARATOR)
}

/// Start listing `target`. A raw-device target lists the device root.
pub fn list_directory<'s, S: Storage + ?Sized>(
    storage: &'s mut S,
    target: &PathRef,
) -> Result<DirEntries<'s, S>> {
    let parent = if target.is_raw_device() {
        PathRef::device_root(target.device())?
    } else {
        target.clone()
    };

    let dir = OpenNode::open(storage, parent.device(), parent.path())?;
    if !dir.is_dir() {
        return Err(FmError::NotADirectory);
    }

    Ok(DirEntries {
        dir,
        parent,
        index: 0,
        done: false,
    })
}

/// Full, ordered listing of `target`
pub fn read_listing<S: Storage + ?Sized>(
    storage: &mut S,
    target: &PathRef,
) -> core::result::Result<Vec<FsEntry>, PartialListing> {
    let entries = list_directory(storage, target).map_err(|error| PartialListing {
        entries: Vec::new(),
        error,
    })?;

    let mut gathered = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => gathered.push(entry),
            Err(error) => {
                log::warn!(
                    "walker: listing {} failed after {} entries: {}",
                    target,
                    gathered.len(),
                    error
                );
                sort_entries(&mut gathered);
                return Err(PartialListing {
                    entries: gathered,
                    error,
                });
            }
        }
    }

    sort_entries(&mut gathered);
    log::debug!("walker: {} entries in {}", gathered.len(), target);
    Ok(gathered)
}

/// Apply the listing order
pub fn sort_entries(entries: &mut [FsEntry]) {
    entries.sort_by(compare_entries);
}

fn compare_entries(a: &FsEntry, b: &FsEntry) -> Ordering {
    b.is_dir()
        .cmp(&a.is_dir())
        .then_with(|| {
            let a_lower = a.name.bytes().map(|c| c.to_ascii_lowercase());
            a_lower.cmp(b.name.bytes().map(|c| c.to_ascii_lowercase()))
        })
        .then_with(|| a.name.cmp(&b.name))
}

/// Open whatever `target` names
pub fn resolve<'s, S: Storage + ?Sized>(
    storage: &'s mut S,
    target: &PathRef,
) -> Result<OpenNode<'s, S>> {
    Ok(OpenNode::open(storage, target.device(), target.path())?)
}

/// Open `target` as a file
pub fn resolve_file<'s, S: Storage + ?Sized>(
    storage: &'s mut S,
    target: &PathRef,
) -> Result<OpenNode<'s, S>> {
    let node = resolve(storage, target)?;
    if node.is_dir() {
        return Err(FmError::IsADirectory);
    }
    Ok(node)
}
