//! Hand-off of a selected file to the host's boot/execution path

use crate::classify::{classify, FileClass};
use crate::error::Result;
use crate::path::PathRef;
use crate::storage::{FileReader, Storage};
use crate::walker::resolve_file;

/// What the launcher is asked to open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub target: PathRef,
    pub size: u64,
    pub class: FileClass,
}

/// Boot or execute a file. On real hardware a successful launch usually
/// does not return.
pub trait Launcher {
    fn launch(&mut self, request: &LaunchRequest, file: &mut dyn FileReader) -> Result<()>;
}

/// Resolve `target` as a file, classify it and pass it to `launcher`.
/// The file handle is released whether or not the launch returns.
pub fn launch_file<S: Storage + ?Sized>(
    storage: &mut S,
    target: &PathRef,
    launcher: &mut dyn Launcher,
) -> Result<LaunchRequest> {
    let mut file = resolve_file(storage, target)?;
    let name = target.file_name().unwrap_or(target.device());
    let class = classify(name, &mut file);
    let request = LaunchRequest {
        target: target.clone(),
        size: file.size(),
        class,
    };

    log::info!(
        "launch: {} ({}, {} bytes)",
        request.target,
        request.class.as_str(),
        request.size
    );
    launcher.launch(&request, &mut file)?;
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FmError;
    use crate::storage::{MemStorage, MemVolume};
    use alloc::vec::Vec;

    #[derive(Default)]
    struct Capture {
        heads: Vec<Vec<u8>>,
    }

    impl Launcher for Capture {
        fn launch(&mut self, _request: &LaunchRequest, file: &mut dyn FileReader) -> Result<()> {
            let mut head = [0u8; 4];
            let n = file.read_at(0, &mut head)?;
            self.heads.push(head[..n].to_vec());
            Ok(())
        }
    }

    fn storage() -> MemStorage {
        MemStorage::new().with_volume(
            "memdisk",
            MemVolume::new()
                .file("/boot/vmlinuz", b"MZ\x00\x01kernel")
                .file("/notes", b"plain text"),
        )
    }

    #[test]
    fn test_launch_file_classifies_and_closes() {
        let mut storage = storage();
        let mut launcher = Capture::default();
        let target = PathRef::parse("(memdisk)/boot/vmlinuz", "memdisk").unwrap();

        let request = launch_file(&mut storage, &target, &mut launcher).unwrap();
        assert_eq!(request.class, FileClass::Kernel);
        assert_eq!(request.size, 10);
        assert_eq!(launcher.heads, alloc::vec![b"MZ\x00\x01".to_vec()]);
        assert_eq!(storage.open_handles(), 0);
    }

    #[test]
    fn test_launch_sniffs_unnamed_text() {
        let mut storage = storage();
        let mut launcher = Capture::default();
        let target = PathRef::parse("(memdisk)/notes", "memdisk").unwrap();
        let request = launch_file(&mut storage, &target, &mut launcher).unwrap();
        assert_eq!(request.class, FileClass::Text);
    }

    #[test]
    fn test_launch_directory_fails() {
        let mut storage = storage();
        let mut launcher = Capture::default();
        let target = PathRef::parse("(memdisk)/boot", "memdisk").unwrap();
        assert_eq!(
            launch_file(&mut storage, &target, &mut launcher),
            Err(FmError::IsADirectory)
        );
        assert!(launcher.heads.is_empty());
        assert_eq!(storage.open_handles(), 0);
    }
}
