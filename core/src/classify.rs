//! File classification
//!
//! Decides what kind of payload a file is before it is handed to the
//! launcher: by extension or well-known kernel name first, then by sniffing
//! the leading bytes.

use crate::storage::FileReader;

/// Bytes inspected when the name gives no hint
pub const SNIFF_LEN: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    Iso,
    DiskImage,
    Efi,
    Kernel,
    Script,
    Text,
    Image,
    Font,
    Binary,
}

impl FileClass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Iso => "iso",
            Self::DiskImage => "disk image",
            Self::Efi => "efi",
            Self::Kernel => "kernel",
            Self::Script => "script",
            Self::Text => "text",
            Self::Image => "image",
            Self::Font => "font",
            Self::Binary => "binary",
        }
    }

    /// Classification from the name alone
    pub fn from_name(name: &str) -> Option<Self> {
        let starts = |prefix: &str| {
            name.len() >= prefix.len()
                && name.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
        };
        if starts("vmlinuz") || starts("bzimage") {
            return Some(Self::Kernel);
        }

        let (_, ext) = name.rsplit_once('.')?;
        let class = match ext.to_ascii_lowercase().as_str() {
            "iso" => Self::Iso,
            "img" | "ima" | "vhd" | "vhdx" | "raw" => Self::DiskImage,
            "efi" => Self::Efi,
            "sh" | "cfg" | "lua" => Self::Script,
            "txt" | "ini" | "conf" | "lst" | "md" | "log" => Self::Text,
            "png" | "jpg" | "jpeg" | "bmp" | "tga" => Self::Image,
            "pf2" => Self::Font,
            _ => return None,
        };
        Some(class)
    }

    /// Text if the bytes are printable UTF-8, binary otherwise
    pub fn sniff(bytes: &[u8]) -> Self {
        // a cut multi-byte sequence at the end of the window is still text
        let text = match core::str::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) if e.error_len().is_none() => {
                // valid_up_to is a char boundary
                match core::str::from_utf8(&bytes[..e.valid_up_to()]) {
                    Ok(s) => s,
                    Err(_) => return Self::Binary,
                }
            }
            Err(_) => return Self::Binary,
        };

        if text
            .chars()
            .all(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
        {
            Self::Text
        } else {
            Self::Binary
        }
    }
}

/// Classify an open file. Falls back to `Binary` if the sniff read fails.
pub fn classify(name: &str, file: &mut dyn FileReader) -> FileClass {
    if let Some(class) = FileClass::from_name(name) {
        return class;
    }

    let mut head = [0u8; SNIFF_LEN];
    match file.read_at(0, &mut head) {
        Ok(n) => FileClass::sniff(&head[..n]),
        Err(err) => {
            log::warn!("classify: cannot sniff {}: {}", name, err);
            FileClass::Binary
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(FileClass::from_name("ubuntu.ISO"), Some(FileClass::Iso));
        assert_eq!(FileClass::from_name("vmlinuz-6.1"), Some(FileClass::Kernel));
        assert_eq!(FileClass::from_name("global.sh"), Some(FileClass::Script));
        assert_eq!(FileClass::from_name("BOOTX64.EFI"), Some(FileClass::Efi));
        assert_eq!(FileClass::from_name("unicode.pf2"), Some(FileClass::Font));
        assert_eq!(FileClass::from_name("README"), None);
        assert_eq!(FileClass::from_name("data.bin"), None);
    }

    #[test]
    fn test_sniff() {
        assert_eq!(FileClass::sniff(b"hello\nworld\t!"), FileClass::Text);
        assert_eq!(FileClass::sniff(b"\x7fELF\x02\x01\x01\x00"), FileClass::Binary);
        assert_eq!(FileClass::sniff(&[0xff, 0xfe, 0x00]), FileClass::Binary);
        // "é" cut after its first byte
        assert_eq!(FileClass::sniff(&[b'c', b'a', b'f', 0xc3]), FileClass::Text);
        assert_eq!(FileClass::sniff(b""), FileClass::Text);
    }
}
