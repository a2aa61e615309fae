//! File format registry.
//!
//! | extension | encoding | modes      |
//! |-----------|----------|------------|
//! | `.stage`  | binary (text also accepted on read) | read, write |
//! | `.stagea` | text     | read, write |
//! | `.stagec` | binary   | read, write |

use std::path::Path;

use crate::stage::LayerEncoding;
use crate::util::{Error, Result};

/// What a registered format supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatModes {
    pub read: bool,
    pub write: bool,
}

/// A registered file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileFormat {
    /// Extension without the dot.
    pub extension: &'static str,
    /// Encoding used when writing.
    pub encoding: LayerEncoding,
    pub modes: FormatModes,
}

const READ_WRITE: FormatModes = FormatModes {
    read: true,
    write: true,
};

/// Registered formats.
pub const FORMATS: [FileFormat; 3] = [
    FileFormat {
        extension: "stage",
        encoding: LayerEncoding::Binary,
        modes: READ_WRITE,
    },
    FileFormat {
        extension: "stagea",
        encoding: LayerEncoding::Text,
        modes: READ_WRITE,
    },
    FileFormat {
        extension: "stagec",
        encoding: LayerEncoding::Binary,
        modes: READ_WRITE,
    },
];

/// Look up the format for `path` by extension (case-insensitive).
pub fn lookup(path: &Path) -> Option<&'static FileFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    FORMATS.iter().find(|f| f.extension == ext)
}

/// Format for reading `path`.
pub fn for_read(path: &Path) -> Result<&'static FileFormat> {
    lookup(path)
        .filter(|f| f.modes.read)
        .ok_or_else(|| Error::open(path, "unrecognised file extension"))
}

/// Format for writing `path`.
pub fn for_write(path: &Path) -> Result<&'static FileFormat> {
    lookup(path)
        .filter(|f| f.modes.write)
        .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))
}

/// Extensions accepted by the registry, with dots.
pub fn supported_extensions() -> Vec<String> {
    FORMATS.iter().map(|f| format!(".{}", f.extension)).collect()
}
