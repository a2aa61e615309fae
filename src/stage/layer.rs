//! Layer storage: the prim table plus stage metadata, and its two encodings.
//!
//! Text layers are pretty-printed JSON. Binary layers are laid out as:
//!
//! ```text
//! [magic: 8 bytes "STAGEBIN"][version: u16 LE][flags: u16 LE][body]
//! ```
//!
//! where `body` is the JSON document compressed with [`crate::core::compress`].

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Cursor, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
#[cfg(feature = "mmap")]
use memmap2::Mmap;
use serde::{Deserialize, Serialize};

use super::path::StagePath;
use super::prim::Prim;
use crate::core::{compress, decompress, DEFAULT_TIME_CODES_PER_SECOND};
use crate::util::{Error, Result};

/// Magic bytes at the start of a binary layer.
pub const MAGIC: &[u8; 8] = b"STAGEBIN";

/// Current binary layer version.
pub const VERSION: u16 = 1;

const HEADER_SIZE: usize = 12;

/// The stage's up axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpAxis {
    #[default]
    Y,
    Z,
}

/// On-disk encoding of a layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerEncoding {
    Text,
    Binary,
}

/// Prims keyed by absolute path, plus stage-level metadata.
///
/// The pseudo-root `/` is always present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub time_codes_per_second: f64,
    #[serde(default)]
    pub up_axis: UpAxis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_prim: Option<String>,
    pub prims: BTreeMap<StagePath, Prim>,
}

impl Default for Layer {
    fn default() -> Self {
        let mut prims = BTreeMap::new();
        prims.insert(StagePath::absolute_root(), Prim::default());
        Self {
            time_codes_per_second: DEFAULT_TIME_CODES_PER_SECOND,
            up_axis: UpAxis::Y,
            default_prim: None,
            prims,
        }
    }
}

impl Layer {
    /// Read a layer from disk, detecting the encoding from its first bytes.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)?;

        #[cfg(feature = "mmap")]
        {
            if file.metadata()?.len() > 0 {
                // Safety: the map is read-only and dropped before this call returns.
                let mmap = unsafe { Mmap::map(&file) }?;
                return Self::from_bytes(&mmap);
            }
        }

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Decode a layer from memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let layer: Layer = if bytes.starts_with(MAGIC) {
            let body = Self::binary_body(bytes)?;
            serde_json::from_slice(&body)?
        } else {
            serde_json::from_slice(bytes)?
        };
        layer.validate()?;
        Ok(layer)
    }

    fn binary_body(bytes: &[u8]) -> Result<Vec<u8>> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::InvalidMagic);
        }
        let mut cursor = Cursor::new(&bytes[MAGIC.len()..HEADER_SIZE]);
        let version = cursor.read_u16::<LittleEndian>()?;
        let _flags = cursor.read_u16::<LittleEndian>()?;
        if version != VERSION {
            return Err(Error::UnsupportedVersion(version));
        }
        decompress(&bytes[HEADER_SIZE..])
    }

    /// Encode the layer.
    pub fn to_bytes(&self, encoding: LayerEncoding, compression_level: u32) -> Result<Vec<u8>> {
        match encoding {
            LayerEncoding::Text => {
                let mut out = serde_json::to_vec_pretty(self)?;
                out.push(b'\n');
                Ok(out)
            }
            LayerEncoding::Binary => {
                let json = serde_json::to_vec(self)?;
                let body = compress(&json, compression_level)?;
                let mut out = Vec::with_capacity(HEADER_SIZE + body.len());
                out.write_all(MAGIC)?;
                out.write_u16::<LittleEndian>(VERSION)?;
                out.write_u16::<LittleEndian>(0)?;
                out.write_all(&body)?;
                Ok(out)
            }
        }
    }

    /// Write the layer to disk.
    pub fn write(
        &self,
        path: impl AsRef<Path>,
        encoding: LayerEncoding,
        compression_level: u32,
    ) -> Result<()> {
        let bytes = self.to_bytes(encoding, compression_level)?;
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(self.time_codes_per_second > 0.0) {
            return Err(Error::other(format!(
                "timeCodesPerSecond must be positive, got {}",
                self.time_codes_per_second
            )));
        }
        if !self.prims.contains_key(&StagePath::absolute_root()) {
            return Err(Error::other("layer has no pseudo-root"));
        }
        for path in self.prims.keys() {
            if !path.is_absolute() {
                return Err(Error::InvalidPath(format!("'{}' is not absolute", path)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_layer() -> Layer {
        let mut layer = Layer::default();
        layer.up_axis = UpAxis::Z;
        layer.default_prim = Some("world".into());
        let world = StagePath::new("/world").unwrap();
        layer
            .prims
            .get_mut(&StagePath::absolute_root())
            .unwrap()
            .add_child("world");
        layer.prims.insert(world, Prim::new("Xform"));
        layer
    }

    #[test]
    fn test_text_encoding() {
        let layer = sample_layer();
        let bytes = layer.to_bytes(LayerEncoding::Text, 0).unwrap();
        assert_eq!(bytes[0], b'{');
        assert_eq!(Layer::from_bytes(&bytes).unwrap(), layer);
    }

    #[test]
    fn test_binary_encoding() {
        let layer = sample_layer();
        let bytes = layer.to_bytes(LayerEncoding::Binary, 6).unwrap();
        assert!(bytes.starts_with(MAGIC));
        assert_eq!(Layer::from_bytes(&bytes).unwrap(), layer);
    }

    #[test]
    fn test_rejects_bad_version_and_garbage() {
        let mut bytes = sample_layer().to_bytes(LayerEncoding::Binary, 1).unwrap();
        bytes[8] = 9;
        assert!(matches!(Layer::from_bytes(&bytes), Err(Error::UnsupportedVersion(9))));
        assert!(Layer::from_bytes(b"not a layer").is_err());
        assert!(Layer::from_bytes(b"STAGEBIN").is_err());
    }

    #[test]
    fn test_rejects_missing_root() {
        let json = br#"{"timeCodesPerSecond":24.0,"prims":{}}"#;
        assert!(Layer::from_bytes(json).is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layer.stage");
        let layer = sample_layer();
        layer.write(&path, LayerEncoding::Binary, 6).unwrap();
        assert_eq!(Layer::read(&path).unwrap(), layer);
    }
}
