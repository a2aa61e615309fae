//! The stage: a single layer bound to a file on disk.

use std::path::{Path, PathBuf};

use super::layer::{Layer, LayerEncoding, UpAxis};
use super::path::StagePath;
use super::prim::Prim;
use crate::util::{Error, Result};

/// Default zlib level for binary layers.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// An in-memory stage and the file it is saved to.
#[derive(Debug)]
pub struct Stage {
    path: PathBuf,
    layer: Layer,
    encoding: LayerEncoding,
    compression_level: u32,
}

impl Stage {
    /// Open an existing stage file. Any failure is reported as [`Error::Open`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let layer = Layer::read(path).map_err(|e| Error::open(path, e))?;
        tracing::debug!(
            path = %path.display(),
            prims = layer.prims.len(),
            "opened stage"
        );
        Ok(Self {
            path: path.to_path_buf(),
            layer,
            encoding: LayerEncoding::Binary,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        })
    }

    /// Create an empty stage in memory. Nothing touches the disk until
    /// [`Stage::save`].
    pub fn create_new(path: impl AsRef<Path>, encoding: LayerEncoding) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            layer: Layer::default(),
            encoding,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    /// Write the layer to the stage's file.
    pub fn save(&self) -> Result<()> {
        self.layer
            .write(&self.path, self.encoding, self.compression_level)?;
        tracing::debug!(path = %self.path.display(), "saved stage");
        Ok(())
    }

    #[inline]
    pub fn file_path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    pub fn encoding(&self) -> LayerEncoding {
        self.encoding
    }

    pub fn set_compression_level(&mut self, level: u32) {
        self.compression_level = level.min(9);
    }

    // --- metadata ---

    #[inline]
    pub fn time_codes_per_second(&self) -> f64 {
        self.layer.time_codes_per_second
    }

    pub fn set_time_codes_per_second(&mut self, rate: f64) -> Result<()> {
        if !(rate > 0.0) {
            return Err(Error::invalid_argument(format!(
                "time codes per second must be positive, got {}",
                rate
            )));
        }
        self.layer.time_codes_per_second = rate;
        Ok(())
    }

    #[inline]
    pub fn up_axis(&self) -> UpAxis {
        self.layer.up_axis
    }

    pub fn set_up_axis(&mut self, axis: UpAxis) {
        self.layer.up_axis = axis;
    }

    // --- prims ---

    pub fn pseudo_root(&self) -> StagePath {
        StagePath::absolute_root()
    }

    pub fn prim(&self, path: &StagePath) -> Option<&Prim> {
        self.layer.prims.get(path)
    }

    pub fn prim_mut(&mut self, path: &StagePath) -> Option<&mut Prim> {
        self.layer.prims.get_mut(path)
    }

    pub fn has_prim(&self, path: &StagePath) -> bool {
        self.layer.prims.contains_key(path)
    }

    /// Define a prim of `type_name` at `path`, creating typeless ancestors as
    /// needed. An existing prim keeps its contents; a non-empty `type_name`
    /// retypes it.
    pub fn define_prim(&mut self, path: &StagePath, type_name: &str) -> Result<&mut Prim> {
        if !path.is_absolute() || path.is_root() {
            return Err(Error::InvalidPath(format!(
                "cannot define a prim at '{}'",
                path
            )));
        }
        if let Some(parent) = path.parent() {
            if !self.has_prim(&parent) {
                self.define_prim(&parent, "")?;
            }
            if let Some(parent_prim) = self.layer.prims.get_mut(&parent) {
                parent_prim.add_child(path.name());
            }
        }
        let prim = self
            .layer
            .prims
            .entry(path.clone())
            .or_insert_with(|| Prim::new(type_name));
        if !type_name.is_empty() && prim.type_name() != type_name {
            prim.set_type_name(type_name);
        }
        Ok(prim)
    }

    /// Child paths in authored order.
    pub fn children(&self, path: &StagePath) -> Vec<StagePath> {
        self.prim(path)
            .map(|prim| {
                prim.children()
                    .iter()
                    .filter_map(|name| path.append_child(name).ok())
                    .filter(|child| self.has_prim(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every prim below `path` (excluding it), depth first in child order.
    pub fn descendants(&self, path: &StagePath) -> Vec<StagePath> {
        let mut out = Vec::new();
        let mut stack: Vec<StagePath> = self.children(path).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            stack.extend(self.children(&next).into_iter().rev());
            out.push(next);
        }
        out
    }

    /// The default prim, if set and present.
    pub fn default_prim(&self) -> Option<StagePath> {
        let name = self.layer.default_prim.as_deref()?;
        let path = StagePath::absolute_root().append_child(name).ok()?;
        self.has_prim(&path).then_some(path)
    }

    /// Set the default prim; it must be an existing root child.
    pub fn set_default_prim(&mut self, path: &StagePath) -> Result<()> {
        if path.parent().as_ref().map(StagePath::is_root) != Some(true) {
            return Err(Error::invalid_argument(format!(
                "default prim '{}' must be a root child",
                path
            )));
        }
        if !self.has_prim(path) {
            return Err(Error::PrimNotFound(path.to_string()));
        }
        self.layer.default_prim = Some(path.name().to_string());
        Ok(())
    }
}
