//! Reader/writer sessions over one stage.
//!
//! A [`Session`] owns the stage and is shared by every [`super::Location`]
//! navigated from it. Writers save the stage exactly once: on the first
//! [`Session::persist`] call or when the session is dropped.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::format;
use crate::core::{Diagnostics, TimeCode, TimeMapping, Warning, DEFAULT_TIME_CODES_PER_SECOND};
use crate::stage::{LayerEncoding, Stage, UpAxis, DEFAULT_COMPRESSION_LEVEL};
use crate::util::{Chrono, Error, Result};

/// How a session was opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
}

/// Settings for a newly created stage.
#[derive(Clone, Debug, PartialEq)]
pub struct WriteOptions {
    /// Stage rate; also the seconds → time code factor.
    pub time_codes_per_second: f64,
    pub up_axis: UpAxis,
    /// Overrides the encoding chosen from the file extension.
    pub encoding: Option<LayerEncoding>,
    /// zlib level for binary layers (0-9).
    pub compression_level: u32,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            time_codes_per_second: DEFAULT_TIME_CODES_PER_SECOND,
            up_axis: UpAxis::Y,
            encoding: None,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

/// One open stage and its translation state.
#[derive(Debug)]
pub struct Session {
    file_name: String,
    mode: OpenMode,
    stage: RwLock<Stage>,
    time: TimeMapping,
    diagnostics: Diagnostics,
    persisted: AtomicBool,
}

impl Session {
    /// Open an existing stage read-only.
    pub fn reader(path: impl AsRef<Path>) -> Result<Arc<Self>> {
        let path = path.as_ref();
        format::for_read(path)?;
        let stage = Stage::open(path)?;
        let time = TimeMapping::new(stage.time_codes_per_second());
        Ok(Arc::new(Self::new(path, OpenMode::Read, stage, time)))
    }

    /// Create a new, empty stage. Any existing file is replaced when the
    /// session persists.
    pub fn writer(path: impl AsRef<Path>, options: &WriteOptions) -> Result<Arc<Self>> {
        let path = path.as_ref();
        let format = format::for_write(path)?;
        let mut stage = Stage::create_new(path, options.encoding.unwrap_or(format.encoding));
        stage.set_time_codes_per_second(options.time_codes_per_second)?;
        stage.set_up_axis(options.up_axis);
        stage.set_compression_level(options.compression_level);
        let time = TimeMapping::new(options.time_codes_per_second);
        tracing::debug!(path = %path.display(), "created stage");
        Ok(Arc::new(Self::new(path, OpenMode::Write, stage, time)))
    }

    /// Open `path` in `mode` with default write options.
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Arc<Self>> {
        match mode {
            OpenMode::Read => Self::reader(path),
            OpenMode::Write => Self::writer(path, &WriteOptions::default()),
        }
    }

    fn new(path: &Path, mode: OpenMode, stage: Stage, time: TimeMapping) -> Self {
        Self {
            file_name: path.display().to_string(),
            mode,
            stage: RwLock::new(stage),
            time,
            diagnostics: Diagnostics::new(),
            persisted: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[inline]
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.mode == OpenMode::Write
    }

    /// Fails with [`Error::UnsupportedOperation`] on a reader.
    pub fn check_writable(&self, operation: &str) -> Result<()> {
        if self.is_writable() {
            Ok(())
        } else {
            Err(Error::unsupported(format!(
                "{} on read-only stage '{}'",
                operation, self.file_name
            )))
        }
    }

    #[inline]
    pub fn samples_per_second(&self) -> f64 {
        self.time.samples_per_second()
    }

    #[inline]
    pub fn time_code(&self, seconds: Chrono) -> TimeCode {
        self.time.to_time_code(seconds)
    }

    pub fn stage(&self) -> RwLockReadGuard<'_, Stage> {
        self.stage.read()
    }

    pub(crate) fn stage_mut(&self) -> RwLockWriteGuard<'_, Stage> {
        self.stage.write()
    }

    #[inline]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Drain the warnings recorded so far.
    pub fn take_warnings(&self) -> Vec<Warning> {
        self.diagnostics.take()
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted.load(Ordering::Acquire)
    }

    /// Save a writer's stage. Only the first call writes; readers and later
    /// calls do nothing.
    pub fn persist(&self) -> Result<()> {
        if !self.is_writable() || self.persisted.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.stage.read().save()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(e) = self.persist() {
            tracing::error!(path = %self.file_name, error = %e, "failed to save stage");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::StagePath;
    use tempfile::TempDir;

    #[test]
    fn test_writer_persists_on_drop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.stagea");
        {
            let session = Session::writer(&path, &WriteOptions::default()).unwrap();
            session
                .stage_mut()
                .define_prim(&StagePath::new("/a").unwrap(), "Xform")
                .unwrap();
            assert!(!path.exists());
        }
        let reader = Session::reader(&path).unwrap();
        assert!(reader.stage().has_prim(&StagePath::new("/a").unwrap()));
        assert!(!reader.is_writable());
    }

    #[test]
    fn test_persist_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.stage");
        let session = Session::writer(&path, &WriteOptions::default()).unwrap();
        session.persist().unwrap();
        std::fs::remove_file(&path).unwrap();

        session.persist().unwrap();
        drop(session);
        assert!(!path.exists());
    }

    #[test]
    fn test_rate_from_options() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rate.stagec");
        let options = WriteOptions {
            time_codes_per_second: 30.0,
            ..Default::default()
        };
        let session = Session::writer(&path, &options).unwrap();
        assert_eq!(session.time_code(2.0), TimeCode::Time(60.0));
        drop(session);

        let reader = Session::reader(&path).unwrap();
        assert_eq!(reader.samples_per_second(), 30.0);
    }

    #[test]
    fn test_open_errors() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Session::reader(dir.path().join("missing.stage")),
            Err(Error::Open { .. })
        ));
        assert!(matches!(
            Session::writer(dir.path().join("x.abc"), &WriteOptions::default()),
            Err(Error::UnsupportedFormat(_))
        ));
        let reader_err = Session::reader(dir.path().join("x.abc"));
        assert!(matches!(reader_err, Err(Error::Open { .. })));
    }
}
