//! The scene ⇄ stage translator.
//!
//! [`Location`] implements [`crate::scene::SceneInterface`] over a stage held
//! by a shared [`Session`]. The submodules hold the per-concern rules:
//! - [`path`] - scene path ⇄ stage path codec
//! - [`attributes`] - `sceneStage:` custom attributes
//! - [`sets`] - sets and tags over collections
//! - [`hash`] - change-detection digests
//! - [`hierarchy`] - child enumeration and lookup
//! - [`format`] - file extension registry
//!
//! # Example
//!
//! ```no_run
//! use scene_stage::scene::{MissingBehaviour, SceneInterface};
//! use scene_stage::translate::{Location, OpenMode};
//!
//! let root = Location::open("shot.stage", OpenMode::Read)?;
//! for name in root.child_names() {
//!     let child = root.child(&name, MissingBehaviour::ThrowIfMissing)?;
//!     println!("{} has object: {}", name, child.map_or(false, |c| c.has_object()));
//! }
//! # Ok::<(), scene_stage::Error>(())
//! ```

pub mod attributes;
pub mod format;
pub mod hash;
pub mod hierarchy;
mod location;
pub mod path;
mod session;
pub mod sets;

pub use location::Location;
pub use session::{OpenMode, Session, WriteOptions};
