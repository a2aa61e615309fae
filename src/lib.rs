//! # scene-stage
//!
//! Bidirectional translation between an abstract, path-addressed scene
//! hierarchy and a typed, time-sampled stage store.
//!
//! Scene locations carry transforms, bounds, custom attributes, set and tag
//! memberships and at most one object (mesh, points, curves, sphere or
//! camera). The stage stores the same information as typed prims with
//! attributes, time samples, relationships and collections. Reads and writes
//! go through [`translate::Location`], which implements
//! [`scene::SceneInterface`].
//!
//! ## Modules
//!
//! - [`util`] - Errors and math types
//! - [`core`] - Time codes, interpolation, diagnostics, compression
//! - [`stage`] - The stage store (prims, attributes, collections, layer files)
//! - [`scene`] - The scene-side data model and interface trait
//! - [`geom`] - Object ⇄ prim conversion per geometry kind
//! - [`translate`] - Sessions, locations, sets/tags and hashing
//!
//! ## Example
//!
//! ```no_run
//! use scene_stage::prelude::*;
//!
//! let root = Location::create("out.stagea", &WriteOptions::default())?;
//! let child = root
//!     .child("sphere", MissingBehaviour::CreateIfMissing)?
//!     .expect("created");
//! child.write_object(&SpherePrimitive::new(2.0).into(), 0.0)?;
//! root.session().persist()?;
//! # Ok::<(), scene_stage::Error>(())
//! ```

pub mod util;
pub mod core;
pub mod stage;
pub mod scene;
pub mod geom;
pub mod translate;

// Re-export commonly used types
pub use util::{Error, Result};
pub use translate::{Location, OpenMode, Session, WriteOptions};

/// Build date stamped by the build script.
pub const BUILD_DATE: &str = env!("SCENE_STAGE_BUILD_DATE");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{BBox3d, Error, Result};
    pub use crate::core::{Interpolation, TimeCode};
    pub use crate::scene::*;
    pub use crate::translate::{Location, OpenMode, Session, WriteOptions};
}
