//! The stage store: a typed, time-sampled, path-addressed prim hierarchy.
//!
//! The translator in [`crate::translate`] only talks to the stage through this
//! module. A stage is one [`Layer`] (prims keyed by [`StagePath`] plus metadata)
//! bound to a file; [`Prim`]s hold [`Attribute`]s, relationships, applied API
//! schemas and ordered children.

mod attribute;
pub mod collection;
mod layer;
mod non_finite;
mod path;
mod prim;
pub mod schema;
mod store;
mod value;

pub use attribute::{Attribute, TimeSample};
pub use collection::{
    add_include_target, apply_collection, collections_on, compute_included_paths, ExpansionRule,
    MembershipQuery,
};
pub use layer::{Layer, LayerEncoding, UpAxis};
pub use path::{is_valid_identifier, make_valid_identifier, StagePath};
pub use prim::Prim;
pub use schema::{tokens, SchemaType};
pub use store::{Stage, DEFAULT_COMPRESSION_LEVEL};
pub use value::{ScalarType, Value, ValueTypeName};
