//! Scene interface - the abstract, path-addressed hierarchy presented to callers.
//!
//! Every location in a scene can carry:
//! - a local transform ([`Data::M44d`])
//! - a bound
//! - named custom attributes
//! - at most one [`Object`] (mesh, points, curves, sphere or camera)
//! - set and tag memberships
//!
//! [`SceneInterface`] is the per-location contract; [`crate::translate::Location`]
//! implements it over a stage.

mod data;
mod primitive;
mod set;

pub use data::{Data, GeometricInterpretation};
pub use primitive::{
    Camera, CubicBasis, CurvesPrimitive, MeshPrimitive, Object, PointsPrimitive,
    PrimitiveVariable, PrimitiveVariableMap, SpherePrimitive, MESH_CATMULL_CLARK, MESH_LINEAR,
    ORTHOGRAPHIC, PERSPECTIVE, PROTOTYPE_ROOTS,
};
pub use set::PathSet;

use std::ops::{BitOr, BitOrAssign};

use murmur3::MurmurHash;

use crate::util::{BBox3d, Chrono, DMat4, Result};

/// A scene path: ordered names from the root. The root is empty.
pub type Path = Vec<String>;

/// Split `/a/b` into names, dropping empty segments.
pub fn path_from_str(s: &str) -> Path {
    s.split('/')
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join names into `/a/b`; the root is `/`.
pub fn path_to_string(path: &[String]) -> String {
    format!("/{}", path.join("/"))
}

/// What [`SceneInterface::child`] does when the child does not exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingBehaviour {
    /// Return `Ok(None)`.
    NullIfMissing,
    /// Return [`crate::Error::MissingChild`].
    ThrowIfMissing,
    /// Create the child (writers only).
    CreateIfMissing,
}

/// The aspect a hash describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashType {
    Transform,
    Attributes,
    Bound,
    Object,
    ChildNames,
    Hierarchy,
}

impl HashType {
    /// Tag appended first so equal inputs for different aspects never collide.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Transform => 0,
            Self::Attributes => 1,
            Self::Bound => 2,
            Self::Object => 3,
            Self::ChildNames => 4,
            Self::Hierarchy => 5,
        }
    }
}

/// Which relationships between a location and a tagged path count as a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TagFilter(u8);

impl TagFilter {
    /// The location itself is tagged.
    pub const LOCAL: Self = Self(1);
    /// A location below this one is tagged.
    pub const DESCENDANT: Self = Self(2);
    /// A location above this one is tagged.
    pub const ANCESTOR: Self = Self(4);
    pub const EVERY: Self = Self(7);

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for TagFilter {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for TagFilter {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl Default for TagFilter {
    fn default() -> Self {
        Self::LOCAL
    }
}

/// Per-location contract of a scene. Times are in seconds.
pub trait SceneInterface: Sized {
    /// Identity of the backing store.
    fn file_name(&self) -> String;
    /// Last path component; empty at the root.
    fn name(&self) -> String;
    fn path(&self) -> Path;

    // --- bound ---

    fn has_bound(&self) -> bool;
    /// Empty box when no bound is stored.
    fn read_bound(&self, time: Chrono) -> BBox3d;
    fn write_bound(&self, bound: &BBox3d, time: Chrono) -> Result<()>;

    // --- transform ---

    /// Local transform as [`Data::M44d`].
    fn read_transform(&self, time: Chrono) -> Data;
    fn read_transform_as_matrix(&self, time: Chrono) -> DMat4;
    /// Only [`Data::M44d`] is stored; other data is ignored.
    fn write_transform(&self, transform: &Data, time: Chrono) -> Result<()>;

    // --- attributes ---

    fn has_attribute(&self, name: &str) -> bool;
    fn attribute_names(&self) -> Vec<String>;
    fn read_attribute(&self, name: &str, time: Chrono) -> Option<Data>;
    fn write_attribute(&self, name: &str, value: &Data, time: Chrono) -> Result<()>;

    // --- tags ---

    fn has_tag(&self, name: &str, filter: TagFilter) -> bool;
    /// Sorted, deduplicated tag names matching `filter`.
    fn read_tags(&self, filter: TagFilter) -> Vec<String>;
    fn write_tags(&self, tags: &[String]) -> Result<()>;

    // --- sets ---

    /// Sorted, deduplicated set names.
    fn set_names(&self, include_descendant_sets: bool) -> Vec<String>;
    /// Members relative to this location.
    fn read_set(&self, name: &str, include_descendant_sets: bool) -> PathSet;
    fn write_set(&self, name: &str, set: &PathSet) -> Result<()>;
    fn hash_set(&self, name: &str, h: &mut MurmurHash);

    // --- object ---

    fn has_object(&self) -> bool;
    fn read_object(&self, time: Chrono) -> Option<Object>;
    /// Only the named variables of this location's object.
    fn read_object_primitive_variables(&self, names: &[&str], time: Chrono) -> PrimitiveVariableMap;
    fn write_object(&self, object: &Object, time: Chrono) -> Result<()>;

    // --- hierarchy ---

    fn child_names(&self) -> Vec<String>;
    fn has_child(&self, name: &str) -> bool;
    fn child(&self, name: &str, missing: MissingBehaviour) -> Result<Option<Self>>;
    /// Resolve an absolute path from the root, applying `missing` per segment.
    fn scene(&self, path: &[String], missing: MissingBehaviour) -> Result<Option<Self>>;

    // --- hashing ---

    fn hash(&self, hash_type: HashType, time: Chrono, h: &mut MurmurHash);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_strings() {
        assert_eq!(path_from_str("/a//b/"), vec!["a", "b"]);
        assert!(path_from_str("/").is_empty());
        assert_eq!(path_to_string(&path_from_str("/a/b")), "/a/b");
        assert_eq!(path_to_string(&[]), "/");
    }

    #[test]
    fn test_tag_filter() {
        let f = TagFilter::LOCAL | TagFilter::ANCESTOR;
        assert!(f.contains(TagFilter::LOCAL));
        assert!(!f.contains(TagFilter::DESCENDANT));
        assert!(TagFilter::EVERY.contains(f));
        assert_eq!(TagFilter::EVERY.bits(), 7);
    }
}
