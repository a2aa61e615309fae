//! Scene-side geometric primitives and cameras.

use std::collections::BTreeMap;

use super::data::{Data, GeometricInterpretation};
use crate::core::Interpolation;
use crate::util::{Vec2, Vec3};

/// A named, interpolation-tagged data channel.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimitiveVariable {
    pub interpolation: Interpolation,
    pub data: Data,
    /// Optional index buffer into `data`.
    pub indices: Option<Vec<i32>>,
}

impl PrimitiveVariable {
    pub fn new(interpolation: Interpolation, data: Data) -> Self {
        Self {
            interpolation,
            data,
            indices: None,
        }
    }

    pub fn indexed(interpolation: Interpolation, data: Data, indices: Vec<i32>) -> Self {
        Self {
            interpolation,
            data,
            indices: Some(indices),
        }
    }
}

/// Variables by name.
pub type PrimitiveVariableMap = BTreeMap<String, PrimitiveVariable>;

/// Subdivision label for meshes without subdivision.
pub const MESH_LINEAR: &str = "linear";
/// Subdivision label for Catmull-Clark meshes.
pub const MESH_CATMULL_CLARK: &str = "catmullClark";

/// A polygon mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshPrimitive {
    pub vertices_per_face: Vec<i32>,
    pub vertex_ids: Vec<i32>,
    /// `"linear"` or `"catmullClark"`.
    pub interpolation: String,
    pub corner_ids: Vec<i32>,
    pub corner_sharpnesses: Vec<f32>,
    pub crease_lengths: Vec<i32>,
    pub crease_ids: Vec<i32>,
    pub crease_sharpnesses: Vec<f32>,
    pub variables: PrimitiveVariableMap,
}

impl MeshPrimitive {
    pub fn new(vertices_per_face: Vec<i32>, vertex_ids: Vec<i32>, interpolation: &str) -> Self {
        Self {
            vertices_per_face,
            vertex_ids,
            interpolation: interpolation.to_string(),
            corner_ids: Vec::new(),
            corner_sharpnesses: Vec::new(),
            crease_lengths: Vec::new(),
            crease_ids: Vec::new(),
            crease_sharpnesses: Vec::new(),
            variables: PrimitiveVariableMap::new(),
        }
    }

    /// Mesh with `P` set from `points`.
    pub fn with_points(
        vertices_per_face: Vec<i32>,
        vertex_ids: Vec<i32>,
        interpolation: &str,
        points: Vec<Vec3>,
    ) -> Self {
        let mut mesh = Self::new(vertices_per_face, vertex_ids, interpolation);
        mesh.variables.insert(
            "P".to_string(),
            PrimitiveVariable::new(
                Interpolation::Vertex,
                Data::V3fVec(points, GeometricInterpretation::Point),
            ),
        );
        mesh
    }

    pub fn set_corners(&mut self, ids: Vec<i32>, sharpnesses: Vec<f32>) {
        self.corner_ids = ids;
        self.corner_sharpnesses = sharpnesses;
    }

    /// Store crease data as given; consistency is checked when reading back.
    pub fn set_creases(&mut self, lengths: Vec<i32>, ids: Vec<i32>, sharpnesses: Vec<f32>) {
        self.crease_lengths = lengths;
        self.crease_ids = ids;
        self.crease_sharpnesses = sharpnesses;
    }

    pub fn num_faces(&self) -> usize {
        self.vertices_per_face.len()
    }

    /// Highest referenced vertex id plus one.
    pub fn num_vertices(&self) -> usize {
        self.vertex_ids
            .iter()
            .max()
            .map(|&m| (m.max(-1) + 1) as usize)
            .unwrap_or(0)
    }
}

/// A point cloud. Point instancers are read into this type with a
/// `prototypeRoots` variable.
#[derive(Clone, Debug, PartialEq)]
pub struct PointsPrimitive {
    pub num_points: usize,
    pub variables: PrimitiveVariableMap,
}

impl PointsPrimitive {
    pub fn new(num_points: usize) -> Self {
        Self {
            num_points,
            variables: PrimitiveVariableMap::new(),
        }
    }

    /// Points with `P` set from `positions`.
    pub fn with_positions(positions: Vec<Vec3>) -> Self {
        let mut points = Self::new(positions.len());
        points.variables.insert(
            "P".to_string(),
            PrimitiveVariable::new(
                Interpolation::Vertex,
                Data::V3fVec(positions, GeometricInterpretation::Point),
            ),
        );
        points
    }

    /// Points carrying prototype roots are instancers.
    pub fn is_instancer(&self) -> bool {
        self.variables.contains_key(PROTOTYPE_ROOTS)
    }
}

/// Variable holding instancer prototype paths.
pub const PROTOTYPE_ROOTS: &str = "prototypeRoots";

/// Curve basis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CubicBasis {
    #[default]
    Linear,
    Bezier,
    BSpline,
    CatmullRom,
}

/// A batch of curves sharing one basis.
#[derive(Clone, Debug, PartialEq)]
pub struct CurvesPrimitive {
    pub vertices_per_curve: Vec<i32>,
    pub basis: CubicBasis,
    pub periodic: bool,
    pub variables: PrimitiveVariableMap,
}

impl CurvesPrimitive {
    pub fn new(vertices_per_curve: Vec<i32>, basis: CubicBasis, periodic: bool) -> Self {
        Self {
            vertices_per_curve,
            basis,
            periodic,
            variables: PrimitiveVariableMap::new(),
        }
    }

    pub fn num_curves(&self) -> usize {
        self.vertices_per_curve.len()
    }
}

/// An implicit sphere.
#[derive(Clone, Debug, PartialEq)]
pub struct SpherePrimitive {
    pub radius: f32,
    pub variables: PrimitiveVariableMap,
}

impl SpherePrimitive {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            variables: PrimitiveVariableMap::new(),
        }
    }
}

impl Default for SpherePrimitive {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Projection name for perspective cameras.
pub const PERSPECTIVE: &str = "perspective";
/// Projection name for orthographic cameras.
pub const ORTHOGRAPHIC: &str = "orthographic";

/// A camera. Focal length and aperture are in arbitrary units; they map to
/// stage units through `focal_length_world_scale`.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub projection: String,
    pub aperture: Vec2,
    pub aperture_offset: Vec2,
    pub focal_length: f32,
    pub clipping_planes: Vec2,
    pub f_stop: f32,
    pub focus_distance: f32,
    pub shutter: Vec2,
    pub focal_length_world_scale: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            projection: ORTHOGRAPHIC.to_string(),
            aperture: Vec2::new(2.0, 2.0),
            aperture_offset: Vec2::ZERO,
            focal_length: 1.0,
            clipping_planes: Vec2::new(0.01, 100_000.0),
            f_stop: 0.0,
            focus_distance: 1.0,
            shutter: Vec2::new(-0.5, 0.5),
            focal_length_world_scale: 0.1,
        }
    }
}

/// The payload a location can carry.
#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    Mesh(MeshPrimitive),
    Points(PointsPrimitive),
    Curves(CurvesPrimitive),
    Sphere(SpherePrimitive),
    Camera(Camera),
}

impl Object {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Mesh(_) => "MeshPrimitive",
            Self::Points(_) => "PointsPrimitive",
            Self::Curves(_) => "CurvesPrimitive",
            Self::Sphere(_) => "SpherePrimitive",
            Self::Camera(_) => "Camera",
        }
    }

    /// Primitive variables; cameras have none.
    pub fn variables(&self) -> Option<&PrimitiveVariableMap> {
        match self {
            Self::Mesh(m) => Some(&m.variables),
            Self::Points(p) => Some(&p.variables),
            Self::Curves(c) => Some(&c.variables),
            Self::Sphere(s) => Some(&s.variables),
            Self::Camera(_) => None,
        }
    }

    pub fn variables_mut(&mut self) -> Option<&mut PrimitiveVariableMap> {
        match self {
            Self::Mesh(m) => Some(&mut m.variables),
            Self::Points(p) => Some(&mut p.variables),
            Self::Curves(c) => Some(&mut c.variables),
            Self::Sphere(s) => Some(&mut s.variables),
            Self::Camera(_) => None,
        }
    }
}

impl From<MeshPrimitive> for Object {
    fn from(m: MeshPrimitive) -> Self {
        Self::Mesh(m)
    }
}

impl From<PointsPrimitive> for Object {
    fn from(p: PointsPrimitive) -> Self {
        Self::Points(p)
    }
}

impl From<CurvesPrimitive> for Object {
    fn from(c: CurvesPrimitive) -> Self {
        Self::Curves(c)
    }
}

impl From<SpherePrimitive> for Object {
    fn from(s: SpherePrimitive) -> Self {
        Self::Sphere(s)
    }
}

impl From<Camera> for Object {
    fn from(c: Camera) -> Self {
        Self::Camera(c)
    }
}
