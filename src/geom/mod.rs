//! Conversion between stage geometry prims and scene [`Object`]s.
//!
//! Each supported prim type has a module with a `read` and a `write`:
//! - [`mesh`] - `Mesh` ⇄ [`crate::scene::MeshPrimitive`]
//! - [`points`] - `Points` ⇄ [`crate::scene::PointsPrimitive`]
//! - [`instancer`] - `PointInstancer` ⇄ points carrying `prototypeRoots`
//! - [`curves`] - `BasisCurves` ⇄ [`crate::scene::CurvesPrimitive`]
//! - [`sphere`] - `Sphere` ⇄ [`crate::scene::SpherePrimitive`]
//! - [`camera`] - `Camera` ⇄ [`crate::scene::Camera`]
//!
//! [`primvars`] and [`data_algo`] hold the shared primitive variable and
//! value conversions; [`xform`] composes transform ops.

pub mod camera;
pub mod curves;
pub mod data_algo;
pub mod instancer;
pub mod mesh;
pub mod points;
pub mod primvars;
pub mod sphere;
pub mod xform;

use crate::core::{Diagnostics, TimeCode};
use crate::scene::{Object, PrimitiveVariableMap};
use crate::stage::{tokens, Prim, SchemaType, Stage, StagePath};
use crate::util::{Error, Result};

/// Geometry kinds a prim can be converted from, in resolution priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Mesh,
    Points,
    PointInstancer,
    BasisCurves,
    Sphere,
    Camera,
}

impl GeometryKind {
    /// Resolution order; the first matching kind wins.
    pub const PRIORITY: [GeometryKind; 6] = [
        Self::Mesh,
        Self::Points,
        Self::PointInstancer,
        Self::BasisCurves,
        Self::Sphere,
        Self::Camera,
    ];

    pub fn schema_type(&self) -> SchemaType {
        match self {
            Self::Mesh => SchemaType::Mesh,
            Self::Points => SchemaType::Points,
            Self::PointInstancer => SchemaType::PointInstancer,
            Self::BasisCurves => SchemaType::BasisCurves,
            Self::Sphere => SchemaType::Sphere,
            Self::Camera => SchemaType::Camera,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.schema_type().type_name()
    }

    /// Kind of `prim`, or None if it carries no convertible geometry.
    pub fn of(prim: &Prim) -> Option<Self> {
        let schema = prim.schema_type();
        Self::PRIORITY
            .into_iter()
            .find(|kind| kind.schema_type() == schema)
    }

    /// Kind a scene object is written as.
    pub fn for_object(object: &Object) -> Self {
        match object {
            Object::Mesh(_) => Self::Mesh,
            Object::Points(p) if p.is_instancer() => Self::PointInstancer,
            Object::Points(_) => Self::Points,
            Object::Curves(_) => Self::BasisCurves,
            Object::Sphere(_) => Self::Sphere,
            Object::Camera(_) => Self::Camera,
        }
    }
}

/// True if `prim` can be read as an [`Object`].
pub fn is_convertible(prim: &Prim) -> bool {
    GeometryKind::of(prim).is_some()
}

/// Read the object carried by `prim` at `time`.
pub fn read_object(prim: &Prim, time: TimeCode, diagnostics: &Diagnostics) -> Option<Object> {
    let object = match GeometryKind::of(prim)? {
        GeometryKind::Mesh => mesh::read(prim, time, diagnostics).into(),
        GeometryKind::Points => points::read(prim, time, diagnostics).into(),
        GeometryKind::PointInstancer => instancer::read(prim, time, diagnostics).into(),
        GeometryKind::BasisCurves => curves::read(prim, time, diagnostics).into(),
        GeometryKind::Sphere => sphere::read(prim, time, diagnostics).into(),
        GeometryKind::Camera => camera::read(prim, time, diagnostics).into(),
    };
    Some(object)
}

/// Define the prim for `object` at `path` and author it at `time`.
pub fn write_object(
    stage: &mut Stage,
    path: &StagePath,
    object: &Object,
    time: TimeCode,
    diagnostics: &Diagnostics,
) -> Result<()> {
    if path.is_root() {
        return Err(Error::invalid_argument(format!(
            "cannot write {} at the root",
            object.type_name()
        )));
    }
    let kind = GeometryKind::for_object(object);
    let prim = stage.define_prim(path, kind.type_name())?;
    match object {
        Object::Mesh(m) => mesh::write(prim, m, time),
        Object::Points(p) if kind == GeometryKind::PointInstancer => {
            instancer::write(prim, p, time, diagnostics)
        }
        Object::Points(p) => points::write(prim, p, time),
        Object::Curves(c) => curves::write(prim, c, time),
        Object::Sphere(s) => sphere::write(prim, s, time),
        Object::Camera(c) => camera::write(prim, c, time, diagnostics),
    }
}

/// The subset of `object`'s variables named in `names`.
pub fn select_primitive_variables(object: &Object, names: &[&str]) -> PrimitiveVariableMap {
    object
        .variables()
        .map(|variables| {
            variables
                .iter()
                .filter(|(name, _)| names.contains(&name.as_str()))
                .map(|(name, v)| (name.clone(), v.clone()))
                .collect()
        })
        .unwrap_or_default()
}

/// Attributes that do not contribute to the object.
fn is_object_attribute(name: &str) -> bool {
    !(name.starts_with("xformOp")
        || name == tokens::EXTENT
        || name.starts_with(tokens::CUSTOM_ATTRIBUTE_PREFIX)
        || name.starts_with("collection:"))
}

/// True if the object on `prim` might change over time. Any shape attribute
/// or primitive variable with more than one sample counts.
pub fn is_time_varying(prim: &Prim) -> bool {
    is_convertible(prim)
        && prim
            .attributes()
            .any(|(name, attr)| is_object_attribute(name) && attr.value_might_be_time_varying())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MeshPrimitive, PointsPrimitive, SpherePrimitive, MESH_LINEAR};
    use crate::stage::LayerEncoding;
    use crate::util::Vec3;

    fn stage() -> Stage {
        Stage::create_new("unused.stagea", LayerEncoding::Text)
    }

    #[test]
    fn test_kind_priority() {
        assert_eq!(GeometryKind::of(&Prim::new("Mesh")), Some(GeometryKind::Mesh));
        assert_eq!(GeometryKind::of(&Prim::new("Camera")), Some(GeometryKind::Camera));
        assert_eq!(GeometryKind::of(&Prim::new("Xform")), None);
        assert_eq!(GeometryKind::of(&Prim::new("")), None);
        assert!(!is_convertible(&Prim::new("Scope")));
    }

    #[test]
    fn test_write_object_at_root_fails() {
        let mut stage = stage();
        let err = write_object(
            &mut stage,
            &StagePath::absolute_root(),
            &SpherePrimitive::default().into(),
            TimeCode::Default,
            &Diagnostics::new(),
        );
        assert!(matches!(err, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_points_with_roots_become_instancer() {
        let mut stage = stage();
        let path = StagePath::new("/inst").unwrap();
        let mut points = PointsPrimitive::with_positions(vec![Vec3::ZERO]);
        points.variables.insert(
            crate::scene::PROTOTYPE_ROOTS.into(),
            crate::scene::PrimitiveVariable::new(
                crate::core::Interpolation::Constant,
                crate::scene::Data::StringVec(vec!["/proto".into()]),
            ),
        );
        let diagnostics = Diagnostics::new();
        write_object(&mut stage, &path, &points.into(), TimeCode::Default, &diagnostics).unwrap();
        let prim = stage.prim(&path).unwrap();
        assert_eq!(prim.type_name(), "PointInstancer");
        assert!(matches!(
            read_object(prim, TimeCode::Default, &diagnostics),
            Some(Object::Points(p)) if p.is_instancer()
        ));
    }

    #[test]
    fn test_time_varying() {
        let mut stage = stage();
        let path = StagePath::new("/mesh").unwrap();
        let mesh = MeshPrimitive::with_points(vec![3], vec![0, 1, 2], MESH_LINEAR, MESH_TEST_POINTS.to_vec());
        let diagnostics = Diagnostics::new();
        write_object(&mut stage, &path, &mesh.clone().into(), TimeCode::Time(1.0), &diagnostics).unwrap();
        assert!(!is_time_varying(stage.prim(&path).unwrap()));

        // A second transform sample alone does not animate the object.
        let prim = stage.prim_mut(&path).unwrap();
        xform::set_matrix(prim, &crate::util::DMat4::IDENTITY, TimeCode::Time(1.0)).unwrap();
        xform::set_matrix(prim, &crate::util::DMat4::IDENTITY, TimeCode::Time(2.0)).unwrap();
        assert!(!is_time_varying(stage.prim(&path).unwrap()));

        write_object(&mut stage, &path, &mesh.into(), TimeCode::Time(2.0), &diagnostics).unwrap();
        assert!(is_time_varying(stage.prim(&path).unwrap()));
    }

    const MESH_TEST_POINTS: [Vec3; 3] = [Vec3::ZERO, Vec3::X, Vec3::Y];

    #[test]
    fn test_select_primitive_variables() {
        let mesh = MeshPrimitive::with_points(vec![3], vec![0, 1, 2], MESH_LINEAR, MESH_TEST_POINTS.to_vec());
        let selected = select_primitive_variables(&mesh.into(), &["P", "missing"]);
        assert_eq!(selected.keys().collect::<Vec<_>>(), vec!["P"]);
    }
}
