//! Schema types, property names and fallback values.

use std::borrow::Cow;

use super::prim::Prim;
use super::value::Value;
use crate::core::TimeCode;

/// Property and value tokens used by the built-in schemas.
pub mod tokens {
    // Xformable
    pub const XFORM_OP_ORDER: &str = "xformOpOrder";
    pub const XFORM_OP_TRANSFORM: &str = "xformOp:transform";
    pub const XFORM_OP_TRANSLATE: &str = "xformOp:translate";
    pub const XFORM_OP_SCALE: &str = "xformOp:scale";
    pub const XFORM_OP_ROTATE_XYZ: &str = "xformOp:rotateXYZ";
    pub const XFORM_OP_ORIENT: &str = "xformOp:orient";

    // Boundable
    pub const EXTENT: &str = "extent";

    // PointBased
    pub const POINTS: &str = "points";
    pub const NORMALS: &str = "normals";
    pub const VELOCITIES: &str = "velocities";
    pub const ACCELERATIONS: &str = "accelerations";

    // Mesh
    pub const FACE_VERTEX_COUNTS: &str = "faceVertexCounts";
    pub const FACE_VERTEX_INDICES: &str = "faceVertexIndices";
    pub const SUBDIVISION_SCHEME: &str = "subdivisionScheme";
    pub const CORNER_INDICES: &str = "cornerIndices";
    pub const CORNER_SHARPNESSES: &str = "cornerSharpnesses";
    pub const CREASE_LENGTHS: &str = "creaseLengths";
    pub const CREASE_INDICES: &str = "creaseIndices";
    pub const CREASE_SHARPNESSES: &str = "creaseSharpnesses";

    // Curves
    pub const CURVE_VERTEX_COUNTS: &str = "curveVertexCounts";
    pub const TYPE: &str = "type";
    pub const BASIS: &str = "basis";
    pub const WRAP: &str = "wrap";
    pub const WIDTHS: &str = "widths";

    // Points
    pub const IDS: &str = "ids";

    // PointInstancer
    pub const POSITIONS: &str = "positions";
    pub const PROTO_INDICES: &str = "protoIndices";
    pub const ORIENTATIONS: &str = "orientations";
    pub const SCALES: &str = "scales";
    pub const ANGULAR_VELOCITIES: &str = "angularVelocities";
    pub const PROTOTYPES: &str = "prototypes";

    // Sphere
    pub const RADIUS: &str = "radius";

    // Camera
    pub const PROJECTION: &str = "projection";
    pub const HORIZONTAL_APERTURE: &str = "horizontalAperture";
    pub const VERTICAL_APERTURE: &str = "verticalAperture";
    pub const HORIZONTAL_APERTURE_OFFSET: &str = "horizontalApertureOffset";
    pub const VERTICAL_APERTURE_OFFSET: &str = "verticalApertureOffset";
    pub const FOCAL_LENGTH: &str = "focalLength";
    pub const CLIPPING_RANGE: &str = "clippingRange";
    pub const F_STOP: &str = "fStop";
    pub const FOCUS_DISTANCE: &str = "focusDistance";
    pub const SHUTTER_OPEN: &str = "shutter:open";
    pub const SHUTTER_CLOSE: &str = "shutter:close";

    // Primvars
    pub const PRIMVARS_PREFIX: &str = "primvars:";
    pub const INDICES_SUFFIX: &str = ":indices";
    pub const DISPLAY_COLOR: &str = "primvars:displayColor";

    // Custom attributes
    pub const CUSTOM_ATTRIBUTE_PREFIX: &str = "sceneStage:";

    // Values
    pub const CATMULL_CLARK: &str = "catmullClark";
    pub const NONE: &str = "none";
    pub const LINEAR: &str = "linear";
    pub const CUBIC: &str = "cubic";
    pub const BEZIER: &str = "bezier";
    pub const BSPLINE: &str = "bspline";
    pub const CATMULL_ROM: &str = "catmullRom";
    pub const PERIODIC: &str = "periodic";
    pub const NONPERIODIC: &str = "nonperiodic";
    pub const PERSPECTIVE: &str = "perspective";
    pub const ORTHOGRAPHIC: &str = "orthographic";
}

/// The schema a prim's type name selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemaType {
    /// No type name.
    Typeless,
    Scope,
    Xform,
    Mesh,
    Points,
    PointInstancer,
    BasisCurves,
    Sphere,
    Camera,
    /// A type name this crate has no schema for.
    Unknown,
}

impl SchemaType {
    pub fn from_type_name(type_name: &str) -> Self {
        match type_name {
            "" => Self::Typeless,
            "Scope" => Self::Scope,
            "Xform" => Self::Xform,
            "Mesh" => Self::Mesh,
            "Points" => Self::Points,
            "PointInstancer" => Self::PointInstancer,
            "BasisCurves" => Self::BasisCurves,
            "Sphere" => Self::Sphere,
            "Camera" => Self::Camera,
            _ => Self::Unknown,
        }
    }

    /// Type name; empty for typeless and unknown schemas.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Typeless | Self::Unknown => "",
            Self::Scope => "Scope",
            Self::Xform => "Xform",
            Self::Mesh => "Mesh",
            Self::Points => "Points",
            Self::PointInstancer => "PointInstancer",
            Self::BasisCurves => "BasisCurves",
            Self::Sphere => "Sphere",
            Self::Camera => "Camera",
        }
    }

    /// Prims that carry a local transform.
    pub fn is_xformable(&self) -> bool {
        matches!(
            self,
            Self::Xform
                | Self::Mesh
                | Self::Points
                | Self::PointInstancer
                | Self::BasisCurves
                | Self::Sphere
                | Self::Camera
        )
    }

    /// Prims that carry an `extent`.
    pub fn is_boundable(&self) -> bool {
        matches!(
            self,
            Self::Mesh | Self::Points | Self::PointInstancer | Self::BasisCurves | Self::Sphere
        )
    }

    /// Prims whose geometry lives in a `points` attribute.
    pub fn is_point_based(&self) -> bool {
        matches!(self, Self::Mesh | Self::Points | Self::BasisCurves)
    }
}

/// Value a schema property takes when nothing is authored.
pub fn fallback(schema: SchemaType, property: &str) -> Option<Value> {
    use tokens as t;
    let token = |s: &str| Some(Value::Token(s.to_string()));
    match (schema, property) {
        (SchemaType::Mesh, t::SUBDIVISION_SCHEME) => token(t::CATMULL_CLARK),
        (SchemaType::BasisCurves, t::TYPE) => token(t::CUBIC),
        (SchemaType::BasisCurves, t::BASIS) => token(t::BEZIER),
        (SchemaType::BasisCurves, t::WRAP) => token(t::NONPERIODIC),
        (SchemaType::Sphere, t::RADIUS) => Some(Value::Double(1.0)),
        (SchemaType::Camera, t::PROJECTION) => token(t::PERSPECTIVE),
        (SchemaType::Camera, t::FOCAL_LENGTH) => Some(Value::Float(50.0)),
        (SchemaType::Camera, t::HORIZONTAL_APERTURE) => Some(Value::Float(20.955)),
        (SchemaType::Camera, t::VERTICAL_APERTURE) => Some(Value::Float(15.2908)),
        (SchemaType::Camera, t::HORIZONTAL_APERTURE_OFFSET)
        | (SchemaType::Camera, t::VERTICAL_APERTURE_OFFSET)
        | (SchemaType::Camera, t::F_STOP)
        | (SchemaType::Camera, t::FOCUS_DISTANCE) => Some(Value::Float(0.0)),
        (SchemaType::Camera, t::CLIPPING_RANGE) => Some(Value::Float2([1.0, 1_000_000.0])),
        (SchemaType::Camera, t::SHUTTER_OPEN) | (SchemaType::Camera, t::SHUTTER_CLOSE) => {
            Some(Value::Double(0.0))
        }
        _ => None,
    }
}

/// Authored value of `property` at `time`, or the schema fallback.
pub fn resolve<'a>(prim: &'a Prim, property: &str, time: TimeCode) -> Option<Cow<'a, Value>> {
    prim.attribute(property)
        .and_then(|a| a.get(time))
        .map(Cow::Borrowed)
        .or_else(|| fallback(prim.schema_type(), property).map(Cow::Owned))
}

/// Token value of `property` at `time`, falling back to the schema.
pub fn resolve_token(prim: &Prim, property: &str, time: TimeCode) -> Option<String> {
    resolve(prim, property, time).and_then(|v| v.as_token().map(str::to_string))
}
