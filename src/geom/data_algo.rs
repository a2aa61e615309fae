//! Value mapping between stage [`Value`]s and scene [`Data`].
//!
//! Role-qualified stage types (`point3f`, `normal3f`, `color3f`, `texCoord2f`)
//! carry over as geometric interpretations so that a round trip keeps the
//! declared type name.

use crate::scene::{Data, GeometricInterpretation};
use crate::stage::{ScalarType, Value, ValueTypeName};
use crate::util::{DMat4, DVec3, Quat, Vec2, Vec3};

#[inline]
fn v2(a: &[f32; 2]) -> Vec2 {
    Vec2::from_array(*a)
}

#[inline]
fn v3(a: &[f32; 3]) -> Vec3 {
    Vec3::from_array(*a)
}

#[inline]
fn quat(q: &[f32; 4]) -> Quat {
    Quat::from_xyzw(q[0], q[1], q[2], q[3])
}

#[inline]
fn matrix(rows: &[[f64; 4]; 4]) -> DMat4 {
    // Row-major with translation in the last row reads directly as glam columns.
    DMat4::from_cols_array_2d(rows)
}

fn interpretation_for(scalar: ScalarType) -> GeometricInterpretation {
    match scalar {
        ScalarType::Point3f => GeometricInterpretation::Point,
        ScalarType::Vector3f => GeometricInterpretation::Vector,
        ScalarType::Normal3f => GeometricInterpretation::Normal,
        ScalarType::TexCoord2f => GeometricInterpretation::UV,
        _ => GeometricInterpretation::None,
    }
}

/// Convert a stage value declared as `type_name`. Asset values have no scene
/// counterpart and yield None.
pub fn from_stage(value: &Value, type_name: &ValueTypeName) -> Option<Data> {
    let interpretation = interpretation_for(type_name.scalar);
    let color = type_name.scalar == ScalarType::Color3f;
    Some(match value {
        Value::Bool(v) => Data::Bool(*v),
        Value::UChar(v) => Data::UChar(*v),
        Value::Int(v) => Data::Int(*v),
        Value::UInt(v) => Data::UInt(*v),
        Value::Int64(v) => Data::Int64(*v),
        Value::Half(v) => Data::Half(*v),
        Value::Float(v) => Data::Float(*v),
        Value::Double(v) => Data::Double(*v),
        Value::String(v) | Value::Token(v) => Data::String(v.clone()),
        Value::Asset(_) => return None,
        Value::Float2(v) => Data::V2f(v2(v)),
        Value::Float3(v) if color => Data::Color3f(v3(v)),
        Value::Float3(v) => Data::V3f(v3(v)),
        Value::Double3(v) => Data::V3d(DVec3::from_array(*v)),
        Value::Quatf(v) => Data::Quatf(quat(v)),
        Value::Matrix4d(m) => Data::M44d(matrix(m)),

        Value::BoolArray(v) => Data::BoolVec(v.clone()),
        Value::UCharArray(v) => Data::UCharVec(v.clone()),
        Value::IntArray(v) => Data::IntVec(v.clone()),
        Value::UIntArray(v) => Data::UIntVec(v.clone()),
        Value::Int64Array(v) => Data::Int64Vec(v.clone()),
        Value::HalfArray(v) => Data::HalfVec(v.clone()),
        Value::FloatArray(v) => Data::FloatVec(v.clone()),
        Value::DoubleArray(v) => Data::DoubleVec(v.clone()),
        Value::StringArray(v) | Value::TokenArray(v) => Data::StringVec(v.clone()),
        Value::Float2Array(v) => Data::V2fVec(bytemuck::cast_slice(v).to_vec(), interpretation),
        Value::Float3Array(v) if color => Data::Color3fVec(bytemuck::cast_slice(v).to_vec()),
        Value::Float3Array(v) => Data::V3fVec(bytemuck::cast_slice(v).to_vec(), interpretation),
        Value::Double3Array(v) => Data::V3dVec(bytemuck::cast_slice(v).to_vec()),
        Value::QuatfArray(v) => Data::QuatfVec(v.iter().map(quat).collect()),
        Value::Matrix4dArray(v) => Data::M44dVec(v.iter().map(matrix).collect()),
    })
}

/// Stage type a piece of data is stored as.
pub fn value_type_name(data: &Data) -> ValueTypeName {
    use ScalarType as S;
    let role = |i: GeometricInterpretation, plain: ScalarType| match i {
        GeometricInterpretation::Point => S::Point3f,
        GeometricInterpretation::Vector => S::Vector3f,
        GeometricInterpretation::Normal => S::Normal3f,
        GeometricInterpretation::UV => S::TexCoord2f,
        GeometricInterpretation::None => plain,
    };
    match data {
        Data::Bool(_) => ValueTypeName::scalar(S::Bool),
        Data::UChar(_) => ValueTypeName::scalar(S::UChar),
        Data::Int(_) => ValueTypeName::scalar(S::Int),
        Data::UInt(_) => ValueTypeName::scalar(S::UInt),
        Data::Int64(_) => ValueTypeName::scalar(S::Int64),
        Data::Half(_) => ValueTypeName::scalar(S::Half),
        Data::Float(_) => ValueTypeName::scalar(S::Float),
        Data::Double(_) => ValueTypeName::scalar(S::Double),
        Data::String(_) => ValueTypeName::scalar(S::String),
        Data::V2f(_) => ValueTypeName::scalar(S::Float2),
        Data::V3f(_) => ValueTypeName::scalar(S::Float3),
        Data::V3d(_) => ValueTypeName::scalar(S::Double3),
        Data::Color3f(_) => ValueTypeName::scalar(S::Color3f),
        Data::Quatf(_) => ValueTypeName::scalar(S::Quatf),
        Data::M44d(_) => ValueTypeName::scalar(S::Matrix4d),
        Data::BoolVec(_) => ValueTypeName::array(S::Bool),
        Data::UCharVec(_) => ValueTypeName::array(S::UChar),
        Data::IntVec(_) => ValueTypeName::array(S::Int),
        Data::UIntVec(_) => ValueTypeName::array(S::UInt),
        Data::Int64Vec(_) => ValueTypeName::array(S::Int64),
        Data::HalfVec(_) => ValueTypeName::array(S::Half),
        Data::FloatVec(_) => ValueTypeName::array(S::Float),
        Data::DoubleVec(_) => ValueTypeName::array(S::Double),
        Data::StringVec(_) => ValueTypeName::array(S::String),
        Data::V2fVec(_, i) => ValueTypeName::array(role(*i, S::Float2)),
        Data::V3fVec(_, i) => ValueTypeName::array(role(*i, S::Float3)),
        Data::V3dVec(_) => ValueTypeName::array(S::Double3),
        Data::Color3fVec(_) => ValueTypeName::array(S::Color3f),
        Data::QuatfVec(_) => ValueTypeName::array(S::Quatf),
        Data::M44dVec(_) => ValueTypeName::array(S::Matrix4d),
    }
}

/// Convert scene data to a stage value.
pub fn to_stage(data: &Data) -> Value {
    let m = |m: &DMat4| m.to_cols_array_2d();
    let q = |q: &Quat| [q.x, q.y, q.z, q.w];
    match data {
        Data::Bool(v) => Value::Bool(*v),
        Data::UChar(v) => Value::UChar(*v),
        Data::Int(v) => Value::Int(*v),
        Data::UInt(v) => Value::UInt(*v),
        Data::Int64(v) => Value::Int64(*v),
        Data::Half(v) => Value::Half(*v),
        Data::Float(v) => Value::Float(*v),
        Data::Double(v) => Value::Double(*v),
        Data::String(v) => Value::String(v.clone()),
        Data::V2f(v) => Value::Float2(v.to_array()),
        Data::V3f(v) | Data::Color3f(v) => Value::Float3(v.to_array()),
        Data::V3d(v) => Value::Double3(v.to_array()),
        Data::Quatf(v) => Value::Quatf(q(v)),
        Data::M44d(v) => Value::Matrix4d(m(v)),
        Data::BoolVec(v) => Value::BoolArray(v.clone()),
        Data::UCharVec(v) => Value::UCharArray(v.clone()),
        Data::IntVec(v) => Value::IntArray(v.clone()),
        Data::UIntVec(v) => Value::UIntArray(v.clone()),
        Data::Int64Vec(v) => Value::Int64Array(v.clone()),
        Data::HalfVec(v) => Value::HalfArray(v.clone()),
        Data::FloatVec(v) => Value::FloatArray(v.clone()),
        Data::DoubleVec(v) => Value::DoubleArray(v.clone()),
        Data::StringVec(v) => Value::StringArray(v.clone()),
        // Vector arrays share their element layout with the stage's fixed arrays.
        Data::V2fVec(v, _) => Value::Float2Array(bytemuck::cast_slice(v).to_vec()),
        Data::V3fVec(v, _) | Data::Color3fVec(v) => Value::Float3Array(bytemuck::cast_slice(v).to_vec()),
        Data::V3dVec(v) => Value::Double3Array(bytemuck::cast_slice(v).to_vec()),
        Data::QuatfVec(v) => Value::QuatfArray(v.iter().map(q).collect()),
        Data::M44dVec(v) => Value::Matrix4dArray(v.iter().map(m).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_survive() {
        let normals = Data::V3fVec(vec![Vec3::Y], GeometricInterpretation::Normal);
        let type_name = value_type_name(&normals);
        assert_eq!(type_name.to_string(), "normal3f[]");
        assert_eq!(from_stage(&to_stage(&normals), &type_name), Some(normals));

        let color = Data::Color3fVec(vec![Vec3::new(1.0, 0.0, 0.0)]);
        let type_name = value_type_name(&color);
        assert_eq!(type_name.to_string(), "color3f[]");
        assert_eq!(from_stage(&to_stage(&color), &type_name), Some(color));
    }

    #[test]
    fn test_matrix_translation_row() {
        let m = DMat4::from_translation(DVec3::new(1.0, 2.0, 3.0));
        let Value::Matrix4d(rows) = to_stage(&Data::M44d(m)) else {
            panic!("expected a matrix");
        };
        // Translation lives in the last row of the stage matrix.
        assert_eq!(rows[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(
            from_stage(&Value::Matrix4d(rows), &ValueTypeName::scalar(ScalarType::Matrix4d)),
            Some(Data::M44d(m))
        );
    }

    #[test]
    fn test_tokens_become_strings_and_assets_are_dropped() {
        let token = ValueTypeName::scalar(ScalarType::Token);
        assert_eq!(
            from_stage(&Value::Token("catmullClark".into()), &token),
            Some(Data::String("catmullClark".into()))
        );
        let asset = ValueTypeName::scalar(ScalarType::Asset);
        assert_eq!(from_stage(&Value::Asset("tex.png".into()), &asset), None);
    }

    #[test]
    fn test_quaternion_order() {
        let q = Quat::from_xyzw(0.0, 0.0, 0.70710677, 0.70710677);
        assert_eq!(to_stage(&Data::Quatf(q)), Value::Quatf([0.0, 0.0, 0.70710677, 0.70710677]));
    }
}
