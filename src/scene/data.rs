//! Scene-side typed data.

use half::f16;

use crate::util::{DMat4, DVec3, Quat, Vec2, Vec3};

/// How a vector-valued channel should be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GeometricInterpretation {
    #[default]
    None,
    Point,
    Vector,
    Normal,
    /// Texture coordinates (2D only).
    UV,
}

/// A typed scalar or vector value.
#[derive(Clone, Debug, PartialEq)]
pub enum Data {
    Bool(bool),
    UChar(u8),
    Int(i32),
    UInt(u32),
    Int64(i64),
    Half(f16),
    Float(f32),
    Double(f64),
    String(String),
    V2f(Vec2),
    V3f(Vec3),
    V3d(DVec3),
    Color3f(Vec3),
    Quatf(Quat),
    M44d(DMat4),

    BoolVec(Vec<bool>),
    UCharVec(Vec<u8>),
    IntVec(Vec<i32>),
    UIntVec(Vec<u32>),
    Int64Vec(Vec<i64>),
    HalfVec(Vec<f16>),
    FloatVec(Vec<f32>),
    DoubleVec(Vec<f64>),
    StringVec(Vec<String>),
    V2fVec(Vec<Vec2>, GeometricInterpretation),
    V3fVec(Vec<Vec3>, GeometricInterpretation),
    V3dVec(Vec<DVec3>),
    Color3fVec(Vec<Vec3>),
    QuatfVec(Vec<Quat>),
    M44dVec(Vec<DMat4>),
}

impl Data {
    /// Short type label, used in messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::UChar(_) => "UChar",
            Self::Int(_) => "Int",
            Self::UInt(_) => "UInt",
            Self::Int64(_) => "Int64",
            Self::Half(_) => "Half",
            Self::Float(_) => "Float",
            Self::Double(_) => "Double",
            Self::String(_) => "String",
            Self::V2f(_) => "V2f",
            Self::V3f(_) => "V3f",
            Self::V3d(_) => "V3d",
            Self::Color3f(_) => "Color3f",
            Self::Quatf(_) => "Quatf",
            Self::M44d(_) => "M44d",
            Self::BoolVec(_) => "BoolVec",
            Self::UCharVec(_) => "UCharVec",
            Self::IntVec(_) => "IntVec",
            Self::UIntVec(_) => "UIntVec",
            Self::Int64Vec(_) => "Int64Vec",
            Self::HalfVec(_) => "HalfVec",
            Self::FloatVec(_) => "FloatVec",
            Self::DoubleVec(_) => "DoubleVec",
            Self::StringVec(_) => "StringVec",
            Self::V2fVec(..) => "V2fVec",
            Self::V3fVec(..) => "V3fVec",
            Self::V3dVec(_) => "V3dVec",
            Self::Color3fVec(_) => "Color3fVec",
            Self::QuatfVec(_) => "QuatfVec",
            Self::M44dVec(_) => "M44dVec",
        }
    }

    /// Element count for vector data, None for scalars.
    pub fn len(&self) -> Option<usize> {
        Some(match self {
            Self::BoolVec(v) => v.len(),
            Self::UCharVec(v) => v.len(),
            Self::IntVec(v) => v.len(),
            Self::UIntVec(v) => v.len(),
            Self::Int64Vec(v) => v.len(),
            Self::HalfVec(v) => v.len(),
            Self::FloatVec(v) => v.len(),
            Self::DoubleVec(v) => v.len(),
            Self::StringVec(v) => v.len(),
            Self::V2fVec(v, _) => v.len(),
            Self::V3fVec(v, _) => v.len(),
            Self::V3dVec(v) => v.len(),
            Self::Color3fVec(v) => v.len(),
            Self::QuatfVec(v) => v.len(),
            Self::M44dVec(v) => v.len(),
            _ => return None,
        })
    }

    pub fn is_vector(&self) -> bool {
        self.len().is_some()
    }

    /// The only element of a one-element vector, as scalar data.
    pub fn single_element(&self) -> Option<Data> {
        if self.len() != Some(1) {
            return None;
        }
        Some(match self {
            Self::BoolVec(v) => Self::Bool(v[0]),
            Self::UCharVec(v) => Self::UChar(v[0]),
            Self::IntVec(v) => Self::Int(v[0]),
            Self::UIntVec(v) => Self::UInt(v[0]),
            Self::Int64Vec(v) => Self::Int64(v[0]),
            Self::HalfVec(v) => Self::Half(v[0]),
            Self::FloatVec(v) => Self::Float(v[0]),
            Self::DoubleVec(v) => Self::Double(v[0]),
            Self::StringVec(v) => Self::String(v[0].clone()),
            Self::V2fVec(v, _) => Self::V2f(v[0]),
            Self::V3fVec(v, _) => Self::V3f(v[0]),
            Self::V3dVec(v) => Self::V3d(v[0]),
            Self::Color3fVec(v) => Self::Color3f(v[0]),
            Self::QuatfVec(v) => Self::Quatf(v[0]),
            Self::M44dVec(v) => Self::M44d(v[0]),
            _ => return None,
        })
    }

    /// Wrap scalar data in a one-element vector. Vector data is returned as is.
    pub fn to_single_element_vec(&self) -> Data {
        match self {
            Self::Bool(v) => Self::BoolVec(vec![*v]),
            Self::UChar(v) => Self::UCharVec(vec![*v]),
            Self::Int(v) => Self::IntVec(vec![*v]),
            Self::UInt(v) => Self::UIntVec(vec![*v]),
            Self::Int64(v) => Self::Int64Vec(vec![*v]),
            Self::Half(v) => Self::HalfVec(vec![*v]),
            Self::Float(v) => Self::FloatVec(vec![*v]),
            Self::Double(v) => Self::DoubleVec(vec![*v]),
            Self::String(v) => Self::StringVec(vec![v.clone()]),
            Self::V2f(v) => Self::V2fVec(vec![*v], GeometricInterpretation::None),
            Self::V3f(v) => Self::V3fVec(vec![*v], GeometricInterpretation::None),
            Self::V3d(v) => Self::V3dVec(vec![*v]),
            Self::Color3f(v) => Self::Color3fVec(vec![*v]),
            Self::Quatf(v) => Self::QuatfVec(vec![*v]),
            Self::M44d(v) => Self::M44dVec(vec![*v]),
            other => other.clone(),
        }
    }

    pub fn as_v3f_vec(&self) -> Option<&[Vec3]> {
        match self {
            Self::V3fVec(v, _) => Some(v),
            _ => None,
        }
    }

    pub fn as_int_vec(&self) -> Option<&[i32]> {
        match self {
            Self::IntVec(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float_vec(&self) -> Option<&[f32]> {
        match self {
            Self::FloatVec(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_string_vec(&self) -> Option<&[String]> {
        match self {
            Self::StringVec(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_element() {
        assert_eq!(Data::FloatVec(vec![0.5]).single_element(), Some(Data::Float(0.5)));
        assert_eq!(Data::FloatVec(vec![0.5, 1.0]).single_element(), None);
        assert_eq!(Data::Float(0.5).single_element(), None);
        assert_eq!(
            Data::Color3f(Vec3::ONE).to_single_element_vec(),
            Data::Color3fVec(vec![Vec3::ONE])
        );
        assert_eq!(Data::IntVec(vec![1]).to_single_element_vec(), Data::IntVec(vec![1]));
    }

    #[test]
    fn test_len() {
        assert_eq!(Data::V3fVec(vec![Vec3::ZERO; 4], GeometricInterpretation::Point).len(), Some(4));
        assert_eq!(Data::M44d(DMat4::IDENTITY).len(), None);
        assert!(Data::StringVec(vec![]).is_vector());
    }
}
