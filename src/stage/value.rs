//! Typed attribute values and their declared type names.

use std::fmt;
use std::str::FromStr;

use half::f16;
use serde::{Deserialize, Serialize};

use crate::util::{Error, Result};

/// Element type of an attribute, including role-qualified spellings.
///
/// Roles (`point3f`, `normal3f`, ...) share storage with their plain
/// counterpart but are kept distinct so the type name round-trips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    UChar,
    Int,
    UInt,
    Int64,
    Half,
    Float,
    Double,
    String,
    Token,
    Asset,
    Float2,
    TexCoord2f,
    Float3,
    Point3f,
    Vector3f,
    Normal3f,
    Color3f,
    Double3,
    Quatf,
    Matrix4d,
}

impl ScalarType {
    const ALL: [ScalarType; 21] = [
        Self::Bool,
        Self::UChar,
        Self::Int,
        Self::UInt,
        Self::Int64,
        Self::Half,
        Self::Float,
        Self::Double,
        Self::String,
        Self::Token,
        Self::Asset,
        Self::Float2,
        Self::TexCoord2f,
        Self::Float3,
        Self::Point3f,
        Self::Vector3f,
        Self::Normal3f,
        Self::Color3f,
        Self::Double3,
        Self::Quatf,
        Self::Matrix4d,
    ];

    /// Spelling used in type names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::UChar => "uchar",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Int64 => "int64",
            Self::Half => "half",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Token => "token",
            Self::Asset => "asset",
            Self::Float2 => "float2",
            Self::TexCoord2f => "texCoord2f",
            Self::Float3 => "float3",
            Self::Point3f => "point3f",
            Self::Vector3f => "vector3f",
            Self::Normal3f => "normal3f",
            Self::Color3f => "color3f",
            Self::Double3 => "double3",
            Self::Quatf => "quatf",
            Self::Matrix4d => "matrix4d",
        }
    }

    /// Role-free storage type.
    pub fn storage(&self) -> ScalarType {
        match self {
            Self::TexCoord2f => Self::Float2,
            Self::Point3f | Self::Vector3f | Self::Normal3f | Self::Color3f => Self::Float3,
            other => *other,
        }
    }
}

/// Declared type of an attribute: element type plus array-ness.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ValueTypeName {
    pub scalar: ScalarType,
    pub is_array: bool,
}

impl ValueTypeName {
    pub const fn scalar(scalar: ScalarType) -> Self {
        Self { scalar, is_array: false }
    }

    pub const fn array(scalar: ScalarType) -> Self {
        Self { scalar, is_array: true }
    }

    /// The matching scalar type name (drops array-ness).
    pub fn scalar_type(&self) -> ValueTypeName {
        Self::scalar(self.scalar)
    }

    /// The matching array type name.
    pub fn array_type(&self) -> ValueTypeName {
        Self::array(self.scalar)
    }
}

impl fmt::Display for ValueTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scalar.as_str())?;
        if self.is_array {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ValueTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueTypeName({})", self)
    }
}

impl FromStr for ValueTypeName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (base, is_array) = match s.strip_suffix("[]") {
            Some(base) => (base, true),
            None => (s, false),
        };
        ScalarType::ALL
            .iter()
            .find(|t| t.as_str() == base)
            .map(|&scalar| Self { scalar, is_array })
            .ok_or_else(|| Error::other(format!("unknown value type '{}'", s)))
    }
}

impl TryFrom<String> for ValueTypeName {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<ValueTypeName> for String {
    fn from(t: ValueTypeName) -> Self {
        t.to_string()
    }
}

/// A single attribute value.
///
/// Quaternions are stored `[i, j, k, real]`. Matrices are row-major with the
/// translation in the last row. Float components may be non-finite; see
/// [`super::non_finite`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Value {
    Bool(bool),
    UChar(u8),
    Int(i32),
    UInt(u32),
    Int64(i64),
    Half(f16),
    Float(#[serde(with = "super::non_finite")] f32),
    Double(#[serde(with = "super::non_finite")] f64),
    String(String),
    Token(String),
    Asset(String),
    Float2(#[serde(with = "super::non_finite")] [f32; 2]),
    Float3(#[serde(with = "super::non_finite")] [f32; 3]),
    Double3(#[serde(with = "super::non_finite")] [f64; 3]),
    Quatf(#[serde(with = "super::non_finite")] [f32; 4]),
    Matrix4d(#[serde(with = "super::non_finite")] [[f64; 4]; 4]),

    BoolArray(Vec<bool>),
    UCharArray(Vec<u8>),
    IntArray(Vec<i32>),
    UIntArray(Vec<u32>),
    Int64Array(Vec<i64>),
    HalfArray(Vec<f16>),
    FloatArray(#[serde(with = "super::non_finite")] Vec<f32>),
    DoubleArray(#[serde(with = "super::non_finite")] Vec<f64>),
    StringArray(Vec<String>),
    TokenArray(Vec<String>),
    Float2Array(#[serde(with = "super::non_finite")] Vec<[f32; 2]>),
    Float3Array(#[serde(with = "super::non_finite")] Vec<[f32; 3]>),
    Double3Array(#[serde(with = "super::non_finite")] Vec<[f64; 3]>),
    QuatfArray(#[serde(with = "super::non_finite")] Vec<[f32; 4]>),
    Matrix4dArray(#[serde(with = "super::non_finite")] Vec<[[f64; 4]; 4]>),
}

impl Value {
    /// Storage type of this value, with array-ness.
    pub fn storage_type(&self) -> ValueTypeName {
        use ScalarType as S;
        let (scalar, is_array) = match self {
            Self::Bool(_) => (S::Bool, false),
            Self::UChar(_) => (S::UChar, false),
            Self::Int(_) => (S::Int, false),
            Self::UInt(_) => (S::UInt, false),
            Self::Int64(_) => (S::Int64, false),
            Self::Half(_) => (S::Half, false),
            Self::Float(_) => (S::Float, false),
            Self::Double(_) => (S::Double, false),
            Self::String(_) => (S::String, false),
            Self::Token(_) => (S::Token, false),
            Self::Asset(_) => (S::Asset, false),
            Self::Float2(_) => (S::Float2, false),
            Self::Float3(_) => (S::Float3, false),
            Self::Double3(_) => (S::Double3, false),
            Self::Quatf(_) => (S::Quatf, false),
            Self::Matrix4d(_) => (S::Matrix4d, false),
            Self::BoolArray(_) => (S::Bool, true),
            Self::UCharArray(_) => (S::UChar, true),
            Self::IntArray(_) => (S::Int, true),
            Self::UIntArray(_) => (S::UInt, true),
            Self::Int64Array(_) => (S::Int64, true),
            Self::HalfArray(_) => (S::Half, true),
            Self::FloatArray(_) => (S::Float, true),
            Self::DoubleArray(_) => (S::Double, true),
            Self::StringArray(_) => (S::String, true),
            Self::TokenArray(_) => (S::Token, true),
            Self::Float2Array(_) => (S::Float2, true),
            Self::Float3Array(_) => (S::Float3, true),
            Self::Double3Array(_) => (S::Double3, true),
            Self::QuatfArray(_) => (S::Quatf, true),
            Self::Matrix4dArray(_) => (S::Matrix4d, true),
        };
        ValueTypeName { scalar, is_array }
    }

    /// True when this value can be stored in an attribute declared as `type_name`.
    pub fn is_compatible_with(&self, type_name: &ValueTypeName) -> bool {
        let storage = self.storage_type();
        storage.is_array == type_name.is_array && storage.scalar == type_name.scalar.storage()
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        self.storage_type().is_array
    }

    /// Element count for arrays, None for scalars.
    pub fn array_len(&self) -> Option<usize> {
        Some(match self {
            Self::BoolArray(v) => v.len(),
            Self::UCharArray(v) => v.len(),
            Self::IntArray(v) => v.len(),
            Self::UIntArray(v) => v.len(),
            Self::Int64Array(v) => v.len(),
            Self::HalfArray(v) => v.len(),
            Self::FloatArray(v) => v.len(),
            Self::DoubleArray(v) => v.len(),
            Self::StringArray(v) => v.len(),
            Self::TokenArray(v) => v.len(),
            Self::Float2Array(v) => v.len(),
            Self::Float3Array(v) => v.len(),
            Self::Double3Array(v) => v.len(),
            Self::QuatfArray(v) => v.len(),
            Self::Matrix4dArray(v) => v.len(),
            _ => return None,
        })
    }

    /// Token or string contents.
    pub fn as_token(&self) -> Option<&str> {
        match self {
            Self::Token(s) | Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Any scalar numeric value widened to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            Self::Float(v) => Some(*v as f64),
            Self::Half(v) => Some(v.to_f64()),
            Self::Int(v) => Some(*v as f64),
            Self::UInt(v) => Some(*v as f64),
            Self::Int64(v) => Some(*v as f64),
            Self::UChar(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Any scalar numeric value narrowed to f32.
    pub fn as_f32(&self) -> Option<f32> {
        self.as_f64().map(|v| v as f32)
    }

    pub fn as_float2(&self) -> Option<[f32; 2]> {
        match self {
            Self::Float2(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int_array(&self) -> Option<&[i32]> {
        match self {
            Self::IntArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float_array(&self) -> Option<&[f32]> {
        match self {
            Self::FloatArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float3_array(&self) -> Option<&[[f32; 3]]> {
        match self {
            Self::Float3Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_double3_array(&self) -> Option<&[[f64; 3]]> {
        match self {
            Self::Double3Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_token_array(&self) -> Option<&[String]> {
        match self {
            Self::TokenArray(v) | Self::StringArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_matrix4d(&self) -> Option<&[[f64; 4]; 4]> {
        match self {
            Self::Matrix4d(m) => Some(m),
            _ => None,
        }
    }
}
