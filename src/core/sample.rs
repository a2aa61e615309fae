//! Interpolation classes for primitive variables.

use serde::{Deserialize, Serialize};

/// How a primitive variable's values map onto the primitive's topology.
///
/// The stage records this as attribute metadata using the token returned by
/// [`Interpolation::as_token`]; the order of the variants is significant and
/// matches the stage's own ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Interpolation {
    /// One value for the whole primitive.
    #[default]
    #[serde(rename = "constant")]
    Constant,
    /// One value per face / curve.
    #[serde(rename = "uniform")]
    Uniform,
    /// One value per point, interpolated with the surface basis.
    #[serde(rename = "vertex")]
    Vertex,
    /// One value per point, interpolated linearly.
    #[serde(rename = "varying")]
    Varying,
    /// One value per face-vertex.
    #[serde(rename = "faceVarying")]
    FaceVarying,
}

impl Interpolation {
    /// Parse from a stage token. Unknown tokens yield None.
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "constant" => Some(Self::Constant),
            "uniform" => Some(Self::Uniform),
            "vertex" => Some(Self::Vertex),
            "varying" => Some(Self::Varying),
            "faceVarying" => Some(Self::FaceVarying),
            _ => None,
        }
    }

    /// Stage token.
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Uniform => "uniform",
            Self::Vertex => "vertex",
            Self::Varying => "varying",
            Self::FaceVarying => "faceVarying",
        }
    }
}

impl std::fmt::Display for Interpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        for i in [
            Interpolation::Constant,
            Interpolation::Uniform,
            Interpolation::Vertex,
            Interpolation::Varying,
            Interpolation::FaceVarying,
        ] {
            assert_eq!(Interpolation::from_token(i.as_token()), Some(i));
        }
        assert_eq!(Interpolation::from_token("perVertex"), None);
    }

    #[test]
    fn test_ordering() {
        assert!(Interpolation::Constant < Interpolation::Uniform);
        assert!(Interpolation::Varying < Interpolation::FaceVarying);
    }
}
