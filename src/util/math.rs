//! glam re-exports plus the location bound type.

pub use glam::{DMat4, DQuat, DVec3, Quat, Vec2, Vec3};

use std::fmt;

/// Time value in seconds.
pub type Chrono = f64;

/// Axis-aligned location bound in double precision.
///
/// The stage stores bounds as a two-point single precision `extent`; see
/// [`BBox3d::from_extent`] and [`BBox3d::to_extent`].
#[derive(Clone, Copy, PartialEq)]
pub struct BBox3d {
    pub min: DVec3,
    pub max: DVec3,
}

impl BBox3d {
    /// Inverted box; any point expands it.
    pub const EMPTY: Self = Self {
        min: DVec3::splat(f64::INFINITY),
        max: DVec3::splat(f64::NEG_INFINITY),
    };

    #[inline]
    pub const fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn expand_by_point(&mut self, p: DVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Bound from a stage extent. Anything but exactly two points is None.
    pub fn from_extent(extent: &[[f32; 3]]) -> Option<Self> {
        let [min, max] = extent else {
            return None;
        };
        Some(Self::new(Vec3::from_array(*min).as_dvec3(), Vec3::from_array(*max).as_dvec3()))
    }

    /// Two-point stage extent, narrowed to single precision.
    pub fn to_extent(&self) -> Vec<[f32; 3]> {
        vec![self.min.as_vec3().to_array(), self.max.as_vec3().to_array()]
    }
}

impl Default for BBox3d {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for BBox3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "BBox3d(empty)")
        } else {
            write!(f, "BBox3d({:?} .. {:?})", self.min, self.max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_expand() {
        let mut b = BBox3d::default();
        assert!(b.is_empty());
        b.expand_by_point(DVec3::new(-1.0, 0.0, 2.0));
        assert!(!b.is_empty());
        assert_eq!(b.min, b.max);
    }

    #[test]
    fn test_extent_conversion() {
        let b = BBox3d::new(DVec3::new(-1.0, -2.0, -3.0), DVec3::new(0.5, 1.0, 1.5));
        let extent = b.to_extent();
        assert_eq!(extent, vec![[-1.0, -2.0, -3.0], [0.5, 1.0, 1.5]]);
        assert_eq!(BBox3d::from_extent(&extent), Some(b));
        assert_eq!(BBox3d::from_extent(&extent[..1]), None);
    }
}
