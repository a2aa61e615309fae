//! Xformable transform ops.
//!
//! A prim's local transform is the product of the ops listed in its
//! `xformOpOrder`, first op outermost. Supported ops:
//! `transform`, `translate`, `scale`, `rotateXYZ` (degrees) and `orient`.

use crate::core::TimeCode;
use crate::stage::{tokens, Prim, ScalarType, Value, ValueTypeName};
use crate::util::{DMat4, DQuat, DVec3, Result};

/// Transform operation type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XformOpType {
    Transform,
    Translate,
    Scale,
    RotateXYZ,
    Orient,
}

impl XformOpType {
    /// Parse an op attribute name such as `xformOp:translate` or
    /// `xformOp:translate:pivot`.
    pub fn from_op_name(name: &str) -> Option<Self> {
        let rest = name.strip_prefix("xformOp:")?;
        let kind = rest.split(':').next()?;
        match kind {
            "transform" => Some(Self::Transform),
            "translate" => Some(Self::Translate),
            "scale" => Some(Self::Scale),
            "rotateXYZ" => Some(Self::RotateXYZ),
            "orient" => Some(Self::Orient),
            _ => None,
        }
    }
}

fn vec3(value: &Value) -> Option<DVec3> {
    match value {
        Value::Double3(v) => Some(DVec3::from_array(*v)),
        Value::Float3(v) => Some(DVec3::new(v[0] as f64, v[1] as f64, v[2] as f64)),
        _ => None,
    }
}

fn op_matrix(op: XformOpType, value: &Value) -> Option<DMat4> {
    Some(match op {
        XformOpType::Transform => DMat4::from_cols_array_2d(value.as_matrix4d()?),
        XformOpType::Translate => DMat4::from_translation(vec3(value)?),
        XformOpType::Scale => DMat4::from_scale(vec3(value)?),
        XformOpType::RotateXYZ => {
            let r = vec3(value)?;
            DMat4::from_rotation_z(r.z.to_radians())
                * DMat4::from_rotation_y(r.y.to_radians())
                * DMat4::from_rotation_x(r.x.to_radians())
        }
        XformOpType::Orient => match value {
            Value::Quatf(q) => DMat4::from_quat(
                DQuat::from_xyzw(q[0] as f64, q[1] as f64, q[2] as f64, q[3] as f64).normalize(),
            ),
            _ => return None,
        },
    })
}

/// Op attribute names in `xformOpOrder`.
pub fn op_order(prim: &Prim) -> Vec<String> {
    prim.attribute(tokens::XFORM_OP_ORDER)
        .and_then(|a| a.get(TimeCode::Default))
        .and_then(Value::as_token_array)
        .map(<[String]>::to_vec)
        .unwrap_or_default()
}

/// The prim's local transform at `time`. Unknown or unauthored ops are
/// skipped.
pub fn local_transform(prim: &Prim, time: TimeCode) -> DMat4 {
    let mut result = DMat4::IDENTITY;
    for name in op_order(prim) {
        let Some(op) = XformOpType::from_op_name(&name) else {
            continue;
        };
        let Some(m) = prim
            .attribute(&name)
            .and_then(|a| a.get(time))
            .and_then(|v| op_matrix(op, v))
        else {
            continue;
        };
        result *= m;
    }
    result
}

/// True if any op in the order may vary over time.
pub fn might_be_time_varying(prim: &Prim) -> bool {
    op_order(prim).iter().any(|name| {
        prim.attribute(name)
            .is_some_and(|a| a.value_might_be_time_varying())
    })
}

/// Replace the op stack with a single matrix op holding `matrix` at `time`.
pub fn set_matrix(prim: &mut Prim, matrix: &DMat4, time: TimeCode) -> Result<()> {
    prim.create_attribute(
        tokens::XFORM_OP_TRANSFORM,
        ValueTypeName::scalar(ScalarType::Matrix4d),
        false,
    )
    .set(Value::Matrix4d(matrix.to_cols_array_2d()), time)?;
    prim.create_attribute(
        tokens::XFORM_OP_ORDER,
        ValueTypeName::array(ScalarType::Token),
        false,
    )
    .set(
        Value::TokenArray(vec![tokens::XFORM_OP_TRANSFORM.to_string()]),
        TimeCode::Default,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(prim: &mut Prim, name: &str, type_name: ValueTypeName, value: Value) {
        prim.create_attribute(name, type_name, false)
            .set(value, TimeCode::Default)
            .unwrap();
    }

    #[test]
    fn test_op_names() {
        assert_eq!(XformOpType::from_op_name("xformOp:translate"), Some(XformOpType::Translate));
        assert_eq!(XformOpType::from_op_name("xformOp:translate:pivot"), Some(XformOpType::Translate));
        assert_eq!(XformOpType::from_op_name("xformOp:rotateZYX"), None);
        assert_eq!(XformOpType::from_op_name("points"), None);
    }

    #[test]
    fn test_translate_then_scale() {
        let mut prim = Prim::new("Xform");
        author(
            &mut prim,
            tokens::XFORM_OP_TRANSLATE,
            ValueTypeName::scalar(ScalarType::Double3),
            Value::Double3([1.0, 2.0, 3.0]),
        );
        author(
            &mut prim,
            tokens::XFORM_OP_SCALE,
            ValueTypeName::scalar(ScalarType::Float3),
            Value::Float3([2.0, 2.0, 2.0]),
        );
        author(
            &mut prim,
            tokens::XFORM_OP_ORDER,
            ValueTypeName::array(ScalarType::Token),
            Value::TokenArray(vec![tokens::XFORM_OP_TRANSLATE.into(), tokens::XFORM_OP_SCALE.into()]),
        );

        let m = local_transform(&prim, TimeCode::Default);
        // Scale applies first, then the translation.
        assert_eq!(m.transform_point3(DVec3::X), DVec3::new(3.0, 2.0, 3.0));
        assert!(!might_be_time_varying(&prim));
    }

    #[test]
    fn test_rotate_xyz() {
        let mut prim = Prim::new("Xform");
        author(
            &mut prim,
            tokens::XFORM_OP_ROTATE_XYZ,
            ValueTypeName::scalar(ScalarType::Float3),
            Value::Float3([0.0, 0.0, 90.0]),
        );
        author(
            &mut prim,
            tokens::XFORM_OP_ORDER,
            ValueTypeName::array(ScalarType::Token),
            Value::TokenArray(vec![tokens::XFORM_OP_ROTATE_XYZ.into()]),
        );
        let p = local_transform(&prim, TimeCode::Default).transform_point3(DVec3::X);
        assert!((p - DVec3::Y).length() < 1e-9);
    }

    #[test]
    fn test_set_matrix_resets_order() {
        let mut prim = Prim::new("Xform");
        author(
            &mut prim,
            tokens::XFORM_OP_ORDER,
            ValueTypeName::array(ScalarType::Token),
            Value::TokenArray(vec![tokens::XFORM_OP_SCALE.into()]),
        );
        let m = DMat4::from_translation(DVec3::new(0.0, 5.0, 0.0));
        set_matrix(&mut prim, &m, TimeCode::Time(1.0)).unwrap();
        set_matrix(&mut prim, &DMat4::IDENTITY, TimeCode::Time(2.0)).unwrap();

        assert_eq!(op_order(&prim), vec![tokens::XFORM_OP_TRANSFORM.to_string()]);
        assert_eq!(local_transform(&prim, TimeCode::Time(1.0)), m);
        assert!(might_be_time_varying(&prim));
    }
}
