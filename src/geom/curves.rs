//! Basis curves schema conversion.

use super::{points, primvars};
use crate::core::{Diagnostics, TimeCode};
use crate::scene::{CubicBasis, CurvesPrimitive};
use crate::stage::schema::resolve_token;
use crate::stage::{tokens, Prim, ScalarType, Value, ValueTypeName};
use crate::util::Result;

const CONTEXT: &str = "Curves";

impl CubicBasis {
    /// Stage basis token; None for linear curves.
    pub fn as_token(&self) -> Option<&'static str> {
        match self {
            Self::Linear => None,
            Self::Bezier => Some(tokens::BEZIER),
            Self::BSpline => Some(tokens::BSPLINE),
            Self::CatmullRom => Some(tokens::CATMULL_ROM),
        }
    }

    /// Parse a cubic basis token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            tokens::BEZIER => Some(Self::Bezier),
            tokens::BSPLINE => Some(Self::BSpline),
            tokens::CATMULL_ROM => Some(Self::CatmullRom),
            _ => None,
        }
    }
}

/// Read a basis curves prim.
pub fn read(prim: &Prim, time: TimeCode, diagnostics: &Diagnostics) -> CurvesPrimitive {
    let counts = primvars::int_array(prim, tokens::CURVE_VERTEX_COUNTS, time);

    let mut basis = CubicBasis::Linear;
    if resolve_token(prim, tokens::TYPE, time).as_deref() == Some(tokens::CUBIC) {
        let token = resolve_token(prim, tokens::BASIS, time).unwrap_or_default();
        match CubicBasis::from_token(&token) {
            Some(b) => basis = b,
            None => diagnostics.warn(CONTEXT, format!("Unsupported basis \"{}\"", token)),
        }
    }

    let wrap = resolve_token(prim, tokens::WRAP, time).unwrap_or_default();
    let periodic = wrap == tokens::PERIODIC;
    if !periodic && wrap != tokens::NONPERIODIC {
        diagnostics.warn(CONTEXT, format!("Unsupported wrap \"{}\"", wrap));
    }

    let mut curves = CurvesPrimitive::new(counts, basis, periodic);
    primvars::read_primitive_variables(prim, time, diagnostics, &mut curves.variables);
    if let Some(width) = points::read_widths(prim, time, diagnostics) {
        curves.variables.insert("width".to_string(), width);
    }
    curves
}

/// Author `curves` on a prim already typed as basis curves.
pub fn write(prim: &mut Prim, curves: &CurvesPrimitive, time: TimeCode) -> Result<()> {
    let token = ValueTypeName::scalar(ScalarType::Token);

    primvars::set_attribute(
        prim,
        tokens::CURVE_VERTEX_COUNTS,
        ValueTypeName::array(ScalarType::Int),
        Value::IntArray(curves.vertices_per_curve.clone()),
        time,
    )?;

    let wrap = if curves.periodic {
        tokens::PERIODIC
    } else {
        tokens::NONPERIODIC
    };
    primvars::set_attribute(prim, tokens::WRAP, token, Value::Token(wrap.into()), time)?;

    match curves.basis.as_token() {
        Some(basis) => {
            primvars::set_attribute(prim, tokens::TYPE, token, Value::Token(tokens::CUBIC.into()), time)?;
            primvars::set_attribute(prim, tokens::BASIS, token, Value::Token(basis.into()), time)?;
        }
        None => {
            primvars::set_attribute(prim, tokens::TYPE, token, Value::Token(tokens::LINEAR.into()), time)?;
        }
    }

    for (name, variable) in &curves.variables {
        if name == "width" {
            points::write_widths(prim, variable, time)?;
        } else {
            primvars::write_primitive_variable(prim, name, variable, time)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Interpolation;
    use crate::scene::{Data, PrimitiveVariable};

    fn token_attr(prim: &mut Prim, name: &str, value: &str) {
        primvars::set_attribute(
            prim,
            name,
            ValueTypeName::scalar(ScalarType::Token),
            Value::Token(value.into()),
            TimeCode::Default,
        )
        .unwrap();
    }

    #[test]
    fn test_round_trip_bspline_periodic() {
        let mut curves = CurvesPrimitive::new(vec![4, 4], CubicBasis::BSpline, true);
        curves.variables.insert(
            "width".into(),
            PrimitiveVariable::new(Interpolation::Constant, Data::Float(0.1)),
        );
        let mut prim = Prim::new("BasisCurves");
        write(&mut prim, &curves, TimeCode::Default).unwrap();

        let diagnostics = Diagnostics::new();
        assert_eq!(read(&prim, TimeCode::Default, &diagnostics), curves);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_linear_has_no_basis() {
        let curves = CurvesPrimitive::new(vec![2], CubicBasis::Linear, false);
        let mut prim = Prim::new("BasisCurves");
        write(&mut prim, &curves, TimeCode::Default).unwrap();
        assert!(!prim.has_attribute(tokens::BASIS));
        assert_eq!(read(&prim, TimeCode::Default, &Diagnostics::new()).basis, CubicBasis::Linear);
    }

    #[test]
    fn test_unauthored_reads_cubic_bezier() {
        let prim = Prim::new("BasisCurves");
        let curves = read(&prim, TimeCode::Default, &Diagnostics::new());
        assert_eq!(curves.basis, CubicBasis::Bezier);
        assert!(!curves.periodic);
    }

    #[test]
    fn test_unsupported_tokens_warn() {
        let mut prim = Prim::new("BasisCurves");
        token_attr(&mut prim, tokens::TYPE, tokens::CUBIC);
        token_attr(&mut prim, tokens::BASIS, "hermite");
        token_attr(&mut prim, tokens::WRAP, "pinned");

        let diagnostics = Diagnostics::new();
        let curves = read(&prim, TimeCode::Default, &diagnostics);
        assert_eq!(curves.basis, CubicBasis::Linear);
        assert!(!curves.periodic);

        let messages: Vec<String> = diagnostics.take().into_iter().map(|w| w.message).collect();
        assert_eq!(messages, vec!["Unsupported basis \"hermite\"", "Unsupported wrap \"pinned\""]);
    }
}
