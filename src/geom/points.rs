//! Points schema conversion.

use super::{data_algo, primvars};
use crate::core::{Diagnostics, Interpolation, TimeCode};
use crate::scene::{Data, PointsPrimitive, PrimitiveVariable};
use crate::stage::{tokens, Prim};
use crate::util::Result;

/// Read the `widths` attribute as a `width` variable, collapsing a constant
/// one-element array to a scalar.
pub(crate) fn read_widths(
    prim: &Prim,
    time: TimeCode,
    diagnostics: &Diagnostics,
) -> Option<PrimitiveVariable> {
    primvars::read_attribute_as_variable(prim, tokens::WIDTHS, time, true, diagnostics)
}

/// Author a `width` variable on `widths`; constants become one-element arrays.
pub(crate) fn write_widths(prim: &mut Prim, variable: &PrimitiveVariable, time: TimeCode) -> Result<()> {
    primvars::write_attribute_from_variable(prim, tokens::WIDTHS, variable, true, time)
}

/// Read a points prim.
pub fn read(prim: &Prim, time: TimeCode, diagnostics: &Diagnostics) -> PointsPrimitive {
    let mut points = PointsPrimitive::new(0);
    primvars::read_primitive_variables(prim, time, diagnostics, &mut points.variables);
    if let Some(p) = points.variables.get("P").and_then(|v| v.data.as_v3f_vec()) {
        points.num_points = p.len();
    }

    if let Some(ids) = primvars::attribute_data(prim, tokens::IDS, time) {
        points
            .variables
            .insert("id".to_string(), PrimitiveVariable::new(Interpolation::Vertex, ids));
    }

    if let Some(width) = read_widths(prim, time, diagnostics) {
        points.variables.insert("width".to_string(), width);
    }

    points
}

/// Author `points` on a prim already typed as points.
pub fn write(prim: &mut Prim, points: &PointsPrimitive, time: TimeCode) -> Result<()> {
    for (name, variable) in &points.variables {
        match name.as_str() {
            "id" => {
                let ids = match &variable.data {
                    Data::IntVec(v) => Data::Int64Vec(v.iter().map(|&i| i as i64).collect()),
                    other => other.clone(),
                };
                primvars::set_attribute(
                    prim,
                    tokens::IDS,
                    data_algo::value_type_name(&ids),
                    data_algo::to_stage(&ids),
                    time,
                )?;
            }
            "width" => write_widths(prim, variable, time)?,
            _ => primvars::write_primitive_variable(prim, name, variable, time)?,
        }
    }
    Ok(())
}
