//! Sphere schema conversion.

use super::primvars;
use crate::core::{Diagnostics, TimeCode};
use crate::scene::SpherePrimitive;
use crate::stage::schema::resolve;
use crate::stage::{tokens, Prim, ScalarType, Value, ValueTypeName};
use crate::util::Result;

/// Read a sphere prim. The stage radius is a double; the scene's is a float.
pub fn read(prim: &Prim, time: TimeCode, diagnostics: &Diagnostics) -> SpherePrimitive {
    let radius = resolve(prim, tokens::RADIUS, time)
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    let mut sphere = SpherePrimitive::new(radius as f32);
    primvars::read_primitive_variables(prim, time, diagnostics, &mut sphere.variables);
    sphere
}

pub fn write(prim: &mut Prim, sphere: &SpherePrimitive, time: TimeCode) -> Result<()> {
    primvars::set_attribute(
        prim,
        tokens::RADIUS,
        ValueTypeName::scalar(ScalarType::Double),
        Value::Double(sphere.radius as f64),
        time,
    )?;
    for (name, variable) in &sphere.variables {
        primvars::write_primitive_variable(prim, name, variable, time)?;
    }
    Ok(())
}
