//! Primitive variable read/write shared by every geometry kind.
//!
//! Stage attribute naming:
//!
//! | scene name     | stage attribute           | notes                  |
//! |----------------|---------------------------|------------------------|
//! | `P`            | `points`                  | point based prims only |
//! | `N`            | `normals`                 | point based prims only |
//! | `velocity`     | `velocities`              | point based prims only |
//! | `acceleration` | `accelerations`           | point based prims only |
//! | `Cs`           | `primvars:displayColor`   | array shaped           |
//! | `<name>`       | `primvars:<name>`         |                        |
//!
//! Indices live in a sibling `<attribute>:indices` int array.

use super::data_algo;
use crate::core::{Diagnostics, Interpolation, TimeCode};
use crate::scene::{Data, PrimitiveVariable, PrimitiveVariableMap};
use crate::stage::{tokens, Prim, ScalarType, Value, ValueTypeName};
use crate::util::Result;

const CONTEXT: &str = "PrimitiveVariables";

/// Scene names whose stage attributes exist only on point based prims.
const POINT_BASED: [(&str, &str); 4] = [
    ("P", tokens::POINTS),
    ("N", tokens::NORMALS),
    ("velocity", tokens::VELOCITIES),
    ("acceleration", tokens::ACCELERATIONS),
];

/// Stage attribute for scene variable `name`.
pub fn stage_name(name: &str, point_based: bool) -> String {
    if point_based {
        if let Some((_, attr)) = POINT_BASED.iter().find(|(n, _)| *n == name) {
            return (*attr).to_string();
        }
    }
    if name == "Cs" {
        return tokens::DISPLAY_COLOR.to_string();
    }
    format!("{}{}", tokens::PRIMVARS_PREFIX, name)
}

/// Scene variable for stage attribute `attr`, or None if it is not a
/// primitive variable.
pub fn scene_name(attr: &str, point_based: bool) -> Option<String> {
    if point_based {
        if let Some((name, _)) = POINT_BASED.iter().find(|(_, a)| *a == attr) {
            return Some((*name).to_string());
        }
    }
    if attr == tokens::DISPLAY_COLOR {
        return Some("Cs".to_string());
    }
    let name = attr.strip_prefix(tokens::PRIMVARS_PREFIX)?;
    if name.is_empty() || name.ends_with(tokens::INDICES_SUFFIX) {
        return None;
    }
    Some(name.to_string())
}

/// Variables stored as arrays even when constant.
pub fn is_array_shaped(name: &str) -> bool {
    matches!(name, "width" | "Cs")
}

fn default_interpolation(attr: &str) -> Interpolation {
    if attr.starts_with(tokens::PRIMVARS_PREFIX) {
        Interpolation::Constant
    } else {
        Interpolation::Vertex
    }
}

/// Read one attribute as a variable. A one-element constant array collapses
/// to a scalar when `collapse` is set.
pub fn read_attribute_as_variable(
    prim: &Prim,
    attr_name: &str,
    time: TimeCode,
    collapse: bool,
    diagnostics: &Diagnostics,
) -> Option<PrimitiveVariable> {
    let attr = prim.attribute(attr_name)?;
    let value = attr.get(time)?;
    let Some(mut data) = data_algo::from_stage(value, &attr.type_name()) else {
        diagnostics.warn(
            CONTEXT,
            format!(
                "PrimVar: {} type: {} not supported - skipping",
                attr_name,
                attr.type_name()
            ),
        );
        return None;
    };
    let interpolation = attr
        .interpolation()
        .unwrap_or_else(|| default_interpolation(attr_name));
    if collapse && interpolation == Interpolation::Constant {
        if let Some(single) = data.single_element() {
            data = single;
        }
    }
    let indices = prim
        .attribute(&format!("{}{}", attr_name, tokens::INDICES_SUFFIX))
        .and_then(|a| a.get(time))
        .and_then(Value::as_int_array)
        .map(<[i32]>::to_vec);
    Some(PrimitiveVariable {
        interpolation,
        data,
        indices,
    })
}

/// Read every primitive variable authored on `prim`.
pub fn read_primitive_variables(
    prim: &Prim,
    time: TimeCode,
    diagnostics: &Diagnostics,
    variables: &mut PrimitiveVariableMap,
) {
    let point_based = prim.schema_type().is_point_based();
    for (attr_name, _) in prim.attributes() {
        let Some(name) = scene_name(attr_name, point_based) else {
            continue;
        };
        let collapse = is_array_shaped(&name);
        if let Some(variable) =
            read_attribute_as_variable(prim, attr_name, time, collapse, diagnostics)
        {
            variables.insert(name, variable);
        }
    }
}

/// Author `value` on `attr_name`, (re)typing the attribute from the value.
pub fn set_attribute(
    prim: &mut Prim,
    attr_name: &str,
    type_name: ValueTypeName,
    value: Value,
    time: TimeCode,
) -> Result<()> {
    prim.create_attribute(attr_name, type_name, false)
        .set(value, time)
}

/// Author a variable on `attr_name`. Array shaped constants are expanded to
/// one-element arrays.
pub fn write_attribute_from_variable(
    prim: &mut Prim,
    attr_name: &str,
    variable: &PrimitiveVariable,
    array_shaped: bool,
    time: TimeCode,
) -> Result<()> {
    let data = if array_shaped && variable.interpolation == Interpolation::Constant {
        variable.data.to_single_element_vec()
    } else {
        variable.data.clone()
    };
    let type_name = data_algo::value_type_name(&data);
    let attr = prim.create_attribute(attr_name, type_name, false);
    attr.set(data_algo::to_stage(&data), time)?;
    attr.set_interpolation(variable.interpolation);

    if let Some(indices) = &variable.indices {
        set_attribute(
            prim,
            &format!("{}{}", attr_name, tokens::INDICES_SUFFIX),
            ValueTypeName::array(ScalarType::Int),
            Value::IntArray(indices.clone()),
            time,
        )?;
    }
    Ok(())
}

/// Author scene variable `name` under its stage name.
pub fn write_primitive_variable(
    prim: &mut Prim,
    name: &str,
    variable: &PrimitiveVariable,
    time: TimeCode,
) -> Result<()> {
    let point_based = prim.schema_type().is_point_based();
    let attr_name = stage_name(name, point_based);
    write_attribute_from_variable(prim, &attr_name, variable, is_array_shaped(name), time)
}

/// Read an int array attribute, treating absence as empty.
pub fn int_array(prim: &Prim, attr_name: &str, time: TimeCode) -> Vec<i32> {
    prim.attribute(attr_name)
        .and_then(|a| a.get(time))
        .and_then(Value::as_int_array)
        .map(<[i32]>::to_vec)
        .unwrap_or_default()
}

/// Read a float array attribute, treating absence as empty.
pub fn float_array(prim: &Prim, attr_name: &str, time: TimeCode) -> Vec<f32> {
    prim.attribute(attr_name)
        .and_then(|a| a.get(time))
        .and_then(Value::as_float_array)
        .map(<[f32]>::to_vec)
        .unwrap_or_default()
}

/// Convert an attribute straight to data, without interpolation handling.
pub fn attribute_data(prim: &Prim, attr_name: &str, time: TimeCode) -> Option<Data> {
    let attr = prim.attribute(attr_name)?;
    data_algo::from_stage(attr.get(time)?, &attr.type_name())
}
