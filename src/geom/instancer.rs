//! Point instancer conversion.
//!
//! Instancers read as [`PointsPrimitive`]s whose per-instance arrays become
//! vertex variables and whose `prototypes` targets become the constant
//! `prototypeRoots` string array. A points primitive carrying
//! `prototypeRoots` is written back as an instancer.

use super::{data_algo, primvars};
use crate::core::{Diagnostics, Interpolation, TimeCode};
use crate::scene::{Data, GeometricInterpretation, PointsPrimitive, PrimitiveVariable, PROTOTYPE_ROOTS};
use crate::stage::{tokens, Prim, StagePath};
use crate::util::Result;

const CONTEXT: &str = "PointInstancer";

/// Per-instance arrays: (scene variable, stage attribute).
const PER_INSTANCE: [(&str, &str); 7] = [
    ("prototypeIndex", tokens::PROTO_INDICES),
    ("instanceId", tokens::IDS),
    ("orientation", tokens::ORIENTATIONS),
    ("scale", tokens::SCALES),
    ("velocity", tokens::VELOCITIES),
    ("acceleration", tokens::ACCELERATIONS),
    ("angularVelocity", tokens::ANGULAR_VELOCITIES),
];

/// Read a point instancer prim.
pub fn read(prim: &Prim, time: TimeCode, diagnostics: &Diagnostics) -> PointsPrimitive {
    let positions = match primvars::attribute_data(prim, tokens::POSITIONS, time) {
        Some(Data::V3fVec(p, _)) => p,
        _ => Vec::new(),
    };
    let mut points = PointsPrimitive::with_positions(positions);

    for (name, attr) in PER_INSTANCE {
        if let Some(data) = primvars::attribute_data(prim, attr, time) {
            points
                .variables
                .insert(name.to_string(), PrimitiveVariable::new(Interpolation::Vertex, data));
        }
    }

    primvars::read_primitive_variables(prim, time, diagnostics, &mut points.variables);

    let roots: Vec<String> = prim
        .relationship(tokens::PROTOTYPES)
        .unwrap_or_default()
        .iter()
        .map(|t| t.to_string())
        .collect();
    points.variables.insert(
        PROTOTYPE_ROOTS.to_string(),
        PrimitiveVariable::new(Interpolation::Constant, Data::StringVec(roots)),
    );

    points
}

/// Author `points` on a prim already typed as a point instancer.
pub fn write(
    prim: &mut Prim,
    points: &PointsPrimitive,
    time: TimeCode,
    diagnostics: &Diagnostics,
) -> Result<()> {
    for (name, variable) in &points.variables {
        if name == "P" {
            let positions = match &variable.data {
                Data::V3fVec(p, _) => Data::V3fVec(p.clone(), GeometricInterpretation::Point),
                other => other.clone(),
            };
            primvars::set_attribute(
                prim,
                tokens::POSITIONS,
                data_algo::value_type_name(&positions),
                data_algo::to_stage(&positions),
                time,
            )?;
        } else if name == PROTOTYPE_ROOTS {
            write_prototypes(prim, &variable.data, diagnostics);
        } else if let Some((_, attr)) = PER_INSTANCE.iter().find(|(n, _)| n == name) {
            let data = match (&variable.data, *attr) {
                (Data::IntVec(v), tokens::IDS) => Data::Int64Vec(v.iter().map(|&i| i as i64).collect()),
                (other, _) => other.clone(),
            };
            primvars::set_attribute(
                prim,
                attr,
                data_algo::value_type_name(&data),
                data_algo::to_stage(&data),
                time,
            )?;
        } else {
            primvars::write_primitive_variable(prim, name, variable, time)?;
        }
    }
    Ok(())
}

fn write_prototypes(prim: &mut Prim, data: &Data, diagnostics: &Diagnostics) {
    let Some(roots) = data.as_string_vec() else {
        diagnostics.warn(
            CONTEXT,
            format!("{} must be a string vector, got {}", PROTOTYPE_ROOTS, data.type_name()),
        );
        return;
    };
    let mut targets = Vec::with_capacity(roots.len());
    for root in roots {
        match StagePath::new(root.as_str()) {
            Ok(path) if path.is_absolute() => targets.push(path),
            _ => diagnostics.warn(CONTEXT, format!("Invalid prototype root \"{}\"", root)),
        }
    }
    prim.set_relationship_targets(tokens::PROTOTYPES, targets);
}
