//! Mesh schema conversion.

use super::primvars;
use crate::core::{Diagnostics, TimeCode};
use crate::scene::{MeshPrimitive, MESH_CATMULL_CLARK, MESH_LINEAR};
use crate::stage::schema::resolve_token;
use crate::stage::{tokens, Prim, ScalarType, Value, ValueTypeName};
use crate::util::Result;

const CONTEXT: &str = "Mesh";

/// Read a mesh prim.
pub fn read(prim: &Prim, time: TimeCode, diagnostics: &Diagnostics) -> MeshPrimitive {
    let counts = primvars::int_array(prim, tokens::FACE_VERTEX_COUNTS, time);
    let indices = primvars::int_array(prim, tokens::FACE_VERTEX_INDICES, time);

    let scheme = resolve_token(prim, tokens::SUBDIVISION_SCHEME, time);
    let interpolation = if scheme.as_deref() == Some(tokens::CATMULL_CLARK) {
        MESH_CATMULL_CLARK
    } else {
        MESH_LINEAR
    };

    let mut mesh = MeshPrimitive::new(counts, indices, interpolation);
    primvars::read_primitive_variables(prim, time, diagnostics, &mut mesh.variables);

    let corner_ids = primvars::int_array(prim, tokens::CORNER_INDICES, time);
    if !corner_ids.is_empty() {
        let sharpnesses = primvars::float_array(prim, tokens::CORNER_SHARPNESSES, time);
        mesh.set_corners(corner_ids, sharpnesses);
    }

    let crease_lengths = primvars::int_array(prim, tokens::CREASE_LENGTHS, time);
    if !crease_lengths.is_empty() {
        let sharpnesses = primvars::float_array(prim, tokens::CREASE_SHARPNESSES, time);
        if sharpnesses.len() == crease_lengths.len() {
            let ids = primvars::int_array(prim, tokens::CREASE_INDICES, time);
            mesh.set_creases(crease_lengths, ids, sharpnesses);
        } else {
            // Per-edge sharpness within a crease has no scene representation.
            diagnostics.warn(CONTEXT, "Ignoring creases with varying sharpness");
        }
    }

    mesh
}

/// Author `mesh` on a prim already typed as a mesh.
pub fn write(prim: &mut Prim, mesh: &MeshPrimitive, time: TimeCode) -> Result<()> {
    let int_array = ValueTypeName::array(ScalarType::Int);
    let float_array = ValueTypeName::array(ScalarType::Float);

    primvars::set_attribute(
        prim,
        tokens::FACE_VERTEX_COUNTS,
        int_array,
        Value::IntArray(mesh.vertices_per_face.clone()),
        time,
    )?;
    primvars::set_attribute(
        prim,
        tokens::FACE_VERTEX_INDICES,
        int_array,
        Value::IntArray(mesh.vertex_ids.clone()),
        time,
    )?;

    let scheme = if mesh.interpolation == MESH_CATMULL_CLARK {
        tokens::CATMULL_CLARK
    } else {
        tokens::NONE
    };
    primvars::set_attribute(
        prim,
        tokens::SUBDIVISION_SCHEME,
        ValueTypeName::scalar(ScalarType::Token),
        Value::Token(scheme.to_string()),
        time,
    )?;

    if !mesh.corner_ids.is_empty() {
        primvars::set_attribute(
            prim,
            tokens::CORNER_INDICES,
            int_array,
            Value::IntArray(mesh.corner_ids.clone()),
            time,
        )?;
        primvars::set_attribute(
            prim,
            tokens::CORNER_SHARPNESSES,
            float_array,
            Value::FloatArray(mesh.corner_sharpnesses.clone()),
            time,
        )?;
    }

    if !mesh.crease_lengths.is_empty() {
        primvars::set_attribute(
            prim,
            tokens::CREASE_LENGTHS,
            int_array,
            Value::IntArray(mesh.crease_lengths.clone()),
            time,
        )?;
        primvars::set_attribute(
            prim,
            tokens::CREASE_INDICES,
            int_array,
            Value::IntArray(mesh.crease_ids.clone()),
            time,
        )?;
        primvars::set_attribute(
            prim,
            tokens::CREASE_SHARPNESSES,
            float_array,
            Value::FloatArray(mesh.crease_sharpnesses.clone()),
            time,
        )?;
    }

    for (name, variable) in &mesh.variables {
        primvars::write_primitive_variable(prim, name, variable, time)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Interpolation;
    use crate::scene::{Data, PrimitiveVariable};
    use crate::util::Vec3;

    fn quad() -> MeshPrimitive {
        MeshPrimitive::with_points(
            vec![4],
            vec![0, 1, 2, 3],
            MESH_LINEAR,
            vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
        )
    }

    #[test]
    fn test_linear_scheme_is_none_token() {
        let mut prim = Prim::new("Mesh");
        write(&mut prim, &quad(), TimeCode::Default).unwrap();
        assert_eq!(
            prim.attribute(tokens::SUBDIVISION_SCHEME)
                .and_then(|a| a.get(TimeCode::Default)),
            Some(&Value::Token("none".into()))
        );

        let back = read(&prim, TimeCode::Default, &Diagnostics::new());
        assert_eq!(back, quad());
    }

    #[test]
    fn test_unauthored_scheme_reads_as_catmull_clark() {
        let prim = Prim::new("Mesh");
        let mesh = read(&prim, TimeCode::Default, &Diagnostics::new());
        assert_eq!(mesh.interpolation, MESH_CATMULL_CLARK);
        assert!(mesh.vertices_per_face.is_empty());
    }

    #[test]
    fn test_crease_mismatch_drops_all_creases() {
        let mut mesh = quad();
        mesh.set_creases(vec![3], vec![0, 1, 2], vec![1.0, 2.0]);
        let mut prim = Prim::new("Mesh");
        write(&mut prim, &mesh, TimeCode::Default).unwrap();

        let diagnostics = Diagnostics::new();
        let back = read(&prim, TimeCode::Default, &diagnostics);
        assert!(back.crease_lengths.is_empty());
        assert!(back.crease_ids.is_empty());
        assert!(back.crease_sharpnesses.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_corners_and_vertex_primvar() {
        let mut mesh = quad();
        mesh.interpolation = MESH_CATMULL_CLARK.to_string();
        mesh.set_corners(vec![0], vec![0.5]);
        mesh.variables.insert(
            "foo".into(),
            PrimitiveVariable::new(Interpolation::Vertex, Data::FloatVec(vec![1.0, 2.0, 3.0, 4.0])),
        );

        let mut prim = Prim::new("Mesh");
        write(&mut prim, &mesh, TimeCode::Time(24.0)).unwrap();
        let back = read(&prim, TimeCode::Time(24.0), &Diagnostics::new());
        assert_eq!(back, mesh);
    }
}
