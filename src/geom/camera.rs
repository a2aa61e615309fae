//! Camera schema conversion.
//!
//! Stage cameras express focal length and aperture in tenths of scene units.
//! Perspective values are scaled by `10 * focal_length_world_scale`;
//! orthographic apertures by 10.

use super::primvars;
use crate::core::{Diagnostics, TimeCode};
use crate::scene::{Camera, ORTHOGRAPHIC, PERSPECTIVE};
use crate::stage::schema::{resolve, resolve_token};
use crate::stage::{tokens, Prim, ScalarType, Value, ValueTypeName};
use crate::util::{Result, Vec2};

const CONTEXT: &str = "Camera";

fn float(prim: &Prim, name: &str, time: TimeCode) -> f32 {
    resolve(prim, name, time)
        .and_then(|v| v.as_f32())
        .unwrap_or(0.0)
}

/// Read a camera prim.
pub fn read(prim: &Prim, time: TimeCode, diagnostics: &Diagnostics) -> Camera {
    let mut camera = Camera::default();

    let projection = resolve_token(prim, tokens::PROJECTION, time).unwrap_or_default();
    let aperture_scale = match projection.as_str() {
        tokens::ORTHOGRAPHIC => {
            camera.projection = ORTHOGRAPHIC.to_string();
            10.0
        }
        other => {
            if other != tokens::PERSPECTIVE {
                diagnostics.warn(CONTEXT, format!("Unsupported projection \"{}\"", other));
            }
            camera.projection = PERSPECTIVE.to_string();
            10.0 * camera.focal_length_world_scale
        }
    };
    let focal_scale = 10.0 * camera.focal_length_world_scale;

    camera.focal_length = float(prim, tokens::FOCAL_LENGTH, time) / focal_scale;
    camera.aperture = Vec2::new(
        float(prim, tokens::HORIZONTAL_APERTURE, time),
        float(prim, tokens::VERTICAL_APERTURE, time),
    ) / aperture_scale;
    camera.aperture_offset = Vec2::new(
        float(prim, tokens::HORIZONTAL_APERTURE_OFFSET, time),
        float(prim, tokens::VERTICAL_APERTURE_OFFSET, time),
    ) / aperture_scale;

    if let Some(range) = resolve(prim, tokens::CLIPPING_RANGE, time).and_then(|v| v.as_float2()) {
        camera.clipping_planes = Vec2::from_array(range);
    }
    camera.f_stop = float(prim, tokens::F_STOP, time);
    camera.focus_distance = float(prim, tokens::FOCUS_DISTANCE, time);
    camera.shutter = Vec2::new(
        float(prim, tokens::SHUTTER_OPEN, time),
        float(prim, tokens::SHUTTER_CLOSE, time),
    );
    camera
}

/// Author `camera` on a prim already typed as a camera. Unsupported
/// projections author nothing.
pub fn write(prim: &mut Prim, camera: &Camera, time: TimeCode, diagnostics: &Diagnostics) -> Result<()> {
    let (scale, focal_length) = match camera.projection.as_str() {
        ORTHOGRAPHIC => (10.0, None),
        PERSPECTIVE => {
            let scale = 10.0 * camera.focal_length_world_scale;
            (scale, Some(camera.focal_length * scale))
        }
        other => {
            diagnostics.warn(CONTEXT, format!("Unsupported projection \"{}\"", other));
            return Ok(());
        }
    };

    let float = ValueTypeName::scalar(ScalarType::Float);
    let double = ValueTypeName::scalar(ScalarType::Double);
    let set_float = |prim: &mut Prim, name: &str, v: f32| {
        primvars::set_attribute(prim, name, float, Value::Float(v), time)
    };

    primvars::set_attribute(
        prim,
        tokens::PROJECTION,
        ValueTypeName::scalar(ScalarType::Token),
        Value::Token(camera.projection.clone()),
        time,
    )?;
    if let Some(focal_length) = focal_length {
        set_float(prim, tokens::FOCAL_LENGTH, focal_length)?;
    }
    set_float(prim, tokens::HORIZONTAL_APERTURE, camera.aperture.x * scale)?;
    set_float(prim, tokens::VERTICAL_APERTURE, camera.aperture.y * scale)?;
    set_float(prim, tokens::HORIZONTAL_APERTURE_OFFSET, camera.aperture_offset.x * scale)?;
    set_float(prim, tokens::VERTICAL_APERTURE_OFFSET, camera.aperture_offset.y * scale)?;

    primvars::set_attribute(
        prim,
        tokens::CLIPPING_RANGE,
        ValueTypeName::scalar(ScalarType::Float2),
        Value::Float2(camera.clipping_planes.to_array()),
        time,
    )?;
    set_float(prim, tokens::F_STOP, camera.f_stop)?;
    set_float(prim, tokens::FOCUS_DISTANCE, camera.focus_distance)?;
    primvars::set_attribute(prim, tokens::SHUTTER_OPEN, double, Value::Double(camera.shutter.x as f64), time)?;
    primvars::set_attribute(prim, tokens::SHUTTER_CLOSE, double, Value::Double(camera.shutter.y as f64), time)?;
    Ok(())
}
