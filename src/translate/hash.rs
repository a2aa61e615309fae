//! Structural change-detection digests.
//!
//! A digest identifies "what would be read" for one aspect of one location
//! without reading it: the location's path and file stand in for the data,
//! and the time is mixed in only when the data might vary over time. An
//! aspect the location does not have appends nothing.

use murmur3::MurmurHash;

use super::attributes;
use crate::geom::{self, xform};
use crate::scene::HashType;
use crate::stage::{tokens, Prim, Stage, StagePath};
use crate::util::Chrono;

/// Whether `hash_type` applies to `prim`, and if so whether time matters.
fn aspect(prim: &Prim, hash_type: HashType) -> Option<bool> {
    let schema = prim.schema_type();
    match hash_type {
        HashType::Transform => schema
            .is_xformable()
            .then(|| xform::might_be_time_varying(prim)),
        HashType::Attributes => Some(attributes::might_be_time_varying(prim)),
        HashType::Bound => schema.is_boundable().then(|| {
            prim.attribute(tokens::EXTENT)
                .is_some_and(|a| a.value_might_be_time_varying())
        }),
        HashType::Object => geom::is_convertible(prim).then(|| geom::is_time_varying(prim)),
        HashType::ChildNames => Some(false),
        HashType::Hierarchy => Some(true),
    }
}

/// Append the digest of `hash_type` at `path` to `h`.
pub fn hash(
    stage: &Stage,
    file_name: &str,
    path: &StagePath,
    hash_type: HashType,
    time: Chrono,
    h: &mut MurmurHash,
) {
    let Some(prim) = stage.prim(path) else {
        return;
    };
    let Some(time_varying) = aspect(prim, hash_type) else {
        return;
    };
    h.append(&hash_type.tag());
    h.append(path.as_str());
    h.append(file_name);
    if time_varying {
        h.append(&time);
    }
}
