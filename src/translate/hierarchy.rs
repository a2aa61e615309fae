//! Child enumeration and lookup.
//!
//! Only xformable prims are listed as children, and only `Xform` or
//! convertible prims resolve as child locations. Scopes, materials and other
//! typeless prims stay invisible to the scene even though they exist.

use super::path::{decode_name, valid_name};
use crate::geom;
use crate::stage::{Prim, SchemaType, Stage, StagePath};
use crate::util::Result;

/// True if `prim` can be visited as a scene location.
pub fn is_location(prim: &Prim) -> bool {
    prim.schema_type() == SchemaType::Xform || geom::is_convertible(prim)
}

/// Xformable children of `path`, in authored order.
pub fn child_paths(stage: &Stage, path: &StagePath) -> Vec<StagePath> {
    stage
        .children(path)
        .into_iter()
        .filter(|child| {
            stage
                .prim(child)
                .is_some_and(|p| p.schema_type().is_xformable())
        })
        .collect()
}

/// Scene names of the xformable children of `path`.
pub fn child_names(stage: &Stage, path: &StagePath) -> Vec<String> {
    child_paths(stage, path)
        .iter()
        .map(|p| decode_name(p.name()))
        .collect()
}

fn child_path(path: &StagePath, name: &str) -> Option<StagePath> {
    path.append_child(&valid_name(name)).ok()
}

/// True if any prim named `name` exists below `path`, whatever its type.
pub fn has_child(stage: &Stage, path: &StagePath, name: &str) -> bool {
    child_path(path, name).is_some_and(|p| stage.has_prim(&p))
}

/// Path of child `name` if it resolves as a location.
pub fn resolve_child(stage: &Stage, path: &StagePath, name: &str) -> Option<StagePath> {
    let child = child_path(path, name)?;
    stage.prim(&child).filter(|p| is_location(p))?;
    Some(child)
}

/// Define child `name` of `path` as an `Xform`.
pub fn create_child(stage: &mut Stage, path: &StagePath, name: &str) -> Result<StagePath> {
    let child = path.append_child(&valid_name(name))?;
    stage.define_prim(&child, SchemaType::Xform.type_name())?;
    Ok(child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::LayerEncoding;

    fn p(s: &str) -> StagePath {
        StagePath::new(s).unwrap()
    }

    fn stage() -> Stage {
        let mut stage = Stage::create_new("unused.stage", LayerEncoding::Binary);
        stage.define_prim(&p("/root/xf"), "Xform").unwrap();
        stage.define_prim(&p("/root/mesh"), "Mesh").unwrap();
        stage.define_prim(&p("/root/looks"), "Scope").unwrap();
        stage.define_prim(&p("/root/_0"), "Xform").unwrap();
        stage
    }

    #[test]
    fn test_child_names_are_xformable_only() {
        let stage = stage();
        assert_eq!(child_names(&stage, &p("/root")), vec!["xf", "mesh", "0"]);
        // `root` was created as a typeless ancestor.
        assert!(child_names(&stage, &StagePath::absolute_root()).is_empty());
    }

    #[test]
    fn test_has_child_ignores_type() {
        let stage = stage();
        assert!(has_child(&stage, &p("/root"), "looks"));
        assert!(has_child(&stage, &p("/root"), "0"));
        assert!(!has_child(&stage, &p("/root"), "nope"));
    }

    #[test]
    fn test_resolve_child() {
        let stage = stage();
        assert_eq!(resolve_child(&stage, &p("/root"), "mesh"), Some(p("/root/mesh")));
        assert_eq!(resolve_child(&stage, &p("/root"), "0"), Some(p("/root/_0")));
        assert_eq!(resolve_child(&stage, &p("/root"), "looks"), None);
        assert_eq!(resolve_child(&stage, &StagePath::absolute_root(), "root"), None);
    }

    #[test]
    fn test_create_child() {
        let mut stage = stage();
        let child = create_child(&mut stage, &p("/root"), "7").unwrap();
        assert_eq!(child, p("/root/_7"));
        assert_eq!(stage.prim(&child).unwrap().type_name(), "Xform");
    }
}
