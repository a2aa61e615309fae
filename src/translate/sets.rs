//! Sets and tags over stage collections.
//!
//! A set is a collection applied to the prim of the location that owns it;
//! members are read back relative to that location. Tags are the collections
//! applied to the stage's default prim, matched against a location's path.

use murmur3::MurmurHash;

use super::hierarchy;
use super::path::{decode_name, path_to_stage, stage_to_path};
use crate::core::Diagnostics;
use crate::scene::{path_to_string, Path, PathSet, TagFilter};
use crate::stage::{
    add_include_target, apply_collection, collections_on, compute_included_paths, ExpansionRule,
    MembershipQuery, Stage, StagePath,
};
use crate::util::Result;

/// Prim created as the tag anchor when the stage has no default prim.
pub const TAGS_PRIM: &str = "/sets";

const CONTEXT: &str = "Sets";

/// Collection names on `path`, plus those below it when requested. Sorted and
/// unique.
pub fn set_names(stage: &Stage, path: &StagePath, include_descendant_sets: bool) -> Vec<String> {
    let mut names = Vec::new();
    collect_set_names(stage, path, include_descendant_sets, &mut names);
    names.sort();
    names.dedup();
    names
}

fn collect_set_names(stage: &Stage, path: &StagePath, recurse: bool, out: &mut Vec<String>) {
    if let Some(prim) = stage.prim(path) {
        out.extend(collections_on(prim));
    }
    if recurse {
        for child in hierarchy::child_paths(stage, path) {
            collect_set_names(stage, &child, recurse, out);
        }
    }
}

/// Members of set `name` on `path`, relative to `path`.
fn local_set(stage: &Stage, path: &StagePath, name: &str) -> PathSet {
    let Some(query) = stage
        .prim(path)
        .and_then(|prim| MembershipQuery::compute(prim, name))
    else {
        return PathSet::new();
    };
    compute_included_paths(&query, stage)
        .iter()
        .filter_map(|member| member.replace_prefix(path, &StagePath::absolute_root()))
        .map(|relative| stage_to_path(&relative))
        .collect()
}

/// Members of set `name` relative to `path`. With `include_descendant_sets`,
/// same-named sets on descendant locations are merged in under their
/// location's relative path.
pub fn read_set(
    stage: &Stage,
    path: &StagePath,
    name: &str,
    include_descendant_sets: bool,
) -> PathSet {
    let mut out = PathSet::new();
    recurse_read_set(stage, path, &Path::new(), name, include_descendant_sets, &mut out);
    out
}

fn recurse_read_set(
    stage: &Stage,
    path: &StagePath,
    prefix: &Path,
    name: &str,
    recurse: bool,
    out: &mut PathSet,
) {
    out.add_paths(&local_set(stage, path, name), prefix);
    if !recurse {
        return;
    }
    for child in hierarchy::child_paths(stage, path) {
        let mut child_prefix = prefix.clone();
        child_prefix.push(decode_name(child.name()));
        recurse_read_set(stage, &child, &child_prefix, name, recurse, out);
    }
}

/// Author set `name` on `path` as an explicit collection of `set`'s members.
/// The empty path cannot be a target and is reported instead.
pub fn write_set(
    stage: &mut Stage,
    path: &StagePath,
    name: &str,
    set: &PathSet,
    diagnostics: &Diagnostics,
) -> Result<()> {
    apply_collection(stage, path, name, ExpansionRule::ExplicitOnly)?;
    for member in set {
        if member.is_empty() {
            diagnostics.warn(
                CONTEXT,
                format!(
                    "Unable to add path '{}' to set '{}' at location '{}'",
                    path_to_string(member),
                    name,
                    path
                ),
            );
            continue;
        }
        let target = path_to_stage(member, true)?;
        add_include_target(stage, path, name, &target)?;
    }
    Ok(())
}

/// Fold set identity into `h`: file, location and set name.
pub fn hash_set(file_name: &str, path: &Path, name: &str, h: &mut MurmurHash) {
    h.append(file_name);
    h.append(path.as_slice());
    h.append(name);
}

fn matches(member: &StagePath, location: &StagePath, filter: TagFilter) -> bool {
    (filter.contains(TagFilter::LOCAL) && member == location)
        || (filter.contains(TagFilter::DESCENDANT) && member.is_strict_descendant_of(location))
        || (filter.contains(TagFilter::ANCESTOR) && location.is_strict_descendant_of(member))
}

fn tag_matches(stage: &Stage, anchor: &StagePath, tag: &str, location: &StagePath, filter: TagFilter) -> bool {
    let Some(query) = stage
        .prim(anchor)
        .and_then(|prim| MembershipQuery::compute(prim, tag))
    else {
        return false;
    };
    compute_included_paths(&query, stage)
        .iter()
        .any(|member| matches(member, location, filter))
}

/// True if tag `name` relates to `location` as `filter` allows.
pub fn has_tag(stage: &Stage, location: &StagePath, name: &str, filter: TagFilter) -> bool {
    stage
        .default_prim()
        .is_some_and(|anchor| tag_matches(stage, &anchor, name, location, filter))
}

/// Tags related to `location` as `filter` allows. Sorted and unique.
pub fn read_tags(stage: &Stage, location: &StagePath, filter: TagFilter) -> Vec<String> {
    let Some(anchor) = stage.default_prim() else {
        return Vec::new();
    };
    let Some(prim) = stage.prim(&anchor) else {
        return Vec::new();
    };
    let mut tags: Vec<String> = collections_on(prim)
        .into_iter()
        .filter(|tag| tag_matches(stage, &anchor, tag, location, filter))
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

/// Add `location` to each tag, creating the tag anchor on first use.
pub fn write_tags(stage: &mut Stage, location: &StagePath, tags: &[String]) -> Result<()> {
    let anchor = match stage.default_prim() {
        Some(anchor) => anchor,
        None => {
            let anchor = StagePath::new(TAGS_PRIM)?;
            stage.define_prim(&anchor, "")?;
            stage.set_default_prim(&anchor)?;
            anchor
        }
    };
    for tag in tags {
        apply_collection(stage, &anchor, tag, ExpansionRule::ExplicitOnly)?;
        add_include_target(stage, &anchor, tag, location)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::path_from_str;
    use crate::stage::LayerEncoding;

    fn p(s: &str) -> StagePath {
        StagePath::new(s).unwrap()
    }

    /// Every listed path is an Xform; unlisted ancestors stay typeless.
    fn stage(paths: &[&str]) -> Stage {
        let mut stage = Stage::create_new("unused.stage", LayerEncoding::Binary);
        for path in paths {
            stage.define_prim(&p(path), "Xform").unwrap();
        }
        stage
    }

    fn set_of(paths: &[&str]) -> PathSet {
        paths.iter().map(|s| path_from_str(s)).collect()
    }

    #[test]
    fn test_write_and_read_local_set() {
        let mut stage = stage(&["/A", "/A/B", "/A/B/C", "/A/D"]);
        let diagnostics = Diagnostics::new();
        write_set(&mut stage, &p("/A"), "s", &set_of(&["/B/C", "/D"]), &diagnostics).unwrap();
        assert!(diagnostics.is_empty());

        assert_eq!(read_set(&stage, &p("/A"), "s", false), set_of(&["/B/C", "/D"]));
        assert_eq!(read_set(&stage, &p("/"), "s", false), PathSet::new());
        assert_eq!(read_set(&stage, &p("/"), "s", true), set_of(&["/A/B/C", "/A/D"]));
    }

    #[test]
    fn test_empty_member_is_reported() {
        let mut stage = stage(&["/A", "/A/B"]);
        let diagnostics = Diagnostics::new();
        write_set(&mut stage, &p("/A"), "s", &set_of(&["/", "/B"]), &diagnostics).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(read_set(&stage, &p("/A"), "s", false), set_of(&["/B"]));
    }

    #[test]
    fn test_set_names_dedup() {
        let mut stage = stage(&["/A", "/A/B", "/A/C"]);
        let d = Diagnostics::new();
        write_set(&mut stage, &p("/A"), "geo", &PathSet::new(), &d).unwrap();
        write_set(&mut stage, &p("/A/B"), "geo", &PathSet::new(), &d).unwrap();
        write_set(&mut stage, &p("/A/C"), "lights", &PathSet::new(), &d).unwrap();
        assert_eq!(set_names(&stage, &p("/A"), false), vec!["geo"]);
        assert_eq!(set_names(&stage, &p("/A"), true), vec!["geo", "lights"]);
    }

    #[test]
    fn test_tag_filters() {
        let mut stage = stage(&["/A", "/A/B", "/A/B/C"]);
        write_tags(&mut stage, &p("/A"), &["group".to_string()]).unwrap();
        assert_eq!(stage.default_prim(), Some(p(TAGS_PRIM)));

        let c = p("/A/B/C");
        assert!(!has_tag(&stage, &c, "group", TagFilter::LOCAL));
        assert!(!has_tag(&stage, &c, "group", TagFilter::DESCENDANT));
        assert!(has_tag(&stage, &c, "group", TagFilter::ANCESTOR));
        assert!(has_tag(&stage, &p("/A"), "group", TagFilter::LOCAL));
        assert!(!has_tag(&stage, &p("/A"), "group", TagFilter::ANCESTOR));
        assert!(has_tag(&stage, &p("/"), "group", TagFilter::DESCENDANT));
        assert!(!has_tag(&stage, &c, "other", TagFilter::EVERY));

        assert_eq!(read_tags(&stage, &c, TagFilter::EVERY), vec!["group"]);
        assert!(read_tags(&stage, &c, TagFilter::LOCAL).is_empty());
    }

    #[test]
    fn test_tag_prefix_is_component_wise() {
        let mut stage = stage(&["/A", "/AB"]);
        write_tags(&mut stage, &p("/A"), &["t".to_string()]).unwrap();
        assert!(!has_tag(&stage, &p("/AB"), "t", TagFilter::EVERY));
    }

    #[test]
    fn test_no_default_prim_means_no_tags() {
        let stage = stage(&["/A"]);
        assert!(!has_tag(&stage, &p("/A"), "t", TagFilter::EVERY));
        assert!(read_tags(&stage, &p("/A"), TagFilter::EVERY).is_empty());
    }

    #[test]
    fn test_hash_set_depends_on_inputs() {
        let hash = |file: &str, path: &str, name: &str| {
            let mut h = MurmurHash::new();
            hash_set(file, &path_from_str(path), name, &mut h);
            h
        };
        let base = hash("a.stage", "/x", "s");
        assert_eq!(base, hash("a.stage", "/x", "s"));
        assert_ne!(base, hash("b.stage", "/x", "s"));
        assert_ne!(base, hash("a.stage", "/y", "s"));
        assert_ne!(base, hash("a.stage", "/x", "t"));
    }
}
