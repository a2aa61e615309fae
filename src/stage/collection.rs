//! Named collections applied to prims.
//!
//! A collection `name` on a prim is a multiple-apply API schema
//! (`CollectionAPI:<name>`) with an expansion rule attribute and include /
//! exclude relationships:
//!
//! ```text
//! collection:<name>:expansionRule   token   explicitOnly | expandPrims
//! collection:<name>:includes        rel
//! collection:<name>:excludes        rel
//! ```
//!
//! Relative targets are resolved against the owning prim when authored, so
//! stored targets are always absolute.

use std::collections::BTreeSet;

use super::path::StagePath;
use super::prim::Prim;
use super::store::Stage;
use super::value::{ScalarType, Value, ValueTypeName};
use crate::core::TimeCode;
use crate::util::{Error, Result};

/// API schema prefix for applied collections.
pub const COLLECTION_API_PREFIX: &str = "CollectionAPI:";

/// How include targets expand into members.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExpansionRule {
    /// Only the targeted paths are members.
    ExplicitOnly,
    /// Targeted prims and all prims below them are members.
    #[default]
    ExpandPrims,
}

impl ExpansionRule {
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::ExplicitOnly => "explicitOnly",
            Self::ExpandPrims => "expandPrims",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "explicitOnly" => Some(Self::ExplicitOnly),
            "expandPrims" => Some(Self::ExpandPrims),
            _ => None,
        }
    }
}

pub fn expansion_rule_attr(name: &str) -> String {
    format!("collection:{}:expansionRule", name)
}

pub fn includes_rel(name: &str) -> String {
    format!("collection:{}:includes", name)
}

pub fn excludes_rel(name: &str) -> String {
    format!("collection:{}:excludes", name)
}

/// Apply collection `name` to the prim at `prim_path` with the given rule.
/// Re-applying an existing collection only updates the rule.
pub fn apply_collection(
    stage: &mut Stage,
    prim_path: &StagePath,
    name: &str,
    rule: ExpansionRule,
) -> Result<()> {
    if name.is_empty() || name.contains(':') {
        return Err(Error::invalid_argument(format!(
            "'{}' is not a valid collection name",
            name
        )));
    }
    let prim = stage
        .prim_mut(prim_path)
        .ok_or_else(|| Error::PrimNotFound(prim_path.to_string()))?;
    prim.apply_api_schema(&format!("{}{}", COLLECTION_API_PREFIX, name));
    prim.create_attribute(
        &expansion_rule_attr(name),
        ValueTypeName::scalar(ScalarType::Token),
        false,
    )
    .set(Value::Token(rule.as_token().to_string()), TimeCode::Default)
}

/// Names of the collections applied to `prim`, in application order.
pub fn collections_on(prim: &Prim) -> Vec<String> {
    prim.api_schemas()
        .iter()
        .filter_map(|s| s.strip_prefix(COLLECTION_API_PREFIX))
        .map(str::to_string)
        .collect()
}

pub fn has_collection(prim: &Prim, name: &str) -> bool {
    prim.has_api_schema(&format!("{}{}", COLLECTION_API_PREFIX, name))
}

/// Add an include target; a relative target is made absolute against the
/// owning prim.
pub fn add_include_target(
    stage: &mut Stage,
    prim_path: &StagePath,
    name: &str,
    target: &StagePath,
) -> Result<()> {
    add_target(stage, prim_path, &includes_rel(name), target)
}

/// Add an exclude target; resolved like include targets.
pub fn add_exclude_target(
    stage: &mut Stage,
    prim_path: &StagePath,
    name: &str,
    target: &StagePath,
) -> Result<()> {
    add_target(stage, prim_path, &excludes_rel(name), target)
}

fn add_target(
    stage: &mut Stage,
    prim_path: &StagePath,
    rel: &str,
    target: &StagePath,
) -> Result<()> {
    let absolute = target.make_absolute(prim_path)?;
    let prim = stage
        .prim_mut(prim_path)
        .ok_or_else(|| Error::PrimNotFound(prim_path.to_string()))?;
    prim.add_relationship_target(rel, absolute);
    Ok(())
}

/// A snapshot of a collection's membership rules.
#[derive(Clone, Debug, PartialEq)]
pub struct MembershipQuery {
    pub rule: ExpansionRule,
    pub includes: Vec<StagePath>,
    pub excludes: Vec<StagePath>,
}

impl MembershipQuery {
    /// Capture collection `name` on `prim`. None if it is not applied.
    pub fn compute(prim: &Prim, name: &str) -> Option<Self> {
        if !has_collection(prim, name) {
            return None;
        }
        let rule = prim
            .attribute(&expansion_rule_attr(name))
            .and_then(|a| a.get(TimeCode::Default))
            .and_then(Value::as_token)
            .and_then(ExpansionRule::from_token)
            .unwrap_or_default();
        let targets = |rel: String| prim.relationship(&rel).map(<[_]>::to_vec).unwrap_or_default();
        Some(Self {
            rule,
            includes: targets(includes_rel(name)),
            excludes: targets(excludes_rel(name)),
        })
    }

    /// Membership test against the rules alone (no stage lookup).
    pub fn is_path_included(&self, path: &StagePath) -> bool {
        let matches = |target: &StagePath| match self.rule {
            ExpansionRule::ExplicitOnly => target == path,
            ExpansionRule::ExpandPrims => path.has_prefix(target),
        };
        self.includes.iter().any(matches) && !self.excludes.iter().any(matches)
    }
}

/// Paths of existing prims that are members under `query`.
pub fn compute_included_paths(query: &MembershipQuery, stage: &Stage) -> BTreeSet<StagePath> {
    let mut out = BTreeSet::new();
    for include in &query.includes {
        if !stage.has_prim(include) {
            continue;
        }
        out.insert(include.clone());
        if query.rule == ExpansionRule::ExpandPrims {
            out.extend(stage.descendants(include));
        }
    }
    out.retain(|p| query.is_path_included(p));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::LayerEncoding;

    fn p(s: &str) -> StagePath {
        StagePath::new(s).unwrap()
    }

    fn stage_with(paths: &[&str]) -> Stage {
        let mut stage = Stage::create_new("unused.stage", LayerEncoding::Binary);
        for path in paths {
            stage.define_prim(&p(path), "Xform").unwrap();
        }
        stage
    }

    #[test]
    fn test_apply_and_list() {
        let mut stage = stage_with(&["/A"]);
        apply_collection(&mut stage, &p("/A"), "lights", ExpansionRule::ExplicitOnly).unwrap();
        apply_collection(&mut stage, &p("/A"), "geo", ExpansionRule::ExpandPrims).unwrap();
        let prim = stage.prim(&p("/A")).unwrap();
        assert_eq!(collections_on(prim), vec!["lights", "geo"]);
        assert!(apply_collection(&mut stage, &p("/missing"), "x", ExpansionRule::ExplicitOnly).is_err());
    }

    #[test]
    fn test_relative_targets_are_resolved() {
        let mut stage = stage_with(&["/A/B"]);
        apply_collection(&mut stage, &p("/A"), "s", ExpansionRule::ExplicitOnly).unwrap();
        add_include_target(&mut stage, &p("/A"), "s", &p("B")).unwrap();
        let query = MembershipQuery::compute(stage.prim(&p("/A")).unwrap(), "s").unwrap();
        assert_eq!(query.includes, vec![p("/A/B")]);
        assert_eq!(query.rule, ExpansionRule::ExplicitOnly);
    }

    #[test]
    fn test_explicit_only() {
        let mut stage = stage_with(&["/A/B/C", "/D"]);
        apply_collection(&mut stage, &p("/"), "s", ExpansionRule::ExplicitOnly).unwrap();
        add_include_target(&mut stage, &p("/"), "s", &p("/A/B")).unwrap();
        add_include_target(&mut stage, &p("/"), "s", &p("/missing")).unwrap();

        let query = MembershipQuery::compute(stage.prim(&p("/")).unwrap(), "s").unwrap();
        let members: Vec<_> = compute_included_paths(&query, &stage).into_iter().collect();
        assert_eq!(members, vec![p("/A/B")]);
    }

    #[test]
    fn test_expand_prims_with_excludes() {
        let mut stage = stage_with(&["/A/B/C", "/A/E"]);
        apply_collection(&mut stage, &p("/"), "s", ExpansionRule::ExpandPrims).unwrap();
        add_include_target(&mut stage, &p("/"), "s", &p("/A")).unwrap();
        add_exclude_target(&mut stage, &p("/"), "s", &p("/A/B")).unwrap();

        let query = MembershipQuery::compute(stage.prim(&p("/")).unwrap(), "s").unwrap();
        let members: Vec<_> = compute_included_paths(&query, &stage).into_iter().collect();
        assert_eq!(members, vec![p("/A"), p("/A/E")]);
        assert!(!query.is_path_included(&p("/A/B/C")));
    }

    #[test]
    fn test_missing_collection() {
        let stage = stage_with(&["/A"]);
        assert!(MembershipQuery::compute(stage.prim(&p("/A")).unwrap(), "nope").is_none());
    }
}
