//! Scene path ⇄ stage path codec.
//!
//! Scene names may start with a digit (instance names are often purely
//! numeric); stage identifiers may not. Such names are stored with one extra
//! leading `_`. Names that already look like an escaped numeric name
//! (underscores followed by a digit) get one more `_` too, so decoding is
//! exact. Any other invalid character becomes `_`, which is lossy.

use crate::scene::Path;
use crate::stage::{make_valid_identifier, StagePath};
use crate::util::Result;

/// True for `_*[0-9]...`.
fn needs_escape(name: &str) -> bool {
    name.trim_start_matches('_')
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
}

/// Stage identifier for scene name `name`.
pub fn valid_name(name: &str) -> String {
    if needs_escape(name) {
        make_valid_identifier(&format!("_{}", name))
    } else {
        make_valid_identifier(name)
    }
}

/// Scene name for stage identifier `name`; inverse of [`valid_name`] for
/// valid and numeric names.
pub fn decode_name(name: &str) -> String {
    match name.strip_prefix('_') {
        Some(rest) if needs_escape(rest) => rest.to_string(),
        _ => name.to_string(),
    }
}

/// Encode a scene path. `relative` drops the leading separator; an empty
/// relative path is an error.
pub fn path_to_stage(path: &[String], relative: bool) -> Result<StagePath> {
    if !relative {
        return StagePath::from_components(path.iter().map(|n| valid_name(n)));
    }
    let joined = path
        .iter()
        .map(|n| valid_name(n))
        .collect::<Vec<_>>()
        .join("/");
    StagePath::new(joined)
}

/// Decode a stage path into scene names. Relative and absolute paths decode
/// the same way.
pub fn stage_to_path(path: &StagePath) -> Path {
    path.components().iter().map(|c| decode_name(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::path_from_str;

    #[test]
    fn test_numeric_names() {
        assert_eq!(valid_name("0"), "_0");
        assert_eq!(valid_name("12a"), "_12a");
        assert_eq!(valid_name("_0"), "__0");
        assert_eq!(valid_name("_a"), "_a");
        assert_eq!(valid_name("a b"), "a_b");

        for name in ["0", "12a", "_0", "__7", "_a", "abc", "a_1"] {
            assert_eq!(decode_name(&valid_name(name)), name, "{}", name);
        }
    }

    #[test]
    fn test_distinct_numeric_names_stay_distinct() {
        let names: std::collections::BTreeSet<String> =
            ["0", "1", "_0", "_1"].iter().map(|n| valid_name(n)).collect();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn test_round_trip() {
        for s in ["/", "/a", "/a/b/c", "/instances/0/1", "/_0/x_1"] {
            let path = path_from_str(s);
            let stage = path_to_stage(&path, false).unwrap();
            assert!(stage.is_absolute());
            assert_eq!(stage_to_path(&stage), path);
        }
    }

    #[test]
    fn test_relative() {
        let path = path_from_str("/a/0");
        let stage = path_to_stage(&path, true).unwrap();
        assert_eq!(stage.as_str(), "a/_0");
        assert!(!stage.is_absolute());
        assert_eq!(stage_to_path(&stage), path);
        assert!(path_to_stage(&[], true).is_err());
        assert!(path_to_stage(&[], false).unwrap().is_root());
    }
}
