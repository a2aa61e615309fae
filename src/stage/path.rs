//! Slash-delimited stage paths.
//!
//! Absolute paths start with `/`; the pseudo-root is `/` itself. Relative
//! paths (no leading separator) are used for relationship targets authored
//! relative to the owning prim.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::util::{Error, Result};

/// Separator between path components.
pub const SEPARATOR: char = '/';

/// A validated stage path.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StagePath(String);

impl StagePath {
    /// The pseudo-root path `/`.
    pub fn absolute_root() -> Self {
        Self("/".to_string())
    }

    /// Parse and validate a path string.
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(Error::InvalidPath("empty path".into()));
        }
        if s == "/" {
            return Ok(Self(s));
        }
        let body = s.strip_prefix(SEPARATOR).unwrap_or(&s);
        for component in body.split(SEPARATOR) {
            if !is_valid_identifier(component) {
                return Err(Error::InvalidPath(format!(
                    "'{}' has invalid component '{}'",
                    s, component
                )));
            }
        }
        Ok(Self(s))
    }

    /// Build an absolute path from components. Components are not re-validated
    /// beyond the identifier check.
    pub fn from_components<I, S>(components: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = Self::absolute_root();
        for c in components {
            path = path.append_child(c.as_ref())?;
        }
        Ok(path)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_absolute(&self) -> bool {
        self.0.starts_with(SEPARATOR)
    }

    /// True for the pseudo-root `/`.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Path components, without separators.
    pub fn components(&self) -> SmallVec<[&str; 8]> {
        self.0.split(SEPARATOR).filter(|c| !c.is_empty()).collect()
    }

    /// Number of components (0 for the root).
    pub fn depth(&self) -> usize {
        self.components().len()
    }

    /// Last component; empty for the root.
    pub fn name(&self) -> &str {
        if self.is_root() {
            return "";
        }
        self.0.rsplit(SEPARATOR).next().unwrap_or("")
    }

    /// Parent path. The root and single-component relative paths have no parent.
    pub fn parent(&self) -> Option<StagePath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind(SEPARATOR) {
            Some(0) => Some(Self::absolute_root()),
            Some(i) => Some(Self(self.0[..i].to_string())),
            None => None,
        }
    }

    /// Append one component.
    pub fn append_child(&self, name: &str) -> Result<StagePath> {
        if !is_valid_identifier(name) {
            return Err(Error::InvalidPath(format!(
                "'{}' is not a valid prim name",
                name
            )));
        }
        if self.is_root() {
            Ok(Self(format!("/{}", name)))
        } else {
            Ok(Self(format!("{}/{}", self.0, name)))
        }
    }

    /// Append a relative path.
    pub fn append_path(&self, relative: &StagePath) -> Result<StagePath> {
        if relative.is_absolute() {
            return Err(Error::InvalidPath(format!(
                "cannot append absolute path '{}'",
                relative
            )));
        }
        let mut path = self.clone();
        for c in relative.components() {
            path = path.append_child(c)?;
        }
        Ok(path)
    }

    /// Resolve against `anchor` if relative; absolute paths are returned as is.
    pub fn make_absolute(&self, anchor: &StagePath) -> Result<StagePath> {
        if self.is_absolute() {
            Ok(self.clone())
        } else {
            anchor.append_path(self)
        }
    }

    /// Component-wise prefix test. A path is a prefix of itself, and the root
    /// is a prefix of every absolute path.
    pub fn has_prefix(&self, prefix: &StagePath) -> bool {
        if self.is_absolute() != prefix.is_absolute() {
            return false;
        }
        let mine = self.components();
        let theirs = prefix.components();
        theirs.len() <= mine.len() && mine.iter().zip(theirs.iter()).all(|(a, b)| a == b)
    }

    /// True when `self` lies strictly below `ancestor`.
    pub fn is_strict_descendant_of(&self, ancestor: &StagePath) -> bool {
        self != ancestor && self.has_prefix(ancestor)
    }

    /// Swap `old_prefix` for `new_prefix`. Returns None if `old_prefix` is not
    /// a prefix of this path.
    pub fn replace_prefix(&self, old_prefix: &StagePath, new_prefix: &StagePath) -> Option<StagePath> {
        if !self.has_prefix(old_prefix) {
            return None;
        }
        let rest = &self.components()[old_prefix.depth()..];
        let mut out = new_prefix.clone();
        for c in rest {
            out = out.append_child(c).ok()?;
        }
        Some(out)
    }
}

impl fmt::Display for StagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for StagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StagePath({})", self.0)
    }
}

impl FromStr for StagePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for StagePath {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl From<StagePath> for String {
    fn from(p: StagePath) -> Self {
        p.0
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Replace every character that cannot appear in an identifier with `_`.
/// A leading digit is replaced too; an empty string becomes `_`.
pub fn make_valid_identifier(s: &str) -> String {
    if s.is_empty() {
        return "_".to_string();
    }
    s.chars()
        .enumerate()
        .map(|(i, c)| {
            let ok = if i == 0 {
                c.is_ascii_alphabetic() || c == '_'
            } else {
                c.is_ascii_alphanumeric() || c == '_'
            };
            if ok {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> StagePath {
        StagePath::new(s).unwrap()
    }

    #[test]
    fn test_parse() {
        assert!(p("/").is_root());
        assert!(p("/a/b").is_absolute());
        assert!(!p("a/b").is_absolute());
        assert!(StagePath::new("").is_err());
        assert!(StagePath::new("/a//b").is_err());
        assert!(StagePath::new("/0a").is_err());
        assert!(StagePath::new("/a-b").is_err());
    }

    #[test]
    fn test_name_and_parent() {
        assert_eq!(p("/a/b").name(), "b");
        assert_eq!(p("/").name(), "");
        assert_eq!(p("/a/b").parent(), Some(p("/a")));
        assert_eq!(p("/a").parent(), Some(p("/")));
        assert_eq!(p("/").parent(), None);
        assert_eq!(p("a/b").parent(), Some(p("a")));
    }

    #[test]
    fn test_append() {
        assert_eq!(p("/").append_child("a").unwrap(), p("/a"));
        assert_eq!(p("/a").append_child("b").unwrap(), p("/a/b"));
        assert!(p("/a").append_child("1").is_err());
        assert_eq!(p("/a").append_path(&p("b/c")).unwrap(), p("/a/b/c"));
        assert_eq!(p("b").make_absolute(&p("/a")).unwrap(), p("/a/b"));
        assert_eq!(p("/x").make_absolute(&p("/a")).unwrap(), p("/x"));
    }

    #[test]
    fn test_prefix() {
        assert!(p("/a/b").has_prefix(&p("/a")));
        assert!(p("/a/b").has_prefix(&p("/")));
        assert!(p("/a").has_prefix(&p("/a")));
        // Component-wise, not string-wise.
        assert!(!p("/ab").has_prefix(&p("/a")));
        assert!(p("/a/b").is_strict_descendant_of(&p("/a")));
        assert!(!p("/a").is_strict_descendant_of(&p("/a")));
    }

    #[test]
    fn test_replace_prefix() {
        assert_eq!(p("/a/b/c").replace_prefix(&p("/a"), &p("/")), Some(p("/b/c")));
        assert_eq!(p("/a").replace_prefix(&p("/a"), &p("/")), Some(p("/")));
        assert_eq!(p("/x/y").replace_prefix(&p("/a"), &p("/")), None);
    }

    #[test]
    fn test_identifiers() {
        assert!(is_valid_identifier("_0"));
        assert!(is_valid_identifier("geo_1"));
        assert!(!is_valid_identifier("1geo"));
        assert!(!is_valid_identifier(""));
        assert_eq!(make_valid_identifier("a-b c"), "a_b_c");
        assert_eq!(make_valid_identifier("9"), "_");
    }
}
