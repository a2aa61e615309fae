//! Sets and tags written through locations and read back from the file.

use scene_stage::prelude::*;
use tempfile::TempDir;

fn build(dir: &TempDir, name: &str, paths: &[&str]) -> (std::path::PathBuf, Location) {
    let path = dir.path().join(name);
    let root = Location::create(&path, &WriteOptions::default()).unwrap();
    for p in paths {
        root.scene(&path_from_str(p), MissingBehaviour::CreateIfMissing)
            .unwrap()
            .unwrap();
    }
    (path, root)
}

fn at(root: &Location, path: &str) -> Location {
    root.scene(&path_from_str(path), MissingBehaviour::ThrowIfMissing)
        .unwrap()
        .unwrap()
}

fn set_of(paths: &[&str]) -> PathSet {
    paths.iter().map(|p| path_from_str(p)).collect()
}

#[test]
fn test_tag_filters_on_nested_location() {
    let dir = TempDir::new().unwrap();
    let (path, root) = build(&dir, "tags.stagea", &["/A/B/C"]);
    at(&root, "/A").write_tags(&["group".to_string()]).unwrap();
    drop(root);

    let root = Location::open(&path, OpenMode::Read).unwrap();
    let c = at(&root, "/A/B/C");
    assert!(!c.has_tag("group", TagFilter::LOCAL));
    assert!(!c.has_tag("group", TagFilter::DESCENDANT));
    assert!(c.has_tag("group", TagFilter::ANCESTOR));
    assert!(c.has_tag("group", TagFilter::EVERY));
    assert_eq!(c.read_tags(TagFilter::ANCESTOR), vec!["group"]);
    assert!(c.read_tags(TagFilter::LOCAL | TagFilter::DESCENDANT).is_empty());

    let a = at(&root, "/A");
    assert!(a.has_tag("group", TagFilter::LOCAL));
    assert!(!a.has_tag("group", TagFilter::ANCESTOR));
    assert!(root.has_tag("group", TagFilter::DESCENDANT));
    assert!(!root.has_tag("group", TagFilter::LOCAL));
}

#[test]
fn test_tags_do_not_appear_as_children() {
    let dir = TempDir::new().unwrap();
    let (_, root) = build(&dir, "tags.stage", &["/A"]);
    at(&root, "/A").write_tags(&["t1".to_string(), "t2".to_string()]).unwrap();
    assert_eq!(root.child_names(), vec!["A"]);
    assert_eq!(at(&root, "/A").read_tags(TagFilter::LOCAL), vec!["t1", "t2"]);
}

#[test]
fn test_sets_relative_to_owner() {
    let dir = TempDir::new().unwrap();
    let (path, root) = build(&dir, "sets.stagea", &["/A/B/C", "/A/D", "/E"]);
    at(&root, "/A")
        .write_set("geo", &set_of(&["/B/C", "/D"]))
        .unwrap();
    root.write_set("geo", &set_of(&["/E"])).unwrap();
    drop(root);

    let root = Location::open(&path, OpenMode::Read).unwrap();
    let a = at(&root, "/A");
    assert_eq!(a.set_names(false), vec!["geo"]);
    assert_eq!(a.read_set("geo", false), set_of(&["/B/C", "/D"]));
    assert_eq!(root.read_set("geo", false), set_of(&["/E"]));
    assert_eq!(
        root.read_set("geo", true),
        set_of(&["/A/B/C", "/A/D", "/E"])
    );
    assert_eq!(root.read_set("missing", true), PathSet::new());
}

#[test]
fn test_set_names_are_unique() {
    let dir = TempDir::new().unwrap();
    let (_, root) = build(&dir, "names.stage", &["/A/B", "/A/C"]);
    root.write_set("geo", &PathSet::new()).unwrap();
    at(&root, "/A/B").write_set("geo", &PathSet::new()).unwrap();
    at(&root, "/A/C").write_set("lights", &PathSet::new()).unwrap();

    assert_eq!(root.set_names(false), vec!["geo"]);
    assert_eq!(root.set_names(true), vec!["geo", "lights"]);
    assert_eq!(at(&root, "/A").set_names(true), vec!["geo", "lights"]);
}

#[test]
fn test_location_itself_cannot_be_a_member() {
    let dir = TempDir::new().unwrap();
    let (_, root) = build(&dir, "self.stage", &["/A/B"]);
    let a = at(&root, "/A");
    a.write_set("s", &set_of(&["/", "/B"])).unwrap();

    let warnings = root.session().take_warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].message,
        "Unable to add path '/' to set 's' at location '/A'"
    );
    assert_eq!(a.read_set("s", false), set_of(&["/B"]));
}

#[test]
fn test_numeric_members() {
    let dir = TempDir::new().unwrap();
    let (_, root) = build(&dir, "numeric.stage", &["/A/0/1"]);
    root.write_set("s", &set_of(&["/A/0/1"])).unwrap();
    assert_eq!(root.read_set("s", false), set_of(&["/A/0/1"]));
    assert_eq!(at(&root, "/A").read_set("s", true), PathSet::new());
}

#[test]
fn test_hash_set() {
    let dir = TempDir::new().unwrap();
    let (_, root) = build(&dir, "hash.stage", &["/A"]);
    let a = at(&root, "/A");

    let digest = |location: &Location, name: &str| {
        let mut h = murmur3::MurmurHash::new();
        location.hash_set(name, &mut h);
        h
    };
    assert_eq!(digest(&a, "s"), digest(&a, "s"));
    assert_ne!(digest(&a, "s"), digest(&a, "t"));
    assert_ne!(digest(&a, "s"), digest(&root, "s"));
}
