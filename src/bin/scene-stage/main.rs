//! scene-stage CLI - Tool for inspecting and copying stage files.

use std::env;
use std::path::Path;

use murmur3::MurmurHash;
use scene_stage::prelude::*;
use scene_stage::translate::format;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const ALL_HASHES: [(HashType, &str); 6] = [
    (HashType::Transform, "transform"),
    (HashType::Attributes, "attributes"),
    (HashType::Bound, "bound"),
    (HashType::Object, "object"),
    (HashType::ChildNames, "childNames"),
    (HashType::Hierarchy, "hierarchy"),
];

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        "info" | "i" => match filtered_args.get(1) {
            Some(file) => cmd_info(file),
            None => usage("info <file>"),
        },
        "tree" | "t" => match filtered_args.get(1) {
            Some(file) => cmd_tree(file, time_arg(filtered_args.get(2))),
            None => usage("tree <file> [time]"),
        },
        "sets" | "s" => match filtered_args.get(1) {
            Some(file) => cmd_sets(file),
            None => usage("sets <file>"),
        },
        "hash" => match filtered_args.get(1) {
            Some(file) => cmd_hash(file, time_arg(filtered_args.get(2))),
            None => usage("hash <file> [time]"),
        },
        "copy" | "c" => match (filtered_args.get(1), filtered_args.get(2)) {
            (Some(input), Some(output)) => cmd_copy(input, output, &times_arg(&filtered_args[3..])),
            _ => usage("copy <input> <output> [time...]"),
        },
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }
        // Default: if file exists, show info; otherwise error
        other => {
            if Path::new(other).exists() {
                cmd_info(other)
            } else {
                eprintln!("Unknown command: {}", other);
                eprintln!();
                print_help();
                std::process::exit(1);
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn usage(text: &str) -> Result<()> {
    eprintln!("Error: missing arguments");
    eprintln!("Usage: scene-stage {}", text);
    std::process::exit(1);
}

fn time_arg(arg: Option<&&str>) -> f64 {
    arg.and_then(|s| s.parse().ok()).unwrap_or(0.0)
}

fn times_arg(args: &[&str]) -> Vec<f64> {
    let times: Vec<f64> = args.iter().filter_map(|s| s.parse().ok()).collect();
    if times.is_empty() {
        vec![0.0]
    } else {
        times
    }
}

fn print_help() {
    println!("scene-stage {} ({})", env!("CARGO_PKG_VERSION"), scene_stage::BUILD_DATE);
    println!();
    println!("USAGE:");
    println!("    scene-stage [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info  <file>                 Show stage metadata and location counts");
    println!("    t, tree  <file> [time]          Show the location hierarchy");
    println!("    s, sets  <file>                 List sets and their members");
    println!("       hash  <file> [time]          Print per-location digests");
    println!("    c, copy  <in> <out> [time...]   Copy a scene, sampling at the given times (seconds)");
    println!("    h, help                         Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Only show errors");
    println!();
    println!("Supported extensions: {}", format::supported_extensions().join(", "));
    println!("RUST_LOG overrides the log level flags.");
}

fn open(path: &str) -> Result<Location> {
    info!("Opening stage: {}", path);
    Location::open(path, OpenMode::Read)
}

/// Depth-first visit of every location below (and including) `location`.
fn walk(location: &Location, visit: &mut dyn FnMut(&Location, usize) -> Result<()>, depth: usize) -> Result<()> {
    visit(location, depth)?;
    for name in location.child_names() {
        if let Some(child) = location.child(&name, MissingBehaviour::NullIfMissing)? {
            walk(&child, visit, depth + 1)?;
        }
    }
    Ok(())
}

fn object_label(object: &Object) -> String {
    match object {
        Object::Mesh(m) => format!("Mesh ({} faces, {})", m.num_faces(), m.interpolation),
        Object::Points(p) if p.is_instancer() => format!("PointInstancer ({} instances)", p.num_points),
        Object::Points(p) => format!("Points ({})", p.num_points),
        Object::Curves(c) => format!("Curves ({}, {:?})", c.num_curves(), c.basis),
        Object::Sphere(s) => format!("Sphere (r={})", s.radius),
        Object::Camera(c) => format!("Camera ({})", c.projection),
    }
}

fn cmd_info(path: &str) -> Result<()> {
    let root = open(path)?;
    let session = root.session();

    let mut locations = 0usize;
    let mut objects = std::collections::BTreeMap::<&'static str, usize>::new();
    walk(
        &root,
        &mut |location, _| {
            locations += 1;
            if let Some(object) = location.read_object(0.0) {
                *objects.entry(object.type_name()).or_default() += 1;
            }
            Ok(())
        },
        0,
    )?;

    let stage = session.stage();
    println!("Stage: {}", path);
    println!("Time codes per second: {}", stage.time_codes_per_second());
    println!("Up axis: {:?}", stage.up_axis());
    if let Some(default_prim) = stage.default_prim() {
        println!("Default prim: {}", default_prim);
    }
    drop(stage);
    println!();
    println!("Locations: {}", locations);
    for (type_name, count) in &objects {
        println!("  {:<16} {}", type_name, count);
    }
    let tags = root.read_tags(TagFilter::EVERY);
    if !tags.is_empty() {
        println!("Tags: {}", tags.join(", "));
    }
    report_warnings(session);
    Ok(())
}

fn cmd_tree(path: &str, time: f64) -> Result<()> {
    let root = open(path)?;
    println!("Stage: {}", path);
    println!();
    walk(
        &root,
        &mut |location, depth| {
            let indent = "  ".repeat(depth);
            let name = if depth == 0 { "/".to_string() } else { location.name() };
            let object = location
                .read_object(time)
                .map(|o| format!(" [{}]", object_label(&o)))
                .unwrap_or_default();
            println!("{}{}{}", indent, name, object);
            for attr in location.attribute_names() {
                println!("{}  .{}", indent, attr);
            }
            Ok(())
        },
        0,
    )?;
    report_warnings(root.session());
    Ok(())
}

fn cmd_sets(path: &str) -> Result<()> {
    let root = open(path)?;
    for name in root.set_names(true) {
        let members = root.read_set(&name, true);
        println!("{} ({} members)", name, members.len());
        for member in members.to_strings() {
            println!("  {}", member);
        }
    }
    Ok(())
}

fn cmd_hash(path: &str, time: f64) -> Result<()> {
    let root = open(path)?;
    walk(
        &root,
        &mut |location, _| {
            println!("{}", path_to_string(&location.path()));
            for (hash_type, label) in ALL_HASHES {
                let mut h = MurmurHash::new();
                location.hash(hash_type, time, &mut h);
                if h != MurmurHash::new() {
                    println!("  {:<12} {}", label, h);
                }
            }
            Ok(())
        },
        0,
    )
}

fn cmd_copy(input: &str, output: &str, times: &[f64]) -> Result<()> {
    info!("Copying {} -> {}", input, output);
    let source = open(input)?;
    let rate = source.session().samples_per_second();
    let up_axis = source.session().stage().up_axis();
    let options = WriteOptions {
        time_codes_per_second: rate,
        up_axis,
        ..Default::default()
    };
    let target = Location::create(output, &options)?;
    copy_location(&source, &target, times)?;
    target.session().persist()?;
    report_warnings(source.session());
    report_warnings(target.session());
    println!("Copied {} -> {}", input, output);
    Ok(())
}

fn copy_location(source: &Location, target: &Location, times: &[f64]) -> Result<()> {
    debug!("Copying location: {}", path_to_string(&source.path()));
    let is_root = source.path().is_empty();
    for &time in times {
        if !is_root {
            target.write_transform(&source.read_transform(time), time)?;
        }
        if let Some(object) = source.read_object(time) {
            target.write_object(&object, time)?;
        }
        if source.has_bound() {
            let bound = source.read_bound(time);
            // Unauthored extents read back empty; leave them unauthored.
            if !bound.is_empty() {
                target.write_bound(&bound, time)?;
            }
        }
        for name in source.attribute_names() {
            if let Some(value) = source.read_attribute(&name, time) {
                target.write_attribute(&name, &value, time)?;
            }
        }
    }

    for name in source.set_names(false) {
        target.write_set(&name, &source.read_set(&name, false))?;
    }
    let tags = source.read_tags(TagFilter::LOCAL);
    if !tags.is_empty() {
        target.write_tags(&tags)?;
    }

    for name in source.child_names() {
        let Some(child) = source.child(&name, MissingBehaviour::NullIfMissing)? else {
            continue;
        };
        if let Some(out) = target.child(&name, MissingBehaviour::CreateIfMissing)? {
            copy_location(&child, &out, times)?;
        }
    }
    Ok(())
}

fn report_warnings(session: &Session) {
    let dropped = session.diagnostics().dropped();
    let warnings = session.take_warnings();
    if !warnings.is_empty() || dropped > 0 {
        info!(
            "{} warning(s) while translating {}",
            warnings.len() + dropped,
            session.file_name()
        );
    }
}
