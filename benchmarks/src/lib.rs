//! Fixtures shared by the benchmark runner and the criterion benches

use std::fs;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use xcsync_core::pbxproj::plist::{Dictionary, Value};
use xcsync_core::{
    last_known_file_type, BuildPhase, BuildPhaseKind, FileReference, Group, IdGenerator, Object,
    ObjectId, Project, ProjectGraph, RawObject, Target,
};

const SOURCE_EXTENSIONS: [&str; 3] = ["swift", "m", "metal"];
const RESOURCE_EXTENSIONS: [&str; 4] = ["png", "json", "storyboard", "xib"];
const LOCALES: [&str; 4] = ["fr", "de", "es", "ja"];

/// Project with an `App` group holding `existing_files` compiled files and an
/// `App` target with Sources and Resources phases
pub fn sample_project(existing_files: usize) -> anyhow::Result<Project> {
    let mut graph = ProjectGraph::with_id_generator(IdGenerator::sequential());

    let sources = graph.add(Object::BuildPhase(BuildPhase::new(BuildPhaseKind::Sources)));
    let resources = graph.add(Object::BuildPhase(BuildPhase::new(BuildPhaseKind::Resources)));
    let mut target = Target::native("App");
    target.build_phases = vec![sources.clone(), resources];
    let target = graph.add(Object::Target(target));

    let app = graph.add(Object::Group(Group::new("App")));
    let main_group = graph.add(Object::Group(Group {
        children: vec![app.clone()],
        ..Default::default()
    }));

    for i in 0..existing_files {
        let name = format!("Existing{}.swift", i);
        let file = FileReference::new(&name, &name).with_file_type(last_known_file_type(&name));
        let file = graph.add(Object::FileReference(file));
        graph.append_child(&app, file.clone())?;
        graph.add_build_file(&sources, file)?;
    }

    let mut fields = Dictionary::new();
    fields.insert("mainGroup".to_string(), Value::from(main_group.as_str()));
    fields.insert(
        "targets".to_string(),
        Value::Array(vec![Value::from(target.as_str())]),
    );
    let root = graph.add(Object::Other(RawObject {
        isa: "PBXProject".to_string(),
        fields,
    }));

    Ok(Project {
        attributes: attributes(&root),
        graph,
        name: Some("App".to_string()),
    })
}

fn attributes(root: &ObjectId) -> Dictionary {
    let mut attributes = Dictionary::new();
    attributes.insert("archiveVersion".to_string(), Value::from("1"));
    attributes.insert("classes".to_string(), Value::Dictionary(Dictionary::new()));
    attributes.insert("objectVersion".to_string(), Value::from("50"));
    attributes.insert("rootObject".to_string(), Value::from(root.as_str()));
    attributes
}

/// Write a directory tree of `breadth^depth` leaf directories with
/// `files_per_dir` files each, plus localized strings when `localized`
pub fn write_disk_tree(
    root: &Path,
    breadth: usize,
    depth: usize,
    files_per_dir: usize,
    localized: bool,
) -> anyhow::Result<usize> {
    let mut rng = rand::thread_rng();
    write_level(root, breadth, depth, files_per_dir, localized, &mut rng)
}

fn write_level(
    dir: &Path,
    breadth: usize,
    remaining_depth: usize,
    files_per_dir: usize,
    localized: bool,
    rng: &mut impl Rng,
) -> anyhow::Result<usize> {
    fs::create_dir_all(dir)?;
    let mut written = 0;

    for i in 0..files_per_dir {
        let extensions: &[&str] = if rng.gen_bool(0.7) {
            &SOURCE_EXTENSIONS
        } else {
            &RESOURCE_EXTENSIONS
        };
        let extension = extensions.choose(rng).copied().unwrap_or("swift");
        fs::write(dir.join(format!("File{}.{}", i, extension)), "// generated\n")?;
        written += 1;
    }

    if localized {
        for locale in std::iter::once("Base").chain(LOCALES) {
            let bundle = dir.join(format!("{}.lproj", locale));
            fs::create_dir_all(&bundle)?;
            fs::write(bundle.join("Localizable.strings"), "\"key\" = \"value\";\n")?;
            written += 1;
        }
    }

    if remaining_depth > 0 {
        for i in 0..breadth {
            written += write_level(
                &dir.join(format!("Folder{}", i)),
                breadth,
                remaining_depth - 1,
                files_per_dir,
                localized,
                rng,
            )?;
        }
    }
    Ok(written)
}
