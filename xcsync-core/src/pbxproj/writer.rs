//! Descriptor serialization in Xcode's layout
//!
//! Objects are grouped into `/* Begin <isa> section */` blocks sorted by isa,
//! each block sorted by id. References are annotated with `/* name */`
//! comments so diffs of the written file stay readable.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use crate::graph::ProjectGraph;
use crate::types::{Object, ObjectId};

use super::codec::encode_object;
use super::plist::{Dictionary, Value};

/// Objects Xcode writes on a single line
const SINGLE_LINE_ISAS: [&str; 2] = ["PBXBuildFile", "PBXFileReference"];

/// Serialize the top-level attributes plus the graph as a `project.pbxproj`
pub fn write_project(attributes: &Dictionary, graph: &ProjectGraph, project_name: Option<&str>) -> String {
    let writer = Writer {
        comments: build_comments(graph, project_name),
    };

    let mut out = String::from("// !$*UTF8*$!\n{\n");
    let mut keys: Vec<&str> = attributes.keys().map(String::as_str).collect();
    keys.push("objects");
    keys.sort_unstable();
    keys.dedup();

    for key in keys {
        if key == "objects" {
            writer.write_objects(&mut out, graph);
            continue;
        }
        let Some(value) = attributes.get(key) else { continue };
        out.push('\t');
        out.push_str(&quote(key));
        out.push_str(" = ");
        writer.write_value(&mut out, value, 1, false);
        out.push_str(";\n");
    }
    out.push_str("}\n");
    out
}

struct Writer {
    comments: HashMap<String, String>,
}

impl Writer {
    fn write_objects(&self, out: &mut String, graph: &ProjectGraph) {
        let mut sections: BTreeMap<String, Vec<(&ObjectId, Dictionary)>> = BTreeMap::new();
        for (id, object) in graph.iter() {
            sections
                .entry(object.isa().to_string())
                .or_default()
                .push((id, encode_object(object)));
        }

        out.push_str("\tobjects = {\n");
        for (isa, objects) in &sections {
            let single_line = SINGLE_LINE_ISAS.contains(&isa.as_str());
            let _ = writeln!(out, "\n/* Begin {} section */", isa);
            for (id, fields) in objects {
                out.push_str("\t\t");
                self.write_string(out, id.as_str());
                out.push_str(" = ");
                self.write_dictionary(out, fields, 2, single_line);
                out.push_str(";\n");
            }
            let _ = writeln!(out, "/* End {} section */", isa);
        }
        out.push_str("\t};\n");
    }

    fn write_value(&self, out: &mut String, value: &Value, indent: usize, inline: bool) {
        match value {
            Value::String(s) => self.write_string(out, s),
            Value::Array(items) => {
                out.push('(');
                if !inline {
                    out.push('\n');
                }
                for item in items {
                    if !inline {
                        push_tabs(out, indent + 1);
                    }
                    self.write_value(out, item, indent + 1, inline);
                    out.push(',');
                    out.push(if inline { ' ' } else { '\n' });
                }
                if !inline {
                    push_tabs(out, indent);
                }
                out.push(')');
            }
            Value::Dictionary(dict) => self.write_dictionary(out, dict, indent, inline),
            Value::Data(bytes) => {
                out.push('<');
                for byte in bytes {
                    let _ = write!(out, "{:02x}", byte);
                }
                out.push('>');
            }
        }
    }

    fn write_dictionary(&self, out: &mut String, dict: &Dictionary, indent: usize, inline: bool) {
        out.push('{');
        if !inline {
            out.push('\n');
        }
        // isa leads, the rest follows in key order
        let ordered = dict
            .get_key_value("isa")
            .into_iter()
            .chain(dict.iter().filter(|(k, _)| k.as_str() != "isa"));
        for (key, value) in ordered {
            if !inline {
                push_tabs(out, indent + 1);
            }
            out.push_str(&quote(key));
            out.push_str(" = ");
            self.write_value(out, value, indent + 1, inline);
            out.push(';');
            out.push(if inline { ' ' } else { '\n' });
        }
        if !inline {
            push_tabs(out, indent);
        }
        out.push('}');
    }

    fn write_string(&self, out: &mut String, s: &str) {
        out.push_str(&quote(s));
        if let Some(comment) = self.comments.get(s) {
            let _ = write!(out, " /* {} */", comment.replace("*/", "* /"));
        }
    }
}

fn push_tabs(out: &mut String, count: usize) {
    for _ in 0..count {
        out.push('\t');
    }
}

/// Quote a string unless it consists only of characters Xcode leaves bare
pub(crate) fn quote(s: &str) -> String {
    let bare = !s.is_empty()
        && s.bytes()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, b'_' | b'$' | b'/' | b':' | b'.'))
        && !s.contains("//")
        && !s.contains("/*");
    if bare {
        return s.to_string();
    }

    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Annotation shown after every occurrence of an object id
fn build_comments(graph: &ProjectGraph, project_name: Option<&str>) -> HashMap<String, String> {
    let mut phase_of_build_file: HashMap<&ObjectId, &str> = HashMap::new();
    let mut owner_of_config_list: HashMap<&str, String> = HashMap::new();

    for (_, object) in graph.iter() {
        match object {
            Object::BuildPhase(phase) => {
                for file in &phase.files {
                    phase_of_build_file.insert(file, phase.display_name());
                }
            }
            Object::Target(target) => {
                if let Some(list) = target.extra.get("buildConfigurationList").and_then(Value::as_str) {
                    owner_of_config_list.insert(
                        list,
                        format!("Build configuration list for {} \"{}\"", target.isa, target.name),
                    );
                }
            }
            Object::Other(raw) if raw.isa == "PBXProject" => {
                if let (Some(list), Some(name)) = (
                    raw.fields.get("buildConfigurationList").and_then(Value::as_str),
                    project_name,
                ) {
                    owner_of_config_list.insert(
                        list,
                        format!("Build configuration list for PBXProject \"{}\"", name),
                    );
                }
            }
            _ => {}
        }
    }

    let mut comments = HashMap::new();
    for (id, object) in graph.iter() {
        let comment = match object {
            Object::BuildFile(build_file) => {
                let file_name = build_file
                    .file_ref
                    .as_ref()
                    .and_then(|file_ref| graph.get(file_ref))
                    .and_then(Object::display_name);
                match (file_name, phase_of_build_file.get(id)) {
                    (Some(file), Some(phase)) => Some(format!("{} in {}", file, phase)),
                    (Some(file), None) => Some(file.to_string()),
                    _ => None,
                }
            }
            _ => owner_of_config_list
                .get(id.as_str())
                .cloned()
                .or_else(|| object.display_name().map(str::to_string)),
        };
        if let Some(comment) = comment {
            comments.insert(id.as_str().to_string(), comment);
        }
    }
    comments
}
