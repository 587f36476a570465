//! Mapping between raw descriptor dictionaries and typed graph objects

use crate::types::{
    BuildFile, BuildPhase, BuildPhaseKind, FileReference, Group, Object, ObjectId, RawObject,
    SourceTree, Target,
};

use super::plist::{Dictionary, Value};

/// Decode one entry of the `objects` dictionary
pub fn decode_object(mut fields: Dictionary) -> Result<Object, String> {
    let isa = match fields.remove("isa") {
        Some(Value::String(isa)) => isa,
        Some(_) => return Err("`isa` is not a string".to_string()),
        None => return Err("missing `isa`".to_string()),
    };

    let object = match isa.as_str() {
        "PBXGroup" => Object::Group(decode_group(fields)?),
        "PBXVariantGroup" => Object::VariantGroup(decode_group(fields)?),
        "PBXFileReference" => Object::FileReference(FileReference {
            name: take_string(&mut fields, "name")?,
            path: take_string(&mut fields, "path")?,
            source_tree: take_source_tree(&mut fields)?,
            last_known_file_type: take_string(&mut fields, "lastKnownFileType")?,
            extra: fields,
        }),
        "PBXBuildFile" => Object::BuildFile(BuildFile {
            file_ref: take_string(&mut fields, "fileRef")?.map(ObjectId::new),
            extra: fields,
        }),
        other if Target::ISAS.contains(&other) => Object::Target(Target {
            isa: other.to_string(),
            name: take_string(&mut fields, "name")?.unwrap_or_default(),
            build_phases: take_ids(&mut fields, "buildPhases")?,
            extra: fields,
        }),
        other => match BuildPhaseKind::from_isa(other) {
            Some(kind) => Object::BuildPhase(BuildPhase {
                kind,
                files: take_ids(&mut fields, "files")?,
                extra: fields,
            }),
            None => Object::Other(RawObject {
                isa: other.to_string(),
                fields,
            }),
        },
    };
    Ok(object)
}

fn decode_group(mut fields: Dictionary) -> Result<Group, String> {
    Ok(Group {
        name: take_string(&mut fields, "name")?,
        path: take_string(&mut fields, "path")?,
        children: take_ids(&mut fields, "children")?,
        source_tree: take_source_tree(&mut fields)?,
        extra: fields,
    })
}

/// Encode an object back into its descriptor dictionary (including `isa`)
pub fn encode_object(object: &Object) -> Dictionary {
    let mut fields = match object {
        Object::Group(group) | Object::VariantGroup(group) => {
            let mut fields = group.extra.clone();
            put_ids(&mut fields, "children", &group.children);
            put_string(&mut fields, "name", group.name.as_deref());
            put_string(&mut fields, "path", group.path.as_deref());
            put_string(&mut fields, "sourceTree", Some(group.source_tree.as_str()));
            fields
        }
        Object::FileReference(file) => {
            let mut fields = file.extra.clone();
            put_string(&mut fields, "name", file.name.as_deref());
            put_string(&mut fields, "path", file.path.as_deref());
            put_string(&mut fields, "sourceTree", Some(file.source_tree.as_str()));
            put_string(&mut fields, "lastKnownFileType", file.last_known_file_type.as_deref());
            fields
        }
        Object::BuildFile(build_file) => {
            let mut fields = build_file.extra.clone();
            put_string(&mut fields, "fileRef", build_file.file_ref.as_ref().map(|id| id.as_str()));
            fields
        }
        Object::BuildPhase(phase) => {
            let mut fields = phase.extra.clone();
            put_ids(&mut fields, "files", &phase.files);
            fields
        }
        Object::Target(target) => {
            let mut fields = target.extra.clone();
            put_string(&mut fields, "name", Some(&target.name));
            put_ids(&mut fields, "buildPhases", &target.build_phases);
            fields
        }
        Object::Other(raw) => raw.fields.clone(),
    };
    fields.insert("isa".to_string(), Value::from(object.isa()));
    fields
}

fn take_string(fields: &mut Dictionary, key: &str) -> Result<Option<String>, String> {
    match fields.remove(key) {
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(format!("`{}` is not a string", key)),
        None => Ok(None),
    }
}

fn take_source_tree(fields: &mut Dictionary) -> Result<SourceTree, String> {
    Ok(take_string(fields, "sourceTree")?
        .map(|tree| SourceTree::parse(&tree))
        .unwrap_or_default())
}

fn take_ids(fields: &mut Dictionary, key: &str) -> Result<Vec<ObjectId>, String> {
    match fields.remove(key) {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(id) => Ok(ObjectId::new(id)),
                _ => Err(format!("`{}` contains a non-reference entry", key)),
            })
            .collect(),
        Some(_) => Err(format!("`{}` is not an array", key)),
        None => Ok(Vec::new()),
    }
}

fn put_string(fields: &mut Dictionary, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        fields.insert(key.to_string(), Value::from(value));
    }
}

fn put_ids(fields: &mut Dictionary, key: &str, ids: &[ObjectId]) {
    let items = ids.iter().map(|id| Value::from(id.as_str())).collect();
    fields.insert(key.to_string(), Value::Array(items));
}
