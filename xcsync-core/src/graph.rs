//! Project graph arena
//!
//! [`ProjectGraph`] owns every entity of a project and is the only way to
//! create, look up or delete one. Entities reference each other by
//! [`ObjectId`]; typed accessors validate the kind behind an id so a stale or
//! mistyped id surfaces as a [`GraphError`] instead of a silent miss.
//!
//! Iteration is in ascending id order, which keeps name lookups reproducible
//! across runs for a given project file.

use std::collections::{BTreeMap, HashSet};

use crate::types::{BuildFile, BuildPhase, BuildPhaseKind, Group, Object, ObjectId, Target};

/// Errors raised by typed graph access
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("Reference {0} does not exist in the project")]
    Dangling(ObjectId),

    #[error("Reference {id} is a {found}, expected {expected}")]
    WrongKind {
        id: ObjectId,
        expected: &'static str,
        found: String,
    },

    #[error("Reference {child} is a child of more than one group ({first} and {second})")]
    MultipleParents {
        child: ObjectId,
        first: ObjectId,
        second: ObjectId,
    },

    #[error("Group {0} is part of a cycle")]
    Cycle(ObjectId),
}

/// Source of fresh reference ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IdGenerator {
    /// 24 upper-case hex characters taken from a random UUID
    #[default]
    Random,
    /// Counter-based ids, reproducible across runs
    Sequential { next: u64 },
}

impl IdGenerator {
    pub fn sequential() -> Self {
        IdGenerator::Sequential { next: 1 }
    }

    fn candidate(&mut self) -> ObjectId {
        match self {
            IdGenerator::Random => {
                let uuid = uuid::Uuid::new_v4().simple().to_string().to_ascii_uppercase();
                ObjectId::new(&uuid[..24])
            }
            IdGenerator::Sequential { next } => {
                let id = ObjectId::new(format!("{:024X}", *next));
                *next += 1;
                id
            }
        }
    }
}

/// Arena of project entities keyed by reference id
#[derive(Debug, Clone, Default)]
pub struct ProjectGraph {
    objects: BTreeMap<ObjectId, Object>,
    ids: IdGenerator,
}

impl ProjectGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_generator(ids: IdGenerator) -> Self {
        Self {
            objects: BTreeMap::new(),
            ids,
        }
    }

    pub fn set_id_generator(&mut self, ids: IdGenerator) {
        self.ids = ids;
    }

    /// Allocate an id that no entity of this graph uses
    pub fn generate_id(&mut self, hint: &str) -> ObjectId {
        loop {
            let id = self.ids.candidate();
            if !self.objects.contains_key(&id) {
                tracing::trace!("Generated reference {} for {}", id, hint);
                return id;
            }
        }
    }

    /// Store an object under a fresh id
    pub fn add(&mut self, object: Object) -> ObjectId {
        let hint = object.display_name().unwrap_or(object.isa()).to_string();
        let id = self.generate_id(&hint);
        self.objects.insert(id.clone(), object);
        id
    }

    /// Store an object under a known id, replacing whatever was there
    pub fn insert(&mut self, id: ObjectId, object: Object) -> Option<Object> {
        self.objects.insert(id, object)
    }

    pub fn remove(&mut self, id: &ObjectId) -> Option<Object> {
        self.objects.remove(id)
    }

    pub fn get(&self, id: &ObjectId) -> Option<&Object> {
        self.objects.get(id)
    }

    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id)
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ObjectId, &Object)> {
        self.objects.iter()
    }

    fn lookup(&self, id: &ObjectId) -> Result<&Object, GraphError> {
        self.objects
            .get(id)
            .ok_or_else(|| GraphError::Dangling(id.clone()))
    }

    fn wrong_kind(id: &ObjectId, expected: &'static str, found: &Object) -> GraphError {
        GraphError::WrongKind {
            id: id.clone(),
            expected,
            found: found.isa().to_string(),
        }
    }

    /// Group or variant group behind `id`
    pub fn container(&self, id: &ObjectId) -> Result<&Group, GraphError> {
        match self.lookup(id)? {
            Object::Group(group) | Object::VariantGroup(group) => Ok(group),
            other => Err(Self::wrong_kind(id, "group", other)),
        }
    }

    pub fn container_mut(&mut self, id: &ObjectId) -> Result<&mut Group, GraphError> {
        match self.objects.get_mut(id) {
            Some(Object::Group(group)) | Some(Object::VariantGroup(group)) => Ok(group),
            Some(other) => Err(Self::wrong_kind(id, "group", other)),
            None => Err(GraphError::Dangling(id.clone())),
        }
    }

    pub fn build_phase(&self, id: &ObjectId) -> Result<&BuildPhase, GraphError> {
        match self.lookup(id)? {
            Object::BuildPhase(phase) => Ok(phase),
            other => Err(Self::wrong_kind(id, "build phase", other)),
        }
    }

    pub fn build_phase_mut(&mut self, id: &ObjectId) -> Result<&mut BuildPhase, GraphError> {
        match self.objects.get_mut(id) {
            Some(Object::BuildPhase(phase)) => Ok(phase),
            Some(other) => Err(Self::wrong_kind(id, "build phase", other)),
            None => Err(GraphError::Dangling(id.clone())),
        }
    }

    /// Append `child` to the children of the group or variant group `parent`
    pub fn append_child(&mut self, parent: &ObjectId, child: ObjectId) -> Result<(), GraphError> {
        self.container_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Remove every occurrence of `child` from the children of `parent`
    pub fn detach_child(&mut self, parent: &ObjectId, child: &ObjectId) -> Result<(), GraphError> {
        self.container_mut(parent)?.children.retain(|c| c != child);
        Ok(())
    }

    /// Find a plain group by name or path
    ///
    /// With a scope, only the scope's children are candidates; without one the
    /// whole graph is searched. Duplicates resolve to the lowest id and are
    /// reported as a warning.
    pub fn find_group(&self, name: &str, scope: Option<&ObjectId>) -> Option<ObjectId> {
        let scope_children: Option<HashSet<&ObjectId>> = match scope {
            Some(scope) => Some(self.container(scope).ok()?.children.iter().collect()),
            None => None,
        };

        let matches: Vec<&ObjectId> = self
            .objects
            .iter()
            .filter(|(id, object)| {
                matches!(object, Object::Group(group) if group.matches(name))
                    && scope_children.as_ref().map_or(true, |c| c.contains(id))
            })
            .map(|(id, _)| id)
            .collect();

        if matches.len() > 1 {
            tracing::warn!(
                "Group name '{}' is ambiguous ({} matches: {}), using {}",
                name,
                matches.len(),
                join_ids(&matches),
                matches[0]
            );
        }
        matches.first().map(|id| (*id).clone())
    }

    /// Children of `parent` that are plain groups (or variant groups) named `name`
    pub fn child_containers_named(
        &self,
        parent: &ObjectId,
        name: &str,
        variant: bool,
    ) -> Result<Vec<ObjectId>, GraphError> {
        let children = &self.container(parent)?.children;
        Ok(children
            .iter()
            .filter(|child| match self.objects.get(*child) {
                Some(Object::Group(group)) if !variant => group.matches(name),
                Some(Object::VariantGroup(group)) if variant => group.matches(name),
                _ => false,
            })
            .cloned()
            .collect())
    }

    /// Target with the given name (first match)
    pub fn target_named(&self, name: &str) -> Option<(&ObjectId, &Target)> {
        let mut targets = self.objects.iter().filter_map(|(id, object)| match object {
            Object::Target(target) if target.name == name => Some((id, target)),
            _ => None,
        });
        let first = targets.next();
        if first.is_some() && targets.next().is_some() {
            tracing::warn!("More than one target named '{}', using the first", name);
        }
        first
    }

    /// The phase of `kind` owned by the target named `target_name`
    pub fn target_phase(&self, target_name: &str, kind: BuildPhaseKind) -> Option<ObjectId> {
        let (_, target) = self.target_named(target_name)?;
        target
            .build_phases
            .iter()
            .find(|id| matches!(self.objects.get(*id), Some(Object::BuildPhase(p)) if p.kind == kind))
            .cloned()
    }

    /// Create a build file for `file_ref` and append it to `phase`
    pub fn add_build_file(
        &mut self,
        phase: &ObjectId,
        file_ref: ObjectId,
    ) -> Result<ObjectId, GraphError> {
        // Validate before allocating so a bad phase id leaves no orphan behind
        self.build_phase(phase)?;
        let build_file = self.add(Object::BuildFile(BuildFile::new(file_ref)));
        self.build_phase_mut(phase)?.files.push(build_file.clone());
        Ok(build_file)
    }

    /// Build files whose `fileRef` is `file_ref`
    pub fn build_files_referencing(&self, file_ref: &ObjectId) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, object)| {
                matches!(object, Object::BuildFile(bf) if bf.file_ref.as_ref() == Some(file_ref))
            })
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Whether any build phase lists `build_file`
    pub fn is_registered(&self, build_file: &ObjectId) -> bool {
        self.objects.values().any(|object| {
            matches!(object, Object::BuildPhase(phase) if phase.files.contains(build_file))
        })
    }

    /// Delete every build file pointing at `file_ref` and drop it from all phases
    pub fn unregister(&mut self, file_ref: &ObjectId) -> usize {
        let build_files = self.build_files_referencing(file_ref);
        if build_files.is_empty() {
            return 0;
        }
        for object in self.objects.values_mut() {
            if let Object::BuildPhase(phase) = object {
                phase.files.retain(|f| !build_files.contains(f));
            }
        }
        for build_file in &build_files {
            self.objects.remove(build_file);
        }
        build_files.len()
    }

    /// Groups and variant groups listing `child`
    pub fn parents_of(&self, child: &ObjectId) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, object)| object.children().is_some_and(|c| c.contains(child)))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Check the containment tree: every child has one parent, no cycles
    pub fn validate_tree(&self) -> Result<(), GraphError> {
        let mut parent_of: BTreeMap<&ObjectId, &ObjectId> = BTreeMap::new();
        for (id, object) in &self.objects {
            let Some(children) = object.children() else { continue };
            let mut seen = HashSet::new();
            for child in children {
                if !seen.insert(child) {
                    return Err(GraphError::MultipleParents {
                        child: child.clone(),
                        first: id.clone(),
                        second: id.clone(),
                    });
                }
                if let Some(first) = parent_of.insert(child, id) {
                    return Err(GraphError::MultipleParents {
                        child: child.clone(),
                        first: first.clone(),
                        second: id.clone(),
                    });
                }
            }
        }

        for start in parent_of.keys() {
            let mut current = *start;
            let mut steps = 0;
            while let Some(parent) = parent_of.get(current) {
                if *parent == *start || steps > parent_of.len() {
                    return Err(GraphError::Cycle((*start).clone()));
                }
                current = *parent;
                steps += 1;
            }
        }
        Ok(())
    }
}

fn join_ids(ids: &[&ObjectId]) -> String {
    ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
}
