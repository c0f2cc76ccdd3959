//! Schema discovery over the manifest's class graph.
//!
//! [`SchemaIndex`] is built once per run and is read-only afterwards. It
//! answers the two questions later stages ask: which classes implement a
//! given type, and which marked methods a class has (its own and inherited
//! ones).

use super::kotlin::ClassName;
use super::naming;
use crate::config::EntryPoint;
use crate::error::ManifestError;
use crate::manifest::{AttributeDef, ChildDef, ClassDef, Manifest};
use std::collections::HashMap;
use tracing::debug;

/// Stable handle of a class inside a [`SchemaIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(usize);

/// Why a type reference did not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unresolved {
    /// No class matches
    Missing,
    /// Several classes match; qualified names of all candidates
    Ambiguous(Vec<String>),
}

/// Read-only index over the manifest's classes.
#[derive(Debug)]
pub struct SchemaIndex<'m> {
    classes: &'m [ClassDef],
    /// Every accepted spelling of a class name to the classes it may mean
    names: HashMap<String, Vec<usize>>,
    /// Ancestors first (supertypes in declaration order, depth first), then self
    lineage: Vec<Vec<usize>>,
    /// Transitive subtypes in manifest order
    subtypes: Vec<Vec<usize>>,
}

impl<'m> SchemaIndex<'m> {
    /// Index a manifest, validating every cross-class reference.
    pub fn build(manifest: &'m Manifest) -> Result<Self, ManifestError> {
        manifest.validate()?;

        let classes = manifest.classes.as_slice();
        let mut names: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, class) in classes.iter().enumerate() {
            for spelling in spellings(class) {
                let entry = names.entry(spelling).or_default();
                if !entry.contains(&i) {
                    entry.push(i);
                }
            }
        }

        let mut index = Self {
            classes,
            names,
            lineage: Vec::new(),
            subtypes: vec![Vec::new(); classes.len()],
        };

        let direct = index.resolve_supertypes()?;
        index.lineage = linearize(classes, &direct)?;

        for (i, lineage) in index.lineage.iter().enumerate() {
            for &ancestor in lineage.iter().filter(|&&a| a != i) {
                index.subtypes[ancestor].push(i);
            }
        }

        index.check_generated_names()?;

        debug!(
            classes = index.len(),
            elements = index.elements().count(),
            "schema indexed"
        );

        Ok(index)
    }

    fn resolve_supertypes(&self) -> Result<Vec<Vec<usize>>, ManifestError> {
        self.classes
            .iter()
            .map(|class| {
                class
                    .supertypes
                    .iter()
                    .map(|reference| {
                        self.resolve_id(reference).map_err(|err| match err {
                            Unresolved::Missing => ManifestError::UnresolvedType {
                                class: class.qualified_name(),
                                reference: reference.clone(),
                            },
                            Unresolved::Ambiguous(candidates) => ManifestError::AmbiguousType {
                                reference: reference.clone(),
                                candidates,
                            },
                        })
                    })
                    .collect()
            })
            .collect()
    }

    fn check_generated_names(&self) -> Result<(), ManifestError> {
        let mut seen: HashMap<String, ClassId> = HashMap::new();
        for id in self.elements() {
            let name = self.generated_name(id);
            if let Some(first) = seen.insert(name.clone(), id) {
                return Err(ManifestError::GeneratedNameCollision {
                    name,
                    first: self.class(first).qualified_name(),
                    second: self.class(id).qualified_name(),
                });
            }
        }
        Ok(())
    }

    fn resolve_id(&self, reference: &str) -> Result<usize, Unresolved> {
        match self.names.get(reference.trim()).map(Vec::as_slice) {
            None | Some([]) => Err(Unresolved::Missing),
            Some([only]) => Ok(*only),
            Some(many) => Err(Unresolved::Ambiguous(
                many.iter()
                    .map(|&i| self.classes[i].qualified_name())
                    .collect(),
            )),
        }
    }

    /// Resolve a simple, nested (`Outer.Name`) or qualified class reference.
    pub fn resolve(&self, reference: &str) -> Result<ClassId, Unresolved> {
        self.resolve_id(reference).map(ClassId)
    }

    /// The class behind a handle.
    pub fn class(&self, id: ClassId) -> &'m ClassDef {
        &self.classes[id.0]
    }

    /// Number of indexed classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the manifest declares no classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Every class carrying the element marker, in manifest order.
    pub fn elements(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.classes
            .iter()
            .enumerate()
            .filter(|(_, class)| class.is_element())
            .map(|(i, _)| ClassId(i))
    }

    /// All transitive subtypes of a class, in manifest order.
    pub fn subtypes_of(&self, id: ClassId) -> impl Iterator<Item = ClassId> + '_ {
        self.subtypes[id.0].iter().map(|&i| ClassId(i))
    }

    /// Ancestors first, then the class itself.
    pub fn lineage(&self, id: ClassId) -> impl DoubleEndedIterator<Item = ClassId> + '_ {
        self.lineage[id.0].iter().map(|&i| ClassId(i))
    }

    /// Attribute and text-content setters, inherited ones included.
    ///
    /// A setter redeclared by a subclass replaces the inherited declaration
    /// in place.
    pub fn attributes(&self, id: ClassId) -> Vec<&'m AttributeDef> {
        self.inherited(id, |class| &class.attributes, |a| &a.setter)
    }

    /// Child-element setters, inherited ones included.
    pub fn children(&self, id: ClassId) -> Vec<&'m ChildDef> {
        self.inherited(id, |class| &class.children, |c| &c.setter)
    }

    /// Whether the class accepts nested elements.
    pub fn has_children(&self, id: ClassId) -> bool {
        self.lineage(id)
            .any(|ancestor| !self.class(ancestor).children.is_empty())
    }

    fn inherited<T>(
        &self,
        id: ClassId,
        members: impl Fn(&'m ClassDef) -> &'m Vec<T>,
        setter: impl Fn(&T) -> &String,
    ) -> Vec<&'m T>
    where
        T: 'm,
    {
        let mut collected: Vec<&'m T> = Vec::new();
        for ancestor in self.lineage(id) {
            for member in members(self.class(ancestor)) {
                match collected.iter().position(|m| setter(*m) == setter(member)) {
                    Some(pos) => collected[pos] = member,
                    None => collected.push(member),
                }
            }
        }
        collected
    }

    /// Value a getter returns on a fresh instance, if the getter exists.
    pub fn sampled_getter(&self, id: ClassId, getter: &str) -> Option<&'m serde_json::Value> {
        self.lineage(id)
            .rev()
            .find_map(|ancestor| self.class(ancestor).sample.getters.get(getter))
    }

    /// Value an internal field holds on a fresh instance.
    pub fn sampled_field(&self, id: ClassId, field: &str) -> Option<&'m serde_json::Value> {
        self.lineage(id)
            .rev()
            .find_map(|ancestor| self.class(ancestor).sample.fields.get(field))
    }

    /// Name of the builder generated for a class.
    pub fn generated_name(&self, id: ClassId) -> String {
        let class = self.class(id);
        naming::generated_type_name(class.enclosing_simple_name(), &class.name)
    }

    /// Kotlin reference to the host class.
    pub fn class_name(&self, id: ClassId) -> ClassName {
        let class = self.class(id);
        let mut names: Vec<String> = class
            .enclosing
            .iter()
            .flat_map(|enclosing| enclosing.split('.'))
            .map(str::to_string)
            .collect();
        names.push(class.name.clone());
        ClassName::new(class.package.clone(), names)
    }

    /// The class itself if it is an element, else its nearest element ancestor.
    pub fn element_ancestor(&self, id: ClassId) -> Option<ClassId> {
        self.lineage(id)
            .rev()
            .find(|&ancestor| self.class(ancestor).is_element())
    }

    /// Resolve and check the configured entry point.
    pub fn entry_point(&self, entry: &EntryPoint) -> Result<(ClassId, ClassId), ManifestError> {
        let root = self.resolve(&entry.class).map_err(|err| match err {
            Unresolved::Missing => ManifestError::UnresolvedType {
                class: format!("entry point {}", entry.function),
                reference: entry.class.clone(),
            },
            Unresolved::Ambiguous(candidates) => ManifestError::AmbiguousType {
                reference: entry.class.clone(),
                candidates,
            },
        })?;

        let element = self
            .element_ancestor(root)
            .ok_or_else(|| ManifestError::EntryNotAnElement(self.class(root).qualified_name()))?;

        if !self.class(root).is_instantiable() {
            return Err(ManifestError::Config(format!(
                "entry point class {} cannot be instantiated",
                self.class(root).qualified_name()
            )));
        }

        Ok((root, element))
    }
}

/// Names under which a class can be referenced: every suffix of its
/// qualified name that starts at a class segment, plus the full name.
fn spellings(class: &ClassDef) -> Vec<String> {
    let nested = class.nested_name();
    let segments: Vec<&str> = nested.split('.').collect();
    let mut spellings: Vec<String> = (0..segments.len())
        .map(|start| segments[start..].join("."))
        .collect();
    spellings.push(class.qualified_name());
    spellings.dedup();
    spellings
}

/// Compute each class's lineage, rejecting inheritance cycles.
fn linearize(classes: &[ClassDef], direct: &[Vec<usize>]) -> Result<Vec<Vec<usize>>, ManifestError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Active,
        Done,
    }

    fn visit(
        i: usize,
        classes: &[ClassDef],
        direct: &[Vec<usize>],
        marks: &mut [Mark],
        lineage: &mut [Vec<usize>],
    ) -> Result<(), ManifestError> {
        match marks[i] {
            Mark::Done => return Ok(()),
            Mark::Active => {
                return Err(ManifestError::InheritanceCycle(classes[i].qualified_name()));
            }
            Mark::New => {}
        }

        marks[i] = Mark::Active;
        let mut order = Vec::new();
        for &parent in &direct[i] {
            visit(parent, classes, direct, marks, lineage)?;
            for &ancestor in &lineage[parent] {
                if !order.contains(&ancestor) {
                    order.push(ancestor);
                }
            }
        }
        order.push(i);
        lineage[i] = order;
        marks[i] = Mark::Done;
        Ok(())
    }

    let mut marks = vec![Mark::New; classes.len()];
    let mut lineage = vec![Vec::new(); classes.len()];
    for i in 0..classes.len() {
        visit(i, classes, direct, &mut marks, &mut lineage)?;
    }
    Ok(lineage)
}
