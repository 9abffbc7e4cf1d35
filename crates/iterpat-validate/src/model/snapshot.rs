//! In-memory symbol snapshot

use super::element::{Element, ElementId, ElementKind, IteratorOptions, Marker, Modifier, Tag};
use super::types::{OBJECT_TYPE, PrimitiveType, TypeRef};
use super::SymbolModel;
use crate::{Result, ValidationError};
use std::collections::{HashMap, HashSet, VecDeque};

/// A named reference type and what it extends
#[derive(Debug, Clone)]
struct TypeDecl {
    supertypes: Vec<String>,
    element: Option<ElementId>,
}

/// Immutable arena of elements produced for one validation pass
#[derive(Debug, Clone)]
pub struct SymbolSnapshot {
    elements: Vec<Element>,
    roots: Vec<ElementId>,
    types: HashMap<String, TypeDecl>,
}

impl SymbolSnapshot {
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Top-level elements in declaration order
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    pub fn element(&self, id: ElementId) -> Result<&Element> {
        self.elements
            .get(id.0)
            .ok_or(ValidationError::UnknownElement(id))
    }

    /// First element with the given simple name
    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|e| e.name == name)
            .map(ElementId)
    }

    /// Dotted path from the outermost enclosing element, e.g. `Tree.TreeIterator.next`
    pub fn qualified_name(&self, id: ElementId) -> Result<String> {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(cursor) = current {
            let element = self.element(cursor)?;
            segments.push(element.name.as_str());
            current = element.enclosing;
        }
        segments.reverse();
        Ok(segments.join("."))
    }

    fn method(&self, id: ElementId) -> Result<&Element> {
        let element = self.element(id)?;
        if element.kind == ElementKind::Method {
            Ok(element)
        } else {
            Err(ValidationError::WrongKind {
                element: element.name.clone(),
                expected: ElementKind::Method,
                actual: element.kind,
            })
        }
    }

    fn supertypes_of(&self, name: &str) -> Vec<&str> {
        if let Some(decl) = self.types.get(name) {
            return decl.supertypes.iter().map(String::as_str).collect();
        }
        PrimitiveType::unboxed_from(name)
            .map(|p| p.boxed_supertypes().to_vec())
            .unwrap_or_default()
    }

    /// Reflexive, transitive subtyping over declared names
    fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        if sub == sup || sup == OBJECT_TYPE {
            return true;
        }

        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([sub]);
        while let Some(name) = queue.pop_front() {
            if !seen.insert(name) {
                continue;
            }
            for parent in self.supertypes_of(name) {
                if parent == sup {
                    return true;
                }
                queue.push_back(parent);
            }
        }
        false
    }
}

impl SymbolModel for SymbolSnapshot {
    fn elements_tagged(&self, marker: Marker) -> Vec<ElementId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.has_tag(marker))
            .map(|(i, _)| ElementId(i))
            .collect()
    }

    fn kind_of(&self, element: ElementId) -> Result<ElementKind> {
        Ok(self.element(element)?.kind)
    }

    fn name_of(&self, element: ElementId) -> Result<&str> {
        Ok(&self.element(element)?.name)
    }

    fn enclosing_of(&self, element: ElementId) -> Result<Option<ElementId>> {
        Ok(self.element(element)?.enclosing)
    }

    fn enclosed_of(&self, element: ElementId) -> Result<&[ElementId]> {
        Ok(&self.element(element)?.enclosed)
    }

    fn modifiers_of(&self, element: ElementId) -> Result<&[Modifier]> {
        Ok(&self.element(element)?.modifiers)
    }

    fn has_tag(&self, element: ElementId, marker: Marker) -> Result<bool> {
        Ok(self.element(element)?.has_tag(marker))
    }

    fn return_type_of(&self, method: ElementId) -> Result<&TypeRef> {
        let element = self.method(method)?;
        element
            .return_type
            .as_ref()
            .ok_or_else(|| {
                ValidationError::Snapshot(format!("method `{}` has no return type", element.name))
            })
    }

    fn parameter_count_of(&self, method: ElementId) -> Result<usize> {
        Ok(self.method(method)?.parameters.len())
    }

    fn tag_payload(&self, element: ElementId, marker: Marker) -> Result<Option<&TypeRef>> {
        Ok(self.element(element)?.tag(marker).and_then(Tag::payload))
    }

    fn iterator_options(&self, element: ElementId) -> Result<Option<IteratorOptions>> {
        Ok(match self.element(element)?.tag(Marker::Iterator) {
            Some(Tag::Iterator { options, .. }) => Some(*options),
            _ => None,
        })
    }

    fn element_of_type(&self, ty: &TypeRef) -> Option<ElementId> {
        self.types.get(ty.declared_name()?)?.element
    }

    fn is_assignable(&self, from: &TypeRef, to: &TypeRef) -> bool {
        match (from, to) {
            (TypeRef::Primitive(a), TypeRef::Primitive(b)) => a.widens_to(*b),
            (TypeRef::Primitive(a), TypeRef::Declared(b)) => a
                .boxed_name()
                .is_some_and(|boxed| self.is_subtype(boxed, b)),
            (TypeRef::Declared(a), TypeRef::Primitive(b)) => {
                PrimitiveType::unboxed_from(a).is_some_and(|p| p.widens_to(*b))
            }
            (TypeRef::Declared(a), TypeRef::Declared(b)) => self.is_subtype(a, b),
        }
    }
}

/// Incremental construction of a [`SymbolSnapshot`]
///
/// ```
/// use iterpat_validate::model::{SymbolSnapshot, Tag, TypeRef};
///
/// let mut builder = SymbolSnapshot::builder();
/// let range = builder.class("Range");
/// builder.tag(range, Tag::iterator(TypeRef::int()));
/// let next = builder.method(range, "next", TypeRef::int());
/// builder.tag(next, Tag::NextItem);
/// let snapshot = builder.build().unwrap();
/// assert_eq!(snapshot.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    elements: Vec<Element>,
    roots: Vec<ElementId>,
    extra_types: Vec<(String, Vec<String>)>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element, linking it under `enclosing` when given
    pub fn add(&mut self, mut element: Element, enclosing: Option<ElementId>) -> ElementId {
        let id = ElementId(self.elements.len());
        element.enclosing = enclosing;
        match enclosing.and_then(|parent| self.elements.get_mut(parent.0)) {
            Some(parent) => parent.enclosed.push(id),
            None => self.roots.push(id),
        }
        self.elements.push(element);
        id
    }

    /// Top-level class
    pub fn class(&mut self, name: &str) -> ElementId {
        self.add(Element::new(name, ElementKind::Class), None)
    }

    pub fn nested_class(&mut self, enclosing: ElementId, name: &str) -> ElementId {
        self.add(Element::new(name, ElementKind::Class), Some(enclosing))
    }

    /// Top-level interface
    pub fn interface(&mut self, name: &str) -> ElementId {
        self.add(Element::new(name, ElementKind::Interface), None)
    }

    pub fn method(&mut self, enclosing: ElementId, name: &str, return_type: TypeRef) -> ElementId {
        let mut element = Element::new(name, ElementKind::Method);
        element.return_type = Some(return_type);
        self.add(element, Some(enclosing))
    }

    pub fn tag(&mut self, id: ElementId, tag: Tag) -> &mut Self {
        if let Some(element) = self.elements.get_mut(id.0) {
            element.tags.push(tag);
        }
        self
    }

    pub fn modifier(&mut self, id: ElementId, modifier: Modifier) -> &mut Self {
        if let Some(element) = self.elements.get_mut(id.0) {
            element.modifiers.push(modifier);
        }
        self
    }

    pub fn parameter(&mut self, id: ElementId, ty: TypeRef) -> &mut Self {
        if let Some(element) = self.elements.get_mut(id.0) {
            element.parameters.push(ty);
        }
        self
    }

    pub fn supertype(&mut self, id: ElementId, name: &str) -> &mut Self {
        if let Some(element) = self.elements.get_mut(id.0) {
            element.supertypes.push(name.to_string());
        }
        self
    }

    /// Declare a reference type that has no element of its own (library types)
    pub fn declare_type(&mut self, name: &str, supertypes: &[&str]) -> &mut Self {
        self.extra_types.push((
            name.to_string(),
            supertypes.iter().map(ToString::to_string).collect(),
        ));
        self
    }

    /// Freeze the snapshot; type names must be unique
    pub fn build(self) -> Result<SymbolSnapshot> {
        let mut types: HashMap<String, TypeDecl> = HashMap::new();

        let from_elements = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.kind.declares_type())
            .map(|(i, e)| (e.name.clone(), e.supertypes.clone(), Some(ElementId(i))));
        let free = self
            .extra_types
            .into_iter()
            .map(|(name, supertypes)| (name, supertypes, None));

        for (name, supertypes, element) in from_elements.chain(free) {
            if types.contains_key(&name) {
                return Err(ValidationError::Snapshot(format!(
                    "type `{name}` is declared more than once"
                )));
            }
            types.insert(name, TypeDecl { supertypes, element });
        }

        Ok(SymbolSnapshot {
            elements: self.elements,
            roots: self.roots,
            types,
        })
    }
}
