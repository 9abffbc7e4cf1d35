//! Program elements and their role tags

use super::types::TypeRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an element inside one snapshot
///
/// Ids are only meaningful for the snapshot that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of a declared element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Class,
    Interface,
    Method,
    Field,
    Other,
}

impl ElementKind {
    /// Kinds that introduce a named type
    pub fn declares_type(self) -> bool {
        matches!(self, Self::Class | Self::Interface)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Interface => write!(f, "interface"),
            Self::Method => write!(f, "method"),
            Self::Field => write!(f, "field"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Visibility and other declaration modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
}

/// Tag identity, used as a lookup key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Marker {
    Iterator,
    CurrentItem,
    IsDone,
    NextItem,
    IterableAggregate,
    IteratorFactory,
}

impl Marker {
    /// Every marker the validator recognizes
    pub const ALL: [Self; 6] = [
        Self::Iterator,
        Self::CurrentItem,
        Self::IsDone,
        Self::NextItem,
        Self::IterableAggregate,
        Self::IteratorFactory,
    ];

    /// Qualified tag name as written in source
    pub fn tag_name(self) -> &'static str {
        match self {
            Self::Iterator => "Iterator",
            Self::CurrentItem => "Iterator.CurrentItem",
            Self::IsDone => "Iterator.IsDone",
            Self::NextItem => "Iterator.NextItem",
            Self::IterableAggregate => "IterableAggregate",
            Self::IteratorFactory => "IterableAggregate.IteratorFactory",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.tag_name())
    }
}

/// Options carried alongside an iterator tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IteratorOptions {
    /// Raise errors instead of warnings for private `IsDone` / `NextItem` methods
    #[serde(default)]
    pub treat_warnings_as_errors: bool,
}

/// A role tag attached to an element, with its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Iterator { item: TypeRef, options: IteratorOptions },
    CurrentItem,
    IsDone,
    NextItem,
    IterableAggregate { iterator: TypeRef },
    IteratorFactory,
}

impl Tag {
    /// Iterator tag with default options
    pub fn iterator(item: TypeRef) -> Self {
        Self::Iterator {
            item,
            options: IteratorOptions::default(),
        }
    }

    pub fn iterable_aggregate(iterator: TypeRef) -> Self {
        Self::IterableAggregate { iterator }
    }

    pub fn marker(&self) -> Marker {
        match self {
            Self::Iterator { .. } => Marker::Iterator,
            Self::CurrentItem => Marker::CurrentItem,
            Self::IsDone => Marker::IsDone,
            Self::NextItem => Marker::NextItem,
            Self::IterableAggregate { .. } => Marker::IterableAggregate,
            Self::IteratorFactory => Marker::IteratorFactory,
        }
    }

    /// Type payload of the tag, if it carries one
    pub fn payload(&self) -> Option<&TypeRef> {
        match self {
            Self::Iterator { item, .. } => Some(item),
            Self::IterableAggregate { iterator } => Some(iterator),
            _ => None,
        }
    }
}

/// A declared program element
#[derive(Debug, Clone)]
pub struct Element {
    pub name: String,
    pub kind: ElementKind,
    pub enclosing: Option<ElementId>,
    pub enclosed: Vec<ElementId>,
    pub modifiers: Vec<Modifier>,
    /// Declared supertypes (classes and interfaces only)
    pub supertypes: Vec<String>,
    /// Declared return type (methods only)
    pub return_type: Option<TypeRef>,
    /// Declared parameter types, in order (methods only)
    pub parameters: Vec<TypeRef>,
    pub tags: Vec<Tag>,
}

impl Element {
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            enclosing: None,
            enclosed: Vec::new(),
            modifiers: Vec::new(),
            supertypes: Vec::new(),
            return_type: None,
            parameters: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn tag(&self, marker: Marker) -> Option<&Tag> {
        self.tags.iter().find(|t| t.marker() == marker)
    }

    pub fn has_tag(&self, marker: Marker) -> bool {
        self.tag(marker).is_some()
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}
