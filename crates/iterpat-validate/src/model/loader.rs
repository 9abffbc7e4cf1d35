//! Snapshot documents
//!
//! Loads a [`SymbolSnapshot`] from a YAML or JSON description of the
//! program, so the validator can be driven without a host compiler.
//!
//! # Example Document
//!
//! ```yaml
//! types:
//!   - name: Iterator
//! elements:
//!   - name: RangeGenerator
//!     kind: class
//!     tags:
//!       - iterator: { item: int }
//!     members:
//!       - name: currentValue
//!         kind: method
//!         modifiers: [public]
//!         return_type: int
//!         tags: [current_item]
//! ```

use super::element::{Element, ElementId, ElementKind, IteratorOptions, Modifier, Tag};
use super::snapshot::{SnapshotBuilder, SymbolSnapshot};
use super::types::TypeRef;
use crate::{Result, ValidationError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Root of a snapshot document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotDocument {
    /// Library types referenced by the elements but not declared by them
    #[serde(default)]
    pub types: Vec<TypeDecl>,

    /// Top-level elements
    #[serde(default)]
    pub elements: Vec<ElementDecl>,
}

/// A free-standing reference type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub supertypes: Vec<String>,
}

/// One declared element and its members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementDecl {
    pub name: String,
    pub kind: ElementKind,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub supertypes: Vec<String>,
    /// Methods only; `void` when omitted
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
    /// Either `- current_item` or `- iterator: { item: int }`; the map form
    /// needs the singleton-map adapter under serde_yaml
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub tags: Vec<TagDecl>,
    #[serde(default)]
    pub members: Vec<ElementDecl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// Tag as written in a document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagDecl {
    Iterator {
        item: String,
        #[serde(default)]
        treat_warnings_as_errors: bool,
    },
    CurrentItem,
    IsDone,
    NextItem,
    IterableAggregate {
        iterator: String,
    },
    IteratorFactory,
}

impl From<&TagDecl> for Tag {
    fn from(decl: &TagDecl) -> Self {
        match decl {
            TagDecl::Iterator {
                item,
                treat_warnings_as_errors,
            } => Tag::Iterator {
                item: TypeRef::parse(item),
                options: IteratorOptions {
                    treat_warnings_as_errors: *treat_warnings_as_errors,
                },
            },
            TagDecl::CurrentItem => Tag::CurrentItem,
            TagDecl::IsDone => Tag::IsDone,
            TagDecl::NextItem => Tag::NextItem,
            TagDecl::IterableAggregate { iterator } => Tag::IterableAggregate {
                iterator: TypeRef::parse(iterator),
            },
            TagDecl::IteratorFactory => Tag::IteratorFactory,
        }
    }
}

impl SnapshotDocument {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a document, choosing the format from the file extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        debug!(path = %path.display(), json = is_json, "Loading snapshot document");
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Build the snapshot this document describes
    pub fn into_snapshot(self) -> Result<SymbolSnapshot> {
        let mut builder = SnapshotBuilder::new();
        for ty in &self.types {
            let supertypes: Vec<&str> = ty.supertypes.iter().map(String::as_str).collect();
            builder.declare_type(&ty.name, &supertypes);
        }
        for decl in &self.elements {
            add_element(&mut builder, decl, None)?;
        }
        builder.build()
    }
}

fn add_element(
    builder: &mut SnapshotBuilder,
    decl: &ElementDecl,
    enclosing: Option<ElementId>,
) -> Result<ElementId> {
    if decl.name.trim().is_empty() {
        return Err(ValidationError::Snapshot(
            "element with an empty name".to_string(),
        ));
    }
    let has_signature = decl.return_type.is_some() || !decl.parameters.is_empty();
    if decl.kind != ElementKind::Method && has_signature {
        return Err(ValidationError::Snapshot(format!(
            "{} `{}` declares a return type or parameters",
            decl.kind, decl.name
        )));
    }

    let mut element = Element::new(decl.name.clone(), decl.kind);
    element.modifiers.clone_from(&decl.modifiers);
    element.supertypes.clone_from(&decl.supertypes);
    element.tags = decl.tags.iter().map(Tag::from).collect();
    if decl.kind == ElementKind::Method {
        element.return_type = Some(
            decl.return_type
                .as_deref()
                .map_or_else(TypeRef::void, TypeRef::parse),
        );
        element.parameters = decl.parameters.iter().map(|p| TypeRef::parse(&p.ty)).collect();
    }

    let id = builder.add(element, enclosing);
    for member in &decl.members {
        add_element(builder, member, Some(id))?;
    }
    Ok(id)
}

impl SymbolSnapshot {
    /// Parse a YAML document straight into a snapshot
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        SnapshotDocument::from_yaml_str(content)?.into_snapshot()
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        SnapshotDocument::from_json_str(content)?.into_snapshot()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        SnapshotDocument::load(path)?.into_snapshot()
    }
}
