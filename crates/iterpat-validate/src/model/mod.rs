//! Symbol Model
//!
//! Read-only view of the declared program elements a validation pass runs
//! over. The host semantic engine owns the elements; rule sets only ever
//! query them through [`SymbolModel`]. [`SymbolSnapshot`] is the in-memory
//! implementation used by the command-line driver and the test-suite.
//!
//! Queries that break the contract between the engine and the rules
//! (unknown element, return type of a class, ...) fail with a
//! [`ValidationError`](crate::ValidationError) rather than a diagnostic.

pub mod element;
pub mod loader;
pub mod snapshot;
pub mod types;

pub use element::{Element, ElementId, ElementKind, IteratorOptions, Marker, Modifier, Tag};
pub use loader::SnapshotDocument;
pub use snapshot::{SnapshotBuilder, SymbolSnapshot};
pub use types::{PrimitiveType, TypeRef};

use crate::Result;

/// Interface consumed by the rule sets
pub trait SymbolModel {
    /// Elements carrying `marker`, in a stable listing order
    fn elements_tagged(&self, marker: Marker) -> Vec<ElementId>;

    fn kind_of(&self, element: ElementId) -> Result<ElementKind>;

    /// Simple name, used when rendering diagnostics
    fn name_of(&self, element: ElementId) -> Result<&str>;

    fn enclosing_of(&self, element: ElementId) -> Result<Option<ElementId>>;

    /// Directly enclosed elements in declaration order
    fn enclosed_of(&self, element: ElementId) -> Result<&[ElementId]>;

    fn modifiers_of(&self, element: ElementId) -> Result<&[Modifier]>;

    fn has_tag(&self, element: ElementId, marker: Marker) -> Result<bool>;

    /// Declared return type; fails if `method` is not a method
    fn return_type_of(&self, method: ElementId) -> Result<&TypeRef>;

    /// Number of declared parameters; fails if `method` is not a method
    fn parameter_count_of(&self, method: ElementId) -> Result<usize>;

    /// Type payload of `marker` on `element`, `None` if the tag is absent
    fn tag_payload(&self, element: ElementId, marker: Marker) -> Result<Option<&TypeRef>>;

    /// Options of the iterator tag on `element`, `None` if it is not tagged
    fn iterator_options(&self, element: ElementId) -> Result<Option<IteratorOptions>>;

    /// The declared element a type names, if the type is backed by one
    fn element_of_type(&self, ty: &TypeRef) -> Option<ElementId>;

    /// Can a value of type `from` be used where `to` is expected
    fn is_assignable(&self, from: &TypeRef, to: &TypeRef) -> bool;

    fn is_same_type(&self, a: &TypeRef, b: &TypeRef) -> bool {
        a == b
    }

    /// The primitive boolean type of the analyzed language
    fn boolean_type(&self) -> TypeRef {
        TypeRef::boolean()
    }
}
