//! Structural Validation of Iterator Role Tags
//!
//! This crate checks a snapshot of declared program elements (classes,
//! interfaces, methods) against the structural rules of the Iterator design
//! pattern. Elements carry role tags:
//! - `@Iterator(T)` on a class that yields items of type `T`
//! - `@Iterator.CurrentItem`, `@Iterator.IsDone`, `@Iterator.NextItem` on its role methods
//! - `@IterableAggregate(I)` on a class that produces iterators of class `I`
//! - `@IterableAggregate.IteratorFactory` on the producing methods
//!
//! A pass runs the iterator rule set, then the iterable aggregate rule set,
//! and stops at the first element that fails a check.
//!
//! ```
//! use iterpat_validate::model::{SymbolSnapshot, Tag, TypeRef};
//! use iterpat_validate::{PassOutcome, Validator, ValidatorSettings};
//!
//! let mut b = SymbolSnapshot::builder();
//! let r = b.class("R");
//! b.tag(r, Tag::iterator(TypeRef::int()));
//! let current = b.method(r, "current", TypeRef::int());
//! b.tag(current, Tag::CurrentItem);
//! let done = b.method(r, "done", TypeRef::boolean());
//! b.tag(done, Tag::IsDone);
//! let next = b.method(r, "next", TypeRef::int());
//! b.tag(next, Tag::NextItem);
//! let snapshot = b.build()?;
//!
//! let report = Validator::new(ValidatorSettings::default()).validate(&snapshot)?;
//! assert_eq!(report.outcome, PassOutcome::Passed);
//! # Ok::<(), iterpat_validate::ValidationError>(())
//! ```

pub mod config;
pub mod context;
pub mod diagnostic;
pub mod logging;
pub mod model;
pub mod orchestrator;
pub mod primitives;
pub mod reporter;
pub mod rules;
pub mod violation;

pub use config::{OutputFormat, RuleSetToggles, ValidatorSettings};
pub use context::{PassContext, TagIndex};
pub use diagnostic::{Diagnostic, DiagnosticSink, Severity};
pub use model::{ElementId, ElementKind, Marker, SymbolModel, SymbolSnapshot};
pub use orchestrator::{PassOutcome, PassReport, PassState, Validator};
pub use reporter::Reporter;
pub use rules::{IterableAggregateRules, IteratorRules, RuleGroup, RuleSet};
pub use violation::{RuleViolation, Violation, ViolationCategory};

use thiserror::Error;

/// Result type for validation operations
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Failures outside the diagnostic channel: bad input files, bad
/// configuration, or a symbol model that breaks its contract
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid snapshot: {0}")]
    Snapshot(String),

    #[error("Unknown element {0}")]
    UnknownElement(ElementId),

    #[error("Element `{element}` is a {actual}, expected a {expected}")]
    WrongKind {
        element: String,
        expected: ElementKind,
        actual: ElementKind,
    },

    #[error("Element `{element}` has no {marker} payload")]
    MissingPayload { element: String, marker: Marker },

    #[error("Rule set `{rule_set}` has no checks for group {group:?}")]
    UnsupportedGroup {
        rule_set: &'static str,
        group: RuleGroup,
    },
}
