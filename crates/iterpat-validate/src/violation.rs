//! Rule Violations
//!
//! Every structural condition the rule sets can report, with a stable id
//! per condition. Diagnostics are built from these so that message text
//! lives in one place.

use crate::diagnostic::Severity;
use crate::model::{ElementId, ElementKind, Marker, TypeRef};
use serde::Serialize;
use std::fmt::{self, Display};

/// Category of violation for grouping in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViolationCategory {
    /// `@Iterator` and its role methods
    Iterator,
    /// `@IterableAggregate` and its factory methods
    IterableAggregate,
}

impl ViolationCategory {
    pub fn of(marker: Marker) -> Self {
        match marker {
            Marker::Iterator | Marker::CurrentItem | Marker::IsDone | Marker::NextItem => {
                Self::Iterator
            }
            Marker::IterableAggregate | Marker::IteratorFactory => Self::IterableAggregate,
        }
    }

    /// How the rules refer to a tagged class of this category
    fn owner_noun(self) -> &'static str {
        match self {
            Self::Iterator => "iterator",
            Self::IterableAggregate => "iterable aggregate",
        }
    }
}

impl Display for ViolationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iterator => write!(f, "Iterator"),
            Self::IterableAggregate => write!(f, "IterableAggregate"),
        }
    }
}

/// Generic violation trait
pub trait Violation: Display + Send + Sync {
    /// Unique violation ID (e.g., "ITR001", "AGG002")
    fn id(&self) -> &str;

    /// Category for grouping in reports
    fn category(&self) -> ViolationCategory;

    /// Requested severity; `MandatoryWarning` may still be escalated by the sink
    fn severity(&self) -> Severity;

    /// Element the violation points at
    fn element(&self) -> Option<ElementId>;

    /// Human-readable message describing the violation
    fn message(&self) -> String {
        self.to_string()
    }

    /// Suggested fix for the violation (if applicable)
    fn suggestion(&self) -> Option<String> {
        None
    }
}

/// Violations raised by the rule primitives
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RuleViolation {
    NotAClass {
        element: ElementId,
        kind: ElementKind,
        marker: Marker,
    },
    RoleMethodMissing {
        owner: ElementId,
        marker: Marker,
    },
    RoleMethodDuplicated {
        owner: ElementId,
        marker: Marker,
        count: usize,
    },
    FactoryMissing {
        owner: ElementId,
        marker: Marker,
    },
    NotEnclosed {
        method: ElementId,
        marker: Marker,
        required: Marker,
    },
    ReturnTypeMismatch {
        method: ElementId,
        marker: Marker,
        actual: TypeRef,
        expected: TypeRef,
    },
    ParametersDeclared {
        method: ElementId,
        marker: Marker,
        count: usize,
    },
    PrivateRoleMethod {
        method: ElementId,
        marker: Marker,
    },
    /// Reported without a location
    PayloadNotIterator {
        payload: TypeRef,
    },
}

impl RuleViolation {
    fn marker(&self) -> Marker {
        match self {
            Self::NotAClass { marker, .. }
            | Self::RoleMethodMissing { marker, .. }
            | Self::RoleMethodDuplicated { marker, .. }
            | Self::FactoryMissing { marker, .. }
            | Self::NotEnclosed { marker, .. }
            | Self::ReturnTypeMismatch { marker, .. }
            | Self::ParametersDeclared { marker, .. }
            | Self::PrivateRoleMethod { marker, .. } => *marker,
            Self::PayloadNotIterator { .. } => Marker::IterableAggregate,
        }
    }
}

impl Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAClass { marker, .. } => {
                write!(f, "Only classes can be tagged with {marker}")
            }
            Self::RoleMethodMissing { marker, .. } => {
                write!(f, "An iterator must have a method tagged with {marker}")
            }
            Self::RoleMethodDuplicated { marker, .. } => {
                write!(f, "An iterator must have only one method tagged with {marker}")
            }
            Self::FactoryMissing { marker, .. } => write!(
                f,
                "An iterable aggregate must have at least one method tagged with {marker}"
            ),
            Self::NotEnclosed {
                marker, required, ..
            } => write!(
                f,
                "A method tagged with {marker} must be part of a class tagged with {required}"
            ),
            Self::ReturnTypeMismatch {
                marker,
                actual,
                expected,
                ..
            } => write!(
                f,
                "The return type of the method tagged with {marker} is `{actual}` but the {} expects it to be `{expected}`.",
                ViolationCategory::of(*marker).owner_noun()
            ),
            Self::ParametersDeclared { marker, .. } => {
                write!(f, "A method tagged with {marker} must not take any parameters")
            }
            Self::PrivateRoleMethod { marker, .. } => {
                write!(f, "A method tagged with {marker} was found to be private")
            }
            Self::PayloadNotIterator { payload } => write!(
                f,
                "`{payload}` is not an iterator. Value of {} must be a class tagged with {}.",
                Marker::IterableAggregate,
                Marker::Iterator
            ),
        }
    }
}

impl Violation for RuleViolation {
    fn id(&self) -> &str {
        match self {
            Self::NotAClass { marker, .. } => match ViolationCategory::of(*marker) {
                ViolationCategory::Iterator => "ITR001",
                ViolationCategory::IterableAggregate => "AGG001",
            },
            Self::RoleMethodMissing { .. } => "ITR002",
            Self::RoleMethodDuplicated { .. } => "ITR003",
            Self::NotEnclosed { marker, .. } => match ViolationCategory::of(*marker) {
                ViolationCategory::Iterator => "ITR004",
                ViolationCategory::IterableAggregate => "AGG004",
            },
            Self::ReturnTypeMismatch { marker, .. } => match ViolationCategory::of(*marker) {
                ViolationCategory::Iterator => "ITR005",
                ViolationCategory::IterableAggregate => "AGG005",
            },
            Self::ParametersDeclared { .. } => "ITR006",
            Self::PrivateRoleMethod { .. } => "ITR007",
            Self::PayloadNotIterator { .. } => "AGG002",
            Self::FactoryMissing { .. } => "AGG003",
        }
    }

    fn category(&self) -> ViolationCategory {
        ViolationCategory::of(self.marker())
    }

    fn severity(&self) -> Severity {
        match self {
            Self::PrivateRoleMethod { .. } => Severity::MandatoryWarning,
            _ => Severity::Error,
        }
    }

    fn element(&self) -> Option<ElementId> {
        match self {
            Self::NotAClass { element, .. } => Some(*element),
            Self::RoleMethodMissing { owner, .. }
            | Self::RoleMethodDuplicated { owner, .. }
            | Self::FactoryMissing { owner, .. } => Some(*owner),
            Self::NotEnclosed { method, .. }
            | Self::ReturnTypeMismatch { method, .. }
            | Self::ParametersDeclared { method, .. }
            | Self::PrivateRoleMethod { method, .. } => Some(*method),
            Self::PayloadNotIterator { .. } => None,
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Self::NotAClass { marker, .. } => {
                Some(format!("Move {marker} to a concrete class declaration"))
            }
            Self::RoleMethodDuplicated { marker, .. } => {
                Some(format!("Keep {marker} on exactly one method"))
            }
            Self::ReturnTypeMismatch { expected, .. } => {
                Some(format!("Declare a return type that accepts `{expected}`"))
            }
            Self::ParametersDeclared { .. } => Some("Remove the method parameters".to_string()),
            Self::PrivateRoleMethod { .. } => {
                Some("Make the method visible to the iterator's consumers".to_string())
            }
            _ => None,
        }
    }
}
