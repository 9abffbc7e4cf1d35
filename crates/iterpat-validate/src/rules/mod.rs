//! Rule Sets
//!
//! A rule set owns an ordered list of groups; each group visits every
//! element carrying one marker and runs a short-circuiting chain of
//! primitives over it.

pub mod aggregate;
pub mod iterator;

pub use aggregate::IterableAggregateRules;
pub use iterator::IteratorRules;

use crate::Result;
use crate::context::PassContext;
use crate::diagnostic::DiagnosticSink;
use crate::model::{ElementId, Marker};
use serde::Serialize;
use std::fmt;

/// One group of checks, visited in a fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RuleGroup {
    IteratorClasses,
    CurrentItemMethods,
    IsDoneMethods,
    NextItemMethods,
    IterableAggregateClasses,
    IteratorFactoryMethods,
}

impl RuleGroup {
    /// Marker whose elements this group visits
    pub fn marker(self) -> Marker {
        match self {
            Self::IteratorClasses => Marker::Iterator,
            Self::CurrentItemMethods => Marker::CurrentItem,
            Self::IsDoneMethods => Marker::IsDone,
            Self::NextItemMethods => Marker::NextItem,
            Self::IterableAggregateClasses => Marker::IterableAggregate,
            Self::IteratorFactoryMethods => Marker::IteratorFactory,
        }
    }
}

impl fmt::Display for RuleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.marker())
    }
}

/// All rule sets implement this trait
pub trait RuleSet: Send + Sync {
    /// Unique name, also the configuration key
    fn name(&self) -> &'static str;

    /// Description of what this rule set checks
    fn description(&self) -> &'static str {
        ""
    }

    /// Groups in the order they must run
    fn groups(&self) -> &'static [RuleGroup];

    /// Check one element of `group`; `Ok(false)` halts the pass
    fn check(
        &self,
        group: RuleGroup,
        element: ElementId,
        ctx: &PassContext<'_>,
        sink: &mut DiagnosticSink,
    ) -> Result<bool>;
}
