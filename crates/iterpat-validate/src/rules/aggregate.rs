//! IterableAggregate Rule Set
//!
//! A class tagged `@IterableAggregate` names an iterator class and exposes
//! at least one factory method for it. Factory methods may declare any
//! return type the named iterator is assignable to, so an interface return
//! type is accepted.

use super::{RuleGroup, RuleSet};
use crate::context::PassContext;
use crate::diagnostic::DiagnosticSink;
use crate::model::{ElementId, Marker};
use crate::primitives::{
    assert_at_least_one_tagged, assert_enclosed_within, assert_kind_is_class,
    assert_payload_tagged, assert_return_type_assignable_from, enclosing_of, payload_of,
};
use crate::{Result, ValidationError};

const GROUPS: &[RuleGroup] = &[
    RuleGroup::IterableAggregateClasses,
    RuleGroup::IteratorFactoryMethods,
];

#[derive(Debug, Clone, Copy, Default)]
pub struct IterableAggregateRules;

impl IterableAggregateRules {
    pub fn new() -> Self {
        Self
    }

    fn check_aggregate_class(
        ctx: &PassContext<'_>,
        sink: &mut DiagnosticSink,
        class: ElementId,
    ) -> Result<bool> {
        Ok(
            assert_kind_is_class(ctx, sink, class, Marker::IterableAggregate)?
                && assert_payload_tagged(
                    ctx,
                    sink,
                    class,
                    Marker::IterableAggregate,
                    Marker::Iterator,
                )?
                && assert_at_least_one_tagged(ctx, sink, Marker::IteratorFactory, class)?,
        )
    }

    fn check_factory_method(
        ctx: &PassContext<'_>,
        sink: &mut DiagnosticSink,
        method: ElementId,
    ) -> Result<bool> {
        if !assert_enclosed_within(
            ctx,
            sink,
            method,
            Marker::IteratorFactory,
            Marker::IterableAggregate,
        )? {
            return Ok(false);
        }
        let aggregate = enclosing_of(ctx, method)?;
        let iterator = payload_of(ctx, aggregate, Marker::IterableAggregate)?;
        sink.debug(format!("iterable aggregate value: {iterator}"), Some(aggregate));

        assert_return_type_assignable_from(ctx, sink, method, Marker::IteratorFactory, iterator)
    }
}

impl RuleSet for IterableAggregateRules {
    fn name(&self) -> &'static str {
        "iterable_aggregate"
    }

    fn description(&self) -> &'static str {
        "Iterable aggregate classes and their iterator factory methods"
    }

    fn groups(&self) -> &'static [RuleGroup] {
        GROUPS
    }

    fn check(
        &self,
        group: RuleGroup,
        element: ElementId,
        ctx: &PassContext<'_>,
        sink: &mut DiagnosticSink,
    ) -> Result<bool> {
        match group {
            RuleGroup::IterableAggregateClasses => Self::check_aggregate_class(ctx, sink, element),
            RuleGroup::IteratorFactoryMethods => Self::check_factory_method(ctx, sink, element),
            other => Err(ValidationError::UnsupportedGroup {
                rule_set: self.name(),
                group: other,
            }),
        }
    }
}
