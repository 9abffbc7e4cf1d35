//! Iterator Rule Set
//!
//! A class tagged `@Iterator` must hold exactly one method each for the
//! current item, the done test and the next item. Role methods take no
//! parameters and return the iterator's item type (or `boolean` for the
//! done test). Private done/next methods are reported as mandatory
//! warnings, escalated by the class's `treat_warnings_as_errors` option.

use super::{RuleGroup, RuleSet};
use crate::context::PassContext;
use crate::diagnostic::DiagnosticSink;
use crate::model::{ElementId, Marker};
use crate::primitives::{
    assert_boolean_assignable_return_type, assert_enclosed_within, assert_exactly_one_tagged,
    assert_kind_is_class, assert_return_type_assignable_from, assert_zero_parameters, enclosing_of,
    payload_of, warn_if_private,
};
use crate::{Result, ValidationError};

const GROUPS: &[RuleGroup] = &[
    RuleGroup::IteratorClasses,
    RuleGroup::CurrentItemMethods,
    RuleGroup::IsDoneMethods,
    RuleGroup::NextItemMethods,
];

#[derive(Debug, Clone, Copy, Default)]
pub struct IteratorRules;

impl IteratorRules {
    pub fn new() -> Self {
        Self
    }

    fn check_iterator_class(
        ctx: &PassContext<'_>,
        sink: &mut DiagnosticSink,
        class: ElementId,
    ) -> Result<bool> {
        Ok(assert_kind_is_class(ctx, sink, class, Marker::Iterator)?
            && assert_exactly_one_tagged(ctx, sink, Marker::CurrentItem, class)?
            && assert_exactly_one_tagged(ctx, sink, Marker::IsDone, class)?
            && assert_exactly_one_tagged(ctx, sink, Marker::NextItem, class)?)
    }

    /// `CurrentItem` and `NextItem` share everything but the privacy advisory
    fn check_item_method(
        ctx: &PassContext<'_>,
        sink: &mut DiagnosticSink,
        method: ElementId,
        marker: Marker,
    ) -> Result<bool> {
        if !assert_enclosed_within(ctx, sink, method, marker, Marker::Iterator)? {
            return Ok(false);
        }
        let iterator = enclosing_of(ctx, method)?;
        let item = payload_of(ctx, iterator, Marker::Iterator)?;
        sink.debug(format!("iterator item type: {item}"), Some(iterator));

        Ok(assert_return_type_assignable_from(ctx, sink, method, marker, item)?
            && assert_zero_parameters(ctx, sink, method, marker)?)
    }

    fn check_is_done_method(
        ctx: &PassContext<'_>,
        sink: &mut DiagnosticSink,
        method: ElementId,
    ) -> Result<bool> {
        Ok(
            assert_enclosed_within(ctx, sink, method, Marker::IsDone, Marker::Iterator)?
                && assert_boolean_assignable_return_type(ctx, sink, method, Marker::IsDone)?
                && assert_zero_parameters(ctx, sink, method, Marker::IsDone)?
                && Self::check_visibility(ctx, sink, method, Marker::IsDone)?,
        )
    }

    fn check_next_item_method(
        ctx: &PassContext<'_>,
        sink: &mut DiagnosticSink,
        method: ElementId,
    ) -> Result<bool> {
        Ok(Self::check_item_method(ctx, sink, method, Marker::NextItem)?
            && Self::check_visibility(ctx, sink, method, Marker::NextItem)?)
    }

    /// Escalation is read from the enclosing iterator, never from a global default
    fn check_visibility(
        ctx: &PassContext<'_>,
        sink: &mut DiagnosticSink,
        method: ElementId,
        marker: Marker,
    ) -> Result<bool> {
        let iterator = enclosing_of(ctx, method)?;
        let escalate = ctx
            .model
            .iterator_options(iterator)?
            .unwrap_or_default()
            .treat_warnings_as_errors;
        sink.debug(format!("treat warnings as errors: {escalate}"), Some(iterator));
        Ok(warn_if_private(ctx, sink, method, marker, escalate)?.allows_continue())
    }
}

impl RuleSet for IteratorRules {
    fn name(&self) -> &'static str {
        "iterator"
    }

    fn description(&self) -> &'static str {
        "Iterator classes and their current-item, is-done and next-item methods"
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
            RuleGroup::IteratorClasses => Self::check_iterator_class(ctx, sink, element),
            RuleGroup::CurrentItemMethods => {
                Self::check_item_method(ctx, sink, element, Marker::CurrentItem)
            }
            RuleGroup::IsDoneMethods => Self::check_is_done_method(ctx, sink, element),
            RuleGroup::NextItemMethods => Self::check_next_item_method(ctx, sink, element),
            other => Err(ValidationError::UnsupportedGroup {
                rule_set: self.name(),
                group: other,
            }),
        }
    }
}
