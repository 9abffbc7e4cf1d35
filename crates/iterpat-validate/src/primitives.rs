//! Rule Primitives
//!
//! Small assertions shared by both rule sets. Each one reports a
//! diagnostic through the sink when its condition fails and returns
//! whether processing of the current element may continue. `Err` is
//! reserved for contract breaches of the symbol model.

use crate::context::PassContext;
use crate::diagnostic::DiagnosticSink;
use crate::model::{ElementId, ElementKind, Marker, Modifier, TypeRef};
use crate::violation::RuleViolation;
use crate::{Result, ValidationError};

/// Outcome of the visibility advisory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivacyCheck {
    /// Not private
    Pass,
    /// Private, reported as a warning
    WarnOnly,
    /// Private, reported as an error
    Escalated,
}

impl PrivacyCheck {
    pub fn allows_continue(self) -> bool {
        !matches!(self, Self::Escalated)
    }
}

fn fail(sink: &mut DiagnosticSink, violation: &RuleViolation) -> bool {
    sink.report_violation(violation);
    false
}

/// `element` must be a class to carry `marker`
pub fn assert_kind_is_class(
    ctx: &PassContext<'_>,
    sink: &mut DiagnosticSink,
    element: ElementId,
    marker: Marker,
) -> Result<bool> {
    let kind = ctx.model.kind_of(element)?;
    if kind == ElementKind::Class {
        return Ok(true);
    }
    Ok(fail(
        sink,
        &RuleViolation::NotAClass {
            element,
            kind,
            marker,
        },
    ))
}

/// Number of elements directly enclosed by `owner` that carry `marker`
pub fn count_enclosed_tagged(
    ctx: &PassContext<'_>,
    owner: ElementId,
    marker: Marker,
) -> Result<usize> {
    Ok(ctx
        .model
        .enclosed_of(owner)?
        .iter()
        .filter(|e| ctx.tags.contains(marker, **e))
        .count())
}

pub fn assert_exactly_one_tagged(
    ctx: &PassContext<'_>,
    sink: &mut DiagnosticSink,
    marker: Marker,
    owner: ElementId,
) -> Result<bool> {
    let count = count_enclosed_tagged(ctx, owner, marker)?;
    sink.debug(
        format!("Found {count} element(s) tagged with {marker} within iterator"),
        Some(owner),
    );
    Ok(match count {
        1 => true,
        0 => fail(sink, &RuleViolation::RoleMethodMissing { owner, marker }),
        count => fail(
            sink,
            &RuleViolation::RoleMethodDuplicated {
                owner,
                marker,
                count,
            },
        ),
    })
}

pub fn assert_at_least_one_tagged(
    ctx: &PassContext<'_>,
    sink: &mut DiagnosticSink,
    marker: Marker,
    owner: ElementId,
) -> Result<bool> {
    let count = count_enclosed_tagged(ctx, owner, marker)?;
    if count > 0 {
        sink.debug(
            format!("Found {count} element(s) tagged with {marker} within iterable aggregate"),
            Some(owner),
        );
        return Ok(true);
    }
    Ok(fail(sink, &RuleViolation::FactoryMissing { owner, marker }))
}

/// The element directly enclosing `element` must carry `required`
pub fn assert_enclosed_within(
    ctx: &PassContext<'_>,
    sink: &mut DiagnosticSink,
    element: ElementId,
    marker: Marker,
    required: Marker,
) -> Result<bool> {
    let enclosing = ctx.model.enclosing_of(element)?;
    if enclosing.is_some_and(|e| ctx.tags.contains(required, e)) {
        return Ok(true);
    }
    Ok(fail(
        sink,
        &RuleViolation::NotEnclosed {
            method: element,
            marker,
            required,
        },
    ))
}

/// `source` must be assignable to the return type of `method`
pub fn assert_return_type_assignable_from(
    ctx: &PassContext<'_>,
    sink: &mut DiagnosticSink,
    method: ElementId,
    marker: Marker,
    source: &TypeRef,
) -> Result<bool> {
    let actual = ctx.model.return_type_of(method)?;
    if ctx.model.is_assignable(source, actual) {
        return Ok(true);
    }
    Ok(fail(
        sink,
        &RuleViolation::ReturnTypeMismatch {
            method,
            marker,
            actual: actual.clone(),
            expected: source.clone(),
        },
    ))
}

/// The return type of `method` must be assignable to the primitive boolean
pub fn assert_boolean_assignable_return_type(
    ctx: &PassContext<'_>,
    sink: &mut DiagnosticSink,
    method: ElementId,
    marker: Marker,
) -> Result<bool> {
    let actual = ctx.model.return_type_of(method)?;
    let boolean = ctx.model.boolean_type();
    if ctx.model.is_assignable(actual, &boolean) {
        return Ok(true);
    }
    Ok(fail(
        sink,
        &RuleViolation::ReturnTypeMismatch {
            method,
            marker,
            actual: actual.clone(),
            expected: boolean,
        },
    ))
}

pub fn assert_zero_parameters(
    ctx: &PassContext<'_>,
    sink: &mut DiagnosticSink,
    method: ElementId,
    marker: Marker,
) -> Result<bool> {
    let count = ctx.model.parameter_count_of(method)?;
    if count == 0 {
        return Ok(true);
    }
    Ok(fail(
        sink,
        &RuleViolation::ParametersDeclared {
            method,
            marker,
            count,
        },
    ))
}

/// Report a private `method` as a mandatory warning, escalated per `escalate`
pub fn warn_if_private(
    ctx: &PassContext<'_>,
    sink: &mut DiagnosticSink,
    method: ElementId,
    marker: Marker,
    escalate: bool,
) -> Result<PrivacyCheck> {
    if !ctx.model.modifiers_of(method)?.contains(&Modifier::Private) {
        return Ok(PrivacyCheck::Pass);
    }
    sink.with_escalation(escalate, |s| {
        s.report_violation(&RuleViolation::PrivateRoleMethod { method, marker });
    });
    Ok(if escalate {
        PrivacyCheck::Escalated
    } else {
        PrivacyCheck::WarnOnly
    })
}

/// The type named by `marker`'s payload on `element` must be an element carrying `required`
///
/// Failures are reported without a location.
pub fn assert_payload_tagged(
    ctx: &PassContext<'_>,
    sink: &mut DiagnosticSink,
    element: ElementId,
    marker: Marker,
    required: Marker,
) -> Result<bool> {
    let payload = payload_of(ctx, element, marker)?;
    let target = ctx.model.element_of_type(payload);
    if target.is_some_and(|t| ctx.tags.contains(required, t)) {
        return Ok(true);
    }
    Ok(fail(
        sink,
        &RuleViolation::PayloadNotIterator {
            payload: payload.clone(),
        },
    ))
}

/// Payload of `marker` on `element`; its absence is a contract breach
pub fn payload_of<'a>(
    ctx: &PassContext<'a>,
    element: ElementId,
    marker: Marker,
) -> Result<&'a TypeRef> {
    ctx.model
        .tag_payload(element, marker)?
        .ok_or_else(|| ValidationError::MissingPayload {
            element: ctx
                .model
                .name_of(element)
                .map_or_else(|_| element.to_string(), ToString::to_string),
            marker,
        })
}

/// Enclosing element of an already-checked role method
pub fn enclosing_of(ctx: &PassContext<'_>, element: ElementId) -> Result<ElementId> {
    ctx.model
        .enclosing_of(element)?
        .ok_or_else(|| {
            ValidationError::Snapshot(format!("element {element} has no enclosing element"))
        })
}
