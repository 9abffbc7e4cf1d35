//! Tests for the iterator rule set

use crate::test_utils::{codes, iterator_class, load_fixture, validate};
use iterpat_validate::model::{IteratorOptions, Modifier, SymbolSnapshot, Tag, TypeRef};
use iterpat_validate::{Marker, PassOutcome, RuleGroup, Severity};

fn escalating_iterator(item: TypeRef) -> Tag {
    Tag::Iterator {
        item,
        options: IteratorOptions {
            treat_warnings_as_errors: true,
        },
    }
}

#[test]
fn test_range_generator_passes() {
    let snapshot = load_fixture("range_generator.yaml");
    let report = validate(&snapshot);

    assert_eq!(report.outcome, PassOutcome::Passed);
    assert_eq!(report.count(Severity::Error), 0);
    assert_eq!(report.count(Severity::Warning), 0);
    assert_eq!(report.halted_at, None);
}

#[test]
fn test_missing_current_item() {
    let mut b = SymbolSnapshot::builder();
    let it = b.class("Broken");
    b.tag(it, Tag::iterator(TypeRef::int()));
    let done = b.method(it, "isDone", TypeRef::boolean());
    b.tag(done, Tag::IsDone);
    let next = b.method(it, "next", TypeRef::int());
    b.tag(next, Tag::NextItem);
    let snapshot = b.build().unwrap();

    let report = validate(&snapshot);
    let errors: Vec<_> = report.with_severity(Severity::Error).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code.as_deref(), Some("ITR002"));
    assert_eq!(
        errors[0].message,
        "An iterator must have a method tagged with @Iterator.CurrentItem"
    );
    assert_eq!(errors[0].location, Some(it));
    assert_eq!(report.halted_at, Some((RuleGroup::IteratorClasses, it)));
}

#[test]
fn test_duplicated_role_methods() {
    for marker in [Marker::CurrentItem, Marker::IsDone, Marker::NextItem] {
        let mut b = SymbolSnapshot::builder();
        let parts = iterator_class(&mut b, "Doubled", TypeRef::int());
        let extra = b.method(parts.class, "extra", TypeRef::int());
        let tag = match marker {
            Marker::CurrentItem => Tag::CurrentItem,
            Marker::IsDone => Tag::IsDone,
            _ => Tag::NextItem,
        };
        b.tag(extra, tag);
        let snapshot = b.build().unwrap();

        let report = validate(&snapshot);
        let errors: Vec<_> = report.with_severity(Severity::Error).collect();
        assert_eq!(errors.len(), 1, "one error for duplicated {marker}");
        assert_eq!(errors[0].code.as_deref(), Some("ITR003"));
        assert_eq!(
            errors[0].message,
            format!("An iterator must have only one method tagged with {marker}")
        );
        assert_eq!(errors[0].location, Some(parts.class));
    }
}

#[test]
fn test_iterator_on_interface() {
    let mut b = SymbolSnapshot::builder();
    let shape = b.interface("Shape");
    b.tag(shape, Tag::iterator(TypeRef::int()));
    let snapshot = b.build().unwrap();

    let report = validate(&snapshot);
    assert_eq!(codes(&report, Severity::Error), vec!["ITR001"]);
    assert_eq!(
        report.diagnostics.last().unwrap().message,
        "Only classes can be tagged with @Iterator"
    );
    // Halted inside the first group: only its note was emitted
    assert_eq!(report.count(Severity::Note), 1);
}

#[test]
fn test_is_done_must_return_boolean() {
    let mut b = SymbolSnapshot::builder();
    iterator_class(&mut b, "Counter", TypeRef::int());
    let bad = b.class("BadDone");
    b.tag(bad, Tag::iterator(TypeRef::int()));
    let current = b.method(bad, "current", TypeRef::int());
    b.tag(current, Tag::CurrentItem);
    let done = b.method(bad, "isDone", TypeRef::int());
    b.tag(done, Tag::IsDone);
    let next = b.method(bad, "next", TypeRef::int());
    b.tag(next, Tag::NextItem);
    let snapshot = b.build().unwrap();

    let report = validate(&snapshot);
    let errors: Vec<_> = report.with_severity(Severity::Error).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code.as_deref(), Some("ITR005"));
    assert_eq!(errors[0].location, Some(done));
    assert_eq!(
        errors[0].message,
        "The return type of the method tagged with @Iterator.IsDone is `int` but the iterator expects it to be `boolean`."
    );
    assert_eq!(report.halted_at, Some((RuleGroup::IsDoneMethods, done)));
}

#[test]
fn test_is_done_accepts_boxed_boolean() {
    let mut b = SymbolSnapshot::builder();
    let it = b.class("Boxed");
    b.tag(it, Tag::iterator(TypeRef::int()));
    let current = b.method(it, "current", TypeRef::int());
    b.tag(current, Tag::CurrentItem);
    let done = b.method(it, "isDone", TypeRef::declared("Boolean"));
    b.tag(done, Tag::IsDone);
    let next = b.method(it, "next", TypeRef::int());
    b.tag(next, Tag::NextItem);
    let snapshot = b.build().unwrap();

    assert!(validate(&snapshot).passed());
}

#[test]
fn test_current_item_return_type_mismatch() {
    let mut b = SymbolSnapshot::builder();
    let it = b.class("Words");
    b.tag(it, Tag::iterator(TypeRef::int()));
    let current = b.method(it, "current", TypeRef::declared("String"));
    b.tag(current, Tag::CurrentItem);
    let done = b.method(it, "isDone", TypeRef::boolean());
    b.tag(done, Tag::IsDone);
    let next = b.method(it, "next", TypeRef::int());
    b.tag(next, Tag::NextItem);
    let snapshot = b.build().unwrap();

    let report = validate(&snapshot);
    assert_eq!(codes(&report, Severity::Error), vec!["ITR005"]);
    assert_eq!(report.halted_at, Some((RuleGroup::CurrentItemMethods, current)));
}

#[test]
fn test_item_return_types_accept_widening_and_boxing() {
    for return_type in ["int", "long", "double", "Integer", "Number", "Object"] {
        let mut b = SymbolSnapshot::builder();
        let it = b.class("Loose");
        b.tag(it, Tag::iterator(TypeRef::int()));
        let current = b.method(it, "current", TypeRef::parse(return_type));
        b.tag(current, Tag::CurrentItem);
        let done = b.method(it, "isDone", TypeRef::boolean());
        b.tag(done, Tag::IsDone);
        let next = b.method(it, "next", TypeRef::parse(return_type));
        b.tag(next, Tag::NextItem);
        let snapshot = b.build().unwrap();

        assert!(validate(&snapshot).passed(), "int item returned as {return_type}");
    }
}

#[test]
fn test_narrowing_return_type_is_rejected() {
    let mut b = SymbolSnapshot::builder();
    let it = b.class("Narrow");
    b.tag(it, Tag::iterator(TypeRef::parse("long")));
    let current = b.method(it, "current", TypeRef::int());
    b.tag(current, Tag::CurrentItem);
    let done = b.method(it, "isDone", TypeRef::boolean());
    b.tag(done, Tag::IsDone);
    let next = b.method(it, "next", TypeRef::parse("long"));
    b.tag(next, Tag::NextItem);
    let snapshot = b.build().unwrap();

    assert_eq!(codes(&validate(&snapshot), Severity::Error), vec!["ITR005"]);
}

#[test]
fn test_role_methods_with_parameters() {
    let cases = [
        ("current", Marker::CurrentItem, RuleGroup::CurrentItemMethods),
        ("isDone", Marker::IsDone, RuleGroup::IsDoneMethods),
        ("next", Marker::NextItem, RuleGroup::NextItemMethods),
    ];
    for (name, marker, group) in cases {
        let mut b = SymbolSnapshot::builder();
        let parts = iterator_class(&mut b, "Params", TypeRef::int());
        let method = match name {
            "current" => parts.current,
            "isDone" => parts.done,
            _ => parts.next,
        };
        b.parameter(method, TypeRef::int());
        let snapshot = b.build().unwrap();

        let report = validate(&snapshot);
        let errors: Vec<_> = report.with_severity(Severity::Error).collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code.as_deref(), Some("ITR006"));
        assert_eq!(
            errors[0].message,
            format!("A method tagged with {marker} must not take any parameters")
        );
        assert_eq!(report.halted_at, Some((group, method)));
    }
}

#[test]
fn test_private_next_item_is_a_warning() {
    let snapshot = load_fixture("private_next_item.yaml");
    let report = validate(&snapshot);

    assert_eq!(report.outcome, PassOutcome::Passed);
    assert_eq!(report.count(Severity::Error), 0);
    assert_eq!(codes(&report, Severity::Warning), vec!["ITR007"]);
    let warning = report.with_severity(Severity::Warning).next().unwrap();
    assert_eq!(
        warning.message,
        "A method tagged with @Iterator.NextItem was found to be private"
    );
    assert_eq!(warning.location, snapshot.find("next"));
}

#[test]
fn test_private_is_done_is_a_warning() {
    let mut b = SymbolSnapshot::builder();
    let parts = iterator_class(&mut b, "Countdown", TypeRef::int());
    b.modifier(parts.done, Modifier::Private);
    let snapshot = b.build().unwrap();

    let report = validate(&snapshot);
    assert!(report.passed());
    assert_eq!(report.halted_at, None);
    assert_eq!(report.count(Severity::Error), 0);
    assert_eq!(codes(&report, Severity::Warning), vec!["ITR007"]);
    let warning = report.with_severity(Severity::Warning).next().unwrap();
    assert_eq!(
        warning.message,
        "A method tagged with @Iterator.IsDone was found to be private"
    );
    assert_eq!(warning.location, Some(parts.done));
}

#[test]
fn test_private_role_methods_escalated() {
    for marker in [Marker::IsDone, Marker::NextItem] {
        let mut b = SymbolSnapshot::builder();
        let it = b.class("Strict");
        b.tag(it, escalating_iterator(TypeRef::int()));
        let current = b.method(it, "current", TypeRef::int());
        b.tag(current, Tag::CurrentItem);
        let done = b.method(it, "isDone", TypeRef::boolean());
        b.tag(done, Tag::IsDone);
        let next = b.method(it, "next", TypeRef::int());
        b.tag(next, Tag::NextItem);
        let private = if marker == Marker::IsDone { done } else { next };
        b.modifier(private, Modifier::Private);
        let snapshot = b.build().unwrap();

        let report = validate(&snapshot);
        assert_eq!(report.outcome, PassOutcome::Failed);
        assert_eq!(codes(&report, Severity::Error), vec!["ITR007"]);
        assert_eq!(report.count(Severity::Warning), 0);
        assert_eq!(report.halted_at.map(|(_, e)| e), Some(private));
    }
}

#[test]
fn test_escalation_is_scoped_to_its_iterator() {
    let mut b = SymbolSnapshot::builder();
    let strict = b.class("Strict");
    b.tag(strict, escalating_iterator(TypeRef::int()));
    let roles = [
        ("current", Tag::CurrentItem),
        ("isDone", Tag::IsDone),
        ("next", Tag::NextItem),
    ];
    for (name, tag) in roles {
        let ty = if name == "isDone" { TypeRef::boolean() } else { TypeRef::int() };
        let m = b.method(strict, name, ty);
        b.tag(m, tag);
    }
    let lenient = iterator_class(&mut b, "Lenient", TypeRef::int());
    b.modifier(lenient.next, Modifier::Private);
    let snapshot = b.build().unwrap();

    let report = validate(&snapshot);
    assert!(report.passed());
    assert_eq!(codes(&report, Severity::Warning), vec!["ITR007"]);
}

#[test]
fn test_private_current_item_is_not_reported() {
    let mut b = SymbolSnapshot::builder();
    let parts = iterator_class(&mut b, "Hidden", TypeRef::int());
    b.modifier(parts.current, Modifier::Private);
    let snapshot = b.build().unwrap();

    let report = validate(&snapshot);
    assert!(report.passed());
    assert_eq!(report.count(Severity::Warning), 0);
}

#[test]
fn test_role_method_outside_iterator() {
    let mut b = SymbolSnapshot::builder();
    let plain = b.class("Plain");
    let current = b.method(plain, "current", TypeRef::int());
    b.tag(current, Tag::CurrentItem);
    let snapshot = b.build().unwrap();

    let report = validate(&snapshot);
    let errors: Vec<_> = report.with_severity(Severity::Error).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code.as_deref(), Some("ITR004"));
    assert_eq!(
        errors[0].message,
        "A method tagged with @Iterator.CurrentItem must be part of a class tagged with @Iterator"
    );
    assert_eq!(errors[0].location, Some(current));
}

#[test]
fn test_first_failure_halts_the_pass() {
    let mut b = SymbolSnapshot::builder();
    let first = b.interface("First");
    b.tag(first, Tag::iterator(TypeRef::int()));
    let second = b.interface("Second");
    b.tag(second, Tag::iterator(TypeRef::int()));
    let snapshot = b.build().unwrap();

    let report = validate(&snapshot);
    assert_eq!(report.count(Severity::Error), 1);
    assert_eq!(report.halted_at, Some((RuleGroup::IteratorClasses, first)));
}
