//! Validation Orchestrator
//!
//! Runs the enabled rule sets over a symbol model in a fixed order: iterator
//! groups first, then iterable aggregate groups. Within a group, elements
//! are visited in the model's listing order. The first element whose check
//! fails halts the whole pass; later groups and rule sets are not visited.

use crate::Result;
use crate::config::{ValidatorSettings, debug_enabled};
use crate::context::PassContext;
use crate::diagnostic::{Diagnostic, DiagnosticSink, Severity};
use crate::model::{ElementId, SymbolModel};
use crate::rules::{IterableAggregateRules, IteratorRules, RuleGroup, RuleSet};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Progress of one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    Running,
    /// A check failed on `element` while running `group`
    Halted { group: RuleGroup, element: ElementId },
}

impl PassState {
    fn halt(&mut self, group: RuleGroup, element: ElementId) {
        *self = Self::Halted { group, element };
    }

    pub fn is_running(self) -> bool {
        self == Self::Running
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PassOutcome {
    Passed,
    Failed,
}

/// Everything a pass produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub outcome: PassOutcome,
    /// Group and element the pass stopped at, if it stopped early
    pub halted_at: Option<(RuleGroup, ElementId)>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PassReport {
    pub fn passed(&self) -> bool {
        self.outcome == PassOutcome::Passed
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Diagnostics of the given severity, in emission order
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
    }
}

/// Runs registered rule sets over a symbol model
pub struct Validator {
    settings: ValidatorSettings,
    rule_sets: Vec<Box<dyn RuleSet>>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidatorSettings::default())
    }
}

impl Validator {
    /// Validator with the iterator and iterable aggregate rule sets, in that order
    pub fn new(settings: ValidatorSettings) -> Self {
        Self {
            settings,
            rule_sets: vec![
                Box::new(IteratorRules::new()),
                Box::new(IterableAggregateRules::new()),
            ],
        }
    }

    /// Validator without any rule set
    pub fn empty(settings: ValidatorSettings) -> Self {
        Self {
            settings,
            rule_sets: Vec::new(),
        }
    }

    /// Append a rule set; it runs after the ones already registered
    pub fn with_rule_set(mut self, rule_set: Box<dyn RuleSet>) -> Self {
        self.rule_sets.push(rule_set);
        self
    }

    pub fn settings(&self) -> &ValidatorSettings {
        &self.settings
    }

    /// Names of the rule sets that will run
    pub fn enabled_rule_sets(&self) -> Vec<&'static str> {
        self.rule_sets
            .iter()
            .map(|r| r.name())
            .filter(|name| self.settings.rule_sets.is_enabled(name))
            .collect()
    }

    /// Run one pass
    ///
    /// `Debug` diagnostics are recorded when either the settings or the
    /// process-wide flag ask for them. `Err` means the model broke its contract; rule failures are reported
    /// through the returned diagnostics.
    pub fn validate(&self, model: &dyn SymbolModel) -> Result<PassReport> {
        let ctx = PassContext::new(model);
        let mut sink = DiagnosticSink::new(self.settings.debug || debug_enabled());
        let mut state = PassState::Running;

        for rule_set in &self.rule_sets {
            if !state.is_running() {
                break;
            }
            if !self.settings.rule_sets.is_enabled(rule_set.name()) {
                debug!(rule_set = rule_set.name(), "Rule set disabled, skipping");
                continue;
            }
            Self::run_rule_set(rule_set.as_ref(), &ctx, &mut sink, &mut state)?;
        }

        let halted_at = match state {
            PassState::Running => None,
            PassState::Halted { group, element } => Some((group, element)),
        };
        let outcome = if halted_at.is_some() || sink.has_errors() {
            PassOutcome::Failed
        } else {
            PassOutcome::Passed
        };
        info!(
            outcome = ?outcome,
            errors = sink.count(Severity::Error),
            warnings = sink.count(Severity::Warning),
            "Validation pass finished"
        );

        Ok(PassReport {
            outcome,
            halted_at,
            diagnostics: sink.into_diagnostics(),
        })
    }

    fn run_rule_set(
        rule_set: &dyn RuleSet,
        ctx: &PassContext<'_>,
        sink: &mut DiagnosticSink,
        state: &mut PassState,
    ) -> Result<()> {
        debug!(rule_set = rule_set.name(), "Running rule set");
        for &group in rule_set.groups() {
            let marker = group.marker();
            sink.note(format!("Processing elements tagged with {marker}"));

            for &element in ctx.tags.elements(marker) {
                let name = ctx.model.name_of(element)?;
                sink.debug(format!("Processing: {name}"), Some(element));
                let ok = rule_set.check(group, element, ctx, sink)?;
                sink.debug(format!("Processing successful: {ok}"), Some(element));

                if !ok {
                    warn!(group = ?group, element = %element, "Check failed, halting pass");
                    state.halt(group, element);
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}
