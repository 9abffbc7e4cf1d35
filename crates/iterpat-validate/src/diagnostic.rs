//! Diagnostic Sink
//!
//! Accumulates the outcome of a validation pass. Rule checks hand
//! diagnostics to the sink as soon as a condition is detected; the sink
//! applies the severity policy:
//!
//! - `Error`, `Warning` and `Note` are recorded verbatim
//! - `MandatoryWarning` becomes `Error` when the current escalation scope
//!   is set, `Warning` otherwise
//! - `Debug` is recorded only when the sink was created with debug output on

use crate::model::ElementId;
use crate::violation::Violation;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, info, trace, warn};

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Error,
    /// Request for a warning that a per-check policy may escalate to `Error`
    MandatoryWarning,
    Warning,
    Note,
    Debug,
}

impl Severity {
    /// Does a recorded diagnostic of this severity fail the pass
    pub fn fails_pass(self) -> bool {
        self == Self::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "ERROR"),
            Self::MandatoryWarning => write!(f, "MANDATORY_WARNING"),
            Self::Warning => write!(f, "WARNING"),
            Self::Note => write!(f, "NOTE"),
            Self::Debug => write!(f, "DEBUG"),
        }
    }
}

/// One validation outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Element the diagnostic points at, if any
    pub location: Option<ElementId>,
    /// Id of the violation that produced it (e.g. `ITR002`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Suggested fix carried over from the violation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        message: impl Into<String>,
        location: Option<ElementId>,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            location,
            code: None,
            suggestion: None,
        }
    }

    pub fn error(message: impl Into<String>, location: Option<ElementId>) -> Self {
        Self::new(Severity::Error, message, location)
    }

    pub fn mandatory_warning(message: impl Into<String>, location: ElementId) -> Self {
        Self::new(Severity::MandatoryWarning, message, Some(location))
    }

    pub fn warning(message: impl Into<String>, location: Option<ElementId>) -> Self {
        Self::new(Severity::Warning, message, location)
    }

    pub fn note(message: impl Into<String>, location: Option<ElementId>) -> Self {
        Self::new(Severity::Note, message, location)
    }

    /// Build from a rule violation, keeping its id
    pub fn from_violation(violation: &dyn Violation) -> Self {
        Self {
            severity: violation.severity(),
            message: violation.message(),
            location: violation.element(),
            code: Some(violation.id().to_string()),
            suggestion: violation.suggestion(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "[{}] {}: {}", self.severity, code, self.message),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}

/// Synchronous diagnostic accumulator for a single pass
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    debug: bool,
    escalate: bool,
}

impl DiagnosticSink {
    pub fn new(debug: bool) -> Self {
        Self {
            diagnostics: Vec::new(),
            debug,
            escalate: false,
        }
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    /// Record a diagnostic, applying the escalation and debug policies
    pub fn report(&mut self, mut diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::MandatoryWarning => {
                diagnostic.severity = if self.escalate {
                    Severity::Error
                } else {
                    Severity::Warning
                };
            }
            Severity::Debug if !self.debug => return,
            _ => {}
        }

        match diagnostic.severity {
            Severity::Error => error!(location = ?diagnostic.location, "{}", diagnostic.message),
            Severity::Warning | Severity::MandatoryWarning => {
                warn!(location = ?diagnostic.location, "{}", diagnostic.message);
            }
            Severity::Note => info!("{}", diagnostic.message),
            Severity::Debug => debug!(location = ?diagnostic.location, "{}", diagnostic.message),
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn report_violation(&mut self, violation: &dyn Violation) {
        self.report(Diagnostic::from_violation(violation));
    }

    pub fn note(&mut self, message: impl Into<String>) {
        self.report(Diagnostic::note(message, None));
    }

    /// Debug output; dropped unless debug is on
    pub fn debug(&mut self, message: impl Into<String>, location: Option<ElementId>) {
        let message: String = message.into();
        if self.debug {
            self.report(Diagnostic::new(
                Severity::Debug,
                format!("[DEBUG] {message}"),
                location,
            ));
        } else {
            trace!(location = ?location, "{message}");
        }
    }

    /// Run `check` with mandatory warnings escalated according to `escalate`
    ///
    /// The previous escalation state is restored afterwards.
    pub fn with_escalation<R>(&mut self, escalate: bool, check: impl FnOnce(&mut Self) -> R) -> R {
        let previous = std::mem::replace(&mut self.escalate, escalate);
        let result = check(self);
        self.escalate = previous;
        result
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.fails_pass())
    }
}
