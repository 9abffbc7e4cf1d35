//! Validation Report Generation
//!
//! Renders a [`PassReport`] in three formats:
//! - Human-readable for terminal output
//! - JSON for tooling
//! - GitHub Actions annotations for CI
//!
//! Element ids are resolved to dotted names through the symbol model, so a
//! report must be rendered against the model it was produced from.

use crate::config::OutputFormat;
use crate::diagnostic::Severity;
use crate::model::{ElementId, SymbolModel};
use crate::orchestrator::PassReport;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Report with locations resolved, ready to print
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedReport {
    /// Timestamp of the validation run
    pub timestamp: String,
    /// Snapshot file the pass ran over, if any
    pub source: Option<String>,
    pub summary: ReportSummary,
    pub diagnostics: Vec<RenderedDiagnostic>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub errors: usize,
    pub warnings: usize,
    pub notes: usize,
    /// `"@Marker on Element"` when the pass stopped early
    pub halted_at: Option<String>,
    /// Whether validation passed (no error-level diagnostics)
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedDiagnostic {
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
    /// Dotted element name, e.g. `Tree.TreeIterator.next`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Dotted path of `element` from its outermost enclosing element
///
/// Falls back to the raw id when the model does not know the element.
pub fn element_path(model: &dyn SymbolModel, element: ElementId) -> String {
    let mut segments = Vec::new();
    let mut current = Some(element);
    while let Some(cursor) = current {
        let (Ok(name), Ok(enclosing)) = (model.name_of(cursor), model.enclosing_of(cursor)) else {
            return element.to_string();
        };
        segments.push(name);
        current = enclosing;
    }
    segments.reverse();
    segments.join(".")
}

/// Report generator
pub struct Reporter;

impl Reporter {
    /// Resolve locations and stamp the report
    pub fn render(
        report: &PassReport,
        model: &dyn SymbolModel,
        source: Option<&str>,
    ) -> RenderedReport {
        let diagnostics = report
            .diagnostics
            .iter()
            .map(|d| RenderedDiagnostic {
                severity: d.severity,
                code: d.code.clone(),
                message: d.message.clone(),
                element: d.location.map(|id| element_path(model, id)),
                suggestion: d.suggestion.clone(),
            })
            .collect();

        RenderedReport {
            timestamp: chrono::Utc::now().to_rfc3339(),
            source: source.map(str::to_string),
            summary: ReportSummary {
                errors: report.count(Severity::Error),
                warnings: report.count(Severity::Warning),
                notes: report.count(Severity::Note),
                halted_at: report
                    .halted_at
                    .map(|(group, id)| format!("{group} on {}", element_path(model, id))),
                passed: report.passed(),
            },
            diagnostics,
        }
    }

    /// Render in the requested format
    pub fn format(report: &RenderedReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Human => Self::to_human_readable(report),
            OutputFormat::Json => Self::to_json(report),
            OutputFormat::Ci => Self::to_ci(report),
        }
    }

    /// Generate JSON report
    pub fn to_json(report: &RenderedReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Generate human-readable report
    pub fn to_human_readable(report: &RenderedReport) -> String {
        let mut output = String::new();

        output.push_str("=== Iterator Pattern Validation Report ===\n\n");
        let _ = writeln!(output, "Timestamp: {}", report.timestamp);
        if let Some(source) = &report.source {
            let _ = writeln!(output, "Snapshot:  {source}");
        }
        output.push('\n');

        for d in &report.diagnostics {
            let _ = write!(output, "[{}]", d.severity);
            if let Some(code) = &d.code {
                let _ = write!(output, " {code}");
            }
            if let Some(element) = &d.element {
                let _ = write!(output, " {element}:");
            }
            let _ = writeln!(output, " {}", d.message);
            if let Some(suggestion) = &d.suggestion {
                let _ = writeln!(output, "    -> {suggestion}");
            }
        }
        if !report.diagnostics.is_empty() {
            output.push('\n');
        }

        output.push_str("--- Summary ---\n");
        let _ = writeln!(output, "  Errors:   {}", report.summary.errors);
        let _ = writeln!(output, "  Warnings: {}", report.summary.warnings);
        if let Some(halted) = &report.summary.halted_at {
            let _ = writeln!(output, "  Halted:   {halted}");
        }
        output.push('\n');

        if report.summary.passed {
            output.push_str("Status: PASSED\n");
        } else {
            output.push_str("Status: FAILED\n");
        }
        output
    }

    /// Generate GitHub Actions annotations plus a summary line
    pub fn to_ci(report: &RenderedReport) -> String {
        let mut output = String::new();
        for d in &report.diagnostics {
            let command = match d.severity {
                Severity::Error => "error",
                Severity::Warning | Severity::MandatoryWarning => "warning",
                Severity::Note | Severity::Debug => continue,
            };
            let title = d.code.as_deref().unwrap_or("iterpat");
            match &d.element {
                Some(element) => {
                    let _ = writeln!(output, "::{command} title={title}::{element}: {}", d.message);
                }
                None => {
                    let _ = writeln!(output, "::{command} title={title}::{}", d.message);
                }
            }
        }
        let status = if report.summary.passed { "PASSED" } else { "FAILED" };
        let _ = writeln!(
            output,
            "Iterator pattern validation {status}: {} error(s), {} warning(s)",
            report.summary.errors, report.summary.warnings
        );
        output
    }
}
