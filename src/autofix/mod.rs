//! # Autofix Loop
//!
//! Compiles a deck, applies structural fixes for whatever keeps it from
//! passing, and compiles again:
//!
//! 1. Compile. Stop when the deck passes or the iteration budget is spent.
//! 2. Collect fix targets per slide: overflow errors first, then quality
//!    findings that fail the profile.
//! 3. Walk slides from last to first, applying at most one fix per slide,
//!    so slides inserted after slide `i` never shift a slide not yet
//!    visited.
//! 4. If nothing deterministic applied, ask the external fixer, if any.
//! 5. Stop when an iteration changes nothing.
//!
//! Fixes are only applied between compiles, so the final report always
//! describes the returned deck.

mod external;
mod fixes;

pub use external::{ExternalFixer, FixAction};
pub use fixes::{AppliedFix, FixKind, CONTINUED_SUFFIX, ELLIPSIS};

use std::collections::BTreeMap;

use serde::Serialize;

use crate::engine::{CompileReport, DeckEngine};
use crate::model::DeckSpec;
use crate::quality::{QualityCategory, QualityFinding};
use crate::validation::{FindingCategory, ValidationFinding};

use fixes::FixReason;

/// One compile pass of the loop and the fixes applied after it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutofixIteration {
    /// 1-based.
    pub iteration: usize,
    pub validation_errors: usize,
    pub quality_passing: bool,
    pub findings: Vec<ValidationFinding>,
    pub quality_findings: Vec<QualityFinding>,
    pub fixes: Vec<AppliedFix>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutofixReport {
    /// The fixed deck.
    pub spec: DeckSpec,
    pub is_passing: bool,
    pub iterations: Vec<AutofixIteration>,
    /// Compile report of the returned deck.
    pub report: CompileReport,
}

pub(crate) fn run(
    engine: &DeckEngine,
    spec: &DeckSpec,
    fixer: Option<&dyn ExternalFixer>,
) -> AutofixReport {
    let max_iterations = engine.options().max_iterations.max(1);
    let mut spec = spec.clone();
    let mut iterations = Vec::new();
    let mut iteration = 1;

    loop {
        let report = engine.compile(&spec);
        let mut record = AutofixIteration {
            iteration,
            validation_errors: report.error_count(),
            quality_passing: report.quality.is_passing,
            findings: report.findings.clone(),
            quality_findings: report.quality.findings.clone(),
            fixes: Vec::new(),
        };

        let done = report.is_passing || iteration >= max_iterations;
        if !done {
            record.fixes = apply_fixes(&mut spec, &report, fixer);
        }
        tracing::info!(
            iteration,
            errors = record.validation_errors,
            quality_passing = record.quality_passing,
            fixes = record.fixes.len(),
            "autofix iteration"
        );

        let stalled = record.fixes.is_empty();
        iterations.push(record);
        if done || stalled {
            return AutofixReport {
                spec,
                is_passing: report.is_passing,
                iterations,
                report,
            };
        }
        iteration += 1;
    }
}

fn apply_fixes(
    spec: &mut DeckSpec,
    report: &CompileReport,
    fixer: Option<&dyn ExternalFixer>,
) -> Vec<AppliedFix> {
    let mut applied = Vec::new();
    for (slide_index, targets) in fix_targets(report).iter().rev() {
        for (placeholder, reason) in targets {
            if let Some(fix) = fixes::apply(spec, *slide_index, placeholder, *reason) {
                applied.push(fix);
                break;
            }
        }
    }

    if applied.is_empty() {
        if let Some(fixer) = fixer {
            let actions = fixer.propose(spec, report);
            applied = external::apply_actions(spec, actions);
        }
    }
    applied
}

/// Placeholders to fix, per slide, in priority order.
fn fix_targets(report: &CompileReport) -> BTreeMap<usize, Vec<(String, FixReason)>> {
    let mut targets: BTreeMap<usize, Vec<(String, FixReason)>> = BTreeMap::new();

    let overflow_errors = report
        .findings
        .iter()
        .filter(|f| f.category == FindingCategory::Overflow && f.is_error());
    for f in overflow_errors {
        if let Some(ph) = &f.placeholder {
            targets
                .entry(f.slide_index)
                .or_default()
                .push((ph.clone(), FixReason::overflow(f.detail.as_ref())));
        }
    }

    let quality = report.quality.failing_findings().filter(|f| {
        matches!(
            f.category,
            QualityCategory::MinFontSize
                | QualityCategory::DiagramDensity
                | QualityCategory::DiagramReadability
        )
    });
    for f in quality {
        if let Some(ph) = &f.placeholder {
            targets
                .entry(f.slide_index)
                .or_default()
                .push((ph.clone(), FixReason::Quality(f.category)));
        }
    }
    targets
}
