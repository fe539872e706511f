//! # Compile Pipeline
//!
//! [`DeckEngine`] owns everything that outlives a single pass (the options
//! and the layout engine with its font cache) and runs the pipeline:
//!
//! ```text
//! DeckSpec → resolve → layout validation → quality → CompileReport
//! ```
//!
//! Independent engines share nothing, so several compiles can run at once
//! from separate instances.

use serde::Serialize;

use crate::autofix::{self, AutofixReport, ExternalFixer};
use crate::config::CompileOptions;
use crate::error::DeckError;
use crate::layout::LayoutEngine;
use crate::model::DeckSpec;
use crate::quality::{self, QualityReport};
use crate::resolve::{resolve_deck, ResolvedSlide};
use crate::validation::{count_severity, Severity, ValidationFinding};

/// Outcome of one compile pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileReport {
    /// No validation finding is an error.
    pub is_valid: bool,
    /// Valid and the quality profile passes.
    pub is_passing: bool,
    /// Resolution and layout findings, ordered by slide.
    pub findings: Vec<ValidationFinding>,
    pub quality: QualityReport,
    /// Resolved slides with their settled font sizes.
    pub slides: Vec<ResolvedSlide>,
}

impl CompileReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(|f| f.is_error())
    }

    pub fn error_count(&self) -> usize {
        count_severity(&self.findings, Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        count_severity(&self.findings, Severity::Warning)
    }

    /// Build gate: refuses while any error finding remains.
    pub fn ensure_buildable(&self) -> Result<(), DeckError> {
        let error_count = self.error_count();
        if error_count == 0 {
            return Ok(());
        }
        let summary = self
            .errors()
            .map(|f| format!("  - {}", f.summary()))
            .collect::<Vec<_>>()
            .join("\n");
        Err(DeckError::BuildBlocked {
            error_count,
            summary,
        })
    }
}

pub struct DeckEngine {
    options: CompileOptions,
    layout: LayoutEngine,
}

impl Default for DeckEngine {
    fn default() -> Self {
        Self::new(CompileOptions::default())
    }
}

impl DeckEngine {
    pub fn new(options: CompileOptions) -> Self {
        let layout = LayoutEngine::new(&options);
        Self { options, layout }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    /// Resolve, validate and grade a deck.
    pub fn compile(&self, spec: &DeckSpec) -> CompileReport {
        let resolution = resolve_deck(spec, &self.options);
        let mut slides = resolution.slides;
        let layout_findings = self.layout.validate(&spec.master.theme, &mut slides);

        let mut findings = resolution.findings;
        findings.extend(layout_findings);
        findings.sort_by_key(|f| f.slide_index);

        let quality = quality::evaluate(self.options.quality_profile, &slides, &findings);
        let is_valid = !findings.iter().any(ValidationFinding::is_error);
        let report = CompileReport {
            is_valid,
            is_passing: is_valid && quality.is_passing,
            findings,
            quality,
            slides,
        };

        tracing::info!(
            slides = spec.slides.len(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            quality = report.quality.profile.as_str(),
            passing = report.is_passing,
            "compiled deck"
        );
        report
    }

    /// Run the fix loop until the deck passes, stops improving, or the
    /// iteration budget runs out.
    pub fn autofix(&self, spec: &DeckSpec, fixer: Option<&dyn ExternalFixer>) -> AutofixReport {
        autofix::run(self, spec, fixer)
    }

    /// Drop every cached font. Useful for long-running processes.
    pub fn clear_font_cache(&self) {
        self.layout.clear_font_cache();
    }
}
