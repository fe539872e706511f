//! Validation findings produced by resolution and layout.
//!
//! Findings are plain data. They accumulate over a compile pass in slide
//! order and are never mutated once pushed.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingCategory {
    Overflow,
    MarginOverflow,
    UnknownLayout,
    UnknownPlaceholder,
    MissingPlaceholder,
    FontNotFound,
    ImageNotFound,
}

impl FindingCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            FindingCategory::Overflow => "overflow",
            FindingCategory::MarginOverflow => "margin-overflow",
            FindingCategory::UnknownLayout => "unknown-layout",
            FindingCategory::UnknownPlaceholder => "unknown-placeholder",
            FindingCategory::MissingPlaceholder => "missing-placeholder",
            FindingCategory::FontNotFound => "font-not-found",
            FindingCategory::ImageNotFound => "image-not-found",
        }
    }
}

/// Machine-readable numbers behind an overflow finding. Heights are
/// inches, sizes are points.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverflowDetail {
    pub content_height: f64,
    pub available_height: f64,
    pub current_font_size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lines: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFinding {
    pub slide_index: usize,
    /// Absent for slide-level findings such as an unknown layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub severity: Severity,
    pub category: FindingCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<OverflowDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ValidationFinding {
    pub fn new(
        slide_index: usize,
        severity: Severity,
        category: FindingCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            slide_index,
            placeholder: None,
            severity,
            category,
            message: message.into(),
            detail: None,
            hint: None,
        }
    }

    pub fn error(slide_index: usize, category: FindingCategory, message: impl Into<String>) -> Self {
        Self::new(slide_index, Severity::Error, category, message)
    }

    pub fn warning(
        slide_index: usize,
        category: FindingCategory,
        message: impl Into<String>,
    ) -> Self {
        Self::new(slide_index, Severity::Warning, category, message)
    }

    pub fn info(slide_index: usize, category: FindingCategory, message: impl Into<String>) -> Self {
        Self::new(slide_index, Severity::Info, category, message)
    }

    pub fn at(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn with_detail(mut self, detail: OverflowDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// One-line rendering used in logs and the build gate summary.
    pub fn summary(&self) -> String {
        match &self.placeholder {
            Some(ph) => format!(
                "slide {} [{}] {} {}: {}",
                self.slide_index,
                ph,
                self.severity.as_str(),
                self.category.as_str(),
                self.message
            ),
            None => format!(
                "slide {} {} {}: {}",
                self.slide_index,
                self.severity.as_str(),
                self.category.as_str(),
                self.message
            ),
        }
    }
}

/// Count findings of one severity.
pub fn count_severity(findings: &[ValidationFinding], severity: Severity) -> usize {
    findings.iter().filter(|f| f.severity == severity).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_kebab_case_categories() {
        let f = ValidationFinding::warning(2, FindingCategory::MarginOverflow, "too far left")
            .at("body");
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["category"], "margin-overflow");
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["slideIndex"], 2);
        assert_eq!(json["placeholder"], "body");
        assert!(json.get("detail").is_none());
    }

    #[test]
    fn test_summary_includes_location() {
        let f = ValidationFinding::error(0, FindingCategory::UnknownLayout, "no layout 'x'");
        assert_eq!(f.summary(), "slide 0 error unknown-layout: no layout 'x'");
    }
}
