//! # Quality Report
//!
//! A second severity ladder on top of validation. Validation asks "can this
//! be built"; quality asks "should it be shipped". Which severities fail the
//! report depends on the profile:
//!
//! | profile    | body min | title min | diagram nodes | diagram min | fails on        |
//! |------------|----------|-----------|---------------|-------------|-----------------|
//! | `draft`    | 8pt      | 14pt      | 60            | 6pt         | nothing         |
//! | `standard` | 10pt     | 18pt      | 30            | 8pt         | errors          |
//! | `strict`   | 12pt     | 24pt      | 20            | 10pt        | errors, warnings|

use serde::Serialize;

use crate::config::QualityProfile;
use crate::diagram;
use crate::model::{Block, ContentValue, DiagramContent};
use crate::resolve::{ResolvedElement, ResolvedSlide};
use crate::text::POINTS_PER_INCH;
use crate::validation::{FindingCategory, Severity, ValidationFinding};

/// Below this fraction of a minimum, a small font is an error.
const SEVERE_FONT_RATIO: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileThresholds {
    pub min_body_font_size: f64,
    pub min_title_font_size: f64,
    pub max_diagram_nodes: usize,
    pub min_diagram_font_size: f64,
    pub fail_on_error: bool,
    pub fail_on_warning: bool,
}

impl QualityProfile {
    pub fn thresholds(self) -> ProfileThresholds {
        match self {
            QualityProfile::Draft => ProfileThresholds {
                min_body_font_size: 8.0,
                min_title_font_size: 14.0,
                max_diagram_nodes: 60,
                min_diagram_font_size: 6.0,
                fail_on_error: false,
                fail_on_warning: false,
            },
            QualityProfile::Standard => ProfileThresholds {
                min_body_font_size: 10.0,
                min_title_font_size: 18.0,
                max_diagram_nodes: 30,
                min_diagram_font_size: 8.0,
                fail_on_error: true,
                fail_on_warning: false,
            },
            QualityProfile::Strict => ProfileThresholds {
                min_body_font_size: 12.0,
                min_title_font_size: 24.0,
                max_diagram_nodes: 20,
                min_diagram_font_size: 10.0,
                fail_on_error: true,
                fail_on_warning: true,
            },
        }
    }

    /// Whether a finding of `severity` fails this profile.
    pub fn fails_on(self, severity: Severity) -> bool {
        let t = self.thresholds();
        match severity {
            Severity::Error => t.fail_on_error,
            Severity::Warning => t.fail_on_warning,
            Severity::Info => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityCategory {
    MinFontSize,
    DiagramDensity,
    DiagramReadability,
    MissingRequired,
}

/// Measured value against the profile threshold it was compared with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityDetail {
    pub actual: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityFinding {
    pub slide_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub severity: Severity,
    pub category: QualityCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<QualityDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub profile: QualityProfile,
    pub is_passing: bool,
    pub findings: Vec<QualityFinding>,
    pub failing_reasons: Vec<String>,
}

impl QualityReport {
    /// Findings whose severity fails the report's profile.
    pub fn failing_findings(&self) -> impl Iterator<Item = &QualityFinding> {
        let profile = self.profile;
        self.findings
            .iter()
            .filter(move |f| profile.fails_on(f.severity))
    }
}

/// Grade resolved slides (after layout) and their validation findings.
pub fn evaluate(
    profile: QualityProfile,
    slides: &[ResolvedSlide],
    validation: &[ValidationFinding],
) -> QualityReport {
    let t = profile.thresholds();
    let mut findings = Vec::new();

    for slide in slides {
        for element in &slide.elements {
            match &element.content {
                ContentValue::Block(Block::Image(_)) => {}
                ContentValue::Block(Block::Diagram(d)) => check_diagram(&t, element, d, &mut findings),
                _ => check_font_size(&t, element, &mut findings),
            }
        }
    }

    for f in validation
        .iter()
        .filter(|f| f.category == FindingCategory::MissingPlaceholder)
    {
        findings.push(QualityFinding {
            slide_index: f.slide_index,
            placeholder: f.placeholder.clone(),
            severity: Severity::Error,
            category: QualityCategory::MissingRequired,
            message: f.message.clone(),
            detail: None,
        });
    }
    findings.sort_by_key(|f| f.slide_index);

    let errors = findings.iter().filter(|f| f.severity == Severity::Error).count();
    let warnings = findings.iter().filter(|f| f.severity == Severity::Warning).count();
    let mut failing_reasons = Vec::new();
    if t.fail_on_error && errors > 0 {
        failing_reasons.push(format!("{errors} quality error(s) under profile {}", profile.as_str()));
    }
    if t.fail_on_warning && warnings > 0 {
        failing_reasons.push(format!(
            "{warnings} quality warning(s) under profile {}",
            profile.as_str()
        ));
    }

    QualityReport {
        profile,
        is_passing: failing_reasons.is_empty(),
        findings,
        failing_reasons,
    }
}

fn check_font_size(t: &ProfileThresholds, element: &ResolvedElement, out: &mut Vec<QualityFinding>) {
    let (minimum, role) = if element.placeholder.kind.is_title_like() {
        (t.min_title_font_size, "title")
    } else {
        (t.min_body_font_size, "body")
    };
    let size = element.computed_font_size;
    if size >= minimum {
        return;
    }
    let severity = if size < minimum * SEVERE_FONT_RATIO {
        Severity::Error
    } else {
        Severity::Warning
    };
    out.push(QualityFinding {
        slide_index: element.slide_index,
        placeholder: Some(element.name().to_string()),
        severity,
        category: QualityCategory::MinFontSize,
        message: format!("Font size {size}pt is below the {minimum}pt {role} minimum"),
        detail: Some(QualityDetail {
            actual: size,
            threshold: minimum,
        }),
    });
}

fn check_diagram(
    t: &ProfileThresholds,
    element: &ResolvedElement,
    diagram: &DiagramContent,
    out: &mut Vec<QualityFinding>,
) {
    let nodes = diagram
        .hints
        .node_count
        .or_else(|| diagram::graph_stats(&diagram.source).map(|s| s.node_count));
    if let Some(nodes) = nodes {
        let max = t.max_diagram_nodes;
        if nodes > max {
            out.push(QualityFinding {
                slide_index: element.slide_index,
                placeholder: Some(element.name().to_string()),
                severity: if nodes > 2 * max {
                    Severity::Error
                } else {
                    Severity::Warning
                },
                category: QualityCategory::DiagramDensity,
                message: format!("Diagram has {nodes} nodes; at most {max} read well"),
                detail: Some(QualityDetail {
                    actual: nodes as f64,
                    threshold: max as f64,
                }),
            });
        }
    }

    if let Some(estimated) = diagram.hints.estimated_min_font_size {
        let rect = element.placeholder.rect;
        let scale = match diagram.hints.view_box {
            Some(vb) if vb.width > 0.0 && vb.height > 0.0 => f64::min(
                rect.width * POINTS_PER_INCH / vb.width,
                rect.height * POINTS_PER_INCH / vb.height,
            ),
            _ => 1.0,
        };
        let effective = estimated * scale;
        if effective < t.min_diagram_font_size {
            out.push(QualityFinding {
                slide_index: element.slide_index,
                placeholder: Some(element.name().to_string()),
                severity: Severity::Warning,
                category: QualityCategory::DiagramReadability,
                message: format!(
                    "Smallest diagram label renders at {effective:.1}pt; minimum is {}pt",
                    t.min_diagram_font_size
                ),
                detail: Some(QualityDetail {
                    actual: effective,
                    threshold: t.min_diagram_font_size,
                }),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DiagramHints, PlaceholderDef, PlaceholderType, Rect, ViewBox};
    use crate::style::{ResolvedStyle, TextAlign, TextStyle};

    fn element(kind: PlaceholderType, content: ContentValue, size: f64) -> ResolvedElement {
        ResolvedElement {
            slide_index: 0,
            placeholder: PlaceholderDef {
                name: "ph".into(),
                kind,
                rect: Rect::new(1.0, 1.0, 8.0, 4.5),
                style: TextStyle::default(),
                constraints: None,
                required: false,
            },
            content,
            style: ResolvedStyle {
                font_family: "Helvetica".into(),
                font_size: size,
                bold: false,
                italic: false,
                color: "#000".into(),
                line_spacing: 1.2,
                align: TextAlign::Left,
            },
            computed_font_size: size,
        }
    }

    fn slide(elements: Vec<ResolvedElement>) -> Vec<ResolvedSlide> {
        vec![ResolvedSlide {
            index: 0,
            layout: "l".into(),
            elements,
        }]
    }

    #[test]
    fn test_draft_never_fails() {
        let slides = slide(vec![element(PlaceholderType::Body, ContentValue::text("x"), 4.0)]);
        let report = evaluate(QualityProfile::Draft, &slides, &[]);
        assert_eq!(report.findings[0].severity, Severity::Error);
        assert!(report.is_passing);
    }

    #[test]
    fn test_small_body_font_severity() {
        let slides = slide(vec![
            element(PlaceholderType::Body, ContentValue::text("x"), 9.0),
            element(PlaceholderType::Body, ContentValue::text("x"), 7.0),
        ]);
        let report = evaluate(QualityProfile::Standard, &slides, &[]);
        let severities: Vec<_> = report.findings.iter().map(|f| f.severity).collect();
        assert_eq!(severities, vec![Severity::Warning, Severity::Error]);
        assert!(!report.is_passing);
        assert_eq!(report.failing_reasons, vec!["1 quality error(s) under profile standard"]);
    }

    #[test]
    fn test_strict_fails_on_warnings() {
        let slides = slide(vec![element(PlaceholderType::Title, ContentValue::text("x"), 20.0)]);
        assert!(evaluate(QualityProfile::Standard, &slides, &[]).is_passing);
        let strict = evaluate(QualityProfile::Strict, &slides, &[]);
        assert!(!strict.is_passing);
        assert_eq!(strict.findings[0].category, QualityCategory::MinFontSize);
    }

    #[test]
    fn test_diagram_density_and_readability() {
        let content = ContentValue::Block(Block::Diagram(DiagramContent {
            source: "flowchart TD\n".into(),
            hints: DiagramHints {
                node_count: Some(45),
                edge_count: None,
                estimated_min_font_size: Some(12.0),
                view_box: Some(ViewBox {
                    width: 2000.0,
                    height: 1000.0,
                }),
            },
        }));
        let slides = slide(vec![element(PlaceholderType::Image, content, 18.0)]);
        let report = evaluate(QualityProfile::Standard, &slides, &[]);
        let cats: Vec<_> = report.findings.iter().map(|f| (f.category, f.severity)).collect();
        // 8in = 576pt of 2000pt: labels render at ~3.5pt.
        assert_eq!(
            cats,
            vec![
                (QualityCategory::DiagramDensity, Severity::Warning),
                (QualityCategory::DiagramReadability, Severity::Warning),
            ]
        );
    }

    #[test]
    fn test_node_count_derived_from_source() {
        let source = (0..25)
            .map(|i| format!("  n{i} --> n{}", i + 1))
            .collect::<Vec<_>>()
            .join("\n");
        let content = ContentValue::diagram(&format!("graph LR\n{source}"));
        let slides = slide(vec![element(PlaceholderType::Image, content, 18.0)]);
        let report = evaluate(QualityProfile::Strict, &slides, &[]);
        assert_eq!(report.findings[0].category, QualityCategory::DiagramDensity);
        assert_eq!(report.findings[0].detail.unwrap().actual, 26.0);
    }

    #[test]
    fn test_missing_required_is_error() {
        let v = vec![ValidationFinding::warning(
            2,
            FindingCategory::MissingPlaceholder,
            "Required placeholder 'title' has no content",
        )
        .at("title")];
        let report = evaluate(QualityProfile::Standard, &[], &v);
        assert_eq!(report.findings[0].category, QualityCategory::MissingRequired);
        assert_eq!(report.findings[0].severity, Severity::Error);
        assert!(!report.is_passing);
    }
}
