//! # Overflow Detection
//!
//! Decides, for one resolved element, whether its content fits the
//! placeholder and what to do when it does not.
//!
//! Detection is side-effect free: it measures at the element's current
//! computed size and returns findings plus the size the element should
//! have afterwards. Shrinking searches `[min, current]`, so running the
//! detector again on its own result reports nothing new.
//!
//! | strategy   | fits at a smaller size         | does not fit even at min |
//! |------------|--------------------------------|--------------------------|
//! | `shrink`   | warning, size lowered          | error, size set to min   |
//! | `error`    | error with a suggested size    | error                    |
//! | `warn`     | warning with a suggested size  | warning                  |
//! | `truncate` | warning (renderer clips)       | warning                  |

use serde::Serialize;

use crate::font::GlyphMetrics;
use crate::layout::bullets::measure_bullets;
use crate::layout::table::{measure_table, table_height};
use crate::model::{Block, BulletItem, ContentValue, OverflowStrategy, TableContent};
use crate::resolve::ResolvedElement;
use crate::text::fit::largest_fitting_size;
use crate::text::{TextMeasurer, FIT_EPSILON};
use crate::validation::{FindingCategory, OverflowDetail, ValidationFinding};

/// What detection concluded for one element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionOutcome {
    pub findings: Vec<ValidationFinding>,
    /// Font size the element should use from now on.
    pub font_size: f64,
}

impl DetectionOutcome {
    fn unchanged(element: &ResolvedElement) -> Self {
        Self {
            findings: Vec::new(),
            font_size: element.computed_font_size,
        }
    }
}

/// Measured overflow, before a strategy is applied.
struct Overflow {
    content_height: f64,
    line_count: Option<usize>,
}

pub struct OverflowDetector<'a> {
    measurer: &'a TextMeasurer,
}

impl<'a> OverflowDetector<'a> {
    pub fn new(measurer: &'a TextMeasurer) -> Self {
        Self { measurer }
    }

    /// Check one element. Text and bullet content need `metrics`; without
    /// them the element is returned unchanged.
    pub fn detect(
        &self,
        element: &ResolvedElement,
        metrics: Option<&dyn GlyphMetrics>,
    ) -> DetectionOutcome {
        match (&element.content, metrics) {
            (ContentValue::Block(Block::Table(table)), _) => self.detect_table(element, table),
            (ContentValue::Block(Block::Bullets { items }), Some(m)) => {
                self.detect_bullets(element, items, m)
            }
            (ContentValue::Block(Block::Image(_) | Block::Diagram(_)), _) => {
                DetectionOutcome::unchanged(element)
            }
            (content, Some(m)) => match content.plain_text() {
                Some(text) => self.detect_text(element, &text, m),
                None => DetectionOutcome::unchanged(element),
            },
            (_, None) => DetectionOutcome::unchanged(element),
        }
    }

    fn detect_text(
        &self,
        element: &ResolvedElement,
        text: &str,
        metrics: &dyn GlyphMetrics,
    ) -> DetectionOutcome {
        let rect = element.placeholder.rect;
        let spacing = element.style.line_spacing;
        let current = element.computed_font_size;
        let measure = self.measurer.measure(metrics, text, current, rect.width, spacing);

        let mut findings = Vec::new();
        if let Some(max_lines) = element.max_lines() {
            if measure.line_count > max_lines {
                findings.push(self.max_lines_finding(element, measure.height, measure.line_count, max_lines));
            }
        }

        if measure.height <= rect.height + FIT_EPSILON {
            return DetectionOutcome {
                findings,
                font_size: current,
            };
        }

        let overflow = Overflow {
            content_height: measure.height,
            line_count: Some(measure.line_count),
        };
        self.apply_strategy(element, overflow, findings, |min, max| {
            self.measurer
                .find_fitting_font_size(metrics, text, rect.width, rect.height, min, max, spacing)
                .map(|fitted| fitted.font_size)
        })
    }

    fn detect_bullets(
        &self,
        element: &ResolvedElement,
        items: &[BulletItem],
        metrics: &dyn GlyphMetrics,
    ) -> DetectionOutcome {
        let rect = element.placeholder.rect;
        let spacing = element.style.line_spacing;
        let measure_at =
            |size: f64| measure_bullets(self.measurer, metrics, items, size, rect.width, spacing);

        let measure = measure_at(element.computed_font_size);
        if measure.height <= rect.height + FIT_EPSILON {
            return DetectionOutcome::unchanged(element);
        }

        let overflow = Overflow {
            content_height: measure.height,
            line_count: Some(measure.line_count),
        };
        self.apply_strategy(element, overflow, Vec::new(), |min, max| {
            largest_fitting_size(min, max, |size| {
                measure_at(size).height <= rect.height + FIT_EPSILON
            })
        })
    }

    fn detect_table(&self, element: &ResolvedElement, table: &TableContent) -> DetectionOutcome {
        let rect = element.placeholder.rect;
        let spacing = element.style.line_spacing;
        let measure = measure_table(table, element.computed_font_size, spacing);
        if measure.height <= rect.height + FIT_EPSILON {
            return DetectionOutcome::unchanged(element);
        }

        let overflow = Overflow {
            content_height: measure.height,
            line_count: None,
        };
        let rows = measure.row_count;
        self.apply_strategy(element, overflow, Vec::new(), |min, max| {
            largest_fitting_size(min, max, |size| {
                table_height(rows, size, spacing) <= rect.height + FIT_EPSILON
            })
        })
    }

    /// Turn a measured overflow into findings according to the placeholder's
    /// strategy. `fit(min, max)` finds the largest fitting size.
    fn apply_strategy(
        &self,
        element: &ResolvedElement,
        overflow: Overflow,
        mut findings: Vec<ValidationFinding>,
        mut fit: impl FnMut(f64, f64) -> Option<f64>,
    ) -> DetectionOutcome {
        let current = element.computed_font_size;
        let min = element.min_font_size().min(current);
        let available = element.placeholder.rect.height;
        let detail = |suggested: Option<f64>| OverflowDetail {
            content_height: overflow.content_height,
            available_height: available,
            current_font_size: current,
            suggested_font_size: suggested,
            line_count: overflow.line_count,
            max_lines: None,
        };
        let overflow_text = format!(
            "Content needs {:.2}in but placeholder '{}' has {:.2}in at {}pt",
            overflow.content_height,
            element.name(),
            available,
            current
        );
        let slide = element.slide_index;
        let name = element.name();

        let mut font_size = current;
        match element.placeholder.overflow_strategy() {
            OverflowStrategy::Shrink => match fit(min, current) {
                Some(size) => {
                    tracing::debug!(slide, placeholder = name, from = current, to = size, "shrunk to fit");
                    findings.push(
                        ValidationFinding::warning(
                            slide,
                            FindingCategory::Overflow,
                            format!("Font size reduced from {current}pt to {size}pt to fit"),
                        )
                        .at(name)
                        .with_detail(detail(Some(size))),
                    );
                    font_size = size;
                }
                None => {
                    tracing::debug!(slide, placeholder = name, min, "does not fit at minimum size");
                    findings.push(
                        ValidationFinding::error(
                            slide,
                            FindingCategory::Overflow,
                            format!("{overflow_text}; it does not fit even at the minimum {min}pt"),
                        )
                        .at(name)
                        .with_detail(detail(Some(min)))
                        .with_hint("Split the content across slides or shorten it"),
                    );
                    font_size = min;
                }
            },
            OverflowStrategy::Error => {
                let suggested = fit(min, current);
                findings.push(
                    ValidationFinding::error(slide, FindingCategory::Overflow, overflow_text)
                        .at(name)
                        .with_detail(detail(suggested))
                        .with_hint(suggestion_hint(suggested)),
                );
            }
            OverflowStrategy::Warn => {
                let suggested = fit(min, current);
                findings.push(
                    ValidationFinding::warning(slide, FindingCategory::Overflow, overflow_text)
                        .at(name)
                        .with_detail(detail(suggested))
                        .with_hint(suggestion_hint(suggested)),
                );
            }
            OverflowStrategy::Truncate => {
                findings.push(
                    ValidationFinding::warning(
                        slide,
                        FindingCategory::Overflow,
                        format!("{overflow_text}; content will be truncated when rendered"),
                    )
                    .at(name)
                    .with_detail(detail(None)),
                );
            }
        }

        DetectionOutcome {
            findings,
            font_size,
        }
    }

    fn max_lines_finding(
        &self,
        element: &ResolvedElement,
        content_height: f64,
        line_count: usize,
        max_lines: usize,
    ) -> ValidationFinding {
        let message = format!("Text wraps to {line_count} lines; at most {max_lines} allowed");
        let finding = if element.placeholder.overflow_strategy() == OverflowStrategy::Error {
            ValidationFinding::error(element.slide_index, FindingCategory::Overflow, message)
        } else {
            ValidationFinding::warning(element.slide_index, FindingCategory::Overflow, message)
        };
        finding
            .at(element.name())
            .with_detail(OverflowDetail {
                content_height,
                available_height: element.placeholder.rect.height,
                current_font_size: element.computed_font_size,
                suggested_font_size: None,
                line_count: Some(line_count),
                max_lines: Some(max_lines),
            })
            .with_hint("Shorten the text or widen the placeholder")
    }
}

fn suggestion_hint(suggested: Option<f64>) -> String {
    match suggested {
        Some(size) => format!("Content would fit at {size}pt; shrink it, shorten it, or split it across slides"),
        None => "Content does not fit even at the minimum size; split it across slides".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Constraints, PlaceholderDef, PlaceholderType, Rect, TableCell};
    use crate::style::{ResolvedStyle, TextAlign, TextStyle};
    use crate::validation::Severity;

    /// Every character is half an em wide.
    struct HalfEm;

    impl GlyphMetrics for HalfEm {
        fn units_per_em(&self) -> f64 {
            1000.0
        }
        fn advance(&self, _ch: char) -> f64 {
            500.0
        }
        fn kerning(&self, _left: char, _right: char) -> f64 {
            0.0
        }
    }

    fn element(content: ContentValue, height: f64, constraints: Option<Constraints>) -> ResolvedElement {
        ResolvedElement {
            slide_index: 0,
            placeholder: PlaceholderDef {
                name: "body".into(),
                kind: PlaceholderType::Body,
                rect: Rect::new(0.75, 1.5, 8.0, height),
                style: TextStyle::default(),
                constraints,
                required: false,
            },
            content,
            style: ResolvedStyle {
                font_family: "Helvetica".into(),
                font_size: 18.0,
                bold: false,
                italic: false,
                color: "#000000".into(),
                line_spacing: 1.2,
                align: TextAlign::Left,
            },
            computed_font_size: 18.0,
        }
    }

    fn strategy(overflow: OverflowStrategy, min: f64) -> Option<Constraints> {
        Some(Constraints {
            overflow,
            min_font_size: Some(min),
            ..Default::default()
        })
    }

    fn five_lines() -> ContentValue {
        ContentValue::text("one\ntwo\nthree\nfour\nfive")
    }

    fn detect(el: &ResolvedElement) -> DetectionOutcome {
        let tm = TextMeasurer::new();
        OverflowDetector::new(&tm).detect(el, Some(&HalfEm))
    }

    #[test]
    fn test_fitting_content_has_no_findings() {
        let el = element(ContentValue::text("short"), 3.0, strategy(OverflowStrategy::Shrink, 10.0));
        let out = detect(&el);
        assert!(out.findings.is_empty());
        assert_eq!(out.font_size, 18.0);
    }

    #[test]
    fn test_shrink_warns_and_lowers_size() {
        // 5 lines at 18pt * 1.2 = 1.5in; fits 1.2in at 14pt.
        let el = element(five_lines(), 1.2, strategy(OverflowStrategy::Shrink, 10.0));
        let out = detect(&el);
        assert_eq!(out.findings.len(), 1);
        assert_eq!(out.findings[0].severity, Severity::Warning);
        assert_eq!(out.font_size, 14.0);
        let detail = out.findings[0].detail.as_ref().unwrap();
        assert_eq!(detail.suggested_font_size, Some(14.0));
        assert_eq!(detail.current_font_size, 18.0);
    }

    #[test]
    fn test_shrink_is_idempotent() {
        let mut el = element(five_lines(), 1.2, strategy(OverflowStrategy::Shrink, 10.0));
        el.computed_font_size = detect(&el).font_size;
        let again = detect(&el);
        assert!(again.findings.is_empty());
        assert_eq!(again.font_size, el.computed_font_size);
    }

    #[test]
    fn test_shrink_failure_clamps_to_min() {
        let el = element(five_lines(), 0.5, strategy(OverflowStrategy::Shrink, 12.0));
        let out = detect(&el);
        assert_eq!(out.findings[0].severity, Severity::Error);
        assert_eq!(out.font_size, 12.0);
    }

    #[test]
    fn test_error_strategy_suggests_but_keeps_size() {
        let el = element(five_lines(), 1.2, strategy(OverflowStrategy::Error, 10.0));
        let out = detect(&el);
        assert_eq!(out.findings[0].severity, Severity::Error);
        assert_eq!(out.font_size, 18.0);
        assert_eq!(
            out.findings[0].detail.as_ref().unwrap().suggested_font_size,
            Some(14.0)
        );
    }

    #[test]
    fn test_unconstrained_placeholder_warns() {
        let el = element(five_lines(), 1.2, None);
        let out = detect(&el);
        assert_eq!(out.findings[0].severity, Severity::Warning);
        assert_eq!(out.font_size, 18.0);
    }

    #[test]
    fn test_truncate_warns_without_resizing() {
        let el = element(five_lines(), 1.2, strategy(OverflowStrategy::Truncate, 10.0));
        let out = detect(&el);
        assert_eq!(out.findings[0].severity, Severity::Warning);
        assert!(out.findings[0].message.contains("truncated"));
        assert_eq!(out.font_size, 18.0);
    }

    #[test]
    fn test_max_lines_checked_before_height() {
        let constraints = Some(Constraints {
            overflow: OverflowStrategy::Error,
            max_lines: Some(3),
            ..Default::default()
        });
        let el = element(five_lines(), 5.0, constraints);
        let out = detect(&el);
        assert_eq!(out.findings.len(), 1);
        let detail = out.findings[0].detail.as_ref().unwrap();
        assert_eq!(detail.line_count, Some(5));
        assert_eq!(detail.max_lines, Some(3));
        assert_eq!(out.findings[0].severity, Severity::Error);
    }

    #[test]
    fn test_bullets_shrink() {
        let items = (0..5).map(|i| BulletItem::new(&format!("item {i}"))).collect();
        let el = element(
            ContentValue::bullets(items),
            1.2,
            strategy(OverflowStrategy::Shrink, 10.0),
        );
        let out = detect(&el);
        assert_eq!(out.font_size, 14.0);
    }

    #[test]
    fn test_table_measured_without_metrics() {
        let rows = (0..10).map(|_| vec![TableCell::from("x")]).collect();
        let el = element(
            ContentValue::table(None, rows),
            2.0,
            strategy(OverflowStrategy::Shrink, 8.0),
        );
        let tm = TextMeasurer::new();
        let out = OverflowDetector::new(&tm).detect(&el, None);
        // 10 rows at 14pt cells: 10 * (14*1.2/72 + 0.1) = 3.33in.
        assert_eq!(out.findings.len(), 1);
        assert!(out.font_size < 18.0);
        assert!(table_height(10, out.font_size, 1.2) <= 2.0 + FIT_EPSILON);
    }

    #[test]
    fn test_images_never_overflow() {
        let el = element(ContentValue::image("x.png"), 0.1, strategy(OverflowStrategy::Error, 8.0));
        assert!(detect(&el).findings.is_empty());
    }
}
