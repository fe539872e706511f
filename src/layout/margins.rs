//! Placeholder geometry against the slide's safe area.

use crate::config::Margins;
use crate::model::Rect;
use crate::validation::{FindingCategory, ValidationFinding};

const GEOMETRY_EPSILON: f64 = 1e-9;

/// One `margin-overflow` warning per side of `rect` that leaves the safe
/// area of a `slide_size` (width, height) slide.
pub fn check_margins(
    slide_index: usize,
    placeholder: &str,
    rect: &Rect,
    slide_size: (f64, f64),
    margins: &Margins,
) -> Vec<ValidationFinding> {
    let (slide_width, slide_height) = slide_size;
    let mut findings = Vec::new();
    let mut violation = |message: String| {
        findings.push(
            ValidationFinding::warning(slide_index, FindingCategory::MarginOverflow, message)
                .at(placeholder)
                .with_hint("Move or resize the placeholder inside the safe area"),
        );
    };

    if rect.x < margins.left - GEOMETRY_EPSILON {
        violation(format!(
            "Left edge at {:.2}in is inside the {:.2}in left margin",
            rect.x, margins.left
        ));
    }
    let right_limit = slide_width - margins.right;
    if rect.right() > right_limit + GEOMETRY_EPSILON {
        violation(format!(
            "Right edge at {:.2}in exceeds {:.2}in ({:.2}in right margin on a {:.3}in wide slide)",
            rect.right(),
            right_limit,
            margins.right,
            slide_width
        ));
    }
    if rect.y < margins.top - GEOMETRY_EPSILON {
        violation(format!(
            "Top edge at {:.2}in is inside the {:.2}in top margin",
            rect.y, margins.top
        ));
    }
    let bottom_limit = slide_height - margins.bottom;
    if rect.bottom() > bottom_limit + GEOMETRY_EPSILON {
        violation(format!(
            "Bottom edge at {:.2}in exceeds {:.2}in ({:.2}in bottom margin on a {:.3}in tall slide)",
            rect.bottom(),
            bottom_limit,
            margins.bottom,
            slide_height
        ));
    }

    findings
}
