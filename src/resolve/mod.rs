//! # Resolution
//!
//! Joins each slide's content with its layout's placeholders and the style
//! cascade, producing one [`ResolvedElement`] per filled placeholder.
//!
//! Structural problems are reported, not raised:
//!
//! - a slide naming a layout that does not exist is skipped with an
//!   `unknown-layout` error
//! - content bound to a name the layout does not define gets an
//!   `unknown-placeholder` error and is dropped
//! - a `required` placeholder left empty gets a `missing-placeholder`
//!   warning
//! - image content and slide background images that point at missing
//!   local files get `image-not-found` errors
//!
//! Resolution always completes for every slide.

use std::path::Path;

use serde::Serialize;

use crate::config::CompileOptions;
use crate::image_check::check_image;
use crate::model::{Background, Block, ContentValue, DeckSpec, Layout, PlaceholderDef, Slide, Theme};
use crate::style::{resolve_element_style, ResolvedStyle};
use crate::validation::{FindingCategory, ValidationFinding};

/// Minimum font size used when a placeholder does not set one.
pub const DEFAULT_MIN_FONT_SIZE: f64 = 8.0;

/// One placeholder's content with its fully merged style.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedElement {
    pub slide_index: usize,
    pub placeholder: PlaceholderDef,
    pub content: ContentValue,
    pub style: ResolvedStyle,
    /// Size layout settled on. Starts at the nominal size clamped to the
    /// placeholder's constraints; shrinking lowers it.
    pub computed_font_size: f64,
}

impl ResolvedElement {
    pub fn name(&self) -> &str {
        &self.placeholder.name
    }

    /// Size from the style cascade, before any constraint or shrink.
    pub fn nominal_font_size(&self) -> f64 {
        self.style.font_size
    }

    pub fn min_font_size(&self) -> f64 {
        self.placeholder
            .constraints
            .as_ref()
            .and_then(|c| c.min_font_size)
            .unwrap_or(DEFAULT_MIN_FONT_SIZE)
    }

    pub fn max_lines(&self) -> Option<usize> {
        self.placeholder.constraints.as_ref().and_then(|c| c.max_lines)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSlide {
    pub index: usize,
    pub layout: String,
    /// Elements in layout order.
    pub elements: Vec<ResolvedElement>,
}

impl ResolvedSlide {
    pub fn element(&self, placeholder: &str) -> Option<&ResolvedElement> {
        self.elements.iter().find(|e| e.name() == placeholder)
    }
}

/// Output of resolving a whole deck.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Slides whose layout resolved, in deck order.
    pub slides: Vec<ResolvedSlide>,
    pub findings: Vec<ValidationFinding>,
}

pub fn resolve_deck(spec: &DeckSpec, options: &CompileOptions) -> Resolution {
    let mut resolution = Resolution::default();
    let base_dir = options.base_dir.as_deref();
    for (index, slide) in spec.slides.iter().enumerate() {
        let Some(layout) = spec.master.layouts.get(&slide.layout) else {
            let available: Vec<&str> = spec.master.layouts.keys().map(String::as_str).collect();
            resolution.findings.push(
                ValidationFinding::error(
                    index,
                    FindingCategory::UnknownLayout,
                    format!("Slide uses unknown layout '{}'", slide.layout),
                )
                .with_hint(format!("Available layouts: {}", available.join(", "))),
            );
            continue;
        };
        let resolved = resolve_slide(
            &spec.master.theme,
            layout,
            index,
            slide,
            base_dir,
            &mut resolution.findings,
        );
        resolution.slides.push(resolved);
    }
    tracing::debug!(
        slides = resolution.slides.len(),
        findings = resolution.findings.len(),
        "resolved deck"
    );
    resolution
}

fn resolve_slide(
    theme: &Theme,
    layout: &Layout,
    index: usize,
    slide: &Slide,
    base_dir: Option<&Path>,
    findings: &mut Vec<ValidationFinding>,
) -> ResolvedSlide {
    for name in slide.content.keys() {
        if layout.placeholder(name).is_none() {
            let available: Vec<&str> = layout.placeholders.iter().map(|p| p.name.as_str()).collect();
            findings.push(
                ValidationFinding::error(
                    index,
                    FindingCategory::UnknownPlaceholder,
                    format!(
                        "Content references placeholder '{}' which layout '{}' does not define",
                        name, slide.layout
                    ),
                )
                .at(name)
                .with_hint(format!("Placeholders in this layout: {}", available.join(", "))),
            );
        }
    }

    let mut elements = Vec::new();
    for ph in &layout.placeholders {
        let Some(content) = slide.content.get(&ph.name) else {
            if ph.required {
                findings.push(
                    ValidationFinding::warning(
                        index,
                        FindingCategory::MissingPlaceholder,
                        format!("Required placeholder '{}' has no content", ph.name),
                    )
                    .at(&ph.name),
                );
            }
            continue;
        };

        if let ContentValue::Block(Block::Image(image)) = content {
            if let Err(reason) = check_image(&image.src, base_dir) {
                findings.push(
                    ValidationFinding::error(index, FindingCategory::ImageNotFound, reason)
                        .at(&ph.name)
                        .with_hint("Fix the path or use an http(s) URL or data URI"),
                );
            }
        }

        let style = resolve_element_style(theme, ph.kind, content.kind(), &ph.style);
        let computed_font_size = clamp_to_constraints(ph, style.font_size);
        elements.push(ResolvedElement {
            slide_index: index,
            placeholder: ph.clone(),
            content: content.clone(),
            style,
            computed_font_size,
        });
    }

    if let Some(Background::Image(src)) = &slide.background {
        if let Err(reason) = check_image(src, base_dir) {
            findings.push(
                ValidationFinding::error(
                    index,
                    FindingCategory::ImageNotFound,
                    format!("Background image: {reason}"),
                )
                .with_hint("Fix the path or use an http(s) URL or data URI"),
            );
        }
    }

    ResolvedSlide {
        index,
        layout: slide.layout.clone(),
        elements,
    }
}

fn clamp_to_constraints(ph: &PlaceholderDef, nominal: f64) -> f64 {
    let Some(c) = &ph.constraints else {
        return nominal;
    };
    let mut size = nominal;
    if let Some(max) = c.max_font_size {
        size = size.min(max);
    }
    if let Some(min) = c.min_font_size {
        size = size.max(min);
    }
    size
}
