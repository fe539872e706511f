//! # Layout Validation Engine
//!
//! Drives measurement across a resolved deck.
//!
//! ## What It Does Per Element
//!
//! 1. Pick a font role from the placeholder type and the resolved family:
//!    titles and subtitles use the heading font, mono families (the theme's
//!    mono family, or anything that looks like Courier, Menlo, Consolas or a
//!    "mono"/"code" face) use the mono font, everything else the body font.
//! 2. Resolve that role to a font file: the theme's explicit file for the
//!    role, then the theme's body file, then the well-known system fonts
//!    (unless disabled). Bold styles prefer the bold variant.
//! 3. Load the file through the engine-owned [`FontCache`] and run the
//!    [`OverflowDetector`]. No file means an `info` finding and no
//!    measurement. A file that fails to parse means a `warning`.
//! 4. Check the placeholder rectangle against the slide's safe area.
//!
//! Tables use a row-count height model and need no font at all.
//!
//! ## Concurrency
//!
//! Slides are independent, so they are validated in parallel with rayon.
//! Each worker writes only its own slide's elements and findings are joined
//! in slide order, so the result matches a sequential run exactly.

pub mod bullets;
pub mod margins;
pub mod overflow;
pub mod table;

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::{CompileOptions, Margins};
use crate::font::system::{find_system_font, FontRole};
use crate::font::{FontCache, GlyphMetrics};
use crate::model::{FontFiles, Theme};
use crate::resolve::{ResolvedElement, ResolvedSlide};
use crate::text::TextMeasurer;
use crate::validation::{FindingCategory, ValidationFinding};

use margins::check_margins;
use overflow::OverflowDetector;

/// Families treated as monospace when the theme's mono family does not match.
const MONO_FAMILY_MARKERS: &[&str] = &["mono", "courier", "consolas", "menlo", "code"];

pub struct LayoutEngine {
    fonts: FontCache,
    measurer: TextMeasurer,
    slide_size: (f64, f64),
    margins: Margins,
    system_font_fallback: bool,
    base_dir: Option<PathBuf>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(&CompileOptions::default())
    }
}

impl LayoutEngine {
    pub fn new(options: &CompileOptions) -> Self {
        Self {
            fonts: FontCache::new(),
            measurer: TextMeasurer::new(),
            slide_size: options.slide_size(),
            margins: options.margins,
            system_font_fallback: options.system_font_fallback,
            base_dir: options.base_dir.clone(),
        }
    }

    pub fn fonts(&self) -> &FontCache {
        &self.fonts
    }

    pub fn measurer(&self) -> &TextMeasurer {
        &self.measurer
    }

    /// Drop every loaded font.
    pub fn clear_font_cache(&self) {
        self.fonts.clear();
    }

    /// Validate every slide, updating each element's computed font size.
    pub fn validate(&self, theme: &Theme, slides: &mut [ResolvedSlide]) -> Vec<ValidationFinding> {
        slides
            .par_iter_mut()
            .map(|slide| self.validate_slide(theme, slide))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }

    pub fn validate_slide(&self, theme: &Theme, slide: &mut ResolvedSlide) -> Vec<ValidationFinding> {
        let mut findings = Vec::new();
        for element in &mut slide.elements {
            findings.extend(self.validate_element(theme, element));
        }
        findings
    }

    pub fn validate_element(
        &self,
        theme: &Theme,
        element: &mut ResolvedElement,
    ) -> Vec<ValidationFinding> {
        let mut findings = Vec::new();
        let detector = OverflowDetector::new(&self.measurer);

        if element.content.needs_glyph_metrics() {
            self.detect_with_font(theme, element, &detector, &mut findings);
        } else {
            let outcome = detector.detect(element, None);
            element.computed_font_size = outcome.font_size;
            findings.extend(outcome.findings);
        }

        findings.extend(check_margins(
            element.slide_index,
            element.name(),
            &element.placeholder.rect,
            self.slide_size,
            &self.margins,
        ));
        findings
    }

    fn detect_with_font(
        &self,
        theme: &Theme,
        element: &mut ResolvedElement,
        detector: &OverflowDetector<'_>,
        findings: &mut Vec<ValidationFinding>,
    ) {
        let role = font_role(theme, element);
        let Some(path) = self.resolve_font_path(theme, element) else {
            findings.push(
                ValidationFinding::info(
                    element.slide_index,
                    FindingCategory::FontNotFound,
                    format!(
                        "No {} font file found for '{}'; overflow not checked",
                        role.as_str(),
                        element.style.font_family
                    ),
                )
                .at(element.name())
                .with_hint("Set theme.fontPaths so content can be measured"),
            );
            return;
        };

        let loaded = self.fonts.load(&path);
        let metrics = loaded.as_ref().map_err(|e| e.to_string()).and_then(|font| {
            font.metrics().map_err(|e| e.to_string())
        });
        match metrics {
            Ok(metrics) => {
                let outcome = detector.detect(element, Some(&metrics as &dyn GlyphMetrics));
                element.computed_font_size = outcome.font_size;
                findings.extend(outcome.findings);
            }
            Err(message) => {
                tracing::warn!(path = %path.display(), error = %message, "unusable font file");
                findings.push(
                    ValidationFinding::warning(
                        element.slide_index,
                        FindingCategory::FontNotFound,
                        format!("Font file could not be used: {message}"),
                    )
                    .at(element.name())
                    .with_hint("Point theme.fontPaths at a valid TrueType or OpenType file"),
                );
            }
        }
    }

    /// Font file used to measure `element`, if any resolves.
    pub fn resolve_font_path(&self, theme: &Theme, element: &ResolvedElement) -> Option<PathBuf> {
        let role = font_role(theme, element);
        let bold = element.style.bold;
        let paths = &theme.font_paths;
        let explicit = match role {
            FontRole::Heading => paths.heading.as_ref(),
            FontRole::Body => paths.body.as_ref(),
            FontRole::Mono => paths.mono.as_ref(),
        };

        for files in explicit.into_iter().chain(paths.body.as_ref()) {
            if let Some(path) = self.pick_file(files, bold) {
                return Some(path);
            }
        }

        if self.system_font_fallback {
            find_system_font(role, bold)
        } else {
            None
        }
    }

    fn pick_file(&self, files: &FontFiles, bold: bool) -> Option<PathBuf> {
        let bold_file = if bold { files.bold.as_deref() } else { None };
        bold_file
            .into_iter()
            .chain(std::iter::once(files.regular.as_str()))
            .map(|p| self.resolve_path(p))
            .find(|p| {
                let exists = p.is_file() || self.fonts.contains(p);
                if !exists {
                    tracing::debug!(path = %p.display(), "theme font file missing");
                }
                exists
            })
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        match &self.base_dir {
            Some(base) if p.is_relative() => base.join(p),
            _ => p.to_path_buf(),
        }
    }
}

/// The font role an element is measured with.
pub fn font_role(theme: &Theme, element: &ResolvedElement) -> FontRole {
    if is_mono_family(&element.style.font_family, &theme.fonts.mono) {
        FontRole::Mono
    } else if element.placeholder.kind.is_title_like() {
        FontRole::Heading
    } else {
        FontRole::Body
    }
}

fn is_mono_family(family: &str, theme_mono: &str) -> bool {
    if family.eq_ignore_ascii_case(theme_mono) {
        return true;
    }
    let lower = family.to_ascii_lowercase();
    MONO_FAMILY_MARKERS.iter().any(|m| lower.contains(m))
}
