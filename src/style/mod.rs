//! # Style System
//!
//! A small typographic style model. Placeholders, bullet items, table cells
//! and rich-text runs all carry a [`TextStyle`] whose fields are optional;
//! resolution walks a cascade and produces a [`ResolvedStyle`] with every
//! value concrete:
//!
//! 1. theme base (body family, 18pt, theme line spacing and text color)
//! 2. placeholder-type defaults (titles use the heading family, and so on)
//! 3. content-kind defaults (code uses the mono family)
//! 4. the placeholder's own style override

use serde::{Deserialize, Serialize};

use crate::model::{ContentKind, PlaceholderType, Theme};

/// Base body size in points.
pub const DEFAULT_BODY_SIZE: f64 = 18.0;
pub const DEFAULT_TITLE_SIZE: f64 = 36.0;
pub const DEFAULT_SUBTITLE_SIZE: f64 = 24.0;
pub const DEFAULT_CODE_SIZE: f64 = 14.0;

/// Optional style properties. Unset fields inherit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Font size in points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Line height as a multiple of the font size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Fully resolved style: what measurement and rendering work with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    pub font_family: String,
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub color: String,
    pub line_spacing: f64,
    pub align: TextAlign,
}

impl TextStyle {
    pub fn is_empty(&self) -> bool {
        *self == TextStyle::default()
    }

    /// Layer `over` on top of `self`; set fields in `over` win.
    pub fn merged_with(&self, over: &TextStyle) -> TextStyle {
        TextStyle {
            font_family: over.font_family.clone().or_else(|| self.font_family.clone()),
            font_size: over.font_size.or(self.font_size),
            bold: over.bold.or(self.bold),
            italic: over.italic.or(self.italic),
            color: over.color.clone().or_else(|| self.color.clone()),
            line_spacing: over.line_spacing.or(self.line_spacing),
            align: over.align.or(self.align),
        }
    }

    /// Resolve this style against a parent's resolved style.
    pub fn resolve(&self, parent: &ResolvedStyle) -> ResolvedStyle {
        ResolvedStyle {
            font_family: self
                .font_family
                .clone()
                .unwrap_or_else(|| parent.font_family.clone()),
            font_size: self.font_size.unwrap_or(parent.font_size),
            bold: self.bold.unwrap_or(parent.bold),
            italic: self.italic.unwrap_or(parent.italic),
            color: self.color.clone().unwrap_or_else(|| parent.color.clone()),
            line_spacing: self.line_spacing.unwrap_or(parent.line_spacing),
            align: self.align.unwrap_or(parent.align),
        }
    }
}

impl ResolvedStyle {
    /// The root of the cascade: the theme's body typography.
    pub fn theme_base(theme: &Theme) -> Self {
        ResolvedStyle {
            font_family: theme.fonts.body.clone(),
            font_size: DEFAULT_BODY_SIZE,
            bold: false,
            italic: false,
            color: theme
                .text_color
                .clone()
                .unwrap_or_else(|| "#000000".to_string()),
            line_spacing: theme.line_spacing,
            align: TextAlign::Left,
        }
    }
}

/// Defaults implied by the placeholder type.
pub fn type_defaults(kind: PlaceholderType, theme: &Theme) -> TextStyle {
    match kind {
        PlaceholderType::Title => TextStyle {
            font_family: Some(theme.fonts.heading.clone()),
            font_size: Some(DEFAULT_TITLE_SIZE),
            bold: Some(true),
            ..Default::default()
        },
        PlaceholderType::Subtitle => TextStyle {
            font_family: Some(theme.fonts.heading.clone()),
            font_size: Some(DEFAULT_SUBTITLE_SIZE),
            ..Default::default()
        },
        PlaceholderType::Body | PlaceholderType::Custom | PlaceholderType::Image => TextStyle {
            font_family: Some(theme.fonts.body.clone()),
            font_size: Some(DEFAULT_BODY_SIZE),
            ..Default::default()
        },
    }
}

/// Defaults implied by the kind of content bound to the placeholder.
pub fn content_defaults(kind: ContentKind, theme: &Theme) -> TextStyle {
    match kind {
        ContentKind::Code => TextStyle {
            font_family: Some(theme.fonts.mono.clone()),
            font_size: Some(DEFAULT_CODE_SIZE),
            ..Default::default()
        },
        _ => TextStyle::default(),
    }
}

/// Run the full cascade for one placeholder + content pair.
pub fn resolve_element_style(
    theme: &Theme,
    kind: PlaceholderType,
    content: ContentKind,
    placeholder_style: &TextStyle,
) -> ResolvedStyle {
    let layered = type_defaults(kind, theme)
        .merged_with(&content_defaults(content, theme))
        .merged_with(placeholder_style);
    layered.resolve(&ResolvedStyle::theme_base(theme))
}
