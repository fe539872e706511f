//! # Deck Model
//!
//! The input representation for the fitting engine. A deck is a master (theme
//! plus a map of named layouts) and an ordered list of slides. Each layout is
//! a list of placeholder rectangles; each slide names a layout and binds
//! content values to placeholders by name.
//!
//! Everything is measured in inches, except font sizes which are in points
//! (1/72 inch).

mod content;

pub use content::*;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::style::TextStyle;

/// A complete deck specification ready for compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSpec {
    /// Theme and layouts shared by every slide.
    pub master: Master,
    /// Slides in presentation order.
    #[serde(default)]
    pub slides: Vec<Slide>,
}

/// Theme plus the named layouts slides can reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Master {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub layouts: IndexMap<String, Layout>,
}

/// Colors, font families and optional explicit font files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    #[serde(default)]
    pub name: Option<String>,
    /// Named palette entries (e.g. "primary" → "#1F2937").
    #[serde(default)]
    pub colors: IndexMap<String, String>,
    #[serde(default)]
    pub fonts: ThemeFonts,
    /// Explicit outline font files per role. When a role is missing the
    /// engine probes well-known system font locations instead.
    #[serde(default)]
    pub font_paths: FontPaths,
    /// Default line spacing multiple.
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f64,
    /// Default text color.
    #[serde(default)]
    pub text_color: Option<String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: None,
            colors: IndexMap::new(),
            fonts: ThemeFonts::default(),
            font_paths: FontPaths::default(),
            line_spacing: default_line_spacing(),
            text_color: None,
        }
    }
}

fn default_line_spacing() -> f64 {
    1.2
}

/// Font family names per typographic role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeFonts {
    #[serde(default = "default_sans_family")]
    pub heading: String,
    #[serde(default = "default_sans_family")]
    pub body: String,
    #[serde(default = "default_mono_family")]
    pub mono: String,
}

impl Default for ThemeFonts {
    fn default() -> Self {
        Self {
            heading: default_sans_family(),
            body: default_sans_family(),
            mono: default_mono_family(),
        }
    }
}

fn default_sans_family() -> String {
    "Helvetica".to_string()
}

fn default_mono_family() -> String {
    "Courier".to_string()
}

/// Explicit font file paths keyed by role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontPaths {
    #[serde(default)]
    pub heading: Option<FontFiles>,
    #[serde(default)]
    pub body: Option<FontFiles>,
    #[serde(default)]
    pub mono: Option<FontFiles>,
}

/// Regular and optional bold variant of one role's font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontFiles {
    pub regular: String,
    #[serde(default)]
    pub bold: Option<String>,
}

/// A named arrangement of placeholders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    #[serde(default)]
    pub placeholders: Vec<PlaceholderDef>,
    /// Fixed decorative elements drawn on every slide using this layout.
    #[serde(default)]
    pub decorations: Vec<Decoration>,
    #[serde(default)]
    pub background: Option<Background>,
}

impl Layout {
    pub fn placeholder(&self, name: &str) -> Option<&PlaceholderDef> {
        self.placeholders.iter().find(|p| p.name == name)
    }

    /// The first title-type placeholder, used for "continued" annotations.
    pub fn title_placeholder(&self) -> Option<&PlaceholderDef> {
        self.placeholders
            .iter()
            .find(|p| p.kind == PlaceholderType::Title)
    }

    /// The image-type placeholder with the largest area. Ties keep the
    /// first in layout order.
    pub fn largest_image_placeholder(&self) -> Option<&PlaceholderDef> {
        let mut best: Option<&PlaceholderDef> = None;
        for ph in self
            .placeholders
            .iter()
            .filter(|p| p.kind == PlaceholderType::Image)
        {
            match best {
                Some(b) if ph.rect.area() <= b.rect.area() => {}
                _ => best = Some(ph),
            }
        }
        best
    }
}

/// A named, typed rectangle that content is bound into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderDef {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PlaceholderType,
    #[serde(flatten)]
    pub rect: Rect,
    /// Style defaults for content bound to this placeholder.
    #[serde(default)]
    pub style: TextStyle,
    /// Fit constraints. When absent, overflow is detected and reported as a
    /// warning but nothing is resized.
    #[serde(default)]
    pub constraints: Option<Constraints>,
    /// Whether every slide using this layout must fill this placeholder.
    #[serde(default)]
    pub required: bool,
}

impl PlaceholderDef {
    /// The overflow strategy in effect for this placeholder.
    pub fn overflow_strategy(&self) -> OverflowStrategy {
        self.constraints
            .as_ref()
            .map(|c| c.overflow)
            .unwrap_or(OverflowStrategy::Warn)
    }
}

/// A rectangle in inches, origin at the slide's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaceholderType {
    Title,
    Subtitle,
    Body,
    Image,
    Custom,
}

impl PlaceholderType {
    pub fn is_title_like(self) -> bool {
        matches!(self, PlaceholderType::Title | PlaceholderType::Subtitle)
    }
}

/// Fit constraints attached to a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    #[serde(default)]
    pub overflow: OverflowStrategy,
    #[serde(default)]
    pub min_font_size: Option<f64>,
    #[serde(default)]
    pub max_font_size: Option<f64>,
    #[serde(default)]
    pub max_lines: Option<usize>,
}

/// What to do when content does not fit its placeholder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverflowStrategy {
    /// Reduce the font size until the content fits.
    #[default]
    Shrink,
    /// Report an error and leave the size alone.
    Error,
    /// Report a warning and leave the size alone.
    Warn,
    /// Report that the renderer will clip the content.
    Truncate,
}

/// A fixed decorative element of a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decoration {
    pub kind: String,
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub fill: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Background {
    Color(String),
    Image(String),
}

/// One slide: a layout name plus content bound to placeholders by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub layout: String,
    #[serde(default)]
    pub content: IndexMap<String, ContentValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Slide {
    pub fn new(layout: &str) -> Self {
        Self {
            layout: layout.to_string(),
            content: IndexMap::new(),
            background: None,
            notes: None,
        }
    }

    /// Builder-style helper for binding content.
    pub fn with(mut self, placeholder: &str, value: impl Into<ContentValue>) -> Self {
        self.content.insert(placeholder.to_string(), value.into());
        self
    }
}
