//! Compile options.
//!
//! Every field has a default, so `{}` is a valid options document.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DeckError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    pub aspect_ratio: AspectRatio,
    pub margins: Margins,
    pub quality_profile: QualityProfile,
    /// Upper bound on compile passes in the autofix loop.
    pub max_iterations: usize,
    /// Probe well-known system font locations when the theme names no file.
    pub system_font_fallback: bool,
    /// Directory relative image paths resolve against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            aspect_ratio: AspectRatio::default(),
            margins: Margins::default(),
            quality_profile: QualityProfile::default(),
            max_iterations: 5,
            system_font_fallback: true,
            base_dir: None,
        }
    }
}

impl CompileOptions {
    pub fn from_json_str(json: &str) -> Result<Self, DeckError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, DeckError> {
        let json = std::fs::read_to_string(path).map_err(|e| DeckError::io(path, e))?;
        Self::from_json_str(&json)
    }

    pub fn with_profile(mut self, profile: QualityProfile) -> Self {
        self.quality_profile = profile;
        self
    }

    /// Slide (width, height) in inches.
    pub fn slide_size(&self) -> (f64, f64) {
        self.aspect_ratio.slide_size()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "16:10")]
    Wide16x10,
}

impl AspectRatio {
    pub fn slide_size(self) -> (f64, f64) {
        match self {
            AspectRatio::Widescreen => (13.333, 7.5),
            AspectRatio::Standard => (10.0, 7.5),
            AspectRatio::Wide16x10 => (10.0, 6.25),
        }
    }
}

/// Safe-area margins in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 0.5,
            right: 0.75,
            bottom: 0.5,
            left: 0.75,
        }
    }
}

/// Strictness level for the quality report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityProfile {
    Draft,
    #[default]
    Standard,
    Strict,
}

impl QualityProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            QualityProfile::Draft => "draft",
            QualityProfile::Standard => "standard",
            QualityProfile::Strict => "strict",
        }
    }
}

impl std::str::FromStr for QualityProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(QualityProfile::Draft),
            "standard" => Ok(QualityProfile::Standard),
            "strict" => Ok(QualityProfile::Strict),
            other => Err(format!(
                "unknown quality profile '{other}' (expected draft, standard or strict)"
            )),
        }
    }
}
