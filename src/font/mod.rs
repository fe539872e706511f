//! # Font Management
//!
//! Loading outline font files and reading glyph metrics for measurement.
//!
//! Fonts are loaded once per path and cached by the [`FontCache`] owned by
//! the layout engine. Measurement code never touches the cache directly: it
//! works against the [`GlyphMetrics`] trait, implemented here for parsed
//! TrueType/OpenType faces via ttf-parser.

pub mod system;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use ttf_parser::{Face, GlyphId};

use crate::error::DeckError;

/// Advance widths and kerning in font units.
///
/// All measurement in [`crate::text`] goes through this trait, so measuring
/// logic can be exercised against synthetic metrics as well as real faces.
pub trait GlyphMetrics {
    /// Design units per em square.
    fn units_per_em(&self) -> f64;

    /// Horizontal advance of `ch`, in font units.
    fn advance(&self, ch: char) -> f64;

    /// Kerning adjustment between two consecutive characters, in font units.
    fn kerning(&self, left: char, right: char) -> f64;
}

/// A font file loaded into memory and validated as parseable.
#[derive(Debug)]
pub struct LoadedFont {
    path: PathBuf,
    data: Vec<u8>,
    units_per_em: u16,
}

impl LoadedFont {
    /// Validate raw font bytes. The bytes are kept so a face can be parsed
    /// on demand without borrowing from the cache.
    pub fn from_bytes(path: impl Into<PathBuf>, data: Vec<u8>) -> Result<Self, DeckError> {
        let path = path.into();
        let units_per_em = match Face::parse(&data, 0) {
            Ok(face) => face.units_per_em(),
            Err(e) => {
                return Err(DeckError::Font {
                    path,
                    message: e.to_string(),
                })
            }
        };
        Ok(Self {
            path,
            data,
            units_per_em,
        })
    }

    /// Read and validate a font file from disk.
    pub fn from_path(path: &Path) -> Result<Self, DeckError> {
        let data = std::fs::read(path).map_err(|e| DeckError::io(path, e))?;
        Self::from_bytes(path, data)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Parse the face for measurement.
    pub fn metrics(&self) -> Result<FaceMetrics<'_>, DeckError> {
        let face = Face::parse(&self.data, 0).map_err(|e| DeckError::Font {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(FaceMetrics::new(face))
    }
}

/// Glyph metrics backed by a parsed ttf-parser face.
pub struct FaceMetrics<'a> {
    face: Face<'a>,
    units_per_em: f64,
    /// Advance used for characters the font has no glyph for.
    fallback_advance: f64,
}

impl<'a> FaceMetrics<'a> {
    pub fn new(face: Face<'a>) -> Self {
        let units_per_em = face.units_per_em() as f64;
        let fallback_advance = face
            .glyph_hor_advance(GlyphId(0))
            .filter(|a| *a > 0)
            .map(f64::from)
            .unwrap_or(units_per_em / 2.0);
        Self {
            face,
            units_per_em,
            fallback_advance,
        }
    }

    fn glyph(&self, ch: char) -> Option<GlyphId> {
        self.face.glyph_index(ch)
    }
}

impl GlyphMetrics for FaceMetrics<'_> {
    fn units_per_em(&self) -> f64 {
        self.units_per_em
    }

    fn advance(&self, ch: char) -> f64 {
        self.glyph(ch)
            .and_then(|g| self.face.glyph_hor_advance(g))
            .map(f64::from)
            .unwrap_or(self.fallback_advance)
    }

    fn kerning(&self, left: char, right: char) -> f64 {
        let Some(kern) = self.face.tables().kern else {
            return 0.0;
        };
        let (Some(l), Some(r)) = (self.glyph(left), self.glyph(right)) else {
            return 0.0;
        };
        kern.subtables
            .into_iter()
            .filter(|st| st.horizontal && !st.variable)
            .find_map(|st| st.glyphs_kerning(l, r))
            .map(f64::from)
            .unwrap_or(0.0)
    }
}

/// Load-once cache of font files keyed by path.
///
/// Safe for concurrent use: two threads racing on the same path may both
/// parse the file, and the first insert wins.
#[derive(Debug, Default)]
pub struct FontCache {
    fonts: RwLock<HashMap<PathBuf, Arc<LoadedFont>>>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a font from the cache, loading it from disk on first use.
    pub fn load(&self, path: &Path) -> Result<Arc<LoadedFont>, DeckError> {
        if let Some(font) = self.get(path) {
            tracing::debug!(path = %path.display(), "font cache hit");
            return Ok(font);
        }

        let font = Arc::new(LoadedFont::from_path(path)?);
        tracing::debug!(
            path = %path.display(),
            units_per_em = font.units_per_em(),
            "loaded font"
        );
        let mut fonts = self.fonts.write().unwrap_or_else(PoisonError::into_inner);
        Ok(fonts
            .entry(path.to_path_buf())
            .or_insert(font)
            .clone())
    }

    /// Register in-memory font data under a path key.
    pub fn insert_bytes(
        &self,
        path: impl Into<PathBuf>,
        data: Vec<u8>,
    ) -> Result<Arc<LoadedFont>, DeckError> {
        let path = path.into();
        let font = Arc::new(LoadedFont::from_bytes(path.clone(), data)?);
        let mut fonts = self.fonts.write().unwrap_or_else(PoisonError::into_inner);
        fonts.insert(path, font.clone());
        Ok(font)
    }

    pub fn get(&self, path: &Path) -> Option<Arc<LoadedFont>> {
        let fonts = self.fonts.read().unwrap_or_else(PoisonError::into_inner);
        fonts.get(path).cloned()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.get(path).is_some()
    }

    /// Drop every cached font. Long-running processes call this between
    /// unrelated compiles.
    pub fn clear(&self) {
        self.fonts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.fonts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
