//! # deckfit
//!
//! Layout fitting and overflow resolution for declarative slide decks.
//!
//! A deck is a master (theme plus named layouts of placeholder rectangles)
//! and a list of slides binding content to placeholders. deckfit measures
//! every piece of content with real font metrics, decides whether it fits,
//! shrinks it when the placeholder allows, and reports what does not fit as
//! findings precise enough to fix by hand or with the autofix loop.
//!
//! ## Architecture
//!
//! ```text
//! DeckSpec (JSON/API)
//!       ↓
//!   [model]    : master, layouts, placeholders, slides, content
//!       ↓
//!   [style]    : theme → placeholder type → placeholder override
//!       ↓
//!   [resolve]  : resolved elements, structural findings, image checks
//!       ↓
//!   [layout]   : font resolution, overflow detection, margin checks
//!       ↓
//!   [quality]  : profile-gated quality report
//!       ↓
//!   [autofix]  : structural fixes, diagram splitting, external fixer seam
//! ```
//!
//! Content that does not fit is never an error: it is a
//! [`ValidationFinding`]. [`CompileReport::ensure_buildable`] is the gate a
//! renderer calls before producing an artifact.

pub mod autofix;
pub mod config;
pub mod diagram;
pub mod engine;
pub mod error;
pub mod font;
pub mod image_check;
pub mod layout;
pub mod model;
pub mod quality;
pub mod resolve;
pub mod style;
pub mod text;
pub mod validation;

pub use autofix::{AutofixReport, ExternalFixer, FixAction};
pub use config::{CompileOptions, QualityProfile};
pub use engine::{CompileReport, DeckEngine};
pub use error::DeckError;
pub use model::DeckSpec;
pub use validation::{FindingCategory, Severity, ValidationFinding};

/// Compile a deck with the given options.
///
/// Builds a fresh engine, so fonts are loaded anew. Keep a [`DeckEngine`]
/// around to reuse its font cache across compiles.
pub fn compile(spec: &DeckSpec, options: CompileOptions) -> CompileReport {
    DeckEngine::new(options).compile(spec)
}

/// Compile a deck described as JSON.
pub fn compile_json(json: &str, options: CompileOptions) -> Result<CompileReport, DeckError> {
    let spec: DeckSpec = serde_json::from_str(json)?;
    Ok(compile(&spec, options))
}

/// Run the autofix loop on a deck.
pub fn autofix_deck(
    spec: &DeckSpec,
    options: CompileOptions,
    fixer: Option<&dyn ExternalFixer>,
) -> AutofixReport {
    DeckEngine::new(options).autofix(spec, fixer)
}
