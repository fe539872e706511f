//! Fallback fixer seam.
//!
//! When no deterministic fix applies, the fix loop may ask an external
//! proposer (a language model, a rules service, a human in a review UI)
//! for structured edits. The proposer only returns actions; applying them
//! stays here, so out-of-range or no-op actions can never corrupt the deck.

use serde::{Deserialize, Serialize};

use super::fixes::{AppliedFix, FixKind};
use crate::engine::CompileReport;
use crate::model::{ContentValue, DeckSpec, Slide};

/// A structured edit proposed by an [`ExternalFixer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum FixAction {
    #[serde(rename_all = "camelCase")]
    ReplaceContent {
        slide_index: usize,
        placeholder: String,
        value: ContentValue,
    },
    #[serde(rename_all = "camelCase")]
    RemoveContent {
        slide_index: usize,
        placeholder: String,
    },
    /// Insert `slide` directly after slide `after`.
    InsertSlide { after: usize, slide: Slide },
}

pub trait ExternalFixer {
    /// Propose edits for a deck that still fails. Actions are applied in
    /// order, so indices in later actions see the effect of earlier ones.
    fn propose(&self, spec: &DeckSpec, report: &CompileReport) -> Vec<FixAction>;
}

impl<F> ExternalFixer for F
where
    F: Fn(&DeckSpec, &CompileReport) -> Vec<FixAction>,
{
    fn propose(&self, spec: &DeckSpec, report: &CompileReport) -> Vec<FixAction> {
        self(spec, report)
    }
}

/// Apply proposed actions, skipping any that point outside the deck or
/// change nothing.
pub(crate) fn apply_actions(spec: &mut DeckSpec, actions: Vec<FixAction>) -> Vec<AppliedFix> {
    let mut applied = Vec::new();
    for action in actions {
        match apply_action(spec, action) {
            Some(fix) => {
                tracing::debug!(slide = fix.slide_index, "{}", fix.description);
                applied.push(fix);
            }
            None => tracing::debug!("ignored external fix action"),
        }
    }
    applied
}

fn apply_action(spec: &mut DeckSpec, action: FixAction) -> Option<AppliedFix> {
    match action {
        FixAction::ReplaceContent {
            slide_index,
            placeholder,
            value,
        } => {
            let slide = spec.slides.get_mut(slide_index)?;
            if slide.content.get(&placeholder) == Some(&value) {
                return None;
            }
            slide.content.insert(placeholder.clone(), value);
            Some(AppliedFix {
                slide_index,
                description: format!("Replaced content of '{placeholder}'"),
                placeholder: Some(placeholder),
                kind: FixKind::External,
            })
        }
        FixAction::RemoveContent {
            slide_index,
            placeholder,
        } => {
            spec.slides
                .get_mut(slide_index)?
                .content
                .shift_remove(&placeholder)?;
            Some(AppliedFix {
                slide_index,
                description: format!("Removed content of '{placeholder}'"),
                placeholder: Some(placeholder),
                kind: FixKind::External,
            })
        }
        FixAction::InsertSlide { after, slide } => {
            if after >= spec.slides.len() {
                return None;
            }
            spec.slides.insert(after + 1, slide);
            Some(AppliedFix {
                slide_index: after + 1,
                placeholder: None,
                kind: FixKind::External,
                description: format!("Inserted a slide after slide {after}"),
            })
        }
    }
}
