//! Deterministic structural fixes.
//!
//! Each fix edits the deck in place and reports what it did, or returns
//! `None` without touching anything. A fix that splits content keeps the
//! first half where it was and inserts a continuation slide with the rest
//! directly after the current slide.

use serde::Serialize;

use crate::diagram::split_diagram;
use crate::model::{
    Block, ContentValue, DeckSpec, DiagramContent, DiagramHints, PlaceholderType, Slide,
    TableContent, TextRun,
};
use crate::quality::QualityCategory;
use crate::style::TextStyle;
use crate::validation::OverflowDetail;

/// Appended to a continuation slide's title.
pub const CONTINUED_SUFFIX: &str = " (cont.)";
/// Marks where shortened text was cut.
pub const ELLIPSIS: char = '…';

const OVERFLOW_SAFETY: f64 = 0.9;
const MIN_KEEP_FRACTION: f64 = 0.1;
const MAX_KEEP_FRACTION: f64 = 0.95;
const QUALITY_KEEP_FRACTION: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixKind {
    SplitBullets,
    SplitTable,
    SplitCode,
    SplitParagraphs,
    ShortenText,
    RelocateDiagram,
    SplitDiagram,
    External,
}

/// A change the fix loop made to the deck.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFix {
    pub slide_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub kind: FixKind,
    pub description: String,
}

/// Why a placeholder is being fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum FixReason {
    /// An overflow error. Shortened text keeps `keep_fraction` of its length.
    Overflow { keep_fraction: f64 },
    Quality(QualityCategory),
}

impl FixReason {
    pub(crate) fn overflow(detail: Option<&OverflowDetail>) -> Self {
        let keep_fraction = detail
            .filter(|d| d.content_height > 0.0)
            .map(|d| {
                (OVERFLOW_SAFETY * d.available_height / d.content_height)
                    .clamp(MIN_KEEP_FRACTION, MAX_KEEP_FRACTION)
            })
            .unwrap_or(QUALITY_KEEP_FRACTION);
        FixReason::Overflow { keep_fraction }
    }

    fn keep_fraction(self) -> f64 {
        match self {
            FixReason::Overflow { keep_fraction } => keep_fraction,
            FixReason::Quality(_) => QUALITY_KEEP_FRACTION,
        }
    }
}

struct Fix {
    kind: FixKind,
    description: String,
}

/// Apply the first fix that suits the content bound to `placeholder`.
pub(crate) fn apply(
    spec: &mut DeckSpec,
    slide_index: usize,
    placeholder: &str,
    reason: FixReason,
) -> Option<AppliedFix> {
    let content = spec.slides.get(slide_index)?.content.get(placeholder)?.clone();
    if reason == FixReason::Quality(QualityCategory::MissingRequired) {
        return None;
    }

    let fix = match content {
        ContentValue::Block(Block::Diagram(diagram)) => {
            relocate_diagram(spec, slide_index, placeholder, &diagram)
                .or_else(|| split_diagram_content(spec, slide_index, placeholder, &diagram))
        }
        _ if matches!(
            reason,
            FixReason::Quality(QualityCategory::DiagramDensity | QualityCategory::DiagramReadability)
        ) =>
        {
            None
        }
        ContentValue::Block(Block::Bullets { items }) => {
            let (keep, moved) = halves(&items)?;
            let counts = (keep.len(), moved.len());
            split_to_continuation(
                spec,
                slide_index,
                placeholder,
                ContentValue::bullets(keep),
                ContentValue::bullets(moved),
            )?;
            Some(Fix {
                kind: FixKind::SplitBullets,
                description: format!("Split {} bullets into {} + {}", counts.0 + counts.1, counts.0, counts.1),
            })
        }
        ContentValue::Block(Block::Table(table)) => split_table(spec, slide_index, placeholder, &table),
        ContentValue::Block(Block::Code { code, language }) => {
            let lines: Vec<&str> = code.lines().collect();
            let (keep, moved) = halves(&lines)?;
            let counts = (keep.len(), moved.len());
            let language = language.as_deref();
            split_to_continuation(
                spec,
                slide_index,
                placeholder,
                ContentValue::code(&keep.join("\n"), language),
                ContentValue::code(&moved.join("\n"), language),
            )?;
            Some(Fix {
                kind: FixKind::SplitCode,
                description: format!("Split {} code lines into {} + {}", lines.len(), counts.0, counts.1),
            })
        }
        ContentValue::Text(text) => split_paragraphs(spec, slide_index, placeholder, &text)
            .or_else(|| shorten(spec, slide_index, placeholder, &text, reason.keep_fraction())),
        // Styled runs would have to be split mid-run; left to an external fixer.
        ContentValue::Block(Block::RichText { .. } | Block::Image(_)) => None,
    }?;

    tracing::debug!(
        slide = slide_index,
        placeholder,
        kind = ?fix.kind,
        "{}",
        fix.description
    );
    Some(AppliedFix {
        slide_index,
        placeholder: Some(placeholder.to_string()),
        kind: fix.kind,
        description: fix.description,
    })
}

/// First half rounded up, second half the rest. `None` below two items.
fn halves<T: Clone>(items: &[T]) -> Option<(Vec<T>, Vec<T>)> {
    if items.len() < 2 {
        return None;
    }
    let mid = items.len().div_ceil(2);
    Some((items[..mid].to_vec(), items[mid..].to_vec()))
}

fn split_table(
    spec: &mut DeckSpec,
    slide_index: usize,
    placeholder: &str,
    table: &TableContent,
) -> Option<Fix> {
    let (keep, moved) = halves(&table.rows)?;
    let counts = (keep.len(), moved.len());
    split_to_continuation(
        spec,
        slide_index,
        placeholder,
        ContentValue::table(table.header.clone(), keep),
        ContentValue::table(table.header.clone(), moved),
    )?;
    Some(Fix {
        kind: FixKind::SplitTable,
        description: format!("Split {} table rows into {} + {}", table.rows.len(), counts.0, counts.1),
    })
}

/// Paragraphs separated by blank lines.
pub(crate) fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current.join("\n"));
    }
    out
}

fn split_paragraphs(
    spec: &mut DeckSpec,
    slide_index: usize,
    placeholder: &str,
    text: &str,
) -> Option<Fix> {
    let paras = paragraphs(text);
    let (keep, moved) = halves(&paras)?;
    let counts = (keep.len(), moved.len());
    split_to_continuation(
        spec,
        slide_index,
        placeholder,
        ContentValue::Text(keep.join("\n\n")),
        ContentValue::Text(moved.join("\n\n")),
    )?;
    Some(Fix {
        kind: FixKind::SplitParagraphs,
        description: format!("Split {} paragraphs into {} + {}", paras.len(), counts.0, counts.1),
    })
}

/// Cut `text` at a word boundary so that at most `keep_fraction` of its
/// characters remain, then mark the cut. At least one word is kept and at
/// least one is dropped; single-word text is never shortened.
pub(crate) fn shorten_text(text: &str, keep_fraction: f64) -> Option<String> {
    let text = text.trim_end();
    let mut word_ends = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
        if !ch.is_whitespace() && at_boundary {
            word_ends.push(i + ch.len_utf8());
        }
    }
    if word_ends.len() < 2 {
        return None;
    }

    let budget = (text.chars().count() as f64 * keep_fraction).floor() as usize;
    let mut cut = word_ends[0];
    for &end in &word_ends[1..word_ends.len() - 1] {
        if text[..end].chars().count() > budget {
            break;
        }
        cut = end;
    }
    Some(format!("{}{ELLIPSIS}", text[..cut].trim_end()))
}

fn shorten(
    spec: &mut DeckSpec,
    slide_index: usize,
    placeholder: &str,
    text: &str,
    keep_fraction: f64,
) -> Option<Fix> {
    let shortened = shorten_text(text, keep_fraction)?;
    let before = text.chars().count();
    let after = shortened.chars().count();
    let slide = spec.slides.get_mut(slide_index)?;
    slide
        .content
        .insert(placeholder.to_string(), ContentValue::Text(shortened));
    Some(Fix {
        kind: FixKind::ShortenText,
        description: format!("Shortened text from {before} to {after} characters"),
    })
}

/// Move a diagram to the layout's largest image placeholder when that one
/// is strictly larger than where the diagram sits now.
fn relocate_diagram(
    spec: &mut DeckSpec,
    slide_index: usize,
    placeholder: &str,
    diagram: &DiagramContent,
) -> Option<Fix> {
    let slide = spec.slides.get(slide_index)?;
    let layout = spec.master.layouts.get(&slide.layout)?;
    let current = layout.placeholder(placeholder)?;
    let target = layout.largest_image_placeholder()?;
    if target.rect.area() <= current.rect.area() {
        return None;
    }
    let target_name = target.name.clone();
    let only_titles = slide.content.keys().all(|name| {
        name == placeholder
            || layout
                .placeholder(name)
                .is_some_and(|p| p.kind.is_title_like())
    });
    let in_place = only_titles && !slide.content.contains_key(&target_name);
    let value = ContentValue::Block(Block::Diagram(diagram.clone()));

    if in_place {
        let slide = spec.slides.get_mut(slide_index)?;
        slide.content.shift_remove(placeholder);
        slide.content.insert(target_name.clone(), value);
        return Some(Fix {
            kind: FixKind::RelocateDiagram,
            description: format!("Moved diagram from '{placeholder}' to the larger '{target_name}'"),
        });
    }

    let continuation = continuation_slide(spec, slide_index, placeholder, &target_name, value)?;
    spec.slides.get_mut(slide_index)?.content.shift_remove(placeholder);
    spec.slides.insert(slide_index + 1, continuation);
    Some(Fix {
        kind: FixKind::RelocateDiagram,
        description: format!(
            "Moved diagram from '{placeholder}' to '{target_name}' on a new slide"
        ),
    })
}

fn split_diagram_content(
    spec: &mut DeckSpec,
    slide_index: usize,
    placeholder: &str,
    diagram: &DiagramContent,
) -> Option<Fix> {
    let split = match split_diagram(&diagram.source) {
        Ok(split) => split,
        Err(rejection) => {
            tracing::warn!(slide = slide_index, placeholder, %rejection, "diagram split rejected");
            return None;
        }
    };
    let part = |source: String| {
        ContentValue::Block(Block::Diagram(DiagramContent {
            source,
            hints: DiagramHints::default(),
        }))
    };
    let description = match &split.hub {
        Some(hub) => format!(
            "Split diagram into {} + {} nodes sharing '{hub}'",
            split.first_nodes.len(),
            split.second_nodes.len()
        ),
        None => format!(
            "Split diagram into {} + {} nodes",
            split.first_nodes.len(),
            split.second_nodes.len()
        ),
    };
    split_to_continuation(
        spec,
        slide_index,
        placeholder,
        part(split.first),
        part(split.second),
    )?;
    Some(Fix {
        kind: FixKind::SplitDiagram,
        description,
    })
}

/// Keep `keep` in place and insert a continuation slide holding `moved`.
fn split_to_continuation(
    spec: &mut DeckSpec,
    slide_index: usize,
    placeholder: &str,
    keep: ContentValue,
    moved: ContentValue,
) -> Option<()> {
    let continuation = continuation_slide(spec, slide_index, placeholder, placeholder, moved)?;
    spec.slides
        .get_mut(slide_index)?
        .content
        .insert(placeholder.to_string(), keep);
    spec.slides.insert(slide_index + 1, continuation);
    Some(())
}

/// A slide with the same layout and background as `slide_index`, its title
/// marked as continued, and `value` bound to `placeholder`.
///
/// Other required placeholders keep the source slide's content. `vacated`
/// names the placeholder the moved content came from and is left empty.
fn continuation_slide(
    spec: &DeckSpec,
    slide_index: usize,
    vacated: &str,
    placeholder: &str,
    value: ContentValue,
) -> Option<Slide> {
    let source = spec.slides.get(slide_index)?;
    let mut slide = Slide::new(&source.layout);
    slide.background = source.background.clone();

    if let Some(layout) = spec.master.layouts.get(&source.layout) {
        for ph in &layout.placeholders {
            if ph.name == placeholder || ph.name == vacated {
                continue;
            }
            let Some(content) = source.content.get(&ph.name) else {
                continue;
            };
            if ph.kind == PlaceholderType::Title {
                slide.content.insert(ph.name.clone(), continued_title(content));
            } else if ph.required {
                slide.content.insert(ph.name.clone(), content.clone());
            }
        }
    }
    slide.content.insert(placeholder.to_string(), value);
    Some(slide)
}

/// Mark a title as continued. Already marked titles are left alone.
pub(crate) fn continued_title(title: &ContentValue) -> ContentValue {
    let already = title
        .plain_text()
        .is_some_and(|t| t.trim_end().ends_with(CONTINUED_SUFFIX.trim_start()));
    if already {
        return title.clone();
    }
    match title {
        ContentValue::Text(text) => ContentValue::Text(format!("{text}{CONTINUED_SUFFIX}")),
        ContentValue::Block(Block::RichText { runs }) => {
            let mut runs = runs.clone();
            runs.push(TextRun {
                text: CONTINUED_SUFFIX.to_string(),
                style: TextStyle::default(),
            });
            ContentValue::Block(Block::RichText { runs })
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BulletItem, Layout, Master, PlaceholderDef, PlaceholderType, Rect, TableCell};
    use indexmap::IndexMap;

    fn placeholder(name: &str, kind: PlaceholderType, rect: Rect) -> PlaceholderDef {
        PlaceholderDef {
            name: name.into(),
            kind,
            rect,
            style: TextStyle::default(),
            constraints: None,
            required: false,
        }
    }

    fn deck(slides: Vec<Slide>) -> DeckSpec {
        let mut layouts = IndexMap::new();
        layouts.insert(
            "content".to_string(),
            Layout {
                placeholders: vec![
                    placeholder("title", PlaceholderType::Title, Rect::new(0.75, 0.5, 11.8, 1.0)),
                    placeholder("body", PlaceholderType::Body, Rect::new(0.75, 1.7, 5.0, 3.0)),
                    placeholder("figure", PlaceholderType::Image, Rect::new(0.75, 1.7, 11.8, 5.0)),
                ],
                ..Default::default()
            },
        );
        DeckSpec {
            master: Master {
                layouts,
                ..Default::default()
            },
            slides,
        }
    }

    fn overflow() -> FixReason {
        FixReason::Overflow { keep_fraction: 0.5 }
    }

    #[test]
    fn test_split_bullets_inserts_continuation() {
        let items = (1..=5).map(|i| BulletItem::new(&format!("item {i}"))).collect();
        let mut spec = deck(vec![Slide::new("content")
            .with("title", "Agenda")
            .with("body", ContentValue::bullets(items))]);

        let fix = apply(&mut spec, 0, "body", overflow()).unwrap();
        assert_eq!(fix.kind, FixKind::SplitBullets);
        assert_eq!(spec.slides.len(), 2);
        let ContentValue::Block(Block::Bullets { items }) = &spec.slides[0].content["body"] else {
            panic!("expected bullets");
        };
        assert_eq!(items.len(), 3);
        let ContentValue::Block(Block::Bullets { items }) = &spec.slides[1].content["body"] else {
            panic!("expected bullets");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(spec.slides[1].content["title"], ContentValue::text("Agenda (cont.)"));
    }

    #[test]
    fn test_continuation_keeps_required_placeholders() {
        let mut spec = deck(vec![Slide::new("content")
            .with("title", "Agenda")
            .with("body", ContentValue::code("a\nb\nc\nd", None))
            .with("footer", "Confidential")
            .with("notes", "optional")]);
        let layout = &mut spec.master.layouts["content"];
        let mut footer = placeholder("footer", PlaceholderType::Custom, Rect::new(0.75, 6.5, 8.0, 0.4));
        footer.required = true;
        layout.placeholders.push(footer);
        layout
            .placeholders
            .push(placeholder("notes", PlaceholderType::Body, Rect::new(9.0, 6.8, 3.0, 0.4)));

        apply(&mut spec, 0, "body", overflow()).unwrap();
        let names: Vec<_> = spec.slides[1].content.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["title", "footer", "body"]);
        assert_eq!(spec.slides[1].content["footer"], ContentValue::text("Confidential"));
        assert_eq!(spec.slides[0].content["footer"], ContentValue::text("Confidential"));
    }

    #[test]
    fn test_continued_title_is_idempotent() {
        let once = continued_title(&ContentValue::text("Agenda"));
        assert_eq!(continued_title(&once), ContentValue::text("Agenda (cont.)"));
    }

    #[test]
    fn test_table_header_repeated() {
        let header = Some(vec![TableCell::from("k"), TableCell::from("v")]);
        let rows = (0..4).map(|i| vec![TableCell::from(i.to_string().as_str()), TableCell::from("x")]).collect();
        let mut spec = deck(vec![Slide::new("content").with("body", ContentValue::table(header.clone(), rows))]);

        apply(&mut spec, 0, "body", overflow()).unwrap();
        for slide in &spec.slides {
            let ContentValue::Block(Block::Table(t)) = &slide.content["body"] else {
                panic!("expected table");
            };
            assert_eq!(t.header, header);
            assert_eq!(t.rows.len(), 2);
        }
    }

    #[test]
    fn test_code_split_keeps_language() {
        let mut spec = deck(vec![Slide::new("content").with("body", ContentValue::code("a\nb\nc", Some("rust")))]);
        let fix = apply(&mut spec, 0, "body", overflow()).unwrap();
        assert_eq!(fix.kind, FixKind::SplitCode);
        assert_eq!(spec.slides[0].content["body"], ContentValue::code("a\nb", Some("rust")));
        assert_eq!(spec.slides[1].content["body"], ContentValue::code("c", Some("rust")));
    }

    #[test]
    fn test_paragraphs_preferred_over_shortening() {
        let mut spec = deck(vec![Slide::new("content").with("body", "One.\n\nTwo.\n\n\nThree.")]);
        let fix = apply(&mut spec, 0, "body", overflow()).unwrap();
        assert_eq!(fix.kind, FixKind::SplitParagraphs);
        assert_eq!(spec.slides[0].content["body"], ContentValue::text("One.\n\nTwo."));
        assert_eq!(spec.slides[1].content["body"], ContentValue::text("Three."));
    }

    #[test]
    fn test_shorten_keeps_whole_words() {
        assert_eq!(
            shorten_text("alpha beta gamma delta", 0.5).as_deref(),
            Some("alpha beta…")
        );
        assert_eq!(shorten_text("alpha beta", 0.1).as_deref(), Some("alpha…"));
        assert_eq!(shorten_text("supercalifragilistic", 0.5), None);
        assert_eq!(shorten_text("  lonely  ", 0.5), None);
    }

    #[test]
    fn test_keep_fraction_from_overflow_ratio() {
        let detail = OverflowDetail {
            content_height: 4.0,
            available_height: 2.0,
            current_font_size: 18.0,
            suggested_font_size: None,
            line_count: None,
            max_lines: None,
        };
        assert_eq!(FixReason::overflow(Some(&detail)), FixReason::Overflow { keep_fraction: 0.45 });
        let tiny = OverflowDetail {
            content_height: 100.0,
            ..detail.clone()
        };
        assert_eq!(FixReason::overflow(Some(&tiny)), FixReason::Overflow { keep_fraction: 0.1 });
        assert_eq!(FixReason::overflow(None), FixReason::Overflow { keep_fraction: 0.85 });
    }

    #[test]
    fn test_diagram_relocated_in_place() {
        let src = "flowchart LR\n  A --> B\n";
        let mut spec = deck(vec![Slide::new("content")
            .with("title", "Flow")
            .with("body", ContentValue::diagram(src))]);
        let fix = apply(&mut spec, 0, "body", FixReason::Quality(QualityCategory::DiagramReadability)).unwrap();
        assert_eq!(fix.kind, FixKind::RelocateDiagram);
        assert_eq!(spec.slides.len(), 1);
        assert!(!spec.slides[0].content.contains_key("body"));
        assert_eq!(spec.slides[0].content["figure"], ContentValue::diagram(src));
    }

    #[test]
    fn test_diagram_relocated_to_new_slide_when_crowded() {
        let src = "flowchart LR\n  A --> B\n";
        let mut spec = deck(vec![Slide::new("content")
            .with("title", "Flow")
            .with("body", ContentValue::diagram(src))
            .with("figure", ContentValue::image("https://example.com/a.png"))]);
        apply(&mut spec, 0, "body", FixReason::Quality(QualityCategory::DiagramDensity)).unwrap();
        assert_eq!(spec.slides.len(), 2);
        assert!(!spec.slides[0].content.contains_key("body"));
        assert_eq!(spec.slides[1].content["figure"], ContentValue::diagram(src));
        assert_eq!(spec.slides[1].content["title"], ContentValue::text("Flow (cont.)"));
    }

    #[test]
    fn test_diagram_in_largest_placeholder_is_split() {
        let src = "flowchart TD\n  hub --> a\n  hub --> b\n  hub --> c\n  hub --> d\n";
        let mut spec = deck(vec![Slide::new("content").with("figure", ContentValue::diagram(src))]);
        let fix = apply(&mut spec, 0, "figure", FixReason::Quality(QualityCategory::DiagramDensity)).unwrap();
        assert_eq!(fix.kind, FixKind::SplitDiagram);
        assert_eq!(spec.slides.len(), 2);
        assert_eq!(
            spec.slides[1].content["figure"],
            ContentValue::diagram("flowchart TD\n  hub --> c\n  hub --> d\n")
        );
    }

    #[test]
    fn test_unfixable_content_untouched() {
        let mut spec = deck(vec![Slide::new("content").with("body", "Pneumonoultramicroscopic")]);
        let before = spec.clone();
        assert!(apply(&mut spec, 0, "body", overflow()).is_none());
        assert!(apply(&mut spec, 0, "missing", overflow()).is_none());
        assert!(apply(&mut spec, 7, "body", overflow()).is_none());
        assert_eq!(spec, before);
    }
}
