//! Content values bound to placeholders.
//!
//! A bare JSON string is plain text. Everything else is an object tagged by
//! `"type"`: `richText`, `bullets`, `table`, `code`, `image` or `diagram`.

use serde::{Deserialize, Serialize};

use crate::style::TextStyle;

/// Content supplied for one placeholder of one slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentValue {
    Text(String),
    Block(Block),
}

/// Structured (non plain-string) content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    RichText {
        runs: Vec<TextRun>,
    },
    Bullets {
        items: Vec<BulletItem>,
    },
    Table(TableContent),
    Code {
        code: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    Image(ImageRef),
    Diagram(DiagramContent),
}

/// Coarse classification used for measurement dispatch and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Text,
    RichText,
    Bullets,
    Table,
    Code,
    Image,
    Diagram,
}

impl ContentValue {
    pub fn text(text: &str) -> Self {
        ContentValue::Text(text.to_string())
    }

    pub fn bullets(items: Vec<BulletItem>) -> Self {
        ContentValue::Block(Block::Bullets { items })
    }

    pub fn table(header: Option<Vec<TableCell>>, rows: Vec<Vec<TableCell>>) -> Self {
        ContentValue::Block(Block::Table(TableContent { header, rows }))
    }

    pub fn code(code: &str, language: Option<&str>) -> Self {
        ContentValue::Block(Block::Code {
            code: code.to_string(),
            language: language.map(str::to_string),
        })
    }

    pub fn image(src: &str) -> Self {
        ContentValue::Block(Block::Image(ImageRef {
            src: src.to_string(),
            fit: ImageFit::default(),
        }))
    }

    pub fn diagram(source: &str) -> Self {
        ContentValue::Block(Block::Diagram(DiagramContent {
            source: source.to_string(),
            hints: DiagramHints::default(),
        }))
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            ContentValue::Text(_) => ContentKind::Text,
            ContentValue::Block(Block::RichText { .. }) => ContentKind::RichText,
            ContentValue::Block(Block::Bullets { .. }) => ContentKind::Bullets,
            ContentValue::Block(Block::Table(_)) => ContentKind::Table,
            ContentValue::Block(Block::Code { .. }) => ContentKind::Code,
            ContentValue::Block(Block::Image(_)) => ContentKind::Image,
            ContentValue::Block(Block::Diagram(_)) => ContentKind::Diagram,
        }
    }

    /// Flatten text-like content (plain, rich, code) to a plain string.
    pub fn plain_text(&self) -> Option<String> {
        match self {
            ContentValue::Text(s) => Some(s.clone()),
            ContentValue::Block(Block::RichText { runs }) => {
                Some(runs.iter().map(|r| r.text.as_str()).collect())
            }
            ContentValue::Block(Block::Code { code, .. }) => Some(code.clone()),
            _ => None,
        }
    }

    /// Whether measuring this content requires glyph metrics. Tables are
    /// estimated from row counts alone.
    pub fn needs_glyph_metrics(&self) -> bool {
        !matches!(
            self.kind(),
            ContentKind::Table | ContentKind::Image | ContentKind::Diagram
        )
    }
}

impl From<&str> for ContentValue {
    fn from(s: &str) -> Self {
        ContentValue::Text(s.to_string())
    }
}

impl From<String> for ContentValue {
    fn from(s: String) -> Self {
        ContentValue::Text(s)
    }
}

impl From<Block> for ContentValue {
    fn from(b: Block) -> Self {
        ContentValue::Block(b)
    }
}

/// An inline styled run of rich text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "TextStyle::is_empty")]
    pub style: TextStyle,
}

/// A bullet list item. Nesting depth is unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "BulletInput")]
pub struct BulletItem {
    pub text: String,
    #[serde(default, skip_serializing_if = "TextStyle::is_empty")]
    pub style: TextStyle,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BulletItem>,
}

impl BulletItem {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            style: TextStyle::default(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<BulletItem>) -> Self {
        self.children = children;
        self
    }
}

/// Accepts either `"text"` or `{ "text", "style", "children" }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum BulletInput {
    Plain(String),
    Full {
        text: String,
        #[serde(default)]
        style: TextStyle,
        #[serde(default)]
        children: Vec<BulletItem>,
    },
}

impl From<BulletInput> for BulletItem {
    fn from(input: BulletInput) -> Self {
        match input {
            BulletInput::Plain(text) => BulletItem {
                text,
                style: TextStyle::default(),
                children: Vec::new(),
            },
            BulletInput::Full {
                text,
                style,
                children,
            } => BulletItem {
                text,
                style,
                children,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Vec<TableCell>>,
    #[serde(default)]
    pub rows: Vec<Vec<TableCell>>,
}

impl TableContent {
    /// Rows the renderer will draw, header included.
    pub fn row_count(&self) -> usize {
        self.rows.len() + usize::from(self.header.is_some())
    }
}

/// A table cell: plain text or text with a style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableCell {
    Plain(String),
    Styled {
        text: String,
        #[serde(default)]
        style: TextStyle,
    },
}

impl TableCell {
    pub fn text(&self) -> &str {
        match self {
            TableCell::Plain(s) => s,
            TableCell::Styled { text, .. } => text,
        }
    }
}

impl From<&str> for TableCell {
    fn from(s: &str) -> Self {
        TableCell::Plain(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub src: String,
    #[serde(default)]
    pub fit: ImageFit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageFit {
    #[default]
    Contain,
    Cover,
    Stretch,
}

/// A diagram: opaque source text plus structural hints from the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramContent {
    pub source: String,
    #[serde(default)]
    pub hints: DiagramHints,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_count: Option<usize>,
    /// Smallest label font size at the diagram's native scale, in points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_min_font_size: Option<f64>,
    /// Native bounding box, in points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_box: Option<ViewBox>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub width: f64,
    pub height: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_string_is_plain_text() {
        let v: ContentValue = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(v, ContentValue::text("hello"));
        assert_eq!(v.kind(), ContentKind::Text);
    }

    #[test]
    fn test_bullets_accept_strings_and_objects() {
        let v: ContentValue = serde_json::from_str(
            r#"{ "type": "bullets", "items": ["one", { "text": "two", "children": ["two.a"] }] }"#,
        )
        .unwrap();
        let ContentValue::Block(Block::Bullets { items }) = v else {
            panic!("expected bullets");
        };
        assert_eq!(items[0].text, "one");
        assert_eq!(items[1].children[0].text, "two.a");
    }

    #[test]
    fn test_table_row_count_includes_header() {
        let v: ContentValue = serde_json::from_str(
            r#"{ "type": "table", "header": ["a", "b"], "rows": [["1", "2"], [{ "text": "3" }, "4"]] }"#,
        )
        .unwrap();
        let ContentValue::Block(Block::Table(table)) = v else {
            panic!("expected table");
        };
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows[1][0].text(), "3");
    }

    #[test]
    fn test_rich_text_flattens_runs() {
        let v: ContentValue = serde_json::from_str(
            r#"{ "type": "richText", "runs": [{ "text": "bold ", "style": { "bold": true } }, { "text": "plain" }] }"#,
        )
        .unwrap();
        assert_eq!(v.plain_text().as_deref(), Some("bold plain"));
    }

    #[test]
    fn test_only_text_like_content_needs_glyph_metrics() {
        assert!(ContentValue::text("x").needs_glyph_metrics());
        assert!(ContentValue::code("x", None).needs_glyph_metrics());
        assert!(ContentValue::bullets(vec![BulletItem::new("x")]).needs_glyph_metrics());
        assert!(!ContentValue::table(None, vec![vec!["x".into()]]).needs_glyph_metrics());
        assert!(!ContentValue::image("a.png").needs_glyph_metrics());
        assert!(!ContentValue::diagram("graph TD").needs_glyph_metrics());
    }

    #[test]
    fn test_serializes_back_to_tagged_form() {
        let v = ContentValue::code("fn main() {}", Some("rust"));
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["type"], "code");
        assert_eq!(json["language"], "rust");
        let back: ContentValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, v);
    }
}
