//! Line classification for flowchart sources.
//!
//! Every source line lands in exactly one bucket. The splitter only needs
//! to know which node identifiers a line refers to and whether the line is
//! global, so this is a line scanner and not a full grammar.

use super::SplitRejection;

/// What a source line means to the splitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineKind {
    /// Front matter, directives and comments before the header.
    Preamble,
    Header,
    /// `%%` comments, `classDef` and blank lines. Copied into both parts.
    Global,
    /// `style <id> ...` or `click <id> ...`.
    NodeStyle(String),
    /// `class <id,id> <cls>`.
    ClassAssign {
        indent: String,
        ids: Vec<String>,
        class: String,
    },
    /// Node groups between arrows, in order: `A & B --> C` is `[[A, B], [C]]`.
    Edge(Vec<Vec<String>>),
    Node(String),
    /// `linkStyle`, `subgraph`, `end`, `direction`.
    Dropped,
    Unknown,
}

impl LineKind {
    /// Node identifiers the line refers to.
    pub(crate) fn node_refs(&self) -> Vec<&str> {
        match self {
            LineKind::NodeStyle(id) | LineKind::Node(id) => vec![id.as_str()],
            LineKind::ClassAssign { ids, .. } => ids.iter().map(String::as_str).collect(),
            LineKind::Edge(groups) => groups.iter().flatten().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Undirected node pairs connected by this line.
    pub(crate) fn edge_pairs(&self) -> Vec<(&str, &str)> {
        let LineKind::Edge(groups) = self else {
            return Vec::new();
        };
        let mut pairs = Vec::new();
        for window in groups.windows(2) {
            for a in &window[0] {
                for b in &window[1] {
                    pairs.push((a.as_str(), b.as_str()));
                }
            }
        }
        pairs
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ParsedLine<'a> {
    pub text: &'a str,
    pub kind: LineKind,
}

#[derive(Debug, Clone)]
pub(crate) struct ParsedDiagram<'a> {
    pub lines: Vec<ParsedLine<'a>>,
}

impl<'a> ParsedDiagram<'a> {
    pub(crate) fn preamble(&self) -> impl Iterator<Item = &ParsedLine<'a>> + '_ {
        self.lines
            .iter()
            .filter(|l| matches!(l.kind, LineKind::Preamble | LineKind::Header))
    }

    pub(crate) fn body(&self) -> impl Iterator<Item = &ParsedLine<'a>> + '_ {
        self.lines
            .iter()
            .filter(|l| !matches!(l.kind, LineKind::Preamble | LineKind::Header))
    }
}

/// Classify every line of a flowchart source.
pub(crate) fn parse(source: &str) -> Result<ParsedDiagram<'_>, SplitRejection> {
    let mut lines = Vec::new();
    let mut raw = source.lines();
    let mut in_front_matter = false;
    let mut front_matter_seen = false;

    // Preamble up to and including the header.
    loop {
        let Some(text) = raw.next() else {
            return Err(SplitRejection::Unsupported);
        };
        let trimmed = text.trim();
        if in_front_matter {
            in_front_matter = trimmed != "---";
            lines.push(ParsedLine { text, kind: LineKind::Preamble });
            continue;
        }
        if trimmed == "---" && !front_matter_seen {
            in_front_matter = true;
            front_matter_seen = true;
            lines.push(ParsedLine { text, kind: LineKind::Preamble });
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with("%%") {
            lines.push(ParsedLine { text, kind: LineKind::Preamble });
            continue;
        }
        if is_header(trimmed) {
            lines.push(ParsedLine { text, kind: LineKind::Header });
            break;
        }
        return Err(SplitRejection::Unsupported);
    }

    for text in raw {
        lines.push(ParsedLine {
            text,
            kind: classify(text),
        });
    }
    Ok(ParsedDiagram { lines })
}

fn is_header(trimmed: &str) -> bool {
    ["flowchart", "graph"].iter().any(|kw| {
        trimmed
            .strip_prefix(kw)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    })
}

fn classify(text: &str) -> LineKind {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with("%%") {
        return LineKind::Global;
    }
    let statement = trimmed.trim_end_matches(';').trim_end();
    let (first_word, rest) = statement
        .split_once(char::is_whitespace)
        .map(|(w, r)| (w, r.trim()))
        .unwrap_or((statement, ""));

    match first_word {
        "classDef" => return LineKind::Global,
        "linkStyle" | "subgraph" | "end" | "direction" => return LineKind::Dropped,
        "style" | "click" => {
            return match leading_identifier(rest) {
                Some(id) => LineKind::NodeStyle(id.to_string()),
                None => LineKind::Unknown,
            }
        }
        "class" => return classify_class_assign(text, rest),
        _ => {}
    }

    let arrows = find_arrows(statement);
    if !arrows.is_empty() {
        return classify_edge(statement, &arrows);
    }
    match leading_identifier(statement) {
        Some(id) => LineKind::Node(id.to_string()),
        None => LineKind::Unknown,
    }
}

fn classify_class_assign(text: &str, rest: &str) -> LineKind {
    let Some((ids, class)) = rest.split_once(char::is_whitespace) else {
        return LineKind::Unknown;
    };
    let ids: Vec<String> = ids
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();
    if ids.is_empty() {
        return LineKind::Unknown;
    }
    let indent_len = text.len() - text.trim_start().len();
    LineKind::ClassAssign {
        indent: text[..indent_len].to_string(),
        ids,
        class: class.trim().trim_end_matches(';').to_string(),
    }
}

fn classify_edge(statement: &str, arrows: &[Arrow]) -> LineKind {
    let mut segments = Vec::new();
    let mut pos = 0;
    let mut i = 0;
    while i < arrows.len() {
        let arrow = &arrows[i];
        segments.push(&statement[pos..arrow.start]);
        // "A -- label --> B": the text up to the closing arrow is a label.
        if arrow.opens_label && i + 1 < arrows.len() {
            pos = arrows[i + 1].end;
            i += 2;
        } else {
            pos = arrow.end;
            i += 1;
        }
    }
    segments.push(&statement[pos..]);

    let groups: Vec<Vec<String>> = segments
        .into_iter()
        .map(|seg| {
            skip_pipe_label(seg.trim())
                .split('&')
                .filter_map(leading_identifier)
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|g: &Vec<String>| !g.is_empty())
        .collect();

    if groups.is_empty() {
        LineKind::Unknown
    } else {
        LineKind::Edge(groups)
    }
}

fn skip_pipe_label(segment: &str) -> &str {
    match segment.strip_prefix('|') {
        Some(rest) => match rest.find('|') {
            Some(end) => rest[end + 1..].trim_start(),
            None => rest,
        },
        None => segment,
    }
}

/// Byte span of an arrow in a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Arrow {
    pub start: usize,
    pub end: usize,
    /// Headless two-character opener of a text label (`--`, `==`, `-.`).
    pub opens_label: bool,
}

/// `.-` only closes a dotted label: `A -. text .-> B`.
const ARROW_OPENERS: &[&str] = &["<-", "<=", "--", "==", "-.", ".-", "~~~"];
const ARROW_CHARS: &[char] = &['<', '-', '=', '.', '~', '>'];

/// Arrows outside brackets, quotes and `|labels|`.
pub(crate) fn find_arrows(statement: &str) -> Vec<Arrow> {
    let bytes = statement.as_bytes();
    let mut arrows = Vec::new();
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut in_pipe = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if in_quote {
            in_quote = b != b'"';
            i += 1;
            continue;
        }
        match b {
            b'"' => in_quote = true,
            b'[' | b'(' | b'{' => depth += 1,
            b']' | b')' | b'}' => depth = depth.saturating_sub(1),
            b'|' if depth == 0 => in_pipe = !in_pipe,
            _ if depth == 0 && !in_pipe && b.is_ascii() => {
                let rest = &statement[i..];
                if ARROW_OPENERS.iter().any(|op| rest.starts_with(op)) {
                    let mut end = i;
                    while end < bytes.len() && ARROW_CHARS.contains(&(bytes[end] as char)) {
                        end += 1;
                    }
                    let run = &statement[i..end];
                    // Circle and cross heads: "--o B", "--x B".
                    if (run.ends_with('-') || run.ends_with('='))
                        && matches!(bytes.get(end), Some(b'o' | b'x'))
                        && bytes
                            .get(end + 1)
                            .map_or(true, |c| c.is_ascii_whitespace() || *c == b'|')
                    {
                        end += 1;
                    }
                    let arrow_text = &statement[i..end];
                    arrows.push(Arrow {
                        start: i,
                        end,
                        opens_label: matches!(arrow_text, "--" | "==" | "-."),
                    });
                    i = end;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }
    arrows
}

/// The node identifier a fragment starts with: letters, digits and `_`,
/// plus `-` or `.` joining two identifier characters.
pub(crate) fn leading_identifier(fragment: &str) -> Option<&str> {
    let s = fragment.trim_start();
    let mut end = 0;
    let mut chars = s.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if ch.is_alphanumeric() || ch == '_' {
            end = i + ch.len_utf8();
            continue;
        }
        if (ch == '-' || ch == '.') && end == i && end > 0 {
            let joins = chars
                .peek()
                .is_some_and(|(_, next)| next.is_alphanumeric() || *next == '_');
            if joins {
                continue;
            }
        }
        break;
    }
    (end > 0).then(|| &s[..end])
}
