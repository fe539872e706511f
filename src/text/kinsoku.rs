//! CJK character classification and kinsoku (line-breaking) rules.
//!
//! CJK characters wrap one at a time. Kinsoku forbids some punctuation at
//! the start of a line (closing brackets, commas, small kana, prolonged
//! sound marks) and some at the end of a line (opening brackets).

/// Whether `ch` wraps as an individual CJK unit.
pub fn is_cjk(ch: char) -> bool {
    matches!(
        ch as u32,
        0x3000..=0x303F     // CJK symbols and punctuation
            | 0x3040..=0x30FF   // hiragana, katakana
            | 0x3400..=0x4DBF   // extension A
            | 0x4E00..=0x9FFF   // unified ideographs
            | 0xF900..=0xFAFF   // compatibility ideographs
            | 0xFF00..=0xFFEF   // halfwidth and fullwidth forms
            | 0xAC00..=0xD7AF   // hangul syllables
            | 0x20000..=0x2FA1F // supplementary ideographic planes
    )
}

const LINE_START_PROHIBITED: &str = "、。，．・：；？！゛゜ヽヾゝゞ々ー）］｝」』〉》〕】〙〗〟’”｠»\
ぁぃぅぇぉっゃゅょゎゕゖァィゥェォッャュョヮヵヶ,.:;!?)]}";

const LINE_END_PROHIBITED: &str = "（［｛「『〈《〔【〘〖〝‘“｟«([{";

/// Characters that may not begin a line.
pub fn is_line_start_prohibited(ch: char) -> bool {
    LINE_START_PROHIBITED.contains(ch)
}

/// Characters that may not end a line.
pub fn is_line_end_prohibited(ch: char) -> bool {
    LINE_END_PROHIBITED.contains(ch)
}

/// Choose where to end a full line before a break.
///
/// `line` is the visible content of the line (trailing whitespace already
/// removed) and `next` is the first character that did not fit. When
/// `spaced` is true the break falls on whitespace, so no character needs to
/// be pulled down. Returns the number of leading characters that stay on the
/// line; the rest move to the next one. `None` means no legal break exists
/// and the next character must hang on this line.
pub fn break_point(line: &[char], next: char, spaced: bool) -> Option<usize> {
    let mut split = line.len();
    if !spaced {
        // Pull characters down until the new line no longer starts with a
        // prohibited one.
        let mut first = next;
        while split > 0 && is_line_start_prohibited(first) {
            split -= 1;
            first = line[split];
        }
    }
    while split > 0 && is_line_end_prohibited(line[split - 1]) {
        split -= 1;
    }
    (split > 0).then_some(split)
}
