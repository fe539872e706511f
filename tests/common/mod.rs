//! Shared fixtures for the integration tests.
//!
//! `TestSans` is a tiny TrueType font built in memory so measurements do not
//! depend on fonts installed on the host:
//!
//! | glyph | chars                         | advance (of 1000) |
//! |-------|-------------------------------|-------------------|
//! | 0     | anything unmapped (.notdef)   | 500               |
//! | 1     | space                         | 250               |
//! | 2     | printable ASCII except A, V   | 500               |
//! | 3     | CJK, kana, fullwidth forms    | 1000              |
//! | 4     | `A`                           | 500               |
//! | 5     | `V`                           | 500               |
//!
//! The `kern` table pulls the pair `AV` together by 100 units.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tempfile::TempDir;

use deckfit::model::{
    Constraints, DeckSpec, FontFiles, Layout, Master, OverflowStrategy, PlaceholderDef,
    PlaceholderType, Rect, Slide,
};
use deckfit::style::TextStyle;
use deckfit::CompileOptions;

pub const UNITS_PER_EM: u16 = 1000;
const ADVANCES: [u16; 6] = [500, 250, 500, 1000, 500, 500];

/// The font written to a temporary directory that lives as long as this value.
pub struct TestFont {
    _dir: TempDir,
    pub path: PathBuf,
}

pub fn test_font() -> TestFont {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("TestSans.ttf");
    std::fs::write(&path, build_font()).unwrap();
    TestFont { _dir: dir, path }
}

pub fn build_font() -> Vec<u8> {
    let tables: [(&[u8; 4], Vec<u8>); 6] = [
        (b"cmap", cmap()),
        (b"head", head()),
        (b"hhea", hhea()),
        (b"hmtx", hmtx()),
        (b"kern", kern()),
        (b"maxp", maxp()),
    ];

    let header_len = 12 + 16 * tables.len();
    let mut out = Vec::new();
    out.extend(0x0001_0000u32.to_be_bytes());
    out.extend((tables.len() as u16).to_be_bytes());
    out.extend(64u16.to_be_bytes()); // searchRange
    out.extend(2u16.to_be_bytes()); // entrySelector
    out.extend(32u16.to_be_bytes()); // rangeShift

    let mut body = Vec::new();
    for (tag, data) in &tables {
        let offset = header_len + body.len();
        out.extend(*tag);
        out.extend(0u32.to_be_bytes());
        out.extend((offset as u32).to_be_bytes());
        out.extend((data.len() as u32).to_be_bytes());
        body.extend(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
    }
    out.extend(body);
    out
}

fn head() -> Vec<u8> {
    let mut t = Vec::new();
    t.extend(0x0001_0000u32.to_be_bytes()); // version
    t.extend(0x0001_0000u32.to_be_bytes()); // fontRevision
    t.extend(0u32.to_be_bytes()); // checksumAdjustment
    t.extend(0x5F0F_3CF5u32.to_be_bytes()); // magicNumber
    t.extend(0u16.to_be_bytes()); // flags
    t.extend(UNITS_PER_EM.to_be_bytes());
    t.extend(0i64.to_be_bytes()); // created
    t.extend(0i64.to_be_bytes()); // modified
    for v in [0i16, -200, 1000, 800] {
        t.extend(v.to_be_bytes()); // bounding box
    }
    t.extend(0u16.to_be_bytes()); // macStyle
    t.extend(8u16.to_be_bytes()); // lowestRecPPEM
    t.extend(2i16.to_be_bytes()); // fontDirectionHint
    t.extend(0i16.to_be_bytes()); // indexToLocFormat
    t.extend(0i16.to_be_bytes()); // glyphDataFormat
    assert_eq!(t.len(), 54);
    t
}

fn hhea() -> Vec<u8> {
    let mut t = Vec::new();
    t.extend(0x0001_0000u32.to_be_bytes());
    for v in [800i16, -200, 0] {
        t.extend(v.to_be_bytes()); // ascender, descender, lineGap
    }
    t.extend(1000u16.to_be_bytes()); // advanceWidthMax
    for v in [0i16, 0, 1000, 1, 0, 0, 0, 0, 0, 0, 0] {
        // minLSB, minRSB, xMaxExtent, caret rise/run/offset, 4 reserved, metricDataFormat
        t.extend(v.to_be_bytes());
    }
    t.extend((ADVANCES.len() as u16).to_be_bytes());
    assert_eq!(t.len(), 36);
    t
}

fn maxp() -> Vec<u8> {
    let mut t = Vec::new();
    t.extend(0x0000_5000u32.to_be_bytes());
    t.extend((ADVANCES.len() as u16).to_be_bytes());
    t
}

fn hmtx() -> Vec<u8> {
    let mut t = Vec::new();
    for adv in ADVANCES {
        t.extend(adv.to_be_bytes());
        t.extend(0i16.to_be_bytes());
    }
    t
}

fn cmap() -> Vec<u8> {
    let groups: &[(u32, u32, u32)] = &[
        (0x20, 0x20, 1),
        (0x21, 0x40, 2),
        (0x41, 0x41, 4),
        (0x42, 0x55, 2),
        (0x56, 0x56, 5),
        (0x57, 0x7E, 2),
        (0x3000, 0x30FF, 3),
        (0x4E00, 0x9FFF, 3),
        (0xFF00, 0xFFEF, 3),
    ];
    let mut t = Vec::new();
    t.extend(0u16.to_be_bytes()); // version
    t.extend(1u16.to_be_bytes()); // numTables
    t.extend(0u16.to_be_bytes()); // platform: Unicode
    t.extend(6u16.to_be_bytes()); // encoding: full repertoire
    t.extend(12u32.to_be_bytes()); // subtable offset
    t.extend(13u16.to_be_bytes()); // format 13: many-to-one ranges
    t.extend(0u16.to_be_bytes());
    t.extend((16 + 12 * groups.len() as u32).to_be_bytes());
    t.extend(0u32.to_be_bytes()); // language
    t.extend((groups.len() as u32).to_be_bytes());
    for &(start, end, glyph) in groups {
        t.extend(start.to_be_bytes());
        t.extend(end.to_be_bytes());
        t.extend(glyph.to_be_bytes());
    }
    t
}

fn kern() -> Vec<u8> {
    let mut t = Vec::new();
    t.extend(0u16.to_be_bytes()); // version
    t.extend(1u16.to_be_bytes()); // nTables
    t.extend(0u16.to_be_bytes()); // subtable version
    t.extend(20u16.to_be_bytes()); // subtable length
    t.extend([0u8, 0x01]); // format 0, horizontal
    t.extend(1u16.to_be_bytes()); // nPairs
    t.extend(6u16.to_be_bytes()); // searchRange
    t.extend(0u16.to_be_bytes()); // entrySelector
    t.extend(0u16.to_be_bytes()); // rangeShift
    t.extend(4u16.to_be_bytes()); // A
    t.extend(5u16.to_be_bytes()); // V
    t.extend((-100i16).to_be_bytes());
    t
}

// ─── Deck builders ──────────────────────────────────────────────

pub fn options() -> CompileOptions {
    CompileOptions {
        system_font_fallback: false,
        ..CompileOptions::default()
    }
}

pub fn placeholder(name: &str, kind: PlaceholderType, rect: Rect) -> PlaceholderDef {
    PlaceholderDef {
        name: name.to_string(),
        kind,
        rect,
        style: TextStyle::default(),
        constraints: None,
        required: false,
    }
}

pub fn constrained(
    mut ph: PlaceholderDef,
    overflow: OverflowStrategy,
    min_font_size: Option<f64>,
) -> PlaceholderDef {
    ph.constraints = Some(Constraints {
        overflow,
        min_font_size,
        ..Constraints::default()
    });
    ph
}

pub fn title_placeholder() -> PlaceholderDef {
    placeholder("title", PlaceholderType::Title, Rect::new(0.75, 0.5, 11.8, 1.0))
}

/// A deck with a single layout named "content" measured with `font`.
pub fn deck(font: &Path, placeholders: Vec<PlaceholderDef>, slides: Vec<Slide>) -> DeckSpec {
    let mut layouts = IndexMap::new();
    layouts.insert(
        "content".to_string(),
        Layout {
            placeholders,
            ..Layout::default()
        },
    );
    let mut master = Master {
        layouts,
        ..Master::default()
    };
    master.theme.font_paths.body = Some(FontFiles {
        regular: font.display().to_string(),
        bold: None,
    });
    DeckSpec { master, slides }
}
