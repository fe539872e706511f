//! Well-known system font locations.
//!
//! When a theme does not name an explicit font file for a role, the layout
//! engine probes these paths in order and uses the first that exists. The
//! lists cover the fonts shipped by common Linux distributions, macOS and
//! Windows.

use std::path::{Path, PathBuf};

/// Typographic role a font file is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    Heading,
    Body,
    Mono,
}

impl FontRole {
    pub fn as_str(self) -> &'static str {
        match self {
            FontRole::Heading => "heading",
            FontRole::Body => "body",
            FontRole::Mono => "mono",
        }
    }
}

#[cfg(target_os = "macos")]
mod paths {
    pub const SANS_REGULAR: &[&str] = &[
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
        "/System/Library/Fonts/Helvetica.ttc",
        "/System/Library/Fonts/SFNS.ttf",
    ];
    pub const SANS_BOLD: &[&str] = &[
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        "/Library/Fonts/Arial Bold.ttf",
    ];
    pub const MONO_REGULAR: &[&str] = &[
        "/System/Library/Fonts/Menlo.ttc",
        "/System/Library/Fonts/Supplemental/Courier New.ttf",
        "/Library/Fonts/Courier New.ttf",
    ];
    pub const MONO_BOLD: &[&str] = &[
        "/System/Library/Fonts/Supplemental/Courier New Bold.ttf",
        "/Library/Fonts/Courier New Bold.ttf",
    ];
}

#[cfg(target_os = "windows")]
mod paths {
    pub const SANS_REGULAR: &[&str] = &[
        "C:\\Windows\\Fonts\\arial.ttf",
        "C:\\Windows\\Fonts\\segoeui.ttf",
        "C:\\Windows\\Fonts\\calibri.ttf",
    ];
    pub const SANS_BOLD: &[&str] = &[
        "C:\\Windows\\Fonts\\arialbd.ttf",
        "C:\\Windows\\Fonts\\segoeuib.ttf",
        "C:\\Windows\\Fonts\\calibrib.ttf",
    ];
    pub const MONO_REGULAR: &[&str] = &[
        "C:\\Windows\\Fonts\\consola.ttf",
        "C:\\Windows\\Fonts\\cour.ttf",
    ];
    pub const MONO_BOLD: &[&str] = &[
        "C:\\Windows\\Fonts\\consolab.ttf",
        "C:\\Windows\\Fonts\\courbd.ttf",
    ];
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
mod paths {
    pub const SANS_REGULAR: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    ];
    pub const SANS_BOLD: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
        "/usr/share/fonts/noto/NotoSans-Bold.ttf",
    ];
    pub const MONO_REGULAR: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
        "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
        "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
        "/usr/share/fonts/dejavu-sans-mono-fonts/DejaVuSansMono.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
        "/usr/share/fonts/liberation/LiberationMono-Regular.ttf",
    ];
    pub const MONO_BOLD: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSansMono-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSansMono-Bold.ttf",
        "/usr/share/fonts/dejavu/DejaVuSansMono-Bold.ttf",
        "/usr/share/fonts/dejavu-sans-mono-fonts/DejaVuSansMono-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationMono-Bold.ttf",
        "/usr/share/fonts/liberation/LiberationMono-Bold.ttf",
    ];
}

/// Candidate paths for a role and weight, in probe order. Headings and body
/// text share the sans lists.
pub fn candidates(role: FontRole, bold: bool) -> &'static [&'static str] {
    match (role, bold) {
        (FontRole::Mono, false) => paths::MONO_REGULAR,
        (FontRole::Mono, true) => paths::MONO_BOLD,
        (_, false) => paths::SANS_REGULAR,
        (_, true) => paths::SANS_BOLD,
    }
}

/// First existing system font for a role. A bold request falls back to the
/// regular list when no bold file is installed.
pub fn find_system_font(role: FontRole, bold: bool) -> Option<PathBuf> {
    let probe = |list: &[&str]| {
        list.iter()
            .map(Path::new)
            .find(|p| p.is_file())
            .map(Path::to_path_buf)
    };
    let found = if bold {
        probe(candidates(role, true)).or_else(|| probe(candidates(role, false)))
    } else {
        probe(candidates(role, false))
    };
    tracing::debug!(role = role.as_str(), bold, found = ?found, "probed system fonts");
    found
}
