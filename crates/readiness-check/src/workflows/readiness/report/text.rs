//! Character-set sanitising, font metrics, and word wrapping for report text.
//!
//! Reports use the standard Helvetica faces with WinAnsi encoding, so every string is
//! reduced to printable Latin-1 before it reaches a backend.

/// Map text onto printable Latin-1.
///
/// En/em dashes become `-`, the right arrow becomes `->`, line breaks and tabs become
/// spaces, and any other character outside `0x20..=0x7E` / `0xA0..=0xFF` is dropped.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2192}' => out.push_str("->"),
            '\t' | '\n' | '\r' => out.push(' '),
            ' '..='~' | '\u{a0}'..='\u{ff}' => out.push(c),
            _ => {}
        }
    }
    out
}

/// Latin-1 bytes of already sanitised text; characters above `0xFF` are skipped.
pub fn latin1_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .filter_map(|c| u8::try_from(u32::from(c)).ok())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    pub const fn base_font(self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
        }
    }

    pub const fn resource_name(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }

    /// Advance width in 1/1000 em, from the Adobe core font metrics.
    fn glyph_width(self, c: char) -> u16 {
        let code = u32::from(c);
        let table = match self {
            Self::Regular => &HELVETICA_WIDTHS,
            Self::Bold => &HELVETICA_BOLD_WIDTHS,
        };
        match code {
            0x20..=0x7e => table[(code - 0x20) as usize],
            _ => 556,
        }
    }

    pub fn text_width(self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.glyph_width(c))).sum();
        units as f32 * size / 1000.0
    }
}

/// Greedy word wrap of sanitised text.
///
/// A word wider than `max_width` on its own is broken between characters.
pub fn wrap_text(text: &str, font: FontFace, size: f32, max_width: f32) -> Vec<String> {
    let safe = sanitize(text);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in safe.split_whitespace() {
        for piece in break_word(word, font, size, max_width) {
            let candidate = if current.is_empty() {
                piece.to_string()
            } else {
                format!("{current} {piece}")
            };

            if font.text_width(&candidate, size) > max_width && !current.is_empty() {
                lines.push(std::mem::replace(&mut current, piece.to_string()));
            } else {
                current = candidate;
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn break_word(word: &str, font: FontFace, size: f32, max_width: f32) -> Vec<&str> {
    if font.text_width(word, size) <= max_width {
        return vec![word];
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    let mut width = 0.0;
    for (index, c) in word.char_indices() {
        let glyph = f32::from(font.glyph_width(c)) * size / 1000.0;
        if width + glyph > max_width && index > start {
            pieces.push(&word[start..index]);
            start = index;
            width = 0.0;
        }
        width += glyph;
    }
    pieces.push(&word[start..]);
    pieces
}

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];
