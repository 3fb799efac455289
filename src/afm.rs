//! AFM width tables for the built-in PDF Type1 fonts used by the exporter.
//!
//! Widths are in 1/1000 em-square units, indexed by WinAnsiEncoding character
//! code, sourced from the Adobe AFM specifications.

/// Glyph widths for one standard Type1 font, indexed by WinAnsi code.
pub struct FontWidths {
    widths: [u16; 256],
}

impl FontWidths {
    /// Width of one WinAnsi code in 1/1000 em units.
    pub fn glyph_width(&self, code: u8) -> u16 {
        self.widths[usize::from(code)]
    }

    /// Width of `text` at `size` points, after WinAnsi encoding.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let total: u32 = text
            .chars()
            .map(|ch| u32::from(self.glyph_width(winansi_byte(ch))))
            .sum();
        total as f32 / 1000.0 * size
    }
}

/// Map a char to its WinAnsiEncoding byte; unmappable chars become `?`.
///
/// ASCII and the Latin-1 range map through directly (WinAnsi matches Latin-1
/// there); the 0x80..0x9f window differs but nothing routes those here.
pub fn winansi_byte(ch: char) -> u8 {
    let cp = u32::from(ch);
    match cp {
        0x20..=0x7e => cp as u8,
        0xa0..=0xff => cp as u8,
        _ => b'?',
    }
}

/// Encode a string as WinAnsi bytes for a PDF string operand.
pub fn winansi_bytes(text: &str) -> Vec<u8> {
    text.chars().map(winansi_byte).collect()
}

/// Helvetica widths (Adobe AFM, WinAnsiEncoding).
#[rustfmt::skip]
pub static HELVETICA: FontWidths = FontWidths {
    widths: [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        // 32-47: space ! " # $ % & ' ( ) * + , - . /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 48-63: 0-9 : ; < = > ?
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
        // 64-79: @ A-O
        1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
        // 80-95: P-Z [ \ ] ^ _
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
        // 96-111: ` a-o
        333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
        // 112-127: p-z { | } ~ DEL
        556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 0,
        // 128-159: WinAnsi punctuation window
        556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
        0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
        // 160-191
        278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
        400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
        // 192-223
        667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
        722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
        // 224-255
        556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
    ],
};

/// Helvetica-Bold widths (Adobe AFM, WinAnsiEncoding).
#[rustfmt::skip]
pub static HELVETICA_BOLD: FontWidths = FontWidths {
    widths: [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        // 32-47
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 48-63
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
        // 64-79
        975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
        // 80-95
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
        // 96-111
        333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
        // 112-127
        611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, 0,
        // 128-159
        556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
        0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 0, 500, 667,
        // 160-191
        278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
        400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
        // 192-223
        722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
        722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
        // 224-255
        556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
        611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_and_digits_match_afm() {
        assert_eq!(HELVETICA.glyph_width(b' '), 278);
        assert_eq!(HELVETICA.glyph_width(b'0'), 556);
        assert_eq!(HELVETICA_BOLD.glyph_width(b'W'), 944);
    }

    #[test]
    fn text_width_scales_with_size() {
        let at_10 = HELVETICA.text_width("Hello", 10.0);
        let at_20 = HELVETICA.text_width("Hello", 20.0);
        assert!((at_20 - at_10 * 2.0).abs() < 1e-4);
    }

    #[test]
    fn unmappable_chars_fall_back_to_question_mark() {
        assert_eq!(winansi_byte('\u{4e2d}'), b'?');
        assert_eq!(winansi_byte('A'), b'A');
        assert_eq!(winansi_byte('\u{e9}'), 0xe9);
    }
}
