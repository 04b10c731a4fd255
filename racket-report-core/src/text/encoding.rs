//! WinAnsi (Windows-1252) encoding for text shown with the standard fonts.

use std::fmt::Write;

/// Code points in 0x80..=0x9F that Windows-1252 remaps away from Latin-1.
const WIN_ANSI_EXTRAS: [(char, u8); 27] = [
    ('\u{20AC}', 0x80),
    ('\u{201A}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201E}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8A),
    ('\u{2039}', 0x8B),
    ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9A),
    ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C),
    ('\u{017E}', 0x9E),
    ('\u{0178}', 0x9F),
];

/// Encodes `text` as WinAnsi bytes. Characters outside the code page become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch as u32 {
            0x00..=0x7F | 0xA0..=0xFF => ch as u32 as u8,
            _ => WIN_ANSI_EXTRAS
                .iter()
                .find(|(extra, _)| *extra == ch)
                .map(|(_, byte)| *byte)
                .unwrap_or(b'?'),
        })
        .collect()
}

/// Appends `text` to a content stream as an escaped PDF literal string,
/// including the surrounding parentheses.
pub(crate) fn push_literal(out: &mut String, text: &str) {
    out.push('(');
    for byte in encode_win_ansi(text) {
        match byte {
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7E => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\{byte:03o}");
            }
        }
    }
    out.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        assert_eq!(encode_win_ansi("Page 1 of 3"), b"Page 1 of 3".to_vec());
    }

    #[test]
    fn test_latin1_accents() {
        assert_eq!(encode_win_ansi("Análisis"), vec![b'A', b'n', 0xE1, b'l', b'i', b's', b'i', b's']);
        assert_eq!(encode_win_ansi("ñ"), vec![0xF1]);
    }

    #[test]
    fn test_windows_1252_extras() {
        assert_eq!(encode_win_ansi("€"), vec![0x80]);
        assert_eq!(encode_win_ansi("\u{2022}"), vec![0x95]);
        assert_eq!(encode_win_ansi("\u{2014}"), vec![0x97]);
    }

    #[test]
    fn test_unmapped_becomes_question_mark() {
        assert_eq!(encode_win_ansi("β"), vec![b'?']);
    }

    #[test]
    fn test_push_literal_escapes() {
        let mut out = String::new();
        push_literal(&mut out, "a (b) \\ ñ");
        assert_eq!(out, "(a \\(b\\) \\\\ \\361)");
    }
}
