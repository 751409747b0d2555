// file: src/annotator/fonts.rs
// description: font encodings, ToUnicode maps and glyph widths for shown text
// reference: PDF 32000-1:2008 sections 9.6 (simple fonts), 9.7 (composite fonts) and 9.10 (text extraction)

use lopdf::{Dictionary, Document, Encoding, Object, ObjectId};
use std::collections::HashMap;
use tracing::debug;

const DEFAULT_GLYPH_WIDTH: f32 = 500.0;
const MONOSPACE_GLYPH_WIDTH: f32 = 600.0;
const DEFAULT_CID_WIDTH: f32 = 1000.0;
/// Largest bfrange expanded into the lookup table.
const MAX_RANGE_SPAN: u32 = 0xffff;

/// WinAnsiEncoding 0x80..=0x9F. The rest of the printable code page is Latin-1.
const WIN_ANSI_HIGH: [Option<char>; 32] = [
    Some('€'), None, Some('‚'), Some('ƒ'), Some('„'), Some('…'), Some('†'), Some('‡'),
    Some('ˆ'), Some('‰'), Some('Š'), Some('‹'), Some('Œ'), None, Some('Ž'), None,
    None, Some('‘'), Some('’'), Some('“'), Some('”'), Some('•'), Some('–'), Some('—'),
    Some('˜'), Some('™'), Some('š'), Some('›'), Some('œ'), None, Some('ž'), Some('Ÿ'),
];

/// Helvetica advance widths for WinAnsi codes 32..=255, from the standard AFM.
pub const HELVETICA_WIDTHS: [u16; 224] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 0,
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Times-Roman advance widths for codes 32..=126.
const TIMES_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

pub fn win_ansi_char(code: u8) -> Option<char> {
    match code {
        0x80..=0x9f => WIN_ANSI_HIGH[(code - 0x80) as usize],
        0x20..=0x7e | 0xa0..=0xff => Some(code as char),
        _ => None,
    }
}

pub fn win_ansi_code(ch: char) -> Option<u8> {
    match u32::from(ch) {
        code @ (0x20..=0x7e | 0xa0..=0xff) => Some(code as u8),
        _ => WIN_ANSI_HIGH
            .iter()
            .position(|c| *c == Some(ch))
            .map(|i| 0x80 + i as u8),
    }
}

/// Width in thousandths of an em of a WinAnsi code set in Helvetica.
pub fn helvetica_width(code: u8) -> u16 {
    code.checked_sub(32)
        .and_then(|i| HELVETICA_WIDTHS.get(i as usize))
        .copied()
        .unwrap_or(0)
}

pub(super) fn number(object: Option<&Object>) -> Option<f32> {
    match object? {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

pub(super) fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

#[derive(Debug, Clone)]
enum Widths {
    /// `/FirstChar` and `/Widths` of a simple font, or built-in standard metrics
    Simple { first_char: u32, widths: Vec<f32> },
    /// `/W` entries of a CIDFont
    Cid(HashMap<u32, f32>),
}

/// How a font turns string bytes into character codes, text and advances.
pub struct PdfFont<'a> {
    code_bytes: usize,
    to_unicode: HashMap<u32, String>,
    encoding: Option<Encoding<'a>>,
    differences: HashMap<u32, String>,
    /// Composite fonts whose CMap codes are UCS-2 / UTF-16 code units
    unicode_codes: bool,
    widths: Widths,
    missing_width: f32,
}

impl<'a> PdfFont<'a> {
    /// Unknown fonts: single bytes read as WinAnsi, half an em wide.
    pub fn fallback() -> Self {
        Self {
            code_bytes: 1,
            to_unicode: HashMap::new(),
            encoding: None,
            differences: HashMap::new(),
            unicode_codes: false,
            widths: Widths::Simple {
                first_char: 0,
                widths: Vec::new(),
            },
            missing_width: DEFAULT_GLYPH_WIDTH,
        }
    }

    pub fn load(doc: &'a Document, font: &'a Dictionary) -> Self {
        let to_unicode = font
            .get_deref(b"ToUnicode", doc)
            .and_then(Object::as_stream)
            .ok()
            .and_then(|stream| stream.get_plain_content().ok())
            .map(|data| parse_to_unicode(&data))
            .unwrap_or_default();

        let composite = font
            .get(b"Subtype")
            .and_then(Object::as_name)
            .is_ok_and(|subtype| subtype == b"Type0");

        if composite {
            Self::composite(doc, font, to_unicode)
        } else {
            Self::simple(doc, font, to_unicode)
        }
    }

    fn simple(doc: &'a Document, font: &'a Dictionary, to_unicode: HashMap<u32, String>) -> Self {
        let (encoding, differences) = match font.get_deref(b"Encoding", doc) {
            Ok(Object::Name(name)) => (named_encoding(doc, font, name), HashMap::new()),
            Ok(Object::Dictionary(dict)) => (None, differences(doc, dict)),
            _ => (None, HashMap::new()),
        };

        let base_font = base_font_name(font);
        let descriptor_missing = font
            .get_deref(b"FontDescriptor", doc)
            .and_then(Object::as_dict)
            .ok()
            .and_then(|d| number(d.get_deref(b"MissingWidth", doc).ok()))
            .filter(|w| *w > 0.0);

        let declared = font
            .get_deref(b"Widths", doc)
            .and_then(Object::as_array)
            .ok()
            .map(|items| {
                items
                    .iter()
                    .map(|w| number(resolve(doc, w)).unwrap_or(0.0))
                    .collect::<Vec<f32>>()
            });

        let (widths, standard_missing) = match declared {
            Some(widths) => {
                let first_char = number(font.get_deref(b"FirstChar", doc).ok())
                    .map(|f| f.max(0.0) as u32)
                    .unwrap_or(0);
                (Widths::Simple { first_char, widths }, None)
            }
            None => standard_widths(&base_font),
        };

        Self {
            code_bytes: 1,
            to_unicode,
            encoding,
            differences,
            unicode_codes: false,
            widths,
            missing_width: descriptor_missing
                .or(standard_missing)
                .unwrap_or(DEFAULT_GLYPH_WIDTH),
        }
    }

    fn composite(doc: &'a Document, font: &'a Dictionary, to_unicode: HashMap<u32, String>) -> Self {
        let cmap = font
            .get(b"Encoding")
            .and_then(Object::as_name_str)
            .unwrap_or_default();
        let unicode_codes =
            cmap.starts_with("Uni") && (cmap.contains("UCS2") || cmap.contains("UTF16"));

        let descendant = font
            .get_deref(b"DescendantFonts", doc)
            .and_then(Object::as_array)
            .ok()
            .and_then(|fonts| fonts.first())
            .and_then(|d| resolve(doc, d))
            .and_then(|d| d.as_dict().ok());

        let missing_width = descendant
            .and_then(|d| number(d.get_deref(b"DW", doc).ok()))
            .unwrap_or(DEFAULT_CID_WIDTH);
        let widths = descendant
            .and_then(|d| d.get_deref(b"W", doc).and_then(Object::as_array).ok())
            .map(|entries| cid_widths(doc, entries))
            .unwrap_or_default();

        debug!(
            "Composite font {} with CMap {} and {} width entries",
            base_font_name(font),
            cmap,
            widths.len()
        );

        Self {
            code_bytes: 2,
            to_unicode,
            encoding: None,
            differences: HashMap::new(),
            unicode_codes,
            widths: Widths::Cid(widths),
            missing_width,
        }
    }

    /// Split a shown string into character codes.
    pub fn codes(&self, bytes: &[u8]) -> Vec<u32> {
        bytes
            .chunks_exact(self.code_bytes)
            .map(|chunk| chunk.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b)))
            .collect()
    }

    /// Unicode text of one code; empty when the font gives no way to know.
    pub fn decode(&self, code: u32) -> String {
        if let Some(text) = self.to_unicode.get(&code) {
            return text.clone();
        }
        if let Some(text) = self.differences.get(&code) {
            return text.clone();
        }
        if self.unicode_codes {
            return char::from_u32(code).map(String::from).unwrap_or_default();
        }
        if self.code_bytes != 1 {
            return String::new();
        }

        let byte = code as u8;
        match &self.encoding {
            Some(encoding) => Document::decode_text(encoding, &[byte]).unwrap_or_default(),
            None => win_ansi_char(byte).map(String::from).unwrap_or_default(),
        }
    }

    /// Horizontal advance in thousandths of an em.
    pub fn width(&self, code: u32) -> f32 {
        let declared = match &self.widths {
            Widths::Simple { first_char, widths } => code
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize))
                .copied(),
            Widths::Cid(widths) => widths.get(&code).copied(),
        };
        declared.filter(|w| *w > 0.0).unwrap_or(self.missing_width)
    }

    /// Word spacing applies to the single-byte code 32 only.
    pub fn is_word_space(&self, code: u32) -> bool {
        self.code_bytes == 1 && code == 32
    }
}

/// Fonts of one page, keyed by resource name.
pub struct FontSet<'a> {
    fonts: HashMap<Vec<u8>, PdfFont<'a>>,
    fallback: PdfFont<'a>,
}

impl<'a> FontSet<'a> {
    pub fn for_page(doc: &'a Document, page_id: ObjectId) -> Self {
        let fonts = doc
            .get_page_fonts(page_id)
            .map(|fonts| {
                fonts
                    .into_iter()
                    .map(|(name, font)| (name, PdfFont::load(doc, font)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            fonts,
            fallback: PdfFont::fallback(),
        }
    }

    pub fn get(&self, name: Option<&[u8]>) -> &PdfFont<'a> {
        name.and_then(|n| self.fonts.get(n)).unwrap_or(&self.fallback)
    }
}

fn base_font_name(font: &Dictionary) -> String {
    let name = font
        .get(b"BaseFont")
        .and_then(Object::as_name)
        .map(|n| String::from_utf8_lossy(n).into_owned())
        .unwrap_or_default();

    // Subset fonts carry a six letter tag such as "ABCDEF+Helvetica".
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 => rest.to_string(),
        _ => name,
    }
}

/// Built-in metrics for standard fonts that omit `/Widths`.
/// Bold and oblique faces reuse the regular widths.
fn standard_widths(base_font: &str) -> (Widths, Option<f32>) {
    let table: &[u16] = if base_font.starts_with("Courier") {
        return (
            Widths::Simple {
                first_char: 0,
                widths: Vec::new(),
            },
            Some(MONOSPACE_GLYPH_WIDTH),
        );
    } else if base_font.starts_with("Helvetica") || base_font.starts_with("Arial") {
        &HELVETICA_WIDTHS
    } else if base_font.starts_with("Times") {
        &TIMES_WIDTHS
    } else {
        &[]
    };

    (
        Widths::Simple {
            first_char: 32,
            widths: table.iter().map(|w| f32::from(*w)).collect(),
        },
        None,
    )
}

fn named_encoding<'a>(doc: &'a Document, font: &'a Dictionary, name: &[u8]) -> Option<Encoding<'a>> {
    let known = matches!(
        name,
        b"StandardEncoding"
            | b"MacRomanEncoding"
            | b"MacExpertEncoding"
            | b"WinAnsiEncoding"
            | b"PDFDocEncoding"
    );
    if !known || !font.type_is(b"Font") {
        return None;
    }
    font.get_font_encoding(doc).ok()
}

/// `/Differences` of an encoding dictionary, as code to text.
fn differences(doc: &Document, encoding: &Dictionary) -> HashMap<u32, String> {
    let mut map = HashMap::new();
    let Ok(items) = encoding.get_deref(b"Differences", doc).and_then(Object::as_array) else {
        return map;
    };

    let mut code = 0u32;
    for item in items {
        match item {
            Object::Integer(start) => code = (*start).max(0) as u32,
            Object::Name(name) => {
                if let Some(text) = glyph_text(&String::from_utf8_lossy(name)) {
                    map.insert(code, text);
                }
                code += 1;
            }
            _ => {}
        }
    }
    map
}

/// Text of a glyph name: `uniXXXX`, `uXXXX`, single letters and common punctuation.
fn glyph_text(name: &str) -> Option<String> {
    if let Some(hex) = name.strip_prefix("uni").filter(|h| h.len() == 4) {
        return u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from);
    }
    if let Some(hex) = name.strip_prefix('u').filter(|h| (4..=6).contains(&h.len())) {
        if let Some(ch) = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
            return Some(ch.to_string());
        }
    }

    let mut chars = name.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        if ch.is_ascii_alphabetic() {
            return Some(ch.to_string());
        }
    }

    const DIGITS: [&str; 10] = [
        "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
    ];
    if let Some(digit) = DIGITS.iter().position(|d| *d == name) {
        return Some(digit.to_string());
    }

    let text = match name {
        "space" | "nbspace" => " ",
        "period" => ".",
        "comma" => ",",
        "colon" => ":",
        "semicolon" => ";",
        "hyphen" | "minus" => "-",
        "exclam" => "!",
        "question" => "?",
        "parenleft" => "(",
        "parenright" => ")",
        "slash" => "/",
        "ampersand" => "&",
        "quotesingle" => "'",
        "quotedbl" => "\"",
        "quoteleft" => "\u{2018}",
        "quoteright" => "\u{2019}",
        "quotedblleft" => "\u{201c}",
        "quotedblright" => "\u{201d}",
        "endash" => "\u{2013}",
        "emdash" => "\u{2014}",
        "bullet" => "\u{2022}",
        "ellipsis" => "\u{2026}",
        "fi" => "fi",
        "fl" => "fl",
        "ff" => "ff",
        "ffi" => "ffi",
        "ffl" => "ffl",
        _ => return None,
    };
    Some(text.to_string())
}

/// `/W` array: `c [w1 w2 ...]` or `c_first c_last w`.
fn cid_widths(doc: &Document, entries: &[Object]) -> HashMap<u32, f32> {
    let mut widths = HashMap::new();
    let items: Vec<&Object> = entries.iter().filter_map(|o| resolve(doc, o)).collect();
    let mut i = 0;

    while i < items.len() {
        let Some(first) = number(Some(items[i])) else {
            break;
        };
        let first = first.max(0.0) as u32;

        match items.get(i + 1) {
            Some(Object::Array(list)) => {
                for (offset, w) in list.iter().enumerate() {
                    if let Some(w) = number(resolve(doc, w)) {
                        widths.insert(first + offset as u32, w);
                    }
                }
                i += 2;
            }
            Some(last) => {
                let (Some(last), Some(w)) = (number(Some(*last)), number(items.get(i + 2).copied()))
                else {
                    break;
                };
                let last = (last.max(0.0) as u32).min(first.saturating_add(MAX_RANGE_SPAN));
                for cid in first..=last {
                    widths.insert(cid, w);
                }
                i += 3;
            }
            None => break,
        }
    }
    widths
}

#[derive(Debug, PartialEq)]
enum Token {
    Hex(Vec<u8>),
    Open,
    Close,
    Word(String),
}

fn tokenize(data: &[u8]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < data.len() {
        match data[i] {
            b if b.is_ascii_whitespace() => i += 1,
            b'%' => {
                while i < data.len() && data[i] != b'\n' && data[i] != b'\r' {
                    i += 1;
                }
            }
            b'<' if data.get(i + 1) == Some(&b'<') => {
                tokens.push(Token::Word("<<".to_string()));
                i += 2;
            }
            b'>' if data.get(i + 1) == Some(&b'>') => {
                tokens.push(Token::Word(">>".to_string()));
                i += 2;
            }
            b'<' => {
                let end = data[i..]
                    .iter()
                    .position(|b| *b == b'>')
                    .map_or(data.len(), |p| i + p);
                let digits: Vec<u8> = data[i + 1..end]
                    .iter()
                    .filter(|b| b.is_ascii_hexdigit())
                    .copied()
                    .collect();
                let bytes = digits
                    .chunks(2)
                    .map(|pair| {
                        let hi = hex_value(pair[0]);
                        let lo = pair.get(1).map_or(0, |b| hex_value(*b));
                        (hi << 4) | lo
                    })
                    .collect();
                tokens.push(Token::Hex(bytes));
                i = end + 1;
            }
            b'[' => {
                tokens.push(Token::Open);
                i += 1;
            }
            b']' => {
                tokens.push(Token::Close);
                i += 1;
            }
            b'(' => {
                let mut depth = 0;
                while i < data.len() {
                    match data[i] {
                        b'\\' => i += 1,
                        b'(' => depth += 1,
                        b')' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    i += 1;
                }
                i += 1;
            }
            _ => {
                let start = i;
                i += 1;
                while i < data.len() && !is_delimiter(data[i]) {
                    i += 1;
                }
                tokens.push(Token::Word(String::from_utf8_lossy(&data[start..i]).into_owned()));
            }
        }
    }
    tokens
}

fn is_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || b"<>[]()/%{}".contains(&b)
}

fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

fn code_of(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b))
}

fn utf16_text(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks(2)
        .map(|pair| (u16::from(pair[0]) << 8) | u16::from(pair.get(1).copied().unwrap_or(0)))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Destination text for `code` in a bfrange starting at `low`: the last UTF-16 unit is offset.
fn offset_text(base: &[u8], offset: u32) -> String {
    let mut units: Vec<u16> = base
        .chunks(2)
        .map(|pair| (u16::from(pair[0]) << 8) | u16::from(pair.get(1).copied().unwrap_or(0)))
        .collect();
    if let Some(last) = units.last_mut() {
        *last = last.wrapping_add(offset as u16);
    }
    String::from_utf16_lossy(&units)
}

/// Parse the `bfchar` and `bfrange` sections of a ToUnicode CMap, for one- and two-byte codes.
pub fn parse_to_unicode(data: &[u8]) -> HashMap<u32, String> {
    let tokens = tokenize(data);
    let mut map = HashMap::new();
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i] {
            Token::Word(word) if word == "beginbfchar" => {
                i += 1;
                while let (Some(Token::Hex(src)), Some(Token::Hex(dst))) =
                    (tokens.get(i), tokens.get(i + 1))
                {
                    map.insert(code_of(src), utf16_text(dst));
                    i += 2;
                }
            }
            Token::Word(word) if word == "beginbfrange" => {
                i += 1;
                while let (Some(Token::Hex(low)), Some(Token::Hex(high))) =
                    (tokens.get(i), tokens.get(i + 1))
                {
                    let low = code_of(low);
                    let high = code_of(high).min(low.saturating_add(MAX_RANGE_SPAN));
                    match tokens.get(i + 2) {
                        Some(Token::Hex(base)) => {
                            for code in low..=high {
                                map.insert(code, offset_text(base, code - low));
                            }
                            i += 3;
                        }
                        Some(Token::Open) => {
                            let mut j = i + 3;
                            let mut code = low;
                            while let Some(Token::Hex(dst)) = tokens.get(j) {
                                if code <= high {
                                    map.insert(code, utf16_text(dst));
                                }
                                code += 1;
                                j += 1;
                            }
                            i = j + 1;
                        }
                        _ => break,
                    }
                }
            }
            _ => i += 1,
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Stream, dictionary};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_win_ansi_round_trip_for_typographic_marks() {
        for ch in ['’', '“', '”', '–', '—', '€', 'é', 'A'] {
            let code = win_ansi_code(ch).unwrap();
            assert_eq!(win_ansi_char(code), Some(ch));
        }
        assert_eq!(win_ansi_code('ж'), None);
        assert_eq!(win_ansi_char(0x81), None);
    }

    #[test]
    fn test_helvetica_widths_follow_afm() {
        assert_eq!(helvetica_width(b' '), 278);
        assert_eq!(helvetica_width(b'm'), 833);
        assert_eq!(helvetica_width(b'l'), 222);
        assert_eq!(helvetica_width(0x97), 1000);
        assert_eq!(helvetica_width(0x10), 0);
    }

    #[test]
    fn test_to_unicode_bfchar_and_bfrange() {
        let cmap = b"/CIDInit /ProcSet findresource begin\n\
            begincmap\n\
            1 begincodespacerange <0000> <FFFF> endcodespacerange\n\
            2 beginbfchar\n<0003> <0020>\n<0011> <00660069>\nendbfchar\n\
            2 beginbfrange\n<0024> <0026> <0061>\n<0030> <0031> [<0436> <0437>]\nendbfrange\n\
            endcmap";
        let map = parse_to_unicode(cmap);

        assert_eq!(map.get(&0x03).map(String::as_str), Some(" "));
        assert_eq!(map.get(&0x11).map(String::as_str), Some("fi"));
        assert_eq!(map.get(&0x24).map(String::as_str), Some("a"));
        assert_eq!(map.get(&0x26).map(String::as_str), Some("c"));
        assert_eq!(map.get(&0x31).map(String::as_str), Some("з"));
    }

    #[test]
    fn test_single_byte_to_unicode() {
        let map = parse_to_unicode(
            b"1 begincodespacerange <00> <FF> endcodespacerange\n1 beginbfrange <01> <03> <0078> endbfrange",
        );
        assert_eq!(map.get(&1).map(String::as_str), Some("x"));
        assert_eq!(map.get(&3).map(String::as_str), Some("z"));
    }

    #[test]
    fn test_cid_widths_both_forms() {
        let doc = Document::with_version("1.5");
        let entries = vec![
            Object::Integer(1),
            Object::Array(vec![Object::Integer(250), Object::Integer(300)]),
            Object::Integer(10),
            Object::Integer(12),
            Object::Integer(600),
        ];
        let widths = cid_widths(&doc, &entries);

        assert_eq!(widths.get(&1), Some(&250.0));
        assert_eq!(widths.get(&2), Some(&300.0));
        assert_eq!(widths.get(&11), Some(&600.0));
        assert_eq!(widths.get(&13), None);
    }

    #[test]
    fn test_standard_font_without_widths_uses_afm() {
        let mut doc = Document::with_version("1.5");
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let font = doc.get_dictionary(font_id).unwrap();
        let font = PdfFont::load(&doc, font);

        assert_eq!(font.width(u32::from(b'm')), 833.0);
        assert_eq!(font.width(u32::from(b'i')), 222.0);
        assert_eq!(font.decode(0x93), "“");
    }

    #[test]
    fn test_declared_widths_are_honoured() {
        let mut doc = Document::with_version("1.5");
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "TrueType",
            "BaseFont" => "Custom",
            "FirstChar" => 65i64,
            "Widths" => vec![Object::Integer(250), Object::Integer(750)],
        });
        let font = PdfFont::load(&doc, doc.get_dictionary(font_id).unwrap());

        assert_eq!(font.width(65), 250.0);
        assert_eq!(font.width(66), 750.0);
        assert_eq!(font.width(67), DEFAULT_GLYPH_WIDTH);
    }

    #[test]
    fn test_differences_override_base_encoding() {
        let mut doc = Document::with_version("1.5");
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Custom",
            "Encoding" => dictionary! {
                "Type" => "Encoding",
                "Differences" => vec![
                    Object::Integer(1),
                    Object::Name(b"uni0434".to_vec()),
                    Object::Name(b"fi".to_vec()),
                ],
            },
        });
        let font = PdfFont::load(&doc, doc.get_dictionary(font_id).unwrap());

        assert_eq!(font.decode(1), "д");
        assert_eq!(font.decode(2), "fi");
        assert_eq!(font.decode(u32::from(b'k')), "k");
    }

    #[test]
    fn test_type0_font_uses_two_byte_codes_and_cid_widths() {
        let mut doc = Document::with_version("1.5");
        let cmap = doc.add_object(Stream::new(
            dictionary! {},
            b"1 beginbfchar <0005> <043C> endbfchar".to_vec(),
        ));
        let descendant = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => "ABCDEF+Arial",
            "DW" => 700i64,
            "W" => vec![Object::Integer(5), Object::Array(vec![Object::Integer(640)])],
        });
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => "ABCDEF+Arial",
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(descendant)],
            "ToUnicode" => cmap,
        });
        let font = PdfFont::load(&doc, doc.get_dictionary(font_id).unwrap());

        assert_eq!(font.codes(&[0x00, 0x05, 0x00, 0x06]), vec![5, 6]);
        assert_eq!(font.decode(5), "м");
        assert_eq!(font.width(5), 640.0);
        assert_eq!(font.width(6), 700.0);
        assert!(!font.is_word_space(32));
    }

    #[test]
    fn test_ucs2_cmap_codes_are_code_points() {
        let mut doc = Document::with_version("1.5");
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => "STSong-Light",
            "Encoding" => "UniGB-UCS2-H",
        });
        let font = PdfFont::load(&doc, doc.get_dictionary(font_id).unwrap());

        assert_eq!(font.decode(0x0436), "ж");
        assert_eq!(font.width(0x0436), DEFAULT_CID_WIDTH);
    }

    #[test]
    fn test_subset_prefix_is_stripped() {
        let font = dictionary! { "BaseFont" => "ABCDEF+Helvetica-Bold" };
        assert_eq!(base_font_name(&font), "Helvetica-Bold");
    }
}
