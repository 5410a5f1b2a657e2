//! Font-aware decoding of PDF string operands.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object};
use tracing::trace;

/// Characters for bytes 0x80..=0x9F in WinAnsiEncoding. Undefined slots map
/// to the replacement character.
const WIN_ANSI_HIGH: [char; 32] = [
    '\u{20AC}', '\u{FFFD}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{FFFD}', '\u{017D}', '\u{FFFD}',
    '\u{FFFD}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{FFFD}', '\u{017E}', '\u{0178}',
];

/// Decode a single byte as WinAnsiEncoding.
pub fn win_ansi_char(byte: u8) -> char {
    match byte {
        0x80..=0x9F => WIN_ANSI_HIGH[(byte - 0x80) as usize],
        _ => byte as char,
    }
}

/// Encode a character as WinAnsiEncoding, if it has a code.
#[cfg(test)]
pub(crate) fn win_ansi_byte(c: char) -> Option<u8> {
    let code = c as u32;
    if code < 0x80 || (0xA0..=0xFF).contains(&code) {
        return Some(code as u8);
    }
    WIN_ANSI_HIGH
        .iter()
        .position(|&w| w == c && w != '\u{FFFD}')
        .map(|i| 0x80 + i as u8)
}

/// Decode a PDF text string (Info dictionary values and the like).
///
/// Strings with a UTF-16BE byte order mark are decoded as UTF-16; anything
/// else is treated as PDFDocEncoding, approximated here by WinAnsi.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16_be(rest);
    }
    bytes.iter().map(|&b| win_ansi_char(b)).collect()
}

pub(crate) fn decode_utf16_be(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks(2)
        .map(|pair| match pair {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]),
            [hi] => u16::from(*hi) << 8,
            _ => 0,
        })
        .collect();
    String::from_utf16_lossy(&units)
}

/// How to turn the bytes of a `Tj`/`TJ` operand into text for one font.
#[derive(Debug, Clone)]
pub enum FontDecoder {
    /// Single-byte font with a 256-entry code table.
    Simple(Box<[char; 256]>),
    /// Font with a ToUnicode CMap.
    Unicode(ToUnicodeMap),
    /// Composite font without a usable ToUnicode map.
    Opaque,
}

impl Default for FontDecoder {
    fn default() -> Self {
        FontDecoder::Simple(Box::new(win_ansi_table()))
    }
}

fn win_ansi_table() -> [char; 256] {
    let mut table = ['\u{FFFD}'; 256];
    for (code, slot) in table.iter_mut().enumerate() {
        *slot = win_ansi_char(code as u8);
    }
    table
}

impl FontDecoder {
    /// Build the decoder for a font dictionary.
    pub fn for_font(doc: &Document, font: &Dictionary) -> Self {
        let composite = font
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .is_some_and(|name| name == b"Type0");

        if let Some(data) = font
            .get(b"ToUnicode")
            .ok()
            .and_then(|o| doc.dereference(o).ok())
            .and_then(|(_, o)| match o {
                Object::Stream(stream) => Some(
                    stream
                        .decompressed_content()
                        .unwrap_or_else(|_| stream.content.clone()),
                ),
                _ => None,
            })
        {
            if let Some(map) = ToUnicodeMap::parse(&data, if composite { 2 } else { 1 }) {
                return FontDecoder::Unicode(map);
            }
            trace!("ToUnicode CMap did not yield any mapping");
        }

        if composite {
            return FontDecoder::Opaque;
        }

        let mut table = win_ansi_table();
        if let Some(Object::Dictionary(encoding)) = font
            .get(b"Encoding")
            .ok()
            .and_then(|o| doc.dereference(o).ok())
            .map(|(_, o)| o)
        {
            if let Ok(Object::Array(differences)) = encoding.get(b"Differences") {
                apply_differences(&mut table, differences);
            }
        }
        FontDecoder::Simple(Box::new(table))
    }

    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            FontDecoder::Simple(table) => bytes.iter().map(|&b| table[b as usize]).collect(),
            FontDecoder::Unicode(map) => map.decode(bytes),
            FontDecoder::Opaque => String::new(),
        }
    }
}

fn apply_differences(table: &mut [char; 256], differences: &[Object]) {
    let mut code: Option<usize> = None;
    for item in differences {
        match item {
            Object::Integer(start) => code = usize::try_from(*start).ok(),
            Object::Name(name) => {
                if let Some(current) = code {
                    if let (Some(slot), Some(c)) = (table.get_mut(current), glyph_char(name)) {
                        *slot = c;
                    }
                    code = Some(current + 1);
                }
            }
            _ => {}
        }
    }
}

/// Map the glyph names that show up in invoices and statements.
fn glyph_char(name: &[u8]) -> Option<char> {
    let name = std::str::from_utf8(name).ok()?;
    if let Some(hex) = name.strip_prefix("uni") {
        return u32::from_str_radix(hex.get(..4)?, 16).ok().and_then(char::from_u32);
    }
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(c);
    }
    let c = match name {
        "space" => ' ',
        "exclam" => '!',
        "numbersign" => '#',
        "dollar" => '$',
        "percent" => '%',
        "ampersand" => '&',
        "quotesingle" => '\'',
        "parenleft" => '(',
        "parenright" => ')',
        "asterisk" => '*',
        "plus" => '+',
        "comma" => ',',
        "hyphen" | "minus" => '-',
        "period" => '.',
        "slash" => '/',
        "zero" => '0',
        "one" => '1',
        "two" => '2',
        "three" => '3',
        "four" => '4',
        "five" => '5',
        "six" => '6',
        "seven" => '7',
        "eight" => '8',
        "nine" => '9',
        "colon" => ':',
        "semicolon" => ';',
        "at" => '@',
        "underscore" => '_',
        "sterling" => '£',
        "Euro" => '€',
        "bullet" => '•',
        "endash" => '–',
        "emdash" => '—',
        "quoteright" => '\u{2019}',
        "quoteleft" => '\u{2018}',
        "nbspace" | "nonbreakingspace" => '\u{A0}',
        "ordmasculine" => 'º',
        "registered" => '®',
        _ => return None,
    };
    Some(c)
}

/// Glyph advances of a simple font, from its `/FirstChar` and `/Widths`.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphWidths {
    first_char: u32,
    /// Thousandths of an em, one per code from `first_char`.
    widths: Vec<f64>,
}

impl GlyphWidths {
    pub fn new(first_char: u32, widths: Vec<f64>) -> Self {
        Self { first_char, widths }
    }

    /// Read the widths of a simple font. Composite fonts and fonts without
    /// a `/Widths` array have none.
    pub fn for_font(doc: &Document, font: &Dictionary) -> Option<Self> {
        let first_char = font.get(b"FirstChar").ok()?.as_i64().ok()?;
        let (_, Object::Array(items)) = doc.dereference(font.get(b"Widths").ok()?).ok()? else {
            return None;
        };
        let widths = items
            .iter()
            .map(|item| {
                let (_, value) = doc.dereference(item).ok()?;
                value.as_float().ok().map(f64::from)
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self::new(u32::try_from(first_char).ok()?, widths))
    }

    /// Advance of `bytes` in ems. Codes outside the table count as zero.
    pub fn advance(&self, bytes: &[u8]) -> f64 {
        bytes
            .iter()
            .filter_map(|&b| {
                let index = u32::from(b).checked_sub(self.first_char)?;
                self.widths.get(index as usize)
            })
            .sum::<f64>()
            / 1000.0
    }
}

/// Widest `bfrange` expanded entry by entry. Wider ones are skipped.
const MAX_BFRANGE_SPAN: u32 = 0x10000;

/// Code to text mapping read from a ToUnicode CMap.
#[derive(Debug, Clone, Default)]
pub struct ToUnicodeMap {
    code_bytes: usize,
    map: HashMap<u32, String>,
}

impl ToUnicodeMap {
    /// Parse the `bfchar` and `bfrange` sections of a CMap stream.
    ///
    /// Returns `None` when no mapping was found.
    pub fn parse(data: &[u8], default_code_bytes: usize) -> Option<Self> {
        let tokens = tokenize(data);
        let mut map = HashMap::new();
        let mut code_bytes = None;
        let mut i = 0;

        while i < tokens.len() {
            match &tokens[i] {
                Token::Word(w) if w == "beginbfchar" => {
                    i += 1;
                    while i + 1 < tokens.len() {
                        match (&tokens[i], &tokens[i + 1]) {
                            (Token::Hex(src), Token::Hex(dst)) => {
                                code_bytes.get_or_insert(src.len());
                                map.insert(code_of(src), decode_utf16_be(dst));
                                i += 2;
                            }
                            _ => break,
                        }
                    }
                }
                Token::Word(w) if w == "beginbfrange" => {
                    i += 1;
                    while i + 2 < tokens.len() {
                        let (Token::Hex(lo), Token::Hex(hi)) = (&tokens[i], &tokens[i + 1]) else {
                            break;
                        };
                        code_bytes.get_or_insert(lo.len());
                        let (lo, hi) = (code_of(lo), code_of(hi));
                        match &tokens[i + 2] {
                            Token::Hex(dst) => {
                                if hi.saturating_sub(lo) < MAX_BFRANGE_SPAN {
                                    let base = decode_utf16_be(dst);
                                    for (offset, code) in (lo..=hi).enumerate() {
                                        map.insert(code, offset_last_char(&base, offset as u32));
                                    }
                                } else {
                                    trace!("skipping bfrange {lo:#x}..={hi:#x}");
                                }
                                i += 3;
                            }
                            Token::ArrayStart => {
                                i += 3;
                                let mut code = Some(lo);
                                while let Some(Token::Hex(dst)) = tokens.get(i) {
                                    if let Some(c) = code.filter(|&c| c <= hi) {
                                        map.insert(c, decode_utf16_be(dst));
                                    }
                                    code = code.and_then(|c| c.checked_add(1));
                                    i += 1;
                                }
                                if matches!(tokens.get(i), Some(Token::ArrayEnd)) {
                                    i += 1;
                                }
                            }
                            _ => break,
                        }
                    }
                }
                _ => i += 1,
            }
        }

        if map.is_empty() {
            return None;
        }
        Some(Self {
            code_bytes: code_bytes.unwrap_or(default_code_bytes).clamp(1, 4),
            map,
        })
    }

    pub fn decode(&self, bytes: &[u8]) -> String {
        bytes
            .chunks(self.code_bytes)
            .map(|chunk| {
                let code = code_of(chunk);
                match self.map.get(&code) {
                    Some(text) => text.clone(),
                    None if self.code_bytes == 1 => win_ansi_char(chunk[0]).to_string(),
                    None => '\u{FFFD}'.to_string(),
                }
            })
            .collect()
    }
}

fn code_of(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

/// `bfrange` destinations increment the last character of the base string.
fn offset_last_char(base: &str, offset: u32) -> String {
    let mut chars: Vec<char> = base.chars().collect();
    if let Some(last) = chars.last_mut() {
        if let Some(c) = char::from_u32(*last as u32 + offset) {
            *last = c;
        }
    }
    chars.into_iter().collect()
}

#[derive(Debug, PartialEq)]
enum Token {
    Hex(Vec<u8>),
    ArrayStart,
    ArrayEnd,
    Word(String),
}

fn tokenize(data: &[u8]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < data.len() {
        match data[i] {
            b'<' if data.get(i + 1) == Some(&b'<') => i += 2,
            b'<' => {
                let end = data[i..].iter().position(|&b| b == b'>').map(|p| i + p);
                let Some(end) = end else { break };
                let digits: Vec<u8> = data[i + 1..end]
                    .iter()
                    .copied()
                    .filter(u8::is_ascii_hexdigit)
                    .collect();
                let bytes = digits
                    .chunks(2)
                    .map(|pair| {
                        let hi = hex_value(pair[0]);
                        let lo = pair.get(1).map_or(0, |&d| hex_value(d));
                        (hi << 4) | lo
                    })
                    .collect();
                tokens.push(Token::Hex(bytes));
                i = end + 1;
            }
            b'[' => {
                tokens.push(Token::ArrayStart);
                i += 1;
            }
            b']' => {
                tokens.push(Token::ArrayEnd);
                i += 1;
            }
            b'%' => {
                while i < data.len() && data[i] != b'\n' && data[i] != b'\r' {
                    i += 1;
                }
            }
            b if b.is_ascii_whitespace() => i += 1,
            _ => {
                let start = i;
                while i < data.len()
                    && !data[i].is_ascii_whitespace()
                    && !matches!(data[i], b'<' | b'[' | b']' | b'%')
                {
                    i += 1;
                }
                if i == start {
                    i += 1;
                    continue;
                }
                tokens.push(Token::Word(String::from_utf8_lossy(&data[start..i]).into_owned()));
            }
        }
    }
    tokens
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}
