//! Page content stream walking: text objects become text boxes.

use std::collections::HashMap;

use lopdf::content::Operation;
use lopdf::{Dictionary, Document, Object};
use tracing::trace;

use super::encoding::{FontDecoder, GlyphWidths};

/// `TJ` adjustments at or below this (in thousandths of an em) read as a
/// word gap.
const TJ_SPACE_THRESHOLD: f64 = -200.0;

/// A move along the baseline further than this (in ems) from where the
/// previous text ended reads as a word gap.
const WORD_GAP_EM: f64 = 0.15;

/// Operators that paint something other than text.
const PAINTING_OPERATORS: &[&str] = &["S", "s", "f", "F", "f*", "B", "B*", "b", "b*", "sh", "BI"];

/// Fonts available on a page, keyed by resource name.
pub type FontMap = HashMap<Vec<u8>, PageFont>;

/// What text layout needs from a font resource.
#[derive(Debug, Clone, Default)]
pub struct PageFont {
    pub decoder: FontDecoder,
    /// Without widths every move along the baseline counts as a word gap.
    pub widths: Option<GlyphWidths>,
}

impl PageFont {
    pub fn read(doc: &Document, font: &Dictionary) -> Self {
        Self {
            decoder: FontDecoder::for_font(doc, font),
            widths: GlyphWidths::for_font(doc, font),
        }
    }
}

/// Text position within a text object, in user space.
#[derive(Debug)]
struct Pen {
    line_x: f64,
    line_y: Option<f64>,
    /// Where drawn text ends; unknown once a font without widths is used.
    end_x: Option<f64>,
    /// Horizontal scale of the text matrix.
    scale: f64,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            line_x: 0.0,
            line_y: None,
            end_x: Some(0.0),
            scale: 1.0,
        }
    }
}

impl Pen {
    fn move_to(&mut self, x: f64) {
        self.line_x = x;
        self.end_x = Some(x);
    }

    fn advance(&mut self, font: &PageFont, bytes: &[u8], font_size: f64) {
        self.end_x = match (&font.widths, self.end_x) {
            (Some(widths), Some(x)) => Some(x + widths.advance(bytes) * font_size * self.scale),
            _ => None,
        };
    }

    /// Apply a `TJ` adjustment, in thousandths of an em.
    fn adjust(&mut self, thousandths: f64, font_size: f64) {
        if let Some(x) = self.end_x.as_mut() {
            *x -= thousandths / 1000.0 * font_size * self.scale;
        }
    }

    /// Moving to `x` on the same baseline: a space unless `x` continues
    /// the text drawn so far.
    fn baseline_move(&self, text: &mut String, x: f64, font_size: f64) {
        let em = (font_size * self.scale).abs();
        match self.end_x {
            Some(end) if (x - end).abs() < WORD_GAP_EM * em => {}
            _ => word_gap(text),
        }
    }
}

/// What a page's content stream draws.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PageLayout {
    /// One entry per non-blank text object, in drawing order.
    pub boxes: Vec<String>,
    /// Number of `BT`/`ET` text objects, blank ones included.
    pub text_objects: usize,
    /// Number of XObjects drawn with `Do`.
    pub xobjects: usize,
    /// Number of path painting and inline image operators.
    pub paintings: usize,
}

impl PageLayout {
    /// A page drawn as one XObject and nothing else.
    pub fn is_figure(&self) -> bool {
        self.text_objects == 0 && self.xobjects == 1 && self.paintings == 0
    }
}

/// Walk the operations of a content stream and collect its text boxes.
pub fn collect_layout(operations: &[Operation], fonts: &FontMap) -> PageLayout {
    let fallback = PageFont::default();
    let mut layout = PageLayout::default();
    let mut current: Option<String> = None;
    let mut font: &PageFont = &fallback;
    let mut font_size = 1.0;
    let mut pen = Pen::default();

    for operation in operations {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "BT" => {
                current = Some(String::new());
                pen = Pen::default();
            }
            "ET" => {
                layout.text_objects += 1;
                if let Some(text) = current.take() {
                    if let Some(text_box) = finish_box(text) {
                        layout.boxes.push(text_box);
                    }
                }
            }
            "Tf" => {
                font = operands
                    .first()
                    .and_then(|o| o.as_name().ok())
                    .and_then(|name| fonts.get(name))
                    .unwrap_or(&fallback);
                font_size = operands.get(1).and_then(number).unwrap_or(font_size);
            }
            "Td" | "TD" => {
                if let Some(text) = current.as_mut() {
                    let tx = operands.first().and_then(number).unwrap_or(0.0);
                    let ty = operands.get(1).and_then(number).unwrap_or(0.0);
                    let x = pen.line_x + tx * pen.scale;
                    if ty != 0.0 {
                        new_line(text);
                    } else {
                        pen.baseline_move(text, x, font_size);
                    }
                    pen.move_to(x);
                }
            }
            "Tm" => {
                if let Some(text) = current.as_mut() {
                    let x = operands.get(4).and_then(number).unwrap_or(0.0);
                    let y = operands.get(5).and_then(number);
                    match (pen.line_y, y) {
                        (Some(previous), Some(y)) if previous != y => new_line(text),
                        _ => pen.baseline_move(text, x, font_size),
                    }
                    pen.line_y = y;
                    pen.scale = operands
                        .first()
                        .and_then(number)
                        .filter(|a| *a != 0.0)
                        .map_or(1.0, f64::abs);
                    pen.move_to(x);
                }
            }
            "T*" => {
                if let Some(text) = current.as_mut() {
                    new_line(text);
                    pen.move_to(pen.line_x);
                }
            }
            "Tj" => {
                if let (Some(text), Some(bytes)) =
                    (current.as_mut(), operands.first().and_then(string_bytes))
                {
                    text.push_str(&font.decoder.decode(bytes));
                    pen.advance(font, bytes, font_size);
                }
            }
            "'" | "\"" => {
                if let Some(text) = current.as_mut() {
                    new_line(text);
                    pen.move_to(pen.line_x);
                    let shown = if operation.operator == "'" { 0 } else { 2 };
                    if let Some(bytes) = operands.get(shown).and_then(string_bytes) {
                        text.push_str(&font.decoder.decode(bytes));
                        pen.advance(font, bytes, font_size);
                    }
                }
            }
            "TJ" => {
                if let (Some(text), Some(Object::Array(items))) =
                    (current.as_mut(), operands.first())
                {
                    for item in items {
                        if let Some(bytes) = string_bytes(item) {
                            text.push_str(&font.decoder.decode(bytes));
                            pen.advance(font, bytes, font_size);
                        } else if let Some(n) = number(item) {
                            if n <= TJ_SPACE_THRESHOLD {
                                word_gap(text);
                            }
                            pen.adjust(n, font_size);
                        }
                    }
                }
            }
            "Do" => layout.xobjects += 1,
            op if PAINTING_OPERATORS.contains(&op) => layout.paintings += 1,
            _ => {}
        }
    }

    trace!(
        "content stream: {} text objects, {} xobjects, {} paintings",
        layout.text_objects, layout.xobjects, layout.paintings
    );
    layout
}

/// Spaces drawn at the end of a line are kept: templates rely on them.
fn new_line(text: &mut String) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
}

fn word_gap(text: &mut String) {
    if !text.is_empty() && !text.ends_with([' ', '\n']) {
        text.push(' ');
    }
}

fn finish_box(mut text: String) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    new_line(&mut text);
    Some(text)
}

fn string_bytes(object: &Object) -> Option<&[u8]> {
    match object {
        Object::String(bytes, _) => Some(bytes),
        _ => None,
    }
}

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}
