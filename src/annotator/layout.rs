// file: src/annotator/layout.rs
// description: positions the glyphs of a page content stream in user space
// reference: PDF 32000-1:2008 section 9.4 (text objects) and 9.2.4 (glyph positioning)

use crate::annotator::fonts::{FontSet, number};
use crate::error::Result;
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use tracing::debug;

const DESCENT: f32 = -0.2;
const ASCENT: f32 = 0.8;
/// TJ adjustments more negative than this (thousandths of an em) read as a word gap.
const WORD_GAP_ADJUSTMENT: f32 = -200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A laid out character. Inferred separators between text runs carry no box.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub bbox: Option<Rect>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f32; 6]);

impl Matrix {
    const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn translation(tx: f32, ty: f32) -> Matrix {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// `self` applied first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            e1 * a2 + f1 * c2 + e2,
            e1 * b2 + f1 * d2 + f2,
        ])
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, c, d, e, f] = self.0;
        (a * x + c * y + e, b * x + d * y + f)
    }
}

#[derive(Debug, Clone)]
struct TextState {
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scaling: f32,
    leading: f32,
    rise: f32,
    font_size: f32,
    font: Option<Vec<u8>>,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 1.0,
            leading: 0.0,
            rise: 0.0,
            font_size: 0.0,
            font: None,
        }
    }
}

#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    text: TextState,
}

struct PageLayout {
    glyphs: Vec<Glyph>,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
}

/// Lay out every shown character of a page, in content stream order.
pub fn layout_page(doc: &Document, page_id: ObjectId) -> Result<Vec<Glyph>> {
    let content = Content::decode(&doc.get_page_content(page_id)?)?;
    let fonts = FontSet::for_page(doc, page_id);

    let mut layout = PageLayout {
        glyphs: Vec::new(),
        state: GraphicsState {
            ctm: Matrix::IDENTITY,
            text: TextState::default(),
        },
        stack: Vec::new(),
        text_matrix: Matrix::IDENTITY,
        line_matrix: Matrix::IDENTITY,
    };

    for operation in &content.operations {
        layout.apply(&fonts, &operation.operator, &operation.operands);
    }

    debug!("Laid out {} glyphs on page {:?}", layout.glyphs.len(), page_id);
    Ok(layout.glyphs)
}

impl PageLayout {
    fn apply(&mut self, fonts: &FontSet, operator: &str, operands: &[Object]) {
        match operator {
            "q" => self.stack.push(self.state.clone()),
            "Q" => {
                if let Some(state) = self.stack.pop() {
                    self.state = state;
                }
            }
            "cm" => {
                if let Some(m) = matrix_operand(operands) {
                    self.state.ctm = m.then(&self.state.ctm);
                }
            }
            "BT" => {
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
                self.separate();
            }
            "Tc" => set_number(operands, 0, &mut self.state.text.char_spacing),
            "Tw" => set_number(operands, 0, &mut self.state.text.word_spacing),
            "Tz" => {
                if let Some(scale) = number(operands.first()) {
                    self.state.text.horizontal_scaling = scale / 100.0;
                }
            }
            "TL" => set_number(operands, 0, &mut self.state.text.leading),
            "Ts" => set_number(operands, 0, &mut self.state.text.rise),
            "Tf" => {
                if let Some(Object::Name(name)) = operands.first() {
                    self.state.text.font = Some(name.clone());
                }
                set_number(operands, 1, &mut self.state.text.font_size);
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (number(operands.first()), number(operands.get(1))) {
                    self.next_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (number(operands.first()), number(operands.get(1))) {
                    self.state.text.leading = -ty;
                    self.next_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = matrix_operand(operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                    self.separate();
                }
            }
            "T*" => self.next_line(0.0, -self.state.text.leading),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(fonts, bytes);
                }
            }
            "'" => {
                self.next_line(0.0, -self.state.text.leading);
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(fonts, bytes);
                }
            }
            "\"" => {
                set_number(operands, 0, &mut self.state.text.word_spacing);
                set_number(operands, 1, &mut self.state.text.char_spacing);
                self.next_line(0.0, -self.state.text.leading);
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    self.show(fonts, bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => self.show(fonts, bytes),
                            other => {
                                if let Some(adjustment) = number(Some(other)) {
                                    self.adjust(adjustment);
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn next_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
        self.separate();
    }

    fn adjust(&mut self, adjustment: f32) {
        let text = &self.state.text;
        let tx = -adjustment / 1000.0 * text.font_size * text.horizontal_scaling;
        self.text_matrix = Matrix::translation(tx, 0.0).then(&self.text_matrix);
        if adjustment < WORD_GAP_ADJUSTMENT {
            self.separate();
        }
    }

    /// Insert an unboxed space unless the text already ends in whitespace.
    fn separate(&mut self) {
        if let Some(last) = self.glyphs.last() {
            if !last.ch.is_whitespace() {
                self.glyphs.push(Glyph { ch: ' ', bbox: None });
            }
        }
    }

    fn show(&mut self, fonts: &FontSet, bytes: &[u8]) {
        let text = self.state.text.clone();
        let font = fonts.get(text.font.as_deref());

        for code in font.codes(bytes) {
            let w0 = font.width(code) / 1000.0;
            let glyph_space = Matrix([
                text.font_size * text.horizontal_scaling,
                0.0,
                0.0,
                text.font_size,
                0.0,
                text.rise,
            ]);
            let to_user = glyph_space.then(&self.text_matrix).then(&self.state.ctm);

            let corners = [
                to_user.apply(0.0, DESCENT),
                to_user.apply(w0, DESCENT),
                to_user.apply(0.0, ASCENT),
                to_user.apply(w0, ASCENT),
            ];
            let bbox = corners.iter().skip(1).fold(
                Rect {
                    x0: corners[0].0,
                    y0: corners[0].1,
                    x1: corners[0].0,
                    y1: corners[0].1,
                },
                |acc, &(x, y)| acc.union(&Rect { x0: x, y0: y, x1: x, y1: y }),
            );
            self.push_text(&font.decode(code), bbox);

            let word_spacing = if font.is_word_space(code) {
                text.word_spacing
            } else {
                0.0
            };
            let tx = (w0 * text.font_size + text.char_spacing + word_spacing)
                * text.horizontal_scaling;
            self.text_matrix = Matrix::translation(tx, 0.0).then(&self.text_matrix);
        }
    }

    /// One glyph per character; ligatures share their box in equal slices.
    fn push_text(&mut self, text: &str, bbox: Rect) {
        let chars: Vec<char> = text
            .chars()
            .map(|ch| if ch.is_whitespace() || ch.is_control() { ' ' } else { ch })
            .collect();
        if chars.is_empty() {
            self.glyphs.push(Glyph {
                ch: char::REPLACEMENT_CHARACTER,
                bbox: Some(bbox),
            });
            return;
        }

        let step = (bbox.x1 - bbox.x0) / chars.len() as f32;
        for (i, ch) in chars.into_iter().enumerate() {
            self.glyphs.push(Glyph {
                ch,
                bbox: Some(Rect {
                    x0: bbox.x0 + step * i as f32,
                    x1: bbox.x0 + step * (i + 1) as f32,
                    ..bbox
                }),
            });
        }
    }
}

fn set_number(operands: &[Object], index: usize, target: &mut f32) {
    if let Some(value) = number(operands.get(index)) {
        *target = value;
    }
}

fn matrix_operand(operands: &[Object]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    let mut m = [0.0f32; 6];
    for (slot, operand) in m.iter_mut().zip(operands) {
        *slot = number(Some(operand))?;
    }
    Some(Matrix(m))
}
