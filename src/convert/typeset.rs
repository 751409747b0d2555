// file: src/convert/typeset.rs
// description: lays out plain paragraphs onto A4 pages as a searchable PDF
// reference: https://docs.rs/lopdf (document creation example)

use crate::annotator::fonts::{HELVETICA_WIDTHS, helvetica_width, win_ansi_code};
use crate::error::Result;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const LATIN_FONT: &str = "F1";
const WIDE_FONT: &str = "F2";
/// Advance of every glyph in the wide font, in thousandths of an em.
const WIDE_GLYPH_WIDTH: f32 = 1000.0;

/// Which page font sets a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    /// Helvetica, WinAnsiEncoding
    Latin,
    /// STSong-Light through the UniGB-UCS2-H CMap, so codes are UCS-2 code units
    Wide,
}

impl Face {
    fn of(ch: char) -> Self {
        if win_ansi_code(ch).is_some() || u32::from(ch) > 0xffff {
            Face::Latin
        } else {
            Face::Wide
        }
    }

    fn resource(self) -> &'static str {
        match self {
            Face::Latin => LATIN_FONT,
            Face::Wide => WIDE_FONT,
        }
    }
}

/// Split a line into runs of one face, encoded for that face's font.
/// Characters neither font can address become '?'.
fn runs(line: &str) -> Vec<(Face, Vec<u8>)> {
    let mut runs: Vec<(Face, Vec<u8>)> = Vec::new();

    for ch in line.chars() {
        let face = Face::of(ch);
        let bytes = match face {
            Face::Latin => vec![win_ansi_code(ch).unwrap_or(b'?')],
            Face::Wide => (u32::from(ch) as u16).to_be_bytes().to_vec(),
        };
        match runs.last_mut() {
            Some((current, encoded)) if *current == face => encoded.extend(bytes),
            _ => runs.push((face, bytes)),
        }
    }
    runs
}

fn char_width(ch: char) -> f32 {
    match Face::of(ch) {
        Face::Latin => f32::from(helvetica_width(win_ansi_code(ch).unwrap_or(b'?'))),
        Face::Wide => WIDE_GLYPH_WIDTH,
    }
}

#[derive(Debug, Clone)]
pub struct Typesetter {
    pub font_size: f32,
    pub leading: f32,
    pub margin: f32,
}

impl Default for Typesetter {
    fn default() -> Self {
        Self {
            font_size: 11.0,
            leading: 15.0,
            margin: 72.0,
        }
    }
}

impl Typesetter {
    fn line_width(&self) -> f32 {
        PAGE_WIDTH - 2.0 * self.margin
    }

    fn lines_per_page(&self) -> usize {
        let usable = PAGE_HEIGHT - 2.0 * self.margin;
        ((usable / self.leading).floor() as usize).max(1)
    }

    /// Set width of `text` in points.
    pub fn text_width(&self, text: &str) -> f32 {
        text.chars().map(char_width).sum::<f32>() * self.font_size / 1000.0
    }

    /// Greedy word wrap on real glyph widths; words wider than a line are split.
    pub fn wrap(&self, paragraph: &str) -> Vec<String> {
        let limit = self.line_width();
        let space = self.text_width(" ");
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in paragraph.split_whitespace() {
            for piece in self.split_word(word, limit) {
                let width = self.text_width(&piece);
                if !current.is_empty() && current_width + space + width > limit {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                if !current.is_empty() {
                    current.push(' ');
                    current_width += space;
                }
                current.push_str(&piece);
                current_width += width;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    fn split_word(&self, word: &str, limit: f32) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut piece = String::new();
        let mut width = 0.0;

        for ch in word.chars() {
            let advance = char_width(ch) * self.font_size / 1000.0;
            if !piece.is_empty() && width + advance > limit {
                pieces.push(std::mem::take(&mut piece));
                width = 0.0;
            }
            piece.push(ch);
            width += advance;
        }

        if !piece.is_empty() {
            pieces.push(piece);
        }
        pieces
    }

    pub fn render(&self, paragraphs: &[String]) -> Result<Vec<u8>> {
        self.render_pages(&[paragraphs.to_vec()])
    }

    /// Every section starts on a fresh page and overflows onto as many pages as needed.
    pub fn render_pages(&self, sections: &[Vec<String>]) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let resources_id = add_fonts(&mut doc);

        let mut kids: Vec<Object> = Vec::new();
        for section in sections {
            let mut lines = Vec::new();
            for (i, paragraph) in section.iter().enumerate() {
                if i > 0 {
                    lines.push(String::new());
                }
                lines.extend(self.wrap(paragraph));
            }

            if lines.is_empty() {
                kids.push(self.add_page(&mut doc, pages_id, resources_id, &[])?.into());
                continue;
            }
            for chunk in lines.chunks(self.lines_per_page()) {
                kids.push(self.add_page(&mut doc, pages_id, resources_id, chunk)?.into());
            }
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0i64.into(), 0i64.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }

    fn add_page(
        &self,
        doc: &mut Document,
        pages_id: ObjectId,
        resources_id: ObjectId,
        lines: &[String],
    ) -> Result<ObjectId> {
        // One text object per line so extractors see a line break between them.
        let top = PAGE_HEIGHT - self.margin - self.font_size;
        let mut operations = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let baseline = top - i as f32 * self.leading;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Td",
                vec![self.margin.into(), baseline.into()],
            ));
            for (face, bytes) in runs(line) {
                let shown = match face {
                    Face::Latin => Object::string_literal(bytes),
                    Face::Wide => Object::String(bytes, StringFormat::Hexadecimal),
                };
                operations.push(Operation::new(
                    "Tf",
                    vec![face.resource().into(), self.font_size.into()],
                ));
                operations.push(Operation::new("Tj", vec![shown]));
            }
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        Ok(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        }))
    }
}

/// Page resources shared by every page: Helvetica with its AFM widths, and a
/// UCS-2 addressed CJK font for characters WinAnsi cannot encode.
fn add_fonts(doc: &mut Document) -> ObjectId {
    let widths: Vec<Object> = HELVETICA_WIDTHS
        .iter()
        .map(|w| Object::Integer(i64::from(*w)))
        .collect();
    let latin_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
        "FirstChar" => 32i64,
        "LastChar" => 255i64,
        "Widths" => widths,
    });

    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => "STSong-Light",
        "Flags" => 6i64,
        "FontBBox" => vec![(-25i64).into(), (-254i64).into(), 1000i64.into(), 880i64.into()],
        "ItalicAngle" => 0i64,
        "Ascent" => 880i64,
        "Descent" => -120i64,
        "CapHeight" => 880i64,
        "StemV" => 93i64,
    });
    let cid_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType0",
        "BaseFont" => "STSong-Light",
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("GB1"),
            "Supplement" => 2i64,
        },
        "FontDescriptor" => descriptor_id,
        "DW" => WIDE_GLYPH_WIDTH as i64,
    });
    let wide_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "STSong-Light",
        "Encoding" => "UniGB-UCS2-H",
        "DescendantFonts" => vec![Object::Reference(cid_font_id)],
    });

    doc.add_object(dictionary! {
        "Font" => dictionary! {
            LATIN_FONT => latin_id,
            WIDE_FONT => wide_id,
        },
    })
}
