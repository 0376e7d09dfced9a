use chrono::NaiveDateTime;
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

use crate::error::{Error, Result};
use crate::models::Beneficiary;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
/// Rows that would end below this distance from the page bottom go to a new page.
const BREAK_MARGIN: f32 = 20.0;
const CELL_PADDING: f32 = 1.0;
const ROW_HEIGHT: f32 = 10.0;
const HEADER_WIDTH: f32 = 200.0;
const LAYER: &str = "Layer 1";

/// Widths in mm of the name, address, support type, amount and year columns.
pub(crate) const COLUMN_WIDTHS: [f32; 5] = [40.0, 50.0, 40.0, 30.0, 20.0];

pub(crate) const TITLE: &str = "Beneficiaries";
pub(crate) const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

const TITLE_SIZE: f32 = 16.0;
const STAMP_SIZE: f32 = 10.0;
const BODY_SIZE: f32 = 10.0;

const PT_TO_MM: f32 = 25.4 / 72.0;
/// Average Helvetica glyph advance as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Right,
}

pub(crate) struct RenderedPdf {
    pub(crate) bytes: Vec<u8>,
    pub(crate) pages: usize,
}

/// Render `rows` as a bordered table.
pub(crate) fn render(rows: &[Beneficiary], exported_at: NaiveDateTime) -> Result<RenderedPdf> {
    let mut pdf = PdfWriter::new(TITLE)?;

    pdf.cell(
        MARGIN,
        HEADER_WIDTH,
        ROW_HEIGHT,
        TITLE,
        Font::Bold,
        TITLE_SIZE,
        Align::Center,
        false,
    );
    pdf.line_break(ROW_HEIGHT);
    pdf.line_break(10.0);

    let stamp = format!("Exported on: {}", exported_at.format(TIMESTAMP_FORMAT));
    pdf.cell(
        MARGIN,
        HEADER_WIDTH,
        ROW_HEIGHT,
        &stamp,
        Font::Italic,
        STAMP_SIZE,
        Align::Right,
        false,
    );
    pdf.line_break(ROW_HEIGHT);
    pdf.line_break(5.0);

    for b in rows {
        pdf.ensure_room(ROW_HEIGHT);
        let amount = b.amount_text();
        let year = b.year.to_string();
        let values = [
            b.name.as_str(),
            b.address_text(),
            b.support_type_text(),
            amount.as_str(),
            year.as_str(),
        ];
        let mut x = MARGIN;
        for (value, width) in values.iter().zip(COLUMN_WIDTHS) {
            pdf.cell(
                x,
                width,
                ROW_HEIGHT,
                value,
                Font::Regular,
                BODY_SIZE,
                Align::Left,
                true,
            );
            x += width;
        }
        pdf.line_break(ROW_HEIGHT);
    }

    pdf.finish()
}

#[derive(Debug, Clone, Copy)]
enum Font {
    Regular,
    Bold,
    Italic,
}

/// Top-down vertical position on the current page, in mm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Cursor {
    pub(crate) page: usize,
    pub(crate) y: f32,
}

impl Cursor {
    pub(crate) fn new() -> Self {
        Self { page: 0, y: MARGIN }
    }

    /// Move to the next page when a block of `height` would cross the
    /// bottom margin. Returns true when a page was added.
    pub(crate) fn make_room(&mut self, height: f32) -> bool {
        if self.y + height > PAGE_HEIGHT - BREAK_MARGIN {
            self.page += 1;
            self.y = MARGIN;
            true
        } else {
            false
        }
    }

    pub(crate) fn advance(&mut self, height: f32) {
        self.y += height;
    }
}

struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    cursor: Cursor,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let italic = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);
        layer.set_outline_thickness(0.5);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            italic,
            cursor: Cursor::new(),
        })
    }

    fn ensure_room(&mut self, height: f32) {
        if self.cursor.make_room(height) {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.layer.set_outline_thickness(0.5);
        }
    }

    fn line_break(&mut self, height: f32) {
        self.cursor.advance(height);
    }

    #[allow(clippy::too_many_arguments)]
    fn cell(
        &self,
        x: f32,
        width: f32,
        height: f32,
        text: &str,
        font: Font,
        size: f32,
        align: Align,
        border: bool,
    ) {
        let top = self.cursor.y;
        if border {
            self.rect(x, top, width, height);
        }

        let text = fit_text(text, width - 2.0 * CELL_PADDING, size);
        if text.is_empty() {
            return;
        }
        let text_width = estimate_width(&text, size);
        let text_x = match align {
            Align::Left => x + CELL_PADDING,
            Align::Center => x + (width - text_width) / 2.0,
            Align::Right => x + width - CELL_PADDING - text_width,
        };
        let baseline = top + height / 2.0 + 0.3 * size * PT_TO_MM;

        let font = match font {
            Font::Regular => &self.regular,
            Font::Bold => &self.bold,
            Font::Italic => &self.italic,
        };
        self.layer
            .use_text(text, size, Mm(text_x), Mm(PAGE_HEIGHT - baseline), font);
    }

    fn rect(&self, x: f32, top: f32, width: f32, height: f32) {
        let bottom = PAGE_HEIGHT - (top + height);
        let upper = PAGE_HEIGHT - top;
        let corners = [
            (x, upper),
            (x + width, upper),
            (x + width, bottom),
            (x, bottom),
        ];
        self.layer.add_line(Line {
            points: corners
                .iter()
                .map(|&(px, py)| (Point::new(Mm(px), Mm(py)), false))
                .collect(),
            is_closed: true,
        });
    }

    fn finish(self) -> Result<RenderedPdf> {
        let pages = self.cursor.page + 1;
        let bytes = self.doc.save_to_bytes().map_err(pdf_error)?;
        Ok(RenderedPdf { bytes, pages })
    }
}

fn pdf_error(e: impl std::fmt::Debug) -> Error {
    Error::Pdf(format!("{e:?}"))
}

pub(crate) fn estimate_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * PT_TO_MM * AVG_GLYPH_WIDTH
}

/// Cut `text` so its estimated width fits in `width` mm.
pub(crate) fn fit_text(text: &str, width: f32, size: f32) -> String {
    let glyph = size * PT_TO_MM * AVG_GLYPH_WIDTH;
    if glyph <= 0.0 || width <= 0.0 {
        return String::new();
    }
    let max_chars = (width / glyph).floor() as usize;
    text.chars().take(max_chars).collect()
}
