// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! PDF export
//!
//! Text-based PDF generation using printpdf. Pages are laid out from the
//! document's visible text; there is no visual rendering.

use std::io::BufWriter;
use std::path::Path;

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use tracing::debug;

use crate::dom::Document;
use crate::error::{Error, Result};

const MM_PER_INCH: f64 = 25.4;
const POINT_TO_MM: f64 = 0.352_778;

/// PDF page options (CDP-compatible naming, dimensions in inches)
#[derive(Debug, Clone)]
pub struct PrintToPdfOptions {
    /// Paper width in inches
    pub paper_width: f64,
    /// Paper height in inches
    pub paper_height: f64,
    /// Top margin in inches
    pub margin_top: f64,
    /// Bottom margin in inches
    pub margin_bottom: f64,
    /// Left margin in inches
    pub margin_left: f64,
    /// Right margin in inches
    pub margin_right: f64,
    /// Landscape orientation
    pub landscape: bool,
    /// Body font size in points
    pub font_size: f64,
}

impl Default for PrintToPdfOptions {
    fn default() -> Self {
        Self {
            paper_width: 8.5,
            paper_height: 11.0,
            margin_top: 0.4,
            margin_bottom: 0.4,
            margin_left: 0.4,
            margin_right: 0.4,
            landscape: false,
            font_size: 10.0,
        }
    }
}

impl PrintToPdfOptions {
    /// Create options for A4 paper
    pub fn a4() -> Self {
        Self {
            paper_width: 8.27,
            paper_height: 11.69,
            ..Default::default()
        }
    }

    /// Create options for Letter paper
    pub fn letter() -> Self {
        Self::default()
    }

    /// Set margins uniformly
    pub fn margins(mut self, margin: f64) -> Self {
        self.margin_top = margin;
        self.margin_bottom = margin;
        self.margin_left = margin;
        self.margin_right = margin;
        self
    }

    /// Set landscape mode
    pub fn landscape(mut self) -> Self {
        self.landscape = true;
        self
    }

    /// Paper size in inches, orientation applied
    fn paper_size_in(&self) -> (f64, f64) {
        if self.landscape {
            (self.paper_height, self.paper_width)
        } else {
            (self.paper_width, self.paper_height)
        }
    }

    /// Paper size in millimetres, orientation applied
    ///
    /// printpdf measures in f32 millimetres; the f64 inch fields are
    /// converted here.
    fn page_size_mm(&self) -> (Mm, Mm) {
        let (w, h) = self.paper_size_in();
        (mm(w * MM_PER_INCH), mm(h * MM_PER_INCH))
    }

    /// Width available for text, in millimetres
    fn printable_width_mm(&self) -> f64 {
        let (w, _) = self.paper_size_in();
        (w - self.margin_left - self.margin_right) * MM_PER_INCH
    }
}

/// Millimetre value for printpdf, from f64 math
fn mm(value: f64) -> Mm {
    Mm(value as f32)
}

/// PDF generator trait
pub trait PdfGenerator: Send + Sync {
    /// Generate a PDF from a parsed document
    fn generate_pdf(&self, document: &Document, options: &PrintToPdfOptions) -> Result<Vec<u8>>;

    /// Generate a PDF and write it to a file
    ///
    /// Nothing is written unless generation succeeds, so a failed run
    /// leaves any existing file untouched.
    fn save_pdf(
        &self,
        document: &Document,
        path: &Path,
        options: &PrintToPdfOptions,
    ) -> Result<()> {
        let pdf_data = self.generate_pdf(document, options)?;
        std::fs::write(path, pdf_data)?;
        Ok(())
    }
}

/// Text-layout PDF generator
///
/// Renders the document's visible text line by line, wrapping at the
/// printable width and starting new pages as needed.
pub struct TextPdfGenerator;

impl TextPdfGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextPdfGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfGenerator for TextPdfGenerator {
    fn generate_pdf(&self, document: &Document, options: &PrintToPdfOptions) -> Result<Vec<u8>> {
        let text = document.visible_text();
        let title = match document.title() {
            t if t.trim().is_empty() => "Document".to_string(),
            t => t,
        };

        let (page_w, page_h) = options.page_size_mm();
        let (pdf_doc, page1, layer1) = PdfDocument::new(&title, page_w, page_h, "Layer 1");

        let font = pdf_doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| Error::pdf(format!("font error: {:?}", e)))?;

        let margin_left = mm(options.margin_left * MM_PER_INCH);
        let margin_bottom = mm(options.margin_bottom * MM_PER_INCH);
        let line_height = mm(options.font_size * POINT_TO_MM * 1.4);
        let top = page_h - mm(options.margin_top * MM_PER_INCH) - line_height;

        let max_chars = Self::chars_per_line(options.printable_width_mm(), options.font_size);

        let mut layer = pdf_doc.get_page(page1).get_layer(layer1);
        let mut y = top;
        let mut page_count = 1;

        for line in text.lines() {
            for chunk in wrap_line(line, max_chars) {
                if y < margin_bottom {
                    layer = new_page(&pdf_doc, page_w, page_h);
                    y = top;
                    page_count += 1;
                }
                if !chunk.is_empty() {
                    draw_line(&layer, chunk, options.font_size as f32, margin_left, y, &font);
                }
                y = y - line_height;
            }
        }

        debug!(pages = page_count, "pdf layout complete");

        let mut buffer = Vec::new();
        pdf_doc
            .save(&mut BufWriter::new(&mut buffer))
            .map_err(|e| Error::pdf(format!("save error: {:?}", e)))?;

        Ok(buffer)
    }
}

impl TextPdfGenerator {
    /// Character budget for one line of built-in Helvetica
    ///
    /// Helvetica averages roughly half the font size per glyph, which is
    /// close enough for wrapping when exact metrics are unavailable.
    fn chars_per_line(printable_width_mm: f64, font_size_pt: f64) -> usize {
        let avg_char_mm = font_size_pt * 0.5 * POINT_TO_MM;
        ((printable_width_mm / avg_char_mm).floor() as usize).max(1)
    }
}

fn new_page(doc: &PdfDocumentReference, width: Mm, height: Mm) -> PdfLayerReference {
    let (page, layer) = doc.add_page(width, height, "Layer 1");
    doc.get_page(page).get_layer(layer)
}

fn draw_line(
    layer: &PdfLayerReference,
    text: &str,
    font_size: f32,
    x: Mm,
    y: Mm,
    font: &IndirectFontRef,
) {
    layer.use_text(text, font_size, x, y, font);
}

/// Split a line into chunks no longer than `max_chars`, breaking at
/// spaces where possible
fn wrap_line(line: &str, max_chars: usize) -> Vec<&str> {
    if line.chars().count() <= max_chars {
        return vec![line];
    }

    let mut chunks = Vec::new();
    let mut rest = line;
    while rest.chars().count() > max_chars {
        let hard_break = rest
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let split_at = rest[..hard_break]
            .rfind(' ')
            .filter(|&i| i > 0)
            .unwrap_or(hard_break);

        chunks.push(rest[..split_at].trim_end());
        rest = rest[split_at..].trim_start();
    }
    if !rest.is_empty() {
        chunks.push(rest);
    }
    chunks
}
