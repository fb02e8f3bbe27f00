//! Servicio de generación de PDF
//!
//! Este módulo convierte un `DocumentLayout` (título, secciones de campos y
//! tablas) en un PDF A4 con las fuentes estándar de printpdf. El render es
//! síncrono; los controladores lo ejecutan en `spawn_blocking`.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use thiserror::Error;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 18.0;
const LINE_HEIGHT_MM: f32 = 6.0;
const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 13.0;
const BODY_SIZE: f32 = 10.0;
/// Caracteres por línea aproximados para Helvetica 10pt en el ancho útil
const WRAP_COLUMNS: usize = 95;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pdf backend error: {0}")]
    Backend(String),

    #[error("document has no content")]
    Empty,
}

impl From<printpdf::Error> for RenderError {
    fn from(e: printpdf::Error) -> Self {
        RenderError::Backend(e.to_string())
    }
}

/// Bloque de contenido de un documento
#[derive(Debug, Clone)]
pub enum Block {
    /// Pares etiqueta/valor
    Fields(Vec<(String, String)>),
    /// Texto libre con salto de línea automático
    Paragraph(String),
    /// Tabla con columnas de ancho fijo en milímetros
    Table {
        columns: Vec<(String, f32)>,
        rows: Vec<Vec<String>>,
    },
}

#[derive(Debug, Clone)]
pub struct Section {
    pub heading: String,
    pub blocks: Vec<Block>,
}

/// Documento listo para renderizar
#[derive(Debug, Clone)]
pub struct DocumentLayout {
    pub title: String,
    pub subtitle: Option<String>,
    pub sections: Vec<Section>,
    pub footer: Option<String>,
}

impl DocumentLayout {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            sections: Vec::new(),
            footer: None,
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn section(mut self, heading: impl Into<String>, blocks: Vec<Block>) -> Self {
        self.sections.push(Section {
            heading: heading.into(),
            blocks,
        });
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

/// Escritor de páginas: lleva la posición vertical y abre páginas nuevas
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor_mm: f32,
    pages: usize,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, RenderError> {
        let (doc, page, layer) = PdfDocument::new(
            sanitize(title),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1".to_string(),
        );
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor_mm: PAGE_HEIGHT_MM - MARGIN_MM,
            pages: 1,
        })
    }

    fn ensure_space(&mut self, needed_mm: f32) {
        if self.cursor_mm - needed_mm >= MARGIN_MM {
            return;
        }
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor_mm = PAGE_HEIGHT_MM - MARGIN_MM;
        self.pages += 1;
    }

    fn text_at(&self, text: &str, size: f32, x_mm: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(sanitize(text), size, Mm(x_mm), Mm(self.cursor_mm), font);
    }

    fn line(&mut self, text: &str, size: f32, bold: bool) {
        self.ensure_space(LINE_HEIGHT_MM);
        self.text_at(text, size, MARGIN_MM, bold);
        self.cursor_mm -= LINE_HEIGHT_MM * (size / BODY_SIZE).max(1.0);
    }

    fn gap(&mut self, mm: f32) {
        self.cursor_mm -= mm;
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Fields(pairs) => {
                for (label, value) in pairs {
                    self.ensure_space(LINE_HEIGHT_MM);
                    self.text_at(&format!("{}:", label), BODY_SIZE, MARGIN_MM, true);
                    let wrapped = wrap(value, WRAP_COLUMNS - 30);
                    for (i, chunk) in wrapped.iter().enumerate() {
                        if i > 0 {
                            self.ensure_space(LINE_HEIGHT_MM);
                        }
                        self.text_at(chunk, BODY_SIZE, MARGIN_MM + 55.0, false);
                        self.cursor_mm -= LINE_HEIGHT_MM;
                    }
                }
            }
            Block::Paragraph(text) => {
                for chunk in wrap(text, WRAP_COLUMNS) {
                    self.line(&chunk, BODY_SIZE, false);
                }
            }
            Block::Table { columns, rows } => {
                self.table_row(columns.iter().map(|(h, w)| (h.as_str(), *w)), true);
                for row in rows {
                    let cells = row
                        .iter()
                        .zip(columns.iter())
                        .map(|(cell, (_, width))| (cell.as_str(), *width));
                    self.table_row(cells, false);
                }
            }
        }
    }

    fn table_row<'a>(&mut self, cells: impl Iterator<Item = (&'a str, f32)>, bold: bool) {
        self.ensure_space(LINE_HEIGHT_MM);
        let mut x = MARGIN_MM;
        for (text, width) in cells {
            // ~2 mm por carácter a 10pt
            let max_chars = ((width / 2.0) as usize).max(4);
            self.text_at(&truncate(text, max_chars), BODY_SIZE, x, bold);
            x += width;
        }
        self.cursor_mm -= LINE_HEIGHT_MM;
    }

    fn finish(self, footer: Option<&str>) -> Result<Vec<u8>, RenderError> {
        if let Some(footer) = footer {
            self.layer
                .use_text(sanitize(footer), 8.0, Mm(MARGIN_MM), Mm(MARGIN_MM / 2.0), &self.regular);
        }
        tracing::debug!("PDF generado con {} página(s)", self.pages);
        Ok(self.doc.save_to_bytes()?)
    }
}

/// Renderiza el documento completo a bytes PDF
pub fn render_pdf(layout: &DocumentLayout) -> Result<Vec<u8>, RenderError> {
    if layout.title.trim().is_empty() && layout.sections.is_empty() {
        return Err(RenderError::Empty);
    }

    let mut writer = PageWriter::new(&layout.title)?;
    writer.line(&layout.title, TITLE_SIZE, true);
    if let Some(subtitle) = &layout.subtitle {
        writer.line(subtitle, BODY_SIZE, false);
    }
    writer.gap(LINE_HEIGHT_MM);

    for section in &layout.sections {
        writer.ensure_space(LINE_HEIGHT_MM * 3.0);
        writer.line(&section.heading, HEADING_SIZE, true);
        for block in &section.blocks {
            writer.block(block);
        }
        writer.gap(LINE_HEIGHT_MM / 2.0);
    }

    writer.finish(layout.footer.as_deref())
}

/// Las fuentes estándar solo cubren WinAnsi; se quitan acentos comunes y el resto pasa a `?`
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'Á' | 'À' | 'Â' | 'Ä' | 'Ã' => 'A',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'O',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'ñ' => 'n',
            'Ñ' => 'N',
            'ç' => 'c',
            'Ç' => 'C',
            '£' => 'L',
            '€' => 'E',
            '\t' | '\n' | '\r' => ' ',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '?',
        })
        .collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// Parte el texto en líneas de como mucho `columns` caracteres, por palabras
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if current.is_empty() { word.chars().count() } else { current.chars().count() + 1 + word.chars().count() };
            if needed > columns && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_pdf_document() {
        let layout = DocumentLayout::new("Test Drive Agreement")
            .subtitle("North Motors")
            .section(
                "Customer",
                vec![Block::Fields(vec![
                    ("Name".into(), "Zoë Ångström".into()),
                    ("Email".into(), "zoe@example.com".into()),
                ])],
            )
            .section(
                "Costs",
                vec![Block::Table {
                    columns: vec![("Stock".into(), 30.0), ("Amount".into(), 30.0)],
                    rows: vec![vec!["STK-1".into(), "120.00".into()]],
                }],
            )
            .footer("Generated for testing");

        let bytes = render_pdf(&layout).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn long_documents_break_across_pages() {
        let rows: Vec<Vec<String>> = (0..200).map(|i| vec![format!("row {}", i)]).collect();
        let layout = DocumentLayout::new("Report").section(
            "Rows",
            vec![Block::Table {
                columns: vec![("Row".into(), 40.0)],
                rows,
            }],
        );
        let bytes = render_pdf(&layout).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn sanitizes_non_latin_text() {
        assert_eq!(sanitize("Peña €5 ✓"), "Pena E5 ?");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
    }
}
