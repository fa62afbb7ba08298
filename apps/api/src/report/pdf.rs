//! A4 PDF rendering of report blocks with `printpdf` builtin Helvetica.
//!
//! Layout works in points measured from the bottom-left corner. Text is wrapped
//! with the Helvetica metric tables and flows onto new pages as needed.

use printpdf::*;

use super::document::{Block, Table, REPORT_TITLE};
use super::metrics::{text_width_pt, wrap_text, FontWeight};
use super::ReportError;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const PAGE_WIDTH: f32 = PAGE_WIDTH_MM * 72.0 / 25.4;
const PAGE_HEIGHT: f32 = PAGE_HEIGHT_MM * 72.0 / 25.4;
const MARGIN: f32 = 72.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const TOP: f32 = PAGE_HEIGHT - MARGIN;

const CELL_PADDING: f32 = 6.0;
const CELL_SIZE: f32 = 10.0;
const CELL_LEADING: f32 = 13.0;
const MARKER_INDENT: f32 = 10.0;
const ITEM_INDENT: f32 = 26.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy)]
struct Style {
    size: f32,
    leading: f32,
    weight: FontWeight,
    rgb: (f32, f32, f32),
    align: Align,
    space_before: f32,
    space_after: f32,
}

const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);
const GREY: (f32, f32, f32) = (0.4, 0.4, 0.4);
const NAVY: (f32, f32, f32) = (0.12, 0.31, 0.47);
const SLATE: (f32, f32, f32) = (0.17, 0.24, 0.31);
const STEEL: (f32, f32, f32) = (0.2, 0.4, 0.6);

const TITLE: Style = Style {
    size: 24.0,
    leading: 30.0,
    weight: FontWeight::Bold,
    rgb: NAVY,
    align: Align::Center,
    space_before: 0.0,
    space_after: 12.0,
};
const SUBTITLE: Style = Style {
    size: 10.0,
    leading: 13.0,
    weight: FontWeight::Regular,
    rgb: GREY,
    align: Align::Center,
    space_before: 0.0,
    space_after: 0.0,
};
const HEADING: Style = Style {
    size: 16.0,
    leading: 20.0,
    weight: FontWeight::Bold,
    rgb: SLATE,
    align: Align::Left,
    space_before: 14.0,
    space_after: 8.0,
};
const SUBHEADING: Style = Style {
    size: 13.0,
    leading: 17.0,
    weight: FontWeight::Bold,
    rgb: STEEL,
    align: Align::Left,
    space_before: 6.0,
    space_after: 4.0,
};
const BODY: Style = Style {
    size: 11.0,
    leading: 14.0,
    weight: FontWeight::Regular,
    rgb: BLACK,
    align: Align::Left,
    space_before: 0.0,
    space_after: 6.0,
};
const FOOTER: Style = Style {
    size: 9.0,
    leading: 12.0,
    weight: FontWeight::Regular,
    rgb: GREY,
    align: Align::Center,
    space_before: 0.0,
    space_after: 2.0,
};

/// Renders `blocks` to PDF bytes.
pub fn render_pdf(blocks: &[Block]) -> Result<Vec<u8>, ReportError> {
    let mut renderer = Renderer::new(REPORT_TITLE)?;
    for block in blocks {
        renderer.block(block);
    }
    renderer.finish()
}

struct Renderer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Top of the remaining space on the current page.
    y: f32,
    pages: usize,
}

impl Renderer {
    fn new(title: &str) -> Result<Self, ReportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Pdf(e.to_string()))?;

        Ok(Renderer {
            doc,
            layer,
            regular,
            bold,
            y: TOP,
            pages: 1,
        })
    }

    fn finish(self) -> Result<Vec<u8>, ReportError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| ReportError::Pdf(e.to_string()))
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Title(text) => self.text(text, TITLE),
            Block::Subtitle(text) => self.text(text, SUBTITLE),
            Block::Heading(text) => self.text(text, HEADING),
            Block::Subheading(text) => self.text(text, SUBHEADING),
            Block::Paragraph(text) => self.text(text, BODY),
            Block::Footer(text) => self.text(text, FOOTER),
            Block::ListItem { marker, text } => self.list_item(marker, text),
            Block::Table(table) => self.table(table),
            Block::Spacer(height) => {
                self.y -= height;
                if self.y < MARGIN {
                    self.new_page();
                }
            }
            Block::PageBreak => {
                if self.y < TOP {
                    self.new_page();
                }
            }
        }
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = TOP;
        self.pages += 1;
    }

    /// Starts a new page unless `height` still fits above the bottom margin.
    fn ensure(&mut self, height: f32) {
        if self.y - height < MARGIN && self.y < TOP {
            self.new_page();
        }
    }

    fn font(&self, weight: FontWeight) -> &IndirectFontRef {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }

    fn draw(
        &self,
        text: &str,
        x: f32,
        baseline: f32,
        size: f32,
        weight: FontWeight,
        rgb: (f32, f32, f32),
    ) {
        let (r, g, b) = rgb;
        self.layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
        self.layer
            .use_text(text, size, mm(x), mm(baseline), self.font(weight));
    }

    fn text(&mut self, text: &str, style: Style) {
        let text = to_pdf_text(text);
        let lines = wrap_text(&text, style.weight, style.size, CONTENT_WIDTH);
        if lines.is_empty() {
            return;
        }

        // Keep headings together with at least two lines of what follows.
        let keep = if style.weight == FontWeight::Bold && style.align == Align::Left {
            style.leading + 2.0 * BODY.leading
        } else {
            style.leading
        };
        self.ensure(style.space_before + keep);
        if self.y < TOP {
            self.y -= style.space_before;
        }

        for line in &lines {
            self.ensure(style.leading);
            self.y -= style.leading;
            let x = match style.align {
                Align::Left => MARGIN,
                Align::Center => {
                    MARGIN + (CONTENT_WIDTH - text_width_pt(line, style.weight, style.size)) / 2.0
                }
            };
            self.draw(line, x, baseline(self.y, style), style.size, style.weight, style.rgb);
        }
        self.y -= style.space_after;
    }

    fn list_item(&mut self, marker: &str, text: &str) {
        let marker = to_pdf_text(marker);
        let text = to_pdf_text(text);
        let lines = wrap_text(&text, BODY.weight, BODY.size, CONTENT_WIDTH - ITEM_INDENT);

        for (i, line) in lines.iter().enumerate() {
            self.ensure(BODY.leading);
            self.y -= BODY.leading;
            let base = baseline(self.y, BODY);
            if i == 0 {
                self.draw(&marker, MARGIN + MARKER_INDENT, base, BODY.size, BODY.weight, BODY.rgb);
            }
            self.draw(line, MARGIN + ITEM_INDENT, base, BODY.size, BODY.weight, BODY.rgb);
        }
        self.y -= 3.0;
    }

    fn table(&mut self, table: &Table) {
        let total: f32 = table.column_widths.iter().sum();
        let scale = if total > CONTENT_WIDTH {
            CONTENT_WIDTH / total
        } else {
            1.0
        };
        let widths: Vec<f32> = table.column_widths.iter().map(|w| w * scale).collect();
        let left = MARGIN + (CONTENT_WIDTH - total * scale) / 2.0;

        let header = table.header.iter().map(|row| (row, FontWeight::Bold));
        let body = table.rows.iter().map(|row| (row, FontWeight::Regular));

        for (row, weight) in header.chain(body) {
            let cells: Vec<Vec<String>> = widths
                .iter()
                .enumerate()
                .map(|(i, width)| {
                    let cell = row.get(i).map(|c| to_pdf_text(c)).unwrap_or_default();
                    wrap_text(&cell, weight, CELL_SIZE, width - 2.0 * CELL_PADDING)
                })
                .collect();
            let line_count = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
            let height = line_count as f32 * CELL_LEADING + 2.0 * CELL_PADDING;

            self.ensure(height);
            let top = self.y;
            let bottom = top - height;

            let mut x = left;
            for (lines, width) in cells.iter().zip(&widths) {
                for (i, line) in lines.iter().enumerate() {
                    let base = top - CELL_PADDING - (i + 1) as f32 * CELL_LEADING + 3.0;
                    self.draw(line, x + CELL_PADDING, base, CELL_SIZE, weight, BLACK);
                }
                x += width;
            }

            self.rules(left, top, bottom, &widths);
            self.y = bottom;
        }
        self.y -= 6.0;
    }

    /// Grid for one table row: top, bottom, and every column edge.
    fn rules(&self, left: f32, top: f32, bottom: f32, widths: &[f32]) {
        let right = left + widths.iter().sum::<f32>();
        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        self.layer.set_outline_thickness(0.5);

        self.segment((left, top), (right, top));
        self.segment((left, bottom), (right, bottom));

        let mut x = left;
        self.segment((x, top), (x, bottom));
        for width in widths {
            x += width;
            self.segment((x, top), (x, bottom));
        }
    }

    fn segment(&self, from: (f32, f32), to: (f32, f32)) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(mm(from.0), mm(from.1)), false),
                (Point::new(mm(to.0), mm(to.1)), false),
            ],
            is_closed: false,
        });
    }
}

fn baseline(line_bottom: f32, style: Style) -> f32 {
    line_bottom + (style.leading - style.size) / 2.0 + style.size * 0.2
}

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

/// Maps text onto the printable ASCII range understood by the builtin fonts.
pub fn to_pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' '..='~' => out.push(c),
            '\t' | '\n' | '\r' | '\u{00A0}' | '\u{2002}'..='\u{200A}' => out.push(' '),
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2010}'..='\u{2015}' | '\u{2212}' => out.push('-'),
            '\u{2022}' | '\u{2023}' | '\u{25AA}' | '\u{25CF}' | '\u{00B7}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{2192}' => out.push_str("->"),
            '\u{00C0}'..='\u{00FF}' => out.push(fold_latin1(c)),
            c if c.is_control() => {}
            _ => out.push('?'),
        }
    }
    out
}

fn fold_latin1(c: char) -> char {
    match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'ß' => 's',
        '×' => 'x',
        _ => '?',
    }
}
