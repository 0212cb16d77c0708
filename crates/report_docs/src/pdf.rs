//! PDF report generation.
//!
//! Generates valid PDF 1.4 files using raw PDF format construction: a small
//! flowing layout (titles, paragraphs, spacers, tables) that breaks onto new
//! pages as needed. Uses the built-in Helvetica family with WinAnsi
//! encoding, so no external font files are required.
//!
//! Full-data reports lay the rows out in chunks of [`FULL_DATA_CHUNK_ROWS`],
//! each chunk its own table. Only one chunk's cell text exists at a time.

use anyhow::Result;
use chrono::NaiveDateTime;
use report_frame::{Frame, Summary};
use std::ops::Range;
use tracing::debug;

/// Rows per table instance in full-data reports.
pub const FULL_DATA_CHUNK_ROWS: usize = 5000;

/// Page margin on every side, in points.
const MARGIN: f64 = 72.0;

/// `#DDDDDD`
const HEADER_GRAY: f64 = 0.867;

// ---------------------------------------------------------------------------
// Page sizes
// ---------------------------------------------------------------------------

/// ISO paper sizes offered for full-data reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A2,
    A1,
}

impl PageSize {
    /// Exact match on `A3`, `A2` or `A1`; anything else is A4.
    pub fn from_selector(selector: &str) -> Self {
        match selector {
            "A3" => Self::A3,
            "A2" => Self::A2,
            "A1" => Self::A1,
            _ => Self::A4,
        }
    }

    /// Portrait width and height in points.
    pub fn dimensions(self) -> (f64, f64) {
        match self {
            Self::A4 => (595.28, 841.89),
            Self::A3 => (841.89, 1190.55),
            Self::A2 => (1190.55, 1683.78),
            Self::A1 => (1683.78, 2383.94),
        }
    }

    /// Media box for full-data reports: A4 stays portrait, the larger
    /// sizes are turned landscape to fit wide tables.
    pub fn full_data_media(self) -> (f64, f64) {
        let (w, h) = self.dimensions();
        match self {
            Self::A4 => (w, h),
            _ => (h, w),
        }
    }
}

/// A finished PDF with layout statistics.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Table instances laid out, header table included.
    pub table_count: usize,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Summary report on A4 portrait: title, timestamp, record count, then the
/// statistics table, or a note when there are no numeric columns.
pub fn render_summary_pdf(
    frame: &Frame,
    summary: &Summary,
    filename: &str,
    generated_at: NaiveDateTime,
) -> Result<RenderedPdf> {
    let mut doc = DocWriter::new(PageSize::A4.dimensions());

    let title = format!("Data Analysis Report: {filename}");
    let generated = format!("Generated on: {}", timestamp(generated_at));
    let records = frame.row_count().to_string();

    doc.title(&title);
    doc.paragraph(&[(Font::Italic, generated.as_str())], 10.0);
    doc.spacer(12.0);
    doc.paragraph(
        &[(Font::Bold, "Total Records: "), (Font::Regular, records.as_str())],
        10.0,
    );
    doc.spacer(24.0);

    if summary.is_empty() {
        doc.paragraph(&[(Font::Italic, "No numeric columns found.")], 10.0);
    } else {
        doc.paragraph(&[(Font::Bold, "Numeric Column Statistics:")], 14.0);
        let table = summary.to_frame();
        let mut rows: Vec<Vec<String>> =
            vec![table.column_names().into_iter().map(String::from).collect()];
        rows.extend(table.row_strings(0..table.row_count()));
        doc.table(&rows, &TableStyle::SUMMARY, Widths::FitContent);
    }

    Ok(doc.finish(&title, generated_at))
}

/// Full-data report: a header-only table followed by one table per chunk of
/// [`FULL_DATA_CHUNK_ROWS`] rows.
pub fn render_full_data_pdf(
    frame: &Frame,
    filename: &str,
    page_size: PageSize,
    generated_at: NaiveDateTime,
) -> Result<RenderedPdf> {
    let mut doc = DocWriter::new(page_size.full_data_media());

    let title = format!("Full Data Report: {filename}");
    let generated = format!("Generated on: {}", timestamp(generated_at));

    doc.title(&title);
    doc.paragraph(&[(Font::Italic, generated.as_str())], 10.0);
    doc.spacer(12.0);

    let header: Vec<Vec<String>> =
        vec![frame.column_names().into_iter().map(String::from).collect()];
    doc.table(&header, &TableStyle::FULL_DATA_HEADER, Widths::Even);

    for range in chunk_ranges(frame.row_count(), FULL_DATA_CHUNK_ROWS) {
        debug!(start = range.start, end = range.end, "Laying out data chunk");
        let chunk = frame.row_strings(range);
        doc.table(&chunk, &TableStyle::FULL_DATA_CHUNK, Widths::Even);
    }

    Ok(doc.finish(&title, generated_at))
}

/// Consecutive row ranges of at most `chunk` rows covering `0..rows`.
pub fn chunk_ranges(rows: usize, chunk: usize) -> impl Iterator<Item = Range<usize>> {
    let chunk = chunk.max(1);
    (0..rows)
        .step_by(chunk)
        .map(move |start| start..(start + chunk).min(rows))
}

fn timestamp(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Bold,
    Regular,
    Italic,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Self::Bold => "/F1",
            Self::Regular => "/F2",
            Self::Italic => "/F3",
        }
    }
}

struct TableStyle {
    font_size: f64,
    padding: f64,
    /// First row gets a gray background.
    header_background: bool,
    /// First row is set in bold.
    header_bold: bool,
    centered: bool,
}

impl TableStyle {
    const SUMMARY: Self = Self {
        font_size: 9.0,
        padding: 4.0,
        header_background: true,
        header_bold: false,
        centered: false,
    };

    const FULL_DATA_HEADER: Self = Self {
        font_size: 6.0,
        padding: 2.0,
        header_background: true,
        header_bold: true,
        centered: true,
    };

    const FULL_DATA_CHUNK: Self = Self {
        font_size: 6.0,
        padding: 2.0,
        header_background: false,
        header_bold: false,
        centered: true,
    };

    fn row_height(&self) -> f64 {
        self.font_size * 1.2 + 2.0 * self.padding
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Widths {
    /// Columns share the usable width equally, so separate tables line up.
    Even,
    /// Columns sized to their widest cell, falling back to `Even` when the
    /// table would not fit.
    FitContent,
}

/// Flowing page writer. Accumulates one content stream per page.
struct DocWriter {
    width: f64,
    height: f64,
    pages: Vec<String>,
    current: String,
    y: f64,
    table_count: usize,
}

impl DocWriter {
    fn new((width, height): (f64, f64)) -> Self {
        Self {
            width,
            height,
            pages: Vec::new(),
            current: String::new(),
            y: height - MARGIN,
            table_count: 0,
        }
    }

    fn usable_width(&self) -> f64 {
        self.width - 2.0 * MARGIN
    }

    fn at_page_top(&self) -> bool {
        self.y >= self.height - MARGIN
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y = self.height - MARGIN;
    }

    /// Starts a new page unless `height` still fits on this one.
    fn reserve(&mut self, height: f64) {
        if self.y - height < MARGIN && !self.at_page_top() {
            self.new_page();
        }
    }

    fn spacer(&mut self, height: f64) {
        if self.at_page_top() {
            return;
        }
        self.y -= height;
        if self.y < MARGIN {
            self.new_page();
        }
    }

    /// Centered bold 18pt title.
    fn title(&mut self, text: &str) {
        let size = 18.0;
        let leading = size * 1.2;
        self.reserve(leading + 6.0);
        self.y -= leading;
        let text = fit_text(text, Font::Bold, size, self.usable_width());
        let x = MARGIN + (self.usable_width() - text_width(&text, Font::Bold, size)) / 2.0;
        self.text(x, self.y + size * 0.2, Font::Bold, size, &text);
        self.y -= 6.0;
    }

    /// Left-aligned single line made of styled runs.
    fn paragraph(&mut self, runs: &[(Font, &str)], size: f64) {
        let leading = size * 1.2;
        self.reserve(leading);
        self.y -= leading;
        let mut x = MARGIN;
        let baseline = self.y + size * 0.2;
        for (font, run) in runs {
            let run = fit_text(run, *font, size, MARGIN + self.usable_width() - x);
            self.text(x, baseline, *font, size, &run);
            x += text_width(&run, *font, size);
        }
    }

    fn text(&mut self, x: f64, y: f64, font: Font, size: f64, text: &str) {
        self.current.push_str(&format!(
            "BT\n{} {size:.1} Tf\n{x:.2} {y:.2} Td\n({}) Tj\nET\n",
            font.resource(),
            pdf_escape(text)
        ));
    }

    /// Lays out one table instance, continuing its grid across page breaks.
    fn table(&mut self, rows: &[Vec<String>], style: &TableStyle, widths: Widths) {
        self.table_count += 1;
        let n_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        if n_cols == 0 {
            return;
        }

        let col_widths = self.column_widths(rows, n_cols, style, widths);
        let total: f64 = col_widths.iter().sum();
        let x0 = MARGIN + (self.usable_width() - total) / 2.0;
        let x1 = x0 + total;
        let row_h = style.row_height();

        let mut segment_top: Option<f64> = None;
        for (row_idx, row) in rows.iter().enumerate() {
            if self.y - row_h < MARGIN && !self.at_page_top() {
                if let Some(top) = segment_top.take() {
                    self.column_rules(x0, &col_widths, top, self.y);
                }
                self.new_page();
            }

            let is_header = row_idx == 0;
            let bottom = self.y - row_h;
            if is_header && style.header_background {
                self.current.push_str(&format!(
                    "{HEADER_GRAY} {HEADER_GRAY} {HEADER_GRAY} rg\n\
                     {x0:.2} {bottom:.2} {total:.2} {row_h:.2} re f\n0 0 0 rg\n"
                ));
            }
            if segment_top.is_none() {
                segment_top = Some(self.y);
                self.rule(x0, x1, self.y);
            }

            let font = if is_header && style.header_bold {
                Font::Bold
            } else {
                Font::Regular
            };
            let baseline = bottom + style.padding + style.font_size * 0.25;
            let mut x = x0;
            for (col_idx, width) in col_widths.iter().enumerate() {
                if let Some(cell) = row.get(col_idx).filter(|c| !c.is_empty()) {
                    let cell = fit_text(cell, font, style.font_size, width - 2.0 * style.padding);
                    let text_x = if style.centered {
                        x + (width - text_width(&cell, font, style.font_size)) / 2.0
                    } else {
                        x + style.padding
                    };
                    self.text(text_x, baseline, font, style.font_size, &cell);
                }
                x += width;
            }

            self.rule(x0, x1, bottom);
            self.y = bottom;
        }

        if let Some(top) = segment_top {
            self.column_rules(x0, &col_widths, top, self.y);
        }
    }

    fn column_widths(
        &self,
        rows: &[Vec<String>],
        n_cols: usize,
        style: &TableStyle,
        widths: Widths,
    ) -> Vec<f64> {
        let even = vec![self.usable_width() / n_cols as f64; n_cols];
        if widths == Widths::Even {
            return even;
        }

        let mut natural = vec![0.0_f64; n_cols];
        for (row_idx, row) in rows.iter().enumerate() {
            let font = if row_idx == 0 && style.header_bold {
                Font::Bold
            } else {
                Font::Regular
            };
            for (col_idx, cell) in row.iter().enumerate() {
                let w = text_width(cell, font, style.font_size) + 2.0 * style.padding;
                natural[col_idx] = natural[col_idx].max(w);
            }
        }
        if natural.iter().sum::<f64>() <= self.usable_width() {
            natural
        } else {
            even
        }
    }

    /// Horizontal 1pt rule.
    fn rule(&mut self, x0: f64, x1: f64, y: f64) {
        self.current
            .push_str(&format!("{x0:.2} {y:.2} m {x1:.2} {y:.2} l S\n"));
    }

    /// Vertical rules at every column boundary between `top` and `bottom`.
    fn column_rules(&mut self, x0: f64, col_widths: &[f64], top: f64, bottom: f64) {
        let mut x = x0;
        self.current
            .push_str(&format!("{x:.2} {top:.2} m {x:.2} {bottom:.2} l S\n"));
        for width in col_widths {
            x += width;
            self.current
                .push_str(&format!("{x:.2} {top:.2} m {x:.2} {bottom:.2} l S\n"));
        }
    }

    fn finish(mut self, title: &str, generated_at: NaiveDateTime) -> RenderedPdf {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.new_page();
        }
        let page_count = self.pages.len();
        let table_count = self.table_count;
        let builder = PdfBuilder {
            pages: self.pages,
            media_box: (self.width, self.height),
        };
        RenderedPdf {
            bytes: builder.build(title, generated_at),
            page_count,
            table_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Text metrics
// ---------------------------------------------------------------------------

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :;<=>?@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [\]^_`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // {|}~
];

const ELLIPSIS: &str = "..";

fn glyph_width(c: char, font: Font, size: f64) -> f64 {
    let units = match c as u32 {
        code @ 32..=126 => HELVETICA_WIDTHS[(code - 32) as usize],
        _ => 556,
    };
    // Helvetica-Bold runs about 6% wider.
    let scale = if font == Font::Bold { 1.06 } else { 1.0 };
    f64::from(units) * size / 1000.0 * scale
}

fn text_width(text: &str, font: Font, size: f64) -> f64 {
    text.chars().map(|c| glyph_width(c, font, size)).sum()
}

/// Truncates `text` with `..` so it fits in `avail` points.
fn fit_text(text: &str, font: Font, size: f64, avail: f64) -> String {
    if text_width(text, font, size) <= avail {
        return text.to_string();
    }
    let budget = avail - text_width(ELLIPSIS, font, size);
    if budget <= 0.0 {
        return String::new();
    }

    let mut used = 0.0;
    let mut out = String::new();
    for c in text.chars() {
        let w = glyph_width(c, font, size);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(ELLIPSIS);
    out
}

/// Escape a string for a PDF literal. Output is pure ASCII: Latin-1
/// letters become octal escapes, other characters outside WinAnsi become
/// `?`, and control characters become spaces.
fn pdf_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            c if c.is_ascii_control() => out.push(' '),
            c if c.is_ascii() => out.push(c),
            c if (0xA0..=0xFF).contains(&(c as u32)) => {
                out.push_str(&format!("\\{:03o}", c as u32));
            }
            _ => out.push('?'),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// File assembly
// ---------------------------------------------------------------------------

/// Object number of the first page; pages and their content streams
/// alternate from here.
const FIRST_PAGE_OBJ: usize = 7;

/// PDF file builder. Constructs valid PDF 1.4 files from per-page content
/// streams.
struct PdfBuilder {
    pages: Vec<String>,
    media_box: (f64, f64),
}

impl PdfBuilder {
    /// Build the complete PDF file as bytes.
    fn build(&self, title: &str, created: NaiveDateTime) -> Vec<u8> {
        let mut pdf = String::new();
        let mut offsets: Vec<usize> = Vec::new();
        let (width, height) = self.media_box;

        // Header
        pdf.push_str("%PDF-1.4\n");

        // Obj 1: Catalog
        offsets.push(pdf.len());
        pdf.push_str("1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

        // Obj 2: Pages
        let kids: Vec<String> = (0..self.pages.len())
            .map(|i| format!("{} 0 R", FIRST_PAGE_OBJ + 2 * i))
            .collect();
        offsets.push(pdf.len());
        pdf.push_str(&format!(
            "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
            kids.join(" "),
            self.pages.len()
        ));

        // Obj 3-5: Fonts
        for (id, base_font) in [
            (3, "Helvetica-Bold"),
            (4, "Helvetica"),
            (5, "Helvetica-Oblique"),
        ] {
            offsets.push(pdf.len());
            pdf.push_str(&format!(
                "{id} 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /{base_font} \
                 /Encoding /WinAnsiEncoding >>\nendobj\n"
            ));
        }

        // Obj 6: Info
        offsets.push(pdf.len());
        pdf.push_str(&format!(
            "6 0 obj\n<< /Title ({}) /Producer (datareport) /CreationDate (D:{}) >>\nendobj\n",
            pdf_escape(title),
            created.format("%Y%m%d%H%M%S")
        ));

        // Page objects, each followed by its content stream
        for (i, stream) in self.pages.iter().enumerate() {
            let page_id = FIRST_PAGE_OBJ + 2 * i;
            let content_id = page_id + 1;

            offsets.push(pdf.len());
            pdf.push_str(&format!(
                "{page_id} 0 obj\n<< /Type /Page /Parent 2 0 R \
                 /MediaBox [0 0 {width:.2} {height:.2}] /Contents {content_id} 0 R \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R /F3 5 0 R >> >> >>\nendobj\n"
            ));

            offsets.push(pdf.len());
            pdf.push_str(&format!(
                "{content_id} 0 obj\n<< /Length {} >>\nstream\n{stream}\nendstream\nendobj\n",
                stream.len()
            ));
        }

        // Cross-reference table
        let xref_offset = pdf.len();
        let num_objects = offsets.len() + 1; // +1 for free entry
        pdf.push_str(&format!("xref\n0 {num_objects}\n"));
        pdf.push_str("0000000000 65535 f \n");
        for offset in &offsets {
            pdf.push_str(&format!("{offset:010} 00000 n \n"));
        }

        // Trailer
        pdf.push_str(&format!(
            "trailer\n<< /Size {num_objects} /Root 1 0 R /Info 6 0 R >>\n"
        ));
        pdf.push_str(&format!("startxref\n{xref_offset}\n%%EOF\n"));

        pdf.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use report_frame::{CellValue, Column, read_csv, summarize};

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn numbered_frame(rows: usize) -> Frame {
        Frame::from_columns(vec![
            Column::from_cells("id", (0..rows as i64).map(CellValue::Int).collect()),
            Column::from_cells(
                "label",
                (0..rows).map(|i| CellValue::Text(format!("row {i}"))).collect(),
            ),
        ])
        .unwrap()
    }

    fn text(bytes: &[u8]) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// `startxref` must point at the `xref` keyword.
    fn assert_xref_valid(bytes: &[u8]) {
        let content = text(bytes);
        let tail = content.rsplit("startxref\n").next().unwrap();
        let offset: usize = tail.lines().next().unwrap().parse().unwrap();
        assert_eq!(&bytes[offset..offset + 4], b"xref");
    }

    #[test]
    fn test_chunk_ranges() {
        assert_eq!(chunk_ranges(0, 5000).count(), 0);
        assert_eq!(chunk_ranges(1, 5000).collect::<Vec<_>>(), vec![0..1]);
        assert_eq!(chunk_ranges(5000, 5000).collect::<Vec<_>>(), vec![0..5000]);
        assert_eq!(
            chunk_ranges(5001, 5000).collect::<Vec<_>>(),
            vec![0..5000, 5000..5001]
        );
        assert_eq!(
            chunk_ranges(12000, 5000).collect::<Vec<_>>(),
            vec![0..5000, 5000..10000, 10000..12000]
        );
    }

    #[test]
    fn test_page_size_selector() {
        assert_eq!(PageSize::from_selector("A3"), PageSize::A3);
        assert_eq!(PageSize::from_selector("A1"), PageSize::A1);
        assert_eq!(PageSize::from_selector("a3"), PageSize::A4);
        assert_eq!(PageSize::from_selector("Letter"), PageSize::A4);
    }

    #[test]
    fn test_full_data_media_is_landscape_above_a4() {
        assert_eq!(PageSize::A4.full_data_media(), (595.28, 841.89));
        assert_eq!(PageSize::A3.full_data_media(), (1190.55, 841.89));
        let (w, h) = PageSize::A1.full_data_media();
        assert!(w > h);
    }

    #[test]
    fn test_full_data_small_frame_uses_one_chunk() {
        let pdf = render_full_data_pdf(&numbered_frame(10), "data.csv", PageSize::A4, at())
            .unwrap();
        assert!(pdf.bytes.starts_with(b"%PDF-1.4"));
        assert!(pdf.bytes.ends_with(b"%%EOF\n"));
        assert_eq!(pdf.table_count, 2);
        assert_eq!(pdf.page_count, 1);
        assert_xref_valid(&pdf.bytes);

        let content = text(&pdf.bytes);
        assert!(content.contains("(Full Data Report: data.csv) Tj"));
        assert!(content.contains("(Generated on: 2024-05-01 09:30) Tj"));
        assert!(content.contains("(row 9) Tj"));
    }

    #[test]
    fn test_full_data_exactly_one_chunk_at_limit() {
        let pdf = render_full_data_pdf(
            &numbered_frame(FULL_DATA_CHUNK_ROWS),
            "data.csv",
            PageSize::A4,
            at(),
        )
        .unwrap();
        assert_eq!(pdf.table_count, 2);
        assert!(pdf.page_count > 1);
    }

    #[test]
    fn test_full_data_large_frame_is_chunked() {
        let pdf = render_full_data_pdf(
            &numbered_frame(FULL_DATA_CHUNK_ROWS + 1),
            "big.csv",
            PageSize::A4,
            at(),
        )
        .unwrap();
        assert_eq!(pdf.table_count, 3);
        assert_xref_valid(&pdf.bytes);

        let content = text(&pdf.bytes);
        assert!(content.contains(&format!("/Count {}", pdf.page_count)));
        assert!(content.contains("(row 5000) Tj"));
    }

    #[test]
    fn test_full_data_empty_frame_has_header_only() {
        let frame = read_csv(b"a,b\n").unwrap();
        let pdf = render_full_data_pdf(&frame, "empty.csv", PageSize::A4, at()).unwrap();
        assert_eq!(pdf.table_count, 1);
        assert_eq!(pdf.page_count, 1);
        let content = text(&pdf.bytes);
        assert!(content.contains("(a) Tj"));
    }

    #[test]
    fn test_full_data_landscape_media_box() {
        let pdf = render_full_data_pdf(&numbered_frame(3), "wide.csv", PageSize::A3, at())
            .unwrap();
        let content = text(&pdf.bytes);
        assert!(content.contains("/MediaBox [0 0 1190.55 841.89]"));
    }

    #[test]
    fn test_summary_pdf_with_statistics() {
        let frame = read_csv(b"name,score\nA,1\nB,2\nC,3\n").unwrap();
        let summary = summarize(&frame);
        let pdf = render_summary_pdf(&frame, &summary, "scores.csv", at()).unwrap();

        assert_eq!(pdf.table_count, 1);
        assert_eq!(pdf.page_count, 1);
        assert_xref_valid(&pdf.bytes);
        let content = text(&pdf.bytes);
        assert!(content.contains("(Data Analysis Report: scores.csv) Tj"));
        assert!(content.contains("(Total Records: ) Tj"));
        assert!(content.contains("(3) Tj"));
        assert!(content.contains("(Numeric Column Statistics:) Tj"));
        assert!(content.contains("(Statistic) Tj"));
        assert!(content.contains("(75%) Tj"));
        assert!(content.contains("/MediaBox [0 0 595.28 841.89]"));
    }

    #[test]
    fn test_summary_pdf_without_numeric_columns() {
        let frame = read_csv(b"name,city\nA,X\n").unwrap();
        let summary = summarize(&frame);
        let pdf = render_summary_pdf(&frame, &summary, "names.csv", at()).unwrap();

        assert_eq!(pdf.table_count, 0);
        let content = text(&pdf.bytes);
        assert!(content.contains("(No numeric columns found.) Tj"));
        assert!(!content.contains("Numeric Column Statistics"));
    }

    #[test]
    fn test_pdf_escape() {
        assert_eq!(pdf_escape("hello"), "hello");
        assert_eq!(pdf_escape("(test)"), "\\(test\\)");
        assert_eq!(pdf_escape("a\\b"), "a\\\\b");
        assert_eq!(pdf_escape("line\nbreak"), "line break");
        assert_eq!(pdf_escape("café"), "caf\\351");
        assert_eq!(pdf_escape("数据"), "??");
    }

    #[test]
    fn test_fit_text_truncates() {
        assert_eq!(fit_text("abc", Font::Regular, 10.0, 100.0), "abc");
        let fitted = fit_text("a very long cell value indeed", Font::Regular, 10.0, 40.0);
        assert!(fitted.ends_with(".."));
        assert!(text_width(&fitted, Font::Regular, 10.0) <= 40.0);
        assert_eq!(fit_text("abc", Font::Regular, 10.0, 1.0), "");
    }

    #[test]
    fn test_text_width_uses_helvetica_metrics() {
        assert!((text_width("i", Font::Regular, 10.0) - 2.22).abs() < 1e-9);
        assert!((text_width("W", Font::Regular, 10.0) - 9.44).abs() < 1e-9);
        assert!(text_width("W", Font::Bold, 10.0) > text_width("W", Font::Regular, 10.0));
    }
}
