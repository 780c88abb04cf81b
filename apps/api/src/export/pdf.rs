//! PDF export: lays the report out on US Letter pages with the base-14
//! Helvetica fonts and writes the document with `lopdf`.
//!
//! Page layout, top to bottom: running header, title block (first page only),
//! two-column score summary (first page only), report body, page footer.

use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::errors::AppError;
use crate::export::markup::{classify_report, format_score, LineKind, ReportLine};
use crate::export::metrics::{get_metrics, Font};
use crate::export::strings::Strings;
use crate::models::export::ExportRequest;

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
/// 20 mm.
const MARGIN: f32 = 56.7;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const BODY_SIZE: f32 = 10.5;
const LINE_SPACING: f32 = 1.45;
const BULLET_INDENT: f32 = 12.0;
const SCORE_BOX_HEIGHT: f32 = 62.0;
const SCORE_BOX_GAP: f32 = 18.0;

type Rgb = (f32, f32, f32);

const BLACK: Rgb = (0.1, 0.1, 0.1);
const GREY: Rgb = (0.4, 0.4, 0.4);
const TITLE_BLUE: Rgb = (0.145, 0.388, 0.922);
const HEADING_BLUE: Rgb = (0.118, 0.251, 0.686);
const POSITIVE_GREEN: Rgb = (0.086, 0.502, 0.239);
const WARNING_AMBER: Rgb = (0.706, 0.447, 0.0);
const CRITICAL_RED: Rgb = (0.753, 0.153, 0.153);
const BOX_FILL: Rgb = (0.973, 0.976, 0.980);

struct TextStyle {
    font: Font,
    size: f32,
    color: Rgb,
    space_before: f32,
    indent: f32,
}

fn style_for(kind: LineKind) -> TextStyle {
    let body = |color| TextStyle {
        font: Font::Helvetica,
        size: BODY_SIZE,
        color,
        space_before: 0.0,
        indent: 0.0,
    };
    match kind {
        LineKind::Heading(1) => TextStyle {
            font: Font::HelveticaBold,
            size: 15.0,
            color: HEADING_BLUE,
            space_before: 10.0,
            indent: 0.0,
        },
        LineKind::Heading(2) => TextStyle {
            font: Font::HelveticaBold,
            size: 13.0,
            color: HEADING_BLUE,
            space_before: 8.0,
            indent: 0.0,
        },
        LineKind::Heading(_) => TextStyle {
            font: Font::HelveticaBold,
            size: 11.5,
            color: BLACK,
            space_before: 6.0,
            indent: 0.0,
        },
        LineKind::Positive => body(POSITIVE_GREEN),
        LineKind::Warning => body(WARNING_AMBER),
        LineKind::Critical => body(CRITICAL_RED),
        LineKind::Bullet => TextStyle {
            indent: BULLET_INDENT,
            ..body(BLACK)
        },
        LineKind::Plain | LineKind::Blank => body(BLACK),
    }
}

/// Encodes text for a WinAnsiEncoding simple font. Characters the encoding
/// lacks become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Page builder
// ────────────────────────────────────────────────────────────────────────────

struct PageBuilder {
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    /// Baseline cursor, measured from the bottom edge.
    y: f32,
}

impl PageBuilder {
    fn new() -> Self {
        PageBuilder {
            pages: Vec::new(),
            ops: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn new_page(&mut self) {
        let finished = std::mem::take(&mut self.ops);
        self.pages.push(finished);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Starts a new page unless `height` points still fit above the bottom margin.
    fn ensure_space(&mut self, height: f32) {
        if self.y - height < MARGIN {
            self.new_page();
        }
    }

    fn text(&mut self, x: f32, y: f32, font: Font, size: f32, color: Rgb, text: &str) {
        self.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new("rg", vec![color.0.into(), color.1.into(), color.2.into()]),
            Operation::new("Tf", vec![font.resource_name().into(), size.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    fn centered_text(&mut self, y: f32, font: Font, size: f32, color: Rgb, text: &str) {
        let width = get_metrics(font).measure_str(text) * size;
        let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN);
        self.text(x, y, font, size, color, text);
    }

    fn filled_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.ops.extend([
            Operation::new("rg", vec![color.0.into(), color.1.into(), color.2.into()]),
            Operation::new(
                "re",
                vec![x.into(), y.into(), width.into(), height.into()],
            ),
            Operation::new("f", vec![]),
        ]);
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.new_page();
        }
        self.pages
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

fn layout_title(page: &mut PageBuilder, strings: &Strings, generated_on: NaiveDate) {
    page.y -= 20.0;
    page.centered_text(page.y, Font::HelveticaBold, 22.0, TITLE_BLUE, strings.title);
    page.y -= 18.0;
    page.centered_text(page.y, Font::Helvetica, 10.0, GREY, strings.subtitle);
    page.y -= 14.0;
    let date = generated_on.format("%d/%m/%Y").to_string();
    page.centered_text(page.y, Font::Helvetica, 9.0, GREY, &date);
    page.y -= 24.0;
}

fn layout_scores(page: &mut PageBuilder, strings: &Strings, request: &ExportRequest) {
    let box_width = (CONTENT_WIDTH - SCORE_BOX_GAP) / 2.0;
    let bottom = page.y - SCORE_BOX_HEIGHT;
    let columns = [
        (strings.initial_score, request.scores.initial),
        (strings.projected_score, request.scores.projected),
    ];

    for (i, (label, score)) in columns.into_iter().enumerate() {
        let left = MARGIN + i as f32 * (box_width + SCORE_BOX_GAP);
        page.filled_rect(left, bottom, box_width, SCORE_BOX_HEIGHT, BOX_FILL);

        let label_width = get_metrics(Font::Helvetica).measure_str(label) * 10.0;
        page.text(
            left + (box_width - label_width) / 2.0,
            bottom + SCORE_BOX_HEIGHT - 20.0,
            Font::Helvetica,
            10.0,
            GREY,
            label,
        );

        let value = format_score(score);
        let value_width = get_metrics(Font::HelveticaBold).measure_str(&value) * 20.0;
        page.text(
            left + (box_width - value_width) / 2.0,
            bottom + 14.0,
            Font::HelveticaBold,
            20.0,
            TITLE_BLUE,
            &value,
        );
    }

    page.y = bottom - 28.0;
}

fn layout_body(page: &mut PageBuilder, strings: &Strings, lines: &[ReportLine]) {
    let heading = style_for(LineKind::Heading(1));
    page.ensure_space(heading.size * LINE_SPACING);
    page.y -= heading.size;
    page.text(
        MARGIN,
        page.y,
        heading.font,
        heading.size,
        heading.color,
        strings.detailed_analysis,
    );
    page.y -= heading.size * (LINE_SPACING - 1.0) + 6.0;

    for line in lines {
        if line.kind == LineKind::Blank {
            page.y -= BODY_SIZE * 0.6;
            continue;
        }

        let style = style_for(line.kind);
        let line_height = style.size * LINE_SPACING;
        let max_width_em = (CONTENT_WIDTH - style.indent) / style.size;

        page.y -= style.space_before;
        for (i, wrapped) in get_metrics(style.font)
            .wrap(&line.text, max_width_em)
            .iter()
            .enumerate()
        {
            page.ensure_space(line_height);
            page.y -= line_height;
            // continuation lines of a bullet hang under the text, not the dot
            let hang = if line.kind == LineKind::Bullet && i > 0 {
                BULLET_INDENT
            } else {
                0.0
            };
            page.text(
                MARGIN + style.indent + hang,
                page.y,
                style.font,
                style.size,
                style.color,
                wrapped,
            );
        }
    }
}

fn running_header(strings: &Strings) -> Vec<Operation> {
    let mut page = PageBuilder::new();
    page.centered_text(
        PAGE_HEIGHT - 30.0,
        Font::Helvetica,
        8.0,
        GREY,
        strings.running_header,
    );
    page.ops
}

fn page_footer(strings: &Strings, number: usize, total: usize) -> Vec<Operation> {
    let mut page = PageBuilder::new();
    let text = strings.page_footer(number, total);
    page.centered_text(28.0, Font::Helvetica, 8.0, GREY, &text);
    page.ops
}

/// Lays out every page and returns the content operations per page.
fn layout_pages(
    request: &ExportRequest,
    strings: &Strings,
    generated_on: NaiveDate,
) -> Vec<Vec<Operation>> {
    let mut page = PageBuilder::new();
    layout_title(&mut page, strings, generated_on);
    layout_scores(&mut page, strings, request);
    layout_body(&mut page, strings, &classify_report(&request.analysis));

    let pages = page.finish();
    let total = pages.len();
    pages
        .into_iter()
        .enumerate()
        .map(|(i, body)| {
            let mut ops = running_header(strings);
            ops.extend(body);
            ops.extend(page_footer(strings, i + 1, total));
            ops
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Document assembly
// ────────────────────────────────────────────────────────────────────────────

fn font_object(font: Font) -> Object {
    Object::Dictionary(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_name(),
        "Encoding" => "WinAnsiEncoding",
    })
}

fn render_error(err: lopdf::Error) -> AppError {
    AppError::Render(format!("PDF generation failed: {err}"))
}

/// Renders the export request as a PDF document.
pub fn render_pdf(
    request: &ExportRequest,
    strings: &Strings,
    generated_on: NaiveDate,
) -> Result<Vec<u8>, AppError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_object(Font::Helvetica));
    let bold_id = doc.add_object(font_object(Font::HelveticaBold));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Font::Helvetica.resource_name() => regular_id,
            Font::HelveticaBold.resource_name() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in layout_pages(request, strings, generated_on) {
        let content = Content { operations }.encode().map_err(render_error)?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| AppError::Render(format!("PDF generation failed: {e}")))?;
    Ok(buffer)
}
