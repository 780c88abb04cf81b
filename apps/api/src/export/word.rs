//! Word export via `docx-rs`.

use std::io::Cursor;

use docx_rs::{
    AlignmentType, Docx, Paragraph, Run, Table, TableCell, TableRow, WidthType,
};

use crate::errors::AppError;
use crate::export::markup::{classify_report, format_score, LineKind, ReportLine};
use crate::export::strings::Strings;
use crate::models::export::ExportRequest;

/// Half-points, as docx-rs expects.
const BODY_SIZE: usize = 22;
const SCORE_CELL_WIDTH: usize = 4500;

#[derive(Debug, PartialEq, Eq)]
struct RunStyle {
    bold: bool,
    size: usize,
    color: &'static str,
}

fn run_style(kind: LineKind) -> RunStyle {
    let body = |color| RunStyle {
        bold: false,
        size: BODY_SIZE,
        color,
    };
    match kind {
        LineKind::Heading(1) => RunStyle {
            bold: true,
            size: 30,
            color: "1E40AF",
        },
        LineKind::Heading(2) => RunStyle {
            bold: true,
            size: 26,
            color: "1E40AF",
        },
        LineKind::Heading(_) => RunStyle {
            bold: true,
            size: 23,
            color: "1A1A1A",
        },
        LineKind::Positive => body("16803D"),
        LineKind::Warning => body("B47200"),
        LineKind::Critical => body("C02727"),
        LineKind::Bullet | LineKind::Plain | LineKind::Blank => body("1A1A1A"),
    }
}

fn styled_run(text: &str, style: &RunStyle) -> Run {
    let run = Run::new().add_text(text).size(style.size).color(style.color);
    if style.bold {
        run.bold()
    } else {
        run
    }
}

fn report_paragraph(line: &ReportLine) -> Paragraph {
    if line.kind == LineKind::Blank {
        return Paragraph::new();
    }
    Paragraph::new().add_run(styled_run(&line.text, &run_style(line.kind)))
}

fn score_cell(label: &str, score: f64) -> TableCell {
    TableCell::new()
        .width(SCORE_CELL_WIDTH, WidthType::Dxa)
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Center)
                .add_run(Run::new().add_text(label).size(20).color("666666")),
        )
        .add_paragraph(
            Paragraph::new().align(AlignmentType::Center).add_run(
                Run::new()
                    .add_text(format_score(score))
                    .bold()
                    .size(40)
                    .color("2563EB"),
            ),
        )
}

/// Assembles the document without serialising it.
fn build_document(request: &ExportRequest, strings: &Strings) -> Docx {
    let scores = Table::new(vec![TableRow::new(vec![
        score_cell(strings.initial_score, request.scores.initial),
        score_cell(strings.projected_score, request.scores.projected),
    ])]);

    let mut docx = Docx::new()
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Center)
                .add_run(Run::new().add_text(strings.title).bold().size(44).color("2563EB")),
        )
        .add_paragraph(
            Paragraph::new()
                .align(AlignmentType::Center)
                .add_run(Run::new().add_text(strings.subtitle).size(20).color("666666")),
        )
        .add_table(scores)
        .add_paragraph(Paragraph::new())
        .add_paragraph(Paragraph::new().add_run(styled_run(
            strings.detailed_analysis,
            &run_style(LineKind::Heading(1)),
        )));

    for line in classify_report(&request.analysis) {
        docx = docx.add_paragraph(report_paragraph(&line));
    }
    docx
}

/// Renders the export request as a `.docx` package.
pub fn render_word(request: &ExportRequest, strings: &Strings) -> Result<Vec<u8>, AppError> {
    let mut buffer = Cursor::new(Vec::new());
    build_document(request, strings)
        .build()
        .pack(&mut buffer)
        .map_err(|e| AppError::Render(format!("Word generation failed: {e}")))?;
    Ok(buffer.into_inner())
}
