//! Line classification shared by the PDF and Word renderers.
//!
//! Reports are loosely Markdown-shaped. Each line is classified once; marker
//! glyphs are stripped and expressed as styling instead.

const POSITIVE_MARKERS: &[&str] = &["✅", "✔️", "✔", "✓"];
const WARNING_MARKERS: &[&str] = &["⚠️", "⚠", "(!)"];
const CRITICAL_MARKERS: &[&str] = &["❌", "✘", "✗"];
const BULLET_MARKERS: &[&str] = &["- ", "* ", "• "];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Markdown heading, level 1–3.
    Heading(u8),
    Positive,
    Warning,
    Critical,
    Bullet,
    Plain,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub kind: LineKind,
    /// Display text with heading hashes and marker glyphs removed.
    pub text: String,
}

fn contains_any(line: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| line.contains(m))
}

fn strip_markers(line: &str) -> String {
    let mut text = line.to_string();
    for marker in POSITIVE_MARKERS
        .iter()
        .chain(WARNING_MARKERS)
        .chain(CRITICAL_MARKERS)
    {
        text = text.replace(marker, "");
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Classifies a single report line. Critical wins over warning, warning over positive.
pub fn classify_line(line: &str) -> ReportLine {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReportLine {
            kind: LineKind::Blank,
            text: String::new(),
        };
    }

    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&hashes) && trimmed[hashes..].starts_with(' ') {
        return ReportLine {
            kind: LineKind::Heading(hashes.min(3) as u8),
            text: strip_markers(&trimmed[hashes..]),
        };
    }

    let bullet_body = BULLET_MARKERS.iter().find_map(|m| trimmed.strip_prefix(m));

    let kind = if contains_any(trimmed, CRITICAL_MARKERS) {
        LineKind::Critical
    } else if contains_any(trimmed, WARNING_MARKERS) {
        LineKind::Warning
    } else if contains_any(trimmed, POSITIVE_MARKERS) {
        LineKind::Positive
    } else if bullet_body.is_some() {
        LineKind::Bullet
    } else {
        LineKind::Plain
    };

    let text = match (kind, bullet_body) {
        (LineKind::Bullet, Some(body)) => format!("• {}", strip_bold(&strip_markers(body))),
        _ => strip_bold(&strip_markers(trimmed)),
    };
    ReportLine { kind, text }
}

/// Drops Markdown `**` emphasis markers.
fn strip_bold(text: &str) -> String {
    text.replace("**", "")
}

/// Classifies every line of a report, collapsing runs of blank lines.
pub fn classify_report(report: &str) -> Vec<ReportLine> {
    let mut lines: Vec<ReportLine> = Vec::new();
    for line in report.lines() {
        let classified = classify_line(line);
        let previous_blank = lines.last().map_or(true, |l| l.kind == LineKind::Blank);
        if classified.kind == LineKind::Blank && previous_blank {
            continue;
        }
        lines.push(classified);
    }
    while lines.last().is_some_and(|l| l.kind == LineKind::Blank) {
        lines.pop();
    }
    lines
}

/// Formats a score the way the UI shows it: integers without decimals.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 && score.is_finite() {
        format!("{score:.0}/100")
    } else {
        format!("{score:.1}/100")
    }
}
