// Export Renderer
// Turns an analysis report plus its scores into a downloadable PDF or Word file.
// Both renderers share the line classification in `markup`.

pub mod handlers;
pub mod markup;
pub mod metrics;
pub mod pdf;
pub mod strings;
pub mod word;

const DEFAULT_FILE_STEM: &str = "analisis-cv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Word,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Word => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Word => "docx",
        }
    }
}

/// Document extensions a caller may already have put on the requested name.
const KNOWN_EXTENSIONS: &[&str] = &["pdf", "docx", "doc"];

/// Builds a safe attachment file name. Only `[A-Za-z0-9._ -]` survive. A
/// trailing `.pdf`, `.docx` or `.doc` is replaced by the format's own
/// extension; any other dotted name is kept whole.
pub fn sanitize_file_name(requested: Option<&str>, format: ExportFormat) -> String {
    let cleaned: String = requested
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | ' ' | '-'))
        .collect();

    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    let stem = match trimmed.rsplit_once('.') {
        Some((stem, ext))
            if KNOWN_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known)) =>
        {
            stem.trim_end_matches(|c: char| c == '.' || c.is_whitespace())
        }
        _ => trimmed,
    };
    let stem = if stem.is_empty() { DEFAULT_FILE_STEM } else { stem };

    format!("{stem}.{}", format.extension())
}
