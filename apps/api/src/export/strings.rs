//! Fixed document text for each export language.

use crate::analysis::language::Language;

pub struct Strings {
    pub running_header: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub initial_score: &'static str,
    pub projected_score: &'static str,
    pub detailed_analysis: &'static str,
    page_label: &'static str,
    of_label: &'static str,
}

static ES: Strings = Strings {
    running_header: "Análisis generado por Analyze This!",
    title: "Análisis de CV",
    subtitle: "Compatibilidad con sistemas ATS",
    initial_score: "Puntuación Actual",
    projected_score: "Puntuación Proyectada",
    detailed_analysis: "Análisis Detallado",
    page_label: "Página",
    of_label: "de",
};

static EN: Strings = Strings {
    running_header: "Analysis generated by Analyze This!",
    title: "CV Analysis",
    subtitle: "ATS compatibility report",
    initial_score: "Current Score",
    projected_score: "Projected Score",
    detailed_analysis: "Detailed Analysis",
    page_label: "Page",
    of_label: "of",
};

impl Strings {
    pub fn for_language(language: Language) -> &'static Strings {
        match language {
            Language::Es => &ES,
            Language::En => &EN,
        }
    }

    pub fn page_footer(&self, number: usize, total: usize) -> String {
        format!("{} {number} {} {total}", self.page_label, self.of_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spanish_footer() {
        assert_eq!(Strings::for_language(Language::Es).page_footer(2, 5), "Página 2 de 5");
    }

    #[test]
    fn test_english_labels() {
        let strings = Strings::for_language(Language::En);
        assert_eq!(strings.page_footer(1, 1), "Page 1 of 1");
        assert_eq!(strings.projected_score, "Projected Score");
    }
}
