use serde::{Deserialize, Serialize};

/// Report language. Drives which prompt template is used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

impl Language {
    /// Parses a language code; anything unrecognised falls back to Spanish.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Language::En,
            _ => Language::Es,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(Language::from_code("es"), Language::Es);
        assert_eq!(Language::from_code("en"), Language::En);
        assert_eq!(Language::from_code(" EN "), Language::En);
    }

    #[test]
    fn test_unknown_code_falls_back_to_spanish() {
        assert_eq!(Language::from_code("fr"), Language::Es);
        assert_eq!(Language::from_code(""), Language::Es);
    }

    #[test]
    fn test_default_is_spanish() {
        assert_eq!(Language::default(), Language::Es);
        assert_eq!(Language::default().code(), "es");
    }
}
