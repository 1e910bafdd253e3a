pub mod formatter;
pub mod splitter;
pub mod title;

pub use formatter::QuestionFormatter;
pub use splitter::{PageSplitter, QuestionBlocks};
pub use title::TitleExtractor;

use crate::error::{QuizSheetError, Result};
use regex::Regex;

pub(crate) fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| QuizSheetError::Config {
        message: format!("Invalid text pattern '{}': {}", pattern, e),
    })
}

/// `(?i)(?:a|b|c)` over the escaped, non-empty entries, or `None` if there are none.
pub(crate) fn alternation(words: &[String], word_bounded: bool) -> Result<Option<Regex>> {
    let escaped: Vec<String> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();

    if escaped.is_empty() {
        return Ok(None);
    }

    let body = escaped.join("|");
    let pattern = if word_bounded {
        format!(r"(?i)\b(?:{})\b", body)
    } else {
        format!("(?i)(?:{})", body)
    };

    compile(&pattern).map(Some)
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Bài  3:\n\tĐộng   lượng "), "Bài 3: Động lượng");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_alternation_escapes_entries() {
        let re = alternation(&["(đề)".to_string(), ".pdf".to_string()], false)
            .unwrap()
            .unwrap();
        assert!(re.is_match("Bai 3 (ĐỀ).PDF"));
        assert!(!re.is_match("Bai 3 de xpdf"));

        assert!(alternation(&["  ".to_string()], true).unwrap().is_none());
    }
}
