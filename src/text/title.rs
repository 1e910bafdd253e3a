use crate::config::TextConfig;
use crate::error::Result;
use crate::text::{alternation, collapse_whitespace, compile};
use regex::Regex;

const UNTITLED: &str = "Untitled";

/// Derives a document's lesson title from the text of its first page.
///
/// The result is never empty: anything that does not yield a usable label
/// falls through to the cleaned file name.
pub struct TitleExtractor {
    keywords: Vec<String>,
    marker_pattern: Regex,
    noise_pattern: Option<Regex>,
    boilerplate_pattern: Option<Regex>,
    seed_chars: usize,
    min_title_chars: usize,
}

impl TitleExtractor {
    pub fn new(config: &TextConfig) -> Result<Self> {
        let keywords: Vec<String> = config
            .lesson_keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        let alternatives = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let marker_pattern = compile(&format!(r"(?i)(?:{})\s*\d*[:\-–]?\s*(.*)", alternatives))?;

        Ok(Self {
            keywords,
            marker_pattern,
            noise_pattern: alternation(&config.noise_words, true)?,
            boilerplate_pattern: alternation(&config.fallback_boilerplate, false)?,
            seed_chars: config.title_seed_chars,
            min_title_chars: config.min_title_chars,
        })
    }

    pub fn extract(&self, first_page_text: &str, fallback: &str) -> String {
        let seed = self.select_seed(first_page_text);
        self.clean_title(&seed, fallback)
    }

    /// First line mentioning a lesson keyword, else the head of the page.
    pub fn select_seed(&self, page_text: &str) -> String {
        page_text
            .lines()
            .find(|line| {
                let lower = line.to_lowercase();
                self.keywords.iter().any(|k| lower.contains(k.as_str()))
            })
            .map(str::to_string)
            .unwrap_or_else(|| page_text.chars().take(self.seed_chars).collect())
    }

    pub fn clean_title(&self, seed: &str, fallback: &str) -> String {
        let seed = collapse_whitespace(seed);

        let title = match self.marker_pattern.captures(&seed) {
            Some(caps) => {
                let remainder = caps.get(1).map_or("", |m| m.as_str());
                let label = self.polish(remainder);
                if self.is_usable(&label) {
                    label
                } else {
                    // "Bài 3" with nothing after it still names the lesson.
                    caps.get(0)
                        .map(|m| self.polish(m.as_str()))
                        .unwrap_or_default()
                }
            }
            None => self.polish(&seed),
        };

        if self.is_usable(&title) {
            title
        } else {
            self.clean_fallback(fallback)
        }
    }

    pub fn clean_fallback(&self, fallback: &str) -> String {
        let stripped = match self.boilerplate_pattern {
            Some(ref pattern) => pattern.replace_all(fallback, "").into_owned(),
            None => fallback.to_string(),
        };

        let title = [stripped.trim(), fallback.trim()]
            .into_iter()
            .find(|candidate| !candidate.is_empty())
            .unwrap_or(UNTITLED)
            .to_string();
        title
    }

    fn polish(&self, text: &str) -> String {
        let without_noise = match self.noise_pattern {
            Some(ref pattern) => pattern.replace_all(text, " ").into_owned(),
            None => text.to_string(),
        };

        let collapsed = collapse_whitespace(&without_noise);
        let trimmed = collapsed
            .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '–' | '—' | ':' | '.' | ','));

        title_case(trimmed)
    }

    fn is_usable(&self, title: &str) -> bool {
        !title.is_empty() && title.chars().count() >= self.min_title_chars
    }
}

/// Upper-cases the first cased letter of every word and lower-cases the rest.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_cased = false;

    for c in text.chars() {
        let cased = c.is_lowercase() || c.is_uppercase();
        if cased && previous_cased {
            result.extend(c.to_lowercase());
        } else if cased {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        previous_cased = cased;
    }

    result
}
