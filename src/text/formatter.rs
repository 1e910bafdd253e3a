use crate::error::Result;
use crate::text::compile;
use regex::Regex;

/// Normalizes a raw question block for a spreadsheet cell.
///
/// Line breaks from the page layout are flattened, hyphenated wraps are
/// rejoined, and every answer choice (`A.`..`D.`, `a)`..`d)`) starts its own
/// line unless the marker is glued to a preceding letter or digit, as in
/// `2a.5` or `xA.`. Formatting already-formatted text is a no-op.
pub struct QuestionFormatter {
    hyphen_wrap: Regex,
    choice_marker: Regex,
    blank_run: Regex,
    padded_break: Regex,
    break_run: Regex,
}

impl QuestionFormatter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            hyphen_wrap: compile(r"-\s+")?,
            choice_marker: compile(r"[A-D]\.|[a-d]\)")?,
            blank_run: compile(r"[ \t]+")?,
            padded_break: compile(r"[ \t]*\n[ \t]*")?,
            break_run: compile(r"\n{2,}")?,
        })
    }

    /// The result never contains a blank line and has no leading or
    /// trailing whitespace.
    pub fn format(&self, block: &str) -> String {
        let flattened = block.replace("\r\n", " ").replace(['\r', '\n'], " ");
        let rejoined = self.rejoin_hyphen_wraps(&flattened);
        let broken = self.break_before_choices(&rejoined);

        let text = self.blank_run.replace_all(&broken, " ");
        let text = self.padded_break.replace_all(&text, "\n");
        let text = self.break_run.replace_all(&text, "\n");

        text.trim().to_string()
    }

    /// `dao-  động` becomes `dao-động`; a free-standing dash is left alone.
    fn rejoin_hyphen_wraps(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut last = 0;

        for gap in self.hyphen_wrap.find_iter(text) {
            result.push_str(&text[last..gap.start()]);

            // Read the rewritten text so a run of gaps settles in one pass.
            let glued_left = result
                .chars()
                .next_back()
                .is_some_and(|c| !c.is_whitespace());
            let glued_right = gap.end() < text.len();

            if glued_left && glued_right {
                result.push('-');
            } else {
                result.push_str(gap.as_str());
            }
            last = gap.end();
        }

        result.push_str(&text[last..]);
        result
    }

    fn break_before_choices(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len() + 8);
        let mut last = 0;

        for marker in self.choice_marker.find_iter(text) {
            let glued = text[..marker.start()]
                .chars()
                .next_back()
                .is_some_and(char::is_alphanumeric);

            result.push_str(&text[last..marker.start()]);
            if !glued {
                result.push('\n');
            }
            last = marker.start();
        }

        result.push_str(&text[last..]);
        result
    }
}
