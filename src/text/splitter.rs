use crate::config::TextConfig;
use crate::error::Result;
use crate::text::compile;
use regex::{Matches, Regex};
use std::iter::FusedIterator;

/// Splits page text into question blocks at every `Câu <n>[:.)]` marker.
pub struct PageSplitter {
    marker: Regex,
    min_block_chars: usize,
    keep_preamble: bool,
}

impl PageSplitter {
    pub fn new(config: &TextConfig) -> Result<Self> {
        let marker = compile(&format!(
            r"(?i){}\s*\d+[:.)]",
            regex::escape(config.question_marker.trim())
        ))?;

        Ok(Self {
            marker,
            min_block_chars: config.min_block_chars,
            keep_preamble: config.keep_preamble,
        })
    }

    /// Text ahead of the first marker on a page that has one, when it is long
    /// enough to be the tail of a question started on the previous page.
    /// Always `None` when the preamble is kept as its own block.
    pub fn continuation<'t>(&self, text: &'t str) -> Option<&'t str> {
        if self.keep_preamble {
            return None;
        }

        let first = self.marker.find(text)?;
        let head = text[..first.start()].trim();
        (head.chars().count() >= self.min_block_chars).then_some(head)
    }

    pub fn split<'r, 't>(&'r self, text: &'t str) -> QuestionBlocks<'r, 't> {
        QuestionBlocks {
            text,
            markers: self.marker.find_iter(text),
            cursor: 0,
            at_preamble: !self.keep_preamble,
            finished: false,
            min_block_chars: self.min_block_chars,
        }
    }
}

/// Lazy iterator over the trimmed question blocks of one page.
///
/// The marker stays attached to the block it introduces. Blocks shorter than
/// the configured minimum are skipped, and so is the text ahead of the first
/// marker unless the page has no marker at all.
pub struct QuestionBlocks<'r, 't> {
    text: &'t str,
    markers: Matches<'r, 't>,
    cursor: usize,
    at_preamble: bool,
    finished: bool,
    min_block_chars: usize,
}

impl<'r, 't> Iterator for QuestionBlocks<'r, 't> {
    type Item = &'t str;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let end = match self.markers.next() {
                Some(marker) => marker.start(),
                None => {
                    self.finished = true;
                    self.text.len()
                }
            };

            let start = std::mem::replace(&mut self.cursor, end);
            if std::mem::take(&mut self.at_preamble) && !self.finished {
                continue;
            }

            let block = self.text[start..end].trim();
            if block.chars().count() >= self.min_block_chars {
                return Some(block);
            }
        }

        None
    }
}

impl FusedIterator for QuestionBlocks<'_, '_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter() -> PageSplitter {
        PageSplitter::new(&TextConfig::default()).unwrap()
    }

    #[test]
    fn test_split_keeps_marker_with_following_block() {
        let page = "Bài 3: Động lượng\nCâu 1: Động lượng là gì?\nA. p = mv\nCâu 2. Đơn vị của động lượng?\nCâu 3) Chọn đáp án đúng nhất";
        let blocks: Vec<&str> = splitter().split(page).collect();

        assert_eq!(
            blocks,
            vec![
                "Câu 1: Động lượng là gì?\nA. p = mv",
                "Câu 2. Đơn vị của động lượng?",
                "Câu 3) Chọn đáp án đúng nhất",
            ]
        );
    }

    #[test]
    fn test_preamble_can_be_kept() {
        let config = TextConfig {
            keep_preamble: true,
            ..TextConfig::default()
        };
        let splitter = PageSplitter::new(&config).unwrap();

        let blocks: Vec<&str> = splitter
            .split("Bài 3: Động lượng\nCâu 1: Động lượng là gì?")
            .collect();
        assert_eq!(blocks, vec!["Bài 3: Động lượng", "Câu 1: Động lượng là gì?"]);
    }

    #[test]
    fn test_continuation_is_text_before_first_marker() {
        let splitter = splitter();
        let page = "C. 6 kg.m/s D. 8 kg.m/s\nCâu 2: Đơn vị của động lượng?";

        assert_eq!(splitter.continuation(page), Some("C. 6 kg.m/s D. 8 kg.m/s"));
        assert_eq!(splitter.split(page).collect::<Vec<_>>(), vec!["Câu 2: Đơn vị của động lượng?"]);

        // Page numbers and pages without markers carry nothing over.
        assert_eq!(splitter.continuation("2\nCâu 3: một câu hỏi dài"), None);
        assert_eq!(splitter.continuation("Không có câu hỏi nào ở trang này"), None);
    }

    #[test]
    fn test_kept_preamble_is_not_a_continuation() {
        let config = TextConfig {
            keep_preamble: true,
            ..TextConfig::default()
        };
        let splitter = PageSplitter::new(&config).unwrap();
        assert_eq!(splitter.continuation("C. 6 kg.m/s D. 8 kg.m/s\nCâu 2: tiếp theo"), None);
    }

    #[test]
    fn test_marker_is_case_insensitive() {
        let page = "CÂU 1: một câu hỏi dài\ncâu2: một câu hỏi khác";
        let blocks: Vec<&str> = splitter().split(page).collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[1].starts_with("câu2:"));
    }

    #[test]
    fn test_short_blocks_are_discarded() {
        let page = "12\nCâu 1: ngắn\nCâu 2: Đây là một câu hỏi đủ dài\n  3  ";
        let blocks: Vec<&str> = splitter().split(page).collect();
        // "Câu 1: ngắn" is 11 characters and survives; "12" does not.
        assert_eq!(blocks, vec!["Câu 1: ngắn", "Câu 2: Đây là một câu hỏi đủ dài\n  3"]);

        for block in &blocks {
            assert!(block.trim().chars().count() >= 10);
        }
    }

    #[test]
    fn test_marker_requires_number_and_punctuation() {
        let page = "Câu 1 không có dấu. Câu hỏi: Câu 2: có dấu hai chấm Câu 3 cũng không";
        let blocks: Vec<&str> = splitter().split(page).collect();
        assert_eq!(blocks, vec!["Câu 2: có dấu hai chấm Câu 3 cũng không"]);
    }

    #[test]
    fn test_segments_survive_in_order() {
        let page = "Câu 1: alpha alpha Câu 2: beta beta Câu 3: gamma gamma";
        let joined: String = splitter().split(page).collect::<Vec<_>>().join(" ");

        let a = joined.find("Câu 1: alpha").unwrap();
        let b = joined.find("Câu 2: beta").unwrap();
        let c = joined.find("Câu 3: gamma").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_empty_and_marker_free_pages() {
        assert_eq!(splitter().split("").count(), 0);
        assert_eq!(splitter().split("   \n ").count(), 0);

        let blocks: Vec<&str> = splitter().split("Không có câu hỏi nào ở trang này").collect();
        assert_eq!(blocks, vec!["Không có câu hỏi nào ở trang này"]);
    }

    #[test]
    fn test_iterator_is_fused() {
        let splitter = splitter();
        let mut blocks = splitter.split("Câu 1: một câu hỏi");
        assert!(blocks.next().is_some());
        assert!(blocks.next().is_none());
        assert!(blocks.next().is_none());
    }
}
