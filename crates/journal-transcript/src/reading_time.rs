// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reading-time estimate for a transcript.

use std::sync::LazyLock;

use regex::Regex;

/// Words per minute assumed for a technical reader.
pub const WORDS_PER_MINUTE: usize = 280;

/// Markdown constructs removed (or reduced to their text) before counting.
/// Order matters: fences before inline code, images before links.
static MARKUP: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"```[\s\S]*?```", ""),
        (r"!\[[^\]]*\]\([^)]+\)", ""),
        (r"\[([^\]]+)\]\([^)]+\)", "$1"),
        (r"#{1,6}\s+", ""),
        (r"\*\*([^*]+)\*\*", "$1"),
        (r"\*([^*]+)\*", "$1"),
        (r"`([^`]+)`", "$1"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("static markup pattern"),
            replacement,
        )
    })
    .collect()
});

/// Whole minutes needed to read `content`, never less than one.
pub fn calculate_reading_time(content: &str) -> u32 {
    let mut clean = content.to_string();
    for (pattern, replacement) in MARKUP.iter() {
        clean = pattern.replace_all(&clean, *replacement).into_owned();
    }
    let words = clean.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

pub fn format_reading_time(minutes: u32) -> String {
    if minutes == 1 {
        "1 min read".to_string()
    } else {
        format!("{minutes} min read")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_reads_in_one_minute() {
        assert_eq!(calculate_reading_time(""), 1);
        assert_eq!(calculate_reading_time("a few words"), 1);
    }

    #[test]
    fn rounds_up_partial_minutes() {
        let content = "word ".repeat(281);
        assert_eq!(calculate_reading_time(&content), 2);
        let content = "word ".repeat(560);
        assert_eq!(calculate_reading_time(&content), 2);
    }

    #[test]
    fn code_blocks_and_images_do_not_count() {
        let code = format!("```\n{}\n```", "token ".repeat(1000));
        assert_eq!(calculate_reading_time(&code), 1);
        let images = "![alt text here](http://x/y.png) ".repeat(600);
        assert_eq!(calculate_reading_time(&images), 1);
    }

    #[test]
    fn links_keep_their_text() {
        // 300 links of one word each is 300 words, not zero.
        let links = "[word](http://example.com) ".repeat(300);
        assert_eq!(calculate_reading_time(&links), 2);
    }

    #[test]
    fn formats_singular_and_plural() {
        assert_eq!(format_reading_time(1), "1 min read");
        assert_eq!(format_reading_time(7), "7 min read");
    }
}
