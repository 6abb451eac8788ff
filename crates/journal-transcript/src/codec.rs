// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derived entry fields: URL slugs and preview excerpts.

use std::sync::LazyLock;

use journal_core::Role;
use regex::Regex;

use crate::parser::Conversation;

/// Characters of preview text kept before the ellipsis.
pub const DEFAULT_EXCERPT_LENGTH: usize = 150;

/// Appended to every excerpt.
pub const ELLIPSIS: &str = "...";

static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#{1,6}\s*").expect("static heading pattern"));

/// Derive a URL-safe slug from a title.
///
/// Lowercases, keeps only `[a-z0-9]`, turns whitespace and hyphen runs into a
/// single `-`, and trims hyphens from both ends. Total: any input yields a
/// (possibly empty) slug.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        if c == '-' || c.is_whitespace() {
            if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Derive a preview with the default length.
pub fn generate_excerpt(content: &str) -> String {
    generate_excerpt_with_limit(content, DEFAULT_EXCERPT_LENGTH)
}

/// Derive a preview of at most `limit` characters plus [`ELLIPSIS`].
///
/// Prefers the text of the first user turn; otherwise uses the whole content
/// with heading markers removed.
pub fn generate_excerpt_with_limit(content: &str, limit: usize) -> String {
    let mut excerpt: String = match Conversation::new(content).first(Role::User) {
        Some(turn) => turn.text.chars().take(limit).collect(),
        None => HEADING_MARKER
            .replace_all(content, "")
            .chars()
            .take(limit)
            .collect(),
    };
    excerpt.push_str(ELLIPSIS);
    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_examples() {
        assert_eq!(generate_slug("Hello, World! 2024"), "hello-world-2024");
        assert_eq!(generate_slug(""), "");
        assert_eq!(generate_slug("---"), "");
        assert_eq!(generate_slug("  Rust -- Ownership\tExplained  "), "rust-ownership-explained");
        assert_eq!(generate_slug("Café Ünïcode"), "caf-ncode");
        assert_eq!(generate_slug("!!!"), "");
    }

    #[test]
    fn slug_is_stable_under_reapplication() {
        let once = generate_slug("A  Title -- With   Gaps");
        assert_eq!(generate_slug(&once), once);
    }

    #[test]
    fn excerpt_prefers_first_user_turn() {
        let content = "### 🤖 Assistant\n\nhello\n\n---\n\n### 🧑\u{200d}💻 User\n\nWhat is a borrow?\n\n---\n\n### 🤖 Assistant\n\nA reference.";
        assert_eq!(generate_excerpt(content), "What is a borrow?...");
    }

    #[test]
    fn excerpt_falls_back_to_stripped_content() {
        let content = "# Notes\n\n## Part one\nbody";
        assert_eq!(generate_excerpt(content), "Notes\n\nPart one\nbody...");
    }

    #[test]
    fn excerpt_is_bounded_and_total() {
        assert_eq!(generate_excerpt(""), "...");
        let long = format!("### User\n\n{}", "é".repeat(500));
        let excerpt = generate_excerpt(&long);
        assert_eq!(excerpt.chars().count(), DEFAULT_EXCERPT_LENGTH + ELLIPSIS.len());
        assert!(excerpt.chars().count() <= 154);
    }

    #[test]
    fn excerpt_respects_custom_limit() {
        assert_eq!(generate_excerpt_with_limit("### User\n\nabcdef", 3), "abc...");
    }
}
