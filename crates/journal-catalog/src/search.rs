// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure in-memory filtering over a collection.

use std::collections::BTreeSet;

use journal_core::{Entry, ModelTag};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How a multi-tag filter combines.
///
/// The public listing matches on any requested tag, the admin listing on all
/// of them. There is no default: every caller picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TagMatch {
    Any,
    All,
}

/// Search input. Filters apply in field order: visibility, query, model, tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default)]
    pub query: String,
    #[serde(default, alias = "llm")]
    pub model_tag: Option<ModelTag>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub tag_match: TagMatch,
    #[serde(default)]
    pub include_unlisted: bool,
}

impl SearchFilters {
    /// No query, no facets, unlisted entries hidden.
    pub fn new(tag_match: TagMatch) -> Self {
        Self {
            query: String::new(),
            model_tag: None,
            tags: Vec::new(),
            tag_match,
            include_unlisted: false,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_model(mut self, model_tag: ModelTag) -> Self {
        self.model_tag = Some(model_tag);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_unlisted(mut self, include_unlisted: bool) -> Self {
        self.include_unlisted = include_unlisted;
        self
    }
}

fn visible(entry: &Entry, include_unlisted: bool) -> bool {
    if include_unlisted {
        entry.is_published
    } else {
        entry.is_publicly_listed()
    }
}

/// Case-insensitive containment against title, content, excerpt and tags
/// joined by spaces. `needle` is already lowercased.
fn matches_query(entry: &Entry, needle: &str) -> bool {
    let mut haystack = String::with_capacity(
        entry.title.len() + entry.content.len() + entry.excerpt.len() + 16,
    );
    haystack.push_str(&entry.title);
    haystack.push(' ');
    haystack.push_str(&entry.content);
    haystack.push(' ');
    haystack.push_str(&entry.excerpt);
    for tag in &entry.tags {
        haystack.push(' ');
        haystack.push_str(tag);
    }
    haystack.to_lowercase().contains(needle)
}

fn matches_tags(entry: &Entry, tags: &[String], tag_match: TagMatch) -> bool {
    match tag_match {
        TagMatch::Any => tags.iter().any(|t| entry.has_tag(t)),
        TagMatch::All => tags.iter().all(|t| entry.has_tag(t)),
    }
}

/// Filter `entries`, preserving collection order. Unpublished entries are
/// never returned.
pub fn search<'a>(entries: &'a [Entry], filters: &SearchFilters) -> Vec<&'a Entry> {
    // A whitespace-only query means "no query"; otherwise the raw text is matched.
    let needle = (!filters.query.trim().is_empty()).then(|| filters.query.to_lowercase());

    entries
        .iter()
        .filter(|e| visible(e, filters.include_unlisted))
        .filter(|e| needle.as_deref().is_none_or(|n| matches_query(e, n)))
        .filter(|e| filters.model_tag.as_ref().is_none_or(|m| &e.model_tag == m))
        .filter(|e| filters.tags.is_empty() || matches_tags(e, &filters.tags, filters.tag_match))
        .collect()
}

/// Every tag used anywhere in the collection, sorted and deduplicated.
pub fn get_all_tags(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|e| e.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Listed published entries by descending view count, ties in collection order.
pub fn popular(entries: &[Entry], limit: usize) -> Vec<&Entry> {
    let mut listed: Vec<&Entry> = entries.iter().filter(|e| e.is_publicly_listed()).collect();
    listed.sort_by(|a, b| b.views.cmp(&a.views));
    listed.truncate(limit);
    listed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::tests::entry;

    fn ids<'a>(entries: &[&'a Entry]) -> Vec<&'a str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    fn fixture() -> Vec<Entry> {
        let mut a = entry("a", "rust-borrowing");
        a.title = "Rust borrowing".into();
        a.tags = vec!["rust".into(), "memory".into()];
        a.model_tag = ModelTag::Claude4Sonnet;
        a.views = 5;

        let mut b = entry("b", "python-async");
        b.title = "Python async".into();
        b.tags = vec!["python".into()];
        b.model_tag = ModelTag::Gpt4o;
        b.views = 40;

        let mut c = entry("c", "hidden");
        c.is_unlisted = true;
        c.tags = vec!["rust".into()];
        c.views = 100;

        let mut d = entry("d", "draft");
        d.is_published = false;
        d.tags = vec!["rust".into(), "memory".into()];

        let mut e = entry("e", "rust-memory");
        e.tags = vec!["memory".into(), "rust".into()];
        e.excerpt = "Lifetimes explained".into();
        e.views = 5;

        vec![a, b, c, d, e]
    }

    #[test]
    fn empty_filters_return_listed_published_in_order() {
        let entries = fixture();
        let found = search(&entries, &SearchFilters::new(TagMatch::Any));
        assert_eq!(ids(&found), ["a", "b", "e"]);
    }

    #[test]
    fn unlisted_flag_never_surfaces_unpublished() {
        let entries = fixture();
        let found = search(&entries, &SearchFilters::new(TagMatch::Any).with_unlisted(true));
        assert_eq!(ids(&found), ["a", "b", "c", "e"]);
    }

    #[test]
    fn query_is_case_insensitive_across_fields() {
        let entries = fixture();
        let by_title = search(&entries, &SearchFilters::new(TagMatch::Any).with_query("PYTHON"));
        assert_eq!(ids(&by_title), ["b"]);
        let by_excerpt =
            search(&entries, &SearchFilters::new(TagMatch::Any).with_query("lifetimes"));
        assert_eq!(ids(&by_excerpt), ["e"]);
        let by_tag = search(&entries, &SearchFilters::new(TagMatch::Any).with_query("memo"));
        assert_eq!(ids(&by_tag), ["a", "e"]);
        let blank = search(&entries, &SearchFilters::new(TagMatch::Any).with_query("   "));
        assert_eq!(blank.len(), 3);
    }

    #[test]
    fn model_filter_is_exact() {
        let entries = fixture();
        let found = search(
            &entries,
            &SearchFilters::new(TagMatch::Any).with_model(ModelTag::Gpt4o),
        );
        assert_eq!(ids(&found), ["b"]);
    }

    #[test]
    fn tag_match_any_versus_all() {
        let entries = fixture();
        let any = SearchFilters::new(TagMatch::Any)
            .with_tag("python")
            .with_tag("memory");
        assert_eq!(ids(&search(&entries, &any)), ["a", "b", "e"]);

        let all = SearchFilters::new(TagMatch::All)
            .with_tag("rust")
            .with_tag("memory");
        assert_eq!(ids(&search(&entries, &all)), ["a", "e"]);
    }

    #[test]
    fn tags_are_sorted_and_unique() {
        assert_eq!(get_all_tags(&fixture()), ["memory", "python", "rust"]);
        assert!(get_all_tags(&[]).is_empty());
    }

    #[test]
    fn popular_orders_by_views_with_stable_ties() {
        let entries = fixture();
        assert_eq!(ids(&popular(&entries, 10)), ["b", "a", "e"]);
        assert_eq!(ids(&popular(&entries, 1)), ["b"]);
    }

    #[test]
    fn filters_deserialize_from_camel_case() {
        let filters: SearchFilters = serde_json::from_str(
            r#"{"query":"x","llm":"gpt-4o","tags":["a"],"tagMatch":"all","includeUnlisted":true}"#,
        )
        .unwrap();
        assert_eq!(filters.model_tag, Some(ModelTag::Gpt4o));
        assert_eq!(filters.tag_match, TagMatch::All);
        assert!(filters.include_unlisted);
    }
}
