// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the journal crates.
//!
//! [`Entry`] is the persisted catalog record. Its JSON shape is camelCase and
//! tolerant of older collections: missing flags and counters default, and the
//! legacy `llm` field is accepted as `modelTag`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Store,
    Auth,
}

/// Which model produced a conversation.
///
/// The known set mirrors the badges the journal renders. Anything else read
/// from storage is preserved verbatim as [`ModelTag::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModelTag {
    Gpt4o,
    Gpt41,
    GptO3,
    GptO4Mini,
    Gemini25Flash,
    Gemini25Pro,
    Qwen3,
    Grok4,
    DeepseekR1,
    Claude4Sonnet,
    PerplexitySonarPro,
    PerplexitySonarReasoning,
    K2,
    #[default]
    Custom,
    Other(String),
}

impl ModelTag {
    /// Every known tag, in badge order.
    pub const KNOWN: [ModelTag; 14] = [
        ModelTag::Gpt4o,
        ModelTag::Gpt41,
        ModelTag::GptO3,
        ModelTag::GptO4Mini,
        ModelTag::Gemini25Flash,
        ModelTag::Gemini25Pro,
        ModelTag::Qwen3,
        ModelTag::Grok4,
        ModelTag::DeepseekR1,
        ModelTag::Claude4Sonnet,
        ModelTag::PerplexitySonarPro,
        ModelTag::PerplexitySonarReasoning,
        ModelTag::K2,
        ModelTag::Custom,
    ];

    /// Stable identifier used in JSON and on the command line.
    pub fn as_str(&self) -> &str {
        match self {
            ModelTag::Gpt4o => "gpt-4o",
            ModelTag::Gpt41 => "gpt-4.1",
            ModelTag::GptO3 => "gpt-o3",
            ModelTag::GptO4Mini => "gpt-o4-mini",
            ModelTag::Gemini25Flash => "gemini-2.5-flash",
            ModelTag::Gemini25Pro => "gemini-2.5-pro",
            ModelTag::Qwen3 => "qwen-3",
            ModelTag::Grok4 => "grok-4",
            ModelTag::DeepseekR1 => "deepseek-r1",
            ModelTag::Claude4Sonnet => "claude-4-sonnet",
            ModelTag::PerplexitySonarPro => "perplexity-sonar-pro",
            ModelTag::PerplexitySonarReasoning => "perplexity-sonar-reasoning",
            ModelTag::K2 => "k2",
            ModelTag::Custom => "custom",
            ModelTag::Other(name) => name,
        }
    }

    /// Parse an identifier. Never fails: unknown names become [`ModelTag::Other`].
    pub fn from_str_value(s: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|tag| tag.as_str() == s)
            .cloned()
            .unwrap_or_else(|| ModelTag::Other(s.to_string()))
    }

    /// Short badge label.
    pub fn display_name(&self) -> &str {
        match self {
            ModelTag::Gpt4o => "4o",
            ModelTag::Gpt41 => "4.1",
            ModelTag::GptO3 => "o3",
            ModelTag::GptO4Mini => "o4-mini",
            ModelTag::Gemini25Flash => "2.5-flash",
            ModelTag::Gemini25Pro => "2.5-pro",
            ModelTag::DeepseekR1 => "r1",
            ModelTag::Claude4Sonnet => "4-sonnet",
            ModelTag::PerplexitySonarPro => "sonar-pro",
            ModelTag::PerplexitySonarReasoning => "sonar-reasoning",
            other => other.as_str(),
        }
    }
}

impl std::fmt::Display for ModelTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ModelTag {
    fn from(s: String) -> Self {
        ModelTag::from_str_value(&s)
    }
}

impl From<ModelTag> for String {
    fn from(tag: ModelTag) -> Self {
        match tag {
            ModelTag::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Whether an entry's content is turn-structured or a single document.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PageType {
    #[default]
    Conversation,
    Markdown,
}

/// One published or draft transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    #[serde(default)]
    pub slug: String,
    pub title: String,
    pub content: String,
    #[serde(default, alias = "llm")]
    pub model_tag: ModelTag,
    #[serde(default)]
    pub page_type: PageType,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub is_unlisted: bool,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default = "default_reading_time")]
    pub reading_time: u32,
}

fn default_reading_time() -> u32 {
    1
}

impl Entry {
    /// Visible through default listings and search.
    pub fn is_publicly_listed(&self) -> bool {
        self.is_published && !self.is_unlisted
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Client-supplied fields for a new entry.
///
/// Identity, timestamps and derived fields are assigned by the repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    pub title: String,
    pub content: String,
    #[serde(default, alias = "llm")]
    pub model_tag: ModelTag,
    #[serde(default)]
    pub page_type: PageType,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub is_unlisted: bool,
    #[serde(default)]
    pub is_draft: bool,
}

/// A partial update. `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, alias = "llm")]
    pub model_tag: Option<ModelTag>,
    #[serde(default)]
    pub page_type: Option<PageType>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub is_published: Option<bool>,
    #[serde(default)]
    pub is_unlisted: Option<bool>,
    #[serde(default)]
    pub is_draft: Option<bool>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.model_tag.is_none()
            && self.page_type.is_none()
            && self.tags.is_none()
            && self.is_published.is_none()
            && self.is_unlisted.is_none()
            && self.is_draft.is_none()
    }
}

/// Speaker of one transcript turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One speaker-tagged segment of a transcript. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A stored value together with the version it was written at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub value: T,
    pub version: u64,
}
