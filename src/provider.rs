// src/provider.rs
//! Provider detection: ordered keyword matching over article titles.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rules::ProviderRule;

/// The closed set of vendors the feed tracks. Extending it means adding a
/// variant here and a matcher entry in the rules table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Openai,
    Anthropic,
    Gemini,
    Google,
    Deepseek,
    Kimi,
    Meta,
    Xai,
    Mistral,
    Microsoft,
    Perplexity,
    Figma,
    Adobe,
    Midjourney,
    Uxpilot,
}

impl ProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::Openai => "openai",
            ProviderId::Anthropic => "anthropic",
            ProviderId::Gemini => "gemini",
            ProviderId::Google => "google",
            ProviderId::Deepseek => "deepseek",
            ProviderId::Kimi => "kimi",
            ProviderId::Meta => "meta",
            ProviderId::Xai => "xai",
            ProviderId::Mistral => "mistral",
            ProviderId::Microsoft => "microsoft",
            ProviderId::Perplexity => "perplexity",
            ProviderId::Figma => "figma",
            ProviderId::Adobe => "adobe",
            ProviderId::Midjourney => "midjourney",
            ProviderId::Uxpilot => "uxpilot",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct CompiledMatcher {
    id: ProviderId,
    keywords: Vec<String>, // lowercased
}

/// Ordered matcher table; the table is a Vec on purpose, since declaration
/// order is the tie-break when a title mentions several providers.
pub struct ProviderDetector {
    matchers: Vec<CompiledMatcher>,
}

impl ProviderDetector {
    pub fn new(rules: &[ProviderRule]) -> Self {
        let matchers = rules
            .iter()
            .map(|r| CompiledMatcher {
                id: r.id,
                keywords: r.keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        Self { matchers }
    }

    /// First provider whose keyword list has a substring hit against the
    /// lowercased title; `None` means the item carries no known vendor and
    /// must be dropped by the caller.
    pub fn detect(&self, title: &str) -> Option<ProviderId> {
        let t = title.to_lowercase();
        for m in &self.matchers {
            if m.keywords.iter().any(|kw| t.contains(kw.as_str())) {
                return Some(m.id);
            }
        }
        None
    }
}
