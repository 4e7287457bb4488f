// src/feed/types.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::Path;

use crate::provider::ProviderId;

/// One discovered article, as handed over by a fetch collaborator. The date
/// is an opaque string; the pipeline parses what it can.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CandidateItem {
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub source: String,
    pub link: String,
}

/// Classified intermediate: provider resolved, text cleaned, date parsed.
/// Items dropped by detection or classification never reach this type.
#[derive(Debug, Clone)]
pub struct Article {
    pub provider: ProviderId,
    pub headline: String,
    pub summary: String,
    /// Product key extracted from the headline (or, failing that, the
    /// summary); used only for dedup, never shown to the user.
    pub topic: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub raw_date: String,
    pub link: String,
    pub source: String,
}

/// Final feed entry, serialized in the shape the UI consumes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: String,
    pub provider: ProviderId,
    pub headline: String,
    pub summary: String,
    pub date: String,
    pub is_new: bool,
    pub link: String,
    pub source: String,
    /// True for pipeline-produced entries, false for curated fallback rows
    /// a caller may merge in.
    pub is_live: bool,
}

#[async_trait::async_trait]
pub trait ItemSource: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<CandidateItem>>;
    fn name(&self) -> &'static str;
}

/// In-memory source: serves a fixed batch, either built in code (tests) or
/// loaded from a JSON file of pre-fetched items.
pub struct StaticSource {
    items: Vec<CandidateItem>,
}

impl StaticSource {
    pub fn new(items: Vec<CandidateItem>) -> Self {
        Self { items }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading items from {}", path.display()))?;
        let items: Vec<CandidateItem> = serde_json::from_str(&content)
            .with_context(|| format!("parsing items JSON at {}", path.display()))?;
        Ok(Self { items })
    }
}

#[async_trait::async_trait]
impl ItemSource for StaticSource {
    async fn fetch_latest(&self) -> Result<Vec<CandidateItem>> {
        Ok(self.items.clone())
    }
    fn name(&self) -> &'static str {
        "static"
    }
}
