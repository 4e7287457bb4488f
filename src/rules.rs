// src/rules.rs
//! Static rule tables: provider matchers, accept/reject keyword lists, topic
//! capture patterns, and dedup tuning. Loaded from TOML; a built-in copy
//! ships in the binary so the service runs with no config on disk.
//!
//! Tables deserialize into plain data here; pattern compilation (and thus
//! configuration-error reporting) happens when a `Pipeline` is built.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::provider::ProviderId;

pub const DEFAULT_RULES_CONFIG_PATH: &str = "config/rules.toml";
pub const ENV_RULES_CONFIG_PATH: &str = "FEED_RULES_PATH";

/// The default rule tables compiled into the binary.
pub const BUILTIN_RULES_TOML: &str = include_str!("../config/rules.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct RulesRoot {
    #[serde(default)]
    pub feed: FeedSection,
    pub providers: Vec<ProviderRule>,
    pub classify: ClassifySection,
    #[serde(default)]
    pub topics: Vec<TopicRule>,
    pub dedup: DedupSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedSection {
    /// Output cap per run.
    pub max_items: usize,
    /// Items younger than this many days are flagged as new.
    pub fresh_window_days: i64,
    /// Summaries shorter than this fall back to a "Read more" pointer.
    pub min_summary_len: usize,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            max_items: 20,
            fresh_window_days: 3,
            min_summary_len: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderRule {
    pub id: ProviderId,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifySection {
    pub accept: Vec<String>,
    pub reject: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicRule {
    pub id: String,
    /// Regex with exactly one capture group.
    pub pattern: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DedupSection {
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default)]
    pub stop_words: Vec<String>,
}

fn default_threshold() -> f32 {
    0.4
}

impl RulesRoot {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let root: RulesRoot = toml::from_str(s)?;
        Ok(root)
    }

    /// Rule tables compiled into the binary.
    pub fn builtin() -> Self {
        toml::from_str(BUILTIN_RULES_TOML).expect("built-in rules parse")
    }

    /// Resolve and load rules:
    /// 1) $FEED_RULES_PATH (must exist),
    /// 2) config/rules.toml if present,
    /// 3) the built-in copy.
    pub fn load() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_RULES_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_RULES_CONFIG_PATH} points to non-existent path"));
            }
            let content = fs::read_to_string(&pb)
                .with_context(|| format!("reading rules from {}", pb.display()))?;
            return Self::from_toml_str(&content);
        }
        let default = PathBuf::from(DEFAULT_RULES_CONFIG_PATH);
        if default.exists() {
            let content = fs::read_to_string(&default)
                .with_context(|| format!("reading rules from {}", default.display()))?;
            return Self::from_toml_str(&content);
        }
        Ok(Self::builtin())
    }
}

/// Path the hot-reload watcher polls: env override or the default location.
pub fn rules_config_path() -> PathBuf {
    std::env::var(ENV_RULES_CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_RULES_CONFIG_PATH))
}
