// src/pipeline.rs
//! Pipeline orchestrator: normalize → detect provider → classify →
//! dedup → cap → freshness → rank. One pure, synchronous pass per batch;
//! all state is local to the call, so independent batches may run
//! concurrently without locking.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use metrics::{counter, gauge};
use std::cmp::Reverse;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::SystemTime;
use tracing::{debug, info, warn};

use crate::classify::FeatureClassifier;
use crate::dedup::DuplicateSuppressor;
use crate::feed::types::{Article, CandidateItem, FeedItem};
use crate::normalize::{clean_summary, strip_markup, strip_outlet_suffix};
use crate::provider::ProviderDetector;
use crate::rules::RulesRoot;
use crate::topic::TopicExtractor;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub max_items: usize,
    pub fresh_window_days: i64,
    pub min_summary_len: usize,
}

/// Compiled pipeline: rule tables turned into matchers and regexes once,
/// at construction. Configuration errors surface here, never per item.
pub struct Pipeline {
    detector: ProviderDetector,
    classifier: FeatureClassifier,
    topics: TopicExtractor,
    suppressor: DuplicateSuppressor,
    opts: PipelineOptions,
}

impl Pipeline {
    pub fn from_rules(rules: &RulesRoot) -> anyhow::Result<Self> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&rules.dedup.threshold),
            "dedup threshold {} outside 0.0..=1.0",
            rules.dedup.threshold
        );
        Ok(Self {
            detector: ProviderDetector::new(&rules.providers),
            classifier: FeatureClassifier::new(&rules.classify.accept, &rules.classify.reject)?,
            topics: TopicExtractor::new(&rules.topics)?,
            suppressor: DuplicateSuppressor::new(rules.dedup.threshold, &rules.dedup.stop_words),
            opts: PipelineOptions {
                max_items: rules.feed.max_items,
                fresh_window_days: rules.feed.fresh_window_days,
                min_summary_len: rules.feed.min_summary_len,
            },
        })
    }

    /// Pipeline over the rule tables shipped in the binary.
    pub fn with_builtin_rules() -> Self {
        Self::from_rules(&RulesRoot::builtin()).expect("built-in rules compile")
    }

    /// Run the full pipeline over one ordered batch.
    ///
    /// Items with no recognizable provider or failing the feature gate are
    /// dropped silently; a malformed publish date keeps the item but sorts
    /// it oldest and never marks it fresh. The call always returns a valid
    /// (possibly empty) sequence.
    pub fn run(&self, raw: Vec<CandidateItem>, now: DateTime<Utc>) -> Vec<FeedItem> {
        crate::metrics::ensure_described();

        let mut articles: Vec<Article> = Vec::with_capacity(raw.len());
        for item in raw {
            counter!("feed_items_total").increment(1);

            let title = strip_markup(&item.title);
            let Some(provider) = self.detector.detect(&title) else {
                counter!("feed_no_provider_total").increment(1);
                dev_log_drop("no_provider", &title);
                continue;
            };

            let body = strip_markup(&item.description);
            if !self.classifier.is_feature(&title, &body) {
                counter!("feed_rejected_total").increment(1);
                dev_log_drop("rejected", &title);
                continue;
            }

            let headline = strip_outlet_suffix(&title);
            let summary = clean_summary(&body, &item.source, self.opts.min_summary_len);
            // Topic from the headline, falling back to the summary text.
            let topic = self
                .topics
                .extract(&headline)
                .or_else(|| self.topics.extract(&summary));

            articles.push(Article {
                provider,
                headline,
                summary,
                topic,
                published: parse_published(&item.published_at),
                raw_date: item.published_at,
                link: item.link,
                source: item.source,
            });
        }

        let mut unique = self.suppressor.dedupe(articles);
        unique.truncate(self.opts.max_items);

        // Stable sort, newest first; unparsable dates sink to the bottom.
        unique.sort_by_key(|a| Reverse(sort_key(a.published)));

        let run_millis = now.timestamp_millis();
        let window = Duration::days(self.opts.fresh_window_days);
        let out: Vec<FeedItem> = unique
            .into_iter()
            .enumerate()
            .map(|(i, a)| {
                // Strictly inside the window counts as new; the exact
                // boundary does not.
                let is_new = a
                    .published
                    .map(|d| now.signed_duration_since(d) < window)
                    .unwrap_or(false);
                let date = match a.published {
                    Some(d) => d.format("%Y-%m-%d").to_string(),
                    None if a.raw_date.trim().is_empty() => now.format("%Y-%m-%d").to_string(),
                    None => a.raw_date.clone(),
                };
                FeedItem {
                    id: format!("live-{}-{}-{}", a.provider, i, run_millis),
                    provider: a.provider,
                    headline: a.headline,
                    summary: a.summary,
                    date,
                    is_new,
                    link: a.link,
                    source: a.source,
                    is_live: true,
                }
            })
            .collect();

        counter!("feed_kept_total").increment(out.len() as u64);
        gauge!("feed_last_run_ts").set(now.timestamp() as f64);
        info!(kept = out.len(), "feed pipeline run complete");
        out
    }
}

fn sort_key(published: Option<DateTime<Utc>>) -> i64 {
    published.map(|d| d.timestamp_millis()).unwrap_or(i64::MIN)
}

/// Parse an opaque date string: RFC 2822 (feed pubDate), RFC 3339, or a bare
/// `YYYY-MM-DD`. Anything else is `None`: kept, but oldest and never fresh.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|ndt| Utc.from_utc_datetime(&ndt));
    }
    None
}

/// Caller-side merge of live pipeline output with curated fallback entries.
/// A row duplicating an earlier one (same provider, same lowercased 50-char
/// headline prefix) is dropped; the result is re-sorted newest first.
pub fn merge_with_curated(live: Vec<FeedItem>, curated: Vec<FeedItem>) -> Vec<FeedItem> {
    let mut merged: Vec<FeedItem> = Vec::with_capacity(live.len() + curated.len());
    for item in live.into_iter().chain(curated) {
        let prefix = headline_prefix(&item.headline);
        let dupe = merged
            .iter()
            .any(|e| e.provider == item.provider && headline_prefix(&e.headline) == prefix);
        if !dupe {
            merged.push(item);
        }
    }
    merged.sort_by_key(|it| Reverse(sort_key(parse_published(&it.date))));
    merged
}

fn headline_prefix(h: &str) -> String {
    h.to_lowercase().chars().take(50).collect()
}

/* ----------------------------
Anonymized dev logging
---------------------------- */

// Dev logging gate: FEED_DEV_LOG=1 AND dev env (debug build or APP_ENV in
// {local, development, dev}).
fn dev_logging_enabled() -> bool {
    let on = std::env::var("FEED_DEV_LOG").ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("APP_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

fn dev_log_drop(stage: &str, title: &str) {
    if !dev_logging_enabled() {
        return;
    }
    // Never log raw headlines; only the hashed id and the drop stage.
    debug!(target: "feed", id = %anon_hash(title), stage, "item dropped");
}

/* ----------------------------
Thread-safe handle + hot reload
---------------------------- */

/// A threadsafe handle that can hot-reload the underlying pipeline in
/// dev/local. Enable by setting FEED_RULES_HOT_RELOAD=1.
#[derive(Clone)]
pub struct PipelineHandle {
    inner: Arc<RwLock<Pipeline>>,
}

impl PipelineHandle {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            inner: Arc::new(RwLock::new(pipeline)),
        }
    }

    pub fn run(&self, raw: Vec<CandidateItem>, now: DateTime<Utc>) -> Vec<FeedItem> {
        if let Ok(p) = self.inner.read() {
            p.run(raw, now)
        } else {
            Vec::new()
        }
    }

    pub fn swap(&self, pipeline: Pipeline) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = pipeline;
        }
    }
}

/// Returns true if we should enable hot reload (dev/local only).
fn hot_reload_enabled() -> bool {
    let want = std::env::var("FEED_RULES_HOT_RELOAD")
        .ok()
        .map(|v| v == "1")
        .unwrap_or(false);
    if !want {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("APP_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// Start a simple polling watcher on `path` that recompiles the rules and
/// swaps the pipeline when the file changes. Polls mtime every 2s. A reload
/// that fails to parse or compile keeps the previous pipeline running.
pub fn start_hot_reload_thread(handle: PipelineHandle, path: PathBuf) {
    if !hot_reload_enabled() {
        return;
    }

    thread::spawn(move || {
        let poll = std::time::Duration::from_secs(2);
        let mut last_mtime: Option<SystemTime> = None;

        loop {
            match fs::metadata(&path).and_then(|m| m.modified()) {
                Ok(mtime) => {
                    let changed = match last_mtime {
                        None => {
                            last_mtime = Some(mtime);
                            false
                        }
                        Some(prev) => mtime > prev,
                    };
                    if changed {
                        let reloaded = fs::read_to_string(&path)
                            .map_err(anyhow::Error::from)
                            .and_then(|s| RulesRoot::from_toml_str(&s))
                            .and_then(|r| Pipeline::from_rules(&r));
                        match reloaded {
                            Ok(p) => {
                                handle.swap(p);
                                info!(path = %path.display(), "feed rules reloaded");
                            }
                            Err(e) => {
                                warn!(error = ?e, "feed rules reload failed; keeping previous rules");
                            }
                        }
                        last_mtime = Some(mtime);
                    }
                }
                Err(_) => {
                    // File missing or unreadable; keep trying.
                }
            }
            thread::sleep(poll);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_date_shapes() {
        assert!(parse_published("Tue, 03 Feb 2026 10:15:00 GMT").is_some());
        assert!(parse_published("2026-02-03T10:15:00Z").is_some());
        assert!(parse_published("2026-02-03").is_some());
        assert!(parse_published("yesterday-ish").is_none());
        assert!(parse_published("").is_none());
    }

    #[test]
    fn anon_hash_is_short_and_stable() {
        let a = anon_hash("Gemini 3 Flash rolls out");
        let b = anon_hash("Gemini 3 Flash rolls out");
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
    }

    #[test]
    fn builtin_rules_compile_into_a_pipeline() {
        let _ = Pipeline::with_builtin_rules();
    }

    #[test]
    fn bad_dedup_threshold_is_a_config_error() {
        let mut rules = RulesRoot::builtin();
        rules.dedup.threshold = 1.5;
        assert!(Pipeline::from_rules(&rules).is_err());
    }
}
