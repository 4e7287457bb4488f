// src/dedup.rs
//! Duplicate suppression: exact provider-scoped topic keys plus a fuzzy
//! stemmed word-overlap comparison between headlines.
//!
//! The stemmer is deliberately crude (lowercase, drop short tokens,
//! truncate to 5 chars); the 0.4 threshold was tuned against exactly that
//! token shape. Do not swap in a linguistic stemmer.

use metrics::counter;
use std::collections::HashSet;

use crate::feed::types::Article;

pub struct DuplicateSuppressor {
    threshold: f32,
    stop_words: HashSet<String>,
}

impl DuplicateSuppressor {
    pub fn new(threshold: f32, stop_words: &[String]) -> Self {
        Self {
            threshold,
            stop_words: stop_words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Stemmed token set of a headline: split on whitespace and hyphens,
    /// strip apostrophes, drop tokens of ≤3 chars, truncate survivors to
    /// their first 5 chars, then drop stop-word tokens.
    fn token_set(&self, text: &str) -> HashSet<String> {
        text.to_lowercase()
            .replace(['\'', '\u{2019}', '`'], "")
            .split(|c: char| c.is_whitespace() || c == '-')
            .filter(|w| w.chars().count() > 3)
            .map(|w| w.chars().take(5).collect::<String>())
            .filter(|w| !self.stop_words.contains(w))
            .collect()
    }

    /// Shared-token count over the smaller of the two sets; an empty set on
    /// either side scores 0.0 and is never a dupe.
    pub fn overlap(&self, a: &str, b: &str) -> f32 {
        let set_a = self.token_set(a);
        let set_b = self.token_set(b);
        if set_a.is_empty() || set_b.is_empty() {
            return 0.0;
        }
        let shared = set_a.intersection(&set_b).count();
        shared as f32 / set_a.len().min(set_b.len()) as f32
    }

    /// Drop duplicates from an ordered batch; earlier items win.
    ///
    /// Per item: (1) if the item carries a topic, the key `provider::topic`
    /// is checked against every key seen this run; a repeat is dropped
    /// outright. The key is recorded on first sight even if the fuzzy check
    /// below then drops the item. (2) Regardless of (1), the headline is
    /// compared against every already-accepted item of the same provider;
    /// overlap at or above the threshold is a drop.
    pub fn dedupe(&self, items: Vec<Article>) -> Vec<Article> {
        let mut seen_topics: HashSet<String> = HashSet::new();
        let mut unique: Vec<Article> = Vec::with_capacity(items.len());

        for item in items {
            if let Some(topic) = &item.topic {
                let key = format!("{}::{}", item.provider, topic);
                if !seen_topics.insert(key) {
                    counter!("feed_dedup_topic_total").increment(1);
                    continue;
                }
            }

            let is_dupe = unique.iter().any(|u| {
                u.provider == item.provider
                    && self.overlap(&item.headline, &u.headline) >= self.threshold
            });
            if is_dupe {
                counter!("feed_dedup_overlap_total").increment(1);
                continue;
            }

            unique.push(item);
        }
        unique
    }
}
