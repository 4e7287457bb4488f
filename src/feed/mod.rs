// src/feed/mod.rs
pub mod types;

use metrics::counter;

use crate::feed::types::{CandidateItem, ItemSource};

/// Fetch every source once and concatenate the results in caller order.
///
/// Concatenation order decides which of two duplicates the pipeline later
/// keeps (earlier wins); that ordering is the caller's choice, not the
/// pipeline's. A failing source is logged and skipped; it never aborts the
/// run.
pub async fn run_once(sources: &[Box<dyn ItemSource>]) -> Vec<CandidateItem> {
    crate::metrics::ensure_described();

    let mut raw = Vec::new();
    for s in sources {
        match s.fetch_latest().await {
            Ok(mut v) => raw.append(&mut v),
            Err(e) => {
                tracing::warn!(error = ?e, source = s.name(), "source error");
                counter!("feed_source_errors_total").increment(1);
            }
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::types::StaticSource;
    use anyhow::anyhow;

    struct FailingSource;

    #[async_trait::async_trait]
    impl ItemSource for FailingSource {
        async fn fetch_latest(&self) -> anyhow::Result<Vec<CandidateItem>> {
            Err(anyhow!("upstream unavailable"))
        }
        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn item(title: &str) -> CandidateItem {
        CandidateItem {
            title: title.to_string(),
            description: String::new(),
            published_at: String::new(),
            source: "Test".to_string(),
            link: "https://example.test/a".to_string(),
        }
    }

    #[tokio::test]
    async fn failing_source_is_skipped_not_fatal() {
        let sources: Vec<Box<dyn ItemSource>> = vec![
            Box::new(StaticSource::new(vec![item("one")])),
            Box::new(FailingSource),
            Box::new(StaticSource::new(vec![item("two")])),
        ];
        let raw = run_once(&sources).await;
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].title, "one");
        assert_eq!(raw[1].title, "two");
    }
}
