// src/topic.rs
//! Product-topic extraction: ordered capture patterns over a headline,
//! first match wins. The capture is only ever used as a dedup key.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::rules::TopicRule;

static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

pub struct TopicExtractor {
    patterns: Vec<Regex>,
}

impl TopicExtractor {
    /// Compile the ordered pattern list. A pattern that fails to compile or
    /// carries no capture group is a configuration error, raised here and
    /// never at per-item time.
    pub fn new(rules: &[TopicRule]) -> Result<Self> {
        let patterns = rules
            .iter()
            .map(|r| {
                let re = RegexBuilder::new(&r.pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| anyhow::anyhow!("topic `{}` regex error: {}", r.id, e))?;
                if re.captures_len() < 2 {
                    return Err(anyhow::anyhow!(
                        "topic `{}` pattern has no capture group",
                        r.id
                    ));
                }
                Ok(re)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// First capture of the first matching pattern, whitespace-collapsed and
    /// trimmed; `None` when no pattern recognizes a product in the text.
    pub fn extract(&self, text: &str) -> Option<String> {
        let t = text.to_lowercase();
        for re in &self.patterns {
            if let Some(caps) = re.captures(&t) {
                if let Some(m) = caps.get(1) {
                    return Some(RE_WS.replace_all(m.as_str().trim(), " ").to_string());
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> TopicExtractor {
        TopicExtractor::new(&[
            TopicRule {
                id: "gemini_versioned".into(),
                pattern: r"\b(gemini\s+[\d.]+\s*(?:pro|flash|ultra|deep\s*think)?)".into(),
            },
            TopicRule {
                id: "gpt_versioned".into(),
                pattern: r"\b(gpt[-\s]?[\d.]+\w*)".into(),
            },
            TopicRule {
                id: "gemini_generic".into(),
                pattern: r"\b(gemini\s+\w+)".into(),
            },
        ])
        .expect("compile test topics")
    }

    #[test]
    fn first_matching_pattern_wins() {
        let e = extractor();
        // The versioned pattern is declared first and must take precedence
        // over the generic fallback.
        assert_eq!(
            e.extract("Google ships Gemini 3 Pro to everyone"),
            Some("gemini 3 pro".to_string())
        );
        assert_eq!(
            e.extract("Gemini Advanced picks up voice input"),
            Some("gemini advanced".to_string())
        );
    }

    #[test]
    fn capture_is_whitespace_collapsed() {
        let e = extractor();
        assert_eq!(
            e.extract("gemini  3   flash lands"),
            Some("gemini 3 flash".to_string())
        );
    }

    #[test]
    fn no_match_yields_none() {
        let e = extractor();
        assert_eq!(e.extract("Claude Opus levels up"), None);
    }

    #[test]
    fn pattern_without_capture_group_is_a_config_error() {
        let err = TopicExtractor::new(&[TopicRule {
            id: "bad".into(),
            pattern: r"\bgemini\s+\w+".into(),
        }])
        .expect_err("missing capture group must fail at load");
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn malformed_pattern_is_a_config_error() {
        assert!(TopicExtractor::new(&[TopicRule {
            id: "broken".into(),
            pattern: r"\b(gemini".into(),
        }])
        .is_err());
    }
}
