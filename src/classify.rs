// src/classify.rs
//! Feature-vs-noise gate: reject phrases are evaluated first and win ties,
//! then at least one accept phrase must be present.

use anyhow::Result;
use regex::RegexBuilder;

/// Compiled accept/reject keyword policy. Both lists come from the rules
/// table; reject phrases are escaped literals compiled to case-insensitive
/// regexes, accept phrases are plain lowercase substrings.
pub struct FeatureClassifier {
    accept: Vec<String>,
    reject: Vec<regex::Regex>,
}

impl FeatureClassifier {
    pub fn new(accept: &[String], reject: &[String]) -> Result<Self> {
        let accept = accept.iter().map(|kw| kw.to_lowercase()).collect();
        let reject = reject
            .iter()
            .map(|kw| {
                RegexBuilder::new(&regex::escape(kw))
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| anyhow::anyhow!("reject phrase `{}` regex error: {}", kw, e))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { accept, reject })
    }

    /// True iff the item reads like a genuine feature/launch announcement.
    /// Reject evaluation short-circuits unconditionally: a launch verb never
    /// rescues an item that is primarily a financial or legal story.
    pub fn is_feature(&self, title: &str, summary: &str) -> bool {
        let text = format!("{title} {summary}").to_lowercase();
        if self.reject.iter().any(|re| re.is_match(&text)) {
            return false;
        }
        self.accept.iter().any(|kw| text.contains(kw.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> FeatureClassifier {
        let accept = ["launches", "rolls out", "now available", "unveils"]
            .map(String::from)
            .to_vec();
        let reject = ["lawsuit", "stock", "vs.", "bug ", "gemini constellation"]
            .map(String::from)
            .to_vec();
        FeatureClassifier::new(&accept, &reject).expect("compile test classifier")
    }

    #[test]
    fn reject_wins_over_accept() {
        let c = classifier();
        assert!(!c.is_feature("Anthropic launches Claude amid lawsuit", ""));
    }

    #[test]
    fn reject_applies_even_without_accept_terms() {
        let c = classifier();
        assert!(!c.is_feature("Gemini constellation viewing guide", ""));
    }

    #[test]
    fn accept_keyword_is_required() {
        let c = classifier();
        assert!(!c.is_feature("Anthropic publishes blog post about weather", ""));
        assert!(c.is_feature("Anthropic launches a new workspace", ""));
    }

    #[test]
    fn summary_text_counts_toward_both_lists() {
        let c = classifier();
        assert!(c.is_feature("Claude gets smarter", "The update rolls out today."));
        assert!(!c.is_feature("Claude gets smarter", "Meanwhile the stock jumped."));
    }

    #[test]
    fn specials_in_phrases_are_escaped_not_interpreted() {
        let c = classifier();
        // "vs." must match the literal dot, not any character.
        assert!(!c.is_feature("Claude vs. Gemini: which launches faster", ""));
        assert!(c.is_feature("Claude vsX launches today", ""));
    }

    #[test]
    fn trailing_space_phrase_does_not_match_longer_word() {
        let c = classifier();
        assert!(!c.is_feature("Team ships fix for bug in parser", "now available"));
        // "bugfix" must not trip the "bug " phrase.
        assert!(c.is_feature("Bugfix release now available", ""));
    }
}
