// tests/classify_handpicked.rs
// Hand-picked cases for the feature gate, run against the shipped
// accept/reject tables.

use ai_update_feed::classify::FeatureClassifier;
use ai_update_feed::rules::RulesRoot;

fn classifier() -> FeatureClassifier {
    let rules = RulesRoot::builtin();
    FeatureClassifier::new(&rules.classify.accept, &rules.classify.reject)
        .expect("compile shipped keyword tables")
}

#[test]
fn genuine_launches_pass() {
    let c = classifier();
    assert!(c.is_feature(
        "OpenAI rolls out ChatGPT voice mode to everyone",
        "The new voice mode is now available on mobile and desktop."
    ));
    assert!(c.is_feature(
        "Anthropic introduces Claude file editing",
        "Claude can now edit uploaded documents in place."
    ));
}

#[test]
fn reject_beats_accept() {
    let c = classifier();
    // "launches" (accept) + "lawsuit" (reject) → reject wins.
    assert!(!c.is_feature("Anthropic launches Claude amid lawsuit", ""));
    // Financial framing kills a launch headline too.
    assert!(!c.is_feature(
        "OpenAI launches new model as stock interest surges",
        ""
    ));
}

#[test]
fn reject_runs_even_without_any_accept_term() {
    let c = classifier();
    assert!(!c.is_feature("Gemini constellation viewing guide for stargazers", ""));
}

#[test]
fn an_accept_term_is_required() {
    let c = classifier();
    assert!(!c.is_feature("Anthropic publishes blog post about weather", ""));
}

#[test]
fn financial_legal_and_lifestyle_noise_is_rejected() {
    let c = classifier();
    assert!(!c.is_feature("Midjourney valuation reportedly doubles", ""));
    assert!(!c.is_feature("Senator calls for Grok investigation", ""));
    assert!(!c.is_feature("I asked ChatGPT to plan my retirement", ""));
    assert!(!c.is_feature("Claude vs. Gemini: which one should you use", ""));
    assert!(!c.is_feature("Perplexity announces new data center buildout", ""));
}

#[test]
fn description_text_can_reject_an_innocent_title() {
    let c = classifier();
    assert!(!c.is_feature(
        "Mistral releases a new small model",
        "The release lands days after the company's latest funding round."
    ));
}

#[test]
fn comparison_framing_is_rejected() {
    let c = classifier();
    assert!(!c.is_feature("DeepSeek V4 vs GPT-5: first impressions", ""));
}
