// src/normalize.rs
//! Text cleanup for headlines and summaries: entity decoding, tag stripping,
//! boilerplate removal, and junk-summary salvage.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Trailing `" - Outlet Name"` suffix that aggregators append to titles.
static RE_OUTLET_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" - .*$").expect("outlet suffix regex"));

/// Trailing `The post X appeared first on Y` boilerplate from blog feeds.
static RE_APPEARED_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*The post .* appeared first on .*$").expect("post-suffix regex"));

/// Summaries matching any of these carry no article content at all.
static JUNK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)join.*club",
        r"(?i)enter your email",
        r"(?i)sign you up",
        r"(?i)newsletter",
        r"(?i)click to read",
        r"(?i)read the full article",
        r"(?i)subscribe",
        r"(?i)the post .* appeared first on",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("junk pattern"))
    .collect()
});

/// First run of at least 40 chars ending in `.` or `!`, followed by a space.
static RE_FIRST_SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.{40,}?[.!])\s").expect("first sentence regex"));

/// Decode HTML entities, strip tag markup, normalize curly quotes to ASCII,
/// collapse whitespace. Tolerates input that is already plain text.
pub fn strip_markup(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();
    out = RE_TAGS.replace_all(&out, "").to_string();
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");
    out = RE_WS.replace_all(&out, " ").to_string();
    out.trim().to_string()
}

/// Drop the `" - Outlet"` suffix an aggregator appends to a cleaned title.
pub fn strip_outlet_suffix(title: &str) -> String {
    RE_OUTLET_SUFFIX.replace(title, "").trim().to_string()
}

fn is_junk(text: &str) -> bool {
    JUNK_PATTERNS.iter().any(|re| re.is_match(text))
}

fn read_more(source: &str) -> String {
    format!("Read more on {source}.")
}

/// Clean a description into a display summary.
///
/// Markup is stripped, trailing blog boilerplate removed, and anything empty
/// or shorter than `min_len` chars is replaced with a "Read more on {source}."
/// pointer. Junk summaries (newsletter prompts and the like) are salvaged by
/// keeping only their first sentence, provided that sentence is not junk
/// itself.
pub fn clean_summary(raw: &str, source: &str, min_len: usize) -> String {
    let text = strip_markup(raw);
    let text = RE_APPEARED_FIRST.replace(&text, "").trim().to_string();
    if text.chars().count() < min_len {
        return read_more(source);
    }
    if is_junk(&text) {
        if let Some(caps) = RE_FIRST_SENTENCE.captures(&text) {
            if let Some(m) = caps.get(1) {
                if !is_junk(m.as_str()) {
                    return m.as_str().to_string();
                }
            }
        }
        return read_more(source);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_decodes_entities() {
        let s = "<p>Gemini&nbsp;<b>3</b> &amp; friends &#x27;live&#x2F;now&#x27;</p>";
        assert_eq!(strip_markup(s), "Gemini 3 & friends 'live/now'");
    }

    #[test]
    fn collapses_whitespace_and_curly_quotes() {
        let s = "A\u{00A0}\n\t\u{201C}B\u{201D}   C";
        assert_eq!(strip_markup(s), "A \"B\" C");
    }

    #[test]
    fn outlet_suffix_is_dropped() {
        assert_eq!(
            strip_outlet_suffix("OpenAI unveils new voice mode - The Verge"),
            "OpenAI unveils new voice mode"
        );
        assert_eq!(strip_outlet_suffix("No suffix here"), "No suffix here");
    }

    #[test]
    fn short_summary_falls_back_to_source_pointer() {
        assert_eq!(clean_summary("", "TechCrunch", 50), "Read more on TechCrunch.");
        assert_eq!(clean_summary("Too short.", "Wired", 50), "Read more on Wired.");
    }

    #[test]
    fn post_suffix_is_removed_before_length_check() {
        let s = "Short intro. The post Gemini 3 ships appeared first on Some Blog.";
        assert_eq!(clean_summary(s, "Some Blog", 50), "Read more on Some Blog.");
    }

    #[test]
    fn junk_summary_salvages_leading_sentence() {
        let s = "Gemini 3 Flash brings a faster model to every tier of the app today. \
                 Subscribe to our newsletter for more updates.";
        assert_eq!(
            clean_summary(s, "Blog", 50),
            "Gemini 3 Flash brings a faster model to every tier of the app today."
        );
    }

    #[test]
    fn junk_summary_without_salvageable_sentence_falls_back() {
        let s = "Subscribe now! Enter your email below and we will sign you up for everything.";
        assert_eq!(clean_summary(s, "Blog", 50), "Read more on Blog.");
    }
}
