// src/classifier/bot.rs
//! Layer 1 predicates: injected markup, links in short fields, Cyrillic names,
//! messaging-app links. Each returns a short description of what it saw.

use once_cell::sync::Lazy;
use regex::Regex;

static RAW_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<[a-z][^>]*>").expect("raw tag regex"));
static ENCODED_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)&lt;[a-z]|&amp;lt;").expect("encoded tag regex"));
static TAG_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)href\s*=|src\s*=").expect("attribute regex"));
static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:https?://|www\.)\S+").expect("url regex"));
// Host must not be the tail of a longer domain (`smart.me/`, `nowa.me/`).
static MESSAGING_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^\w.])(?P<host>t\.me|wa\.me)/").expect("messaging link regex")
});

pub const HTML_RAW_TAG: &str = "raw HTML tag";
pub const HTML_ENCODED_ENTITY: &str = "encoded HTML entity";
pub const HTML_ATTRIBUTE: &str = "HTML attribute (href/src)";
pub const URL_DETECTED: &str = "URL detected";

/// Checks, in order: a raw `<tag ...>`, an encoded `&lt;tag` (or double-encoded
/// `&amp;lt;`), a bare `href=`/`src=`.
pub fn contains_html(content: &str) -> Option<&'static str> {
    if RAW_TAG.is_match(content) {
        return Some(HTML_RAW_TAG);
    }
    if ENCODED_TAG.is_match(content) {
        return Some(HTML_ENCODED_ENTITY);
    }
    if TAG_ATTRIBUTE.is_match(content) {
        return Some(HTML_ATTRIBUTE);
    }
    None
}

/// `http://`, `https://` or `www.` followed by at least one non-space.
pub fn contains_url(content: &str) -> Option<&'static str> {
    URL.is_match(content).then_some(URL_DETECTED)
}

/// Cyrillic block only (U+0400..=U+04FF). Greek, Arabic, CJK etc. are not flagged.
pub fn contains_cyrillic(name: &str) -> bool {
    name.chars().any(|c| ('\u{0400}'..='\u{04FF}').contains(&c))
}

/// Returns the lower-cased host (`t.me` / `wa.me`) of the first link found.
pub fn messaging_link(content: &str) -> Option<String> {
    MESSAGING_LINK
        .captures(content)
        .and_then(|c| c.name("host"))
        .map(|m| m.as_str().to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_variants() {
        assert_eq!(contains_html(r#"hi <a href="x">y</a>"#), Some(HTML_RAW_TAG));
        assert_eq!(contains_html("<B>bold"), Some(HTML_RAW_TAG));
        assert_eq!(contains_html("&lt;a href=&quot;x"), Some(HTML_ENCODED_ENTITY));
        assert_eq!(contains_html("&amp;lt;script"), Some(HTML_ENCODED_ENTITY));
        assert_eq!(contains_html("img SRC = foo"), Some(HTML_ATTRIBUTE));
        assert_eq!(contains_html("price < 5 and > 3"), None);
        assert_eq!(contains_html("a <3 b"), None);
    }

    #[test]
    fn url_variants() {
        assert!(contains_url("see https://spam.example/x").is_some());
        assert!(contains_url("HTTP://X").is_some());
        assert!(contains_url("www.example.com").is_some());
        assert!(contains_url("www. spaced").is_none());
        assert!(contains_url("http:// spaced").is_none());
        assert!(contains_url("my website is great").is_none());
    }

    #[test]
    fn cyrillic_only() {
        assert!(contains_cyrillic("Олена"));
        assert!(contains_cyrillic("John Пётр"));
        assert!(!contains_cyrillic("李明"));
        assert!(!contains_cyrillic("Αλέξανδρος"));
        assert!(!contains_cyrillic("محمد"));
        assert!(!contains_cyrillic("José Núñez"));
    }

    #[test]
    fn messaging_hosts() {
        assert_eq!(messaging_link("ping me t.me/spambot"), Some("t.me".into()));
        assert_eq!(messaging_link("https://WA.ME/123"), Some("wa.me".into()));
        assert_eq!(messaging_link("t.me/x at start"), Some("t.me".into()));
        assert_eq!(messaging_link("visit smart.me/about"), None);
        assert_eq!(messaging_link("nowa.me/page"), None);
        assert_eq!(messaging_link("telegram me"), None);
    }
}
