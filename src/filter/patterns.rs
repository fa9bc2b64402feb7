//! Watch-link patterns.
//!
//! Every pattern here follows one capture-group convention: the video id is
//! the **last** group and the host is the **second-to-last**. Leading groups
//! (such as the whole URL) are free to vary between patterns.

use std::{ops::Range, sync::LazyLock};

use regex::{Captures, Regex};
use serde::Serialize;

/// Literal that every watch link contains. Text without it is never scanned.
pub const WATCH_MARKER: &str = "watch";

/// `<a ... href="https://{host}/watch/{id}[?query]" ...>...</a>`, replaced as a
/// whole. Inner content may span lines.
///
/// Groups: 1 = URL, 2 = host, 3 = video id.
pub const ANCHOR_PATTERN: &str =
    r#"(?is)<a\s+[^>]*href=["'](https://([^\s"'<>]+?)/watch/(\d+))[^"'\s]*["'][^>]*>.*?</a>"#;

/// A bare `https://{host}/watch/{id}` anywhere in text.
///
/// Groups: 1 = URL, 2 = host, 3 = video id.
pub const PLAIN_PATTERN: &str = r#"(?i)(https://([^\s"'<>]+?)/watch/(\d+))"#;

static ANCHOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ANCHOR_PATTERN).expect("anchor pattern is valid"));

static PLAIN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PLAIN_PATTERN).expect("plain pattern is valid"));

/// The two link shapes, in the order they are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPattern {
    Anchor,
    Plain,
}

impl LinkPattern {
    pub const ORDERED: [LinkPattern; 2] = [LinkPattern::Anchor, LinkPattern::Plain];

    pub fn regex(&self) -> &'static Regex {
        match self {
            Self::Anchor => &*ANCHOR_REGEX,
            Self::Plain => &*PLAIN_REGEX,
        }
    }

    /// Find every non-overlapping match in `text`, left to right.
    pub fn find_all(&self, text: &str) -> Vec<LinkMatch> {
        find_matches(self.regex(), text)
    }
}

/// One watch link found in a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    pub full_match: String,
    pub host: String,
    pub video_id: String,
    /// Byte range of `full_match` in the scanned text.
    pub range: Range<usize>,
}

impl LinkMatch {
    /// Build a match from the trailing two groups of `caps`.
    ///
    /// Returns `None` if the pattern has fewer than two groups or either of
    /// the trailing groups did not participate.
    pub fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let groups = caps.len();
        if groups < 3 {
            return None;
        }

        let whole = caps.get(0)?;
        let host = caps.get(groups - 2)?;
        let video_id = caps.get(groups - 1)?;

        Some(Self {
            full_match: whole.as_str().to_string(),
            host: host.as_str().to_string(),
            video_id: video_id.as_str().to_string(),
            range: whole.range(),
        })
    }
}

/// True when the match is the value of an HTML attribute (`href=`, `src="`...).
pub fn is_attribute_value(text: &str, link: &LinkMatch) -> bool {
    text[..link.range.start]
        .trim_end_matches(['"', '\''])
        .ends_with('=')
}

pub fn find_matches(regex: &Regex, text: &str) -> Vec<LinkMatch> {
    regex
        .captures_iter(text)
        .filter_map(|caps| LinkMatch::from_captures(&caps))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_double_quotes() {
        let text = r#"See <a href="https://host.example/watch/123">the lecture</a> now"#;
        let matches = LinkPattern::Anchor.find_all(text);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].host, "host.example");
        assert_eq!(matches[0].video_id, "123");
        assert_eq!(
            matches[0].full_match,
            r#"<a href="https://host.example/watch/123">the lecture</a>"#
        );
        assert_eq!(&text[matches[0].range.clone()], matches[0].full_match);
    }

    #[test]
    fn test_anchor_single_quotes_and_extra_attributes() {
        let text = r#"<A class='x' HREF='https://v.example.org/watch/9' target='_blank'><b>x</b></A>"#;
        let matches = LinkPattern::Anchor.find_all(text);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].host, "v.example.org");
        assert_eq!(matches[0].video_id, "9");
        assert_eq!(matches[0].range, 0..text.len());
    }

    #[test]
    fn test_anchor_inner_content_is_non_greedy() {
        let text = concat!(
            r#"<a href="https://h.example/watch/1">one</a> and "#,
            r#"<a href="https://h.example/watch/2">two</a>"#,
        );
        let matches = LinkPattern::Anchor.find_all(text);

        let ids: Vec<_> = matches.iter().map(|m| m.video_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_anchor_inner_content_spans_lines() {
        let text = "<a href=\"https://h.example/watch/1\">\nlabel\n</a>";
        let matches = LinkPattern::Anchor.find_all(text);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].range, 0..text.len());
    }

    #[test]
    fn test_anchor_href_with_query() {
        let text = r#"<a href="https://h.example/watch/1?t=30&amp;x=1">label</a>"#;
        let matches = LinkPattern::Anchor.find_all(text);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].video_id, "1");
        assert_eq!(matches[0].range, 0..text.len());
    }

    #[test]
    fn test_attribute_value_detection() {
        let text = concat!(
            "<a href=https://h.example/watch/1>https://h.example/watch/2</a> ",
            "src='https://h.example/watch/3'",
        );
        let matches = LinkPattern::Plain.find_all(text);
        let flags: Vec<_> = matches.iter().map(|m| is_attribute_value(text, m)).collect();

        assert_eq!(flags, vec![true, false, true]);
    }

    #[test]
    fn test_anchor_ignores_non_watch_href() {
        let text = r#"<a href="https://h.example/embed/1">x</a>"#;
        assert!(LinkPattern::Anchor.find_all(text).is_empty());
    }

    #[test]
    fn test_plain_url() {
        let text = "Watch https://host.example/watch/456 today";
        let matches = LinkPattern::Plain.find_all(text);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].full_match, "https://host.example/watch/456");
        assert_eq!(matches[0].host, "host.example");
        assert_eq!(matches[0].video_id, "456");
    }

    #[test]
    fn test_plain_is_case_insensitive() {
        let matches = LinkPattern::Plain.find_all("HTTPS://Host.Example/WATCH/77");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].host, "Host.Example");
        assert_eq!(matches[0].video_id, "77");
    }

    #[test]
    fn test_plain_requires_https_and_digits() {
        assert!(LinkPattern::Plain.find_all("http://h.example/watch/1").is_empty());
        assert!(LinkPattern::Plain.find_all("https://h.example/watch/abc").is_empty());
    }

    #[test]
    fn test_plain_host_may_contain_port_and_path() {
        let matches = LinkPattern::Plain.find_all("https://h.example:8443/v2/watch/5");
        assert_eq!(matches[0].host, "h.example:8443/v2");
        assert_eq!(matches[0].video_id, "5");
    }

    #[test]
    fn test_trailing_groups_convention() {
        // One extra leading group compared to the built-in patterns.
        let regex = Regex::new(r"(?i)(<p>)?((https://(\S+?)/watch/(\d+)))").unwrap();
        let matches = find_matches(&regex, "<p>https://h.example/watch/31");

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].host, "h.example");
        assert_eq!(matches[0].video_id, "31");

        // The bare minimum: just host and id.
        let regex = Regex::new(r"https://(\S+?)/watch/(\d+)").unwrap();
        let matches = find_matches(&regex, "https://h.example/watch/8");
        assert_eq!(matches[0].host, "h.example");
        assert_eq!(matches[0].video_id, "8");
    }

    #[test]
    fn test_too_few_groups_yields_nothing() {
        let regex = Regex::new(r"https://\S+?/watch/(\d+)").unwrap();
        assert!(find_matches(&regex, "https://h.example/watch/8").is_empty());
    }
}
