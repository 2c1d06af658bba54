//! Quote highlighting for review text
//!
//! Produces HTML-safe text where every occurrence of each quote is wrapped in
//! `<mark>`. Matching is exact first; a quote with no exact occurrence is
//! retried ASCII case-insensitively. Overlapping or touching matches merge
//! into a single mark.

use std::ops::Range;

use crate::models::Quote;

const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

/// Escape text for inclusion in HTML element content or attributes
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Highlight the text of every quote in `text`
pub fn highlight_quotes(text: &str, quotes: &[Quote]) -> String {
    highlight(text, quotes.iter().map(|q| q.text.as_str()))
}

/// Escape `text` and mark every occurrence of each needle
pub fn highlight<I, S>(text: &str, needles: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let ranges = merge_ranges(find_ranges(text, needles));
    if ranges.is_empty() {
        return escape_html(text);
    }

    let mut out = String::with_capacity(text.len() + ranges.len() * 16);
    let mut cursor = 0;
    for range in ranges {
        out.push_str(&escape_html(&text[cursor..range.start]));
        out.push_str(MARK_OPEN);
        out.push_str(&escape_html(&text[range.clone()]));
        out.push_str(MARK_CLOSE);
        cursor = range.end;
    }
    out.push_str(&escape_html(&text[cursor..]));
    out
}

fn find_ranges<I, S>(text: &str, needles: I) -> Vec<Range<usize>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    // ASCII lowercasing keeps byte offsets identical to `text`
    let lowered = text.to_ascii_lowercase();
    let mut ranges = Vec::new();

    for needle in needles {
        let needle = needle.as_ref().trim();
        if needle.is_empty() {
            continue;
        }

        let before = ranges.len();
        ranges.extend(
            text.match_indices(needle)
                .map(|(start, m)| start..start + m.len()),
        );
        if ranges.len() == before {
            let needle = needle.to_ascii_lowercase();
            ranges.extend(
                lowered
                    .match_indices(needle.as_str())
                    .map(|(start, m)| start..start + m.len()),
            );
        }
    }
    ranges
}

fn merge_ranges(mut ranges: Vec<Range<usize>>) -> Vec<Range<usize>> {
    ranges.sort_by_key(|r| (r.start, r.end));
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom & Jerry's"</b>"#),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_no_quotes_only_escapes() {
        assert_eq!(highlight("a < b", Vec::<&str>::new()), "a &lt; b");
    }

    #[test]
    fn test_marks_every_occurrence() {
        assert_eq!(
            highlight("lag, lag and more lag", ["lag"]),
            "<mark>lag</mark>, <mark>lag</mark> and more <mark>lag</mark>"
        );
    }

    #[test]
    fn test_case_insensitive_fallback() {
        assert_eq!(
            highlight("Great Graphics overall", ["great graphics"]),
            "<mark>Great Graphics</mark> overall"
        );
    }

    #[test]
    fn test_exact_match_wins_over_fallback() {
        // An exact hit exists, so the capitalized occurrence is not marked
        assert_eq!(
            highlight("Boss fights. boss fights.", ["boss fights"]),
            "Boss fights. <mark>boss fights</mark>."
        );
    }

    #[test]
    fn test_overlapping_and_adjacent_merge() {
        assert_eq!(
            highlight("the netcode is awful", ["netcode is", "is awful"]),
            "the <mark>netcode is awful</mark>"
        );
        assert_eq!(highlight("abcdef", ["abc", "def"]), "<mark>abcdef</mark>");
    }

    #[test]
    fn test_escapes_inside_marks() {
        assert_eq!(
            highlight("R&D <3 & more", ["<3 &"]),
            "R&amp;D <mark>&lt;3 &amp;</mark> more"
        );
    }

    #[test]
    fn test_empty_and_blank_quotes_ignored() {
        assert_eq!(highlight("text", ["", "   "]), "text");
    }

    #[test]
    fn test_non_ascii_text() {
        assert_eq!(
            highlight("Très beau jeu, TRÈS beau", ["beau"]),
            "Très <mark>beau</mark> jeu, TRÈS <mark>beau</mark>"
        );
    }

    #[test]
    fn test_quotes_from_review() {
        let quotes = vec![Quote {
            text: "crashes".into(),
            codes: vec![],
        }];
        assert_eq!(
            highlight_quotes("It crashes a lot", &quotes),
            "It <mark>crashes</mark> a lot"
        );
    }
}
