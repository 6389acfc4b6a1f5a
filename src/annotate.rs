//! Photo injection for generated itineraries.
//!
//! Day headings such as `**Day 1: Arrival in Manali & Trek**` are located,
//! a place name is guessed from each one, and a markdown image for that place
//! is spliced in on the line after the heading. Nothing else in the text is
//! touched. The place-name guess is a heuristic and can be wrong.

use std::collections::HashSet;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::images::ImageSearch;

// ── Lazy static regexes ──────────────────────────────────────────────────────

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(Day \d+:.+?)\*\*").unwrap());

// "in" must follow whitespace so "Berlin" or "Check-in" do not count.
static IN_PLACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r":.*?\sin\s+([\w\s]+)").unwrap());

static AFTER_COLON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r":\s*([\w\s]+)").unwrap());

// ── Pure extraction ──────────────────────────────────────────────────────────

/// One day heading found in the itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayHeading {
    /// Byte range of the full heading, emphasis markers included.
    pub span: Range<usize>,
    /// Heading text without the emphasis markers, e.g. `Day 2: Shimla`.
    pub title: String,
    pub query: Option<String>,
}

/// Find the day headings in `text`, in order of appearance.
///
/// A heading string that repeats is reported only at its first occurrence.
pub fn find_day_headings(text: &str) -> Vec<DayHeading> {
    let mut seen = HashSet::new();
    let mut headings = Vec::new();

    for caps in HEADING_RE.captures_iter(text) {
        let (Some(full), Some(title)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if !seen.insert(full.as_str()) {
            continue;
        }
        headings.push(DayHeading {
            span: full.range(),
            title: title.as_str().to_string(),
            query: location_query(title.as_str()),
        });
    }

    headings
}

/// Guess the place a heading is about.
///
/// Prefers the words after "in" ("Arrival in Manali" gives "Manali"), then
/// the words after the colon. Only the first of an `&`-joined list is kept.
pub fn location_query(title: &str) -> Option<String> {
    capture_place(&IN_PLACE_RE, title).or_else(|| capture_place(&AFTER_COLON_RE, title))
}

fn capture_place(re: &Regex, title: &str) -> Option<String> {
    let captured = re.captures(title)?.get(1)?.as_str();
    let place = captured.split('&').next().unwrap_or("").trim();
    if place.is_empty() {
        None
    } else {
        Some(place.to_string())
    }
}

/// Render a markdown image tag with alt text that cannot break out of `[...]`.
pub fn markdown_image(alt: &str, url: &str) -> String {
    let alt = alt
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('[', "\\[")
        .replace(']', "\\]");
    format!("![{}]({})", alt, link_destination(url))
}

/// Percent-encode the characters that end or split a markdown link target.
fn link_destination(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            c if c.is_whitespace() => {}
            c => out.push(c),
        }
    }
    out
}

/// Insert each tag on its own line at the given byte offset. Offsets must be
/// ascending char boundaries of `text`.
fn splice_after(text: &str, insertions: &[(usize, String)]) -> String {
    let extra: usize = insertions.iter().map(|(_, tag)| tag.len() + 2).sum();
    let mut out = String::with_capacity(text.len() + extra);
    let mut cursor = 0;

    for (offset, tag) in insertions {
        out.push_str(&text[cursor..*offset]);
        out.push('\n');
        out.push_str(tag);
        out.push('\n');
        cursor = *offset;
    }
    out.push_str(&text[cursor..]);
    out
}

// ── Annotation ───────────────────────────────────────────────────────────────

/// Add one photo under each day heading the image service can illustrate.
///
/// Image service failures are logged and leave that day without a photo; they
/// never fail the whole itinerary.
pub async fn annotate_itinerary(text: &str, images: &dyn ImageSearch) -> String {
    let mut insertions = Vec::new();

    for heading in find_day_headings(text) {
        let Some(query) = heading.query.as_deref() else {
            tracing::debug!(title = %heading.title, "no location in heading");
            continue;
        };

        match images.search(query).await {
            Ok(Some(image)) => {
                let alt = image
                    .description
                    .clone()
                    .unwrap_or_else(|| format!("A photo of {}", query));
                insertions.push((heading.span.end, markdown_image(&alt, &image.url)));
            }
            Ok(None) => {
                tracing::debug!(query = %query, "no image found");
            }
            Err(e) => {
                tracing::warn!(query = %query, "image search failed: {}", e);
            }
        }
    }

    tracing::info!("added {} images to itinerary", insertions.len());
    splice_after(text, &insertions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeImageSearch;

    #[test]
    fn test_location_after_in() {
        assert_eq!(
            location_query("Day 1: Arrival in Manali & Trek").as_deref(),
            Some("Manali")
        );
    }

    #[test]
    fn test_location_falls_back_to_colon() {
        assert_eq!(location_query("Day 2: Shimla").as_deref(), Some("Shimla"));
    }

    #[test]
    fn test_location_fallback_keeps_first_of_ampersand_list() {
        assert_eq!(
            location_query("Day 3: Kasol & Tosh").as_deref(),
            Some("Kasol")
        );
    }

    #[test]
    fn test_in_inside_a_word_is_not_a_marker() {
        assert_eq!(
            location_query("Day 4: Darjeeling Tea Gardens").as_deref(),
            Some("Darjeeling Tea Gardens")
        );
    }

    #[test]
    fn test_in_after_hyphen_is_not_a_marker() {
        assert_eq!(
            location_query("Day 1: Check-in in Goa").as_deref(),
            Some("Goa")
        );
    }

    #[test]
    fn test_in_marker_is_case_sensitive() {
        assert_eq!(
            location_query("Day 5: In Transit").as_deref(),
            Some("In Transit")
        );
    }

    #[test]
    fn test_capture_stops_at_punctuation() {
        assert_eq!(
            location_query("Day 6: Exploring in Old Goa, then beaches").as_deref(),
            Some("Old Goa")
        );
    }

    #[test]
    fn test_no_location_when_title_is_punctuation() {
        assert_eq!(location_query("Day 7: ???"), None);
    }

    #[test]
    fn test_find_headings_in_order_with_spans() {
        let text = "Intro\n\n**Day 1: Arrival in Manali & Trek**\n- walk\n\n**Day 2: Shimla**\n- mall road\n";
        let headings = find_day_headings(text);

        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].title, "Day 1: Arrival in Manali & Trek");
        assert_eq!(headings[0].query.as_deref(), Some("Manali"));
        assert_eq!(
            &text[headings[0].span.clone()],
            "**Day 1: Arrival in Manali & Trek**"
        );
        assert_eq!(headings[1].query.as_deref(), Some("Shimla"));
        assert_eq!(&text[headings[1].span.clone()], "**Day 2: Shimla**");
    }

    #[test]
    fn test_find_headings_ignores_other_emphasis() {
        let text = "**Tip:** carry cash\n**Day one: Goa**\n**Day 10: Hampi**";
        let headings = find_day_headings(text);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].title, "Day 10: Hampi");
    }

    #[test]
    fn test_find_headings_does_not_span_lines() {
        let text = "**Day 1: Goa\nstill going**";
        assert!(find_day_headings(text).is_empty());
    }

    #[test]
    fn test_repeated_heading_reported_once() {
        let text = "**Day 1: Goa**\nbeach\n**Day 1: Goa**\nmore beach";
        let headings = find_day_headings(text);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].span, 0..14);
    }

    #[test]
    fn test_markdown_image_sanitises_alt() {
        assert_eq!(
            markdown_image("a [big]\n lake", "https://x/a.jpg"),
            "![a \\[big\\] lake](https://x/a.jpg)"
        );
    }

    #[test]
    fn test_markdown_image_encodes_url_breakers() {
        assert_eq!(
            markdown_image("x", "https://x/a (1).jpg"),
            "![x](https://x/a%20%281%29.jpg)"
        );
        assert_eq!(
            markdown_image("x", "https://x/a.jpg?w=1080&q=80"),
            "![x](https://x/a.jpg?w=1080&q=80)"
        );
    }

    #[test]
    fn test_splice_without_insertions_is_identity() {
        assert_eq!(splice_after("unchanged", &[]), "unchanged");
    }

    #[tokio::test]
    async fn test_annotate_inserts_image_after_heading() {
        let images = FakeImageSearch::default().found(
            "Manali",
            "https://x/a.jpg",
            Some("Manali valley"),
        );
        let text = "**Day 1: Arrival in Manali & Trek**\n- Check in";

        let out = annotate_itinerary(text, &images).await;

        assert_eq!(
            out,
            "**Day 1: Arrival in Manali & Trek**\n![Manali valley](https://x/a.jpg)\n\n- Check in"
        );
        assert_eq!(images.calls(), vec!["Manali"]);
    }

    #[tokio::test]
    async fn test_annotate_uses_fallback_description() {
        let images = FakeImageSearch::default().found("Shimla", "https://x/s.jpg", None);
        let out = annotate_itinerary("**Day 2: Shimla**", &images).await;
        assert_eq!(out, "**Day 2: Shimla**\n![A photo of Shimla](https://x/s.jpg)\n");
    }

    #[tokio::test]
    async fn test_annotate_skips_days_without_results_or_with_errors() {
        let images = FakeImageSearch::default()
            .failing("Manali", 500)
            .found("Kasol", "https://x/k.jpg", Some("river"));
        let text = "**Day 1: Manali**\n**Day 2: Shimla**\n**Day 3: Kasol**\n";

        let out = annotate_itinerary(text, &images).await;

        assert_eq!(
            out,
            "**Day 1: Manali**\n**Day 2: Shimla**\n**Day 3: Kasol**\n![river](https://x/k.jpg)\n\n"
        );
        assert_eq!(images.calls(), vec!["Manali", "Shimla", "Kasol"]);
    }

    #[tokio::test]
    async fn test_annotate_repeated_heading_gets_one_image() {
        let images = FakeImageSearch::default().found("Goa", "https://x/g.jpg", Some("beach"));
        let text = "**Day 1: Goa**\nA\n**Day 1: Goa**\nB";

        let out = annotate_itinerary(text, &images).await;

        assert_eq!(out, "**Day 1: Goa**\n![beach](https://x/g.jpg)\n\nA\n**Day 1: Goa**\nB");
        assert_eq!(out.matches("![beach]").count(), 1);
        assert_eq!(images.calls(), vec!["Goa"]);
    }

    #[tokio::test]
    async fn test_annotate_text_without_headings_is_unchanged() {
        let images = FakeImageSearch::default();
        let text = "Sorry, I can only plan trips.";
        assert_eq!(annotate_itinerary(text, &images).await, text);
        assert!(images.calls().is_empty());
    }
}
