//! Video results out of a search-engine results page.
//!
//! The results markup has no stable schema, so every anchor pointing at a
//! known video host is treated as a result, and the rest of its card is
//! recovered from the surrounding subtree with per-field fallbacks. A missed
//! field is fine; a missed title drops the anchor.

use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::{form_urlencoded, Url};

use crate::{
    dom::NodeExt,
    title::normalize_title,
    video::{Source, VideoCandidate},
};

pub const SEARCH_URL: &str = "https://www.google.com/search";

/// Parent levels between a result anchor and the node holding its whole card.
/// Tuned to the current results markup.
pub const CONTEXT_CLIMB_DEPTH: usize = 5;

const VIDEO_HOST_MARKERS: [&str; 6] = [
    "youtube.com/watch",
    "youtube.com/embed/",
    "youtu.be/",
    "dailymotion.com/video",
    "dailymotion.com/embed/",
    "dai.ly/",
];

const REDIRECT_PREFIX: &str = "/url?";
const REDIRECT_PARAMS: [&str; 3] = ["q", "url", "u"];

const TEXT_BLOCK_MIN_CHARS: usize = 20;
const TEXT_BLOCK_MAX_CHARS: usize = 200;
const ANCHOR_TEXT_MIN_CHARS: usize = 5;
const INLINE_TEXT_MAX_CHARS: usize = 64;

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector"));
static HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").expect("heading selector"));
static TEXT_BLOCK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div").expect("text block selector"));
static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").expect("img selector"));
static INLINE_TEXT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span").expect("inline text selector"));
static CLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}:\d{2}(?::\d{2})?$").expect("CLOCK regex"));

/// Search page URL for `term`, restricted to video results.
pub fn search_url(term: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(SEARCH_URL, &[("q", term), ("tbm", "vid"), ("hl", "fr")])
}

fn is_video_link(href: &str) -> bool {
    VIDEO_HOST_MARKERS.iter().any(|marker| href.contains(marker))
}

/// Destination of a result link, unwrapping the engine's `/url?q=...`
/// redirect form. `None` unless an absolute http(s) URL is left.
pub fn resolve_destination(href: &str) -> Option<String> {
    let destination = match href.strip_prefix(REDIRECT_PREFIX) {
        Some(query) => {
            let params: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect();
            REDIRECT_PARAMS.iter().find_map(|wanted| {
                params
                    .iter()
                    .find(|(key, value)| key == *wanted && !value.trim().is_empty())
                    .map(|(_, value)| value.clone())
            })?
        }
        None => href.to_owned(),
    };
    let destination = destination.trim();
    if destination.is_empty() {
        return None;
    }
    let destination = if destination.starts_with("//") {
        format!("https:{destination}")
    } else {
        destination.to_owned()
    };
    match Url::parse(&destination) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(destination),
        _ => None,
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn non_empty_title(raw: &str) -> Option<String> {
    Some(normalize_title(raw)).filter(|title| !title.is_empty())
}

/// Heading first, then a mid-sized text block, then the anchor's own text.
fn recover_title(context: &ElementRef, anchor: &ElementRef) -> Option<String> {
    if let Some(title) = context
        .find_first(&HEADING)
        .and_then(|heading| non_empty_title(&heading.text_content()))
    {
        return Some(title);
    }
    let block_title = context.find_all(&TEXT_BLOCK).into_iter().find_map(|block| {
        let text = block.text_content();
        let len = char_len(&text);
        if len > TEXT_BLOCK_MIN_CHARS && len < TEXT_BLOCK_MAX_CHARS {
            non_empty_title(&text)
        } else {
            None
        }
    });
    if block_title.is_some() {
        return block_title;
    }
    let anchor_text = anchor.text_content();
    if char_len(&anchor_text) > ANCHOR_TEXT_MIN_CHARS {
        return non_empty_title(&anchor_text);
    }
    None
}

fn recover_thumbnail(context: &ElementRef) -> Option<String> {
    context.find_all(&IMAGE).into_iter().find_map(|img| {
        let src = img.attr_value("src").or_else(|| img.attr_value("data-src"))?;
        if src.starts_with("data:") {
            None
        } else {
            Some(src.to_owned())
        }
    })
}

/// Scans the short inline labels of a card. The last duration and the last
/// platform label seen win.
fn recover_labels(context: &ElementRef) -> (Option<String>, Source) {
    let mut duration = None;
    let mut source = Source::Unknown;
    for label in context.find_all(&INLINE_TEXT) {
        let text = label.text_content();
        if text.is_empty() || char_len(&text) > INLINE_TEXT_MAX_CHARS {
            continue;
        }
        if CLOCK.is_match(&text) {
            duration = Some(text.clone());
        }
        if let Some(platform) = Source::detect(&text) {
            source = platform;
        }
    }
    (duration, source)
}

pub fn extract_search_results(document: &Html) -> Vec<VideoCandidate> {
    let mut videos = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    for anchor in document.select(&ANCHOR) {
        let Some(href) = anchor.attr_value("href") else {
            continue;
        };
        if !is_video_link(href) {
            continue;
        }
        let Some(video_url) = resolve_destination(href) else {
            continue;
        };
        if !seen_urls.insert(video_url.clone()) {
            continue;
        }

        let context = anchor.ancestor(CONTEXT_CLIMB_DEPTH);
        let Some(title) = recover_title(&context, &anchor) else {
            continue;
        };
        let (duration, source) = recover_labels(&context);
        videos.push(VideoCandidate {
            title,
            video_url,
            image_url: recover_thumbnail(&context),
            duration,
            source,
        });
    }
    videos
}
