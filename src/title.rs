use std::sync::LazyLock;

use regex::Regex;

use crate::video::Source;

static LEADING_TIMESTAMPS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{1,2}:\d{2}(?::\d{2})?\s*)+").expect("LEADING_TIMESTAMPS regex")
});

/// Cleans captured text into a title: drops the clock timestamp(s) at the
/// start, then cuts at the first platform name ("YouTube"/"Dailymotion").
///
/// The timestamp must go first, since search cards render it glued to the
/// platform label.
pub fn normalize_title(raw: &str) -> String {
    let text = LEADING_TIMESTAMPS.replace(raw.trim_start(), "");
    let end = Source::names()
        .filter_map(|name| text.find(name))
        .min()
        .unwrap_or(text.len());
    text[..end].trim().to_owned()
}
