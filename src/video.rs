use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Source {
    YouTube,
    Dailymotion,
    #[default]
    Unknown,
}

static PLATFORMS: [(&str, Source); 2] = [
    ("YouTube", Source::YouTube),
    ("Dailymotion", Source::Dailymotion),
];

impl Source {
    /// Platform whose literal name appears in `text`, if any.
    pub fn detect(text: &str) -> Option<Source> {
        PLATFORMS
            .iter()
            .find(|(name, _)| text.contains(name))
            .map(|(_, source)| *source)
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        PLATFORMS.iter().map(|(name, _)| *name)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct VideoCandidate {
    pub title: String,
    pub video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub source: Source,
}

/// Keeps the candidates whose title contains `term`, ignoring case.
pub fn filter_by_title(term: &str, videos: Vec<VideoCandidate>) -> Vec<VideoCandidate> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return videos;
    }
    videos
        .into_iter()
        .filter(|video| video.title.to_lowercase().contains(&needle))
        .collect()
}
