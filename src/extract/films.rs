use std::{collections::HashSet, sync::LazyLock};

use scraper::{Html, Selector};

use crate::{
    dom::NodeExt,
    title::normalize_title,
    video::{Source, VideoCandidate},
};

pub const FILMS_URL: &str = "https://sehatra.com/film/";
pub const SITE_ORIGIN: &str = "https://sehatra.com";

static CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.image-container").expect("container selector"));
static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").expect("img selector"));
static WATCH_BUTTON: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.gen-button").expect("button selector"));

pub fn resolve_site_link(href: &str) -> String {
    if href.starts_with('/') {
        format!("{SITE_ORIGIN}{href}")
    } else {
        href.to_owned()
    }
}

/// Maps every `div.image-container` card of the film listing to a candidate.
/// Cards without a title, thumbnail or link are skipped.
pub fn extract_films(document: &Html) -> Vec<VideoCandidate> {
    let mut films = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    for container in document.select(&CONTAINER) {
        let image = container.find_first(&IMAGE);
        let title = image
            .and_then(|img| img.attr_value("alt"))
            .map(normalize_title)
            .unwrap_or_default();
        let image_url = image.and_then(|img| img.attr_value("src"));
        let video_url = container
            .find_first(&WATCH_BUTTON)
            .and_then(|link| link.attr_value("href"))
            .map(resolve_site_link);

        let (Some(image_url), Some(video_url)) = (image_url, video_url) else {
            continue;
        };
        if title.is_empty() || !seen_urls.insert(video_url.clone()) {
            continue;
        }
        films.push(VideoCandidate {
            title,
            video_url,
            image_url: Some(image_url.to_owned()),
            duration: None,
            source: Source::Unknown,
        });
    }
    films
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(title: &str, src: &str, href: &str) -> String {
        format!(
            r#"<div class="image-container">
                <img alt="{title}" src="{src}">
                <div class="overlay"><a class="gen-button" href="{href}">Voir</a></div>
            </div>"#
        )
    }

    #[test]
    fn resolve_relative_and_absolute_links() {
        assert_eq!(resolve_site_link("/film/xyz"), "https://sehatra.com/film/xyz");
        assert_eq!(resolve_site_link("https://other.site/x"), "https://other.site/x");
    }

    #[test]
    fn extract_films_success() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            card("Tantara Gasy Vaovao", "/img/a.jpg", "/film/tantara"),
            card("Other", "https://cdn.sehatra.com/b.jpg", "https://other.site/x"),
        );
        let films = extract_films(&Html::parse_document(&html));
        assert_eq!(films.len(), 2);
        assert_eq!(films[0].title, "Tantara Gasy Vaovao");
        assert_eq!(films[0].video_url, "https://sehatra.com/film/tantara");
        assert_eq!(films[0].image_url.as_deref(), Some("/img/a.jpg"));
        assert_eq!(films[0].source, Source::Unknown);
        assert_eq!(films[1].video_url, "https://other.site/x");
    }

    #[test]
    fn extract_films_deduplicates_first_wins() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            card("First", "/a.jpg", "/film/same"),
            card("Second", "/b.jpg", "/film/same"),
        );
        let films = extract_films(&Html::parse_document(&html));
        assert_eq!(films.len(), 1);
        assert_eq!(films[0].title, "First");
    }

    #[test]
    fn extract_films_skips_incomplete_cards() {
        let html = format!(
            r#"<html><body>{}{}{}<div class="image-container"><img alt="No link" src="/c.jpg"></div></body></html>"#,
            card("", "/a.jpg", "/film/no-title"),
            card("No image", "", "/film/no-image"),
            card("Complete", "/d.jpg", "/film/complete"),
        );
        let films = extract_films(&Html::parse_document(&html));
        assert_eq!(films.len(), 1);
        assert_eq!(films[0].title, "Complete");
    }

    #[test]
    fn extract_films_empty_page() {
        let films = extract_films(&Html::parse_document("<html><p>maintenance</p></html>"));
        assert!(films.is_empty());
    }
}
