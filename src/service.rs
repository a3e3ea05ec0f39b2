use scraper::Html;

use crate::{
    crawler::{FetchError, Fetching},
    extract::{extract_films, extract_search_results, search_url, FILMS_URL},
    logger::Logging,
    video::{filter_by_title, VideoCandidate},
};

/// Fetches a page, extracts its video cards and filters them.
///
/// Holds no per-request state: every call fetches and parses its own page,
/// so one instance can serve concurrent requests.
pub struct VideoService<F: Fetching, L: Logging> {
    crawler: F,
    logger: L,
}

impl<F: Fetching, L: Logging> VideoService<F, L> {
    pub fn new(crawler: F, logger: L) -> Self {
        VideoService { crawler, logger }
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let body_bytes = self.crawler.fetch_body(url).await.map_err(|error| {
            self.logger.warn(&format!("failed to fetch '{url}': {error}"));
            error
        })?;
        Ok(String::from_utf8_lossy(&body_bytes).into_owned())
    }

    /// Raw markup of the search page for `term`.
    pub async fn search_page(&self, term: &str) -> Result<String, FetchError> {
        let url = search_url(term)?;
        self.fetch_text(url.as_str()).await
    }

    /// Video results of a web search for `term`. The engine already matched
    /// the term, so unlike [`Self::films`] the titles are not filtered again.
    pub async fn search(&self, term: &str) -> Result<Vec<VideoCandidate>, FetchError> {
        let body = self.search_page(term).await?;
        let videos = extract_search_results(&Html::parse_document(&body));
        self.logger
            .info(&format!("{} video(s) found for '{term}'", videos.len()));
        Ok(videos)
    }

    /// Film listing, narrowed to titles containing `term`.
    pub async fn films(&self, term: &str) -> Result<Vec<VideoCandidate>, FetchError> {
        let body = self.fetch_text(FILMS_URL).await?;
        let films = extract_films(&Html::parse_document(&body));
        self.logger.verbose(&format!("{} film(s) listed", films.len()));
        let matched = filter_by_title(term, films);
        self.logger
            .info(&format!("{} film(s) match '{term}'", matched.len()));
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        crawler::{FetchErrorKind, MockFetching},
        logger::Logger,
    };

    use super::*;

    const FILMS_PAGE: &str = r#"
    <html><body>
        <div class="image-container">
            <img alt="Tantara Gasy Vaovao" src="/a.jpg">
            <a class="gen-button" href="/film/tantara">Voir</a>
        </div>
        <div class="image-container">
            <img alt="Fitiavana" src="/b.jpg">
            <a class="gen-button" href="/film/fitiavana">Voir</a>
        </div>
    </body></html>
    "#;

    #[tokio::test]
    async fn films_success() {
        let mut mock_crawler = MockFetching::new();
        mock_crawler.expect_fetch_body().times(1).returning(|url| {
            assert_eq!(url, "https://sehatra.com/film/");
            Ok(FILMS_PAGE.to_owned().into_bytes())
        });
        let service = VideoService::new(mock_crawler, Logger::new(0));
        let films = service.films("gasy").await.unwrap();
        assert_eq!(films.len(), 1);
        assert_eq!(films[0].video_url, "https://sehatra.com/film/tantara");
    }

    #[tokio::test]
    async fn films_empty_term() {
        let mut mock_crawler = MockFetching::new();
        mock_crawler
            .expect_fetch_body()
            .returning(|_| Ok(FILMS_PAGE.to_owned().into_bytes()));
        let service = VideoService::new(mock_crawler, Logger::new(0));
        let films = service.films("").await.unwrap();
        let titles: Vec<&str> = films.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, ["Tantara Gasy Vaovao", "Fitiavana"]);
    }

    #[tokio::test]
    async fn search_success() {
        let mut mock_crawler = MockFetching::new();
        mock_crawler.expect_fetch_body().times(1).returning(|url| {
            assert_eq!(
                url,
                "https://www.google.com/search?q=film+malagasy&tbm=vid&hl=fr"
            );
            Ok(br#"<html><body><div><h3>Sarimihetsika</h3><div><div><div><div>
                <a href="/url?q=https://youtu.be/abc123&amp;sa=U">link</a>
            </div></div></div></div></div></body></html>"#
                .to_vec())
        });
        let service = VideoService::new(mock_crawler, Logger::new(0));
        let videos = service.search("film malagasy").await.unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].title, "Sarimihetsika");
        assert_eq!(videos[0].video_url, "https://youtu.be/abc123");
    }

    #[tokio::test]
    async fn search_fetch_failure() {
        let mut mock_crawler = MockFetching::new();
        mock_crawler
            .expect_fetch_body()
            .returning(|_| Err(FetchError::new(FetchErrorKind::Timeout, "timed out")));
        let service = VideoService::new(mock_crawler, Logger::new(0));
        let error = service.search("film").await.unwrap_err();
        assert_eq!(error.kind, FetchErrorKind::Timeout);
    }

    #[tokio::test]
    async fn search_page_is_lossy_utf8() {
        let mut mock_crawler = MockFetching::new();
        mock_crawler
            .expect_fetch_body()
            .returning(|_| Ok(vec![b'<', b'p', b'>', 0xff, b'<', b'/', b'p', b'>']));
        let service = VideoService::new(mock_crawler, Logger::new(0));
        let page = service.search_page("x").await.unwrap();
        assert_eq!(page, "<p>\u{fffd}</p>");
    }
}
