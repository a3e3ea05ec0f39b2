use serde::{Deserialize, Serialize};
use tokio::process::Command;
use url::Url;

use crate::logger::Logging;

#[derive(Debug, thiserror::Error)]
pub enum InfoError {
    #[error("invalid video url: {0}")]
    InvalidUrl(String),
    #[error("failed to run yt-dlp: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("yt-dlp exit code: {code:?}, stderr: {stderr}")]
    Failed { code: Option<i32>, stderr: String },
    #[error("unreadable yt-dlp output: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Deserialize, Debug)]
struct FormatSpec {
    format_id: String,
    ext: Option<String>,
    height: Option<u32>,
    filesize: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct InfoSpec {
    title: Option<String>,
    duration: Option<f64>,
    uploader: Option<String>,
    thumbnail: Option<String>,
    webpage_url: Option<String>,
    #[serde(default)]
    formats: Vec<FormatSpec>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct MediaFormat {
    pub format_id: String,
    pub ext: Option<String>,
    pub height: Option<u32>,
    pub filesize: Option<u64>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct MediaInfo {
    pub title: Option<String>,
    pub duration: Option<f64>,
    pub uploader: Option<String>,
    pub thumbnail: Option<String>,
    pub webpage_url: Option<String>,
    pub formats: Vec<MediaFormat>,
}

pub fn parse_info(json: &str) -> Result<MediaInfo, InfoError> {
    let raw_info = serde_json::from_str::<InfoSpec>(json)?;
    Ok(MediaInfo {
        title: raw_info.title,
        duration: raw_info.duration,
        uploader: raw_info.uploader,
        thumbnail: raw_info.thumbnail,
        webpage_url: raw_info.webpage_url,
        formats: raw_info
            .formats
            .into_iter()
            .map(|f| MediaFormat {
                format_id: f.format_id,
                ext: f.ext,
                height: f.height,
                filesize: f.filesize,
            })
            .collect(),
    })
}

fn check_video_url(url: &str) -> Result<Url, InfoError> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(parsed),
        _ => Err(InfoError::InvalidUrl(url.to_owned())),
    }
}

/// Asks the external `yt-dlp` tool for a video's metadata.
pub struct MediaInspector {
    ytdlp_path: String,
}

impl MediaInspector {
    pub fn new(ytdlp_path: &str) -> Self {
        MediaInspector {
            ytdlp_path: ytdlp_path.to_owned(),
        }
    }

    pub async fn inspect<L: Logging>(&self, url: &str, logger: &L) -> Result<MediaInfo, InfoError> {
        let url = check_video_url(url)?;
        let output = Command::new(&self.ytdlp_path)
            .arg("--dump-json")
            .arg("--no-playlist")
            .arg("--")
            .arg(url.as_str())
            .output()
            .await?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(InfoError::Failed {
                code: output.status.code(),
                stderr,
            });
        }
        logger.verbose(&format!("yt-dlp stderr: {stderr}"));
        parse_info(&String::from_utf8_lossy(&output.stdout))
    }
}
