use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use futures::future::join_all;

use crate::types::{MediaKind, PinResult};

/// `pin_<id>_<position>.<ext>`, with `media` standing in for a missing id.
/// `position` is 1-based.
pub fn media_filename(pin_id: &str, position: usize, kind: MediaKind) -> String {
    let id = if pin_id.is_empty() { "media" } else { pin_id };
    format!("pin_{}_{}.{}", id, position, kind.extension())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { path: PathBuf, bytes: usize },
    /// The download failed; the caller should hand the url to the user instead.
    Fallback { url: String },
}

/// Best-effort media downloader. Each save is independent of the others.
#[derive(Clone)]
pub struct MediaSaver {
    client: reqwest::Client,
}

impl MediaSaver {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().user_agent("pinfetch/0.1").build()?;
        Ok(Self { client })
    }

    /// Download `url` into `dir/filename`. Never fails; errors become
    /// [`SaveOutcome::Fallback`].
    pub async fn save(&self, url: &str, dir: &Path, filename: &str) -> SaveOutcome {
        match self.try_save(url, dir, filename).await {
            Ok((path, bytes)) => {
                tracing::info!(path = %path.display(), bytes, "saved media");
                SaveOutcome::Saved { path, bytes }
            }
            Err(e) => {
                tracing::warn!(
                    %url,
                    error = %format!("{e:#}"),
                    "download failed, falling back to direct link"
                );
                SaveOutcome::Fallback { url: url.to_string() }
            }
        }
    }

    async fn try_save(&self, url: &str, dir: &Path, filename: &str) -> Result<(PathBuf, usize)> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        if !resp.status().is_success() {
            bail!("GET {url} returned {}", resp.status());
        }
        let bytes = resp.bytes().await.with_context(|| format!("reading body of {url}"))?;
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;
        let path = dir.join(filename);
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        Ok((path, bytes.len()))
    }

    /// Save every video, then every image, concurrently. Positions run across
    /// both sequences in that order. Outcomes are returned in the same order.
    pub async fn save_all(&self, pin: &PinResult, dir: &Path) -> Vec<SaveOutcome> {
        let jobs = pin.media().enumerate().map(move |(i, m)| {
            let filename = media_filename(&pin.id, i + 1, m.kind);
            async move { self.save(&m.url, dir, &filename).await }
        });
        join_all(jobs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MediaItem;

    #[test]
    fn filename_convention() {
        assert_eq!(media_filename("123", 1, MediaKind::Image), "pin_123_1.jpg");
        assert_eq!(media_filename("123", 2, MediaKind::Gif), "pin_123_2.jpg");
        assert_eq!(media_filename("", 3, MediaKind::Video), "pin_media_3.mp4");
    }

    #[tokio::test]
    async fn saves_body_to_named_file() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/a.jpg")
            .with_status(200)
            .with_body("JPEGDATA")
            .create_async()
            .await;
        let tmp = tempfile::tempdir().unwrap();
        let saver = MediaSaver::new().unwrap();

        let url = format!("{}/a.jpg", server.url());
        let out = saver.save(&url, tmp.path(), "pin_1_1.jpg").await;
        let expected = tmp.path().join("pin_1_1.jpg");
        assert_eq!(out, SaveOutcome::Saved { path: expected.clone(), bytes: 8 });
        assert_eq!(std::fs::read(expected).unwrap(), b"JPEGDATA");
    }

    #[tokio::test]
    async fn failed_download_falls_back_to_url() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/gone.mp4").with_status(404).create_async().await;
        let tmp = tempfile::tempdir().unwrap();
        let url = format!("{}/gone.mp4", server.url());

        let out = MediaSaver::new().unwrap().save(&url, tmp.path(), "pin_1_1.mp4").await;
        assert_eq!(out, SaveOutcome::Fallback { url });
        assert!(!tmp.path().join("pin_1_1.mp4").exists());
    }

    #[tokio::test]
    async fn save_all_numbers_videos_then_images() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body("x")
            .expect(3)
            .create_async()
            .await;
        let base = server.url();
        let pin = PinResult {
            id: "9".into(),
            title: String::new(),
            description: String::new(),
            images: vec![
                MediaItem::new(MediaKind::Image, format!("{base}/1.jpg")),
                MediaItem::new(MediaKind::Gif, format!("{base}/2.gif")),
            ],
            videos: vec![MediaItem::new(MediaKind::Video, format!("{base}/v.mp4"))],
            author: None,
        };
        let tmp = tempfile::tempdir().unwrap();

        let outcomes = MediaSaver::new().unwrap().save_all(&pin, tmp.path()).await;
        let names: Vec<String> = outcomes
            .iter()
            .map(|o| match o {
                SaveOutcome::Saved { path, .. } => {
                    path.file_name().unwrap().to_string_lossy().into_owned()
                }
                SaveOutcome::Fallback { url } => panic!("unexpected fallback for {url}"),
            })
            .collect();
        assert_eq!(names, ["pin_9_1.mp4", "pin_9_2.jpg", "pin_9_3.jpg"]);
    }
}
