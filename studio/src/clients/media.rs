//! HTTP client for the image/video generation services

use async_trait::async_trait;
use serde::Deserialize;

use site_types::VideoStyle;

use super::{MediaError, MediaService, VideoOutcome};

pub struct HttpMediaService {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    url: String,
}

/// Wire shape of the video service response: `{rendered: true, url}` for a
/// finished asset, `{partial: true, message}` when only a script could be
/// produced.
#[derive(Debug, Deserialize)]
struct VideoResponse {
    #[serde(default)]
    rendered: bool,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    partial: bool,
    #[serde(default)]
    message: Option<String>,
}

impl HttpMediaService {
    pub fn new(base_url: String, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, MediaError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::Status(status.as_u16()));
        }
        response
            .json()
            .await
            .map_err(|e| MediaError::Parse(e.to_string()))
    }
}

#[async_trait]
impl MediaService for HttpMediaService {
    async fn generate_image(
        &self,
        site_id: &str,
        slot: &str,
        prompt: &str,
    ) -> Result<String, MediaError> {
        let body = serde_json::json!({
            "site_id": site_id,
            "slot": slot,
            "prompt": prompt,
        });
        let response: ImageResponse = self.post_json("/images", body).await?;
        Ok(response.url)
    }

    async fn generate_video(
        &self,
        site_id: &str,
        style: VideoStyle,
        topic: &str,
        talking_points: &[String],
    ) -> Result<VideoOutcome, MediaError> {
        let body = serde_json::json!({
            "site_id": site_id,
            "style": style,
            "topic": topic,
            "talking_points": talking_points,
        });
        let response: VideoResponse = self.post_json("/videos", body).await?;

        if response.rendered {
            let url = response
                .url
                .ok_or_else(|| MediaError::Parse("rendered video without url".to_string()))?;
            return Ok(VideoOutcome::Rendered { url });
        }
        if response.partial {
            let message = response
                .message
                .unwrap_or_else(|| "Video script generated; rendering unavailable".to_string());
            return Ok(VideoOutcome::ScriptOnly { message });
        }
        Err(MediaError::Parse(
            "video response was neither rendered nor partial".to_string(),
        ))
    }
}
