//! HTTP client for the persistence service
//!
//! One endpoint accepts a full replacement of {content, brand, layout} for a
//! site; the engine never sends a diff. The smaller calls (slot confirm,
//! video embed, blog create) hit dedicated sub-resources.

use async_trait::async_trait;
use serde::Serialize;

use site_types::{BlogPost, BrandProfile, Layout, SiteDocument, StoredSite};

use super::{SiteStore, StoreError};

pub struct HttpSiteStore {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ReplaceSiteBody<'a> {
    content: &'a SiteDocument,
    brand: &'a BrandProfile,
    layout: Layout,
}

impl HttpSiteStore {
    pub fn new(base_url: String, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    fn site_url(&self, site_id: &str) -> String {
        format!("{}/sites/{site_id}", self.base_url)
    }

    async fn expect_success(
        response: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<reqwest::Response, StoreError> {
        let response = response.map_err(|e| StoreError::Request(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl SiteStore for HttpSiteStore {
    async fn fetch_site(&self, site_id: &str) -> Result<StoredSite, StoreError> {
        let response = self
            .http
            .get(self.site_url(site_id))
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(site_id.to_string()));
        }
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status(status.as_u16()));
        }
        response
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    async fn replace_site(
        &self,
        site_id: &str,
        content: &SiteDocument,
        brand: &BrandProfile,
        layout: Layout,
    ) -> Result<StoredSite, StoreError> {
        let body = ReplaceSiteBody {
            content,
            brand,
            layout,
        };
        let response = Self::expect_success(
            self.http.put(self.site_url(site_id)).json(&body).send().await,
        )
        .await?;
        response
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    async fn confirm_slot(
        &self,
        site_id: &str,
        section: &str,
        slot: &str,
        url: &str,
    ) -> Result<(), StoreError> {
        let endpoint = format!("{}/{section}/{slot}", self.site_url(site_id));
        Self::expect_success(
            self.http
                .put(endpoint)
                .json(&serde_json::json!({ "url": url }))
                .send()
                .await,
        )
        .await?;
        Ok(())
    }

    async fn set_embedded_video(&self, site_id: &str, video_url: &str) -> Result<(), StoreError> {
        let endpoint = format!("{}/video-embed", self.site_url(site_id));
        Self::expect_success(
            self.http
                .put(endpoint)
                .json(&serde_json::json!({ "video_url": video_url }))
                .send()
                .await,
        )
        .await?;
        Ok(())
    }

    async fn create_blog_post(&self, site_id: &str, post: &BlogPost) -> Result<(), StoreError> {
        let endpoint = format!("{}/blog-posts", self.site_url(site_id));
        Self::expect_success(self.http.post(endpoint).json(post).send().await).await?;
        Ok(())
    }
}
