//! Clients for the engine's external collaborators
//!
//! The planner, the persistence service, and the media generation services
//! are consumed behind traits so session actors never see HTTP details and
//! tests can substitute in-memory doubles. Errors are `Clone` + `String`
//! payloads because they travel through actor messages and status text.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use site_types::{
    BlogPost, BrandProfile, BusinessContext, Layout, PlannedAction, SiteDocument, StoredSite,
    VideoStyle,
};

pub mod media;
pub mod planner;
pub mod store;

#[cfg(test)]
pub mod testing;

pub use media::HttpMediaService;
pub use planner::HttpPlanner;
pub use store::HttpSiteStore;

// ============================================================================
// Planner
// ============================================================================

/// Request sent to the external action planner for one instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub site_content: SiteDocument,
    pub brand: BrandProfile,
    pub instruction: String,
    pub business: BusinessContext,
}

#[async_trait]
pub trait Planner: Send + Sync {
    /// Expand one free-text instruction into an ordered action list.
    async fn plan(&self, request: PlanRequest) -> Result<Vec<PlannedAction>, PlannerError>;
}

#[derive(Debug, thiserror::Error, Clone)]
pub enum PlannerError {
    #[error("planner request failed: {0}")]
    Request(String),

    #[error("planner returned status {0}")]
    Status(u16),

    #[error("planner response could not be parsed: {0}")]
    Parse(String),
}

// ============================================================================
// Persistence
// ============================================================================

#[async_trait]
pub trait SiteStore: Send + Sync {
    /// Load the persisted record for a site.
    async fn fetch_site(&self, site_id: &str) -> Result<StoredSite, StoreError>;

    /// Full-document replace of {content, brand, layout}. Idempotent; no
    /// partial-update semantics are relied upon.
    async fn replace_site(
        &self,
        site_id: &str,
        content: &SiteDocument,
        brand: &BrandProfile,
        layout: Layout,
    ) -> Result<StoredSite, StoreError>;

    /// Confirm a single media slot write (a completed generation task).
    /// `section` is `images` or `videos`; `slot` is the key within it.
    async fn confirm_slot(
        &self,
        site_id: &str,
        section: &str,
        slot: &str,
        url: &str,
    ) -> Result<(), StoreError>;

    /// Persist a user-supplied embeddable video URL against the business
    /// record. Fire-and-forget from the session's point of view.
    async fn set_embedded_video(&self, site_id: &str, video_url: &str) -> Result<(), StoreError>;

    /// Create a blog post. The result is not read back into the session.
    async fn create_blog_post(&self, site_id: &str, post: &BlogPost) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error, Clone)]
pub enum StoreError {
    #[error("site not found: {0}")]
    NotFound(String),

    #[error("store request failed: {0}")]
    Request(String),

    #[error("store returned status {0}")]
    Status(u16),

    #[error("store response could not be parsed: {0}")]
    Parse(String),
}

// ============================================================================
// Media generation
// ============================================================================

/// What the video service produced: a fully rendered asset, or (when the
/// rendering infrastructure is unavailable) a script-only fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoOutcome {
    Rendered { url: String },
    ScriptOnly { message: String },
}

#[async_trait]
pub trait MediaService: Send + Sync {
    /// Generate an image for a named slot; returns the asset URL.
    async fn generate_image(
        &self,
        site_id: &str,
        slot: &str,
        prompt: &str,
    ) -> Result<String, MediaError>;

    async fn generate_video(
        &self,
        site_id: &str,
        style: VideoStyle,
        topic: &str,
        talking_points: &[String],
    ) -> Result<VideoOutcome, MediaError>;
}

#[derive(Debug, thiserror::Error, Clone)]
pub enum MediaError {
    #[error("media request failed: {0}")]
    Request(String),

    #[error("media service returned status {0}")]
    Status(u16),

    #[error("media response could not be parsed: {0}")]
    Parse(String),
}

// ============================================================================
// Bundle
// ============================================================================

/// The collaborator handles a session actor is spawned with.
#[derive(Clone)]
pub struct Clients {
    pub planner: Arc<dyn Planner>,
    pub store: Arc<dyn SiteStore>,
    pub media: Arc<dyn MediaService>,
}

impl Clients {
    /// Wire up the HTTP clients from service base URLs.
    pub fn http(planner_url: String, store_url: String, media_url: String) -> Self {
        let http = reqwest::Client::new();
        Self {
            planner: Arc::new(HttpPlanner::new(planner_url, http.clone())),
            store: Arc::new(HttpSiteStore::new(store_url, http.clone())),
            media: Arc::new(HttpMediaService::new(media_url, http)),
        }
    }
}
