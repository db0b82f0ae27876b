//! In-memory collaborator doubles for session tests
//!
//! Scripts are consumed front-to-back, one entry per call; an exhausted
//! script falls back to a benign default so unrelated tests stay short.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use site_types::{
    BlogPost, BrandProfile, BusinessContext, Layout, PlannedAction, SiteDocument, StoredSite,
    VideoStyle,
};

use super::{
    Clients, MediaError, MediaService, PlanRequest, Planner, PlannerError, SiteStore, StoreError,
    VideoOutcome,
};

// ============================================================================
// Planner double
// ============================================================================

#[derive(Default)]
pub struct StubPlanner {
    responses: Mutex<VecDeque<Result<Vec<PlannedAction>, PlannerError>>>,
    delay: Mutex<Duration>,
    pub requests: Mutex<Vec<PlanRequest>>,
}

impl StubPlanner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_response(&self, response: Result<Vec<PlannedAction>, PlannerError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Make every plan call take this long before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Planner for StubPlanner {
    async fn plan(&self, request: PlanRequest) -> Result<Vec<PlannedAction>, PlannerError> {
        self.requests.lock().unwrap().push(request);
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

// ============================================================================
// Store double
// ============================================================================

#[derive(Default)]
pub struct MemoryStore {
    sites: Mutex<HashMap<String, StoredSite>>,
    /// Every successful full-document replace, in order.
    pub saves: Mutex<Vec<StoredSite>>,
    save_attempts: AtomicUsize,
    save_delay: Mutex<Duration>,
    fail_saves: AtomicUsize,
    pub slot_confirms: Mutex<Vec<(String, String, String)>>,
    fail_slot_confirms: AtomicUsize,
    pub embeds: Mutex<Vec<(String, String)>>,
    pub blogs: Mutex<Vec<(String, BlogPost)>>,
}

impl MemoryStore {
    pub fn with_site(stored: StoredSite) -> Arc<Self> {
        let store = Self::default();
        store
            .sites
            .lock()
            .unwrap()
            .insert(stored.site_id.clone(), stored);
        Arc::new(store)
    }

    /// Make the next `n` replace calls fail with a 500.
    pub fn fail_next_saves(&self, n: usize) {
        self.fail_saves.store(n, Ordering::SeqCst);
    }

    /// Make every replace call take this long before completing.
    pub fn set_save_delay(&self, delay: Duration) {
        *self.save_delay.lock().unwrap() = delay;
    }

    /// Replace calls issued, successful or not.
    pub fn save_attempts(&self) -> usize {
        self.save_attempts.load(Ordering::SeqCst)
    }

    pub fn fail_next_slot_confirms(&self, n: usize) {
        self.fail_slot_confirms.store(n, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }

    pub fn last_save(&self) -> Option<StoredSite> {
        self.saves.lock().unwrap().last().cloned()
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl SiteStore for MemoryStore {
    async fn fetch_site(&self, site_id: &str) -> Result<StoredSite, StoreError> {
        self.sites
            .lock()
            .unwrap()
            .get(site_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(site_id.to_string()))
    }

    async fn replace_site(
        &self,
        site_id: &str,
        content: &SiteDocument,
        brand: &BrandProfile,
        layout: Layout,
    ) -> Result<StoredSite, StoreError> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        let delay = *self.save_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if Self::take_failure(&self.fail_saves) {
            return Err(StoreError::Status(500));
        }
        let mut sites = self.sites.lock().unwrap();
        let (public_id, business) = sites
            .get(site_id)
            .map(|s| (s.public_id.clone(), s.business.clone()))
            .unwrap_or_else(|| (site_id.to_string(), BusinessContext::default()));
        let stored = StoredSite {
            site_id: site_id.to_string(),
            public_id,
            content: content.clone(),
            brand: brand.clone(),
            layout,
            business,
            updated_at: Utc::now(),
        };
        sites.insert(site_id.to_string(), stored.clone());
        self.saves.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn confirm_slot(
        &self,
        site_id: &str,
        section: &str,
        slot: &str,
        url: &str,
    ) -> Result<(), StoreError> {
        if Self::take_failure(&self.fail_slot_confirms) {
            return Err(StoreError::Status(500));
        }
        self.slot_confirms.lock().unwrap().push((
            site_id.to_string(),
            format!("{section}.{slot}"),
            url.to_string(),
        ));
        Ok(())
    }

    async fn set_embedded_video(&self, site_id: &str, video_url: &str) -> Result<(), StoreError> {
        self.embeds
            .lock()
            .unwrap()
            .push((site_id.to_string(), video_url.to_string()));
        Ok(())
    }

    async fn create_blog_post(&self, site_id: &str, post: &BlogPost) -> Result<(), StoreError> {
        self.blogs
            .lock()
            .unwrap()
            .push((site_id.to_string(), post.clone()));
        Ok(())
    }
}

// ============================================================================
// Media double
// ============================================================================

pub enum ImageScript {
    Succeed { url: String, delay: Duration },
    Fail { delay: Duration },
}

pub enum VideoScript {
    Rendered { url: String, delay: Duration },
    ScriptOnly { message: String, delay: Duration },
    Fail { delay: Duration },
}

#[derive(Default)]
pub struct StubMedia {
    images: Mutex<VecDeque<ImageScript>>,
    videos: Mutex<VecDeque<VideoScript>>,
    pub image_calls: Mutex<Vec<(String, String, String)>>,
    pub video_calls: Mutex<Vec<(String, VideoStyle, String)>>,
}

impl StubMedia {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_image(&self, script: ImageScript) {
        self.images.lock().unwrap().push_back(script);
    }

    pub fn push_video(&self, script: VideoScript) {
        self.videos.lock().unwrap().push_back(script);
    }
}

#[async_trait]
impl MediaService for StubMedia {
    async fn generate_image(
        &self,
        site_id: &str,
        slot: &str,
        prompt: &str,
    ) -> Result<String, MediaError> {
        self.image_calls.lock().unwrap().push((
            site_id.to_string(),
            slot.to_string(),
            prompt.to_string(),
        ));
        let script = self
            .images
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ImageScript::Succeed {
                url: format!("https://cdn.test/{slot}.png"),
                delay: Duration::ZERO,
            });
        match script {
            ImageScript::Succeed { url, delay } => {
                tokio::time::sleep(delay).await;
                Ok(url)
            }
            ImageScript::Fail { delay } => {
                tokio::time::sleep(delay).await;
                Err(MediaError::Status(500))
            }
        }
    }

    async fn generate_video(
        &self,
        site_id: &str,
        style: VideoStyle,
        topic: &str,
        _talking_points: &[String],
    ) -> Result<VideoOutcome, MediaError> {
        self.video_calls.lock().unwrap().push((
            site_id.to_string(),
            style,
            topic.to_string(),
        ));
        let script = self
            .videos
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(VideoScript::Rendered {
                url: format!("https://cdn.test/{style}.mp4"),
                delay: Duration::ZERO,
            });
        match script {
            VideoScript::Rendered { url, delay } => {
                tokio::time::sleep(delay).await;
                Ok(VideoOutcome::Rendered { url })
            }
            VideoScript::ScriptOnly { message, delay } => {
                tokio::time::sleep(delay).await;
                Ok(VideoOutcome::ScriptOnly { message })
            }
            VideoScript::Fail { delay } => {
                tokio::time::sleep(delay).await;
                Err(MediaError::Status(500))
            }
        }
    }
}

/// A full collaborator bundle over the doubles above.
pub fn test_clients(
    planner: Arc<StubPlanner>,
    store: Arc<MemoryStore>,
    media: Arc<StubMedia>,
) -> Clients {
    Clients {
        planner,
        store,
        media,
    }
}
