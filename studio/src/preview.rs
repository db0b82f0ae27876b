//! Preview Synchronizer
//!
//! The live preview surface is addressed by the site's public identifier
//! and must never serve a stale cached render, so every invalidation bumps
//! a cache-busting query value derived from the current time.

use chrono::Utc;

#[derive(Debug, Clone)]
pub struct PreviewHandle {
    base_url: String,
    public_id: String,
    cache_bust: i64,
}

impl PreviewHandle {
    pub fn new(base_url: &str, public_id: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            public_id: public_id.to_string(),
            cache_bust: Utc::now().timestamp_millis(),
        }
    }

    /// Bump the cache-busting value. The query value must actually change on
    /// every call, so two invalidations within the same millisecond still
    /// produce distinct URLs.
    pub fn invalidate(&mut self) {
        let now = Utc::now().timestamp_millis();
        self.cache_bust = now.max(self.cache_bust + 1);
    }

    /// Current address of the preview surface.
    pub fn url(&self) -> String {
        format!(
            "{}/{}?t={}",
            self.base_url, self.public_id, self.cache_bust
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_carries_public_id_and_cache_bust() {
        let preview = PreviewHandle::new("http://preview.test/", "sunrise-bakery");
        let url = preview.url();
        assert!(url.starts_with("http://preview.test/sunrise-bakery?t="));
    }

    #[test]
    fn invalidate_always_changes_the_url() {
        let mut preview = PreviewHandle::new("http://preview.test", "sunrise-bakery");
        let before = preview.url();
        preview.invalidate();
        let after = preview.url();
        assert_ne!(before, after);

        // Even back-to-back invalidations in the same millisecond differ.
        preview.invalidate();
        assert_ne!(after, preview.url());
    }
}
