//! Runtime configuration
//!
//! Everything comes from the environment (a `.env` file is loaded by `main`
//! before this runs). Timing knobs exist mostly so tests can shrink the
//! debounce and display windows to milliseconds.

use std::time::Duration;

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_ms(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}

/// Timing windows of one edit session.
#[derive(Debug, Clone)]
pub struct SessionTimings {
    /// Trailing-debounce quiet period before an autosave is issued.
    pub save_debounce: Duration,
    /// How long the `Saved` indicator is shown before returning to `Idle`.
    pub saved_display: Duration,
    /// How long a successful instruction report is shown.
    pub report_success_display: Duration,
    /// How long a failed instruction report is shown.
    pub report_failure_display: Duration,
    /// How long a completed image task stays listed.
    pub image_task_display: Duration,
    /// How long a completed video task stays listed.
    pub video_task_display: Duration,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            save_debounce: Duration::from_millis(1500),
            saved_display: Duration::from_millis(2000),
            report_success_display: Duration::from_secs(8),
            report_failure_display: Duration::from_secs(4),
            image_task_display: Duration::from_secs(4),
            video_task_display: Duration::from_millis(5500),
        }
    }
}

impl SessionTimings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            save_debounce: env_ms("STUDIO_SAVE_DEBOUNCE_MS", defaults.save_debounce),
            saved_display: env_ms("STUDIO_SAVED_DISPLAY_MS", defaults.saved_display),
            report_success_display: env_ms(
                "STUDIO_REPORT_SUCCESS_DISPLAY_MS",
                defaults.report_success_display,
            ),
            report_failure_display: env_ms(
                "STUDIO_REPORT_FAILURE_DISPLAY_MS",
                defaults.report_failure_display,
            ),
            image_task_display: env_ms("STUDIO_IMAGE_TASK_DISPLAY_MS", defaults.image_task_display),
            video_task_display: env_ms("STUDIO_VIDEO_TASK_DISPLAY_MS", defaults.video_task_display),
        }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub bind_addr: String,
    pub planner_url: String,
    pub store_url: String,
    pub media_url: String,
    pub preview_base_url: String,
    pub timings: SessionTimings,
}

impl StudioConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_str("STUDIO_BIND_ADDR", "0.0.0.0:8080"),
            planner_url: env_str("PLANNER_URL", "http://localhost:8091"),
            store_url: env_str("SITESTORE_URL", "http://localhost:8092"),
            media_url: env_str("MEDIA_URL", "http://localhost:8093"),
            preview_base_url: env_str("PREVIEW_BASE_URL", "http://localhost:8094/preview"),
            timings: SessionTimings::from_env(),
        }
    }
}
