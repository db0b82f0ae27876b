//! Edit-session surface types
//!
//! What the engine reports to its caller: save status, background tasks,
//! the post-instruction action report, and the full session snapshot the
//! editor renders from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::actions::VideoStyle;
use crate::brand::{BrandProfile, Layout};
use crate::document::SiteDocument;

/// Autosave status, surfaced as a small indicator in the editor.
///
/// `Idle -> Dirty` on any mutation, `Dirty -> Saving` when the debounce
/// window closes, `Saving -> Saved -> Idle` on success (Saved is held for a
/// short display period), `Saving -> Error` on persistence failure (sticky
/// until the next mutation).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    #[default]
    Idle,
    Dirty,
    Saving,
    Saved,
    Error,
}

/// Lifecycle of one background media-generation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Queued,
    Generating,
    Done,
    Error,
}

/// What a background task will write when it completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskTarget {
    Image { slot: String },
    Video { style: VideoStyle },
}

impl TaskTarget {
    /// The slot key this task writes under its section (`images.<slot>` or
    /// `videos.<style>`).
    pub fn slot_key(&self) -> String {
        match self {
            TaskTarget::Image { slot } => slot.clone(),
            TaskTarget::Video { style } => style.to_string(),
        }
    }
}

/// One outstanding media-generation request, owned by the edit session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundTask {
    pub task_id: String,
    pub target: TaskTarget,
    pub state: TaskState,
    /// Human-readable status line ("Generating hero image...").
    pub status_text: String,
    pub created_at: DateTime<Utc>,
}

impl BackgroundTask {
    pub fn new(target: TaskTarget, status_text: impl Into<String>) -> Self {
        Self {
            task_id: ulid::Ulid::new().to_string(),
            target,
            state: TaskState::Queued,
            status_text: status_text.into(),
            created_at: Utc::now(),
        }
    }
}

/// Transient report shown after an instruction finishes its synchronous
/// part. Cleared after a display window (longer on success than failure).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionReport {
    pub ok: bool,
    /// Concatenated per-action summaries.
    pub summary: String,
    /// Top-level sections whose value changed (plus `"brand"` as one unit).
    pub changed_sections: Vec<String>,
    pub finished_at: DateTime<Utc>,
}

/// The persisted record, the source of truth between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSite {
    pub site_id: String,
    /// Public identifier the preview surface is keyed by.
    pub public_id: String,
    #[serde(default)]
    pub content: SiteDocument,
    #[serde(default)]
    pub brand: BrandProfile,
    #[serde(default)]
    pub layout: Layout,
    /// Business facts used when talking to the planner.
    #[serde(default)]
    pub business: BusinessContext,
    pub updated_at: DateTime<Utc>,
}

/// Business facts handed to the planner alongside the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessContext {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Everything the editor needs to render one open session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub site_id: String,
    pub content: SiteDocument,
    pub brand: BrandProfile,
    pub layout: Layout,
    pub dirty: bool,
    pub save_status: SaveStatus,
    /// When the persistence service last confirmed a write.
    pub last_saved_at: DateTime<Utc>,
    pub undo_depth: usize,
    pub tasks: Vec<BackgroundTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ActionReport>,
    pub preview_url: String,
}
