//! Shared types between the editing engine and its frontend
//!
//! These types cross the HTTP boundary between:
//! - the studio actors (native Rust)
//! - the editing UI
//!
//! Serializable with serde for JSON over HTTP. The Content Document itself
//! stays semi-structured (a JSON object tree) because every field is
//! optional and the planner returns full replacement documents; everything
//! around it is typed.

pub mod actions;
pub mod brand;
pub mod document;
pub mod session;

pub use actions::{ActionKind, AuditFinding, AuditSeverity, BlogPost, PlannedAction, VideoStyle};
pub use brand::{BrandProfile, FontPair, Layout, Palette};
pub use document::{SiteDocument, IMAGES_SECTION, SECTION_KEYS, VIDEOS_SECTION};
pub use session::{
    ActionReport, BackgroundTask, BusinessContext, SaveStatus, SessionSnapshot, StoredSite,
    TaskState, TaskTarget,
};
