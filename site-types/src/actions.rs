//! Planner actions
//!
//! One natural-language instruction expands into an ordered list of typed
//! actions. The discriminator is the wire-level `type` field; the engine
//! dispatches over the closed [`ActionKind`] sum exactly once, so adding an
//! action kind is a compile-time change.

use serde::{Deserialize, Serialize};

use crate::brand::BrandProfile;
use crate::document::SiteDocument;

/// One unit of effect returned by the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedAction {
    /// Human-readable one-liner shown to the user after the instruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(flatten)]
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    /// Full replacement of the Content Document, optionally the brand too.
    /// `site_content` is a complete document, not a delta: the engine trusts
    /// it as-is and does not merge.
    ContentEdit {
        site_content: SiteDocument,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        brand: Option<BrandProfile>,
    },
    /// Spawn an image generation task for a named slot.
    ImageGenerating {
        slot: String,
        #[serde(rename = "imagePrompt")]
        image_prompt: String,
    },
    /// Spawn a video generation task.
    VideoGenerating {
        style: VideoStyle,
        topic: String,
        talking_points: Vec<String>,
    },
    /// The user supplied an existing video URL (already normalized to an
    /// embeddable form); persisted fire-and-forget, not a background task.
    VideoEmbed { video_url: String },
    /// Site audit findings, informational only.
    Audit {
        findings: Vec<AuditFinding>,
        overall_score: u8,
        summary: String,
    },
    /// A blog post was authored; persisted fire-and-forget.
    BlogCreated {
        #[serde(flatten)]
        post: BlogPost,
    },
    /// Informational text with no side effect.
    Message { text: String },
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VideoStyle {
    Promo,
    SocialClip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditFinding {
    pub category: String,
    pub severity: AuditSeverity,
    pub title: String,
    pub description: String,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditSeverity {
    Low,
    Medium,
    High,
    Critical,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub meta_description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}
