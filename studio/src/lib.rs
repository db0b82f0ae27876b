//! Siteloom Studio - the content-editing synchronization engine
//!
//! This crate owns the live edit session for a website: direct field edits,
//! natural-language instructions expanded by the external planner, undo,
//! debounced autosave against the persistence service, background media
//! generation, and preview invalidation. One actor per open site serializes
//! every mutation; collaborators run in spawned tasks that message results
//! back into the mailbox.

pub mod actors;
pub mod api;
pub mod app_state;
pub mod clients;
pub mod config;
pub mod preview;
pub mod supervisor;
