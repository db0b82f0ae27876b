//! SessionActor - the live edit session for one website
//!
//! Owns the editable state (document, brand, layout), the undo history, the
//! autosave pipeline, the planner dispatch, and the background media tasks.
//! The actor mailbox serializes every mutation, so each snapshot-then-apply
//! pair is atomic with respect to the others; everything slow (debounce
//! sleeps, the planner round-trip, media generation, persistence) runs in
//! spawned tasks that cast typed messages back here. Each of those messages
//! carries the identity it was created under (revision, epoch, task id), so
//! a late arrival that no longer matches the session's state is dropped
//! instead of clobbering newer work.

mod autosave;
mod changeset;
mod dispatch;
mod tasks;
mod undo;


use std::time::Duration;

use async_trait::async_trait;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use serde_json::Value;

use site_types::{
    ActionReport, BrandProfile, BusinessContext, Layout, PlannedAction, SaveStatus,
    SessionSnapshot, SiteDocument, StoredSite,
};

use crate::clients::{Clients, MediaError, PlannerError, StoreError, VideoOutcome};
use crate::config::SessionTimings;
use crate::preview::PreviewHandle;

use tasks::TaskRegistry;
use undo::{Snapshot, UndoStack};

pub use undo::UNDO_LIMIT;

/// Actor managing one edit session.
#[derive(Debug, Default)]
pub struct SessionActor;

/// Arguments for spawning a SessionActor.
#[derive(Clone)]
pub struct SessionArguments {
    pub site_id: String,
    pub clients: Clients,
    pub timings: SessionTimings,
    pub preview_base_url: String,
}

/// In-flight instruction: the reply port is parked here while the planner
/// call runs so the mailbox stays free for further edits.
struct PendingInstruction {
    instruction_id: String,
    reply: RpcReplyPort<Result<ActionReport, SessionError>>,
}

pub struct SessionState {
    site_id: String,
    business: BusinessContext,
    content: SiteDocument,
    brand: BrandProfile,
    layout: Layout,
    /// Last record confirmed by the persistence service.
    persisted: StoredSite,
    dirty: bool,
    save_status: SaveStatus,
    undo: UndoStack,
    tasks: TaskRegistry,
    report: Option<ActionReport>,
    report_epoch: u64,
    preview: PreviewHandle,
    /// Bumped on every mutation; save completions compare against it.
    revision: u64,
    /// Bumped on every debounce restart; stale ticks are dropped.
    debounce_epoch: u64,
    save_in_flight: bool,
    /// Guards the Saved -> Idle display expiry.
    status_epoch: u64,
    pending_instruction: Option<PendingInstruction>,
    clients: Clients,
    timings: SessionTimings,
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug)]
pub enum SessionMsg {
    /// Full session snapshot for the editor.
    GetSnapshot {
        reply: RpcReplyPort<SessionSnapshot>,
    },
    /// Direct field edit on the Content Document via a dotted key path.
    EditContentField {
        path: String,
        value: Value,
        reply: RpcReplyPort<()>,
    },
    /// Brand field edit through the same path machinery.
    EditBrandField {
        path: String,
        value: Value,
        reply: RpcReplyPort<Result<(), SessionError>>,
    },
    /// Switch the website template.
    SetLayout {
        layout: Layout,
        reply: RpcReplyPort<()>,
    },
    /// Pop the undo stack; replies `false` when there was nothing to undo.
    Undo { reply: RpcReplyPort<bool> },
    /// Run one natural-language instruction through the planner.
    Instruct {
        instruction: String,
        reply: RpcReplyPort<Result<ActionReport, SessionError>>,
    },
    /// Manual preview refresh; replies with the fresh URL.
    RefreshPreview { reply: RpcReplyPort<String> },

    // Internal: results and timers cast back from spawned tasks.
    PlanReady {
        instruction_id: String,
        outcome: Result<Vec<PlannedAction>, PlannerError>,
    },
    SaveTick {
        epoch: u64,
    },
    SaveFinished {
        revision: u64,
        outcome: Result<StoredSite, StoreError>,
    },
    SavedDisplayElapsed {
        status_epoch: u64,
    },
    ReportDisplayElapsed {
        report_epoch: u64,
    },
    TaskRunning {
        task_id: String,
    },
    ImageTaskFinished {
        task_id: String,
        outcome: Result<String, MediaError>,
    },
    VideoTaskFinished {
        task_id: String,
        outcome: Result<VideoOutcome, MediaError>,
    },
    SlotConfirmed {
        task_id: String,
        outcome: Result<(), StoreError>,
    },
    TaskDisplayElapsed {
        task_id: String,
    },
    InvalidatePreview,
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("an instruction is already running for this session")]
    InstructionRunning,

    #[error("planner failed: {0}")]
    Planner(#[from] PlannerError),

    #[error("brand field rejected: {0}")]
    BrandField(String),
}

// ============================================================================
// Actor Implementation
// ============================================================================

#[async_trait]
impl Actor for SessionActor {
    type Msg = SessionMsg;
    type State = SessionState;
    type Arguments = SessionArguments;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!(
            actor_id = %myself.get_id(),
            site_id = %args.site_id,
            "SessionActor starting"
        );

        // The persisted record is the source of truth between sessions.
        let stored = args
            .clients
            .store
            .fetch_site(&args.site_id)
            .await
            .map_err(ActorProcessingErr::from)?;

        let preview = PreviewHandle::new(&args.preview_base_url, &stored.public_id);

        Ok(SessionState {
            site_id: args.site_id,
            business: stored.business.clone(),
            content: stored.content.clone(),
            brand: stored.brand.clone(),
            layout: stored.layout,
            persisted: stored,
            dirty: false,
            save_status: SaveStatus::Idle,
            undo: UndoStack::default(),
            tasks: TaskRegistry::default(),
            report: None,
            report_epoch: 0,
            preview,
            revision: 0,
            debounce_epoch: 0,
            save_in_flight: false,
            status_epoch: 0,
            pending_instruction: None,
            clients: args.clients,
            timings: args.timings,
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            SessionMsg::GetSnapshot { reply } => {
                let _ = reply.send(snapshot(state));
            }
            SessionMsg::EditContentField { path, value, reply } => {
                handle_edit_content(state, &myself, &path, value);
                let _ = reply.send(());
            }
            SessionMsg::EditBrandField { path, value, reply } => {
                let _ = reply.send(handle_edit_brand(state, &myself, &path, value));
            }
            SessionMsg::SetLayout { layout, reply } => {
                handle_set_layout(state, &myself, layout);
                let _ = reply.send(());
            }
            SessionMsg::Undo { reply } => {
                let _ = reply.send(handle_undo(state, &myself));
            }
            SessionMsg::Instruct { instruction, reply } => {
                dispatch::handle_instruct(state, &myself, instruction, reply);
            }
            SessionMsg::RefreshPreview { reply } => {
                state.preview.invalidate();
                let _ = reply.send(state.preview.url());
            }
            SessionMsg::PlanReady {
                instruction_id,
                outcome,
            } => {
                dispatch::handle_plan_ready(state, &myself, instruction_id, outcome);
            }
            SessionMsg::SaveTick { epoch } => {
                autosave::handle_save_tick(state, &myself, epoch);
            }
            SessionMsg::SaveFinished { revision, outcome } => {
                autosave::handle_save_finished(state, &myself, revision, outcome);
            }
            SessionMsg::SavedDisplayElapsed { status_epoch } => {
                autosave::handle_saved_display_elapsed(state, status_epoch);
            }
            SessionMsg::ReportDisplayElapsed { report_epoch } => {
                dispatch::handle_report_display_elapsed(state, report_epoch);
            }
            SessionMsg::TaskRunning { task_id } => {
                state.tasks.mark_generating(&task_id);
            }
            SessionMsg::ImageTaskFinished { task_id, outcome } => {
                dispatch::handle_image_finished(state, &myself, task_id, outcome);
            }
            SessionMsg::VideoTaskFinished { task_id, outcome } => {
                dispatch::handle_video_finished(state, &myself, task_id, outcome);
            }
            SessionMsg::SlotConfirmed { task_id, outcome } => {
                dispatch::handle_slot_confirmed(state, task_id, outcome);
            }
            SessionMsg::TaskDisplayElapsed { task_id } => {
                dispatch::handle_task_display_elapsed(state, &task_id);
            }
            SessionMsg::InvalidatePreview => {
                state.preview.invalidate();
            }
        }
        Ok(())
    }

    async fn post_stop(
        &self,
        myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        // Outstanding saves and generation tasks are abandoned here: their
        // completion casts land in a dead mailbox and are dropped.
        tracing::info!(
            actor_id = %myself.get_id(),
            site_id = %state.site_id,
            open_tasks = state.tasks.len(),
            "SessionActor stopped; session state discarded"
        );
        Ok(())
    }
}

// ============================================================================
// Direct edits
// ============================================================================

/// Capture the pre-mutation state. Every producer of a new document/brand/
/// layout calls this first, so undo is never bypassed.
fn push_undo(state: &mut SessionState) {
    state.undo.push(Snapshot {
        content: state.content.clone(),
        brand: state.brand.clone(),
        layout: state.layout,
    });
}

fn handle_edit_content(
    state: &mut SessionState,
    myself: &ActorRef<SessionMsg>,
    path: &str,
    value: Value,
) {
    push_undo(state);
    state.content = state.content.set_path(path, value);
    autosave::mark_dirty(state, myself);
}

fn handle_edit_brand(
    state: &mut SessionState,
    myself: &ActorRef<SessionMsg>,
    path: &str,
    value: Value,
) -> Result<(), SessionError> {
    // The brand is typed, so route the path edit through a JSON detour and
    // reject values that do not fit the profile shape.
    let brand_value =
        serde_json::to_value(&state.brand).map_err(|e| SessionError::BrandField(e.to_string()))?;
    let Value::Object(map) = brand_value else {
        return Err(SessionError::BrandField("brand is not a record".to_string()));
    };
    let edited = SiteDocument(map).set_path(path, value);
    let new_brand: BrandProfile = serde_json::from_value(edited.to_value())
        .map_err(|e| SessionError::BrandField(e.to_string()))?;

    push_undo(state);
    state.brand = new_brand;
    autosave::mark_dirty(state, myself);
    Ok(())
}

fn handle_set_layout(state: &mut SessionState, myself: &ActorRef<SessionMsg>, layout: Layout) {
    if layout == state.layout {
        return;
    }
    push_undo(state);
    state.layout = layout;
    autosave::mark_dirty(state, myself);
}

fn handle_undo(state: &mut SessionState, myself: &ActorRef<SessionMsg>) -> bool {
    let Some(snapshot) = state.undo.pop() else {
        return false;
    };
    state.content = snapshot.content;
    state.brand = snapshot.brand;
    state.layout = snapshot.layout;
    // The reverted state must reach the store too.
    autosave::mark_dirty(state, myself);
    true
}

fn snapshot(state: &SessionState) -> SessionSnapshot {
    SessionSnapshot {
        site_id: state.site_id.clone(),
        content: state.content.clone(),
        brand: state.brand.clone(),
        layout: state.layout,
        dirty: state.dirty,
        save_status: state.save_status,
        last_saved_at: state.persisted.updated_at,
        undo_depth: state.undo.depth(),
        tasks: state.tasks.all(),
        report: state.report.clone(),
        preview_url: state.preview.url(),
    }
}

/// Cast `msg` back into the mailbox after `delay`. The sleep lives in its
/// own task so the mailbox never blocks; the receiver is responsible for
/// checking whatever epoch or id the message carries.
fn schedule_cast(myself: &ActorRef<SessionMsg>, delay: Duration, msg: SessionMsg) {
    let actor = myself.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = actor.cast(msg);
    });
}
