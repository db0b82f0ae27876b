//! Action dispatch
//!
//! One instruction = one undo snapshot = one planner round-trip = one
//! ordered action list. The planner call runs in a spawned task; execution
//! of the returned list happens back on the mailbox, strictly in returned
//! order. There is no rollback across actions: once the planner call
//! succeeds every action is executed, and a downstream failure (for
//! example the image service) only fails its own background task.

use chrono::Utc;
use ractor::{ActorRef, RpcReplyPort};
use serde_json::Value;

use site_types::{
    ActionKind, ActionReport, BackgroundTask, PlannedAction, TaskState, TaskTarget, VideoStyle,
    IMAGES_SECTION, VIDEOS_SECTION,
};

use crate::clients::{MediaError, PlanRequest, PlannerError, StoreError, VideoOutcome};

use super::{
    autosave, changeset, push_undo, schedule_cast, PendingInstruction, SessionError, SessionMsg,
    SessionState,
};

// ============================================================================
// Instruction flow
// ============================================================================

pub(super) fn handle_instruct(
    state: &mut SessionState,
    myself: &ActorRef<SessionMsg>,
    instruction: String,
    reply: RpcReplyPort<Result<ActionReport, SessionError>>,
) {
    if state.pending_instruction.is_some() {
        let _ = reply.send(Err(SessionError::InstructionRunning));
        return;
    }

    // Snapshot before the planner is consulted: if nothing comes back the
    // entry is a harmless no-op, and if a multi-field edit comes back one
    // undo reverts all of it.
    push_undo(state);

    let instruction_id = ulid::Ulid::new().to_string();
    state.pending_instruction = Some(PendingInstruction {
        instruction_id: instruction_id.clone(),
        reply,
    });

    let request = PlanRequest {
        site_content: state.content.clone(),
        brand: state.brand.clone(),
        instruction,
        business: state.business.clone(),
    };
    let planner = state.clients.planner.clone();
    let actor = myself.clone();

    tracing::info!(
        site_id = %state.site_id,
        instruction_id = %instruction_id,
        "Instruction sent to planner"
    );
    tokio::spawn(async move {
        let outcome = planner.plan(request).await;
        let _ = actor.cast(SessionMsg::PlanReady {
            instruction_id,
            outcome,
        });
    });
}

pub(super) fn handle_plan_ready(
    state: &mut SessionState,
    myself: &ActorRef<SessionMsg>,
    instruction_id: String,
    outcome: Result<Vec<PlannedAction>, PlannerError>,
) {
    let Some(pending) = state.pending_instruction.take() else {
        return;
    };
    if pending.instruction_id != instruction_id {
        state.pending_instruction = Some(pending);
        return;
    }

    match outcome {
        Err(e) => {
            tracing::warn!(
                site_id = %state.site_id,
                instruction_id = %instruction_id,
                error = %e,
                "Planner call failed; no actions executed"
            );
            let report = ActionReport {
                ok: false,
                summary: "The instruction could not be applied. Nothing was changed.".to_string(),
                changed_sections: Vec::new(),
                finished_at: Utc::now(),
            };
            set_report(state, myself, report);
            let _ = pending.reply.send(Err(SessionError::Planner(e)));
        }
        Ok(actions) => {
            let mut summaries: Vec<String> = Vec::new();
            let mut changed: Vec<String> = Vec::new();
            let count = actions.len();
            for action in actions {
                execute_action(state, myself, action, &mut summaries, &mut changed);
            }
            tracing::info!(
                site_id = %state.site_id,
                instruction_id = %instruction_id,
                actions = count,
                changed = ?changed,
                "Instruction executed"
            );
            let report = ActionReport {
                ok: true,
                summary: summaries.join("\n"),
                changed_sections: changed,
                finished_at: Utc::now(),
            };
            set_report(state, myself, report.clone());
            let _ = pending.reply.send(Ok(report));
        }
    }
}

fn set_report(state: &mut SessionState, myself: &ActorRef<SessionMsg>, report: ActionReport) {
    state.report_epoch += 1;
    let report_epoch = state.report_epoch;
    let window = if report.ok {
        state.timings.report_success_display
    } else {
        state.timings.report_failure_display
    };
    state.report = Some(report);
    schedule_cast(
        myself,
        window,
        SessionMsg::ReportDisplayElapsed { report_epoch },
    );
}

pub(super) fn handle_report_display_elapsed(state: &mut SessionState, report_epoch: u64) {
    if report_epoch == state.report_epoch {
        state.report = None;
    }
}

// ============================================================================
// Action executors
// ============================================================================

fn execute_action(
    state: &mut SessionState,
    myself: &ActorRef<SessionMsg>,
    action: PlannedAction,
    summaries: &mut Vec<String>,
    changed: &mut Vec<String>,
) {
    let PlannedAction { summary, kind } = action;
    match kind {
        ActionKind::ContentEdit { site_content, brand } => {
            // Full replacement; the planner output is trusted as a complete
            // document and never merged.
            let before_content = std::mem::replace(&mut state.content, site_content);
            let before_brand = state.brand.clone();
            if let Some(new_brand) = brand {
                state.brand = new_brand;
            }
            for section in changeset::changed_sections(
                &before_content,
                &state.content,
                &before_brand,
                &state.brand,
            ) {
                if !changed.contains(&section) {
                    changed.push(section);
                }
            }
            autosave::mark_dirty(state, myself);
            summaries.push(summary.unwrap_or_else(|| "Updated the site content".to_string()));
        }
        ActionKind::ImageGenerating { slot, image_prompt } => {
            summaries.push(summary.unwrap_or_else(|| format!("Generating a new {slot} image")));
            spawn_image_task(state, myself, slot, image_prompt);
        }
        ActionKind::VideoGenerating {
            style,
            topic,
            talking_points,
        } => {
            summaries.push(summary.unwrap_or_else(|| format!("Generating a {style} video")));
            spawn_video_task(state, myself, style, topic, talking_points);
        }
        ActionKind::VideoEmbed { video_url } => {
            summaries.push(summary.unwrap_or_else(|| "Embedded your video".to_string()));
            // Fire-and-forget against the business record; the Content
            // Document is untouched. The preview is refreshed once the
            // store accepts it.
            let store = state.clients.store.clone();
            let site_id = state.site_id.clone();
            let actor = myself.clone();
            tokio::spawn(async move {
                match store.set_embedded_video(&site_id, &video_url).await {
                    Ok(()) => {
                        let _ = actor.cast(SessionMsg::InvalidatePreview);
                    }
                    Err(e) => {
                        tracing::warn!(site_id = %site_id, error = %e, "Video embed persistence failed");
                    }
                }
            });
        }
        ActionKind::Audit {
            findings,
            overall_score,
            summary: audit_summary,
        } => {
            summaries.push(summary.unwrap_or_else(|| {
                format!(
                    "Site audit scored {overall_score}/100 with {} findings: {audit_summary}",
                    findings.len()
                )
            }));
        }
        ActionKind::BlogCreated { post } => {
            summaries.push(summary.unwrap_or_else(|| format!("Created blog post \"{}\"", post.title)));
            let store = state.clients.store.clone();
            let site_id = state.site_id.clone();
            tokio::spawn(async move {
                if let Err(e) = store.create_blog_post(&site_id, &post).await {
                    tracing::warn!(site_id = %site_id, error = %e, "Blog post persistence failed");
                }
            });
        }
        ActionKind::Message { text } => {
            summaries.push(text);
        }
    }
}

// ============================================================================
// Background tasks
// ============================================================================

fn spawn_image_task(
    state: &mut SessionState,
    myself: &ActorRef<SessionMsg>,
    slot: String,
    prompt: String,
) {
    let task = BackgroundTask::new(
        TaskTarget::Image { slot: slot.clone() },
        format!("Generating {slot} image..."),
    );
    let task_id = task.task_id.clone();
    state.tasks.insert(task);

    let media = state.clients.media.clone();
    let site_id = state.site_id.clone();
    let actor = myself.clone();
    tokio::spawn(async move {
        let _ = actor.cast(SessionMsg::TaskRunning {
            task_id: task_id.clone(),
        });
        let outcome = media.generate_image(&site_id, &slot, &prompt).await;
        let _ = actor.cast(SessionMsg::ImageTaskFinished { task_id, outcome });
    });
}

fn spawn_video_task(
    state: &mut SessionState,
    myself: &ActorRef<SessionMsg>,
    style: VideoStyle,
    topic: String,
    talking_points: Vec<String>,
) {
    let task = BackgroundTask::new(
        TaskTarget::Video { style },
        format!("Generating {style} video..."),
    );
    let task_id = task.task_id.clone();
    state.tasks.insert(task);

    let media = state.clients.media.clone();
    let site_id = state.site_id.clone();
    let actor = myself.clone();
    tokio::spawn(async move {
        let _ = actor.cast(SessionMsg::TaskRunning {
            task_id: task_id.clone(),
        });
        let outcome = media
            .generate_video(&site_id, style, &topic, &talking_points)
            .await;
        let _ = actor.cast(SessionMsg::VideoTaskFinished { task_id, outcome });
    });
}

pub(super) fn handle_image_finished(
    state: &mut SessionState,
    myself: &ActorRef<SessionMsg>,
    task_id: String,
    outcome: Result<String, MediaError>,
) {
    let Some(TaskTarget::Image { slot }) = state.tasks.target(&task_id) else {
        // Task already expired or the session moved on.
        return;
    };
    match outcome {
        Err(e) => {
            tracing::warn!(
                site_id = %state.site_id,
                slot = %slot,
                error = %e,
                "Image generation failed"
            );
            state.tasks.complete(
                &task_id,
                TaskState::Error,
                format!("Image generation for {slot} failed"),
            );
            schedule_cast(
                myself,
                state.timings.image_task_display,
                SessionMsg::TaskDisplayElapsed { task_id },
            );
        }
        Ok(url) => {
            if !state.tasks.is_latest(&task_id) {
                tracing::info!(
                    site_id = %state.site_id,
                    slot = %slot,
                    "Discarding stale image result; a newer request owns this slot"
                );
                state.tasks.remove(&task_id);
                return;
            }
            state.content = state
                .content
                .set_path(&format!("{IMAGES_SECTION}.{slot}"), Value::String(url.clone()));
            autosave::mark_dirty(state, myself);
            state
                .tasks
                .complete(&task_id, TaskState::Done, format!("New {slot} image is ready"));
            schedule_cast(
                myself,
                state.timings.image_task_display,
                SessionMsg::TaskDisplayElapsed {
                    task_id: task_id.clone(),
                },
            );
            confirm_slot(state, myself, task_id, IMAGES_SECTION, slot, url);
        }
    }
}

pub(super) fn handle_video_finished(
    state: &mut SessionState,
    myself: &ActorRef<SessionMsg>,
    task_id: String,
    outcome: Result<VideoOutcome, MediaError>,
) {
    let Some(TaskTarget::Video { style }) = state.tasks.target(&task_id) else {
        return;
    };
    match outcome {
        Err(e) => {
            tracing::warn!(
                site_id = %state.site_id,
                style = %style,
                error = %e,
                "Video generation failed"
            );
            state.tasks.complete(
                &task_id,
                TaskState::Error,
                format!("Video generation ({style}) failed"),
            );
            schedule_cast(
                myself,
                state.timings.video_task_display,
                SessionMsg::TaskDisplayElapsed { task_id },
            );
        }
        Ok(VideoOutcome::ScriptOnly { message }) => {
            // Rendering infrastructure was unavailable; the task still
            // finishes, but nothing in the document changes.
            state.tasks.complete(&task_id, TaskState::Done, message);
            schedule_cast(
                myself,
                state.timings.video_task_display,
                SessionMsg::TaskDisplayElapsed { task_id },
            );
        }
        Ok(VideoOutcome::Rendered { url }) => {
            if !state.tasks.is_latest(&task_id) {
                tracing::info!(
                    site_id = %state.site_id,
                    style = %style,
                    "Discarding stale video result; a newer request owns this slot"
                );
                state.tasks.remove(&task_id);
                return;
            }
            let slot = style.to_string();
            state.content = state
                .content
                .set_path(&format!("{VIDEOS_SECTION}.{slot}"), Value::String(url.clone()));
            autosave::mark_dirty(state, myself);
            state
                .tasks
                .complete(&task_id, TaskState::Done, format!("Your {style} video is ready"));
            schedule_cast(
                myself,
                state.timings.video_task_display,
                SessionMsg::TaskDisplayElapsed {
                    task_id: task_id.clone(),
                },
            );
            confirm_slot(state, myself, task_id, VIDEOS_SECTION, slot, url);
        }
    }
}

/// Persist one completed slot write, then bump the preview directly (without
/// waiting for the debounced full save) once the store confirms it.
fn confirm_slot(
    state: &SessionState,
    myself: &ActorRef<SessionMsg>,
    task_id: String,
    section: &'static str,
    slot: String,
    url: String,
) {
    let store = state.clients.store.clone();
    let site_id = state.site_id.clone();
    let actor = myself.clone();
    tokio::spawn(async move {
        let outcome = store.confirm_slot(&site_id, section, &slot, &url).await;
        let _ = actor.cast(SessionMsg::SlotConfirmed { task_id, outcome });
    });
}

pub(super) fn handle_slot_confirmed(
    state: &mut SessionState,
    task_id: String,
    outcome: Result<(), StoreError>,
) {
    match outcome {
        Ok(()) => {
            state.preview.invalidate();
        }
        Err(e) => {
            // The in-memory document keeps the new URL; the next debounced
            // full save carries the slot, so only the direct preview bump is
            // skipped.
            tracing::warn!(
                site_id = %state.site_id,
                task_id = %task_id,
                error = %e,
                "Slot confirm failed; deferring to the debounced save"
            );
        }
    }
}

pub(super) fn handle_task_display_elapsed(state: &mut SessionState, task_id: &str) {
    if matches!(
        state.tasks.get(task_id).map(|task| task.state),
        Some(TaskState::Done | TaskState::Error)
    ) {
        state.tasks.remove(task_id);
    }
}
