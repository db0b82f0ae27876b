//! Autosave pipeline
//!
//! Trailing debounce over mutations, one save in flight at a time, always a
//! full-document replace. Status machine:
//! `Idle -> Dirty -> Saving -> Saved -> Idle`, with `Saving -> Error` sticky
//! until the next mutation. A mutation during `Saving` does not cancel the
//! in-flight request; the dirty flag and a re-armed debounce guarantee a
//! fresh cycle afterwards.

use ractor::ActorRef;

use site_types::{SaveStatus, StoredSite};

use crate::clients::StoreError;

use super::{schedule_cast, SessionMsg, SessionState};

/// Record a mutation: bump the revision, flip the status, restart the
/// debounce window.
pub(super) fn mark_dirty(state: &mut SessionState, myself: &ActorRef<SessionMsg>) {
    state.dirty = true;
    state.revision += 1;
    if state.save_status != SaveStatus::Saving {
        state.save_status = SaveStatus::Dirty;
    }
    restart_debounce(state, myself);
}

fn restart_debounce(state: &mut SessionState, myself: &ActorRef<SessionMsg>) {
    state.debounce_epoch += 1;
    let epoch = state.debounce_epoch;
    schedule_cast(
        myself,
        state.timings.save_debounce,
        SessionMsg::SaveTick { epoch },
    );
}

pub(super) fn handle_save_tick(state: &mut SessionState, myself: &ActorRef<SessionMsg>, epoch: u64) {
    if epoch != state.debounce_epoch {
        // A later mutation restarted the window; this tick is obsolete.
        return;
    }
    if state.save_in_flight || !state.dirty {
        return;
    }
    begin_save(state, myself);
}

fn begin_save(state: &mut SessionState, myself: &ActorRef<SessionMsg>) {
    state.save_in_flight = true;
    state.save_status = SaveStatus::Saving;

    let revision = state.revision;
    let store = state.clients.store.clone();
    let site_id = state.site_id.clone();
    let content = state.content.clone();
    let brand = state.brand.clone();
    let layout = state.layout;
    let actor = myself.clone();

    tracing::debug!(site_id = %site_id, revision, "Autosave starting");
    tokio::spawn(async move {
        let outcome = store.replace_site(&site_id, &content, &brand, layout).await;
        let _ = actor.cast(SessionMsg::SaveFinished { revision, outcome });
    });
}

pub(super) fn handle_save_finished(
    state: &mut SessionState,
    myself: &ActorRef<SessionMsg>,
    revision: u64,
    outcome: Result<StoredSite, StoreError>,
) {
    state.save_in_flight = false;
    match outcome {
        Ok(stored) => {
            // Refresh the persisted view and the preview regardless of
            // whether further edits arrived while the request was in flight.
            state.persisted = stored;
            state.preview.invalidate();

            if state.revision == revision {
                state.dirty = false;
                state.save_status = SaveStatus::Saved;
                state.status_epoch += 1;
                let status_epoch = state.status_epoch;
                schedule_cast(
                    myself,
                    state.timings.saved_display,
                    SessionMsg::SavedDisplayElapsed { status_epoch },
                );
                tracing::debug!(site_id = %state.site_id, revision, "Autosave complete");
            } else {
                // The document on the wire was already stale; run another
                // cycle for the newest revision.
                state.save_status = SaveStatus::Dirty;
                restart_debounce(state, myself);
            }
        }
        Err(e) => {
            tracing::warn!(
                site_id = %state.site_id,
                revision,
                error = %e,
                "Autosave failed; keeping local edits"
            );
            state.save_status = SaveStatus::Error;
            if state.revision != revision {
                // Edits landed during the failed attempt; retry them after a
                // fresh quiet period instead of waiting for the next edit.
                restart_debounce(state, myself);
            }
        }
    }
}

pub(super) fn handle_saved_display_elapsed(state: &mut SessionState, status_epoch: u64) {
    if status_epoch == state.status_epoch && state.save_status == SaveStatus::Saved {
        state.save_status = SaveStatus::Idle;
    }
}
