//! Studio Supervisor - manages SessionActor instances
//!
//! One SessionActor per open site, with get-or-create semantics keyed by
//! site id. A session is a purely in-memory aggregate: when it stops (clean
//! close or failure) the supervisor only cleans up its tracking; reopening
//! the editor starts a fresh session from the persisted record.

use std::collections::HashMap;

use async_trait::async_trait;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort, SupervisionEvent};
use tracing::{info, warn};

use crate::actors::session::{SessionActor, SessionArguments, SessionMsg};
use crate::clients::Clients;
use crate::config::SessionTimings;

#[derive(Debug, Default)]
pub struct StudioSupervisor;

#[derive(Clone)]
pub struct StudioSupervisorArgs {
    pub clients: Clients,
    pub timings: SessionTimings,
    pub preview_base_url: String,
}

pub struct StudioSupervisorState {
    sessions: HashMap<String, ActorRef<SessionMsg>>,
    clients: Clients,
    timings: SessionTimings,
    preview_base_url: String,
}

#[derive(Debug)]
pub enum StudioSupervisorMsg {
    /// Get the open session for a site, starting one if needed.
    GetOrCreateSession {
        site_id: String,
        reply: RpcReplyPort<Result<ActorRef<SessionMsg>, SupervisorError>>,
    },
    /// Close (discard) the session for a site. Replies `false` when no
    /// session was open.
    CloseSession {
        site_id: String,
        reply: RpcReplyPort<bool>,
    },
}

#[derive(Debug, thiserror::Error, Clone)]
pub enum SupervisorError {
    #[error("session could not be started: {0}")]
    SessionStart(String),
}

impl StudioSupervisor {
    fn forget_actor(state: &mut StudioSupervisorState, actor_id: ractor::ActorId) {
        if let Some(site_id) = state
            .sessions
            .iter()
            .find(|(_, session)| session.get_id() == actor_id)
            .map(|(site_id, _)| site_id.clone())
        {
            state.sessions.remove(&site_id);
            info!(site_id = %site_id, "Session tracking cleaned up");
        }
    }
}

#[async_trait]
impl Actor for StudioSupervisor {
    type Msg = StudioSupervisorMsg;
    type State = StudioSupervisorState;
    type Arguments = StudioSupervisorArgs;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        info!(supervisor = %myself.get_id(), "StudioSupervisor starting");
        Ok(StudioSupervisorState {
            sessions: HashMap::new(),
            clients: args.clients,
            timings: args.timings,
            preview_base_url: args.preview_base_url,
        })
    }

    async fn handle_supervisor_evt(
        &self,
        myself: ActorRef<Self::Msg>,
        event: SupervisionEvent,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match event {
            SupervisionEvent::ActorStarted(cell) => {
                info!(supervisor = %myself.get_id(), child = %cell.get_id(), "Session started");
            }
            SupervisionEvent::ActorFailed(cell, error) => {
                // A failed session is not restarted: its state was in-memory
                // only, and the editor reopens from the persisted record.
                warn!(child = %cell.get_id(), error = %error, "Session failed");
                Self::forget_actor(state, cell.get_id());
            }
            SupervisionEvent::ActorTerminated(cell, _, reason) => {
                info!(child = %cell.get_id(), reason = ?reason, "Session terminated");
                Self::forget_actor(state, cell.get_id());
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            StudioSupervisorMsg::GetOrCreateSession { site_id, reply } => {
                if let Some(session) = state.sessions.get(&site_id) {
                    let _ = reply.send(Ok(session.clone()));
                    return Ok(());
                }

                // Unnamed on purpose: identity lives in the sessions map, and
                // a close-then-reopen must never trip over a stale registry
                // name while the old actor is still winding down.
                let spawn_result = Actor::spawn_linked(
                    None,
                    SessionActor,
                    SessionArguments {
                        site_id: site_id.clone(),
                        clients: state.clients.clone(),
                        timings: state.timings.clone(),
                        preview_base_url: state.preview_base_url.clone(),
                    },
                    myself.get_cell(),
                )
                .await;

                match spawn_result {
                    Ok((session, _)) => {
                        state.sessions.insert(site_id, session.clone());
                        let _ = reply.send(Ok(session));
                    }
                    Err(e) => {
                        warn!(site_id = %site_id, error = %e, "Session failed to start");
                        let _ = reply.send(Err(SupervisorError::SessionStart(e.to_string())));
                    }
                }
            }
            StudioSupervisorMsg::CloseSession { site_id, reply } => {
                match state.sessions.remove(&site_id) {
                    Some(session) => {
                        // Discard, never persist: outstanding work is
                        // abandoned along with the mailbox.
                        session.stop(Some("session closed".to_string()));
                        info!(site_id = %site_id, "Session closed");
                        let _ = reply.send(true);
                    }
                    None => {
                        let _ = reply.send(false);
                    }
                }
            }
        }
        Ok(())
    }
}
