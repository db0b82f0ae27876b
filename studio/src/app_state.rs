use ractor::{Actor, ActorRef};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::actors::session::SessionMsg;
use crate::clients::Clients;
use crate::config::StudioConfig;
use crate::supervisor::{StudioSupervisor, StudioSupervisorArgs, StudioSupervisorMsg};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    clients: Clients,
    config: StudioConfig,
    supervisor: Mutex<Option<ActorRef<StudioSupervisorMsg>>>,
}

impl AppState {
    pub fn new(clients: Clients, config: StudioConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                clients,
                config,
                supervisor: Mutex::new(None),
            }),
        }
    }

    pub async fn ensure_supervisor(&self) -> Result<ActorRef<StudioSupervisorMsg>, String> {
        let mut guard = self.inner.supervisor.lock().await;
        if let Some(supervisor) = guard.as_ref() {
            return Ok(supervisor.clone());
        }

        let (supervisor, _) = Actor::spawn(
            Some(format!("studio_supervisor:{}", ulid::Ulid::new())),
            StudioSupervisor,
            StudioSupervisorArgs {
                clients: self.inner.clients.clone(),
                timings: self.inner.config.timings.clone(),
                preview_base_url: self.inner.config.preview_base_url.clone(),
            },
        )
        .await
        .map_err(|e| e.to_string())?;

        *guard = Some(supervisor.clone());
        Ok(supervisor)
    }

    pub async fn get_or_create_session(
        &self,
        site_id: String,
    ) -> Result<ActorRef<SessionMsg>, String> {
        let supervisor = self.ensure_supervisor().await?;
        ractor::call!(supervisor, |reply| {
            StudioSupervisorMsg::GetOrCreateSession { site_id, reply }
        })
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())
    }

    pub async fn close_session(&self, site_id: String) -> Result<bool, String> {
        let supervisor = self.ensure_supervisor().await?;
        ractor::call!(supervisor, |reply| StudioSupervisorMsg::CloseSession {
            site_id,
            reply
        })
        .map_err(|e| e.to_string())
    }
}
