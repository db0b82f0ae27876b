//! HTTP client for the external action planner

use async_trait::async_trait;
use serde::Deserialize;

use site_types::PlannedAction;

use super::{PlanRequest, Planner, PlannerError};

pub struct HttpPlanner {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct PlanResponse {
    actions: Vec<PlannedAction>,
}

impl HttpPlanner {
    pub fn new(base_url: String, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }
}

#[async_trait]
impl Planner for HttpPlanner {
    async fn plan(&self, request: PlanRequest) -> Result<Vec<PlannedAction>, PlannerError> {
        let url = format!("{}/plan", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PlannerError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlannerError::Status(status.as_u16()));
        }

        let body: PlanResponse = response
            .json()
            .await
            .map_err(|e| PlannerError::Parse(e.to_string()))?;
        Ok(body.actions)
    }
}
