use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{ServiceAppointment, TerritoryId, TerritoryOption},
    error::ServiceFault,
    protocol::{
        AppointmentListResponse, AssignmentOutcome, RunAssignmentRequest, TerritoryListResponse,
    },
};
use url::Url;

use crate::{AppointmentQueryService, AssignmentService};

/// reqwest client for the dispatch service REST API. Implements both the
/// query and the mutation collaborator traits, so one instance can back
/// an entire dashboard.
pub struct DispatchApiClient {
    http: Client,
    base_url: String,
}

impl DispatchApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        Url::parse(&base_url)
            .with_context(|| format!("invalid dispatch service url: {base_url}"))?;
        Ok(Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fault_from(response: reqwest::Response) -> anyhow::Error {
        let status = response.status();
        match response.json::<ServiceFault>().await {
            Ok(fault) => anyhow!(fault),
            Err(_) => anyhow!("dispatch service returned {status}"),
        }
    }
}

#[async_trait]
impl AppointmentQueryService for DispatchApiClient {
    async fn fetch_appointments(
        &self,
        territory: Option<&TerritoryId>,
    ) -> Result<Vec<ServiceAppointment>> {
        let mut request = self.http.get(format!("{}/appointments", self.base_url));
        if let Some(territory) = territory {
            request = request.query(&[("territory_id", territory.as_str())]);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::fault_from(response).await);
        }
        let body: AppointmentListResponse = response.json().await?;
        Ok(body.appointments)
    }

    async fn fetch_territory_options(&self) -> Result<Vec<TerritoryOption>> {
        let response = self
            .http
            .get(format!("{}/territories", self.base_url))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::fault_from(response).await);
        }
        let body: TerritoryListResponse = response.json().await?;
        Ok(body.territories)
    }
}

#[async_trait]
impl AssignmentService for DispatchApiClient {
    async fn run_assignment(
        &self,
        territory: Option<&TerritoryId>,
    ) -> Result<AssignmentOutcome> {
        let response = self
            .http
            .post(format!("{}/assignments/run", self.base_url))
            .json(&RunAssignmentRequest {
                territory_id: territory.cloned(),
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::fault_from(response).await);
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
#[path = "tests/http_client_tests.rs"]
mod tests;
