use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{ServiceAppointment, TerritoryId, TerritoryOption},
    protocol::AssignmentOutcome,
};

pub mod controller;
pub mod error;
pub mod http_client;
pub mod mutation;
pub mod navigation;
pub mod notify;
pub mod query_binding;

pub use controller::{DashboardController, DisplayAppointment};
pub use error::{DashboardError, ResolutionError};
pub use http_client::DispatchApiClient;
pub use mutation::MutationOrchestrator;
pub use navigation::{
    LoggingOpener, NavigationAction, NavigationTargetResolver, PageReference, RecordOpener,
    RecordUrlResolver,
};
pub use notify::{BroadcastNotifier, NotificationDispatcher, Toast, ToastKind, TracingNotifier};
pub use query_binding::{QueryBinding, TerritoryBinding};

/// Read side of the dispatch backend: appointment lists scoped to a
/// territory, and the territory options that populate the filter control.
///
/// `territory = None` means no filter; the service returns appointments
/// across all territories.
#[async_trait]
pub trait AppointmentQueryService: Send + Sync {
    async fn fetch_appointments(
        &self,
        territory: Option<&TerritoryId>,
    ) -> Result<Vec<ServiceAppointment>>;

    async fn fetch_territory_options(&self) -> Result<Vec<TerritoryOption>>;
}

/// Mutation side of the dispatch backend: a bulk auto-assignment run over
/// the given scope. The run may partially apply before failing; callers
/// must re-fetch afterwards regardless of outcome.
#[async_trait]
pub trait AssignmentService: Send + Sync {
    async fn run_assignment(&self, territory: Option<&TerritoryId>)
        -> Result<AssignmentOutcome>;
}

pub struct MissingQueryService;

#[async_trait]
impl AppointmentQueryService for MissingQueryService {
    async fn fetch_appointments(
        &self,
        _territory: Option<&TerritoryId>,
    ) -> Result<Vec<ServiceAppointment>> {
        Err(anyhow!("appointment query service is unavailable"))
    }

    async fn fetch_territory_options(&self) -> Result<Vec<TerritoryOption>> {
        Err(anyhow!("appointment query service is unavailable"))
    }
}

pub struct MissingAssignmentService;

#[async_trait]
impl AssignmentService for MissingAssignmentService {
    async fn run_assignment(
        &self,
        _territory: Option<&TerritoryId>,
    ) -> Result<AssignmentOutcome> {
        Err(anyhow!("assignment service is unavailable"))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
