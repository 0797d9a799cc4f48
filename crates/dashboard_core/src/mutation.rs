use std::sync::Arc;

use shared::protocol::AssignmentOutcome;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    error::DashboardError,
    notify::{NotificationDispatcher, Toast},
    query_binding::QueryBinding,
    AssignmentService,
};

/// Runs bulk auto-assignment against the currently filtered scope and
/// forces the appointment binding to refresh afterwards, so the displayed
/// list reflects whatever the service left behind — including partial
/// application before a failure.
pub struct MutationOrchestrator {
    assignment: Arc<dyn AssignmentService>,
    binding: Arc<QueryBinding>,
    notifier: Arc<dyn NotificationDispatcher>,
    in_flight: Mutex<()>,
}

impl MutationOrchestrator {
    pub fn new(
        assignment: Arc<dyn AssignmentService>,
        binding: Arc<QueryBinding>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            assignment,
            binding,
            notifier,
            in_flight: Mutex::new(()),
        }
    }

    /// At most one run may be outstanding per dashboard instance. A second
    /// invocation while one is in flight is rejected with
    /// [`DashboardError::MutationInFlight`]; nothing is queued.
    pub async fn run_bulk_assign(&self) -> Result<AssignmentOutcome, DashboardError> {
        let Ok(_slot) = self.in_flight.try_lock() else {
            self.notifier.notify(Toast::error(
                "Bulk assignment busy",
                "an assignment run is already in progress",
            ));
            return Err(DashboardError::MutationInFlight);
        };

        let territory = self.binding.filter().await;
        let result = self.assignment.run_assignment(territory.as_ref()).await;

        // Exactly one forced refresh per invocation, on every exit path.
        self.binding.force_refresh().await;

        match result {
            Ok(outcome) => {
                info!(
                    job_id = %outcome.job_id,
                    assigned = outcome.assigned_count,
                    territory = territory.as_ref().map(|t| t.as_str()).unwrap_or("all"),
                    "bulk assignment complete"
                );
                self.notifier.notify(Toast::success(
                    "Bulk Assignment Complete",
                    outcome.message.clone(),
                ));
                Ok(outcome)
            }
            Err(err) => {
                warn!("bulk assignment failed: {err}");
                self.notifier
                    .notify(Toast::error("Bulk assignment failed", err.to_string()));
                Err(DashboardError::service("bulk assignment", err))
            }
        }
    }
}
