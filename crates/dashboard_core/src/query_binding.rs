use std::sync::Arc;

use shared::domain::{ServiceAppointment, TerritoryId, TerritoryOption};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    notify::{NotificationDispatcher, Toast},
    AppointmentQueryService,
};

struct BindingState {
    filter: Option<TerritoryId>,
    appointments: Vec<ServiceAppointment>,
    /// Sequence number of the most recently issued fetch. A response is
    /// applied only while its own sequence is still the newest one, which
    /// gives last-request-wins ordering independent of arrival order.
    issued_seq: u64,
    /// Bumped every time a response actually replaces the list.
    generation: u64,
}

/// Binds the territory filter to the appointment query and keeps the
/// latest successful result.
///
/// Concurrent `set_filter`/`force_refresh` calls may interleave at the
/// service-call boundary; whichever fetch was issued last is the only one
/// whose response is applied. Superseded responses are discarded, which
/// stands in for cancellation of the abandoned fetch.
pub struct QueryBinding {
    query: Arc<dyn AppointmentQueryService>,
    notifier: Arc<dyn NotificationDispatcher>,
    state: Mutex<BindingState>,
}

impl QueryBinding {
    pub fn new(
        query: Arc<dyn AppointmentQueryService>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            query,
            notifier,
            state: Mutex::new(BindingState {
                filter: None,
                appointments: Vec::new(),
                issued_seq: 0,
                generation: 0,
            }),
        }
    }

    /// Updates the bound filter and fetches the list for it. Setting the
    /// value the binding already holds is a no-op.
    ///
    /// Fetch failures are surfaced as an error toast; the previous list
    /// stays visible.
    pub async fn set_filter(&self, value: Option<TerritoryId>) {
        let seq = {
            let mut state = self.state.lock().await;
            if state.filter == value {
                return;
            }
            state.filter = value.clone();
            state.issued_seq += 1;
            state.issued_seq
        };
        self.run_fetch(seq, value).await;
    }

    /// Re-issues the fetch for the current filter and resolves once the
    /// response has been applied, discarded, or failed.
    pub async fn force_refresh(&self) {
        let (seq, filter) = {
            let mut state = self.state.lock().await;
            state.issued_seq += 1;
            (state.issued_seq, state.filter.clone())
        };
        self.run_fetch(seq, filter).await;
    }

    /// Latest applied list; empty before the first successful fetch.
    pub async fn current(&self) -> Vec<ServiceAppointment> {
        self.state.lock().await.appointments.clone()
    }

    pub async fn filter(&self) -> Option<TerritoryId> {
        self.state.lock().await.filter.clone()
    }

    /// How many times a response has replaced the list. Lets callers
    /// observe that a refresh actually landed.
    pub async fn generation(&self) -> u64 {
        self.state.lock().await.generation
    }

    async fn run_fetch(&self, seq: u64, filter: Option<TerritoryId>) {
        match self.query.fetch_appointments(filter.as_ref()).await {
            Ok(appointments) => {
                let mut state = self.state.lock().await;
                if seq < state.issued_seq {
                    debug!(
                        seq,
                        newest = state.issued_seq,
                        "discarding superseded appointment response"
                    );
                    return;
                }
                state.appointments = appointments;
                state.generation += 1;
            }
            Err(err) => {
                let superseded = {
                    let state = self.state.lock().await;
                    seq < state.issued_seq
                };
                if superseded {
                    debug!(seq, "ignoring failure of superseded appointment fetch");
                    return;
                }
                self.notifier.notify(Toast::error(
                    "Failed to load appointments",
                    err.to_string(),
                ));
            }
        }
    }
}

/// Parameterless sibling of [`QueryBinding`] for the territory options
/// behind the filter control. Loaded once and refreshed only on explicit
/// request; filter changes never touch it.
pub struct TerritoryBinding {
    query: Arc<dyn AppointmentQueryService>,
    notifier: Arc<dyn NotificationDispatcher>,
    state: Mutex<TerritoryState>,
}

struct TerritoryState {
    options: Vec<TerritoryOption>,
    issued_seq: u64,
}

impl TerritoryBinding {
    pub fn new(
        query: Arc<dyn AppointmentQueryService>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            query,
            notifier,
            state: Mutex::new(TerritoryState {
                options: Vec::new(),
                issued_seq: 0,
            }),
        }
    }

    /// Initial population of the filter control.
    pub async fn load(&self) {
        self.force_refresh().await;
    }

    pub async fn force_refresh(&self) {
        let seq = {
            let mut state = self.state.lock().await;
            state.issued_seq += 1;
            state.issued_seq
        };
        match self.query.fetch_territory_options().await {
            Ok(options) => {
                let mut state = self.state.lock().await;
                if seq < state.issued_seq {
                    debug!(seq, "discarding superseded territory response");
                    return;
                }
                state.options = options;
            }
            Err(err) => {
                self.notifier
                    .notify(Toast::error("Failed to load territories", err.to_string()));
            }
        }
    }

    pub async fn current(&self) -> Vec<TerritoryOption> {
        self.state.lock().await.options.clone()
    }
}
