use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use shared::{
    domain::{AppointmentId, ServiceAppointment, TerritoryId, TerritoryOption},
    protocol::AssignmentOutcome,
};
use tokio::sync::watch;

use crate::{
    error::DashboardError,
    mutation::MutationOrchestrator,
    navigation::{
        render_record_url, LoggingOpener, NavigationTargetResolver, PageReference, RecordOpener,
        RecordUrlResolver,
    },
    notify::{NotificationDispatcher, Toast},
    query_binding::{QueryBinding, TerritoryBinding},
    AppointmentQueryService, AssignmentService,
};

/// Appointment as exposed to the UI: the fetched snapshot plus the
/// derived record link. The link is always attached and always comes from
/// the same template the navigation resolver renders.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayAppointment {
    pub record: ServiceAppointment,
    pub record_url: String,
}

/// Owns all UI-visible dashboard state and sequences the bindings and the
/// mutation orchestrator behind it.
///
/// Every tracked operation runs under a loading guard; the loading flag
/// is the union of outstanding guards and clears on every exit path,
/// panics included.
pub struct DashboardController {
    appointments: Arc<QueryBinding>,
    territories: TerritoryBinding,
    orchestrator: MutationOrchestrator,
    notifier: Arc<dyn NotificationDispatcher>,
    resolver: Arc<dyn NavigationTargetResolver>,
    opener: Arc<dyn RecordOpener>,
    outstanding: AtomicUsize,
    loading_tx: watch::Sender<bool>,
}

impl DashboardController {
    pub fn new(
        query: Arc<dyn AppointmentQueryService>,
        assignment: Arc<dyn AssignmentService>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Arc<Self> {
        Self::new_with_navigation(
            query,
            assignment,
            notifier,
            Arc::new(RecordUrlResolver),
            Arc::new(LoggingOpener),
        )
    }

    pub fn new_with_navigation(
        query: Arc<dyn AppointmentQueryService>,
        assignment: Arc<dyn AssignmentService>,
        notifier: Arc<dyn NotificationDispatcher>,
        resolver: Arc<dyn NavigationTargetResolver>,
        opener: Arc<dyn RecordOpener>,
    ) -> Arc<Self> {
        let appointments = Arc::new(QueryBinding::new(Arc::clone(&query), Arc::clone(&notifier)));
        let territories = TerritoryBinding::new(Arc::clone(&query), Arc::clone(&notifier));
        let orchestrator = MutationOrchestrator::new(
            assignment,
            Arc::clone(&appointments),
            Arc::clone(&notifier),
        );
        let (loading_tx, _) = watch::channel(false);
        Arc::new(Self {
            appointments,
            territories,
            orchestrator,
            notifier,
            resolver,
            opener,
            outstanding: AtomicUsize::new(0),
            loading_tx,
        })
    }

    /// First population: territory options plus the unfiltered list.
    pub async fn load_initial(&self) {
        let _loading = self.begin_loading();
        self.territories.load().await;
        self.appointments.force_refresh().await;
    }

    pub async fn on_filter_change(&self, value: Option<TerritoryId>) {
        let _loading = self.begin_loading();
        self.appointments.set_filter(value).await;
    }

    /// Runs bulk assignment for the current filter. Resolves only after
    /// the mutation and the forced refresh it triggers have both
    /// completed.
    pub async fn on_run_bulk_assign(&self) -> Result<AssignmentOutcome, DashboardError> {
        let _loading = self.begin_loading();
        self.orchestrator.run_bulk_assign().await
    }

    pub async fn on_manual_refresh(&self) {
        let _loading = self.begin_loading();
        self.appointments.force_refresh().await;
        self.territories.force_refresh().await;
    }

    /// Resolves the record's destination and hands it to the opener.
    /// Resolution failures become an error toast, never a propagated
    /// error.
    pub async fn on_open_record(&self, record_id: AppointmentId) {
        let page = PageReference::view(record_id);
        match self.resolver.resolve(&page) {
            Ok(url) => self.opener.open(&url),
            Err(err) => self
                .notifier
                .notify(Toast::error("Navigation failed", err.to_string())),
        }
    }

    pub async fn selected_filter(&self) -> Option<TerritoryId> {
        self.appointments.filter().await
    }

    /// Read-only projection of the current list with record links
    /// attached.
    pub async fn appointments(&self) -> Vec<DisplayAppointment> {
        self.appointments
            .current()
            .await
            .into_iter()
            .map(|record| {
                let record_url = render_record_url(&record.id);
                DisplayAppointment { record, record_url }
            })
            .collect()
    }

    pub async fn has_appointments(&self) -> bool {
        !self.appointments.current().await.is_empty()
    }

    pub async fn territory_options(&self) -> Vec<TerritoryOption> {
        self.territories.current().await
    }

    pub fn is_loading(&self) -> bool {
        self.outstanding.load(Ordering::SeqCst) > 0
    }

    /// Watch mirror of the loading flag so shells can await transitions.
    pub fn loading_watch(&self) -> watch::Receiver<bool> {
        self.loading_tx.subscribe()
    }

    fn begin_loading(&self) -> LoadingGuard<'_> {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        self.publish_loading();
        LoadingGuard { controller: self }
    }

    fn publish_loading(&self) {
        let _ = self
            .loading_tx
            .send_replace(self.outstanding.load(Ordering::SeqCst) > 0);
    }
}

struct LoadingGuard<'a> {
    controller: &'a DashboardController,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.controller.outstanding.fetch_sub(1, Ordering::SeqCst);
        self.controller.publish_loading();
    }
}
