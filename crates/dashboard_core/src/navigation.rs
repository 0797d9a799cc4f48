use shared::domain::AppointmentId;
use tracing::info;

use crate::error::ResolutionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    View,
}

/// Reference to a navigable destination for an appointment record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReference {
    pub record_id: AppointmentId,
    pub action: NavigationAction,
}

impl PageReference {
    pub fn view(record_id: AppointmentId) -> Self {
        Self {
            record_id,
            action: NavigationAction::View,
        }
    }
}

pub trait NavigationTargetResolver: Send + Sync {
    fn resolve(&self, page: &PageReference) -> Result<String, ResolutionError>;
}

/// Default resolver: the deterministic record-URL template, computed
/// locally from the identifier with no service round-trip.
pub struct RecordUrlResolver;

impl NavigationTargetResolver for RecordUrlResolver {
    fn resolve(&self, page: &PageReference) -> Result<String, ResolutionError> {
        validate_record_id(&page.record_id)?;
        Ok(match page.action {
            NavigationAction::View => render_record_url(&page.record_id),
        })
    }
}

/// The single template both the resolver and the list projection use for
/// record links.
pub fn render_record_url(id: &AppointmentId) -> String {
    format!("/records/service_appointment/{id}/view")
}

fn validate_record_id(id: &AppointmentId) -> Result<(), ResolutionError> {
    let raw = id.as_str();
    if raw.is_empty() {
        return Err(ResolutionError::EmptyRecordId);
    }
    if raw
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
    {
        return Err(ResolutionError::InvalidRecordId(raw.to_string()));
    }
    Ok(())
}

/// Opens a resolved destination in a new viewing context. The shell
/// decides what that means (browser tab, pane, plain print).
pub trait RecordOpener: Send + Sync {
    fn open(&self, url: &str);
}

pub struct LoggingOpener;

impl RecordOpener for LoggingOpener {
    fn open(&self, url: &str) {
        info!(url, "opening record");
    }
}
