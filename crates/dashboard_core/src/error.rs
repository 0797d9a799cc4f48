use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("{context} failed: {source}")]
    Service {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    /// A bulk assignment was attempted while one is already outstanding.
    #[error("a bulk assignment is already in flight")]
    MutationInFlight,
}

impl DashboardError {
    pub fn service(context: &'static str, source: anyhow::Error) -> Self {
        Self::Service { context, source }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("record id is empty")]
    EmptyRecordId,
    #[error("record id {0:?} cannot appear in a record URL")]
    InvalidRecordId(String),
}
