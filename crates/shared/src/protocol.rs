use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ServiceAppointment, TerritoryId, TerritoryOption};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentListResponse {
    pub appointments: Vec<ServiceAppointment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerritoryListResponse {
    pub territories: Vec<TerritoryOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunAssignmentRequest {
    /// Scope of the bulk run. `None` assigns across all territories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub territory_id: Option<TerritoryId>,
}

/// Result of a completed bulk auto-assignment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentOutcome {
    pub job_id: Uuid,
    pub assigned_count: u32,
    pub message: String,
}

impl AssignmentOutcome {
    pub fn new(assigned_count: u32, message: impl Into<String>) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            assigned_count,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppointmentId, AppointmentStatus, ServiceAppointment};

    #[test]
    fn run_assignment_request_omits_unset_territory() {
        let body = serde_json::to_value(RunAssignmentRequest { territory_id: None })
            .expect("serialize request");
        assert_eq!(body, serde_json::json!({}));

        let scoped = serde_json::to_value(RunAssignmentRequest {
            territory_id: Some(TerritoryId::new("T-North")),
        })
        .expect("serialize scoped request");
        assert_eq!(scoped, serde_json::json!({ "territory_id": "T-North" }));
    }

    #[test]
    fn appointment_round_trips_with_snake_case_status() {
        let appointment = ServiceAppointment {
            id: AppointmentId::new("SA-0001"),
            appointment_number: "SA-0001".into(),
            subject: Some("Install meter".into()),
            status: AppointmentStatus::InProgress,
            territory_id: Some(TerritoryId::new("T-North")),
            scheduled_start: None,
            scheduled_end: None,
            assigned_resource: None,
        };

        let json = serde_json::to_value(&appointment).expect("serialize");
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["id"], "SA-0001");

        let back: ServiceAppointment = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, appointment);
    }
}
