use super::*;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex},
};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::{
    domain::{AppointmentId, AppointmentStatus},
    error::ErrorCode,
};
use tokio::net::TcpListener;

async fn spawn_dispatch_server(router: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

fn sample_appointment(id: &str, territory: Option<&str>) -> ServiceAppointment {
    ServiceAppointment {
        id: AppointmentId::new(id),
        appointment_number: id.to_string(),
        subject: None,
        status: AppointmentStatus::Scheduled,
        territory_id: territory.map(TerritoryId::new),
        scheduled_start: None,
        scheduled_end: None,
        assigned_resource: None,
    }
}

#[tokio::test]
async fn fetch_appointments_propagates_territory_filter() {
    type SeenFilters = Arc<StdMutex<Vec<Option<String>>>>;
    let seen: SeenFilters = Arc::default();

    async fn handler(
        State(seen): State<SeenFilters>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<AppointmentListResponse> {
        seen.lock().unwrap().push(params.get("territory_id").cloned());
        Json(AppointmentListResponse {
            appointments: vec![sample_appointment("SA-1", Some("T-North"))],
        })
    }

    let router = Router::new()
        .route("/appointments", get(handler))
        .with_state(Arc::clone(&seen));
    let base = spawn_dispatch_server(router).await;
    let client = DispatchApiClient::new(&base).expect("client");

    let unfiltered = client.fetch_appointments(None).await.expect("unfiltered");
    assert_eq!(unfiltered.len(), 1);

    let filtered = client
        .fetch_appointments(Some(&TerritoryId::new("T-North")))
        .await
        .expect("filtered");
    assert_eq!(filtered[0].id, AppointmentId::new("SA-1"));

    assert_eq!(
        *seen.lock().unwrap(),
        vec![None, Some("T-North".to_string())]
    );
}

#[tokio::test]
async fn fetch_territory_options_decodes_list() {
    async fn handler() -> Json<TerritoryListResponse> {
        Json(TerritoryListResponse {
            territories: vec![
                TerritoryOption {
                    value: TerritoryId::new("T-A"),
                    label: "North".into(),
                },
                TerritoryOption {
                    value: TerritoryId::new("T-B"),
                    label: "South".into(),
                },
            ],
        })
    }

    let base = spawn_dispatch_server(Router::new().route("/territories", get(handler))).await;
    let client = DispatchApiClient::new(&base).expect("client");

    let options = client.fetch_territory_options().await.expect("options");
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].label, "North");
}

#[tokio::test]
async fn run_assignment_posts_scope_and_decodes_outcome() {
    type SeenScopes = Arc<StdMutex<Vec<Option<TerritoryId>>>>;
    let seen: SeenScopes = Arc::default();

    async fn handler(
        State(seen): State<SeenScopes>,
        Json(request): Json<RunAssignmentRequest>,
    ) -> Json<AssignmentOutcome> {
        seen.lock().unwrap().push(request.territory_id);
        Json(AssignmentOutcome::new(12, "12 appointments assigned"))
    }

    let router = Router::new()
        .route("/assignments/run", post(handler))
        .with_state(Arc::clone(&seen));
    let base = spawn_dispatch_server(router).await;
    let client = DispatchApiClient::new(&base).expect("client");

    let outcome = client
        .run_assignment(Some(&TerritoryId::new("T-A")))
        .await
        .expect("outcome");
    assert_eq!(outcome.assigned_count, 12);
    assert_eq!(outcome.message, "12 appointments assigned");
    assert_eq!(*seen.lock().unwrap(), vec![Some(TerritoryId::new("T-A"))]);
}

#[tokio::test]
async fn service_fault_body_surfaces_in_the_error() {
    async fn handler() -> (StatusCode, Json<ServiceFault>) {
        (
            StatusCode::CONFLICT,
            Json(ServiceFault::new(
                ErrorCode::Conflict,
                "an assignment run is already in progress",
            )),
        )
    }

    let base =
        spawn_dispatch_server(Router::new().route("/assignments/run", post(handler))).await;
    let client = DispatchApiClient::new(&base).expect("client");

    let err = client.run_assignment(None).await.expect_err("must fail");
    assert!(err.to_string().contains("already in progress"));
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_status() {
    async fn handler() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "boom")
    }

    let base = spawn_dispatch_server(Router::new().route("/appointments", get(handler))).await;
    let client = DispatchApiClient::new(&base).expect("client");

    let err = client.fetch_appointments(None).await.expect_err("must fail");
    assert!(err.to_string().contains("500"));
}

#[test]
fn rejects_invalid_base_url() {
    assert!(DispatchApiClient::new("not a url").is_err());
}
