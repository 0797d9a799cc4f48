use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use dashboard_core::{
    AppointmentQueryService, AssignmentService, BroadcastNotifier, DashboardController,
    DispatchApiClient, ToastKind,
};
use shared::domain::{AppointmentId, TerritoryId};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

mod settings;

#[derive(Parser, Debug)]
struct Args {
    /// Dispatch service base URL; overrides console.toml and env.
    #[arg(long)]
    server_url: Option<String>,
    /// Territory id to filter by; omit to show all territories.
    #[arg(long)]
    territory: Option<String>,
    /// Run bulk auto-assignment for the selected scope.
    #[arg(long)]
    run_assign: bool,
    /// Open the given appointment record after listing.
    #[arg(long)]
    open: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();
    let settings = settings::load_settings();

    let server_url = args.server_url.unwrap_or(settings.server_url);
    let territory = args.territory.or(settings.territory).map(TerritoryId::new);

    let client = Arc::new(DispatchApiClient::new(&server_url)?);
    let notifier = Arc::new(BroadcastNotifier::new(64));

    let mut toasts = BroadcastStream::new(notifier.subscribe());
    tokio::spawn(async move {
        while let Some(Ok(toast)) = toasts.next().await {
            let tag = match toast.kind {
                ToastKind::Success => "ok",
                ToastKind::Error => "error",
                ToastKind::Info => "info",
            };
            println!("[{tag}] {}: {}", toast.title, toast.message);
        }
    });

    let controller = DashboardController::new(
        Arc::clone(&client) as Arc<dyn AppointmentQueryService>,
        client as Arc<dyn AssignmentService>,
        notifier,
    );

    controller.load_initial().await;

    let options = controller.territory_options().await;
    println!("Territories ({}):", options.len());
    for option in &options {
        println!("  {}: {}", option.value, option.label);
    }

    if territory.is_some() {
        controller.on_filter_change(territory).await;
    }

    let appointments = controller.appointments().await;
    println!("Appointments ({}):", appointments.len());
    for entry in &appointments {
        println!(
            "  {} [{:?}] {} -> {}",
            entry.record.appointment_number,
            entry.record.status,
            entry.record.subject.as_deref().unwrap_or("-"),
            entry.record_url,
        );
    }

    if args.run_assign {
        match controller.on_run_bulk_assign().await {
            Ok(outcome) => println!(
                "Assigned {} appointments (job {})",
                outcome.assigned_count, outcome.job_id
            ),
            Err(err) => eprintln!("bulk assignment failed: {err}"),
        }
        let refreshed = controller.appointments().await;
        println!("Appointments after assignment: {}", refreshed.len());
    }

    if let Some(record_id) = args.open {
        controller.on_open_record(AppointmentId::new(record_id)).await;
    }

    // Give the toast printer a moment to drain before exiting.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    Ok(())
}
