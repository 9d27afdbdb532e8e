use std::process::ExitCode;
use std::sync::Arc;

use crate::commands::base_commands::{ApiArgs, SimulationArgs};
use crate::commands::report_format::format_simulation_report;
use crate::services::chart::build_chart;
use crate::services::chart_png::write_chart_png;
use crate::services::simulation_api::SimulationApiClient;
use crate::services::simulation_controller::SimulationController;
use crate::services::workflow::SubmitOutcome;

const INTERRUPTED: u8 = 130;

pub async fn simulate_command(
    api: &ApiArgs,
    inputs: &SimulationArgs,
    chart_path: Option<&str>,
) -> ExitCode {
    let config = match api.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to resolve API configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(base_url = config.base_url(), "using simulation api");
    let client = match SimulationApiClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to create simulation client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let controller = SimulationController::new(Arc::new(client));
    for (field, raw) in inputs.edits() {
        controller.update_field(field, raw).await;
    }
    let named_edits = match inputs.named_edits() {
        Ok(edits) => edits,
        Err(e) => {
            eprintln!("Invalid --set value: {e}");
            return ExitCode::FAILURE;
        }
    };
    for (name, raw) in named_edits {
        if let Err(e) = controller.update_named_field(name, raw).await {
            eprintln!("Invalid --set value: {e}");
            return ExitCode::FAILURE;
        }
    }

    let outcome = tokio::select! {
        outcome = controller.submit() => outcome,
        Ok(()) = tokio::signal::ctrl_c() => {
            controller.reset().await;
            eprintln!("Simulation cancelled.");
            return ExitCode::from(INTERRUPTED);
        }
    };
    let view = controller.view().await;
    let response = match (outcome, view.result) {
        (SubmitOutcome::Succeeded, Some(response)) => response,
        _ => {
            let message = view
                .error
                .unwrap_or_else(|| "Simulation did not complete.".to_string());
            eprintln!("Simulation error: {message}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", format_simulation_report(&view.inputs, &response));

    if let Some(path) = chart_path {
        let chart = build_chart(
            &response.histogram_data,
            response.summary.expected_profit,
            response.summary.value_at_risk,
        );
        match write_chart_png(path, &chart).await {
            Ok(()) => println!("Profit distribution chart written to {path}"),
            Err(e) => {
                eprintln!("Failed to write profit distribution chart: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
