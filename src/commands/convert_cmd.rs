use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use crate::commands::base_commands::ApiArgs;
use crate::domain::conversion::BillingFile;
use crate::services::conversion_controller::ConversionController;
use crate::services::file_saver::DirectorySaver;
use crate::services::focus_api::FocusApiClient;
use crate::services::workflow::SubmitOutcome;

const INTERRUPTED: u8 = 130;

pub async fn convert_command(api: &ApiArgs, input: &str, output_dir: &str) -> ExitCode {
    let config = match api.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to resolve API configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(base_url = config.base_url(), "using conversion api");
    let client = match FocusApiClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to create conversion client: {e}");
            return ExitCode::FAILURE;
        }
    };
    let file = match BillingFile::read(Path::new(input)).await {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to read billing export: {e}");
            return ExitCode::FAILURE;
        }
    };

    let controller =
        ConversionController::new(Arc::new(client), Arc::new(DirectorySaver::new(output_dir)));
    controller.select_file(file).await;
    let outcome = tokio::select! {
        outcome = controller.submit() => outcome,
        Ok(()) = tokio::signal::ctrl_c() => {
            controller.reset().await;
            eprintln!("Conversion cancelled.");
            return ExitCode::from(INTERRUPTED);
        }
    };
    let view = controller.view().await;

    match (outcome, view.saved_to) {
        (SubmitOutcome::Succeeded, Some(path)) => {
            println!("Normalized file written to {}", path.display());
            ExitCode::SUCCESS
        }
        _ => {
            let message = view
                .error
                .unwrap_or_else(|| "Conversion did not complete.".to_string());
            eprintln!("Processing error: {message}");
            ExitCode::FAILURE
        }
    }
}
