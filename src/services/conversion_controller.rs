//! Upload -> convert -> download lifecycle for billing exports.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::conversion::BillingFile;
use crate::services::file_saver::{FileSaver, StagedDownload};
use crate::services::focus_api::ConversionService;
use crate::services::workflow::{InFlight, RequestGuard, SubmitOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionPhase {
    Idle,
    FileSelected,
    Submitting,
    Succeeded,
    Failed,
}

/// What the presentation layer shows for the conversion page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionView {
    pub phase: ConversionPhase,
    pub file_name: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub success: bool,
    pub saved_to: Option<PathBuf>,
}

struct ConversionState {
    phase: ConversionPhase,
    file: Option<Arc<BillingFile>>,
    error: Option<String>,
    success: bool,
    saved_to: Option<PathBuf>,
    guard: RequestGuard,
}

impl ConversionState {
    fn clear_outcome(&mut self) {
        self.error = None;
        self.success = false;
        self.saved_to = None;
    }

    /// A submission whose future was dropped leaves `Submitting` behind with
    /// the slot already free.
    fn recover_abandoned(&mut self) {
        if self.phase == ConversionPhase::Submitting && !self.guard.is_busy() {
            self.phase = if self.file.is_some() {
                ConversionPhase::FileSelected
            } else {
                ConversionPhase::Idle
            };
        }
    }
}

struct ConversionTicket {
    request: InFlight,
    file: Arc<BillingFile>,
}

#[derive(Clone)]
pub struct ConversionController {
    state: Arc<Mutex<ConversionState>>,
    service: Arc<dyn ConversionService>,
    saver: Arc<dyn FileSaver>,
}

impl ConversionController {
    pub fn new(service: Arc<dyn ConversionService>, saver: Arc<dyn FileSaver>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ConversionState {
                phase: ConversionPhase::Idle,
                file: None,
                error: None,
                success: false,
                saved_to: None,
                guard: RequestGuard::default(),
            })),
            service,
            saver,
        }
    }

    /// Replaces the selected file and clears any previous outcome. A request
    /// still in flight for the old file will be discarded when it settles.
    pub async fn select_file(&self, file: BillingFile) {
        let mut state = self.state.lock().await;
        tracing::debug!(file = %file.name, "billing export selected");
        state.file = Some(Arc::new(file));
        state.clear_outcome();
        state.phase = ConversionPhase::FileSelected;
        state.guard.invalidate();
    }

    /// Back to a blank page, as when the user navigates away.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.file = None;
        state.clear_outcome();
        state.phase = ConversionPhase::Idle;
        state.guard.invalidate();
    }

    pub async fn view(&self) -> ConversionView {
        let mut state = self.state.lock().await;
        state.recover_abandoned();
        ConversionView {
            phase: state.phase,
            file_name: state.file.as_ref().map(|file| file.name.clone()),
            is_loading: state.guard.is_busy(),
            error: state.error.clone(),
            success: state.success,
            saved_to: state.saved_to.clone(),
        }
    }

    /// Converts the selected file and saves the result. The converted bytes
    /// are only staged while awaiting; they reach the target name under the
    /// state lock, and only if no later action superseded this request.
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(ticket) = self.begin().await else {
            return SubmitOutcome::Rejected;
        };

        let staged = match self.service.convert(&ticket.file).await {
            Ok(bytes) => self
                .saver
                .stage(&bytes, &ticket.file.normalized_name())
                .await
                .map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };

        self.complete(ticket.request, staged).await
    }

    async fn begin(&self) -> Option<ConversionTicket> {
        let mut state = self.state.lock().await;
        state.recover_abandoned();
        let Some(file) = state.file.clone() else {
            tracing::debug!("submit ignored: no file selected");
            return None;
        };
        let Some(request) = state.guard.begin() else {
            tracing::debug!("submit ignored: conversion already in flight");
            return None;
        };
        state.clear_outcome();
        state.phase = ConversionPhase::Submitting;
        Some(ConversionTicket { request, file })
    }

    async fn complete(
        &self,
        request: InFlight,
        staged: Result<Box<dyn StagedDownload>, String>,
    ) -> SubmitOutcome {
        let mut state = self.state.lock().await;
        let epoch = request.epoch();
        if !state.guard.settle(request) {
            // Dropping the staged download removes it.
            tracing::debug!(epoch, "stale conversion response discarded");
            return SubmitOutcome::Stale;
        }
        let result = match staged {
            Ok(staged) => staged.commit().await.map_err(|err| err.to_string()),
            Err(message) => Err(message),
        };
        match result {
            Ok(path) => {
                state.phase = ConversionPhase::Succeeded;
                state.success = true;
                state.saved_to = Some(path);
                SubmitOutcome::Succeeded
            }
            Err(message) => {
                state.phase = ConversionPhase::Failed;
                state.error = Some(message);
                SubmitOutcome::Failed
            }
        }
    }
}
