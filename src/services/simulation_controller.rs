//! Submit -> compute -> visualize lifecycle for the production simulation.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::simulation::{
    InputField, SimulationInputs, SimulationResponse, UnknownFieldError,
};
use crate::services::simulation_api::SimulationService;
use crate::services::workflow::{RequestGuard, SubmitOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationPhase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationView {
    pub phase: SimulationPhase,
    pub inputs: SimulationInputs,
    pub is_pending: bool,
    pub result: Option<Arc<SimulationResponse>>,
    pub error: Option<String>,
}

struct SimulationState {
    phase: SimulationPhase,
    inputs: SimulationInputs,
    result: Option<Arc<SimulationResponse>>,
    error: Option<String>,
    guard: RequestGuard,
}

impl SimulationState {
    /// A submission whose future was dropped leaves `Submitting` behind with
    /// the slot already free.
    fn recover_abandoned(&mut self) {
        if self.phase == SimulationPhase::Submitting && !self.guard.is_busy() {
            self.phase = SimulationPhase::Idle;
        }
    }
}

#[derive(Clone)]
pub struct SimulationController {
    state: Arc<Mutex<SimulationState>>,
    service: Arc<dyn SimulationService>,
}

impl SimulationController {
    pub fn new(service: Arc<dyn SimulationService>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimulationState {
                phase: SimulationPhase::Idle,
                inputs: SimulationInputs::default(),
                result: None,
                error: None,
                guard: RequestGuard::default(),
            })),
            service,
        }
    }

    pub async fn update_field(&self, field: InputField, raw: &str) {
        let mut state = self.state.lock().await;
        state.inputs.update_field(field, raw);
        tracing::trace!(field = field.name(), value = state.inputs.get(field), "field updated");
    }

    pub async fn update_named_field(&self, name: &str, raw: &str) -> Result<(), UnknownFieldError> {
        let field = name.parse::<InputField>()?;
        self.update_field(field, raw).await;
        Ok(())
    }

    pub async fn inputs(&self) -> SimulationInputs {
        self.state.lock().await.inputs
    }

    pub async fn view(&self) -> SimulationView {
        let mut state = self.state.lock().await;
        state.recover_abandoned();
        SimulationView {
            phase: state.phase,
            inputs: state.inputs,
            is_pending: state.guard.is_busy(),
            result: state.result.clone(),
            error: state.error.clone(),
        }
    }

    /// Discards everything, as when the page is left. Form values go back to
    /// their defaults and a pending request will be ignored when it settles.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.phase = SimulationPhase::Idle;
        state.inputs = SimulationInputs::default();
        state.result = None;
        state.error = None;
        state.guard.invalidate();
    }

    /// Submits the current form values.
    pub async fn submit(&self) -> SubmitOutcome {
        let inputs = self.inputs().await;
        self.submit_with(inputs).await
    }

    /// Submits `inputs` as a snapshot; later edits do not affect this request.
    pub async fn submit_with(&self, inputs: SimulationInputs) -> SubmitOutcome {
        let request = {
            let mut state = self.state.lock().await;
            state.recover_abandoned();
            let Some(request) = state.guard.begin() else {
                tracing::debug!("submit ignored: simulation already in flight");
                return SubmitOutcome::Rejected;
            };
            state.result = None;
            state.error = None;
            state.phase = SimulationPhase::Submitting;
            request
        };

        let outcome = self.service.simulate(&inputs).await;

        let mut state = self.state.lock().await;
        let epoch = request.epoch();
        if !state.guard.settle(request) {
            tracing::debug!(epoch, "stale simulation response discarded");
            return SubmitOutcome::Stale;
        }
        match outcome {
            Ok(response) => {
                tracing::info!(
                    buckets = response.histogram_data.len(),
                    "simulation result received"
                );
                state.result = Some(Arc::new(response));
                state.phase = SimulationPhase::Succeeded;
                SubmitOutcome::Succeeded
            }
            Err(err) => {
                state.error = Some(err.to_string());
                state.phase = SimulationPhase::Failed;
                SubmitOutcome::Failed
            }
        }
    }
}
