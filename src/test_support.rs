use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::domain::conversion::BillingFile;
use crate::domain::simulation::{
    HistogramBin, SimulationInputs, SimulationResponse, SimulationSummary,
};
use crate::services::api_error::ApiError;
use crate::services::file_saver::{FileSaveError, FileSaver, StagedDownload};
use crate::services::focus_api::{ConversionOutcome, ConversionService};
use crate::services::simulation_api::SimulationService;

/// Responses released by the test, one per call, in call order. Calls with
/// no queued gate fail as transport errors.
pub struct Gated<T> {
    pending: Mutex<VecDeque<oneshot::Receiver<T>>>,
    calls: AtomicUsize,
}

impl<T> Default for Gated<T> {
    fn default() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl<T> Gated<T> {
    pub fn gate(&self) -> oneshot::Sender<T> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push_back(rx);
        tx
    }

    /// Queues an already-released response.
    pub fn ready(&self, value: T) {
        let tx = self.gate();
        let _ = tx.send(value);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn next(&self) -> Option<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rx = self.pending.lock().unwrap().pop_front()?;
        rx.await.ok()
    }
}

#[derive(Default)]
pub struct FakeConversionService {
    pub responses: Gated<ConversionOutcome>,
}

#[async_trait::async_trait]
impl ConversionService for FakeConversionService {
    async fn convert(&self, _file: &BillingFile) -> ConversionOutcome {
        self.responses
            .next()
            .await
            .unwrap_or_else(|| Err(ApiError::Transport("no response queued".to_string())))
    }
}

#[derive(Default)]
pub struct FakeSimulationService {
    pub responses: Gated<Result<SimulationResponse, ApiError>>,
    pub received: Mutex<Vec<SimulationInputs>>,
}

#[async_trait::async_trait]
impl SimulationService for FakeSimulationService {
    async fn simulate(&self, inputs: &SimulationInputs) -> Result<SimulationResponse, ApiError> {
        self.received.lock().unwrap().push(*inputs);
        self.responses
            .next()
            .await
            .unwrap_or_else(|| Err(ApiError::Transport("no response queued".to_string())))
    }
}

/// Keeps saved files in memory. A staged download only lands in `saved`
/// once committed.
#[derive(Default)]
pub struct MemorySaver {
    pub saved: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    pub fail: bool,
    hold: Mutex<Option<oneshot::Receiver<()>>>,
    stage_calls: AtomicUsize,
}

impl MemorySaver {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Makes the next `stage` wait until the returned sender fires.
    pub fn hold(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.hold.lock().unwrap() = Some(rx);
        tx
    }

    pub fn stage_calls(&self) -> usize {
        self.stage_calls.load(Ordering::SeqCst)
    }

    pub fn saved_names(&self) -> Vec<String> {
        self.saved
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl FileSaver for MemorySaver {
    async fn stage(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<Box<dyn StagedDownload>, FileSaveError> {
        self.stage_calls.fetch_add(1, Ordering::SeqCst);
        let hold = self.hold.lock().unwrap().take();
        if let Some(release) = hold {
            let _ = release.await;
        }
        if self.fail {
            return Err(FileSaveError::Io {
                path: PathBuf::from(filename),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        Ok(Box::new(MemoryDownload {
            saved: Arc::clone(&self.saved),
            name: filename.to_string(),
            bytes: bytes.to_vec(),
        }))
    }
}

struct MemoryDownload {
    saved: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    name: String,
    bytes: Vec<u8>,
}

#[async_trait::async_trait]
impl StagedDownload for MemoryDownload {
    async fn commit(self: Box<Self>) -> Result<PathBuf, FileSaveError> {
        let MemoryDownload { saved, name, bytes } = *self;
        let path = PathBuf::from(&name);
        saved.lock().unwrap().push((name, bytes));
        Ok(path)
    }
}

pub fn billing_file(name: &str) -> BillingFile {
    BillingFile::new(name, b"lineItem/UnblendedCost\n4.20\n".to_vec())
}

pub fn sample_response() -> SimulationResponse {
    SimulationResponse {
        summary: SimulationSummary {
            expected_profit: 61250.4,
            value_at_risk: -35000.0,
            best_case: 140000.0,
            prob_of_loss: 0.237,
        },
        histogram_data: vec![
            HistogramBin { bin: -80000.0, count: 120 },
            HistogramBin { bin: -35000.0, count: 380 },
            HistogramBin { bin: 10000.0, count: 1450 },
            HistogramBin { bin: 55000.0, count: 2100 },
            HistogramBin { bin: 100000.0, count: 950 },
        ],
    }
}

pub fn sample_response_json() -> serde_json::Value {
    serde_json::to_value(sample_response()).unwrap()
}
