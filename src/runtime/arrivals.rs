//! Tokio bridge between the arrivals process and the intake gate.
//!
//! Requests are handled one at a time in arrival order. Each intake runs on
//! the blocking pool since repository backends may touch the filesystem.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::core::{GarageScheduler, IntakeOutcome, IntakeRequest, SchedulerError};

struct ArrivalEnvelope {
    request: IntakeRequest,
    reply: oneshot::Sender<IntakeOutcome>,
}

/// Sending half handed to the arrivals process.
#[derive(Clone)]
pub struct ArrivalsBridge {
    tx: mpsc::Sender<ArrivalEnvelope>,
}

impl ArrivalsBridge {
    /// Submit a vehicle and wait for the intake decision.
    pub async fn submit(&self, request: IntakeRequest) -> Result<IntakeOutcome, SchedulerError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(ArrivalEnvelope { request, reply })
            .await
            .map_err(|_| SchedulerError::Backend("arrivals bridge closed".into()))?;
        rx.await
            .map_err(|_| SchedulerError::Backend("arrivals bridge dropped the request".into()))
    }
}

/// Start the bridge task. It exits once every [`ArrivalsBridge`] clone is dropped.
pub fn spawn_arrivals_bridge(scheduler: Arc<GarageScheduler>, buffer: usize) -> (ArrivalsBridge, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<ArrivalEnvelope>(buffer.max(1));
    let handle = tokio::spawn(async move {
        while let Some(envelope) = rx.recv().await {
            let scheduler = Arc::clone(&scheduler);
            let request = envelope.request;
            let outcome = match tokio::task::spawn_blocking(move || scheduler.intake_outcome(request)).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::error!(error = %err, "intake task failed");
                    IntakeOutcome {
                        accepted: false,
                        reason: Some(format!("intake task failed: {err}")),
                        ticket_id: None,
                    }
                }
            };
            if envelope.reply.send(outcome).is_err() {
                tracing::debug!("arrivals caller went away before the reply");
            }
        }
        tracing::debug!("arrivals bridge stopped");
    });
    (ArrivalsBridge { tx }, handle)
}
