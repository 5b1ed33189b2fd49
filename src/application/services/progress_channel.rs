use tokio::sync::mpsc;

use crate::domain::{PipelineStage, ProgressEvent};

/// Ordered, single-consumer sink for the progress events of one run.
///
/// Every publish is checked against the stage machine, so a run can never go
/// backwards or emit a second terminal event. A detached channel keeps the
/// bookkeeping but discards events; the non-streaming entry points use it.
pub struct ProgressChannel {
    sender: Option<mpsc::Sender<ProgressEvent>>,
    stage: PipelineStage,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressError {
    #[error("progress receiver dropped")]
    Disconnected,
    #[error("run already finished with stage {0}")]
    AlreadyTerminated(PipelineStage),
    #[error("stage {from} cannot advance to {to}")]
    OutOfOrder {
        from: PipelineStage,
        to: PipelineStage,
    },
}

impl ProgressChannel {
    pub fn new(sender: mpsc::Sender<ProgressEvent>) -> Self {
        Self {
            sender: Some(sender),
            stage: PipelineStage::Received,
        }
    }

    pub fn detached() -> Self {
        Self {
            sender: None,
            stage: PipelineStage::Received,
        }
    }

    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<ProgressEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn is_finished(&self) -> bool {
        self.stage.is_terminal()
    }

    pub async fn publish(&mut self, event: ProgressEvent) -> Result<(), ProgressError> {
        let next = event.stage();
        if self.stage.is_terminal() {
            return Err(ProgressError::AlreadyTerminated(self.stage));
        }
        if !self.stage.can_advance_to(next) {
            return Err(ProgressError::OutOfOrder {
                from: self.stage,
                to: next,
            });
        }

        self.stage = next;

        match &self.sender {
            Some(sender) => sender
                .send(event)
                .await
                .map_err(|_| ProgressError::Disconnected),
            None => Ok(()),
        }
    }
}
