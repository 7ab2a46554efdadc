use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::error::PipelineError;
use super::{ExtractedLabel, STAGE_EXTRACT_IMAGE, VisionExtractor};

/// Scripted [`VisionExtractor`] for tests.
///
/// Labels are served in FIFO order; an exhausted queue fails the call the
/// same way a broken vision collaborator would.
#[derive(Default)]
pub struct MockVisionExtractor {
    labels: Mutex<VecDeque<Result<ExtractedLabel, String>>>,
    image_sizes: Mutex<Vec<usize>>,
}

impl MockVisionExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful extraction.
    pub fn push_label(&self, label: ExtractedLabel) {
        self.labels.lock().expect("mock lock").push_back(Ok(label));
    }

    /// Queues a failed extraction.
    pub fn push_failure(&self, reason: impl Into<String>) {
        self.labels
            .lock()
            .expect("mock lock")
            .push_back(Err(reason.into()));
    }

    /// Byte lengths of the images received so far, in call order.
    pub fn image_sizes(&self) -> Vec<usize> {
        self.image_sizes.lock().expect("mock lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.image_sizes.lock().expect("mock lock").len()
    }
}

#[async_trait]
impl VisionExtractor for MockVisionExtractor {
    async fn extract(&self, image: &[u8]) -> Result<ExtractedLabel, PipelineError> {
        self.image_sizes.lock().expect("mock lock").push(image.len());

        match self.labels.lock().expect("mock lock").pop_front() {
            Some(Ok(label)) => Ok(label),
            Some(Err(reason)) => Err(PipelineError::ExtractionFailed {
                stage: STAGE_EXTRACT_IMAGE,
                reason,
            }),
            None => Err(PipelineError::ExtractionFailed {
                stage: STAGE_EXTRACT_IMAGE,
                reason: "mock label queue exhausted".to_string(),
            }),
        }
    }
}
