use thiserror::Error;

/// Fatal pipeline failures.
///
/// Lower-tier problems (parse failures, missing evidence, escalation errors)
/// degrade inside their stages; only the complete absence of a product
/// identity stops a run. The error names the failing stage so user-visible
/// reports never surface a raw trace.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The vision extraction produced no usable product name.
    #[error("stage '{stage}' failed: no product name could be extracted from the image")]
    MissingProductIdentity { stage: &'static str },

    /// The vision collaborator itself failed.
    #[error("stage '{stage}' failed: {reason}")]
    ExtractionFailed { stage: &'static str, reason: String },
}
