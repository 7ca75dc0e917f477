use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Contract violations when building or steering a [`StepSequencer`].
///
/// [`StepSequencer`]: crate::core::sequencer::StepSequencer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequencerError {
    #[error("step list is empty")]
    Empty,
    #[error("start index {index} is out of range for {len} steps")]
    StartOutOfRange { index: usize, len: usize },
    #[error("target index {index} is out of range for {len} steps")]
    TargetOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access draft file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("draft file {} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to write submission: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode submission: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config {} is not valid YAML: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
