//! Music Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MusicError {
    #[error("invalid waveform: {0}")]
    InvalidWaveform(String),

    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    #[error("unknown compute device: {0}")]
    UnknownDevice(String),
}
