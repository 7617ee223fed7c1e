//! Error and status types

use thiserror::Error;

/// Outcome code of a frame scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// At least one code was found
    Success = 0,
    /// The pipeline ran cleanly but found nothing
    NoCodesFound = 1,
    /// `process_frame` was called outside a frame sequence
    SessionNotActive = 2,
    /// The frame had no usable pixels
    InvalidImage = 3,
}

impl ScanStatus {
    /// Stable numeric code
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Failures surfaced to the caller of `process_frame`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// No active frame session
    #[error("frame sequence not started")]
    SessionNotActive,

    /// Empty or inconsistent pixel buffer
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

impl ScanError {
    /// Status code reported for this error
    pub fn status(&self) -> ScanStatus {
        match self {
            ScanError::SessionNotActive => ScanStatus::SessionNotActive,
            ScanError::InvalidImage(_) => ScanStatus::InvalidImage,
        }
    }
}

/// Failure inside a decode backend; always recovered by the orchestrator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The decoding library reported an error
    #[error("decoder error: {0}")]
    Decoder(String),

    /// Wall-clock budget ran out before anything was found
    #[error("decode time budget exhausted")]
    Timeout,

    /// The backend panicked; holds the panic message
    #[error("decoder panicked: {0}")]
    Panicked(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ScanStatus::Success.code(), 0);
        assert_eq!(ScanStatus::NoCodesFound.code(), 1);
        assert_eq!(ScanError::SessionNotActive.status().code(), 2);
        assert_eq!(ScanError::InvalidImage("x".into()).status().code(), 3);
    }
}
