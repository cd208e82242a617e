//! Camera stream lifetime for the barcode scanner.
//!
//! Decoding is external. This module only guarantees that a stream acquired
//! for scanning is released exactly once: on close, on a successful scan, or
//! when the session is dropped (page unload, navigation).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScannerError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("no camera available")]
    Unavailable,
}

impl ScannerError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ScannerError::PermissionDenied => "Camera access was denied.",
            ScannerError::Unavailable => "No camera is available on this device.",
        }
    }
}

/// A live set of video tracks.
pub trait VideoStream {
    /// Stop every track. Called once per stream.
    fn stop(&mut self);
}

pub trait VideoSource {
    type Stream: VideoStream;

    fn acquire(&mut self) -> Result<Self::Stream, ScannerError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseReason {
    Closed,
    Scanned,
    Dropped,
}

pub struct ScannerSession<S: VideoStream> {
    stream: Option<S>,
}

impl<S: VideoStream> ScannerSession<S> {
    pub fn open<V>(source: &mut V) -> Result<Self, ScannerError>
    where
        V: VideoSource<Stream = S>,
    {
        let stream = source.acquire().inspect_err(|e| {
            tracing::warn!(error = %e, "could not start scanner");
        })?;
        tracing::debug!("scanner stream acquired");
        Ok(Self {
            stream: Some(stream),
        })
    }

    pub fn is_live(&self) -> bool {
        self.stream.is_some()
    }

    /// Decoded text from the external decoder. Non-empty codes end the
    /// session and are returned trimmed; blank reads keep scanning.
    pub fn accept_scan(&mut self, decoded: &str) -> Option<String> {
        if !self.is_live() {
            return None;
        }
        let code = decoded.trim();
        if code.is_empty() {
            return None;
        }
        self.release(ReleaseReason::Scanned);
        Some(code.to_string())
    }

    pub fn close(&mut self) {
        self.release(ReleaseReason::Closed);
    }

    fn release(&mut self, reason: ReleaseReason) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            tracing::debug!(?reason, "scanner stream released");
        }
    }
}

impl<S: VideoStream> Drop for ScannerSession<S> {
    fn drop(&mut self) {
        self.release(ReleaseReason::Dropped);
    }
}
