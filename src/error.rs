//! Error types for the OACP subsystem.
//!
//! Three failure classes (none fatal to the device):
//! - attribute-protocol rejects that refuse the control-point write itself
//!   ([`AttError`]),
//! - command-level rejects reported through the indicated response
//!   (`ResultCode`, in `oacp::codec`),
//! - transfer-level failures that abort an in-progress operation
//!   ([`TransferError`]).
//!
//! All variants are `Copy` so they pass through the event-driven call
//! chain without allocation.

use core::fmt;

/// Rejects applied at the attribute-write boundary, before the command is
/// even decoded. These refuse the write; no response indication is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttError {
    /// Indications are not armed for the control point.
    ImproperlyConfigured,
    /// The write targeted a non-zero attribute offset.
    InvalidOffset,
}

impl fmt::Display for AttError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImproperlyConfigured => write!(f, "control point indications not enabled"),
            Self::InvalidOffset => write!(f, "control point write must start at offset 0"),
        }
    }
}

/// Errors from [`BulkChannel`](crate::ports::BulkChannel) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    /// The channel is not connected.
    NotOpen,
    /// The channel refused the submission (flow control, no credits).
    Busy,
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotOpen => write!(f, "bulk channel not open"),
            Self::Busy => write!(f, "bulk channel refused submission"),
        }
    }
}

/// Errors from [`ObjectIo`](crate::ports::ObjectIo) collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoError {
    /// The requested range falls outside the object's backing storage.
    OutOfBounds,
    /// The backend could not service the request.
    Failed,
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "range outside object storage"),
            Self::Failed => write!(f, "object I/O failed"),
        }
    }
}

/// Failures surfaced by the write-transfer data path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferError {
    /// Bulk data arrived with no object selected or no write in progress.
    NotActive,
    /// The data sink rejected the chunk; the operation was aborted.
    Sink(IoError),
    /// The sink accepted fewer bytes than forwarded. The accepted count
    /// was still credited to the transfer.
    ShortWrite { accepted: usize },
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotActive => write!(f, "no write transfer in progress"),
            Self::Sink(e) => write!(f, "data sink error: {e}"),
            Self::ShortWrite { accepted } => {
                write!(f, "data sink accepted only {accepted} bytes")
            }
        }
    }
}

/// Failure to change the current object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectError {
    /// A transfer is in progress on the current object.
    TransferInProgress,
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransferInProgress => write!(f, "transfer in progress on current object"),
        }
    }
}
