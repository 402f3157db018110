//! Port traits — the boundary between the OACP engine and its collaborators.
//!
//! ```text
//!   GATT attribute layer ──▶ OacpService ──▶ IndicationSink (control channel)
//!                                   │
//!                                   ├──▶ BulkChannel  (content channel)
//!                                   └──▶ ObjectIo     (content source/sink)
//! ```
//!
//! The service consumes these per call, so the protocol core never touches
//! a real transport or a real storage backend directly.

use crate::error::{ChannelError, IoError};
use crate::object::ObjectId;

// ───────────────────────────────────────────────────────────────
// Bulk channel (content transfer)
// ───────────────────────────────────────────────────────────────

/// Connection-oriented, flow-controlled byte stream for object content.
///
/// The engine keeps at most one chunk in flight: after a successful
/// [`send`](BulkChannel::send) it waits for the owner to report send
/// completion before submitting the next chunk.
pub trait BulkChannel {
    /// Whether the channel is currently open.
    fn is_open(&self) -> bool;

    /// Submit one chunk for transmission. `Err` means the chunk was not
    /// accepted and will not be sent.
    fn send(&mut self, data: &[u8]) -> Result<(), ChannelError>;

    /// Tear the channel down. Used when a read's data source fails
    /// mid-transfer.
    fn disconnect(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Object content I/O (source for reads, sink for writes)
// ───────────────────────────────────────────────────────────────

/// Supplies and accepts object content in chunks.
pub trait ObjectIo {
    /// Return up to `max_len` bytes of object content starting at
    /// `offset`. Returning fewer bytes than requested is normal; the
    /// engine will come back for the rest.
    fn read_chunk(&mut self, id: ObjectId, max_len: usize, offset: u64) -> Result<&[u8], IoError>;

    /// Accept `data` at `offset`. `remaining` is the number of bytes the
    /// client still owes after this chunk. Returns the number of bytes
    /// actually accepted; fewer than `data.len()` is a short write.
    fn write_chunk(
        &mut self,
        id: ObjectId,
        data: &[u8],
        offset: u64,
        remaining: usize,
    ) -> Result<usize, IoError>;

    /// A read transfer completed; `offset` is one past the last byte
    /// handed to the channel. Not called for the directory-listing object.
    fn read_done(&mut self, id: ObjectId, offset: u64);
}

// ───────────────────────────────────────────────────────────────
// Indication sink (control channel responses)
// ───────────────────────────────────────────────────────────────

/// Delivers response indications on the control channel. The client's
/// acknowledgment comes back through `OacpService::on_indication_ack`.
pub trait IndicationSink {
    fn indicate(&mut self, payload: &[u8]) -> Result<(), ChannelError>;
}

// ───────────────────────────────────────────────────────────────
// Null channel
// ───────────────────────────────────────────────────────────────

/// A bulk channel that is never open and accepts nothing. Useful as a
/// default before a content channel has been established.
pub struct NullChannel;

impl BulkChannel for NullChannel {
    fn is_open(&self) -> bool {
        false
    }

    fn send(&mut self, _data: &[u8]) -> Result<(), ChannelError> {
        Err(ChannelError::NotOpen)
    }

    fn disconnect(&mut self) {}
}
