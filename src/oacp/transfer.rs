//! Chunked transfer engine.
//!
//! Read: a cooperative pull pipeline with one chunk in flight — each
//! drive step requests at most the remaining quota from the data source,
//! submits it to the bulk channel, and the next step runs off the
//! channel's send-complete event.
//!
//! Write: driven entirely by bulk-channel data arrival. Excess bytes
//! beyond the declared length are dropped, short sink writes are credited
//! but reported, and the object's current size grows as accepted bytes
//! land past it.

use log::{debug, error, warn};

use crate::error::TransferError;
use crate::object::{Object, OperationState};
use crate::ports::{BulkChannel, ObjectIo};

/// Force an in-progress operation back to `Idle` (channel closure,
/// external abort). Progress counters are discarded.
pub(crate) fn abort(obj: &mut Object) {
    if !obj.state.is_idle() {
        debug!("transfer aborted, object {:?} back to idle", obj.id);
        obj.state = OperationState::Idle;
    }
}

/// One step of the read pump. Called on indication ack (first chunk) and
/// on every bulk-channel send completion thereafter.
pub(crate) fn drive_read(
    obj: &mut Object,
    chan: &mut impl BulkChannel,
    io: &mut impl ObjectIo,
) {
    let OperationState::Reading { offset, len, sent } = obj.state else {
        return;
    };

    let pos = u64::from(offset) + u64::from(sent);

    if sent >= len {
        debug!("read transfer completed");
        if sent > len {
            warn!("more bytes sent than the client requested");
        }

        obj.state = OperationState::Idle;

        // The directory-listing object needs no terminal signal.
        if !obj.id.is_dir_list() {
            io.read_done(obj.id, pos);
        }
        return;
    }

    let want = (len - sent) as usize;
    let chunk = match io.read_chunk(obj.id, want, pos) {
        Ok(chunk) => chunk,
        Err(e) => {
            error!("read transfer failed: {e}");
            chan.disconnect();
            obj.state = OperationState::Idle;
            return;
        }
    };

    let chunk_len = chunk.len() as u32;
    match chan.send(chunk) {
        Ok(()) => {
            obj.state = OperationState::Reading {
                offset,
                len,
                sent: sent + chunk_len,
            };
        }
        Err(e) => {
            error!("bulk channel error during read transfer: {e}");
            obj.state = OperationState::Idle;
        }
    }
}

/// Handle one bulk-channel data arrival during a write transfer.
///
/// Returns the number of bytes credited to the transfer. Bytes beyond the
/// declared window are dropped before the sink sees them.
pub(crate) fn handle_incoming(
    obj: &mut Object,
    data: &[u8],
    io: &mut impl ObjectIo,
) -> Result<usize, TransferError> {
    let OperationState::Writing {
        offset,
        len,
        received,
    } = obj.state
    else {
        error!("bulk data arrived with no write transfer in progress");
        return Err(TransferError::NotActive);
    };

    let pos = u64::from(offset) + u64::from(received);

    let mut take = data.len();
    if received as usize + take > len as usize {
        warn!("more bytes received than the client declared");
        take = (len - received) as usize;
    }
    let rem = len as usize - (received as usize + take);

    let accepted = match io.write_chunk(obj.id, &data[..take], pos, rem) {
        Ok(accepted) => accepted.min(take),
        Err(e) => {
            error!("write transfer failed: {e}");
            obj.state = OperationState::Idle;
            return Err(TransferError::Sink(e));
        }
    };

    let credited = received + accepted as u32;
    if credited == len {
        debug!("write transfer completed");
        obj.state = OperationState::Idle;
    } else {
        obj.state = OperationState::Writing {
            offset,
            len,
            received: credited,
        };
    }

    // Accepted bytes past the current size extend it, whether or not the
    // transfer ever completes.
    let end = pos + accepted as u64;
    if end > u64::from(obj.metadata.cur_size) {
        obj.metadata.cur_size = end as u32;
    }

    if accepted < take {
        error!("data sink accepted {accepted} of {take} bytes");
        return Err(TransferError::ShortWrite { accepted });
    }

    Ok(accepted)
}

// ── Tests ────────────────────────────────────────────────────
