//! Command validation against the current object, service capabilities,
//! and channel state.
//!
//! The check order is load-bearing: result codes are observable by
//! clients, so existence → permission → patch capability → unsupported
//! mode → channel availability → range → lock state must be preserved
//! exactly. Object operation state is mutated only on `Success`.

use log::debug;

use crate::config::Capabilities;
use crate::object::{Object, OperationState, Properties};

use super::codec::{Command, ResultCode, WriteMode};

/// Validate a decoded command and, on success, transition the object into
/// the corresponding in-progress state.
///
/// Create, Delete, CalcChecksum, Execute and Abort decode cleanly but are
/// not implemented by this subsystem.
pub(crate) fn validate(
    cmd: &Command,
    obj: Option<&mut Object>,
    caps: Capabilities,
    channel_open: bool,
) -> ResultCode {
    match *cmd {
        Command::Read { offset, len } => validate_read(obj, offset, len, channel_open),
        Command::Write { offset, len, mode } => {
            validate_write(obj, offset, len, mode, caps, channel_open)
        }
        Command::Create { .. }
        | Command::Delete
        | Command::CalcChecksum { .. }
        | Command::Execute
        | Command::Abort => ResultCode::OpcodeNotSupported,
    }
}

fn validate_read(
    obj: Option<&mut Object>,
    offset: u32,
    len: u32,
    channel_open: bool,
) -> ResultCode {
    debug!("validating Read offset={offset:#010x} len={len:#010x}");

    let Some(obj) = obj else {
        return ResultCode::InvalidObject;
    };

    if !obj.metadata.props.contains(Properties::READ) {
        return ResultCode::NotPermitted;
    }

    if !channel_open {
        return ResultCode::ChannelUnavailable;
    }

    if u64::from(offset) + u64::from(len) > u64::from(obj.metadata.cur_size) {
        return ResultCode::InvalidParameter;
    }

    if !obj.state.is_idle() {
        return ResultCode::ObjectLocked;
    }

    obj.state = OperationState::Reading {
        offset,
        len,
        sent: 0,
    };
    debug!("Read procedure accepted");

    ResultCode::Success
}

fn validate_write(
    obj: Option<&mut Object>,
    offset: u32,
    len: u32,
    mode: WriteMode,
    caps: Capabilities,
    channel_open: bool,
) -> ResultCode {
    debug!("validating Write offset={offset:#010x} len={len:#010x}");

    let Some(obj) = obj else {
        return ResultCode::InvalidObject;
    };

    if !obj.metadata.props.contains(Properties::WRITE) {
        return ResultCode::NotPermitted;
    }

    // Patching is attempted when the window overlaps valid content.
    if offset < obj.metadata.cur_size {
        if !caps.patch {
            return ResultCode::NotPermitted;
        }
        if !obj.metadata.props.contains(Properties::PATCH) {
            return ResultCode::NotPermitted;
        }
    }

    // Truncation is not supported.
    if mode.contains(WriteMode::TRUNCATE) {
        return ResultCode::NotPermitted;
    }

    if !channel_open {
        return ResultCode::ChannelUnavailable;
    }

    if mode.has_reserved_bits() {
        return ResultCode::InvalidParameter;
    }

    // No sparse writes past the end of valid content.
    if offset > obj.metadata.cur_size {
        return ResultCode::InvalidParameter;
    }

    // Append beyond the allocation is not supported.
    if u64::from(offset) + u64::from(len) > u64::from(obj.metadata.alloc_size) {
        return ResultCode::InvalidParameter;
    }

    if !obj.state.is_idle() {
        return ResultCode::ObjectLocked;
    }

    obj.state = OperationState::Writing {
        offset,
        len,
        received: 0,
    };
    debug!("Write procedure accepted");

    ResultCode::Success
}

// ── Tests ────────────────────────────────────────────────────
