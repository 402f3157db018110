//! Control-point command and response wire codec.
//!
//! Command format (little-endian multi-byte fields):
//! ```text
//! ┌────────────┬──────────────────────────────────────────┐
//! │ Opcode (1B)│ opcode-specific parameters               │
//! └────────────┴──────────────────────────────────────────┘
//! Read  (0x05): offset:u32, len:u32
//! Write (0x06): offset:u32, len:u32, mode:u8
//! Create(0x01): size:u32, type uuid (2/4/16 B, rest of frame)
//! ```
//!
//! Response format is a fixed 3 bytes:
//! `{0x60, echoed request opcode, result code}`.
//!
//! Decoding is total: any input yields either a [`Command`] or a
//! [`DecodeError`] carrying the result code to indicate and the opcode
//! byte to echo. [`length_matches`] re-validates the wire length
//! independently so truncated or padded frames are rejected
//! deterministically even when the parameter pull succeeded.

use bitflags::bitflags;

use crate::config::Capabilities;

/// Response opcode (server → client only).
pub const RESPONSE_OPCODE: u8 = 0x60;

/// Response frame size: response opcode + echoed opcode + result code.
pub const RESPONSE_SIZE: usize = 3;

const OPCODE_SIZE: usize = 1;
const READ_PARAMS_SIZE: usize = 8;
const WRITE_PARAMS_SIZE: usize = 9;
const CS_CALC_PARAMS_SIZE: usize = 8;
const CREATE_FIXED_PARAMS_SIZE: usize = 4;

/// Control-point procedure opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Create = 0x01,
    Delete = 0x02,
    CalcChecksum = 0x03,
    Execute = 0x04,
    Read = 0x05,
    Write = 0x06,
    Abort = 0x07,
}

/// Result codes carried in the response indication (OTS assignment).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ResultCode {
    Success = 0x01,
    OpcodeNotSupported = 0x02,
    InvalidParameter = 0x03,
    InsufficientResources = 0x04,
    InvalidObject = 0x05,
    ChannelUnavailable = 0x06,
    UnsupportedType = 0x07,
    NotPermitted = 0x08,
    ObjectLocked = 0x09,
    OperationFailed = 0x0A,
}

bitflags! {
    /// Write procedure mode bits. Only truncate is defined; it is not
    /// supported by this subsystem. All other bits are reserved.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WriteMode: u8 {
        const TRUNCATE = 1 << 0;
    }
}

impl WriteMode {
    /// Whether any reserved bit is set.
    pub fn has_reserved_bits(self) -> bool {
        self.bits() & !Self::all().bits() != 0
    }
}

/// Variable-length object type identifier carried by Create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Uuid16(u16),
    Uuid32(u32),
    Uuid128([u8; 16]),
}

impl ObjectType {
    fn wire_len(self) -> usize {
        match self {
            Self::Uuid16(_) => 2,
            Self::Uuid32(_) => 4,
            Self::Uuid128(_) => 16,
        }
    }
}

/// A decoded control-point command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Create { size: u32, obj_type: ObjectType },
    Delete,
    CalcChecksum { offset: u32, len: u32 },
    Execute,
    Read { offset: u32, len: u32 },
    Write { offset: u32, len: u32, mode: WriteMode },
    Abort,
}

impl Command {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Create { .. } => Opcode::Create,
            Self::Delete => Opcode::Delete,
            Self::CalcChecksum { .. } => Opcode::CalcChecksum,
            Self::Execute => Opcode::Execute,
            Self::Read { .. } => Opcode::Read,
            Self::Write { .. } => Opcode::Write,
            Self::Abort => Opcode::Abort,
        }
    }
}

/// Decode failure. `opcode` is the raw first byte (0 for an empty frame)
/// so the responder can echo it; `result` is the code to indicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeError {
    pub opcode: u8,
    pub result: ResultCode,
}

fn pull_le32(params: &[u8]) -> Option<u32> {
    let bytes: [u8; 4] = params.get(..4)?.try_into().ok()?;
    Some(u32::from_le_bytes(bytes))
}

/// Decode a control-point frame.
///
/// Write frames decode only when the write capability is enabled; with it
/// disabled the opcode is reported as unsupported, as if the procedure did
/// not exist at all.
pub fn decode(buf: &[u8], caps: Capabilities) -> Result<Command, DecodeError> {
    let Some((&opcode, params)) = buf.split_first() else {
        return Err(DecodeError {
            opcode: 0,
            result: ResultCode::InvalidParameter,
        });
    };

    let truncated = DecodeError {
        opcode,
        result: ResultCode::InvalidParameter,
    };

    match opcode {
        0x01 => {
            let size = pull_le32(params).ok_or(truncated)?;
            let type_bytes = &params[CREATE_FIXED_PARAMS_SIZE..];
            let obj_type = match *type_bytes {
                [a, b] => ObjectType::Uuid16(u16::from_le_bytes([a, b])),
                [a, b, c, d] => ObjectType::Uuid32(u32::from_le_bytes([a, b, c, d])),
                _ => match type_bytes.try_into() {
                    Ok(uuid) => ObjectType::Uuid128(uuid),
                    Err(_) => return Err(truncated),
                },
            };
            Ok(Command::Create { size, obj_type })
        }
        0x02 => Ok(Command::Delete),
        0x03 => {
            let offset = pull_le32(params).ok_or(truncated)?;
            let len = pull_le32(&params[4..]).ok_or(truncated)?;
            Ok(Command::CalcChecksum { offset, len })
        }
        0x04 => Ok(Command::Execute),
        0x05 => {
            let offset = pull_le32(params).ok_or(truncated)?;
            let len = pull_le32(&params[4..]).ok_or(truncated)?;
            Ok(Command::Read { offset, len })
        }
        0x06 if caps.write => {
            let offset = pull_le32(params).ok_or(truncated)?;
            let len = pull_le32(&params[4..]).ok_or(truncated)?;
            let mode = WriteMode::from_bits_retain(*params.get(8).ok_or(truncated)?);
            Ok(Command::Write { offset, len, mode })
        }
        _ => Err(DecodeError {
            opcode,
            result: ResultCode::OpcodeNotSupported,
        }),
    }
}

/// Independent re-validation that the wire length equals the fixed size
/// for the command's parameters.
pub fn length_matches(cmd: &Command, wire_len: usize) -> bool {
    let params_len = match cmd {
        Command::Create { obj_type, .. } => CREATE_FIXED_PARAMS_SIZE + obj_type.wire_len(),
        Command::Delete | Command::Execute | Command::Abort => 0,
        Command::CalcChecksum { .. } => CS_CALC_PARAMS_SIZE,
        Command::Read { .. } => READ_PARAMS_SIZE,
        Command::Write { .. } => WRITE_PARAMS_SIZE,
    };

    wire_len == OPCODE_SIZE + params_len
}

/// Encode the response indication payload.
pub fn encode_response(req_opcode: u8, result: ResultCode) -> [u8; RESPONSE_SIZE] {
    [RESPONSE_OPCODE, req_opcode, result as u8]
}

// ── Tests ────────────────────────────────────────────────────
