//! Object model shared between the control-point path and the transfer
//! engine.
//!
//! Operation state is an explicit sum type rather than a tagged union, so
//! the read and write event paths can never observe each other's progress
//! fields through aliasing.

use bitflags::bitflags;

/// Opaque object identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u64);

impl ObjectId {
    /// Reserved id of the directory-listing object. Reads of it complete
    /// without a terminal read-done signal.
    pub const DIR_LIST: ObjectId = ObjectId(0);

    pub fn is_dir_list(self) -> bool {
        self == Self::DIR_LIST
    }
}

bitflags! {
    /// Object property bits (OTS assignment).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Properties: u32 {
        const DELETE   = 1 << 0;
        const EXECUTE  = 1 << 1;
        const READ     = 1 << 2;
        const WRITE    = 1 << 3;
        /// Append is not supported by this subsystem.
        const APPEND   = 1 << 4;
        /// Truncate is not supported by this subsystem.
        const TRUNCATE = 1 << 5;
        const PATCH    = 1 << 6;
        const MARK     = 1 << 7;
    }
}

/// Size and permission metadata for one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    /// Current (valid) content size in bytes.
    pub cur_size: u32,
    /// Allocated capacity in bytes; writes may never extend past this.
    pub alloc_size: u32,
    pub props: Properties,
}

/// Per-object operation state.
///
/// Exactly one operation may be in progress; entering a new one requires
/// `Idle` (enforced by the validator, observable to clients as
/// `ObjectLocked`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Idle,
    /// A Read procedure was accepted; `sent` bytes of the requested window
    /// have been handed to the bulk channel so far.
    Reading { offset: u32, len: u32, sent: u32 },
    /// A Write procedure was accepted; `received` bytes of the declared
    /// window have been credited so far.
    Writing {
        offset: u32,
        len: u32,
        received: u32,
    },
}

impl OperationState {
    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }
}

/// An object as seen by the OACP subsystem: identity, metadata, and the
/// single in-progress operation slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Object {
    pub id: ObjectId,
    pub metadata: Metadata,
    pub state: OperationState,
}

impl Object {
    pub fn new(id: ObjectId, metadata: Metadata) -> Self {
        Self {
            id,
            metadata,
            state: OperationState::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_list_id_is_reserved() {
        assert!(ObjectId::DIR_LIST.is_dir_list());
        assert!(!ObjectId(0x100).is_dir_list());
    }

    #[test]
    fn new_object_starts_idle() {
        let obj = Object::new(
            ObjectId(0x100),
            Metadata {
                cur_size: 10,
                alloc_size: 20,
                props: Properties::READ | Properties::WRITE,
            },
        );
        assert!(obj.state.is_idle());
    }
}
