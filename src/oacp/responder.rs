//! Control-point request/response handling.
//!
//! [`OacpService`] is the subsystem's entry point. The attribute layer
//! feeds it control-point writes and subscription changes; the bulk
//! channel's owner feeds it data-arrival, send-complete and closure
//! events. Collaborators are passed per call, so the service owns nothing
//! but the protocol state: the armed flag, the capabilities, and the
//! current object.
//!
//! Every decoded command is answered with a response indication, success
//! or not. Only the two pre-decode protocol rejects (indications not
//! armed, non-zero attribute offset) refuse the write itself.

use log::{debug, error, warn};

use crate::config::Capabilities;
use crate::error::{AttError, SelectError, TransferError};
use crate::object::{Object, OperationState};
use crate::ports::{BulkChannel, IndicationSink, ObjectIo};

use super::codec::{self, ResultCode};
use super::{transfer, validator};

/// CCC descriptor value that arms control-point indications. Notify-only
/// subscriptions do not arm.
pub const CCC_INDICATE: u16 = 0x0002;

/// Object Action Control Point service state machine.
pub struct OacpService {
    caps: Capabilities,
    indications_armed: bool,
    cur_obj: Option<Object>,
}

impl OacpService {
    pub fn new(caps: Capabilities) -> Self {
        Self {
            caps,
            indications_armed: false,
            cur_obj: None,
        }
    }

    /// Make `obj` the current object. Rejected while a transfer is in
    /// progress on the previously selected object.
    pub fn select_object(&mut self, obj: Object) -> Result<(), SelectError> {
        if self.transfer_in_progress() {
            return Err(SelectError::TransferInProgress);
        }
        self.cur_obj = Some(obj);
        Ok(())
    }

    /// Clear the current object selection.
    pub fn deselect_object(&mut self) -> Result<Option<Object>, SelectError> {
        if self.transfer_in_progress() {
            return Err(SelectError::TransferInProgress);
        }
        Ok(self.cur_obj.take())
    }

    pub fn current_object(&self) -> Option<&Object> {
        self.cur_obj.as_ref()
    }

    pub fn indications_armed(&self) -> bool {
        self.indications_armed
    }

    fn transfer_in_progress(&self) -> bool {
        self.cur_obj.is_some_and(|o| !o.state.is_idle())
    }

    /// Subscription-change event for the control point CCC descriptor.
    pub fn on_subscription_change(&mut self, value: u16) {
        debug!("control point CCC value: {value:#06x}");
        self.indications_armed = value == CCC_INDICATE;
    }

    /// Control-point write from the attribute layer.
    ///
    /// Returns the number of bytes accepted — always the full frame,
    /// since the outcome is reported asynchronously via indication —
    /// or an [`AttError`] for the two protocol-level rejects.
    pub fn on_control_point_write(
        &mut self,
        buf: &[u8],
        attr_offset: u16,
        chan: &impl BulkChannel,
        ind: &mut impl IndicationSink,
    ) -> Result<usize, AttError> {
        debug!("control point write, {} bytes", buf.len());

        if !self.indications_armed {
            warn!("control point indications not enabled");
            return Err(AttError::ImproperlyConfigured);
        }

        if attr_offset != 0 {
            error!("invalid control point write offset {attr_offset}");
            return Err(AttError::InvalidOffset);
        }

        let (opcode, result) = match codec::decode(buf, self.caps) {
            Err(e) => (e.opcode, e.result),
            Ok(cmd) => {
                let opcode = cmd.opcode() as u8;
                if codec::length_matches(&cmd, buf.len()) {
                    let result =
                        validator::validate(&cmd, self.cur_obj.as_mut(), self.caps, chan.is_open());
                    (opcode, result)
                } else {
                    error!("invalid control point frame length for opcode {opcode:#04x}");
                    (opcode, ResultCode::InvalidParameter)
                }
            }
        };

        if result != ResultCode::Success {
            warn!("control point error status {:#04x}", result as u8);
        }

        let payload = codec::encode_response(opcode, result);
        debug!("sending control point response indication");
        if let Err(e) = ind.indicate(&payload) {
            warn!("response indication failed: {e}");
        }

        Ok(buf.len())
    }

    /// The client acknowledged the response indication. A pending read
    /// starts its chunk pump here; a pending write waits for channel data.
    pub fn on_indication_ack(
        &mut self,
        status: u8,
        chan: &mut impl BulkChannel,
        io: &mut impl ObjectIo,
    ) {
        debug!("indication ack, status {status:#06x}");

        let Some(obj) = self.cur_obj.as_mut() else {
            return;
        };

        match obj.state {
            OperationState::Reading { .. } => transfer::drive_read(obj, chan, io),
            // Write execution is driven by bulk-channel data arrival.
            OperationState::Writing { .. } => {}
            OperationState::Idle => error!("indication ack with no operation in progress"),
        }
    }

    /// The bulk channel finished sending the previous chunk; push the
    /// next one.
    pub fn on_send_complete(&mut self, chan: &mut impl BulkChannel, io: &mut impl ObjectIo) {
        if let Some(obj) = self.cur_obj.as_mut() {
            transfer::drive_read(obj, chan, io);
        }
    }

    /// Data arrived on the bulk channel during a write transfer.
    pub fn on_bulk_data(
        &mut self,
        data: &[u8],
        io: &mut impl ObjectIo,
    ) -> Result<usize, TransferError> {
        let Some(obj) = self.cur_obj.as_mut() else {
            error!("bulk data arrived with no object selected");
            return Err(TransferError::NotActive);
        };

        transfer::handle_incoming(obj, data, io)
    }

    /// The bulk channel closed. Any in-progress transfer reverts to idle.
    pub fn on_channel_closed(&mut self) {
        if let Some(obj) = self.cur_obj.as_mut() {
            transfer::abort(obj);
        }
    }
}

// ── Tests ────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChannelError;
    use crate::object::{Metadata, ObjectId, Properties};
    use crate::ports::NullChannel;

    struct RecordingSink {
        indicated: Vec<[u8; 3]>,
        accept: bool,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                indicated: Vec::new(),
                accept: true,
            }
        }
    }

    impl IndicationSink for RecordingSink {
        fn indicate(&mut self, payload: &[u8]) -> Result<(), ChannelError> {
            if !self.accept {
                return Err(ChannelError::NotOpen);
            }
            self.indicated.push(payload.try_into().expect("3-byte response"));
            Ok(())
        }
    }

    fn armed_service() -> OacpService {
        let mut svc = OacpService::new(Capabilities::default());
        svc.on_subscription_change(CCC_INDICATE);
        svc
    }

    fn read_frame(offset: u32, len: u32) -> [u8; 9] {
        let mut frame = [0u8; 9];
        frame[0] = 0x05;
        frame[1..5].copy_from_slice(&offset.to_le_bytes());
        frame[5..9].copy_from_slice(&len.to_le_bytes());
        frame
    }

    #[test]
    fn write_rejected_when_not_subscribed() {
        let mut svc = OacpService::new(Capabilities::default());
        let mut sink = RecordingSink::new();
        assert_eq!(
            svc.on_control_point_write(&read_frame(0, 1), 0, &NullChannel, &mut sink),
            Err(AttError::ImproperlyConfigured)
        );
        assert!(sink.indicated.is_empty(), "no indication on ATT reject");
    }

    #[test]
    fn notify_only_subscription_does_not_arm() {
        let mut svc = OacpService::new(Capabilities::default());
        svc.on_subscription_change(0x0001);
        assert!(!svc.indications_armed());

        svc.on_subscription_change(CCC_INDICATE);
        assert!(svc.indications_armed());

        svc.on_subscription_change(0x0000);
        assert!(!svc.indications_armed());
    }

    #[test]
    fn write_rejected_at_nonzero_attr_offset() {
        let mut svc = armed_service();
        let mut sink = RecordingSink::new();
        assert_eq!(
            svc.on_control_point_write(&read_frame(0, 1), 1, &NullChannel, &mut sink),
            Err(AttError::InvalidOffset)
        );
        assert!(sink.indicated.is_empty());
    }

    #[test]
    fn failing_command_still_indicated_and_accepted() {
        let mut svc = armed_service();
        let mut sink = RecordingSink::new();

        // No object selected: InvalidObject over the indication.
        let frame = read_frame(0, 1);
        let accepted = svc
            .on_control_point_write(&frame, 0, &NullChannel, &mut sink)
            .unwrap();
        assert_eq!(accepted, frame.len());
        assert_eq!(sink.indicated[0], [0x60, 0x05, 0x05]);
    }

    #[test]
    fn length_mismatch_indicated_as_invalid_parameter() {
        let mut svc = armed_service();
        let mut sink = RecordingSink::new();

        // Read frame padded by one byte.
        let mut frame = [0u8; 10];
        frame[..9].copy_from_slice(&read_frame(0, 1));
        svc.on_control_point_write(&frame, 0, &NullChannel, &mut sink)
            .unwrap();
        assert_eq!(sink.indicated[0], [0x60, 0x05, 0x03]);
    }

    #[test]
    fn unknown_opcode_indicated_with_echo() {
        let mut svc = armed_service();
        let mut sink = RecordingSink::new();

        svc.on_control_point_write(&[0xF0], 0, &NullChannel, &mut sink)
            .unwrap();
        assert_eq!(sink.indicated[0], [0x60, 0xF0, 0x02]);
    }

    #[test]
    fn empty_frame_indicated_as_invalid_parameter() {
        let mut svc = armed_service();
        let mut sink = RecordingSink::new();

        svc.on_control_point_write(&[], 0, &NullChannel, &mut sink)
            .unwrap();
        assert_eq!(sink.indicated[0], [0x60, 0x00, 0x03]);
    }

    #[test]
    fn indication_send_failure_does_not_alter_state() {
        let mut svc = armed_service();
        svc.select_object(Object::new(
            ObjectId(0x100),
            Metadata {
                cur_size: 10,
                alloc_size: 10,
                props: Properties::READ,
            },
        ))
        .unwrap();

        let mut sink = RecordingSink::new();
        sink.accept = false;

        // Validation fails (channel closed) — state stays idle either way,
        // and the dropped indication is only logged.
        let accepted = svc
            .on_control_point_write(&read_frame(0, 5), 0, &NullChannel, &mut sink)
            .unwrap();
        assert_eq!(accepted, 9);
        assert!(svc.current_object().unwrap().state.is_idle());
    }

    #[test]
    fn select_rejected_during_transfer() {
        let mut svc = armed_service();
        let mut obj = Object::new(
            ObjectId(0x100),
            Metadata {
                cur_size: 10,
                alloc_size: 10,
                props: Properties::READ,
            },
        );
        svc.select_object(obj).unwrap();

        // Force an in-progress state through the public path is covered by
        // the integration tests; here, re-selection with a busy object.
        obj.state = OperationState::Reading {
            offset: 0,
            len: 10,
            sent: 0,
        };
        svc.cur_obj = Some(obj);

        assert_eq!(
            svc.select_object(obj),
            Err(SelectError::TransferInProgress)
        );
        assert_eq!(
            svc.deselect_object(),
            Err(SelectError::TransferInProgress)
        );

        svc.on_channel_closed();
        assert!(svc.select_object(obj).is_ok());
    }
}
