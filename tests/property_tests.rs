//! Property and fuzz-style tests for robustness of the protocol surface.

use otsvc::error::ChannelError;
use otsvc::oacp::codec::{self, Command, WriteMode};
use otsvc::oacp::{CCC_INDICATE, OacpService};
use otsvc::object::{ObjectId, Properties};
use otsvc::ports::{BulkChannel, IndicationSink};
use otsvc::storage::RamObject;
use otsvc::Capabilities;
use proptest::prelude::*;

// ── Codec invariants ──────────────────────────────────────────

proptest! {
    /// Decoding arbitrary bytes never panics, and a decoded command
    /// always carries the opcode byte it was framed with.
    #[test]
    fn decode_is_total(frame in proptest::collection::vec(any::<u8>(), 0..=64)) {
        for caps in [
            Capabilities::default(),
            Capabilities { write: false, patch: false },
        ] {
            match codec::decode(&frame, caps) {
                Ok(cmd) => {
                    prop_assert_eq!(cmd.opcode() as u8, frame[0]);
                    let _ = codec::length_matches(&cmd, frame.len());
                }
                Err(e) => {
                    prop_assert_eq!(e.opcode, frame.first().copied().unwrap_or(0));
                }
            }
        }
    }

    /// Every fixed-size command accepts exactly one wire length.
    #[test]
    fn length_matches_single_valid_length(wire_len in 0usize..=64) {
        let cases = [
            (Command::Delete, 1usize),
            (Command::Execute, 1),
            (Command::Abort, 1),
            (Command::CalcChecksum { offset: 0, len: 0 }, 9),
            (Command::Read { offset: 0, len: 0 }, 9),
            (Command::Write { offset: 0, len: 0, mode: WriteMode::empty() }, 10),
        ];
        for (cmd, expected) in cases {
            prop_assert_eq!(codec::length_matches(&cmd, wire_len), wire_len == expected);
        }
    }

    /// The response layout always echoes its inputs.
    #[test]
    fn response_echoes_opcode(opcode in any::<u8>()) {
        let res = codec::encode_response(opcode, codec::ResultCode::Success);
        prop_assert_eq!(res[0], 0x60);
        prop_assert_eq!(res[1], opcode);
    }
}

// ── Service robustness ────────────────────────────────────────

struct OpenChannel;

impl BulkChannel for OpenChannel {
    fn is_open(&self) -> bool {
        true
    }

    fn send(&mut self, _data: &[u8]) -> Result<(), ChannelError> {
        Ok(())
    }

    fn disconnect(&mut self) {}
}

struct DiscardSink;

impl IndicationSink for DiscardSink {
    fn indicate(&mut self, _payload: &[u8]) -> Result<(), ChannelError> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum SvcOp {
    ControlWrite(Vec<u8>),
    Ack,
    SendComplete,
    BulkData(Vec<u8>),
    ChannelClosed,
}

fn arb_svc_op() -> impl Strategy<Value = SvcOp> {
    prop_oneof![
        proptest::collection::vec(any::<u8>(), 0..=24).prop_map(SvcOp::ControlWrite),
        Just(SvcOp::Ack),
        Just(SvcOp::SendComplete),
        proptest::collection::vec(any::<u8>(), 0..=24).prop_map(SvcOp::BulkData),
        Just(SvcOp::ChannelClosed),
    ]
}

proptest! {
    /// Arbitrary event sequences never panic and never leave the service
    /// stuck: after a channel closure the object is selectable again.
    #[test]
    fn service_has_no_stuck_states(
        ops in proptest::collection::vec(arb_svc_op(), 1..=32),
    ) {
        let id = ObjectId(0x300);
        let mut ram = RamObject::<64>::with_content(id, &[0u8; 32]).unwrap();
        let mut chan = OpenChannel;
        let mut sink = DiscardSink;

        let mut svc = OacpService::new(Capabilities::default());
        svc.on_subscription_change(CCC_INDICATE);
        let obj = ram.object(Properties::all());
        svc.select_object(obj).unwrap();

        for op in &ops {
            match op {
                SvcOp::ControlWrite(frame) => {
                    let _ = svc.on_control_point_write(frame, 0, &chan, &mut sink);
                }
                SvcOp::Ack => svc.on_indication_ack(0, &mut chan, &mut ram),
                SvcOp::SendComplete => svc.on_send_complete(&mut chan, &mut ram),
                SvcOp::BulkData(data) => {
                    let _ = svc.on_bulk_data(data, &mut ram);
                }
                SvcOp::ChannelClosed => svc.on_channel_closed(),
            }
        }

        svc.on_channel_closed();
        prop_assert!(svc.current_object().unwrap().state.is_idle());
        prop_assert!(svc.select_object(obj).is_ok());
    }

    /// However the client chops the stream, a write never credits more
    /// than the declared length and completes exactly at it.
    #[test]
    fn write_credit_is_bounded(
        declared in 1u32..=48,
        chunks in proptest::collection::vec(1usize..=16, 1..=16),
    ) {
        let id = ObjectId(0x301);
        let mut ram = RamObject::<64>::new(id);
        let mut chan = OpenChannel;
        let mut sink = DiscardSink;

        let mut svc = OacpService::new(Capabilities::default());
        svc.on_subscription_change(CCC_INDICATE);
        svc.select_object(ram.object(Properties::WRITE)).unwrap();

        let mut frame = vec![0x06];
        frame.extend_from_slice(&0u32.to_le_bytes());
        frame.extend_from_slice(&declared.to_le_bytes());
        frame.push(0);
        svc.on_control_point_write(&frame, 0, &chan, &mut sink).unwrap();
        svc.on_indication_ack(0, &mut chan, &mut ram);

        let mut delivered = 0usize;
        for chunk in &chunks {
            let obj = svc.current_object().unwrap();
            if obj.state.is_idle() {
                break;
            }
            let _ = svc.on_bulk_data(&vec![0xC3u8; *chunk], &mut ram);
            delivered += chunk;

            let obj = svc.current_object().unwrap();
            prop_assert!(obj.metadata.cur_size <= declared);
            if delivered >= declared as usize {
                prop_assert!(obj.state.is_idle());
            }
        }

        prop_assert!(ram.content().len() <= declared as usize);
    }
}
