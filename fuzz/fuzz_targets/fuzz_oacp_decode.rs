//! Fuzz target: control-point frame decoding.
//!
//! Drives arbitrary byte sequences through `decode` under both capability
//! settings and asserts that decoding never panics, always echoes the
//! opcode byte it was given, and that length verification and response
//! encoding stay total.
//!
//! cargo fuzz run fuzz_oacp_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use otsvc::oacp::codec;
use otsvc::Capabilities;

fuzz_target!(|data: &[u8]| {
    for caps in [
        Capabilities::default(),
        Capabilities {
            write: false,
            patch: false,
        },
    ] {
        match codec::decode(data, caps) {
            Ok(cmd) => {
                assert_eq!(cmd.opcode() as u8, data[0], "opcode echo must match");
                let _ = codec::length_matches(&cmd, data.len());
            }
            Err(e) => {
                assert_eq!(e.opcode, data.first().copied().unwrap_or(0));
                let _ = codec::encode_response(e.opcode, e.result);
            }
        }
    }
});
