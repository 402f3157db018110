//! Object Transfer Service control-point engine.
//!
//! Transport-agnostic implementation of the Object Action Control Point:
//! a client writes a command to the control point, the service answers
//! with a response indication, and accepted Read/Write procedures move
//! object content over a separate flow-controlled bulk channel, one chunk
//! in flight at a time.
//!
//! The underlying transport, attribute table and object metadata store
//! are collaborators behind the traits in [`ports`].

#![cfg_attr(not(test), no_std)]
#![deny(unused_must_use)]

pub mod config;
pub mod error;
pub mod oacp;
pub mod object;
pub mod ports;
pub mod storage;

pub use config::Capabilities;
pub use oacp::OacpService;
