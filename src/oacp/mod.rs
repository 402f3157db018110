//! Object Action Control Point subsystem.
//!
//! Request/response state machine over an indicate-based control channel,
//! plus a companion bulk-data channel for object content.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       OACP Stack                            │
//! │                                                             │
//! │  ┌───────────┐   ┌───────────┐   ┌───────────────────────┐ │
//! │  │ Attribute │──▶│   Codec   │──▶│ Validator → object    │ │
//! │  │ write     │   │ (frames)  │   │ state transition      │ │
//! │  └───────────┘   └───────────┘   └───────────┬───────────┘ │
//! │        ▲                                     │             │
//! │        │ indication + ack                    ▼             │
//! │  ┌───────────┐                 ┌───────────────────────┐  │
//! │  │ Responder │────────────────▶│   Transfer engine     │  │
//! │  │           │                 │ (chunk pump, 1 chunk  │  │
//! │  └───────────┘                 │  in flight)           │  │
//! │                                └──────────┬────────────┘  │
//! │                                           ▼               │
//! │                                    Bulk channel           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod codec;
pub mod responder;

mod transfer;
mod validator;

pub use responder::{CCC_INDICATE, OacpService};
