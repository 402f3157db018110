//! Service capability configuration.
//!
//! Feature switches are runtime capabilities fixed at service
//! construction. A disabled capability changes individual check outcomes,
//! never the validation ordering.

/// OACP feature set of this service instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Whether the Write procedure is supported at all. When disabled,
    /// Write frames fail at decode with `OpcodeNotSupported`.
    pub write: bool,
    /// Whether writes may overlap already-valid content ("patch"). Both
    /// this flag and the object's PATCH property must hold.
    pub patch: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            write: true,
            patch: true,
        }
    }
}
