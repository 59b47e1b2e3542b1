//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when working with the SAVIOUR protocol.
///
/// Every variant here is recoverable: the codec resynchronizes on the next
/// start sentinel and the peer is told with a `NACK`. Nothing at this layer
/// is fatal to the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame payload is shorter than its kind requires.
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// Payload exceeds the single-frame limit.
    #[error("payload too large: maximum {max} bytes, got {actual}")]
    PayloadTooLarge {
        /// Maximum allowed length.
        max: usize,
        /// Actual length supplied.
        actual: usize,
    },

    /// A sentinel interrupted a frame before it was complete.
    #[error("frame truncated before its end sentinel")]
    TruncatedFrame,

    /// Frame checksum did not match its contents.
    #[error("checksum mismatch: expected 0x{expected:02X}, received 0x{received:02X}")]
    BadChecksum {
        /// Checksum computed over the received frame.
        expected: u8,
        /// Checksum byte carried by the frame.
        received: u8,
    },

    /// Unknown message kind code.
    #[error("unknown message kind: 0x{0:02X}")]
    UnknownKind(u8),

    /// Unknown command code.
    #[error("unknown command code: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Invalid data in frame.
    #[error("invalid frame data: {0}")]
    InvalidData(String),

    /// UTF-8 decoding error.
    #[error("invalid UTF-8 in string field")]
    InvalidUtf8,
}

/// Failure reasons carried in the first byte of an `ERROR` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCode {
    /// No data is currently available.
    DataUnavailable,
    /// A sensor or acquisition fault prevented the read.
    SensorFault,
    /// Bad state for this operation.
    BadState,
    /// The produced payload does not fit in a single frame.
    OversizeData,
    /// Unknown failure code.
    Unknown(u8),
}

impl std::fmt::Display for FailureCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureCode::DataUnavailable => write!(f, "data unavailable"),
            FailureCode::SensorFault => write!(f, "sensor fault"),
            FailureCode::BadState => write!(f, "bad state"),
            FailureCode::OversizeData => write!(f, "oversize data"),
            FailureCode::Unknown(code) => write!(f, "unknown failure (0x{:02X})", code),
        }
    }
}

impl From<u8> for FailureCode {
    fn from(code: u8) -> Self {
        use crate::constants::*;
        match code {
            ERR_CODE_DATA_UNAVAILABLE => FailureCode::DataUnavailable,
            ERR_CODE_SENSOR_FAULT => FailureCode::SensorFault,
            ERR_CODE_BAD_STATE => FailureCode::BadState,
            ERR_CODE_OVERSIZE_DATA => FailureCode::OversizeData,
            _ => FailureCode::Unknown(code),
        }
    }
}

impl From<FailureCode> for u8 {
    fn from(code: FailureCode) -> Self {
        use crate::constants::*;
        match code {
            FailureCode::DataUnavailable => ERR_CODE_DATA_UNAVAILABLE,
            FailureCode::SensorFault => ERR_CODE_SENSOR_FAULT,
            FailureCode::BadState => ERR_CODE_BAD_STATE,
            FailureCode::OversizeData => ERR_CODE_OVERSIZE_DATA,
            FailureCode::Unknown(code) => code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_code_roundtrip() {
        for code in 0u8..=8 {
            let parsed = FailureCode::from(code);
            assert_eq!(u8::from(parsed), code);
        }
    }

    #[test]
    fn test_failure_code_display() {
        assert_eq!(FailureCode::SensorFault.to_string(), "sensor fault");
        assert_eq!(FailureCode::Unknown(0xAB).to_string(), "unknown failure (0xAB)");
    }
}
