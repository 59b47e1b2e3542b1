//! Protocol constants
//!
//! These constants define the frame sentinels, kind codes, and failure
//! codes used on the SAVIOUR serial link. Command codes (host → device)
//! keep the high bit clear; message codes (device → host) set it.

// ============================================================================
// Frame Layout
// ============================================================================

/// Start-of-frame sentinel.
pub const FRAME_START: u8 = b'<';
/// End-of-frame sentinel.
pub const FRAME_END: u8 = b'>';
/// Fixed bytes per frame: START + KIND + LENGTH + CHECKSUM + END.
pub const FRAME_OVERHEAD: usize = 5;
/// Maximum unescaped payload length (LENGTH is a single byte).
pub const MAX_PAYLOAD_SIZE: usize = 255;
/// Largest possible encoded frame (every payload byte escaped).
pub const MAX_FRAME_SIZE: usize = FRAME_OVERHEAD + 2 * MAX_PAYLOAD_SIZE;

// ============================================================================
// Command Codes (host → device)
// ============================================================================

/// Ask the device to identify itself.
pub const CMD_GET_IDENTITY: u8 = 0x01;
/// Ask the device for its current data payload.
pub const CMD_GET_DATA: u8 = 0x02;

// ============================================================================
// Message Codes (device → host)
// ============================================================================

/// Command received and accepted.
pub const MSG_ACK: u8 = 0x80;
/// Frame rejected (malformed, bad checksum, or unknown command).
pub const MSG_NACK: u8 = 0x81;
/// Command action completed.
pub const MSG_SUCCESS: u8 = 0x82;
/// Command action failed (payload starts with a failure code).
pub const MSG_ERROR: u8 = 0x83;
/// Device identity string.
pub const MSG_IDENTITY: u8 = 0x84;
/// Current data payload.
pub const MSG_DATA: u8 = 0x85;

// ============================================================================
// Failure Codes (first byte of an ERROR payload)
// ============================================================================

/// No data is currently available.
pub const ERR_CODE_DATA_UNAVAILABLE: u8 = 1;
/// A sensor or acquisition fault prevented the read.
pub const ERR_CODE_SENSOR_FAULT: u8 = 2;
/// Bad state for this operation.
pub const ERR_CODE_BAD_STATE: u8 = 3;
/// The produced payload does not fit in a single frame.
pub const ERR_CODE_OVERSIZE_DATA: u8 = 4;
