//! Frame encoding/decoding utilities.
//!
//! Each frame is a self-delimited envelope around one kind byte and its
//! payload:
//!
//! ```text
//! +-------+------+--------+-----------------+----------+-----+
//! | START | KIND | LENGTH | PAYLOAD[0..len] | CHECKSUM | END |
//! +-------+------+--------+-----------------+----------+-----+
//! ```
//!
//! LENGTH counts unescaped payload bytes. A payload byte equal to either
//! sentinel is doubled on the wire so a receiver joining mid-stream cannot
//! mistake it for a frame boundary. CHECKSUM is the XOR of KIND, LENGTH,
//! and the unescaped payload bytes.

use bytes::{Buf, BytesMut};

use crate::constants::*;
use crate::error::ProtocolError;

/// XOR checksum over the frame header and unescaped payload.
fn checksum(kind: u8, length: u8, payload: &[u8]) -> u8 {
    let mut chk = kind ^ length;
    for &byte in payload {
        chk ^= byte;
    }
    chk
}

/// The wire-level envelope of one message or command.
///
/// A frame has no persistent identity; it exists only between a typed value
/// and the transmit/receive buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Kind code (command or message).
    pub kind: u8,
    /// Unescaped payload bytes.
    pub payload: Vec<u8>,
}

impl Frame {
    /// Create a new frame with the given kind and payload.
    pub fn new(kind: u8, payload: Vec<u8>) -> Result<Self, ProtocolError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                max: MAX_PAYLOAD_SIZE,
                actual: payload.len(),
            });
        }
        Ok(Frame { kind, payload })
    }

    /// Create a frame with no payload.
    pub fn empty(kind: u8) -> Self {
        Frame {
            kind,
            payload: Vec::new(),
        }
    }

    /// Encode this frame for transmission.
    ///
    /// Deterministic and infallible for a constructed frame. Output length
    /// is `FRAME_OVERHEAD` plus the escaped payload length.
    pub fn encode(&self) -> Vec<u8> {
        let length = self.payload.len() as u8;
        let mut buf = Vec::with_capacity(FRAME_OVERHEAD + self.payload.len());
        buf.push(FRAME_START);
        buf.push(self.kind);
        buf.push(length);
        for &byte in &self.payload {
            buf.push(byte);
            if byte == FRAME_START || byte == FRAME_END {
                buf.push(byte);
            }
        }
        buf.push(checksum(self.kind, length, &self.payload));
        buf.push(FRAME_END);
        buf
    }
}

/// A codec for reading and writing framed data over an unreliable byte
/// stream.
///
/// Incoming bytes accumulate in a rolling buffer. [`FrameCodec::decode`]
/// either yields one complete, checksum-verified frame, reports that more
/// input is needed, or reports a malformed frame after resynchronizing on
/// the next start sentinel. A single corrupted byte never permanently
/// desynchronizes the link.
#[derive(Debug, Default)]
pub struct FrameCodec {
    /// Buffer for accumulating incoming data.
    buffer: BytesMut,
}

impl FrameCodec {
    /// Create a new frame codec.
    pub fn new() -> Self {
        FrameCodec {
            buffer: BytesMut::with_capacity(MAX_FRAME_SIZE),
        }
    }

    /// Add received data to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to decode the next frame from the buffer.
    ///
    /// Returns `Ok(Some(frame))` when a complete frame was consumed,
    /// `Ok(None)` when more input is needed, or `Err` when a malformed
    /// frame was discarded. After an `Err` the buffer is already positioned
    /// at the next start-sentinel candidate, so callers keep calling until
    /// `Ok(None)`.
    pub fn decode(&mut self) -> Result<Option<Frame>, ProtocolError> {
        // Scan for the start sentinel, discarding any preceding garbage.
        while !self.buffer.is_empty() && self.buffer[0] != FRAME_START {
            self.buffer.advance(1);
        }

        // Need at least START + KIND + LENGTH to size the frame.
        if self.buffer.len() < 3 {
            return Ok(None);
        }

        let kind = self.buffer[1];
        let length = self.buffer[2] as usize;

        // Walk the escaped payload region, collecting unescaped bytes.
        let mut payload = Vec::with_capacity(length);
        let mut pos = 3;
        while payload.len() < length {
            let Some(&byte) = self.buffer.get(pos) else {
                return Ok(None);
            };
            if byte == FRAME_START || byte == FRAME_END {
                match self.buffer.get(pos + 1) {
                    // A trailing sentinel cannot be disambiguated yet.
                    None => return Ok(None),
                    Some(&next) if next == byte => {
                        payload.push(byte);
                        pos += 2;
                    }
                    Some(_) => {
                        // A lone sentinel inside the payload region means
                        // the frame is corrupt. Resynchronize on the
                        // sentinel itself when it can anchor a new frame,
                        // otherwise just past it.
                        let skip = if byte == FRAME_START { pos } else { pos + 1 };
                        log::debug!(
                            "frame truncated by sentinel 0x{:02X} after {} payload bytes",
                            byte,
                            payload.len()
                        );
                        self.buffer.advance(skip);
                        return Err(ProtocolError::TruncatedFrame);
                    }
                }
            } else {
                payload.push(byte);
                pos += 1;
            }
        }

        let Some(&received) = self.buffer.get(pos) else {
            return Ok(None);
        };
        let Some(&end) = self.buffer.get(pos + 1) else {
            return Ok(None);
        };

        if end != FRAME_END {
            // No closing sentinel where one belongs. Drop the anchoring
            // start byte and rescan; an embedded genuine frame stays
            // reachable.
            log::debug!("frame missing end sentinel, resyncing");
            self.buffer.advance(1);
            return Err(ProtocolError::TruncatedFrame);
        }

        let expected = checksum(kind, length as u8, &payload);
        if received != expected {
            log::debug!(
                "discarding frame with bad checksum: expected 0x{:02X}, received 0x{:02X}",
                expected,
                received
            );
            self.buffer.advance(pos + 2);
            return Err(ProtocolError::BadChecksum { expected, received });
        }

        self.buffer.advance(pos + 2);
        log::trace!("decoded frame kind 0x{:02X}, {} payload bytes", kind, length);
        Ok(Some(Frame { kind, payload }))
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
