//! Messages sent by the device in reply to commands.

use crate::constants::*;
use crate::error::{FailureCode, ProtocolError};
use crate::frame::Frame;

/// The semantic role of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Command received and accepted.
    Ack,
    /// Frame rejected (malformed, bad checksum, or unknown command).
    Nack,
    /// Command action completed.
    Success,
    /// Command action failed; payload starts with a failure code.
    Error,
    /// Device identity string.
    Identity,
    /// Current data payload.
    Data,
}

impl MessageKind {
    /// Get the wire code for this kind.
    pub fn code(&self) -> u8 {
        match self {
            MessageKind::Ack => MSG_ACK,
            MessageKind::Nack => MSG_NACK,
            MessageKind::Success => MSG_SUCCESS,
            MessageKind::Error => MSG_ERROR,
            MessageKind::Identity => MSG_IDENTITY,
            MessageKind::Data => MSG_DATA,
        }
    }

    /// Look up a kind from its wire code.
    pub fn from_code(code: u8) -> Result<Self, ProtocolError> {
        match code {
            MSG_ACK => Ok(MessageKind::Ack),
            MSG_NACK => Ok(MessageKind::Nack),
            MSG_SUCCESS => Ok(MessageKind::Success),
            MSG_ERROR => Ok(MessageKind::Error),
            MSG_IDENTITY => Ok(MessageKind::Identity),
            MSG_DATA => Ok(MessageKind::Data),
            _ => Err(ProtocolError::UnknownKind(code)),
        }
    }
}

/// A typed message: kind plus optional payload.
///
/// Messages are immutable once constructed and built fresh per
/// transmission; encode/decode is bijective for every valid message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    kind: MessageKind,
    payload: Vec<u8>,
}

impl Message {
    /// Create a message with an arbitrary payload.
    pub fn new(kind: MessageKind, payload: Vec<u8>) -> Result<Self, ProtocolError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                max: MAX_PAYLOAD_SIZE,
                actual: payload.len(),
            });
        }
        Self::validate(kind, &payload)?;
        Ok(Message { kind, payload })
    }

    /// Kind-specific payload requirements, shared by construction and
    /// decode so everything constructible survives the wire.
    fn validate(kind: MessageKind, payload: &[u8]) -> Result<(), ProtocolError> {
        match kind {
            MessageKind::Error if payload.is_empty() => Err(ProtocolError::FrameTooShort {
                expected: 1,
                actual: 0,
            }),
            MessageKind::Identity if std::str::from_utf8(payload).is_err() => {
                Err(ProtocolError::InvalidUtf8)
            }
            _ => Ok(()),
        }
    }

    /// Acknowledge receipt of a command.
    pub fn ack() -> Self {
        Message {
            kind: MessageKind::Ack,
            payload: Vec::new(),
        }
    }

    /// Reject a malformed or unrecognized frame.
    pub fn nack() -> Self {
        Message {
            kind: MessageKind::Nack,
            payload: Vec::new(),
        }
    }

    /// Report a completed action.
    pub fn success() -> Self {
        Message {
            kind: MessageKind::Success,
            payload: Vec::new(),
        }
    }

    /// Report a failed action.
    pub fn error(code: FailureCode) -> Self {
        Message {
            kind: MessageKind::Error,
            payload: vec![code.into()],
        }
    }

    /// Report a failed action with a human-readable detail string.
    pub fn error_with_detail(code: FailureCode, detail: &str) -> Result<Self, ProtocolError> {
        let mut payload = Vec::with_capacity(1 + detail.len());
        payload.push(code.into());
        payload.extend_from_slice(detail.as_bytes());
        Message::new(MessageKind::Error, payload)
    }

    /// Carry the device identity string.
    pub fn identity(name: &str) -> Result<Self, ProtocolError> {
        Message::new(MessageKind::Identity, name.as_bytes().to_vec())
    }

    /// Carry the current data payload.
    pub fn data(bytes: Vec<u8>) -> Result<Self, ProtocolError> {
        Message::new(MessageKind::Data, bytes)
    }

    /// Get the message kind.
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Get the raw payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get the identity string, if this is an `IDENTITY` message.
    pub fn identity_str(&self) -> Option<&str> {
        match self.kind {
            MessageKind::Identity => std::str::from_utf8(&self.payload).ok(),
            _ => None,
        }
    }

    /// Get the failure code, if this is an `ERROR` message.
    pub fn failure_code(&self) -> Option<FailureCode> {
        match self.kind {
            MessageKind::Error => self.payload.first().map(|&code| FailureCode::from(code)),
            _ => None,
        }
    }

    /// Get the failure detail text, if this is an `ERROR` message with one.
    pub fn failure_detail(&self) -> Option<&str> {
        match self.kind {
            MessageKind::Error if self.payload.len() > 1 => {
                std::str::from_utf8(&self.payload[1..]).ok()
            }
            _ => None,
        }
    }

    /// Convert to a wire frame.
    pub fn to_frame(&self) -> Frame {
        Frame {
            kind: self.kind.code(),
            payload: self.payload.clone(),
        }
    }

    /// Recover a message from a decoded frame.
    pub fn from_frame(frame: &Frame) -> Result<Self, ProtocolError> {
        let kind = MessageKind::from_code(frame.kind)?;
        Self::validate(kind, &frame.payload)?;
        Ok(Message {
            kind,
            payload: frame.payload.clone(),
        })
    }

    /// Encode this message for transmission.
    pub fn encode(&self) -> Vec<u8> {
        self.to_frame().encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameCodec;

    #[test]
    fn test_kind_codes_roundtrip() {
        let kinds = [
            MessageKind::Ack,
            MessageKind::Nack,
            MessageKind::Success,
            MessageKind::Error,
            MessageKind::Identity,
            MessageKind::Data,
        ];
        for kind in kinds {
            assert_eq!(MessageKind::from_code(kind.code()).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert_eq!(
            MessageKind::from_code(0x7F),
            Err(ProtocolError::UnknownKind(0x7F))
        );
        // Command codes are not message kinds.
        assert!(MessageKind::from_code(crate::constants::CMD_GET_DATA).is_err());
    }

    #[test]
    fn test_message_wire_roundtrip() {
        let cases = vec![
            Message::ack(),
            Message::nack(),
            Message::success(),
            Message::error(FailureCode::SensorFault),
            Message::error_with_detail(FailureCode::BadState, "not spinning").unwrap(),
            Message::identity("motor_saviour").unwrap(),
            Message::data(vec![0x01, FRAME_START, FRAME_END, 0xFF]).unwrap(),
        ];

        for original in cases {
            let mut codec = FrameCodec::new();
            codec.push(&original.encode());
            let frame = codec.decode().unwrap().expect("should decode frame");
            let decoded = Message::from_frame(&frame).unwrap();
            assert_eq!(decoded, original);
        }
    }

    #[test]
    fn test_identity_accessor() {
        let msg = Message::identity("shock_saviour").unwrap();
        assert_eq!(msg.identity_str(), Some("shock_saviour"));
        assert_eq!(msg.failure_code(), None);
    }

    #[test]
    fn test_error_accessors() {
        let msg = Message::error_with_detail(FailureCode::DataUnavailable, "no sample").unwrap();
        assert_eq!(msg.failure_code(), Some(FailureCode::DataUnavailable));
        assert_eq!(msg.failure_detail(), Some("no sample"));

        let bare = Message::error(FailureCode::SensorFault);
        assert_eq!(bare.failure_code(), Some(FailureCode::SensorFault));
        assert_eq!(bare.failure_detail(), None);
    }

    #[test]
    fn test_empty_error_frame_rejected() {
        let frame = Frame::empty(MSG_ERROR);
        assert_eq!(
            Message::from_frame(&frame),
            Err(ProtocolError::FrameTooShort {
                expected: 1,
                actual: 0,
            })
        );
    }

    #[test]
    fn test_non_utf8_identity_rejected() {
        let frame = Frame::new(MSG_IDENTITY, vec![0xFF, 0xFE]).unwrap();
        assert_eq!(Message::from_frame(&frame), Err(ProtocolError::InvalidUtf8));
    }
}
