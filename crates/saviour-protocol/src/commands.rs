//! Commands that can be sent to a SAVIOUR device.

use crate::constants::*;
use crate::error::ProtocolError;
use crate::frame::Frame;

/// The request a command makes of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Ask the device to identify itself.
    GetIdentity,
    /// Ask the device for its current data payload.
    GetData,
}

impl CommandKind {
    /// Get the wire code for this kind.
    pub fn code(&self) -> u8 {
        match self {
            CommandKind::GetIdentity => CMD_GET_IDENTITY,
            CommandKind::GetData => CMD_GET_DATA,
        }
    }

    /// Look up a kind from its wire code.
    pub fn from_code(code: u8) -> Result<Self, ProtocolError> {
        match code {
            CMD_GET_IDENTITY => Ok(CommandKind::GetIdentity),
            CMD_GET_DATA => Ok(CommandKind::GetData),
            _ => Err(ProtocolError::UnknownCommand(code)),
        }
    }
}

/// A decoded request from the host.
///
/// The frame payload field carries command arguments; both declared
/// commands take none, so decode rejects stray argument bytes to keep the
/// wire mapping bijective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Query the device identity string.
    GetIdentity,
    /// Fetch the current data payload.
    GetData,
}

impl Command {
    /// Get the kind of this command.
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::GetIdentity => CommandKind::GetIdentity,
            Command::GetData => CommandKind::GetData,
        }
    }

    /// Get the command code for this command.
    pub fn code(&self) -> u8 {
        self.kind().code()
    }

    /// Convert to a wire frame.
    pub fn to_frame(&self) -> Frame {
        Frame::empty(self.code())
    }

    /// Recover a command from a decoded frame.
    pub fn from_frame(frame: &Frame) -> Result<Self, ProtocolError> {
        let kind = CommandKind::from_code(frame.kind)?;
        if !frame.payload.is_empty() {
            return Err(ProtocolError::InvalidData(format!(
                "command 0x{:02X} takes no arguments, got {} bytes",
                frame.kind,
                frame.payload.len()
            )));
        }
        Ok(match kind {
            CommandKind::GetIdentity => Command::GetIdentity,
            CommandKind::GetData => Command::GetData,
        })
    }

    /// Encode this command for transmission.
    pub fn encode(&self) -> Vec<u8> {
        self.to_frame().encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameCodec;

    #[test]
    fn test_command_codes() {
        assert_eq!(Command::GetIdentity.code(), CMD_GET_IDENTITY);
        assert_eq!(Command::GetData.code(), CMD_GET_DATA);
    }

    #[test]
    fn test_command_wire_roundtrip() {
        for original in [Command::GetIdentity, Command::GetData] {
            let mut codec = FrameCodec::new();
            codec.push(&original.encode());
            let frame = codec.decode().unwrap().expect("should decode frame");
            assert_eq!(Command::from_frame(&frame).unwrap(), original);
        }
    }

    #[test]
    fn test_unknown_command_rejected() {
        let frame = Frame::empty(0x7F);
        assert_eq!(
            Command::from_frame(&frame),
            Err(ProtocolError::UnknownCommand(0x7F))
        );
        // Message codes are not commands.
        let frame = Frame::empty(MSG_DATA);
        assert_eq!(
            Command::from_frame(&frame),
            Err(ProtocolError::UnknownCommand(MSG_DATA))
        );
    }

    #[test]
    fn test_stray_arguments_rejected() {
        let frame = Frame::new(CMD_GET_DATA, vec![0x01]).unwrap();
        assert!(matches!(
            Command::from_frame(&frame),
            Err(ProtocolError::InvalidData(_))
        ));
    }
}
