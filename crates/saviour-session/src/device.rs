//! Device-side protocol engine.
//!
//! The device sits in a cooperative main loop and is polled once per
//! iteration: it drains whatever bytes the transport has buffered, decodes
//! commands, dispatches each to the application, and transmits the reply.
//! Malformed input is answered with `NACK` and discarded; partial input is
//! simply left in the receive buffer until more bytes arrive.

use saviour_protocol::{Command, FailureCode, FrameCodec, Message};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::SessionError;
use crate::transport::WireTransport;

// ============================================================================
// Application Boundary
// ============================================================================

/// The capability a device exposes to the protocol layer.
///
/// The engine never interprets what the data means; it only moves it.
pub trait DeviceApplication {
    /// The fixed identity string reported for `GET_IDENTITY`.
    fn identity(&self) -> String;

    /// The current data payload reported for `GET_DATA`.
    fn current_data(&mut self) -> Result<Vec<u8>, FailureCode>;
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the device engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Engine name used in trace output.
    pub name: String,
    /// Send an `ACK` on receipt of each valid command, before the dispatch
    /// response. Off by default: one command in, one message out.
    pub ack_on_receipt: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            name: "saviour".to_string(),
            ack_on_receipt: false,
        }
    }
}

// ============================================================================
// Command Dispatcher
// ============================================================================

/// Maps a decoded command to exactly one response message.
pub struct Dispatcher<A: DeviceApplication> {
    app: A,
}

impl<A: DeviceApplication> Dispatcher<A> {
    /// Create a dispatcher around an application capability.
    pub fn new(app: A) -> Self {
        Dispatcher { app }
    }

    /// Produce the response for a command. Never silent, never plural.
    pub fn dispatch(&mut self, command: &Command) -> Message {
        match command {
            Command::GetIdentity => {
                let name = self.app.identity();
                match Message::identity(&name) {
                    Ok(msg) => msg,
                    Err(err) => {
                        warn!("identity string does not fit a frame: {}", err);
                        Message::error(FailureCode::OversizeData)
                    }
                }
            }
            Command::GetData => match self.app.current_data() {
                Ok(bytes) => match Message::data(bytes) {
                    Ok(msg) => msg,
                    Err(err) => {
                        warn!("data payload does not fit a frame: {}", err);
                        Message::error(FailureCode::OversizeData)
                    }
                },
                Err(code) => Message::error(code),
            },
        }
    }

    /// Borrow the application.
    pub fn app(&self) -> &A {
        &self.app
    }

    /// Mutably borrow the application.
    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }
}

// ============================================================================
// Device Engine
// ============================================================================

/// The device end of the protocol.
///
/// Owns the receive buffer exclusively; the dispatcher and codec see bytes
/// only for the duration of the call in progress.
pub struct DeviceEngine<A: DeviceApplication> {
    config: DeviceConfig,
    codec: FrameCodec,
    dispatcher: Dispatcher<A>,

    // Statistics
    commands_handled: u32,
    frames_rejected: u32,
}

impl<A: DeviceApplication> DeviceEngine<A> {
    /// Create a new device engine.
    pub fn new(config: DeviceConfig, app: A) -> Self {
        DeviceEngine {
            config,
            codec: FrameCodec::new(),
            dispatcher: Dispatcher::new(app),
            commands_handled: 0,
            frames_rejected: 0,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Get the number of commands dispatched.
    pub fn commands_handled(&self) -> u32 {
        self.commands_handled
    }

    /// Get the number of frames answered with `NACK`.
    pub fn frames_rejected(&self) -> u32 {
        self.frames_rejected
    }

    /// Feed received bytes into the engine.
    ///
    /// Returns the replies to transmit, in order. An empty return means the
    /// input was entirely consumed as partial-frame data.
    pub fn feed(&mut self, data: &[u8]) -> Vec<Message> {
        self.codec.push(data);
        let mut replies = Vec::new();

        loop {
            match self.codec.decode() {
                Ok(Some(frame)) => match Command::from_frame(&frame) {
                    Ok(command) => {
                        trace!(
                            "Device[{}]: dispatching {:?}",
                            self.config.name,
                            command.kind()
                        );
                        if self.config.ack_on_receipt {
                            replies.push(Message::ack());
                        }
                        replies.push(self.dispatcher.dispatch(&command));
                        self.commands_handled += 1;
                    }
                    Err(err) => {
                        debug!(
                            "Device[{}]: rejecting frame kind 0x{:02X}: {}",
                            self.config.name, frame.kind, err
                        );
                        self.frames_rejected += 1;
                        replies.push(Message::nack());
                    }
                },
                Ok(None) => break,
                Err(err) => {
                    debug!("Device[{}]: discarding malformed input: {}", self.config.name, err);
                    self.frames_rejected += 1;
                    replies.push(Message::nack());
                }
            }
        }

        replies
    }

    /// One cooperative step: drain the transport, handle what arrived, and
    /// transmit the replies. Returns the number of messages transmitted.
    pub fn poll<T: WireTransport>(&mut self, link: &mut T) -> Result<usize, SessionError> {
        let mut scratch = [0u8; 256];
        let mut sent = 0;

        loop {
            let n = link.read(&mut scratch)?;
            if n == 0 {
                break;
            }
            for reply in self.feed(&scratch[..n]) {
                link.write_all(&reply.encode())?;
                sent += 1;
            }
        }

        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saviour_protocol::{Frame, MessageKind, CMD_GET_DATA};

    struct TestApp {
        fail: Option<FailureCode>,
    }

    impl DeviceApplication for TestApp {
        fn identity(&self) -> String {
            "motor_saviour".to_string()
        }

        fn current_data(&mut self) -> Result<Vec<u8>, FailureCode> {
            match self.fail {
                Some(code) => Err(code),
                None => Ok(vec![0x12, 0x34]),
            }
        }
    }

    fn engine(fail: Option<FailureCode>) -> DeviceEngine<TestApp> {
        DeviceEngine::new(DeviceConfig::default(), TestApp { fail })
    }

    #[test]
    fn test_get_identity_dispatch() {
        let mut engine = engine(None);
        let replies = engine.feed(&Command::GetIdentity.encode());

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].kind(), MessageKind::Identity);
        assert_eq!(replies[0].identity_str(), Some("motor_saviour"));
        assert_eq!(engine.commands_handled(), 1);
    }

    #[test]
    fn test_get_data_dispatch() {
        let mut engine = engine(None);
        let replies = engine.feed(&Command::GetData.encode());

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].kind(), MessageKind::Data);
        assert_eq!(replies[0].payload(), &[0x12, 0x34]);
    }

    #[test]
    fn test_get_data_failure_yields_error() {
        let mut engine = engine(Some(FailureCode::SensorFault));
        let replies = engine.feed(&Command::GetData.encode());

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].kind(), MessageKind::Error);
        assert_eq!(replies[0].failure_code(), Some(FailureCode::SensorFault));
    }

    #[test]
    fn test_unknown_kind_is_nacked() {
        let mut engine = engine(None);
        let replies = engine.feed(&Frame::empty(0x7F).encode());

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].kind(), MessageKind::Nack);
        assert_eq!(engine.commands_handled(), 0);
        assert_eq!(engine.frames_rejected(), 1);
    }

    #[test]
    fn test_corrupt_frame_is_nacked() {
        let mut corrupted = Command::GetData.encode();
        let chk_idx = corrupted.len() - 2;
        corrupted[chk_idx] ^= 0xFF;

        let mut engine = engine(None);
        let replies = engine.feed(&corrupted);

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].kind(), MessageKind::Nack);
    }

    #[test]
    fn test_partial_input_produces_no_reply() {
        let encoded = Command::GetData.encode();
        let mut engine = engine(None);

        for &byte in &encoded[..encoded.len() - 1] {
            assert!(engine.feed(&[byte]).is_empty());
        }
        let replies = engine.feed(&encoded[encoded.len() - 1..]);
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].kind(), MessageKind::Data);
    }

    #[test]
    fn test_one_reply_per_command_in_a_burst() {
        let mut stream = Vec::new();
        for _ in 0..5 {
            stream.extend_from_slice(&Command::GetData.encode());
        }

        let mut engine = engine(None);
        let replies = engine.feed(&stream);
        assert_eq!(replies.len(), 5);
        assert!(replies.iter().all(|m| m.kind() == MessageKind::Data));
        assert_eq!(engine.commands_handled(), 5);
    }

    #[test]
    fn test_ack_on_receipt() {
        let config = DeviceConfig {
            ack_on_receipt: true,
            ..Default::default()
        };
        let mut engine = DeviceEngine::new(config, TestApp { fail: None });

        let replies = engine.feed(&Command::GetIdentity.encode());
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].kind(), MessageKind::Ack);
        assert_eq!(replies[1].kind(), MessageKind::Identity);
    }

    #[test]
    fn test_stray_command_arguments_are_nacked() {
        let frame = Frame::new(CMD_GET_DATA, vec![0xAA]).unwrap();
        let mut engine = engine(None);
        let replies = engine.feed(&frame.encode());

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].kind(), MessageKind::Nack);
    }
}
