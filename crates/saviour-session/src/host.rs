//! Host-side protocol session.
//!
//! The host issues commands and decodes the device's replies. The engine is
//! symmetric with the device end: malformed input is answered with `NACK`
//! and discarded, partial input waits for more bytes. The first `IDENTITY`
//! message to arrive is retained so callers can discover which device is on
//! the other end of the port.

use saviour_protocol::{Command, FrameCodec, Message};
use tracing::{debug, trace};

use crate::error::SessionError;
use crate::transport::WireTransport;

/// The host end of the protocol.
#[derive(Default)]
pub struct HostSession {
    codec: FrameCodec,
    outbox: Vec<Message>,
    identity: Option<String>,

    // Statistics
    commands_sent: u32,
    frames_rejected: u32,
}

impl HostSession {
    /// Create a new host session.
    pub fn new() -> Self {
        HostSession {
            codec: FrameCodec::new(),
            outbox: Vec::new(),
            identity: None,
            commands_sent: 0,
            frames_rejected: 0,
        }
    }

    /// Encode a command for transmission.
    pub fn encode_command(&self, command: &Command) -> Vec<u8> {
        command.encode()
    }

    /// Encode and transmit a command.
    pub fn send_command<T: WireTransport>(
        &mut self,
        link: &mut T,
        command: &Command,
    ) -> Result<(), SessionError> {
        trace!("Host: sending {:?}", command.kind());
        link.write_all(&command.encode())?;
        self.commands_sent += 1;
        Ok(())
    }

    /// Feed received bytes into the session.
    ///
    /// Returns the decoded messages, in order. `NACK` replies owed for
    /// malformed input accumulate in the outbox and are transmitted on the
    /// next [`HostSession::poll`].
    pub fn feed(&mut self, data: &[u8]) -> Vec<Message> {
        self.codec.push(data);
        let mut inbound = Vec::new();

        loop {
            match self.codec.decode() {
                Ok(Some(frame)) => match Message::from_frame(&frame) {
                    Ok(message) => {
                        if let Some(name) = message.identity_str() {
                            debug!("Host: device identifies as {}", name);
                            self.identity = Some(name.to_string());
                        }
                        inbound.push(message);
                    }
                    Err(err) => {
                        debug!("Host: rejecting frame kind 0x{:02X}: {}", frame.kind, err);
                        self.frames_rejected += 1;
                        self.outbox.push(Message::nack());
                    }
                },
                Ok(None) => break,
                Err(err) => {
                    debug!("Host: discarding malformed input: {}", err);
                    self.frames_rejected += 1;
                    self.outbox.push(Message::nack());
                }
            }
        }

        inbound
    }

    /// Take the replies owed to the peer (used when driving `feed` without
    /// a transport).
    pub fn take_outbound(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.outbox)
    }

    /// One cooperative step: drain the transport and return the decoded
    /// messages, transmitting any `NACK` replies owed along the way.
    pub fn poll<T: WireTransport>(&mut self, link: &mut T) -> Result<Vec<Message>, SessionError> {
        let mut scratch = [0u8; 256];
        let mut inbound = Vec::new();

        loop {
            let n = link.read(&mut scratch)?;
            if n == 0 {
                break;
            }
            inbound.extend(self.feed(&scratch[..n]));
            for reply in self.take_outbound() {
                link.write_all(&reply.encode())?;
            }
        }

        Ok(inbound)
    }

    /// The identity the device reported, once discovered.
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Get the number of commands sent.
    pub fn commands_sent(&self) -> u32 {
        self.commands_sent
    }

    /// Get the number of frames answered with `NACK`.
    pub fn frames_rejected(&self) -> u32 {
        self.frames_rejected
    }
}
