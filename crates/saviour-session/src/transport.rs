//! The byte-transport boundary.
//!
//! The engines are transport-agnostic: anything that can hand over buffered
//! bytes and queue bytes for transmission will do (a serial port, a TCP
//! socket, a pipe). Only an in-memory link is provided here, for tests and
//! loopback use.

use std::io;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

/// A byte transport the protocol engines can be driven over.
pub trait WireTransport {
    /// Read whatever bytes the link has buffered into `buf`.
    ///
    /// Non-blocking: returns the number of bytes written, 0 when nothing
    /// is pending.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Queue bytes for transmission.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;
}

/// One end of an in-memory bidirectional byte link.
///
/// Create both ends with [`MemoryLink::pair`]. Writes on one end become
/// reads on the other, preserving byte order.
pub struct MemoryLink {
    tx: Sender<Vec<u8>>,
    rx: Receiver<Vec<u8>>,
    pending: Vec<u8>,
}

impl MemoryLink {
    /// Create a connected pair of links.
    pub fn pair() -> (MemoryLink, MemoryLink) {
        let (a_tx, b_rx) = channel();
        let (b_tx, a_rx) = channel();
        (
            MemoryLink {
                tx: a_tx,
                rx: a_rx,
                pending: Vec::new(),
            },
            MemoryLink {
                tx: b_tx,
                rx: b_rx,
                pending: Vec::new(),
            },
        )
    }
}

impl WireTransport for MemoryLink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            match self.rx.try_recv() {
                Ok(chunk) => self.pending = chunk,
                Err(TryRecvError::Empty) => return Ok(0),
                Err(TryRecvError::Disconnected) => {
                    return Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer closed"));
                }
            }
        }
        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.tx
            .send(data.to_vec())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "peer closed"))
    }
}
