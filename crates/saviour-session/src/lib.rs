//! Protocol engines for the SAVIOUR serial link.
//!
//! This crate drives [`saviour_protocol`] over a byte transport. The same
//! engine exists on both ends of the link, configured for its role:
//!
//! - [`DeviceEngine`] receives commands, dispatches them to a
//!   [`DeviceApplication`], and transmits the reply.
//! - [`HostSession`] issues commands, decodes replies, and discovers the
//!   device identity.
//!
//! Both are single-threaded and poll-driven: call `poll` once per main-loop
//! iteration and the engine consumes whatever the transport has buffered.
//! No call blocks; incomplete input is left buffered until more arrives.
//!
//! # Example
//!
//! ```rust
//! use saviour_protocol::{Command, FailureCode};
//! use saviour_session::{
//!     DeviceApplication, DeviceConfig, DeviceEngine, HostSession, MemoryLink,
//! };
//!
//! struct Probe;
//!
//! impl DeviceApplication for Probe {
//!     fn identity(&self) -> String {
//!         "motor_saviour".to_string()
//!     }
//!     fn current_data(&mut self) -> Result<Vec<u8>, FailureCode> {
//!         Ok(vec![0x2A])
//!     }
//! }
//!
//! let (mut host_link, mut device_link) = MemoryLink::pair();
//! let mut device = DeviceEngine::new(DeviceConfig::default(), Probe);
//! let mut host = HostSession::new();
//!
//! host.send_command(&mut host_link, &Command::GetIdentity).unwrap();
//! device.poll(&mut device_link).unwrap();
//! host.poll(&mut host_link).unwrap();
//! assert_eq!(host.identity(), Some("motor_saviour"));
//! ```

mod device;
mod error;
mod host;
mod transport;

pub use device::{DeviceApplication, DeviceConfig, DeviceEngine, Dispatcher};
pub use error::SessionError;
pub use host::HostSession;
pub use transport::{MemoryLink, WireTransport};
