//! SAVIOUR Serial Wire Protocol
//!
//! This crate provides types and utilities for communicating with SAVIOUR
//! devices over a serial link. The protocol uses framed messages where each
//! frame carries a kind byte and an optional payload:
//!
//! - **Commands** (host → device): `CMD_*` kinds, e.g. `GET_IDENTITY`
//! - **Messages** (device → host): `MSG_*` kinds, e.g. `IDENTITY`, `DATA`
//!
//! # Protocol Overview
//!
//! Frames are delimited by `<` and `>` sentinels, length-prefixed, and
//! XOR-checksummed. Payload bytes equal to a sentinel are doubled on the
//! wire. The [`FrameCodec`] recovers frames from an unreliable byte stream
//! and resynchronizes on the next start sentinel after corruption, so a
//! single bad byte never wedges the link.
//!
//! # Example
//!
//! ```rust
//! use saviour_protocol::{Command, FrameCodec};
//!
//! // Host side: build a command
//! let wire_bytes = Command::GetIdentity.encode();
//!
//! // Device side: feed received bytes and decode
//! let mut codec = FrameCodec::new();
//! codec.push(&wire_bytes);
//! let frame = codec.decode().unwrap().unwrap();
//! let command = Command::from_frame(&frame).unwrap();
//! assert_eq!(command, Command::GetIdentity);
//! ```

mod commands;
mod constants;
mod error;
mod frame;
mod messages;

pub use commands::*;
pub use constants::*;
pub use error::*;
pub use frame::*;
pub use messages::*;
