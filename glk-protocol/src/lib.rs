//! # GLK Protocol Library
//!
//! This crate implements the serial command protocol of Matrix Orbital GLK/GLC graphic LCD modules:
//! building command frames, interpreting device replies and the static tables of the
//! command set (model codes, baud rate codes, LED wiring).
//!
//! ## Overview
//!
//! The host drives a module by writing command frames to its serial port. Some commands elicit
//! a reply which the host has to read before it sends the next command.
//! This library allows you to:
//!
//! - Build command frames from typed [`Command`]s or raw opcodes
//! - Read single-byte, fixed-size and bit-flagged replies
//! - Resolve model codes into product identifiers and display dimensions
//!
//! ## Basic Usage
//!
//! ### Writing Commands
//!
//! ```
//! use glk_protocol::Command;
//!
//! let mut buffer = Vec::new();
//! Command::DrawLine { x1: 1, y1: 30, x2: 30, y2: 1 }
//!     .to_frame()
//!     .write_to(&mut buffer)
//!     .expect("Writing to vector shouldn't fail");
//! assert_eq!(buffer, [0xFEu8, 0x6C, 1, 30, 30, 1]);
//! ```
//!
//! ### Reading Replies
//!
//! ```
//! use glk_protocol::{codec::read_byte, FirmwareVersion, ModelId};
//! use std::io::Cursor;
//!
//! let mut reply = Cursor::new([0x15u8, 0x54]);
//! let model = ModelId::from_code(read_byte(&mut reply).unwrap());
//! assert_eq!(model.as_str(), "GLK24064-25");
//! assert_eq!(model.dimensions().unwrap().to_string(), "240x64");
//!
//! let version = FirmwareVersion::from_reply(read_byte(&mut reply).unwrap());
//! assert_eq!(version.to_string(), "5.4");
//! ```
//!
//! ### Polling Keys
//!
//! ```
//! use glk_protocol::codec::KeyPresses;
//! use std::io::Cursor;
//!
//! let mut reply = Cursor::new([0x85u8, 0x03]);
//! let keys: Vec<u8> = KeyPresses::new(&mut reply).collect::<Result<_, _>>().unwrap();
//! assert_eq!(keys, [5u8, 3]);
//! ```
//!
//! ## Frame Format
//!
//! - **Command**: `0xFE <opcode> [<param0> <param1> ...]`, no length prefix and no checksum
//! - **Single byte replies**: module type, firmware version
//! - **Fixed-size replies**: filesystem space (`u32`, little endian)
//! - **Bit-flagged replies**: key polling, see [`codec::KeyPresses`]
//!
//! ## Error Handling
//!
//! All fallible operations return [`error::Error`].
//!
//! ## Thread Safety
//!
//! Frames, commands and the lookup tables are plain immutable values and may be sent to other threads.
//! The wire is another matter: a reply belongs to the command written just before it, so only one
//! caller may write a command and read its reply at a time. Lock the stream if several threads share it.

pub mod protocol;
pub use protocol::*;
pub mod codec;
pub mod error;
