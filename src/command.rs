//! Command structures and their wire encoding.
//!
//! The device speaks a tiny JSON dialect over text frames. Only two commands
//! exist, and both are encoded by hand:
//!
//! | Command | Frame |
//! |---------|-------|
//! | [`Command::Set`] | `{"cmd":"set","ch":<0-255>,"val":<true\|false>}` |
//! | [`Command::Get`] | `{"cmd":"get"}` |
//!
//! # Example
//!
//! ```
//! use kulgad::Command;
//!
//! let cmd = Command::set(3, true);
//! assert_eq!(cmd.to_text(), r#"{"cmd":"set","ch":3,"val":true}"#);
//! assert_eq!(Command::Get.to_text(), r#"{"cmd":"get"}"#);
//! ```

use std::fmt;

use crate::utils::switch_label;

/// Frame body of a GET request.
const GET_FRAME: &str = r#"{"cmd":"get"}"#;

/// A single request sent to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Switch one channel on or off. The device does not acknowledge it.
    Set {
        /// Target channel.
        channel: u8,
        /// Desired state (`true` = on).
        value: bool,
    },
    /// Ask for the state of every channel.
    Get,
}

impl Command {
    /// Creates a `Set` command.
    pub fn set(channel: u8, value: bool) -> Self {
        Self::Set { channel, value }
    }

    /// Encodes the command as the text frame sent on the wire.
    pub fn to_text(&self) -> String {
        match *self {
            Command::Set { channel, value } => {
                format!(r#"{{"cmd":"set","ch":{},"val":{}}}"#, channel, value)
            }
            Command::Get => GET_FRAME.to_string(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Command::Set { channel, value } => {
                write!(f, "set ch={} val={}", channel, switch_label(value))
            }
            Command::Get => f.write_str("get"),
        }
    }
}
