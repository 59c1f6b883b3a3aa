//! GET response decoding and status reporting.
//!
//! The device answers a GET with a JSON object carrying a `pins` array of
//! booleans, one per channel. Only that field is interpreted; the decoder is
//! deliberately narrow and is not a general JSON parser.
//!
//! # Example
//!
//! ```
//! use kulgad::{ChannelSet, ChannelStatus, PinStatusVector};
//!
//! let pins = PinStatusVector::decode(r#"{"ok":true,"pins":[true,false,true]}"#).unwrap();
//! assert_eq!(pins.len(), 3);
//!
//! let channels = ChannelSet::parse("0,2,5").unwrap();
//! let report = pins.report(&channels);
//! assert_eq!(report.status_of(0), Some(ChannelStatus::On));
//! assert_eq!(report.status_of(5), Some(ChannelStatus::Unknown));
//! ```

use std::fmt;

use crate::channel::ChannelSet;
use crate::error::{Error, Result};

/// Key of the status array in a GET response.
const PINS_KEY: &str = "\"pins\"";

/// Number of channel entries printed per line.
pub const ENTRIES_PER_LINE: usize = 16;

/// Channel states decoded from a GET response, indexed by channel number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinStatusVector {
    pins: Vec<bool>,
}

impl PinStatusVector {
    /// Decodes the `pins` array out of a GET response body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] if the key is missing, the array
    /// is not found after it, or an element is not `true`/`false`.
    pub fn decode(body: &str) -> Result<Self> {
        // A "pins" string value is not the key; only a match followed by ':' counts.
        let rest = body
            .match_indices(PINS_KEY)
            .find_map(|(at, _)| {
                body[at + PINS_KEY.len()..]
                    .trim_start()
                    .strip_prefix(':')
            })
            .ok_or_else(|| Error::malformed_response("'pins' key not found"))?
            .trim_start();
        let rest = rest
            .strip_prefix('[')
            .ok_or_else(|| Error::malformed_response("'pins' is not an array"))?;
        let close = rest
            .find(']')
            .ok_or_else(|| Error::malformed_response("'pins' array is not terminated"))?;

        let inner = rest[..close].trim();
        if inner.is_empty() {
            return Ok(Self::default());
        }

        let pins = inner
            .split(',')
            .enumerate()
            .map(|(index, item)| match item.trim() {
                "true" => Ok(true),
                "false" => Ok(false),
                other => Err(Error::malformed_response(format!(
                    "'pins' element {} is not a boolean: {}",
                    index, other
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { pins })
    }

    /// Number of channels the device reported.
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Returns true if the device reported no channels.
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// State of one channel; `None` if beyond the reported array.
    pub fn get(&self, channel: u8) -> Option<bool> {
        self.pins.get(usize::from(channel)).copied()
    }

    /// Builds a report for the requested channels, in set order.
    pub fn report(&self, channels: &ChannelSet) -> StatusReport {
        let entries = channels
            .iter()
            .map(|channel| (channel, ChannelStatus::from(self.get(channel))))
            .collect();
        StatusReport { entries }
    }
}

impl From<Vec<bool>> for PinStatusVector {
    fn from(pins: Vec<bool>) -> Self {
        Self { pins }
    }
}

/// Reported state of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelStatus {
    /// The channel is switched on.
    On,
    /// The channel is switched off.
    Off,
    /// The device did not report this channel.
    Unknown,
}

impl From<Option<bool>> for ChannelStatus {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => ChannelStatus::On,
            Some(false) => ChannelStatus::Off,
            None => ChannelStatus::Unknown,
        }
    }
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChannelStatus::On => "on",
            ChannelStatus::Off => "off",
            ChannelStatus::Unknown => "unknown",
        })
    }
}

/// Per-channel status for the channels a caller asked about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    entries: Vec<(u8, ChannelStatus)>,
}

impl StatusReport {
    /// Entries in ascending channel order.
    pub fn entries(&self) -> &[(u8, ChannelStatus)] {
        &self.entries
    }

    /// Status of `channel`, if it was part of the request.
    pub fn status_of(&self, channel: u8) -> Option<ChannelStatus> {
        self.entries
            .binary_search_by_key(&channel, |&(ch, _)| ch)
            .ok()
            .map(|i| self.entries[i].1)
    }
}

impl fmt::Display for StatusReport {
    /// Writes `ch:state` entries, [`ENTRIES_PER_LINE`] per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (line_no, line) in self.entries.chunks(ENTRIES_PER_LINE).enumerate() {
            if line_no > 0 {
                writeln!(f)?;
            }
            for (i, (channel, status)) in line.iter().enumerate() {
                if i > 0 {
                    f.write_str("  ")?;
                }
                write!(f, "{}:{}", channel, status)?;
            }
        }
        Ok(())
    }
}

/// Result of a GET round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// The response carried a decodable `pins` array.
    Pins(StatusReport),
    /// The response could not be decoded; the body is kept verbatim.
    Raw(String),
}

impl Report {
    /// Decodes a response body, degrading to [`Report::Raw`] on failure.
    pub fn from_body(body: String, channels: &ChannelSet) -> Self {
        match PinStatusVector::decode(&body) {
            Ok(pins) => Report::Pins(pins.report(channels)),
            Err(e) => {
                log::warn!("{}; showing raw response", e);
                Report::Raw(body)
            }
        }
    }

    /// Returns true if the response was not decodable.
    pub fn is_raw(&self) -> bool {
        matches!(self, Report::Raw(_))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Pins(status) => write!(f, "Status:\n{}", status),
            Report::Raw(body) => write!(f, "Received (raw): {}", body),
        }
    }
}
