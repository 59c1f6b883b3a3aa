//! # kulgad
//!
//! A client library for switching and querying the relay channels of a
//! kulgad controller over a WebSocket connection.
//!
//! The device exposes up to 256 binary channels. A client either switches a
//! set of channels on or off (SET), reads their state back (GET), or both.
//! Each call to [`Session::run`] performs exactly the phases requested.
//! No automatic retries, caching, or reconnection.
//!
//! ## Features
//!
//! - **Channel expressions** - `3`, `0-4,7,10-12`, `5-3`, `all`
//! - **Canonical sets** - parsed channels are always sorted and deduplicated
//! - **Paced SETs** - a fixed pause between commands so the device keeps up
//! - **Narrow decoding** - only the `pins` field of a response is read
//! - **Pluggable transport** - anything implementing [`MessageChannel`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use kulgad::{ChannelSet, Request, Session, SessionConfig, WsTransport};
//!
//! fn main() -> kulgad::Result<()> {
//!     let channels = ChannelSet::parse("0-4,7,10-12")?;
//!
//!     let transport = WsTransport::connect("localhost", 3001)?;
//!     let mut session = Session::new(transport, SessionConfig::default());
//!
//!     // Switch the channels on, then read them back
//!     let outcome = session.run(&channels, &Request::set_and_get(true))?;
//!     if let Some(report) = outcome.report {
//!         println!("{}", report);
//!     }
//!
//!     session.close()
//! }
//! ```
//!
//! ## Wire Protocol
//!
//! | Direction | Frame |
//! |-----------|-------|
//! | client → device | `{"cmd":"set","ch":<0-255>,"val":<true\|false>}` |
//! | client → device | `{"cmd":"get"}` |
//! | device → client | `{..., "pins":[<bool>, ...], ...}` |
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`]. Usage and parse errors are
//! detected before anything is sent. A GET response without a readable
//! `pins` array is not an error; the raw text is reported instead.
//!
//! ```no_run
//! use kulgad::{ChannelSet, Error, Request, Session, SessionConfig, WsTransport};
//!
//! let channels = ChannelSet::parse("all")?;
//! let transport = WsTransport::connect("localhost", 3001)?;
//! let mut session = Session::new(transport, SessionConfig::default());
//!
//! match session.run(&channels, &Request::get()) {
//!     Ok(outcome) => println!("{:?}", outcome.report),
//!     Err(Error::Io(e)) => println!("device went away: {}", e),
//!     Err(e) => println!("Error: {}", e),
//! }
//! # Ok::<(), Error>(())
//! ```

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod channel;
mod command;
mod error;
mod response;
mod session;
mod transport;
pub mod utils;

// Public re-exports
pub use channel::{strip_whitespace, ChannelSet, MAX_CHANNEL};
pub use command::Command;
pub use error::{Error, ParseError, Result};
pub use response::{ChannelStatus, PinStatusVector, Report, StatusReport, ENTRIES_PER_LINE};
pub use session::{
    Outcome, Pacer, Request, Session, SessionConfig, SessionState, ThreadPacer, DEFAULT_PACING,
};
pub use transport::{MessageChannel, WsTransport, DEFAULT_HOST, DEFAULT_PORT};
