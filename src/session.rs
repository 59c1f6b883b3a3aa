//! Command session driver.
//!
//! A [`Session`] drives one invocation against a device: an optional SET
//! phase that switches every requested channel, followed by an optional GET
//! phase that reads back the channel states.
//!
//! # Overview
//!
//! ```text
//! Idle -> Sending -> AwaitingResponse -> Reporting -> Done
//!            \              \                 \
//!             +--------------+-----------------+--> Failed
//! ```
//!
//! Each SET is fire-and-forget. Consecutive SETs are separated by the pacing
//! delay (50 ms by default) because the device cannot absorb commands any
//! faster; there is no pause after the last one. The GET phase sends one
//! request and blocks for exactly one response, without a timeout.
//!
//! # Example
//!
//! ```no_run
//! use kulgad::{ChannelSet, Request, Session, SessionConfig, WsTransport};
//!
//! let channels = ChannelSet::parse("0-4,7")?;
//! let transport = WsTransport::connect("localhost", 3001)?;
//! let mut session = Session::new(transport, SessionConfig::default());
//!
//! let outcome = session.run(&channels, &Request::set_and_get(true))?;
//! if let Some(report) = outcome.report {
//!     println!("{}", report);
//! }
//! session.close()?;
//! # Ok::<(), kulgad::Error>(())
//! ```

use std::time::Duration;

use crate::channel::ChannelSet;
use crate::command::Command;
use crate::error::{Error, Result};
use crate::response::Report;
use crate::transport::MessageChannel;

/// Default pause between consecutive SET commands.
pub const DEFAULT_PACING: Duration = Duration::from_millis(50);

/// Configuration for a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Pause inserted between consecutive SET commands.
    pub pacing: Duration,
}

impl SessionConfig {
    /// Creates a configuration with the default pacing.
    pub fn new() -> Self {
        Self {
            pacing: DEFAULT_PACING,
        }
    }

    /// Sets a custom pacing delay (default is 50 ms).
    ///
    /// # Example
    ///
    /// ```
    /// use kulgad::SessionConfig;
    /// use std::time::Duration;
    ///
    /// let config = SessionConfig::new().with_pacing(Duration::ZERO);
    /// assert_eq!(config.pacing, Duration::ZERO);
    /// ```
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Something that can pause the calling flow between commands.
pub trait Pacer {
    /// Blocks for `delay`.
    fn pause(&mut self, delay: Duration);
}

/// Pacer that blocks the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// What one invocation should do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Request {
    /// Run the SET phase.
    pub set: bool,
    /// Run the GET phase.
    pub get: bool,
    /// Value for the SET phase (`true` = on).
    pub value: Option<bool>,
}

impl Request {
    /// SET only.
    pub fn set(value: bool) -> Self {
        Self {
            set: true,
            get: false,
            value: Some(value),
        }
    }

    /// GET only.
    pub fn get() -> Self {
        Self {
            set: false,
            get: true,
            value: None,
        }
    }

    /// SET followed by GET.
    pub fn set_and_get(value: bool) -> Self {
        Self {
            set: true,
            get: true,
            value: Some(value),
        }
    }

    /// Checks the request against a channel set.
    ///
    /// Returns the SET value when a SET phase is requested. Callers run this
    /// before connecting so that usage errors never touch the network;
    /// [`Session::run`] repeats the check.
    ///
    /// # Example
    ///
    /// ```
    /// use kulgad::{ChannelSet, Request};
    ///
    /// let channels = ChannelSet::parse("1-3").unwrap();
    /// assert_eq!(Request::set(true).validate(&channels).unwrap(), Some(true));
    /// assert!(Request::default().validate(&channels).is_err());
    /// ```
    pub fn validate(&self, channels: &ChannelSet) -> Result<Option<bool>> {
        let value = self.validate_phases()?;
        if channels.is_empty() {
            return Err(Error::usage("no channels given"));
        }
        Ok(value)
    }

    /// Checks the phase selection and SET value, without looking at channels.
    ///
    /// # Example
    ///
    /// ```
    /// use kulgad::Request;
    ///
    /// assert_eq!(Request::get().validate_phases().unwrap(), None);
    /// assert!(Request::default().validate_phases().is_err());
    /// ```
    pub fn validate_phases(&self) -> Result<Option<bool>> {
        if !self.set && !self.get {
            return Err(Error::usage("nothing to do, request set and/or get"));
        }
        match (self.set, self.value) {
            (true, None) => Err(Error::usage("missing value for set, use on or off")),
            (true, Some(value)) => Ok(Some(value)),
            (false, _) => Ok(None),
        }
    }
}

/// Where a session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing sent yet.
    Idle,
    /// Sending SET commands.
    Sending,
    /// GET sent, waiting for the response.
    AwaitingResponse,
    /// Decoding the GET response.
    Reporting,
    /// Run finished successfully.
    Done,
    /// An I/O error ended the run.
    Failed,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Number of SET commands sent.
    pub sent: usize,
    /// GET result, if a GET phase ran.
    pub report: Option<Report>,
}

/// Drives SET and GET phases over a [`MessageChannel`].
pub struct Session<C, P = ThreadPacer> {
    channel: C,
    pacer: P,
    config: SessionConfig,
    state: SessionState,
}

impl<C: MessageChannel> Session<C, ThreadPacer> {
    /// Creates a session that paces with [`ThreadPacer`].
    pub fn new(channel: C, config: SessionConfig) -> Self {
        Self::with_pacer(channel, config, ThreadPacer)
    }
}

impl<C: MessageChannel, P: Pacer> Session<C, P> {
    /// Creates a session with a custom pacer.
    pub fn with_pacer(channel: C, config: SessionConfig, pacer: P) -> Self {
        Self {
            channel,
            pacer,
            config,
            state: SessionState::Idle,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Runs the requested phases against `channels`.
    ///
    /// # Errors
    ///
    /// - [`Error::Usage`] if the request is incomplete or `channels` is
    ///   empty; nothing is sent in that case
    /// - [`Error::Io`] if a send or receive fails; the session is then
    ///   [`SessionState::Failed`]
    ///
    /// An undecodable GET response is not an error: the outcome carries
    /// [`Report::Raw`] instead.
    pub fn run(&mut self, channels: &ChannelSet, request: &Request) -> Result<Outcome> {
        let value = request.validate(channels)?;

        let result = self.run_phases(channels, value, request.get);
        self.state = match result {
            Ok(_) => SessionState::Done,
            Err(_) => SessionState::Failed,
        };
        result
    }

    fn run_phases(
        &mut self,
        channels: &ChannelSet,
        value: Option<bool>,
        get: bool,
    ) -> Result<Outcome> {
        let sent = match value {
            Some(value) => self.send_all(channels, value)?,
            None => 0,
        };

        let report = if get {
            Some(self.query(channels)?)
        } else {
            None
        };

        Ok(Outcome { sent, report })
    }

    fn send_all(&mut self, channels: &ChannelSet, value: bool) -> Result<usize> {
        self.state = SessionState::Sending;

        for (i, channel) in channels.iter().enumerate() {
            if i > 0 {
                self.pacer.pause(self.config.pacing);
            }
            let command = Command::set(channel, value);
            self.channel.send_text(&command.to_text())?;
            log::info!("Sent: {}", command);
        }

        Ok(channels.len())
    }

    fn query(&mut self, channels: &ChannelSet) -> Result<Report> {
        self.channel.send_text(&Command::Get.to_text())?;
        self.state = SessionState::AwaitingResponse;

        let body = self.channel.recv_text()?;
        self.state = SessionState::Reporting;

        Ok(Report::from_body(body, channels))
    }

    /// Closes the underlying channel gracefully, consuming the session.
    pub fn close(mut self) -> Result<()> {
        self.channel.close()
    }

    /// Returns the underlying channel, consuming the session.
    pub fn into_inner(self) -> C {
        self.channel
    }
}

impl<C, P> std::fmt::Debug for Session<C, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish()
    }
}
