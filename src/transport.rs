//! WebSocket transport layer for device communication.
//!
//! This module provides the [`MessageChannel`] trait, the seam between the
//! session driver and the network, and [`WsTransport`], its WebSocket
//! implementation. The transport knows about frames and text only; it has no
//! idea what a channel or a pin is.
//!
//! # Design
//!
//! - **Synchronous** - blocking send and receive, no timeout on receive
//! - **Simple** - one connection, one remote endpoint, no reconnection
//!
//! # Constants
//!
//! - [`DEFAULT_HOST`] - Default device host (`localhost`)
//! - [`DEFAULT_PORT`] - Default device port (3001)
//!
//! # Example
//!
//! ```no_run
//! use kulgad::{MessageChannel, WsTransport, DEFAULT_HOST, DEFAULT_PORT};
//!
//! let mut transport = WsTransport::connect(DEFAULT_HOST, DEFAULT_PORT)?;
//! transport.send_text(r#"{"cmd":"get"}"#)?;
//! let body = transport.recv_text()?;
//! println!("{}", body);
//! transport.close()?;
//! # Ok::<(), kulgad::Error>(())
//! ```

use std::io;
use std::net::TcpStream;

use tungstenite::protocol::Message as WsMessage;
use tungstenite::WebSocket;

use crate::error::{Error, Result};

/// Default device host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default device port.
pub const DEFAULT_PORT: u16 = 3001;

/// A bidirectional, message-oriented text channel.
pub trait MessageChannel {
    /// Sends one text frame.
    fn send_text(&mut self, text: &str) -> Result<()>;

    /// Blocks until one text frame arrives and returns its body.
    fn recv_text(&mut self) -> Result<String>;

    /// Closes the channel gracefully.
    fn close(&mut self) -> Result<()>;
}

/// WebSocket connection to a device.
pub struct WsTransport {
    websocket: WebSocket<TcpStream>,
    host: String,
    port: u16,
}

impl WsTransport {
    /// Connects to `ws://host:port/` and performs the client handshake.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the TCP connection or the WebSocket
    /// handshake fails.
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let stream =
            TcpStream::connect((host, port)).map_err(|e| Error::connection(host, port, e))?;
        // Commands are tiny; don't let Nagle hold them back.
        let _ = stream.set_nodelay(true);

        let url = format!("ws://{}:{}/", host, port);
        let (websocket, _response) =
            tungstenite::client(url.as_str(), stream).map_err(|e| Error::connection(host, port, e))?;

        log::debug!("websocket handshake with {} complete", url);
        Ok(Self {
            websocket,
            host: host.to_string(),
            port,
        })
    }

    /// Returns the host this transport is connected to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port this transport is connected to.
    pub fn port(&self) -> u16 {
        self.port
    }

    fn convert_ws_error(e: tungstenite::Error) -> Error {
        match e {
            tungstenite::Error::Io(io_err) => Error::Io(io_err),
            other => Error::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                other.to_string(),
            )),
        }
    }
}

impl MessageChannel for WsTransport {
    fn send_text(&mut self, text: &str) -> Result<()> {
        log::debug!("-> {}", text);
        self.websocket
            .send(WsMessage::Text(text.to_string()))
            .map_err(Self::convert_ws_error)
    }

    fn recv_text(&mut self) -> Result<String> {
        loop {
            match self.websocket.read().map_err(Self::convert_ws_error)? {
                WsMessage::Text(text) => {
                    log::debug!("<- {}", text);
                    return Ok(text);
                }
                WsMessage::Binary(data) => {
                    return Ok(String::from_utf8_lossy(&data).into_owned());
                }
                WsMessage::Close(_) => {
                    return Err(Error::Io(io::Error::new(
                        io::ErrorKind::ConnectionReset,
                        "WebSocket closed by device",
                    )));
                }
                // tungstenite answers pings on its own.
                WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => {}
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        self.websocket
            .close(None)
            .map_err(Self::convert_ws_error)?;
        // Flush the pending close frame; the peer may already be gone.
        let _ = self.websocket.flush();
        Ok(())
    }
}

impl std::fmt::Debug for WsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsTransport")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("local_addr", &self.websocket.get_ref().local_addr().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_HOST, "localhost");
        assert_eq!(DEFAULT_PORT, 3001);
    }

    #[test]
    fn test_connect_refused() {
        // Bind then drop to get a port nobody listens on.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let err = WsTransport::connect("127.0.0.1", port).unwrap_err();
        assert!(matches!(err, Error::Connection { .. }));
    }

    #[test]
    fn test_loopback_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut ws = tungstenite::accept(stream).unwrap();
            let request = ws.read().unwrap();
            assert_eq!(request, WsMessage::Text(r#"{"cmd":"get"}"#.to_string()));
            ws.send(WsMessage::Ping(vec![1, 2, 3])).unwrap();
            ws.send(WsMessage::Text(r#"{"pins":[true]}"#.to_string()))
                .unwrap();
            // Drain until the client's close handshake completes.
            let mut pongs = 0;
            while let Ok(msg) = ws.read() {
                if matches!(msg, WsMessage::Pong(_)) {
                    pongs += 1;
                }
            }
            pongs
        });

        let mut transport = WsTransport::connect("127.0.0.1", port).unwrap();
        assert_eq!(transport.port(), port);
        transport.send_text(r#"{"cmd":"get"}"#).unwrap();
        assert_eq!(transport.recv_text().unwrap(), r#"{"pins":[true]}"#);
        transport.close().unwrap();

        // The ping is answered exactly once.
        assert_eq!(server.join().unwrap(), 1);
    }

    #[test]
    fn test_recv_after_server_close() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut ws = tungstenite::accept(stream).unwrap();
            ws.close(None).unwrap();
            while ws.read().is_ok() {}
        });

        let mut transport = WsTransport::connect("127.0.0.1", port).unwrap();
        let err = transport.recv_text().unwrap_err();
        assert!(matches!(err, Error::Io(_)));

        drop(transport);
        server.join().unwrap();
    }
}
