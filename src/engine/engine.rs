/*
 * engine.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Martinet, a socket.io client library.
 *
 * Martinet is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Martinet is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Martinet.  If not, see <http://www.gnu.org/licenses/>.
 */

//! The connection state machine.  connect() runs the polling handshake over
//! its own short-lived HTTP connection, opens the long-lived socket, and
//! upgrades it to WebSocket framing; after that write/emit/read/close operate
//! on WebSocket frames carrying engine.io packets.
//!
//! Everything here blocks the calling thread.  An Engine must be driven from
//! one logical thread of control at a time; there is no internal locking.

use std::io::{self, Read, Write};
use std::thread;
use std::time::Duration;

use url::Url;

use crate::debug_log;
use crate::engine::handshake::{
    build_polling_request, build_query, build_upgrade_request, collect_cookies, generate_key,
    origin_from_headers, parse_handshake, split_response,
};
use crate::engine::options::Options;
use crate::engine::session::Session;
use crate::engine::stream::EngineStream;
use crate::error::ClientError;
use crate::frame;
use crate::warn_log;

/// Connection parameters extracted from the caller's URL.
struct ConnectionUrl {
    host: String,
    port: u16,
    /// Mount path with surrounding slashes trimmed, "socket.io" by default.
    path: String,
    /// Extra query pairs appended to the handshake query.
    query: Vec<(String, String)>,
    secured: bool,
}

pub struct Engine {
    url: ConnectionUrl,
    options: Options,
    cookies: Vec<String>,
    session: Option<Session>,
    stream: Option<EngineStream>,
    namespace: String,
}

impl Engine {
    // engine.io packet types, the first digit of every frame payload.
    pub const OPEN: i32 = 0;
    pub const CLOSE: i32 = 1;
    pub const PING: i32 = 2;
    pub const PONG: i32 = 3;
    pub const MESSAGE: i32 = 4;
    pub const UPGRADE: i32 = 5;
    pub const NOOP: i32 = 6;

    // socket.io packet types, the digit following MESSAGE.
    pub const CONNECT: i32 = 0;
    pub const DISCONNECT: i32 = 1;
    pub const EVENT: i32 = 2;
    pub const ACK: i32 = 3;
    pub const ERROR: i32 = 4;
    pub const BINARY_EVENT: i32 = 5;
    pub const BINARY_ACK: i32 = 6;

    pub const TRANSPORT_POLLING: &'static str = "polling";
    pub const TRANSPORT_WEBSOCKET: &'static str = "websocket";

    pub fn new(url: &str, options: Options) -> Result<Engine, ClientError> {
        Ok(Engine {
            url: parse_url(url)?,
            options,
            cookies: Vec::new(),
            session: None,
            stream: None,
            namespace: String::new(),
        })
    }

    /// Handshake, open the long-lived socket, upgrade it.  A no-op when a
    /// live socket already exists.  Any failure on the way tears the engine
    /// back down to the disconnected state before propagating, so connect()
    /// may be retried from scratch.
    pub fn connect(&mut self) -> Result<(), ClientError> {
        if self.stream.is_some() {
            return Ok(());
        }
        let result = self.try_connect();
        if result.is_err() {
            self.teardown();
        }
        result
    }

    fn try_connect(&mut self) -> Result<(), ClientError> {
        self.handshake()?;
        debug_log!(
            "[engine] opening socket to {}:{} (tls={})",
            self.url.host,
            self.url.port,
            self.url.secured
        );
        let stream = EngineStream::open(
            &self.url.host,
            self.url.port,
            self.url.secured,
            self.options.timeout,
        )?;
        self.stream = Some(stream);
        self.upgrade_transport()
    }

    /// The polling handshake: one hand-written HTTP GET on a short-lived
    /// connection, yielding the session document and any cookies to replay
    /// during the upgrade.  A no-op when a session already exists.
    fn handshake(&mut self) -> Result<(), ClientError> {
        if self.session.is_some() {
            return Ok(());
        }
        let mut pairs = vec![
            (String::from("use_b64"), bool_param(self.options.use_b64)),
            (String::from("EIO"), self.options.version.to_string()),
            (String::from("transport"), self.options.transport.clone()),
        ];
        pairs.extend(self.url.query.iter().cloned());
        let query = build_query(&pairs);
        debug_log!("[engine] handshake GET /{}/?{}", self.url.path, query);

        let response = self.polling_get(&query).map_err(|e| match e {
            ClientError::Socket(err) => ClientError::ServerConnectionFailure(err.to_string()),
            other => other,
        })?;
        let (header, body) = split_response(&response)?;
        let data = parse_handshake(&String::from_utf8_lossy(&body))?;
        if !data.upgrades.iter().any(|u| u == Self::TRANSPORT_WEBSOCKET) {
            return Err(ClientError::UnsupportedTransport(String::from(
                Self::TRANSPORT_WEBSOCKET,
            )));
        }
        self.cookies = collect_cookies(&header);
        debug_log!(
            "[engine] session {} established, {} cookie(s)",
            data.sid,
            self.cookies.len()
        );
        self.session = Some(Session::new(
            data.sid,
            Duration::from_millis(data.ping_interval),
            Duration::from_millis(data.ping_timeout),
            data.upgrades,
        ));
        Ok(())
    }

    fn polling_get(&self, query: &str) -> Result<Vec<u8>, ClientError> {
        let mut stream = EngineStream::open(
            &self.url.host,
            self.url.port,
            self.url.secured,
            self.options.timeout,
        )?;
        let request = build_polling_request(
            &self.url.host,
            self.url.port,
            &self.url.path,
            query,
            &self.options.headers,
        );
        stream.write_all(&request)?;
        stream.flush()?;
        // Connection: close bounds the response at EOF.
        let mut response = Vec::new();
        stream.read_to_end(&mut response)?;
        Ok(response)
    }

    /// The raw HTTP/1.1 Upgrade exchange on the long-lived socket, followed
    /// by the UPGRADE control packet.  Protocol version 2 servers answer the
    /// upgrade with an unprompted connect acknowledgement, discarded here.
    fn upgrade_transport(&mut self) -> Result<(), ClientError> {
        let sid = match &self.session {
            Some(session) => session.id().to_string(),
            None => return Err(ClientError::Socket(not_connected())),
        };
        let mut pairs = vec![
            (String::from("sid"), sid),
            (String::from("EIO"), self.options.version.to_string()),
            (
                String::from("transport"),
                String::from(Self::TRANSPORT_WEBSOCKET),
            ),
        ];
        if self.options.version == 2 {
            pairs.push((String::from("use_b64"), bool_param(self.options.use_b64)));
        }
        let key = generate_key(self.options.version);
        let origin = origin_from_headers(&self.options.headers);
        let request = build_upgrade_request(
            &self.url.host,
            self.url.port,
            &self.url.path,
            &build_query(&pairs),
            &key,
            &origin,
            &self.cookies,
            &self.options.headers,
        );

        let stream = match self.stream.as_mut() {
            Some(stream) => stream,
            None => return Err(ClientError::Socket(not_connected())),
        };
        stream.write_all(&request)?;
        stream.flush()?;

        let mut status = [0u8; 12];
        stream.read_exact(&mut status)?;
        if status != *b"HTTP/1.1 101" {
            let had = String::from_utf8_lossy(&status).into_owned();
            warn_log!("[engine] upgrade refused, status line began {:?}", had);
            return Err(ClientError::UnexpectedHandshakeResponse(had));
        }
        // Drain the rest of the response headers up to the blank line; frame
        // data begins right after it.
        while !read_header_line(stream)?.trim().is_empty() {}

        self.write(Self::UPGRADE, "")?;
        if self.options.version == 2 {
            // socket.io v1 sends a connect acknowledgement ("40") unprompted
            // after the upgrade; drop it so the caller's first read is clean.
            self.read()?;
        }
        Ok(())
    }

    /// Encode `code` + `message` as one masked TEXT frame and write it out,
    /// then pause for the configured pacing interval.  Returns the number of
    /// bytes written, 0 when not connected.  `code` must be one of the seven
    /// engine.io packet types even when disconnected.
    pub fn write(&mut self, code: i32, message: &str) -> Result<usize, ClientError> {
        if !(0..=6).contains(&code) {
            return Err(ClientError::InvalidArgument(format!(
                "wrong packet type {} when trying to write on the socket",
                code
            )));
        }
        let stream = match self.stream.as_mut() {
            Some(stream) => stream,
            None => return Ok(0),
        };
        let payload = format!("{}{}", code, message);
        let raw = frame::encode(payload.as_bytes(), frame::OP_TEXT, true);
        stream.write_all(&raw)?;
        stream.flush()?;
        thread::sleep(self.options.wait);
        Ok(raw.len())
    }

    /// Send a socket.io EVENT on the current namespace.
    pub fn emit(&mut self, event: &str, args: serde_json::Value) -> Result<usize, ClientError> {
        let payload = event_payload(&self.namespace, event, &args);
        self.write(Self::MESSAGE, &payload)
    }

    /// Select the namespace for subsequent emits and announce it to the
    /// server with a namespace CONNECT packet.
    pub fn of(&mut self, namespace: &str) -> Result<(), ClientError> {
        self.namespace = namespace.to_string();
        self.write(Self::MESSAGE, &format!("{}{}", Self::CONNECT, namespace))?;
        Ok(())
    }

    /// Read one frame off the socket and return its payload as text.  Blocks
    /// until the server sends a frame; the only bound is the socket timeout
    /// configured at connect time.  Returns an empty string when not
    /// connected.
    pub fn read(&mut self) -> Result<String, ClientError> {
        let stream = match self.stream.as_mut() {
            Some(stream) => stream,
            None => return Ok(String::new()),
        };
        let decoded = frame::read_frame(stream)?;
        debug_log!(
            "[engine] frame opcode={} len={}",
            decoded.opcode,
            decoded.payload.len()
        );
        Ok(decoded.into_text())
    }

    /// Send a best-effort CLOSE packet, shut the socket down, and drop the
    /// session and cookies.  A no-op when not connected.
    pub fn close(&mut self) {
        if self.stream.is_none() {
            return;
        }
        let _ = self.write(Self::CLOSE, "");
        self.teardown();
    }

    /// Periodic keep-alive is not implemented by this engine; poll
    /// `Session::needs_heartbeat` and write PING packets yourself instead.
    pub fn keep_alive(&mut self) -> Result<(), ClientError> {
        Err(ClientError::UnsupportedAction("keepAlive"))
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    fn teardown(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.shutdown();
        }
        self.session = None;
        self.cookies.clear();
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.close();
    }
}

/// The socket.io EVENT payload: the EVENT digit, the namespace with a
/// trailing comma when non-default, then the `[event, args]` JSON array.
fn event_payload(namespace: &str, event: &str, args: &serde_json::Value) -> String {
    let namespace = if namespace.is_empty() {
        String::new()
    } else {
        format!("{},", namespace)
    };
    format!(
        "{}{}{}",
        Engine::EVENT,
        namespace,
        serde_json::json!([event, args])
    )
}

fn bool_param(value: bool) -> String {
    String::from(if value { "1" } else { "0" })
}

fn not_connected() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "engine is not connected")
}

/// Read one CRLF-terminated header line off the stream, one byte at a time
/// so no frame data past the blank line is consumed.
fn read_header_line(stream: &mut EngineStream) -> Result<String, ClientError> {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        let n = stream.read(&mut byte)?;
        if n == 0 || byte[0] == b'\n' {
            break;
        }
        line.push(byte[0]);
    }
    Ok(String::from_utf8_lossy(&line).into_owned())
}

fn parse_url(raw: &str) -> Result<ConnectionUrl, ClientError> {
    let parsed = Url::parse(raw).map_err(|_| ClientError::MalformedUrl(raw.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https" | "ws" | "wss") {
        return Err(ClientError::MalformedUrl(raw.to_string()));
    }
    let secured = matches!(parsed.scheme(), "https" | "wss");
    let host = parsed
        .host_str()
        .ok_or_else(|| ClientError::MalformedUrl(raw.to_string()))?
        .to_string();
    let port = parsed.port().unwrap_or(if secured { 443 } else { 80 });
    let path = parsed.path().trim_matches('/');
    let path = if path.is_empty() {
        String::from("socket.io")
    } else {
        path.to_string()
    };
    let query = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    Ok(ConnectionUrl {
        host,
        port,
        path,
        query,
        secured,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine(url: &str) -> Engine {
        Engine::new(url, Options::default()).unwrap()
    }

    #[test]
    fn test_parse_url_defaults() {
        let url = parse_url("http://example.com").unwrap();
        assert_eq!(url.host, "example.com");
        assert_eq!(url.port, 80);
        assert_eq!(url.path, "socket.io");
        assert!(url.query.is_empty());
        assert!(!url.secured);
    }

    #[test]
    fn test_parse_url_secured_with_port_path_query() {
        let url = parse_url("https://example.com:8443/chat/?token=t").unwrap();
        assert_eq!(url.port, 8443);
        assert_eq!(url.path, "chat");
        assert_eq!(url.query, [(String::from("token"), String::from("t"))]);
        assert!(url.secured);
    }

    #[test]
    fn test_parse_url_wss_defaults_to_443() {
        let url = parse_url("wss://example.com").unwrap();
        assert_eq!(url.port, 443);
        assert!(url.secured);
    }

    #[test]
    fn test_parse_url_rejects_garbage() {
        assert!(matches!(
            parse_url("not a url"),
            Err(ClientError::MalformedUrl(_))
        ));
        assert!(matches!(
            parse_url("ftp://example.com"),
            Err(ClientError::MalformedUrl(_))
        ));
    }

    #[test]
    fn test_event_payload_with_namespace() {
        let payload = event_payload("/chat", "foo", &json!([1, 2]));
        assert_eq!(payload, "2/chat,[\"foo\",[1,2]]");
    }

    #[test]
    fn test_event_payload_default_namespace() {
        let payload = event_payload("", "foo", &json!({ "a": 1 }));
        assert_eq!(payload, "2[\"foo\",{\"a\":1}]");
    }

    #[test]
    fn test_write_rejects_out_of_range_codes() {
        let mut e = engine("http://localhost:8000");
        assert!(matches!(
            e.write(7, "x"),
            Err(ClientError::InvalidArgument(_))
        ));
        assert!(matches!(
            e.write(-1, "x"),
            Err(ClientError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_write_disconnected_is_a_no_op_for_valid_codes() {
        let mut e = engine("http://localhost:8000");
        for code in 0..=6 {
            assert_eq!(e.write(code, "x").unwrap(), 0);
        }
    }

    #[test]
    fn test_read_disconnected_returns_empty() {
        let mut e = engine("http://localhost:8000");
        assert_eq!(e.read().unwrap(), "");
    }

    #[test]
    fn test_keep_alive_is_unsupported() {
        let mut e = engine("http://localhost:8000");
        assert!(matches!(
            e.keep_alive(),
            Err(ClientError::UnsupportedAction("keepAlive"))
        ));
    }

    #[test]
    fn test_failed_connect_tears_back_down() {
        // Nothing is listening on the discard port, so connect() must fail
        // and leave the engine in the disconnected state.
        let mut e = engine("http://127.0.0.1:9");
        assert!(e.connect().is_err());
        assert!(e.session().is_none());
    }
}
