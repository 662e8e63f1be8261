/*
 * error.rs
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

//! Error taxonomy for the whole client.  Every kind is fatal: nothing is
//! retried internally, and after any failure the engine is back in a
//! disconnected state from which `connect()` may be attempted again.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The connection URL failed to parse.  Raised at construction.
    #[error("malformed url: {0}")]
    MalformedUrl(String),

    /// The engine.io handshake HTTP request failed at the transport level.
    #[error("could not connect to the server: {0}")]
    ServerConnectionFailure(String),

    /// The handshake response does not advertise the named transport upgrade.
    #[error("transport \"{0}\" not supported by the server")]
    UnsupportedTransport(String),

    /// Low-level socket failure (connect, read or write).
    #[error("socket error: {0}")]
    Socket(#[from] io::Error),

    /// The upgrade response did not begin with the expected status line.
    #[error("unexpected handshake response: expected \"HTTP/1.1 101\", had {0:?}")]
    UnexpectedHandshakeResponse(String),

    /// A 16-bit extended payload length decoded to zero.
    #[error("invalid extended packet length")]
    InvalidExtendedLength,

    /// A 64-bit payload length was required but does not fit this platform's
    /// native integer width.
    #[error("64-bit unsigned payload lengths are not supported on this architecture")]
    UnsupportedPlatform,

    /// Programmer error: an argument out of its documented range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested operation is not implemented by this engine.
    #[error("unsupported action: {0}")]
    UnsupportedAction(&'static str),

    /// A WebSocket frame too short or truncated to carry a valid header.
    #[error("malformed websocket packet")]
    MalformedPacket,
}
