/*
 * lib.rs
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

//! Martinet: a synchronous socket.io/engine.io client.
//!
//! The wire layer is hand-rolled: the engine.io handshake is a raw HTTP GET
//! written directly to a TCP (or TLS) stream, the transport upgrade is a raw
//! HTTP/1.1 Upgrade exchange, and all subsequent traffic is WebSocket frames
//! (RFC 6455) encoded and decoded bit-by-bit in `frame`. No HTTP or WebSocket
//! client library is involved.
//!
//! Everything is blocking: `connect`, `read` and `write` all park the calling
//! thread on the socket. A single `Client`/`Engine` must be driven from one
//! thread of control at a time.

pub mod client;
pub mod debug;
pub mod engine;
pub mod error;
pub mod frame;

pub use client::Client;
pub use engine::{Engine, Options, Session};
pub use error::ClientError;
