/*
 * mod.rs
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

//! The engine.io/socket.io engine: handshake over HTTP, upgrade to WebSocket
//! framing, then blocking read/write/emit on the upgraded stream.

#[allow(clippy::module_inception)]
mod engine;
mod handshake;
mod options;
mod session;
pub mod stream;

pub use engine::Engine;
pub use options::Options;
pub use session::Session;
