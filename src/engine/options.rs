/*
 * options.rs
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

//! Engine configuration.  The defaults target socket.io v2 servers
//! (engine.io protocol 3); set `version` to 2 for socket.io v1.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Options {
    /// engine.io protocol version: 3 for socket.io v2 servers, 2 for v1.
    pub version: u32,
    /// Ask the server for base64-encoded payloads.
    pub use_b64: bool,
    /// Initial transport name for the handshake, always "polling" before the
    /// WebSocket upgrade.
    pub transport: String,
    /// Fixed pause after every frame written, to avoid overwhelming servers
    /// that rate-limit rapid bursts.  Not a backoff.
    pub wait: Duration,
    /// Socket connect/read/write timeout.
    pub timeout: Duration,
    /// Extra raw header lines ("Name: value") sent with both the handshake
    /// GET and the upgrade request.  An `Origin:` line here also sets the
    /// upgrade Origin, which otherwise defaults to `*`.
    pub headers: Vec<String>,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            version: 3,
            use_b64: false,
            transport: String::from("polling"),
            wait: Duration::from_millis(100),
            timeout: Duration::from_secs(60),
            headers: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = Options::default();
        assert_eq!(opts.version, 3);
        assert!(!opts.use_b64);
        assert_eq!(opts.transport, "polling");
        assert_eq!(opts.wait, Duration::from_millis(100));
        assert!(opts.headers.is_empty());
    }
}
