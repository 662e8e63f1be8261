/*
 * session.rs
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

//! The session handed back by the engine.io handshake: the server-issued id,
//! the advertised transport upgrades, and the heartbeat cadence.  Immutable
//! apart from the heartbeat timestamp.

use std::time::{Duration, Instant};

/// Heartbeats fire this much before the full interval to leave room for the
/// round trip to the server.
const HEARTBEAT_GRACE: Duration = Duration::from_secs(5);

pub struct Session {
    id: String,
    ping_interval: Duration,
    #[allow(dead_code)]
    ping_timeout: Duration,
    upgrades: Vec<String>,
    last_heartbeat: Instant,
}

impl Session {
    pub fn new(
        id: String,
        ping_interval: Duration,
        ping_timeout: Duration,
        upgrades: Vec<String>,
    ) -> Session {
        Session {
            id,
            ping_interval,
            ping_timeout,
            upgrades,
            last_heartbeat: Instant::now(),
        }
    }

    /// The opaque session identifier issued by the server.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The transport names the server is willing to upgrade to.
    pub fn upgrades(&self) -> &[String] {
        &self.upgrades
    }

    /// Checks whether a new heartbeat is due, and restarts the heartbeat
    /// timer if it is.  A polling primitive for a caller-driven ping loop,
    /// not a timer itself: returns true at most once per interval.
    pub fn needs_heartbeat(&mut self) -> bool {
        if self.ping_interval > Duration::ZERO
            && self.last_heartbeat.elapsed() > self.ping_interval.saturating_sub(HEARTBEAT_GRACE)
        {
            self.last_heartbeat = Instant::now();
            return true;
        }
        false
    }

    /// Pretend `by` has already elapsed since the last heartbeat.
    #[cfg(test)]
    fn rewind_heartbeat(&mut self, by: Duration) {
        self.last_heartbeat -= by;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(interval: Duration) -> Session {
        Session::new(
            String::from("abc"),
            interval,
            Duration::from_secs(60),
            vec![String::from("websocket")],
        )
    }

    #[test]
    fn test_accessors() {
        let s = session(Duration::from_secs(25));
        assert_eq!(s.id(), "abc");
        assert_eq!(s.upgrades(), ["websocket"]);
    }

    #[test]
    fn test_no_heartbeat_right_after_construction() {
        let mut s = session(Duration::from_secs(25));
        assert!(!s.needs_heartbeat());
    }

    #[test]
    fn test_zero_interval_never_fires() {
        let mut s = session(Duration::ZERO);
        s.rewind_heartbeat(Duration::from_secs(30));
        assert!(!s.needs_heartbeat());
    }

    #[test]
    fn test_fires_inside_grace_window() {
        // 25s interval, 5s grace: due after 20s elapsed.
        let mut s = session(Duration::from_secs(25));
        s.rewind_heartbeat(Duration::from_secs(19));
        assert!(!s.needs_heartbeat());
        s.rewind_heartbeat(Duration::from_secs(2));
        assert!(s.needs_heartbeat());
    }

    #[test]
    fn test_true_resets_the_timer() {
        let mut s = session(Duration::from_secs(25));
        s.rewind_heartbeat(Duration::from_secs(30));
        assert!(s.needs_heartbeat());
        // Timer restarted by the true return: immediately false again.
        assert!(!s.needs_heartbeat());
        s.rewind_heartbeat(Duration::from_secs(30));
        assert!(s.needs_heartbeat());
    }
}
