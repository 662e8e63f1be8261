/*
 * client.rs
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

//! High-level client facade: traces every call and forwards it to the
//! engine.  Holds no protocol logic of its own.

use crate::debug_log;
use crate::engine::{Engine, Options};
use crate::error::ClientError;
use crate::warn_log;

pub struct Client {
    engine: Engine,
    connected: bool,
}

impl Client {
    pub fn new(url: &str, options: Options) -> Result<Client, ClientError> {
        Ok(Client {
            engine: Engine::new(url, options)?,
            connected: false,
        })
    }

    /// Connect to the server.  `keep_alive` asks the engine to keep the
    /// connection alive on its own, which this engine does not support: pass
    /// true and the call fails after connecting.
    pub fn initialize(&mut self, keep_alive: bool) -> Result<&mut Client, ClientError> {
        debug_log!("[client] connecting to the websocket");
        match self.engine.connect() {
            Ok(()) => {
                debug_log!("[client] connected to the server");
                self.connected = true;
            }
            Err(e) => {
                warn_log!("[client] could not connect to the server: {}", e);
                return Err(e);
            }
        }
        if keep_alive {
            debug_log!("[client] keeping alive the connection to the websocket");
            self.engine.keep_alive()?;
        }
        Ok(self)
    }

    /// Read one message from the socket.  Blocks.
    pub fn read(&mut self) -> Result<String, ClientError> {
        debug_log!("[client] reading a new message from the socket");
        self.engine.read()
    }

    /// Emit an event with JSON arguments on the current namespace.
    pub fn emit(&mut self, event: &str, args: serde_json::Value) -> Result<&mut Client, ClientError> {
        debug_log!("[client] sending a new message: event={}", event);
        self.engine.emit(event, args)?;
        Ok(self)
    }

    /// Set the namespace for the next messages.
    pub fn of(&mut self, namespace: &str) -> Result<&mut Client, ClientError> {
        debug_log!("[client] setting the namespace to {:?}", namespace);
        self.engine.of(namespace)?;
        Ok(self)
    }

    /// Close the connection.
    pub fn close(&mut self) -> &mut Client {
        debug_log!("[client] closing the connection to the websocket");
        self.engine.close();
        self.connected = false;
        self
    }

    /// The engine underneath, for more advanced use.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        if self.connected {
            self.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_malformed_url() {
        assert!(matches!(
            Client::new("::not a url::", Options::default()),
            Err(ClientError::MalformedUrl(_))
        ));
    }

    #[test]
    fn test_close_without_connect_is_safe() {
        let mut client = Client::new("http://localhost:8000", Options::default()).unwrap();
        client.close();
    }
}
