/*
 * stream.rs
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

//! Engine stream: plain TCP or TLS, one blocking Read + Write surface.
//! TLS itself is delegated to native-tls; this module only chooses and
//! wires up the variant.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use native_tls::{TlsConnector, TlsStream};

/// Unified blocking stream: plain TCP or TLS.
pub enum EngineStream {
    Plain(TcpStream),
    Tls(TlsStream<TcpStream>),
}

impl EngineStream {
    /// Open a connection to `host:port` with the given connect timeout, which
    /// is also installed as the socket read/write timeout.  `secured` wraps
    /// the connection in TLS with `host` as the server name.
    pub fn open(host: &str, port: u16, secured: bool, timeout: Duration) -> io::Result<EngineStream> {
        let addr = (host, port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "host resolved to no address"))?;
        let tcp = TcpStream::connect_timeout(&addr, timeout)?;
        tcp.set_read_timeout(Some(timeout))?;
        tcp.set_write_timeout(Some(timeout))?;

        if !secured {
            return Ok(EngineStream::Plain(tcp));
        }
        let connector = TlsConnector::new().map_err(io_other)?;
        let tls = connector.connect(host, tcp).map_err(io_other)?;
        Ok(EngineStream::Tls(tls))
    }

    /// Best-effort shutdown of the underlying TCP socket.
    pub fn shutdown(&mut self) {
        let tcp = match self {
            EngineStream::Plain(s) => s,
            EngineStream::Tls(s) => s.get_ref(),
        };
        let _ = tcp.shutdown(std::net::Shutdown::Both);
    }
}

fn io_other<E: std::fmt::Display>(e: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

impl Read for EngineStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            EngineStream::Plain(s) => s.read(buf),
            EngineStream::Tls(s) => s.read(buf),
        }
    }
}

impl Write for EngineStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            EngineStream::Plain(s) => s.write(buf),
            EngineStream::Tls(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            EngineStream::Plain(s) => s.flush(),
            EngineStream::Tls(s) => s.flush(),
        }
    }
}
