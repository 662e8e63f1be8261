/*
 * handshake.rs
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

//! The two HTTP exchanges of the engine.io protocol: the polling handshake
//! GET that yields a session document, and the raw HTTP/1.1 Upgrade request
//! that switches the stream to WebSocket framing.  Request building and
//! response parsing only; the engine owns the stream.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::RngCore;
use serde::Deserialize;
use sha1::{Digest, Sha1};

use crate::error::ClientError;

/// The JSON document inside the handshake response body.
#[derive(Debug, Deserialize)]
pub struct HandshakeData {
    pub sid: String,
    /// Heartbeat cadence in milliseconds.
    #[serde(rename = "pingInterval", default)]
    pub ping_interval: u64,
    #[serde(rename = "pingTimeout", default)]
    pub ping_timeout: u64,
    #[serde(default)]
    pub upgrades: Vec<String>,
}

/// Percent-encode and join query pairs in order.
pub fn build_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the handshake GET.  `Connection: close` so the response is bounded
/// by EOF; the caller reads the stream to the end.
pub fn build_polling_request(
    host: &str,
    port: u16,
    path: &str,
    query: &str,
    headers: &[String],
) -> Vec<u8> {
    let mut req = String::new();
    req.push_str(&format!("GET /{}/?{} HTTP/1.1\r\n", path, query));
    req.push_str(&format!("Host: {}:{}\r\n", host, port));
    req.push_str("Connection: close\r\n");
    for header in headers {
        req.push_str(header.trim_end());
        req.push_str("\r\n");
    }
    req.push_str("\r\n");
    req.into_bytes()
}

/// Build the raw WebSocket upgrade request, written line by line onto the
/// already-connected engine stream.  Custom header lines are passed through
/// verbatim, except `Origin:` lines, which feed the dedicated Origin header.
pub fn build_upgrade_request(
    host: &str,
    port: u16,
    path: &str,
    query: &str,
    key: &str,
    origin: &str,
    cookies: &[String],
    headers: &[String],
) -> Vec<u8> {
    let mut req = Vec::new();
    req.extend_from_slice(format!("GET /{}/?{} HTTP/1.1\r\n", path, query).as_bytes());
    req.extend_from_slice(format!("Host: {}:{}\r\n", host, port).as_bytes());
    req.extend_from_slice(b"Upgrade: WebSocket\r\n");
    req.extend_from_slice(b"Connection: Upgrade\r\n");
    req.extend_from_slice(format!("Sec-WebSocket-Key: {}\r\n", key).as_bytes());
    req.extend_from_slice(b"Sec-WebSocket-Version: 13\r\n");
    req.extend_from_slice(format!("Origin: {}\r\n", origin).as_bytes());
    for header in headers {
        if header.strip_prefix("Origin:").is_some() {
            continue;
        }
        req.extend_from_slice(header.trim_end().as_bytes());
        req.extend_from_slice(b"\r\n");
    }
    if !cookies.is_empty() {
        req.extend_from_slice(format!("Cookie: {}\r\n", cookies.join("; ")).as_bytes());
    }
    req.extend_from_slice(b"\r\n");
    req
}

/// Generate the base64 `Sec-WebSocket-Key`.  The key material is the SHA-1 of
/// 16 random bytes: protocol version 2 servers expect the full 20-byte
/// digest, everything newer gets the usual 16 bytes.
pub fn generate_key(version: u32) -> String {
    let mut seed = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut seed);
    let digest = Sha1::digest(seed);
    if version == 2 {
        BASE64.encode(digest.as_slice())
    } else {
        BASE64.encode(&digest.as_slice()[..16])
    }
}

/// The Origin for the upgrade request: the first configured `Origin:` header
/// line wins, `*` otherwise.
pub fn origin_from_headers(headers: &[String]) -> String {
    for header in headers {
        if let Some(rest) = header.strip_prefix("Origin:") {
            return rest.trim().to_string();
        }
    }
    String::from("*")
}

/// Split a full HTTP response into (header text, body bytes) at the first
/// blank line.
pub fn split_response(raw: &[u8]) -> Result<(String, Vec<u8>), ClientError> {
    let end = find_header_end(raw).ok_or_else(|| {
        ClientError::ServerConnectionFailure(String::from("incomplete HTTP response"))
    })?;
    let header = String::from_utf8_lossy(&raw[..end]).into_owned();
    Ok((header, raw[end + 4..].to_vec()))
}

/// All `Set-Cookie` values (up to the first attribute separator), for replay
/// in the upgrade request.
pub fn collect_cookies(header: &str) -> Vec<String> {
    let mut cookies = Vec::new();
    for line in header.split("\r\n") {
        if let Some(colon) = line.find(':') {
            let name = line[..colon].trim();
            if name.eq_ignore_ascii_case("Set-Cookie") {
                let value = line[colon + 1..].trim();
                let value = value.split(';').next().unwrap_or("").trim();
                if !value.is_empty() {
                    cookies.push(value.to_string());
                }
            }
        }
    }
    cookies
}

/// Parse the handshake body.  The server wraps the session document in
/// polling-transport framing bytes, so the first balanced `{...}` object is
/// extracted and everything around it ignored.
pub fn parse_handshake(body: &str) -> Result<HandshakeData, ClientError> {
    let json = extract_json_object(body).ok_or_else(|| {
        ClientError::ServerConnectionFailure(String::from("no session document in handshake response"))
    })?;
    serde_json::from_str(json)
        .map_err(|e| ClientError::ServerConnectionFailure(format!("invalid session document: {}", e)))
}

/// Find the first balanced top-level `{...}` in `body`.  Brace depth is
/// tracked outside JSON strings so framing garbage on either side (or braces
/// inside string values) cannot throw it off.
pub fn extract_json_object(body: &str) -> Option<&str> {
    let bytes = body.as_bytes();
    let start = bytes.iter().position(|&b| b == b'{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&body[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    if buf.len() < 4 {
        return None;
    }
    (0..buf.len() - 3).find(|&i| &buf[i..i + 4] == b"\r\n\r\n")
}
