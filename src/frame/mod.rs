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

//! WebSocket frame codec (RFC 6455 §5): bit-level encoding and decoding of
//! single-frame messages, plus the XOR masking transform shared by both
//! directions.  Pure transforms only; all I/O lives in the engine.

mod decoder;
mod encoder;

pub use decoder::{decode, read_frame};
pub use encoder::encode;

#[cfg(test)]
pub(crate) use encoder::encode_with_key;

pub const OP_CONTINUATION: u8 = 0x0;
pub const OP_TEXT: u8 = 0x1;
pub const OP_BINARY: u8 = 0x2;
pub const OP_CLOSE: u8 = 0x8;
pub const OP_PING: u8 = 0x9;
pub const OP_PONG: u8 = 0xA;

/// One decoded WebSocket frame.  `payload` is the logical (unmasked) content;
/// masking is a transport transform applied on the wire only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Final-fragment bit.  Always set by this client: no fragmentation.
    pub fin: bool,
    /// Reserved bits, carried through a round-trip but never interpreted.
    pub rsv: [bool; 3],
    /// 4-bit opcode (`OP_*`).  Reserved values are preserved as-is.
    pub opcode: u8,
    /// Mask bit as seen on the wire.  `true` implies `mask_key` is `Some`.
    pub masked: bool,
    pub mask_key: Option<[u8; 4]>,
    pub payload: Vec<u8>,
}

impl Frame {
    /// The payload interpreted as text, which is what every engine.io packet
    /// is.  Invalid UTF-8 is replaced rather than rejected.
    pub fn into_text(self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// XOR-mask `data` with the repeating 4-byte `key`.  Self-inverse: applying
/// the same key twice restores the original bytes.
pub fn mask(data: &[u8], key: &[u8; 4]) -> Vec<u8> {
    data.iter()
        .enumerate()
        .map(|(i, b)| b ^ key[i % 4])
        .collect()
}
