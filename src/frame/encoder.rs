/*
 * encoder.rs
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

//! Frame encoding: header ‖ length-extension ‖ mask key ‖ payload.
//!
//! The length field has three shapes: a literal 7-bit value for payloads up
//! to 125 bytes, the selector 126 plus a big-endian u16 for payloads up to
//! 0xFFFF, and the selector 127 plus a big-endian u64 beyond that.

use rand::RngCore;

use super::mask;

/// Encode `data` into a single frame with the given opcode.  When `masked`,
/// a fresh 4-byte key is drawn from the thread RNG; client frames must always
/// be masked (RFC 6455 §5.3).
pub fn encode(data: &[u8], opcode: u8, masked: bool) -> Vec<u8> {
    let mut key = [0u8; 4];
    if masked {
        rand::thread_rng().fill_bytes(&mut key);
    }
    encode_with_key(data, opcode, masked, key)
}

/// Encoding with a caller-supplied mask key, split out so tests can use a
/// fixed key.
pub(crate) fn encode_with_key(data: &[u8], opcode: u8, masked: bool, key: [u8; 4]) -> Vec<u8> {
    let mut extension: Vec<u8> = Vec::new();
    let mut length = data.len() as u64;

    if length > 0xFFFF {
        extension.extend_from_slice(&length.to_be_bytes());
        length = 0x7F;
    } else if length > 0x7D {
        extension.extend_from_slice(&(length as u16).to_be_bytes());
        length = 0x7E;
    }

    // fin(1) rsv(3) opcode(4) mask(1) len(7), packed high to low.
    let fin = 1u16;
    let rsv = [0u16; 3];
    let mut header = (fin << 1) | rsv[0];
    header = (header << 1) | rsv[1];
    header = (header << 1) | rsv[2];
    header = (header << 4) | u16::from(opcode);
    header = (header << 1) | u16::from(masked);
    header = (header << 7) | length as u16;

    let mut out = Vec::with_capacity(2 + extension.len() + 4 + data.len());
    out.extend_from_slice(&header.to_be_bytes());
    out.extend_from_slice(&extension);
    if masked {
        out.extend_from_slice(&key);
        out.extend_from_slice(&mask(data, &key));
    } else {
        out.extend_from_slice(data);
    }
    out
}
