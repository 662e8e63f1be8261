/*
 * decoder.rs
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

//! Frame decoding.  One header reader, `read_frame`, serves both uses: the
//! engine hands it the live socket so the reader itself pulls exactly the
//! bytes each frame needs, and `decode` runs it over an in-memory buffer.

use std::io::Read;

use super::{mask, Frame};
use crate::error::ClientError;

/// Read one complete frame from `r`, pulling exactly the bytes the header
/// calls for: 2 header bytes, then the 2- or 8-byte length extension if the
/// 7-bit length field is 126 or 127, then the 4-byte mask key if the mask bit
/// is set, then the payload.  Short reads are absorbed by `read_exact`.
/// Masked payloads are unmasked before being returned.
pub fn read_frame<R: Read>(r: &mut R) -> Result<Frame, ClientError> {
    let mut head = [0u8; 2];
    r.read_exact(&mut head)?;

    let fin = head[0] >> 7 == 1;
    let rsv = [
        (head[0] >> 6) & 1 == 1,
        (head[0] >> 5) & 1 == 1,
        (head[0] >> 4) & 1 == 1,
    ];
    let opcode = head[0] & 0x0F;
    let masked = head[1] >> 7 == 1;

    let mut length = u64::from(head[1] & 0x7F);
    match length {
        0x7E => {
            let mut ext = [0u8; 2];
            r.read_exact(&mut ext)?;
            let extended = u16::from_be_bytes(ext);
            if extended == 0 {
                return Err(ClientError::InvalidExtendedLength);
            }
            length = u64::from(extended);
        }
        0x7F => {
            if usize::BITS < 64 {
                return Err(ClientError::UnsupportedPlatform);
            }
            let mut ext = [0u8; 8];
            r.read_exact(&mut ext)?;
            length = u64::from_be_bytes(ext);
        }
        _ => {}
    }

    let mask_key = if masked {
        let mut key = [0u8; 4];
        r.read_exact(&mut key)?;
        Some(key)
    } else {
        None
    };

    let length = usize::try_from(length).map_err(|_| ClientError::UnsupportedPlatform)?;
    let mut payload = vec![0u8; length];
    r.read_exact(&mut payload)?;
    if let Some(key) = &mask_key {
        payload = mask(&payload, key);
    }

    Ok(Frame {
        fin,
        rsv,
        opcode,
        masked,
        mask_key,
        payload,
    })
}

/// Decode a raw in-memory frame.  A valid frame needs at least the 2 header
/// bytes plus one byte of context, so anything shorter (and any buffer that
/// runs out mid-frame) is a malformed packet.
pub fn decode(raw: &[u8]) -> Result<Frame, ClientError> {
    if raw.len() < 3 {
        return Err(ClientError::MalformedPacket);
    }
    let mut cursor = raw;
    read_frame(&mut cursor).map_err(|e| match e {
        ClientError::Socket(_) => ClientError::MalformedPacket,
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{encode, encode_with_key, OP_TEXT};

    #[test]
    fn test_header_bit_layout() {
        let frame = decode(&[0x81, 0x05, b'h', b'e', b'l', b'l', b'o']).unwrap();
        assert!(frame.fin);
        assert_eq!(frame.rsv, [false, false, false]);
        assert_eq!(frame.opcode, OP_TEXT);
        assert!(!frame.masked);
        assert_eq!(frame.payload, b"hello");
        assert_eq!(frame.into_text(), "hello");
    }

    #[test]
    fn test_masked_frame_recovers_plaintext() {
        // Key 01 02 03 04 over "AB" gives 0x40 0x40 on the wire.
        let raw = [0x81, 0x82, 0x01, 0x02, 0x03, 0x04, 0x40, 0x40];
        let frame = decode(&raw).unwrap();
        assert!(frame.masked);
        assert_eq!(frame.mask_key, Some([0x01, 0x02, 0x03, 0x04]));
        assert_eq!(frame.payload, b"AB");
    }

    #[test]
    fn test_round_trip_boundary_lengths() {
        for len in [1usize, 2, 125, 126, 65535, 65536, 70000] {
            let payload: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
            for masked in [false, true] {
                let raw = encode(&payload, OP_TEXT, masked);
                let frame = decode(&raw).unwrap();
                assert_eq!(frame.payload, payload, "len={} masked={}", len, masked);
                assert_eq!(frame.masked, masked);
                assert!(frame.fin);
            }
        }
    }

    #[test]
    fn test_round_trip_empty_masked() {
        // An empty unmasked frame is only 2 bytes, below the decode minimum,
        // so the empty case is exercised masked.
        let raw = encode_with_key(&[], OP_TEXT, true, [9, 8, 7, 6]);
        let frame = decode(&raw).unwrap();
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn test_too_short_is_malformed() {
        assert!(matches!(decode(&[]), Err(ClientError::MalformedPacket)));
        assert!(matches!(decode(&[0x81]), Err(ClientError::MalformedPacket)));
        assert!(matches!(
            decode(&[0x81, 0x00]),
            Err(ClientError::MalformedPacket)
        ));
    }

    #[test]
    fn test_truncated_payload_is_malformed() {
        // Header claims 5 bytes, only 3 present.
        assert!(matches!(
            decode(&[0x81, 0x05, b'h', b'e', b'l']),
            Err(ClientError::MalformedPacket)
        ));
    }

    #[test]
    fn test_zero_16bit_extension_rejected() {
        assert!(matches!(
            decode(&[0x81, 0x7E, 0x00, 0x00, 0x00]),
            Err(ClientError::InvalidExtendedLength)
        ));
    }

    #[test]
    fn test_rsv_bits_preserved() {
        // 0xF1: fin + all three rsv bits + text opcode.
        let frame = decode(&[0xF1, 0x03, b'a', b'b', b'c']).unwrap();
        assert_eq!(frame.rsv, [true, true, true]);
        assert_eq!(frame.payload, b"abc");
    }

    #[test]
    fn test_read_frame_from_stream() {
        // Two frames back to back on one reader; each read consumes exactly
        // one frame's worth of bytes.
        let mut raw = encode(b"first", OP_TEXT, false);
        raw.extend_from_slice(&encode(b"second", OP_TEXT, false));
        let mut cursor = &raw[..];
        assert_eq!(read_frame(&mut cursor).unwrap().payload, b"first");
        assert_eq!(read_frame(&mut cursor).unwrap().payload, b"second");
        assert!(cursor.is_empty());
    }
}
