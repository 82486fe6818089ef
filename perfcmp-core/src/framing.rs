// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Length-prefixed framing for directly executed X07 artifacts.
//!
//! Frame format, used on both stdin and stdout:
//! ```text
//! +----------------+------------------+
//! | length (4 LE)  | payload          |
//! +----------------+------------------+
//! ```
//! Bytes after the declared payload are ignored.

use crate::error::FrameError;

/// Size of the length prefix in bytes.
pub const HEADER_LEN: usize = 4;

/// Prefix `payload` with its little-endian u32 length.
pub fn encode_frame(payload: &[u8]) -> Result<Vec<u8>, FrameError> {
    let len = u32::try_from(payload.len()).map_err(|_| FrameError::PayloadTooLarge {
        size: payload.len(),
    })?;

    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(payload);
    Ok(frame)
}

/// Extract the payload of a frame.
pub fn decode_frame(raw: &[u8]) -> Result<&[u8], FrameError> {
    let Some((header, rest)) = raw.split_first_chunk::<HEADER_LEN>() else {
        return Err(FrameError::TooShort { len: raw.len() });
    };

    let expected = u32::from_le_bytes(*header) as usize;
    if rest.len() < expected {
        return Err(FrameError::Truncated {
            expected,
            actual: rest.len(),
        });
    }

    Ok(&rest[..expected])
}
