//! # Command stream format
//!
//! A stream is an 8-byte header followed by a tightly packed opcode stream:
//!
//! ```text
//! offset 0: u32 LE  format version (advisory, any version is accepted)
//! offset 4: u32 LE  declared payload length, in bytes, excluding the header
//! offset 8: opcode, operands, opcode, operands, ...
//! ```
//!
//! All integers are little-endian. Floats are IEEE-754 binary32, little-endian,
//! rebuilt from their bit pattern. See [`opcode::Opcode`] for the instruction table.

pub mod decode;
pub mod opcode;
pub mod writer;

pub use decode::{DecodeError, DecodeState, Decoder, Instruction, StopReason};
pub use opcode::Opcode;
pub use writer::StreamWriter;

/// The version written by [`StreamWriter`]. Readers accept any version.
pub const VERSION: u32 = 1;
pub const HEADER_LEN: usize = 8;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    #[error("stream is {available} bytes, too short for the 8 byte header")]
    TruncatedHeader { available: usize },
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct StreamHeader {
    pub version: u32,
    /// Payload length as claimed by the producer. May exceed what was actually written,
    /// see [`CommandStream::payload`] for the clamped view.
    pub declared_len: u32,
}
impl StreamHeader {
    /// Parse the header from the front of `bytes`.
    /// # Errors
    /// [`HeaderError::TruncatedHeader`] if fewer than 8 bytes are available.
    pub fn read(bytes: &[u8]) -> Result<Self, HeaderError> {
        let Some(header) = bytes.first_chunk::<HEADER_LEN>() else {
            return Err(HeaderError::TruncatedHeader {
                available: bytes.len(),
            });
        };
        let [v0, v1, v2, v3, l0, l1, l2, l3] = *header;
        Ok(Self {
            version: u32::from_le_bytes([v0, v1, v2, v3]),
            declared_len: u32::from_le_bytes([l0, l1, l2, l3]),
        })
    }
    /// Encode into the 8 byte wire representation.
    #[must_use]
    pub fn to_bytes(self) -> [u8; HEADER_LEN] {
        let mut bytes = [0; HEADER_LEN];
        bytes[..4].copy_from_slice(&self.version.to_le_bytes());
        bytes[4..].copy_from_slice(&self.declared_len.to_le_bytes());
        bytes
    }
}

/// A validated, immutable view over one render pass's stream.
///
/// Invariant: `payload_end <= bytes.len()`, regardless of what the header claims.
#[derive(Copy, Clone, Debug)]
pub struct CommandStream<'a> {
    bytes: &'a [u8],
    header: StreamHeader,
    payload_end: usize,
}
impl<'a> CommandStream<'a> {
    /// Read the header and compute the payload window, clamping the declared length to
    /// the bytes actually available.
    /// # Errors
    /// [`HeaderError::TruncatedHeader`] if fewer than 8 bytes are available.
    pub fn new(bytes: &'a [u8]) -> Result<Self, HeaderError> {
        let header = StreamHeader::read(bytes)?;
        // Widen before adding, a declared length near u32::MAX must not wrap on 32 bit targets.
        let declared_end = HEADER_LEN as u64 + u64::from(header.declared_len);
        let payload_end = usize::try_from(declared_end)
            .map_or(bytes.len(), |end| end.min(bytes.len()));
        if (payload_end as u64) < declared_end {
            log::debug!(
                "declared payload of {} bytes clamped to the {} available",
                header.declared_len,
                payload_end - HEADER_LEN
            );
        }
        Ok(Self {
            bytes,
            header,
            payload_end,
        })
    }
    #[must_use]
    pub fn header(&self) -> StreamHeader {
        self.header
    }
    /// Offset one past the last payload byte, relative to the start of the stream.
    #[must_use]
    pub fn payload_end(&self) -> usize {
        self.payload_end
    }
    /// The clamped payload window, `bytes[8..payload_end]`.
    #[must_use]
    pub fn payload(&self) -> &'a [u8] {
        &self.bytes[HEADER_LEN..self.payload_end]
    }
    /// Begin a fresh decode over the payload.
    #[must_use]
    pub fn decoder(&self) -> Decoder<'a> {
        Decoder::new(self.payload())
    }
}
