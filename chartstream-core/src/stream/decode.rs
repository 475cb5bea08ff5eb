//! Cursor-driven decoding of the payload into [`Instruction`]s.
//!
//! The decoder is a single forward pass. It ends in an explicit [`DecodeState::Stopped`] state,
//! which records why it ended and thus exactly how far decoding got. Instructions yielded before
//! the stop are complete and valid - a stream that was cut short still draws everything up to
//! the cut.

use az::CheckedAs;

use super::Opcode;
use crate::{
    color::Argb,
    util::{Point, Rect},
};

/// A single decoded drawing instruction, owning its operands.
#[derive(Clone, PartialEq, Debug)]
pub enum Instruction {
    SetColor(Argb),
    SetStrokeWidth(f32),
    MoveTo(Point),
    LineTo(Point),
    /// Open connected line through all points.
    Polyline(Vec<Point>),
    StrokeRect(Rect),
    FillRect(Rect),
    /// Closed polygon, outlined and filled.
    Polygon(Vec<Point>),
    PushClip(Rect),
    PopClip,
    DrawText {
        at: Point,
        text: String,
    },
}
impl Instruction {
    #[must_use]
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::SetColor(_) => Opcode::SetColor,
            Self::SetStrokeWidth(_) => Opcode::SetStrokeWidth,
            Self::MoveTo(_) => Opcode::MoveTo,
            Self::LineTo(_) => Opcode::LineTo,
            Self::Polyline(_) => Opcode::Polyline,
            Self::StrokeRect(_) => Opcode::StrokeRect,
            Self::FillRect(_) => Opcode::FillRect,
            Self::Polygon(_) => Opcode::Polygon,
            Self::PushClip(_) => Opcode::PushClip,
            Self::PopClip => Opcode::PopClip,
            Self::DrawText { .. } => Opcode::DrawText,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The operands of the opcode at `offset` run past the end of the payload.
    /// `needed` and `available` count bytes after the opcode byte.
    #[error("{opcode:?} at payload offset {offset} needs {needed} operand bytes, {available} remain")]
    TruncatedOperand {
        opcode: Opcode,
        offset: usize,
        needed: usize,
        available: usize,
    },
}

/// Why a decoder stopped producing instructions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StopReason {
    /// Every byte of the payload was consumed.
    EndOfPayload,
    /// An unrecognized opcode byte. The rest of the payload is discarded. Not an error.
    UnknownOpcode { opcode: u8, offset: usize },
    /// An operand ran past the payload end.
    Truncated(DecodeError),
}
impl StopReason {
    /// True if the stop indicates a malformed or partially delivered stream.
    #[must_use]
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::Truncated(_))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DecodeState {
    Running,
    Stopped(StopReason),
}

/// Bounds-checked little-endian reads of one instruction's operands.
struct Operands<'a> {
    opcode: Opcode,
    offset: usize,
    /// Everything after the opcode byte.
    bytes: &'a [u8],
    cursor: usize,
}
impl<'a> Operands<'a> {
    fn truncated(&self, needed: usize) -> DecodeError {
        DecodeError::TruncatedOperand {
            opcode: self.opcode,
            offset: self.offset,
            needed,
            available: self.bytes.len(),
        }
    }
    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .cursor
            .checked_add(len)
            .ok_or_else(|| self.truncated(usize::MAX))?;
        let bytes = self.bytes;
        let slice = bytes
            .get(self.cursor..end)
            .ok_or_else(|| self.truncated(end))?;
        self.cursor = end;
        Ok(slice)
    }
    fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let bytes = self.bytes;
        let chunk = bytes[self.cursor..]
            .first_chunk::<N>()
            .ok_or_else(|| self.truncated(self.cursor + N))?;
        self.cursor += N;
        Ok(*chunk)
    }
    fn u16(&mut self) -> Result<u16, DecodeError> {
        self.array().map(u16::from_le_bytes)
    }
    fn u32(&mut self) -> Result<u32, DecodeError> {
        self.array().map(u32::from_le_bytes)
    }
    fn f32(&mut self) -> Result<f32, DecodeError> {
        // from_le_bytes reinterprets the bit pattern, no numeric conversion.
        self.array().map(f32::from_le_bytes)
    }
    fn point(&mut self) -> Result<Point, DecodeError> {
        Ok(Point::new(self.f32()?, self.f32()?))
    }
    fn rect(&mut self) -> Result<Rect, DecodeError> {
        Ok(Rect::new(self.f32()?, self.f32()?, self.f32()?, self.f32()?))
    }
    /// `u32 count` followed by `count` points.
    /// The whole run is bounds checked before allocating, so a hostile count can't balloon memory.
    fn points(&mut self) -> Result<Vec<Point>, DecodeError> {
        const POINT_LEN: usize = 8;
        let count = self.u32()?;
        let len = count
            .checked_as::<usize>()
            .and_then(|count| count.checked_mul(POINT_LEN))
            .ok_or_else(|| self.truncated(usize::MAX))?;
        let raw = self.take(len)?;
        Ok(raw
            .chunks_exact(POINT_LEN)
            .map(|chunk| {
                let (x, y) = chunk.split_at(4);
                Point::new(
                    f32::from_le_bytes([x[0], x[1], x[2], x[3]]),
                    f32::from_le_bytes([y[0], y[1], y[2], y[3]]),
                )
            })
            .collect())
    }
    fn text(&mut self) -> Result<String, DecodeError> {
        let len = self.u16()?;
        let raw = self.take(usize::from(len))?;
        Ok(String::from_utf8_lossy(raw).into_owned())
    }
}

/// Lazily decodes instructions from a payload window.
///
/// Iteration ends at the first of: end of payload, unknown opcode, truncated operand.
/// Afterwards [`Decoder::stop_reason`] reports which.
#[derive(Clone, Debug)]
pub struct Decoder<'a> {
    payload: &'a [u8],
    cursor: usize,
    decoded: usize,
    state: DecodeState,
}
impl<'a> Decoder<'a> {
    #[must_use]
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            payload,
            cursor: 0,
            decoded: 0,
            state: DecodeState::Running,
        }
    }
    #[must_use]
    pub fn state(&self) -> DecodeState {
        self.state
    }
    /// `Some` once the decoder has stopped.
    #[must_use]
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self.state {
            DecodeState::Running => None,
            DecodeState::Stopped(reason) => Some(reason),
        }
    }
    /// Offset into the payload of the next opcode to be read.
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor
    }
    /// Number of instructions yielded so far.
    #[must_use]
    pub fn decoded(&self) -> usize {
        self.decoded
    }
    /// Decode everything that remains, returning the instructions and why decoding ended.
    pub fn decode_all(mut self) -> (Vec<Instruction>, StopReason) {
        let instructions: Vec<Instruction> = self.by_ref().collect();
        // The iterator only returns None after stopping.
        let reason = self.stop_reason().unwrap_or(StopReason::EndOfPayload);
        (instructions, reason)
    }
    fn step(&mut self) -> Result<Instruction, StopReason> {
        let offset = self.cursor;
        let Some(&byte) = self.payload.get(offset) else {
            return Err(StopReason::EndOfPayload);
        };
        let Some(opcode) = Opcode::from_repr(byte) else {
            return Err(StopReason::UnknownOpcode {
                opcode: byte,
                offset,
            });
        };
        let mut operands = Operands {
            opcode,
            offset,
            bytes: &self.payload[offset + 1..],
            cursor: 0,
        };
        // Fixed size records are bounds checked whole, before any operand is read.
        if let Some(len) = opcode.fixed_operand_len() {
            if operands.bytes.len() < len {
                return Err(StopReason::Truncated(operands.truncated(len)));
            }
        }
        let instruction = Self::operands_of(opcode, &mut operands).map_err(StopReason::Truncated)?;
        self.cursor = offset + 1 + operands.cursor;
        Ok(instruction)
    }
    fn operands_of(opcode: Opcode, operands: &mut Operands) -> Result<Instruction, DecodeError> {
        Ok(match opcode {
            Opcode::SetColor => Instruction::SetColor(Argb(operands.u32()?)),
            Opcode::SetStrokeWidth => Instruction::SetStrokeWidth(operands.f32()?),
            Opcode::MoveTo => Instruction::MoveTo(operands.point()?),
            Opcode::LineTo => Instruction::LineTo(operands.point()?),
            Opcode::Polyline => Instruction::Polyline(operands.points()?),
            Opcode::StrokeRect => Instruction::StrokeRect(operands.rect()?),
            Opcode::FillRect => Instruction::FillRect(operands.rect()?),
            Opcode::Polygon => Instruction::Polygon(operands.points()?),
            Opcode::PushClip => Instruction::PushClip(operands.rect()?),
            Opcode::PopClip => Instruction::PopClip,
            Opcode::DrawText => {
                let at = operands.point()?;
                let text = operands.text()?;
                Instruction::DrawText { at, text }
            }
        })
    }
}
impl Iterator for Decoder<'_> {
    type Item = Instruction;
    fn next(&mut self) -> Option<Self::Item> {
        if self.state != DecodeState::Running {
            return None;
        }
        match self.step() {
            Ok(instruction) => {
                self.decoded += 1;
                Some(instruction)
            }
            Err(reason) => {
                match reason {
                    StopReason::EndOfPayload => (),
                    StopReason::UnknownOpcode { opcode, offset } => {
                        log::debug!("unknown opcode {opcode:#04x} at payload offset {offset}, discarding the rest");
                    }
                    StopReason::Truncated(err) => log::warn!("stream cut short: {err}"),
                }
                self.state = DecodeState::Stopped(reason);
                None
            }
        }
    }
}
impl std::iter::FusedIterator for Decoder<'_> {}
