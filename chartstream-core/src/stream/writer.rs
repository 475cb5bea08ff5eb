//! The producing side of the format, for engines.
//!
//! Writes into a caller-provided, fixed capacity buffer. Instructions are only ever committed
//! whole, so a full buffer always holds a decodable prefix. Once something doesn't fit, the
//! writer stops committing but keeps counting, so that [`StreamWriter::finish`] can report the
//! exact size the caller needs to allocate.

use az::{CheckedAs, SaturatingAs};

use super::{Instruction, Opcode, StreamHeader, HEADER_LEN, VERSION};
use crate::{
    color::Argb,
    util::{Point, Rect},
};

/// Most records are a handful of floats - only point lists and text spill.
type Record = smallvec::SmallVec<[u8; 24]>;

pub struct StreamWriter<'b> {
    buffer: &'b mut [u8],
    /// Bytes committed to `buffer`, header included.
    written: usize,
    /// Bytes the whole stream needs, header included.
    required: usize,
    overflowed: bool,
}
impl<'b> StreamWriter<'b> {
    /// Begin a stream at the start of `buffer`. The header is filled in by [`Self::finish`].
    pub fn new(buffer: &'b mut [u8]) -> Self {
        let overflowed = buffer.len() < HEADER_LEN;
        Self {
            buffer,
            written: if overflowed { 0 } else { HEADER_LEN },
            required: HEADER_LEN,
            overflowed,
        }
    }
    /// Encode a complete stream into a fresh vec, sized by a dry run.
    #[must_use]
    pub fn encode_to_vec(instructions: &[Instruction]) -> Vec<u8> {
        let mut empty = [0; 0];
        let mut dry = StreamWriter::new(&mut empty);
        instructions.iter().for_each(|i| dry.instruction(i));
        let mut buffer = vec![0; dry.required];

        let mut writer = StreamWriter::new(&mut buffer);
        instructions.iter().for_each(|i| writer.instruction(i));
        writer.finish();
        buffer
    }
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
    /// True once an instruction failed to fit.
    #[must_use]
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }
    /// Bytes needed for everything recorded so far, header included.
    #[must_use]
    pub fn required(&self) -> usize {
        self.required
    }
    fn commit(&mut self, record: &[u8]) {
        self.required = self.required.saturating_add(record.len());
        if self.overflowed {
            return;
        }
        match self.buffer.get_mut(self.written..self.written + record.len()) {
            Some(dest) => {
                dest.copy_from_slice(record);
                self.written += record.len();
            }
            None => self.overflowed = true,
        }
    }
    fn record(opcode: Opcode) -> Record {
        smallvec::smallvec![opcode.into()]
    }
    fn put_f32s(record: &mut Record, values: &[f32]) {
        for value in values {
            record.extend_from_slice(&value.to_le_bytes());
        }
    }
    fn points(&mut self, opcode: Opcode, points: &[Point]) {
        let Some(count) = points.len().checked_as::<u32>() else {
            log::warn!("{} with {} points does not fit the format", opcode.as_ref(), points.len());
            return;
        };
        let mut record = Self::record(opcode);
        record.reserve(4 + points.len() * 8);
        record.extend_from_slice(&count.to_le_bytes());
        for point in points {
            Self::put_f32s(&mut record, &[point.x, point.y]);
        }
        self.commit(&record);
    }
    fn rect(&mut self, opcode: Opcode, rect: Rect) {
        let mut record = Self::record(opcode);
        Self::put_f32s(&mut record, &[rect.x, rect.y, rect.width, rect.height]);
        self.commit(&record);
    }
    pub fn set_color(&mut self, color: Argb) {
        let mut record = Self::record(Opcode::SetColor);
        record.extend_from_slice(&color.0.to_le_bytes());
        self.commit(&record);
    }
    pub fn set_stroke_width(&mut self, width: f32) {
        let mut record = Self::record(Opcode::SetStrokeWidth);
        Self::put_f32s(&mut record, &[width]);
        self.commit(&record);
    }
    pub fn move_to(&mut self, to: Point) {
        let mut record = Self::record(Opcode::MoveTo);
        Self::put_f32s(&mut record, &[to.x, to.y]);
        self.commit(&record);
    }
    pub fn line_to(&mut self, to: Point) {
        let mut record = Self::record(Opcode::LineTo);
        Self::put_f32s(&mut record, &[to.x, to.y]);
        self.commit(&record);
    }
    /// Open line through `points`. Fewer than two points draw nothing and are skipped.
    pub fn polyline(&mut self, points: &[Point]) {
        if points.len() < 2 {
            return;
        }
        self.points(Opcode::Polyline, points);
    }
    pub fn stroke_rect(&mut self, rect: Rect) {
        self.rect(Opcode::StrokeRect, rect);
    }
    pub fn fill_rect(&mut self, rect: Rect) {
        self.rect(Opcode::FillRect, rect);
    }
    /// Closed polygon. Fewer than three points enclose nothing and are skipped.
    pub fn polygon(&mut self, points: &[Point]) {
        if points.len() < 3 {
            return;
        }
        self.points(Opcode::Polygon, points);
    }
    pub fn push_clip(&mut self, rect: Rect) {
        self.rect(Opcode::PushClip, rect);
    }
    pub fn pop_clip(&mut self) {
        self.commit(&[Opcode::PopClip.into()]);
    }
    /// Text longer than `u16::MAX` bytes is cut at the last char boundary that fits.
    /// Empty text is skipped.
    pub fn draw_text(&mut self, at: Point, text: &str) {
        if text.is_empty() {
            return;
        }
        let mut len = text.len().min(usize::from(u16::MAX));
        while !text.is_char_boundary(len) {
            len -= 1;
        }
        let bytes = &text.as_bytes()[..len];

        let mut record = Self::record(Opcode::DrawText);
        Self::put_f32s(&mut record, &[at.x, at.y]);
        // Len <= u16::MAX from above.
        record.extend_from_slice(&bytes.len().saturating_as::<u16>().to_le_bytes());
        record.extend_from_slice(bytes);
        self.commit(&record);
    }
    /// Append an already decoded instruction.
    pub fn instruction(&mut self, instruction: &Instruction) {
        match instruction {
            Instruction::SetColor(color) => self.set_color(*color),
            Instruction::SetStrokeWidth(width) => self.set_stroke_width(*width),
            Instruction::MoveTo(to) => self.move_to(*to),
            Instruction::LineTo(to) => self.line_to(*to),
            Instruction::Polyline(points) => self.polyline(points),
            Instruction::StrokeRect(rect) => self.stroke_rect(*rect),
            Instruction::FillRect(rect) => self.fill_rect(*rect),
            Instruction::Polygon(points) => self.polygon(points),
            Instruction::PushClip(rect) => self.push_clip(*rect),
            Instruction::PopClip => self.pop_clip(),
            Instruction::DrawText { at, text } => self.draw_text(*at, text),
        }
    }
    /// Write the header and report the result the way an engine's render call does:
    /// the number of bytes written if everything fit, otherwise the total size required,
    /// which is then strictly larger than the capacity.
    pub fn finish(mut self) -> u32 {
        if self.buffer.len() >= HEADER_LEN {
            let header = StreamHeader {
                version: VERSION,
                declared_len: (self.written - HEADER_LEN).saturating_as(),
            };
            self.buffer[..HEADER_LEN].copy_from_slice(&header.to_bytes());
        }
        if self.overflowed {
            log::trace!(
                "stream needs {} bytes, capacity is {}",
                self.required,
                self.buffer.len()
            );
            self.required.saturating_as()
        } else {
            self.written.saturating_as()
        }
    }
}
