/// One-byte instruction tags.
///
/// | Opcode | Operands |
/// |--------|----------|
/// | `0x01` SetColor | u32 ARGB |
/// | `0x02` SetStrokeWidth | f32 |
/// | `0x03` MoveTo | f32 x, f32 y |
/// | `0x04` LineTo | f32 x, f32 y |
/// | `0x05` Polyline | u32 count, count * (f32 x, f32 y) |
/// | `0x06` StrokeRect | f32 x, y, w, h |
/// | `0x07` FillRect | f32 x, y, w, h |
/// | `0x08` Polygon | u32 count, count * (f32 x, f32 y) |
/// | `0x09` PushClip | f32 x, y, w, h |
/// | `0x0A` PopClip | (none) |
/// | `0x0B` DrawText | f32 x, y, u16 len, len UTF-8 bytes |
///
/// Any other byte ends the stream.
#[derive(
    strum::AsRefStr, strum::FromRepr, strum::EnumIter, PartialEq, Eq, Copy, Clone, Hash, Debug,
)]
#[repr(u8)]
pub enum Opcode {
    SetColor = 0x01,
    SetStrokeWidth = 0x02,
    MoveTo = 0x03,
    LineTo = 0x04,
    Polyline = 0x05,
    StrokeRect = 0x06,
    FillRect = 0x07,
    Polygon = 0x08,
    PushClip = 0x09,
    PopClip = 0x0A,
    DrawText = 0x0B,
}
impl Opcode {
    /// Size of the operands following the opcode byte, for opcodes whose size does not
    /// depend on the data. `None` for the variable length ones.
    #[must_use]
    pub const fn fixed_operand_len(self) -> Option<usize> {
        match self {
            Self::SetColor | Self::SetStrokeWidth => Some(4),
            Self::MoveTo | Self::LineTo => Some(8),
            Self::StrokeRect | Self::FillRect | Self::PushClip => Some(16),
            Self::PopClip => Some(0),
            Self::Polyline | Self::Polygon | Self::DrawText => None,
        }
    }
}
impl From<Opcode> for u8 {
    fn from(value: Opcode) -> Self {
        value as u8
    }
}
