/// An opaque, straight-alpha color packed as `0xAARRGGBB`.
///
/// The stream never interprets colors beyond carrying them to the surface, so
/// this is a thin wrapper with channel accessors for surfaces that need them.
#[repr(transparent)]
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, bytemuck::Pod, bytemuck::Zeroable, Debug,
)]
#[allow(clippy::module_name_repetitions)]
pub struct Argb(pub u32);
impl Argb {
    pub const WHITE: Self = Self(0xFFFF_FFFF);

    #[must_use]
    pub const fn from_channels(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }
    #[must_use]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }
    #[must_use]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }
    #[must_use]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }
    #[must_use]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }
    /// `[a, r, g, b]`
    #[must_use]
    pub const fn to_channels(self) -> [u8; 4] {
        [self.alpha(), self.red(), self.green(), self.blue()]
    }
}
impl Default for Argb {
    /// Streams start out painting in opaque white.
    fn default() -> Self {
        Self::WHITE
    }
}
impl From<u32> for Argb {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
impl From<Argb> for u32 {
    fn from(value: Argb) -> Self {
        value.0
    }
}
impl std::fmt::Display for Argb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::Argb;

    #[test]
    fn channels() {
        let color = Argb(0x80FF_4020);
        assert_eq!(color.to_channels(), [0x80, 0xFF, 0x40, 0x20]);
        assert_eq!(Argb::from_channels(0x80, 0xFF, 0x40, 0x20), color);
        assert_eq!(color.to_string(), "#80FF4020");
    }
}
