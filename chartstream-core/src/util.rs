//! Geometry types, shared by the decoder, the painter and surfaces.
//! All coordinates are in the stream's own float space; nothing here converts units.

#[derive(Copy, Clone, PartialEq, PartialOrd, Default, bytemuck::Pod, bytemuck::Zeroable, Debug)]
#[repr(C)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}
impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}
impl From<Point> for [f32; 2] {
    fn from(value: Point) -> Self {
        [value.x, value.y]
    }
}

/// An axis-aligned rectangle, top-left plus size. Sizes are not normalized -
/// negative extents are passed to the surface as-is.
#[derive(Copy, Clone, PartialEq, PartialOrd, Default, bytemuck::Pod, bytemuck::Zeroable, Debug)]
#[repr(C)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}
impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}
