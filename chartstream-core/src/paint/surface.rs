use super::PaintState;
use crate::{
    color::Argb,
    util::{Point, Rect},
};

/// A drawing target for replayed streams.
///
/// Implementors rasterize however they like, in the same coordinate space as the stream.
/// Every draw call carries the paint state it should be drawn with, so a surface does not need
/// to track color or width itself. The setters are notifications for surfaces that do.
pub trait Surface {
    /// The current color changed.
    fn set_color(&mut self, _color: Argb) {}
    /// The current stroke width changed.
    fn set_stroke_width(&mut self, _width: f32) {}

    /// Straight segment from `from` to `to`.
    fn draw_line(&mut self, from: Point, to: Point, paint: &PaintState);
    /// Open connected line through every point.
    fn draw_polyline(&mut self, points: &[Point], paint: &PaintState);
    /// Rectangle outline.
    fn stroke_rect(&mut self, rect: Rect, paint: &PaintState);
    /// Solid rectangle in the current color.
    fn fill_rect(&mut self, rect: Rect, paint: &PaintState);
    /// Closed polygon, outlined and filled.
    fn draw_polygon(&mut self, points: &[Point], paint: &PaintState);
    /// Text anchored at `at`.
    fn draw_text(&mut self, at: Point, text: &str, paint: &PaintState);

    /// Save drawing state and replace the clip with `clip`.
    fn push_clip(&mut self, clip: Rect);
    /// Undo the most recent `push_clip`. `restored` is the full state now in effect.
    /// Only ever called with a matching `push_clip` outstanding.
    fn pop_clip(&mut self, restored: &PaintState);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn set_color(&mut self, color: Argb) {
        (**self).set_color(color);
    }
    fn set_stroke_width(&mut self, width: f32) {
        (**self).set_stroke_width(width);
    }
    fn draw_line(&mut self, from: Point, to: Point, paint: &PaintState) {
        (**self).draw_line(from, to, paint);
    }
    fn draw_polyline(&mut self, points: &[Point], paint: &PaintState) {
        (**self).draw_polyline(points, paint);
    }
    fn stroke_rect(&mut self, rect: Rect, paint: &PaintState) {
        (**self).stroke_rect(rect, paint);
    }
    fn fill_rect(&mut self, rect: Rect, paint: &PaintState) {
        (**self).fill_rect(rect, paint);
    }
    fn draw_polygon(&mut self, points: &[Point], paint: &PaintState) {
        (**self).draw_polygon(points, paint);
    }
    fn draw_text(&mut self, at: Point, text: &str, paint: &PaintState) {
        (**self).draw_text(at, text, paint);
    }
    fn push_clip(&mut self, clip: Rect) {
        (**self).push_clip(clip);
    }
    fn pop_clip(&mut self, restored: &PaintState) {
        (**self).pop_clip(restored);
    }
}
