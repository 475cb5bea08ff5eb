use chartstream_core::{
    util::{Point, Rect},
    Argb, PaintState, Surface,
};

/// Surface that draws nothing, and logs every call it receives at `info`.
pub struct LogSurface {
    label: String,
    calls: usize,
}
impl LogSurface {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            calls: 0,
        }
    }
    /// Number of calls received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls
    }
    fn log(&mut self, args: std::fmt::Arguments) {
        self.calls += 1;
        log::info!("[{}] {args}", self.label);
    }
}
impl Surface for LogSurface {
    fn set_color(&mut self, color: Argb) {
        self.log(format_args!("set_color {color}"));
    }
    fn set_stroke_width(&mut self, width: f32) {
        self.log(format_args!("set_stroke_width {width}"));
    }
    fn draw_line(&mut self, from: Point, to: Point, paint: &PaintState) {
        self.log(format_args!(
            "draw_line ({}, {}) -> ({}, {}) {} w{}",
            from.x, from.y, to.x, to.y, paint.color, paint.stroke_width
        ));
    }
    fn draw_polyline(&mut self, points: &[Point], paint: &PaintState) {
        self.log(format_args!(
            "draw_polyline {} points {} w{}",
            points.len(),
            paint.color,
            paint.stroke_width
        ));
    }
    fn stroke_rect(&mut self, rect: Rect, paint: &PaintState) {
        self.log(format_args!(
            "stroke_rect {rect:?} {} w{}",
            paint.color, paint.stroke_width
        ));
    }
    fn fill_rect(&mut self, rect: Rect, paint: &PaintState) {
        self.log(format_args!("fill_rect {rect:?} {}", paint.color));
    }
    fn draw_polygon(&mut self, points: &[Point], paint: &PaintState) {
        self.log(format_args!(
            "draw_polygon {} points {}",
            points.len(),
            paint.color
        ));
    }
    fn draw_text(&mut self, at: Point, text: &str, paint: &PaintState) {
        self.log(format_args!(
            "draw_text ({}, {}) {text:?} {}",
            at.x, at.y, paint.color
        ));
    }
    fn push_clip(&mut self, clip: Rect) {
        self.log(format_args!("push_clip {clip:?}"));
    }
    fn pop_clip(&mut self, restored: &PaintState) {
        self.log(format_args!("pop_clip, clip now {:?}", restored.clip));
    }
}
