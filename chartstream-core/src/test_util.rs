//! Recording doubles for both ends of a pass.

use std::collections::VecDeque;

use crate::{
    color::Argb,
    engine::{Engine, EngineError, Viewport},
    paint::{PaintState, Surface},
    util::{Point, Rect},
};

#[derive(Clone, PartialEq, Debug)]
pub enum Call {
    SetColor(Argb),
    SetStrokeWidth(f32),
    Line(Point, Point, PaintState),
    Polyline(Vec<Point>, PaintState),
    StrokeRect(Rect, PaintState),
    FillRect(Rect, PaintState),
    Polygon(Vec<Point>, PaintState),
    Text(Point, String, PaintState),
    PushClip(Rect),
    PopClip(PaintState),
}

/// Surface that remembers every call, in order.
#[derive(Default, Debug)]
pub struct RecordingSurface {
    pub calls: Vec<Call>,
}
impl Surface for RecordingSurface {
    fn set_color(&mut self, color: Argb) {
        self.calls.push(Call::SetColor(color));
    }
    fn set_stroke_width(&mut self, width: f32) {
        self.calls.push(Call::SetStrokeWidth(width));
    }
    fn draw_line(&mut self, from: Point, to: Point, paint: &PaintState) {
        self.calls.push(Call::Line(from, to, *paint));
    }
    fn draw_polyline(&mut self, points: &[Point], paint: &PaintState) {
        self.calls.push(Call::Polyline(points.to_vec(), *paint));
    }
    fn stroke_rect(&mut self, rect: Rect, paint: &PaintState) {
        self.calls.push(Call::StrokeRect(rect, *paint));
    }
    fn fill_rect(&mut self, rect: Rect, paint: &PaintState) {
        self.calls.push(Call::FillRect(rect, *paint));
    }
    fn draw_polygon(&mut self, points: &[Point], paint: &PaintState) {
        self.calls.push(Call::Polygon(points.to_vec(), *paint));
    }
    fn draw_text(&mut self, at: Point, text: &str, paint: &PaintState) {
        self.calls.push(Call::Text(at, text.to_owned(), *paint));
    }
    fn push_clip(&mut self, clip: Rect) {
        self.calls.push(Call::PushClip(clip));
    }
    fn pop_clip(&mut self, restored: &PaintState) {
        self.calls.push(Call::PopClip(*restored));
    }
}

/// Overrides for a single render call.
#[derive(Clone, Debug)]
pub enum Reply {
    /// Write nothing, report this size.
    Report(u32),
    /// Write as much of the stream as fits, then report this size.
    WriteThenReport(u32),
    Fail(EngineError),
}

/// Engine serving a fixed byte stream. Without a script it behaves well: copies the stream if
/// it fits, otherwise reports its length.
#[derive(Default, Debug)]
pub struct ScriptedEngine {
    pub stream: Vec<u8>,
    pub script: VecDeque<Reply>,
    /// Capacity of every buffer offered to `render`.
    pub offered: Vec<usize>,
    pub viewports: Vec<Viewport>,
    pub data: Vec<Vec<f64>>,
}
impl ScriptedEngine {
    pub fn new(stream: Vec<u8>) -> Self {
        Self {
            stream,
            ..Default::default()
        }
    }
    pub fn with_script(mut self, script: impl IntoIterator<Item = Reply>) -> Self {
        self.script.extend(script);
        self
    }
    fn write_prefix(&self, buffer: &mut [u8]) {
        let len = self.stream.len().min(buffer.len());
        buffer[..len].copy_from_slice(&self.stream[..len]);
    }
}
impl Engine for ScriptedEngine {
    fn render(&mut self, buffer: &mut [u8]) -> Result<u32, EngineError> {
        self.offered.push(buffer.len());
        match self.script.pop_front() {
            Some(Reply::Report(len)) => Ok(len),
            Some(Reply::WriteThenReport(len)) => {
                self.write_prefix(buffer);
                Ok(len)
            }
            Some(Reply::Fail(err)) => Err(err),
            None => {
                if self.stream.len() <= buffer.len() {
                    self.write_prefix(buffer);
                }
                Ok(self.stream.len() as u32)
            }
        }
    }
    fn set_viewport(&mut self, viewport: Viewport) -> Result<(), EngineError> {
        self.viewports.push(viewport);
        Ok(())
    }
    fn update_data(&mut self, values: &[f64]) -> Result<(), EngineError> {
        if values.is_empty() {
            return Err(EngineError::Status(-1));
        }
        self.data.push(values.to_vec());
        Ok(())
    }
}
