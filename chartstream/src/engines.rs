//! Engines the replay tool can drive.

use az::{Az, SaturatingAs};
use chartstream_core::{
    stream::StreamWriter,
    util::{Point, Rect},
    Argb, Engine, EngineError, Viewport,
};

/// Serves a recorded stream verbatim, whatever the viewport or data.
pub struct FileEngine {
    bytes: Vec<u8>,
}
impl FileEngine {
    /// # Errors
    /// The file can't be read, or is too large to be a stream.
    pub fn open(path: &std::path::Path) -> Result<Self, EngineError> {
        let bytes = std::fs::read(path)
            .map_err(|e| EngineError::Init(format!("{}: {e}", path.display())))?;
        log::debug!(
            "read {} from {}",
            human_bytes::human_bytes(bytes.len() as f64),
            path.display()
        );
        Self::from_bytes(bytes)
    }
    /// # Errors
    /// `bytes` is longer than a stream length can express.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, EngineError> {
        if u32::try_from(bytes.len()).is_err() {
            return Err(EngineError::Init(format!(
                "{} bytes is too large for a stream",
                bytes.len()
            )));
        }
        Ok(Self { bytes })
    }
}
impl Engine for FileEngine {
    fn render(&mut self, buffer: &mut [u8]) -> Result<u32, EngineError> {
        if let Some(dest) = buffer.get_mut(..self.bytes.len()) {
            dest.copy_from_slice(&self.bytes);
        }
        // Checked on construction.
        Ok(self.bytes.len().saturating_as())
    }
    fn set_viewport(&mut self, _: Viewport) -> Result<(), EngineError> {
        Ok(())
    }
    fn update_data(&mut self, _: &[f64]) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Monthly figures for the demo chart.
pub const SAMPLE: [f64; 12] = [
    12.0, 15.5, 14.0, 19.25, 23.0, 21.5, 26.0, 30.5, 28.0, 24.5, 27.75, 33.0,
];

const BACKGROUND: Argb = Argb(0xFF1E_1E2E);
const GRID: Argb = Argb(0xFF45_475A);
const AREA: Argb = Argb(0x4089_B4FA);
const LINE: Argb = Argb(0xFF89_B4FA);
const TEXT: Argb = Argb(0xFFCD_D6F4);
const MARGIN: f32 = 24.0;
const GRID_LINES: u16 = 4;

/// Lays out a filled line chart of its data, in-process.
pub struct DemoEngine {
    viewport: Viewport,
    data: Vec<f64>,
}
impl Default for DemoEngine {
    fn default() -> Self {
        Self {
            viewport: Viewport::from_size(640.0, 360.0),
            data: SAMPLE.to_vec(),
        }
    }
}
impl DemoEngine {
    fn draw(&self, writer: &mut StreamWriter) {
        let Viewport {
            x,
            y,
            width,
            height,
        } = self.viewport;
        let (x, y, width, height) = (
            x.az::<f32>(),
            y.az::<f32>(),
            width.az::<f32>(),
            height.az::<f32>(),
        );

        writer.set_color(BACKGROUND);
        writer.fill_rect(Rect::new(x, y, width, height));
        writer.set_color(TEXT);
        writer.draw_text(Point::new(x + MARGIN, y + MARGIN), "chartstream demo");

        let plot = Rect::new(
            x + MARGIN,
            y + MARGIN * 1.5,
            (width - MARGIN * 2.0).max(0.0),
            (height - MARGIN * 2.5).max(0.0),
        );
        let bottom = plot.y + plot.height;
        let right = plot.x + plot.width;
        writer.set_color(GRID);
        writer.set_stroke_width(1.0);
        writer.stroke_rect(plot);
        for line in 1..GRID_LINES {
            let gy = plot.y + plot.height * f32::from(line) / f32::from(GRID_LINES);
            writer.move_to(Point::new(plot.x, gy));
            writer.line_to(Point::new(right, gy));
        }

        let min = self.data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = if max > min { max - min } else { 1.0 };
        let last = self.data.len().saturating_sub(1).max(1).az::<f32>();
        let points: Vec<Point> = self
            .data
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let t = i.az::<f32>() / last;
                let v = ((value - min) / span).az::<f32>();
                Point::new(plot.x + plot.width * t, bottom - plot.height * v)
            })
            .collect();

        writer.push_clip(plot);
        let mut area = points.clone();
        if let (Some(first), Some(end)) = (points.first(), points.last()) {
            area.push(Point::new(end.x, bottom));
            area.push(Point::new(first.x, bottom));
        }
        writer.set_color(AREA);
        writer.polygon(&area);
        writer.set_color(LINE);
        writer.set_stroke_width(2.0);
        writer.polyline(&points);
        writer.pop_clip();

        writer.set_color(TEXT);
        writer.draw_text(
            Point::new(plot.x, y + height - MARGIN * 0.25),
            &format!("min {min:.1}  max {max:.1}"),
        );
    }
}
impl Engine for DemoEngine {
    fn render(&mut self, buffer: &mut [u8]) -> Result<u32, EngineError> {
        let mut writer = StreamWriter::new(buffer);
        self.draw(&mut writer);
        Ok(writer.finish())
    }
    fn set_viewport(&mut self, viewport: Viewport) -> Result<(), EngineError> {
        self.viewport = viewport;
        Ok(())
    }
    fn update_data(&mut self, values: &[f64]) -> Result<(), EngineError> {
        if values.is_empty() {
            return Err(EngineError::Status(-1));
        }
        self.data = values.to_vec();
        Ok(())
    }
}
