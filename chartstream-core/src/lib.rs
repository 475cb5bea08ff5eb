pub mod color;
pub mod engine;
pub mod paint;
pub mod render;
pub mod stream;
pub mod util;

#[cfg(test)]
mod test_util;

pub use color::Argb;
pub use engine::{Engine, EngineError, EngineFactory, EngineHandle, Viewport};
pub use paint::{PaintState, Surface};
pub use render::{ChartRenderer, FatalError, PassOutcome, PassReport, RenderConfig, SkipReason};
