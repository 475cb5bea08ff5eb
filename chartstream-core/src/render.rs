//! # Render passes
//!
//! A pass obtains one complete stream from the engine, reads its header, decodes it and
//! replays it onto a surface. Everything that goes wrong along the way skips or shortens the
//! pass, except running out of memory for the stream buffer.

use crate::{
    engine::{
        obtain_stream, Engine, EngineError, EngineFactory, EngineHandle, NegotiateError,
        OutOfMemory, Viewport, DEFAULT_CAPACITY,
    },
    paint::{execute, Surface},
    stream::{CommandStream, HeaderError, StopReason, StreamHeader},
};

#[derive(Copy, Clone, PartialEq, Eq, Debug, serde::Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Capacity of the first buffer offered to the engine each pass.
    pub initial_capacity: usize,
}
impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FatalError {
    #[error(transparent)]
    OutOfMemory(#[from] OutOfMemory),
}

/// Why nothing was drawn.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SkipReason {
    /// The engine couldn't be brought up, or failed to render.
    EngineUnavailable(EngineError),
    /// The stream was shorter than its header.
    TruncatedHeader { available: usize },
    /// The viewport has no area.
    EmptyViewport,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PassReport {
    pub header: StreamHeader,
    /// Total stream length, header included.
    pub stream_len: usize,
    /// Instructions that reached the painter.
    pub executed: usize,
    pub stop: StopReason,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PassOutcome {
    Skipped(SkipReason),
    Drawn(PassReport),
}
impl PassOutcome {
    #[must_use]
    pub fn is_drawn(&self) -> bool {
        matches!(self, Self::Drawn(_))
    }
}

/// Run one pass against an engine already configured for it.
/// # Errors
/// Only if a stream buffer could not be allocated. Any other failure is a skipped or
/// shortened pass.
pub fn run_pass<E, S>(
    engine: &mut E,
    config: &RenderConfig,
    surface: S,
) -> Result<PassOutcome, FatalError>
where
    E: Engine + ?Sized,
    S: Surface,
{
    let bytes = match obtain_stream(engine, config.initial_capacity) {
        Ok(bytes) => bytes,
        Err(NegotiateError::EngineUnavailable(err)) => {
            log::warn!("skipping pass, {err}");
            return Ok(PassOutcome::Skipped(SkipReason::EngineUnavailable(err)));
        }
        Err(NegotiateError::OutOfMemory(oom)) => return Err(oom.into()),
    };
    let stream = match CommandStream::new(&bytes) {
        Ok(stream) => stream,
        Err(HeaderError::TruncatedHeader { available }) => {
            log::warn!("skipping pass, stream of {available} bytes has no header");
            return Ok(PassOutcome::Skipped(SkipReason::TruncatedHeader {
                available,
            }));
        }
    };

    let mut decoder = stream.decoder();
    let executed = execute(decoder.by_ref(), surface);
    // The painter drains the decoder, so it has always stopped here.
    let stop = decoder.stop_reason().unwrap_or(StopReason::EndOfPayload);
    log::debug!(
        "pass executed {executed} instructions from {} bytes, {stop:?}",
        bytes.len()
    );
    Ok(PassOutcome::Drawn(PassReport {
        header: stream.header(),
        stream_len: bytes.len(),
        executed,
        stop,
    }))
}

struct Session<F: EngineFactory> {
    engine: EngineHandle<F>,
    viewport: Option<Viewport>,
    data: Vec<f64>,
}

/// Host-facing renderer for one chart.
///
/// Owns the engine, and remembers the viewport and data last given to it. Both are pushed
/// into the engine before each pass. Passes from any number of threads are serialized.
pub struct ChartRenderer<F: EngineFactory> {
    config: RenderConfig,
    session: parking_lot::Mutex<Session<F>>,
}
impl<F: EngineFactory> ChartRenderer<F> {
    pub fn new(factory: F, config: RenderConfig) -> Self {
        Self {
            config,
            session: parking_lot::Mutex::new(Session {
                engine: EngineHandle::new(factory),
                viewport: None,
                data: Vec::new(),
            }),
        }
    }
    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }
    pub fn set_viewport(&self, viewport: Viewport) {
        self.session.lock().viewport = Some(viewport);
    }
    pub fn set_data(&self, data: impl Into<Vec<f64>>) {
        self.session.lock().data = data.into();
    }
    /// Bring the engine up without rendering, returning whether that worked.
    pub fn warm_up(&self) -> bool {
        self.session.lock().engine.get().is_ok()
    }
    /// Destroy the engine. The next pass brings up a new one.
    pub fn release(&self) {
        self.session.lock().engine.release();
    }
    /// Draw the chart onto `surface`.
    /// # Errors
    /// See [`run_pass`].
    pub fn render_pass<S: Surface>(&self, surface: S) -> Result<PassOutcome, FatalError> {
        let mut session = self.session.lock();
        let Session {
            engine,
            viewport,
            data,
        } = &mut *session;

        if viewport.is_some_and(|viewport| viewport.is_empty()) {
            log::debug!("skipping pass, viewport is empty");
            return Ok(PassOutcome::Skipped(SkipReason::EmptyViewport));
        }
        let engine = match engine.get() {
            Ok(engine) => engine,
            Err(err) => return Ok(PassOutcome::Skipped(SkipReason::EngineUnavailable(err))),
        };
        // Refusals here aren't fatal, the engine renders with whatever it had.
        if let Some(viewport) = viewport {
            if let Err(err) = engine.set_viewport(*viewport) {
                log::warn!("engine refused viewport: {err}");
            }
        }
        if !data.is_empty() {
            if let Err(err) = engine.update_data(data) {
                log::warn!("engine refused data: {err}");
            }
        }
        run_pass(engine, &self.config, surface)
    }
}
