//! # Engine boundary
//!
//! The engine is the (usually foreign) producer of command streams. It is fed a viewport and
//! chart data, and renders into a buffer supplied by the caller. Engines own whatever external
//! resource backs them and release it in `Drop`; [`EngineHandle`] owns the engine, so the
//! resource is created lazily, released exactly once, and can't be used after release.

pub mod negotiate;

pub use negotiate::{obtain_stream, NegotiateError, OutOfMemory, DEFAULT_CAPACITY};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("engine failed to initialize: {0}")]
    Init(String),
    #[error("engine has no chart session")]
    NoSession,
    /// A call was refused with an engine-specific status code.
    #[error("engine call failed with status {0}")]
    Status(i32),
}

/// The area charts are laid out in, in stream coordinates.
#[derive(Copy, Clone, PartialEq, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}
impl Viewport {
    #[must_use]
    pub fn from_size(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }
    /// Nothing can be drawn into a viewport without area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        // Written to also catch NaN.
        !(self.width > 0.0 && self.height > 0.0)
    }
}

pub trait Engine {
    /// Render the current chart into `buffer`, whose length is the capacity.
    ///
    /// Returns the number of bytes written if the stream fit. If it did not, returns the exact
    /// number of bytes needed, which is then larger than the capacity, and the buffer contents
    /// are unspecified.
    /// # Errors
    /// The engine could not render at all.
    fn render(&mut self, buffer: &mut [u8]) -> Result<u32, EngineError>;
    /// Set the area the next render lays out into.
    /// # Errors
    /// Engine-specific refusal.
    fn set_viewport(&mut self, viewport: Viewport) -> Result<(), EngineError>;
    /// Replace the chart's data. The layout of `values` is engine-defined.
    /// # Errors
    /// Engine-specific refusal, such as empty data.
    fn update_data(&mut self, values: &[f64]) -> Result<(), EngineError>;
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn render(&mut self, buffer: &mut [u8]) -> Result<u32, EngineError> {
        (**self).render(buffer)
    }
    fn set_viewport(&mut self, viewport: Viewport) -> Result<(), EngineError> {
        (**self).set_viewport(viewport)
    }
    fn update_data(&mut self, values: &[f64]) -> Result<(), EngineError> {
        (**self).update_data(values)
    }
}

/// Something that can bring up an engine. Any `FnMut() -> Result<impl Engine, EngineError>`
/// qualifies.
pub trait EngineFactory {
    type Engine: Engine;
    /// # Errors
    /// Bring-up failed. May be retried later.
    fn create(&mut self) -> Result<Self::Engine, EngineError>;
}
impl<E, F> EngineFactory for F
where
    E: Engine,
    F: FnMut() -> Result<E, EngineError>,
{
    type Engine = E;
    fn create(&mut self) -> Result<E, EngineError> {
        self()
    }
}

/// Sole owner of an engine instance, created on first use.
pub struct EngineHandle<F: EngineFactory> {
    factory: F,
    engine: Option<F::Engine>,
}
impl<F: EngineFactory> EngineHandle<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            engine: None,
        }
    }
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.engine.is_some()
    }
    /// The engine, if it is up. Never creates one.
    #[must_use]
    pub fn peek(&self) -> Option<&F::Engine> {
        self.engine.as_ref()
    }
    /// Get the engine, bringing it up if it isn't already.
    /// A failed bring-up leaves the handle empty, to be tried again on the next call.
    /// # Errors
    /// The factory failed.
    pub fn get(&mut self) -> Result<&mut F::Engine, EngineError> {
        if self.engine.is_none() {
            match self.factory.create() {
                Ok(engine) => {
                    log::debug!("engine created");
                    self.engine = Some(engine);
                }
                Err(err) => {
                    log::warn!("engine unavailable: {err}");
                    return Err(err);
                }
            }
        }
        // Populated just above if it wasn't already.
        self.engine.as_mut().ok_or(EngineError::NoSession)
    }
    /// Destroy the engine now rather than when the handle drops. A later [`Self::get`] creates
    /// a fresh one.
    pub fn release(&mut self) {
        if self.engine.take().is_some() {
            log::debug!("engine released");
        }
    }
}

#[cfg(test)]
mod test {
    use std::{cell::Cell, rc::Rc};

    use super::{Engine, EngineError, EngineHandle, Viewport};

    /// Counts live instances, to observe creation and destruction.
    struct Counted(Rc<Cell<i32>>);
    impl Counted {
        fn new(live: &Rc<Cell<i32>>) -> Self {
            live.set(live.get() + 1);
            Self(live.clone())
        }
    }
    impl Drop for Counted {
        fn drop(&mut self) {
            self.0.set(self.0.get() - 1);
        }
    }
    impl Engine for Counted {
        fn render(&mut self, _: &mut [u8]) -> Result<u32, EngineError> {
            Ok(0)
        }
        fn set_viewport(&mut self, _: Viewport) -> Result<(), EngineError> {
            Ok(())
        }
        fn update_data(&mut self, _: &[f64]) -> Result<(), EngineError> {
            Ok(())
        }
    }

    #[test]
    fn lazy_create_and_single_release() {
        let live = Rc::new(Cell::new(0));
        let factory_live = live.clone();
        let mut handle = EngineHandle::new(move || -> Result<_, EngineError> {
            Ok(Counted::new(&factory_live))
        });
        assert!(!handle.is_ready());
        assert_eq!(live.get(), 0);

        handle.get().unwrap();
        handle.get().unwrap();
        assert_eq!(live.get(), 1);

        handle.release();
        handle.release();
        assert_eq!(live.get(), 0);

        handle.get().unwrap();
        assert_eq!(live.get(), 1);
        drop(handle);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn failed_bring_up_is_retried() {
        let mut attempts = 0;
        let live = Rc::new(Cell::new(0));
        let factory_live = live.clone();
        let mut handle = EngineHandle::new(move || -> Result<_, EngineError> {
            attempts += 1;
            if attempts == 1 {
                Err(EngineError::Init("isolate".to_owned()))
            } else {
                Ok(Counted::new(&factory_live))
            }
        });
        assert_eq!(
            handle.get().err(),
            Some(EngineError::Init("isolate".to_owned()))
        );
        assert!(!handle.is_ready());
        assert!(handle.get().is_ok());
        assert_eq!(live.get(), 1);
    }

    #[test]
    fn empty_viewports() {
        assert!(Viewport::from_size(0.0, 10.0).is_empty());
        assert!(Viewport::from_size(10.0, -1.0).is_empty());
        assert!(Viewport::from_size(f64::NAN, 10.0).is_empty());
        assert!(!Viewport::from_size(1.0, 1.0).is_empty());
    }
}
