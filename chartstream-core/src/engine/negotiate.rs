//! Buffer negotiation.
//!
//! Streams have no size known up front. The engine is first offered a default sized buffer; if
//! the stream didn't fit, the engine answers with the exact size it needs, and is offered a
//! buffer of exactly that size once more. There is no further retry: an engine that claims
//! more room again gets whatever it wrote decoded as-is.

use std::collections::TryReserveError;

use az::CheckedAs;
use human_bytes::human_bytes;

use super::{Engine, EngineError};

/// First-attempt capacity, 1MiB.
pub const DEFAULT_CAPACITY: usize = 1024 * 1024;

/// The host could not provide a stream buffer. Unlike every other failure during a pass,
/// this one is not recoverable by skipping the pass.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to allocate a {} stream buffer", human_bytes(*.requested as f64))]
pub struct OutOfMemory {
    pub requested: usize,
    #[source]
    pub source: TryReserveError,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NegotiateError {
    #[error("engine unavailable")]
    EngineUnavailable(#[source] EngineError),
    #[error(transparent)]
    OutOfMemory(#[from] OutOfMemory),
}

/// Zeroed buffer of exactly `len` bytes, reporting allocation failure instead of aborting.
fn allocate(len: usize) -> Result<Vec<u8>, OutOfMemory> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|source| OutOfMemory {
            requested: len,
            source,
        })?;
    buffer.resize(len, 0);
    Ok(buffer)
}

/// Retrieve one complete stream from `engine`, starting with `initial_capacity` bytes.
///
/// The returned buffer holds exactly the bytes the engine reported as written.
/// # Errors
/// * [`NegotiateError::EngineUnavailable`] if the engine failed to render. Nothing to draw.
/// * [`NegotiateError::OutOfMemory`] if a buffer could not be allocated.
pub fn obtain_stream<E: Engine + ?Sized>(
    engine: &mut E,
    initial_capacity: usize,
) -> Result<Vec<u8>, NegotiateError> {
    let mut buffer = allocate(initial_capacity)?;
    let reported = render(engine, &mut buffer)?;
    if reported <= buffer.len() {
        buffer.truncate(reported);
        return Ok(buffer);
    }

    // Too small. `reported` is the exact size needed.
    log::debug!(
        "stream needs {}, offered {}. Renegotiating",
        human_bytes(reported as f64),
        human_bytes(buffer.len() as f64),
    );
    drop(buffer);
    let mut buffer = allocate(reported)?;
    let second = render(engine, &mut buffer)?;
    if second <= buffer.len() {
        buffer.truncate(second);
    } else {
        // Known weak spot of the protocol. Not retried, decoding will stop wherever the
        // written data does.
        log::warn!(
            "engine asked for {second} bytes after being given the {reported} it requested, decoding what was written"
        );
    }
    Ok(buffer)
}

fn render<E: Engine + ?Sized>(engine: &mut E, buffer: &mut [u8]) -> Result<usize, NegotiateError> {
    let reported = engine
        .render(buffer)
        .map_err(NegotiateError::EngineUnavailable)?;
    // Only fails where usize is narrower than u32, where it couldn't be allocated anyway.
    Ok(reported.checked_as().unwrap_or(usize::MAX))
}

#[cfg(test)]
mod test {
    use super::{obtain_stream, NegotiateError, OutOfMemory, DEFAULT_CAPACITY};
    use crate::{
        engine::EngineError,
        test_util::{Reply, ScriptedEngine},
    };

    #[test]
    fn fits_first_time() {
        let stream: Vec<u8> = (0..100).collect();
        let mut engine = ScriptedEngine::new(stream.clone());
        let bytes = obtain_stream(&mut engine, DEFAULT_CAPACITY).unwrap();
        assert_eq!(bytes, stream);
        assert_eq!(engine.offered, vec![DEFAULT_CAPACITY]);
    }

    #[test]
    fn exact_fit_is_not_renegotiated() {
        let stream = vec![7; 64];
        let mut engine = ScriptedEngine::new(stream.clone());
        let bytes = obtain_stream(&mut engine, 64).unwrap();
        assert_eq!(bytes, stream);
        assert_eq!(engine.offered, vec![64]);
    }

    #[test]
    fn reallocates_once_to_exact_size() {
        let stream: Vec<u8> = (0..=255).cycle().take(5000).collect();
        let mut engine = ScriptedEngine::new(stream.clone());
        let bytes = obtain_stream(&mut engine, 1024).unwrap();
        assert_eq!(bytes, stream);
        assert_eq!(engine.offered, vec![1024, 5000]);
    }

    #[test]
    fn second_oversize_is_not_retried() {
        let mut engine = ScriptedEngine::new(vec![1; 16]).with_script([
            Reply::Report(300),
            // Writes what fits, then claims to need even more.
            Reply::WriteThenReport(400),
        ]);
        let bytes = obtain_stream(&mut engine, 100).unwrap();
        assert_eq!(engine.offered, vec![100, 300]);
        // Kept at the size that was offered.
        assert_eq!(bytes.len(), 300);
        assert_eq!(&bytes[..16], &[1; 16]);
    }

    #[test]
    fn engine_failure_is_unavailable() {
        let mut engine =
            ScriptedEngine::new(Vec::new()).with_script([Reply::Fail(EngineError::NoSession)]);
        assert_eq!(
            obtain_stream(&mut engine, 100),
            Err(NegotiateError::EngineUnavailable(EngineError::NoSession))
        );
    }

    #[test]
    fn failure_after_reallocation_is_unavailable() {
        let mut engine = ScriptedEngine::new(vec![1; 16]).with_script([
            Reply::Report(300),
            Reply::Fail(EngineError::Status(7)),
        ]);
        assert_eq!(
            obtain_stream(&mut engine, 100),
            Err(NegotiateError::EngineUnavailable(EngineError::Status(7)))
        );
        assert_eq!(engine.offered, vec![100, 300]);
    }

    #[test]
    fn allocation_failure_is_reported() {
        let mut engine = ScriptedEngine::new(Vec::new());
        let err = obtain_stream(&mut engine, usize::MAX).unwrap_err();
        assert!(matches!(
            err,
            NegotiateError::OutOfMemory(OutOfMemory {
                requested: usize::MAX,
                ..
            })
        ));
        assert!(engine.offered.is_empty());
    }
}
