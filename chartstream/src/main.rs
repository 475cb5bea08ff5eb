#![warn(clippy::pedantic)]

pub mod cli;
pub mod config;
pub mod engines;
pub mod surface;

use anyhow::Result as AnyResult;
use chartstream_core::{ChartRenderer, EngineError, PassOutcome, RenderConfig};

use engines::{DemoEngine, FileEngine, SAMPLE};
use surface::LogSurface;

/// Log what a pass did. Returns true if anything was drawn.
fn report(label: &str, outcome: &PassOutcome) -> bool {
    match outcome {
        PassOutcome::Drawn(report) => {
            log::info!(
                "{label}: v{} stream, {}, {} instructions executed, stopped at {:?}",
                report.header.version,
                human_bytes::human_bytes(report.stream_len as f64),
                report.executed,
                report.stop,
            );
            if report.stop.is_truncation() {
                log::warn!("{label}: stream was cut short");
            }
            true
        }
        PassOutcome::Skipped(reason) => {
            log::warn!("{label}: skipped, {reason:?}");
            false
        }
    }
}

fn replay_demo(config: RenderConfig, settings: &config::Settings) -> AnyResult<bool> {
    let renderer = ChartRenderer::new(
        || -> Result<_, EngineError> { Ok(DemoEngine::default()) },
        config,
    );
    renderer.set_viewport(settings.viewport);
    renderer.set_data(SAMPLE);
    let mut surface = LogSurface::new("demo");
    let outcome = renderer.render_pass(&mut surface)?;
    log::debug!("demo: {} surface calls", surface.calls());
    Ok(report("demo", &outcome))
}

fn replay_file(config: RenderConfig, path: &std::path::Path) -> AnyResult<bool> {
    let label = path.display().to_string();
    let renderer = ChartRenderer::new(|| FileEngine::open(path), config);
    let mut surface = LogSurface::new(label.clone());
    let outcome = renderer.render_pass(&mut surface)?;
    Ok(report(&label, &outcome))
}

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    // Everything is let through here, the configured level is applied below.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Trace)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Trace);
    }

    let args = cli::Args::parse(std::env::args_os().skip(1))?;
    let settings = config::Settings::load(args.config.as_deref());
    log::set_max_level(settings.level_filter());

    let mut render_config = settings.render_config();
    if let Some(capacity) = args.capacity {
        render_config.initial_capacity = capacity;
    }
    log::debug!(
        "offering {} on first attempt",
        human_bytes::human_bytes(render_config.initial_capacity as f64)
    );

    if args.paths.is_empty() {
        if !replay_demo(render_config, &settings)? {
            anyhow::bail!("demo chart could not be drawn");
        }
        return Ok(());
    }

    // Did we have at least one success?
    let mut had_success = false;
    for path in &args.paths {
        // Out of memory aborts the whole run, not just this file.
        had_success |= replay_file(render_config, path)?;
    }
    if !had_success {
        anyhow::bail!("none of the {} streams could be drawn", args.paths.len());
    }
    Ok(())
}
