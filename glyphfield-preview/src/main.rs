mod cli;
mod host;
mod logging;

use std::{
    io::{self, Write},
    thread,
    time::{Duration, Instant},
};

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use glyphfield_core::{ColorScheme, FieldRenderer, FrameOutcome, TextSurface};

use crate::{
    cli::Cli,
    host::TerminalHost,
    logging::{LoggingConfig, init_logging},
};

/// Glyphs fainter than this print as blank.
const VISIBLE_ALPHA: f32 = 0.5;

const CLEAR_SCREEN: &str = "\x1b[2J";
const CURSOR_HOME: &str = "\x1b[H";

fn main() -> Result<()> {
    // panic hook
    color_eyre::install()?;

    let cli = Cli::parse();
    cli.validate()?;

    let logging_config = LoggingConfig::from_env().tui(!cli.snapshot);
    let _guard = init_logging(&logging_config).wrap_err("Failed to initialize logging")?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "glyphfield-preview starting up");

    let config = cli.field_config()?;
    let fps = cli.playback_fps(&config);
    if cli.snapshot {
        cli.print_summary(&config, fps);
    }

    // the playback loop paces frames itself
    let mut renderer = FieldRenderer::new(config.fps(0.0))?;

    let (cols, rows) = cli.grid_size();
    let host = TerminalHost::new(cols, rows, cli.cell_size, ColorScheme::Dark);
    let mut surface = TextSurface::new(cli.cell_size);
    renderer.mount(&host, &mut surface);

    if cli.snapshot {
        let outcome = renderer.frame(cli.time_ms, &host, &mut surface);
        tracing::info!(?outcome, time_ms = cli.time_ms, "snapshot rendered");

        io::stdout()
            .lock()
            .write_all(surface.render(VISIBLE_ALPHA).as_bytes())
            .wrap_err("Failed to write snapshot")?;
        return Ok(());
    }

    play(&mut renderer, &host, &mut surface, cli.frames, fps)
}

/// Draws frames to the terminal until `frames` have been shown, or forever
/// if `frames` is zero.
fn play(
    renderer: &mut FieldRenderer,
    host: &TerminalHost,
    surface: &mut TextSurface,
    frames: u64,
    fps: f64,
) -> Result<()> {
    let interval = Duration::try_from_secs_f64(1.0 / fps)
        .wrap_err_with(|| format!("Invalid playback frame rate {fps}"))?;
    let start = Instant::now();
    let mut stdout = io::stdout().lock();
    write!(stdout, "{CLEAR_SCREEN}")?;

    let mut shown = 0u64;
    while frames == 0 || shown < frames {
        let frame_start = Instant::now();
        let now_ms = start.elapsed().as_secs_f64() * 1000.0;

        match renderer.frame(now_ms, host, surface) {
            FrameOutcome::Drawn { glyphs_drawn, .. } => {
                write!(stdout, "{CURSOR_HOME}{}", surface.render(VISIBLE_ALPHA))
                    .wrap_err("Failed to write frame")?;
                stdout.flush()?;
                tracing::trace!(frame = shown, glyphs_drawn, "frame written");
                shown += 1;
            },
            FrameOutcome::Skipped(reason) => {
                tracing::debug!(?reason, "frame skipped");
            },
        }

        if let Some(rest) = interval.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }

    tracing::info!(frames = shown, elapsed_ms = start.elapsed().as_millis() as u64, "playback done");
    Ok(())
}
