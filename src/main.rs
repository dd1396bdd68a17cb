/// Entry point and frame loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::rngs::StdRng;
use tracing::{debug, info, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use config::SimConfig;
use domain::random::make_rng;
use sim::event::SimEvent;
use sim::step;
use sim::world::WorldState;
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);
const LOG_FILE: &str = "glyphchase.log";

/// Logs go to `glyphchase.log` in the working directory: stderr shares the
/// TTY with the raw-mode frame. Nothing is installed unless `RUST_LOG` is set.
fn init_tracing() -> Option<WorkerGuard> {
    if std::env::var_os("RUST_LOG").is_none() {
        return None;
    }
    let (subscriber, guard) = file_subscriber(Path::new("."), EnvFilter::from_default_env());
    let _ = tracing::subscriber::set_global_default(subscriber);
    Some(guard)
}

/// Plain-text subscriber writing through a background thread. Lines still
/// queued are flushed when the guard drops.
fn file_subscriber(dir: &Path, filter: EnvFilter) -> (Box<dyn Subscriber + Send + Sync>, WorkerGuard) {
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .finish();
    (Box::new(subscriber), guard)
}

fn main() {
    let _log_guard = init_tracing();

    // Setup errors are reported before the terminal enters raw mode.
    let config = match SimConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    let mut rng = make_rng(config.simulation.seed);
    let mut world = match WorldState::new(config, &mut rng) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Could not build the logo: {e}");
            std::process::exit(2);
        }
    };
    info!(
        width = world.config().simulation.grid_width,
        height = world.config().simulation.grid_height,
        letters = world.letters().len(),
        "world ready"
    );
    debug!(config = ?world.config(), "resolved config");

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = frame_loop(&mut world, &mut renderer, &mut rng);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Runtime error: {e}");
    }

    println!("Ghosts eaten: {}", world.eaten_count);
}

fn frame_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    rng: &mut StdRng,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let tick_rate = Duration::from_millis(world.config().simulation.tick_rate_ms);
    let mut last_tick = Instant::now();

    if world.resize(renderer.term_cols()) {
        debug!(start_x = world.layout().start_x(), "logo fitted to terminal");
    }

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() || kb.any_pressed(&[KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc]) {
            break;
        }

        if kb.any_pressed(&[KeyCode::Char('p'), KeyCode::Char('P')]) {
            world.paused = !world.paused;
            // Resume without replaying the paused interval.
            last_tick = Instant::now();
            info!(paused = world.paused, "pause toggled");
        }

        if let Some((cols, _)) = kb.resized() {
            if world.resize(cols as usize) {
                debug!(cols, start_x = world.layout().start_x(), "logo re-fitted");
            }
        }

        let elapsed = last_tick.elapsed();
        if !world.paused && elapsed >= tick_rate {
            last_tick = Instant::now();
            let events = step::advance(world, elapsed.as_millis() as u64, rng);
            log_events(world.tick, &events);
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn log_events(tick: u64, events: &[SimEvent]) {
    for ev in events {
        match ev {
            SimEvent::GhostSpawned { x, y, ch } => debug!(tick, x, y, %ch, "ghost spawned"),
            SimEvent::GhostFrozen { x, y, ch } => debug!(tick, x, y, %ch, "ghost frozen"),
            SimEvent::GhostEaten { x, y, ch } => debug!(tick, x, y, %ch, "ghost eaten"),
            SimEvent::BurstEnded => info!(tick, "opening burst over"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_logged_to_file_not_terminal() {
        let dir = std::env::temp_dir().join(format!("glyphchase-log-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let (subscriber, guard) = file_subscriber(&dir, EnvFilter::new("debug"));
        tracing::subscriber::with_default(subscriber, || {
            log_events(7, &[
                SimEvent::GhostEaten { x: 3, y: 0, ch: 'S' },
                SimEvent::BurstEnded,
            ]);
        });
        drop(guard);

        let text = std::fs::read_to_string(dir.join(LOG_FILE)).unwrap();
        assert!(text.contains("ghost eaten"));
        assert!(text.contains("opening burst over"));
        assert!(!text.contains('\x1b'));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
