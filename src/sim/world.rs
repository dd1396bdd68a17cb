/// WorldState: the complete snapshot of a running simulation.
///
/// ## Ownership
///
///   - `config`: immutable after construction.
///   - `layout`: grid + letter table. Rebuilt only by `resize()`; read-only
///     to the engine and the compositor.
///   - entities and clock: mutated exclusively by `step::advance`.
///
/// ## Time
///
/// `clock_ms` is simulation time, advanced by the `dt` handed to `advance`.
/// Every entity keeps its own `last_move_ms`, so different speeds give
/// different cadences under one shared tick.

use crate::config::SimConfig;
use crate::domain::entity::{Chaser, Ghost};
use crate::domain::grid::{Grid, LetterPosition};
use crate::domain::motion::Bounds;
use crate::domain::random::RandomSource;
use crate::error::SetupError;
use super::layout::LogoLayout;

pub struct WorldState {
    config: SimConfig,
    layout: LogoLayout,

    // ── Entities ──
    pub ghosts: Vec<Ghost>,
    pub chaser: Chaser,

    // ── Clock ──
    pub clock_ms: u64,
    pub tick: u64,
    pub eaten_count: u64,
    pub burst_spawned: usize,
    pub burst_ended: bool,

    // ── Meta ──
    pub paused: bool,
}

// ── Construction ──

impl WorldState {
    /// Validate config, lay out the logo, place the chaser at the center.
    pub fn new(config: SimConfig, rng: &mut dyn RandomSource) -> Result<Self, SetupError> {
        config.validate()?;
        let layout = LogoLayout::new(
            config.display.art.clone(),
            config.simulation.grid_width,
            config.simulation.grid_height,
            config.display.fixed_start_x,
        )?;
        let bounds = Bounds { width: config.simulation.grid_width, height: config.simulation.grid_height };
        let (cx, cy) = bounds.center();
        let chaser = Chaser::new(cx, cy, rng.cardinal());

        Ok(WorldState {
            config,
            layout,
            ghosts: Vec::new(),
            chaser,
            clock_ms: 0,
            tick: 0,
            eaten_count: 0,
            burst_spawned: 0,
            burst_ended: false,
            paused: false,
        })
    }
}

// ── Queries ──

impl WorldState {
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        self.layout.grid()
    }

    pub fn letters(&self) -> &[LetterPosition] {
        self.layout.letters()
    }

    pub fn layout(&self) -> &LogoLayout {
        &self.layout
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        let g = self.layout.grid();
        Bounds { width: g.width, height: g.height }
    }

    /// Elevated spawn probability applies while this is true.
    pub fn is_initial_burst_period(&self) -> bool {
        self.clock_ms < self.config.spawn.burst_duration_ms
    }

    pub fn population_full(&self) -> bool {
        self.ghosts.len() >= self.config.spawn.max_ghosts
    }
}

// ── Layout ──

impl WorldState {
    /// Re-fit the logo to a new surface width. Entities keep their cells.
    pub fn resize(&mut self, surface_cols: usize) -> bool {
        self.layout.fit(surface_cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Dir;
    use crate::domain::random::ScriptedRandom;

    #[test]
    fn chaser_starts_centered() {
        let mut rng = ScriptedRandom::new(&[ScriptedRandom::dir(Dir::Left)]);
        let w = WorldState::new(SimConfig::default(), &mut rng).unwrap();
        assert_eq!((w.chaser.x, w.chaser.y), (50, 10));
        assert_eq!(w.chaser.dir(), Dir::Left);
        assert!(w.ghosts.is_empty());
        assert_eq!(w.eaten_count, 0);
        assert!(w.is_initial_burst_period());
    }

    #[test]
    fn invalid_config_refuses_to_start() {
        let mut cfg = SimConfig::default();
        cfg.simulation.grid_width = 0;
        let mut rng = ScriptedRandom::new(&[]);
        assert!(matches!(WorldState::new(cfg, &mut rng), Err(SetupError::EmptyGrid { .. })));
    }

    #[test]
    fn resize_keeps_dimensions() {
        let mut rng = ScriptedRandom::new(&[]);
        let mut w = WorldState::new(SimConfig::default(), &mut rng).unwrap();
        let before = w.bounds();
        w.resize(80);
        assert_eq!(w.bounds(), before);
    }
}
