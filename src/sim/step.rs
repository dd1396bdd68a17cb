/// The step function: advances the world by `dt_ms` of simulation time.
///
/// Processing order:
///   1. Clock
///   2. Ghost movement (each on its own cadence)
///   3. Chaser movement (pursue nearest ghost, or wander)
///   4. Collision / consumption
///   5. Spawning (burst, zero-population guarantee, chance)
///
/// Nothing here touches the terminal; rendering reads the result.

use crate::domain::ai;
use crate::domain::motion::{self, MoveOutcome, TurnRange};
use crate::domain::random::RandomSource;
use super::event::SimEvent;
use super::spawn;
use super::world::WorldState;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn advance(world: &mut WorldState, dt_ms: u64, rng: &mut dyn RandomSource) -> Vec<SimEvent> {
    let mut events: Vec<SimEvent> = Vec::new();
    world.tick += 1;
    world.clock_ms += dt_ms;

    resolve_ghost_movement(world, rng, &mut events);
    resolve_chaser_movement(world, rng);
    resolve_collisions(world, &mut events);
    spawn::resolve_spawning(world, rng, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Ghosts
// ══════════════════════════════════════════════════════════════

fn resolve_ghost_movement(world: &mut WorldState, rng: &mut dyn RandomSource, events: &mut Vec<SimEvent>) {
    let bounds = world.bounds();
    let base_ms = world.config().simulation.tick_rate_ms as f64;
    let turns = TurnRange { min: world.config().ghost.turn_min, max: world.config().ghost.turn_max };
    let now = world.clock_ms;

    for g in world.ghosts.iter_mut() {
        if g.frozen { continue; }

        // Cadence: slower ghosts wait longer between moves
        let interval = base_ms / g.speed;
        if ((now - g.last_move_ms) as f64) < interval { continue; }

        g.last_move_ms = now;
        if motion::move_ghost(g, bounds, turns, rng) == MoveOutcome::Froze {
            events.push(SimEvent::GhostFrozen { x: g.x, y: g.y, ch: g.ch });
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Chaser
// ══════════════════════════════════════════════════════════════

fn resolve_chaser_movement(world: &mut WorldState, rng: &mut dyn RandomSource) {
    let interval = world.config().chaser_interval_ms();
    let now = world.clock_ms;
    if ((now - world.chaser.last_move_ms) as f64) < interval { return; }
    world.chaser.last_move_ms = now;

    let (cx, cy) = (world.chaser.x, world.chaser.y);
    let dir = match ai::find_target(cx, cy, &world.ghosts) {
        Some(i) => {
            let target = &world.ghosts[i];
            match ai::pursuit_dir(cx, cy, target.x, target.y) {
                Some(d) => d,
                None => return, // already on the target; collision handles it
            }
        }
        None => {
            let chance = world.config().chaser.wander_turn_chance;
            match ai::wander_dir(&world.chaser, world.bounds(), chance, rng) {
                Some(d) => d,
                None => return,
            }
        }
    };

    world.chaser.set_dir(dir);
    if let Some((nx, ny)) = world.bounds().step(cx, cy, dir) {
        world.chaser.x = nx;
        world.chaser.y = ny;
    }
}

// ══════════════════════════════════════════════════════════════
// Collision
// ══════════════════════════════════════════════════════════════

/// Remove every ghost standing on the chaser's cell. Positional equality only.
fn resolve_collisions(world: &mut WorldState, events: &mut Vec<SimEvent>) {
    let (cx, cy) = (world.chaser.x, world.chaser.y);
    let before = world.ghosts.len();
    world.ghosts.retain(|g| {
        let eaten = g.x == cx && g.y == cy;
        if eaten {
            events.push(SimEvent::GhostEaten { x: g.x, y: g.y, ch: g.ch });
        }
        !eaten
    });
    world.eaten_count += (before - world.ghosts.len()) as u64;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::domain::entity::{Chaser, Dir, Ghost, GhostSeed, Rgb};
    use crate::domain::random::{make_rng, ScriptedRandom};

    const TICK: u64 = 50;

    /// World with no automatic spawns beyond the zero-population guarantee.
    fn quiet_world(art: &[&str], w: usize, h: usize, rng: &mut dyn RandomSource) -> WorldState {
        let mut cfg = SimConfig::default();
        cfg.simulation.grid_width = w;
        cfg.simulation.grid_height = h;
        cfg.simulation.tick_rate_ms = TICK;
        cfg.display.art = art.iter().map(|l| l.to_string()).collect();
        cfg.display.fixed_start_x = Some(2);
        cfg.spawn.burst_count = 0;
        cfg.spawn.spawn_chance = 0.0;
        cfg.spawn.burst_spawn_chance = 0.0;
        cfg.ghost.speed_min = 1.0;
        cfg.ghost.speed_max = 1.0;
        WorldState::new(cfg, rng).unwrap()
    }

    fn parked_ghost(x: usize, y: usize) -> Ghost {
        let mut g = Ghost::new(x, y, 'S', GhostSeed {
            dir: Dir::Left,
            speed: 1.0,
            freeze_ratio: 0.1,
            velocity_decay: 0.97,
            moves_before_turn: 3,
            color: Rgb { r: 9, g: 9, b: 9 },
        }, 0);
        g.freeze();
        g
    }

    #[test]
    fn spawned_ghost_moves_one_cell_per_tick() {
        // grid 10x4, letters at (2,1)..(5,1); spawn forced onto (2,1) heading right
        let mut rng = ScriptedRandom::new(&[
            ScriptedRandom::dir(Dir::Up),       // chaser heading
            ScriptedRandom::index(0, 4),        // letter (2,1)
            ScriptedRandom::dir(Dir::Right),    // ghost heading
        ]);
        let mut w = quiet_world(&["ABCD"], 10, 4, &mut rng);
        w.chaser = Chaser::new(9, 3, Dir::Up);
        assert_eq!(w.letters().iter().map(|l| (l.x, l.y)).collect::<Vec<_>>(),
            vec![(2, 1), (3, 1), (4, 1), (5, 1)]);

        let ev = spawn::try_spawn(&mut w, &mut rng);
        assert_eq!(ev, Some(SimEvent::GhostSpawned { x: 2, y: 1, ch: 'A' }));
        assert_eq!(w.ghosts[0].moves_before_turn, 2);

        advance(&mut w, TICK, &mut rng);
        assert_eq!((w.ghosts[0].x, w.ghosts[0].y), (3, 1));
    }

    #[test]
    fn chaser_hunts_down_a_parked_ghost() {
        let mut rng = ScriptedRandom::new(&[]);
        let mut w = quiet_world(&[], 10, 4, &mut rng);
        w.chaser = Chaser::new(0, 0, Dir::Down);
        w.ghosts.push(parked_ghost(3, 0));

        advance(&mut w, TICK, &mut rng);
        assert_eq!((w.chaser.x, w.chaser.y), (1, 0));
        assert_eq!(w.chaser.dir(), Dir::Right);

        advance(&mut w, TICK, &mut rng);
        assert_eq!(w.ghosts.len(), 1);
        let events = advance(&mut w, TICK, &mut rng);
        assert_eq!((w.chaser.x, w.chaser.y), (3, 0));
        assert!(w.ghosts.is_empty());
        assert_eq!(w.eaten_count, 1);
        assert!(events.contains(&SimEvent::GhostEaten { x: 3, y: 0, ch: 'S' }));
    }

    #[test]
    fn stacked_ghosts_are_all_eaten() {
        let mut rng = ScriptedRandom::new(&[]);
        let mut w = quiet_world(&[], 10, 4, &mut rng);
        w.chaser = Chaser::new(0, 2, Dir::Right);
        w.ghosts.push(parked_ghost(1, 2));
        w.ghosts.push(parked_ghost(1, 2));
        w.ghosts.push(parked_ghost(7, 3));

        advance(&mut w, TICK, &mut rng);
        assert_eq!(w.eaten_count, 2);
        assert_eq!(w.ghosts.len(), 1);
        assert_eq!((w.ghosts[0].x, w.ghosts[0].y), (7, 3));
    }

    #[test]
    fn chaser_waits_for_its_cadence() {
        let mut rng = ScriptedRandom::new(&[]);
        let mut w = quiet_world(&[], 10, 4, &mut rng);
        w.chaser = Chaser::new(0, 0, Dir::Right);
        w.ghosts.push(parked_ghost(5, 0));

        // interval = 50 * 0.6 = 30ms
        advance(&mut w, 20, &mut rng);
        assert_eq!(w.chaser.x, 0);
        advance(&mut w, 20, &mut rng);
        assert_eq!(w.chaser.x, 1);
    }

    #[test]
    fn slow_ghost_skips_ticks() {
        let mut rng = ScriptedRandom::new(&[]);
        let mut w = quiet_world(&[], 10, 4, &mut rng);
        w.chaser = Chaser::new(9, 3, Dir::Up);
        let mut g = parked_ghost(0, 1);
        g.frozen = false;
        g.set_dir(Dir::Right);
        g.speed = 0.5;
        g.speed_floor = 0.01;
        w.ghosts.push(g);

        advance(&mut w, TICK, &mut rng);
        assert_eq!(w.ghosts[0].x, 0); // needs 100ms
        advance(&mut w, TICK, &mut rng);
        assert_eq!(w.ghosts[0].x, 1);
    }

    #[test]
    fn chaser_wanders_without_ghosts() {
        let mut rng = ScriptedRandom::with_fallback(&[], 0.99);
        let mut w = quiet_world(&[], 10, 4, &mut rng);
        w.chaser = Chaser::new(5, 2, Dir::Left);
        advance(&mut w, TICK, &mut rng);
        assert_eq!((w.chaser.x, w.chaser.y), (4, 2));
        assert!(w.ghosts.is_empty());
    }

    #[test]
    fn long_run_invariants() {
        let mut rng = make_rng(Some(2024));
        let mut cfg = SimConfig::default();
        cfg.simulation.grid_width = 30;
        cfg.simulation.grid_height = 9;
        cfg.display.art = vec!["HELLO".into(), "WORLD".into()];
        cfg.spawn.max_ghosts = 12;
        cfg.spawn.burst_count = 6;
        let mut w = WorldState::new(cfg, &mut rng).unwrap();

        let mut eaten_seen = 0u64;
        for _ in 0..2_000 {
            let before: Vec<(usize, usize, f64, bool)> =
                w.ghosts.iter().map(|g| (g.x, g.y, g.speed, g.frozen)).collect();
            let prev_eaten = w.eaten_count;
            let events = advance(&mut w, 50, &mut rng);

            let eaten_now = events.iter().filter(|e| matches!(e, SimEvent::GhostEaten { .. })).count() as u64;
            assert_eq!(w.eaten_count - prev_eaten, eaten_now);
            eaten_seen += eaten_now;

            assert!(w.ghosts.len() <= 12);
            assert!(w.chaser.x < 30 && w.chaser.y < 9);
            for g in &w.ghosts {
                assert!(g.x < 30 && g.y < 9);
                assert!(g.vx == 0 || g.vy == 0);
                assert!(g.vx.abs() <= 1 && g.vy.abs() <= 1);
                if g.frozen {
                    assert_eq!((g.vx, g.vy), (0, 0));
                }
                assert!(!(g.x == w.chaser.x && g.y == w.chaser.y) || g.last_move_ms == w.clock_ms);
            }
            // Survivors keep their order, so the prefix comparison lines up
            // only when nothing was eaten this tick.
            if eaten_now == 0 {
                for (g, &(px, py, ps, pf)) in w.ghosts.iter().zip(before.iter()) {
                    let d = (g.x as i32 - px as i32).abs() + (g.y as i32 - py as i32).abs();
                    assert!(d <= 1);
                    assert!(g.speed <= ps);
                    if pf {
                        assert_eq!((g.x, g.y), (px, py));
                    }
                }
            }
        }
        assert_eq!(w.eaten_count, eaten_seen);
    }
}
