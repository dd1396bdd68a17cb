/// Ghost spawning.
///
/// Three triggers, checked once per tick after collisions:
///   1. Burst: the first `burst_count` ghosts, one every `burst_stagger_ms`
///   2. Guarantee: population is zero → always try
///   3. Chance: `burst_spawn_chance` inside the burst window,
///      `spawn_chance` after it
///
/// Any attempt is a silent no-op when the letter table is empty or the
/// population is at the cap.

use crate::domain::entity::{Ghost, GhostSeed};
use crate::domain::random::RandomSource;
use super::event::SimEvent;
use super::world::WorldState;

/// Try to add one ghost at a random letter.
pub fn try_spawn(world: &mut WorldState, rng: &mut dyn RandomSource) -> Option<SimEvent> {
    if world.letters().is_empty() || world.population_full() {
        return None;
    }

    let letter = world.letters()[rng.pick(world.letters().len())];
    let cfg = &world.config().ghost;
    let seed = GhostSeed {
        dir: rng.cardinal(),
        color: cfg.palette[rng.pick(cfg.palette.len())],
        speed: rng.between(cfg.speed_min, cfg.speed_max),
        freeze_ratio: cfg.freeze_ratio,
        velocity_decay: rng.between(cfg.decay_min, cfg.decay_max),
        moves_before_turn: rng.between_u32(cfg.turn_min, cfg.turn_max),
    };

    let ghost = Ghost::new(letter.x, letter.y, letter.ch, seed, world.clock_ms);
    world.ghosts.push(ghost);
    Some(SimEvent::GhostSpawned { x: letter.x, y: letter.y, ch: letter.ch })
}

pub fn resolve_spawning(world: &mut WorldState, rng: &mut dyn RandomSource, events: &mut Vec<SimEvent>) {
    let spawn_cfg = world.config().spawn.clone();

    // Staggered opening burst. Attempts count even when they no-op so the
    // burst always finishes.
    while world.burst_spawned < spawn_cfg.burst_count
        && world.clock_ms >= world.burst_spawned as u64 * spawn_cfg.burst_stagger_ms
    {
        world.burst_spawned += 1;
        events.extend(try_spawn(world, rng));
    }

    if world.ghosts.is_empty() {
        events.extend(try_spawn(world, rng));
    } else {
        let p = if world.is_initial_burst_period() {
            spawn_cfg.burst_spawn_chance
        } else {
            spawn_cfg.spawn_chance
        };
        if rng.chance(p) {
            events.extend(try_spawn(world, rng));
        }
    }

    if !world.burst_ended && !world.is_initial_burst_period() {
        world.burst_ended = true;
        events.push(SimEvent::BurstEnded);
    }
}
