/// Ghost motion rules: zigzag turns, wall deflection, velocity decay.
///
/// Processing order for one eligible move:
///   1. Zigzag countdown elapsed → turn onto the perpendicular axis
///   2. Candidate cell off-grid → deflect onto the perpendicular axis
///   3. Step exactly one cell
///   4. Decay speed; freeze once under the floor
///
/// Both turn kinds reset the zigzag countdown.

use super::entity::{Dir, Ghost};
use super::random::RandomSource;

/// Grid extent for motion queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub width: usize,
    pub height: usize,
}

impl Bounds {
    /// Cell one step from (x, y), or None if that leaves the grid.
    pub fn step(&self, x: usize, y: usize, dir: Dir) -> Option<(usize, usize)> {
        let (dx, dy) = dir.delta();
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        if nx < 0 || ny < 0 || nx as usize >= self.width || ny as usize >= self.height {
            None
        } else {
            Some((nx as usize, ny as usize))
        }
    }

    pub fn center(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }
}

/// Inclusive range the zigzag countdown is drawn from.
#[derive(Clone, Copy, Debug)]
pub struct TurnRange {
    pub min: u32,
    pub max: u32,
}

/// Result of `move_ghost`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// Moved, and the decay pushed speed under the floor.
    Froze,
    /// No legal cell (1×1 grid) or already frozen.
    Stuck,
}

/// Advance one ghost by one cell. Caller has already checked cadence.
pub fn move_ghost(
    g: &mut Ghost,
    bounds: Bounds,
    turns: TurnRange,
    rng: &mut dyn RandomSource,
) -> MoveOutcome {
    if g.frozen { return MoveOutcome::Stuck; }
    let Some(mut dir) = g.dir() else {
        g.freeze();
        return MoveOutcome::Stuck;
    };

    // Zigzag
    if g.moves_since_turn >= g.moves_before_turn {
        let options = dir.perpendicular();
        dir = options[rng.pick(2)];
        reset_countdown(g, turns, rng);
    }

    // Wall
    if bounds.step(g.x, g.y, dir).is_none() {
        match deflect(g.x, g.y, dir, bounds, rng) {
            Some(d) => dir = d,
            None => {
                g.set_dir(dir.reversed());
                return MoveOutcome::Stuck;
            }
        }
        reset_countdown(g, turns, rng);
    }

    g.set_dir(dir);
    if let Some((nx, ny)) = bounds.step(g.x, g.y, dir) {
        g.x = nx;
        g.y = ny;
    }
    g.moves_since_turn += 1;

    // Decay
    g.speed *= g.velocity_decay;
    if g.speed < g.speed_floor {
        g.freeze();
        MoveOutcome::Froze
    } else {
        MoveOutcome::Moved
    }
}

/// Direction after hitting a wall while heading `dir`: a random side of the
/// perpendicular axis, the other side if that is also blocked, and the
/// reflection when the perpendicular axis has no room at all.
pub fn deflect(x: usize, y: usize, dir: Dir, bounds: Bounds, rng: &mut dyn RandomSource) -> Option<Dir> {
    let options = dir.perpendicular();
    let first = rng.pick(2);
    [options[first], options[1 - first], dir.reversed()]
        .into_iter()
        .find(|d| bounds.step(x, y, *d).is_some())
}

fn reset_countdown(g: &mut Ghost, turns: TurnRange, rng: &mut dyn RandomSource) {
    g.moves_since_turn = 0;
    g.moves_before_turn = rng.between_u32(turns.min, turns.max);
}
