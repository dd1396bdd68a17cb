/// Chaser AI: greedy Manhattan pursuit of the nearest ghost.
///
/// Two modes:
///   1. **Pursue**: step along the axis with the larger gap to the target,
///      giving an L-shaped approach (no diagonals).
///   2. **Wander**: no ghosts alive; keep heading, occasionally pick a new
///      random direction, bounce off walls.

use super::entity::{Chaser, Dir, Ghost};
use super::motion::Bounds;
use super::random::RandomSource;

pub fn manhattan(x1: usize, y1: usize, x2: usize, y2: usize) -> usize {
    x1.abs_diff(x2) + y1.abs_diff(y2)
}

/// Index of the nearest ghost. Equidistant ghosts resolve to the lowest index.
pub fn find_target(cx: usize, cy: usize, ghosts: &[Ghost]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (i, g) in ghosts.iter().enumerate() {
        let d = manhattan(cx, cy, g.x, g.y);
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// One pursuit step from (cx, cy) toward (tx, ty).
/// Larger gap first; ties go horizontal. None when already on the target.
pub fn pursuit_dir(cx: usize, cy: usize, tx: usize, ty: usize) -> Option<Dir> {
    let dx = tx as i32 - cx as i32;
    let dy = ty as i32 - cy as i32;
    if dx == 0 && dy == 0 { return None; }

    if dx.abs() >= dy.abs() {
        Dir::from_delta(dx.signum(), 0)
    } else {
        Dir::from_delta(0, dy.signum())
    }
}

/// Heading for a chaser with nothing to chase.
pub fn wander_dir(chaser: &Chaser, bounds: Bounds, turn_chance: f64, rng: &mut dyn RandomSource) -> Option<Dir> {
    let mut dir = chaser.dir();
    if rng.chance(turn_chance) {
        dir = rng.cardinal();
    }
    if bounds.step(chaser.x, chaser.y, dir).is_some() {
        return Some(dir);
    }
    // Reflect off the wall; on a degenerate axis try the other one.
    let reflected = dir.reversed();
    if bounds.step(chaser.x, chaser.y, reflected).is_some() {
        return Some(reflected);
    }
    dir.perpendicular()
        .into_iter()
        .find(|d| bounds.step(chaser.x, chaser.y, *d).is_some())
}
