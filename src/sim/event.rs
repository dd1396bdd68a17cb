/// Events emitted during a simulation step.
/// The frame loop logs them; nothing in the step depends on them.

#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    GhostSpawned { x: usize, y: usize, ch: char },
    GhostFrozen { x: usize, y: usize, ch: char },
    GhostEaten { x: usize, y: usize, ch: char },
    BurstEnded,
}
