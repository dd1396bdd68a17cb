/// Compositor: merges the background grid with live entities into one frame.
///
/// Pure projection. Layer order, last wins:
///   1. logo background (copied)
///   2. ghosts, in population order
///   3. chaser glyph

use crate::domain::entity::{Chaser, Ghost, Rgb};
use crate::domain::grid::{Grid, BLANK};

/// How a frame cell should be styled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paint {
    Blank,
    Logo,
    Ghost(Rgb),
    Chaser,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameCell {
    pub ch: char,
    pub paint: Paint,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    cells: Vec<FrameCell>,
}

impl Frame {
    pub fn get(&self, x: usize, y: usize) -> FrameCell {
        self.cells[y * self.width + x]
    }

    fn set(&mut self, x: usize, y: usize, cell: FrameCell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    /// Plain-text rows, for tests and dumps.
    #[cfg(test)]
    pub fn lines(&self) -> Vec<String> {
        self.cells.chunks(self.width)
            .map(|row| row.iter().map(|c| c.ch).collect())
            .collect()
    }
}

pub fn compose(grid: &Grid, ghosts: &[Ghost], chaser: &Chaser, chaser_glyph: char) -> Frame {
    let mut frame = Frame {
        width: grid.width,
        height: grid.height,
        cells: Vec::with_capacity(grid.width * grid.height),
    };
    for row in grid.rows() {
        frame.cells.extend(row.iter().map(|&ch| FrameCell {
            ch,
            paint: if ch == BLANK { Paint::Blank } else { Paint::Logo },
        }));
    }

    for g in ghosts {
        frame.set(g.x, g.y, FrameCell { ch: g.ch, paint: Paint::Ghost(g.color) });
    }
    frame.set(chaser.x, chaser.y, FrameCell { ch: chaser_glyph, paint: Paint::Chaser });
    frame
}
