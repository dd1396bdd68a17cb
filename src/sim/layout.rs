/// Layout adapter: owns the logo art, its horizontal placement, and the grid
/// and letter table derived from them.
///
/// The grid is wider than the logo; `start_x` centers the logo inside the
/// part of the grid the terminal can actually show, so a narrow terminal
/// still sees the whole logo. Offsets are clamped so the art never hangs
/// off the grid. A fixed offset (config `fixed_start_x`) is clamped the same way and
/// disables re-fitting.

use crate::domain::grid::{self, Grid, LetterPosition};
use crate::error::SetupError;

/// Built-in logo.
pub const DEFAULT_ART: [&str; 7] = [
    "XMMMMMMMMKo,    XMMMMMMMMMMM0   XMM      MMc    .dMMMMMMMb.      dMMMMMMMM0. ",
    "XMM;     XMW    XMMl            XMMM    MMMc   .0MM     MM0;.   KMM         ",
    "xMM;      MMc   XMMl            XMM WMMM MMc   o0M       MM0o   KMM         ",
    "XMM;      MMC   XMMMMMMMMM0     XMM  WW  MMc   W0Ml      .M0W    dMMMMMMMb.  ",
    "XMM;      MMc   XMMl            XMM      MMc   o0M;      ;M0o            MM0",
    "XMM;     oMd    XMMl            XMM      MMc   .0MM      MM0.            MM0",
    "XMMMMMMMMKP'    XMMMMMMMMMMM0   XMM      MMc    ';MMMMMMM:'     .0MMMMMMMm' ",
];

pub struct LogoLayout {
    art: Vec<String>,
    art_width: usize,
    fixed_start_x: Option<i32>,
    start_x: i32,
    grid: Grid,
    letters: Vec<LetterPosition>,
}

impl LogoLayout {
    /// Build the initial layout as if the whole grid were visible.
    pub fn new(art: Vec<String>, width: usize, height: usize, fixed_start_x: Option<i32>) -> Result<Self, SetupError> {
        let art_width = grid::art_width(&art);
        let fixed_start_x = fixed_start_x.map(|x| clamp_start_x(x, width, art_width));
        let start_x = fixed_start_x.unwrap_or_else(|| centered_start_x(width, width, art_width));
        let grid = Grid::build(&art, start_x, width, height)?;
        let letters = grid::extract_letter_positions(&grid);
        Ok(LogoLayout { art, art_width, fixed_start_x, start_x, grid, letters })
    }

    /// React to the measured surface width (terminal columns).
    /// Rebuilds grid + letters only when the offset actually changes.
    pub fn fit(&mut self, surface_cols: usize) -> bool {
        if self.fixed_start_x.is_some() { return false; }
        let next = centered_start_x(surface_cols, self.grid.width, self.art_width);
        if next == self.start_x { return false; }
        self.rebuild(next);
        true
    }

    fn rebuild(&mut self, start_x: i32) {
        self.start_x = start_x;
        // Dimensions are unchanged and were validated at construction.
        if let Ok(grid) = Grid::build(&self.art, start_x, self.grid.width, self.grid.height) {
            self.letters = grid::extract_letter_positions(&grid);
            self.grid = grid;
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn letters(&self) -> &[LetterPosition] {
        &self.letters
    }

    pub fn start_x(&self) -> i32 {
        self.start_x
    }
}

/// Pull a configured offset back so the whole art stays on the grid.
pub fn clamp_start_x(start_x: i32, grid_width: usize, art_width: usize) -> i32 {
    let max_start = grid_width.saturating_sub(art_width).min(i32::MAX as usize) as i32;
    start_x.clamp(0, max_start)
}

/// Center `art_width` columns inside the visible part of a `grid_width` grid.
pub fn centered_start_x(surface_cols: usize, grid_width: usize, art_width: usize) -> i32 {
    let visible = surface_cols.min(grid_width);
    let max_start = grid_width.saturating_sub(art_width);
    (visible.saturating_sub(art_width) / 2).min(max_start) as i32
}
