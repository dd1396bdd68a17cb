/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Compose the simulation into a `Frame` (pure, see `compositor`)
///   2. Paint HUD + frame into the `front` buffer
///   3. Compare each cell with `back` buffer (previous frame)
///   4. Only emit terminal commands for cells that changed, batched with `queue!`
///   5. Swap front/back
///
/// The simulation ticks slower than this redraws, so most frames only touch
/// the handful of cells that ghosts and the chaser moved through.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::sim::world::WorldState;
use super::compositor::{self, Frame, Paint};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
    bold: bool,
}

impl Cell {
    /// Explicit background for every cell, never terminal-default, so the
    /// inter-row gaps match the cells.
    const BASE_BG: Color = Color::Rgb { r: 0x1D, g: 0x02, b: 0x45 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG, bold: false };

    /// Sentinel cell used to invalidate the back buffer.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta, bold: false };

    fn new(ch: char, fg: Color, bg: Color, bold: bool) -> Self {
        Cell { ch, fg, bg, bold }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color, bold: bool) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg, bold));
        }
    }
}

// ── Renderer ──

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 1;

const HUD_BG: Color = Color::Rgb { r: 0x47, g: 0x23, b: 0x94 };
const LOGO_FG: Color = Color::Rgb { r: 0xFF, g: 0xFB, b: 0xEB };
const CHASER_FG: Color = Color::Rgb { r: 0xFF, g: 0xE0, b: 0x20 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize_buffers(tw as usize, th as usize);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            SetAttribute(Attribute::Reset),
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Terminal columns as of the last `init`/`render`.
    pub fn term_cols(&self) -> usize {
        self.term_w
    }

    fn resize_buffers(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        // Force full repaint: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize_buffers(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        let frame = compositor::compose(
            world.grid(),
            &world.ghosts,
            &world.chaser,
            world.config().chaser.glyph,
        );

        self.front.clear();
        self.compose_hud(world);
        self.compose_frame(&frame);
        if world.paused {
            self.compose_pause_overlay(&frame);
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut last_bold = false;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer,
            SetAttribute(Attribute::NormalIntensity),
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.bold != last_bold {
                    let attr = if cell.bold { Attribute::Bold } else { Attribute::NormalIntensity };
                    queue!(self.writer, SetAttribute(attr))?;
                    last_bold = cell.bold;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_hud(&mut self, w: &WorldState) {
        let cfg = w.config();
        let burst = if w.is_initial_burst_period() { "  BURST" } else { "" };
        let hud = format!(
            " eaten:{:<5} ghosts:{:>2}/{:<2}{}   p:pause  q:quit ",
            w.eaten_count, w.ghosts.len(), cfg.spawn.max_ghosts, burst,
        );
        for x in 0..self.front.width {
            self.front.set(x, HUD_ROW, Cell::new(' ', Color::White, HUD_BG, false));
        }
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG, false);
    }

    fn compose_frame(&mut self, frame: &Frame) {
        for y in 0..frame.height {
            let row = MAP_ROW + y;
            if row >= self.front.height { break; }
            for x in 0..frame.width.min(self.front.width) {
                let fc = frame.get(x, y);
                let cell = match fc.paint {
                    Paint::Blank => Cell::BLANK,
                    Paint::Logo => Cell::new(fc.ch, LOGO_FG, Cell::BASE_BG, true),
                    Paint::Ghost(c) => Cell::new(fc.ch, Color::Rgb { r: c.r, g: c.g, b: c.b }, Cell::BASE_BG, false),
                    Paint::Chaser => Cell::new(fc.ch, CHASER_FG, Cell::BASE_BG, true),
                };
                self.front.set(x, row, cell);
            }
        }
    }

    fn compose_pause_overlay(&mut self, frame: &Frame) {
        let label = "  PAUSED  [p] resume  ";
        let view_w = frame.width.min(self.front.width);
        let x = view_w.saturating_sub(label.chars().count()) / 2;
        let y = MAP_ROW + frame.height.min(self.front.height.saturating_sub(MAP_ROW)) / 2;
        self.front.put_str(x, y, label, Color::Black, CHASER_FG, true);
    }
}
