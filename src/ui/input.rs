/// Input state tracker.
///
/// Drains all pending terminal events once per frame and exposes:
///   - key presses seen this frame (pause, quit)
///   - the latest terminal resize, if any
///
/// Release and repeat events are ignored; every control here is one-shot.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub struct InputState {
    /// Key presses collected during the most recent `drain_events()`.
    presses: Vec<KeyEvent>,

    /// Most recent (cols, rows) from a Resize event this frame.
    resized: Option<(u16, u16)>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            presses: Vec::with_capacity(8),
            resized: None,
        }
    }

    /// Read all available events without blocking.
    pub fn drain_events(&mut self) {
        self.presses.clear();
        self.resized = None;

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => self.presses.push(key),
                Ok(Event::Resize(cols, rows)) => self.resized = Some((cols, rows)),
                _ => {}
            }
        }
    }

    /// Was any of these keys pressed this frame?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        self.presses.iter().any(|k| codes.contains(&k.code))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.presses.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    pub fn resized(&self) -> Option<(u16, u16)> {
        self.resized
    }
}
