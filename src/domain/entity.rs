/// Entities: Ghost (letters escaping the logo) and Chaser (the eater).
/// Movement is cardinal only: at most one velocity axis is non-zero.

/// Display colour carried by each ghost.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Cardinal direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    /// Inverse of `delta`; None for (0, 0) and diagonals.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Dir> {
        match (dx, dy) {
            (0, -1) => Some(Dir::Up),
            (0, 1) => Some(Dir::Down),
            (-1, 0) => Some(Dir::Left),
            (1, 0) => Some(Dir::Right),
            _ => None,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Dir::Left | Dir::Right)
    }

    pub fn reversed(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    /// The two directions on the other axis.
    pub fn perpendicular(self) -> [Dir; 2] {
        if self.is_horizontal() {
            [Dir::Up, Dir::Down]
        } else {
            [Dir::Left, Dir::Right]
        }
    }
}

#[derive(Clone, Debug)]
pub struct Ghost {
    pub x: usize,
    pub y: usize,
    pub ch: char,
    pub vx: i32,
    pub vy: i32,
    pub speed: f64,          // cadence multiplier, decays every move
    pub speed_floor: f64,    // below this the ghost freezes for good
    pub velocity_decay: f64,
    pub last_move_ms: u64,
    pub moves_since_turn: u32,
    pub moves_before_turn: u32,
    pub color: Rgb,
    pub frozen: bool,
}

/// Everything a spawn needs besides the source cell.
#[derive(Clone, Copy, Debug)]
pub struct GhostSeed {
    pub dir: Dir,
    pub speed: f64,
    pub freeze_ratio: f64,
    pub velocity_decay: f64,
    pub moves_before_turn: u32,
    pub color: Rgb,
}

impl Ghost {
    pub fn new(x: usize, y: usize, ch: char, seed: GhostSeed, now_ms: u64) -> Self {
        let (vx, vy) = seed.dir.delta();
        Ghost {
            x, y, ch, vx, vy,
            speed: seed.speed,
            speed_floor: seed.speed * seed.freeze_ratio,
            velocity_decay: seed.velocity_decay,
            last_move_ms: now_ms,
            moves_since_turn: 0,
            moves_before_turn: seed.moves_before_turn,
            color: seed.color,
            frozen: false,
        }
    }

    /// Current heading, None once frozen.
    pub fn dir(&self) -> Option<Dir> {
        Dir::from_delta(self.vx, self.vy)
    }

    pub fn set_dir(&mut self, dir: Dir) {
        let (vx, vy) = dir.delta();
        self.vx = vx;
        self.vy = vy;
    }

    /// Terminal state: zero velocity, no further decay.
    pub fn freeze(&mut self) {
        self.vx = 0;
        self.vy = 0;
        self.frozen = true;
    }
}

#[derive(Clone, Debug)]
pub struct Chaser {
    pub x: usize,
    pub y: usize,
    pub vx: i32,
    pub vy: i32,
    pub last_move_ms: u64,
}

impl Chaser {
    pub fn new(x: usize, y: usize, dir: Dir) -> Self {
        let (vx, vy) = dir.delta();
        Chaser { x, y, vx, vy, last_move_ms: 0 }
    }

    /// Heading; a chaser always has one, Right if somehow unset.
    pub fn dir(&self) -> Dir {
        Dir::from_delta(self.vx, self.vy).unwrap_or(Dir::Right)
    }

    pub fn set_dir(&mut self, dir: Dir) {
        let (vx, vy) = dir.delta();
        self.vx = vx;
        self.vy = vy;
    }
}
