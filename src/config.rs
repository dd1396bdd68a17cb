/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete,
/// then validates the result: a bad value refuses to start the simulation.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::domain::entity::Rgb;
use crate::error::SetupError;
use crate::sim::layout::DEFAULT_ART;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct SimConfig {
    pub simulation: SimulationConfig,
    pub spawn: SpawnConfig,
    pub ghost: GhostConfig,
    pub chaser: ChaserConfig,
    pub display: DisplayConfig,
}

#[derive(Clone, Debug)]
pub struct SimulationConfig {
    pub tick_rate_ms: u64,
    pub grid_width: usize,
    pub grid_height: usize,
    pub seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct SpawnConfig {
    pub max_ghosts: usize,
    pub spawn_chance: f64,
    pub burst_spawn_chance: f64,
    pub burst_count: usize,
    pub burst_stagger_ms: u64,
    pub burst_duration_ms: u64,
}

#[derive(Clone, Debug)]
pub struct GhostConfig {
    pub speed_min: f64,
    pub speed_max: f64,
    pub decay_min: f64,
    pub decay_max: f64,
    pub freeze_ratio: f64,   // speed floor as a fraction of the initial speed
    pub turn_min: u32,
    pub turn_max: u32,
    pub palette: Vec<Rgb>,
}

#[derive(Clone, Debug)]
pub struct ChaserConfig {
    pub glyph: char,
    pub interval_ratio: f64, // chaser cadence = tick_rate_ms * ratio
    pub wander_turn_chance: f64,
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    pub art: Vec<String>,
    pub fixed_start_x: Option<i32>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    simulation: TomlSimulation,
    #[serde(default)]
    spawn: TomlSpawn,
    #[serde(default)]
    ghost: TomlGhost,
    #[serde(default)]
    chaser: TomlChaser,
    #[serde(default)]
    display: TomlDisplay,
}

#[derive(Deserialize, Debug)]
struct TomlSimulation {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_grid_width")]
    grid_width: usize,
    #[serde(default = "default_grid_height")]
    grid_height: usize,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlSpawn {
    #[serde(default = "default_max_ghosts")]
    max_ghosts: usize,
    #[serde(default = "default_spawn_chance")]
    spawn_chance: f64,
    #[serde(default = "default_burst_spawn_chance")]
    burst_spawn_chance: f64,
    #[serde(default = "default_burst_count")]
    burst_count: usize,
    #[serde(default = "default_burst_stagger")]
    burst_stagger_ms: u64,
    #[serde(default = "default_burst_duration")]
    burst_duration_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGhost {
    #[serde(default = "default_speed_min")]
    speed_min: f64,
    #[serde(default = "default_speed_max")]
    speed_max: f64,
    #[serde(default = "default_decay_min")]
    decay_min: f64,
    #[serde(default = "default_decay_max")]
    decay_max: f64,
    #[serde(default = "default_freeze_ratio")]
    freeze_ratio: f64,
    #[serde(default = "default_turn_min")]
    turn_min: u32,
    #[serde(default = "default_turn_max")]
    turn_max: u32,
    #[serde(default = "default_palette")]
    palette: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlChaser {
    #[serde(default = "default_glyph")]
    glyph: char,
    #[serde(default = "default_interval_ratio")]
    interval_ratio: f64,
    #[serde(default = "default_wander_turn")]
    wander_turn_chance: f64,
}

#[derive(Deserialize, Debug, Default)]
struct TomlDisplay {
    #[serde(default)]
    logo_file: Option<String>,
    #[serde(default)]
    fixed_start_x: Option<i32>,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 50 }
fn default_grid_width() -> usize { 100 }
fn default_grid_height() -> usize { 21 }

fn default_max_ghosts() -> usize { 40 }
fn default_spawn_chance() -> f64 { 0.05 }
fn default_burst_spawn_chance() -> f64 { 0.3 }
fn default_burst_count() -> usize { 12 }
fn default_burst_stagger() -> u64 { 120 }
fn default_burst_duration() -> u64 { 3000 }  // 60 ticks at 50ms

fn default_speed_min() -> f64 { 0.5 }
fn default_speed_max() -> f64 { 1.0 }
fn default_decay_min() -> f64 { 0.95 }
fn default_decay_max() -> f64 { 0.99 }
fn default_freeze_ratio() -> f64 { 0.1 }
fn default_turn_min() -> u32 { 2 }
fn default_turn_max() -> u32 { 4 }
fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|c| c.to_hex()).collect()
}

fn default_glyph() -> char { '@' }
fn default_interval_ratio() -> f64 { 0.6 }
fn default_wander_turn() -> f64 { 0.08 }

const DEFAULT_PALETTE: [Rgb; 4] = [
    Rgb { r: 0xE1, g: 0x30, b: 0x8D },
    Rgb { r: 0x0F, g: 0xD3, b: 0xD3 },
    Rgb { r: 0xF0, g: 0xC6, b: 0x42 },
    Rgb { r: 0x47, g: 0x23, b: 0x94 },
];

impl Default for TomlSimulation {
    fn default() -> Self {
        TomlSimulation {
            tick_rate_ms: default_tick_rate(),
            grid_width: default_grid_width(),
            grid_height: default_grid_height(),
            seed: None,
        }
    }
}

impl Default for TomlSpawn {
    fn default() -> Self {
        TomlSpawn {
            max_ghosts: default_max_ghosts(),
            spawn_chance: default_spawn_chance(),
            burst_spawn_chance: default_burst_spawn_chance(),
            burst_count: default_burst_count(),
            burst_stagger_ms: default_burst_stagger(),
            burst_duration_ms: default_burst_duration(),
        }
    }
}

impl Default for TomlGhost {
    fn default() -> Self {
        TomlGhost {
            speed_min: default_speed_min(),
            speed_max: default_speed_max(),
            decay_min: default_decay_min(),
            decay_max: default_decay_max(),
            freeze_ratio: default_freeze_ratio(),
            turn_min: default_turn_min(),
            turn_max: default_turn_max(),
            palette: default_palette(),
        }
    }
}

impl Default for TomlChaser {
    fn default() -> Self {
        TomlChaser {
            glyph: default_glyph(),
            interval_ratio: default_interval_ratio(),
            wander_turn_chance: default_wander_turn(),
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            simulation: SimulationConfig {
                tick_rate_ms: default_tick_rate(),
                grid_width: default_grid_width(),
                grid_height: default_grid_height(),
                seed: None,
            },
            spawn: SpawnConfig {
                max_ghosts: default_max_ghosts(),
                spawn_chance: default_spawn_chance(),
                burst_spawn_chance: default_burst_spawn_chance(),
                burst_count: default_burst_count(),
                burst_stagger_ms: default_burst_stagger(),
                burst_duration_ms: default_burst_duration(),
            },
            ghost: GhostConfig {
                speed_min: default_speed_min(),
                speed_max: default_speed_max(),
                decay_min: default_decay_min(),
                decay_max: default_decay_max(),
                freeze_ratio: default_freeze_ratio(),
                turn_min: default_turn_min(),
                turn_max: default_turn_max(),
                palette: DEFAULT_PALETTE.to_vec(),
            },
            chaser: ChaserConfig {
                glyph: default_glyph(),
                interval_ratio: default_interval_ratio(),
                wander_turn_chance: default_wander_turn(),
            },
            display: DisplayConfig {
                art: DEFAULT_ART.iter().map(|l| l.to_string()).collect(),
                fixed_start_x: None,
            },
        }
    }
}

// ── Loading ──

impl SimConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults;
    /// values that are present but invalid are an error.
    pub fn load() -> Result<Self, SetupError> {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        let config = resolve(toml_cfg, &search_dirs)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject geometry and tuning values the engine cannot run with.
    pub fn validate(&self) -> Result<(), SetupError> {
        let sim = &self.simulation;
        if sim.grid_width == 0 || sim.grid_height == 0 {
            return Err(SetupError::EmptyGrid { width: sim.grid_width, height: sim.grid_height });
        }
        if sim.tick_rate_ms == 0 {
            return Err(SetupError::ZeroTickRate);
        }

        check_chance("spawn_chance", self.spawn.spawn_chance)?;
        check_chance("burst_spawn_chance", self.spawn.burst_spawn_chance)?;
        check_chance("wander_turn_chance", self.chaser.wander_turn_chance)?;

        let g = &self.ghost;
        if !(g.speed_min > 0.0 && g.speed_min <= g.speed_max) {
            return Err(SetupError::InvalidRange { name: "speed", min: g.speed_min, max: g.speed_max });
        }
        if !(g.decay_min > 0.0 && g.decay_min <= g.decay_max && g.decay_max < 1.0) {
            return Err(SetupError::InvalidDecay { min: g.decay_min, max: g.decay_max });
        }
        if g.turn_min == 0 || g.turn_min > g.turn_max {
            return Err(SetupError::InvalidRange {
                name: "turn",
                min: g.turn_min as f64,
                max: g.turn_max as f64,
            });
        }
        check_ratio("freeze_ratio", g.freeze_ratio)?;
        check_ratio("interval_ratio", self.chaser.interval_ratio)?;
        if g.palette.is_empty() {
            return Err(SetupError::EmptyPalette);
        }
        Ok(())
    }

    /// Chaser move cadence in milliseconds.
    pub fn chaser_interval_ms(&self) -> f64 {
        self.simulation.tick_rate_ms as f64 * self.chaser.interval_ratio
    }
}

fn check_chance(name: &'static str, value: f64) -> Result<(), SetupError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SetupError::InvalidChance { name, value })
    }
}

fn check_ratio(name: &'static str, value: f64) -> Result<(), SetupError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(SetupError::InvalidRatio { name, value })
    }
}

/// Turn the raw TOML schema into the runtime config (parse colours, read art).
fn resolve(t: TomlConfig, search_dirs: &[PathBuf]) -> Result<SimConfig, SetupError> {
    let palette = t.ghost.palette.iter()
        .map(|s| parse_hex_color(s))
        .collect::<Result<Vec<_>, _>>()?;

    let art = match &t.display.logo_file {
        Some(file) => load_art(&resolve_path(file, search_dirs))?,
        None => DEFAULT_ART.iter().map(|l| l.to_string()).collect(),
    };

    Ok(SimConfig {
        simulation: SimulationConfig {
            tick_rate_ms: t.simulation.tick_rate_ms,
            grid_width: t.simulation.grid_width,
            grid_height: t.simulation.grid_height,
            seed: t.simulation.seed,
        },
        spawn: SpawnConfig {
            max_ghosts: t.spawn.max_ghosts,
            spawn_chance: t.spawn.spawn_chance,
            burst_spawn_chance: t.spawn.burst_spawn_chance,
            burst_count: t.spawn.burst_count,
            burst_stagger_ms: t.spawn.burst_stagger_ms,
            burst_duration_ms: t.spawn.burst_duration_ms,
        },
        ghost: GhostConfig {
            speed_min: t.ghost.speed_min,
            speed_max: t.ghost.speed_max,
            decay_min: t.ghost.decay_min,
            decay_max: t.ghost.decay_max,
            freeze_ratio: t.ghost.freeze_ratio,
            turn_min: t.ghost.turn_min,
            turn_max: t.ghost.turn_max,
            palette,
        },
        chaser: ChaserConfig {
            glyph: t.chaser.glyph,
            interval_ratio: t.chaser.interval_ratio,
            wander_turn_chance: t.chaser.wander_turn_chance,
        },
        display: DisplayConfig {
            art,
            fixed_start_x: t.display.fixed_start_x,
        },
    })
}

/// Parse `#RRGGBB` (leading `#` optional).
pub fn parse_hex_color(s: &str) -> Result<Rgb, SetupError> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(SetupError::BadColor(s.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| SetupError::BadColor(s.to_string()))
    };
    Ok(Rgb { r: channel(0)?, g: channel(2)?, b: channel(4)? })
}

/// Read an ASCII-art logo, one grid row per line.
pub fn load_art(path: &Path) -> Result<Vec<String>, SetupError> {
    let text = std::fs::read_to_string(path).map_err(|source| SetupError::ArtRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text.lines().map(str::to_string).collect())
}

/// Relative logo paths are looked up next to config.toml first.
fn resolve_path(file: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let path = PathBuf::from(file);
    if path.is_absolute() {
        return path;
    }
    search_dirs.iter()
        .map(|d| d.join(&path))
        .find(|p| p.is_file())
        .unwrap_or(path)
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => return parse_toml(&text),
                Err(e) => warn!(path = %path.display(), error = %e, "could not read config"),
            }
        }
    }
    TomlConfig::default()
}

fn parse_toml(text: &str) -> TomlConfig {
    match toml::from_str::<TomlConfig>(text) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "config.toml parse error, using default settings");
            TomlConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let t = parse_toml("[spawn]\nmax_ghosts = 7\n[chaser]\nglyph = '#'\n");
        assert_eq!(t.spawn.max_ghosts, 7);
        assert_eq!(t.spawn.burst_count, default_burst_count());
        assert_eq!(t.chaser.glyph, '#');
        assert_eq!(t.simulation.tick_rate_ms, 50);
    }

    #[test]
    fn malformed_toml_falls_back() {
        let t = parse_toml("[simulation\ntick_rate_ms = ");
        assert_eq!(t.simulation.grid_width, default_grid_width());
    }

    #[test]
    fn resolve_parses_palette() {
        let t = parse_toml("[ghost]\npalette = [\"#102030\", \"fFfFfF\"]\n");
        let cfg = resolve(t, &[]).unwrap();
        assert_eq!(cfg.ghost.palette, vec![
            Rgb { r: 0x10, g: 0x20, b: 0x30 },
            Rgb { r: 0xFF, g: 0xFF, b: 0xFF },
        ]);
    }

    #[test]
    fn bad_colour_is_rejected() {
        assert!(matches!(parse_hex_color("#12345"), Err(SetupError::BadColor(_))));
        assert!(matches!(parse_hex_color("#GG0000"), Err(SetupError::BadColor(_))));
    }

    #[test]
    fn default_palette_roundtrips_through_hex() {
        for c in DEFAULT_PALETTE {
            assert_eq!(parse_hex_color(&c.to_hex()).unwrap(), c);
        }
    }

    #[test]
    fn zero_grid_refuses_to_start() {
        let mut cfg = SimConfig::default();
        cfg.simulation.grid_height = 0;
        assert!(matches!(cfg.validate(), Err(SetupError::EmptyGrid { width: 100, height: 0 })));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut cfg = SimConfig::default();
        cfg.spawn.spawn_chance = 1.5;
        assert!(matches!(cfg.validate(), Err(SetupError::InvalidChance { name: "spawn_chance", .. })));

        let mut cfg = SimConfig::default();
        cfg.ghost.decay_max = 1.0;
        assert!(matches!(cfg.validate(), Err(SetupError::InvalidDecay { .. })));

        let mut cfg = SimConfig::default();
        cfg.ghost.turn_min = 5;
        assert!(matches!(cfg.validate(), Err(SetupError::InvalidRange { name: "turn", .. })));

        let mut cfg = SimConfig::default();
        cfg.ghost.palette.clear();
        assert!(matches!(cfg.validate(), Err(SetupError::EmptyPalette)));
    }

    #[test]
    fn missing_logo_file_is_an_error() {
        let err = load_art(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, SetupError::ArtRead { .. }));
    }
}
