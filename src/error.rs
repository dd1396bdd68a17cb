/// Construction-time failures.
///
/// Everything that can go wrong is caught before the terminal enters raw
/// mode. Once the simulation runs, every operation is total.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidChance { name: &'static str, value: f64 },

    #[error("{name} range is empty or inverted: {min}..={max}")]
    InvalidRange { name: &'static str, min: f64, max: f64 },

    #[error("velocity decay must lie in (0, 1), got {min}..={max}")]
    InvalidDecay { min: f64, max: f64 },

    #[error("{name} must be in (0, 1], got {value}")]
    InvalidRatio { name: &'static str, value: f64 },

    #[error("tick rate must be non-zero")]
    ZeroTickRate,

    #[error("ghost palette is empty")]
    EmptyPalette,

    #[error("invalid colour '{0}', expected #RRGGBB")]
    BadColor(String),

    #[error("could not read logo file {path}: {source}")]
    ArtRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
