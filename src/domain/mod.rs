pub mod ai;
pub mod entity;
pub mod grid;
pub mod motion;
pub mod random;
