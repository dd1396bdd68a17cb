pub mod compositor;
pub mod input;
pub mod renderer;
