pub mod event;
pub mod layout;
pub mod spawn;
pub mod step;
pub mod world;
