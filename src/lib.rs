// Pixel-mask collision and platformer physics

pub mod core;
pub mod engine;
pub mod game;
