// Engine modules: collision detection, fixed timestep, physics

pub mod collision;
pub mod game_loop;
pub mod physics;
