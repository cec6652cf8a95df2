use anyhow::Result;
use glam::Vec2;
use log::info;

use slayer_physics::core::Size;
use slayer_physics::engine::collision::{outlined_rect, Mask, Rgba};
use slayer_physics::engine::physics::body::presets::JUMP_SPEED;
use slayer_physics::game::entity::presets;
use slayer_physics::game::Level;

/// Frame time of the demo, faster than the physics tick on purpose
const FRAME_TIME: f32 = 1.0 / 60.0;

const TILE: u32 = 32;

/// Level art: a floor along the bottom and a wall on the right
fn build_level_mask() -> Mask {
    let size = Size::new(TILE * 10, TILE * 5);
    let mut mask = Mask::filled(size, Rgba::TRANSPARENT);
    let tile = outlined_rect(Size::new(TILE, TILE), presets::ENVIRONMENT_COLORS);

    let mut place = |column: u32, row: u32| {
        for y in 0..TILE {
            for x in 0..TILE {
                if let Some(color) = tile.get(x, y) {
                    mask.set(column * TILE + x, row * TILE + y, color);
                }
            }
        }
    };

    for column in 0..10 {
        place(column, 4);
    }
    for row in 1..4 {
        place(9, row);
    }
    mask
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Slayer physics demo...");

    let mut level = Level::default();
    level.load_environment(&build_level_mask(), Size::new(TILE, TILE), presets::ENVIRONMENT_COLORS)?;
    let knight = level.spawn(presets::knight(Vec2::new(48.0, 0.0)))?;

    for frame in 0..240u32 {
        // Scripted input: walk right after landing, jump once on the way
        if let Some(body) = level.get_mut(knight).and_then(|entity| entity.body_mut()) {
            let walk = if frame >= 60 { presets::KNIGHT_WALK_SPEED } else { 0.0 };
            let jump = if (120..130).contains(&frame) { -JUMP_SPEED } else { 0.0 };
            body.movement = Vec2::new(walk, jump);
        }

        level.update(FRAME_TIME)?;

        for event in level.drain_events(knight) {
            if let Some(other) = level.entity_for_collider(event.other) {
                log::debug!(
                    "Frame {}: knight touched {} {} at {} (normal {})",
                    frame,
                    other.name,
                    other.id,
                    event.point,
                    event.normal
                );
            }
        }

        if frame % 20 == 0 {
            let position = level.position(knight).unwrap_or_default();
            if let Some(body) = level.get(knight).and_then(|entity| entity.body()) {
                info!(
                    "Frame {:3}: position {}, velocity {}, grounded {}, walled {}",
                    frame, position, body.velocity, body.grounded, body.walled
                );
            }
        }
    }

    info!("Demo finished");
    Ok(())
}
