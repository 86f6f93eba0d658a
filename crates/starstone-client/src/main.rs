mod draw;
mod keys;

use macroquad::prelude::*;
use tracing_subscriber::EnvFilter;

use starstone_core::input::InputState;
use starstone_platformer::{FrameStatus, Game, PlatformerConfig};

/// Simulation steps allowed to catch up in one rendered frame.
const MAX_STEPS_PER_FRAME: u32 = 4;

fn window_conf() -> Conf {
    let window = PlatformerConfig::load().window;
    Conf {
        window_title: window.title,
        window_width: window.width as i32,
        window_height: window.height as i32,
        window_resizable: false,
        fullscreen: window.fullscreen,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = PlatformerConfig::load();
    let step = 1.0 / config.window.target_fps.max(1) as f32;
    let mut game = match Game::with_default_levels(config) {
        Ok(game) => game,
        Err(e) => {
            tracing::error!("Failed to build levels: {e}");
            std::process::exit(1);
        },
    };
    tracing::info!("Starstone starting");

    prevent_quit();
    let mut input = InputState::new();
    let mut accumulator = 0.0;

    loop {
        if is_quit_requested() {
            tracing::info!("Window closed");
            break;
        }

        keys::poll(&mut input);
        accumulator += get_frame_time();

        // Fixed-step simulation; key edges wait in `input` until a step runs.
        let mut steps = 0;
        let mut exit = false;
        while accumulator >= step && steps < MAX_STEPS_PER_FRAME {
            exit = game.frame(&input) == FrameStatus::Exit;
            input.clear_events();
            accumulator -= step;
            steps += 1;
            if exit {
                break;
            }
        }
        if exit {
            tracing::info!("Exit requested");
            break;
        }
        if steps == MAX_STEPS_PER_FRAME {
            accumulator = 0.0;
        }

        draw::frame(&game);
        next_frame().await;
    }
}
