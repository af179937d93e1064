//! Marble Rush entry point
//!
//! The browser build is driven from JS through `marble_rush::web`. Natively
//! this plays a scripted headless run of a level and reports what happened.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Marble Rush (native) starting...");

    let mut args = std::env::args().skip(1);
    let level_path = args.next();
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    headless::run(level_path.as_deref(), seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is marble_rush::web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::collections::BTreeMap;

    use marble_rush::sim::{Level, SimPhase, TickInput};
    use marble_rush::{BestTimes, Game, MemoryStore, Tuning, format_time};

    const FRAME_DT: f32 = 1.0 / 60.0;
    const MAX_SECONDS: u32 = 180;

    pub fn run(level_path: Option<&str>, seed: u64) {
        let level = match level_path {
            Some(path) => match load_level(path) {
                Some(level) => level,
                None => return,
            },
            None => Level::demo(),
        };

        let mut store = MemoryStore::default();
        let mut game = Game::new(
            level,
            Tuning::load_from(&store),
            BestTimes::load_from(&store),
            seed,
        );

        let mut counts: BTreeMap<&'static str, u32> = BTreeMap::new();
        for frame in 0..MAX_SECONDS * 60 {
            game.input = script(frame);
            for event in game.update(FRAME_DT) {
                log::debug!("{:?}", event);
                *counts.entry(event.name()).or_default() += 1;
            }
            if game.state.phase == SimPhase::Finished {
                break;
            }
        }

        println!("\nEvents:");
        for (name, count) in &counts {
            println!("  {:<22} {}", name, count);
        }

        match game.state.goal_report() {
            Some((elapsed_ms, gems)) => {
                println!(
                    "✓ Finished '{}' in {} with {} gems",
                    game.state.level.id,
                    format_time(elapsed_ms),
                    gems
                );
                if game.new_record {
                    game.best_times.save_to(&mut store);
                }
                println!("  Best: {}", format_time(game.best_time()));
            }
            None => {
                let pos = game.state.marble.pos;
                println!(
                    "✗ Gave up after {} at ({:.0}, {:.0})",
                    format_time(game.state.clock_ms),
                    pos.x,
                    pos.y
                );
            }
        }
    }

    fn load_level(path: &str) -> Option<Level> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                log::error!("Could not read level {}: {}", path, err);
                return None;
            }
        };
        match Level::from_json(&json) {
            Ok(level) => Some(level),
            Err(err) => {
                log::error!("Invalid level {}: {}", path, err);
                None
            }
        }
    }

    /// Roll right for two seconds, then charge a jump, on repeat
    fn script(frame: u32) -> TickInput {
        let t = frame % 180;
        TickInput {
            left: false,
            right: t < 120 || t >= 150,
            jump: (123..147).contains(&t),
        }
    }
}
