//! Gate Runner entry point
//!
//! Native builds run a headless session flown by a simple autopilot and
//! persist the best score to a JSON file. The browser build is driven from
//! `gate_runner::web` instead.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use gate_runner::persistence::JsonFileStore;
    use gate_runner::sim::{Game, GamePhase, Session, Viewport};
    use gate_runner::Tuning;

    /// 60 fps frame time
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Stop after two minutes of simulated play
    const MAX_FRAMES: u32 = 60 * 120;

    const DEFAULT_SAVE_PATH: &str = "gate_runner_best.json";

    fn seed_from_clock() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Flap when the flyer sinks below the middle of the next gap
    fn autopilot(session: &Session) -> bool {
        let flyer = &session.flyer;
        let width = session.stream.width();
        let target = session
            .stream
            .pairs
            .iter()
            .find(|p| p.x() + width >= flyer.left())
            .map(|p| p.top.height + session.stream.gap() * 0.5)
            .unwrap_or(session.viewport.height * 0.5);

        let center = flyer.pos.y + flyer.size.y * 0.5;
        center > target + flyer.size.y && flyer.velocity >= 0.0
    }

    pub fn run() {
        let seed = std::env::args()
            .nth(1)
            .and_then(|arg| arg.parse().ok())
            .unwrap_or_else(seed_from_clock);

        let tuning = std::env::var_os("GATE_RUNNER_TUNING")
            .map(|path| Tuning::load_or_default(&PathBuf::from(path)))
            .unwrap_or_default();

        let save_path = std::env::var_os("GATE_RUNNER_SAVE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_PATH));

        let viewport = Viewport::new(400.0, 600.0);
        let mut game = Game::new(JsonFileStore::new(save_path), tuning, seed);
        game.start(0.0, &viewport);

        let mut frame = 0;
        while game.phase() == GamePhase::Running && frame < MAX_FRAMES {
            frame += 1;
            let flap = game.session().map(autopilot).unwrap_or(false);
            game.tick(frame as f64 * FRAME_MS, flap);
        }

        match game.last_result() {
            Some(result) => println!(
                "Game over after {} frames: score {}, best {}{}",
                frame,
                result.score,
                result.best,
                if result.new_best { " (new best!)" } else { "" }
            ),
            None => println!(
                "Survived {} frames: score {}, best {}",
                frame,
                game.scores().current(),
                game.scores().best()
            ),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gate Runner (native, headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is gate_runner::web::wasm_main
}
