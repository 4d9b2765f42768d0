//! Shout 2 Play entry point
//!
//! Spawns the sensor reader thread and runs the fixed-timestep game loop.
//!
//! The reader consumes line-oriented JSON from stdin (pipe the serial
//! bridge in, e.g. `serial-cat /dev/ttyACM0 115200 | shout2play`) and
//! publishes partial updates into a shared `SignalCell`. The loop takes
//! one snapshot per frame, derives the per-tick input, and steps the
//! simulation at a fixed rate with an accumulator.

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use shout2play::consts::*;
use shout2play::highscores::BestScore;
use shout2play::settings::Settings;
use shout2play::signal::{SignalCell, SignalSample, TriggerLatch, apply_line};
use shout2play::sim::{GameEvent, GameState, TickInput, tick};

const SETTINGS_PATH: &str = "settings.json";
const HIGHSCORE_PATH: &str = "highscores.json";

/// Feed stdin lines into the shared cell until EOF
fn spawn_reader(cell: SignalCell, stopped: Arc<AtomicBool>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            cell.update(|sample| {
                apply_line(sample, line);
            });
        }
        log::info!("signal stream closed");
        stopped.store(true, Ordering::Relaxed);
    })
}

/// Derive this frame's tick input from the latest sensor sample.
///
/// The shoot/pause one-shots are filled in per substep from the trigger
/// latch. The sensor can override calibration (`threshold`) and the
/// charge divider at runtime; zeros mean "not reported".
fn derive_input(sample: &SignalSample, settings: &Settings) -> TickInput {
    let calibration = if sample.threshold > 0.0 {
        sample.threshold
    } else {
        settings.calibration
    };
    let divider = if sample.divider > 0.0 {
        sample.divider
    } else {
        settings.charge_divider
    };
    TickInput {
        jump_power: ((sample.gain - calibration) / settings.gain_divisor).max(0.0),
        charge_rate: sample.frequency / divider,
        shoot: false,
        pause: false,
    }
}

fn handle_events(events: &[GameEvent], state: &GameState, best: &mut BestScore) {
    for event in events {
        match event {
            GameEvent::RunStarted => log::info!("run started (seed {})", state.seed),
            GameEvent::ShotFired => log::debug!("shot fired"),
            GameEvent::EnemyKilled => log::debug!("enemy down ({} kills)", state.kills),
            GameEvent::RunEnded { score } => {
                log::info!("run over, score {score} (best {})", best.score);
                if best.qualifies(*score) {
                    best.score = *score;
                    if let Err(err) = best.save(HIGHSCORE_PATH) {
                        log::warn!("could not save high score: {err}");
                    }
                }
            }
        }
    }
}

fn main() {
    env_logger::init();

    let settings = Settings::load(SETTINGS_PATH);
    let mut best = BestScore::load(HIGHSCORE_PATH);
    log::info!(
        "listening for sensor data ({} @ {} baud), best score {}",
        settings.serial_port,
        settings.baud_rate,
        best.score
    );

    let cell = SignalCell::new();
    let stopped = Arc::new(AtomicBool::new(false));
    let reader = spawn_reader(cell.clone(), Arc::clone(&stopped));

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let mut state = GameState::new(seed);

    let mut last_frame = Instant::now();
    let mut accumulator = 0.0f32;
    let mut latch = TriggerLatch::new();

    while !stopped.load(Ordering::Relaxed) {
        let now = Instant::now();
        // Clamp huge frame gaps so a stall doesn't fast-forward the run
        let dt = now.duration_since(last_frame).as_secs_f32().min(0.1);
        last_frame = now;
        accumulator += dt;

        let sample = cell.snapshot();
        latch.observe(&sample);
        let mut input = derive_input(&sample, &settings);

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            // One-shot triggers fire on the first substep that takes them
            input.shoot = latch.take_shoot();
            input.pause = latch.take_pause();
            let events = tick(&mut state, &input);
            handle_events(&events, &state, &mut best);
            accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Running behind; drop the backlog instead of spiraling
            accumulator = 0.0;
        }

        std::thread::sleep(Duration::from_millis(2));
    }

    if let Err(err) = reader.join() {
        log::warn!("signal reader thread panicked: {err:?}");
    }
}
