use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Instant;

use cadence_render::Renderer;

use crate::game::{FrameReport, Game, GameError, StopReason};

struct Signal {
    running: AtomicBool,
    lock: Mutex<()>,
    wake: Condvar,
}

/// Runs a [`Game`]'s simulation loop on its own thread.
///
/// Ticks and render passes are serialized by one mutex around the game. The
/// loop waits out the rest of each tick budget, and [`GameRunner::stop`]
/// interrupts that wait.
pub struct GameRunner {
    game: Arc<Mutex<Game>>,
    signal: Arc<Signal>,
    thread: Option<JoinHandle<()>>,
}

impl GameRunner {
    /// Start `game` and spawn the simulation thread.
    pub fn start(mut game: Game) -> Result<Self, GameError> {
        game.start_game()?;
        let game = Arc::new(Mutex::new(game));
        let signal = Arc::new(Signal {
            running: AtomicBool::new(true),
            lock: Mutex::new(()),
            wake: Condvar::new(),
        });

        let thread = std::thread::Builder::new()
            .name("cadence-sim".into())
            .spawn({
                let game = Arc::clone(&game);
                let signal = Arc::clone(&signal);
                move || simulation_loop(&game, &signal)
            })
            .map_err(GameError::Spawn)?;

        Ok(Self {
            game,
            signal,
            thread: Some(thread),
        })
    }

    /// False once the loop has been told to stop or has ended on its own.
    pub fn is_running(&self) -> bool {
        self.signal.running.load(Ordering::Acquire)
    }

    /// Shared handle to the game. Lock it to inspect or mutate between ticks.
    pub fn game(&self) -> Arc<Mutex<Game>> {
        Arc::clone(&self.game)
    }

    /// Render one frame against the most recently completed tick.
    pub fn render(&self, renderer: &mut dyn Renderer) -> Result<FrameReport, GameError> {
        let result = self.game.lock().render_frame(renderer, Instant::now());
        if result.is_err() {
            self.halt();
        }
        result
    }

    /// Stop the loop, end the game, and join the simulation thread.
    pub fn stop(&mut self) {
        self.halt();
        self.game.lock().end_game(StopReason::Requested);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("simulation thread panicked");
            }
        }
    }

    fn halt(&self) {
        let _guard = self.signal.lock.lock();
        self.signal.running.store(false, Ordering::Release);
        self.signal.wake.notify_all();
    }
}

impl Drop for GameRunner {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.stop();
        }
    }
}

fn simulation_loop(game: &Mutex<Game>, signal: &Signal) {
    tracing::debug!("simulation loop started");
    while signal.running.load(Ordering::Acquire) {
        let started = Instant::now();
        let budget = {
            let mut game = game.lock();
            if let Err(e) = game.tick(started) {
                tracing::debug!(error = %e, "simulation loop ending");
                break;
            }
            game.config().tick_budget()
        };

        let remaining = budget.saturating_sub(started.elapsed());
        if remaining.is_zero() {
            continue;
        }
        let mut guard = signal.lock.lock();
        if signal.running.load(Ordering::Acquire) {
            signal.wake.wait_for(&mut guard, remaining);
        }
    }
    signal.running.store(false, Ordering::Release);
    tracing::debug!("simulation loop stopped");
}
