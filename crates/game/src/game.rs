use cadence_common::NodeId;
use cadence_hook::Hook;
use cadence_input::InputService;
use cadence_kernel::{RenderedEvent, ScenePass, SceneTree, TickContext, TreeError};
use cadence_render::{FrameInfo, RenderError, Renderer, collect_scene};
use glam::Vec2;
use std::time::{Duration, Instant};

use crate::config::{ConfigError, GameConfig};
use crate::timing::{TickStats, TickTimer};

const TIMER_WINDOW: usize = 120;

/// Session lifecycle. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    NotStarted,
    Running,
    Stopped,
}

/// Where the scheduler is within a simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPhase {
    Idle,
    PreSimulating,
    Integrating,
    Simulated,
}

/// Why a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    Requested,
    Error(String),
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("cannot {action} while the game is {state:?}")]
    InvalidTransition {
        state: GameState,
        action: &'static str,
    },
    #[error("game is not running ({0:?})")]
    NotRunning(GameState),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to spawn simulation thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Result of one simulation tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub delta_time: f64,
    /// Scenes in the order they were simulated.
    pub scenes: Vec<NodeId>,
    pub pass: ScenePass,
    pub elapsed: Duration,
}

/// Result of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub alpha: f32,
    pub scenes: Vec<NodeId>,
    pub entities: usize,
    pub draw_calls: usize,
}

/// Owns the scene tree and drives fixed-step simulation and interpolated rendering.
#[derive(Debug)]
pub struct Game {
    tree: SceneTree,
    config: GameConfig,
    input: InputService,
    state: GameState,
    phase: TickPhase,
    stop_reason: Option<StopReason>,
    tick_count: u64,
    frame_count: u64,
    last_tick_start: Option<Instant>,
    delta_time: f64,
    timer: TickTimer,
    pub game_started: Hook<()>,
    /// Fired after every tick with the scenes in simulation order.
    pub game_simulated: Hook<Vec<NodeId>>,
    /// Fired after every render pass with the scenes drawn.
    pub frame_rendered: Hook<Vec<NodeId>>,
    pub game_stopped: Hook<StopReason>,
}

impl Game {
    /// Build a game with an empty world, plus a "Main" scene and its "Camera"
    /// unless `config.no_template` is set. The config is validated first.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let mut tree = SceneTree::new();
        if !config.no_template {
            tree.add_scene("Main", 0, true)?;
        }
        let timer = TickTimer::new(TIMER_WINDOW, config.tick_budget());
        Ok(Self {
            tree,
            input: InputService::new(),
            state: GameState::NotStarted,
            phase: TickPhase::Idle,
            stop_reason: None,
            tick_count: 0,
            frame_count: 0,
            last_tick_start: None,
            delta_time: 0.0,
            timer,
            game_started: Hook::new(),
            game_simulated: Hook::new(),
            frame_rendered: Hook::new(),
            game_stopped: Hook::new(),
            config,
        })
    }

    /// The scene tree, rooted at the world node.
    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    /// Mutable tree access for setup between ticks.
    pub fn tree_mut(&mut self) -> &mut SceneTree {
        &mut self.tree
    }

    /// Validated configuration this game was built with.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Keyboard and mouse state fed by the host.
    pub fn input(&self) -> &InputService {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputService {
        &mut self.input
    }

    /// Current lifecycle state.
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Tick phase; `Idle` whenever a tick is not in progress.
    pub fn phase(&self) -> TickPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.state == GameState::Running
    }

    /// Why the game stopped, once it has.
    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stop_reason.as_ref()
    }

    /// Completed simulation ticks.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Completed render passes.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Seconds used by the most recent tick.
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Execution-time statistics over recent ticks.
    pub fn tick_stats(&self) -> TickStats {
        self.timer.stats()
    }

    /// The default scene, if present.
    pub fn main_scene(&self) -> Option<NodeId> {
        self.tree.get_child(self.tree.root(), "Main").ok()
    }

    /// Follow a host resize when `automatically_adjust_screen_size` is set.
    /// Returns whether the size was taken.
    pub fn resize_screen(&mut self, size: Vec2) -> bool {
        if !self.config.automatically_adjust_screen_size || size.cmple(Vec2::ZERO).any() {
            return false;
        }
        self.config.screen_size = size.to_array();
        true
    }

    /// Move from `NotStarted` to `Running` and fire `game_started`.
    pub fn start_game(&mut self) -> Result<(), GameError> {
        if self.state != GameState::NotStarted {
            return Err(GameError::InvalidTransition {
                state: self.state,
                action: "start",
            });
        }
        self.state = GameState::Running;
        tracing::info!(
            framerate = self.config.max_simulation_framerate,
            scenes = self.tree.scenes().len(),
            "game started"
        );
        self.game_started.fire(&());
        Ok(())
    }

    /// Stop the session. Returns false if it was already stopped; the stop
    /// hook fires only on the first call.
    pub fn end_game(&mut self, reason: StopReason) -> bool {
        if self.state == GameState::Stopped {
            return false;
        }
        self.state = GameState::Stopped;
        match &reason {
            StopReason::Requested => {
                tracing::info!(ticks = self.tick_count, frames = self.frame_count, "game stopped")
            }
            StopReason::Error(msg) => {
                tracing::error!(error = %msg, ticks = self.tick_count, "game stopped on error")
            }
        }
        self.stop_reason = Some(reason.clone());
        self.game_stopped.fire(&reason);
        true
    }

    /// Run one tick with `delta_time` measured from the previous tick start.
    /// The first tick uses the tick budget.
    pub fn tick(&mut self, now: Instant) -> Result<TickReport, GameError> {
        let delta_time = match self.last_tick_start {
            Some(prev) => now.saturating_duration_since(prev).as_secs_f64(),
            None => self.config.tick_budget().as_secs_f64(),
        };
        let report = self.tick_with_delta(delta_time)?;
        self.last_tick_start = Some(now);
        Ok(report)
    }

    /// Run one tick with an explicit `delta_time` in seconds.
    pub fn tick_with_delta(&mut self, delta_time: f64) -> Result<TickReport, GameError> {
        if !self.is_running() {
            return Err(GameError::NotRunning(self.state));
        }
        let tick = self.tick_count + 1;
        let _span = tracing::info_span!("tick", tick).entered();
        let started = Instant::now();
        if !(delta_time.is_finite() && delta_time >= 0.0) {
            tracing::warn!(delta_time, "unusable delta time, integration skipped");
        }

        let scenes = self.tree.scenes();
        let result = self.simulate(tick, delta_time, &scenes);
        self.phase = TickPhase::Idle;
        let pass = result?;

        self.tick_count = tick;
        self.delta_time = delta_time;
        self.game_simulated.fire(&scenes);

        let elapsed = started.elapsed();
        self.timer.record(elapsed);
        tracing::trace!(
            delta_time,
            simulated = pass.simulated,
            integrated = pass.integrated,
            ?elapsed,
            "tick complete"
        );
        Ok(TickReport {
            tick,
            delta_time,
            scenes,
            pass,
            elapsed,
        })
    }

    fn simulate(
        &mut self,
        tick: u64,
        delta_time: f64,
        scenes: &[NodeId],
    ) -> Result<ScenePass, TreeError> {
        self.phase = TickPhase::PreSimulating;
        let mut orders = Vec::with_capacity(scenes.len());
        for &scene in scenes {
            orders.push(self.tree.snapshot_scene(scene)?);
        }

        self.phase = TickPhase::Integrating;
        let mut total = ScenePass::default();
        for (&scene, order) in scenes.iter().zip(&orders) {
            let ctx = TickContext {
                tick,
                delta_time,
                simulation_speed: self.config.simulation_speed,
                scene,
            };
            total += self.tree.advance_nodes(order, &ctx);
        }
        self.phase = TickPhase::Simulated;
        Ok(total)
    }

    /// Interpolation factor for a render `since_tick` after the last tick start.
    /// Clamped to `[0, 1]` unless extrapolation is allowed.
    pub fn alpha_for(&self, since_tick: Duration) -> f32 {
        let budget = self.config.tick_budget().as_secs_f64();
        let alpha = (since_tick.as_secs_f64() / budget) as f32;
        if !alpha.is_finite() {
            return 1.0;
        }
        if self.config.allow_extrapolation {
            alpha.max(0.0)
        } else {
            alpha.clamp(0.0, 1.0)
        }
    }

    /// Alpha at wall-clock `now`. Before the first measured tick there is
    /// nothing to blend from, so the current state is shown.
    pub fn alpha_at(&self, now: Instant) -> f32 {
        match self.last_tick_start {
            Some(start) => self.alpha_for(now.saturating_duration_since(start)),
            None => 1.0,
        }
    }

    /// Render with alpha measured from the last tick start to `now`.
    pub fn render_frame(
        &mut self,
        renderer: &mut dyn Renderer,
        now: Instant,
    ) -> Result<FrameReport, GameError> {
        let alpha = self.alpha_at(now);
        self.render_with_alpha(renderer, alpha)
    }

    /// Draw every visible scene, lowest layer first. A renderer error ends the
    /// session with [`StopReason::Error`].
    pub fn render_with_alpha(
        &mut self,
        renderer: &mut dyn Renderer,
        alpha: f32,
    ) -> Result<FrameReport, GameError> {
        if !self.is_running() {
            return Err(GameError::NotRunning(self.state));
        }
        let frame = self.frame_count + 1;
        let _span = tracing::info_span!("render", frame).entered();

        match self.draw_scenes(renderer, frame, alpha) {
            Ok(report) => {
                self.frame_count = frame;
                self.frame_rendered.fire(&report.scenes);
                Ok(report)
            }
            Err(GameError::Render(err)) => {
                self.end_game(StopReason::Error(err.to_string()));
                Err(GameError::Render(err))
            }
            Err(err) => Err(err),
        }
    }

    fn draw_scenes(
        &self,
        renderer: &mut dyn Renderer,
        frame: u64,
        alpha: f32,
    ) -> Result<FrameReport, GameError> {
        let scenes: Vec<NodeId> = self
            .tree
            .scenes()
            .into_iter()
            .filter(|id| {
                self.tree
                    .get(*id)
                    .and_then(|n| n.scene())
                    .is_some_and(|s| s.visible)
            })
            .collect();

        renderer.begin_frame(&FrameInfo {
            frame,
            alpha,
            background: self.config.background_color,
            screen_size: self.config.screen_size(),
        })?;

        let mut report = FrameReport {
            frame,
            alpha,
            scenes: Vec::new(),
            entities: 0,
            draw_calls: 0,
        };
        for &scene in &scenes {
            for entity in collect_scene(&self.tree, scene, alpha)? {
                for request in &entity.requests {
                    renderer.draw(request)?;
                    report.draw_calls += 1;
                }
                report.entities += 1;
                if let Some(node) = self.tree.get(entity.node) {
                    node.rendered.fire(&RenderedEvent {
                        node: entity.node,
                        scene,
                        frame,
                        alpha,
                        position: entity.position,
                    });
                }
            }
        }
        renderer.end_frame()?;

        report.scenes = scenes;
        Ok(report)
    }
}
