use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use cadence_common::{Color, NodeId, Sprite, TextureLayer};
use cadence_game::{Game, GameConfig, GameRunner};
use cadence_input::KeyCode;
use cadence_kernel::{Node, NodeKind, Renderable, SceneTree, TickContext};
use cadence_render::DebugTextRenderer;
use clap::{Parser, Subcommand};
use glam::Vec2;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cadence-cli", about = "Run and inspect cadence games headlessly")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Run the demo scene on the threaded runner and render it as text
    Run {
        /// Wall-clock seconds to run for
        #[arg(short, long, default_value = "2")]
        seconds: f64,
        /// JSON game config
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Display frames per second
        #[arg(short, long, default_value = "30")]
        fps: f64,
    },
    /// Print the demo scene tree
    Tree,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("cadence-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", cadence_common::crate_info());
            println!("hook: {}", cadence_hook::crate_info());
            println!("kernel: {}", cadence_kernel::crate_info());
            println!("render: {}", cadence_render::crate_info());
            println!("input: {}", cadence_input::crate_info());
            println!("game: {}", cadence_game::crate_info());
        }
        Commands::Run {
            seconds,
            config,
            fps,
        } => {
            anyhow::ensure!(
                seconds.is_finite() && seconds >= 0.0,
                "--seconds must be non-negative"
            );
            anyhow::ensure!(fps.is_finite() && fps > 0.0, "--fps must be positive");
            let config = match config {
                Some(path) => {
                    let loaded = GameConfig::load(&path)
                        .with_context(|| format!("loading {}", path.display()))?;
                    tracing::info!(path = %path.display(), "using config file");
                    loaded
                }
                None => GameConfig::default(),
            };
            run(config, Duration::from_secs_f64(seconds), fps)?;
        }
        Commands::Tree => {
            let mut game = Game::new(GameConfig::default())?;
            build_demo(&mut game)?;
            print_tree(game.tree())?;
        }
    }

    Ok(())
}

fn run(config: GameConfig, length: Duration, fps: f64) -> anyhow::Result<()> {
    let mut game = Game::new(config)?;
    let player = build_demo(&mut game)?;
    game.input_mut().press(KeyCode::Right);

    tracing::info!(
        framerate = game.config().max_simulation_framerate,
        seconds = length.as_secs_f64(),
        fps,
        "starting demo run"
    );
    let mut runner = GameRunner::start(game)?;
    let mut renderer = DebugTextRenderer::new();
    let frame_time = Duration::from_secs_f64(1.0 / fps);
    let begun = Instant::now();
    let mut last_frame = String::new();

    while begun.elapsed() < length && runner.is_running() {
        let frame_start = Instant::now();
        runner.render(&mut renderer)?;
        last_frame = renderer.take_output();
        std::thread::sleep(frame_time.saturating_sub(frame_start.elapsed()));
    }
    runner.stop();

    let game = runner.game();
    let game = game.lock();
    let stats = game.tick_stats();
    print!("{last_frame}");
    println!(
        "ticks={} frames={} avg_tick={:?} max_tick={:?} overruns={}",
        game.tick_count(),
        game.frame_count(),
        stats.average,
        stats.max,
        stats.overruns
    );
    if let Some(position) = game.tree().get(player).and_then(|n| n.position()) {
        println!("player at ({:.1}, {:.1})", position.x, position.y);
    }
    println!("stopped: {:?}", game.stop_reason());
    tracing::info!(
        ticks = game.tick_count(),
        frames = game.frame_count(),
        overruns = stats.overruns,
        reason = ?game.stop_reason(),
        "demo run finished"
    );
    Ok(())
}

/// A player steered by the arrow keys and a row of drifting boxes in a
/// background layer. Returns the player id.
fn build_demo(game: &mut Game) -> anyhow::Result<NodeId> {
    let main = match game.main_scene() {
        Some(scene) => scene,
        None => game.tree_mut().add_scene("Main", 0, true)?,
    };
    let left = game.input_mut().register_input_hook(&[KeyCode::Left, KeyCode::A]);
    let right = game.input_mut().register_input_hook(&[KeyCode::Right, KeyCode::D]);

    let tree = game.tree_mut();
    let player = tree.spawn_named(
        NodeKind::Renderable(
            Renderable::default()
                .with_size(Vec2::splat(32.0))
                .with_sprite(Sprite::single(TextureLayer::rectangle(Color::GREEN))),
        ),
        "Player",
        main,
    )?;
    if let Some(node) = tree.get_mut(player) {
        node.set_behavior(move |n: &mut Node, _ctx: &TickContext| {
            let mut dir = 0.0;
            if left.is_down() {
                dir -= 1.0;
            }
            if right.is_down() {
                dir += 1.0;
            }
            if let Some(spatial) = n.spatial_mut() {
                spatial.velocity.x = dir * 120.0;
            }
        });
        if let Some(r) = node.renderable_mut() {
            r.sprite.z_index = 1;
        }
    }

    let backdrop = tree.add_scene("Backdrop", -1, false)?;
    for i in 0..3 {
        let mut boxed = Renderable::at(Vec2::new(-200.0 + 200.0 * i as f32, 100.0));
        boxed.spatial.velocity = Vec2::new(0.0, -20.0);
        boxed.sprite = Sprite::single(TextureLayer::rectangle(Color::BLUE));
        tree.spawn_named(NodeKind::Renderable(boxed), &format!("Box{i}"), backdrop)?;
    }
    Ok(player)
}

fn print_tree(tree: &SceneTree) -> anyhow::Result<()> {
    let root = tree.root();
    for id in std::iter::once(root).chain(tree.descendants(root)?) {
        let depth = tree.ancestry(id)?.len();
        let Some(node) = tree.get(id) else {
            continue;
        };
        println!(
            "{}{} [{}] {}",
            "  ".repeat(depth),
            node.name(),
            node.class(),
            id
        );
    }
    println!("scenes by layer:");
    for scene in tree.scenes() {
        if let Some(data) = tree.get(scene).and_then(|n| n.scene()) {
            let name = tree.get(scene).map_or("?", |n| n.name());
            println!("  {name}: layer {}", data.layer);
        }
    }
    Ok(())
}
