//! First-person tile-map viewer on the software renderer.
//!
//! Controls  W/S = forward/back A/D = strafe ←/→ = turn Esc = quit
//!
//! ```bash
//! cargo run --release -- --map maps/nexus.txt --scale 4
//! cargo run --release -- --screenshot frame.ppm
//! ```

use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::{Context, bail};
use clap::Parser;
use glam::vec2;
use hecs::World;
use minifb::{Key, Scale, Window, WindowOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tilecast::{
    renderer::{FrameBuffer, Software, draw_scene},
    sim::{InputCmd, Player, spawn_prop},
    world::{GridMap, Texture, TextureBank, uv_gradient},
};

const BUILTIN_MAP: &str = "\
################
#..............#
#..##......*...#
#..##..........#
#..........#####
#...*..........#
#..............#
#####...@......#
#..............#
#..*.....##....#
#........##..*.#
################
";

#[derive(Parser, Debug)]
#[command(version, about = "Tile-map raycaster on a software renderer")]
struct Args {
    /// ASCII map (`#`/`1`-`9` wall, `.` floor, `@` start, `*` prop);
    /// a built-in map is used when omitted
    #[arg(long)]
    map: Option<PathBuf>,

    /// Render width in pixels
    #[arg(long, default_value_t = 320)]
    width: usize,

    /// Render height in pixels
    #[arg(long, default_value_t = 200)]
    height: usize,

    /// Window scale factor (1, 2, 4 or 8)
    #[arg(long, default_value_t = 2)]
    scale: u8,

    /// Target frames per second
    #[arg(long, default_value_t = 35)]
    fps: usize,

    /// Render a single frame to this PPM file and exit
    #[arg(long)]
    screenshot: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // ─────────── load map & scene ────────────
    let map = load_map(args.map.as_deref())?;
    info!(width = map.width(), height = map.height(), props = map.props().len(), "map loaded");

    let mut bank = TextureBank::default_with_checker();
    let prop_tex = bank.insert("PROP", Texture::bake("PROP", 16, 16, &uv_gradient))?;

    let mut world = World::new();
    for &pos in map.props() {
        spawn_prop(&mut world, pos, prop_tex);
    }

    let start = map
        .player_start()
        .unwrap_or_else(|| vec2(map.width() as f32 * 0.5, map.height() as f32 * 0.5));
    let mut player = Player::new(start, 0.0);

    let mut frame = FrameBuffer::new(args.width, args.height)?;
    let mut renderer = Software::for_sink(&frame);

    // ─────────── headless: one frame to disk ────────────
    if let Some(path) = &args.screenshot {
        draw_scene(&mut renderer, &mut frame, &map, &player.pose(), &world, &bank);
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        frame.write_ppm(BufWriter::new(file))?;
        info!(path = %path.display(), "screenshot written");
        return Ok(());
    }

    // ─────────── window loop ────────────
    let mut win = Window::new(
        "tilecast — software raycaster",
        args.width,
        args.height,
        WindowOptions {
            scale: window_scale(args.scale)?,
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(args.fps);

    // benchmarking state
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();
    let mut last_tick = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let dt = last_tick.elapsed().as_secs_f32().min(0.1);
        last_tick = Instant::now();

        player.look_move(dt, read_input(&win), &map);

        let t0 = Instant::now();
        draw_scene(&mut renderer, &mut frame, &map, &player.pose(), &world, &bank);
        acc_time += t0.elapsed();
        acc_frames += 1;

        win.update_with_buffer(frame.pixels(), args.width, args.height)?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            info!("avg render: {avg_ms:.2} ms ({:.1} FPS)", 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}

fn load_map(path: Option<&Path>) -> anyhow::Result<GridMap> {
    let Some(path) = path else {
        return Ok(BUILTIN_MAP.parse()?);
    };
    let src = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    src.parse::<GridMap>()
        .with_context(|| format!("parsing map {}", path.display()))
}

fn window_scale(factor: u8) -> anyhow::Result<Scale> {
    Ok(match factor {
        1 => Scale::X1,
        2 => Scale::X2,
        4 => Scale::X4,
        8 => Scale::X8,
        other => bail!("unsupported window scale {other} (use 1, 2, 4 or 8)"),
    })
}

fn read_input(win: &Window) -> InputCmd {
    let mut cmd = InputCmd::default();

    if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
        cmd.forward += 1.0;
    }
    if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
        cmd.forward -= 1.0;
    }
    if win.is_key_down(Key::A) {
        cmd.strafe -= 1.0;
    }
    if win.is_key_down(Key::D) {
        cmd.strafe += 1.0;
    }
    // positive heading turns left
    if win.is_key_down(Key::Left) {
        cmd.turn += 1.0;
    }
    if win.is_key_down(Key::Right) {
        cmd.turn -= 1.0;
    }
    cmd
}
