// What you SEE:
// • A black window. Click anywhere: a white/red/yellow burst of sparks flies out
//   and fades to black.
// • Each click keeps the animation going for another `tick_budget` frames. ESC quits.
// • With --headless there is no window: one burst at the centre, N ticks, optional PNG.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use particle_burst::{Config, Drawer, FrameBuffer, Simulation};

#[derive(Parser, Debug)]
#[command(name = "particle-burst", version, about = "Click to set off particle explosions")]
struct Cli {
    /// TOML config file (screen size, pool size, burst layers, ...)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fixed RNG seed, overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// Run without a window
    #[arg(long)]
    headless: bool,

    /// Ticks to simulate in headless mode
    #[arg(long, default_value_t = 120)]
    ticks: u32,

    /// Save the last headless frame to this image file
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// More logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // -v / -q override RUST_LOG; without them RUST_LOG (or "warn") decides.
    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = log_level(cli.verbose, cli.quiet) {
        logger.filter_level(level);
    }
    logger.init();

    let mut config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    if cli.seed.is_some() {
        config.particles.seed = cli.seed;
    }

    let mut sim = Simulation::from_config(&config)?;
    if cli.headless {
        run_headless(&mut sim, &config, cli.ticks, cli.snapshot)
    } else {
        run_window(&mut sim, &config)
    }
}

fn log_level(verbose: u8, quiet: bool) -> Option<log::LevelFilter> {
    match (verbose, quiet) {
        (0, false) => None,
        (0, true) => Some(log::LevelFilter::Error),
        (1, _) => Some(log::LevelFilter::Info),
        (2, _) => Some(log::LevelFilter::Debug),
        _ => Some(log::LevelFilter::Trace),
    }
}

fn run_window(sim: &mut Simulation, config: &Config) -> Result<()> {
    let (w, h) = (config.screen.width, config.screen.height);
    let mut drawer = Drawer::new("Particle Burst - click to explode", w, h, config.target_fps)?;

    /* --- Reusable window buffer ---
       Visual: this is the image you actually see each frame. */
    let mut frame = FrameBuffer::new(w, h);
    sim.tick()?; // paint the cleared screen once so the window is not garbage

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        // 1) Input: a click sets off every configured layer at the cursor.
        if let Some((mx, my)) = drawer.mouse_clicked() {
            sim.explode(mx, my, &config.bursts);
        }

        // 2) Simulate only while there is budget left; otherwise the last frame stays up.
        if sim.is_running() {
            sim.tick()?;
        }

        // 3) Present (surface -> window buffer -> window).
        sim.present(&mut frame)?;
        drawer.present(&frame)?;
    }

    info!("window closed after {} ticks", sim.ticks());
    Ok(())
}

fn run_headless(sim: &mut Simulation, config: &Config, ticks: u32, snapshot: Option<PathBuf>) -> Result<()> {
    let cx = config.screen.width as f32 / 2.0;
    let cy = config.screen.height as f32 / 2.0;
    let spawned = sim.explode(cx, cy, &config.bursts);
    info!("spawned {spawned} particles at ({cx}, {cy})");

    for _ in 0..ticks {
        if !sim.is_running() {
            break;
        }
        sim.tick()?;
    }
    info!("{} ticks, {} particles still alive", sim.ticks(), sim.particles().len());

    if let Some(path) = snapshot {
        sim.screen().save(&path).with_context(|| format!("saving {}", path.display()))?;
        info!("wrote {}", path.display());
    }
    Ok(())
}
