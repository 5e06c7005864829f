use anyhow::Result;
use clap::Parser;
use outbreak_core::{init_logging, World};
use outbreak_lib::app::{App, ShutdownManager};
use outbreak_lib::headless::{run_headless, HeadlessOptions};
use outbreak_tui::Tui;
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Mode to run the simulation in
    #[arg(short, long, value_enum, default_value = "standard")]
    mode: Mode,

    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Overrides the seed from the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Ticks to run in headless mode
    #[arg(long, default_value_t = 3000)]
    ticks: u64,

    /// Simulated seconds per headless tick
    #[arg(long, default_value_t = 1.0 / 30.0)]
    dt: f64,

    /// Stream events as JSON lines in headless mode
    #[arg(long)]
    json: bool,

    /// Log level for headless mode
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum Mode {
    Standard,
    Headless,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = App::load_config(&args.config)?;
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }

    match args.mode {
        Mode::Headless => {
            // Logging goes to stderr so JSON events on stdout stay clean.
            init_logging(args.log_level);
            let mut world = World::new(config)?;
            let shutdown = ShutdownManager::new();
            shutdown.listen_for_ctrl_c();

            let options = HeadlessOptions {
                ticks: args.ticks,
                dt: args.dt,
                json_events: args.json,
            };
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let summary = run_headless(&mut world, &options, &shutdown, &mut out)?;
            if args.json {
                serde_json::to_writer(&mut out, &summary)?;
                writeln!(out)?;
            } else {
                writeln!(
                    out,
                    "{} ticks, {:.1}s: {} zombies, {} survivors, {} supplies, {} shots, {} conversions",
                    summary.ticks,
                    summary.clock,
                    summary.hud.hostiles,
                    summary.hud.survivors,
                    summary.hud.supply,
                    summary.shots,
                    summary.conversions
                )?;
            }
        }
        Mode::Standard => {
            let mut tui = Tui::new()?;
            tui.init()?;

            let mut app = App::new(config)?;
            app.config_path = args.config;

            let res = app.run(&mut tui).await;

            tui.exit()?;

            if let Err(e) = res {
                eprintln!("Application error: {e}");
            }
        }
    }

    Ok(())
}
