//! Brick Breaker entry point
//!
//! Browser builds start from `wasm_main`; native builds run the headless
//! autopilot and print a summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    brick_breaker::platform::web::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod native_cli {
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;

    use brick_breaker::config::{GameConfig, Preset};
    use brick_breaker::host::LogHost;
    use brick_breaker::platform::native::run_headless;
    use brick_breaker::sim::GameplayController;

    /// Headless brick breaker: the autopilot plays and the log narrates
    #[derive(Parser, Debug)]
    #[command(name = "brick-breaker", version, about)]
    pub struct Args {
        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// classic, arcade or shrinking (applied on top of --config)
        #[arg(long)]
        preset: Option<String>,

        /// RNG seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Simulated seconds to play
        #[arg(long, default_value_t = 60.0)]
        seconds: f32,

        /// Print the effective config as JSON and exit
        #[arg(long)]
        print_config: bool,
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();

        let mut config = match &args.config {
            Some(path) => GameConfig::load_from_path(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => GameConfig::default(),
        };
        if let Some(name) = &args.preset {
            let Some(preset) = Preset::from_str(name) else {
                bail!("unknown preset '{}'", name);
            };
            config.apply_preset(preset);
        }

        if args.print_config {
            println!("{}", config.to_json()?);
            return Ok(());
        }

        let mut ctrl = GameplayController::try_new(config, args.seed)?;
        let mut host = LogHost::default();
        log::info!("Playing {}s with seed {}", args.seconds, args.seed);

        let summary = run_headless(&mut ctrl, args.seconds, &mut host);

        println!("ticks:          {}", summary.ticks);
        println!("games finished: {}", summary.games_finished);
        println!("wins:           {}", summary.wins);
        println!("best score:     {}", summary.best_score);
        println!("final phase:    {:?}", summary.final_phase);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Brick Breaker (native) starting...");
    native_cli::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
