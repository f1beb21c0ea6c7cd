//! NeoRacer - headless race runner
//!
//! The browser build drives the race from JavaScript through
//! `platform::web`. Natively this binary runs one scripted race (full
//! throttle from the first frame) and prints the final snapshot as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::{Parser, ValueEnum};

    use neo_racer::audio::LogSink;
    use neo_racer::settings::Settings;
    use neo_racer::sim::{
        FixedRatioOpponent, OpponentController, RaceDriver, RaceSession, SurgingOpponent,
    };
    use neo_racer::tuning::RaceConfig;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    enum OpponentKind {
        /// Constant fraction of the player's acceleration
        Fixed,
        /// Seeded throttle surges
        Surging,
    }

    #[derive(Parser, Debug)]
    #[command(name = "neo-racer")]
    #[command(about = "Run a scripted NeoRacer race and print the result", long_about = None)]
    struct Args {
        /// Race tuning JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Simulated frames per second
        #[arg(long, default_value_t = 60.0)]
        fps: f64,

        /// Opponent strategy
        #[arg(long, value_enum, default_value_t = OpponentKind::Fixed)]
        opponent: OpponentKind,

        /// Seed for the surging opponent (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this much simulated time
        #[arg(long, default_value_t = 600.0)]
        max_seconds: f64,

        /// Override the race distance (px)
        #[arg(long)]
        race_distance: Option<f64>,
    }

    fn load_config(args: &Args) -> Result<RaceConfig> {
        let mut config = match &args.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                RaceConfig::from_json(&json)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => RaceConfig::default(),
        };
        if let Some(distance) = args.race_distance {
            config.race_distance = distance;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let args = Args::parse();
        anyhow::ensure!(args.fps > 0.0, "--fps must be positive, got {}", args.fps);

        let config = load_config(&args)?;
        let opponent: Box<dyn OpponentController> = match args.opponent {
            OpponentKind::Fixed => Box::new(FixedRatioOpponent),
            OpponentKind::Surging => {
                let seed = args.seed.unwrap_or_else(rand::random::<u64>);
                log::info!("Surging opponent with seed {}", seed);
                Box::new(SurgingOpponent::new(seed, config.surge))
            }
        };

        log::info!(
            "NeoRacer (native) racing {:.0}px at {} fps",
            config.race_distance,
            args.fps
        );

        let mut driver =
            RaceDriver::with_session(RaceSession::with_opponent(config, opponent), Settings::load());
        let mut sink = LogSink;
        let frame_dt = 1.0 / args.fps;

        driver.toggle_engine();
        driver.set_accelerating(true);

        let mut now = 0.0;
        let mut snapshot = driver.frame(now, &mut sink);
        while !snapshot.return_to_garage && now < args.max_seconds {
            now += frame_dt;
            snapshot = driver.frame(now, &mut sink);
            for event in driver.drain_events() {
                log::info!("[{:7.2}s] {:?}", now, event);
            }
        }

        if !snapshot.return_to_garage {
            log::warn!("Stopped after {:.0}s without a result", args.max_seconds);
        }
        driver.leave(&mut sink);

        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
