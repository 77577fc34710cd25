//! Tilt Table headless demo
//!
//! Builds a small level in code, rolls the ball around it with a seeded random
//! tilt, logs what happens and prints a JSON summary of the run.
//!
//! Usage: `tilt-table [--verbose] [seed] [physics.json]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};
    use clap::Parser;
    use env_logger::Env;
    use glam::DVec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;
    use serde::Serialize;

    use tilt_table::PhysicsConfig;
    use tilt_table::board::{Action, BarrierMode, Boundary, BoundaryId, Decoration, Level, Zone};
    use tilt_table::consts::{LEVEL_HEIGHT, LEVEL_WIDTH};
    use tilt_table::geom::{Point, Rect};
    use tilt_table::sim::{GameEvent, Outcome, Table, TickInput, tick};

    const FRAME_MS: f64 = 16.0;
    const MAX_FRAMES: u32 = 60 * 60;
    /// Frame at which the demo rotates the screen to landscape
    const RESIZE_FRAME: u32 = 600;
    /// Largest tilt the wander reaches (m/s²)
    const MAX_TILT: f64 = 3.0;

    const GATE: BoundaryId = BoundaryId(2);

    #[derive(Parser)]
    #[command(name = "tilt-table")]
    #[command(about = "Roll a ball around a demo level with a random tilt")]
    #[command(version)]
    struct Args {
        /// Seed for the tilt wander
        #[arg(default_value_t = 42)]
        seed: u64,

        /// Physics settings (JSON), defaults for anything missing
        config: Option<PathBuf>,

        /// Log every bounce and action
        #[arg(short, long)]
        verbose: bool,
    }

    #[derive(Debug, Default, Serialize)]
    struct Summary {
        seed: u64,
        frames: u32,
        outcome: Option<Outcome>,
        /// Final ball position in level units
        ball: Point,
        bounces: u32,
        crossings: u32,
        barrier_changes: u32,
        resets: u32,
    }

    fn demo_level() -> Result<Level> {
        let mut level = Level::new(DVec2::new(LEVEL_WIDTH / 2.0, 60.0));
        level
            .push(Boundary::rect(BoundaryId(1), Rect::new(0.0, 0.0, LEVEL_WIDTH, LEVEL_HEIGHT)).reverse_winding())
            .push(Boundary::rect(GATE, Rect::new(100.0, 200.0, 120.0, 10.0)))
            .push(
                Boundary::rect(BoundaryId(3), Rect::new(20.0, 300.0, 60.0, 40.0))
                    .wall(false)
                    .drawn(false)
                    .on_cross(vec![Action::SetBarrier {
                        target: GATE,
                        mode: BarrierMode::Toggle,
                    }]),
            )
            .push(
                Boundary::disc(BoundaryId(4), DVec2::new(240.0, 330.0), 20.0)
                    .on_bounce(vec![Action::ChangeSpeed(1.2)]),
            )
            .push(
                Zone::new(DVec2::new(80.0, 150.0), 30.0, 10.0)
                    .context("hole zone")?
                    .on_fall(vec![Action::Lose("Fell into a hole".into())]),
            )
            .push(
                Zone::new(DVec2::new(160.0, 420.0), 36.0, 12.0)
                    .context("goal zone")?
                    .on_fall(vec![Action::Win("Reached the goal".into())]),
            )
            .push(Decoration {
                layout: Rect::new(130.0, 20.0, 60.0, 20.0),
                label: Some("START".into()),
            });
        Ok(level)
    }

    fn load_config(path: Option<&Path>) -> Result<PhysicsConfig> {
        let Some(path) = path else {
            return Ok(PhysicsConfig::default());
        };
        let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        PhysicsConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();

        let log_level = if args.verbose { "debug" } else { "info" };
        env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

        let seed = args.seed;
        let config = load_config(args.config.as_deref())?;

        log::info!("Tilt Table demo starting (seed {seed})");
        let mut table = Table::load(demo_level()?, DVec2::new(LEVEL_WIDTH, LEVEL_HEIGHT), config)
            .context("building the demo table")?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let mut input = TickInput {
            tilt: DVec2::new(0.0, 1.0),
        };
        let mut summary = Summary {
            seed,
            ..Default::default()
        };

        for frame in 0..MAX_FRAMES {
            if frame == RESIZE_FRAME {
                table
                    .resize(DVec2::new(LEVEL_HEIGHT * 2.0, LEVEL_WIDTH * 2.0))
                    .context("resizing the demo table")?;
            }

            let wander = DVec2::new(rng.random_range(-0.3..0.3), rng.random_range(-0.3..0.3));
            input.tilt = (input.tilt + wander).clamp(DVec2::splat(-MAX_TILT), DVec2::splat(MAX_TILT));

            let result = tick(&mut table, &input, FRAME_MS);
            summary.frames = frame + 1;
            summary.bounces += result.bounces;
            summary.resets += u32::from(result.reset);
            for event in &result.events {
                match event {
                    GameEvent::Crossed { .. } => summary.crossings += 1,
                    GameEvent::BarrierChanged { .. } => summary.barrier_changes += 1,
                    _ => {}
                }
            }

            if let Some(outcome) = result.outcome {
                log::info!("Frame {frame}: {outcome:?}");
                summary.outcome = Some(outcome);
                break;
            }
        }

        summary.ball = table
            .transform()
            .inverse_point(table.ball.pos)
            .context("mapping the ball back to level units")?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_args_defaults_and_positionals() {
            let args = Args::try_parse_from(["tilt-table"]).expect("no arguments");
            assert_eq!(args.seed, 42);
            assert!(args.config.is_none());
            assert!(!args.verbose);

            let args = Args::try_parse_from(["tilt-table", "-v", "7", "physics.json"]).expect("parsed");
            assert_eq!(args.seed, 7);
            assert_eq!(args.config, Some(PathBuf::from("physics.json")));
            assert!(args.verbose);
        }

        #[test]
        fn test_args_help_and_bad_seed() {
            let err = Args::try_parse_from(["tilt-table", "--help"]).err().expect("help exits early");
            assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);

            assert!(Args::try_parse_from(["tilt-table", "seven"]).is_err());
        }

        #[test]
        fn test_demo_level_loads() {
            let table = Table::load(
                demo_level().expect("demo level"),
                DVec2::new(LEVEL_WIDTH, LEVEL_HEIGHT),
                PhysicsConfig::default(),
            )
            .expect("valid table");
            assert_eq!(table.topology().barrier_state(GATE), Some(true));
            assert!(load_config(None).is_ok());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    demo::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host embeds the library directly on the web; there is no demo there
}
