use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use framedump_common::{FrameId, Point};
use framedump_geometry::{detect_overlaps, LogObserver, PointTransformer};
use framedump_scales::{classify_domain, generate_ticks};
use log::info;
use serde::Serialize;

mod scene;

use scene::SceneConfig;

/// Inspect frames and dump points between them
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a JSON array of points into a plotting mode and domain
    Classify {
        /// Path to a JSON file holding an array of points
        file_path: PathBuf,
    },

    /// Print evenly spaced tick values for an axis
    Ticks {
        #[arg(long, allow_negative_numbers = true)]
        min: f64,

        #[arg(long, allow_negative_numbers = true)]
        max: f64,

        /// Number of intervals between ticks
        #[arg(short, long, default_value_t = 5)]
        intervals: usize,
    },

    /// List the frames beneath a frame that overlap it
    Overlaps {
        /// Path to the scene file (.json)
        scene: PathBuf,

        /// Id of the frame to test
        #[arg(short, long)]
        frame: String,
    },

    /// Transform the points of one frame into another frame
    Dump {
        /// Path to the scene file (.json)
        scene: PathBuf,

        /// Id of the frame the points come from
        #[arg(long)]
        from: String,

        /// Id of the frame receiving the points
        #[arg(long)]
        to: String,

        /// Log the intermediate values of the first N points at trace level
        #[arg(long)]
        trace: Option<usize>,

        /// Transform the points on the rayon thread pool
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify { file_path } => {
            let content = fs::read_to_string(&file_path)
                .with_context(|| format!("Failed to read {}", file_path.display()))?;
            let points: Vec<Point> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse points in {}", file_path.display()))?;
            let finite: Vec<Point> = points.into_iter().filter(Point::is_finite).collect();
            print_json(&classify_domain(&finite))
        }
        Commands::Ticks {
            min,
            max,
            intervals,
        } => print_json(&generate_ticks(min, max, intervals)),
        Commands::Overlaps { scene, frame } => {
            let scene = SceneConfig::from_path(&scene)?;
            let query_id = FrameId::from(frame);
            let query = scene.frame(&query_id)?;
            let frames = scene.frames()?;
            let overlaps = detect_overlaps(&query_id, &query, frames.iter().map(|(id, f)| (id, f)));
            info!("{} frames beneath `{query_id}`", overlaps.len());
            print_json(&overlaps)
        }
        Commands::Dump {
            scene,
            from,
            to,
            trace,
            parallel,
        } => {
            let scene = SceneConfig::from_path(&scene)?;
            let source_id = FrameId::from(from);
            let target_id = FrameId::from(to);
            let source = scene.frame(&source_id)?;
            let target = scene.frame(&target_id)?;

            let mut transformer = PointTransformer::new(&source, &target, &scene.layout)
                .with_source_id(source_id.clone());
            if let Some(measured) = scene.measurement(&source_id) {
                transformer = transformer.with_source_measurement(measured);
            }
            if let Some(measured) = scene.measurement(&target_id) {
                transformer = transformer.with_target_measurement(measured);
            }
            if let Some(color) = scene.color(&source_id) {
                transformer = transformer.with_fallback_color(color);
            }

            let points = scene.points(&source_id);
            info!(
                "dumping {} points from `{source_id}` into `{target_id}`",
                points.len()
            );
            let observer = LogObserver::new(trace.unwrap_or(0));
            let dumped = if parallel {
                transformer.par_transform_points_observed(points, &observer)
            } else {
                transformer.transform_points_observed(points, &observer)
            };
            print_json(&dumped)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_accept_negative_bounds() {
        let cli = Cli::try_parse_from(["framedump", "ticks", "--min", "-2500", "--max", "2500"])
            .unwrap();
        match cli.command {
            Commands::Ticks {
                min,
                max,
                intervals,
            } => {
                assert_eq!(min, -2500.0);
                assert_eq!(max, 2500.0);
                assert_eq!(intervals, 5);
            }
            _ => panic!("Expected the ticks command"),
        }
    }

    #[test]
    fn test_dump_arguments() {
        let cli = Cli::try_parse_from([
            "framedump",
            "dump",
            "scene.json",
            "--from",
            "left",
            "--to",
            "right",
            "--trace",
            "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Dump {
                from,
                to,
                trace,
                parallel,
                ..
            } => {
                assert_eq!(from, "left");
                assert_eq!(to, "right");
                assert_eq!(trace, Some(3));
                assert!(!parallel);
            }
            _ => panic!("Expected the dump command"),
        }
    }
}
