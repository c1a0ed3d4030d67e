//! Lentimaker CLI - lenticular rig, render and interleave
//!
//! Builds a camera rig around the configured main camera, renders each rig camera
//! with the offline tracer and interleaves the frames into a printable raster.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use lenticular::ColumnMapping;
use lentimaker::{commands, LentimakerConfig, Overrides};
use renderer::RenderOutcome;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lentimaker")]
#[command(author, version, about = "Lenticular camera rig, renderer and interleaver")]
struct Cli {
    /// Config file (defaults to ./lentimaker.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the render resolution implied by the print settings
    Resolution,

    /// Build the rig and list the camera poses
    Rig {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Render every rig camera
    Render,

    /// Interleave rendered frames into lenticular.<ext>
    Interleave {
        /// Directory with LentiCamera_<i> frames (defaults to the output directory)
        dir: Option<PathBuf>,

        /// Column mapping: modulo or sweep
        #[arg(short, long, default_value = "modulo")]
        mapping: ColumnMapping,

        /// Crop the output to this many columns
        #[arg(short, long)]
        width: Option<u32>,

        /// Interleave cameras 0..VIEWS only (defaults to the rig camera count)
        #[arg(long)]
        views: Option<usize>,
    },

    /// Compose a side-by-side stereo pair
    Stereo {
        left: PathBuf,
        right: PathBuf,

        /// Output file; the extension selects the format
        #[arg(long, default_value = "stereo.png")]
        output: PathBuf,
    },

    /// Render, then interleave
    Print {
        /// Column mapping: modulo or sweep
        #[arg(short, long, default_value = "modulo")]
        mapping: ColumnMapping,
    },
}

fn progress_bar() -> Result<ProgressBar> {
    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} frames {elapsed}")?
            .progress_chars("=> "),
    );
    Ok(progress)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = LentimakerConfig::load(cli.config.as_deref())?;
    config.apply(&cli.overrides);

    match cli.command {
        Commands::Resolution => {
            let settings = config.print_settings()?;
            let resolution = commands::resolution(&config)?;
            println!(
                "{:.1} x {:.1} cm at {} dpi / {} lpi",
                settings.width_cm(),
                settings.height_cm(),
                settings.dpi(),
                settings.lpi()
            );
            println!(
                "{} x {} px, {} lenses, {} px per lens",
                resolution.width, resolution.height, resolution.lens_count, resolution.px_per_lens
            );
        }

        Commands::Rig { json } => {
            let report = commands::rig_report(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }

        Commands::Render => match commands::render(&config, &progress_bar()?)? {
            RenderOutcome::Completed { rendered } => {
                println!(
                    "Rendered {} frames into {}",
                    rendered,
                    config.render.output_dir.display()
                );
            }
            RenderOutcome::Cancelled {
                rendered,
                abandoned,
            } => bail!("rendering cancelled after {rendered} frames ({abandoned} abandoned)"),
            RenderOutcome::Failed { index, reason } => {
                bail!("rendering camera {index} failed: {reason}")
            }
        },

        Commands::Interleave {
            dir,
            mapping,
            width,
            views,
        } => {
            let dir = dir.unwrap_or_else(|| config.render.output_dir.clone());
            let path = commands::interleave(&config, &dir, mapping, width, views)?;
            println!("Wrote {}", path.display());
        }

        Commands::Stereo {
            left,
            right,
            output,
        } => {
            let path = commands::stereo(&left, &right, &output)?;
            println!("Wrote {}", path.display());
        }

        Commands::Print { mapping } => {
            let path = commands::print(&config, mapping, &progress_bar()?)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}
