use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use radmon::config::{ClassifierConfig, InputFrame, load_classifier_config};
use radmon::export::summary::write_json;
use radmon::export::writer_for_path;
use radmon::frames::{Position, RotationProvider};
use radmon::samples::{read_kp_series, read_samples_in};
use radmon::{classifier_from_config, frame_for, rotation_from_config, table};

/// Classify spacecraft positions into solar wind, magnetosheath or magnetosphere.
#[derive(Parser, Debug)]
#[command(author, version, about = "Magnetospheric region classifier")]
struct Cli {
    /// Classifier configuration (YAML, TOML, or a directory of TOML files)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a single GSM position (Earth radii)
    Classify {
        /// Kp index; values outside [0, 9] are clamped
        #[arg(long, allow_negative_numbers = true)]
        kp: f64,
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
        #[arg(long, allow_negative_numbers = true)]
        z: f64,
    },
    /// Annotate a CSV of `time,x,y,z[,kp]` samples with their region
    Table {
        /// Input CSV of positions (GSM/GSE in Earth radii, geographic/inertial in km)
        #[arg(long)]
        input: PathBuf,

        /// Frame of the input positions; overrides `input_frame` from the configuration
        #[arg(long, value_enum)]
        frame: Option<FrameArg>,

        /// Optional `time,kp` CSV used for samples without a kp column
        #[arg(long)]
        kp_file: Option<PathBuf>,

        /// Output table (use '-' for stdout)
        #[arg(long, default_value = "-")]
        output: PathBuf,

        /// Optional JSON summary path (use '-' for stdout)
        #[arg(long)]
        summary: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FrameArg {
    Gsm,
    Gse,
    Geographic,
    Inertial,
}

impl From<FrameArg> for InputFrame {
    fn from(arg: FrameArg) -> Self {
        match arg {
            FrameArg::Gsm => InputFrame::Gsm,
            FrameArg::Gse => InputFrame::Gse,
            FrameArg::Geographic => InputFrame::Geographic,
            FrameArg::Inertial => InputFrame::Inertial,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_classifier_config(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ClassifierConfig::default(),
    };
    let classifier = classifier_from_config(&config)?;

    match cli.command {
        Command::Classify { kp, x, y, z } => {
            let position = Position::gsm_re(x, y, z)?;
            let result = classifier.classify(&position, kp)?;
            let rotated = result.rotated;
            println!("{}", result.label);
            println!(
                "rotated: {:.4} {:.4} {:.4}",
                rotated.x(),
                rotated.y(),
                rotated.z()
            );
            if result.solar_wind.activity.was_clamped() {
                eprintln!(
                    "kp {} clamped to {}",
                    result.solar_wind.activity.requested(),
                    result.solar_wind.activity.value()
                );
            }
        }
        Command::Table {
            input,
            frame,
            kp_file,
            output,
            summary,
        } => {
            let input_frame = frame.map(InputFrame::from).unwrap_or(config.input_frame);
            let samples = read_samples_in(&input, frame_for(input_frame))
                .with_context(|| format!("reading samples from {}", input.display()))?;
            let feed = kp_file
                .as_ref()
                .map(|path| {
                    read_kp_series(path)
                        .with_context(|| format!("reading Kp feed from {}", path.display()))
                })
                .transpose()?;
            if feed.as_ref().is_some_and(|series| series.is_empty()) {
                return Err(anyhow!("Kp feed contains no samples"));
            }

            let rotation = config
                .rotation
                .as_ref()
                .map(rotation_from_config)
                .transpose()
                .context("building the rotation state from the configuration")?;
            let rows = table::annotate(
                &samples,
                feed.as_ref(),
                config.default_kp,
                &classifier,
                rotation.as_ref().map(|state| state as &dyn RotationProvider),
            );
            let mut writer = writer_for_path(&output)?;
            let counts = table::write_table(&mut *writer, &rows)?;
            info!(
                "classified {} of {} samples",
                counts.samples - counts.failed,
                counts.samples
            );

            if let Some(path) = summary {
                let mut writer = writer_for_path(&path)?;
                write_json(&mut *writer, &counts)?;
                writer.flush()?;
            }
        }
    }
    Ok(())
}
