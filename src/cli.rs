use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::PipelineConfig;

#[derive(Parser, Debug)]
#[command(name = "coughalyzer")]
#[command(version = "0.1.0")]
#[command(about = "Cough recording dataset and feature extraction tool", long_about = None)]
pub struct Cli {
    /// JSON pipeline configuration; defaults are used for missing fields.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print per-label recording counts.
    Summary(DatasetArgs),
    /// Extract MFCC summary vectors, split them and write JSON.
    Features(FeaturesArgs),
    /// Fit the nearest-centroid baseline and report test metrics.
    Baseline(DatasetArgs),
    /// Print the amplitude spectrum of a WAV file.
    Spectrum(SpectrumArgs),
    /// Print per-scale energy of a WAV file's scalogram.
    Scalogram(WavArgs),
    /// Load a dataset and write it back under another root.
    Copy(CopyArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Dataset root with "{sex} {category}" subdirectories.
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,
    /// Seed for the train/validate/test split.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Number of MFCC frames kept per record.
    #[arg(long = "mfcc-frames")]
    pub mfcc_frames: Option<usize>,
}

impl DatasetArgs {
    /// Layer command-line overrides over `config`.
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(root) = &self.root {
            config.dataset_root = root.clone();
        }
        if let Some(seed) = self.seed {
            config.split.seed = Some(seed);
        }
        if let Some(frames) = self.mfcc_frames {
            config.mfcc_frames = frames;
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct FeaturesArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    /// Output JSON path.
    #[arg(long, short, value_name = "FILE")]
    pub output: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct WavArgs {
    #[arg(value_name = "WAV")]
    pub input: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct SpectrumArgs {
    #[command(flatten)]
    pub wav: WavArgs,
    /// Drop bins above this frequency (Hz).
    #[arg(long = "max-frequency")]
    pub max_frequency: Option<f64>,
}

#[derive(Args, Debug, Clone)]
pub struct CopyArgs {
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,
    #[arg(value_name = "DEST")]
    pub destination: PathBuf,
}
