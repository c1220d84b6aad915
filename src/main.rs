use std::fs::File;
use std::io::BufWriter;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use coughalyzer::cli::{Cli, Command, CopyArgs, DatasetArgs, FeaturesArgs, SpectrumArgs, WavArgs};
use coughalyzer::config::PipelineConfig;
use coughalyzer::dataset::{self, wav, DatasetSummary};
use coughalyzer::features::{amplitude_spectrum, cwt, to_mono};
use coughalyzer::pipeline;
use coughalyzer::training::{fit_and_evaluate, NearestCentroid};
use coughalyzer::CoughCategory;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PipelineConfig::from_override(cli.config.as_deref())
        .context("Failed to load pipeline configuration")?;

    match cli.command {
        Command::Summary(args) => handle_summary(&args, config),
        Command::Features(args) => handle_features(&args, config),
        Command::Baseline(args) => handle_baseline(&args, config),
        Command::Spectrum(args) => handle_spectrum(&args, &config),
        Command::Scalogram(args) => handle_scalogram(&args, &config),
        Command::Copy(args) => handle_copy(&args),
    }
}

fn resolve(args: &DatasetArgs, mut config: PipelineConfig) -> Result<PipelineConfig> {
    args.apply(&mut config);
    config
        .validate()
        .context("Invalid configuration after command-line overrides")?;
    Ok(config)
}

fn handle_summary(args: &DatasetArgs, config: PipelineConfig) -> Result<()> {
    let config = resolve(args, config)?;
    let records = dataset::load(&config.dataset_root)
        .with_context(|| format!("Failed to load dataset from {:?}", config.dataset_root))?;
    print!("{}", DatasetSummary::from_records(&records));
    Ok(())
}

fn handle_features(args: &FeaturesArgs, config: PipelineConfig) -> Result<()> {
    let config = resolve(&args.dataset, config)?;
    let records = dataset::load(&config.dataset_root)
        .with_context(|| format!("Failed to load dataset from {:?}", config.dataset_root))?;
    let prepared = pipeline::prepare(&records, &config).context("Failed to extract features")?;

    let writer = BufWriter::new(
        File::create(&args.output)
            .with_context(|| format!("Failed to create output file {:?}", args.output))?,
    );
    serde_json::to_writer(writer, &prepared.export())
        .with_context(|| format!("Failed to write features to {:?}", args.output))?;
    println!(
        "Wrote {} feature vectors ({} train / {} validate / {} test) to {:?}",
        prepared.len(),
        prepared.split.train.len(),
        prepared.split.validate.len(),
        prepared.split.test.len(),
        args.output
    );
    Ok(())
}

fn handle_baseline(args: &DatasetArgs, config: PipelineConfig) -> Result<()> {
    let config = resolve(args, config)?;
    let records = dataset::load(&config.dataset_root)
        .with_context(|| format!("Failed to load dataset from {:?}", config.dataset_root))?;
    ensure!(!records.is_empty(), "Dataset at {:?} is empty", config.dataset_root);

    let prepared = pipeline::prepare(&records, &config).context("Failed to extract features")?;
    ensure!(
        !prepared.split.test.is_empty(),
        "Test split is empty; add recordings or raise the test fraction"
    );

    let mut model = NearestCentroid::new(config.class_weights.clone());
    let report = fit_and_evaluate(
        &mut model,
        &prepared.vectors,
        &prepared.labels,
        &prepared.split,
        CoughCategory::ALL.len(),
    )
    .context("Baseline evaluation failed")?;

    for category in CoughCategory::ALL {
        println!("{:>8} = {}", category.index(), category.token());
    }
    print!("{}", report);
    println!("Normalized confusion (rows: true, columns: predicted):");
    for row in report.normalized_confusion.outer_iter() {
        let cells: Vec<String> = row.iter().map(|v| format!("{:.2}", v)).collect();
        println!("  {}", cells.join(" "));
    }
    Ok(())
}

fn handle_spectrum(args: &SpectrumArgs, config: &PipelineConfig) -> Result<()> {
    let contents = wav::read_wav(&args.wav.input)
        .with_context(|| format!("Failed to read {:?}", args.wav.input))?;
    let signal = to_mono(&contents.samples.to_f64(), contents.format.channels as usize);
    let max_frequency = args.max_frequency.or(config.max_spectrum_frequency);
    let spectrum = amplitude_spectrum(&signal, contents.sample_rate, max_frequency)
        .context("Failed to compute amplitude spectrum")?;
    for bin in spectrum {
        println!("{:.3}\t{:.6}", bin.frequency, bin.magnitude);
    }
    Ok(())
}

fn handle_scalogram(args: &WavArgs, config: &PipelineConfig) -> Result<()> {
    let contents =
        wav::read_wav(&args.input).with_context(|| format!("Failed to read {:?}", args.input))?;
    let signal = to_mono(&contents.samples.to_f64(), contents.format.channels as usize);
    let scalogram =
        cwt(&signal, &config.scalogram_widths).context("Failed to compute scalogram")?;
    println!("shape: {:?}", scalogram.dim());
    for (width, row) in config.scalogram_widths.iter().zip(scalogram.outer_iter()) {
        let energy = row.mapv(|v| v * v).sum() / row.len() as f64;
        println!("{:>6.1}\t{:.6}", width, energy);
    }
    Ok(())
}

fn handle_copy(args: &CopyArgs) -> Result<()> {
    let records = dataset::load(&args.root)
        .with_context(|| format!("Failed to load dataset from {:?}", args.root))?;
    dataset::save(&records, &args.destination)
        .with_context(|| format!("Failed to save dataset to {:?}", args.destination))?;
    println!("Copied {} recordings to {:?}", records.len(), args.destination);
    Ok(())
}
