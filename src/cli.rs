use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dafx::analysis::{dominant_frequency, rms};
use dafx::config::EffectSettings;
use dafx::effects::EffectKind;
use dafx::io::wav::{read_wav_file, write_wav_file_float};

/// FFT length used for the pitch report in verbose mode.
const REPORT_FFT_LEN: usize = 16384;

#[derive(Parser)]
#[command(name = "dafx", version, about = "Render WAV files through block-based audio effects")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the first channel of a WAV file through an effect
    Render {
        input: PathBuf,
        output: PathBuf,

        /// Effect to run (fuzz, tube, wah, overdrive, overdrive2, pitch)
        #[arg(short, long)]
        effect: Option<EffectKind>,

        /// JSON settings file; flags given on the command line override it
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Parameter assignment, e.g. `-p ratio=1.5`
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, f32)>,

        /// Block lengths to cycle through, e.g. `-b 512,480,1024`
        #[arg(short, long = "blocks", value_delimiter = ',')]
        blocks: Vec<usize>,
    },
    /// List effects and their parameters
    List,
}

fn parse_param(arg: &str) -> Result<(String, f32), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", arg))?;
    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("invalid value for '{}': {}", name, e))?;
    Ok((name.trim().to_string(), value))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "dafx=debug" } else { "dafx=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::List => list_effects(),
        Command::Render {
            input,
            output,
            effect,
            settings,
            params,
            blocks,
        } => {
            let mut settings = match settings {
                Some(path) => EffectSettings::load(&path)
                    .with_context(|| format!("failed to load settings {}", path.display()))?,
                None => EffectSettings::new(effect.unwrap_or(EffectKind::PitchShift)),
            };
            if let Some(kind) = effect {
                settings.effect = kind;
            }
            settings.params.extend(params);
            if !blocks.is_empty() {
                settings.block_schedule = blocks;
            }
            render(&input, &output, &settings, cli.verbose)
        }
    }
}

fn list_effects() -> anyhow::Result<()> {
    for kind in EffectKind::ALL {
        let effect = kind.build(48000, 1024)?;
        println!("{}", kind);
        for p in effect.params() {
            println!(
                "  {:<14} {:>8.3} .. {:<8.3} (default {})",
                p.name, p.range.min, p.range.max, p.range.default
            );
        }
    }
    Ok(())
}

fn render(
    input: &Path,
    output: &Path,
    settings: &EffectSettings,
    verbose: bool,
) -> anyhow::Result<()> {
    let wav = read_wav_file(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    if wav.samples.is_empty() {
        bail!("{} contains no samples", input.display());
    }
    info!(
        samples = wav.samples.len(),
        sample_rate = wav.sample_rate,
        channels = wav.channels,
        duration_secs = wav.duration_secs(),
        "input loaded"
    );
    if wav.channels > 1 {
        info!(channels = wav.channels, "processing the first channel only");
    }

    let mut effect = settings
        .build(wav.sample_rate)
        .context("failed to set up effect")?;
    for p in effect.params() {
        info!(effect = effect.name(), param = p.name, value = ?effect.param(p.name), "parameter");
    }

    let start = Instant::now();
    let rendered = dafx::host::render(effect.as_mut(), &wav.samples, &settings.block_schedule)?;
    let elapsed = start.elapsed().as_secs_f64();

    let realtime = if elapsed > 0.0 {
        wav.duration_secs() / elapsed
    } else {
        f64::INFINITY
    };
    info!(elapsed_secs = elapsed, realtime_factor = realtime, "render finished");

    if verbose {
        let in_freq = dominant_frequency(&wav.samples, wav.sample_rate, REPORT_FFT_LEN);
        let out_freq = dominant_frequency(&rendered, wav.sample_rate, REPORT_FFT_LEN);
        info!(
            input_hz = ?in_freq,
            output_hz = ?out_freq,
            input_rms = rms(&wav.samples),
            output_rms = rms(&rendered),
            "signal report"
        );
    }

    write_wav_file_float(output, &rendered, wav.sample_rate)
        .with_context(|| format!("failed to write {}", output.display()))?;
    eprintln!("Written to {}", output.display());
    Ok(())
}
