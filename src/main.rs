//! Command line front end: cut a time range out of an ADTS file.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{info, warn};

use adts_cut::{CutBound, CutRequest, Cutter, ScanEvent};

/// Cuts a time range out of an AAC file in ADTS framing, without re-encoding.
///
/// Start and end bounds are given either as a frame count (one frame is 1024
/// samples) or as a clock time using the [[hh:]mm:]ss[.fff] syntax. The start
/// is rounded down to a whole frame and the end rounded up, so the output
/// always covers the requested window.
#[derive(Parser)]
#[command(name = "adts-cut", version, about)]
struct Cli {
    /// Input file
    #[arg(short, long)]
    input: PathBuf,

    /// Output file; must not already exist
    #[arg(short, long)]
    output: PathBuf,

    /// First frame or time to keep
    #[arg(short, long, default_value = "0")]
    start: String,

    /// End frame or time, exclusive; defaults to the end of the stream
    #[arg(short, long)]
    end: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    if cli.input == cli.output {
        bail!("cannot write output to the input file");
    }

    // Bound errors surface before the output file is created.
    let request = CutRequest::new(
        cli.start.parse()?,
        match &cli.end {
            Some(end) => end.parse()?,
            None => CutBound::FrameIndex(u64::from(u32::MAX)),
        },
    );

    let data = fs::read(&cli.input).with_context(|| format!("reading {}", cli.input.display()))?;
    let file = fs::File::create_new(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    let mut sink = BufWriter::new(file);

    let mut cutter = Cutter::with_diagnostics(&data, log_scan_event)?;
    info!("input sample rate is {} Hz", cutter.sample_rate());

    let report = cutter.cut(&request, &mut sink)?;
    sink.flush()
        .with_context(|| format!("flushing {}", cli.output.display()))?;
    info!(
        "wrote {} frames (range {}..{}) to {}",
        report.frames_written,
        report.start,
        report.end,
        cli.output.display()
    );
    Ok(())
}

fn log_scan_event(event: ScanEvent) {
    match event {
        ScanEvent::SyncLost { offset } => warn!("ignoring non-ADTS data at byte {offset}"),
        ScanEvent::SyncRecovered { offset } => info!("sync word found at byte {offset}"),
        ScanEvent::TruncatedFrame {
            offset,
            needed,
            available,
        } => warn!(
            "discarding incomplete frame at end of input \
             (byte {offset}: need {needed} bytes, have {available})"
        ),
    }
}
