//! Parse command - extract fields from a single transcript.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use rcpt_core::refine::resolve;
use rcpt_core::{is_meaningful_transcript, HeuristicReceiptParser, ReceiptParser};

use super::output::{format_report, OutputFormat, ReceiptReport};
use super::refine::{maybe_refine, Refiner};
use super::GlobalOptions;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Transcript file, or "-" for stdin
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Refine the result with the remote extraction service
    #[arg(long)]
    refine: bool,

    /// Show processing time and result source
    #[arg(long)]
    show_time: bool,
}

pub async fn run(args: ParseArgs, global: &GlobalOptions) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = global.load_config()?;

    let text = read_transcript(&args.input)?;

    if !is_meaningful_transcript(&text, config.extraction.min_transcript_chars) {
        anyhow::bail!("No text found in {}", display_name(&args.input));
    }

    info!("Parsing transcript from {}", display_name(&args.input));

    let parser = HeuristicReceiptParser::from_config(&config.extraction);
    let local = parser.parse(&text);

    let refiner = if args.refine {
        Some(Refiner::new(&config.refinement)?)
    } else {
        None
    };
    let refined = maybe_refine(refiner.as_ref(), &text).await;
    let resolution = resolve(local.receipt.clone(), refined);

    let report = ReceiptReport::new(local, resolution);
    let output = format_report(&report, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_time {
        eprintln!();
        eprintln!(
            "{} Extraction time: {}ms",
            style("ℹ").blue(),
            report.processing_time_ms
        );
        eprintln!("{} Source: {}", style("ℹ").blue(), report.source);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn read_transcript(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    let path = PathBuf::from(input);
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    Ok(fs::read_to_string(&path)?)
}

fn display_name(input: &str) -> &str {
    if input == "-" { "stdin" } else { input }
}
