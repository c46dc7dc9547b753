use clap::Parser;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use image_color_extractor_wasm::{ExtractOptions, extract_from_bytes};

/// Summarize images into a ranked color palette and a dominant color.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of clusters per k-means run
    #[arg(short = 'k', long, default_value_t = 10)]
    n_colors: usize,

    /// Fraction of pixels to sample, in (0, 1]
    #[arg(short = 'r', long, default_value_t = 0.1)]
    sample_rate: f32,

    /// Fold perceptually similar colors within each run
    #[arg(long)]
    filter_similar: bool,

    /// Print hex codes instead of rgb(...) strings
    #[arg(long)]
    hex: bool,

    /// Number of clustering runs to merge
    #[arg(long, default_value_t = 5)]
    runs: usize,

    /// Base seed for the clustering runs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Emit one JSON object per image instead of plain text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let options = ExtractOptions {
        n_colors: args.n_colors,
        sample_rate: args.sample_rate,
        filter_similar: args.filter_similar,
        use_hex: args.hex,
        runs: args.runs,
        seed: args.seed,
    };

    for input in &args.inputs {
        let bytes =
            fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
        let extraction = extract_from_bytes(&bytes, &options)
            .with_context(|| format!("color extraction failed for {}", input.display()))?;

        if args.json {
            let value = serde_json::json!({
                "file": input.display().to_string(),
                "dominantColor": extraction.dominant_color,
                "colors": extraction.colors,
            });
            println!("{value}");
        } else {
            println!("{} → {}", input.display(), extraction.dominant_color);
            for color in &extraction.colors {
                println!("  {color}");
            }
        }
    }

    Ok(())
}
