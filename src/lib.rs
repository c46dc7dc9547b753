//! Extract a compact palette of representative colors, and the single most
//! dominant color, from a raster image by clustering sampled pixels with
//! k-means in Lab space across several runs.

mod aggregate;
mod cluster;
mod error;
mod sample;
mod source;

use std::collections::HashSet;

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;

use crate::cluster::RankedColor;
pub use crate::error::ExtractError;
pub use crate::source::{MAX_DIMENSION, PixelBuffer};

// kmeans_colors stores cluster indices as u8.
const MAX_COLOR_COUNT: usize = 256;

/// Knobs for one extraction call. `Default` matches the library defaults:
/// 10 colors, 10% sampling, no similarity filtering, `rgb(r, g, b)` strings,
/// 5 clustering runs seeded from 42.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Number of clusters per k-means run.
    pub n_colors: usize,
    /// Fraction of pixels to sample, in `(0, 1]`. Values above 1 behave
    /// like 1.
    pub sample_rate: f32,
    /// Fold perceptually similar colors within a run into one entry.
    pub filter_similar: bool,
    /// Emit 6-digit hex codes instead of `rgb(r, g, b)` strings.
    pub use_hex: bool,
    /// Independent clustering runs merged into the final ranking.
    pub runs: usize,
    /// Base seed; run `i` clusters with `seed + i`.
    pub seed: u64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            n_colors: 10,
            sample_rate: 0.1,
            filter_similar: false,
            use_hex: false,
            runs: 5,
            seed: 42,
        }
    }
}

/// The ranked palette of an image. `colors` holds every stabilized color
/// except the dominant one, most prevalent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub colors: Vec<String>,
    pub dominant_color: String,
}

/// Run the full pipeline over an RGBA buffer.
///
/// Grid-samples the pixels, clusters them `runs` times with per-run seeds,
/// merges the runs by exact color key, and ranks the result by prevalence
/// with a luminance tie-break. The top color comes back as
/// [`Extraction::dominant_color`]; the rest, in rank order, as
/// [`Extraction::colors`].
pub fn extract_from_pixels(
    buffer: &PixelBuffer,
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    if options.n_colors == 0 || options.n_colors > MAX_COLOR_COUNT {
        return Err(ExtractError::InvalidColorCount(options.n_colors));
    }
    if options.runs == 0 {
        return Err(ExtractError::InvalidRunCount);
    }

    let samples = sample::sample_pixels(buffer, options.sample_rate)?;
    if samples.is_empty() {
        return Err(ExtractError::NoPixels {
            width: buffer.width(),
            height: buffer.height(),
        });
    }
    let distinct = samples.iter().collect::<HashSet<_>>().len();
    if options.n_colors > distinct {
        return Err(ExtractError::TooFewDistinctColors {
            requested: options.n_colors,
            distinct,
        });
    }

    let lab = cluster::to_lab(&samples);
    let mut all_colors: Vec<RankedColor> = Vec::new();
    for run in 0..options.runs {
        let result = cluster::cluster_samples(
            &lab,
            options.n_colors,
            options.seed.wrapping_add(run as u64),
            run,
        )?;
        let ratios = cluster::cluster_ratios(&result.assignments, options.n_colors);
        let ranked: Vec<RankedColor> = cluster::format_centroids(&result.centroids, options.use_hex)
            .into_iter()
            .zip(ratios)
            .map(|(color, ratio)| RankedColor { color, ratio })
            .collect();
        if options.filter_similar {
            all_colors.extend(aggregate::merge_similar(ranked));
        } else {
            all_colors.extend(ranked);
        }
    }

    let mut stabilized = aggregate::stabilize(all_colors);
    if stabilized.is_empty() {
        return Err(ExtractError::NoColors { runs: options.runs });
    }
    aggregate::sort_by_prevalence(&mut stabilized);

    let dominant_color = stabilized[0].color.key.clone();
    let colors = stabilized[1..]
        .iter()
        .map(|color| color.color.key.clone())
        .collect();
    Ok(Extraction {
        colors,
        dominant_color,
    })
}

/// Decode an encoded image and extract its palette in one call.
pub fn extract_from_bytes(
    bytes: &[u8],
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    let buffer = PixelBuffer::from_bytes(bytes)?;
    extract_from_pixels(&buffer, options)
}

/// Extract colors from an encoded image.
///
/// Omitted options fall back to the library defaults. The returned object
/// has the shape `{ colors: string[], dominantColor: string }` and can be
/// consumed directly from JavaScript.
#[wasm_bindgen]
pub fn extract_colors(
    input: Vec<u8>,
    n_colors: Option<u32>,
    sample_rate: Option<f32>,
    filter_similar: Option<bool>,
    use_hex: Option<bool>,
) -> Result<Object, JsValue> {
    let mut options = ExtractOptions::default();
    if let Some(value) = n_colors {
        options.n_colors = value as usize;
    }
    if let Some(value) = sample_rate {
        options.sample_rate = value;
    }
    if let Some(value) = filter_similar {
        options.filter_similar = value;
    }
    if let Some(value) = use_hex {
        options.use_hex = value;
    }

    let extraction =
        extract_from_bytes(&input, &options).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let colors = Array::new();
    for color in &extraction.colors {
        colors.push(&JsValue::from_str(color));
    }
    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("colors"), &colors)?;
    Reflect::set(
        &result,
        &JsValue::from_str("dominantColor"),
        &JsValue::from_str(&extraction.dominant_color),
    )?;
    Ok(result)
}
