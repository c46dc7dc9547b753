use kmeans_colors::get_kmeans;
use palette::{IntoColor, Lab, Srgb};

use crate::error::ExtractError;
use crate::sample::PixelSample;

// One k-means pass: iteration cap and convergence threshold.
const MAX_ITERATIONS: usize = 20;
const CONVERGE: f32 = 1e-4;

/// Output of one clustering run: `n_colors` centroids plus the cluster index
/// of every sampled pixel, in sample order.
pub(crate) struct ClusterRun {
    pub(crate) centroids: Vec<Lab>,
    pub(crate) assignments: Vec<usize>,
}

/// A centroid rendered to its canonical string form.
///
/// The string is the sole identity used when colors are merged across runs;
/// the real-valued Lab centroid sticks around for distance checks and the
/// rounded RGB for the luminance tie-break.
#[derive(Debug, Clone)]
pub(crate) struct FormattedColor {
    pub(crate) key: String,
    pub(crate) rgb: Srgb<u8>,
    pub(crate) centroid: Lab,
}

/// A formatted color together with the fraction of sampled pixels that landed
/// in its cluster.
#[derive(Debug, Clone)]
pub(crate) struct RankedColor {
    pub(crate) color: FormattedColor,
    pub(crate) ratio: f32,
}

pub(crate) fn to_lab(samples: &[PixelSample]) -> Vec<Lab> {
    samples
        .iter()
        .map(|&[r, g, b]| Srgb::<u8>::new(r, g, b).into_linear().into_color())
        .collect()
}

/// Run k-means once over the sampled points and verify its shape: exactly
/// `n_colors` centroids, every assignment within range.
pub(crate) fn cluster_samples(
    lab: &[Lab],
    n_colors: usize,
    seed: u64,
    run: usize,
) -> Result<ClusterRun, ExtractError> {
    let kmeans = get_kmeans(n_colors, MAX_ITERATIONS, CONVERGE, false, lab, seed);
    if kmeans.centroids.len() != n_colors {
        return Err(ExtractError::CentroidCountMismatch {
            run,
            expected: n_colors,
            got: kmeans.centroids.len(),
        });
    }
    let assignments: Vec<usize> = kmeans.indices.iter().map(|&i| i as usize).collect();
    if let Some(&index) = assignments.iter().find(|&&i| i >= n_colors) {
        return Err(ExtractError::AssignmentOutOfRange {
            run,
            index,
            count: n_colors,
        });
    }
    Ok(ClusterRun {
        centroids: kmeans.centroids,
        assignments,
    })
}

/// Round each centroid to 8-bit RGB exactly once and build its string key,
/// either `rgb(r, g, b)` or a 6-digit hex code.
pub(crate) fn format_centroids(centroids: &[Lab], use_hex: bool) -> Vec<FormattedColor> {
    centroids
        .iter()
        .map(|&centroid| {
            let rgb_f32: Srgb<f32> = Srgb::from_linear(centroid.into_color());
            let rgb = rgb_f32.into_format::<u8>();
            let key = if use_hex {
                format!("{:02X}{:02X}{:02X}", rgb.red, rgb.green, rgb.blue)
            } else {
                format!("rgb({}, {}, {})", rgb.red, rgb.green, rgb.blue)
            };
            FormattedColor { key, rgb, centroid }
        })
        .collect()
}

/// Fraction of samples assigned to each cluster, aligned with centroid order.
pub(crate) fn cluster_ratios(assignments: &[usize], n_colors: usize) -> Vec<f32> {
    let mut counts = vec![0usize; n_colors];
    for &index in assignments {
        counts[index] += 1;
    }
    let total = assignments.len() as f32;
    counts.iter().map(|&count| count as f32 / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_align_with_centroid_order() {
        let ratios = cluster_ratios(&[0, 0, 1, 2], 3);
        assert_eq!(ratios, vec![0.5, 0.25, 0.25]);
    }

    #[test]
    fn formats_rgb_and_hex_keys() {
        let lab = to_lab(&[[255, 0, 0]]);
        let rgb = format_centroids(&lab, false);
        assert_eq!(rgb[0].key, "rgb(255, 0, 0)");
        let hex = format_centroids(&lab, true);
        assert_eq!(hex[0].key, "FF0000");
        assert_eq!(hex[0].rgb, Srgb::new(255u8, 0, 0));
    }

    #[test]
    fn two_tone_samples_fill_both_clusters() {
        let samples = vec![[255, 0, 0]; 4]
            .into_iter()
            .chain(vec![[0, 0, 255]; 4])
            .collect::<Vec<_>>();
        let lab = to_lab(&samples);
        let run = cluster_samples(&lab, 2, 42, 0).unwrap();
        assert_eq!(run.centroids.len(), 2);
        assert_eq!(run.assignments.len(), 8);
        let ratios = cluster_ratios(&run.assignments, 2);
        assert_eq!(ratios, vec![0.5, 0.5]);
    }
}
