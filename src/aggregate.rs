use palette::color_difference::Ciede2000;

use crate::cluster::RankedColor;

// CIEDE2000 distance under which two colors from the same run are considered
// the same color.
const SIMILARITY_THRESHOLD: f32 = 20.0;

/// Collapse near-duplicate colors within a single run.
///
/// Colors are visited in centroid order; a color within
/// [`SIMILARITY_THRESHOLD`] of an already kept color donates its ratio to
/// that entry instead of appearing on its own. Distance is measured between
/// the real-valued centroids, not the rounded channels.
pub(crate) fn merge_similar(colors: Vec<RankedColor>) -> Vec<RankedColor> {
    let mut kept: Vec<RankedColor> = Vec::with_capacity(colors.len());
    for color in colors {
        let similar = kept.iter().position(|existing| {
            existing.color.centroid.difference(color.color.centroid) < SIMILARITY_THRESHOLD
        });
        match similar {
            Some(i) => kept[i].ratio += color.ratio,
            None => kept.push(color),
        }
    }
    kept
}

/// Merge the colors collected from every run by exact string key.
///
/// A key's ratio is averaged over its occurrence count, so a color that
/// recurs in several runs keeps a representative ratio rather than an
/// inflated sum. Keys that never recur pass through untouched. Insertion
/// order is preserved.
pub(crate) fn stabilize(all_colors: Vec<RankedColor>) -> Vec<RankedColor> {
    let mut merged: Vec<(RankedColor, usize)> = Vec::new();
    for color in all_colors {
        let existing = merged
            .iter()
            .position(|(entry, _)| entry.color.key == color.color.key);
        match existing {
            Some(i) => {
                let (entry, count) = &mut merged[i];
                entry.ratio += color.ratio;
                *count += 1;
            }
            None => merged.push((color, 1)),
        }
    }
    merged
        .into_iter()
        .map(|(mut color, count)| {
            color.ratio /= count as f32;
            color
        })
        .collect()
}

/// Perceived brightness of the rounded color, Rec. 709 weights, in `[0, 1]`.
pub(crate) fn luminance(color: &RankedColor) -> f32 {
    let rgb = color.color.rgb;
    (0.2126 * rgb.red as f32 + 0.7152 * rgb.green as f32 + 0.0722 * rgb.blue as f32) / 255.0
}

/// Order by descending ratio; exact ratio ties go to the brighter color.
///
/// The sort is stable, so entries tying on both ratio and luminance keep
/// their prior relative order.
pub(crate) fn sort_by_prevalence(colors: &mut [RankedColor]) {
    colors.sort_by(|a, b| {
        b.ratio
            .total_cmp(&a.ratio)
            .then_with(|| luminance(b).total_cmp(&luminance(a)))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::FormattedColor;
    use palette::{IntoColor, Lab, Srgb};

    fn ranked(r: u8, g: u8, b: u8, ratio: f32) -> RankedColor {
        let rgb = Srgb::new(r, g, b);
        let centroid: Lab = rgb.into_linear().into_color();
        RankedColor {
            color: FormattedColor {
                key: format!("rgb({r}, {g}, {b})"),
                rgb,
                centroid,
            },
            ratio,
        }
    }

    #[test]
    fn merge_similar_folds_near_duplicates() {
        let colors = vec![
            ranked(10, 10, 10, 0.4),
            ranked(12, 12, 12, 0.3),
            ranked(255, 0, 0, 0.3),
        ];
        let kept = merge_similar(colors);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].color.key, "rgb(10, 10, 10)");
        assert!((kept[0].ratio - 0.7).abs() < 1e-6);
        assert_eq!(kept[1].color.key, "rgb(255, 0, 0)");
    }

    #[test]
    fn merge_similar_keeps_distinct_colors() {
        let colors = vec![
            ranked(255, 0, 0, 0.5),
            ranked(0, 255, 0, 0.3),
            ranked(0, 0, 255, 0.2),
        ];
        assert_eq!(merge_similar(colors).len(), 3);
    }

    #[test]
    fn stabilize_averages_recurring_keys() {
        let colors = vec![
            ranked(1, 2, 3, 0.6),
            ranked(9, 9, 9, 0.2),
            ranked(1, 2, 3, 0.4),
        ];
        let stabilized = stabilize(colors);
        assert_eq!(stabilized.len(), 2);
        assert_eq!(stabilized[0].color.key, "rgb(1, 2, 3)");
        assert!((stabilized[0].ratio - 0.5).abs() < 1e-6);
        assert!((stabilized[1].ratio - 0.2).abs() < 1e-6);
    }

    #[test]
    fn sort_breaks_ratio_ties_with_luminance() {
        let mut colors = vec![
            ranked(0, 0, 255, 0.5),
            ranked(255, 0, 0, 0.5),
            ranked(0, 255, 0, 0.8),
        ];
        sort_by_prevalence(&mut colors);
        let keys: Vec<_> = colors.iter().map(|c| c.color.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["rgb(0, 255, 0)", "rgb(255, 0, 0)", "rgb(0, 0, 255)"]
        );
    }

    #[test]
    fn sort_leaves_exact_ties_in_place() {
        let mut first = ranked(9, 9, 9, 0.25);
        first.color.key = "first".into();
        let mut second = ranked(9, 9, 9, 0.25);
        second.color.key = "second".into();
        let mut colors = vec![first, second];
        sort_by_prevalence(&mut colors);
        assert_eq!(colors[0].color.key, "first");
        assert_eq!(colors[1].color.key, "second");
    }
}
