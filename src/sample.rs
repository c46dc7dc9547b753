use crate::error::ExtractError;
use crate::source::PixelBuffer;

/// One sampled pixel, alpha dropped.
pub(crate) type PixelSample = [u8; 3];

/// Walk the image on a fixed grid and collect every visited pixel.
///
/// The stride is `round(1 / sample_rate)`, clamped to at least 1, applied to
/// rows and columns alike, so rates of 1.0 and above visit every pixel. The
/// grid is deterministic: repeated calls over the same buffer sample the
/// exact same points.
pub(crate) fn sample_pixels(
    buffer: &PixelBuffer,
    sample_rate: f32,
) -> Result<Vec<PixelSample>, ExtractError> {
    if sample_rate <= 0.0 || sample_rate.is_nan() {
        return Err(ExtractError::InvalidSampleRate(sample_rate));
    }
    let step = ((1.0 / sample_rate).round() as usize).max(1);
    let width = buffer.width() as usize;
    let height = buffer.height() as usize;
    let data = buffer.data();

    let mut samples = Vec::new();
    for y in (0..height).step_by(step) {
        for x in (0..width).step_by(step) {
            let i = (y * width + x) * 4;
            // Stride rounding at the image edge can point past the buffer.
            if i + 2 < data.len() {
                samples.push([data[i], data[i + 1], data[i + 2]]);
            }
        }
    }
    Ok(samples)
}
