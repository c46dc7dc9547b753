use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unable to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    BufferSizeMismatch { len: usize, width: u32, height: u32 },

    #[error("color count must be between 1 and 256, got {0}")]
    InvalidColorCount(usize),

    #[error("color count {requested} exceeds the {distinct} distinct colors in the sample")]
    TooFewDistinctColors { requested: usize, distinct: usize },

    #[error("sample rate must be greater than zero, got {0}")]
    InvalidSampleRate(f32),

    #[error("run count must be at least 1")]
    InvalidRunCount,

    #[error("sampling produced no pixels for a {width}x{height} image")]
    NoPixels { width: u32, height: u32 },

    #[error("clustering run {run} returned {got} centroids, expected {expected}")]
    CentroidCountMismatch { run: usize, expected: usize, got: usize },

    #[error("clustering run {run} assigned a pixel to cluster {index}, outside 0..{count}")]
    AssignmentOutOfRange { run: usize, index: usize, count: usize },

    #[error("no colors left to rank after {runs} clustering runs")]
    NoColors { runs: usize },
}
