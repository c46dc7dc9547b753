use image::{self, DynamicImage, GenericImageView, imageops::FilterType};

use crate::error::ExtractError;

/// Longest side, in pixels, a decoded image is allowed to keep. Anything
/// larger is shrunk (aspect ratio preserved) before sampling.
pub const MAX_DIMENSION: u32 = 1000;

/// Row-major RGBA bytes plus their geometry.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap an existing RGBA buffer. The buffer must hold exactly
    /// `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ExtractError> {
        if data.len() != width as usize * height as usize * 4 {
            return Err(ExtractError::BufferSizeMismatch {
                len: data.len(),
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Flatten a decoded image into RGBA bytes, shrinking it first when the
    /// longest side exceeds [`MAX_DIMENSION`]. Each side stays at least 1px.
    pub fn from_image(img: &DynamicImage) -> Self {
        let (in_w, in_h) = img.dimensions();
        let rgba8 = if in_w > MAX_DIMENSION || in_h > MAX_DIMENSION {
            let ratio = (MAX_DIMENSION as f32 / in_w as f32).min(MAX_DIMENSION as f32 / in_h as f32);
            let w = ((in_w as f32 * ratio).floor().max(1.0)) as u32;
            let h = ((in_h as f32 * ratio).floor().max(1.0)) as u32;
            image::imageops::resize(img, w, h, FilterType::Nearest)
        } else {
            img.to_rgba8()
        };
        let (width, height) = rgba8.dimensions();
        Self {
            width,
            height,
            data: rgba8.into_raw(),
        }
    }

    /// Decode an encoded image (PNG, JPG, ...) straight into a pixel buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ExtractError> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_image(&img))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn new_rejects_mismatched_buffer() {
        assert!(matches!(
            PixelBuffer::new(2, 2, vec![0u8; 12]),
            Err(ExtractError::BufferSizeMismatch { len: 12, width: 2, height: 2 })
        ));
    }

    #[test]
    fn new_accepts_zero_area() {
        let buf = PixelBuffer::new(0, 0, Vec::new()).unwrap();
        assert_eq!(buf.width(), 0);
        assert!(buf.data().is_empty());
    }

    #[test]
    fn from_image_caps_longest_side() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(2000, 500));
        let buf = PixelBuffer::from_image(&img);
        assert_eq!((buf.width(), buf.height()), (1000, 250));
        assert_eq!(buf.data().len(), 1000 * 250 * 4);
    }

    #[test]
    fn from_image_leaves_small_images_alone() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(10, 8));
        let buf = PixelBuffer::from_image(&img);
        assert_eq!((buf.width(), buf.height()), (10, 8));
    }
}
