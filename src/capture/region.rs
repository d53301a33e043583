//! Snip region geometry
//!
//! Selections are made in logical screen points on the overlay, while the
//! captured image is in physical pixels. This module converts between the two
//! and produces the cropped, encoded image sent to the backend.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{ImageFormat, RgbaImage};

use super::CaptureError;

/// Smallest width/height (in logical points) a snip may have
pub const MIN_SNIP_SIZE: f64 = 10.0;

/// A rectangular snip in logical screen coordinates
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A crop rectangle in physical capture pixels
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a normalized region (positive width/height) from two drag points
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x0 - x1).abs(),
            height: (y0 - y1).abs(),
        }
    }

    /// Raise width and height to the minimum snip size. The origin is kept.
    pub fn clamped(&self) -> Self {
        self.clamped_to(MIN_SNIP_SIZE)
    }

    pub fn clamped_to(&self, min_size: f64) -> Self {
        Self {
            x: self.x,
            y: self.y,
            width: self.width.max(min_size),
            height: self.height.max(min_size),
        }
    }

    /// Scale this region from the logical screen size into capture pixels.
    ///
    /// Each component is multiplied by the per-axis scale factor
    /// (`capture / logical`) and rounded to the nearest pixel. Negative
    /// results saturate at zero.
    pub fn to_pixel_rect(&self, logical_size: (f64, f64), capture_size: (u32, u32)) -> PixelRect {
        let scale_x = axis_scale(logical_size.0, capture_size.0);
        let scale_y = axis_scale(logical_size.1, capture_size.1);

        PixelRect {
            x: round_px(self.x * scale_x),
            y: round_px(self.y * scale_y),
            width: round_px(self.width * scale_x),
            height: round_px(self.height * scale_y),
        }
    }
}

fn axis_scale(logical: f64, capture: u32) -> f64 {
    if logical > 0.0 {
        capture as f64 / logical
    } else {
        1.0
    }
}

fn round_px(value: f64) -> u32 {
    // `as` saturates, so negatives become 0
    value.round() as u32
}

impl PixelRect {
    /// Clamp to an image of `width` x `height`; `None` if nothing is left
    pub fn fit_within(&self, width: u32, height: u32) -> Option<PixelRect> {
        if self.x >= width || self.y >= height {
            return None;
        }

        let w = self.width.min(width - self.x);
        let h = self.height.min(height - self.y);

        if w == 0 || h == 0 {
            return None;
        }

        Some(PixelRect {
            x: self.x,
            y: self.y,
            width: w,
            height: h,
        })
    }
}

/// Crop a region out of a captured image, clamping to its bounds
pub fn crop_image(image: &RgbaImage, rect: PixelRect) -> Result<RgbaImage, CaptureError> {
    let rect = rect
        .fit_within(image.width(), image.height())
        .ok_or(CaptureError::EmptyCrop)?;

    Ok(image::imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image())
}

/// Encode an image as a `data:image/png;base64,...` URL
pub fn encode_png_data_url(image: &RgbaImage) -> Result<String, CaptureError> {
    let mut png_bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut png_bytes, ImageFormat::Png)
        .map_err(CaptureError::Encode)?;

    Ok(format!(
        "data:image/png;base64,{}",
        BASE64.encode(png_bytes.into_inner())
    ))
}

/// Clamp, scale and crop a snip, returning the cropped image and its data URL
pub fn snip_to_data_url(
    capture: &RgbaImage,
    region: CropRegion,
    logical_size: (f64, f64),
    min_size: f64,
) -> Result<(RgbaImage, String), CaptureError> {
    let region = region.clamped_to(min_size);
    let rect = region.to_pixel_rect(logical_size, (capture.width(), capture.height()));
    let cropped = crop_image(capture, rect)?;
    let data_url = encode_png_data_url(&cropped)?;
    Ok((cropped, data_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes() {
        let region = CropRegion::from_corners(50.0, 80.0, 10.0, 20.0);
        assert_eq!(region, CropRegion::new(10.0, 20.0, 40.0, 60.0));
    }

    #[test]
    fn test_clamped_raises_small_dimensions() {
        let region = CropRegion::new(5.0, 6.0, 3.0, 0.0).clamped();
        assert_eq!(region, CropRegion::new(5.0, 6.0, 10.0, 10.0));
    }

    #[test]
    fn test_clamped_keeps_large_dimensions() {
        let region = CropRegion::new(0.0, 0.0, 120.0, 45.5).clamped();
        assert_eq!(region.width, 120.0);
        assert_eq!(region.height, 45.5);
    }

    #[test]
    fn test_to_pixel_rect_hidpi() {
        // 1440x900 logical captured at 2880x1800
        let region = CropRegion::new(100.0, 50.0, 200.5, 75.25);
        let rect = region.to_pixel_rect((1440.0, 900.0), (2880, 1800));
        assert_eq!(
            rect,
            PixelRect {
                x: 200,
                y: 100,
                width: 401,
                height: 151,
            }
        );
    }

    #[test]
    fn test_to_pixel_rect_non_uniform_scale() {
        let region = CropRegion::new(10.0, 10.0, 10.0, 10.0);
        let rect = region.to_pixel_rect((100.0, 100.0), (150, 200));
        assert_eq!(
            rect,
            PixelRect {
                x: 15,
                y: 20,
                width: 15,
                height: 20,
            }
        );
    }

    #[test]
    fn test_to_pixel_rect_zero_logical_size_uses_unit_scale() {
        let region = CropRegion::new(3.0, 4.0, 10.0, 10.0);
        let rect = region.to_pixel_rect((0.0, 0.0), (800, 600));
        assert_eq!(rect.x, 3);
        assert_eq!(rect.width, 10);
    }

    #[test]
    fn test_fit_within_clamps_overflow() {
        let rect = PixelRect {
            x: 90,
            y: 90,
            width: 50,
            height: 50,
        };
        let fitted = rect.fit_within(100, 100).unwrap();
        assert_eq!(fitted.width, 10);
        assert_eq!(fitted.height, 10);
    }

    #[test]
    fn test_fit_within_outside_is_none() {
        let rect = PixelRect {
            x: 100,
            y: 0,
            width: 10,
            height: 10,
        };
        assert!(rect.fit_within(100, 100).is_none());
    }

    #[test]
    fn test_crop_image_dimensions() {
        let image = RgbaImage::from_pixel(64, 32, image::Rgba([255, 0, 0, 255]));
        let cropped = crop_image(
            &image,
            PixelRect {
                x: 60,
                y: 0,
                width: 20,
                height: 12,
            },
        )
        .unwrap();
        assert_eq!(cropped.dimensions(), (4, 12));
    }

    #[test]
    fn test_encode_png_data_url_prefix() {
        let image = RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255]));
        let url = encode_png_data_url(&image).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        let payload = url.trim_start_matches("data:image/png;base64,");
        let bytes = BASE64.decode(payload).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_snip_to_data_url_applies_minimum() {
        let capture = RgbaImage::new(200, 100);
        let (cropped, _) =
            snip_to_data_url(&capture, CropRegion::new(0.0, 0.0, 2.0, 2.0), (100.0, 50.0), 10.0)
                .unwrap();
        assert_eq!(cropped.dimensions(), (20, 20));
    }
}
