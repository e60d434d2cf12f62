//! Decode, shrink and re-encode an uploaded image.
//!
//! Output is always a JPEG no larger than [`THUMBNAIL_BOUND`] on either side.
//! JPEG has no alpha channel, so transparent images are flattened onto white
//! before encoding instead of being rejected.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{
    DynamicImage, GrayAlphaImage, GrayImage, ImageFormat, ImageReader, Luma, Rgb, RgbImage,
    Rgba, RgbaImage,
};
use lambda_runtime::tracing;

use crate::error::ThumbnailError;

pub const THUMBNAIL_BOUND: u32 = 500;
pub const JPEG_QUALITY: u8 = 75;
pub const THUMBNAIL_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug)]
pub struct Thumbnail {
    pub bytes: Vec<u8>,
    pub source_format: Option<ImageFormat>,
    pub original: (u32, u32),
    pub resized: (u32, u32),
}

/// Runs the whole decode -> resize -> encode chain over fetched object bytes.
pub fn render_thumbnail(bytes: &[u8]) -> Result<Thumbnail, ThumbnailError> {
    let (image, source_format) = decode(bytes)?;
    let original = (image.width(), image.height());
    let resized = resize(image);
    let dimensions = (resized.width(), resized.height());
    let bytes = encode_jpeg(resized)?;
    Ok(Thumbnail {
        bytes,
        source_format,
        original,
        resized: dimensions,
    })
}

/// Decodes `bytes`, sniffing the format from the content itself.
pub fn decode(bytes: &[u8]) -> Result<(DynamicImage, Option<ImageFormat>), ThumbnailError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ThumbnailError::Decode(format!("unable to read image header: {e}")))?;
    let format = reader.format();
    if format.is_none() {
        return Err(ThumbnailError::Decode(
            "content is not a recognised image format".to_string(),
        ));
    }
    let image = reader
        .decode()
        .map_err(|e| ThumbnailError::Decode(e.to_string()))?;
    tracing::debug!(?format, width = image.width(), height = image.height(), "Decoded image");
    Ok((image, format))
}

/// Size that fits `width x height` inside a `bound x bound` box, keeping the
/// aspect ratio. Images already inside the box keep their size.
pub fn bounded_dimensions(width: u32, height: u32, bound: u32) -> (u32, u32) {
    if (width <= bound && height <= bound) || width == 0 || height == 0 {
        return (width, height);
    }
    let aspect = f64::from(width) / f64::from(height);
    let bound_f = f64::from(bound);
    if aspect <= 1.0 {
        let w = closest_side(bound_f * aspect, |n| (aspect - n / bound_f).abs());
        (w, bound)
    } else {
        let h = closest_side(bound_f / aspect, |n| {
            if n == 0.0 {
                0.0
            } else {
                (aspect - bound_f / n).abs()
            }
        });
        (bound, h)
    }
}

// Floor or ceil of `exact`, whichever keeps the aspect ratio closer; floor on ties.
fn closest_side(exact: f64, aspect_error: impl Fn(f64) -> f64) -> u32 {
    let (lo, hi) = (exact.floor(), exact.ceil());
    let side = if aspect_error(hi) < aspect_error(lo) { hi } else { lo };
    (side as u32).max(1)
}

pub fn resize(image: DynamicImage) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    let (target_width, target_height) = bounded_dimensions(width, height, THUMBNAIL_BOUND);
    if (target_width, target_height) == (width, height) {
        return image;
    }
    image.resize_exact(target_width, target_height, FilterType::CatmullRom)
}

pub fn encode_jpeg(image: DynamicImage) -> Result<Vec<u8>, ThumbnailError> {
    let image = to_jpeg_color(image);
    let mut buffer = Vec::new();
    image
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY))
        .map_err(|e| ThumbnailError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Maps any colour mode onto 8-bit gray or 8-bit RGB, flattening alpha onto white.
fn to_jpeg_color(image: DynamicImage) -> DynamicImage {
    let color = image.color();
    match (color.has_color(), color.has_alpha()) {
        (false, false) => DynamicImage::ImageLuma8(image.into_luma8()),
        (false, true) => DynamicImage::ImageLuma8(flatten_gray(&image.into_luma_alpha8())),
        (true, false) => DynamicImage::ImageRgb8(image.into_rgb8()),
        (true, true) => DynamicImage::ImageRgb8(flatten_rgba(&image.into_rgba8())),
    }
}

fn flatten_rgba(rgba: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        Rgb([over_white(r, a), over_white(g, a), over_white(b, a)])
    })
}

fn flatten_gray(gray: &GrayAlphaImage) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let [l, a] = gray.get_pixel(x, y).0;
        Luma([over_white(l, a)])
    })
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let alpha = u16::from(alpha);
    ((u16::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255) as u8
}
