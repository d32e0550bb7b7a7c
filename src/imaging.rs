//! Photo enhancement and social-platform crops.
//!
//! Both entry points degrade silently: when an upload cannot be decoded or encoded, the
//! input bytes are handed back untouched and the failure is only logged.

use base64::Engine;
use image::{
    codecs::jpeg::JpegEncoder,
    imageops::{self, FilterType},
    ImageResult, RgbImage,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::models::PhotoEnhancement;

pub const ENHANCED_JPEG_QUALITY: u8 = 95;
pub const CROPPED_JPEG_QUALITY: u8 = 90;

const SHARPNESS: f32 = 1.2;
const CONTRAST: f32 = 1.1;
const SATURATION: f32 = 1.15;
const UNSHARP_SIGMA: f32 = 1.0;
const UNSHARP_AMOUNT: f32 = 1.5;
const UNSHARP_THRESHOLD: i32 = 3;

/// 3x3 smoothing kernel used as the "blurred" end of the sharpness blend.
const SMOOTH_KERNEL: [f32; 9] = [1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    InstagramSquare,
    InstagramStory,
    WhatsappStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformSpec {
    pub id: Platform,
    pub name: &'static str,
    pub aspect_ratio: f64,
    pub width: u32,
    pub height: u32,
    pub description: &'static str,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::InstagramSquare, Platform::InstagramStory, Platform::WhatsappStatus];

    /// Target output size; the aspect ratio of the crop box follows from it.
    pub fn size(self) -> (u32, u32) {
        match self {
            Platform::InstagramSquare => (1080, 1080),
            Platform::InstagramStory | Platform::WhatsappStatus => (1080, 1920),
        }
    }

    pub fn spec(self) -> PlatformSpec {
        let (width, height) = self.size();
        let (name, description) = match self {
            Platform::InstagramSquare => ("Instagram Post", "Square format for Instagram feed posts"),
            Platform::InstagramStory => ("Instagram Story", "Vertical format for Instagram stories"),
            Platform::WhatsappStatus => ("WhatsApp Status", "Vertical format for WhatsApp status updates"),
        };
        PlatformSpec { id: self, name, aspect_ratio: width as f64 / height as f64, width, height, description }
    }
}

/// Centered crop box `(x, y, width, height)` with aspect `ratio_w:ratio_h`.
/// Images wider than the target lose width, all others lose height.
pub fn crop_box(width: u32, height: u32, ratio_w: u32, ratio_h: u32) -> (u32, u32, u32, u32) {
    let (w, h) = (width as u64, height as u64);
    let (rw, rh) = (ratio_w as u64, ratio_h as u64);
    if w * rh > h * rw {
        let new_w = (h * rw / rh).max(1);
        (((w - new_w) / 2) as u32, 0, new_w as u32, height)
    } else {
        let new_h = (w * rh / rw).max(1).min(h);
        (0, ((h - new_h) / 2) as u32, width, new_h as u32)
    }
}

fn decode_rgb(data: &[u8]) -> ImageResult<RgbImage> {
    Ok(image::load_from_memory(data)?.to_rgb8())
}

fn encode_jpeg(img: &RgbImage, quality: u8) -> ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality).encode_image(img)?;
    Ok(buf)
}

fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// `degenerate + (image - degenerate) * factor`, per channel.
fn blend(degenerate: &RgbImage, image: &RgbImage, factor: f32) -> RgbImage {
    let mut out = image.clone();
    for (o, d) in out.iter_mut().zip(degenerate.iter()) {
        let (o_f, d_f) = (*o as f32, *d as f32);
        *o = clamp_u8(d_f + (o_f - d_f) * factor);
    }
    out
}

fn luma(r: u8, g: u8, b: u8) -> f32 {
    (r as f32 * 299.0 + g as f32 * 587.0 + b as f32 * 114.0) / 1000.0
}

fn grayscale(image: &RgbImage) -> RgbImage {
    let mut out = image.clone();
    for px in out.pixels_mut() {
        let l = clamp_u8(luma(px[0], px[1], px[2]));
        px.0 = [l, l, l];
    }
    out
}

/// Border pixels have no full 3x3 neighbourhood and keep their input value.
pub fn adjust_sharpness(image: &RgbImage, factor: f32) -> RgbImage {
    // filter3x3 leaves the outermost ring zeroed
    let mut smooth = imageops::filter3x3(image, &SMOOTH_KERNEL);
    let (w, h) = image.dimensions();
    for (x, y, px) in image.enumerate_pixels() {
        if x == 0 || y == 0 || x + 1 == w || y + 1 == h {
            smooth.put_pixel(x, y, *px);
        }
    }
    blend(&smooth, image, factor)
}

pub fn adjust_contrast(image: &RgbImage, factor: f32) -> RgbImage {
    let count = (image.width() as f64 * image.height() as f64).max(1.0);
    let total: f64 = image.pixels().map(|p| luma(p[0], p[1], p[2]) as f64).sum();
    let mean = (total / count).round() as f32;

    let mut out = image.clone();
    for v in out.iter_mut() {
        *v = clamp_u8(mean + (*v as f32 - mean) * factor);
    }
    out
}

pub fn adjust_saturation(image: &RgbImage, factor: f32) -> RgbImage {
    blend(&grayscale(image), image, factor)
}

/// Adds `amount` times the high-pass detail wherever it exceeds `threshold`.
pub fn unsharp_mask(image: &RgbImage, sigma: f32, amount: f32, threshold: i32) -> RgbImage {
    let blurred = imageops::blur(image, sigma);
    let mut out = image.clone();
    for (o, b) in out.iter_mut().zip(blurred.iter()) {
        let diff = *o as i32 - *b as i32;
        if diff.abs() >= threshold {
            *o = clamp_u8(*o as f32 + diff as f32 * amount);
        }
    }
    out
}

fn enhance_pixels(image: &RgbImage) -> RgbImage {
    let image = adjust_sharpness(image, SHARPNESS);
    let image = adjust_contrast(&image, CONTRAST);
    let image = adjust_saturation(&image, SATURATION);
    unsharp_mask(&image, UNSHARP_SIGMA, UNSHARP_AMOUNT, UNSHARP_THRESHOLD)
}

fn try_enhance(data: &[u8]) -> ImageResult<Vec<u8>> {
    let image = decode_rgb(data)?;
    encode_jpeg(&enhance_pixels(&image), ENHANCED_JPEG_QUALITY)
}

/// Enhanced JPEG, or `data` unchanged when it cannot be processed.
pub fn enhance_image(data: &[u8]) -> Vec<u8> {
    match try_enhance(data) {
        Ok(enhanced) => enhanced,
        Err(e) => {
            warn!("⚠️ Image enhancement failed, keeping original: {}", e);
            data.to_vec()
        }
    }
}

fn try_crop(data: &[u8], platform: Platform) -> ImageResult<Vec<u8>> {
    let image = decode_rgb(data)?;
    let (target_w, target_h) = platform.size();
    let (x, y, w, h) = crop_box(image.width(), image.height(), target_w, target_h);
    let cropped = imageops::crop_imm(&image, x, y, w, h).to_image();
    let resized = imageops::resize(&cropped, target_w, target_h, FilterType::Lanczos3);
    encode_jpeg(&resized, CROPPED_JPEG_QUALITY)
}

/// Platform-sized JPEG, or `data` unchanged when it cannot be processed.
pub fn crop_for_platform(data: &[u8], platform: Platform) -> Vec<u8> {
    match try_crop(data, platform) {
        Ok(cropped) => cropped,
        Err(e) => {
            warn!("⚠️ Cropping for {:?} failed, keeping input: {}", platform, e);
            data.to_vec()
        }
    }
}

pub fn to_data_uri(data: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", base64::engine::general_purpose::STANDARD.encode(data))
}

/// Full pipeline for one upload: enhance once, then crop the enhanced image per platform.
pub fn process_photo(original: &[u8]) -> PhotoEnhancement {
    let enhanced = enhance_image(original);
    let [square, story, status] = Platform::ALL.map(|p| crop_for_platform(&enhanced, p));
    info!(
        "🖼️ Processed photo: original={}B enhanced={}B square={}B story={}B status={}B",
        original.len(), enhanced.len(), square.len(), story.len(), status.len()
    );

    PhotoEnhancement {
        original: to_data_uri(original),
        enhanced: to_data_uri(&enhanced),
        instagram_square: to_data_uri(&square),
        instagram_story: to_data_uri(&story),
        whatsapp_status: to_data_uri(&status),
    }
}
