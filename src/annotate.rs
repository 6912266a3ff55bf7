// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Drawing decoded poses onto images.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_text_mut};

use crate::error::{InferenceError, Result};
use crate::results::{Person, Results};
use crate::visualizer::{Color, SKELETON};
use crate::{verbose, warn};

/// Assets URL for downloading fonts
const ASSETS_URL: &str = "https://github.com/ultralytics/assets/releases/download/v0.0.0";

/// Font used for part labels.
const FONT_NAME: &str = "Arial.ttf";

/// JPEG quality of saved images.
pub const JPEG_QUALITY: u8 = 60;

/// Skeleton line width in pixels.
const LINE_WIDTH: i32 = 2;

/// Radius of the marker drawn at each part.
const MARKER_RADIUS: i32 = 2;

/// Check if font exists locally or download it
pub fn check_font(font: &str) -> Option<PathBuf> {
    let font_name = Path::new(font).file_name()?.to_string_lossy();
    let config_dir = dirs::config_dir()?.join(env!("CARGO_PKG_NAME"));
    let font_path = config_dir.join(font_name.as_ref());

    if font_path.exists() {
        return Some(font_path);
    }

    if let Err(e) = fs::create_dir_all(&config_dir) {
        warn!("Failed to create config directory: {e}");
        return None;
    }

    let url = format!("{ASSETS_URL}/{font_name}");
    verbose!("Downloading {url} to {}", font_path.display());

    match ureq::get(&url).call() {
        Ok(response) => {
            let mut file = match File::create(&font_path) {
                Ok(f) => f,
                Err(e) => {
                    warn!("Failed to create font file: {e}");
                    return None;
                }
            };

            let mut reader = response.into_body().into_reader();
            if let Err(e) = io::copy(&mut reader, &mut file) {
                warn!("Failed to download font: {e}");
                let _ = fs::remove_file(&font_path);
                return None;
            }

            Some(font_path)
        }
        Err(e) => {
            warn!("Failed to download font from {url}: {e}");
            None
        }
    }
}

/// Load the label font, downloading it on first use.
fn load_font() -> Option<FontVec> {
    let path = check_font(FONT_NAME)?;
    let data = fs::read(path).ok()?;
    FontVec::try_from_vec(data).ok()
}

/// Label font size for an image, proportional to its diagonal scale.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn font_size(width: u32, height: u32) -> u32 {
    let size = ((f64::from(width) * f64::from(height)).sqrt() / 80.0).round() as u32;
    size.max(1)
}

/// Text drawn next to a part, e.g. `"87% leftWrist"`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn part_label(score: f32, label: &str) -> String {
    format!("{}% {label}", (100.0 * score).round() as i32)
}

/// Annotate an image with part labels and skeleton lines.
///
/// Labels are drawn only if the font is available; lines and part markers
/// are always drawn.
#[must_use]
pub fn annotate_image(image: &DynamicImage, result: &Results) -> DynamicImage {
    let font = load_font();
    if font.is_none() {
        warn!("Font '{FONT_NAME}' unavailable, part labels will not be drawn");
    }
    annotate_image_with_font(image, result, font.as_ref())
}

/// Annotate an image using an already loaded font.
#[must_use]
pub fn annotate_image_with_font(
    image: &DynamicImage,
    result: &Results,
    font: Option<&FontVec>,
) -> DynamicImage {
    let mut img = image.to_rgb8();
    let (width, height) = img.dimensions();
    #[allow(clippy::cast_precision_loss)]
    let scale = PxScale::from(font_size(width, height) as f32);

    for person in &result.persons {
        draw_parts(&mut img, person, font, scale);
        draw_skeleton(&mut img, person);
    }

    DynamicImage::ImageRgb8(img)
}

#[allow(clippy::cast_possible_truncation)]
fn draw_parts(img: &mut RgbImage, person: &Person, font: Option<&FontVec>, scale: PxScale) {
    let black = Rgb(Color::BLACK.to_array());
    let white = Rgb(Color::WHITE.to_array());
    // Labels are anchored on their baseline at the part position.
    let rise = scale.y as i32;

    for part in &person.parts {
        draw_filled_circle_mut(img, (part.x, part.y), MARKER_RADIUS, white);

        if let Some(f) = font {
            let text = part_label(part.score, part.label);
            draw_text_mut(img, black, part.x + 1, part.y + 1 - rise, scale, f, &text);
            draw_text_mut(img, white, part.x, part.y - rise, scale, f, &text);
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn draw_skeleton(img: &mut RgbImage, person: &Person) {
    for segment in &SKELETON {
        let color = Rgb(segment.color.to_array());
        let points = segment.points(person);
        for pair in points.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            for t in 0..LINE_WIDTH {
                draw_line_segment_mut(
                    img,
                    ((x0 + t) as f32, y0 as f32),
                    ((x1 + t) as f32, y1 as f32),
                    color,
                );
                draw_line_segment_mut(
                    img,
                    (x0 as f32, (y0 + t) as f32),
                    (x1 as f32, (y1 + t) as f32),
                    color,
                );
            }
        }
    }
}

/// Output path for a source image: `<output_dir>/<source stem>.jpg`.
#[must_use]
pub fn output_path(source: &str, output_dir: &Path) -> PathBuf {
    let name = Path::new(source)
        .file_name()
        .map_or_else(|| PathBuf::from("output"), PathBuf::from);
    output_dir.join(name).with_extension("jpg")
}

/// Annotate and save a result as JPEG under `output_dir`.
///
/// # Errors
///
/// Returns an error if the directory or file can't be created or encoding fails.
pub fn save_annotated(image: &DynamicImage, result: &Results, output_dir: &Path) -> Result<PathBuf> {
    let annotated = annotate_image(image, result);
    fs::create_dir_all(output_dir)?;

    let path = output_path(&result.path, output_dir);
    save_jpeg(&annotated.to_rgb8(), &path)?;
    Ok(path)
}

/// Encode an RGB image as JPEG.
///
/// # Errors
///
/// Returns an error if the file can't be created or encoding fails.
pub fn save_jpeg(img: &RgbImage, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut encoder = JpegEncoder::new_with_quality(BufWriter::new(file), JPEG_QUALITY);
    encoder
        .encode_image(img)
        .map_err(|e| InferenceError::ImageError(format!("Failed to encode {}: {e}", path.display())))
}
