//! Turns black-on-transparent creature icons white, for dark overlays.

pub mod error;

use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use exn::ResultExt;
use image::{ImageFormat, Rgba, RgbaImage};
use tracing::{debug, info, instrument, warn};

use crate::error::{ErrorKind, Result};

/// Default brightness (`r + g + b` after inversion) a pixel needs to stay visible.
pub const DEFAULT_WHITE_THRESHOLD: u16 = 700;
const WHITE: [u8; 3] = [255, 255, 255];

/// Inverts every pixel and keeps only the ones that end up near white.
///
/// Kept pixels become pure white with their original alpha; all others
/// become fully transparent.
pub fn whiten(image: &RgbaImage, threshold: u16) -> RgbaImage {
    let mut output = image.clone();
    for pixel in output.pixels_mut() {
        let Rgba([r, g, b, alpha]) = *pixel;
        let brightness = u16::from(255 - r) + u16::from(255 - g) + u16::from(255 - b);
        let alpha = if brightness > threshold { alpha } else { 0 };
        *pixel = Rgba([WHITE[0], WHITE[1], WHITE[2], alpha]);
    }
    output
}

/// Recolors a single PNG file into `output`.
pub fn whiten_file(input: &Path, output: &Path, threshold: u16) -> Result<()> {
    let bytes = fs::read(input).or_raise(|| ErrorKind::Io(input.to_path_buf()))?;
    let image = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
        .or_raise(|| ErrorKind::Decode(input.to_path_buf()))?
        .to_rgba8();
    whiten(&image, threshold)
        .save_with_format(output, ImageFormat::Png)
        .or_raise(|| ErrorKind::Encode(output.to_path_buf()))
}

/// Outcome of [`whiten_dir`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub converted: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

/// Recolors every `.png` file directly inside `input` into `output` (created
/// if needed), keeping file names. A file that fails is logged, recorded in
/// the summary and skipped.
///
/// # Errors
///
/// Only when `input` can't be listed or `output` can't be created.
#[instrument(skip(input, output), fields(input = %input.display(), output = %output.display()))]
pub fn whiten_dir(input: &Path, output: &Path, threshold: u16) -> Result<Summary> {
    let entries = match fs::read_dir(input) {
        Ok(entries) => entries,
        Err(error) if error.kind() == IoErrorKind::NotFound => {
            return Err(error).or_raise(|| ErrorKind::MissingDirectory(input.to_path_buf()));
        },
        Err(error) => return Err(error).or_raise(|| ErrorKind::Io(input.to_path_buf())),
    };
    fs::create_dir_all(output).or_raise(|| ErrorKind::Io(output.to_path_buf()))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file() && is_png(path))
        .collect();
    files.sort();

    let mut summary = Summary::default();
    for path in files {
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = output.join(file_name);
        match whiten_file(&path, &target, threshold) {
            Ok(()) => {
                debug!(file = %path.display(), "converted");
                summary.converted.push(target);
            },
            Err(error) => {
                warn!(file = %path.display(), error = %error, "skipping icon");
                summary.failed.push(path);
            },
        }
    }
    info!(converted = summary.converted.len(), failed = summary.failed.len(), "icons recolored");
    Ok(summary)
}

fn is_png(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    // Black and opaque: inverted to white, kept.
    #[case([0, 0, 0, 255], [255, 255, 255, 255])]
    // Half transparent black keeps its alpha.
    #[case([0, 0, 0, 128], [255, 255, 255, 128])]
    // White inverts to black: dropped.
    #[case([255, 255, 255, 255], [255, 255, 255, 0])]
    // Dark grey: 3 * (255 - 20) = 705, just above the threshold.
    #[case([20, 20, 20, 200], [255, 255, 255, 200])]
    // 3 * (255 - 22) = 699, just below.
    #[case([22, 22, 22, 200], [255, 255, 255, 0])]
    fn test_whiten_pixel(#[case] input: [u8; 4], #[case] expected: [u8; 4]) {
        let image = RgbaImage::from_pixel(1, 1, Rgba(input));
        assert_eq!(whiten(&image, DEFAULT_WHITE_THRESHOLD).get_pixel(0, 0).0, expected);
    }

    #[test]
    fn whitens_directory_and_skips_bad_files() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("dino_icons");
        let output = temp.path().join("dino_icons_white");
        fs::create_dir(&input).unwrap();
        let black = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        black.save_with_format(input.join("Rex.PNG"), ImageFormat::Png).unwrap();
        fs::write(input.join("Broken.png"), b"not a png").unwrap();
        fs::write(input.join("notes.txt"), b"ignored").unwrap();

        let summary = whiten_dir(&input, &output, DEFAULT_WHITE_THRESHOLD).unwrap();
        assert_eq!(summary.converted, vec![output.join("Rex.PNG")]);
        assert_eq!(summary.failed, vec![input.join("Broken.png")]);
        let converted = image::load_from_memory(&fs::read(output.join("Rex.PNG")).unwrap()).unwrap().to_rgba8();
        assert_eq!(converted.get_pixel(1, 1).0, [255, 255, 255, 255]);
        assert!(!output.join("notes.txt").exists());
    }

    #[test]
    fn missing_input_directory_is_an_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let error = whiten_dir(&missing, &temp.path().join("out"), DEFAULT_WHITE_THRESHOLD).unwrap_err();
        assert_eq!(*error, ErrorKind::MissingDirectory(missing));
    }
}
