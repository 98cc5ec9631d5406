//! Image loading from disk

use image::imageops::{self, FilterType};
use image::{ImageBuffer, ImageReader, Rgba};
use log::{debug, warn};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reasons an image could not be added to the overlay.
///
/// The display strings are shown to the user verbatim.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot open folders.")]
    PathIsDirectory(PathBuf),

    #[error("The selected image file does not exist.")]
    FileNotFound(PathBuf),

    #[error("Error loading image. Perhaps its format is unsupported?")]
    DecodeFailure {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::PathIsDirectory(path) | LoadError::FileNotFound(path) => path,
            LoadError::DecodeFailure { path, .. } => path,
        }
    }
}

/// Decoded bitmap ready for upload
#[derive(Debug, Clone)]
pub struct ImageData {
    pub path: PathBuf,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Raw RGBA pixel data (4 bytes per pixel, unpremultiplied)
    pub rgba: Vec<u8>,
}

impl ImageData {
    /// Read and decode `path`, sniffing the format from the file content
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if path.is_dir() {
            return Err(LoadError::PathIsDirectory(path.to_path_buf()));
        }
        if !path.exists() {
            return Err(LoadError::FileNotFound(path.to_path_buf()));
        }

        let decode_failure = |source| LoadError::DecodeFailure {
            path: path.to_path_buf(),
            source,
        };

        let img = ImageReader::open(path)
            .map_err(|e| decode_failure(image::ImageError::IoError(e)))?
            .with_guessed_format()
            .map_err(|e| decode_failure(image::ImageError::IoError(e)))?
            .decode()
            .map_err(decode_failure)?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        debug!("decoded {} ({}x{})", path.display(), width, height);

        Ok(Self {
            path: path.to_path_buf(),
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }

    /// Pixels for a GPU texture no larger than `max_side` on either axis.
    ///
    /// Oversized images are downscaled keeping their aspect ratio; the
    /// returned size is the texture's, not the image's natural size.
    pub fn texture_pixels(&self, max_side: u32) -> (u32, u32, Cow<'_, [u8]>) {
        let max_side = max_side.max(1);
        if self.width <= max_side && self.height <= max_side {
            return (self.width, self.height, Cow::Borrowed(&self.rgba));
        }

        let Some(view) =
            ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(self.width, self.height, &self.rgba[..])
        else {
            warn!("{}: pixel buffer does not match its size", self.path.display());
            return (self.width, self.height, Cow::Borrowed(&self.rgba));
        };

        let ratio = max_side as f64 / self.width.max(self.height) as f64;
        let fit = |side: u32| ((side as f64 * ratio).round() as u32).clamp(1, max_side);
        let (width, height) = (fit(self.width), fit(self.height));

        debug!(
            "downscaling {} from {}x{} to {}x{} for upload",
            self.path.display(),
            self.width,
            self.height,
            width,
            height
        );
        let scaled = imageops::resize(&view, width, height, FilterType::Triangle);
        (width, height, Cow::Owned(scaled.into_raw()))
    }
}

/// Extensions offered by the file picker
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "tif", "tiff", "webp",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_is_rejected_before_existence_check() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = ImageData::load(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::PathIsDirectory(_)));
        assert_eq!(err.to_string(), "Cannot open folders.");
        assert_eq!(err.path(), dir.path());
    }

    #[test]
    fn missing_file_reports_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nope.png");
        let err = ImageData::load(&path).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound(_)));
    }

    fn solid(width: u32, height: u32) -> ImageData {
        ImageData {
            path: PathBuf::from("solid.png"),
            width,
            height,
            rgba: [9, 8, 7, 255].repeat((width * height) as usize),
        }
    }

    #[test]
    fn oversized_image_is_downscaled_for_upload() {
        let data = solid(40, 10);
        let (w, h, pixels) = data.texture_pixels(16);
        assert_eq!((w, h), (16, 4));
        assert_eq!(pixels.len(), 16 * 4 * 4);
        assert!(matches!(pixels, Cow::Owned(_)));
        assert_eq!(&pixels[..4], &[9, 8, 7, 255]);
        // The natural size is untouched.
        assert_eq!((data.width, data.height), (40, 10));
    }

    #[test]
    fn thin_image_keeps_at_least_one_pixel() {
        let data = solid(1, 100);
        let (w, h, pixels) = data.texture_pixels(10);
        assert_eq!((w, h), (1, 10));
        assert_eq!(pixels.len(), 10 * 4);
    }

    #[test]
    fn fitting_image_is_borrowed_as_is() {
        let data = solid(16, 16);
        let (w, h, pixels) = data.texture_pixels(16);
        assert_eq!((w, h), (16, 16));
        assert!(matches!(pixels, Cow::Borrowed(_)));
    }

    #[test]
    fn content_is_sniffed_regardless_of_extension() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("actually_png.dat");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]))
            .save_with_format(&path, image::ImageFormat::Png)
            .expect("write png");

        let data = ImageData::load(&path).expect("decodes");
        assert_eq!((data.width, data.height), (3, 2));
        assert_eq!(data.rgba.len(), 3 * 2 * 4);
        assert_eq!(&data.rgba[..4], &[1, 2, 3, 255]);
    }
}
