//! Mask loading from image files.
//!
//! Any image format supported by `image` works; it is converted to 8-bit
//! luma and every nonzero pixel is foreground.

use robotrack_core::{Mask, MaskError, MaskView};
use std::path::{Path, PathBuf};

use crate::io::TrackConfig;

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to read mask {path}: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("no mask file configured for channel `{0}`")]
    MissingChannel(String),
    #[error(transparent)]
    Mask(#[from] MaskError),
}

/// Borrow an `image::GrayImage` as a mask view.
pub fn mask_view(img: &image::GrayImage) -> MaskView<'_> {
    MaskView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Owned mask from an `image::GrayImage`.
pub fn mask_from_luma(img: image::GrayImage) -> Result<Mask, MaskError> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    Mask::from_raw(w, h, img.into_raw())
}

/// Read one mask file.
pub fn load_mask(path: &Path) -> Result<Mask, LoadError> {
    let img = image::open(path)
        .map_err(|source| LoadError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_luma8();
    log::debug!(
        "loaded mask {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(mask_from_luma(img)?)
}

/// Read all files of one channel and OR them together.
pub fn load_channel(name: &str, paths: &[PathBuf]) -> Result<Mask, LoadError> {
    match paths {
        [] => Err(LoadError::MissingChannel(name.to_string())),
        [single] => load_mask(single),
        _ => {
            let layers = paths
                .iter()
                .map(|p| load_mask(p))
                .collect::<Result<Vec<_>, _>>()?;
            let views: Vec<MaskView<'_>> = layers.iter().map(Mask::view).collect();
            Ok(Mask::union(&views)?)
        }
    }
}

/// One mask per configured tracker channel, in channel order.
///
/// Relative mask paths resolve against `base_dir`.
pub fn load_frame_masks(cfg: &TrackConfig, base_dir: &Path) -> Result<Vec<Mask>, LoadError> {
    cfg.tracker
        .channels
        .iter()
        .map(|c| load_channel(&c.name, &cfg.mask_paths(&c.name, base_dir)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonzero_luma_is_foreground() {
        let mut img = image::GrayImage::new(4, 3);
        img.put_pixel(1, 2, image::Luma([7]));
        let mask = mask_from_luma(img.clone()).expect("mask");
        assert_eq!(mask.view().count_foreground(), 1);
        assert!(mask_view(&img).is_foreground(1, 2));
    }

    #[test]
    fn channel_without_files_is_an_error() {
        assert!(matches!(
            load_channel("red", &[]),
            Err(LoadError::MissingChannel(name)) if name == "red"
        ));
    }

    #[test]
    fn missing_file_names_the_path() {
        let path = PathBuf::from("/nonexistent/robotrack/red.png");
        let err = load_mask(&path).expect_err("missing file");
        assert!(err.to_string().contains("red.png"));
    }
}
