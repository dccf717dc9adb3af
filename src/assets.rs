use std::path::Path;

use slint::Image;

/// An image already fitted into its bounding box.
#[derive(Clone, Default)]
pub struct ScaledImage {
    pub image: Image,
    pub width: u32,
    pub height: u32,
}

/// Largest size with the source aspect ratio that fits inside the box.
///
/// Integer math with truncation, scaling up as well as down. Any zero
/// dimension, in the input or after truncation, yields `(0, 0)`.
pub fn fit_within(src_w: u32, src_h: u32, box_w: u32, box_h: u32) -> (u32, u32) {
    if src_w == 0 || src_h == 0 || box_w == 0 || box_h == 0 {
        return (0, 0);
    }

    let (src_w, src_h, box_w, box_h) = (src_w as u64, src_h as u64, box_w as u64, box_h as u64);
    let width = box_h * src_w / src_h;
    let (width, height) = if width <= box_w {
        (width, box_h)
    } else {
        (box_w, box_w * src_h / src_w)
    };

    // an empty result is a null pixmap, not a thin strip
    if width == 0 || height == 0 {
        (0, 0)
    } else {
        (width as u32, height as u32)
    }
}

/// Loads the image once and fits it into `box_w` x `box_h`.
///
/// A missing or undecodable file gives a blank image; the caller shows the
/// rest of the window regardless.
pub fn load_scaled(path: &Path, box_w: u32, box_h: u32) -> ScaledImage {
    let image = match Image::load_from_path(path) {
        Ok(image) => image,
        Err(e) => {
            log::warn!("cannot load image {}: {}", path.display(), e);
            return ScaledImage::default();
        }
    };

    let size = image.size();
    let (width, height) = fit_within(size.width, size.height, box_w, box_h);
    log::info!(
        "image {} loaded: {}x{} -> {}x{}",
        path.display(),
        size.width,
        size.height,
        width,
        height
    );

    ScaledImage {
        image,
        width,
        height,
    }
}
