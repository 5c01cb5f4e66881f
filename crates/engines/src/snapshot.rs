//! PNG output of a rendered [`PixelSurface`].
//!
//! This module is feature-gated behind `png` (default on) so that WASM builds
//! can depend on the `engines` crate without pulling in the `image` crate.

use backdrop_core::error::BackdropError;
use backdrop_core::Animation;
use std::path::Path;

use crate::pixel::PixelSurface;
use crate::{run_frames, RunStats};

/// Writes the surface as an RGBA PNG.
///
/// Returns `BackdropError::Io` on write failure.
pub fn write_png(surface: &PixelSurface, path: &Path) -> Result<(), BackdropError> {
    let w = u32::try_from(surface.width()).map_err(|_| BackdropError::InvalidDimensions)?;
    let h = u32::try_from(surface.height()).map_err(|_| BackdropError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, surface.to_rgba8())
        .ok_or_else(|| BackdropError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| BackdropError::Io(e.to_string()))
}

/// Runs `frames` ticks of `animation` on a fresh surface styled for it and
/// writes the final frame to `path`.
pub fn render_png(
    animation: &mut dyn Animation,
    width: usize,
    height: usize,
    frames: usize,
    path: &Path,
) -> Result<RunStats, BackdropError> {
    let mut surface = PixelSurface::new(width, height, !animation.host_style().transparent)?;
    let stats = run_frames(animation, &mut surface, frames);
    write_png(&surface, path)?;
    log::info!("wrote {}x{} snapshot to {}", width, height, path.display());
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnimationKind;
    use backdrop_core::{Rect, Rgba, Surface, Theme, Viewport};
    use serde_json::json;

    #[test]
    fn write_png_round_trip() {
        let mut surface = PixelSurface::new(16, 8, false).unwrap();
        surface.fill_rect(Rect::sized(8.0, 8.0), Rgba::from_u8(100, 150, 255, 1.0));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.png");

        write_png(&surface, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 16);
        assert_eq!(img.height(), 8);
        assert_eq!(img.get_pixel(0, 0).0, [100, 150, 255, 255]);
        assert_eq!(img.get_pixel(15, 0).0[3], 0);
    }

    #[test]
    fn render_png_of_dark_geometry_is_opaque() {
        let mut animation = AnimationKind::from_name(
            "geometry",
            Viewport::new(64.0, 48.0),
            Theme::Dark,
            5,
            &json!({}),
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geometry.png");

        let stats = render_png(&mut animation, 64, 48, 3, &path).unwrap();

        assert_eq!(stats.drawn, 3);
        let img = image::open(&path).unwrap().to_rgba8();
        assert!(img.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn write_png_to_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        let result = write_png(&PixelSurface::new(2, 2, true).unwrap(), &path);
        assert!(matches!(result, Err(BackdropError::Io(_))));
    }
}
