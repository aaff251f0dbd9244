//! Off-screen RGBA pixel surface.
//!
//! A `PixelSurface` is a flat `width * height * 4` byte buffer in row-major
//! order, one `R, G, B, A` quadruple per pixel. Nothing about a flat buffer
//! stops a bad offset from bleeding into the next row, so every operation that
//! takes coordinates from a caller checks them first and fails with
//! [`OutOfBounds`] instead of touching memory.

use std::path::Path;

use image::{DynamicImage, RgbaImage};
use log::debug;

use crate::error::{Error, OutOfBounds, Result};
use crate::types::{Coord, Rect};

/// Anything a surface can be blitted onto: another surface or a display buffer.
///
/// `write_row` is only called with rows that were already validated against
/// [`PresentTarget::dimensions`], so implementations may index directly.
pub trait PresentTarget {
    /// `(width, height)` in pixels.
    fn dimensions(&self) -> (usize, usize);

    /// Receive `rgba.len() / 4` pixels starting at `(x, y)`.
    fn write_row(&mut self, x: usize, y: usize, rgba: &[u8]);
}

pub struct PixelSurface {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl PixelSurface {
    /// Zero-filled (transparent black) surface.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u8; width * height * 4] }
    }

    /// Copy a decoded image into a new surface of the same size.
    pub fn from_image(img: &DynamicImage) -> Self {
        let rgba = img.to_rgba8();
        let (w, h) = rgba.dimensions();
        Self { width: w as usize, height: h as usize, pixels: rgba.into_raw() }
    }

    /// Decode an image file (PNG, JPEG, ...) into a surface.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)?;
        debug!("loaded {} ({}x{})", path.display(), img.width(), img.height());
        Ok(Self::from_image(&img))
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The whole surface as a rectangle; the usual `src_rect` for blits.
    pub fn full_rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Byte offset of pixel `(x, y)`.
    pub fn index(&self, x: i32, y: i32) -> Result<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Err(OutOfBounds::Pixel { x, y, width: self.width, height: self.height }.into());
        }
        Ok(self.offset(x as usize, y as usize))
    }

    /// Read one pixel as `[r, g, b, a]`.
    pub fn pixel(&self, x: i32, y: i32) -> Result<[u8; 4]> {
        let i = self.index(x, y)?;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.pixels[i..i + 4]);
        Ok(px)
    }

    /// Overwrite one pixel with `[r, g, b, a]`.
    pub fn set_pixel(&mut self, x: i32, y: i32, rgba: [u8; 4]) -> Result<()> {
        let i = self.index(x, y)?;
        self.pixels[i..i + 4].copy_from_slice(&rgba);
        Ok(())
    }

    /// Hot-loop write for callers that already range-checked `(x, y)`.
    #[inline]
    pub(crate) fn put_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        debug_assert!(x < self.width && y < self.height);
        let i = self.offset(x, y);
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * 4
    }

    /// Fill every pixel with `color` (0xRRGGBB) and `alpha`.
    pub fn clear(&mut self, color: u32, alpha: u8) {
        let fill = [
            ((color >> 16) & 0xff) as u8,
            ((color >> 8) & 0xff) as u8,
            (color & 0xff) as u8,
            alpha,
        ];
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&fill);
        }
    }

    /// Opaque black, the per-frame default.
    pub fn clear_black(&mut self) {
        self.clear(0, 255);
    }

    /// Copy `src_rect` of this surface into `dest` with its top-left at `dest_coord`.
    /// Nothing is written unless both placements fit.
    pub fn copy_region_to(&self, dest: &mut PixelSurface, src_rect: Rect, dest_coord: Coord) -> Result<()> {
        self.present_to(dest, src_rect, dest_coord)
    }

    /// Same contract as [`copy_region_to`](Self::copy_region_to), onto any display target.
    pub fn present_to<T>(&self, device: &mut T, src_rect: Rect, dest_coord: Coord) -> Result<()>
    where
        T: PresentTarget + ?Sized,
    {
        let (dest_w, dest_h) = device.dimensions();
        if let Err(e) = self.check_blit(src_rect, dest_coord, dest_w, dest_h) {
            debug!("blit rejected: {e}");
            return Err(e.into());
        }

        // Rows are strided separately so partial-width regions land correctly.
        let (sx, sy) = (src_rect.x as usize, src_rect.y as usize);
        let (dx, dy) = (dest_coord.x as usize, dest_coord.y as usize);
        let row_bytes = src_rect.width * 4;
        for row in 0..src_rect.height {
            let start = self.offset(sx, sy + row);
            device.write_row(dx, dy + row, &self.pixels[start..start + row_bytes]);
        }
        Ok(())
    }

    fn check_blit(&self, src: Rect, coord: Coord, dest_w: usize, dest_h: usize) -> std::result::Result<(), OutOfBounds> {
        let fits = |origin: i32, len: usize, limit: usize| {
            origin >= 0 && (origin as usize).checked_add(len).is_some_and(|end| end <= limit)
        };

        if src.is_empty() || !fits(src.x, src.width, self.width) || !fits(src.y, src.height, self.height) {
            return Err(OutOfBounds::Source { rect: src, width: self.width, height: self.height });
        }
        if !fits(coord.x, src.width, dest_w) || !fits(coord.y, src.height, dest_h) {
            return Err(OutOfBounds::Destination { rect: src, coord, width: dest_w, height: dest_h });
        }
        Ok(())
    }

    /// Snapshot as an `image` buffer (for saving to disk).
    pub fn to_image(&self) -> Result<RgbaImage> {
        let too_big = || Error::ImageSize { width: self.width, height: self.height };
        let w = u32::try_from(self.width).map_err(|_| too_big())?;
        let h = u32::try_from(self.height).map_err(|_| too_big())?;
        RgbaImage::from_raw(w, h, self.pixels.clone()).ok_or_else(too_big)
    }

    /// Write the surface to an image file; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_image()?.save(path)?;
        Ok(())
    }
}

impl PresentTarget for PixelSurface {
    fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn write_row(&mut self, x: usize, y: usize, rgba: &[u8]) {
        let start = self.offset(x, y);
        self.pixels[start..start + rgba.len()].copy_from_slice(rgba);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FrameBuffer;
    use pretty_assertions::assert_eq;
    use test_log::test;

    // Every pixel gets a distinct value so misplaced rows show up.
    fn gradient(width: usize, height: usize) -> PixelSurface {
        let mut s = PixelSurface::new(width, height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                s.set_pixel(x, y, [x as u8, y as u8, (x + y) as u8, 255]).unwrap();
            }
        }
        s
    }

    #[test]
    fn new_surface_is_zeroed() {
        let s = PixelSurface::new(4, 3);
        assert_eq!(s.pixels().len(), 4 * 3 * 4);
        assert!(s.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn index_is_row_major_and_strictly_increasing() {
        let s = PixelSurface::new(5, 4);
        let mut last = None;
        for y in 0..4 {
            for x in 0..5 {
                let i = s.index(x, y).unwrap();
                assert_eq!(i, ((y * 5 + x) * 4) as usize);
                if let Some(prev) = last {
                    assert!(i > prev);
                }
                last = Some(i);
            }
        }
    }

    #[test]
    fn index_rejects_every_edge() {
        let s = PixelSurface::new(5, 4);
        for (x, y) in [(-1, 0), (0, -1), (5, 0), (0, 4), (5, 4), (i32::MIN, i32::MAX)] {
            let err = s.index(x, y).unwrap_err();
            assert!(err.is_out_of_bounds(), "({x}, {y}) should be rejected");
        }
        assert!(s.index(4, 3).is_ok());
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut s = PixelSurface::new(3, 2);
        s.clear(0x12_34_56, 0x78);
        for px in s.pixels().chunks_exact(4) {
            assert_eq!(px, &[0x12, 0x34, 0x56, 0x78]);
        }

        s.clear_black();
        assert_eq!(s.pixel(2, 1).unwrap(), [0, 0, 0, 255]);
    }

    #[test]
    fn copy_full_width_region() {
        let src = gradient(4, 4);
        let mut dest = PixelSurface::new(4, 6);

        src.copy_region_to(&mut dest, Rect::new(0, 1, 4, 2), Coord::new(0, 3)).unwrap();

        for y in 0..2 {
            for x in 0..4 {
                assert_eq!(dest.pixel(x, 3 + y).unwrap(), src.pixel(x, 1 + y).unwrap());
            }
        }
        // Rows outside the placement are untouched.
        assert_eq!(dest.pixel(0, 2).unwrap(), [0, 0, 0, 0]);
        assert_eq!(dest.pixel(0, 5).unwrap(), [0, 0, 0, 0]);
    }

    #[test]
    fn copy_partial_width_region_strides_rows() {
        let src = gradient(6, 5);
        let mut dest = PixelSurface::new(8, 8);

        src.copy_region_to(&mut dest, Rect::new(2, 1, 3, 3), Coord::new(4, 5)).unwrap();

        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(dest.pixel(4 + x, 5 + y).unwrap(), src.pixel(2 + x, 1 + y).unwrap());
            }
            // Pixel just right of the region stays untouched.
            assert_eq!(dest.pixel(7, 5 + y).unwrap(), [0, 0, 0, 0]);
        }
    }

    #[test]
    fn rejected_copies_leave_both_buffers_alone() {
        let src = gradient(4, 4);
        let before_src = src.pixels().to_vec();
        let mut dest = PixelSurface::new(4, 4);
        dest.clear(0xAA_BB_CC, 1);
        let before_dest = dest.pixels().to_vec();

        let cases = [
            (Rect::new(-1, 0, 2, 2), Coord::ORIGIN),  // negative source origin
            (Rect::new(0, -1, 2, 2), Coord::ORIGIN),
            (Rect::new(3, 0, 2, 2), Coord::ORIGIN),   // source past right edge
            (Rect::new(0, 3, 2, 2), Coord::ORIGIN),   // source past bottom edge
            (Rect::new(0, 0, 0, 2), Coord::ORIGIN),   // zero width
            (Rect::new(0, 0, 2, 0), Coord::ORIGIN),   // zero height
            (Rect::new(0, 0, 2, 2), Coord::new(-1, 0)),
            (Rect::new(0, 0, 2, 2), Coord::new(0, -1)),
            (Rect::new(0, 0, 2, 2), Coord::new(3, 0)), // dest past right edge
            (Rect::new(0, 0, 2, 2), Coord::new(0, 3)), // dest past bottom edge
            (Rect::new(0, 0, usize::MAX, 1), Coord::ORIGIN),
        ];
        for (rect, coord) in cases {
            let err = src.copy_region_to(&mut dest, rect, coord).unwrap_err();
            assert!(err.is_out_of_bounds(), "{rect} -> {coord} should fail");
        }

        assert_eq!(src.pixels(), &before_src[..]);
        assert_eq!(dest.pixels(), &before_dest[..]);
    }

    #[test]
    fn source_and_destination_errors_are_distinguished() {
        let src = PixelSurface::new(4, 4);
        let mut dest = PixelSurface::new(2, 2);

        let err = src.copy_region_to(&mut dest, Rect::new(0, 0, 5, 1), Coord::ORIGIN).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds(OutOfBounds::Source { .. })));

        let err = src.copy_region_to(&mut dest, src.full_rect(), Coord::ORIGIN).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds(OutOfBounds::Destination { width: 2, height: 2, .. })));
    }

    #[test]
    fn present_packs_rgb_for_the_window() {
        let mut s = PixelSurface::new(3, 2);
        s.set_pixel(1, 1, [0x11, 0x22, 0x33, 0x80]).unwrap();
        let mut fb = FrameBuffer::new(4, 4);

        s.present_to(&mut fb, s.full_rect(), Coord::new(1, 1)).unwrap();

        assert_eq!(fb.pixels[2 * 4 + 2], 0x00_11_22_33);
        assert_eq!(fb.pixels[0], 0);
    }

    #[test]
    fn present_checks_the_device_not_the_surface() {
        let s = PixelSurface::new(4, 4);
        let mut small = FrameBuffer::new(2, 2);
        let err = s.present_to(&mut small, s.full_rect(), Coord::ORIGIN).unwrap_err();
        assert!(err.is_out_of_bounds());
        assert!(small.pixels.iter().all(|&p| p == 0));

        s.present_to(&mut small, Rect::new(2, 2, 2, 2), Coord::ORIGIN).unwrap();
    }

    #[test]
    fn snapshot_survives_a_png_file() {
        let src = gradient(7, 3);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");

        src.save(&path).unwrap();
        let loaded = PixelSurface::load(&path).unwrap();

        assert_eq!((loaded.width(), loaded.height()), (7, 3));
        assert_eq!(loaded.pixels(), src.pixels());
    }
}
