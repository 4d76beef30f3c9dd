//! [`Pixbuf`]: an owning, reference-counted, copy-on-write block of pixels
//! in a single [`PixelFormat`].
//!
//! This is the tile manager's unit of storage — cloning a `Pixbuf` is a
//! cheap `Arc` bump, and the first write after a clone transparently
//! deep-copies via [`Arc::make_mut`]. A host holding a snapshot of a tile
//! (for undo, or for a background save) never sees it mutate underneath it.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::format::{self, BitDepth, PixelFormat};
use crate::rect::Rect;

/// A rectangular block of pixels in one pixel format, placed at a signed
/// canvas-space origin.
///
/// Pixel accessors (`get_pixel`, `set_pixel`, `writepixel`, ...) take
/// coordinates local to the buffer (`0..width`, `0..height`); [`Pixbuf::rect`]
/// reports where this buffer sits in canvas space.
#[derive(Debug, Clone)]
pub struct Pixbuf {
    format: PixelFormat,
    x: i64,
    y: i64,
    width: u32,
    height: u32,
    stride: usize,
    data: Arc<Vec<u8>>,
}

impl Pixbuf {
    /// Creates a new, zero-filled buffer at canvas origin `(0, 0)`.
    pub fn new(format: PixelFormat, width: u32, height: u32) -> Result<Self> {
        Self::with_origin(format, 0, 0, width, height)
    }

    /// Creates a new, zero-filled buffer at the given canvas origin.
    pub fn with_origin(format: PixelFormat, x: i64, y: i64, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_dimensions(width, height, "width and height must be non-zero"));
        }
        let bpp = format.bpp();
        let stride = (width as usize)
            .checked_mul(bpp)
            .ok_or_else(|| Error::invalid_dimensions(width, height, "row stride overflow"))?;
        let len = stride
            .checked_mul(height as usize)
            .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflow"))?;
        Ok(Self { format, x, y, width, height, stride, data: Arc::new(vec![0u8; len]) })
    }

    /// Wraps an existing byte buffer without copying it. `data.len()` must
    /// equal `width * height * format.bpp()`.
    pub fn from_buffer(format: PixelFormat, x: i64, y: i64, width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_dimensions(width, height, "width and height must be non-zero"));
        }
        let bpp = format.bpp();
        let expected = width as usize * height as usize * bpp;
        if data.len() != expected {
            return Err(Error::FormatMismatch {
                reason: format!("buffer has {} bytes, format/dimensions expect {expected}", data.len()),
            });
        }
        Ok(Self { format, x, y, width, height, stride: width as usize * bpp, data: Arc::new(data) })
    }

    /// This buffer's pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per pixel row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// This buffer's placement in canvas space.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// The raw backing bytes, in this buffer's native format.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Whether every alpha-bearing channel (or every channel, for formats
    /// without alpha) is exactly zero — a cheap "nothing was ever drawn
    /// here" check the tile manager uses to avoid keeping fully blank
    /// tiles around.
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    #[inline]
    fn check_bounds(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x as i64, y as i64, self.width, self.height));
        }
        Ok(y as usize * self.stride + x as usize * self.format.bpp())
    }

    #[inline]
    fn check_region(&self, rect: &Rect) -> Result<()> {
        if rect.x < 0
            || rect.y < 0
            || rect.right() > self.width as i64
            || rect.bottom() > self.height as i64
            || rect.is_empty()
        {
            return Err(Error::invalid_region(rect.x, rect.y, rect.width, rect.height, self.width, self.height));
        }
        Ok(())
    }

    /// Returns the mutable backing buffer, copying it first if another
    /// [`Pixbuf`] clone shares it.
    #[inline]
    fn bytes_mut(&mut self) -> &mut Vec<u8> {
        Arc::make_mut(&mut self.data)
    }

    /// Reads one pixel as normalized `[0, 1]` floats, in native channel
    /// order (including alpha, if the format has one).
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<[f32; 5]> {
        let offset = self.check_bounds(x, y)?;
        let bpp = self.format.bpp();
        let native = format::readpixel(self.format, &self.data[offset..offset + bpp]);
        let bpc = self.format.ops().bpc;
        let mut out = [0.0f32; 5];
        for i in 0..self.format.ops().nc {
            out[i] = format::to_float(bpc, native[i]);
        }
        Ok(out)
    }

    /// Overwrites one pixel with normalized `[0, 1]` floats, in native
    /// channel order. This is a raw store, not a blend — see
    /// [`Pixbuf::writepixel`] for the writer contract.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: &[f32]) -> Result<()> {
        let offset = self.check_bounds(x, y)?;
        let ops = self.format.ops();
        if color.len() != ops.nc {
            return Err(Error::channel_mismatch("Pixbuf::set_pixel", ops.nc, color.len()));
        }
        let bpc = ops.bpc;
        let mut native = [0u32; 5];
        for i in 0..ops.nc {
            native[i] = format::from_float(bpc, color[i]);
        }
        let format = self.format;
        let bpp = format.bpp();
        format::write2pixel(format, &mut self.bytes_mut()[offset..offset + bpp], &native[..ops.nc]);
        Ok(())
    }

    /// Blends one pixel per the writer contract: `color` holds the
    /// non-alpha channels in [`format::FormatOps::color_indices`] order.
    pub fn writepixel(&mut self, x: u32, y: u32, opacity: f32, erase: f32, color: &[f32]) -> Result<()> {
        let offset = self.check_bounds(x, y)?;
        let ops = self.format.ops();
        if color.len() != ops.color_indices.len() {
            return Err(Error::channel_mismatch("Pixbuf::writepixel", ops.color_indices.len(), color.len()));
        }
        let format = self.format;
        let bpp = format.bpp();
        format::writepixel(format, &mut self.bytes_mut()[offset..offset + bpp], opacity, erase, color);
        Ok(())
    }

    /// As [`Pixbuf::writepixel`], but never touches the alpha channel.
    pub fn writepixel_alpha_locked(&mut self, x: u32, y: u32, opacity: f32, erase: f32, color: &[f32]) -> Result<()> {
        let offset = self.check_bounds(x, y)?;
        let ops = self.format.ops();
        if color.len() != ops.color_indices.len() {
            return Err(Error::channel_mismatch("Pixbuf::writepixel_alpha_locked", ops.color_indices.len(), color.len()));
        }
        let format = self.format;
        let bpp = format.bpp();
        format::writepixel_alpha_locked(format, &mut self.bytes_mut()[offset..offset + bpp], opacity, erase, color);
        Ok(())
    }

    /// Averages every pixel within `rect` (given in this buffer's local
    /// coordinates) and returns the mean as normalized `[0, 1]` floats.
    /// Used by the brush engine's color-picker and smudge sampling.
    pub fn get_average_pixel(&self, rect: &Rect) -> Result<[f32; 5]> {
        self.check_region(rect)?;
        let ops = self.format.ops();
        let mut sum = [0.0f64; 5];
        let mut count = 0u64;
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                let pixel = self.get_pixel(x as u32, y as u32)?;
                for i in 0..ops.nc {
                    sum[i] += pixel[i] as f64;
                }
                count += 1;
            }
        }
        let mut out = [0.0f32; 5];
        if count > 0 {
            for i in 0..ops.nc {
                out[i] = (sum[i] / count as f64) as f32;
            }
        }
        Ok(out)
    }

    /// Clips a `(sx, sy, width, height)` source rectangle against this
    /// buffer's bounds and a `(dx, dy)` destination placement against
    /// `dst`'s bounds, shrinking from whichever side overruns. Returns
    /// `None` if nothing survives clipping.
    #[allow(clippy::too_many_arguments)]
    fn clip_blit_area(&self, dst: &Pixbuf, dx: i64, dy: i64, sx: i64, sy: i64, width: u32, height: u32) -> Option<(i64, i64, i64, i64, u32, u32)> {
        let (mut dx, mut dy, mut sx, mut sy, mut width, mut height) = (dx, dy, sx, sy, width, height);

        if sx >= self.width as i64 || sy >= self.height as i64 {
            return None;
        }
        width = width.min((self.width as i64 - sx) as u32);
        height = height.min((self.height as i64 - sy) as u32);

        if dx < 0 {
            if -dx >= width as i64 {
                return None;
            }
            sx -= dx;
            width = (width as i64 + dx) as u32;
            dx = 0;
        }
        if dx >= dst.width as i64 {
            return None;
        }
        width = width.min(dst.width - dx as u32);

        if dy < 0 {
            if -dy >= height as i64 {
                return None;
            }
            sy -= dy;
            height = (height as i64 + dy) as u32;
            dy = 0;
        }
        if dy >= dst.height as i64 {
            return None;
        }
        height = height.min(dst.height - dy as u32);

        if width == 0 || height == 0 {
            return None;
        }
        Some((dx, dy, sx, sy, width, height))
    }

    /// Copies (format-converting as needed) the `width x height` rectangle
    /// of `self` starting at local `(sx, sy)` into `dst`, placing it at
    /// local coordinate `(dx, dy)` in `dst`. Clips both the source rectangle
    /// (against `self`'s bounds) and the destination placement (against
    /// `dst`'s bounds); does not allocate. `endian_flag` is as in
    /// [`format::convert_pixel`].
    #[allow(clippy::too_many_arguments)]
    pub fn blit(&self, dst: &mut Pixbuf, dx: i64, dy: i64, sx: i64, sy: i64, width: u32, height: u32, endian_flag: bool) -> Result<()> {
        let Some((dx, dy, sx, sy, width, height)) = self.clip_blit_area(dst, dx, dy, sx, sy, width, height) else {
            return Ok(());
        };
        let src_bpp = self.format.bpp();
        let dst_bpp = dst.format.bpp();
        let dst_format = dst.format;
        let dst_stride = dst.stride;
        let dst_bytes = dst.bytes_mut();

        for row in 0..height as i64 {
            let src_y = sy + row;
            let dst_y = dy + row;
            for col in 0..width as i64 {
                let src_x = sx + col;
                let dst_x = dx + col;
                let src_off = src_y as usize * self.stride + src_x as usize * src_bpp;
                let dst_off = dst_y as usize * dst_stride + dst_x as usize * dst_bpp;
                format::convert_pixel(
                    self.format,
                    &self.data[src_off..src_off + src_bpp],
                    dst_format,
                    &mut dst_bytes[dst_off..dst_off + dst_bpp],
                    endian_flag,
                );
            }
        }
        Ok(())
    }

    /// As [`Pixbuf::blit`], but alpha-composites (`src-over`) instead of
    /// overwriting.
    #[allow(clippy::too_many_arguments)]
    pub fn compose(&self, dst: &mut Pixbuf, dx: i64, dy: i64, sx: i64, sy: i64, width: u32, height: u32, endian_flag: bool) -> Result<()> {
        let Some((dx, dy, sx, sy, width, height)) = self.clip_blit_area(dst, dx, dy, sx, sy, width, height) else {
            return Ok(());
        };
        let src_bpp = self.format.bpp();
        let dst_bpp = dst.format.bpp();
        let dst_format = dst.format;
        let dst_stride = dst.stride;
        let dst_bytes = dst.bytes_mut();

        for row in 0..height as i64 {
            let src_y = sy + row;
            let dst_y = dy + row;
            for col in 0..width as i64 {
                let src_x = sx + col;
                let dst_x = dx + col;
                let src_off = src_y as usize * self.stride + src_x as usize * src_bpp;
                let dst_off = dst_y as usize * dst_stride + dst_x as usize * dst_bpp;
                format::compose_pixel(
                    self.format,
                    &self.data[src_off..src_off + src_bpp],
                    dst_format,
                    &mut dst_bytes[dst_off..dst_off + dst_bpp],
                    endian_flag,
                );
            }
        }
        Ok(())
    }

    /// Zero-fills the whole buffer.
    pub fn clear(&mut self) {
        let bytes = self.bytes_mut();
        bytes.iter_mut().for_each(|b| *b = 0);
    }

    /// Zero-fills `rect` (local coordinates).
    pub fn clear_area(&mut self, rect: &Rect) -> Result<()> {
        self.check_region(rect)?;
        let bpp = self.format.bpp();
        let stride = self.stride;
        let bytes = self.bytes_mut();
        for y in rect.y..rect.bottom() {
            let row_start = y as usize * stride + rect.x as usize * bpp;
            let row_len = rect.width as usize * bpp;
            bytes[row_start..row_start + row_len].iter_mut().for_each(|b| *b = 0);
        }
        Ok(())
    }

    /// Sets every pixel in the buffer to `color` (raw store, all channels
    /// including alpha, normalized `[0, 1]`).
    pub fn clear_value(&mut self, color: &[f32]) -> Result<()> {
        let ops = self.format.ops();
        if color.len() != ops.nc {
            return Err(Error::channel_mismatch("Pixbuf::clear_value", ops.nc, color.len()));
        }
        let bpc = ops.bpc;
        let mut native = [0u32; 5];
        for i in 0..ops.nc {
            native[i] = format::from_float(bpc, color[i]);
        }
        let format = self.format;
        let bpp = format.bpp();
        let (w, h) = (self.width, self.height);
        for y in 0..h {
            for x in 0..w {
                let offset = y as usize * self.stride + x as usize * bpp;
                format::write2pixel(format, &mut self.bytes_mut()[offset..offset + bpp], &native[..ops.nc]);
            }
        }
        Ok(())
    }

    /// Sets every pixel's alpha channel to `alpha` (normalized `[0, 1]`),
    /// leaving color channels untouched. A no-op for alpha-less formats.
    pub fn clear_alpha(&mut self, alpha: f32) -> Result<()> {
        let ops = self.format.ops();
        let Some(ai) = ops.alpha_index else { return Ok(()) };
        let bpc = ops.bpc;
        let native_alpha = format::from_float(bpc, alpha);
        let format = self.format;
        let bpp = format.bpp();
        let (w, h) = (self.width, self.height);
        for y in 0..h {
            for x in 0..w {
                let offset = y as usize * self.stride + x as usize * bpp;
                let mut native = format::readpixel(format, &self.data[offset..offset + bpp]);
                native[ai] = native_alpha;
                format::write2pixel(format, &mut self.bytes_mut()[offset..offset + bpp], &native[..ops.nc]);
            }
        }
        Ok(())
    }

    /// Shifts the buffer's content in place by `(dx, dy)` pixels, filling
    /// the area exposed by the shift with zero. Pixels shifted fully out of
    /// bounds are lost.
    pub fn scroll(&mut self, dx: i32, dy: i32) {
        let bpp = self.format.bpp();
        let (w, h) = (self.width as i64, self.height as i64);
        let stride = self.stride;
        let old = (*self.data).clone();
        let bytes = self.bytes_mut();
        bytes.iter_mut().for_each(|b| *b = 0);
        for y in 0..h {
            let src_y = y - dy as i64;
            if src_y < 0 || src_y >= h {
                continue;
            }
            for x in 0..w {
                let src_x = x - dx as i64;
                if src_x < 0 || src_x >= w {
                    continue;
                }
                let dst_off = y as usize * stride + x as usize * bpp;
                let src_off = src_y as usize * stride + src_x as usize * bpp;
                bytes[dst_off..dst_off + bpp].copy_from_slice(&old[src_off..src_off + bpp]);
            }
        }
    }

    /// Bit depth of this buffer's channels (exposed for callers that need
    /// to pick a conversion table without re-deriving it from `format`).
    #[inline]
    pub fn bit_depth(&self) -> BitDepth {
        self.format.ops().bpc
    }
}
