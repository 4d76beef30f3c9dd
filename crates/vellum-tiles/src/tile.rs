//! Sparse, unbounded tile storage: a `HashMap<(i32, i32), Tile>` keyed by
//! tile-grid coordinate, with create-on-read and copy-on-write snapshotting.
//!
//! The canvas itself has no bounds; tiles spring into existence the first
//! time a device coordinate inside them is touched, and the map never shrinks
//! on its own. A host wanting undo snapshots calls [`TileManager::get_tiles`]
//! against a rectangle and gets back tiles it can hold onto indefinitely —
//! any tile still flagged `readonly` is cloned (a cheap `Arc` bump) before
//! the manager hands out a reference any caller could write through.

use std::collections::HashMap;

use vellum_core::{format, Pixbuf, PixelFormat, Rect};

use crate::error::{Result, TileError};

/// Default tile edge length in pixels, matching the reference tile size.
pub const TILE_DEFAULT_SIZE: u32 = 64;

/// One tile: an owned [`Pixbuf`] plus the bookkeeping the manager and brush
/// need around it.
#[derive(Debug, Clone)]
pub struct Tile {
    pixbuf: Pixbuf,
    readonly: bool,
    damaged: bool,
}

impl Tile {
    /// Wraps a freshly allocated or loaded [`Pixbuf`] as a writable tile.
    pub fn new(pixbuf: Pixbuf) -> Self {
        Self { pixbuf, readonly: false, damaged: false }
    }

    /// Borrows the tile's pixel buffer.
    #[inline]
    pub fn pixbuf(&self) -> &Pixbuf {
        &self.pixbuf
    }

    /// Mutably borrows the tile's pixel buffer.
    #[inline]
    pub fn pixbuf_mut(&mut self) -> &mut Pixbuf {
        &mut self.pixbuf
    }

    /// Whether this tile is a shared snapshot that must be cloned before any
    /// caller is allowed to write through it.
    #[inline]
    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Marks the tile readonly (or writable again).
    #[inline]
    pub fn set_readonly(&mut self, readonly: bool) {
        self.readonly = readonly;
    }

    /// Whether any pixel in this tile has changed since the flag was last
    /// cleared.
    #[inline]
    pub fn is_damaged(&self) -> bool {
        self.damaged
    }

    /// Sets the damaged flag; called by the rasteriser after any write.
    #[inline]
    pub fn mark_damaged(&mut self) {
        self.damaged = true;
    }

    /// Clears the damaged flag, typically after the host has redrawn.
    #[inline]
    pub fn clear_damaged(&mut self) {
        self.damaged = false;
    }
}

/// Owns every tile of one unbounded canvas, in a single pixel format.
///
/// Coordinates passed to its methods are device (canvas) coordinates;
/// the manager translates internally to tile-grid coordinates via
/// floor division by [`TileManager::tile_size`].
#[derive(Debug)]
pub struct TileManager {
    format: PixelFormat,
    tile_size: u32,
    tiles: HashMap<(i32, i32), Tile>,
}

impl TileManager {
    /// Creates an empty manager for the given format and tile edge length.
    pub fn new(format: PixelFormat, tile_size: u32) -> Self {
        Self { format, tile_size, tiles: HashMap::new() }
    }

    /// Creates an empty manager using [`TILE_DEFAULT_SIZE`].
    pub fn with_default_tile_size(format: PixelFormat) -> Self {
        Self::new(format, TILE_DEFAULT_SIZE)
    }

    /// This manager's pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Tile edge length in pixels.
    #[inline]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Number of tiles currently allocated.
    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no tile has ever been allocated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    fn device_to_tile(&self, x: i64, y: i64) -> (i32, i32) {
        let t = self.tile_size as i64;
        (x.div_euclid(t) as i32, y.div_euclid(t) as i32)
    }

    fn create_tile(&self, key: (i32, i32)) -> Result<Tile> {
        let (tx, ty) = key;
        let ox = tx as i64 * self.tile_size as i64;
        let oy = ty as i64 * self.tile_size as i64;
        let pixbuf = Pixbuf::with_origin(self.format, ox, oy, self.tile_size, self.tile_size)?;
        tracing::debug!(tx, ty, "created tile");
        Ok(Tile::new(pixbuf))
    }

    /// Returns the tile covering device coordinate `(x, y)`, allocating a
    /// fresh zero-filled one if `create` is set and none exists yet.
    pub fn get_tile(&mut self, x: i64, y: i64, create: bool) -> Result<Option<&Tile>> {
        let key = self.device_to_tile(x, y);
        if create && !self.tiles.contains_key(&key) {
            let tile = self.create_tile(key)?;
            self.tiles.insert(key, tile);
        }
        Ok(self.tiles.get(&key))
    }

    /// As [`TileManager::get_tile`], but returns a mutable reference.
    pub fn get_tile_mut(&mut self, x: i64, y: i64, create: bool) -> Result<Option<&mut Tile>> {
        let key = self.device_to_tile(x, y);
        if create && !self.tiles.contains_key(&key) {
            let tile = self.create_tile(key)?;
            self.tiles.insert(key, tile);
        }
        Ok(self.tiles.get_mut(&key))
    }

    /// Inserts `tile` at the tile-grid coordinate covering `(x, y)`,
    /// replacing any tile already there.
    pub fn set_tile(&mut self, tile: Tile, x: i64, y: i64) {
        let key = self.device_to_tile(x, y);
        self.tiles.insert(key, tile);
    }

    /// Returns the surface reader the brush engine drives: a snapshot of the
    /// tile covering device coordinate `(x, y)`, or `None` if no tile has
    /// been created there. Never allocates.
    pub fn get_pixbuf(&self, x: i64, y: i64) -> Option<Pixbuf> {
        let key = self.device_to_tile(x, y);
        self.tiles.get(&key).map(|t| t.pixbuf().clone())
    }

    fn tile_range(&self, rect: &Rect) -> Option<((i32, i32), (i32, i32))> {
        if rect.is_empty() {
            return None;
        }
        let min = self.device_to_tile(rect.x, rect.y);
        let max = self.device_to_tile(rect.right() - 1, rect.bottom() - 1);
        Some((min, max))
    }

    /// Returns every tile intersecting `rect`, allocating absent ones when
    /// `create` is set. Any tile still marked `readonly` is cloned first (a
    /// cheap `Arc` bump) and the clone both replaces it in the map and is
    /// returned — the system's copy-on-write point for snapshot-based undo.
    pub fn get_tiles(&mut self, rect: &Rect, create: bool) -> Result<Vec<Tile>> {
        let Some((min, max)) = self.tile_range(rect) else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        for ty in min.1..=max.1 {
            for tx in min.0..=max.0 {
                let key = (tx, ty);
                if !self.tiles.contains_key(&key) {
                    if !create {
                        continue;
                    }
                    let tile = self.create_tile(key)?;
                    self.tiles.insert(key, tile);
                }
                let tile = &self.tiles[&key];
                if tile.is_readonly() {
                    let mut clone = tile.clone();
                    clone.set_readonly(false);
                    tracing::trace!(?key, "copy-on-write clone of readonly tile");
                    self.tiles.insert(key, clone.clone());
                    out.push(clone);
                } else {
                    out.push(tile.clone());
                }
            }
        }
        Ok(out)
    }

    /// Iterates every tile intersecting `rect` (or the overall [`bbox`] when
    /// `rect` is `None`), calling `callback` on each. A failing callback or
    /// allocation propagates immediately and aborts the traversal;
    /// already-created tiles from earlier in the traversal are not rolled
    /// back. Iteration order is unspecified.
    ///
    /// [`bbox`]: TileManager::bbox
    pub fn foreach<F>(&mut self, rect: Option<Rect>, create: bool, mut callback: F) -> Result<()>
    where
        F: FnMut(&mut Tile) -> Result<()>,
    {
        let rect = match rect {
            Some(r) => r,
            None => match self.bbox() {
                Some(b) => b,
                None => return Ok(()),
            },
        };
        let Some((min, max)) = self.tile_range(&rect) else {
            return Ok(());
        };
        for ty in min.1..=max.1 {
            for tx in min.0..=max.0 {
                let key = (tx, ty);
                if !self.tiles.contains_key(&key) {
                    if !create {
                        continue;
                    }
                    let tile = self.create_tile(key)?;
                    self.tiles.insert(key, tile);
                }
                if let Some(tile) = self.tiles.get_mut(&key) {
                    callback(tile)?;
                }
            }
        }
        Ok(())
    }

    /// Wipes every tile currently held, then ingests an external rectangular
    /// buffer by creating the tiles it covers and copying the overlapping
    /// region of `data` (row-major, `stride` bytes per row, in `format`)
    /// into each one, converting from `format` into this manager's own
    /// format as it goes. The manager's format is fixed at construction and
    /// is never changed by this call, even when `format` differs from it.
    pub fn from_buffer(
        &mut self,
        format: PixelFormat,
        data: &[u8],
        stride: usize,
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    ) -> Result<()> {
        self.tiles.clear();
        let source_rect = Rect::new(x, y, width, height);
        let Some((min, max)) = self.tile_range(&source_rect) else {
            return Ok(());
        };
        let bpp = format.bpp();
        let bpc = format.ops().bpc;
        let nc = format.ops().nc;
        for ty in min.1..=max.1 {
            for tx in min.0..=max.0 {
                let key = (tx, ty);
                let mut tile = self.create_tile(key)?;
                let tile_rect = tile.pixbuf().rect();
                if let Some(overlap) = tile_rect.intersect(&source_rect) {
                    for py in overlap.y..overlap.bottom() {
                        let row_base = (py - y) as usize * stride;
                        let local_y = (py - tile_rect.y) as u32;
                        for px in overlap.x..overlap.right() {
                            let src_off = row_base + (px - x) as usize * bpp;
                            let local_x = (px - tile_rect.x) as u32;
                            let native = format::readpixel(format, &data[src_off..src_off + bpp]);
                            let mut floats = [0.0f32; 5];
                            for i in 0..nc {
                                floats[i] = format::to_float(bpc, native[i]);
                            }
                            tile.pixbuf_mut().set_pixel(local_x, local_y, &floats[..nc])?;
                        }
                    }
                }
                self.tiles.insert(key, tile);
            }
        }
        Ok(())
    }

    /// The axis-aligned bounding box, in canvas coordinates, of every tile
    /// currently in the map. `None` when empty.
    pub fn bbox(&self) -> Option<Rect> {
        self.tiles.keys().fold(None, |acc: Option<Rect>, &(tx, ty)| {
            let tile_rect = Rect::from_tile(tx as i64, ty as i64, self.tile_size);
            Some(match acc {
                Some(r) => r.union(&tile_rect),
                None => tile_rect,
            })
        })
    }
}
