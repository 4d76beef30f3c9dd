//! The brush's own last-N-tiles read cache, separate from the display
//! path's single-slot cache in `vellum-tiles`.
//!
//! Sampling the canvas average under a dab (smudge pick-up, the color
//! picker) happens once or twice per dab and very often lands in whichever
//! tile the last few dabs already touched, so a small MRU list of already
//! fetched [`Pixbuf`] clones avoids a hash lookup per sample. Entries are
//! plain owned clones (cheap: `Pixbuf` clone is an `Arc` bump) rather than
//! true weak references, since tiles are never dropped out from under a
//! brush mid-stroke; see DESIGN.md for why this is a deliberate
//! simplification of the reference implementation's weak-pointer cache.

use vellum_core::Pixbuf;
use vellum_tiles::TileManager;

const CACHE_SIZE: usize = 15;

/// A fixed-size MRU cache of tile pixbufs, keyed by tile-grid coordinate.
#[derive(Debug)]
pub struct PixbufCache {
    slots: Vec<Option<((i32, i32), Pixbuf)>>,
}

impl PixbufCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self { slots: vec![None; CACHE_SIZE] }
    }

    /// Drops every cached entry. Called at `stroke_start`.
    pub fn invalidate_all(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    /// Drops the cached entry for one tile, if present. Called after a dab
    /// writes into that tile, so a later read sees the fresh data.
    pub fn invalidate_key(&mut self, key: (i32, i32)) {
        for slot in &mut self.slots {
            if matches!(slot, Some((k, _)) if *k == key) {
                *slot = None;
            }
        }
    }

    /// Returns the pixbuf covering device coordinate `(x, y)`, consulting
    /// `mgr` on a cache miss. Promotes the hit (or freshly fetched entry) to
    /// the front of the MRU list.
    pub fn get(&mut self, mgr: &TileManager, x: i64, y: i64) -> Option<Pixbuf> {
        let tile_size = mgr.tile_size() as i64;
        let key = (x.div_euclid(tile_size) as i32, y.div_euclid(tile_size) as i32);

        if let Some(pos) = self.slots.iter().position(|s| matches!(s, Some((k, _)) if *k == key)) {
            let entry = self.slots.remove(pos);
            self.slots.insert(0, entry.clone());
            return entry.map(|(_, pb)| pb);
        }

        let tx = key.0 as i64 * tile_size;
        let ty = key.1 as i64 * tile_size;
        let pixbuf = mgr.get_pixbuf(tx, ty)?;
        self.slots.pop();
        self.slots.insert(0, Some((key, pixbuf.clone())));
        Some(pixbuf)
    }
}

impl Default for PixbufCache {
    fn default() -> Self {
        Self::new()
    }
}
