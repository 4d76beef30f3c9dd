//! Cross-crate integration tests for the Vellum painting core.
//!
//! Unit tests already cover each crate's internal invariants; this crate
//! exercises the seams between them: a brush stroke driven through a real
//! [`TileManager`], the tile manager's copy-on-write undo-snapshot
//! contract, and the affine display path sampling painted tiles.

#[cfg(test)]
mod tests {
    use vellum_brush::{Brush, BrushParams, StrokeEvent};
    use vellum_core::{Pixbuf, PixelFormat};
    use vellum_tiles::{AffineTransform, Filter, TileManager};

    fn paint_straight_stroke(mgr: &mut TileManager, params: BrushParams, seed: u64, color: [f32; 3]) {
        let mut brush = Brush::new(params, seed);
        brush.set_color(color);
        brush.stroke_start(mgr, StrokeEvent::new((10, 50), (10.0, 50.0), 0.8, 0.0)).unwrap();
        for i in 1..40 {
            let x = 10.0 + i as f32 * 2.0;
            brush.draw_stroke(mgr, StrokeEvent::new((x as i32, 50), (x, 50.0), 0.8, i as f32 * 0.02)).unwrap();
        }
        brush.stroke_end(mgr).unwrap();
    }

    #[test]
    fn a_stroke_creates_tiles_and_damages_a_region_along_its_path() {
        let mut mgr = TileManager::new(PixelFormat::RgbaPremul8, 64);
        paint_straight_stroke(&mut mgr, BrushParams { radius_min: 5.0, radius_max: 5.0, spacing: 0.2, ..BrushParams::default() }, 1, [1.0, 0.0, 0.0]);
        assert!(mgr.len() > 1, "a stroke spanning multiple tiles should create more than one tile");

        let tile = mgr.get_tile(10, 50, false).unwrap().unwrap();
        assert!(tile.is_damaged());
    }

    #[test]
    fn undo_snapshot_survives_further_painting() {
        let mut mgr = TileManager::new(PixelFormat::RgbaPremul8, 64);
        paint_straight_stroke(&mut mgr, BrushParams { radius_min: 5.0, radius_max: 5.0, spacing: 0.2, ..BrushParams::default() }, 2, [0.0, 1.0, 0.0]);

        let rect = vellum_core::Rect::new(0, 0, 128, 128);
        let snapshot = mgr.get_tiles(&rect, false).unwrap();
        let find_origin_tile = |tiles: &[vellum_tiles::Tile]| {
            tiles.iter().find(|t| t.pixbuf().rect().x == 0 && t.pixbuf().rect().y == 0).unwrap().pixbuf().get_pixel(10, 50).unwrap()
        };
        let before = find_origin_tile(&snapshot);

        // Paint again over the same area; the snapshot must not change.
        paint_straight_stroke(&mut mgr, BrushParams { radius_min: 5.0, radius_max: 5.0, spacing: 0.2, alpha_lock: false, ..BrushParams::default() }, 3, [0.0, 0.0, 1.0]);

        let after_snapshot = find_origin_tile(&snapshot);
        assert_eq!(before, after_snapshot, "a held snapshot must be immune to later writes");
    }

    #[test]
    fn smudge_blends_toward_previously_painted_color() {
        let mut mgr = TileManager::new(PixelFormat::RgbaPremul8, 64);
        // Lay down a solid red patch to smudge from.
        paint_straight_stroke(&mut mgr, BrushParams { radius_min: 10.0, radius_max: 10.0, spacing: 0.2, ..BrushParams::default() }, 4, [1.0, 0.0, 0.0]);

        let mut smudge_brush = Brush::new(BrushParams { radius_min: 8.0, radius_max: 8.0, spacing: 0.2, smudge: 0.8, smudge_var: 0.8, ..BrushParams::default() }, 5);
        smudge_brush.set_color([0.0, 0.0, 1.0]);
        smudge_brush.stroke_start(&mgr, StrokeEvent::new((10, 50), (10.0, 50.0), 0.8, 0.0)).unwrap();
        for i in 1..30 {
            let x = 10.0 + i as f32 * 2.0;
            smudge_brush.draw_stroke(&mut mgr, StrokeEvent::new((x as i32, 50), (x, 50.0), 0.8, i as f32 * 0.02)).unwrap();
        }
        smudge_brush.stroke_end(&mut mgr).unwrap();

        assert!(smudge_brush.color()[0] > 0.0, "smudging over red paint should pull red into the stroke color");
    }

    #[test]
    fn an_untouched_canvas_yields_no_pickup() {
        let mgr = TileManager::new(PixelFormat::RgbaPremul8, 64);
        let mut cache = vellum_brush::PixbufCache::new();
        let sampled = vellum_brush::get_dab_color(&mgr, &mut cache, 100.0, 100.0, 6.0, 1.0, 1.0, 1.0, 0.0);
        assert!(sampled.is_none());
    }

    #[test]
    fn painted_stroke_is_visible_through_the_affine_display_path() {
        let mut mgr = TileManager::new(PixelFormat::RgbaPremul8, 64);
        paint_straight_stroke(&mut mgr, BrushParams { radius_min: 6.0, radius_max: 6.0, spacing: 0.2, ..BrushParams::default() }, 6, [0.2, 0.8, 0.3]);

        let mut dst = Pixbuf::new(PixelFormat::Rgb8, 128, 128).unwrap();
        vellum_tiles::blit_affine(&mgr, &mut dst, &AffineTransform::IDENTITY, Filter::Bilinear, false).unwrap();

        let px = dst.get_pixel(10, 50).unwrap();
        assert!(px[1] > px[0], "sampled pixel along the stroke's path should be green-dominant");
    }
}
