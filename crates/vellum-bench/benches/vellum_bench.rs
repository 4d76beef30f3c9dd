//! Benchmarks for the Vellum painting core.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use vellum_brush::{dab, Brush, BrushParams, PixbufCache, StrokeEvent};
use vellum_core::format::{writepixel, ALL_FORMATS};
use vellum_core::PixelFormat;
use vellum_tiles::TileManager;

fn bench_writepixel(c: &mut Criterion) {
    let mut group = c.benchmark_group("writepixel");
    for &format in ALL_FORMATS {
        let ops = format.ops();
        let mut bytes = vec![0u8; ops.bpp as usize];
        group.bench_with_input(BenchmarkId::from_parameter(format!("{format:?}")), &format, |b, &format| {
            b.iter(|| writepixel(format, black_box(&mut bytes), black_box(0.6), black_box(1.0), black_box(&[0.2, 0.5, 0.9])))
        });
    }
    group.finish();
}

fn bench_drawdab_solid(c: &mut Criterion) {
    let mut group = c.benchmark_group("drawdab_solid");
    for radius in [4.0f32, 16.0, 48.0] {
        group.throughput(Throughput::Elements((radius * radius * std::f32::consts::PI) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, &radius| {
            let mut mgr = TileManager::new(PixelFormat::RgbaPremul8, 256);
            let mut cache = PixbufCache::new();
            b.iter(|| {
                dab::drawdab_solid(
                    black_box(&mut mgr),
                    &mut cache,
                    128.0,
                    128.0,
                    radius,
                    1.0,
                    0.6,
                    1.0,
                    1.0,
                    1.0,
                    0.0,
                    0.0,
                    [0.8, 0.3, 0.1],
                    false,
                )
                .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_stroke(c: &mut Criterion) {
    let mut group = c.benchmark_group("stroke");
    group.bench_function("200_point_stroke", |b| {
        b.iter(|| {
            let mut mgr = TileManager::new(PixelFormat::RgbaPremul8, 64);
            let mut brush = Brush::new(BrushParams { radius_min: 6.0, radius_max: 6.0, spacing: 0.2, ..BrushParams::default() }, 1);
            brush.set_color([0.2, 0.4, 0.8]);
            brush.stroke_start(&mgr, StrokeEvent::new((0, 0), (0.0, 0.0), 0.7, 0.0)).unwrap();
            for i in 1..200 {
                let x = i as f32 * 2.0;
                let y = (i as f32 * 0.1).sin() * 20.0;
                brush.draw_stroke(&mut mgr, StrokeEvent::new((x as i32, y as i32), (x, y), 0.7, i as f32 * 0.01)).unwrap();
            }
            brush.stroke_end(&mut mgr).unwrap();
            black_box(mgr.len())
        })
    });
    group.finish();
}

fn bench_get_tiles_under_churn(c: &mut Criterion) {
    c.bench_function("get_tiles_under_churn", |b| {
        b.iter(|| {
            let mut mgr = TileManager::new(PixelFormat::Rgb8, 64);
            for i in 0..64i64 {
                mgr.get_tile_mut(i * 64, 0, true).unwrap();
            }
            let rect = vellum_core::Rect::new(0, 0, 64 * 64, 64);
            black_box(mgr.get_tiles(&rect, false).unwrap().len())
        })
    });
}

criterion_group!(benches, bench_writepixel, bench_drawdab_solid, bench_stroke, bench_get_tiles_under_churn);
criterion_main!(benches);
