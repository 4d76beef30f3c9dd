//! vellum - demo CLI driving a scripted stroke through the Vellum painting
//! core and rendering the result to a PNG.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use vellum_brush::{Brush, BrushParams, StrokeEvent};
use vellum_core::{Pixbuf, PixelFormat};
use vellum_tiles::{AffineTransform, Filter as SampleFilter, TileManager};

/// Renders a scripted demo stroke through the brush engine and writes it
/// as a PNG.
#[derive(Parser)]
#[command(name = "vellum", author, version, about = "Vellum painting-core demo CLI")]
struct Cli {
    /// Output PNG path.
    #[arg(short, long, default_value = "stroke.png")]
    out: PathBuf,

    /// Canvas tile size.
    #[arg(long, default_value_t = 64)]
    tile_size: u32,

    /// Output image width in pixels.
    #[arg(long, default_value_t = 512)]
    width: u32,

    /// Output image height in pixels.
    #[arg(long, default_value_t = 512)]
    height: u32,

    /// Brush random seed.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Dab radius at full pressure.
    #[arg(long, default_value_t = 14.0)]
    radius: f32,

    /// Falloff hardness, `(0, 1]`.
    #[arg(long, default_value_t = 0.6)]
    hardness: f32,

    /// Dab spacing as a fraction of radius.
    #[arg(long, default_value_t = 0.15)]
    spacing: f32,

    /// Smudge blend factor, `[0, 1]`.
    #[arg(long, default_value_t = 0.0)]
    smudge: f32,

    /// Stroke color, as `r,g,b` floats in `[0, 1]`.
    #[arg(long, default_value = "0.1,0.35,0.85")]
    color: String,

    /// Verbose logging (`-v` info, `-vv` debug, `-vvv` trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write a trace log to this file instead of stderr.
    #[arg(long)]
    log: Option<PathBuf>,
}

fn init_tracing(verbose: u8, log_path: Option<&PathBuf>) {
    let filter = match verbose {
        0 => "warn",
        1 => "vellum=info",
        2 => "vellum=debug",
        _ => "vellum=trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if let Some(path) = log_path {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| std::path::Path::new("."));
        let filename = path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("vellum.log"));
        let appender = tracing_appender::rolling::never(dir, filename);
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(fmt::time::uptime())
            .with_ansi(false)
            .with_writer(appender)
            .init();
    } else if verbose > 0 {
        tracing_subscriber::fmt().with_env_filter(env_filter).with_timer(fmt::time::uptime()).init();
    }
}

fn parse_color(s: &str) -> Result<[f32; 3]> {
    let parts: Vec<f32> = s.split(',').map(|p| p.trim().parse::<f32>()).collect::<std::result::Result<_, _>>().context("--color must be `r,g,b` floats")?;
    anyhow::ensure!(parts.len() == 3, "--color must have exactly three components");
    Ok([parts[0], parts[1], parts[2]])
}

/// Synthesizes a deterministic wavy demo path across the canvas.
fn demo_path(width: u32, height: u32) -> Vec<(f32, f32, f32, f32)> {
    let mut points = Vec::new();
    let margin = (width.min(height) as f32) * 0.15;
    let steps = 120;
    for i in 0..=steps {
        let frac = i as f32 / steps as f32;
        let x = margin + frac * (width as f32 - 2.0 * margin);
        let y = height as f32 / 2.0 + (frac * std::f32::consts::TAU * 2.0).sin() * height as f32 * 0.2;
        let pressure = 0.3 + 0.7 * (frac * std::f32::consts::PI).sin().abs();
        let time = frac * 2.0;
        points.push((x, y, pressure, time));
    }
    points
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log.as_ref());

    let color = parse_color(&cli.color)?;
    let params = BrushParams { radius_min: cli.radius * 0.3, radius_max: cli.radius, hardness: cli.hardness, spacing: cli.spacing, smudge: cli.smudge, ..BrushParams::default() };

    let mut mgr = TileManager::new(PixelFormat::RgbaPremul8, cli.tile_size);
    let mut brush = Brush::new(params, cli.seed);
    brush.set_color(color);

    let path = demo_path(cli.width, cli.height);
    let (x0, y0, p0, t0) = path[0];
    brush.stroke_start(&mgr, StrokeEvent::new((x0 as i32, y0 as i32), (x0, y0), p0, t0))?;
    for &(x, y, pressure, time) in &path[1..] {
        brush.draw_stroke(&mut mgr, StrokeEvent::new((x as i32, y as i32), (x, y), pressure, time))?;
    }
    let damaged = brush.stroke_end(&mut mgr)?;
    tracing::info!(?damaged, tiles = mgr.len(), "stroke complete");

    let mut dst = Pixbuf::new(PixelFormat::Rgb8, cli.width, cli.height)?;
    let transform = AffineTransform::IDENTITY;
    vellum_tiles::blit_affine(&mgr, &mut dst, &transform, SampleFilter::Bilinear, false)?;

    write_png(&dst, &cli.out)?;
    println!("wrote {}", cli.out.display());
    Ok(())
}

fn write_png(pixbuf: &Pixbuf, path: &PathBuf) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let writer = BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, pixbuf.width(), pixbuf.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;

    let mut rgb = Vec::with_capacity((pixbuf.width() * pixbuf.height() * 3) as usize);
    for y in 0..pixbuf.height() {
        for x in 0..pixbuf.width() {
            let px = pixbuf.get_pixel(x, y)?;
            for c in px.iter().take(3) {
                rgb.push((c.clamp(0.0, 1.0) * 255.0).round() as u8);
            }
        }
    }
    writer.write_image_data(&rgb)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_parses_three_components() {
        assert_eq!(parse_color("0.1, 0.2, 0.3").unwrap(), [0.1, 0.2, 0.3]);
        assert!(parse_color("0.1,0.2").is_err());
    }

    #[test]
    fn demo_path_spans_the_requested_width() {
        let path = demo_path(400, 300);
        let first = path.first().unwrap();
        let last = path.last().unwrap();
        assert!(last.0 > first.0);
    }
}
