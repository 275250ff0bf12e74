//! Zone-map rendering: a viridis-colored heatmap of the measurement
//! grid, upscaled, with black borders between adjacent cells of
//! different zones, a white outer frame, and optional zone labels.

use anyhow::{ensure, Context, Result};
use image::{imageops, Rgb, RgbImage};
use ndarray::Array2;
use std::path::Path;

/// Viridis colormap anchors at t = 0, 1/8, ..., 1.
const VIRIDIS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 44, 122],
    [59, 81, 139],
    [44, 113, 142],
    [33, 144, 141],
    [39, 173, 129],
    [92, 200, 99],
    [170, 220, 50],
    [253, 231, 37],
];

/// Width of the white outer frame, in pixels.
const FRAME: u32 = 2;

fn viridis(t: f64) -> Rgb<u8> {
    let scaled = t.clamp(0.0, 1.0) * (VIRIDIS.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let f = scaled - i as f64;
    let a = VIRIDIS[i];
    let b = VIRIDIS[i + 1];
    let mix = |lo: u8, hi: u8| (lo as f64 + (hi as f64 - lo as f64) * f).round() as u8;
    Rgb([mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])])
}

/// Renders the measurement grid colored by value with the zone
/// partition overlaid. `factor` is the integer upscaling factor; the
/// output image is `(cols·factor + 4) × (rows·factor + 4)` including the
/// frame. Zone ids are displayed 1-based when `show_labels` is set; the
/// zone grid itself stays 0-based.
pub fn render_zone_map(
    grid: &Array2<f64>,
    zones: &Array2<usize>,
    factor: u32,
    show_labels: bool,
) -> Result<RgbImage> {
    ensure!(
        grid.dim() == zones.dim(),
        "zone grid {:?} does not match data grid {:?}",
        zones.dim(),
        grid.dim()
    );
    ensure!(factor >= 1, "upscaling factor must be at least 1");
    let (rows, cols) = grid.dim();

    // min-max normalize the measurements onto the colormap
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in grid.iter() {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    let span = if hi > lo { hi - lo } else { 1.0 };

    let mut base = RgbImage::new(cols as u32, rows as u32);
    for ((r, c), &v) in grid.indexed_iter() {
        base.put_pixel(c as u32, r as u32, viridis((v - lo) / span));
    }

    let width = cols as u32 * factor;
    let height = rows as u32 * factor;
    let mut scaled = imageops::resize(&base, width, height, imageops::FilterType::CatmullRom);

    // Black pixel wherever the zone changes toward the right or down
    // neighbor; zones are looked up nearest-neighbor per pixel.
    let zone_at = |x: u32, y: u32| zones[[(y / factor) as usize, (x / factor) as usize]];
    for y in 0..height {
        for x in 0..width {
            let zone = zone_at(x, y);
            let border = (x + 1 < width && zone_at(x + 1, y) != zone)
                || (y + 1 < height && zone_at(x, y + 1) != zone);
            if border {
                scaled.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
    }

    let mut framed = RgbImage::from_pixel(
        width + 2 * FRAME,
        height + 2 * FRAME,
        Rgb([255, 255, 255]),
    );
    imageops::overlay(&mut framed, &scaled, FRAME as i64, FRAME as i64);

    if show_labels {
        draw_labels(&mut framed, zones, factor);
    }
    Ok(framed)
}

/// Renders and writes the zone map as PNG.
pub fn save_zone_map(
    path: &Path,
    grid: &Array2<f64>,
    zones: &Array2<usize>,
    factor: u32,
    show_labels: bool,
) -> Result<()> {
    let img = render_zone_map(grid, zones, factor, show_labels)?;
    img.save(path)
        .with_context(|| format!("writing zone map {}", path.display()))?;
    Ok(())
}

/// 5×7 bitmaps for '0'..'9', one row per byte, low 5 bits used.
const DIGITS: [[u8; 7]; 10] = [
    [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
    [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
    [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
    [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
    [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
    [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
    [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
    [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
    [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
];

/// Draws each zone's 1-based id centered on the zone's cell centroid.
/// Empty zones get no label.
fn draw_labels(img: &mut RgbImage, zones: &Array2<usize>, factor: u32) {
    let zone_count = zones.iter().copied().max().map_or(0, |m| m + 1);
    let mut counts = vec![0usize; zone_count];
    let mut row_sums = vec![0usize; zone_count];
    let mut col_sums = vec![0usize; zone_count];
    for ((r, c), &z) in zones.indexed_iter() {
        counts[z] += 1;
        row_sums[z] += r;
        col_sums[z] += c;
    }

    let scale = (factor / 10).max(1);
    for z in 0..zone_count {
        if counts[z] == 0 {
            continue;
        }
        let n = counts[z] as f64;
        let cy = FRAME + ((row_sums[z] as f64 / n + 0.5) * factor as f64) as u32;
        let cx = FRAME + ((col_sums[z] as f64 / n + 0.5) * factor as f64) as u32;
        draw_number(img, z + 1, cx, cy, scale);
    }
}

/// Draws a decimal number in the embedded 5×7 font, centered at
/// `(cx, cy)`, white over a black drop shadow for contrast on any
/// colormap background.
fn draw_number(img: &mut RgbImage, value: usize, cx: u32, cy: u32, scale: u32) {
    let text = value.to_string();
    let glyph_w = 5 * scale;
    let glyph_h = 7 * scale;
    let total_w = text.len() as u32 * (glyph_w + scale) - scale;
    let x0 = cx.saturating_sub(total_w / 2);
    let y0 = cy.saturating_sub(glyph_h / 2);

    for (i, ch) in text.chars().enumerate() {
        let digit = match ch.to_digit(10) {
            Some(d) => d as usize,
            None => continue,
        };
        let gx = x0 + i as u32 * (glyph_w + scale);
        for (row, bits) in DIGITS[digit].iter().enumerate() {
            for col in 0..5u32 {
                if bits >> (4 - col) & 1 == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let x = gx + col * scale + dx;
                        let y = y0 + row as u32 * scale + dy;
                        put_if_inside(img, x + 1, y + 1, Rgb([0, 0, 0]));
                        put_if_inside(img, x, y, Rgb([255, 255, 255]));
                    }
                }
            }
        }
    }
}

fn put_if_inside(img: &mut RgbImage, x: u32, y: u32, color: Rgb<u8>) {
    if x < img.width() && y < img.height() {
        img.put_pixel(x, y, color);
    }
}
