use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

use crate::core::trace::IntensityTrace;
use crate::core::types::Nucleotide;

/// Height of the rendered plot in pixels
pub const PLOT_HEIGHT: u32 = 240;
/// Minimum and maximum plot width in pixels
pub const MIN_PLOT_WIDTH: u32 = 200;
pub const MAX_PLOT_WIDTH: u32 = 4096;

const MARGIN: u32 = 10;
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([160, 160, 160]);

/// Line colour used for a base's channel
#[must_use]
pub fn channel_color(base: Nucleotide) -> Rgb<u8> {
    match base {
        Nucleotide::A => Rgb([220, 30, 30]),
        Nucleotide::T => Rgb([30, 160, 30]),
        Nucleotide::C => Rgb([30, 60, 220]),
        Nucleotide::G => Rgb([230, 180, 0]),
    }
}

/// Render a trace as a four-colour line plot and return PNG bytes.
///
/// `called` holds the sample indices that produced a base call; each is marked
/// on the curve of the winning channel.
///
/// # Errors
///
/// Returns an error if PNG encoding fails.
pub fn render_chromatogram(
    trace: &IntensityTrace,
    called: &[(usize, Nucleotide)],
) -> Result<Vec<u8>, image::ImageError> {
    let image = render_image(trace, called);
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

fn render_image(trace: &IntensityTrace, called: &[(usize, Nucleotide)]) -> RgbImage {
    let samples = u32::try_from(trace.len()).unwrap_or(u32::MAX);
    let width = samples.clamp(MIN_PLOT_WIDTH, MAX_PLOT_WIDTH);
    let mut image = RgbImage::from_pixel(width, PLOT_HEIGHT, BACKGROUND);

    let plot_w = width - 2 * MARGIN;
    let plot_h = PLOT_HEIGHT - 2 * MARGIN;
    let baseline = PLOT_HEIGHT - MARGIN;
    draw_line(
        &mut image,
        to_i32(MARGIN),
        to_i32(baseline),
        to_i32(width - MARGIN),
        to_i32(baseline),
        AXIS,
    );

    if trace.is_empty() {
        return image;
    }

    let to_px = |index: usize, value: f64| -> (i32, i32) {
        let span = trace.len().saturating_sub(1).max(1);
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let x = f64::from(MARGIN) + (index as f64 / span as f64) * f64::from(plot_w);
        #[allow(clippy::cast_possible_truncation)]
        let y = f64::from(baseline) - value.clamp(0.0, 1.0) * f64::from(plot_h);
        #[allow(clippy::cast_possible_truncation)]
        (x.round() as i32, y.round() as i32)
    };

    for base in Nucleotide::PRIORITY {
        let color = channel_color(base);
        let values = trace.channel(base);
        let mut last: Option<(i32, i32)> = None;
        for (i, &v) in values.iter().enumerate() {
            let (x, y) = to_px(i, v);
            match last {
                Some((lx, ly)) => draw_line(&mut image, lx, ly, x, y, color),
                None => put_pixel_checked(&mut image, x, y, color),
            }
            last = Some((x, y));
        }
    }

    for &(index, base) in called {
        if let Some(&v) = trace.channel(base).get(index) {
            let (x, y) = to_px(index, v);
            draw_marker(&mut image, x, y, channel_color(base));
        }
    }

    image
}

fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

fn put_pixel_checked(image: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) {
        if x < image.width() && y < image.height() {
            image.put_pixel(x, y, color);
        }
    }
}

fn draw_marker(image: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    for dy in -2..=2 {
        for dx in -2..=2 {
            put_pixel_checked(image, x + dx, y + dy, color);
        }
    }
}

/// Bresenham line
fn draw_line(image: &mut RgbImage, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb<u8>) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel_checked(image, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
