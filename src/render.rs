use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};

use crate::config::Figure;
use crate::histogram::Histogram;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXES: Rgb<u8> = Rgb([0, 0, 0]);

// Plot area as fractions of the canvas (left, right, top, bottom).
const MARGIN_LEFT: f64 = 0.125;
const MARGIN_RIGHT: f64 = 0.1;
const MARGIN_TOP: f64 = 0.12;
const MARGIN_BOTTOM: f64 = 0.11;

const TICKS: usize = 5;

/// Pixel rectangle of the axes box, inclusive on all sides.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PlotArea {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl PlotArea {
    fn for_canvas(width: u32, height: u32) -> Self {
        let w = width as f64;
        let h = height as f64;
        PlotArea {
            x0: (w * MARGIN_LEFT).round() as u32,
            x1: (w * (1.0 - MARGIN_RIGHT)).round() as u32,
            y0: (h * MARGIN_TOP).round() as u32,
            y1: (h * (1.0 - MARGIN_BOTTOM)).round() as u32,
        }
    }

    fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

// ---------------------------------------------------------------------------
// Histogram rendering
// ---------------------------------------------------------------------------

/// Draw `hist` as a bar chart: one filled bar per bin, heights scaled to the
/// tallest bin, inside a black axes box with tick marks on both axes.
pub fn render_histogram(hist: &Histogram, figure: &Figure, bar: Rgb<u8>) -> RgbImage {
    let (width, height) = figure.pixel_size();
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    let area = PlotArea::for_canvas(width, height);

    let max = hist.max_count();
    if max > 0 {
        let bins = hist.bins() as f64;
        let inner_w = area.width() as f64;
        let inner_h = area.height() as f64;

        for (i, &count) in hist.counts().iter().enumerate() {
            if count == 0 {
                continue;
            }
            let left = area.x0 + (inner_w * i as f64 / bins).round() as u32;
            let right = area.x0 + (inner_w * (i + 1) as f64 / bins).round() as u32;
            let bar_h = (inner_h * count as f64 / max as f64).round() as u32;
            // keep a non-empty bin visible
            let bar_h = bar_h.max(1);
            fill_rect(&mut img, left, area.y1.saturating_sub(bar_h), right, area.y1, bar);
        }
    }

    draw_axes(&mut img, area);
    img
}

fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let x1 = x1.min(img.width());
    let y1 = y1.min(img.height());
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, color);
        }
    }
}

fn draw_axes(img: &mut RgbImage, area: PlotArea) {
    // box
    fill_rect(img, area.x0, area.y0, area.x1 + 1, area.y0 + 1, AXES);
    fill_rect(img, area.x0, area.y1, area.x1 + 1, area.y1 + 1, AXES);
    fill_rect(img, area.x0, area.y0, area.x0 + 1, area.y1 + 1, AXES);
    fill_rect(img, area.x1, area.y0, area.x1 + 1, area.y1 + 1, AXES);

    let tick_len = (img.height() / 100).max(3);
    for t in 0..=TICKS {
        let x = area.x0 + area.width() * t as u32 / TICKS as u32;
        fill_rect(img, x, area.y1 + 1, x + 1, area.y1 + 1 + tick_len, AXES);

        let y = area.y1 - area.height() * t as u32 / TICKS as u32;
        fill_rect(img, area.x0.saturating_sub(tick_len), y, area.x0, y + 1, AXES);
    }
}

/// Write the image as PNG, creating the parent directory if needed.
pub fn save_png(img: &RgbImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAR: Rgb<u8> = Rgb([30, 90, 200]);

    #[test]
    fn canvas_matches_figure_geometry() {
        let hist = Histogram::compute(&[1.0, 2.0, 3.0], 3).unwrap();
        let img = render_histogram(&hist, &Figure::default(), BAR);
        assert_eq!(img.dimensions(), (576, 576));
    }

    #[test]
    fn tallest_bin_reaches_top_of_plot_area() {
        let hist = Histogram::compute(&[0.0, 0.0, 0.0, 1.0], 2).unwrap();
        let img = render_histogram(&hist, &Figure::default(), BAR);
        let area = PlotArea::for_canvas(576, 576);

        // middle of the first (tallest) bar, just under the top border
        let x = area.x0 + area.width() / 4;
        assert_eq!(*img.get_pixel(x, area.y0 + 2), BAR);

        // second bar is a third as tall, so the upper part of its column is blank
        let x = area.x0 + area.width() * 3 / 4;
        assert_eq!(*img.get_pixel(x, area.y0 + 2), BACKGROUND);
        assert_eq!(*img.get_pixel(x, area.y1 - 2), BAR);
    }

    #[test]
    fn empty_histogram_draws_only_axes() {
        let hist = Histogram::compute(&[], 10).unwrap();
        let img = render_histogram(&hist, &Figure::default(), BAR);
        assert!(img.pixels().all(|p| *p != BAR));
        let area = PlotArea::for_canvas(576, 576);
        assert_eq!(*img.get_pixel(area.x0, area.y0), AXES);
    }

    #[test]
    fn save_writes_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/hist.png");
        let hist = Histogram::compute(&[1.0], 1).unwrap();
        save_png(&render_histogram(&hist, &Figure::default(), BAR), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
