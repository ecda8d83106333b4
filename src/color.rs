use image::Rgb;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb<u8>> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0 + 210.0;
            let hsl = Hsl::new(hue, 0.6, 0.45);
            let rgb: Srgb = hsl.into_color();
            Rgb([
                (rgb.red * 255.0).round() as u8,
                (rgb.green * 255.0).round() as u8,
                (rgb.blue * 255.0).round() as u8,
            ])
        })
        .collect()
}

/// Bar colour for the `index`-th of `total` profiled columns.
pub fn column_colour(index: usize, total: usize) -> Rgb<u8> {
    let palette = generate_palette(total.max(1));
    palette[index % palette.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        let p = generate_palette(3);
        assert_eq!(p.len(), 3);
        assert_ne!(p[0], p[1]);
        assert_ne!(p[1], p[2]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn column_colour_wraps_and_tolerates_zero_total() {
        assert_eq!(column_colour(4, 3), column_colour(1, 3));
        assert_eq!(column_colour(0, 0), generate_palette(1)[0]);
    }
}
