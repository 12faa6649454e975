//! Tests for median-cut palette reduction

#[cfg(test)]
mod tests {
    use chromachain::Color;
    use chromachain::PixelGrid;
    use chromachain::analysis::quantization::{color_histogram, median_cut, quantize};
    use std::collections::BTreeMap;

    fn histogram(entries: &[(Color, usize)]) -> BTreeMap<Color, usize> {
        entries.iter().copied().collect()
    }

    // Tests pixel counting per distinct color
    #[test]
    fn test_color_histogram_counts_pixels() {
        let mut grid = PixelGrid::new(3, 2, Color::BLACK);
        grid.set(1, 1, Color::WHITE);
        grid.set(2, 0, Color::WHITE);

        let counts = color_histogram(&grid);

        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get(&Color::BLACK), Some(&4));
        assert_eq!(counts.get(&Color::WHITE), Some(&2));
    }

    // Tests images already within the bound keep their exact colors
    #[test]
    fn test_median_cut_keeps_small_histograms() {
        let colors = histogram(&[
            (Color::new(1, 2, 3), 4),
            (Color::new(200, 0, 0), 1),
            (Color::WHITE, 9),
        ]);

        let palette = median_cut(&colors, 3).unwrap();

        let expected: Vec<Color> = colors.keys().copied().collect();
        assert_eq!(palette.colors(), expected.as_slice());
    }

    // Tests a single-color bound collapses to the weighted mean
    // Verified by equal black and white populations averaging to mid grey
    #[test]
    fn test_median_cut_single_color_is_weighted_mean() {
        let colors = histogram(&[(Color::BLACK, 10), (Color::WHITE, 10)]);

        let palette = median_cut(&colors, 1).unwrap();

        assert_eq!(palette.colors(), &[Color::new(128, 128, 128)]);
    }

    // Tests the cut falls at the weighted median of the widest channel
    // Verified by two close heavy reds merging while the distant light red stays alone
    #[test]
    fn test_median_cut_splits_at_weighted_median() {
        let colors = histogram(&[
            (Color::new(0, 0, 0), 5),
            (Color::new(10, 0, 0), 5),
            (Color::new(250, 0, 0), 1),
        ]);

        let palette = median_cut(&colors, 2).unwrap();

        assert_eq!(
            palette.colors(),
            &[Color::new(5, 0, 0), Color::new(250, 0, 0)]
        );
    }

    // Tests the palette never exceeds the bound on a dense histogram
    #[test]
    fn test_median_cut_respects_bound() {
        let colors: BTreeMap<Color, usize> = (0..=255u8)
            .map(|v| (Color::new(v, v.wrapping_mul(7), 255 - v), usize::from(v % 5) + 1))
            .collect();

        for bound in [1, 2, 7, 16, 50] {
            let palette = median_cut(&colors, bound).unwrap();
            assert!(palette.len() <= bound, "bound {bound} gave {}", palette.len());
            assert!(!palette.is_empty());
            assert!(palette.colors().windows(2).all(|w| w[0] < w[1]));
        }
    }

    // Tests rejection of out-of-range bounds
    #[test]
    fn test_median_cut_rejects_invalid_bounds() {
        let colors = histogram(&[(Color::BLACK, 1)]);

        assert!(median_cut(&colors, 0).is_err());
        assert!(median_cut(&colors, 51).is_err());
        assert!(median_cut(&colors, 50).is_ok());
    }

    // Tests nearest palette color lookup
    // Verified by equidistant input resolving to the earlier entry
    #[test]
    fn test_nearest_prefers_earlier_entry_on_tie() {
        let colors = histogram(&[(Color::new(0, 0, 0), 1), (Color::new(20, 0, 0), 1)]);
        let palette = median_cut(&colors, 2).unwrap();

        assert_eq!(palette.nearest(Color::new(3, 0, 0)), Color::new(0, 0, 0));
        assert_eq!(palette.nearest(Color::new(17, 1, 0)), Color::new(20, 0, 0));
        assert_eq!(palette.nearest(Color::new(10, 0, 0)), Color::new(0, 0, 0));
    }

    // Tests every quantized pixel belongs to the palette
    #[test]
    fn test_quantize_maps_into_palette() {
        let mut grid = PixelGrid::new(8, 8, Color::BLACK);
        for column in 0..8 {
            for row in 0..8 {
                let value = (column * 32 + row * 4) as u8;
                grid.set(column, row, Color::new(value, 255 - value, value / 2));
            }
        }

        let (quantized, palette) = quantize(&grid, 6).unwrap();

        assert!(palette.len() <= 6);
        assert_eq!(quantized.width(), 8);
        assert_eq!(quantized.height(), 8);
        assert!(quantized.scan().all(|c| palette.colors().contains(&c)));
        assert!(color_histogram(&quantized).len() <= 6);
    }
}
