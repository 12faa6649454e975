//! Tests for transition counting, normalization and model building

#[cfg(test)]
mod tests {
    use chromachain::analysis::transitions::{TransitionCounts, count_transitions};
    use chromachain::{Color, ModelBuilder, PixelGrid, TransitionTable, build_model};
    use image::{Rgb, RgbImage};
    use std::collections::BTreeMap;

    fn c(value: u8) -> Color {
        Color::new(value, 0, 0)
    }

    // Tests observation tally
    #[test]
    fn test_counts_observe_and_total() {
        let mut counts = TransitionCounts::new();
        counts.observe(c(1), c(2));
        counts.observe(c(1), c(2));
        counts.observe(c(1), c(3));
        counts.observe(c(3), c(1));

        assert_eq!(counts.count(c(1), c(2)), 2);
        assert_eq!(counts.count(c(1), c(3)), 1);
        assert_eq!(counts.count(c(2), c(1)), 0);
        assert_eq!(counts.total(), 4);
    }

    // Tests row normalization
    // Verified by 2:1 counts becoming 2/3 and 1/3
    #[test]
    fn test_normalize_divides_by_row_total() {
        let mut counts = TransitionCounts::new();
        counts.observe(c(1), c(2));
        counts.observe(c(1), c(2));
        counts.observe(c(1), c(3));
        counts.observe(c(3), c(3));

        let table = counts.normalize();

        assert!((table.probability(c(1), c(2)) - 2.0 / 3.0).abs() < 1e-12);
        assert!((table.probability(c(1), c(3)) - 1.0 / 3.0).abs() < 1e-12);
        assert!((table.probability(c(3), c(3)) - 1.0).abs() < 1e-12);
        assert!(table.probability(c(2), c(1)).abs() < f64::EPSILON);
        assert!(table.is_normalized());
        assert_eq!(table.alphabet(), vec![c(1), c(3)]);
    }

    // Tests the scan skips column 0 and row 0 after the seed
    // Verified by a 3x3 grid where each cell has a distinct color
    #[test]
    fn test_count_transitions_follows_scan_order() {
        let mut grid = PixelGrid::new(3, 3, Color::BLACK);
        for column in 0..3 {
            for row in 0..3 {
                grid.set(column, row, c((column * 10 + row) as u8));
            }
        }

        let counts = count_transitions(&grid);

        // Seed (0,0) then (1,1), (1,2), (2,1), (2,2)
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.count(c(0), c(11)), 1);
        assert_eq!(counts.count(c(11), c(12)), 1);
        assert_eq!(counts.count(c(12), c(21)), 1);
        assert_eq!(counts.count(c(21), c(22)), 1);
        assert_eq!(counts.count(c(0), c(1)), 0);
        assert_eq!(counts.count(c(0), c(10)), 0);
    }

    // Tests degenerate grids produce no observations
    #[test]
    fn test_count_transitions_single_row_or_column_is_empty() {
        let row = PixelGrid::new(5, 1, Color::WHITE);
        let column = PixelGrid::new(1, 5, Color::WHITE);
        let empty = PixelGrid::new(0, 0, Color::WHITE);

        assert_eq!(count_transitions(&row).total(), 0);
        assert_eq!(count_transitions(&column).total(), 0);
        assert_eq!(count_transitions(&empty).total(), 0);
        assert!(count_transitions(&row).normalize().is_empty());
    }

    // Tests rows given directly are validated
    #[test]
    fn test_from_rows_rejects_invalid_probabilities() {
        let negative: &[(&str, f64)] = &[("#000000", -0.1)];
        let infinite: &[(&str, f64)] = &[("#000000", f64::INFINITY)];
        let not_a_number: &[(&str, f64)] = &[("#000000", f64::NAN)];
        let empty: &[(&str, f64)] = &[];

        assert!(TransitionTable::from_hex_rows(&[("#000000", negative)]).is_err());
        assert!(TransitionTable::from_hex_rows(&[("#000000", infinite)]).is_err());
        assert!(TransitionTable::from_hex_rows(&[("#000000", not_a_number)]).is_err());
        assert!(TransitionTable::from_hex_rows(&[("black", empty)]).is_err());
    }

    // Tests unnormalized rows are accepted but reported
    #[test]
    fn test_is_normalized_detects_drift() {
        let drifting: &[(&str, f64)] = &[("#000000", 0.5), ("#ffffff", 0.4)];
        let table = TransitionTable::from_hex_rows(&[("#000000", drifting)]).unwrap();

        assert!(!table.is_normalized());
        assert!(table.contains(Color::BLACK));
        assert!(!table.contains(Color::WHITE));
        assert_eq!(table.len(), 1);
    }

    // Tests JSON export keyed by hex colors
    // Verified by reading the exported document back
    #[test]
    fn test_json_keys_are_hex() {
        let row: &[(&str, f64)] = &[("#ff0000", 0.25), ("#00ff00", 0.75)];
        let table = TransitionTable::from_hex_rows(&[("#ff0000", row)]).unwrap();

        let json = table.to_json().unwrap();
        assert!(json.contains("\"#ff0000\""));
        assert!(json.contains("\"#00ff00\""));

        let restored = TransitionTable::from_json(&json).unwrap();
        assert_eq!(restored, table);
        assert!(TransitionTable::from_json("{\"red\": {}}").is_err());
        assert!(TransitionTable::from_json("{\"#+f+f+f\": {}}").is_err());
    }

    // Tests explicit rows keep their key order
    #[test]
    fn test_rows_enumerate_in_key_order() {
        let mut rows = BTreeMap::new();
        rows.insert(Color::WHITE, BTreeMap::from([(Color::BLACK, 1.0)]));
        rows.insert(Color::BLACK, BTreeMap::from([(Color::WHITE, 1.0)]));
        let table = TransitionTable::from_rows(rows).unwrap();

        let sources: Vec<Color> = table.rows().map(|(color, _)| color).collect();
        assert_eq!(sources, vec![Color::BLACK, Color::WHITE]);
        assert_eq!(table.row(Color::BLACK).map(BTreeMap::len), Some(1));
    }

    // Tests builder bound validation
    #[test]
    fn test_model_builder_bounds() {
        assert_eq!(ModelBuilder::default().max_colors(), 50);
        assert_eq!(ModelBuilder::new(1).unwrap().max_colors(), 1);
        assert!(ModelBuilder::new(0).is_err());
        assert!(ModelBuilder::new(51).is_err());
    }

    // Tests a two-color striped image
    // Verified by vertical stripes alternating every column
    #[test]
    fn test_build_model_on_stripes() {
        // Row 0 and column 0 never follow anything, so only rows 1.. of
        // columns 1.. contribute after the seed
        let image = RgbImage::from_fn(4, 3, |x, _| {
            if x % 2 == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        });

        let table = build_model(&image).unwrap();

        // Seed black, then white white, black black, white white
        assert!((table.probability(Color::BLACK, Color::WHITE) - 2.0 / 3.0).abs() < 1e-12);
        assert!((table.probability(Color::BLACK, Color::BLACK) - 1.0 / 3.0).abs() < 1e-12);
        assert!((table.probability(Color::WHITE, Color::WHITE) - 2.0 / 3.0).abs() < 1e-12);
        assert!((table.probability(Color::WHITE, Color::BLACK) - 1.0 / 3.0).abs() < 1e-12);
        assert!(table.is_normalized());
    }

    // Tests quantization happens before counting
    #[test]
    fn test_build_quantizes_to_bound() {
        let image = RgbImage::from_fn(16, 16, |x, y| Rgb([(x * 16) as u8, (y * 16) as u8, 77]));

        let table = ModelBuilder::new(4).unwrap().build(&image).unwrap();

        let mut seen: Vec<Color> = table
            .rows()
            .flat_map(|(source, row)| std::iter::once(source).chain(row.keys().copied()))
            .collect();
        seen.sort();
        seen.dedup();
        assert!(seen.len() <= 4, "found {} colors", seen.len());
    }
}
