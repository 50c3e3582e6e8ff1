// src/pie_chart_tests.rs

#[cfg(test)]
mod tests {
    use crate::aggregation::{EmployeeTotal, RankedSummary};
    use crate::error::ReportError;
    use crate::pie_chart::*;
    use resvg::tiny_skia::Pixmap;

    fn summary_of(rows: &[(&str, f64)]) -> RankedSummary {
        RankedSummary::from_totals(
            rows.iter()
                .map(|(name, hours)| EmployeeTotal {
                    name: name.to_string(),
                    total_hours: *hours,
                })
                .collect(),
        )
    }

    fn rgb_at(pixmap: &Pixmap, x: u32, y: u32) -> (u8, u8, u8) {
        let px = pixmap.pixel(x, y).expect("pixel inside canvas");
        assert_eq!(px.alpha(), 255, "pixel ({}, {}) should be opaque", x, y);
        (px.red(), px.green(), px.blue())
    }

    fn pie_point(angle_deg: f64, radius: f64) -> (u32, u32) {
        let (px, py, side) = PIE_BOUNDS;
        let (cx, cy) = (px + side / 2.0, py + side / 2.0);
        let rad = angle_deg.to_radians();
        (
            (cx + radius * rad.cos()).round() as u32,
            (cy + radius * rad.sin()).round() as u32,
        )
    }

    #[test]
    fn test_slice_angles_for_alice_and_bob() {
        let slices = slice_layout(&summary_of(&[("Alice", 10.0), ("Bob", 1.0)])).unwrap();
        assert_eq!(slices.len(), 2);

        assert_eq!(slices[0].start_angle, 0.0);
        assert!((slices[0].sweep_angle - 327.27).abs() < 0.01, "{:?}", slices[0]);
        assert!((slices[1].start_angle - 327.27).abs() < 0.01, "{:?}", slices[1]);
        assert!((slices[1].sweep_angle - 32.73).abs() < 0.01, "{:?}", slices[1]);

        let total: f64 = slices.iter().map(|s| s.sweep_angle).sum();
        assert!((total - 360.0).abs() < 1e-9);

        assert_eq!(slices[0].color, Rgb(255, 0, 0));
        assert_eq!(slices[1].color, Rgb(0, 128, 0));
        assert_eq!(slices[0].label, "Alice - 10.0 h");
        assert_eq!(slices[1].label, "Bob - 1.0 h");
    }

    #[test]
    fn test_palette_cycles_past_its_length() {
        let rows: Vec<(String, f64)> = (0..9).map(|i| (format!("E{}", i), 10.0 - i as f64)).collect();
        let rows: Vec<(&str, f64)> = rows.iter().map(|(n, h)| (n.as_str(), *h)).collect();
        let slices = slice_layout(&summary_of(&rows)).unwrap();

        assert_eq!(slices[7].color, slices[0].color);
        assert_eq!(slices[8].color, slices[1].color);
        assert_eq!(palette_color(PALETTE.len() * 3 + 2), PALETTE[2]);
    }

    #[test]
    fn test_empty_dataset_errors() {
        assert!(matches!(
            slice_layout(&RankedSummary::default()),
            Err(ReportError::EmptyDataset)
        ));
        assert!(matches!(
            slice_layout(&summary_of(&[("Idle", 0.0), ("Also idle", 0.0)])),
            Err(ReportError::EmptyDataset)
        ));
        assert!(matches!(
            render_png(&summary_of(&[("Up", 2.0), ("Down", -2.0)])),
            Err(ReportError::EmptyDataset)
        ));
    }

    #[test]
    fn test_legend_label_one_decimal() {
        assert_eq!(legend_label("Alice", 160.46), "Alice - 160.5 h");
        assert_eq!(legend_label("NULL", 3.0), "NULL - 3.0 h");
    }

    #[test]
    fn test_svg_layout() {
        let svg = render_svg(&summary_of(&[("Alice", 10.0), ("Bob & Co", 1.0)])).unwrap();
        assert!(svg.starts_with("<svg xmlns='http://www.w3.org/2000/svg' width='600' height='400'"));
        assert_eq!(svg.matches("<path ").count(), 2);
        assert!(svg.contains("<rect x='380' y='60' width='20' height='20' fill='#ff0000'/>"));
        assert!(svg.contains("<rect x='380' y='85' width='20' height='20' fill='#008000'/>"));
        assert!(svg.contains(">Alice - 10.0 h</text>"));
        assert!(svg.contains(">Bob &amp; Co - 1.0 h</text>"));
        // Alice's slice covers more than half the pie and is drawn as two arcs.
        let alice_path = svg.lines().find(|l| l.contains("fill='#ff0000' stroke")).unwrap();
        assert_eq!(alice_path.matches(" A ").count(), 2, "{}", alice_path);
        assert!(svg.contains(&format!("font-family='{}'", LEGEND_FONT_FAMILY)));
    }

    #[test]
    fn test_single_employee_is_full_circle() {
        let svg = render_svg(&summary_of(&[("Solo", 42.0)])).unwrap();
        assert!(svg.contains("<circle "));
        assert!(!svg.contains("<path "));
    }

    #[test]
    fn test_png_dimensions_and_colours() {
        let png = render_png(&summary_of(&[("Alice", 10.0), ("Bob", 1.0)])).unwrap();
        let pixmap = Pixmap::decode_png(&png).expect("valid PNG");
        assert_eq!((pixmap.width(), pixmap.height()), (CHART_WIDTH, CHART_HEIGHT));

        // Background
        assert_eq!(rgb_at(&pixmap, 5, 5), (255, 255, 255));
        assert_eq!(rgb_at(&pixmap, 595, 395), (255, 255, 255));

        // Alice's slice runs clockwise from 0 to ~327 degrees.
        let (x, y) = pie_point(90.0, 75.0);
        assert_eq!(rgb_at(&pixmap, x, y), (255, 0, 0));
        let (x, y) = pie_point(200.0, 100.0);
        assert_eq!(rgb_at(&pixmap, x, y), (255, 0, 0));

        // Bob's slice is the last ~33 degrees.
        let (x, y) = pie_point(343.6, 100.0);
        assert_eq!(rgb_at(&pixmap, x, y), (0, 128, 0));

        // Legend swatches
        assert_eq!(rgb_at(&pixmap, 390, 70), (255, 0, 0));
        assert_eq!(rgb_at(&pixmap, 390, 95), (0, 128, 0));
    }

    #[test]
    fn test_nearly_full_slice_is_filled() {
        let summary = summary_of(&[("Alice", 10_000.0), ("Bob", 0.001)]);
        let svg = render_svg(&summary).unwrap();
        let alice_path = svg.lines().find(|l| l.contains("fill='#ff0000' stroke")).unwrap();
        assert_eq!(alice_path.matches(" A ").count(), 2, "{}", alice_path);

        let pixmap = Pixmap::decode_png(&render_png(&summary).unwrap()).unwrap();
        assert_eq!(rgb_at(&pixmap, 200, 280), (255, 0, 0));
        for angle in [45.0, 135.0, 225.0, 315.0] {
            let (x, y) = pie_point(angle, 100.0);
            assert_eq!(rgb_at(&pixmap, x, y), (255, 0, 0), "angle {}", angle);
        }
    }

    #[test]
    fn test_legend_labels_are_drawn() {
        let summary = summary_of(&[("Alice", 10.0), ("Bob", 1.0)]);
        let pixmap = Pixmap::decode_png(&render_png(&summary).unwrap()).unwrap();

        let dark_pixels_in_rows = |top: u32, bottom: u32| {
            (410..560)
                .flat_map(|x| (top..bottom).map(move |y| (x, y)))
                .filter(|&(x, y)| pixmap.pixel(x, y).map_or(false, |p| p.red() < 128))
                .count()
        };
        assert!(dark_pixels_in_rows(55, 82) > 20, "first legend label missing");
        assert!(dark_pixels_in_rows(82, 110) > 20, "second legend label missing");
        // Nothing is drawn below the last legend row.
        assert_eq!(dark_pixels_in_rows(120, 200), 0);
    }

    #[test]
    fn test_png_is_deterministic() {
        let summary = summary_of(&[("Alice", 10.0), ("Bob", 4.0), ("Carol", 1.5)]);
        assert_eq!(render_png(&summary).unwrap(), render_png(&summary).unwrap());
    }

    #[test]
    fn test_write_pie_chart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PieChart.png");
        let summary = summary_of(&[("Alice", 10.0), ("Bob", 1.0)]);

        write_pie_chart(&summary, &path).expect("write should succeed");

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes, render_png(&summary).unwrap());
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_write_pie_chart_empty_dataset_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PieChart.png");
        let result = write_pie_chart(&RankedSummary::default(), &path);
        assert!(matches!(result, Err(ReportError::EmptyDataset)));
        assert!(!path.exists());
    }
}
