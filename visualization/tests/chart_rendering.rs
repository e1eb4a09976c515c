//! End-to-end chart drawing against recorded and exported surfaces

use std::f64::consts::{FRAC_PI_2, TAU};

use aicp::{AccessRecord, AccessStats, ChartDataset};
use aicp_visualization::charts::pie_wedges;
use aicp_visualization::surface::{DrawCommand, PathCommand};
use aicp_visualization::{
    export_dashboard, ChartCanvas, ChartKind, ChartRenderer, DrawOutcome, ImageFormat,
    RecordingSurface, EMPTY_MESSAGE,
};
use chrono::{TimeZone, Utc};

fn recorded<F>(width: f64, height: f64, draw: F) -> (DrawOutcome, RecordingSurface)
where
    F: FnOnce(&ChartRenderer, &mut ChartCanvas<'_>) -> aicp_visualization::Result<DrawOutcome>,
{
    let renderer = ChartRenderer::default();
    let mut surface = RecordingSurface::new(width, height);
    let outcome = draw(&renderer, &mut ChartCanvas::new(&mut surface)).unwrap();
    (outcome, surface)
}

fn assert_empty_state(outcome: DrawOutcome, surface: &RecordingSurface) {
    assert_eq!(outcome, DrawOutcome::EmptyState);
    assert_eq!(surface.commands().len(), 2);
    assert!(matches!(surface.commands()[0], DrawCommand::Clear(_)));
    assert_eq!(surface.texts(), vec![EMPTY_MESSAGE]);
}

fn arc_angles(command: &DrawCommand) -> Option<(f64, f64)> {
    let DrawCommand::FillPath { path, .. } = command else {
        return None;
    };
    path.commands().iter().find_map(|step| match step {
        PathCommand::Arc {
            start_angle,
            end_angle,
            ..
        } => Some((*start_angle, *end_angle)),
        _ => None,
    })
}

#[test]
fn test_pie_wedges_follow_dataset_order_and_proportion() {
    let dataset = ChartDataset::from_pairs([("visitor", 3), ("resident", 5), ("provider", 2)]);
    let (outcome, surface) = recorded(600.0, 400.0, |r, c| r.draw_pie(c, &dataset));

    assert_eq!(outcome, DrawOutcome::Drawn);
    let wedges: Vec<(f64, f64)> = surface.commands().iter().filter_map(arc_angles).collect();
    assert_eq!(wedges.len(), 3);

    let expected = [0.3, 0.5, 0.2];
    let mut angle = -FRAC_PI_2;
    for ((start, end), share) in wedges.iter().zip(expected) {
        assert!((start - angle).abs() < 1e-9);
        assert!((end - start - share * TAU).abs() < 1e-9);
        angle = *end;
    }
    assert!((angle + FRAC_PI_2 - TAU).abs() < 1e-9);

    let texts = surface.texts();
    assert!(texts.contains(&"30%"));
    assert!(texts.contains(&"50%"));
    assert!(texts.contains(&"20%"));
    assert!(texts.contains(&"visitor: 3"));
    assert!(texts.contains(&"resident: 5"));
    assert!(texts.contains(&"provider: 2"));
}

#[test]
fn test_pie_legend_rows_stack_from_top_left() {
    let dataset = ChartDataset::from_pairs([("visitor", 1), ("resident", 1)]);
    let (_, surface) = recorded(600.0, 400.0, |r, c| r.draw_pie(c, &dataset));

    let swatches = surface.rects();
    assert_eq!(swatches.len(), 2);
    assert_eq!((swatches[0].0.x, swatches[0].0.y), (20.0, 20.0));
    assert_eq!((swatches[1].0.x, swatches[1].0.y), (20.0, 45.0));
    assert_eq!(swatches[0].0.width, 15.0);
}

#[test]
fn test_pie_sum_of_sweeps_is_full_circle() {
    for counts in [vec![1], vec![1, 1, 1], vec![7, 0, 13, 2], vec![1_000_000, 1]] {
        let dataset = ChartDataset::from_pairs(
            counts
                .iter()
                .enumerate()
                .map(|(i, count)| (format!("c{}", i), *count)),
        );
        let total: f64 = pie_wedges(&dataset).iter().map(|w| w.sweep()).sum();
        assert!((total - TAU).abs() < 1e-9, "counts {:?}", counts);
    }
}

#[test]
fn test_empty_and_zero_datasets_draw_only_the_empty_state() {
    let empty = ChartDataset::new();
    let zeros = ChartDataset::from_pairs([("active", 0), ("dentro", 0)]);

    for dataset in [&empty, &zeros] {
        let (outcome, surface) = recorded(400.0, 300.0, |r, c| r.draw_pie(c, dataset));
        assert_empty_state(outcome, &surface);

        let (outcome, surface) = recorded(400.0, 300.0, |r, c| r.draw_bar(c, dataset));
        assert_empty_state(outcome, &surface);

        let (outcome, surface) = recorded(400.0, 300.0, |r, c| r.draw_hourly_bar(c, dataset));
        assert_empty_state(outcome, &surface);

        let (outcome, surface) = recorded(400.0, 300.0, |r, c| r.draw_line(c, dataset));
        assert_empty_state(outcome, &surface);
    }
}

#[test]
fn test_all_zero_hours_show_the_empty_state() {
    let by_hour = ChartDataset::from_pairs((0..24).map(|h| (h.to_string(), 0)));
    let (outcome, surface) = recorded(600.0, 400.0, |r, c| r.draw_hourly_bar(c, &by_hour));
    assert_empty_state(outcome, &surface);
}

#[test]
fn test_huge_counts_draw_without_overflow() {
    let stats = aicp_visualization::data::parse_stats(
        r#"{"total":2,"by_access_type":{"visitor":18446744073709551615,"resident":1},"by_status":{"active":18446744073709551615,"dentro":18446744073709551615}}"#,
    )
    .unwrap();

    let (outcome, surface) = recorded(600.0, 400.0, |r, c| r.draw_pie(c, &stats.by_access_type));
    assert_eq!(outcome, DrawOutcome::Drawn);
    assert!(surface.texts().contains(&"100%"));

    let (outcome, surface) = recorded(600.0, 400.0, |r, c| r.draw_bar(c, &stats.by_status));
    assert_eq!(outcome, DrawOutcome::Drawn);
    assert_eq!(surface.rects()[0].0.height, surface.rects()[1].0.height);

    let by_hour = ChartDataset::from_pairs([("3", u64::MAX), ("03", 1)]);
    let (outcome, surface) = recorded(600.0, 400.0, |r, c| r.draw_hourly_bar(c, &by_hour));
    assert_eq!(outcome, DrawOutcome::Drawn);
    assert_eq!(surface.rects()[3].0.height, 320.0);
}

#[test]
fn test_detached_canvas_is_skipped_for_every_chart() {
    let renderer = ChartRenderer::default();
    let stats = AccessStats::collect_utc(&[AccessRecord::new("visitor", "event", "active")
        .at(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())]);

    for kind in ChartKind::ALL {
        let mut canvas = ChartCanvas::detached(600.0, 400.0);
        assert_eq!(
            renderer.draw_chart(kind, &mut canvas, &stats).unwrap(),
            DrawOutcome::Skipped
        );
    }
}

#[test]
fn test_status_bars_use_standard_margins() {
    let dataset = ChartDataset::from_pairs([("active", 4), ("dentro", 2)]);
    let (outcome, surface) = recorded(600.0, 400.0, |r, c| r.draw_bar(c, &dataset));

    assert_eq!(outcome, DrawOutcome::Drawn);
    assert!(matches!(surface.commands()[0], DrawCommand::Clear(_)));

    let bars = surface.rects();
    assert_eq!(bars.len(), 2);
    // plot area is 500 x 320 starting at (50, 40)
    assert_eq!(bars[0].0.height, 320.0);
    assert_eq!(bars[0].0.y, 40.0);
    assert_eq!(bars[1].0.height, 160.0);
    assert_eq!(bars[0].0.width, 200.0);
    assert_eq!(bars[0].0.x, 75.0);

    let texts = surface.texts();
    assert_eq!(texts, vec!["4", "active", "2", "dentro"]);
}

#[test]
fn test_hourly_bars_label_every_third_hour() {
    let by_hour = ChartDataset::from_pairs([("8", 2), ("17", 6)]);
    let (outcome, surface) = recorded(600.0, 400.0, |r, c| r.draw_hourly_bar(c, &by_hour));

    assert_eq!(outcome, DrawOutcome::Drawn);
    assert_eq!(surface.rects().len(), 24);

    let texts = surface.texts();
    for label in ["0h", "3h", "6h", "9h", "12h", "15h", "18h", "21h"] {
        assert!(texts.contains(&label), "missing {}", label);
    }
    assert!(!texts.contains(&"1h"));
    assert!(texts.contains(&"2"));
    assert!(texts.contains(&"6"));

    // hourly plot: top margin 50, bottom 30 on a 400px surface
    let tallest = surface.rects()[17].0;
    assert_eq!(tallest.y, 50.0);
    assert_eq!(tallest.height, 320.0);
}

#[test]
fn test_weekly_line_keeps_the_last_seven_days() {
    let by_date = ChartDataset::from_pairs(
        (1..=10).map(|day| (format!("2024-09-{:02}", day), day as u64)),
    );
    let (outcome, surface) = recorded(600.0, 400.0, |r, c| r.draw_line(c, &by_date));

    assert_eq!(outcome, DrawOutcome::Drawn);
    // value above each marker, then its date below the axis
    let texts = surface.texts();
    assert_eq!(texts.len(), 14);
    let dates: Vec<&str> = texts.iter().skip(1).step_by(2).copied().collect();
    assert_eq!(
        dates,
        vec!["4 sept", "5 sept", "6 sept", "7 sept", "8 sept", "9 sept", "10 sept"]
    );
    assert_eq!(texts[0], "4");
    assert_eq!(texts[12], "10");

    // seven markers plus the connecting line
    let markers = surface.filled_paths();
    assert_eq!(markers.len(), 7);
    let strokes = surface.stroked_paths();
    assert_eq!(strokes.len(), 2);
}

#[test]
fn test_single_day_line_is_one_centered_marker() {
    let by_date = ChartDataset::from_pairs([("2024-02-29", 5)]);
    let (outcome, surface) = recorded(600.0, 400.0, |r, c| r.draw_line(c, &by_date));

    assert_eq!(outcome, DrawOutcome::Drawn);
    let markers = surface.filled_paths();
    assert_eq!(markers.len(), 1);
    match markers[0].0.commands()[0] {
        PathCommand::Arc { center, radius, .. } => {
            assert_eq!(center.x, 300.0);
            assert_eq!(radius, 4.0);
        }
        other => panic!("expected marker arc, got {:?}", other),
    }
    // only the baseline is stroked
    assert_eq!(surface.stroked_paths().len(), 1);
}

#[test]
fn test_dashboard_exports_five_svg_files() {
    let end = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let stats = AccessStats::collect_utc(&aicp_visualization::data::sample_records(120, 7, end));
    let dir = tempfile::tempdir().unwrap();

    let written = export_dashboard(
        &ChartRenderer::default(),
        &stats,
        dir.path(),
        ImageFormat::Svg,
        (600, 400),
    )
    .unwrap();

    assert_eq!(written.len(), 5);
    for (path, outcome) in &written {
        assert_eq!(*outcome, DrawOutcome::Drawn);
        let svg = std::fs::read_to_string(path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(!svg.contains(EMPTY_MESSAGE));
    }
    assert!(dir.path().join("weekly.svg").exists());
    assert!(dir.path().join("access_type.svg").exists());
}

#[test]
fn test_empty_dashboard_exports_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let written = export_dashboard(
        &ChartRenderer::default(),
        &AccessStats::default(),
        &dir.path().join("nested"),
        ImageFormat::Svg,
        (300, 200),
    )
    .unwrap();

    for (path, outcome) in &written {
        assert_eq!(*outcome, DrawOutcome::EmptyState);
        assert!(std::fs::read_to_string(path).unwrap().contains(EMPTY_MESSAGE));
    }
}
