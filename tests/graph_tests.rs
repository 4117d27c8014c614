//! Function sampler tests

use calcdeck::error::CalcError;
use calcdeck::expr::StandardEvaluator;
use calcdeck::graph::{
    derive_axis_ticks, sample, PlotPoint, EMPTY_FUNCTION, EMPTY_RANGE, MAX_POINTS, TOO_FEW_TICKS,
};
use pretty_assertions::assert_eq;

// ═══════════════════════════════════════════════════════════════════════════
// SAMPLING
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_grid_is_evenly_spaced() {
    let sample = sample(&StandardEvaluator, "x^2", -10.0, 10.0, 100).unwrap();
    assert_eq!(sample.points.len(), 100);
    assert_eq!(sample.skipped, 0);
    assert_eq!(sample.points[0].x, -10.0);
    assert!((sample.points[99].x - 10.0).abs() < 1e-9);
    assert!(sample.points.windows(2).all(|w| w[1].x > w[0].x));
}

#[test]
fn test_reciprocal_splits_at_the_pole() {
    let sample = sample(&StandardEvaluator, "1/x", -50.0, 50.0, 101).unwrap();
    assert_eq!(sample.skipped, 1);
    assert!(sample.points.iter().all(|p| p.x != 0.0 && p.y.is_finite()));

    let runs = sample.runs();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].len(), 50);
    assert_eq!(runs[1].len(), 50);
}

#[test]
fn test_reciprocal_without_exact_zero_is_one_run() {
    // An even grid over [-1, 1] never lands on 0
    let sample = sample(&StandardEvaluator, "1/x", -1.0, 1.0, 100).unwrap();
    assert_eq!(sample.skipped, 0);
    assert_eq!(sample.runs().len(), 1);
}

#[test]
fn test_single_point() {
    let sample = sample(&StandardEvaluator, "x + 1", 2.0, 3.0, 1).unwrap();
    assert_eq!(sample.points, vec![PlotPoint { x: 2.0, y: 3.0 }]);
}

#[test]
fn test_nothing_to_plot() {
    let sample = sample(&StandardEvaluator, "log(0 * x)", -1.0, 1.0, 20).unwrap();
    assert!(sample.no_valid_points());
    assert_eq!(sample.skipped, 20);
}

#[test]
fn test_grid_spanning_the_float_range_stays_finite() {
    for n in [2, 3, 101] {
        let sample = sample(&StandardEvaluator, "1", -1e308, 1e308, n).unwrap();
        assert_eq!(sample.points.len(), n);
        assert!(sample.points.iter().all(|p| p.x.is_finite()));
        assert!(sample.points.windows(2).all(|w| w[0].x < w[1].x));
        assert_eq!(sample.points[0].x, -1e308);
        assert_eq!(sample.points[n - 1].x, 1e308);
    }
}

#[test]
fn test_grid_ends_exactly_on_the_bounds() {
    let sample = sample(&StandardEvaluator, "x", -0.3, 0.7, 7).unwrap();
    assert_eq!(sample.points[0].x, -0.3);
    assert_eq!(sample.points[6].x, 0.7);
}

#[test]
fn test_collapsed_grid_keeps_x_strictly_increasing() {
    // Only a couple of doubles exist between these bounds
    let sample = sample(&StandardEvaluator, "x", 1e16, 1e16 + 4.0, 50).unwrap();
    assert!(sample.points.len() < 50);
    assert!(sample.points.windows(2).all(|w| w[0].x < w[1].x));
    assert_eq!(sample.skipped, 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// VALIDATION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_rejects_bad_requests() {
    assert_eq!(
        sample(&StandardEvaluator, "   ", 0.0, 1.0, 10),
        Err(CalcError::Parse(EMPTY_FUNCTION.to_string()))
    );
    assert_eq!(
        sample(&StandardEvaluator, "x", 1.0, 1.0, 10),
        Err(CalcError::Domain(EMPTY_RANGE.to_string()))
    );
    assert!(matches!(
        sample(&StandardEvaluator, "x", f64::NAN, 1.0, 10),
        Err(CalcError::Parse(_))
    ));
    assert!(matches!(
        sample(&StandardEvaluator, "x", 0.0, 1.0, 0),
        Err(CalcError::Domain(_))
    ));
    assert!(matches!(
        sample(&StandardEvaluator, "x +", 0.0, 1.0, 10),
        Err(CalcError::Parse(_))
    ));
}

#[test]
fn test_point_count_is_capped() {
    assert!(matches!(
        sample(&StandardEvaluator, "x", 0.0, 1.0, usize::MAX),
        Err(CalcError::Domain(_))
    ));
    assert!(matches!(
        sample(&StandardEvaluator, "x", 0.0, 1.0, MAX_POINTS + 1),
        Err(CalcError::Domain(_))
    ));
    let sample = sample(&StandardEvaluator, "x", 0.0, 1.0, MAX_POINTS).unwrap();
    assert_eq!(sample.points.len(), MAX_POINTS);
}

#[test]
fn test_deeply_nested_expression_is_a_parse_error() {
    let deep = format!("{}x{}", "(".repeat(200_000), ")".repeat(200_000));
    assert!(matches!(
        sample(&StandardEvaluator, &deep, 0.0, 1.0, 3),
        Err(CalcError::Parse(_))
    ));
    let signs = format!("{}x", "-".repeat(200_000));
    assert!(matches!(
        sample(&StandardEvaluator, &signs, 0.0, 1.0, 3),
        Err(CalcError::Parse(_))
    ));
}

// ═══════════════════════════════════════════════════════════════════════════
// AXIS TICKS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_ticks_span_the_range() {
    let sample = sample(&StandardEvaluator, "2*x", 0.0, 4.0, 5).unwrap();
    assert_eq!(sample.y_ticks(5).unwrap(), vec![0.0, 2.0, 4.0, 6.0, 8.0]);
}

#[test]
fn test_flat_and_empty_ticks() {
    let flat = [PlotPoint { x: 0.0, y: 3.0 }, PlotPoint { x: 1.0, y: 3.0 }];
    assert_eq!(derive_axis_ticks(&flat, 5).unwrap(), vec![2.0, 3.0, 4.0]);
    assert_eq!(derive_axis_ticks(&[], 5).unwrap(), vec![-1.0, 0.0, 1.0]);
}

#[test]
fn test_fewer_than_two_ticks_is_rejected() {
    let points = [PlotPoint { x: 0.0, y: 0.0 }, PlotPoint { x: 1.0, y: 1.0 }];
    for count in [0, 1] {
        assert_eq!(
            derive_axis_ticks(&points, count),
            Err(CalcError::Domain(TOO_FEW_TICKS.to_string()))
        );
    }
    assert_eq!(derive_axis_ticks(&points, 2).unwrap(), vec![0.0, 1.0]);
}

#[test]
fn test_ticks_over_the_full_float_range() {
    let points = [
        PlotPoint { x: 0.0, y: -f64::MAX },
        PlotPoint { x: 1.0, y: f64::MAX },
    ];
    let ticks = derive_axis_ticks(&points, 3).unwrap();
    assert_eq!(ticks, vec![-f64::MAX, 0.0, f64::MAX]);
}
