//! Function sampling for plotting
//!
//! [`sample`] evaluates `y = f(x)` on an evenly spaced grid. Points whose
//! evaluation fails or is not finite are dropped, never interpolated; the
//! positions of those gaps are recorded so callers can split the series with
//! [`PlotSample::runs`].

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};
use crate::expr::{CompiledExpression, Env, ExpressionEvaluator};

pub const DEFAULT_POINTS: usize = 100;
pub const DEFAULT_TICKS: usize = 5;
/// Upper bound on the grid size of a single [`sample`] call
pub const MAX_POINTS: usize = 5000;

pub const EMPTY_FUNCTION: &str = "Please enter a function.";
pub const INVALID_RANGE: &str = "X Min and X Max must be valid numbers.";
pub const EMPTY_RANGE: &str = "X Max must be greater than X Min.";
pub const NO_VALID_POINTS: &str = "No valid points to plot for this function and range.";
pub const TOO_FEW_TICKS: &str = "At least two ticks are needed to span the axis.";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotSample {
    /// Finite points, `x` strictly increasing
    pub points: Vec<PlotPoint>,
    /// Grid spacing; infinite only when the spacing itself exceeds `f64::MAX`
    pub step: f64,
    /// Number of grid positions dropped
    pub skipped: usize,
    /// Indices into `points` that follow one or more dropped positions
    #[serde(default)]
    pub gaps: Vec<usize>,
}

impl PlotSample {
    pub fn no_valid_points(&self) -> bool {
        self.points.is_empty()
    }

    /// Maximal runs of points with no dropped grid position between them
    pub fn runs(&self) -> Vec<&[PlotPoint]> {
        let mut runs = Vec::with_capacity(self.gaps.len() + 1);
        let mut start = 0;
        for &gap in &self.gaps {
            if gap > start && gap <= self.points.len() {
                runs.push(&self.points[start..gap]);
                start = gap;
            }
        }
        if start < self.points.len() {
            runs.push(&self.points[start..]);
        }
        runs
    }

    pub fn y_ticks(&self, tick_count: usize) -> CalcResult<Vec<f64>> {
        derive_axis_ticks(&self.points, tick_count)
    }
}

/// Evaluate `text` at `num_points` evenly spaced `x` values over
/// `[x_min, x_max]`, with `x` bound in the environment.
///
/// An empty result is not an error; check [`PlotSample::no_valid_points`].
pub fn sample<V: ExpressionEvaluator>(
    evaluator: &V,
    text: &str,
    x_min: f64,
    x_max: f64,
    num_points: usize,
) -> CalcResult<PlotSample> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CalcError::parse(EMPTY_FUNCTION));
    }
    if !x_min.is_finite() || !x_max.is_finite() {
        return Err(CalcError::parse(INVALID_RANGE));
    }
    if x_max <= x_min {
        return Err(CalcError::domain(EMPTY_RANGE));
    }
    if num_points == 0 {
        return Err(CalcError::domain("At least one sample point is required"));
    }
    if num_points > MAX_POINTS {
        return Err(CalcError::domain(format!(
            "At most {} sample points are supported, got {}",
            MAX_POINTS, num_points
        )));
    }

    let compiled = evaluator.parse(text)?;
    let intervals = num_points.saturating_sub(1).max(1) as f64;
    let step = x_max / intervals - x_min / intervals;

    let mut env = Env::new();
    let mut points: Vec<PlotPoint> = Vec::new();
    let mut gaps = Vec::new();
    let mut skipped = 0;
    let mut after_gap = false;
    let mut last_x = f64::NEG_INFINITY;

    for i in 0..num_points {
        let x = lerp(x_min, x_max, i, num_points);
        // Ranges narrower than the float spacing at this magnitude repeat x
        if x <= last_x {
            continue;
        }
        last_x = x;
        env.insert("x".to_string(), x);
        match compiled.evaluate(&env) {
            Ok(y) if y.is_finite() => {
                if after_gap && !points.is_empty() {
                    gaps.push(points.len());
                }
                after_gap = false;
                points.push(PlotPoint { x, y });
            }
            _ => {
                skipped += 1;
                after_gap = true;
            }
        }
    }

    debug_assert!(points.windows(2).all(|w| w[0].x < w[1].x));

    if skipped > 0 {
        tracing::debug!(expression = text, skipped, kept = points.len(), "Dropped non-finite plot points");
    }

    Ok(PlotSample {
        points,
        step,
        skipped,
        gaps,
    })
}

/// The `i`-th of `count` evenly spaced values from `start` to `end` inclusive.
///
/// Falls back to weighted interpolation when `end - start` overflows, so every
/// value stays finite for finite bounds.
fn lerp(start: f64, end: f64, i: usize, count: usize) -> f64 {
    if count < 2 || i == 0 {
        return start;
    }
    if i + 1 >= count {
        return end;
    }
    let t = i as f64 / (count - 1) as f64;
    let span = end - start;
    if span.is_finite() {
        start + span * t
    } else {
        start * (1.0 - t) + end * t
    }
}

/// Y-axis ticks spanning the finite `y` values.
///
/// A flat series gets the window `[y-1, y, y+1]`; with no usable values the
/// window is `[-1, 0, 1]`. Fewer than two ticks cannot span an axis and are
/// rejected.
pub fn derive_axis_ticks(points: &[PlotPoint], tick_count: usize) -> CalcResult<Vec<f64>> {
    if tick_count < 2 {
        return Err(CalcError::domain(TOO_FEW_TICKS));
    }

    let (min, max) = points
        .iter()
        .map(|p| p.y)
        .filter(|y| y.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });

    if min >= max {
        let window = [min - 1.0, min, min + 1.0];
        if window.iter().all(|t| t.is_finite()) {
            return Ok(window.to_vec());
        }
        return Ok(vec![-1.0, 0.0, 1.0]);
    }

    Ok((0..tick_count).map(|i| lerp(min, max, i, tick_count)).collect())
}
