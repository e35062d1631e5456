//! catenary.rs — Hanging-chain (catenary) curve solver
//!
//! Finds the curve `y = a·cosh((x − p)/a) + q` through two endpoints whose
//! arc length equals the requested line length.
//!
//! With `h = |x2 − x1|` and `v = y2 − y1`, the length condition reduces to
//!
//! ```text
//! sinh(z) / z = sqrt(L² − v²) / h,      z = h / 2a
//! ```
//!
//! which is solved for `z` by a bounded Newton-Raphson iteration. Two
//! degenerate cases are answered analytically instead of iterating:
//! - the line is (nearly) as short as the endpoint distance → straight
//! - the endpoints are almost vertically aligned → two near-vertical legs
//!
//! Pure function: no hidden state, identical inputs give identical points.

use mooring_types::{LineMode, Point2D};

// ── Solver constants ──────────────────────────────────────────────────────────

/// Slack below which the line is treated as straight (cm)
pub const STRAIGHT_EPSILON_CM: f64 = 0.01;
/// Horizontal span below which `cosh` blows up and the vertical hang is used (cm)
pub const VERTICAL_HANG_SPAN_CM: f64 = 4.0;
/// Hard cap on Newton iterations
pub const MAX_NEWTON_ITERATIONS: u32 = 20;

const NEWTON_MAX_STEP: f64 = 1.0;
const NEWTON_TOLERANCE: f64 = 1e-3;
const MIN_Z: f64 = 0.01;
/// Right-hand sides above this start Newton at z = 6 (deep loops)
const DEEP_LOOP_RHS: f64 = 100.0;

const SEGMENTS_SHORT: usize = 30;
const SEGMENTS_LONG: usize = 50;
const LONG_LINE_CM: f64 = 500.0;

// ── Result ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct CatenarySolution {
    pub mode: LineMode,
    /// Shape parameter `a` (cm). Zero for straight and vertical-hang lines,
    /// which carry no catenary horizontal tension.
    pub shape_param: f64,
    /// Vertex `(p, q)` of the cosh curve (or the nadir of a vertical hang)
    pub vertex: Option<Point2D>,
    /// Sampled curve, from `p1` to `p2`
    pub points: Vec<Point2D>,
    /// Largest vertical drop of the curve below the chord (cm)
    pub max_sag_cm: f64,
    /// Elevation of the lowest point of the line (cm)
    pub lowest_y_cm: f64,
    /// Newton iterations spent (0 for analytic branches)
    pub iterations: u32,
}

impl CatenarySolution {
    fn straight(p1: Point2D, p2: Point2D) -> Self {
        Self {
            mode: LineMode::Straight,
            shape_param: 0.0,
            vertex: None,
            points: vec![p1, p2],
            max_sag_cm: 0.0,
            lowest_y_cm: p1.y.min(p2.y),
            iterations: 0,
        }
    }

    pub fn is_straight(&self) -> bool { self.mode == LineMode::Straight }
}

// ── Solver ────────────────────────────────────────────────────────────────────

/// Solve the catenary between `p1` and `p2` for a line of `length` cm.
pub fn solve_catenary(p1: Point2D, p2: Point2D, length: f64) -> CatenarySolution {
    let dist = p1.dist(&p2);
    if dist >= length - STRAIGHT_EPSILON_CM {
        return CatenarySolution::straight(p1, p2);
    }

    if (p2.x - p1.x).abs() < VERTICAL_HANG_SPAN_CM {
        return vertical_hang(p1, p2, length);
    }

    // Work left-to-right; the sampled points keep the caller's order.
    let (left, right) = if p1.x <= p2.x { (p1, p2) } else { (p2, p1) };
    let h = right.x - left.x;
    let v = right.y - left.y;

    let rhs = (length * length - v * v).sqrt() / h;
    let (z, iterations) = newton_z(rhs);
    let a = h / (2.0 * z);

    // Horizontal offset of the vertex from the span midpoint.
    let ratio = (length + v) / (length - v);
    let shift = if ratio > 0.0 { a * ratio.ln() } else { 0.0 };
    let p = (left.x + right.x - shift) / 2.0;
    let q = left.y - a * ((left.x - p) / a).cosh();

    let segments = if length > LONG_LINE_CM { SEGMENTS_LONG } else { SEGMENTS_SHORT };
    let mut points = Vec::with_capacity(segments + 1);
    points.push(p1);
    for i in 1..segments {
        let t = i as f64 / segments as f64;
        let x = p1.x + (p2.x - p1.x) * t;
        points.push(Point2D::new(x, a * ((x - p) / a).cosh() + q));
    }
    points.push(p2);

    // The curve is lowest at its vertex when the vertex lies inside the span.
    let lowest_y_cm = if p > left.x && p < right.x { a + q } else { left.y.min(right.y) };

    CatenarySolution {
        mode: LineMode::Catenary,
        shape_param: a,
        vertex: Some(Point2D::new(p, q)),
        points,
        max_sag_cm: chord_sag(left, right, a, p, q),
        lowest_y_cm,
        iterations,
    }
}

/// Newton-Raphson on f(z) = sinh(z)/z − rhs.
/// f'(z) = (z·cosh z − sinh z) / z²
fn newton_z(rhs: f64) -> (f64, u32) {
    let mut z: f64 = if rhs > DEEP_LOOP_RHS { 6.0 } else { 1.0 };
    let mut iterations = 0;

    for i in 0..MAX_NEWTON_ITERATIONS {
        iterations = i + 1;
        let (sinh_z, cosh_z) = (z.sinh(), z.cosh());
        let f = sinh_z / z - rhs;
        if f.abs() < NEWTON_TOLERANCE {
            break;
        }
        let df = (z * cosh_z - sinh_z) / (z * z);
        if df.abs() < 1e-9 {
            break;
        }
        let dz = (f / df).clamp(-NEWTON_MAX_STEP, NEWTON_MAX_STEP);
        z = (z - dz).max(MIN_Z);
    }

    (z, iterations)
}

/// Maximum drop below the chord. The gap is widest where the curve slope
/// equals the chord slope: sinh((x − p)/a) = v/h.
fn chord_sag(left: Point2D, right: Point2D, a: f64, p: f64, q: f64) -> f64 {
    let slope = (right.y - left.y) / (right.x - left.x);
    let x = (p + a * slope.asinh()).clamp(left.x, right.x);
    let chord_y = left.y + slope * (x - left.x);
    let curve_y = a * ((x - p) / a).cosh() + q;
    (chord_y - curve_y).max(0.0)
}

/// Endpoints almost stacked vertically: the line drops from both ends to a
/// common nadir, `L = (y1 − y_n) + (y2 − y_n)`.
fn vertical_hang(p1: Point2D, p2: Point2D, length: f64) -> CatenarySolution {
    let nadir_y = (p1.y + p2.y - length) / 2.0;
    let mid_x = (p1.x + p2.x) / 2.0;

    let points = vec![
        p1,
        Point2D::new(p1.x, (p1.y + nadir_y) * 0.5),
        Point2D::new(mid_x, nadir_y),
        Point2D::new(p2.x, (p2.y + nadir_y) * 0.5),
        p2,
    ];

    CatenarySolution {
        mode: LineMode::VerticalHang,
        shape_param: 0.0,
        vertex: Some(Point2D::new(mid_x, nadir_y)),
        points,
        max_sag_cm: ((p1.y + p2.y) / 2.0 - nadir_y).max(0.0),
        lowest_y_cm: nadir_y,
        iterations: 0,
    }
}

/// Total length of a sampled polyline.
pub fn polyline_length(points: &[Point2D]) -> f64 {
    points.windows(2).map(|w| w[0].dist(&w[1])).sum()
}
