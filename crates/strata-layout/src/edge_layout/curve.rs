//! Curve sampling and polyline simplification used by the edge strategies.

use crate::geom::Point3;

/// Samples the Bezier curve over `controls` at `segments + 1` evenly spaced parameters.
pub(crate) fn bezier(controls: &[Point3], segments: usize) -> Vec<Point3> {
    sample(controls, segments, |t| de_casteljau(controls, t))
}

/// Control points of the quadratic Bezier curve that passes through `start`, `middle` (at
/// `t = 0.5`) and `end`.
pub(crate) fn through(start: Point3, middle: Point3, end: Point3) -> [Point3; 3] {
    let chord = start.lerp(end, 0.5);
    [start, middle + (middle - chord), end]
}

/// Samples the clamped uniform B-spline of degree `min(3, n - 1)` over `controls`.
/// The curve starts at the first and ends at the last control point.
pub(crate) fn clamped_bspline(controls: &[Point3], segments: usize) -> Vec<Point3> {
    let degree = 3.min(controls.len().saturating_sub(1));
    let knots = clamped_knots(controls.len(), degree);
    sample(controls, segments, |u| de_boor(controls, &knots, degree, u))
}

/// Pulls the inner control points towards the straight line from first to last control
/// point. `tension` 1 keeps the points, 0 yields the straight line.
pub(crate) fn straighten(controls: &[Point3], tension: f64) -> Vec<Point3> {
    let n = controls.len();
    if n < 3 {
        return controls.to_vec();
    }
    let first = controls[0];
    let last = controls[n - 1];
    controls
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let on_line = first.lerp(last, i as f64 / (n - 1) as f64);
            on_line.lerp(p, tension)
        })
        .collect()
}

/// Ramer-Douglas-Peucker simplification. Endpoints are always kept; `epsilon <= 0` keeps
/// every point.
pub(crate) fn simplify(points: &[Point3], epsilon: f64) -> Vec<Point3> {
    let n = points.len();
    if epsilon <= 0.0 || n < 3 {
        return points.to_vec();
    }
    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;
    let mut pending = vec![(0, n - 1)];
    while let Some((first, last)) = pending.pop() {
        let mut farthest = first;
        let mut max = 0.0;
        for i in first + 1..last {
            let d = distance_to_segment(points[i], points[first], points[last]);
            if d > max {
                max = d;
                farthest = i;
            }
        }
        if max > epsilon {
            keep[farthest] = true;
            pending.push((first, farthest));
            pending.push((farthest, last));
        }
    }
    points
        .iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}

fn sample(controls: &[Point3], segments: usize, at: impl Fn(f64) -> Point3) -> Vec<Point3> {
    match controls {
        [] => Vec::new(),
        [only] => vec![*only],
        _ => {
            let segments = segments.max(1);
            (0..=segments)
                .map(|i| at(i as f64 / segments as f64))
                .collect()
        }
    }
}

fn de_casteljau(controls: &[Point3], t: f64) -> Point3 {
    let mut points = controls.to_vec();
    for level in (1..points.len()).rev() {
        for i in 0..level {
            points[i] = points[i].lerp(points[i + 1], t);
        }
    }
    points[0]
}

fn clamped_knots(n: usize, degree: usize) -> Vec<f64> {
    let inner = n - degree;
    (0..n + degree + 1)
        .map(|i| {
            if i <= degree {
                0.0
            } else if i >= n {
                1.0
            } else {
                (i - degree) as f64 / inner as f64
            }
        })
        .collect()
}

fn de_boor(controls: &[Point3], knots: &[f64], degree: usize, u: f64) -> Point3 {
    let n = controls.len();
    // Knot span: knots[k] <= u < knots[k + 1], the last span is closed.
    let mut k = degree;
    while k + 1 < n && knots[k + 1] <= u {
        k += 1;
    }

    let mut d: Vec<Point3> = (0..=degree).map(|j| controls[j + k - degree]).collect();
    for r in 1..=degree {
        for j in (r..=degree).rev() {
            let left = knots[j + k - degree];
            let right = knots[j + 1 + k - r];
            let alpha = if right > left {
                (u - left) / (right - left)
            } else {
                0.0
            };
            d[j] = d[j - 1].lerp(d[j], alpha);
        }
    }
    d[degree]
}

fn distance_to_segment(p: Point3, a: Point3, b: Point3) -> f64 {
    let ab = b - a;
    let length2 = ab.square_length();
    if length2 == 0.0 {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / length2).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}
