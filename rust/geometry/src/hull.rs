// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D convex hull of points lying in a horizontal plane

use crate::primitives::{Vertex, EPSILON};

/// Z component of `(b - a) x (c - a)`; positive for a counter-clockwise turn
#[inline]
fn turn(a: &Vertex, b: &Vertex, c: &Vertex) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Compute the convex hull of points using a Graham scan
///
/// Only x and y are used; vertices are returned unchanged, in
/// counter-clockwise order starting from the lowest-y point (leftmost on
/// ties). Collinear and duplicate points are dropped: a turn whose cross
/// product is at most [`EPSILON`] does not count as convex.
///
/// Degenerate input (fewer than 3 points, or all of them on a line) yields
/// fewer than 3 vertices.
pub fn convex_hull_2d(points: &[Vertex]) -> Vec<Vertex> {
    if points.len() < 3 {
        return points.to_vec();
    }

    // Sort by angle around the centroid, nearer points first on ties
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / n;

    let mut keyed: Vec<(f64, f64, Vertex)> = points
        .iter()
        .map(|p| {
            let (dx, dy) = (p.x - cx, p.y - cy);
            (dy.atan2(dx), dx * dx + dy * dy, *p)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    let sorted: Vec<Vertex> = keyed.into_iter().map(|(_, _, p)| p).collect();

    // Find bottom-most point (lowest Y, then leftmost X)
    let mut start_idx = 0;
    for (i, p) in sorted.iter().enumerate() {
        let s = &sorted[start_idx];
        if p.y < s.y - EPSILON || ((p.y - s.y).abs() < EPSILON && p.x < s.x) {
            start_idx = i;
        }
    }

    let mut hull: Vec<Vertex> = Vec::with_capacity(sorted.len());
    for p in sorted[start_idx..].iter().chain(&sorted[..start_idx]) {
        while hull.len() > 1 && turn(&hull[hull.len() - 2], &hull[hull.len() - 1], p) <= EPSILON {
            hull.pop();
        }
        hull.push(*p);
    }

    // Wrap around: the last vertices must also turn left into the start
    while hull.len() > 2 && turn(&hull[hull.len() - 2], &hull[hull.len() - 1], &hull[0]) <= EPSILON {
        hull.pop();
    }

    hull
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> Vertex {
        Vertex::new(x, y, 0.0)
    }

    /// Signed area, positive for counter-clockwise polygons
    fn area(polygon: &[Vertex]) -> f64 {
        let n = polygon.len();
        (0..n)
            .map(|i| {
                let (a, b) = (&polygon[i], &polygon[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            * 0.5
    }

    #[test]
    fn test_compute_convex_hull() {
        let points = vec![
            v(0.0, 0.0),
            v(1.0, 0.0),
            v(0.5, 0.5), // Interior point
            v(1.0, 1.0),
            v(0.0, 1.0),
        ];

        let hull = convex_hull_2d(&points);
        assert_eq!(hull, vec![v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)]);
    }

    #[test]
    fn test_square_with_many_interior_points() {
        let mut points = vec![v(1.0, 1.0), v(0.0, 1.0)];

        // Deterministic LCG; interior points in [0.01, 0.99]^2
        let mut state: u64 = 0x2545_F491_4F6C_DD1D;
        let mut next = || {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            0.01 + 0.98 * ((state >> 11) as f64 / (1u64 << 53) as f64)
        };
        for _ in 0..10_000 {
            let x = next();
            let y = next();
            points.push(v(x, y));
        }
        points.push(v(1.0, 0.0));
        points.push(v(0.0, 0.0));

        let hull = convex_hull_2d(&points);
        assert_eq!(hull, vec![v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)]);
    }

    #[test]
    fn test_collinear_and_duplicate_points_dropped() {
        let points = vec![
            v(0.0, 0.0),
            v(2.0, 0.0),
            v(1.0, 0.0), // On an edge
            v(2.0, 2.0),
            v(2.0, 2.00001), // Near duplicate
            v(0.0, 2.0),
            v(0.0, 1.0), // On an edge
            v(0.0, 0.0),
        ];
        let hull = convex_hull_2d(&points);
        assert_eq!(hull.len(), 4);
        assert!(area(&hull) > 0.0);
        assert_eq!(hull[0], v(0.0, 0.0));
    }

    #[test]
    fn test_output_is_counter_clockwise() {
        // Clockwise input order
        let points = vec![v(0.0, 3.0), v(3.0, 0.0), v(0.0, -3.0), v(-3.0, 0.0)];
        let hull = convex_hull_2d(&points);
        assert_eq!(hull[0], v(0.0, -3.0));
        assert_eq!(hull[1], v(3.0, 0.0));
        assert!(area(&hull) > 0.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(convex_hull_2d(&[]).is_empty());
        assert_eq!(convex_hull_2d(&[v(1.0, 1.0), v(2.0, 2.0)]).len(), 2);

        let line = [v(0.0, 0.0), v(1.0, 1.0), v(2.0, 2.0), v(3.0, 3.0)];
        assert!(convex_hull_2d(&line).len() < 3);
    }

    #[test]
    fn test_z_is_preserved() {
        let points = [
            Vertex::new(0.0, 0.0, 4.0),
            Vertex::new(1.0, 0.0, 4.0),
            Vertex::new(0.0, 1.0, 4.0),
        ];
        assert!(convex_hull_2d(&points).iter().all(|p| p.z == 4.0));
    }
}
