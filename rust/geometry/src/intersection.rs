// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangle/triangle intersection (plane test and interval overlap)
//!
//! Each triangle is first tested against the other's plane. When both
//! straddle, the two triangles meet the planes' common line in one interval
//! each, and they intersect when those intervals overlap by more than
//! [`EPSILON`]. Contact at a single point or along a shared edge is not an
//! intersection, and coplanar triangles never intersect.

use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;

use crate::face::Face;
use crate::primitives::EPSILON;

/// Signed distances of `points` to the plane through `origin`, with values
/// within [`EPSILON`] snapped to zero
#[inline]
fn plane_distances(points: &[Point3<f64>; 3], origin: &Point3<f64>, normal: &Vector3<f64>) -> [f64; 3] {
    points.map(|p| {
        let d = (p - origin).dot(normal);
        if d.abs() < EPSILON {
            0.0
        } else {
            d
        }
    })
}

#[inline]
fn strictly_one_side(d: &[f64; 3]) -> bool {
    d.iter().all(|&x| x > 0.0) || d.iter().all(|&x| x < 0.0)
}

#[inline]
fn zero_count(d: &[f64; 3]) -> usize {
    d.iter().filter(|&&x| x == 0.0).count()
}

/// Span of a triangle on the line with direction `dir`, given the distances
/// of its corners to the other triangle's plane
fn line_interval(points: &[Point3<f64>; 3], d: &[f64; 3], dir: &Vector3<f64>) -> Option<(f64, f64)> {
    let mut hits: SmallVec<[f64; 4]> = SmallVec::new();
    for i in 0..3 {
        let j = (i + 1) % 3;
        if d[i] == 0.0 {
            hits.push(dir.dot(&points[i].coords));
        }
        if d[i] * d[j] < 0.0 {
            let t = d[i] / (d[i] - d[j]);
            let p = points[i] + (points[j] - points[i]) * t;
            hits.push(dir.dot(&p.coords));
        }
    }

    let lo = hits.iter().copied().reduce(f64::min)?;
    let hi = hits.iter().copied().reduce(f64::max)?;
    Some((lo, hi))
}

/// Check whether two faces cut through each other
///
/// Degenerate faces (no usable normal) never intersect.
pub fn faces_intersect(a: &Face, b: &Face) -> bool {
    let (Some(na), Some(nb)) = (a.plane_normal(), b.plane_normal()) else {
        return false;
    };

    // b against a's plane
    let db = plane_distances(&b.vertices, &a.vertices[0], &na);
    if strictly_one_side(&db) {
        return false;
    }
    // a against b's plane
    let da = plane_distances(&a.vertices, &b.vertices[0], &nb);
    if strictly_one_side(&da) {
        return false;
    }

    // Coplanar
    if zero_count(&da) == 3 || zero_count(&db) == 3 {
        return false;
    }
    // Hinged on a common line, each only touching the other's plane
    if zero_count(&da) == 2 && zero_count(&db) == 2 {
        return false;
    }

    let Some(dir) = na.cross(&nb).try_normalize(f64::EPSILON) else {
        return false;
    };

    let (Some((a_lo, a_hi)), Some((b_lo, b_hi))) = (
        line_interval(&a.vertices, &da, &dir),
        line_interval(&b.vertices, &db, &dir),
    ) else {
        return false;
    };

    a_hi.min(b_hi) - a_lo.max(b_lo) > EPSILON
}
