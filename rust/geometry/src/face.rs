// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Free-standing triangles and plane clipping
//!
//! A [`Face`] owns its three points and is what the collision test consumes:
//! clipped mesh triangles on one side, cable cone triangles on the other.

use nalgebra::{Point3, Vector3};
use smallvec::{smallvec, SmallVec};

/// Triangle with its own points and a normal
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub vertices: [Point3<f64>; 3],
    pub normal: Vector3<f64>,
}

impl Face {
    /// Create a face whose normal follows the winding of the points
    ///
    /// Degenerate faces get a zero normal.
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        let mut face = Self {
            vertices: [v0, v1, v2],
            normal: Vector3::zeros(),
        };
        face.normal = face.winding_normal().unwrap_or_else(Vector3::zeros);
        face
    }

    #[inline]
    pub fn with_normal(vertices: [Point3<f64>; 3], normal: Vector3<f64>) -> Self {
        Self { vertices, normal }
    }

    /// Unit normal `(v1-v0) x (v2-v0)`, `None` for collinear points
    pub fn winding_normal(&self) -> Option<Vector3<f64>> {
        let [v0, v1, v2] = &self.vertices;
        (v1 - v0).cross(&(v2 - v0)).try_normalize(f64::EPSILON)
    }

    /// Normal of the supporting plane
    ///
    /// Prefers the winding normal and falls back to the stored one, so a face
    /// with a bogus stored normal still gets the right plane.
    pub fn plane_normal(&self) -> Option<Vector3<f64>> {
        self.winding_normal()
            .or_else(|| self.normal.try_normalize(f64::EPSILON))
    }

    pub fn area(&self) -> f64 {
        let [v0, v1, v2] = &self.vertices;
        (v1 - v0).cross(&(v2 - v0)).norm() * 0.5
    }

    pub fn translated(&self, offset: &Vector3<f64>) -> Face {
        let [v0, v1, v2] = self.vertices;
        Face::with_normal([v0 + offset, v1 + offset, v2 + offset], self.normal)
    }
}

/// Outcome of clipping one face
#[derive(Debug, Clone)]
pub enum ClipResult {
    /// Face is completely in front (keep it)
    AllFront(Face),
    /// Face is completely behind (discard it)
    AllBehind,
    /// Face crosses the plane; the front part as 1 or 2 faces
    Split(SmallVec<[Face; 2]>),
}

impl ClipResult {
    /// Faces that survive the clip
    pub fn into_faces(self) -> SmallVec<[Face; 2]> {
        match self {
            ClipResult::AllFront(face) => smallvec![face],
            ClipResult::AllBehind => SmallVec::new(),
            ClipResult::Split(faces) => faces,
        }
    }
}

/// Clip a face by a plane given the signed distances of its corners
///
/// The plane itself is implicit: `d[i]` is how far corner `i` lies in front
/// of it. A corner counts as in front when its distance is `>= -epsilon`. Split
/// faces keep the winding and normal of the input.
pub fn clip_with_distances(face: &Face, d: [f64; 3], epsilon: f64) -> ClipResult {
    let front = d.map(|di| di >= -epsilon);
    let front_count = front.iter().filter(|&&f| f).count();

    match front_count {
        0 => ClipResult::AllBehind,
        3 => ClipResult::AllFront(face.clone()),
        1 => {
            // Rotate so the lone front corner comes first, keeping winding
            let i = front.iter().position(|&f| f).unwrap_or(0);
            let (a, b, c) = (i, (i + 1) % 3, (i + 2) % 3);
            let v = &face.vertices;

            let p1 = lerp(&v[a], &v[b], d[a] / (d[a] - d[b]));
            let p2 = lerp(&v[a], &v[c], d[a] / (d[a] - d[c]));

            ClipResult::Split(smallvec![Face::with_normal([v[a], p1, p2], face.normal)])
        }
        2 => {
            // Rotate so the lone back corner comes last
            let i = front.iter().position(|&f| !f).unwrap_or(0);
            let (f1, f2, back) = ((i + 1) % 3, (i + 2) % 3, i);
            let v = &face.vertices;

            let p1 = lerp(&v[f1], &v[back], d[f1] / (d[f1] - d[back]));
            let p2 = lerp(&v[f2], &v[back], d[f2] / (d[f2] - d[back]));

            ClipResult::Split(smallvec![
                Face::with_normal([v[f1], v[f2], p1], face.normal),
                Face::with_normal([v[f2], p2, p1], face.normal),
            ])
        }
        _ => unreachable!(),
    }
}

#[inline]
fn lerp(from: &Point3<f64>, to: &Point3<f64>, t: f64) -> Point3<f64> {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Distances to the plane z = 0, front side up
    fn heights(face: &Face) -> [f64; 3] {
        face.vertices.map(|v| v.z)
    }

    #[test]
    fn test_clip_all_front_and_behind() {
        let face = Face::new(
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.5, 1.0, 1.0),
        );
        let d = heights(&face);
        assert!(matches!(clip_with_distances(&face, d, 1e-6), ClipResult::AllFront(_)));
        assert!(matches!(
            clip_with_distances(&face, d.map(|x| -x), 1e-6),
            ClipResult::AllBehind
        ));
    }

    #[test]
    fn test_corner_within_epsilon_counts_as_front() {
        let face = Face::new(
            Point3::new(0.0, 0.0, -1e-7),
            Point3::new(1.0, 0.0, -1e-7),
            Point3::new(0.5, 1.0, -1e-7),
        );
        assert!(matches!(
            clip_with_distances(&face, heights(&face), 1e-6),
            ClipResult::AllFront(_)
        ));
    }

    #[test]
    fn test_clip_split_one_front() {
        let face = Face::new(
            Point3::new(0.0, 0.0, 1.0),  // Front
            Point3::new(1.0, 0.0, -1.0), // Behind
            Point3::new(0.5, 1.0, -1.0), // Behind
        );
        let faces = clip_with_distances(&face, heights(&face), 1e-6).into_faces();
        assert_eq!(faces.len(), 1);
        assert_relative_eq!(faces[0].vertices[1], Point3::new(0.5, 0.0, 0.0));
        assert_relative_eq!(faces[0].vertices[2], Point3::new(0.25, 0.5, 0.0));
    }

    #[test]
    fn test_clip_split_two_front_keeps_winding() {
        let face = Face::new(
            Point3::new(0.0, 0.0, 1.0),  // Front
            Point3::new(1.0, 0.0, 1.0),  // Front
            Point3::new(0.5, 1.0, -1.0), // Behind
        );
        let faces = clip_with_distances(&face, heights(&face), 1e-6).into_faces();
        assert_eq!(faces.len(), 2);

        let original = face.winding_normal().unwrap();
        for part in &faces {
            let n = part.winding_normal().unwrap();
            assert!(n.dot(&original) > 0.99);
            assert!(part.vertices.iter().all(|v| v.z >= -1e-12));
        }
        let total: f64 = faces.iter().map(Face::area).sum();
        assert_relative_eq!(total, face.area() * 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_face_normal_and_area() {
        let face = Face::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert_relative_eq!(face.normal, Vector3::z());
        assert_relative_eq!(face.area(), 0.5);
    }

    #[test]
    fn test_degenerate_face_uses_stored_normal() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let face = Face::with_normal([p, p, p], Vector3::new(0.0, 2.0, 0.0));
        assert!(face.winding_normal().is_none());
        assert_relative_eq!(face.plane_normal().unwrap(), Vector3::y());

        let bare = Face::new(p, p, p);
        assert!(bare.plane_normal().is_none());
    }
}
