// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Horizontal cutting of a mesh
//!
//! [`MeshClipper`] borrows a [`Mesh`] and annotates each vertex with its
//! signed height above a cutting plane. Soft clipping only updates those
//! annotations; the mesh itself is never modified. The annotations answer
//! two questions per layer: where the top of the printed part is
//! ([`MeshClipper::top_boundary_points`]) and which surface has been printed
//! so far ([`MeshClipper::printed_faces`]).

use crate::face::{clip_with_distances, Face};
use crate::mesh::Mesh;
use crate::primitives::{Vertex, EPSILON};

/// Per-vertex annotation relative to the current cutting plane
#[derive(Debug, Clone, Copy)]
pub struct Point {
    pub vertex: Vertex,
    /// Signed height above the cutting plane (positive = not printed yet)
    pub distance: f64,
    /// Number of triangles using the vertex
    pub occurrence: usize,
    /// `distance <= EPSILON` after the last soft clip
    pub visible: bool,
}

impl PartialEq for Point {
    /// Annotations are ignored
    fn eq(&self, other: &Self) -> bool {
        self.vertex == other.vertex
    }
}

/// Cutting-plane view over a borrowed mesh
#[derive(Debug, Clone)]
pub struct MeshClipper<'a> {
    mesh: &'a Mesh,
    points: Vec<Point>,
    height: f64,
}

impl<'a> MeshClipper<'a> {
    /// Annotate every vertex with distance 0
    ///
    /// Every point starts visible and [`MeshClipper::height`] reports the top
    /// of the mesh until a plane is set.
    pub fn new(mesh: &'a Mesh) -> Self {
        let mut occurrence = vec![0usize; mesh.vertex_count()];
        for t in 0..mesh.triangle_count() {
            for i in mesh.triangle(t).corner_indices() {
                occurrence[i] += 1;
            }
        }

        let points = mesh
            .vertices()
            .iter()
            .zip(occurrence)
            .map(|(&vertex, occurrence)| Point {
                vertex,
                distance: 0.0,
                occurrence,
                visible: true,
            })
            .collect();

        let mut clipper = Self {
            mesh,
            points,
            height: 0.0,
        };
        clipper.height = clipper.max_height();
        clipper
    }

    #[inline]
    pub fn mesh(&self) -> &'a Mesh {
        self.mesh
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Current cutting height
    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Lowest vertex z, 0 for an empty mesh
    pub fn min_height(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.vertex.z)
            .reduce(f64::min)
            .unwrap_or(0.0)
    }

    /// Highest vertex z, 0 for an empty mesh
    pub fn max_height(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.vertex.z)
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// Move the plane to `z`, updating distances only
    pub fn set_cutting_height(&mut self, z: f64) {
        self.height = z;
        for p in &mut self.points {
            p.distance = p.vertex.z - z;
        }
    }

    /// Move the plane to `z` and mark vertices at or below it visible
    pub fn soft_clip(&mut self, z: f64) {
        self.set_cutting_height(z);
        for p in &mut self.points {
            p.visible = p.distance <= EPSILON;
        }
    }

    /// Points outlining the top slab of the printed part, on the plane
    ///
    /// Takes visible vertices no more than `layer_height` below the plane and
    /// the crossing points of edges that strictly straddle it. Everything is
    /// projected onto the plane and epsilon-duplicates are dropped.
    pub fn top_boundary_points(&self, layer_height: f64) -> Vec<Vertex> {
        let mut out: Vec<Vertex> = Vec::new();
        let mut push = |v: Vertex| {
            if !out.contains(&v) {
                out.push(v);
            }
        };

        for p in &self.points {
            if p.visible && p.distance >= -layer_height {
                push(Vertex::new(p.vertex.x, p.vertex.y, self.height));
            }
        }

        for edge in self.mesh.edges() {
            let [a, b] = edge.vertices;
            let (pa, pb) = (&self.points[a], &self.points[b]);
            let (da, db) = (pa.distance, pb.distance);
            let straddles = (da > EPSILON && db < -EPSILON) || (da < -EPSILON && db > EPSILON);
            if !straddles {
                continue;
            }
            let t = da / (da - db);
            let (va, vb) = (pa.vertex, pb.vertex);
            push(Vertex::new(
                va.x + (vb.x - va.x) * t,
                va.y + (vb.y - va.y) * t,
                self.height,
            ));
        }

        out
    }

    /// Surface of the part at or below the plane
    ///
    /// Triangles crossing the plane are split and only their lower part is
    /// kept. The cut is left open.
    pub fn printed_faces(&self) -> Vec<Face> {
        let mut faces = Vec::with_capacity(self.mesh.triangle_count());
        for t in 0..self.mesh.triangle_count() {
            let corners = self.mesh.triangle(t).corner_indices();
            let face = self.mesh.face(t);
            // Front of the clip is below the plane
            let d = corners.map(|i| -self.points[i].distance);
            faces.extend(clip_with_distances(&face, d, EPSILON).into_faces());
        }
        faces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rodclash_core::Facet;

    /// 10 mm cube standing on the bed, x and y in [-5, 5]
    fn cube() -> Mesh {
        let p = |x: f64, y: f64, z: f64| [x * 5.0, y * 5.0, z * 10.0];
        let c = [
            p(-1.0, -1.0, 0.0),
            p(1.0, -1.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(-1.0, 1.0, 0.0),
            p(-1.0, -1.0, 1.0),
            p(1.0, -1.0, 1.0),
            p(1.0, 1.0, 1.0),
            p(-1.0, 1.0, 1.0),
        ];
        let quads: [([usize; 4], [f64; 3]); 6] = [
            ([0, 3, 2, 1], [0.0, 0.0, -1.0]),
            ([4, 5, 6, 7], [0.0, 0.0, 1.0]),
            ([0, 1, 5, 4], [0.0, -1.0, 0.0]),
            ([1, 2, 6, 5], [1.0, 0.0, 0.0]),
            ([2, 3, 7, 6], [0.0, 1.0, 0.0]),
            ([3, 0, 4, 7], [-1.0, 0.0, 0.0]),
        ];
        let facets: Vec<Facet> = quads
            .iter()
            .flat_map(|&([a, b, cc, d], n)| {
                [
                    Facet::new(n, [c[a], c[b], c[cc]]),
                    Facet::new(n, [c[a], c[cc], c[d]]),
                ]
            })
            .collect();
        Mesh::from_facets(&facets).unwrap()
    }

    #[test]
    fn test_point_equality_ignores_annotations() {
        let vertex = Vertex::new(1.0, 2.0, 3.0);
        let a = Point {
            vertex,
            distance: -4.0,
            occurrence: 1,
            visible: true,
        };
        let b = Point {
            vertex: Vertex::new(1.0 + EPSILON / 2.0, 2.0, 3.0),
            distance: 7.5,
            occurrence: 6,
            visible: false,
        };
        assert_eq!(a, b);
        assert_eq!(b, a);

        let c = Point {
            vertex: Vertex::new(1.0, 2.0, 3.0 + EPSILON + 1e-12),
            ..a
        };
        assert_ne!(a, c);
    }

    #[test]
    fn test_heights_and_occurrence() {
        let mesh = cube();
        let clipper = MeshClipper::new(&mesh);
        assert_eq!(clipper.min_height(), 0.0);
        assert_eq!(clipper.max_height(), 10.0);
        assert_eq!(clipper.height(), 10.0);
        assert!(clipper.points().iter().all(|p| p.visible && p.distance == 0.0));

        let uses: usize = clipper.points().iter().map(|p| p.occurrence).sum();
        assert_eq!(uses, 36);
    }

    #[test]
    fn test_soft_clip_marks_visibility() {
        let mesh = cube();
        let mut clipper = MeshClipper::new(&mesh);
        clipper.soft_clip(5.0);
        let visible = clipper.points().iter().filter(|p| p.visible).count();
        assert_eq!(visible, 4);
        assert!(clipper
            .points()
            .iter()
            .all(|p| (p.distance - (p.vertex.z - 5.0)).abs() < 1e-12));

        // Vertices within EPSILON above the plane count as printed
        clipper.soft_clip(10.0 - EPSILON / 2.0);
        assert!(clipper.points().iter().all(|p| p.visible));
    }

    #[test]
    fn test_set_cutting_height_keeps_visibility() {
        let mesh = cube();
        let mut clipper = MeshClipper::new(&mesh);
        clipper.soft_clip(5.0);
        clipper.set_cutting_height(10.0);
        assert_eq!(clipper.points().iter().filter(|p| p.visible).count(), 4);
    }

    #[test]
    fn test_boundary_mid_height() {
        let mesh = cube();
        let mut clipper = MeshClipper::new(&mesh);
        clipper.soft_clip(5.0);
        let boundary = clipper.top_boundary_points(1.0);

        // 4 vertical edges and 4 side diagonals cross the plane
        assert_eq!(boundary.len(), 8);
        assert!(boundary.iter().all(|v| v.z == 5.0));
        assert!(boundary.contains(&Vertex::new(5.0, 5.0, 5.0)));
        assert!(boundary.contains(&Vertex::new(-5.0, -5.0, 5.0)));
    }

    #[test]
    fn test_boundary_on_top_face() {
        let mesh = cube();
        let mut clipper = MeshClipper::new(&mesh);
        clipper.soft_clip(10.0);
        let boundary = clipper.top_boundary_points(1.0);
        assert_eq!(boundary.len(), 4);
        assert!(boundary.iter().all(|v| v.z == 10.0));

        // A slab thick enough reaches the bottom vertices, which project up
        let boundary = clipper.top_boundary_points(10.0);
        assert_eq!(boundary.len(), 4);
    }

    #[test]
    fn test_printed_faces_below_plane() {
        let mesh = cube();
        let mut clipper = MeshClipper::new(&mesh);
        clipper.soft_clip(5.0);
        let faces = clipper.printed_faces();

        // Bottom 2, each side splits into 2 + 1
        assert_eq!(faces.len(), 14);
        assert!(faces
            .iter()
            .all(|f| f.vertices.iter().all(|v| v.z <= 5.0 + 1e-9)));
        let area: f64 = faces.iter().map(Face::area).sum();
        assert_relative_eq!(area, 300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_printed_faces_whole_and_nothing() {
        let mesh = cube();
        let mut clipper = MeshClipper::new(&mesh);
        assert_eq!(clipper.printed_faces().len(), 12);

        clipper.soft_clip(-1.0);
        assert!(clipper.printed_faces().is_empty());
        assert!(clipper.top_boundary_points(1.0).is_empty());
    }
}
