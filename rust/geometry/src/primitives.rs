// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vertex, edge and triangle value types.
//!
//! Only vertices compare floating point coordinates, with the single tolerance
//! [`EPSILON`]. Edges and triangles store plain indices into arrays owned by
//! someone else (normally a [`crate::Mesh`]) and are compared through
//! [`EdgeView`] / [`TriangleView`], which borrow those arrays. Their equality
//! is derived from vertex equality and never looks at lengths or areas.

use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;

/// Tolerance for every geometric comparison in the crate
pub const EPSILON: f64 = 1e-4;

/// A point in model space (millimetres).
///
/// Two vertices are equal when every coordinate differs by less than
/// [`EPSILON`]. That relation is not transitive, so deduplication keeps the
/// first stored vertex that matches (see [`crate::MeshBuilder`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vertex {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn point(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn from_point(p: &Point3<f64>) -> Self {
        Self::new(p.x, p.y, p.z)
    }

    #[inline]
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Same vertex moved by `offset`
    #[inline]
    pub fn translated(&self, offset: &Vector3<f64>) -> Vertex {
        Vertex::from_point(&(self.point() + offset))
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < EPSILON
            && (self.y - other.y).abs() < EPSILON
            && (self.z - other.z).abs() < EPSILON
    }
}

impl From<[f64; 3]> for Vertex {
    fn from(c: [f64; 3]) -> Self {
        Vertex::new(c[0], c[1], c[2])
    }
}

impl From<Point3<f64>> for Vertex {
    fn from(p: Point3<f64>) -> Self {
        Vertex::from_point(&p)
    }
}

/// Undirected edge between two vertices of an external vertex array
#[derive(Debug, Clone, Default)]
pub struct Edge {
    /// Endpoint indices, in the order the edge was first proposed
    pub vertices: [usize; 2],
    /// Triangles that use this edge
    pub users: SmallVec<[usize; 2]>,
}

impl Edge {
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            vertices: [a, b],
            users: SmallVec::new(),
        }
    }

    /// Endpoint indices sorted ascending, usable as a lookup key
    #[inline]
    pub fn key(&self) -> (usize, usize) {
        let [a, b] = self.vertices;
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Borrow the backing vertex array for comparisons
    #[inline]
    pub fn view<'a>(&'a self, vertices: &'a [Vertex]) -> EdgeView<'a> {
        EdgeView {
            edge: self,
            vertices,
        }
    }
}

/// An edge together with the vertex array it indexes
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a> {
    pub edge: &'a Edge,
    pub vertices: &'a [Vertex],
}

impl<'a> EdgeView<'a> {
    #[inline]
    pub fn start(&self) -> &'a Vertex {
        &self.vertices[self.edge.vertices[0]]
    }

    #[inline]
    pub fn end(&self) -> &'a Vertex {
        &self.vertices[self.edge.vertices[1]]
    }
}

impl PartialEq for EdgeView<'_> {
    /// Same endpoints as an unordered pair; users are ignored
    fn eq(&self, other: &Self) -> bool {
        (self.start() == other.start() && self.end() == other.end())
            || (self.start() == other.end() && self.end() == other.start())
    }
}

/// Triangle made of three edges of an external edge array
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Edge indices in facet order: (v0,v1), (v1,v2), (v2,v0)
    pub edges: [usize; 3],
    pub normal: Vector3<f64>,
    /// `true` when `normal` agrees with the winding `(v1-v0) x (v2-v0)`
    pub oriented: bool,
}

impl Triangle {
    #[inline]
    pub fn new(edges: [usize; 3], normal: Vector3<f64>) -> Self {
        Self {
            edges,
            normal,
            oriented: true,
        }
    }

    /// Borrow the backing edge and vertex arrays for comparisons
    #[inline]
    pub fn view<'a>(&'a self, edges: &'a [Edge], vertices: &'a [Vertex]) -> TriangleView<'a> {
        TriangleView {
            triangle: self,
            edges,
            vertices,
        }
    }
}

/// A triangle together with the arrays it indexes
#[derive(Debug, Clone, Copy)]
pub struct TriangleView<'a> {
    pub triangle: &'a Triangle,
    pub edges: &'a [Edge],
    pub vertices: &'a [Vertex],
}

impl<'a> TriangleView<'a> {
    /// Vertex indices in winding order, recovered from the edge cycle
    ///
    /// The first edge gives `v0` and `v1`, the vertex it shares with the
    /// second edge is `v1`, and the second edge's other end is `v2`.
    pub fn corner_indices(&self) -> [usize; 3] {
        let [e0, e1, _] = self.triangle.edges;
        let [a, b] = self.edges[e0].vertices;
        let [c, d] = self.edges[e1].vertices;

        let (v0, v1) = if c == b || d == b { (a, b) } else { (b, a) };
        let v2 = if c == v1 { d } else { c };
        [v0, v1, v2]
    }

    pub fn corners(&self) -> [&'a Vertex; 3] {
        let [a, b, c] = self.corner_indices();
        [&self.vertices[a], &self.vertices[b], &self.vertices[c]]
    }

    pub fn points(&self) -> [Point3<f64>; 3] {
        let [a, b, c] = self.corners();
        [a.point(), b.point(), c.point()]
    }
}

impl PartialEq for TriangleView<'_> {
    /// Same set of 3 vertices, whatever the edge order or backing arrays
    fn eq(&self, other: &Self) -> bool {
        let mine = self.corners();
        let theirs = other.corners();
        mine.iter().all(|v| theirs.iter().any(|w| v == w))
            && theirs.iter().all(|w| mine.iter().any(|v| v == w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_equality_within_epsilon() {
        let v = Vertex::new(1.0, -2.0, 3.0);
        for d in [0.0, 1e-5, -9.99e-5, 5e-5] {
            let w = Vertex::new(v.x + d, v.y - d, v.z + d);
            assert_eq!(v, w, "offset {d}");
            assert_eq!(w, v, "offset {d}");
        }
    }

    #[test]
    fn test_vertex_equality_boundary() {
        let v1 = 0.0;
        let v2 = EPSILON + 1e-16;
        assert_ne!(Vertex::new(v1, 0.0, 0.0), Vertex::new(v2, 0.0, 0.0));
        assert_ne!(Vertex::new(0.0, v1, 0.0), Vertex::new(0.0, v2, 0.0));
        assert_ne!(Vertex::new(0.0, 0.0, v1), Vertex::new(0.0, 0.0, v2));
    }

    #[test]
    fn test_edge_equality_ignores_direction_and_backing_array() {
        let first = [Vertex::new(0.0, 0.0, 0.0), Vertex::new(1.0, 0.0, 0.0)];
        let second = [
            Vertex::new(1.0, 0.0, 0.0),
            Vertex::new(5.0, 5.0, 5.0),
            Vertex::new(0.0, 0.0, 0.00001),
        ];

        let forward = Edge::new(0, 1);
        let backward = Edge::new(1, 0);
        assert_eq!(forward.view(&first), backward.view(&first));

        let mut elsewhere = Edge::new(2, 0);
        elsewhere.users.push(7);
        assert_eq!(forward.view(&first), elsewhere.view(&second));
        assert_ne!(forward.view(&first), Edge::new(0, 1).view(&second));
    }

    #[test]
    fn test_triangle_equality_ignores_edge_order() {
        let vertices = [
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(1.0, 0.0, 0.0),
            Vertex::new(0.0, 1.0, 0.0),
        ];
        // A = (0,1), B = (1,2), C = (2,0)
        let edges = [Edge::new(0, 1), Edge::new(1, 2), Edge::new(2, 0)];
        let up = Vector3::z();

        let abc = Triangle::new([0, 1, 2], up);
        let bac = Triangle::new([1, 0, 2], up);
        assert_eq!(abc.view(&edges, &vertices), bac.view(&edges, &vertices));

        // Same points through differently ordered arrays
        let other_vertices = [vertices[2], vertices[0], vertices[1]];
        let other_edges = [Edge::new(2, 1), Edge::new(0, 2), Edge::new(1, 0)];
        let other = Triangle::new([2, 0, 1], -up);
        assert_eq!(
            abc.view(&edges, &vertices),
            other.view(&other_edges, &other_vertices)
        );

        let moved = [vertices[0], vertices[1], Vertex::new(0.0, 2.0, 0.0)];
        assert_ne!(abc.view(&edges, &vertices), abc.view(&edges, &moved));
    }

    #[test]
    fn test_corners_follow_edge_cycle() {
        let vertices = [
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(1.0, 0.0, 0.0),
            Vertex::new(0.0, 1.0, 0.0),
        ];
        // Second edge stored reversed, as deduplication may leave it
        let edges = [Edge::new(0, 1), Edge::new(2, 1), Edge::new(2, 0)];
        let tri = Triangle::new([0, 1, 2], Vector3::z());
        assert_eq!(tri.view(&edges, &vertices).corner_indices(), [0, 1, 2]);

        // First edge stored reversed
        let edges = [Edge::new(1, 0), Edge::new(1, 2), Edge::new(2, 0)];
        assert_eq!(tri.view(&edges, &vertices).corner_indices(), [0, 1, 2]);
    }
}
