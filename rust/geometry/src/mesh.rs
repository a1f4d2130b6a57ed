// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Indexed triangle mesh with shared edges
//!
//! The [`Mesh`] owns three arenas: vertices, edges and triangles. Edges and
//! triangles refer to their parts by index, and each edge records which
//! triangles use it. [`MeshBuilder`] deduplicates the raw facets of an STL
//! model into this form.

use nalgebra::{Point3, Vector3};
use rodclash_core::{Facet, StlModel};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::face::Face;
use crate::primitives::{Edge, EdgeView, Triangle, TriangleView, Vertex, EPSILON};

/// Triangle mesh with shared vertices and edges
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    triangles: Vec<Triangle>,
}

impl Mesh {
    /// Build a mesh from decoded facets
    pub fn from_facets(facets: &[Facet]) -> Result<Self> {
        let mut builder = MeshBuilder::with_capacity(facets.len());
        for (index, facet) in facets.iter().enumerate() {
            builder.add_facet(index, facet)?;
        }
        builder.build()
    }

    /// Build a mesh from a decoded STL model
    pub fn from_model(model: &StlModel) -> Result<Self> {
        Self::from_facets(&model.facets)
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    #[inline]
    pub fn edge(&self, index: usize) -> EdgeView<'_> {
        self.edges[index].view(&self.vertices)
    }

    #[inline]
    pub fn triangle(&self, index: usize) -> TriangleView<'_> {
        self.triangles[index].view(&self.edges, &self.vertices)
    }

    /// Triangle `index` as a free-standing face in winding order
    pub fn face(&self, index: usize) -> Face {
        let view = self.triangle(index);
        Face::with_normal(view.points(), view.triangle.normal)
    }

    /// Sum of the user-list lengths over all edges
    ///
    /// Equals three times the triangle count for a well-formed mesh.
    pub fn edge_user_total(&self) -> usize {
        self.edges.iter().map(|e| e.users.len()).sum()
    }

    /// Calculate bounds (min, max)
    pub fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        if self.vertices.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f64::MAX, f64::MAX, f64::MAX);
        let mut max = Point3::new(f64::MIN, f64::MIN, f64::MIN);
        for v in &self.vertices {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }
        (min, max)
    }

    /// Copy of the mesh with every vertex moved by `offset`
    ///
    /// Topology is shared unchanged; only positions move.
    pub fn translated(&self, offset: &Vector3<f64>) -> Mesh {
        Mesh {
            vertices: self.vertices.iter().map(|v| v.translated(offset)).collect(),
            edges: self.edges.clone(),
            triangles: self.triangles.clone(),
        }
    }
}

/// Grid cell key used to find epsilon-equal vertices without a full scan
type Cell = (i64, i64, i64);

#[inline]
fn cell_of(v: &Vertex) -> Cell {
    (
        (v.x / EPSILON).floor() as i64,
        (v.y / EPSILON).floor() as i64,
        (v.z / EPSILON).floor() as i64,
    )
}

/// Incremental mesh construction from raw facets
///
/// Vertices are deduplicated with epsilon equality: a new point maps to the
/// lowest-index stored vertex it equals, exactly as a linear scan would.
/// Candidates are looked up in a grid of `EPSILON`-sized cells, so only the
/// 27 cells around the point are examined. Edges are deduplicated by their
/// sorted index pair.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    triangles: Vec<Triangle>,
    vertex_grid: FxHashMap<Cell, Vec<usize>>,
    edge_lookup: FxHashMap<(usize, usize), usize>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder sized for `facet_count` facets of a closed surface
    pub fn with_capacity(facet_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(facet_count / 2 + 2),
            edges: Vec::with_capacity(facet_count * 3 / 2),
            triangles: Vec::with_capacity(facet_count),
            vertex_grid: FxHashMap::default(),
            edge_lookup: FxHashMap::default(),
        }
    }

    /// Index of the stored vertex equal to `v`, inserting it if none is
    pub fn add_vertex(&mut self, v: Vertex) -> usize {
        let (cx, cy, cz) = cell_of(&v);
        let mut found: Option<usize> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = self.vertex_grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &i in bucket {
                        if self.vertices[i] == v && found.map_or(true, |f| i < f) {
                            found = Some(i);
                        }
                    }
                }
            }
        }
        if let Some(i) = found {
            return i;
        }

        let index = self.vertices.len();
        self.vertices.push(v);
        self.vertex_grid.entry((cx, cy, cz)).or_default().push(index);
        index
    }

    /// Index of the stored edge joining `a` and `b`, inserting it if none is
    pub fn add_edge(&mut self, a: usize, b: usize) -> usize {
        let edge = Edge::new(a, b);
        let next = self.edges.len();
        let index = *self.edge_lookup.entry(edge.key()).or_insert(next);
        if index == next {
            self.edges.push(edge);
        }
        index
    }

    /// Add one facet as a triangle
    ///
    /// `index` is the facet's position in the input, used for error reports.
    pub fn add_facet(&mut self, index: usize, facet: &Facet) -> Result<()> {
        let [v0, v1, v2] = facet.vertices.map(|c| self.add_vertex(Vertex::from(c)));
        if v0 == v1 || v1 == v2 || v2 == v0 {
            return Err(Error::DegenerateFacet { index });
        }

        let edges = [
            self.add_edge(v0, v1),
            self.add_edge(v1, v2),
            self.add_edge(v2, v0),
        ];

        let p = [v0, v1, v2].map(|i| self.vertices[i].point());
        let winding = (p[1] - p[0]).cross(&(p[2] - p[0]));
        let stored = Vector3::from(facet.normal);

        let mut triangle = if facet.has_zero_normal() {
            Triangle::new(edges, winding.try_normalize(f64::EPSILON).unwrap_or(winding))
        } else {
            Triangle::new(edges, stored)
        };
        triangle.oriented = facet.has_zero_normal() || stored.dot(&winding) >= 0.0;
        self.triangles.push(triangle);
        Ok(())
    }

    /// Fill edge user lists and finish the mesh
    pub fn build(mut self) -> Result<Mesh> {
        if self.triangles.is_empty() {
            return Err(Error::EmptyMesh("no facets".to_string()));
        }

        for (t, triangle) in self.triangles.iter().enumerate() {
            for &e in &triangle.edges {
                self.edges[e].users.push(t);
            }
        }

        let open = self.edges.iter().filter(|e| e.users.len() != 2).count();
        if open > 0 {
            tracing::debug!(edges = open, "mesh has edges not shared by exactly 2 triangles");
        }
        let flipped = self.triangles.iter().filter(|t| !t.oriented).count();
        if flipped > 0 {
            tracing::debug!(triangles = flipped, "stored normals disagree with winding");
        }

        tracing::debug!(
            vertices = self.vertices.len(),
            edges = self.edges.len(),
            triangles = self.triangles.len(),
            "built mesh"
        );

        Ok(Mesh {
            vertices: self.vertices,
            edges: self.edges,
            triangles: self.triangles,
        })
    }
}
